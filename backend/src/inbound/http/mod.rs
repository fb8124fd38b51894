//! HTTP inbound adapter.

pub mod auth;
pub mod courses;
pub mod current_user;
pub mod error;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
pub mod trailing_slash;
#[cfg(test)]
pub mod test_utils;

use actix_web::web;

pub use error::ApiResult;

/// Register the application pages on `cfg`.
///
/// The caller supplies `web::Data<HttpState>` and the session middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(auth::register_form)
        .service(auth::register)
        .service(auth::login_form)
        .service(auth::login)
        .service(auth::logout)
        .service(courses::home)
        .service(courses::course_list)
        .service(courses::enroll)
        .service(courses::my_courses)
        .service(courses::drop_course);
}
