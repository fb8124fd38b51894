//! Login-required extractor.
//!
//! Handlers that take a [`CurrentUser`] only run for signed-in sessions.
//! Anonymous requests are answered with `302 /login/?next=<path>`.

use std::future::{Ready, ready};

use actix_session::SessionExt;
use actix_web::http::{StatusCode, header};
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, dev::Payload};
use url::form_urlencoded;

use crate::domain::UserId;

use super::session::SessionContext;

/// Login page path.
pub const LOGIN_PATH: &str = "/login/";

/// Build the login redirect target carrying `next`.
///
/// The value is form-urlencoded except for `/`, which stays literal.
///
/// ```
/// use enrollment_backend::inbound::http::current_user::login_redirect_target;
///
/// assert_eq!(login_redirect_target("/courses/"), "/login/?next=/courses/");
/// ```
#[must_use]
pub fn login_redirect_target(next: &str) -> String {
    let encoded: String = form_urlencoded::byte_serialize(next.as_bytes()).collect();
    format!("{LOGIN_PATH}?next={}", encoded.replace("%2F", "/"))
}

/// Response for anonymous access to a login-required path.
#[derive(Debug, thiserror::Error)]
#[error("login required for {next}")]
pub struct LoginRequired {
    next: String,
}

impl LoginRequired {
    /// Redirect back to `next` after login.
    #[must_use]
    pub fn new(next: impl Into<String>) -> Self {
        Self { next: next.into() }
    }
}

impl ResponseError for LoginRequired {
    fn status_code(&self) -> StatusCode {
        StatusCode::FOUND
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Found()
            .insert_header((header::LOCATION, login_redirect_target(&self.next)))
            .finish()
    }
}

/// Signed-in user resolved from the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser(UserId);

impl CurrentUser {
    /// The user's id.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.0
    }
}

fn resolve(req: &HttpRequest) -> Result<CurrentUser, actix_web::Error> {
    let session = SessionContext::new(req.get_session());
    match session.user_id() {
        Ok(Some(id)) => Ok(CurrentUser(id)),
        Ok(None) => {
            let next = req
                .uri()
                .path_and_query()
                .map_or_else(|| req.path().to_owned(), ToString::to_string);
            Err(LoginRequired::new(next).into())
        }
        Err(error) => Err(error.into()),
    }
}

impl FromRequest for CurrentUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(resolve(req))
    }
}
