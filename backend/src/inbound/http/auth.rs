//! Registration, login and logout handlers.
//!
//! ```text
//! GET  /register/   form descriptor
//! POST /register/   username=alice&password=pw  -> 302 /login/
//! GET  /login/      form descriptor
//! POST /login/      username=alice&password=pw  -> 302 /
//! GET  /logout/                                 -> 302 /login/
//! ```
//!
//! A taken username and bad credentials are not HTTP errors: the form page
//! answers `200 text/plain` with the message, as the HTML form did.

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, get, post, web};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{
    BAD_CREDENTIALS_MESSAGE, Error, ErrorCode, LoginCredentials, LoginValidationError,
    USER_EXISTS_MESSAGE,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::current_user::LOGIN_PATH;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Path of the home page.
pub const HOME_PATH: &str = "/";
/// Path of the registration page.
pub const REGISTER_PATH: &str = "/register/";

/// Form body shared by `POST /register/` and `POST /login/`.
///
/// Missing fields read as empty so they fail validation with a JSON error.
#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    /// Submitted username.
    #[serde(default)]
    pub username: String,
    /// Submitted password.
    #[serde(default)]
    pub password: String,
}

impl TryFrom<CredentialsForm> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: CredentialsForm) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    let field = err.field();
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": field, "code": format!("empty_{field}") }))
}

fn form_descriptor(form: &str, action: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "form": form,
        "method": "POST",
        "action": action,
        "fields": ["username", "password"],
    }))
}

fn plain_message(message: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::plaintext())
        .body(message.to_owned())
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Registration form descriptor.
#[get("/register/")]
pub async fn register_form() -> HttpResponse {
    form_descriptor("register", REGISTER_PATH)
}

/// Create an account and send the user to the login page.
#[post("/register/")]
pub async fn register(
    state: web::Data<HttpState>,
    form: web::Form<CredentialsForm>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(form.into_inner()).map_err(map_login_validation_error)?;
    match state.accounts.register(&credentials).await {
        Ok(_) => Ok(redirect(LOGIN_PATH)),
        Err(err) if err.code() == ErrorCode::Conflict => Ok(plain_message(USER_EXISTS_MESSAGE)),
        Err(err) => Err(err),
    }
}

/// Login form descriptor.
#[get("/login/")]
pub async fn login_form() -> HttpResponse {
    form_descriptor("login", LOGIN_PATH)
}

/// Authenticate and establish a session.
#[post("/login/")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<CredentialsForm>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(form.into_inner()).map_err(map_login_validation_error)?;
    match state.accounts.authenticate(&credentials).await {
        Ok(user_id) => {
            session.persist_user(&user_id)?;
            Ok(redirect(HOME_PATH))
        }
        Err(err) if err.code() == ErrorCode::Unauthorized => {
            Ok(plain_message(BAD_CREDENTIALS_MESSAGE))
        }
        Err(err) => Err(err),
    }
}

/// Clear the session and return to the login page.
#[get("/logout/")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    redirect(LOGIN_PATH)
}
