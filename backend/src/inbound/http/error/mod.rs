//! Turns domain [`Error`]s into JSON responses.
//!
//! Every error body carries the request's trace id, also echoed in the
//! `trace-id` header. Internal failures are logged in full and replaced by a
//! generic message before they reach the client.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Result alias for handlers that fail with a domain [`Error`].
pub type ApiResult<T> = Result<T, Error>;

/// Message sent in place of internal failure details.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn client_view(err: &Error) -> Error {
    let trace_id = err.trace_id().unwrap_or("-");
    match err.code() {
        ErrorCode::InternalError => {
            error!(trace_id, detail = err.message(), "request failed internally");
            let generic = Error::internal(INTERNAL_ERROR_MESSAGE);
            match err.trace_id() {
                Some(id) => generic.with_trace_id(id),
                None => generic,
            }
        }
        ErrorCode::ServiceUnavailable => {
            warn!(trace_id, detail = err.message(), "storage unavailable");
            err.clone()
        }
        _ => err.clone(),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let mut response = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(client_view(self))
    }
}
