//! Fallback for requests that match no route.
//!
//! Every page lives under a path ending in `/`. A `GET` or `HEAD` for the
//! same path without the slash is answered with `301` to the slashed path
//! (query preserved) when that path is routable; everything else is `404`.

use actix_web::http::{Method, header};
use actix_web::{HttpRequest, HttpResponse};

fn slashed_target(req: &HttpRequest) -> Option<String> {
    if !matches!(*req.method(), Method::GET | Method::HEAD) {
        return None;
    }
    let path = req.path();
    if path.ends_with('/') {
        return None;
    }
    let slashed = format!("{path}/");
    if !req.resource_map().has_resource(&slashed) {
        return None;
    }
    Some(match req.query_string() {
        "" => slashed,
        query => format!("{slashed}?{query}"),
    })
}

/// Default service: redirect to the slashed route or answer `404`.
pub async fn append_slash(req: HttpRequest) -> HttpResponse {
    slashed_target(&req).map_or_else(
        || HttpResponse::NotFound().finish(),
        |target| {
            HttpResponse::MovedPermanently()
                .insert_header((header::LOCATION, target))
                .finish()
        },
    )
}
