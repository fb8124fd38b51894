//! Shared harness for HTTP journey tests.
//!
//! Builds the page routes over one in-memory store and exposes the catalogue
//! service so tests can arrange courses the way an administrator would.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use enrollment_backend::Trace;
use enrollment_backend::domain::{
    AccountService, Capacity, CatalogueService, Course, CourseDraft, EnrollmentService,
    PasswordPolicy,
};
use enrollment_backend::inbound::http::configure;
use enrollment_backend::inbound::http::state::HttpState;
use enrollment_backend::inbound::http::trailing_slash::append_slash;
use enrollment_backend::outbound::memory::InMemoryStore;

/// Services sharing one in-memory store.
pub struct Harness {
    pub state: HttpState,
    pub catalogue: CatalogueService,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        let state = HttpState::new(
            AccountService::new(store.clone(), PasswordPolicy::low_cost()),
            EnrollmentService::new(store.clone(), store.clone()),
        );
        Self {
            state,
            catalogue: CatalogueService::new(store),
        }
    }

    /// Create a course with the given capacity.
    pub async fn course(&self, name: &str, capacity: u32) -> Course {
        let draft = CourseDraft::new(name, "Prof. Lin")
            .expect("valid course draft")
            .with_capacity(Capacity::new(capacity).expect("valid capacity"));
        self.catalogue
            .create_course(&draft)
            .await
            .expect("course created")
    }

    /// Initialise the page routes behind cookie sessions and the trace middleware.
    pub async fn app(
        &self,
    ) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>
    {
        test::init_service(
            App::new()
                .app_data(web::Data::new(self.state.clone()))
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_name("session".to_owned())
                        .cookie_secure(false)
                        .build(),
                )
                .wrap(Trace)
                .configure(configure)
                .default_service(web::to(append_slash)),
        )
        .await
    }
}

/// `Location` header of a redirect response.
pub fn location<B>(res: &ServiceResponse<B>) -> Option<String> {
    res.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
}

/// Session cookie set by a response.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
}

/// Post a credentials form to `uri`.
pub async fn submit_credentials<S, B>(
    app: &S,
    uri: &str,
    username: &str,
    password: &str,
) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    test::call_service(
        app,
        test::TestRequest::post()
            .uri(uri)
            .set_form([("username", username), ("password", password)])
            .to_request(),
    )
    .await
}

/// Register and sign in `username`, returning the session cookie.
pub async fn signed_in<S, B>(app: &S, username: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let registered = submit_credentials(app, "/register/", username, "s3cret-pass").await;
    assert_eq!(registered.status(), StatusCode::FOUND);
    let login = submit_credentials(app, "/login/", username, "s3cret-pass").await;
    assert_eq!(login.status(), StatusCode::FOUND);
    session_cookie(&login).expect("login sets a session cookie")
}

/// Issue an authenticated GET.
pub async fn get_as<S, B>(app: &S, cookie: &Cookie<'static>, uri: &str) -> ServiceResponse<B>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    test::call_service(
        app,
        test::TestRequest::get()
            .uri(uri)
            .cookie(cookie.clone())
            .to_request(),
    )
    .await
}
