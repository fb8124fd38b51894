//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and only see domain services,
//! so they can be exercised over the in-memory store.

use crate::domain::{AccountService, EnrollmentService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Registration, login and account lookup.
    pub accounts: AccountService,
    /// Course listing and enrollment operations.
    pub enrollments: EnrollmentService,
}

impl HttpState {
    /// Bundle the services used by the handlers.
    #[must_use]
    pub const fn new(accounts: AccountService, enrollments: EnrollmentService) -> Self {
        Self {
            accounts,
            enrollments,
        }
    }
}
