//! Builders wiring repositories into domain services.

use std::sync::Arc;

use enrollment_backend::domain::ports::{AccountRepository, CourseRepository, EnrollmentRepository};
use enrollment_backend::domain::{
    AccountService, CatalogueService, EnrollmentService, PasswordPolicy,
};
use enrollment_backend::inbound::http::state::HttpState;
use enrollment_backend::outbound::memory::InMemoryStore;
use enrollment_backend::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselCourseRepository, DieselEnrollmentRepository,
};

/// Backing store selected at startup.
#[derive(Clone)]
pub enum Storage {
    /// PostgreSQL through a pooled Diesel connection.
    Postgres(DbPool),
    /// Process-local tables, lost on restart.
    Memory(InMemoryStore),
}

struct Repositories {
    accounts: Arc<dyn AccountRepository>,
    courses: Arc<dyn CourseRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl Repositories {
    fn from_storage(storage: &Storage) -> Self {
        match storage {
            Storage::Postgres(pool) => Self {
                accounts: Arc::new(DieselAccountRepository::new(pool.clone())),
                courses: Arc::new(DieselCourseRepository::new(pool.clone())),
                enrollments: Arc::new(DieselEnrollmentRepository::new(pool.clone())),
            },
            Storage::Memory(store) => {
                let store = Arc::new(store.clone());
                Self {
                    accounts: store.clone(),
                    courses: store.clone(),
                    enrollments: store,
                }
            }
        }
    }
}

/// Build the handler state over `storage`.
pub fn build_http_state(storage: &Storage, policy: PasswordPolicy) -> HttpState {
    let repos = Repositories::from_storage(storage);
    HttpState::new(
        AccountService::new(repos.accounts, policy),
        EnrollmentService::new(repos.courses, repos.enrollments),
    )
}

/// Build the catalogue administration service over `storage`.
pub fn build_catalogue_service(storage: &Storage) -> CatalogueService {
    CatalogueService::new(Repositories::from_storage(storage).courses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use enrollment_backend::domain::{CourseDraft, CourseId, LoginCredentials};

    #[tokio::test]
    async fn memory_services_share_one_store() {
        let storage = Storage::Memory(InMemoryStore::new());
        let state = build_http_state(&storage, PasswordPolicy::low_cost());
        let catalogue = build_catalogue_service(&storage);

        let course = catalogue
            .create_course(&CourseDraft::new("Algorithms", "Prof. Xu").expect("draft"))
            .await
            .expect("course created");
        let account = state
            .accounts
            .register(&LoginCredentials::try_from_parts("alice", "pw123").expect("credentials"))
            .await
            .expect("account registered");
        state
            .enrollments
            .enroll(&account.id, course.id)
            .await
            .expect("enrolled");

        assert_eq!(
            state
                .enrollments
                .enrolled_course_ids(&account.id)
                .await
                .expect("ids"),
            vec![CourseId::new(1)]
        );
    }
}
