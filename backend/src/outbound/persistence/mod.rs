//! PostgreSQL persistence adapters using Diesel.
//!
//! Adapters implement the domain repository ports over an async `bb8` pool
//! (`diesel-async`). Row structs and table definitions stay private to
//! this module; every failure is mapped into the port's error enum.
//!
//! ```ignore
//! use enrollment_backend::outbound::persistence::{DbPool, DieselCourseRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/enrollment")).await?;
//! let courses = DieselCourseRepository::new(pool);
//! ```

mod diesel_account_repository;
mod diesel_basic_error_mapping;
mod diesel_course_repository;
mod diesel_enrollment_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_course_repository::DieselCourseRepository;
pub use diesel_enrollment_repository::DieselEnrollmentRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
