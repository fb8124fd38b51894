//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (the relational store, in practice). Each trait exposes strongly typed
//! errors so adapters map their failures into predictable variants instead
//! of returning `anyhow::Result`.

mod account_repository;
mod course_repository;
mod enrollment_repository;
mod macros;

pub(crate) use macros::define_port_error;

pub use account_repository::{AccountRepository, AccountRepositoryError};
pub use course_repository::{CourseRepository, CourseRepositoryError};
pub use enrollment_repository::{EnrollmentRepository, EnrollmentRepositoryError};

#[cfg(test)]
pub use account_repository::MockAccountRepository;
#[cfg(test)]
pub use course_repository::MockCourseRepository;
#[cfg(test)]
pub use enrollment_repository::MockEnrollmentRepository;
