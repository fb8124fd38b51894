//! Driven port for the enrollment table.
//!
//! The `(student, course)` uniqueness constraint lives in the store. The
//! idempotent [`EnrollmentRepository::insert_if_absent`] path swallows a
//! collision; the raw [`EnrollmentRepository::insert`] path reports it as
//! [`EnrollmentRepositoryError::Duplicate`].

use async_trait::async_trait;

use crate::domain::{CourseId, Enrollment, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by enrollment adapters.
    pub enum EnrollmentRepositoryError for "enrollment repository" {
        /// The `(student, course)` pair already has an enrollment row.
        Duplicate {
            /// Student half of the pair.
            student_id: String,
            /// Course half of the pair.
            course_id: i64,
        } =>
            "student {student_id} is already enrolled in course {course_id}",
        /// The referenced course or student does not exist.
        MissingReference {
            /// Course named by the rejected row.
            course_id: i64,
        } =>
            "enrollment references a missing course or student (course {course_id})",
    }
}

/// Port for enrollment rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentRepository: Send + Sync {
    /// Insert a row, failing with `Duplicate` when the pair already exists.
    async fn insert(
        &self,
        student: &UserId,
        course: CourseId,
    ) -> Result<Enrollment, EnrollmentRepositoryError>;

    /// Insert a row unless the pair already exists. Returns `true` when a
    /// row was created.
    async fn insert_if_absent(
        &self,
        student: &UserId,
        course: CourseId,
    ) -> Result<bool, EnrollmentRepositoryError>;

    /// Delete the pair's row if present. Returns `true` when a row was removed.
    async fn delete(
        &self,
        student: &UserId,
        course: CourseId,
    ) -> Result<bool, EnrollmentRepositoryError>;

    /// Enrollments held by a student, oldest first, with their courses.
    async fn list_for_student(
        &self,
        student: &UserId,
    ) -> Result<Vec<Enrollment>, EnrollmentRepositoryError>;

    /// Ids of the courses a student is enrolled in, ascending.
    async fn course_ids_for_student(
        &self,
        student: &UserId,
    ) -> Result<Vec<CourseId>, EnrollmentRepositoryError>;

    /// Number of rows referencing a course.
    async fn count_for_course(&self, course: CourseId) -> Result<u64, EnrollmentRepositoryError>;
}
