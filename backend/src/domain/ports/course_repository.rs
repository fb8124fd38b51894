//! Driven port for the course catalogue table.

use async_trait::async_trait;

use crate::domain::{Capacity, Course, CourseDraft, CourseId, CourseListing};

use super::define_port_error;

define_port_error! {
    /// Errors raised by course catalogue adapters.
    pub enum CourseRepositoryError for "course repository" {}
}

/// Port for reading and administering courses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Insert a new course and return it with its assigned id and timestamp.
    async fn create(&self, draft: &CourseDraft) -> Result<Course, CourseRepositoryError>;

    /// Fetch a course by id.
    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, CourseRepositoryError>;

    /// List every course ordered by id, each with its enrollment count.
    async fn list_with_counts(&self) -> Result<Vec<CourseListing>, CourseRepositoryError>;

    /// Replace a course's capacity, returning the updated course when it exists.
    async fn set_capacity(
        &self,
        id: CourseId,
        capacity: Capacity,
    ) -> Result<Option<Course>, CourseRepositoryError>;

    /// Delete a course and, by cascade, its enrollments. Returns whether a
    /// row was removed.
    async fn delete(&self, id: CourseId) -> Result<bool, CourseRepositoryError>;

    /// Number of courses in the catalogue.
    async fn count(&self) -> Result<u64, CourseRepositoryError>;
}
