//! Enrollment use-cases: enroll, drop, seat accounting and listings.
//!
//! Capacity is advisory. `enroll` never consults `is_full`; over-capacity
//! enrollment is accepted and shows up as negative available seats.

use std::sync::Arc;

use tracing::info;

use super::ports::{
    CourseRepository, CourseRepositoryError, EnrollmentRepository, EnrollmentRepositoryError,
};
use super::{CourseId, CourseListing, EnrollOutcome, Enrollment, Error, UserId};

pub(crate) fn map_course_error(error: CourseRepositoryError) -> Error {
    if error.is_unavailable() {
        Error::service_unavailable(error.to_string())
    } else {
        Error::internal(error.to_string())
    }
}

fn map_enrollment_error(error: EnrollmentRepositoryError) -> Error {
    match error {
        EnrollmentRepositoryError::Connection { message } => Error::service_unavailable(message),
        EnrollmentRepositoryError::MissingReference { course_id } => {
            Error::not_found(format!("course {course_id} not found"))
        }
        error @ (EnrollmentRepositoryError::Query { .. }
        | EnrollmentRepositoryError::Duplicate { .. }) => Error::internal(error.to_string()),
    }
}

/// Enrollment operations over the course and enrollment stores.
#[derive(Clone)]
pub struct EnrollmentService {
    courses: Arc<dyn CourseRepository>,
    enrollments: Arc<dyn EnrollmentRepository>,
}

impl EnrollmentService {
    /// Create a service over the given repositories.
    #[must_use]
    pub const fn new(
        courses: Arc<dyn CourseRepository>,
        enrollments: Arc<dyn EnrollmentRepository>,
    ) -> Self {
        Self {
            courses,
            enrollments,
        }
    }

    async fn require_course(&self, course_id: CourseId) -> Result<super::Course, Error> {
        self.courses
            .find_by_id(course_id)
            .await
            .map_err(map_course_error)?
            .ok_or_else(|| Error::not_found(format!("course {course_id} not found")))
    }

    /// Ensure an enrollment row exists for `(student, course_id)`.
    ///
    /// Fails with `not_found` for an unknown course. Capacity is not checked.
    pub async fn enroll(
        &self,
        student: &UserId,
        course_id: CourseId,
    ) -> Result<EnrollOutcome, Error> {
        let course = self.require_course(course_id).await?;
        let created = self
            .enrollments
            .insert_if_absent(student, course.id)
            .await
            .map_err(map_enrollment_error)?;
        if created {
            info!(%student, course_id = %course.id, "student enrolled");
            Ok(EnrollOutcome::Created)
        } else {
            Ok(EnrollOutcome::AlreadyEnrolled)
        }
    }

    /// Remove the `(student, course_id)` enrollment if present.
    ///
    /// Unknown courses and missing rows are not errors.
    pub async fn drop(&self, student: &UserId, course_id: CourseId) -> Result<(), Error> {
        let removed = self
            .enrollments
            .delete(student, course_id)
            .await
            .map_err(map_enrollment_error)?;
        if removed {
            info!(%student, %course_id, "student dropped course");
        }
        Ok(())
    }

    /// `capacity - enrollment_count` for a course; may be negative.
    pub async fn available_seats(&self, course_id: CourseId) -> Result<i64, Error> {
        let course = self.require_course(course_id).await?;
        let count = self
            .enrollments
            .count_for_course(course_id)
            .await
            .map_err(map_enrollment_error)?;
        Ok(course.available_seats(count))
    }

    /// Whether a course has no seats left.
    pub async fn is_full(&self, course_id: CourseId) -> Result<bool, Error> {
        Ok(self.available_seats(course_id).await? <= 0)
    }

    /// Every course with its enrollment count, for display.
    pub async fn list_courses_with_counts(&self) -> Result<Vec<CourseListing>, Error> {
        self.courses
            .list_with_counts()
            .await
            .map_err(map_course_error)
    }

    /// The student's enrollments, oldest first.
    pub async fn list_enrollments_for(&self, student: &UserId) -> Result<Vec<Enrollment>, Error> {
        self.enrollments
            .list_for_student(student)
            .await
            .map_err(map_enrollment_error)
    }

    /// Ids of the courses the student is enrolled in.
    pub async fn enrolled_course_ids(&self, student: &UserId) -> Result<Vec<CourseId>, Error> {
        self.enrollments
            .course_ids_for_student(student)
            .await
            .map_err(map_enrollment_error)
    }
}
