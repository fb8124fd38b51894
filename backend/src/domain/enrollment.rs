//! Enrollment records linking a student to a course.

use chrono::{DateTime, Utc};

use super::{Course, UserId};

/// One student's enrollment in one course, unique per pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    /// Enrolled student.
    pub student: UserId,
    /// Referenced course, loaded for display.
    pub course: Course,
    /// When the row was created.
    pub enrolled_at: DateTime<Utc>,
}

/// Result of an idempotent enroll request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollOutcome {
    /// A new enrollment row was created.
    Created,
    /// The student already held an enrollment; nothing changed.
    AlreadyEnrolled,
}
