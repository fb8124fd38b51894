//! Course catalogue records and seat accounting.
//!
//! Capacity is advisory: it feeds the `available_seats`/`is_full` display
//! values but never gates enrollment.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default course capacity applied when a draft omits one.
pub const DEFAULT_CAPACITY: u32 = 30;
/// Maximum length for course and teacher names.
pub const COURSE_TEXT_MAX: usize = 100;

/// Validation errors raised by course constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CourseValidationError {
    /// The course name was blank.
    #[error("course name must not be empty")]
    EmptyName,
    /// The course name exceeds the maximum length.
    #[error("course name must be at most {max} characters")]
    NameTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// The teacher name was blank.
    #[error("teacher name must not be empty")]
    EmptyTeacher,
    /// The teacher name exceeds the maximum length.
    #[error("teacher name must be at most {max} characters")]
    TeacherTooLong {
        /// Maximum permitted length.
        max: usize,
    },
    /// A stored or supplied capacity was negative or out of range.
    #[error("capacity must be between 0 and {max}, got {value}")]
    CapacityOutOfRange {
        /// Rejected value.
        value: i64,
        /// Maximum permitted capacity.
        max: u32,
    },
}

/// Course identifier as assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(i64);

impl CourseId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Non-negative seat capacity of a course.
///
/// # Examples
/// ```
/// use enrollment_backend::domain::Capacity;
///
/// assert_eq!(Capacity::default().get(), 30);
/// assert!(Capacity::try_from_i64(-1).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Capacity(u32);

impl Capacity {
    /// Largest capacity representable by the storage column.
    pub const MAX: u32 = i32::MAX.unsigned_abs();

    /// Construct a capacity from an unsigned seat count.
    pub fn new(seats: u32) -> Result<Self, CourseValidationError> {
        if seats > Self::MAX {
            return Err(CourseValidationError::CapacityOutOfRange {
                value: i64::from(seats),
                max: Self::MAX,
            });
        }
        Ok(Self(seats))
    }

    /// Construct a capacity from a signed value, rejecting negatives.
    pub fn try_from_i64(value: i64) -> Result<Self, CourseValidationError> {
        u32::try_from(value)
            .map_err(|_| CourseValidationError::CapacityOutOfRange {
                value,
                max: Self::MAX,
            })
            .and_then(Self::new)
    }

    /// Seat count.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self(DEFAULT_CAPACITY)
    }
}

impl TryFrom<i64> for Capacity {
    type Error = CourseValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_from_i64(value)
    }
}

impl From<Capacity> for u32 {
    fn from(value: Capacity) -> Self {
        value.0
    }
}

/// Validated input for creating a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDraft {
    name: String,
    teacher: String,
    description: String,
    capacity: Capacity,
}

fn validate_text(
    value: &str,
    empty: CourseValidationError,
    too_long: CourseValidationError,
) -> Result<String, CourseValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(empty);
    }
    if trimmed.chars().count() > COURSE_TEXT_MAX {
        return Err(too_long);
    }
    Ok(trimmed.to_owned())
}

impl CourseDraft {
    /// Build a draft with the default capacity and an empty description.
    pub fn new(name: &str, teacher: &str) -> Result<Self, CourseValidationError> {
        Ok(Self {
            name: validate_text(
                name,
                CourseValidationError::EmptyName,
                CourseValidationError::NameTooLong {
                    max: COURSE_TEXT_MAX,
                },
            )?,
            teacher: validate_text(
                teacher,
                CourseValidationError::EmptyTeacher,
                CourseValidationError::TeacherTooLong {
                    max: COURSE_TEXT_MAX,
                },
            )?,
            description: String::new(),
            capacity: Capacity::default(),
        })
    }

    /// Attach a free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Override the default capacity.
    #[must_use]
    pub fn with_capacity(mut self, capacity: Capacity) -> Self {
        self.capacity = capacity;
        self
    }

    /// Course name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Teacher name.
    #[must_use]
    pub fn teacher(&self) -> &str {
        &self.teacher
    }

    /// Description text; may be empty.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Seat capacity.
    #[must_use]
    pub const fn capacity(&self) -> Capacity {
        self.capacity
    }
}

/// Persisted course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Store-assigned identifier.
    pub id: CourseId,
    /// Course name.
    pub name: String,
    /// Teacher name.
    pub teacher: String,
    /// Free-text description.
    pub description: String,
    /// Advisory seat capacity.
    pub capacity: Capacity,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Course {
    /// Seats left given the current enrollment count; negative when the
    /// course is over capacity.
    ///
    /// # Examples
    /// ```
    /// # use chrono::Utc;
    /// use enrollment_backend::domain::{Capacity, Course, CourseId};
    ///
    /// let course = Course {
    ///     id: CourseId::new(1),
    ///     name: "Compilers".into(),
    ///     teacher: "Prof. Aho".into(),
    ///     description: String::new(),
    ///     capacity: Capacity::new(1).unwrap(),
    ///     created_at: Utc::now(),
    /// };
    /// assert_eq!(course.available_seats(0), 1);
    /// assert_eq!(course.available_seats(3), -2);
    /// ```
    #[must_use]
    pub fn available_seats(&self, enrollment_count: u64) -> i64 {
        let enrolled = i64::try_from(enrollment_count).unwrap_or(i64::MAX);
        i64::from(self.capacity.get()).saturating_sub(enrolled)
    }

    /// Whether no seats remain for the given enrollment count.
    #[must_use]
    pub fn is_full(&self, enrollment_count: u64) -> bool {
        self.available_seats(enrollment_count) <= 0
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.teacher)
    }
}

/// A course paired with its current enrollment count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseListing {
    /// The course.
    pub course: Course,
    /// Number of enrollment rows referencing the course.
    pub enrollment_count: u64,
}

impl CourseListing {
    /// `capacity - enrollment_count`; may be negative.
    #[must_use]
    pub fn available_seats(&self) -> i64 {
        self.course.available_seats(self.enrollment_count)
    }

    /// `available_seats() <= 0`.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.course.is_full(self.enrollment_count)
    }
}
