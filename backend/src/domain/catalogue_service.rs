//! Course catalogue administration and startup seeding.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::json;
use tracing::info;

use super::enrollment_service::map_course_error;
use super::ports::CourseRepository;
use super::{Capacity, Course, CourseDraft, CourseId, CourseValidationError, Error};

/// One course entry in a catalogue seed file.
///
/// ```json
/// [{"name": "Rust", "teacher": "Prof. Li", "capacity": 40}]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CourseSeed {
    /// Course name.
    pub name: String,
    /// Teacher name.
    pub teacher: String,
    /// Optional description; empty when omitted.
    #[serde(default)]
    pub description: Option<String>,
    /// Optional capacity; the default applies when omitted.
    #[serde(default)]
    pub capacity: Option<Capacity>,
}

impl CourseSeed {
    /// Validate the entry into a draft.
    pub fn to_draft(&self) -> Result<CourseDraft, CourseValidationError> {
        let mut draft = CourseDraft::new(&self.name, &self.teacher)?;
        if let Some(description) = &self.description {
            draft = draft.with_description(description.clone());
        }
        if let Some(capacity) = self.capacity {
            draft = draft.with_capacity(capacity);
        }
        Ok(draft)
    }
}

fn invalid_course(error: &CourseValidationError) -> Error {
    let field = match error {
        CourseValidationError::EmptyName | CourseValidationError::NameTooLong { .. } => "name",
        CourseValidationError::EmptyTeacher | CourseValidationError::TeacherTooLong { .. } => {
            "teacher"
        }
        CourseValidationError::CapacityOutOfRange { .. } => "capacity",
    };
    Error::invalid_request(error.to_string()).with_details(json!({ "field": field }))
}

/// Catalogue operations that sit outside the request surface.
#[derive(Clone)]
pub struct CatalogueService {
    courses: Arc<dyn CourseRepository>,
}

impl CatalogueService {
    /// Create a service over the course repository.
    #[must_use]
    pub const fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }

    /// Persist a validated draft.
    pub async fn create_course(&self, draft: &CourseDraft) -> Result<Course, Error> {
        let course = self.courses.create(draft).await.map_err(map_course_error)?;
        info!(course_id = %course.id, course = %course, "course created");
        Ok(course)
    }

    /// Change a course's capacity.
    ///
    /// Lowering it below the current enrollment count is allowed and drives
    /// available seats negative.
    pub async fn set_capacity(
        &self,
        course_id: CourseId,
        capacity: Capacity,
    ) -> Result<Course, Error> {
        self.courses
            .set_capacity(course_id, capacity)
            .await
            .map_err(map_course_error)?
            .ok_or_else(|| Error::not_found(format!("course {course_id} not found")))
    }

    /// Delete a course and, by cascade, its enrollments. Missing ids are ignored.
    pub async fn delete_course(&self, course_id: CourseId) -> Result<(), Error> {
        let removed = self
            .courses
            .delete(course_id)
            .await
            .map_err(map_course_error)?;
        if removed {
            info!(%course_id, "course deleted");
        }
        Ok(())
    }

    /// Look up a single course.
    pub async fn find_course(&self, course_id: CourseId) -> Result<Option<Course>, Error> {
        self.courses
            .find_by_id(course_id)
            .await
            .map_err(map_course_error)
    }

    /// Create every seed entry when the catalogue is empty.
    ///
    /// Returns the number of courses created; zero when courses already
    /// exist. All entries are validated before any is written.
    pub async fn seed_if_empty(&self, seeds: &[CourseSeed]) -> Result<usize, Error> {
        let drafts = seeds
            .iter()
            .map(CourseSeed::to_draft)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| invalid_course(&err))?;

        let existing = self.courses.count().await.map_err(map_course_error)?;
        if existing > 0 {
            info!(existing, "catalogue already populated; skipping seed");
            return Ok(0);
        }

        for draft in &drafts {
            self.courses.create(draft).await.map_err(map_course_error)?;
        }
        info!(created = drafts.len(), "catalogue seeded");
        Ok(drafts.len())
    }
}
