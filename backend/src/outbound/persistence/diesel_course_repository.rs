//! PostgreSQL-backed `CourseRepository`.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CourseRepository, CourseRepositoryError};
use crate::domain::{Capacity, Course, CourseDraft, CourseId, CourseListing};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CourseRow, NewCourseRow};
use super::pool::{DbPool, PoolError};
use super::schema::{courses, enrollments};

/// Diesel adapter for the course catalogue.
#[derive(Clone)]
pub struct DieselCourseRepository {
    pool: DbPool,
}

impl DieselCourseRepository {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CourseRepositoryError {
    map_basic_pool_error(error, CourseRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CourseRepositoryError {
    map_basic_diesel_error(
        error,
        CourseRepositoryError::query,
        CourseRepositoryError::connection,
    )
}

pub(crate) fn capacity_for_db(capacity: Capacity) -> Result<i32, CourseRepositoryError> {
    i32::try_from(capacity.get())
        .map_err(|_| CourseRepositoryError::query("capacity exceeds column range"))
}

pub(crate) fn count_from_db(count: i64) -> Result<u64, CourseRepositoryError> {
    u64::try_from(count).map_err(|_| CourseRepositoryError::query("negative row count"))
}

/// Convert a row into a domain course.
pub(crate) fn row_to_course(row: CourseRow) -> Result<Course, CourseRepositoryError> {
    let capacity = Capacity::try_from_i64(i64::from(row.capacity))
        .map_err(|err| CourseRepositoryError::query(err.to_string()))?;
    Ok(Course {
        id: CourseId::new(row.id),
        name: row.name,
        teacher: row.teacher,
        description: row.description,
        capacity,
        created_at: row.created_at,
    })
}

#[async_trait]
impl CourseRepository for DieselCourseRepository {
    async fn create(&self, draft: &CourseDraft) -> Result<Course, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewCourseRow {
            name: draft.name(),
            teacher: draft.teacher(),
            description: draft.description(),
            capacity: capacity_for_db(draft.capacity())?,
        };

        let row = diesel::insert_into(courses::table)
            .values(&new_row)
            .returning(CourseRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_course(row)
    }

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        courses::table
            .find(id.get())
            .select(CourseRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_course)
            .transpose()
    }

    async fn list_with_counts(&self) -> Result<Vec<CourseListing>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<CourseRow> = courses::table
            .order(courses::id.asc())
            .select(CourseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let counts: HashMap<i64, i64> = enrollments::table
            .group_by(enrollments::course_id)
            .select((enrollments::course_id, diesel::dsl::count_star()))
            .load::<(i64, i64)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .collect();

        rows.into_iter()
            .map(|row| {
                let enrollment_count = count_from_db(counts.get(&row.id).copied().unwrap_or(0))?;
                Ok(CourseListing {
                    course: row_to_course(row)?,
                    enrollment_count,
                })
            })
            .collect()
    }

    async fn set_capacity(
        &self,
        id: CourseId,
        capacity: Capacity,
    ) -> Result<Option<Course>, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        diesel::update(courses::table.find(id.get()))
            .set(courses::capacity.eq(capacity_for_db(capacity)?))
            .returning(CourseRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_course)
            .transpose()
    }

    async fn delete(&self, id: CourseId) -> Result<bool, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // enrollments rows go with it via ON DELETE CASCADE
        let removed = diesel::delete(courses::table.find(id.get()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn count(&self) -> Result<u64, CourseRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = courses::table
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        count_from_db(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn row(capacity: i32) -> CourseRow {
        CourseRow {
            id: 3,
            name: "Operating Systems".into(),
            teacher: "Prof. Liu".into(),
            description: String::new(),
            capacity,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn rows_convert_to_courses() {
        let course = row_to_course(row(25)).expect("valid row");
        assert_eq!(course.id, CourseId::new(3));
        assert_eq!(course.capacity.get(), 25);
    }

    #[rstest]
    fn negative_capacity_rows_are_query_errors() {
        let err = row_to_course(row(-1)).expect_err("negative capacity");
        assert!(matches!(err, CourseRepositoryError::Query { .. }));
    }

    #[rstest]
    #[case(0, Ok(0))]
    #[case(7, Ok(7))]
    fn counts_convert(#[case] raw: i64, #[case] expected: Result<u64, ()>) {
        assert_eq!(count_from_db(raw).map_err(|_| ()), expected);
    }
}
