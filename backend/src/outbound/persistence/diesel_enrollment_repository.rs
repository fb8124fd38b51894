//! PostgreSQL-backed `EnrollmentRepository`.
//!
//! The `(student_id, course_id)` unique index backs both insert paths:
//! `insert_if_absent` uses `ON CONFLICT DO NOTHING`, `insert` reports the
//! violation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CourseRepositoryError, EnrollmentRepository, EnrollmentRepositoryError};
use crate::domain::{CourseId, Enrollment, UserId};

use super::diesel_basic_error_mapping::{
    ConstraintViolation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::diesel_course_repository::row_to_course;
use super::models::{CourseRow, EnrollmentRow, NewEnrollmentRow};
use super::pool::{DbPool, PoolError};
use super::schema::{courses, enrollments};

/// Diesel adapter for enrollment rows.
#[derive(Clone)]
pub struct DieselEnrollmentRepository {
    pool: DbPool,
}

impl DieselEnrollmentRepository {
    /// Create a repository over `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> EnrollmentRepositoryError {
    map_basic_pool_error(error, EnrollmentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> EnrollmentRepositoryError {
    map_basic_diesel_error(
        error,
        EnrollmentRepositoryError::query,
        EnrollmentRepositoryError::connection,
    )
}

fn map_insert_error(
    error: diesel::result::Error,
    student: &UserId,
    course: CourseId,
) -> EnrollmentRepositoryError {
    match constraint_violation(&error) {
        Some(ConstraintViolation::Unique) => {
            EnrollmentRepositoryError::duplicate(student.to_string(), course.get())
        }
        Some(ConstraintViolation::ForeignKey) => {
            EnrollmentRepositoryError::missing_reference(course.get())
        }
        None => map_diesel_error(error),
    }
}

fn map_course_row_error(error: CourseRepositoryError) -> EnrollmentRepositoryError {
    match error {
        CourseRepositoryError::Connection { message } => {
            EnrollmentRepositoryError::connection(message)
        }
        CourseRepositoryError::Query { message } => EnrollmentRepositoryError::query(message),
    }
}

fn to_enrollment(row: EnrollmentRow, course: CourseRow) -> Result<Enrollment, EnrollmentRepositoryError> {
    Ok(Enrollment {
        student: UserId::from_uuid(row.student_id),
        course: row_to_course(course).map_err(map_course_row_error)?,
        enrolled_at: row.enrolled_at,
    })
}

#[async_trait]
impl EnrollmentRepository for DieselEnrollmentRepository {
    async fn insert(
        &self,
        student: &UserId,
        course: CourseId,
    ) -> Result<Enrollment, EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewEnrollmentRow {
            student_id: *student.as_uuid(),
            course_id: course.get(),
        };

        let row = diesel::insert_into(enrollments::table)
            .values(&new_row)
            .returning(EnrollmentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(|err| map_insert_error(err, student, course))?;

        let course_row = courses::table
            .find(row.course_id)
            .select(CourseRow::as_select())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        to_enrollment(row, course_row)
    }

    async fn insert_if_absent(
        &self,
        student: &UserId,
        course: CourseId,
    ) -> Result<bool, EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewEnrollmentRow {
            student_id: *student.as_uuid(),
            course_id: course.get(),
        };

        let inserted = diesel::insert_into(enrollments::table)
            .values(&new_row)
            .on_conflict((enrollments::student_id, enrollments::course_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(|err| map_insert_error(err, student, course))?;
        Ok(inserted > 0)
    }

    async fn delete(
        &self,
        student: &UserId,
        course: CourseId,
    ) -> Result<bool, EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed = diesel::delete(
            enrollments::table
                .filter(enrollments::student_id.eq(student.as_uuid()))
                .filter(enrollments::course_id.eq(course.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }

    async fn list_for_student(
        &self,
        student: &UserId,
    ) -> Result<Vec<Enrollment>, EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<(EnrollmentRow, CourseRow)> = enrollments::table
            .inner_join(courses::table)
            .filter(enrollments::student_id.eq(student.as_uuid()))
            .order((enrollments::enrolled_at.asc(), enrollments::id.asc()))
            .select((EnrollmentRow::as_select(), CourseRow::as_select()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        rows.into_iter()
            .map(|(row, course)| to_enrollment(row, course))
            .collect()
    }

    async fn course_ids_for_student(
        &self,
        student: &UserId,
    ) -> Result<Vec<CourseId>, EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let ids: Vec<i64> = enrollments::table
            .filter(enrollments::student_id.eq(student.as_uuid()))
            .order(enrollments::course_id.asc())
            .select(enrollments::course_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(ids.into_iter().map(CourseId::new).collect())
    }

    async fn count_for_course(&self, course: CourseId) -> Result<u64, EnrollmentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let total: i64 = enrollments::table
            .filter(enrollments::course_id.eq(course.get()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        u64::try_from(total).map_err(|_| EnrollmentRepositoryError::query("negative row count"))
    }
}
