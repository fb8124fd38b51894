//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them into
//! domain records.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{courses, enrollments, users};

/// Row read from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable account.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewAccountRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
}

/// Row read from `courses`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = courses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourseRow {
    pub id: i64,
    pub name: String,
    pub teacher: String,
    pub description: String,
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
}

/// Insertable course.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = courses)]
pub(crate) struct NewCourseRow<'a> {
    pub name: &'a str,
    pub teacher: &'a str,
    pub description: &'a str,
    pub capacity: i32,
}

/// Row read from `enrollments`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = enrollments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EnrollmentRow {
    #[expect(dead_code, reason = "surrogate key selected for row identity only")]
    pub id: i64,
    pub student_id: Uuid,
    pub course_id: i64,
    pub enrolled_at: DateTime<Utc>,
}

/// Insertable enrollment.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = enrollments)]
pub(crate) struct NewEnrollmentRow {
    pub student_id: Uuid,
    pub course_id: i64,
}
