//! Course pages: home, catalogue, enroll, drop, and the student's courses.
//!
//! ```text
//! GET /                    {"username": "alice"}
//! GET /courses/            {"courses": [...], "enrolledCourseIds": [1, 3]}
//! GET /enroll/{course_id}/ -> 302 /my-courses/
//! GET /my-courses/         {"enrollments": [...]}
//! GET /drop/{course_id}/   -> 302 /my-courses/
//! ```
//!
//! Every handler requires a signed-in user. Non-integer ids do not match the
//! path and answer 404.

use actix_web::{HttpResponse, get, web};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Course, CourseId, CourseListing, Enrollment};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::redirect;
use crate::inbound::http::current_user::{CurrentUser, login_redirect_target};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Path of the student's course list.
pub const MY_COURSES_PATH: &str = "/my-courses/";

/// Home page payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomePage {
    /// Signed-in username.
    pub username: String,
}

/// One catalogue row with its seat accounting.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    /// The course record.
    #[serde(flatten)]
    pub course: Course,
    /// Number of enrolled students.
    pub enrollment_count: u64,
    /// `capacity - enrollment_count`; negative when oversubscribed.
    pub available_seats: i64,
    /// Whether no seats remain.
    pub is_full: bool,
}

impl From<CourseListing> for CourseSummary {
    fn from(listing: CourseListing) -> Self {
        let available_seats = listing.available_seats();
        Self {
            is_full: available_seats <= 0,
            available_seats,
            enrollment_count: listing.enrollment_count,
            course: listing.course,
        }
    }
}

/// Catalogue page payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseListPage {
    /// All courses in id order.
    pub courses: Vec<CourseSummary>,
    /// Courses the caller is enrolled in.
    pub enrolled_course_ids: Vec<CourseId>,
}

/// One of the caller's enrollments.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentSummary {
    /// Enrolled course.
    pub course: Course,
    /// When the caller enrolled.
    pub enrolled_at: DateTime<Utc>,
}

impl From<Enrollment> for EnrollmentSummary {
    fn from(enrollment: Enrollment) -> Self {
        Self {
            course: enrollment.course,
            enrolled_at: enrollment.enrolled_at,
        }
    }
}

/// The caller's course list payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyCoursesPage {
    /// Enrollments, oldest first.
    pub enrollments: Vec<EnrollmentSummary>,
}

/// Greet the signed-in user.
///
/// A session whose account no longer exists is cleared and sent to login.
#[get("/")]
pub async fn home(
    state: web::Data<HttpState>,
    session: SessionContext,
    user: CurrentUser,
) -> ApiResult<HttpResponse> {
    match state.accounts.find_account(user.id()).await? {
        Some(account) => Ok(HttpResponse::Ok().json(HomePage {
            username: account.username.into(),
        })),
        None => {
            tracing::warn!(user_id = %user.id(), "session references a missing account");
            session.purge();
            Ok(redirect(&login_redirect_target("/")))
        }
    }
}

/// List every course with seat accounting and the caller's enrollments.
#[get("/courses/")]
pub async fn course_list(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<CourseListPage>> {
    let listings = state.enrollments.list_courses_with_counts().await?;
    let enrolled_course_ids = state.enrollments.enrolled_course_ids(user.id()).await?;
    Ok(web::Json(CourseListPage {
        courses: listings.into_iter().map(CourseSummary::from).collect(),
        enrolled_course_ids,
    }))
}

/// Enroll the caller; repeat requests are no-ops. Capacity is not checked.
#[get("/enroll/{course_id:\\d+}/")]
pub async fn enroll(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let course_id = CourseId::new(path.into_inner());
    state.enrollments.enroll(user.id(), course_id).await?;
    Ok(redirect(MY_COURSES_PATH))
}

/// List the caller's enrollments.
#[get("/my-courses/")]
pub async fn my_courses(
    state: web::Data<HttpState>,
    user: CurrentUser,
) -> ApiResult<web::Json<MyCoursesPage>> {
    let enrollments = state.enrollments.list_enrollments_for(user.id()).await?;
    Ok(web::Json(MyCoursesPage {
        enrollments: enrollments.into_iter().map(EnrollmentSummary::from).collect(),
    }))
}

/// Drop the caller's enrollment if present.
#[get("/drop/{course_id:\\d+}/")]
pub async fn drop_course(
    state: web::Data<HttpState>,
    user: CurrentUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let course_id = CourseId::new(path.into_inner());
    state.enrollments.drop(user.id(), course_id).await?;
    Ok(redirect(MY_COURSES_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Capacity;
    use rstest::rstest;
    use serde_json::json;

    fn listing(seats: u32, enrolled: u64) -> CourseListing {
        CourseListing {
            course: Course {
                id: CourseId::new(2),
                name: "Graphics".into(),
                teacher: "Prof. Ma".into(),
                description: String::new(),
                capacity: Capacity::new(seats).expect("capacity"),
                created_at: DateTime::UNIX_EPOCH,
            },
            enrollment_count: enrolled,
        }
    }

    #[rstest]
    #[case(30, 1, 29, false)]
    #[case(1, 1, 0, true)]
    #[case(1, 2, -1, true)]
    fn summaries_carry_seat_accounting(
        #[case] seats: u32,
        #[case] enrolled: u64,
        #[case] available: i64,
        #[case] full: bool,
    ) {
        let summary = CourseSummary::from(listing(seats, enrolled));
        assert_eq!(summary.available_seats, available);
        assert_eq!(summary.is_full, full);
    }

    #[rstest]
    fn summaries_serialise_flat_camel_case() {
        let value = serde_json::to_value(CourseSummary::from(listing(1, 2))).expect("json");
        assert_eq!(value.get("id"), Some(&json!(2)));
        assert_eq!(value.get("capacity"), Some(&json!(1)));
        assert_eq!(value.get("enrollmentCount"), Some(&json!(2)));
        assert_eq!(value.get("availableSeats"), Some(&json!(-1)));
        assert_eq!(value.get("isFull"), Some(&json!(true)));
        assert!(value.get("createdAt").is_some());
    }
}
