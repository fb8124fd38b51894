//! Integration tests for the Diesel adapters against PostgreSQL.
//!
//! Point `ENROLLMENT_TEST_DATABASE_URL` at a disposable database to run them.
//! They skip when the variable is unset or `SKIP_TEST_CLUSTER` is truthy.
//! Every test works on freshly created rows so suites may share a database.

use enrollment_backend::domain::ports::{
    AccountRepository, AccountRepositoryError, CourseRepository, EnrollmentRepository,
    EnrollmentRepositoryError,
};
use enrollment_backend::domain::{
    Account, Capacity, Course, CourseDraft, CourseId, NewAccount, PasswordPolicy, UserId,
    Username,
};
use enrollment_backend::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselCourseRepository, DieselEnrollmentRepository,
    PoolConfig, run_pending_migrations,
};
use uuid::Uuid;

const DATABASE_URL_ENV: &str = "ENROLLMENT_TEST_DATABASE_URL";
const SKIP_ENV: &str = "SKIP_TEST_CLUSTER";

struct Repositories {
    accounts: DieselAccountRepository,
    courses: DieselCourseRepository,
    enrollments: DieselEnrollmentRepository,
}

fn skip_requested() -> bool {
    std::env::var(SKIP_ENV)
        .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

async fn repositories() -> Option<Repositories> {
    if skip_requested() {
        eprintln!("SKIP-TEST-CLUSTER: {SKIP_ENV} is set");
        return None;
    }
    let Ok(url) = std::env::var(DATABASE_URL_ENV) else {
        eprintln!("SKIP-TEST-CLUSTER: {DATABASE_URL_ENV} is unset");
        return None;
    };

    run_pending_migrations(&url).await.expect("migrations apply");
    let pool = DbPool::new(PoolConfig::new(url).with_max_size(2).with_min_idle(Some(1)))
        .await
        .expect("pool builds");
    Some(Repositories {
        accounts: DieselAccountRepository::new(pool.clone()),
        courses: DieselCourseRepository::new(pool.clone()),
        enrollments: DieselEnrollmentRepository::new(pool),
    })
}

fn unique_username() -> String {
    format!("student-{}", Uuid::new_v4().simple())
}

fn new_account(username: &str) -> NewAccount {
    NewAccount {
        id: UserId::random(),
        username: Username::new(username).expect("valid username"),
        password_hash: PasswordPolicy::low_cost().hash("pw123").expect("hash"),
    }
}

async fn account(repos: &Repositories) -> Account {
    repos
        .accounts
        .insert(&new_account(&unique_username()))
        .await
        .expect("account inserted")
}

async fn course(repos: &Repositories, capacity: u32) -> Course {
    let draft = CourseDraft::new("Operating Systems", "Prof. Zhao")
        .expect("valid draft")
        .with_description("Processes and memory")
        .with_capacity(Capacity::new(capacity).expect("valid capacity"));
    repos.courses.create(&draft).await.expect("course created")
}

async fn enrollment_count(repos: &Repositories, course: CourseId) -> u64 {
    repos
        .enrollments
        .count_for_course(course)
        .await
        .expect("count")
}

#[tokio::test]
async fn accounts_round_trip_and_reject_taken_usernames() {
    let Some(repos) = repositories().await else {
        return;
    };
    let username = unique_username();
    let stored = repos
        .accounts
        .insert(&new_account(&username))
        .await
        .expect("account inserted");

    let by_name = repos
        .accounts
        .find_by_username(&stored.username)
        .await
        .expect("lookup");
    assert_eq!(by_name.as_ref().map(|account| &account.id), Some(&stored.id));
    assert!(stored.password_hash.verify("pw123"));

    let err = repos
        .accounts
        .insert(&new_account(&username))
        .await
        .expect_err("duplicate username");
    assert!(matches!(err, AccountRepositoryError::UsernameTaken { .. }));
}

#[tokio::test]
async fn courses_keep_their_fields_and_capacity_updates() {
    let Some(repos) = repositories().await else {
        return;
    };
    let created = course(&repos, 12).await;

    let found = repos
        .courses
        .find_by_id(created.id)
        .await
        .expect("lookup")
        .expect("course exists");
    assert_eq!(found, created);
    assert_eq!(found.description, "Processes and memory");

    let updated = repos
        .courses
        .set_capacity(created.id, Capacity::new(0).expect("capacity"))
        .await
        .expect("update")
        .expect("course exists");
    assert_eq!(updated.capacity.get(), 0);
}

#[tokio::test]
async fn enrollments_are_unique_per_student_and_course() {
    let Some(repos) = repositories().await else {
        return;
    };
    let student = account(&repos).await;
    let course = course(&repos, 1).await;

    assert!(
        repos
            .enrollments
            .insert_if_absent(&student.id, course.id)
            .await
            .expect("first enroll")
    );
    assert!(
        !repos
            .enrollments
            .insert_if_absent(&student.id, course.id)
            .await
            .expect("second enroll")
    );
    let err = repos
        .enrollments
        .insert(&student.id, course.id)
        .await
        .expect_err("raw duplicate insert");
    assert!(matches!(err, EnrollmentRepositoryError::Duplicate { .. }));
    assert_eq!(enrollment_count(&repos, course.id).await, 1);
}

#[tokio::test]
async fn enrollments_for_unknown_courses_are_missing_references() {
    let Some(repos) = repositories().await else {
        return;
    };
    let student = account(&repos).await;

    let err = repos
        .enrollments
        .insert(&student.id, CourseId::new(i64::MAX))
        .await
        .expect_err("unknown course");
    assert!(matches!(err, EnrollmentRepositoryError::MissingReference { .. }));
}

#[tokio::test]
async fn capacity_is_not_enforced_and_counts_go_negative() {
    let Some(repos) = repositories().await else {
        return;
    };
    let first = account(&repos).await;
    let second = account(&repos).await;
    let course = course(&repos, 1).await;

    for student in [&first, &second] {
        repos
            .enrollments
            .insert_if_absent(&student.id, course.id)
            .await
            .expect("enroll");
    }

    let listing = repos
        .courses
        .list_with_counts()
        .await
        .expect("listing")
        .into_iter()
        .find(|listing| listing.course.id == course.id)
        .expect("course listed");
    assert_eq!(listing.enrollment_count, 2);
    assert_eq!(listing.available_seats(), -1);
    assert!(listing.is_full());
}

#[tokio::test]
async fn dropping_and_listing_follow_the_student() {
    let Some(repos) = repositories().await else {
        return;
    };
    let student = account(&repos).await;
    let first = course(&repos, 30).await;
    let second = course(&repos, 30).await;
    for course in [&first, &second] {
        repos
            .enrollments
            .insert_if_absent(&student.id, course.id)
            .await
            .expect("enroll");
    }

    assert_eq!(
        repos
            .enrollments
            .course_ids_for_student(&student.id)
            .await
            .expect("ids"),
        vec![first.id, second.id]
    );
    assert!(repos.enrollments.delete(&student.id, first.id).await.expect("drop"));
    assert!(!repos.enrollments.delete(&student.id, first.id).await.expect("drop again"));

    let remaining: Vec<CourseId> = repos
        .enrollments
        .list_for_student(&student.id)
        .await
        .expect("list")
        .into_iter()
        .map(|enrollment| enrollment.course.id)
        .collect();
    assert_eq!(remaining, vec![second.id]);
}

#[tokio::test]
async fn deleting_a_course_cascades_to_enrollments() {
    let Some(repos) = repositories().await else {
        return;
    };
    let student = account(&repos).await;
    let course = course(&repos, 30).await;
    repos
        .enrollments
        .insert_if_absent(&student.id, course.id)
        .await
        .expect("enroll");

    assert!(repos.courses.delete(course.id).await.expect("delete"));
    assert!(!repos.courses.delete(course.id).await.expect("delete again"));
    assert_eq!(enrollment_count(&repos, course.id).await, 0);
    assert!(
        repos
            .enrollments
            .course_ids_for_student(&student.id)
            .await
            .expect("ids")
            .is_empty()
    );
}
