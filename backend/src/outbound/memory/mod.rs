//! In-process relational store implementing every repository port.
//!
//! Used when no database URL is configured and by the HTTP tests. The three
//! tables sit behind one mutex so each port call is atomic, like a single
//! SQL statement. Constraints mirror the PostgreSQL schema: unique
//! usernames, unique `(student, course)` pairs, and foreign keys that
//! cascade from courses to enrollments.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::{Clock, DefaultClock};
use uuid::Uuid;

use crate::domain::ports::{
    AccountRepository, AccountRepositoryError, CourseRepository, CourseRepositoryError,
    EnrollmentRepository, EnrollmentRepositoryError,
};
use crate::domain::{
    Account, Capacity, Course, CourseDraft, CourseId, CourseListing, Enrollment, NewAccount,
    UserId, Username,
};

#[derive(Debug, Clone)]
struct EnrollmentRecord {
    seq: u64,
    student: UserId,
    course: CourseId,
    enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Tables {
    accounts: BTreeMap<Uuid, Account>,
    courses: BTreeMap<i64, Course>,
    enrollments: Vec<EnrollmentRecord>,
    next_course_id: i64,
    next_enrollment_seq: u64,
}

impl Tables {
    fn count_for(&self, course: CourseId) -> u64 {
        self.enrollments
            .iter()
            .filter(|record| record.course == course)
            .map(|_| 1_u64)
            .sum()
    }

    fn position(&self, student: &UserId, course: CourseId) -> Option<usize> {
        self.enrollments
            .iter()
            .position(|record| &record.student == student && record.course == course)
    }

    fn check_references(
        &self,
        student: &UserId,
        course: CourseId,
    ) -> Result<(), EnrollmentRepositoryError> {
        if self.courses.contains_key(&course.get()) && self.accounts.contains_key(student.as_uuid())
        {
            Ok(())
        } else {
            Err(EnrollmentRepositoryError::missing_reference(course.get()))
        }
    }

    fn push_enrollment(
        &mut self,
        student: &UserId,
        course: CourseId,
        now: DateTime<Utc>,
    ) -> usize {
        self.next_enrollment_seq += 1;
        self.enrollments.push(EnrollmentRecord {
            seq: self.next_enrollment_seq,
            student: student.clone(),
            course,
            enrolled_at: now,
        });
        self.enrollments.len() - 1
    }

    fn hydrate(&self, record: &EnrollmentRecord) -> Option<Enrollment> {
        self.courses.get(&record.course.get()).map(|course| Enrollment {
            student: record.student.clone(),
            course: course.clone(),
            enrolled_at: record.enrolled_at,
        })
    }
}

/// Shared in-memory store; clones share the same tables.
#[derive(Clone)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    /// Empty store stamping rows with the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }

    /// Empty store stamping rows with `clock`.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Arc::new(Mutex::new(Tables {
                next_course_id: 1,
                ..Tables::default()
            })),
            clock,
        }
    }

    fn lock<E>(
        &self,
        poisoned: impl FnOnce(&'static str) -> E,
    ) -> Result<MutexGuard<'_, Tables>, E> {
        self.tables
            .lock()
            .map_err(|_| poisoned("in-memory store lock poisoned"))
    }
}

#[async_trait]
impl AccountRepository for InMemoryStore {
    async fn insert(&self, account: &NewAccount) -> Result<Account, AccountRepositoryError> {
        let now = self.clock.utc();
        let mut tables = self.lock(AccountRepositoryError::query)?;
        if tables
            .accounts
            .values()
            .any(|existing| existing.username == account.username)
        {
            return Err(AccountRepositoryError::username_taken(
                account.username.as_str(),
            ));
        }
        let stored = Account {
            id: account.id.clone(),
            username: account.username.clone(),
            password_hash: account.password_hash.clone(),
            created_at: now,
        };
        tables.accounts.insert(*stored.id.as_uuid(), stored.clone());
        Ok(stored)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, AccountRepositoryError> {
        let tables = self.lock(AccountRepositoryError::query)?;
        Ok(tables
            .accounts
            .values()
            .find(|account| &account.username == username)
            .cloned())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<Account>, AccountRepositoryError> {
        let tables = self.lock(AccountRepositoryError::query)?;
        Ok(tables.accounts.get(id.as_uuid()).cloned())
    }
}

#[async_trait]
impl CourseRepository for InMemoryStore {
    async fn create(&self, draft: &CourseDraft) -> Result<Course, CourseRepositoryError> {
        let now = self.clock.utc();
        let mut tables = self.lock(CourseRepositoryError::query)?;
        let id = tables.next_course_id;
        tables.next_course_id += 1;
        let course = Course {
            id: CourseId::new(id),
            name: draft.name().to_owned(),
            teacher: draft.teacher().to_owned(),
            description: draft.description().to_owned(),
            capacity: draft.capacity(),
            created_at: now,
        };
        tables.courses.insert(id, course.clone());
        Ok(course)
    }

    async fn find_by_id(&self, id: CourseId) -> Result<Option<Course>, CourseRepositoryError> {
        let tables = self.lock(CourseRepositoryError::query)?;
        Ok(tables.courses.get(&id.get()).cloned())
    }

    async fn list_with_counts(&self) -> Result<Vec<CourseListing>, CourseRepositoryError> {
        let tables = self.lock(CourseRepositoryError::query)?;
        Ok(tables
            .courses
            .values()
            .map(|course| CourseListing {
                course: course.clone(),
                enrollment_count: tables.count_for(course.id),
            })
            .collect())
    }

    async fn set_capacity(
        &self,
        id: CourseId,
        capacity: Capacity,
    ) -> Result<Option<Course>, CourseRepositoryError> {
        let mut tables = self.lock(CourseRepositoryError::query)?;
        Ok(tables.courses.get_mut(&id.get()).map(|course| {
            course.capacity = capacity;
            course.clone()
        }))
    }

    async fn delete(&self, id: CourseId) -> Result<bool, CourseRepositoryError> {
        let mut tables = self.lock(CourseRepositoryError::query)?;
        if tables.courses.remove(&id.get()).is_none() {
            return Ok(false);
        }
        tables.enrollments.retain(|record| record.course != id);
        Ok(true)
    }

    async fn count(&self) -> Result<u64, CourseRepositoryError> {
        let tables = self.lock(CourseRepositoryError::query)?;
        u64::try_from(tables.courses.len())
            .map_err(|_| CourseRepositoryError::query("course count overflow"))
    }
}

#[async_trait]
impl EnrollmentRepository for InMemoryStore {
    async fn insert(
        &self,
        student: &UserId,
        course: CourseId,
    ) -> Result<Enrollment, EnrollmentRepositoryError> {
        let now = self.clock.utc();
        let mut tables = self.lock(EnrollmentRepositoryError::query)?;
        tables.check_references(student, course)?;
        if tables.position(student, course).is_some() {
            return Err(EnrollmentRepositoryError::duplicate(
                student.to_string(),
                course.get(),
            ));
        }
        let index = tables.push_enrollment(student, course, now);
        tables
            .enrollments
            .get(index)
            .and_then(|record| tables.hydrate(record))
            .ok_or_else(|| EnrollmentRepositoryError::query("inserted enrollment vanished"))
    }

    async fn insert_if_absent(
        &self,
        student: &UserId,
        course: CourseId,
    ) -> Result<bool, EnrollmentRepositoryError> {
        let now = self.clock.utc();
        let mut tables = self.lock(EnrollmentRepositoryError::query)?;
        tables.check_references(student, course)?;
        if tables.position(student, course).is_some() {
            return Ok(false);
        }
        tables.push_enrollment(student, course, now);
        Ok(true)
    }

    async fn delete(
        &self,
        student: &UserId,
        course: CourseId,
    ) -> Result<bool, EnrollmentRepositoryError> {
        let mut tables = self.lock(EnrollmentRepositoryError::query)?;
        Ok(match tables.position(student, course) {
            Some(index) => {
                tables.enrollments.remove(index);
                true
            }
            None => false,
        })
    }

    async fn list_for_student(
        &self,
        student: &UserId,
    ) -> Result<Vec<Enrollment>, EnrollmentRepositoryError> {
        let tables = self.lock(EnrollmentRepositoryError::query)?;
        let mut records: Vec<&EnrollmentRecord> = tables
            .enrollments
            .iter()
            .filter(|record| &record.student == student)
            .collect();
        records.sort_by_key(|record| (record.enrolled_at, record.seq));
        Ok(records
            .into_iter()
            .filter_map(|record| tables.hydrate(record))
            .collect())
    }

    async fn course_ids_for_student(
        &self,
        student: &UserId,
    ) -> Result<Vec<CourseId>, EnrollmentRepositoryError> {
        let tables = self.lock(EnrollmentRepositoryError::query)?;
        let mut ids: Vec<CourseId> = tables
            .enrollments
            .iter()
            .filter(|record| &record.student == student)
            .map(|record| record.course)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn count_for_course(&self, course: CourseId) -> Result<u64, EnrollmentRepositoryError> {
        let tables = self.lock(EnrollmentRepositoryError::query)?;
        Ok(tables.count_for(course))
    }
}
