//! Domain primitives, services and ports.
//!
//! Purpose: define the course, enrollment and account records, the
//! services that operate on them, and the ports the outbound adapters
//! implement. Types validate on construction; services map port failures
//! into [`Error`] so inbound adapters only deal with one error type.
//!
//! Public surface:
//! - Error / ErrorCode: API error payload and stable identifier.
//! - Course, CourseDraft, Capacity, CourseListing: catalogue records.
//! - Enrollment, EnrollOutcome: student/course links.
//! - Account, UserId, Username, PasswordHash: identity records.
//! - EnrollmentService, CatalogueService, AccountService: use-cases.

pub mod account;
pub mod account_service;
pub mod auth;
pub mod catalogue_service;
pub mod course;
pub mod enrollment;
pub mod enrollment_service;
pub mod error;
pub mod password;
pub mod ports;
pub mod trace_id;

pub use self::account::{Account, AccountValidationError, NewAccount, USERNAME_MAX, UserId, Username};
pub use self::account_service::{AccountService, BAD_CREDENTIALS_MESSAGE, USER_EXISTS_MESSAGE};
pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::catalogue_service::{CatalogueService, CourseSeed};
pub use self::course::{
    COURSE_TEXT_MAX, Capacity, Course, CourseDraft, CourseId, CourseListing,
    CourseValidationError, DEFAULT_CAPACITY,
};
pub use self::enrollment::{EnrollOutcome, Enrollment};
pub use self::enrollment_service::EnrollmentService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::password::{PasswordHash, PasswordHashError, PasswordPolicy};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use enrollment_backend::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::not_found("course 7 not found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
