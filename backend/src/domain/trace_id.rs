//! Per-request correlation id.
//!
//! The id lives in a Tokio task-local set by the trace middleware, so errors
//! raised anywhere in a handler's task can stamp it without it being passed
//! around. Work moved to another task must re-enter [`TraceId::scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use uuid::Uuid;

tokio::task_local! {
    static CURRENT: TraceId;
}

/// UUID identifying one request in logs, headers and error bodies.
///
/// # Examples
/// ```
/// use enrollment_backend::TraceId;
///
/// let id: TraceId = "6f1c2a8e-9a4b-4b7e-8f25-0d7b2f3c9e11".parse().expect("uuid");
/// assert_eq!(id.to_string(), "6f1c2a8e-9a4b-4b7e-8f25-0d7b2f3c9e11");
/// assert!(TraceId::current().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// The id of the request being handled on this task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `self` as the current id.
    pub async fn scope<Fut: Future>(self, fut: Fut) -> Fut::Output {
        CURRENT.scope(self, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
