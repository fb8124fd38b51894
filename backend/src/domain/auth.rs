//! Submitted credentials shared by the register and login forms.

use std::fmt;

use zeroize::Zeroizing;

/// Why a submitted credentials form was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoginValidationError {
    /// Username absent or whitespace only.
    #[error("username must not be empty")]
    EmptyUsername,
    /// Password absent.
    #[error("password must not be empty")]
    EmptyPassword,
}

impl LoginValidationError {
    /// Form field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername => "username",
            Self::EmptyPassword => "password",
        }
    }
}

/// A username/password pair as typed by the user.
///
/// Both fields are kept verbatim, surrounding spaces included; a
/// whitespace-only username counts as blank. The password is wiped from
/// memory on drop and `Debug` output never shows it.
///
/// # Examples
/// ```
/// use enrollment_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" alice ", "s3cret").expect("valid");
/// assert_eq!(creds.username(), " alice ");
/// assert!(!format!("{creds:?}").contains("s3cret"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Validate raw form values.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        match (username.trim().is_empty(), password.is_empty()) {
            (true, _) => Err(LoginValidationError::EmptyUsername),
            (false, true) => Err(LoginValidationError::EmptyPassword),
            (false, false) => Ok(Self {
                username: username.to_owned(),
                password: Zeroizing::new(password.to_owned()),
            }),
        }
    }

    /// Username exactly as submitted.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Password exactly as submitted.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}
