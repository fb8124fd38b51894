//! Password hashing for stored credentials.
//!
//! Hashes are Argon2id PHC strings. Verification reads the cost parameters
//! from the stored string, so hashes created under an older policy keep
//! verifying after the policy changes.

use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// Errors raised while hashing or parsing password hashes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The configured cost parameters are rejected by Argon2.
    #[error("invalid password hashing parameters: {message}")]
    Parameters {
        /// Underlying Argon2 message.
        message: String,
    },
    /// Hashing failed.
    #[error("password hashing failed: {message}")]
    Hashing {
        /// Underlying Argon2 message.
        message: String,
    },
    /// A stored hash is not a valid PHC string.
    #[error("stored password hash is malformed: {message}")]
    Malformed {
        /// Underlying parser message.
        message: String,
    },
}

/// Argon2id cost parameters applied to new hashes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PasswordPolicy {
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl PasswordPolicy {
    /// Minimal-cost policy for tests and local fixtures.
    #[must_use]
    pub fn low_cost() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST,
            iterations: 1,
            parallelism: 1,
        }
    }

    fn hasher(self) -> Result<Argon2<'static>, PasswordHashError> {
        let params = Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|err| PasswordHashError::Parameters {
                message: err.to_string(),
            })?;
        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }

    /// Hash a plaintext password with a fresh random salt.
    pub fn hash(self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = self
            .hasher()?
            .hash_password(password.as_bytes(), &salt)
            .map_err(|err| PasswordHashError::Hashing {
                message: err.to_string(),
            })?;
        Ok(PasswordHash(phc.to_string()))
    }
}

/// Argon2id PHC string stored for an account.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a PHC string loaded from storage after checking it parses.
    pub fn from_phc(raw: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = raw.into();
        password_hash::PasswordHash::new(&phc).map_err(|err| PasswordHashError::Malformed {
            message: err.to_string(),
        })?;
        Ok(Self(phc))
    }

    /// Check a plaintext password against this hash.
    #[must_use]
    pub fn verify(&self, password: &str) -> bool {
        match password_hash::PasswordHash::new(&self.0) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(error) => {
                tracing::warn!(%error, "stored password hash failed to parse");
                false
            }
        }
    }

    /// Borrow the PHC string for persistence.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn hash_verifies_matching_password_only() {
        let hash = PasswordPolicy::low_cost()
            .hash("testpass123")
            .expect("hashing succeeds");
        assert!(hash.as_str().starts_with("$argon2id$"));
        assert!(hash.verify("testpass123"));
        assert!(!hash.verify("wrong"));
    }

    #[rstest]
    fn hashes_are_salted() {
        let policy = PasswordPolicy::low_cost();
        let first = policy.hash("same").expect("hash");
        let second = policy.hash("same").expect("hash");
        assert_ne!(first, second);
    }

    #[rstest]
    fn from_phc_round_trips_stored_hash() {
        let hash = PasswordPolicy::low_cost().hash("pw").expect("hash");
        let restored = PasswordHash::from_phc(hash.as_str()).expect("valid PHC");
        assert!(restored.verify("pw"));
    }

    #[rstest]
    fn from_phc_rejects_garbage() {
        let err = PasswordHash::from_phc("plaintext").expect_err("must reject");
        assert!(matches!(err, PasswordHashError::Malformed { .. }));
    }

    #[rstest]
    fn debug_output_is_redacted() {
        let hash = PasswordPolicy::low_cost().hash("pw").expect("hash");
        assert_eq!(format!("{hash:?}"), "PasswordHash(<redacted>)");
    }
}
