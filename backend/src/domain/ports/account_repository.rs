//! Driven port for registered accounts.

use async_trait::async_trait;

use crate::domain::{Account, NewAccount, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Errors raised by account adapters.
    pub enum AccountRepositoryError for "account repository" {
        /// Another account already uses the username.
        UsernameTaken {
            /// The rejected username.
            username: String,
        } =>
            "username {username} is already registered",
    }
}

/// Port for account persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert a new account; a taken username fails with `UsernameTaken`.
    async fn insert(&self, account: &NewAccount) -> Result<Account, AccountRepositoryError>;

    /// Look up an account by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<Account>, AccountRepositoryError>;

    /// Look up an account by id.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<Account>, AccountRepositoryError>;
}
