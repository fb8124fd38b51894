//! Registration, authentication and account lookup.

use std::sync::Arc;

use serde_json::json;
use tokio::task;
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::ports::{AccountRepository, AccountRepositoryError};
use super::{
    Account, AccountValidationError, Error, LoginCredentials, NewAccount, PasswordHash,
    PasswordPolicy, UserId, Username,
};

/// Message surfaced when a username is already registered.
pub const USER_EXISTS_MESSAGE: &str = "user already exists";
/// Message surfaced for unknown users and wrong passwords alike.
pub const BAD_CREDENTIALS_MESSAGE: &str = "wrong username or password";

fn map_account_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => Error::service_unavailable(message),
        AccountRepositoryError::Query { message } => Error::internal(message),
        AccountRepositoryError::UsernameTaken { .. } => Error::conflict(USER_EXISTS_MESSAGE),
    }
}

fn invalid_username(error: &AccountValidationError) -> Error {
    let code = match error {
        AccountValidationError::EmptyUsername => "empty_username",
        AccountValidationError::UsernameTooLong { .. } => "username_too_long",
        AccountValidationError::EmptyId | AccountValidationError::InvalidId => "invalid_id",
    };
    Error::invalid_request(error.to_string())
        .with_details(json!({ "field": "username", "code": code }))
}

/// Account use-cases over an [`AccountRepository`].
#[derive(Clone)]
pub struct AccountService {
    accounts: Arc<dyn AccountRepository>,
    policy: PasswordPolicy,
}

impl AccountService {
    /// Create a service hashing new passwords under `policy`.
    #[must_use]
    pub const fn new(accounts: Arc<dyn AccountRepository>, policy: PasswordPolicy) -> Self {
        Self { accounts, policy }
    }

    /// Register a new account.
    ///
    /// A taken username fails with `conflict("user already exists")`, both
    /// on the lookup and when a concurrent insert wins the race.
    pub async fn register(&self, credentials: &LoginCredentials) -> Result<Account, Error> {
        let username =
            Username::new(credentials.username()).map_err(|err| invalid_username(&err))?;

        if self
            .accounts
            .find_by_username(&username)
            .await
            .map_err(map_account_error)?
            .is_some()
        {
            debug!(%username, "registration rejected: username taken");
            return Err(Error::conflict(USER_EXISTS_MESSAGE));
        }

        let password_hash = self.hash_password(credentials).await?;
        let account = self
            .accounts
            .insert(&NewAccount {
                id: UserId::random(),
                username,
                password_hash,
            })
            .await
            .map_err(map_account_error)?;
        info!(user_id = %account.id, username = %account.username, "account registered");
        Ok(account)
    }

    /// Resolve credentials to a user id.
    ///
    /// Unknown usernames and wrong passwords produce the same
    /// `unauthorized` error.
    pub async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let Ok(username) = Username::new(credentials.username()) else {
            return Err(Error::unauthorized(BAD_CREDENTIALS_MESSAGE));
        };
        let Some(account) = self
            .accounts
            .find_by_username(&username)
            .await
            .map_err(map_account_error)?
        else {
            return Err(Error::unauthorized(BAD_CREDENTIALS_MESSAGE));
        };

        if verify_password(account.password_hash, credentials).await? {
            Ok(account.id)
        } else {
            debug!(%username, "login rejected: password mismatch");
            Err(Error::unauthorized(BAD_CREDENTIALS_MESSAGE))
        }
    }

    /// Look up an account by id.
    pub async fn find_account(&self, id: &UserId) -> Result<Option<Account>, Error> {
        self.accounts
            .find_by_id(id)
            .await
            .map_err(map_account_error)
    }

    async fn hash_password(&self, credentials: &LoginCredentials) -> Result<PasswordHash, Error> {
        let policy = self.policy;
        let password = Zeroizing::new(credentials.password().to_owned());
        task::spawn_blocking(move || policy.hash(&password))
            .await
            .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))?
            .map_err(|err| Error::internal(err.to_string()))
    }
}

async fn verify_password(hash: PasswordHash, credentials: &LoginCredentials) -> Result<bool, Error> {
    let password = Zeroizing::new(credentials.password().to_owned());
    task::spawn_blocking(move || hash.verify(&password))
        .await
        .map_err(|err| Error::internal(format!("password verification task failed: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockAccountRepository;
    use crate::domain::{ErrorCode, USERNAME_MAX};
    use chrono::Utc;
    use rstest::rstest;

    fn credentials(username: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(username, password).expect("credentials")
    }

    fn account(username: &str, password: &str) -> Account {
        Account {
            id: UserId::random(),
            username: Username::new(username).expect("username"),
            password_hash: PasswordPolicy::low_cost().hash(password).expect("hash"),
            created_at: Utc::now(),
        }
    }

    fn service(repo: MockAccountRepository) -> AccountService {
        AccountService::new(Arc::new(repo), PasswordPolicy::low_cost())
    }

    #[tokio::test]
    async fn register_stores_hashed_password() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username().return_once(|_| Ok(None));
        repo.expect_insert()
            .withf(|new| {
                new.username.as_str() == "alice"
                    && new.password_hash.as_str().starts_with("$argon2id$")
                    && new.password_hash.verify("pw123")
            })
            .times(1)
            .returning(|new| {
                Ok(Account {
                    id: new.id.clone(),
                    username: new.username.clone(),
                    password_hash: new.password_hash.clone(),
                    created_at: Utc::now(),
                })
            });

        let account = service(repo)
            .register(&credentials("alice", "pw123"))
            .await
            .expect("registration succeeds");
        assert_eq!(account.username.as_str(), "alice");
    }

    #[tokio::test]
    async fn register_rejects_existing_username() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username()
            .return_once(|_| Ok(Some(account("alice", "pw123"))));
        repo.expect_insert().never();

        let err = service(repo)
            .register(&credentials("alice", "other"))
            .await
            .expect_err("duplicate username");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), USER_EXISTS_MESSAGE);
    }

    #[tokio::test]
    async fn register_maps_lost_insert_race_to_conflict() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username().return_once(|_| Ok(None));
        repo.expect_insert()
            .return_once(|_| Err(AccountRepositoryError::username_taken("alice")));

        let err = service(repo)
            .register(&credentials("alice", "pw123"))
            .await
            .expect_err("race lost");
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), USER_EXISTS_MESSAGE);
    }

    #[tokio::test]
    async fn register_rejects_overlong_usernames() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username().never();

        let err = service(repo)
            .register(&credentials(&"a".repeat(USERNAME_MAX + 1), "pw123"))
            .await
            .expect_err("username too long");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details(),
            Some(&json!({ "field": "username", "code": "username_too_long" }))
        );
    }

    #[rstest]
    #[case("bob smith")]
    #[case(" alice ")]
    #[case("o'neil!")]
    #[tokio::test]
    async fn register_stores_username_as_submitted(#[case] username: &str) {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username().return_once(|_| Ok(None));
        repo.expect_insert().return_once(|new| {
            Ok(Account {
                id: new.id.clone(),
                username: new.username.clone(),
                password_hash: new.password_hash.clone(),
                created_at: Utc::now(),
            })
        });

        let account = service(repo)
            .register(&credentials(username, "pw123"))
            .await
            .expect("registration succeeds");
        assert_eq!(account.username.as_str(), username);
    }

    #[tokio::test]
    async fn authenticate_accepts_matching_password() {
        let stored = account("alice", "pw123");
        let expected = stored.id.clone();
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username()
            .return_once(move |_| Ok(Some(stored)));

        let id = service(repo)
            .authenticate(&credentials("alice", "pw123"))
            .await
            .expect("login succeeds");
        assert_eq!(id, expected);
    }

    #[rstest]
    #[case(Some("pw123"), "wrong")]
    #[case(None, "pw123")]
    #[tokio::test]
    async fn authenticate_failures_share_one_message(
        #[case] stored_password: Option<&'static str>,
        #[case] attempt: &str,
    ) {
        let stored = stored_password.map(|password| account("alice", password));
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_username().return_once(move |_| Ok(stored));

        let err = service(repo)
            .authenticate(&credentials("alice", attempt))
            .await
            .expect_err("login fails");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), BAD_CREDENTIALS_MESSAGE);
    }

    #[tokio::test]
    async fn connection_failures_are_service_unavailable() {
        let mut repo = MockAccountRepository::new();
        repo.expect_find_by_id()
            .return_once(|_| Err(AccountRepositoryError::connection("refused")));

        let err = service(repo)
            .find_account(&UserId::random())
            .await
            .expect_err("connection failure");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
