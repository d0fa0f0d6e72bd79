/// Signup and login
///
/// Password hashing and verification are CPU-heavy, so both run on the
/// blocking thread pool rather than on the async workers.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::task::JoinError;
use tracing::{info, warn};

use crate::auth::{
    jwt::{TokenError, TokenService},
    password::{PasswordError, PasswordHasher},
};
use crate::models::user::NewUser;
use crate::repository::{StoreError, UserRepository};

/// Error type for signup/login
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// Username or password missing
    #[error("{0}")]
    Validation(String),

    /// Signup for an existing username
    #[error("Username already exists")]
    UsernameTaken,

    /// Unknown user or wrong password; deliberately not distinguished
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error(transparent)]
    Password(#[from] PasswordError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Blocking hash task panicked or was cancelled
    #[error("Hashing task failed: {0}")]
    Join(#[from] JoinError),
}

/// Token handed back on successful signup/login
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: String,

    /// Always `"bearer"`
    pub token_type: String,
}

impl AccessToken {
    fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

/// Account creation and credential checks
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<PasswordHasher>,
    tokens: Arc<TokenService>,
    // Verified against when the username is unknown so both failure paths cost the same
    dummy_hash: Arc<str>,
}

impl AuthService {
    /// Creates the service
    ///
    /// Computes one throwaway hash with the configured costs.
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<PasswordHasher>,
        tokens: Arc<TokenService>,
    ) -> Result<Self, PasswordError> {
        let dummy_hash = hasher.hash("tasktrack-dummy-password")?;

        Ok(Self {
            users,
            hasher,
            tokens,
            dummy_hash: dummy_hash.into(),
        })
    }

    /// Registers a new user and returns a token for them
    ///
    /// # Errors
    ///
    /// - `Validation` if username or password is empty
    /// - `UsernameTaken` if the username exists, including when a concurrent
    ///   signup wins the insert
    pub async fn signup(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AccessToken, AuthServiceError> {
        require_credentials(username, password)?;

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AuthServiceError::UsernameTaken);
        }

        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;

        let user = self
            .users
            .create_user(NewUser {
                username: username.to_owned(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => AuthServiceError::UsernameTaken,
                other => AuthServiceError::Store(other),
            })?;

        info!(user_id = user.id, "User signed up");

        Ok(AccessToken::bearer(self.tokens.issue(&user.username)?))
    }

    /// Checks credentials and returns a fresh token
    ///
    /// # Errors
    ///
    /// - `Validation` if username or password is empty
    /// - `InvalidCredentials` for an unknown user or a wrong password
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AccessToken, AuthServiceError> {
        require_credentials(username, password)?;

        let user = self.users.find_by_username(username).await?;

        let stored_hash = match &user {
            Some(user) => user.password_hash.clone(),
            None => self.dummy_hash.to_string(),
        };
        let hasher = Arc::clone(&self.hasher);
        let password = password.to_owned();
        let verified =
            tokio::task::spawn_blocking(move || hasher.verify(&password, &stored_hash)).await?;

        match user {
            Some(user) if verified => {
                info!(user_id = user.id, "User logged in");
                Ok(AccessToken::bearer(self.tokens.issue(&user.username)?))
            }
            _ => {
                warn!("Login rejected");
                Err(AuthServiceError::InvalidCredentials)
            }
        }
    }
}

fn require_credentials(username: &str, password: &str) -> Result<(), AuthServiceError> {
    if username.is_empty() {
        return Err(AuthServiceError::Validation("Username is required".to_string()));
    }
    if password.is_empty() {
        return Err(AuthServiceError::Validation("Password is required".to_string()));
    }
    Ok(())
}
