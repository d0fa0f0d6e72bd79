/// Session resolution
///
/// Turns the bearer token presented with a request into the user it belongs
/// to. The token must verify and its subject must still exist in the store;
/// anything else is rejected with a specific [`SessionError`].
///
/// # Example
///
/// ```no_run
/// use tasktrack_shared::auth::{jwt::TokenService, session::{bearer_token, resolve_session}};
/// use tasktrack_shared::repository::SqliteStore;
///
/// # async fn example(tokens: TokenService, store: SqliteStore) -> Result<(), Box<dyn std::error::Error>> {
/// let token = bearer_token(Some("Bearer eyJ..."));
/// let auth = resolve_session(token, &tokens, &store).await?;
/// println!("Request made by {}", auth.username);
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::jwt::{TokenError, TokenService};
use crate::repository::{StoreError, UserRepository};

/// Authenticated identity attached to a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    /// Resolved user ID
    pub user_id: i64,

    /// Resolved username (the token subject)
    pub username: String,
}

/// Error type for session resolution
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No bearer token on the request
    #[error("Missing authentication token")]
    MissingToken,

    /// Token present but rejected
    #[error(transparent)]
    Token(#[from] TokenError),

    /// Token verified but its subject no longer exists
    #[error("User not found for given token")]
    UserNotFound,

    /// Store lookup failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Extracts the token from an `Authorization` header value
///
/// Returns `None` unless the value is `Bearer <token>` with a non-empty token.
/// The scheme is matched case-insensitively.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let (scheme, token) = header?.trim().split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Resolves a bearer token to an existing user
///
/// Performs one store lookup per call; nothing is cached.
///
/// # Errors
///
/// - `MissingToken` if `token` is `None`
/// - `Token(_)` if validation fails (expired, bad signature, malformed, no subject)
/// - `UserNotFound` if the subject has no matching user
/// - `Store(_)` if the lookup itself fails
pub async fn resolve_session(
    token: Option<&str>,
    tokens: &TokenService,
    users: &dyn UserRepository,
) -> Result<AuthContext, SessionError> {
    let token = token.ok_or(SessionError::MissingToken)?;
    let username = tokens.validate(token)?;

    let user = users
        .find_by_username(&username)
        .await?
        .ok_or(SessionError::UserNotFound)?;

    debug!(user_id = user.id, "Session resolved");

    Ok(AuthContext {
        user_id: user.id,
        username: user.username,
    })
}
