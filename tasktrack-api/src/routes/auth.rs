/// Authentication endpoints
///
/// This module provides user authentication endpoints:
/// - Signup
/// - Login (token issuance)
/// - User listing (debug mode only)
///
/// # Endpoints
///
/// - `POST /auth/signup` - Register new user and get a token
/// - `POST /auth/token` - Login and get a token
/// - `GET /auth/users` - List users; mounted only when `DEBUG_ROUTES=true`
///
/// All of them sit behind the `X-API-Key` gate.

use crate::{app::AppState, error::ApiResult, extract::ApiJson};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tasktrack_shared::{repository::UserRepository, services::auth::AccessToken};
use validator::Validate;

/// Signup/login request
#[derive(Deserialize, Validate)]
pub struct CredentialsRequest {
    /// Username (case-sensitive)
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,

    /// Password in plain text
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// Never log the password
impl std::fmt::Debug for CredentialsRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsRequest")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Public view of a user
#[derive(Debug, Serialize, Deserialize)]
pub struct UserSummary {
    /// User ID
    pub id: i64,

    /// Username
    pub username: String,
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /auth/signup
/// X-API-Key: <key>
/// Content-Type: application/json
///
/// {
///   "username": "alice",
///   "password": "pw1"
/// }
/// ```
///
/// # Response
///
/// ```json
/// {
///   "access_token": "eyJ...",
///   "token_type": "bearer"
/// }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, or username already exists
/// - `401 Unauthorized`: Missing or wrong API key
pub async fn signup(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> ApiResult<Json<AccessToken>> {
    req.validate()?;

    let token = state.auth.signup(&req.username, &req.password).await?;

    Ok(Json(token))
}

/// Login endpoint
///
/// Same body and response as signup. Unknown usernames and wrong passwords
/// both produce `401 Invalid credentials`.
pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CredentialsRequest>,
) -> ApiResult<Json<AccessToken>> {
    req.validate()?;

    let token = state.auth.login(&req.username, &req.password).await?;

    Ok(Json(token))
}

/// Lists every user (debug builds of the deployment only)
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserSummary>>> {
    let users = state.store.list_users().await?;

    Ok(Json(
        users
            .into_iter()
            .map(|user| UserSummary {
                id: user.id,
                username: user.username,
            })
            .collect(),
    ))
}
