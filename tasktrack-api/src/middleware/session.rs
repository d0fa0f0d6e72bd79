/// Bearer session middleware
///
/// Resolves the `Authorization: Bearer <token>` header to a user and inserts
/// the resulting [`AuthContext`] into the request extensions. Handlers behind
/// this layer take it with `Extension<AuthContext>`.

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use tasktrack_shared::auth::session::{bearer_token, resolve_session, AuthContext};
use tracing::debug;

/// Requires a valid bearer token for an existing user
pub async fn session_layer(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    let token = bearer_token(header).map(str::to_owned);

    let auth_context: AuthContext =
        resolve_session(token.as_deref(), &state.tokens, &state.store).await.map_err(|e| {
            debug!(error = %e, "Session rejected");
            ApiError::from(e)
        })?;

    req.extensions_mut().insert(auth_context);

    Ok(next.run(req).await)
}
