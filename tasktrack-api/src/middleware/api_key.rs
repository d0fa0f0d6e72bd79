/// API key gate
///
/// Rejects any request under `/auth` or `/tasks` whose `X-API-Key` header does
/// not match the configured key, before routing reaches the handler or the
/// session resolver. Unmatched paths under those prefixes are gated as well.
/// Everything else (e.g. `/health`) passes through.

use crate::{
    app::AppState,
    error::{ApiError, Challenge},
};
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tasktrack_shared::auth::api_key::API_KEY_HEADER;
use tracing::warn;

/// Path prefixes that require the API key
const GATED_PREFIXES: &[&str] = &["/auth", "/tasks"];

/// Whether `path` falls under one of the gated prefixes
///
/// Matches on whole segments: `/tasks` and `/tasks/1` are gated, `/tasksfoo`
/// is not.
pub fn is_gated_path(path: &str) -> bool {
    GATED_PREFIXES.iter().any(|prefix| {
        path.strip_prefix(prefix)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
    })
}

/// Checks the `X-API-Key` header against the configured key
pub async fn api_key_layer(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if !is_gated_path(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let presented = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok());

    if !state.api_key_gate.check(presented) {
        warn!(
            path = %req.uri().path(),
            present = presented.is_some(),
            "Rejected request with invalid API key"
        );
        return Err(ApiError::Unauthorized {
            message: "Invalid or missing API key".to_string(),
            challenge: Challenge::ApiKey,
        });
    }

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gated_paths() {
        for path in ["/auth", "/auth/signup", "/auth/nothing", "/tasks", "/tasks/", "/tasks/1/extra"] {
            assert!(is_gated_path(path), "{} should be gated", path);
        }

        for path in ["/health", "/", "/tasksfoo", "/authx/signup", "/v1/tasks"] {
            assert!(!is_gated_path(path), "{} should not be gated", path);
        }
    }
}
