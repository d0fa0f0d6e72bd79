/// Error handling for the API server
///
/// This module provides a unified error type that maps to HTTP responses.
/// All handlers return `Result<T, ApiError>`; library errors convert through
/// the `From` impls below, so handlers can use `?` throughout.
///
/// Every error body has the same shape:
///
/// ```json
/// { "error": "not_found", "detail": "Task not found" }
/// ```
///
/// with an extra `fields` array for validation failures.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use tasktrack_shared::{
    auth::session::SessionError,
    repository::StoreError,
    services::{auth::AuthServiceError, tasks::TaskServiceError},
};

/// API result type alias
pub type ApiResult<T> = Result<T, ApiError>;

/// Authentication scheme advertised in `WWW-Authenticate` on a 401
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Challenge {
    /// `Authorization: Bearer <token>`
    Bearer,

    /// `X-API-Key` header
    ApiKey,
}

impl Challenge {
    fn header_value(self) -> HeaderValue {
        match self {
            Challenge::Bearer => HeaderValue::from_static("Bearer"),
            Challenge::ApiKey => HeaderValue::from_static("ApiKey header=\"X-API-Key\""),
        }
    }
}

/// Unified API error type
#[derive(Debug)]
pub enum ApiError {
    /// Bad request (400) - unreadable body or parameters
    BadRequest(String),

    /// Unauthorized (401)
    Unauthorized { message: String, challenge: Challenge },

    /// Not found (404)
    NotFound(String),

    /// Conflict - e.g., duplicate username
    ///
    /// Reported as 400 to keep the existing client contract.
    Conflict(String),

    /// Validation failed (400)
    ValidationError {
        message: String,
        fields: Vec<ValidationErrorDetail>,
    },

    /// Internal server error (500)
    InternalError(String),
}

/// Validation error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorDetail {
    /// Field that failed validation
    pub field: String,

    /// Error message
    pub message: String,
}

/// Error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code (e.g., "bad_request", "unauthorized")
    pub error: String,

    /// Human-readable error message
    pub detail: String,

    /// Per-field validation errors
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<ValidationErrorDetail>>,
}

impl ApiError {
    /// 401 asking for a bearer token
    pub fn bearer(message: impl Into<String>) -> Self {
        ApiError::Unauthorized {
            message: message.into(),
            challenge: Challenge::Bearer,
        }
    }

    /// Validation failure without per-field details
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::ValidationError {
            message: message.into(),
            fields: Vec::new(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::Unauthorized { message, .. } => write!(f, "Unauthorized: {}", message),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::ValidationError { message, .. } => {
                write!(f, "Validation failed: {}", message)
            }
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut challenge = None;

        let (status, error_code, detail, fields) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg, None),
            ApiError::Unauthorized {
                message,
                challenge: scheme,
            } => {
                challenge = Some(scheme);
                (StatusCode::UNAUTHORIZED, "unauthorized", message, None)
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg, None),
            ApiError::Conflict(msg) => (StatusCode::BAD_REQUEST, "conflict", msg, None),
            ApiError::ValidationError { message, fields } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                message,
                (!fields.is_empty()).then_some(fields),
            ),
            ApiError::InternalError(msg) => {
                // Log internal errors but don't expose details to clients
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_code.to_string(),
            detail,
            fields,
        });

        let mut response = (status, body).into_response();
        if let Some(scheme) = challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, scheme.header_value());
        }
        response
    }
}

/// Convert session errors to API errors
impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Store(err) => err.into(),
            other => ApiError::bearer(other.to_string()),
        }
    }
}

/// Convert signup/login errors to API errors
impl From<AuthServiceError> for ApiError {
    fn from(err: AuthServiceError) -> Self {
        match err {
            AuthServiceError::Validation(msg) => ApiError::validation(msg),
            AuthServiceError::UsernameTaken => ApiError::Conflict(err.to_string()),
            AuthServiceError::InvalidCredentials => ApiError::bearer(err.to_string()),
            other => ApiError::InternalError(other.to_string()),
        }
    }
}

/// Convert task errors to API errors
impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        match err {
            TaskServiceError::NotFound => ApiError::NotFound(err.to_string()),
            TaskServiceError::Validation(msg) => ApiError::validation(msg),
            TaskServiceError::Store(err) => err.into(),
        }
    }
}

/// Store failures are never the client's fault
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

/// Convert validator errors to API errors
impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let fields: Vec<ValidationErrorDetail> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |error| ValidationErrorDetail {
                    field: field.to_string(),
                    message: error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Validation failed".to_string()),
                })
            })
            .collect();

        ApiError::ValidationError {
            message: "Request validation failed".to_string(),
            fields,
        }
    }
}

/// Malformed or incomplete JSON bodies
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Well-formed JSON that does not fit the expected shape
            JsonRejection::JsonDataError(err) => ApiError::validation(err.body_text()),
            other => ApiError::BadRequest(other.body_text()),
        }
    }
}

/// Path parameters that fail to parse (e.g. a non-numeric task id)
impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        match rejection {
            PathRejection::FailedToDeserializePathParams(err) => {
                ApiError::validation(err.body_text())
            }
            other => ApiError::InternalError(other.body_text()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasktrack_shared::auth::jwt::TokenError;

    #[test]
    fn test_error_display() {
        let err = ApiError::BadRequest("Invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: Invalid input");

        let err = ApiError::NotFound("Task not found".to_string());
        assert_eq!(err.to_string(), "Not found: Task not found");
    }

    #[test]
    fn test_status_codes() {
        let cases = [
            (ApiError::BadRequest("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::bearer("x"), StatusCode::UNAUTHORIZED),
            (ApiError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (ApiError::Conflict("x".into()), StatusCode::BAD_REQUEST),
            (ApiError::validation("x"), StatusCode::BAD_REQUEST),
            (ApiError::InternalError("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }

    #[test]
    fn test_unauthorized_sets_challenge() {
        let response = ApiError::bearer("Missing authentication token").into_response();
        assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "Bearer");

        let response = ApiError::Unauthorized {
            message: "Invalid or missing API key".to_string(),
            challenge: Challenge::ApiKey,
        }
        .into_response();
        assert_eq!(
            response.headers()[header::WWW_AUTHENTICATE],
            "ApiKey header=\"X-API-Key\""
        );

        let response = ApiError::NotFound("x".into()).into_response();
        assert!(response.headers().get(header::WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn test_session_error_mapping() {
        let err: ApiError = SessionError::Token(TokenError::Expired).into();
        assert!(matches!(
            err,
            ApiError::Unauthorized { ref message, challenge: Challenge::Bearer }
                if message == "Token has expired"
        ));

        let err: ApiError = SessionError::UserNotFound.into();
        assert_eq!(err.to_string(), "Unauthorized: User not found for given token");

        let err: ApiError = SessionError::Store(StoreError::Database(sqlx::Error::PoolClosed)).into();
        assert!(matches!(err, ApiError::InternalError(_)));
    }

    #[test]
    fn test_service_error_mapping() {
        let err: ApiError = AuthServiceError::UsernameTaken.into();
        assert!(matches!(err, ApiError::Conflict(ref m) if m == "Username already exists"));

        let err: ApiError = AuthServiceError::InvalidCredentials.into();
        assert!(matches!(err, ApiError::Unauthorized { .. }));

        let err: ApiError = TaskServiceError::NotFound.into();
        assert!(matches!(err, ApiError::NotFound(ref m) if m == "Task not found"));
    }
}
