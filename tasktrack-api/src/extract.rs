/// Request extractors with JSON error bodies
///
/// Drop-in replacements for `axum::Json` and `axum::extract::Path` whose
/// rejections go through [`ApiError`], so a malformed body or id yields the
/// same error shape as every other failure.

use crate::error::ApiError;
use axum::extract::{FromRequest, FromRequestParts};

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Typed path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
