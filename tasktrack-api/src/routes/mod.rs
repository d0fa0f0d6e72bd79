/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `auth`: Authentication endpoints (signup, token, debug user listing)
/// - `tasks`: Per-user task CRUD

pub mod auth;
pub mod health;
pub mod tasks;
