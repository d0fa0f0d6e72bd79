//! # TaskTrack Shared Library
//!
//! Domain types, persistence, and business logic behind the TaskTrack API.
//!
//! ## Module Organization
//!
//! - `models`: Users, tasks, and task status
//! - `auth`: Password hashing, bearer tokens, API key gate, session resolution
//! - `db`: SQLite pool and schema bootstrap
//! - `repository`: Query traits and their SQLite implementation
//! - `services`: Signup/login and owner-scoped task operations

pub mod auth;
pub mod db;
pub mod models;
pub mod repository;
pub mod services;

/// Current version of the TaskTrack shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
