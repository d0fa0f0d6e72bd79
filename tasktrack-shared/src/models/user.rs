/// User model
///
/// Users are created at signup and never updated afterwards. The username is
/// the token subject, so it is unique and immutable.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     id INTEGER PRIMARY KEY AUTOINCREMENT,
///     username TEXT NOT NULL UNIQUE,
///     password_hash TEXT NOT NULL
/// );
/// ```

use serde::{Deserialize, Serialize};

/// User account
///
/// The password hash is never serialized; only `id` and `username` leave the
/// process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// System-assigned user ID
    pub id: i64,

    /// Unique login name
    pub username: String,

    /// Argon2id PHC string
    #[serde(skip_serializing, default)]
    pub password_hash: String,
}

/// Input for creating a new user
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login name (must not exist yet)
    pub username: String,

    /// Argon2id hash (NOT the plaintext password!)
    pub password_hash: String,
}
