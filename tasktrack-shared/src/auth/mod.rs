/// Authentication primitives
///
/// # Modules
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Bearer token issuance and validation
/// - [`api_key`]: Static API key gate with constant-time comparison
/// - [`session`]: Bearer token → user resolution
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use jsonwebtoken::Algorithm;
/// use tasktrack_shared::auth::{
///     jwt::TokenService,
///     password::{HashParams, PasswordHasher},
/// };
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hasher = PasswordHasher::new(HashParams { memory_kib: 1024, iterations: 1, parallelism: 1 })?;
/// let hash = hasher.hash("user_password")?;
/// assert!(hasher.verify("user_password", &hash));
///
/// let tokens = TokenService::new("secret-key-at-least-32-bytes-long!", Algorithm::HS256, Duration::minutes(30))?;
/// let token = tokens.issue("alice")?;
/// assert_eq!(tokens.validate(&token)?, "alice");
/// # Ok(())
/// # }
/// ```

pub mod api_key;
pub mod jwt;
pub mod password;
pub mod session;
