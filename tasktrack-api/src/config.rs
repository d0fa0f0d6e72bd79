/// Configuration management for the API server
///
/// This module loads configuration from environment variables once at startup
/// and provides a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `DATABASE_URL`: SQLite connection string (default: sqlite://tasktrack.db)
/// - `DATABASE_MAX_CONNECTIONS`: Pool size (default: 5)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `API_KEY`: Shared key expected in `X-API-Key` (required)
/// - `JWT_SECRET`: Secret key for token signing (required, >= 32 chars)
/// - `JWT_ALGORITHM`: HS256, HS384 or HS512 (default: HS256)
/// - `ACCESS_TOKEN_EXPIRE_MINUTES`: Token lifetime (default: 30)
/// - `DEBUG_ROUTES`: Expose `GET /auth/users` (default: false)
/// - `PASSWORD_MEMORY_KIB` / `PASSWORD_ITERATIONS` / `PASSWORD_PARALLELISM`:
///   Argon2id cost (default: 65536 / 3 / 4)
/// - `RUST_LOG`: Log filter (default: info)
///
/// # Example
///
/// ```no_run
/// use tasktrack_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use anyhow::Context;
use jsonwebtoken::Algorithm;
use std::str::FromStr;
use tasktrack_shared::{auth::password::HashParams, db::pool::DatabaseConfig};

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT configuration
    pub jwt: JwtConfig,

    /// Argon2id cost parameters
    pub password: HashParams,
}

/// API server configuration
#[derive(Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Shared key for the `X-API-Key` gate
    pub api_key: String,

    /// Whether debug-only routes are mounted
    pub debug_routes: bool,
}

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Secret key for token signing
    ///
    /// IMPORTANT: This must be kept secret and should be at least 32 bytes.
    /// Generate with: `openssl rand -hex 32`
    pub secret: String,

    /// HMAC signing algorithm
    pub algorithm: Algorithm,

    /// Access token lifetime in minutes
    pub access_token_expire_minutes: i64,
}

// Secrets stay out of logs
impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("debug_routes", &self.debug_routes)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("algorithm", &self.algorithm)
            .field("access_token_expire_minutes", &self.access_token_expire_minutes)
            .finish_non_exhaustive()
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var_or = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let api_host = var_or("API_HOST", "0.0.0.0");
        let api_port = parse_var::<u16>(&lookup, "API_PORT", 8080)?;

        let api_key = lookup("API_KEY")
            .filter(|key| !key.is_empty())
            .context("API_KEY environment variable is required")?;

        let debug_routes = parse_var::<bool>(&lookup, "DEBUG_ROUTES", false)?;

        let database = DatabaseConfig {
            url: var_or("DATABASE_URL", "sqlite://tasktrack.db"),
            max_connections: parse_var::<u32>(&lookup, "DATABASE_MAX_CONNECTIONS", 5)?,
            ..Default::default()
        };

        let jwt_secret =
            lookup("JWT_SECRET").context("JWT_SECRET environment variable is required")?;

        if jwt_secret.len() < 32 {
            anyhow::bail!("JWT_SECRET must be at least 32 characters long");
        }

        let algorithm_name = var_or("JWT_ALGORITHM", "HS256");
        let algorithm = Algorithm::from_str(&algorithm_name)
            .ok()
            .filter(|alg| matches!(alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512))
            .with_context(|| {
                format!("JWT_ALGORITHM must be HS256, HS384 or HS512 (got '{algorithm_name}')")
            })?;

        let access_token_expire_minutes =
            parse_var::<i64>(&lookup, "ACCESS_TOKEN_EXPIRE_MINUTES", 30)?;

        if access_token_expire_minutes <= 0 {
            anyhow::bail!("ACCESS_TOKEN_EXPIRE_MINUTES must be greater than zero");
        }

        // Every token issued from now on must have a representable expiry
        chrono::Duration::try_minutes(access_token_expire_minutes)
            .and_then(|ttl| chrono::Utc::now().checked_add_signed(ttl))
            .with_context(|| {
                format!("ACCESS_TOKEN_EXPIRE_MINUTES is too large (got {access_token_expire_minutes})")
            })?;

        let defaults = HashParams::default();
        let password = HashParams {
            memory_kib: parse_var(&lookup, "PASSWORD_MEMORY_KIB", defaults.memory_kib)?,
            iterations: parse_var(&lookup, "PASSWORD_ITERATIONS", defaults.iterations)?,
            parallelism: parse_var(&lookup, "PASSWORD_PARALLELISM", defaults.parallelism)?,
        };

        Ok(Self {
            api: ApiConfig {
                host: api_host,
                port: api_port,
                api_key,
                debug_routes,
            },
            database,
            jwt: JwtConfig {
                secret: jwt_secret,
                algorithm,
                access_token_expire_minutes,
            },
            password,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
