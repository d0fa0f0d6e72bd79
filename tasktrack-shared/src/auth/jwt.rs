/// JWT token service
///
/// Issues and validates the bearer tokens handed out at signup/login. A token
/// carries the username as `sub` plus `iat`/`exp`, and is signed with a
/// server-held secret using an HMAC algorithm chosen in configuration.
///
/// # Security
///
/// - **Algorithms**: HS256 (default), HS384, HS512
/// - **Expiration**: configurable TTL, validated with zero leeway
/// - **Validation order**: signature first, then expiry, then subject
///
/// # Example
///
/// ```
/// use chrono::Duration;
/// use jsonwebtoken::Algorithm;
/// use tasktrack_shared::auth::jwt::TokenService;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let tokens = TokenService::new(
///     "your-secret-key-at-least-32-bytes-long",
///     Algorithm::HS256,
///     Duration::minutes(30),
/// )?;
///
/// let token = tokens.issue("alice")?;
/// assert_eq!(tokens.validate(&token)?, "alice");
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};

/// Error type for token operations
///
/// Every validation failure has its own variant so callers can report
/// exactly what went wrong.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Signature valid, but the expiry claim is in the past
    #[error("Token has expired")]
    Expired,

    /// Signature does not match (tampered token or foreign secret)
    #[error("Invalid token signature")]
    InvalidSignature,

    /// Not a decodable token for this service
    #[error("Invalid token: {0}")]
    Malformed(String),

    /// Signature valid, but no usable `sub` claim
    #[error("Token is valid but missing username (sub)")]
    NoSubject,

    /// Failed to sign a new token
    #[error("Failed to create token: {0}")]
    Encode(String),

    /// Algorithm outside the HMAC family
    #[error("Unsupported signing algorithm: {0:?}")]
    UnsupportedAlgorithm(Algorithm),
}

/// JWT claims
///
/// `sub` is optional on decode so that a correctly signed token without a
/// subject is reported as [`TokenError::NoSubject`] rather than as a parse
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - username
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Creates claims for `subject` expiring `expires_in` from now
    ///
    /// A negative duration yields already-expired claims. An expiry beyond
    /// the representable range saturates at the latest representable time.
    pub fn new(subject: impl Into<String>, expires_in: Duration) -> Self {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(expires_in)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            sub: Some(subject.into()),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        }
    }

    /// Checks if the claims have expired
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// Expiry check against an explicit Unix timestamp
    ///
    /// Same rule as token validation: expired only once `now` is past `exp`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now > self.exp
    }
}

/// Issues and validates signed, time-limited bearer tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &self.algorithm)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a token service
    ///
    /// # Errors
    ///
    /// Returns `TokenError::UnsupportedAlgorithm` unless `algorithm` is
    /// HS256, HS384 or HS512; the secret is a shared key, not a key pair.
    pub fn new(secret: &str, algorithm: Algorithm, ttl: Duration) -> Result<Self, TokenError> {
        if !matches!(algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(TokenError::UnsupportedAlgorithm(algorithm));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            algorithm,
            ttl,
        })
    }

    /// Issues a token for `subject` using the configured TTL
    ///
    /// # Errors
    ///
    /// `Encode` if the expiry would fall outside the representable time range.
    pub fn issue(&self, subject: &str) -> Result<String, TokenError> {
        let now = Utc::now();
        let exp = now
            .checked_add_signed(self.ttl)
            .ok_or_else(|| TokenError::Encode("token expiry is out of range".to_string()))?;

        self.sign(&Claims {
            sub: Some(subject.to_string()),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        })
    }

    /// Signs arbitrary claims with the configured key and algorithm
    pub fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(&Header::new(self.algorithm), claims, &self.encoding_key)
            .map_err(|e| TokenError::Encode(e.to_string()))
    }

    /// Validates a token and returns its subject
    ///
    /// # Errors
    ///
    /// - `InvalidSignature` if the signature does not match
    /// - `Expired` if `exp` is in the past
    /// - `NoSubject` if `sub` is missing or empty
    /// - `Malformed` for anything else (bad encoding, wrong algorithm,
    ///   missing `exp`)
    pub fn validate(&self, token: &str) -> Result<String, TokenError> {
        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;
        validation.validate_exp = true;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                    _ => TokenError::Malformed(e.to_string()),
                }
            })?;

        match token_data.claims.sub {
            Some(sub) if !sub.is_empty() => Ok(sub),
            _ => Err(TokenError::NoSubject),
        }
    }
}
