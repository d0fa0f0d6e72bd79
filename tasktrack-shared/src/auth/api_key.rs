/// Static API key check
///
/// Every `/auth` and `/tasks` request must carry the process-wide shared key in
/// the `X-API-Key` header. This is a coarse gate in front of per-user
/// authentication, not a replacement for it.
///
/// # Security
///
/// - **Storage**: only the SHA-256 digest of the configured key is kept
/// - **Comparison**: presented keys are digested and compared in constant
///   time, so neither content nor length leaks through timing
///
/// # Example
///
/// ```
/// use tasktrack_shared::auth::api_key::ApiKeyGate;
///
/// let gate = ApiKeyGate::new("local-dev-key");
/// assert!(gate.check(Some("local-dev-key")));
/// assert!(!gate.check(Some("guess")));
/// assert!(!gate.check(None));
/// ```

use sha2::{Digest, Sha256};

/// Header carrying the shared API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Holds the digest of the configured key and checks presented keys
#[derive(Clone)]
pub struct ApiKeyGate {
    expected_hash: String,
}

impl std::fmt::Debug for ApiKeyGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyGate").finish_non_exhaustive()
    }
}

impl ApiKeyGate {
    /// Creates a gate for the configured key
    pub fn new(api_key: &str) -> Self {
        Self {
            expected_hash: hash_api_key(api_key),
        }
    }

    /// Returns true only if `presented` matches the configured key
    pub fn check(&self, presented: Option<&str>) -> bool {
        match presented {
            Some(key) => constant_time_compare(&hash_api_key(key), &self.expected_hash),
            None => false,
        }
    }
}

/// Hashes an API key using SHA-256
///
/// Returns the lowercase hex digest (64 chars).
pub fn hash_api_key(key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Constant-time string comparison
///
/// Accumulates the XOR of every byte pair and only inspects the result at the
/// end. Inputs of different lengths compare unequal immediately; callers
/// compare fixed-length digests so that branch reveals nothing.
pub fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}
