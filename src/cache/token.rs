use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

/// A token value together with the instant after which it must be re-read.
/// The two fields only ever change together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    pub fn new(value: String, expires_at: DateTime<Utc>) -> Self {
        Self { value, expires_at }
    }

    /// Stale once `now` reaches the expiry; the boundary instant itself is stale.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Loggable stand-in for a token: its length and a short SHA-256 prefix.
/// No token characters end up in the output.
pub fn fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let short: String = digest.iter().take(6).map(|b| format!("{:02x}", b)).collect();
    format!("len={} sha256={}", token.chars().count(), short)
}
