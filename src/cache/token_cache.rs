use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::debug;

use crate::cache::token::CachedToken;
use crate::error::CredentialReadError;
use crate::helpers::time::{beginning_of_time, expiry_after, Clock};
use crate::observability::metrics::get_metrics;

/// How long a token read from disk is served before the file is read again.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);

/// File-backed token with a fixed freshness window.
///
/// The token file is re-read lazily: a call to [`TokenCache::token`] reads the
/// file only once the cached value has reached its expiry. Intended for
/// projected service-account tokens that the kubelet rotates in place.
///
/// The check-and-refresh sequence holds one lock across the file read, so
/// concurrent callers at a staleness boundary share a single read.
pub struct TokenCache {
    path: PathBuf,
    refresh_interval: Duration,
    clock: Arc<dyn Clock>,
    inner: Mutex<CachedToken>,
}

impl TokenCache {
    /// Create the cache and read the token file right away.
    ///
    /// Fails if the file cannot be read, so a broken credential mount is
    /// reported at startup rather than on the first request.
    pub async fn new(
        path: impl Into<PathBuf>,
        refresh_interval: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CredentialReadError> {
        let cache = Self {
            path: path.into(),
            refresh_interval,
            clock,
            inner: Mutex::new(CachedToken::new(String::new(), beginning_of_time())),
        };
        cache.token().await?;
        Ok(cache)
    }

    /// Current token, read with the clock given at construction.
    pub async fn token(&self) -> Result<String, CredentialReadError> {
        self.token_with(self.clock.as_ref()).await
    }

    /// Current token, judging staleness with `clock`.
    ///
    /// A failed refresh leaves the previous token and expiry in place and the
    /// next call tries again.
    pub async fn token_with(&self, clock: &dyn Clock) -> Result<String, CredentialReadError> {
        let mut cached = self.inner.lock().await;
        let now = clock.now();
        if cached.is_stale(now) {
            let value = self.read_token_file().await?;
            *cached = CachedToken::new(value, expiry_after(now, self.refresh_interval));
            debug!(
                "token file '{}' re-read, next read due at {}",
                self.path.display(),
                cached.expires_at
            );
            get_metrics()
                .await
                .token_expiry_unix
                .with_label_values(&[self.path_label().as_str()])
                .set(cached.expires_at.timestamp());
        }
        Ok(cached.value.clone())
    }

    /// The cached pair as it is now, without refreshing.
    pub async fn snapshot(&self) -> CachedToken {
        self.inner.lock().await.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    async fn read_token_file(&self) -> Result<String, CredentialReadError> {
        let metrics = get_metrics().await;
        let path_label = self.path_label();
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => {
                metrics.token_reads.with_label_values(&[path_label.as_str()]).inc();
                Ok(content.trim().to_owned())
            }
            Err(err) => {
                let reason = format!("{:?}", err.kind());
                metrics
                    .token_read_failures
                    .with_label_values(&[path_label.as_str(), reason.as_str()])
                    .inc();
                Err(CredentialReadError::new(&self.path, err))
            }
        }
    }

    fn path_label(&self) -> String {
        self.path.display().to_string()
    }
}

impl fmt::Debug for TokenCache {
    // never print the token itself
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCache")
            .field("path", &self.path)
            .field("refresh_interval", &self.refresh_interval)
            .finish_non_exhaustive()
    }
}
