use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::cache::token_cache::{TokenCache, DEFAULT_REFRESH_INTERVAL};
use crate::config::client::ClientConfig;
use crate::config::settings::VerifySsl;
use crate::error::CredentialReadError;
use crate::helpers::time::{Clock, SystemClock};

// Mounted service-account files
pub const SERVICE_TOKEN_FILE: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";
pub const SERVICE_CA_CERT_FILE: &str = "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt";

impl ClientConfig {
    /// Default settings plus the service-account token and CA of the pod.
    pub async fn in_cluster() -> Result<Self, CredentialReadError> {
        let mut config = Self::default();
        config
            .use_in_cluster_config(
                SERVICE_TOKEN_FILE,
                SERVICE_CA_CERT_FILE,
                DEFAULT_REFRESH_INTERVAL,
                Arc::new(SystemClock),
            )
            .await?;
        Ok(config)
    }

    /// Read the API token from `token_file` (re-read every `refresh_interval`)
    /// and verify the server against `ca_cert_file` when that file exists.
    ///
    /// Fails without touching `self` if the token file can not be read.
    pub async fn use_in_cluster_config(
        &mut self,
        token_file: impl Into<PathBuf>,
        ca_cert_file: impl AsRef<Path>,
        refresh_interval: Duration,
        clock: Arc<dyn Clock>,
    ) -> Result<(), CredentialReadError> {
        let source = TokenCache::new(token_file, refresh_interval, clock).await?;
        info!(
            "token source: '{}', refresh interval {}s",
            source.path().display(),
            refresh_interval.as_secs()
        );
        self.api_token_source = Some(Arc::new(source));

        let ca_cert_file = ca_cert_file.as_ref();
        if tokio::fs::try_exists(ca_cert_file).await.unwrap_or(false) {
            info!("verifying API server with CA bundle '{}'", ca_cert_file.display());
            self.verify_ssl = VerifySsl::CaBundle(ca_cert_file.to_path_buf());
        } else {
            debug!("no CA bundle at '{}'", ca_cert_file.display());
        }
        Ok(())
    }
}
