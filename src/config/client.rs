use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use http::HeaderValue;
use serde::Serialize;

use crate::cache::token_cache::TokenCache;
use crate::config::settings::{
    ServiceConfig, VerifySsl, DEFAULT_API_SERVER, DEFAULT_STREAM_TIMEOUT_SECONDS,
    DEFAULT_TIMEOUT_SECONDS, DEFAULT_WATCHER_CACHE_SIZE,
};
use crate::error::{AuthError, CredentialReadError};
use crate::helpers::time::SystemClock;

/// Configuration handed to whatever talks to the API server.
///
/// Built once at startup and shared by reference; nothing in here is global.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_server: String,
    pub api_token: String,
    /// Takes precedence over `api_token` and `cert` when set
    pub api_token_source: Option<Arc<TokenCache>>,
    /// Client certificate; ignored once a token source is set
    pub cert: Option<PathBuf>,
    pub verify_ssl: VerifySsl,
    pub debug: bool,
    pub timeout: Duration,
    pub stream_timeout: Duration,
    pub watcher_cache_size: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_server: DEFAULT_API_SERVER.to_owned(),
            api_token: String::new(),
            api_token_source: None,
            cert: None,
            verify_ssl: VerifySsl::default(),
            debug: false,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECONDS),
            stream_timeout: Duration::from_secs(DEFAULT_STREAM_TIMEOUT_SECONDS),
            watcher_cache_size: DEFAULT_WATCHER_CACHE_SIZE,
        }
    }
}

impl ClientConfig {
    /// Build the runtime configuration from a loaded config file.
    pub async fn from_settings(service_config: &ServiceConfig) -> Result<Self> {
        let settings = &service_config.client;
        let mut config = Self {
            api_server: settings.api_server.to_owned(),
            api_token: settings.api_token.to_owned(),
            api_token_source: None,
            cert: settings.cert.to_owned(),
            verify_ssl: settings.verify_ssl.to_owned(),
            debug: settings.debug,
            timeout: Duration::from_secs(settings.timeout_seconds),
            stream_timeout: Duration::from_secs(settings.stream_timeout_seconds),
            watcher_cache_size: settings.watcher_cache_size,
        };

        if let Some(in_cluster) = &service_config.in_cluster {
            config
                .use_in_cluster_config(
                    &in_cluster.token_file,
                    &in_cluster.ca_cert_file,
                    Duration::from_secs(in_cluster.refresh_interval_seconds),
                    Arc::new(SystemClock),
                )
                .await
                .context("in-cluster configuration failed")?;
        }
        Ok(config)
    }

    /// Token to send, if any. The token file wins over the static token, and
    /// an empty static token counts as none.
    pub async fn bearer_token(&self) -> Result<Option<String>, CredentialReadError> {
        if let Some(source) = &self.api_token_source {
            return source.token().await.map(Some);
        }
        if self.api_token.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.api_token.to_owned()))
    }

    /// Client certificate to present, if any. A token source replaces it.
    pub fn client_cert(&self) -> Option<&PathBuf> {
        match self.api_token_source {
            Some(_) => None,
            None => self.cert.as_ref(),
        }
    }

    /// `Authorization: Bearer <token>` value, marked sensitive.
    pub async fn authorization_header(&self) -> Result<Option<HeaderValue>, AuthError> {
        let Some(token) = self.bearer_token().await? else {
            return Ok(None);
        };
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
        value.set_sensitive(true);
        Ok(Some(value))
    }

    /// Redacted view for display.
    pub fn summary(&self) -> ConfigSummary {
        let token = match (&self.api_token_source, self.api_token.is_empty()) {
            (Some(source), _) => TokenSummary::File {
                path: source.path().to_path_buf(),
                refresh_interval_seconds: source.refresh_interval().as_secs(),
            },
            (None, false) => TokenSummary::Static,
            (None, true) => TokenSummary::None,
        };
        ConfigSummary {
            api_server: self.api_server.to_owned(),
            token,
            cert: self.client_cert().cloned(),
            verify_ssl: self.verify_ssl.to_owned(),
            debug: self.debug,
            timeout_seconds: self.timeout.as_secs(),
            stream_timeout_seconds: self.stream_timeout.as_secs(),
            watcher_cache_size: self.watcher_cache_size,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ConfigSummary {
    pub api_server: String,
    pub token: TokenSummary,
    pub cert: Option<PathBuf>,
    pub verify_ssl: VerifySsl,
    pub debug: bool,
    pub timeout_seconds: u64,
    pub stream_timeout_seconds: u64,
    pub watcher_cache_size: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum TokenSummary {
    None,
    Static,
    File {
        path: PathBuf,
        refresh_interval_seconds: u64,
    },
}
