use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::cache::token_cache::DEFAULT_REFRESH_INTERVAL;
use crate::config::in_cluster::{SERVICE_CA_CERT_FILE, SERVICE_TOKEN_FILE};

pub const DEFAULT_API_SERVER: &str = "https://kubernetes.default.svc.cluster.local";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 20;
/// Just below the default resourceVersion expiration of 5 minutes.
pub const DEFAULT_STREAM_TIMEOUT_SECONDS: u64 = 270;
pub const DEFAULT_WATCHER_CACHE_SIZE: usize = 1000;

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServiceConfig {
    #[serde(default)]
    pub client: ClientSettings,
    /// Present when the token comes from a mounted service-account file
    pub in_cluster: Option<InClusterSettings>,
    pub logging: Option<LoggingConfig>,
}

/// ================================
/// Static client settings
/// ================================
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ClientSettings {
    pub api_server: String,
    /// Ignored when a token file is configured
    pub api_token: String,
    pub cert: Option<PathBuf>,
    pub verify_ssl: VerifySsl,
    pub debug: bool,
    pub timeout_seconds: u64,
    /// Waiting time for more events on a watch before reconnecting
    pub stream_timeout_seconds: u64,
    pub watcher_cache_size: usize,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_server: DEFAULT_API_SERVER.to_owned(),
            api_token: String::new(),
            cert: None,
            verify_ssl: VerifySsl::default(),
            debug: false,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            stream_timeout_seconds: DEFAULT_STREAM_TIMEOUT_SECONDS,
            watcher_cache_size: DEFAULT_WATCHER_CACHE_SIZE,
        }
    }
}

/// Server certificate verification: on/off, or verify against a CA bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VerifySsl {
    Flag(bool),
    CaBundle(PathBuf),
}

impl VerifySsl {
    pub fn is_enabled(&self) -> bool {
        match self {
            VerifySsl::Flag(enabled) => *enabled,
            VerifySsl::CaBundle(_) => true,
        }
    }
}

impl Default for VerifySsl {
    fn default() -> Self {
        VerifySsl::Flag(true)
    }
}

/// ================================
/// In-cluster token source
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct InClusterSettings {
    #[serde(default = "default_token_file")]
    pub token_file: PathBuf,
    #[serde(default = "default_ca_cert_file")]
    pub ca_cert_file: PathBuf,
    #[serde(default = "default_refresh_interval_seconds")]
    pub refresh_interval_seconds: u64,
}

impl Default for InClusterSettings {
    fn default() -> Self {
        Self {
            token_file: default_token_file(),
            ca_cert_file: default_ca_cert_file(),
            refresh_interval_seconds: default_refresh_interval_seconds(),
        }
    }
}

fn default_token_file() -> PathBuf {
    PathBuf::from(SERVICE_TOKEN_FILE)
}

fn default_ca_cert_file() -> PathBuf {
    PathBuf::from(SERVICE_CA_CERT_FILE)
}

fn default_refresh_interval_seconds() -> u64 {
    DEFAULT_REFRESH_INTERVAL.as_secs()
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String, // allowed: trace, debug, info, warn, error
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_log_level() -> String {
    "info".to_owned()
}

fn default_log_format() -> LogFormat {
    LogFormat::Compact
}
