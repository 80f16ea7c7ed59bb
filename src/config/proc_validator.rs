//! Config validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Checks the client settings, the in-cluster token source and logging

use std::path::Path;

use http::Uri;
use tracing::{error, info};

use crate::config::settings::{ClientSettings, InClusterSettings, LoggingConfig, ServiceConfig, VerifySsl};
use crate::observability::metrics::get_metrics;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub async fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_client(&cfg.client, &mut errors);
    if let Some(in_cluster) = &cfg.in_cluster {
        validate_in_cluster(in_cluster, &mut errors);
    }
    if let Some(logging) = &cfg.logging {
        validate_logging(logging, &mut errors);
    }

    if errors.is_empty() {
        info!("config validation passed");
        Ok(())
    } else {
        let metrics = get_metrics().await;
        metrics.config_validation_errors.inc_by(errors.len() as u64);
        for e in &errors {
            error!("config validation: {}", e);
        }
        Err(errors)
    }
}

fn validate_client(client: &ClientSettings, errors: &mut Vec<String>) {
    match client.api_server.parse::<Uri>() {
        Ok(uri) => {
            let scheme_ok = matches!(uri.scheme_str(), Some("https") | Some("http"));
            if !scheme_ok || uri.host().is_none() {
                errors.push(format!(
                    "client.api_server '{}' must be an absolute http(s) URL",
                    client.api_server
                ));
            }
        }
        Err(e) => errors.push(format!(
            "client.api_server '{}' is not a valid URL: {}",
            client.api_server, e
        )),
    }

    if client.timeout_seconds == 0 {
        errors.push("client.timeout_seconds must be > 0".to_string());
    }
    if client.stream_timeout_seconds == 0 {
        errors.push("client.stream_timeout_seconds must be > 0".to_string());
    }
    if client.watcher_cache_size == 0 {
        errors.push("client.watcher_cache_size must be > 0".to_string());
    }

    if let Some(cert) = &client.cert {
        validate_path("client.cert", cert, errors);
    }
    if let VerifySsl::CaBundle(path) = &client.verify_ssl {
        validate_path("client.verify_ssl", path, errors);
    }
}

fn validate_in_cluster(in_cluster: &InClusterSettings, errors: &mut Vec<String>) {
    validate_path("in_cluster.token_file", &in_cluster.token_file, errors);
    validate_path("in_cluster.ca_cert_file", &in_cluster.ca_cert_file, errors);
    if in_cluster.refresh_interval_seconds == 0 {
        errors.push("in_cluster.refresh_interval_seconds must be > 0".to_string());
    }
}

fn validate_logging(logging: &LoggingConfig, errors: &mut Vec<String>) {
    if !LOG_LEVELS.contains(&logging.level.to_lowercase().as_str()) {
        errors.push(format!(
            "logging.level '{}' invalid; allowed: {:?}",
            logging.level, LOG_LEVELS
        ));
    }
}

fn validate_path(field: &str, path: &Path, errors: &mut Vec<String>) {
    if path.as_os_str().is_empty() {
        errors.push(format!("{} must not be empty", field));
    }
}
