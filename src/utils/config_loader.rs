use std::path::Path;
use anyhow::Result;

use crate::config::proc_loader::file_to_config;
use crate::config::settings::ServiceConfig;

/// Config from `config_path`, or defaults when no path is given.
pub async fn run(config_path: Option<&str>) -> Result<ServiceConfig> {
    match config_path {
        Some(config_path) => file_to_config(Path::new(config_path)).await,
        None => Ok(ServiceConfig::default()),
    }
}
