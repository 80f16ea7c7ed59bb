use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use k8s_token_source::cache::token::fingerprint;
use k8s_token_source::config::client::ClientConfig;
use k8s_token_source::config::settings::InClusterSettings;
use k8s_token_source::observability::metrics::get_metrics;
use k8s_token_source::utils::config_loader;
use k8s_token_source::utils::logging::{self, LogLevel};
use tokio::signal::unix::{signal, SignalKind};
use tokio::select;
use tracing::{info, warn};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG")]
    config: Option<String>,
    /// Use the pod's service-account token and CA bundle
    #[arg(long)]
    in_cluster: bool,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current bearer token
    Token,
    /// Print the resolved configuration as JSON (token redacted)
    Show,
    /// Poll the token source and log every change until interrupted
    Watch {
        #[arg(long, default_value_t = 10)]
        interval_seconds: u64,
        /// Print Prometheus metrics on every tick
        #[arg(long)]
        metrics: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let args = Args::parse();
    let mut service_config = config_loader::run(args.config.as_deref()).await?;
    if args.in_cluster && service_config.in_cluster.is_none() {
        service_config.in_cluster = Some(InClusterSettings::default());
    }
    logging::run(&service_config, args.log_level);

    // -------------------------------
    // 2. Build client config, reading the token file once
    // -------------------------------

    let client_config = ClientConfig::from_settings(&service_config).await?;

    // -------------------------------
    // 3. Run command
    // -------------------------------

    match args.command {
        Command::Token => {
            let token = client_config
                .bearer_token()
                .await?
                .context("no API token configured")?;
            println!("{}", token);
        }
        Command::Show => {
            println!("{}", serde_json::to_string_pretty(&client_config.summary())?);
        }
        Command::Watch { interval_seconds, metrics } => {
            watch(&client_config, Duration::from_secs(interval_seconds.max(1)), metrics).await?;
        }
    }
    Ok(())
}

async fn watch(client_config: &ClientConfig, interval: Duration, print_metrics: bool) -> Result<()> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut ticker = tokio::time::interval(interval);
    let mut last_fingerprint: Option<String> = None;

    info!("watching token source every {}s", interval.as_secs());
    loop {
        select! {
            _ = sigint.recv() => {
                info!("Received SIGINT (Ctrl+C). Stopping...");
                break;
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM. Stopping...");
                break;
            }
            _ = ticker.tick() => {
                match client_config.bearer_token().await {
                    Ok(Some(token)) => {
                        let current = fingerprint(&token);
                        if last_fingerprint.as_deref() != Some(current.as_str()) {
                            info!("token changed: {}", current);
                            last_fingerprint = Some(current);
                        }
                    }
                    Ok(None) => warn!("no API token configured"),
                    // the cache leaves retrying to us; try again next tick
                    Err(e) => warn!("token refresh failed: {}", e),
                }
                if print_metrics {
                    println!("{}", get_metrics().await.render()?);
                }
            }
        }
    }
    Ok(())
}
