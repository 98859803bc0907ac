//! node-fleet - drives a fleet of wallet accounts against a node-rewards API.
//!
//! # Architecture Overview
//!
//! ```text
//!   keys file ─┐
//!              ├─► lifecycle::startup ─► [AccountSpec] ─► fleet::FleetRunner
//! proxies file ┘                                              │ i * stagger
//!                                                             ▼
//!                        ┌──────────────── session::AccountSession ───────────────┐
//!                        │ authenticate → onboard → check_in → fetch_stats → log   │
//!                        │ then every interval: check_in → fetch_stats → log       │
//!                        └───────────────┬─────────────────────────────────────────┘
//!                                        ▼
//!                      resilience (retry, backoff, token refresh, deadline)
//!                                        ▼
//!                        http::ReqwestTransport (per-account proxy) ─► remote API
//! ```
//!
//! Configuration comes from an optional TOML file, overridden by CLI flags.
//! SIGINT/SIGTERM stop every session.

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;

use node_fleet::config::{load_config, validate_config, ConfigError, FleetConfig};
use node_fleet::credentials::ProxyEndpoint;
use node_fleet::fleet::FleetRunner;
use node_fleet::http::ReqwestTransport;
use node_fleet::lifecycle::{load_accounts, wait_for_signal, Shutdown};
use node_fleet::observability::{logging, metrics};

#[derive(Parser, Debug)]
#[command(name = "node-fleet", version)]
#[command(about = "Run node check-ins for every account in a keys file", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Private keys file, one per line
    #[arg(long)]
    keys: Option<String>,

    /// Proxies file, one per line
    #[arg(long)]
    proxies: Option<String>,

    /// API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Log filter, e.g. `info` or `node_fleet=debug`
    #[arg(long)]
    log_level: Option<String>,

    /// Log file path; empty disables file output
    #[arg(long)]
    log_file: Option<String>,

    /// Prometheus scrape address, e.g. 127.0.0.1:9000
    #[arg(long)]
    metrics_address: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut FleetConfig) {
        if let Some(keys) = self.keys {
            config.files.keys = keys;
        }
        if let Some(proxies) = self.proxies {
            config.files.proxies = proxies;
        }
        if let Some(base_url) = self.base_url {
            config.api.base_url = base_url;
        }
        if let Some(level) = self.log_level {
            config.observability.log_level = level;
        }
        if let Some(file) = self.log_file {
            config.observability.log_file = file;
        }
        if let Some(addr) = self.metrics_address {
            config.observability.metrics_address = addr;
        }
    }
}

fn build_config(cli: Cli) -> Result<FleetConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => FleetConfig::default(),
    };
    cli.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = build_config(Cli::parse())?;
    logging::init_logging(&config.observability)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.api.base_url,
        "node-fleet starting"
    );

    if !config.observability.metrics_address.is_empty() {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let accounts = match load_accounts(&config.files) {
        Ok(accounts) => accounts,
        Err(err) => {
            tracing::error!(error = %err, "Cannot load credentials");
            return Err(err.into());
        }
    };

    let shutdown = Shutdown::new();
    let runner = FleetRunner::new(config.clone());
    let make_transport = |proxy: Option<&ProxyEndpoint>| {
        ReqwestTransport::new(&config.api, &config.http, proxy)
    };

    let report = tokio::select! {
        report = runner.run(accounts, make_transport, &shutdown) => report,
        signal = wait_for_signal() => {
            let signal = signal?;
            tracing::info!(signal, "Signal received during startup, exiting");
            shutdown.trigger();
            return Ok(());
        }
    };

    if report.started == 0 {
        tracing::warn!(failed = report.failed, "No session reached steady state, exiting");
        return Ok(());
    }

    tokio::select! {
        signal = wait_for_signal() => {
            let signal = signal?;
            tracing::info!(signal, "Signal received, shutting down");
            shutdown.trigger();
        }
        _ = report.join_all() => {
            tracing::warn!("All session tasks ended");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
