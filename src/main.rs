//! Session Directory
//!
//! Standalone host for the session registry of one matchmaking node. Loads
//! configuration, wires the registry to a process-local Node Directory, logs
//! registry activity, and drains every session on shutdown.

use clap::Parser;
use std::net::IpAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use session_directory::{MemoryNodeDirectory, Result, ServerConfig, SessionRegistry};

// =============================================================================
// CLI Arguments
// =============================================================================

/// Session Directory - game session registry for a matchmaking node
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(long, env = "SESSION_DIRECTORY_CONFIG")]
    config: Option<PathBuf>,

    /// Public IP advertised to clients (overrides the config file)
    #[arg(long, env = "PUBLIC_IP")]
    public_ip: Option<IpAddr>,

    /// Public port advertised to clients (overrides the config file)
    #[arg(long, env = "PUBLIC_PORT")]
    public_port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Output logs as JSON
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,

    /// Stats logging interval in seconds (0 disables)
    #[arg(long, env = "STATS_INTERVAL", default_value = "60")]
    stats_interval_secs: u64,
}

impl Args {
    /// Config file contents with CLI/env overrides applied
    fn server_config(&self) -> Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => ServerConfig::from_yaml_file(path)?,
            None => ServerConfig::default(),
        };

        if let Some(ip) = self.public_ip {
            config.public_ip = ip;
        }
        if let Some(port) = self.public_port {
            config.public_port = port;
        }

        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// Main
// =============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    init_logging(&args);

    let config = args.server_config()?;

    info!("Starting Session Directory");
    info!("  Version: {}", session_directory::VERSION);
    info!("  Public endpoint: {}", config.public_endpoint());
    info!("  Code length: {}", config.code_length);
    info!("  Max create attempts: {}", config.max_create_attempts);
    info!("  Directory timeout: {:?}", config.directory_timeout());

    let directory = Arc::new(MemoryNodeDirectory::new());
    let registry = SessionRegistry::new(config, directory)?;

    tokio::spawn(log_events(registry.clone()));

    if args.stats_interval_secs > 0 {
        tokio::spawn(log_stats(
            registry.clone(),
            Duration::from_secs(args.stats_interval_secs),
        ));
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }

    info!("Shutting down, draining sessions");
    let drained = registry.drain().await;
    info!(drained, "Session directory shutdown complete");
    Ok(())
}

// =============================================================================
// Logging Setup
// =============================================================================

fn init_logging(args: &Args) {
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true))
            .init();
    }
}

// =============================================================================
// Background Tasks
// =============================================================================

async fn log_stats(registry: Arc<SessionRegistry>, period: Duration) {
    let mut ticker = tokio::time::interval(period);
    // First tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match serde_json::to_string(&registry.stats()) {
            Ok(stats) => info!(stats = %stats, "Registry stats"),
            Err(e) => warn!("Failed to serialize registry stats: {}", e),
        }
    }
}

async fn log_events(registry: Arc<SessionRegistry>) {
    let mut events = registry.subscribe();

    loop {
        match events.recv().await {
            Ok(event) if event.is_failure() => warn!(?event, "Registry event"),
            Ok(event) => debug!(?event, "Registry event"),
            Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event log lagging"),
            Err(RecvError::Closed) => break,
        }
    }
}
