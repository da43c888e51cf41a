use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use url::Url;

use modrelay::config::{self, ConfigError, ServerConfig, TlsConfig};
use modrelay::handler::UpstreamRelay;
use modrelay::http::HttpServer;
use modrelay::observability::{logging, metrics};
use modrelay::transport::Transport;

#[derive(Parser)]
#[command(name = "modrelay")]
#[command(about = "Supervised HTTP front-end for Go module proxy handlers", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// TCP address that the server listens on
    #[arg(long)]
    address: Option<String>,

    /// Path to the TLS certificate file
    #[arg(long)]
    tls_cert_file: Option<String>,

    /// Path to the TLS key file
    #[arg(long)]
    tls_key_file: Option<String>,

    /// Prefix for all request paths
    #[arg(long)]
    path_prefix: Option<String>,

    /// Upstream module source (http, https or file URL)
    #[arg(long)]
    upstream: Option<String>,

    /// Allow insecure TLS connections on outbound fetches
    #[arg(long)]
    insecure: bool,

    /// Maximum time in seconds (0 means no limit) to establish an outgoing connection
    #[arg(long)]
    connect_timeout: Option<u64>,

    /// Maximum time in seconds (0 means no limit) for a request to complete
    #[arg(long)]
    fetch_timeout: Option<u64>,

    /// Maximum time in seconds (0 means no limit) to wait for the server to shut down
    #[arg(long)]
    shutdown_timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    logging::init_logging(&config.observability.log_level);

    tracing::info!(
        address = %config.listener.bind_address,
        upstream = %config.upstream.url,
        fetch_timeout_secs = config.timeouts.fetch_secs,
        shutdown_timeout_secs = config.timeouts.shutdown_secs,
        "configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "failed to parse metrics address"
            ),
        }
    }

    if let Err(e) = run(config).await {
        tracing::error!(error = %e, "server failed");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

async fn run(config: ServerConfig) -> Result<(), Box<dyn std::error::Error>> {
    let transport = Arc::new(Transport::new(
        Duration::from_secs(config.timeouts.connect_secs),
        config.transport.insecure,
    )?);
    let upstream = Url::parse(&config.upstream.url)?;
    let relay = Arc::new(UpstreamRelay::new(upstream, transport));

    let server = HttpServer::new(config, relay);
    server.run().await?;

    tracing::info!("shutdown complete");
    Ok(())
}

/// Load the config file (if given) and apply flag overrides.
fn build_config(cli: &Cli) -> Result<ServerConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ServerConfig::default(),
    };

    if let Some(address) = &cli.address {
        config.listener.bind_address = address.clone();
    }
    if let (Some(cert_path), Some(key_path)) = (&cli.tls_cert_file, &cli.tls_key_file) {
        config.listener.tls = Some(TlsConfig {
            cert_path: cert_path.clone(),
            key_path: key_path.clone(),
        });
    }
    if let Some(path_prefix) = &cli.path_prefix {
        config.path_prefix = path_prefix.clone();
    }
    if let Some(upstream) = &cli.upstream {
        config.upstream.url = upstream.clone();
    }
    if cli.insecure {
        config.transport.insecure = true;
    }
    if let Some(connect_timeout) = cli.connect_timeout {
        config.timeouts.connect_secs = connect_timeout;
    }
    if let Some(fetch_timeout) = cli.fetch_timeout {
        config.timeouts.fetch_secs = fetch_timeout;
    }
    if let Some(shutdown_timeout) = cli.shutdown_timeout {
        config.timeouts.shutdown_secs = shutdown_timeout;
    }

    // Flag overrides go through the same validation as file values.
    config::validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
