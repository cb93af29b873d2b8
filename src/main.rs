//! OpenAI-compatible chat-completion relay.
//!
//! # Architecture Overview
//!
//! ```text
//!                              ┌──────────────────────────────────────────────┐
//!                              │                 CHAT RELAY                   │
//!     Client Request           │  ┌─────────┐   ┌─────────────┐               │
//!     ─────────────────────────┼─▶│  http   │──▶│ translator  │               │
//!     POST /v1/chat/completions│  │ server  │   │ (payload)   │               │
//!                              │  └─────────┘   └──────┬──────┘               │
//!                              │                       ▼                      │
//!     Client Response          │  ┌─────────┐   ┌─────────────┐               │
//!     ◀────────────────────────┼──│response │◀──│  upstream   │◀──────────────┼──── Upstream API
//!       buffered or streamed   │  │ mirror  │   │ + stream    │               │
//!                              │  └─────────┘   └─────────────┘               │
//!                              │                                              │
//!                              │  config · observability · lifecycle          │
//!                              └──────────────────────────────────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;

use chat_relay::config::{load_config, validation::validate_config, ConfigError, RelayConfig};
use chat_relay::lifecycle::Shutdown;
use chat_relay::observability::{logging, metrics};
use chat_relay::HttpServer;
use clap::Parser;
use tokio::net::TcpListener;

#[derive(Parser)]
#[command(name = "chat-relay")]
#[command(about = "OpenAI-compatible relay for an upstream chat-completion API", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address (e.g. 127.0.0.1:61024)
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RelayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
        validate_config(&config).map_err(ConfigError::Validation)?;
    }

    logging::init_logging(&config.observability.log_level);

    tracing::info!("chat-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.completions_url(),
        timeout_secs = config.upstream.timeout_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        "Starting OpenAI compatible API server on http://{}",
        listener.local_addr()?
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_os_signal();

    let server = HttpServer::new(config)?;
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
