//! Media Workspace Gateway
//!
//! A local HTTP gateway in front of a generative-media pipeline's file
//! workspace, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────┐
//!                     │                 GATEWAY                       │
//!                     │                                               │
//!   Client Request    │   ┌──────────────────────────────────┐       │
//!   ──────────────────┼──▶│          http (router)            │       │
//!                     │   └──┬──────────┬──────────┬─────┬───┘       │
//!                     │      │          │          │     │           │
//!                     │      ▼          ▼          ▼     ▼           │
//!                     │  ┌───────┐ ┌─────────┐ ┌──────┐ ┌────────┐  │
//!                     │  │listing│ │  proxy  │ │output│ │static UI│  │
//!                     │  │ scan  │ │forwarder│ │files │ │ assets │  │
//!                     │  └───────┘ └────┬────┘ └──────┘ └────────┘  │
//!                     │                 │                            │
//!                     │   ┌─────────────▼──────────────┐             │
//!                     │   │   uploader (supervisor)     │────────────┼──▶ upload
//!                     │   │   spawn / log / terminate   │             │   service
//!                     │   └────────────────────────────┘             │  (child)
//!                     │                                               │
//!                     │   lifecycle: SIGINT/SIGTERM → terminate child │
//!                     └──────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use media_gateway::config::loader::load_config;
use media_gateway::config::GatewayConfig;
use media_gateway::http::HttpServer;
use media_gateway::uploader::UploadSupervisor;

#[derive(Parser)]
#[command(name = "media-gateway")]
#[command(about = "HTTP gateway for a generative-media file workspace", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file; built-in defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "media_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("media-gateway v0.1.0 starting");

    let cli = Cli::parse();
    let config = match cli.config {
        Some(path) => load_config(&path)?,
        None => GatewayConfig::default(),
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upload_origin = %config.proxy.upload_origin,
        output_dir = %config.content.output_dir.display(),
        "Configuration loaded"
    );

    // The upload path is a core advertised capability of the gateway, so a
    // failed spawn aborts startup instead of degrading.
    let supervisor = UploadSupervisor::spawn(&config.uploader)?;

    // Bind TCP listener
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Create and run HTTP server
    let server = HttpServer::new(&config, supervisor)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
