//! REST API server for the quote demonstration store.
//!
//! Wires the in-memory store, optional snapshot persistence, and the
//! HTTP layer together with configuration parsing and shutdown
//! handling.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};

use quote_db_api::{router::Router, server::Server};
use quote_db_core::{snapshot, Store, StoreConfig};

/// Command-line arguments for the quote server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = 8080)]
    port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Data directory for snapshots (omit to run purely in memory)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Request body read timeout in milliseconds
    #[arg(long, default_value_t = 5000)]
    request_timeout_ms: u64,

    /// Handler timeout in milliseconds; requests exceeding it get 408
    #[arg(long, default_value_t = 5000)]
    response_timeout_ms: u64,

    /// Default and maximum page size for listings
    #[arg(long, default_value_t = 50)]
    max_page_size: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt::init();

    let config = Arc::new(StoreConfig {
        default_page_size: args.max_page_size,
        max_page_size: args.max_page_size,
        data_dir: args.data_dir.clone(),
        request_timeout_ms: args.request_timeout_ms,
        response_timeout_ms: args.response_timeout_ms,
    });

    let store = Arc::new(Store::new());
    if let Some(dir) = &config.data_dir {
        let loaded = snapshot::load(&store, dir)
            .with_context(|| format!("Failed to load snapshot from {}", dir.display()))?;
        if !loaded {
            info!(dir = %dir.display(), "no snapshot found, starting empty");
        }
    }

    let router = Router::new(store.clone(), config.clone());

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .context("Invalid host/port combination")?;
    let server = Server::new(addr, router);

    info!(
        host = %args.host,
        port = args.port,
        data_dir = ?args.data_dir,
        "starting quote server"
    );

    let server_handle = tokio::spawn(async move {
        if let Err(e) = server.serve().await {
            tracing::error!("Server error: {}", e);
        }
    });

    signal::ctrl_c().await.context("Failed to listen for ctrl_c")?;
    info!("shutting down");
    server_handle.abort();

    if let Some(dir) = &config.data_dir {
        if let Err(e) = snapshot::save(&store, dir) {
            warn!("Failed to save snapshot on shutdown: {}", e);
        }
    }

    Ok(())
}
