//! quill-server: HTTP API for the quill journal.
//!
//! ```bash
//! # Defaults from ~/.config/quill/config.toml (or built-in defaults)
//! quill-server
//!
//! # Throwaway server keeping everything in memory
//! quill-server --storage memory --bind 127.0.0.1:9000
//!
//! # Talk to it as user "me"
//! curl -H 'x-authenticated-user: me' -d '{"content":"Hello"}' http://127.0.0.1:9000/entries
//! ```
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use quill_core::{BlobStore, Config, EntryStore, FsBlobStore, MemoryBlobStore};
use quill_server::{Api, HttpServer};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Copy, Clone, Debug, ValueEnum)]
enum StorageKind {
    /// Objects under the storage directory.
    Fs,
    /// Nothing survives a restart.
    Memory,
}

#[derive(Parser, Debug)]
#[command(name = "quill-server", version, about = "HTTP API for the quill journal")]
struct Args {
    /// Path to a config file (default: ~/.config/quill/config.toml, then the native config dir)
    #[arg(short, long, env = "QUILL_CONFIG")]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "QUILL_BIND")]
    bind: Option<SocketAddr>,

    /// Storage backend
    #[arg(long, value_enum, default_value_t = StorageKind::Fs)]
    storage: StorageKind,

    /// Root directory of the on-disk store
    #[arg(long, env = "QUILL_STORAGE_DIR")]
    storage_dir: Option<PathBuf>,

    /// Header the identity gateway puts the verified user id in
    #[arg(long, env = "QUILL_IDENTITY_HEADER")]
    identity_header: Option<String>,

    /// Access-Control-Allow-Origin value
    #[arg(long, env = "QUILL_CORS_ORIGIN")]
    cors_origin: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quill_server=info,quill_core=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Apply CLI overrides
    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(dir) = args.storage_dir {
        config.storage_dir = dir;
    }
    if let Some(header) = args.identity_header {
        config.identity_header = header.to_ascii_lowercase();
    }
    if let Some(origin) = args.cors_origin {
        config.cors_origin = origin;
    }

    let blobs: Arc<dyn BlobStore> = match args.storage {
        StorageKind::Fs => Arc::new(
            FsBlobStore::new(&config.storage_dir)
                .await
                .with_context(|| format!("opening store at {}", config.storage_dir.display()))?,
        ),
        StorageKind::Memory => Arc::new(MemoryBlobStore::new()),
    };

    info!(
        bind = %config.bind,
        storage = ?args.storage,
        storage_dir = %config.storage_dir.display(),
        identity_header = %config.identity_header,
        "Starting quill-server"
    );

    let api = Api::from_config(EntryStore::new(blobs), &config)?;
    let server = Arc::new(HttpServer::new(Arc::new(api), config.bind));

    tokio::select! {
        result = server.run() => result.with_context(|| format!("serving on {}", config.bind))?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }
    Ok(())
}
