// ============================
// todo-backend-bin/src/main.rs
// ============================
//! Tokio / Axum entry point for the todo API server.
use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use todo_backend_lib::{
    config::{LogFormat, Settings, StorageBackend},
    create_router,
    storage::{FlatFileStorage, MemoryStorage, Storage},
    AppState,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Multi-account todo API server
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Configuration file (defaults to ./todo.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on, overrides the configured one
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Directory for the flat-file store
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Storage backend: memory or file
    #[arg(long, value_parser = parse_backend)]
    storage: Option<StorageBackend>,
}

fn parse_backend(raw: &str) -> Result<StorageBackend, String> {
    match raw.to_ascii_lowercase().as_str() {
        "memory" => Ok(StorageBackend::Memory),
        "file" => Ok(StorageBackend::File),
        other => Err(format!("unknown storage backend {other:?}")),
    }
}

fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level.as_str()));
    let registry = tracing_subscriber::registry().with(filter);

    match settings.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn serve<S: Storage + Clone + 'static>(storage: S, settings: Settings) -> anyhow::Result<()> {
    let addr = settings.bind_addr;
    let state = Arc::new(AppState::new(storage, settings)?);
    let app = create_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
            tracing::info!("shutting down");
        })
        .await?;
    Ok(())
}

async fn run(settings: Settings) -> anyhow::Result<()> {
    match settings.storage {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; data is lost on restart");
            serve(MemoryStorage::new(), settings).await
        },
        StorageBackend::File => {
            let storage = FlatFileStorage::new(&settings.data_dir)
                .with_context(|| format!("failed to open {}", settings.data_dir.display()))?;
            serve(storage, settings).await
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let mut settings = match Settings::load(args.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // No subscriber yet; this must still reach the operator.
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        },
    };
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }
    if let Some(dir) = args.data_dir {
        settings.data_dir = dir;
    }
    if let Some(storage) = args.storage {
        settings.storage = storage;
    }

    init_tracing(&settings);

    match run(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = ?e, "server failed");
            ExitCode::FAILURE
        },
    }
}
