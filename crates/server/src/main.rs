//! `registro` binary: configure storage and serve the form.

use anyhow::{Context, Result};
use clap::Parser;
use registro_core::{AppConfig, StorageResult, DEFAULT_SECRETS_PATH};
use registro_drive::DEFAULT_TIMEOUT_SECS;
use registro_server::{create_router, Backend};
use registro_storage::{DriveExcelStorage, RecordStore};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "registro")]
#[command(author, version, about = "Contact form backed by an Excel workbook on Google Drive", long_about = None)]
struct Cli {
    /// Address to listen on
    #[arg(short, long, env = "REGISTRO_BIND", default_value = "0.0.0.0:8501")]
    bind: String,

    /// Secrets file holding a [drive] table
    #[arg(long, env = "REGISTRO_SECRETS", default_value = DEFAULT_SECRETS_PATH)]
    secrets: PathBuf,

    /// Timeout for each Drive request, in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout_secs: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

async fn connect(secrets: &Path, timeout_secs: u64) -> StorageResult<Arc<dyn RecordStore>> {
    let config = AppConfig::resolve(secrets)?;
    let storage = DriveExcelStorage::connect(&config, timeout_secs).await?;
    Ok(Arc::new(storage))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let backend = match connect(&cli.secrets, cli.timeout_secs).await {
        Ok(store) => Backend::Ready(store),
        Err(e) => {
            tracing::error!(error = %e, "storage is not configured, serving the error page only");
            Backend::Unavailable(e.to_string().into())
        }
    };

    let listener = tokio::net::TcpListener::bind(&cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    tracing::info!(addr = %cli.bind, "registro listening");

    axum::serve(listener, create_router(backend)).await?;
    Ok(())
}
