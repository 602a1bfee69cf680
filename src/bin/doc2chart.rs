//! CLI binary for doc2chart.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ServerConfig` and runs the HTTP server.

use anyhow::{Context, Result};
use clap::Parser;
use doc2chart::{server, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Turn table-bearing documents into bucketed charts over HTTP.
#[derive(Debug, Parser)]
#[command(name = "doc2chart", version, about)]
struct Cli {
    /// Address to listen on.
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Directory for generated report artifacts.
    /// Defaults to a doc2chart directory under the system temp dir.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// How long report artifacts stay downloadable, in seconds.
    #[arg(long, default_value_t = 3600)]
    retention_secs: u64,

    /// Maximum accepted upload size, in mebibytes.
    #[arg(long, default_value_t = 10)]
    max_upload_mb: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut builder = ServerConfig::builder()
        .retention(Duration::from_secs(cli.retention_secs))
        .max_upload_bytes(cli.max_upload_mb * 1024 * 1024);
    if let Some(dir) = cli.output_dir {
        builder = builder.output_root(dir);
    }
    let config = builder.build().context("invalid configuration")?;

    server::serve(cli.bind, config)
        .await
        .context("server exited with an error")?;
    Ok(())
}
