//! NoteCraft server binary: loads configuration, wires the Gemini client, placeholder
//! transcriber, and upload store into one `StudyService`, and serves the router. Without an
//! explicit port it takes the first free one in 8000-8099, the range the front-end dev proxy
//! scans.

use anyhow::Context;
use clap::Parser;
use notecraft::{
    api, config, logging,
    provider::GeminiClient,
    service::StudyService,
    storage::UploadStore,
    transcription::PlaceholderTranscriber,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

/// NoteCraft backend server.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Port to listen on (overrides `SERVER_PORT`).
    #[arg(long)]
    port: Option<u16>,
    /// Directory for uploaded audio (overrides `UPLOAD_DIR`).
    #[arg(long)]
    upload_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init_tracing();
    let config = config::init_config().context("Failed to load config from environment")?;

    let provider = GeminiClient::from_config(config).context("Failed to build Gemini client")?;
    let upload_dir = cli.upload_dir.unwrap_or_else(|| config.upload_dir.clone());
    let service = StudyService::new(
        Arc::new(provider),
        Arc::new(PlaceholderTranscriber),
        UploadStore::new(upload_dir),
    )
    .with_summary_model(config.gemini_summary_model.clone());
    let app = api::create_router(Arc::new(service), config.max_upload_bytes);

    let (listener, port) = bind_listener(cli.port.or(config.server_port))
        .await
        .context("Failed to bind listener")?;
    tracing::info!("Listening on http://0.0.0.0:{}", port);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn bind_listener(port: Option<u16>) -> Result<(TcpListener, u16), std::io::Error> {
    use std::net::Ipv4Addr;

    if let Some(port) = port {
        return TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map(|listener| (listener, port));
    }

    const PORT_RANGE: std::ops::RangeInclusive<u16> = 8000..=8099;
    for port in PORT_RANGE {
        match TcpListener::bind((Ipv4Addr::UNSPECIFIED, port)).await {
            Ok(listener) => {
                tracing::debug!(port, "Bound server port");
                return Ok((listener, port));
            }
            Err(err) if err.kind() == std::io::ErrorKind::AddrInUse => {
                tracing::debug!(port, "Port already in use; trying next");
                continue;
            }
            Err(err) => return Err(err),
        }
    }

    Err(std::io::Error::new(
        std::io::ErrorKind::AddrNotAvailable,
        "No available port found in range 8000-8099",
    ))
}
