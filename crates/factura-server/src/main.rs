use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::extract::DefaultBodyLimit;
use clap::Parser;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use factura_core::extraction::pdfium::PdfiumWordExtractor;
use factura_server::fields::OpenAiFieldExtractor;
use factura_server::{router, AppState};

#[derive(Parser)]
#[command(
    name = "factura-server",
    version,
    about = "Turns electricity-bill PDFs into structured spreadsheets"
)]
struct Cli {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8000")]
    bind: String,

    /// Extraction model id
    #[arg(long, default_value = "gpt-4-0125-preview")]
    model: String,

    /// Request timeout for the model call, in seconds
    #[arg(long, default_value_t = 120)]
    timeout_seconds: u64,

    /// Maximum upload size in megabytes
    #[arg(long, default_value_t = 25)]
    body_limit_mb: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    // the one required credential; refusing to start beats failing per request
    let api_key =
        std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY must be set in the environment")?;

    let state = AppState {
        extractor: Arc::new(PdfiumWordExtractor::new()),
        fields: Arc::new(OpenAiFieldExtractor::new(
            api_key,
            cli.model,
            Duration::from_secs(cli.timeout_seconds),
        )?),
    };

    let app = router(state)
        .layer(DefaultBodyLimit::max(cli.body_limit_mb * 1024 * 1024))
        .layer(CorsLayer::permissive());

    let listener = tokio::net::TcpListener::bind(&cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;
    tracing::info!("listening on {}", cli.bind);

    axum::serve(listener, app).await?;

    Ok(())
}
