use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use memeforge::config::setup_logging;
use memeforge::constants::DEFAULT_MAX_UPLOAD_BYTES;
use memeforge::genai::GeminiClient;
use memeforge::render::MemeRenderer;
use tracing::{error, info};

#[tokio::main(flavor = "multi_thread")]
async fn main() {
    let cli = memeforge::cli::CliOptions::parse();

    if setup_logging(cli.debug).is_err() {
        return;
    }

    let renderer = match MemeRenderer::load(&cli.font_path) {
        Ok(renderer) => renderer,
        Err(err) => {
            error!("Font error: {}", err);
            return;
        }
    };
    info!("Using font {:?}", renderer.font().source());

    let generator = match GeminiClient::new(
        &cli.api_key,
        &cli.api_base,
        &cli.model,
        Duration::from_secs(cli.timeout_secs),
    ) {
        Ok(client) => client,
        Err(err) => {
            error!("Failed to set up Gemini client: {:#}", err);
            return;
        }
    };
    info!("Using model {}", generator.model());

    if let Err(err) = memeforge::web::setup_server(
        &cli.listen_address,
        cli.port,
        cli.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
        renderer,
        Arc::new(generator),
    )
    .await
    {
        error!("Application error: {}", err);
    }
}
