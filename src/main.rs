use std::sync::Arc;

use campaignkit::config::setup_logging;
use clap::Parser;
use tracing::error;

#[tokio::main(flavor = "multi_thread", worker_threads = 32)]
async fn main() {
    let cli = campaignkit::cli::CliOptions::parse();

    if let Err(err) = setup_logging(cli.debug) {
        eprintln!("Logging setup error: {}", err);
        return;
    }

    if let Err(err) = std::fs::create_dir_all(&cli.asset_dir) {
        error!(
            "Failed to create asset directory {}: {}",
            cli.asset_dir.display(),
            err
        );
        return;
    }

    let client = reqwest::Client::new();
    let text = Arc::new(campaignkit::services::GeminiClient::new(
        client.clone(),
        cli.google_api_key,
        cli.text_model,
    ));
    let image = Arc::new(campaignkit::services::HuggingFaceClient::new(
        client,
        cli.huggingface_api_token,
        cli.image_model,
    ));

    if let Err(err) =
        campaignkit::web::setup_server(&cli.listen_address, cli.port, cli.asset_dir, text, image)
            .await
    {
        error!("Application error: {}", err);
    }
}
