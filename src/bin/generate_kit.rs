use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use campaignkit::constants::{DEFAULT_ASSET_DIR, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};
use campaignkit::pipeline::{CampaignRequest, run_ai_generation_pipeline};
use campaignkit::services::{GeminiClient, HuggingFaceClient};
use clap::Parser;

/// Run the campaign generation pipeline once from the command line.
///
/// Minimal UX:
///   generate_kit <image-url> "Embroidery White Suit Set" Diwali Delhi
#[derive(Parser, Debug)]
#[command(name = "generate_kit")]
#[command(about = "Generate a single campaign kit and print it as JSON")]
struct Args {
    /// URL of the product photo
    product_image_url: String,

    /// Product being promoted
    product_name: String,

    /// Festival or occasion the campaign targets
    event_name: String,

    /// City or region the campaign targets
    location: String,

    /// Gemini API key
    #[arg(required = true, long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    google_api_key: String,

    /// Hugging Face API token
    #[arg(
        required = true,
        long,
        env = "HUGGINGFACEHUB_API_TOKEN",
        hide_env_values = true
    )]
    huggingface_api_token: String,

    /// Gemini model for ad copy and image description
    #[arg(long, default_value = DEFAULT_TEXT_MODEL)]
    text_model: String,

    /// Hugging Face model for image synthesis
    #[arg(long, default_value = DEFAULT_IMAGE_MODEL)]
    image_model: String,

    /// Output directory for the generated image
    #[arg(long, default_value = DEFAULT_ASSET_DIR, env = "CAMPAIGNKIT_ASSET_DIR")]
    asset_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    std::fs::create_dir_all(&args.asset_dir)
        .with_context(|| format!("Failed to create {}", args.asset_dir.display()))?;

    let client = reqwest::Client::new();
    let text = GeminiClient::new(client.clone(), args.google_api_key, args.text_model);
    let image = HuggingFaceClient::new(
        client.clone(),
        args.huggingface_api_token,
        args.image_model,
    );

    let request = CampaignRequest {
        product_image_url: args.product_image_url,
        product_name: args.product_name,
        event_name: args.event_name,
        location: args.location,
    };

    let kit = run_ai_generation_pipeline(&text, &image, &client, &args.asset_dir, &request)
        .await
        .map_err(|err| anyhow!("{} {}", err.message(), err.details()))?;

    println!(
        "{}",
        serde_json::to_string_pretty(&kit).context("Failed to serialize kit")?
    );
    eprintln!("Saved image under {}", args.asset_dir.display());
    Ok(())
}
