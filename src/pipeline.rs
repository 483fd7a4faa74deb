//! The three-stage campaign generation pipeline.
//!
//! Ad copy, then product image description, then image synthesis. Each
//! stage runs once; the first failure aborts the run with its stage's
//! error kind and nothing is retried.

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use tracing::info;
use url::Url;

use crate::constants::{
    IMAGE_FETCH_USER_AGENT, STATIC_URL_PREFIX, SYNTHESIS_IMAGE_HEIGHT, SYNTHESIS_IMAGE_WIDTH,
    SYNTHESIS_NEGATIVE_PROMPT,
};
use crate::error::KitError;
use crate::services::{FetchedImage, ImageSynthesis, SynthesisRequest, TextGeneration};

/// A request for one campaign kit.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CampaignRequest {
    /// Where to fetch the product photo from.
    pub product_image_url: String,
    /// Product being promoted.
    pub product_name: String,
    /// Festival or occasion the campaign targets.
    pub event_name: String,
    /// City or region the campaign targets.
    pub location: String,
}

/// The generated marketing assets.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CampaignKit {
    /// URL of the generated campaign image, under the static prefix.
    pub generated_image_url: String,
    /// Generated marketing message.
    pub generated_ad_copy: String,
}

/// Prompt for the ad-copy stage.
pub fn ad_copy_prompt(request: &CampaignRequest) -> String {
    format!(
        "You are a skilled marketing copywriter for an online marketplace. \
         Write one short, exciting WhatsApp marketing message for a '{}'. \
         The campaign is for {} in {}. Include an emoji. Output ONLY the message.",
        request.product_name, request.event_name, request.location
    )
}

/// Prompt for the image-description stage.
pub const VISION_PROMPT: &str = "You are an AI assistant. Look at this image of a clothing item. \
     Describe it in a short, descriptive phrase suitable for a text-to-image AI prompt. \
     Focus on the style, color, and any visible patterns. \
     Example: 'a blue silk kurta with white floral embroidery'. Just output the phrase.";

/// Prompt for the synthesis stage, built around the vision description.
pub fn synthesis_prompt(description: &str, request: &CampaignRequest) -> String {
    format!(
        "cinematic photo of a happy young indian woman wearing ({description}). \
         She is celebrating the {} festival in {}. \
         festive background, hyperrealistic, detailed, professional photo, 8k",
        request.event_name, request.location
    )
}

/// Downloads the product photo and validates that it decodes as an image.
async fn fetch_product_image(
    client: &reqwest::Client,
    image_url: &str,
) -> Result<FetchedImage, anyhow::Error> {
    let image_url = Url::parse(image_url).context("Invalid product image URL")?;

    let resp = client
        .get(image_url)
        .header(reqwest::header::USER_AGENT, IMAGE_FETCH_USER_AGENT)
        .send()
        .await
        .context("Product image request failed")?;

    let status = resp.status();
    let bytes = resp
        .bytes()
        .await
        .context("Failed reading product image body")?;
    if !status.is_success() {
        return Err(anyhow!("Product image fetch returned {status}"));
    }

    let format = image::guess_format(&bytes).context("Could not detect product image format")?;
    image::load_from_memory_with_format(&bytes, format)
        .context("Product image failed to decode")?;

    Ok(FetchedImage {
        bytes: bytes.to_vec(),
        mime_type: format.to_mime_type(),
    })
}

fn reencode_jpeg(raster: &[u8]) -> Result<Vec<u8>, anyhow::Error> {
    let decoded = image::load_from_memory(raster).context("Generated image failed to decode")?;
    let mut jpeg = Vec::new();
    decoded
        .write_to(&mut std::io::Cursor::new(&mut jpeg), image::ImageFormat::Jpeg)
        .context("Failed to encode campaign image as JPEG")?;
    Ok(jpeg)
}

/// Writes the campaign image under a process-unique filename and returns
/// the filename.
fn write_campaign_image(asset_dir: &Path, jpeg_bytes: &[u8]) -> Result<String, anyhow::Error> {
    static ASSET_SEQ: AtomicUsize = AtomicUsize::new(0);
    let seq = ASSET_SEQ.fetch_add(1, Ordering::Relaxed);
    let filename = format!(
        "campaign_{}_{seq}.jpg",
        chrono::Utc::now().format("%Y%m%d%H%M%S")
    );
    let path = asset_dir.join(&filename);
    std::fs::write(&path, jpeg_bytes)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(filename)
}

async fn generate_ad_copy(
    text: &dyn TextGeneration,
    request: &CampaignRequest,
) -> Result<String, KitError> {
    info!("Generating ad copy for '{}'", request.product_name);
    text.generate_text(&ad_copy_prompt(request))
        .await
        .map_err(KitError::AdCopy)
}

async fn describe_product_image(
    text: &dyn TextGeneration,
    client: &reqwest::Client,
    image_url: &str,
) -> Result<String, KitError> {
    info!("Analyzing product image");
    let product_image = fetch_product_image(client, image_url)
        .await
        .map_err(KitError::ImageAnalysis)?;
    text.describe_image(VISION_PROMPT, &product_image)
        .await
        .map_err(KitError::ImageAnalysis)
}

async fn synthesize_campaign_image(
    image: &dyn ImageSynthesis,
    asset_dir: &Path,
    description: &str,
    request: &CampaignRequest,
) -> Result<String, KitError> {
    let synthesis = SynthesisRequest {
        prompt: synthesis_prompt(description, request),
        negative_prompt: SYNTHESIS_NEGATIVE_PROMPT,
        width: SYNTHESIS_IMAGE_WIDTH,
        height: SYNTHESIS_IMAGE_HEIGHT,
    };
    info!("Generating campaign image");
    let raster = image
        .synthesize(&synthesis)
        .await
        .map_err(KitError::ImageGeneration)?;
    let jpeg = reencode_jpeg(&raster).map_err(KitError::ImageGeneration)?;
    let filename = write_campaign_image(asset_dir, &jpeg).map_err(KitError::ImageGeneration)?;
    Ok(format!("{STATIC_URL_PREFIX}/{filename}"))
}

/// Runs the ad-copy, image-description, and image-synthesis stages in
/// order. The description from the second stage feeds the third stage's
/// prompt; the first failure aborts the run.
pub async fn run_ai_generation_pipeline(
    text: &dyn TextGeneration,
    image: &dyn ImageSynthesis,
    client: &reqwest::Client,
    asset_dir: &Path,
    request: &CampaignRequest,
) -> Result<CampaignKit, KitError> {
    info!(
        "Starting campaign generation for '{}'",
        request.product_name
    );

    let generated_ad_copy = generate_ad_copy(text, request).await?;
    let description =
        describe_product_image(text, client, &request.product_image_url).await?;
    let generated_image_url =
        synthesize_campaign_image(image, asset_dir, &description, request).await?;

    info!("Campaign generation complete");
    Ok(CampaignKit {
        generated_image_url,
        generated_ad_copy,
    })
}
