//! CLI parser
use std::num::NonZeroU16;
use std::path::PathBuf;

use clap::Parser;

use crate::constants::{DEFAULT_ASSET_DIR, DEFAULT_IMAGE_MODEL, DEFAULT_TEXT_MODEL};

#[derive(Parser, Debug)]
/// CLI Options
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "CAMPAIGNKIT_DEBUG")]
    /// Enable debug logging. Env: CAMPAIGNKIT_DEBUG
    pub debug: bool,
    #[clap(long, short, default_value = "8000", env = "CAMPAIGNKIT_PORT")]
    /// http listener port, defaults to `8000`.
    /// Env: CAMPAIGNKIT_PORT
    pub port: NonZeroU16,
    #[clap(
        long,
        short,
        default_value = "127.0.0.1",
        env = "CAMPAIGNKIT_LISTEN_ADDRESS"
    )]
    /// Listen address, defaults to `127.0.0.1`.
    /// Env: CAMPAIGNKIT_LISTEN_ADDRESS
    pub listen_address: String,
    #[clap(required = true, long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    /// Gemini API key, required. Env: GOOGLE_API_KEY
    pub google_api_key: String,
    #[clap(
        required = true,
        long,
        env = "HUGGINGFACEHUB_API_TOKEN",
        hide_env_values = true
    )]
    /// Hugging Face API token, required. Env: HUGGINGFACEHUB_API_TOKEN
    pub huggingface_api_token: String,
    #[clap(long, default_value = DEFAULT_ASSET_DIR, env = "CAMPAIGNKIT_ASSET_DIR")]
    /// Directory generated images are written to and served from.
    /// Env: CAMPAIGNKIT_ASSET_DIR
    pub asset_dir: PathBuf,
    #[clap(long, default_value = DEFAULT_TEXT_MODEL, env = "CAMPAIGNKIT_TEXT_MODEL")]
    /// Gemini model used for ad copy and image description.
    /// Env: CAMPAIGNKIT_TEXT_MODEL
    pub text_model: String,
    #[clap(long, default_value = DEFAULT_IMAGE_MODEL, env = "CAMPAIGNKIT_IMAGE_MODEL")]
    /// Hugging Face model used for image synthesis.
    /// Env: CAMPAIGNKIT_IMAGE_MODEL
    pub image_model: String,
}
