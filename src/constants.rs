//! Shared constants for the campaignkit service.
//!

/// Default directory generated assets are written to and served from.
pub const DEFAULT_ASSET_DIR: &str = "./generated_assets";

/// URL prefix the generated assets are served under.
pub const STATIC_URL_PREFIX: &str = "/static";

/// Browser-like user agent for product image fetches.
pub const IMAGE_FETCH_USER_AGENT: &str = "Mozilla/5.0";

/// Negative prompt sent with every synthesis request.
pub const SYNTHESIS_NEGATIVE_PROMPT: &str = "blurry, watermark, bad anatomy";

/// Target width in pixels for synthesized campaign images.
pub const SYNTHESIS_IMAGE_WIDTH: u32 = 512;

/// Target height in pixels for synthesized campaign images.
pub const SYNTHESIS_IMAGE_HEIGHT: u32 = 512;

/// Default Gemini model for ad copy and image description.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-1.5-flash-latest";

/// Default Hugging Face model for image synthesis.
pub const DEFAULT_IMAGE_MODEL: &str = "stabilityai/sdxl-turbo";

/// Base URL of the Gemini REST API.
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Base URL of the Hugging Face model inference API.
pub const HF_INFERENCE_API_BASE: &str = "https://api-inference.huggingface.co/models";
