//! Clients for the remote generative services.
//!
//! The pipeline only sees the two traits here; the production
//! implementations live in the submodules and tests substitute mocks.

use async_trait::async_trait;

pub mod gemini;
pub mod huggingface;

pub use gemini::GeminiClient;
pub use huggingface::HuggingFaceClient;

/// A downloaded product photo with its detected content type.
#[derive(Clone, Debug)]
pub struct FetchedImage {
    /// Raw image bytes as fetched.
    pub bytes: Vec<u8>,
    /// MIME type detected from the image format.
    pub mime_type: &'static str,
}

/// What gets sent to the image-synthesis service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SynthesisRequest {
    /// Full positive prompt.
    pub prompt: String,
    /// Things the model must avoid.
    pub negative_prompt: &'static str,
    /// Target width in pixels.
    pub width: u32,
    /// Target height in pixels.
    pub height: u32,
}

/// Prompt-in, text-out generation, with or without an attached image.
#[async_trait]
pub trait TextGeneration: Send + Sync {
    /// Generate text from a plain prompt.
    async fn generate_text(&self, prompt: &str) -> Result<String, anyhow::Error>;

    /// Describe an image, guided by a prompt.
    async fn describe_image(
        &self,
        prompt: &str,
        image: &FetchedImage,
    ) -> Result<String, anyhow::Error>;
}

/// Prompt-in, raster-out image generation.
#[async_trait]
pub trait ImageSynthesis: Send + Sync {
    /// Generate image bytes for the request.
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>, anyhow::Error>;
}
