//! Hugging Face model inference client for text-to-image synthesis.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{ImageSynthesis, SynthesisRequest};
use crate::constants::HF_INFERENCE_API_BASE;

/// Client for the Hugging Face model inference API.
#[derive(Clone, Debug)]
pub struct HuggingFaceClient {
    client: reqwest::Client,
    api_token: String,
    model: String,
}

/// Request body for POST /models/{model}
/// Docs: https://huggingface.co/docs/api-inference/tasks/text-to-image
#[derive(Serialize, Debug)]
struct TextToImageRequest<'a> {
    inputs: &'a str,
    parameters: TextToImageParameters<'a>,
}

#[derive(Serialize, Debug)]
struct TextToImageParameters<'a> {
    negative_prompt: &'a str,
    width: u32,
    height: u32,
}

/// Error body the inference API returns instead of image bytes.
#[derive(Deserialize, Debug)]
struct InferenceErrorResponse {
    error: serde_json::Value,
}

impl HuggingFaceClient {
    /// Build a client for the given model.
    pub fn new(
        client: reqwest::Client,
        api_token: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_token: api_token.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl ImageSynthesis for HuggingFaceClient {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<Vec<u8>> {
        let req_body = TextToImageRequest {
            inputs: &request.prompt,
            parameters: TextToImageParameters {
                negative_prompt: request.negative_prompt,
                width: request.width,
                height: request.height,
            },
        };

        let url = format!("{}/{}", HF_INFERENCE_API_BASE, self.model);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(&req_body)
            .send()
            .await
            .context("Request to the inference API failed")?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .context("Failed reading inference API response body")?;

        if !status.is_success() {
            if let Ok(parsed) = serde_json::from_slice::<InferenceErrorResponse>(&bytes) {
                return Err(anyhow!("Inference API error {status}: {}", parsed.error));
            }
            return Err(anyhow!(
                "Inference API error {status}: {}",
                String::from_utf8_lossy(&bytes)
            ));
        }

        Ok(bytes.to_vec())
    }
}
