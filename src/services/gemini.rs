//! Gemini `generateContent` client, covering the text and vision calls.

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{FetchedImage, TextGeneration};
use crate::constants::GEMINI_API_BASE;

/// Client for the Gemini REST API.
///
/// One model serves both roles: plain text generation for ad copy, and
/// text+image input for product descriptions.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

// -----------------------------
// generateContent wire format
// Docs: https://ai.google.dev/api/generate-content
// -----------------------------

#[derive(Serialize, Debug)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize, Debug)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize, Debug)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize, Debug)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize, Debug)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiClient {
    /// Build a client for the given model.
    pub fn new(
        client: reqwest::Client,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    async fn generate_content(&self, parts: Vec<Part>) -> Result<String> {
        let req_body = GenerateContentRequest {
            contents: vec![Content { parts }],
        };

        let url = format!("{}/models/{}:generateContent", GEMINI_API_BASE, self.model);
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&req_body)
            .send()
            .await
            .context("Request to Gemini generateContent failed")?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .context("Failed reading Gemini response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "Gemini API error {status}: {}",
                String::from_utf8_lossy(&bytes)
            ));
        }

        let parsed: GenerateContentResponse =
            serde_json::from_slice(&bytes).context("Failed to parse Gemini response JSON")?;
        if let Some(err) = parsed.error {
            return Err(anyhow!("Gemini API returned error: {err}"));
        }

        parsed
            .candidates
            .into_iter()
            .flat_map(|candidate| candidate.content.into_iter())
            .flat_map(|content| content.parts)
            .find_map(|part| part.text)
            .ok_or_else(|| anyhow!("Gemini response contained no text part"))
    }
}

#[async_trait]
impl TextGeneration for GeminiClient {
    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let text = self
            .generate_content(vec![Part::Text {
                text: prompt.to_string(),
            }])
            .await?;
        Ok(text.trim().to_string())
    }

    async fn describe_image(&self, prompt: &str, image: &FetchedImage) -> Result<String> {
        let parts = vec![
            Part::Text {
                text: prompt.to_string(),
            },
            Part::InlineData {
                inline_data: InlineData {
                    mime_type: image.mime_type.to_string(),
                    data: general_purpose::STANDARD.encode(&image.bytes),
                },
            },
        ];
        let text = self.generate_content(parts).await?;
        Ok(text.trim().to_string())
    }
}
