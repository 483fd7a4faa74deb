//! Error handling

use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::error;

/// Pipeline failures for the campaignkit application, one variant per
/// generation stage.
#[derive(Debug)]
pub enum KitError {
    /// The text service failed while generating ad copy
    AdCopy(anyhow::Error),
    /// Fetching, decoding, or describing the product image failed
    ImageAnalysis(anyhow::Error),
    /// The image service failed, or the result could not be stored
    ImageGeneration(anyhow::Error),
}

impl KitError {
    /// Fixed, stage-identifying message reported to the caller.
    pub fn message(&self) -> &'static str {
        match self {
            KitError::AdCopy(_) => "Failed to generate ad copy.",
            KitError::ImageAnalysis(_) => "Failed to analyze product image.",
            KitError::ImageGeneration(_) => "Failed to generate model image.",
        }
    }

    /// Underlying error text, including any context chain.
    pub fn details(&self) -> String {
        match self {
            KitError::AdCopy(err)
            | KitError::ImageAnalysis(err)
            | KitError::ImageGeneration(err) => format!("{err:#}"),
        }
    }
}

impl IntoResponse for KitError {
    fn into_response(self) -> axum::response::Response {
        let message = self.message();
        let details = self.details();
        error!("{} {}", message, details);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": message, "details": details })),
        )
            .into_response()
    }
}
