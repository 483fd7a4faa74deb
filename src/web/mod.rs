//! HTTP surface: the generate-kit endpoint and static asset serving.

use std::num::NonZeroU16;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::extract::State;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tracing::{error, info};

use crate::constants::STATIC_URL_PREFIX;
use crate::error::KitError;
use crate::pipeline::{CampaignKit, CampaignRequest, run_ai_generation_pipeline};
use crate::services::{ImageSynthesis, TextGeneration};

/// Shared state for the request handlers.
#[derive(Clone)]
pub(crate) struct AppState {
    text: Arc<dyn TextGeneration>,
    image: Arc<dyn ImageSynthesis>,
    fetcher: reqwest::Client,
    asset_dir: PathBuf,
}

impl AppState {
    fn new(
        text: Arc<dyn TextGeneration>,
        image: Arc<dyn ImageSynthesis>,
        asset_dir: PathBuf,
    ) -> Self {
        Self {
            text,
            image,
            fetcher: reqwest::Client::new(),
            asset_dir,
        }
    }
}

async fn generate_kit_handler(
    State(state): State<AppState>,
    Json(request): Json<CampaignRequest>,
) -> Result<Json<CampaignKit>, KitError> {
    let kit = run_ai_generation_pipeline(
        state.text.as_ref(),
        state.image.as_ref(),
        &state.fetcher,
        &state.asset_dir,
        &request,
    )
    .await?;
    Ok(Json(kit))
}

fn create_router(asset_dir: &Path) -> Router<AppState> {
    Router::new()
        .route("/generate-kit", axum::routing::post(generate_kit_handler))
        .nest_service(STATIC_URL_PREFIX, ServeDir::new(asset_dir))
        .layer(CorsLayer::permissive())
}

/// Builds the router and serves it until the process exits.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    asset_dir: PathBuf,
    text: Arc<dyn TextGeneration>,
    image: Arc<dyn ImageSynthesis>,
) -> Result<(), anyhow::Error> {
    let state = AppState::new(text, image, asset_dir);
    let app = create_router(&state.asset_dir).with_state(state);

    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server error: {}", err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::anyhow;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header::CONTENT_TYPE, header::ORIGIN};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use crate::services::{FetchedImage, SynthesisRequest};

    #[derive(Default)]
    struct MockTextService {
        fail_text: bool,
        text_calls: AtomicUsize,
    }

    #[async_trait]
    impl TextGeneration for MockTextService {
        async fn generate_text(&self, _prompt: &str) -> Result<String, anyhow::Error> {
            self.text_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_text {
                return Err(anyhow!("text service unavailable"));
            }
            Ok("Light up Diwali with this dazzling suit set! 🪔".to_string())
        }

        async fn describe_image(
            &self,
            _prompt: &str,
            _image: &FetchedImage,
        ) -> Result<String, anyhow::Error> {
            Ok("a white suit set with gold embroidery".to_string())
        }
    }

    #[derive(Default)]
    struct MockImageService {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ImageSynthesis for MockImageService {
        async fn synthesize(&self, _request: &SynthesisRequest) -> Result<Vec<u8>, anyhow::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(tiny_png())
        }
    }

    fn tiny_png() -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            1,
            1,
            image::Rgb([30, 60, 200]),
        ));
        let mut bytes = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
            .expect("encode png");
        bytes
    }

    async fn spawn_image_host(status: StatusCode, body: Vec<u8>) -> String {
        let app = Router::new().route(
            "/product.jpg",
            axum::routing::get(move || async move { (status, body) }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        format!("http://{}/product.jpg", addr)
    }

    fn kit_request(image_url: &str) -> CampaignRequest {
        CampaignRequest {
            product_image_url: image_url.to_string(),
            product_name: "Embroidery White Suit Set".to_string(),
            event_name: "Diwali".to_string(),
            location: "Delhi".to_string(),
        }
    }

    fn post_generate_kit(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/generate-kit")
            .header(CONTENT_TYPE, "application/json")
            .header(ORIGIN, "http://localhost:5173")
            .body(Body::from(body))
            .expect("build request")
    }

    async fn read_body(response: axum::response::Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes()
            .to_vec()
    }

    #[tokio::test]
    async fn generate_kit_returns_both_artifacts() {
        let image_url = spawn_image_host(StatusCode::OK, tiny_png()).await;
        let text = Arc::new(MockTextService::default());
        let image_service = Arc::new(MockImageService::default());
        let asset_dir = tempfile::tempdir().expect("tempdir");
        let state = AppState::new(
            text.clone(),
            image_service.clone(),
            asset_dir.path().to_path_buf(),
        );
        let app = create_router(asset_dir.path()).with_state(state);

        let body = serde_json::to_vec(&kit_request(&image_url)).expect("serialize request");
        let response = app
            .clone()
            .oneshot(post_generate_kit(body))
            .await
            .expect("send request");

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("access-control-allow-origin"));
        let kit: CampaignKit =
            serde_json::from_slice(&read_body(response).await).expect("parse kit");
        assert!(!kit.generated_ad_copy.is_empty());
        assert!(kit.generated_image_url.starts_with("/static/"));

        // The returned URL must be servable by the same router.
        let asset_request = Request::builder()
            .method("GET")
            .uri(&kit.generated_image_url)
            .body(Body::empty())
            .expect("build asset request");
        let asset_response = app.oneshot(asset_request).await.expect("fetch asset");
        assert_eq!(asset_response.status(), StatusCode::OK);
        let asset = read_body(asset_response).await;
        assert_eq!(
            image::guess_format(&asset).expect("detect format"),
            image::ImageFormat::Jpeg
        );
    }

    #[tokio::test]
    async fn missing_field_is_rejected_before_any_service_call() {
        let text = Arc::new(MockTextService::default());
        let image_service = Arc::new(MockImageService::default());
        let asset_dir = tempfile::tempdir().expect("tempdir");
        let state = AppState::new(
            text.clone(),
            image_service.clone(),
            asset_dir.path().to_path_buf(),
        );
        let app = create_router(asset_dir.path()).with_state(state);

        let body = br#"{"product_name": "Embroidery White Suit Set"}"#.to_vec();
        let response = app
            .oneshot(post_generate_kit(body))
            .await
            .expect("send request");

        assert!(response.status().is_client_error());
        assert_eq!(text.text_calls.load(Ordering::SeqCst), 0);
        assert_eq!(image_service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn stage_failure_maps_to_500_with_error_and_details() {
        let text = Arc::new(MockTextService {
            fail_text: true,
            ..Default::default()
        });
        let image_service = Arc::new(MockImageService::default());
        let asset_dir = tempfile::tempdir().expect("tempdir");
        let state = AppState::new(
            text.clone(),
            image_service.clone(),
            asset_dir.path().to_path_buf(),
        );
        let app = create_router(asset_dir.path()).with_state(state);

        let body =
            serde_json::to_vec(&kit_request("http://127.0.0.1:9/unreachable.jpg"))
                .expect("serialize request");
        let response = app
            .oneshot(post_generate_kit(body))
            .await
            .expect("send request");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let error: serde_json::Value =
            serde_json::from_slice(&read_body(response).await).expect("parse error body");
        assert_eq!(error["error"], "Failed to generate ad copy.");
        assert!(
            error["details"]
                .as_str()
                .expect("details string")
                .contains("text service unavailable")
        );
        assert_eq!(image_service.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn static_route_serves_the_asset_dir() {
        let text = Arc::new(MockTextService::default());
        let image_service = Arc::new(MockImageService::default());
        let asset_dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(asset_dir.path().join("campaign_test_0.jpg"), b"jpeg bytes")
            .expect("write asset");
        let state = AppState::new(text, image_service, asset_dir.path().to_path_buf());
        let app = create_router(asset_dir.path()).with_state(state);

        let request = Request::builder()
            .method("GET")
            .uri("/static/campaign_test_0.jpg")
            .body(Body::empty())
            .expect("build request");
        let response = app.oneshot(request).await.expect("send request");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_body(response).await, b"jpeg bytes");
    }
}
