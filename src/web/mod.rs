//! HTTP surface: meme generation, caption/story analysis and a health check.

use std::num::NonZeroU16;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use crate::genai::TextGenerator;
use crate::prompts::{TonePicker, random_tone_picker};
use crate::render::MemeRenderer;

mod analyze;
mod images;
mod meme;
mod prelude;

use analyze::analyze_handler;
use meme::generate_meme_handler;

/// Shared, read-only state for every request.
#[derive(Clone)]
pub struct AppState {
    renderer: Arc<MemeRenderer>,
    generator: Arc<dyn TextGenerator>,
    tone_picker: TonePicker,
}

impl AppState {
    /// Bundles the renderer, the text generator and the tone picker.
    pub fn new(
        renderer: MemeRenderer,
        generator: Arc<dyn TextGenerator>,
        tone_picker: TonePicker,
    ) -> Self {
        Self {
            renderer: Arc::new(renderer),
            generator,
            tone_picker,
        }
    }
}

async fn healthz_handler() -> &'static str {
    "ok"
}

/// Builds the router, `max_upload_bytes` caps request bodies.
pub fn create_router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/generate-meme", axum::routing::post(generate_meme_handler))
        .route("/analyze", axum::routing::post(analyze_handler))
        .route("/healthz", axum::routing::get(healthz_handler))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}

/// Serves until Ctrl-C.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    max_upload_bytes: usize,
    renderer: MemeRenderer,
    generator: Arc<dyn TextGenerator>,
) -> Result<(), anyhow::Error> {
    let state = AppState::new(renderer, generator, random_tone_picker());
    let app = create_router(max_upload_bytes).with_state(state);

    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;
    use std::sync::Mutex;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header::CONTENT_TYPE};
    use base64::Engine;
    use base64::engine::general_purpose;
    use http_body_util::BodyExt;
    use image::{ImageFormat, Rgb, RgbImage};
    use tower::ServiceExt;

    use crate::constants::{BANNER_PADDING, DEFAULT_MAX_UPLOAD_BYTES};
    use crate::genai::{GenerateFuture, GenerationRequest};
    use crate::prompts::{Tone, fixed_tone_picker};
    use crate::render::MemeFont;

    const BOUNDARY: &str = "memeforge-test-boundary";
    const SOURCE_COLOR: Rgb<u8> = Rgb([30, 160, 90]);

    struct FakeGenerator {
        reply: Result<String, String>,
        seen: Mutex<Vec<GenerationRequest>>,
    }

    impl FakeGenerator {
        fn replying(reply: Result<&str, &str>) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.map(str::to_string).map_err(str::to_string),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn seen(&self) -> Vec<GenerationRequest> {
            self.seen.lock().expect("lock").clone()
        }
    }

    impl TextGenerator for FakeGenerator {
        fn generate(&self, request: GenerationRequest) -> GenerateFuture<'_> {
            self.seen.lock().expect("lock").push(request);
            let reply = self.reply.clone().map_err(|err| anyhow::anyhow!(err));
            Box::pin(async move { reply })
        }
    }

    fn app(generator: Arc<FakeGenerator>) -> Router {
        let renderer = MemeRenderer::new(MemeFont::bundled().expect("bundled font"));
        let state = AppState::new(renderer, generator, fixed_tone_picker(Tone::Wholesome));
        create_router(DEFAULT_MAX_UPLOAD_BYTES).with_state(state)
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_pixel(width, height, SOURCE_COLOR);
        let mut output = Cursor::new(Vec::new());
        image
            .write_to(&mut output, ImageFormat::Png)
            .expect("encode png");
        output.into_inner()
    }

    fn multipart_request(fields: &[(&str, &[u8])]) -> Request<Body> {
        let mut body = Vec::new();
        for (name, value) in fields {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            if *name == "image" {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"upload.png\"\r\n\
                         Content-Type: image/png\r\n\r\n"
                    )
                    .as_bytes(),
                );
            } else {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
            }
            body.extend_from_slice(value);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/generate-meme")
            .header(
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(value: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap()
    }

    async fn read_bytes(response: axum::response::Response) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes()
            .to_vec()
    }

    async fn read_body(response: axum::response::Response) -> String {
        String::from_utf8_lossy(&read_bytes(response).await).to_string()
    }

    #[tokio::test]
    async fn generate_meme_returns_png_with_banner_on_top() {
        let generator = FakeGenerator::replying(Ok("when the code works on the first try"));
        let upload = png_bytes(320, 200);
        let request = multipart_request(&[
            ("image", upload.as_slice()),
            ("font_size", b"30".as_slice()),
            ("font_color", b"#ff0".as_slice()),
            ("position", b"top".as_slice()),
        ]);

        let response = app(generator.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(CONTENT_TYPE).unwrap(), "image/png");

        let meme = image::load_from_memory(&read_bytes(response).await)
            .expect("decode meme")
            .to_rgb8();
        assert_eq!(meme.width(), 320);
        assert!(meme.height() > 200 + BANNER_PADDING);
        assert_eq!(meme.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(meme.get_pixel(0, meme.height() - 1), &SOURCE_COLOR);
        assert_eq!(meme.get_pixel(319, meme.height() - 200), &SOURCE_COLOR);

        let seen = generator.seen();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].mime_type, "image/png");
        assert_eq!(seen[0].image, upload);
        assert!(seen[0].prompt.contains("Make it wholesome."));
    }

    #[tokio::test]
    async fn generate_meme_uses_requested_tone() {
        let generator = FakeGenerator::replying(Ok("nope"));
        let upload = png_bytes(100, 100);
        let request = multipart_request(&[
            ("image", upload.as_slice()),
            ("tone", b"Sarcastic".as_slice()),
        ]);

        let response = app(generator.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(generator.seen()[0].prompt.contains("Make it sarcastic."));
    }

    #[tokio::test]
    async fn generate_meme_without_image_is_bad_request() {
        let generator = FakeGenerator::replying(Ok("unused"));
        let request = multipart_request(&[("tone", b"funny".as_slice())]);

        let response = app(generator.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(read_body(response).await, "No image provided.");
        assert!(generator.seen().is_empty());
    }

    #[tokio::test]
    async fn generate_meme_with_garbage_image_is_bad_request() {
        let generator = FakeGenerator::replying(Ok("unused"));
        let request =
            multipart_request(&[("image", b"definitely not a picture".as_slice())]);

        let response = app(generator.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(generator.seen().is_empty());
    }

    #[tokio::test]
    async fn generate_meme_with_no_text_fails() {
        let generator = FakeGenerator::replying(Ok("   "));
        let upload = png_bytes(100, 100);
        let request = multipart_request(&[("image", upload.as_slice())]);

        let response = app(generator).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(read_body(response).await, "No meme text generated.");
    }

    #[tokio::test]
    async fn generator_failure_is_bad_gateway() {
        let generator = FakeGenerator::replying(Err("quota exceeded"));
        let upload = png_bytes(100, 100);
        let request = multipart_request(&[("image", upload.as_slice())]);

        let response = app(generator).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn analyze_returns_two_captions() {
        let generator = FakeGenerator::replying(Ok("Monday mood\nCoffee first"));
        let encoded = general_purpose::STANDARD.encode(png_bytes(10, 10));
        let request = json_request(serde_json::json!({
            "image": encoded,
            "type": "caption",
            "tone": "witty",
            "context": "mornings",
            "hashtags": true,
        }));

        let response = app(generator.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_slice(&read_bytes(response).await).expect("json");
        assert_eq!(body["caption1"], "Monday mood");
        assert_eq!(body["caption2"], "Coffee first");

        let seen = generator.seen();
        assert!(seen[0].prompt.contains("in a witty tone about mornings"));
        assert!(seen[0].prompt.contains("hashtags"));
        assert_eq!(seen[0].mime_type, "image/png");
    }

    #[tokio::test]
    async fn analyze_story_has_title() {
        let generator = FakeGenerator::replying(Ok("Once upon a time."));
        let request = json_request(serde_json::json!({
            "image": general_purpose::STANDARD.encode(png_bytes(10, 10)),
            "type": "story",
            "tone": "dark",
        }));

        let response = app(generator).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_slice(&read_bytes(response).await).expect("json");
        assert_eq!(body["story_title"], "A Dark Story");
        assert_eq!(body["story"], "Once upon a time.");
    }

    #[tokio::test]
    async fn analyze_empty_description_fails() {
        let generator = FakeGenerator::replying(Ok(""));
        let request = json_request(serde_json::json!({
            "image": general_purpose::STANDARD.encode(png_bytes(10, 10)),
            "type": "describe",
        }));

        let response = app(generator).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value =
            serde_json::from_slice(&read_bytes(response).await).expect("json");
        assert_eq!(body["error"], "No description generated");
    }

    #[tokio::test]
    async fn analyze_empty_story_is_json_error() {
        let generator = FakeGenerator::replying(Ok("  "));
        let request = json_request(serde_json::json!({
            "image": general_purpose::STANDARD.encode(png_bytes(10, 10)),
            "type": "story",
            "tone": "wholesome",
        }));

        let response = app(generator).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers().get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body: serde_json::Value =
            serde_json::from_slice(&read_bytes(response).await).expect("json");
        assert_eq!(body, serde_json::json!({ "error": "No story generated" }));
    }

    #[tokio::test]
    async fn analyze_without_image_is_bad_request() {
        let generator = FakeGenerator::replying(Ok("unused"));
        let request = json_request(serde_json::json!({ "type": "caption" }));

        let response = app(generator.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value =
            serde_json::from_slice(&read_bytes(response).await).expect("json");
        assert_eq!(body["error"], "No image provided");
        assert!(generator.seen().is_empty());
    }

    #[tokio::test]
    async fn analyze_malformed_json_is_json_error() {
        let generator = FakeGenerator::replying(Ok("unused"));
        let request = Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app(generator).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value =
            serde_json::from_slice(&read_bytes(response).await).expect("json");
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn healthz_is_ok() {
        let generator = FakeGenerator::replying(Ok("unused"));
        let request = Request::builder()
            .method("GET")
            .uri("/healthz")
            .body(Body::empty())
            .unwrap();

        let response = app(generator).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(read_body(response).await, "ok");
    }
}
