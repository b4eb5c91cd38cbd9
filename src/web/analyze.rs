use axum::Json;
use axum::extract::rejection::JsonRejection;
use base64::Engine;
use base64::engine::general_purpose;
use serde_json::{Value, json};
use tracing::instrument;

use super::prelude::*;
use crate::error::JsonError;

/// What the caller wants back from `/analyze`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum AnalyzeKind {
    Caption,
    Story,
    Description,
}

impl AnalyzeKind {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "caption" => AnalyzeKind::Caption,
            "story" => AnalyzeKind::Story,
            _ => AnalyzeKind::Description,
        }
    }
}

fn default_kind() -> String {
    "caption".to_string()
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeRequest {
    #[serde(default)]
    image: Option<String>,
    #[serde(rename = "type", default = "default_kind")]
    kind: String,
    #[serde(default)]
    tone: String,
    #[serde(default)]
    context: String,
    #[serde(default)]
    hashtags: bool,
}

/// Accepts raw base64 or a `data:<mime>;base64,` URL.
fn decode_image(raw: &str) -> Result<Vec<u8>, MemeError> {
    let data = match raw.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => raw,
    };
    let bytes = general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|err| MemeError::BadRequest(format!("Image is not valid base64: {}", err)))?;
    if bytes.is_empty() {
        return Err(MemeError::BadRequest("No image provided".to_string()));
    }
    Ok(bytes)
}

/// handles POST /analyze
#[instrument(skip_all)]
pub(crate) async fn analyze_handler(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<Value>, JsonError> {
    let Json(request) = payload?;
    let encoded = request
        .image
        .as_deref()
        .filter(|encoded| !encoded.trim().is_empty())
        .ok_or_else(|| MemeError::BadRequest("No image provided".to_string()))?;
    let image_bytes = decode_image(encoded)?;
    let mime_type = image::guess_format(&image_bytes)
        .map(|format| format.to_mime_type())
        .unwrap_or("image/jpeg")
        .to_string();

    let kind = AnalyzeKind::parse(&request.kind);
    let prompt = match kind {
        AnalyzeKind::Caption => {
            prompts::caption_prompt(&request.tone, &request.context, request.hashtags)
        }
        AnalyzeKind::Story => prompts::story_prompt(&request.tone),
        AnalyzeKind::Description => prompts::description_prompt(),
    };

    let text = state
        .generator
        .generate(GenerationRequest {
            image: image_bytes,
            mime_type,
            prompt,
        })
        .await
        .map_err(|err| MemeError::Upstream(format!("{:#}", err)))?;

    match kind {
        AnalyzeKind::Caption => {
            let (caption1, caption2) = prompts::split_captions(&text);
            info!("Final captions sent: {:?} / {:?}", caption1, caption2);
            Ok(Json(json!({ "caption1": caption1, "caption2": caption2 })))
        }
        AnalyzeKind::Story => {
            if text.trim().is_empty() {
                return Err(MemeError::NoTextGenerated("No story generated").into());
            }
            Ok(Json(json!({
                "story_title": prompts::story_title(&request.tone),
                "story": text,
            })))
        }
        AnalyzeKind::Description => {
            if text.trim().is_empty() {
                return Err(MemeError::NoTextGenerated("No description generated").into());
            }
            Ok(Json(json!({ "result": text })))
        }
    }
}
