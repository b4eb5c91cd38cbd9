//! Text generation from an image and a prompt
//!
//! Handlers only see [`TextGenerator`]; [`GeminiClient`] is the production
//! implementation talking to the Gemini `generateContent` REST endpoint.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// What to send to the model.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    /// Raw image bytes.
    pub image: Vec<u8>,
    /// MIME type of `image`.
    pub mime_type: String,
    /// Instructions for the model.
    pub prompt: String,
}

/// Boxed future returned by [`TextGenerator::generate`].
pub type GenerateFuture<'a> = Pin<Box<dyn Future<Output = Result<String>> + Send + 'a>>;

/// Something that turns an image and a prompt into text.
pub trait TextGenerator: Send + Sync {
    /// Generates text. An empty string means the model had nothing to say.
    fn generate(&self, request: GenerationRequest) -> GenerateFuture<'_>;
}

/// Gemini REST client.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    model: String,
}

// -----------------------------
// generateContent wire types
// -----------------------------

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    InlineData { inline_data: InlineData<'a> },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

/// A model visible to the API key.
#[derive(Clone, Debug, Deserialize)]
pub struct ModelInfo {
    /// Resource name, eg `models/gemini-1.5-flash`.
    pub name: String,
    /// Methods the model supports, eg `generateContent`.
    #[serde(default, rename = "supportedGenerationMethods")]
    pub supported_generation_methods: Vec<String>,
}

impl GeminiClient {
    /// Builds a client; `timeout` bounds each request.
    pub fn new(api_key: &str, api_base: &str, model: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            api_base: api_base.trim_end_matches('/').to_string(),
            model: model.trim_start_matches("models/").to_string(),
        })
    }

    /// The model used for generation.
    pub fn model(&self) -> &str {
        &self.model
    }

    #[instrument(skip_all, fields(model = %self.model, mime_type = %request.mime_type))]
    async fn generate_content(&self, request: GenerationRequest) -> Result<String> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: &request.mime_type,
                            data: general_purpose::STANDARD.encode(&request.image),
                        },
                    },
                    Part::Text {
                        text: &request.prompt,
                    },
                ],
            }],
        };

        let url = format!("{}/models/{}:generateContent", self.api_base, self.model);
        let resp = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .context("Request to generateContent failed")?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .context("Failed reading generateContent body")?;
        if !status.is_success() {
            return Err(anyhow!(
                "Gemini API error {status}: {}",
                String::from_utf8_lossy(&bytes)
            ));
        }
        debug!("Gemini raw response: {}", String::from_utf8_lossy(&bytes));

        let parsed: GenerateContentResponse =
            serde_json::from_slice(&bytes).context("Failed to parse generateContent JSON")?;
        Ok(response_text(parsed))
    }

    /// Lists the models the API key can see.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let url = format!("{}/models", self.api_base);
        let resp = self
            .client
            .get(&url)
            .header("x-goog-api-key", &self.api_key)
            .send()
            .await
            .context("Request to list models failed")?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .context("Failed reading list models body")?;
        if !status.is_success() {
            return Err(anyhow!(
                "Gemini API error {status}: {}",
                String::from_utf8_lossy(&bytes)
            ));
        }
        let parsed: ListModelsResponse =
            serde_json::from_slice(&bytes).context("Failed to parse list models JSON")?;
        Ok(parsed.models)
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, request: GenerationRequest) -> GenerateFuture<'_> {
        Box::pin(self.generate_content(request))
    }
}

/// Joins the text parts of the first candidate and trims the result.
fn response_text(response: GenerateContentResponse) -> String {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default()
        .trim()
        .to_string()
}
