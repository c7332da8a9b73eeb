use crate::config::{Config, API_KEY_VARS};
use crate::models::{AspectRatio, ImageSize, ReferenceImage};
use async_trait::async_trait;
use base64::Engine;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Value some deployments leave behind when the key was never configured.
pub const PLACEHOLDER_API_KEY: &str = "undefined";

/// Substring Gemini puts in the error body when it rejects the key.
const INVALID_KEY_MARKER: &str = "API key not valid";

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("API key not found. Set API_KEY (or GEMINI_API_KEY) in the environment.")]
    CredentialMissing,
    #[error("The API key is invalid or not enabled for this model.")]
    InvalidCredential,
    #[error("Failed to receive image data from the model.")]
    NoImageReturned,
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("{0}")]
    Http(String),
    #[error("invalid response: {0}")]
    Other(String),
}

/// Anything that can turn a prompt into an image URL. The HTTP layer only
/// talks to this trait so it can run against a fake service.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        resolution: ImageSize,
        reference: Option<&ReferenceImage>,
    ) -> Result<String, GeminiError>;
}

// Helper function to truncate base64 data in JSON for cleaner logging
fn truncate_base64_in_json(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if key == "data" {
                    if let serde_json::Value::String(s) = val {
                        if s.len() > 100 && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '/' || c == '=') {
                            *val = serde_json::Value::String(format!("{}...[truncated {} chars]", &s[..50], s.len() - 50));
                        }
                    }
                } else {
                    truncate_base64_in_json(val);
                }
            }
        }
        serde_json::Value::Array(arr) => {
            for val in arr.iter_mut() {
                truncate_base64_in_json(val);
            }
        }
        _ => {}
    }
}

pub(crate) fn preview(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...[{} chars total]", &s[..idx], s.chars().count()),
        None => s.to_string(),
    }
}

/// Accepts a credential unless it is absent, blank or the placeholder.
pub fn check_api_key(key: Option<String>) -> Result<String, GeminiError> {
    match key {
        Some(k) if !k.trim().is_empty() && k != PLACEHOLDER_API_KEY => Ok(k),
        _ => Err(GeminiError::CredentialMissing),
    }
}

/// A pinned key wins; otherwise the first non-empty variable in `API_KEY_VARS`.
fn resolve_api_key_with(pinned: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> Result<String, GeminiError> {
    let key = pinned.map(str::to_string).or_else(|| {
        API_KEY_VARS
            .iter()
            .find_map(|name| lookup(name).filter(|v| !v.is_empty()))
    });
    check_api_key(key)
}

pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            base_url: config.api_base.clone(),
            model: config.image_model.clone(),
            api_key: None,
        }
    }

    /// Pins the credential instead of reading it from the environment on each call.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn resolve_api_key(&self) -> Result<String, GeminiError> {
        resolve_api_key_with(self.api_key.as_deref(), |name| std::env::var(name).ok())
    }

    async fn perform_api_call(&self, api_key: &str, body: &GenerateContentRequest) -> Result<String, GeminiError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);

        info!("🔗 Making request to: {}", url);

        let mut logged_body = serde_json::to_value(body).unwrap_or_default();
        truncate_base64_in_json(&mut logged_body);
        debug!("📤 Request body: {}", serde_json::to_string_pretty(&logged_body).unwrap_or_default());

        let response = self.client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| GeminiError::Http(e.to_string()))?;

        let status = response.status();
        info!("📥 Response status: {}", status);

        let response_text = response.text().await
            .map_err(|e| GeminiError::Http(e.to_string()))?;

        if !status.is_success() {
            error!("❌ API Error response: {}", response_text);
            return Err(classify_error(status, &response_text));
        }

        // Truncate base64 image data for cleaner logging
        if let Ok(mut json_value) = serde_json::from_str::<serde_json::Value>(&response_text) {
            truncate_base64_in_json(&mut json_value);
            debug!("📥 Raw Gemini API response: {}", json_value);
        }

        let parsed: GeminiResponse = serde_json::from_str(&response_text)
            .map_err(|e| GeminiError::Other(format!("parse error: {}", e)))?;

        let inline_data = extract_first_image(&parsed).ok_or_else(|| {
            warn!("⚠️ No image data found in API response");
            GeminiError::NoImageReturned
        })?;

        info!("🖼️ Extracted image ({}) from API response: {}", inline_data.mime_type, preview(&inline_data.data, 50));
        Ok(format!("data:image/png;base64,{}", inline_data.data))
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        resolution: ImageSize,
        reference: Option<&ReferenceImage>,
    ) -> Result<String, GeminiError> {
        debug!(state = "building-request", model = %self.model, "Generating image with Gemini API...");
        let api_key = self.resolve_api_key().map_err(|e| {
            error!("❌ {}", e);
            e
        })?;

        let body = build_request(prompt, aspect_ratio, resolution, reference);
        info!(
            state = "awaiting-response",
            aspect_ratio = aspect_ratio.as_str(),
            resolution = resolution.as_str(),
            with_reference = reference.is_some(),
            "🎯 Generating image with prompt: {}",
            preview(prompt, 100)
        );

        match self.perform_api_call(&api_key, &body).await {
            Ok(url) => {
                info!(state = "succeeded", "✅ Successfully generated image: {}", preview(&url, 50));
                Ok(url)
            }
            Err(e) => {
                error!(state = "failed", "❌ Failed to generate image: {}", e);
                Err(e)
            }
        }
    }
}

fn classify_error(status: StatusCode, body: &str) -> GeminiError {
    if body.contains(INVALID_KEY_MARKER) || status == StatusCode::UNAUTHORIZED {
        return GeminiError::InvalidCredential;
    }
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|e| e.error.message)
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("status={} body={}", status, body));
    GeminiError::Api { status: status.as_u16(), message }
}

// --- Request Types ---

fn build_request(
    prompt: &str,
    aspect_ratio: AspectRatio,
    resolution: ImageSize,
    reference: Option<&ReferenceImage>,
) -> GenerateContentRequest {
    let mut parts = Vec::with_capacity(2);
    if let Some(image) = reference {
        parts.push(Part::Inline {
            inline_data: InlineData {
                data: base64::engine::general_purpose::STANDARD.encode(&image.bytes),
                mime_type: image.mime_type.clone(),
            },
        });
    }
    parts.push(Part::Text { text: prompt.to_string() });

    GenerateContentRequest {
        contents: vec![Content { parts }],
        generation_config: GenerationConfig {
            response_modalities: vec!["TEXT", "IMAGE"],
            image_config: ImageConfig {
                aspect_ratio,
                image_size: (!resolution.is_service_default()).then_some(resolution),
            },
        },
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<&'static str>,
    image_config: ImageConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig {
    aspect_ratio: AspectRatio,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_size: Option<ImageSize>,
}

// --- Response Parsing Helpers ---

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate { #[serde(default)] content: Content }

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content { #[serde(default)] parts: Vec<Part> }

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum Part {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData
    },
    Text { text: String },
    #[serde(skip_serializing)]
    #[allow(dead_code)]
    Other(serde_json::Value)
}

#[derive(Debug, Serialize, Deserialize)]
struct InlineData {
    data: String,
    #[serde(rename = "mimeType", default)]
    mime_type: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope { error: ErrorBody }

#[derive(Debug, Deserialize)]
struct ErrorBody { #[serde(default)] message: String }

/// Only the first candidate is considered; its parts are scanned in order.
fn extract_first_image(resp: &GeminiResponse) -> Option<&InlineData> {
    resp.candidates.first()?.content.parts.iter().find_map(|p| match p {
        Part::Inline { inline_data } => Some(inline_data),
        _ => None,
    })
}
