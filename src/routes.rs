use axum::{
    Json, Router,
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, info, warn};

use crate::{
    catalog::{self, OptionCatalog},
    gemini::{preview, GeminiError, ImageGenerator},
    models::{GenerateRequest, GeneratedImage, ReferenceImage, ReferenceUpload},
    prompt::{compose, ProductTreatment},
    reference::{ReferenceImageError, MAX_REFERENCE_BYTES},
    session::{ReferenceSummary, Session, SessionSnapshot},
};

/// Four times the base64 size of a 5 MB image, so oversized uploads usually
/// reach the decoded-size check in `ReferenceImage::from_upload`.
const MAX_BODY_BYTES: usize = MAX_REFERENCE_BYTES / 3 * 4 * 4;

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<RwLock<Session>>,
    pub generator: Arc<dyn ImageGenerator>,
}

impl AppState {
    pub fn new(generator: Arc<dyn ImageGenerator>) -> Self {
        Self { session: Arc::default(), generator }
    }
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Reference(#[from] ReferenceImageError),
    #[error(transparent)]
    Generation(#[from] GeminiError),
    #[error("An image is already being generated. Wait for it to finish.")]
    Busy,
    #[error("Invalid request body: {message}")]
    InvalidBody { status: StatusCode, message: String },
    #[error("No image has been generated yet.")]
    NoActiveImage,
    #[error("Generation task failed: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Reference(ReferenceImageError::TooLarge { .. } | ReferenceImageError::ExceedsUploadLimit) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Reference(_) => StatusCode::BAD_REQUEST,
            Self::Generation(GeminiError::CredentialMissing) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Generation(GeminiError::InvalidCredential) => StatusCode::UNAUTHORIZED,
            Self::Generation(_) => StatusCode::BAD_GATEWAY,
            Self::InvalidBody { status, .. } => *status,
            Self::Busy => StatusCode::CONFLICT,
            Self::NoActiveImage => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorBody { error: self.to_string() })).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptPreview {
    pub prompt: String,
    pub has_reference_image: bool,
    pub treatment: &'static str,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/options", get(get_options))
        .route("/api/prompt", post(preview_prompt))
        .route("/api/reference", put(set_reference).delete(clear_reference))
        .route("/api/generate", post(generate))
        .route("/api/session", get(get_session))
        .route("/api/history", get(get_history))
        .route("/api/history/active", get(get_active))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

pub async fn get_options() -> Json<OptionCatalog> {
    Json(catalog::option_catalog())
}

pub async fn preview_prompt(State(state): State<AppState>, Json(body): Json<GenerateRequest>) -> Json<PromptPreview> {
    let has_reference_image = state.session.read().has_reference();
    let prompt = compose(&body.model, &body.product, &body.scene, has_reference_image);
    let treatment = match ProductTreatment::classify(&body.product.category) {
        ProductTreatment::FoodOrBeverage => "foodOrBeverage",
        ProductTreatment::SmallObject => "smallObject",
        ProductTreatment::Standard => "standard",
    };
    Json(PromptPreview { prompt, has_reference_image, treatment })
}

pub async fn set_reference(
    State(state): State<AppState>,
    body: Result<Json<ReferenceUpload>, JsonRejection>,
) -> Result<Json<ReferenceSummary>, ApiError> {
    let upload = match body {
        Ok(Json(upload)) => upload,
        Err(rejection) => {
            let err = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                ApiError::Reference(ReferenceImageError::ExceedsUploadLimit)
            } else {
                ApiError::InvalidBody { status: rejection.status(), message: rejection.body_text() }
            };
            warn!("⚠️ Rejected reference upload: {}", err);
            state.session.write().record_error(err.to_string());
            return Err(err);
        }
    };
    match ReferenceImage::from_upload(upload) {
        Ok(image) => {
            let summary = ReferenceSummary { mime_type: image.mime_type.clone(), size: image.len() };
            info!("🖼️ Reference image set: {} ({} bytes)", summary.mime_type, summary.size);
            state.session.write().set_reference(image);
            Ok(Json(summary))
        }
        Err(e) => {
            warn!("⚠️ Rejected reference image: {}", e);
            state.session.write().record_error(e.to_string());
            Err(e.into())
        }
    }
}

pub async fn clear_reference(State(state): State<AppState>) -> StatusCode {
    if state.session.write().clear_reference() {
        info!("🧹 Reference image cleared");
    }
    StatusCode::NO_CONTENT
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.read().snapshot())
}

pub async fn get_history(State(state): State<AppState>) -> Json<Vec<GeneratedImage>> {
    Json(state.session.read().images().to_vec())
}

pub async fn get_active(State(state): State<AppState>) -> Result<Json<GeneratedImage>, ApiError> {
    state.session.read().active_image().cloned().map(Json).ok_or(ApiError::NoActiveImage)
}

pub async fn generate(State(state): State<AppState>, Json(body): Json<GenerateRequest>) -> Result<Json<GeneratedImage>, ApiError> {
    let reference = {
        let mut session = state.session.write();
        if !session.try_begin() {
            warn!("⏳ Generation requested while another is in progress");
            return Err(ApiError::Busy);
        }
        session.reference().cloned()
    };

    if !catalog::is_known_category(&body.product.category) {
        warn!("Category '{}' is not in the catalog; using it as given", body.product.category);
    }

    // Spawned so an in-flight request runs to completion even if the caller disconnects.
    let task = tokio::spawn(run_generation(state.clone(), body, reference));
    match task.await {
        Ok(result) => result.map(Json),
        Err(e) => {
            error!("❌ Generation task aborted: {}", e);
            state.session.write().fail(e.to_string());
            Err(ApiError::Internal(e.to_string()))
        }
    }
}

async fn run_generation(state: AppState, body: GenerateRequest, reference: Option<ReferenceImage>) -> Result<GeneratedImage, ApiError> {
    let prompt = compose(&body.model, &body.product, &body.scene, reference.is_some());
    info!("🚀 Generating image for product: {} ({})", body.product.category, preview(&prompt, 80));

    let result = state
        .generator
        .generate(&prompt, body.scene.aspect_ratio, body.scene.resolution, reference.as_ref())
        .await;

    let mut session = state.session.write();
    match result {
        Ok(url) => {
            let image = GeneratedImage::new(url, prompt);
            session.complete(image.clone());
            info!("✅ Image {} added to history ({} total)", image.id, session.images().len());
            Ok(image)
        }
        Err(e) => {
            session.fail(e.to_string());
            Err(e.into())
        }
    }
}
