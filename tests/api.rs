use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use base64::Engine;
use modelgen::{
    models::{AspectRatio, ImageSize, ReferenceImage},
    prompt::{ENHANCE_PREAMBLE, FOOD_BEVERAGE_CLAUSE},
    reference::MAX_REFERENCE_BYTES,
    router, AppState, GeminiError, ImageGenerator,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

#[derive(Debug, Clone, Copy)]
enum Outcome {
    Image,
    NoImage,
    BadKey,
    NoKey,
}

#[derive(Debug, Clone)]
struct Call {
    prompt: String,
    aspect_ratio: AspectRatio,
    resolution: ImageSize,
    reference_mime: Option<String>,
}

struct FakeGenerator {
    outcome: Outcome,
    calls: Mutex<Vec<Call>>,
}

#[async_trait]
impl ImageGenerator for FakeGenerator {
    async fn generate(
        &self,
        prompt: &str,
        aspect_ratio: AspectRatio,
        resolution: ImageSize,
        reference: Option<&ReferenceImage>,
    ) -> Result<String, GeminiError> {
        self.calls.lock().push(Call {
            prompt: prompt.to_string(),
            aspect_ratio,
            resolution,
            reference_mime: reference.map(|r| r.mime_type.clone()),
        });
        match self.outcome {
            Outcome::Image => Ok("data:image/png;base64,aW1hZ2U=".to_string()),
            Outcome::NoImage => Err(GeminiError::NoImageReturned),
            Outcome::BadKey => Err(GeminiError::InvalidCredential),
            Outcome::NoKey => Err(GeminiError::CredentialMissing),
        }
    }
}

fn setup(outcome: Outcome) -> (Router, AppState, Arc<FakeGenerator>) {
    let generator = Arc::new(FakeGenerator { outcome, calls: Mutex::new(Vec::new()) });
    let state = AppState::new(generator.clone());
    (router(state.clone()), state, generator)
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

fn coffee_request() -> Value {
    json!({
        "model": {
            "gender": "Wanita",
            "age": "Dewasa Muda",
            "ethnicity": "Asia Tenggara",
            "hairStyle": "Panjang",
            "expression": "Senyum Ramah"
        },
        "product": {
            "category": "Kopi/Latte",
            "description": "Kualitas premium",
            "color": "Warna Alami",
            "material": "Material Standar"
        },
        "scene": {
            "pose": "Duduk Santai",
            "interactionType": "Memegang Secara Alami",
            "environment": "Kafe Modern",
            "lighting": "Cahaya Alami",
            "style": "Lifestyle",
            "aspectRatio": "3:4",
            "resolution": "2K"
        }
    })
}

fn png_upload() -> Value {
    json!({ "data": base64::engine::general_purpose::STANDARD.encode(PNG_MAGIC) })
}

#[tokio::test]
async fn options_expose_catalog_and_defaults() {
    let (app, _, _) = setup(Outcome::Image);
    let (status, body) = call(&app, Method::GET, "/api/options", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["defaults"]["model"]["age"], "Dewasa Muda");
    assert_eq!(body["resolutions"][0]["value"], "1K");
    assert!(body["interactionTypes"].as_array().unwrap().iter().any(|v| v == "Memegang Secara Alami"));
}

#[tokio::test]
async fn prompt_preview_follows_reference_state() {
    let (app, _, generator) = setup(Outcome::Image);

    let (status, body) = call(&app, Method::POST, "/api/prompt", Some(coffee_request())).await;
    assert_eq!(status, StatusCode::OK);
    let base = body["prompt"].as_str().unwrap().to_string();
    assert!(base.contains(FOOD_BEVERAGE_CLAUSE.trim()));
    assert!(!base.contains(ENHANCE_PREAMBLE));
    assert_eq!(body["treatment"], "foodOrBeverage");
    assert_eq!(body["hasReferenceImage"], false);

    let (status, _) = call(&app, Method::PUT, "/api/reference", Some(png_upload())).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = call(&app, Method::POST, "/api/prompt", Some(coffee_request())).await;
    let wrapped = body["prompt"].as_str().unwrap();
    assert!(wrapped.starts_with(ENHANCE_PREAMBLE));
    assert!(wrapped.contains(&base));
    assert_eq!(body["hasReferenceImage"], true);

    assert!(generator.calls.lock().is_empty());
}

#[tokio::test]
async fn successful_generation_is_appended_and_active() {
    let (app, _, generator) = setup(Outcome::Image);

    let (status, image) = call(&app, Method::POST, "/api/generate", Some(coffee_request())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(image["url"], "data:image/png;base64,aW1hZ2U=");
    assert!(image["prompt"].as_str().unwrap().starts_with("Professional commercial advertisement photo."));

    {
        let calls = generator.calls.lock();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].aspect_ratio, AspectRatio::Portrait);
        assert_eq!(calls[0].resolution, ImageSize::High);
        assert_eq!(calls[0].reference_mime, None);
        assert_eq!(calls[0].prompt, image["prompt"].as_str().unwrap());
    }

    let (status, _) = call(&app, Method::PUT, "/api/reference", Some(png_upload())).await;
    assert_eq!(status, StatusCode::OK);
    let (status, second) = call(&app, Method::POST, "/api/generate", Some(coffee_request())).await;
    assert_eq!(status, StatusCode::OK);
    assert!(second["prompt"].as_str().unwrap().starts_with(ENHANCE_PREAMBLE));
    assert_eq!(generator.calls.lock()[1].reference_mime.as_deref(), Some("image/png"));

    let (_, session) = call(&app, Method::GET, "/api/session", None).await;
    assert_eq!(session["images"].as_array().unwrap().len(), 2);
    assert_eq!(session["active"], 1);
    assert_eq!(session["inProgress"], false);
    assert_eq!(session["referenceImage"]["mimeType"], "image/png");

    let (status, active) = call(&app, Method::GET, "/api/history/active", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(active["id"], second["id"]);

    let (_, history) = call(&app, Method::GET, "/api/history", None).await;
    assert_eq!(history[0]["id"], image["id"]);
}

#[tokio::test]
async fn missing_image_is_reported_and_session_recovers() {
    let (app, _, _) = setup(Outcome::NoImage);

    let (status, body) = call(&app, Method::POST, "/api/generate", Some(coffee_request())).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Failed to receive image data from the model.");

    let (_, session) = call(&app, Method::GET, "/api/session", None).await;
    assert_eq!(session["inProgress"], false);
    assert_eq!(session["lastError"], "Failed to receive image data from the model.");
    assert!(session["images"].as_array().unwrap().is_empty());

    let (status, _) = call(&app, Method::GET, "/api/history/active", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn credential_errors_are_distinguished() {
    let (app, _, _) = setup(Outcome::BadKey);
    let (status, body) = call(&app, Method::POST, "/api/generate", Some(coffee_request())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "The API key is invalid or not enabled for this model.");

    let (app, _, _) = setup(Outcome::NoKey);
    let (status, body) = call(&app, Method::POST, "/api/generate", Some(coffee_request())).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"].as_str().unwrap().starts_with("API key not found"));
}

#[tokio::test]
async fn second_trigger_while_in_progress_is_rejected() {
    let (app, state, generator) = setup(Outcome::Image);
    assert!(state.session.write().try_begin());

    let (status, body) = call(&app, Method::POST, "/api/generate", Some(coffee_request())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already being generated"));
    assert!(generator.calls.lock().is_empty());
}

#[tokio::test]
async fn oversized_reference_is_rejected_before_generation() {
    let (app, _, generator) = setup(Outcome::Image);
    let mut bytes = PNG_MAGIC.to_vec();
    bytes.resize(MAX_REFERENCE_BYTES + 1, 0);
    let upload = json!({ "data": base64::engine::general_purpose::STANDARD.encode(&bytes), "mimeType": "image/png" });

    let (status, body) = call(&app, Method::PUT, "/api/reference", Some(upload)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["error"].as_str().unwrap().contains("Maximum is 5MB"));

    let (_, session) = call(&app, Method::GET, "/api/session", None).await;
    assert!(session["referenceImage"].is_null());
    assert!(generator.calls.lock().is_empty());
}

#[tokio::test]
async fn reference_can_be_cleared() {
    let (app, state, _) = setup(Outcome::Image);
    call(&app, Method::PUT, "/api/reference", Some(png_upload())).await;
    assert!(state.session.read().has_reference());

    let (status, _) = call(&app, Method::DELETE, "/api/reference", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(!state.session.read().has_reference());
}

#[tokio::test]
async fn unsupported_aspect_ratio_is_rejected() {
    let (app, _, generator) = setup(Outcome::Image);
    let mut body = coffee_request();
    body["scene"]["aspectRatio"] = json!("4:5");

    let (status, _) = call(&app, Method::POST, "/api/generate", Some(body)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(generator.calls.lock().is_empty());
    assert!(!state_in_progress(&app).await);
}

async fn state_in_progress(app: &Router) -> bool {
    let (_, session) = call(app, Method::GET, "/api/session", None).await;
    session["inProgress"].as_bool().unwrap()
}

fn png_payload_of(len: usize) -> Value {
    let mut bytes = PNG_MAGIC.to_vec();
    bytes.resize(len, 0);
    json!({ "data": base64::engine::general_purpose::STANDARD.encode(&bytes), "mimeType": "image/png" })
}

#[tokio::test]
async fn six_megabyte_reference_gets_json_error_and_last_error() {
    let (app, state, _) = setup(Outcome::Image);
    call(&app, Method::PUT, "/api/reference", Some(png_upload())).await;

    let (status, body) = call(&app, Method::PUT, "/api/reference", Some(png_payload_of(6 * 1024 * 1024))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    let message = body["error"].as_str().unwrap().to_string();
    assert!(message.contains("Maximum is 5MB"));

    let (_, session) = call(&app, Method::GET, "/api/session", None).await;
    assert_eq!(session["lastError"], message.as_str());
    // The earlier, valid reference stays in place.
    assert_eq!(session["referenceImage"]["size"], PNG_MAGIC.len());
    assert!(state.session.read().has_reference());
}

#[tokio::test]
async fn reference_beyond_body_limit_still_gets_json_error() {
    let (app, _, _) = setup(Outcome::Image);

    let (status, body) = call(&app, Method::PUT, "/api/reference", Some(png_payload_of(24 * 1024 * 1024))).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["error"], "Image is too large. Maximum is 5MB.");

    let (_, session) = call(&app, Method::GET, "/api/session", None).await;
    assert_eq!(session["lastError"], "Image is too large. Maximum is 5MB.");
    assert!(session["referenceImage"].is_null());
}

#[tokio::test]
async fn malformed_reference_body_is_reported_as_json() {
    let (app, _, _) = setup(Outcome::Image);

    let (status, body) = call(&app, Method::PUT, "/api/reference", Some(json!({ "mimeType": "image/png" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}
