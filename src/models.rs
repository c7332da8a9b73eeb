use serde::{Serialize, Deserialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;
use bytes::Bytes;

use crate::catalog;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    pub gender: String,
    pub age: String,
    pub ethnicity: String,
    pub hair_style: String,
    pub expression: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProductConfig {
    pub category: String, // one of catalog::PRODUCT_CATEGORIES
    pub description: String,
    pub color: String,
    pub material: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SceneConfig {
    pub pose: String,
    pub interaction_type: String,
    pub environment: String,
    pub lighting: String,
    pub style: String,
    #[serde(default)]
    pub aspect_ratio: AspectRatio,
    #[serde(default)]
    pub resolution: ImageSize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            gender: catalog::GENDER_OPTIONS[0].to_string(),
            age: catalog::AGE_OPTIONS[3].to_string(),
            ethnicity: catalog::ETHNICITY_OPTIONS[0].to_string(),
            hair_style: catalog::HAIR_OPTIONS[1].to_string(),
            expression: catalog::EXPRESSION_OPTIONS[0].to_string(),
        }
    }
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            category: catalog::PRODUCT_CATEGORIES[0].1[0].to_string(),
            description: "Kualitas premium, desain modern".to_string(),
            color: "Warna Alami".to_string(),
            material: "Material Standar".to_string(),
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            pose: catalog::POSE_OPTIONS[1].to_string(),
            interaction_type: catalog::INTERACTION_TYPES[1].to_string(),
            environment: catalog::ENVIRONMENT_OPTIONS[0].to_string(),
            lighting: catalog::LIGHTING_OPTIONS[0].to_string(),
            style: catalog::STYLE_OPTIONS[0].to_string(),
            aspect_ratio: AspectRatio::default(),
            resolution: ImageSize::default(),
        }
    }
}

/// Output framing passed through to the generation service.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "3:4")]
    Portrait,
    #[serde(rename = "4:3")]
    Landscape,
    #[serde(rename = "9:16")]
    Story,
    #[serde(rename = "16:9")]
    Widescreen,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 5] = [Self::Square, Self::Portrait, Self::Landscape, Self::Story, Self::Widescreen];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Square => "1:1",
            Self::Portrait => "3:4",
            Self::Landscape => "4:3",
            Self::Story => "9:16",
            Self::Widescreen => "16:9",
        }
    }
}

/// Resolution tier. `Standard` (1K) is the service-side default.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageSize {
    #[default]
    #[serde(rename = "1K")]
    Standard,
    #[serde(rename = "2K")]
    High,
    #[serde(rename = "4K")]
    Professional,
}

impl ImageSize {
    pub const ALL: [ImageSize; 3] = [Self::Standard, Self::High, Self::Professional];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "1K",
            Self::High => "2K",
            Self::Professional => "4K",
        }
    }

    pub fn is_service_default(&self) -> bool {
        *self == Self::Standard
    }
}

/// Reference photo held by the session, already decoded and validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceImage {
    pub bytes: Bytes,
    pub mime_type: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceUpload {
    /// Base64 payload, optionally as a full `data:<mime>;base64,` URL.
    pub data: String,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct GenerateRequest {
    pub model: ModelConfig,
    pub product: ProductConfig,
    pub scene: SceneConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GeneratedImage {
    pub id: Uuid,
    pub url: String,
    pub prompt: String,
    pub timestamp: DateTime<Utc>,
}

impl GeneratedImage {
    pub fn new(url: String, prompt: String) -> Self {
        Self { id: Uuid::new_v4(), url, prompt, timestamp: Utc::now() }
    }
}
