use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::images::generate::{
    plan_images, random_seed, GeneratedImage, DEFAULT_ASPECT_RATIO, DEFAULT_IMAGE_COUNT,
    DEFAULT_STYLE, FALLBACK_IMAGE_COUNT, MAX_IMAGE_COUNT,
};
use crate::params::{clamp_count, loose_text, string_only};

const OBJECT_REMOVAL_MESSAGE: &str =
    "To remove objects, the frontend needs a 'masking' tool. This is a placeholder.";
const OBJECT_REMOVAL_PLACEHOLDER_URL: &str =
    "https://via.placeholder.com/512x512.png?text=Object+Removal+Requires+Mask";

fn default_style() -> String {
    DEFAULT_STYLE.to_string()
}

fn default_aspect_ratio() -> String {
    DEFAULT_ASPECT_RATIO.to_string()
}

fn default_count() -> Option<Value> {
    Some(Value::from(DEFAULT_IMAGE_COUNT))
}

/// Defaults: style "Default", aspectRatio "Square (1:1)", count 4.
/// An unusable count becomes 1; the result is clamped to 1..=4.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateImageRequest {
    #[serde(default, deserialize_with = "string_only")]
    pub prompt: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub style: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub aspect_ratio: Option<String>,
    #[serde(default = "default_count")]
    pub count: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct GenerateImageResponse {
    pub images: Vec<GeneratedImage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveObjectResponse {
    pub message: &'static str,
    pub result_url: &'static str,
}

/// POST /api/generate-image
pub async fn handle_generate_image(
    body: Option<Json<GenerateImageRequest>>,
) -> Result<Json<GenerateImageResponse>, AppError> {
    let missing = || AppError::Validation("Prompt is required".to_string());
    let Json(request) = body.ok_or_else(missing)?;
    let prompt = request
        .prompt
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(missing)?;

    let count = clamp_count(
        request.count.as_ref(),
        FALLBACK_IMAGE_COUNT,
        FALLBACK_IMAGE_COUNT,
        MAX_IMAGE_COUNT,
    );

    let style = request.style.unwrap_or_else(default_style);
    let aspect_ratio = request.aspect_ratio.unwrap_or_else(default_aspect_ratio);
    let images = plan_images(prompt, &style, &aspect_ratio, count, random_seed);

    Ok(Json(GenerateImageResponse { images }))
}

/// POST /api/remove-object
pub async fn handle_remove_object() -> Json<RemoveObjectResponse> {
    Json(RemoveObjectResponse {
        message: OBJECT_REMOVAL_MESSAGE,
        result_url: OBJECT_REMOVAL_PLACEHOLDER_URL,
    })
}
