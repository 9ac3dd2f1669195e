use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, Instrument};
use uuid::Uuid;

use crate::background::{remove_background, result::to_png_data_url};
use crate::errors::AppError;
use crate::state::AppState;

const MISSING_IMAGE_MESSAGE: &str = "Image URL (or data:) is required";
const SUCCESS_MESSAGE: &str = "Background removed successfully";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveBackgroundRequest {
    /// Kept untyped so a non-string value reaches the resolver and fails there.
    #[serde(default)]
    pub image_url: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveBackgroundResponse {
    pub message: &'static str,
    pub result_url: String,
}

/// POST /api/remove-background
pub async fn handle_remove_background(
    State(state): State<AppState>,
    body: Option<Json<RemoveBackgroundRequest>>,
) -> Result<Json<RemoveBackgroundResponse>, AppError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let image_url = request
        .image_url
        .filter(is_present)
        .ok_or_else(|| AppError::Validation(MISSING_IMAGE_MESSAGE.to_string()))?;

    let span = tracing::info_span!(
        "remove_background",
        request_id = %Uuid::new_v4(),
        backend = state.invoker.backend_name()
    );

    async move {
        info!("Processing background removal...");
        let png = remove_background(&state.http, &state.invoker, &image_url).await?;
        info!(bytes = png.len(), "Background removed");

        Ok::<_, AppError>(Json(RemoveBackgroundResponse {
            message: SUCCESS_MESSAGE,
            result_url: to_png_data_url(&png),
        }))
    }
    .instrument(span)
    .await
}

/// Absent, null, false, zero and "" all count as "not supplied".
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
