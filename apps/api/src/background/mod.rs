//! Background removal pipeline behind `POST /api/remove-background`.
//!
//! input (resolve `imageUrl` to bytes) → invoker (primary call, scratch-file
//! fallback) → result (normalize whatever came back into PNG bytes) → handler
//! (JSON envelope). Strictly sequential; concurrent requests share no state.

pub mod backends;
pub mod handlers;
pub mod input;
pub mod invoker;
pub mod result;

use bytes::Bytes;
use serde_json::Value;
use thiserror::Error;

use crate::background::backends::BackendError;
use crate::background::input::ImageInput;
use crate::background::invoker::RemovalInvoker;

#[derive(Debug, Error)]
pub enum RemovalError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Failed to fetch image URL, status {status}")]
    UpstreamFetch { status: u16 },

    #[error("Failed to fetch image URL: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Background removal failed: {0}")]
    RemovalFailure(#[source] BackendError),

    #[error("Could not prepare fallback input file: {0}")]
    Scratch(#[from] std::io::Error),

    #[error("Background removal returned empty result.")]
    EmptyResult,

    #[error("Unknown result type from background removal")]
    UnsupportedResultShape,

    #[error("Failed to read background removal output: {0}")]
    ReadOutput(#[source] BackendError),
}

/// Runs the whole pipeline for one caller-supplied `imageUrl` value and
/// returns the cut-out image bytes.
pub async fn remove_background(
    http: &reqwest::Client,
    invoker: &RemovalInvoker,
    image_url: &Value,
) -> Result<Bytes, RemovalError> {
    let input = ImageInput::classify(image_url)?;
    let image = input.resolve(http).await?;
    let result = invoker.invoke(image).await?;
    result::normalize(result).await
}
