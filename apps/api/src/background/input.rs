//! Input resolver: classifies the `imageUrl` string and turns it into raw bytes.

use std::path::PathBuf;

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use bytes::Bytes;
use serde_json::Value;
use tracing::debug;

use crate::background::RemovalError;

const DATA_SCHEME: &str = "data:";

/// Padding is optional in the wild; browsers and canvas exports disagree.
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Where the image bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    /// `data:<mime>;base64,<payload>`, already decoded.
    InlineData {
        bytes: Bytes,
        mime_hint: Option<String>,
    },
    RemoteUrl(String),
    LocalPath(PathBuf),
}

impl ImageInput {
    /// Classifies a raw JSON value from the request body.
    pub fn classify(value: &Value) -> Result<Self, RemovalError> {
        match value {
            Value::String(raw) => Self::parse(raw),
            _ => Err(RemovalError::InvalidInput(
                "imageUrl must be a string containing a remote URL or data URL.".to_string(),
            )),
        }
    }

    pub fn parse(raw: &str) -> Result<Self, RemovalError> {
        if let Some(rest) = raw.strip_prefix(DATA_SCHEME) {
            return parse_data_url(rest);
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Ok(ImageInput::RemoteUrl(raw.to_string()));
        }
        Ok(ImageInput::LocalPath(PathBuf::from(raw)))
    }

    /// Consumes the input and produces its bytes. The result is never empty.
    pub async fn resolve(self, http: &reqwest::Client) -> Result<Bytes, RemovalError> {
        let bytes = match self {
            ImageInput::InlineData { bytes, mime_hint } => {
                debug!(mime = ?mime_hint, len = bytes.len(), "Using inline image data");
                bytes
            }
            ImageInput::RemoteUrl(url) => {
                debug!(%url, "Fetching remote image");
                let response = http.get(&url).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(RemovalError::UpstreamFetch {
                        status: status.as_u16(),
                    });
                }
                response.bytes().await?
            }
            ImageInput::LocalPath(path) => {
                debug!(path = %path.display(), "Reading local image");
                tokio::fs::read(&path)
                    .await
                    .map(Bytes::from)
                    .map_err(|e| {
                        RemovalError::InvalidInput(format!(
                            "Unable to read image at '{}': {e}",
                            path.display()
                        ))
                    })?
            }
        };

        if bytes.is_empty() {
            return Err(RemovalError::InvalidInput("Image payload is empty".to_string()));
        }
        Ok(bytes)
    }
}

fn parse_data_url(rest: &str) -> Result<ImageInput, RemovalError> {
    let invalid = || RemovalError::InvalidInput("Invalid data URL".to_string());

    let (header, payload) = rest.split_once(',').ok_or_else(invalid)?;
    let payload: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if payload.is_empty() {
        return Err(invalid());
    }

    let bytes = LENIENT_BASE64
        .decode(payload.as_bytes())
        .map_err(|e| RemovalError::InvalidInput(format!("Invalid data URL: {e}")))?;

    let mime_hint = header
        .split(';')
        .next()
        .filter(|m| !m.is_empty())
        .map(str::to_string);

    Ok(ImageInput::InlineData {
        bytes: Bytes::from(bytes),
        mime_hint,
    })
}
