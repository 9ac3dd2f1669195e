//! Remote removal service reached over HTTP.
//!
//! The image goes up as multipart field `image_file`. A JSON reply is read as
//! `{ "data": "<base64>" }`; anything else is the image itself and is handed
//! back unread as a byte stream.

use std::path::Path;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;
use reqwest::{
    header::CONTENT_TYPE,
    multipart::{Form, Part},
    Client, Response, StatusCode,
};
use serde::Deserialize;
use tracing::debug;

use crate::background::backends::{BackendError, BackgroundRemover};
use crate::background::result::{ByteSource, BytesWrapper, RemovalResult};

const UPLOAD_FIELD: &str = "image_file";

pub struct HttpRemover {
    client: Client,
    url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DataEnvelope {
    data: Option<String>,
}

struct ResponseBody(Response);

#[async_trait]
impl ByteSource for ResponseBody {
    async fn read_all(self: Box<Self>) -> Result<Bytes, BackendError> {
        Ok(self.0.bytes().await?)
    }
}

impl HttpRemover {
    pub fn new(url: String, api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            url,
            api_key,
        }
    }

    async fn submit(
        &self,
        image: Vec<u8>,
        file_name: String,
    ) -> Result<Option<RemovalResult>, BackendError> {
        let part = Part::bytes(image)
            .file_name(file_name)
            .mime_str("application/octet-stream")?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let mut request = self.client.post(&self.url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(%status, url = %self.url, "Removal service replied");

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(BackendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.starts_with("application/json"))
            .unwrap_or(false);

        if is_json {
            let envelope: DataEnvelope = response.json().await?;
            let data = envelope
                .data
                .map(|encoded| STANDARD.decode(encoded.trim()))
                .transpose()
                .map_err(|e| BackendError::Malformed(format!("data is not base64: {e}")))?
                .map(Bytes::from);
            return Ok(Some(RemovalResult::BytesWrapper(BytesWrapper { data })));
        }

        Ok(Some(RemovalResult::ByteStream(Box::new(ResponseBody(
            response,
        )))))
    }
}

#[async_trait]
impl BackgroundRemover for HttpRemover {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn remove_from_bytes(
        &self,
        image: Bytes,
    ) -> Result<Option<RemovalResult>, BackendError> {
        self.submit(image.to_vec(), "image.png".to_string()).await
    }

    async fn remove_from_path(&self, path: &Path) -> Result<Option<RemovalResult>, BackendError> {
        let image = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image.png".to_string());
        self.submit(image, file_name).await
    }
}
