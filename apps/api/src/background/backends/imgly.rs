//! In-process removal through `imgly-bgremove` (ONNX segmentation model).
//!
//! The model is resolved by id from the local model cache, or loaded from a
//! directory when `REMOVAL_MODEL` points at one.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use imgly_bgremove::{ModelSource, ModelSpec, OutputFormat, RemovalConfig};
use tracing::debug;

use crate::background::backends::{BackendError, BackgroundRemover};
use crate::background::result::RemovalResult;

pub const DEFAULT_MODEL: &str = "imgly--isnet-general-onnx";

/// Output is always lossless PNG; the quality knob only matters for lossy formats.
const PNG_QUALITY: u8 = 100;

pub struct ImglyRemover {
    config: RemovalConfig,
}

impl ImglyRemover {
    pub fn new(model: &str) -> Result<Self, BackendError> {
        let config = RemovalConfig::builder()
            .model_spec(model_spec(model))
            .output_format(OutputFormat::Png)
            .build()?;
        Ok(Self { config })
    }

    fn encode(result: imgly_bgremove::RemovalResult) -> Result<Option<RemovalResult>, BackendError> {
        let png = result.to_bytes(OutputFormat::Png, PNG_QUALITY)?;
        Ok((!png.is_empty()).then(|| RemovalResult::RawBytes(Bytes::from(png))))
    }
}

/// A model directory on disk wins over a cache id of the same name.
fn model_spec(model: &str) -> ModelSpec {
    let path = PathBuf::from(model);
    let source = if path.is_dir() {
        ModelSource::External(path)
    } else {
        ModelSource::Downloaded(model.to_string())
    };
    ModelSpec {
        source,
        variant: None,
    }
}

#[async_trait]
impl BackgroundRemover for ImglyRemover {
    fn name(&self) -> &'static str {
        "imgly"
    }

    async fn remove_from_bytes(
        &self,
        image: Bytes,
    ) -> Result<Option<RemovalResult>, BackendError> {
        debug!(bytes = image.len(), "Running in-process removal on buffer");
        let result = imgly_bgremove::remove_background_from_bytes(&image, &self.config).await?;
        Self::encode(result)
    }

    async fn remove_from_path(&self, path: &Path) -> Result<Option<RemovalResult>, BackendError> {
        debug!(path = %path.display(), "Running in-process removal on file");
        let file = tokio::fs::File::open(path).await?;
        let result = imgly_bgremove::remove_background_from_reader(file, &self.config).await?;
        Self::encode(result)
    }
}
