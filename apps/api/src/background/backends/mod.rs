//! Removal capabilities. `AppState` holds one behind `Arc<dyn BackgroundRemover>`,
//! chosen at startup from `REMOVAL_BACKEND`.

pub mod command;
pub mod http;
pub mod imgly;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::background::result::RemovalResult;
use crate::config::RemovalBackendConfig;

pub use command::CommandRemover;
pub use http::HttpRemover;
pub use imgly::ImglyRemover;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Removal service error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("`{program}` exited with {status}: {stderr}")]
    Command {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Malformed removal output: {0}")]
    Malformed(String),

    #[error("Background removal library error: {0}")]
    Library(#[from] imgly_bgremove::BgRemovalError),
}

/// Something that cuts the background out of an image.
///
/// `Ok(None)` means the capability ran but produced nothing. Results from
/// `remove_from_path` must not borrow the file: it is deleted right after.
#[async_trait]
pub trait BackgroundRemover: Send + Sync {
    fn name(&self) -> &'static str;

    async fn remove_from_bytes(&self, image: Bytes)
        -> Result<Option<RemovalResult>, BackendError>;

    async fn remove_from_path(&self, path: &Path) -> Result<Option<RemovalResult>, BackendError>;
}

pub fn build_remover(
    config: &RemovalBackendConfig,
) -> Result<Arc<dyn BackgroundRemover>, BackendError> {
    let remover: Arc<dyn BackgroundRemover> = match config {
        RemovalBackendConfig::Imgly { model } => Arc::new(ImglyRemover::new(model)?),
        RemovalBackendConfig::Command { program, args } => {
            Arc::new(CommandRemover::new(program.clone(), args.clone()))
        }
        RemovalBackendConfig::Http { url, api_key } => {
            Arc::new(HttpRemover::new(url.clone(), api_key.clone()))
        }
    };
    Ok(remover)
}
