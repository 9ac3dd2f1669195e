//! Result normalizer: collapses whatever the removal capability returned into
//! one byte buffer, and renders it as a PNG data URL.

use std::fmt;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use bytes::Bytes;

use crate::background::backends::BackendError;
use crate::background::RemovalError;

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Output that has to be pulled before it can be used, e.g. an HTTP body.
#[async_trait]
pub trait ByteSource: Send {
    async fn read_all(self: Box<Self>) -> Result<Bytes, BackendError>;
}

/// A reply that wraps its image under a `data` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BytesWrapper {
    pub data: Option<Bytes>,
}

/// The three shapes a removal capability may hand back.
pub enum RemovalResult {
    RawBytes(Bytes),
    ByteStream(Box<dyn ByteSource>),
    BytesWrapper(BytesWrapper),
}

impl fmt::Debug for RemovalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RemovalResult::RawBytes(b) => f.debug_tuple("RawBytes").field(&b.len()).finish(),
            RemovalResult::ByteStream(_) => f.write_str("ByteStream(..)"),
            RemovalResult::BytesWrapper(w) => f
                .debug_struct("BytesWrapper")
                .field("data", &w.data.as_ref().map(Bytes::len))
                .finish(),
        }
    }
}

/// Checked in fixed order: raw bytes, then streaming read, then the wrapper's
/// `data` field. A wrapper without data is the only shape we cannot use.
pub async fn normalize(result: RemovalResult) -> Result<Bytes, RemovalError> {
    match result {
        RemovalResult::RawBytes(bytes) => Ok(bytes),
        RemovalResult::ByteStream(source) => {
            source.read_all().await.map_err(RemovalError::ReadOutput)
        }
        RemovalResult::BytesWrapper(BytesWrapper { data: Some(bytes) }) => Ok(bytes),
        RemovalResult::BytesWrapper(BytesWrapper { data: None }) => {
            Err(RemovalError::UnsupportedResultShape)
        }
    }
}

pub fn to_png_data_url(bytes: &[u8]) -> String {
    format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Chunks(Vec<&'static [u8]>);

    #[async_trait]
    impl ByteSource for Chunks {
        async fn read_all(self: Box<Self>) -> Result<Bytes, BackendError> {
            Ok(Bytes::from(self.0.concat()))
        }
    }

    struct Broken;

    #[async_trait]
    impl ByteSource for Broken {
        async fn read_all(self: Box<Self>) -> Result<Bytes, BackendError> {
            Err(BackendError::Malformed("connection reset".to_string()))
        }
    }

    #[tokio::test]
    async fn test_raw_bytes_pass_through() {
        let out = normalize(RemovalResult::RawBytes(Bytes::from_static(b"png")))
            .await
            .unwrap();
        assert_eq!(&out[..], b"png");
    }

    #[tokio::test]
    async fn test_byte_stream_is_read_fully() {
        let source = Chunks(vec![&b"ab"[..], &b"cd"[..], &b"e"[..]]);
        let out = normalize(RemovalResult::ByteStream(Box::new(source)))
            .await
            .unwrap();
        assert_eq!(&out[..], b"abcde");
    }

    #[tokio::test]
    async fn test_byte_stream_read_failure_propagates() {
        let err = normalize(RemovalResult::ByteStream(Box::new(Broken)))
            .await
            .unwrap_err();
        assert!(matches!(err, RemovalError::ReadOutput(_)));
    }

    #[tokio::test]
    async fn test_wrapper_data_is_extracted_unchanged() {
        let wrapper = BytesWrapper {
            data: Some(Bytes::from_static(&[0, 1, 2, 255])),
        };
        let out = normalize(RemovalResult::BytesWrapper(wrapper)).await.unwrap();
        assert_eq!(&out[..], &[0u8, 1, 2, 255]);
    }

    #[tokio::test]
    async fn test_wrapper_without_data_is_unsupported() {
        let err = normalize(RemovalResult::BytesWrapper(BytesWrapper::default()))
            .await
            .unwrap_err();
        assert!(matches!(err, RemovalError::UnsupportedResultShape));
    }

    #[test]
    fn test_png_data_url_prefix_and_payload() {
        let url = to_png_data_url(b"hello");
        assert_eq!(url, "data:image/png;base64,aGVsbG8=");
    }
}
