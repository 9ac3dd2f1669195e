//! Background-removal invoker: primary in-memory call with a one-shot
//! scratch-file fallback.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use tempfile::TempDir;
use tracing::{debug, warn};

use crate::background::backends::BackgroundRemover;
use crate::background::result::RemovalResult;
use crate::background::RemovalError;

const SCRATCH_DIR_PREFIX: &str = "bg-rem-";

#[derive(Clone)]
pub struct RemovalInvoker {
    remover: Arc<dyn BackgroundRemover>,
    scratch_root: PathBuf,
}

impl RemovalInvoker {
    pub fn new(remover: Arc<dyn BackgroundRemover>, scratch_root: PathBuf) -> Self {
        Self {
            remover,
            scratch_root,
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.remover.name()
    }

    /// Any primary failure triggers exactly one path-based retry, whatever
    /// the cause. A fallback failure is terminal.
    pub async fn invoke(&self, image: Bytes) -> Result<RemovalResult, RemovalError> {
        let result = match self.remover.remove_from_bytes(image.clone()).await {
            Ok(result) => result,
            Err(first_err) => {
                warn!(
                    backend = self.remover.name(),
                    "remove_from_bytes failed, retrying from a file: {first_err}"
                );
                self.remove_via_scratch_file(&image).await?
            }
        };

        result.ok_or(RemovalError::EmptyResult)
    }

    async fn remove_via_scratch_file(
        &self,
        image: &Bytes,
    ) -> Result<Option<RemovalResult>, RemovalError> {
        let scratch = ScratchFile::write(&self.scratch_root, image).await?;
        debug!(path = %scratch.path().display(), "Wrote fallback input");

        let outcome = self.remover.remove_from_path(scratch.path()).await;
        scratch.cleanup().await;

        outcome.map_err(RemovalError::RemovalFailure)
    }
}

/// A uniquely named directory holding one input file.
///
/// `cleanup` removes both and logs failures. If the owning future is dropped
/// before `cleanup` runs, `TempDir`'s destructor still removes the directory.
struct ScratchFile {
    dir: Option<TempDir>,
    path: PathBuf,
}

impl ScratchFile {
    async fn write(root: &Path, image: &[u8]) -> std::io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(SCRATCH_DIR_PREFIX)
            .tempdir_in(root)?;
        let path = dir
            .path()
            .join(format!("input-{}.png", chrono::Utc::now().timestamp_millis()));
        tokio::fs::write(&path, image).await?;

        Ok(Self {
            dir: Some(dir),
            path,
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    async fn cleanup(mut self) {
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            warn!(path = %self.path.display(), "Temp cleanup failed: {e}");
        }
        if let Some(dir) = self.dir.take() {
            match tokio::fs::remove_dir(dir.path()).await {
                // Already gone; disarm the guard so its destructor has nothing to do.
                Ok(()) => {
                    let _ = dir.into_path();
                }
                Err(e) => {
                    warn!(path = %dir.path().display(), "Temp cleanup failed: {e}");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::background::backends::BackendError;
    use crate::background::result::BytesWrapper;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Clone, Copy)]
    enum Outcome {
        Image,
        Nothing,
        Fail,
    }

    /// Records every call and the paths it was handed, and asserts the
    /// scratch file exists while the path-based call is running.
    struct ScriptedRemover {
        from_bytes: Outcome,
        from_path: Outcome,
        calls: Mutex<Vec<String>>,
        seen_paths: Mutex<Vec<PathBuf>>,
    }

    impl ScriptedRemover {
        fn new(from_bytes: Outcome, from_path: Outcome) -> Arc<Self> {
            Arc::new(Self {
                from_bytes,
                from_path,
                calls: Mutex::new(Vec::new()),
                seen_paths: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn seen_paths(&self) -> Vec<PathBuf> {
            self.seen_paths.lock().unwrap().clone()
        }
    }

    fn respond(outcome: Outcome, payload: Bytes) -> Result<Option<RemovalResult>, BackendError> {
        match outcome {
            Outcome::Image => Ok(Some(RemovalResult::RawBytes(payload))),
            Outcome::Nothing => Ok(None),
            Outcome::Fail => Err(BackendError::Malformed("unsupported image".to_string())),
        }
    }

    #[async_trait]
    impl BackgroundRemover for ScriptedRemover {
        fn name(&self) -> &'static str {
            "scripted"
        }

        async fn remove_from_bytes(
            &self,
            image: Bytes,
        ) -> Result<Option<RemovalResult>, BackendError> {
            self.calls.lock().unwrap().push("bytes".to_string());
            respond(self.from_bytes, image)
        }

        async fn remove_from_path(
            &self,
            path: &Path,
        ) -> Result<Option<RemovalResult>, BackendError> {
            self.calls.lock().unwrap().push("path".to_string());
            self.seen_paths.lock().unwrap().push(path.to_path_buf());
            let contents = tokio::fs::read(path).await?;
            respond(self.from_path, Bytes::from(contents))
        }
    }

    fn invoker(remover: Arc<ScriptedRemover>, root: &Path) -> RemovalInvoker {
        RemovalInvoker::new(remover, root.to_path_buf())
    }

    fn entries(root: &Path) -> usize {
        std::fs::read_dir(root).unwrap().count()
    }

    #[tokio::test]
    async fn test_primary_success_skips_fallback() {
        let root = tempfile::tempdir().unwrap();
        let remover = ScriptedRemover::new(Outcome::Image, Outcome::Fail);

        let result = invoker(remover.clone(), root.path())
            .invoke(Bytes::from_static(b"img"))
            .await
            .unwrap();

        assert!(matches!(result, RemovalResult::RawBytes(ref b) if &b[..] == b"img"));
        assert_eq!(remover.calls(), vec!["bytes"]);
        assert_eq!(entries(root.path()), 0);
    }

    #[tokio::test]
    async fn test_primary_failure_falls_back_once_and_cleans_up() {
        let root = tempfile::tempdir().unwrap();
        let remover = ScriptedRemover::new(Outcome::Fail, Outcome::Image);

        let result = invoker(remover.clone(), root.path())
            .invoke(Bytes::from_static(b"img"))
            .await
            .unwrap();

        // The path-based call saw the same bytes the caller supplied.
        assert!(matches!(result, RemovalResult::RawBytes(ref b) if &b[..] == b"img"));
        assert_eq!(remover.calls(), vec!["bytes", "path"]);

        let seen = remover.seen_paths();
        assert_eq!(seen.len(), 1);
        let file_name = seen[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("input-") && file_name.ends_with(".png"));
        let dir_name = seen[0]
            .parent()
            .unwrap()
            .file_name()
            .unwrap()
            .to_string_lossy()
            .to_string();
        assert!(dir_name.starts_with(SCRATCH_DIR_PREFIX));

        assert!(!seen[0].exists());
        assert!(!seen[0].parent().unwrap().exists());
        assert_eq!(entries(root.path()), 0);
    }

    #[tokio::test]
    async fn test_fallback_failure_propagates_and_cleans_up() {
        let root = tempfile::tempdir().unwrap();
        let remover = ScriptedRemover::new(Outcome::Fail, Outcome::Fail);

        let err = invoker(remover.clone(), root.path())
            .invoke(Bytes::from_static(b"img"))
            .await
            .unwrap_err();

        assert!(matches!(err, RemovalError::RemovalFailure(_)));
        assert_eq!(remover.calls(), vec!["bytes", "path"]);
        assert_eq!(entries(root.path()), 0);
    }

    #[tokio::test]
    async fn test_empty_primary_result_is_empty_result_without_fallback() {
        let root = tempfile::tempdir().unwrap();
        let remover = ScriptedRemover::new(Outcome::Nothing, Outcome::Image);

        let err = invoker(remover.clone(), root.path())
            .invoke(Bytes::from_static(b"img"))
            .await
            .unwrap_err();

        assert!(matches!(err, RemovalError::EmptyResult));
        assert_eq!(remover.calls(), vec!["bytes"]);
    }

    #[tokio::test]
    async fn test_empty_fallback_result_is_empty_result() {
        let root = tempfile::tempdir().unwrap();
        let remover = ScriptedRemover::new(Outcome::Fail, Outcome::Nothing);

        let err = invoker(remover, root.path())
            .invoke(Bytes::from_static(b"img"))
            .await
            .unwrap_err();

        assert!(matches!(err, RemovalError::EmptyResult));
        assert_eq!(entries(root.path()), 0);
    }

    #[tokio::test]
    async fn test_unwritable_scratch_root_surfaces_scratch_error() {
        let root = tempfile::tempdir().unwrap();
        let missing = root.path().join("does-not-exist");
        let remover = ScriptedRemover::new(Outcome::Fail, Outcome::Image);

        let err = invoker(remover.clone(), &missing)
            .invoke(Bytes::from_static(b"img"))
            .await
            .unwrap_err();

        assert!(matches!(err, RemovalError::Scratch(_)));
        assert_eq!(remover.calls(), vec!["bytes"]);
    }

    #[tokio::test]
    async fn test_cleanup_failure_does_not_replace_result() {
        /// Deletes its input before returning, so the file removal in
        /// cleanup hits a missing file.
        struct ConsumingRemover;

        #[async_trait]
        impl BackgroundRemover for ConsumingRemover {
            fn name(&self) -> &'static str {
                "consuming"
            }

            async fn remove_from_bytes(
                &self,
                _image: Bytes,
            ) -> Result<Option<RemovalResult>, BackendError> {
                Err(BackendError::Malformed("needs a file".to_string()))
            }

            async fn remove_from_path(
                &self,
                path: &Path,
            ) -> Result<Option<RemovalResult>, BackendError> {
                let contents = tokio::fs::read(path).await?;
                tokio::fs::remove_file(path).await?;
                Ok(Some(RemovalResult::RawBytes(Bytes::from(contents))))
            }
        }

        let root = tempfile::tempdir().unwrap();
        let result = RemovalInvoker::new(Arc::new(ConsumingRemover), root.path().to_path_buf())
            .invoke(Bytes::from_static(b"img"))
            .await
            .unwrap();

        assert!(matches!(result, RemovalResult::RawBytes(ref b) if &b[..] == b"img"));
        assert_eq!(entries(root.path()), 0);
    }

    #[tokio::test]
    async fn test_wrapper_results_are_returned_as_is() {
        struct WrapperRemover;

        #[async_trait]
        impl BackgroundRemover for WrapperRemover {
            fn name(&self) -> &'static str {
                "wrapper"
            }

            async fn remove_from_bytes(
                &self,
                image: Bytes,
            ) -> Result<Option<RemovalResult>, BackendError> {
                Ok(Some(RemovalResult::BytesWrapper(BytesWrapper {
                    data: Some(image),
                })))
            }

            async fn remove_from_path(
                &self,
                _path: &Path,
            ) -> Result<Option<RemovalResult>, BackendError> {
                unreachable!("primary path succeeds")
            }
        }

        let root = tempfile::tempdir().unwrap();
        let result = RemovalInvoker::new(Arc::new(WrapperRemover), root.path().to_path_buf())
            .invoke(Bytes::from_static(b"img"))
            .await
            .unwrap();
        assert!(matches!(result, RemovalResult::BytesWrapper(_)));
    }
}
