//! Runs a removal CLI such as `rembg i`.
//!
//! Bytes mode: `<program> <args..> - -`, image on stdin, result on stdout.
//! Path mode:  `<program> <args..> <path> -`, result on stdout.

use std::ffi::OsStr;
use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::background::backends::{BackendError, BackgroundRemover};
use crate::background::result::RemovalResult;

const STDIO_MARKER: &str = "-";

pub struct CommandRemover {
    program: String,
    args: Vec<String>,
}

impl CommandRemover {
    pub fn new(program: String, args: Vec<String>) -> Self {
        Self { program, args }
    }

    async fn run(&self, input: &OsStr, stdin: Option<Bytes>) -> Result<Bytes, BackendError> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(input)
            .arg(STDIO_MARKER)
            .stdin(if stdin.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        debug!(program = %self.program, args = ?self.args, "Spawning removal command");
        let mut child = command.spawn()?;

        // Feed stdin from its own task so a full stdout pipe cannot deadlock us.
        let writer = match (stdin, child.stdin.take()) {
            (Some(image), Some(mut pipe)) => Some(tokio::spawn(async move {
                pipe.write_all(&image).await?;
                pipe.shutdown().await
            })),
            _ => None,
        };

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            return Err(BackendError::Command {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        if let Some(writer) = writer {
            writer.await.map_err(std::io::Error::other)??;
        }

        Ok(Bytes::from(output.stdout))
    }
}

fn non_empty(bytes: Bytes) -> Option<RemovalResult> {
    (!bytes.is_empty()).then_some(RemovalResult::RawBytes(bytes))
}

#[async_trait]
impl BackgroundRemover for CommandRemover {
    fn name(&self) -> &'static str {
        "command"
    }

    async fn remove_from_bytes(
        &self,
        image: Bytes,
    ) -> Result<Option<RemovalResult>, BackendError> {
        let output = self.run(OsStr::new(STDIO_MARKER), Some(image)).await?;
        Ok(non_empty(output))
    }

    async fn remove_from_path(&self, path: &Path) -> Result<Option<RemovalResult>, BackendError> {
        let output = self.run(path.as_os_str(), None).await?;
        Ok(non_empty(output))
    }
}
