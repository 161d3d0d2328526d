//! Scoped on-disk staging for uploaded attachments.
//!
//! A [`StagedAttachment`] owns a uniquely named `.pdf` file for the lifetime of
//! one request. The file is removed by [`StagedAttachment::discard`] after the
//! send attempt, and by `Drop` on any path that never reaches it.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::config::{STAGED_FILE_PREFIX, STAGED_FILE_SUFFIX};

#[derive(Debug)]
pub struct StagedAttachment {
    file: NamedTempFile,
}

impl StagedAttachment {
    /// Write `content` to a fresh file in `dir` (or the OS temp dir).
    pub fn stage(dir: Option<&Path>, content: &[u8]) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGED_FILE_PREFIX).suffix(STAGED_FILE_SUFFIX);

        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(content)?;
        file.flush()?;

        tracing::debug!(path = %file.path().display(), bytes = content.len(), "Staged attachment");
        Ok(Self { file })
    }

    /// Stage on the blocking pool so large uploads don't stall the runtime.
    pub async fn stage_blocking(dir: Option<PathBuf>, content: axum::body::Bytes) -> io::Result<Self> {
        tokio::task::spawn_blocking(move || Self::stage(dir.as_deref(), &content))
            .await
            .map_err(io::Error::other)?
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    pub async fn read(&self) -> io::Result<Vec<u8>> {
        tokio::fs::read(self.path()).await
    }

    /// Delete the file now. Failures are logged; the request outcome stands.
    pub fn discard(self) {
        let path = self.path().to_path_buf();
        match self.file.close() {
            Ok(()) => tracing::debug!(path = %path.display(), "Removed staged attachment"),
            Err(e) => tracing::warn!(
                path = %path.display(),
                error = %e,
                "Failed to remove staged attachment"
            ),
        }
    }
}
