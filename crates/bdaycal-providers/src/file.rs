//! Local file contact source.

use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{SourceError, SourceResult};
use crate::source::{BoxFuture, ContactSource};

/// Contact source backed by a vCard export on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileSource {
    /// Path to the vCard file.
    path: PathBuf,
}

impl FileSource {
    /// Creates a new file source for the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the configured path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContactSource for FileSource {
    fn name(&self) -> &str {
        "file"
    }

    fn descriptor(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn fetch(&self) -> BoxFuture<'_, SourceResult<String>> {
        Box::pin(async move {
            debug!(path = %self.path.display(), "Reading contact file");

            match tokio::fs::read_to_string(&self.path).await {
                Ok(payload) => Ok(payload),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Err(SourceError::not_found(
                    format!("Contact file not found: {}", self.path.display()),
                )
                .with_source_name("file")
                .with_cause(e)),
                Err(e) => Err(SourceError::io(format!(
                    "Failed to read contact file: {}",
                    self.path.display()
                ))
                .with_source_name("file")
                .with_cause(e)),
            }
        })
    }
}
