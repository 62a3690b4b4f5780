use async_trait::async_trait;
use std::fs::{self, create_dir_all};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::content::{ContentDocument, PartialContent};

/// Errors raised while reading, writing or transferring the content document
#[derive(Debug, Error)]
pub enum ContentError {
    /// File I/O on the stored document failed
    #[error("content file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document is not valid JSON
    #[error("content file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// A submitted payload had the wrong shape
    #[error("{0}")]
    InvalidBody(String),

    /// Writes need the edit password
    #[error("Unauthorized")]
    Unauthorized,

    /// The remote content API could not be reached or answered with an error
    #[error("content API request failed: {0}")]
    Remote(String),
}

impl ContentError {
    pub fn is_client_error(&self) -> bool {
        matches!(self, ContentError::InvalidBody(_) | ContentError::Unauthorized)
    }
}

/// Somewhere the edit session can load content from and publish it to
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the current document; fields the source does not know are absent
    async fn fetch(&self) -> Result<PartialContent, ContentError>;

    /// Replace the whole stored document
    async fn publish(
        &self,
        doc: &ContentDocument,
        credential: Option<&str>,
    ) -> Result<(), ContentError>;
}

/// The single JSON file holding the site copy
///
/// There is no locking: two concurrent writers race and the last rename wins.
#[derive(Debug, Clone)]
pub struct ContentStore {
    path: PathBuf,
}

impl ContentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ContentStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored document
    ///
    /// A missing file is not an error: the empty default document is written
    /// to disk and returned.
    ///
    /// # Errors
    /// * `ContentError::Io` if the file exists but cannot be read, or the
    ///   default cannot be created
    /// * `ContentError::Corrupt` if the file is not a JSON object
    pub fn read(&self) -> Result<ContentDocument, ContentError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let partial: PartialContent = serde_json::from_str(&contents)?;
                Ok(ContentDocument::from_partial(partial))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!(
                    "No content file at {}, creating an empty one",
                    self.path.display()
                );
                let doc = ContentDocument::default();
                self.write(&doc)?;
                Ok(doc)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite the stored document
    ///
    /// The JSON is written to a sibling temp file and renamed over the target,
    /// so a reader sees either the old or the new document.
    pub fn write(&self, doc: &ContentDocument) -> Result<(), ContentError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !dir.exists() {
            create_dir_all(&dir)?;
        }

        let json = serde_json::to_string_pretty(doc)?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(json.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        log::debug!("Wrote content file {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl ContentSource for ContentStore {
    async fn fetch(&self) -> Result<PartialContent, ContentError> {
        self.read().map(PartialContent::from)
    }

    async fn publish(
        &self,
        doc: &ContentDocument,
        _credential: Option<&str>,
    ) -> Result<(), ContentError> {
        self.write(doc)
    }
}

/// Parse a submitted document body
///
/// The payload must be a JSON object. Missing or `null` fields become empty
/// defaults, so a write always replaces the whole document.
pub fn parse_document(body: &[u8]) -> Result<ContentDocument, ContentError> {
    let value: serde_json::Value = serde_json::from_slice(body)
        .map_err(|e| ContentError::InvalidBody(format!("Invalid JSON: {}", e)))?;

    if !value.is_object() {
        return Err(ContentError::InvalidBody("Invalid body".to_string()));
    }

    let partial: PartialContent = serde_json::from_value(value)
        .map_err(|e| ContentError::InvalidBody(format!("Invalid body: {}", e)))?;

    Ok(ContentDocument::from_partial(partial))
}
