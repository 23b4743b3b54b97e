//! File system document codec.

use std::fs;
use std::path::Path;

use deployable_application::ports::{CodecError, DocumentCodec};
use deployable_domain::Document;

use super::DocumentFormat;

/// Reads and writes descriptor files, choosing the format by extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileDocumentCodec;

impl FileDocumentCodec {
    /// Creates a new codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DocumentCodec for FileDocumentCodec {
    fn read(&self, path: &Path) -> Result<Document, CodecError> {
        let format = DocumentFormat::from_path(path)?;
        if !path.exists() {
            return Err(CodecError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let document = format.parse(&content)?;
        tracing::debug!(path = %path.display(), ?format, "Read document");
        Ok(document)
    }

    fn write(&self, path: &Path, document: &Document) -> Result<(), CodecError> {
        let format = DocumentFormat::from_path(path)?;
        let content = format.render(document)?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        tracing::debug!(path = %path.display(), ?format, "Wrote document");
        Ok(())
    }
}
