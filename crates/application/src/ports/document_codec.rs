//! Document codec port
//!
//! Defines the interface for reading and writing descriptor files.

use std::path::{Path, PathBuf};

use deployable_domain::Document;

/// Errors that can occur while reading or writing a document.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The document file does not exist.
    #[error("Document not found: {}", .0.display())]
    NotFound(PathBuf),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Parsing or serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The file extension does not map to a known format.
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

/// Port for the on-disk structured-document format.
///
/// Formatting differences introduced by a read/write round trip are the
/// codec's concern, not the interpolation engine's.
pub trait DocumentCodec: Send + Sync {
    /// Reads a document from a file.
    ///
    /// # Errors
    /// Returns `CodecError::NotFound` if the file doesn't exist, or another
    /// variant if it cannot be read or parsed.
    fn read(&self, path: &Path) -> Result<Document, CodecError>;

    /// Writes a document to a file, replacing any existing content.
    ///
    /// # Errors
    /// Returns an error if the document cannot be serialized or written.
    fn write(&self, path: &Path, document: &Document) -> Result<(), CodecError>;
}

impl<T: DocumentCodec + ?Sized> DocumentCodec for &T {
    fn read(&self, path: &Path) -> Result<Document, CodecError> {
        (**self).read(path)
    }

    fn write(&self, path: &Path, document: &Document) -> Result<(), CodecError> {
        (**self).write(path, document)
    }
}
