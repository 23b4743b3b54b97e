//! Document codecs for build descriptors.
//!
//! Every format reads into and writes from the same [`Document`] tree:
//! - XML (Maven POM) via `quick-xml`
//! - YAML via `serde_yaml`
//! - JSON via `serde_json`, written with stable 2-space indentation
//!
//! Non-string scalars (numbers, booleans) are read as strings and `null` as
//! an empty string, so formatting may change on a round trip.

mod file;
mod json;
mod xml;
mod yaml;

use std::path::Path;

use deployable_application::ports::CodecError;
use deployable_domain::Document;

pub use file::FileDocumentCodec;
pub use json::{from_json, to_json_stable};
pub use xml::{from_xml, to_xml};
pub use yaml::{from_yaml, to_yaml};

/// Error type for format conversions.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// XML parsing or writing failed.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// An XML attribute is malformed.
    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// JSON parsing or writing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or writing failed.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Text is not valid UTF-8.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Output buffer is not valid UTF-8.
    #[error("UTF-8 encoding error: {0}")]
    FromUtf8(#[from] std::string::FromUtf8Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The content parses but cannot be represented as a document.
    #[error("invalid document: {0}")]
    Invalid(String),
}

impl From<FormatError> for CodecError {
    fn from(error: FormatError) -> Self {
        match error {
            FormatError::Io(e) => Self::Io(e),
            other => Self::Serialization(other.to_string()),
        }
    }
}

/// On-disk formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// `.xml`, `.pom`
    Xml,
    /// `.yaml`, `.yml`
    Yaml,
    /// `.json`
    Json,
}

impl DocumentFormat {
    /// Determines the format from a path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnsupportedFormat`] for unknown or missing extensions.
    pub fn from_path(path: &Path) -> Result<Self, CodecError> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("xml" | "pom") => Ok(Self::Xml),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(CodecError::UnsupportedFormat(path.display().to_string())),
        }
    }

    /// Parses text in this format.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid document.
    pub fn parse(self, content: &str) -> Result<Document, FormatError> {
        match self {
            Self::Xml => from_xml(content),
            Self::Yaml => from_yaml(content),
            Self::Json => from_json(content),
        }
    }

    /// Renders a document in this format.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be represented in this format.
    pub fn render(self, document: &Document) -> Result<String, FormatError> {
        match self {
            Self::Xml => to_xml(document),
            Self::Yaml => to_yaml(document),
            Self::Json => to_json_stable(document),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(DocumentFormat::from_path(Path::new("pom.xml")).unwrap(), DocumentFormat::Xml);
        assert_eq!(DocumentFormat::from_path(Path::new("a/b.POM")).unwrap(), DocumentFormat::Xml);
        assert_eq!(DocumentFormat::from_path(Path::new("ci.yml")).unwrap(), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("ci.yaml")).unwrap(), DocumentFormat::Yaml);
        assert_eq!(DocumentFormat::from_path(Path::new("pkg.json")).unwrap(), DocumentFormat::Json);
    }

    #[test]
    fn test_unknown_extension() {
        assert!(matches!(
            DocumentFormat::from_path(Path::new("build.gradle")),
            Err(CodecError::UnsupportedFormat(_))
        ));
        assert!(DocumentFormat::from_path(Path::new("Makefile")).is_err());
    }

    #[test]
    fn test_format_error_to_codec_error() {
        let io = FormatError::Io(std::io::Error::other("boom"));
        assert!(matches!(CodecError::from(io), CodecError::Io(_)));

        let invalid = FormatError::Invalid("bad".to_string());
        assert!(matches!(
            CodecError::from(invalid),
            CodecError::Serialization(msg) if msg == "invalid document: bad"
        ));
    }
}
