//! Problems reported while resolving placeholders.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PropertyError;

/// How serious a [`Problem`] is.
///
/// Only [`Severity::Fatal`] aborts an interpolation pass; the other two are
/// logged and resolution continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    /// Logged as a warning.
    Warning,
    /// Logged as an error.
    Error,
    /// Retained and fails the pass once traversal completes.
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("WARNING"),
            Self::Error => f.write_str("ERROR"),
            Self::Fatal => f.write_str("FATAL"),
        }
    }
}

/// A single anomaly found while resolving a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Problem {
    message: String,
    cause: Option<PropertyError>,
    severity: Severity,
}

impl Problem {
    /// Creates a problem without a cause.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
            severity,
        }
    }

    /// Creates a warning.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Creates an error.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Creates a fatal problem.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(Severity::Fatal, message)
    }

    /// Attaches the underlying cause.
    #[must_use]
    pub fn with_cause(mut self, cause: PropertyError) -> Self {
        self.cause = Some(cause);
        self
    }

    /// Returns the message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the cause, if any.
    #[must_use]
    pub const fn cause(&self) -> Option<&PropertyError> {
        self.cause.as_ref()
    }

    /// Returns the severity.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        self.severity
    }

    /// Returns true for [`Severity::Fatal`] problems.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_problem_constructors() {
        assert_eq!(Problem::warning("w").severity(), Severity::Warning);
        assert_eq!(Problem::error("e").severity(), Severity::Error);
        assert!(Problem::fatal("f").is_fatal());
        assert!(!Problem::error("e").is_fatal());
    }

    #[test]
    fn test_problem_with_cause() {
        let cause = PropertyError::ControlCharacters {
            name: "sha1".to_string(),
        };
        let problem = Problem::error("bad value").with_cause(cause.clone());
        assert_eq!(problem.cause(), Some(&cause));
        assert_eq!(problem.to_string(), "[ERROR] bad value");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }
}
