//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The name is not one of the recognized CI properties.
    #[error("unknown CI property: {0}")]
    UnknownProperty(String),

    /// A `name=value` property definition is malformed.
    #[error("invalid property definition: {0}")]
    InvalidPropertyDefinition(String),
}

/// Anomalies found in a property value while it is substituted into a document.
///
/// These are the causes attached to a [`crate::Problem`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PropertyError {
    /// The value contains a placeholder naming the property itself.
    #[error("expression cycle: value of '{name}' references itself ('{value}')")]
    RecursiveReference {
        /// The property being substituted.
        name: String,
        /// The offending value.
        value: String,
    },

    /// The value contains a placeholder that is substituted literally, not expanded.
    #[error("value of '{name}' contains the unexpanded placeholder '${{{nested}}}'")]
    NestedPlaceholder {
        /// The property being substituted.
        name: String,
        /// The placeholder name found inside the value.
        nested: String,
    },

    /// The value contains line breaks or other control characters.
    #[error("value of '{name}' contains control characters")]
    ControlCharacters {
        /// The property being substituted.
        name: String,
    },
}

impl PropertyError {
    /// Returns the name of the property whose value is at fault.
    #[must_use]
    pub fn property(&self) -> &str {
        match self {
            Self::RecursiveReference { name, .. }
            | Self::NestedPlaceholder { name, .. }
            | Self::ControlCharacters { name } => name,
        }
    }
}
