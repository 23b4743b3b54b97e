//! Property sources and the recognized CI property names.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The CI-friendly property names this crate claims ownership of.
///
/// These are the names Maven reserves for CI-friendly versions
/// (`<version>${revision}${sha1}${changelist}</version>`). Any other
/// placeholder in a descriptor is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CiProperty {
    /// Commit hash of the build, `${sha1}`.
    Sha1,
    /// Base revision, `${revision}`.
    Revision,
    /// Changelist qualifier such as `-SNAPSHOT`, `${changelist}`.
    Changelist,
}

impl CiProperty {
    /// All recognized properties, in declaration order.
    pub const ALL: [Self; 3] = [Self::Sha1, Self::Revision, Self::Changelist];

    /// Returns the placeholder name of this property.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Revision => "revision",
            Self::Changelist => "changelist",
        }
    }

    /// Looks up a property by its exact placeholder name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for CiProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CiProperty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.trim()).ok_or_else(|| DomainError::UnknownProperty(s.to_string()))
    }
}

/// A named, read-only snapshot of properties.
///
/// A `PropertySource` is one link of a property source chain: user
/// overrides, the process environment or the defaults a document declares.
/// An empty value is a present value.
///
/// # Example
///
/// ```
/// use deployable_domain::PropertySource;
///
/// let source = PropertySource::new("user").with_property("revision", "1.2.0");
/// assert_eq!(source.get("revision"), Some("1.2.0"));
/// assert_eq!(source.get("sha1"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertySource {
    /// Name of the source, used in diagnostics.
    name: String,
    /// Key-value properties from this source.
    properties: HashMap<String, String>,
}

impl PropertySource {
    /// Creates an empty source with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: HashMap::new(),
        }
    }

    /// Creates a source from an existing property map.
    pub fn from_map(name: impl Into<String>, properties: HashMap<String, String>) -> Self {
        Self {
            name: name.into(),
            properties,
        }
    }

    /// Adds a property, replacing any previous value for the key.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Returns the name of this source.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a reference to the properties map.
    #[must_use]
    pub const fn properties(&self) -> &HashMap<String, String> {
        &self.properties
    }

    /// Gets a property value by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    /// Returns the number of properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Returns true if there are no properties.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

/// Parses a `name=value` definition as given on a command line with `-D`.
///
/// A bare `name` defines the property with an empty value.
///
/// # Errors
///
/// Returns [`DomainError::InvalidPropertyDefinition`] when the name is empty.
pub fn parse_definition(definition: &str) -> Result<(String, String), DomainError> {
    let (name, value) = definition.split_once('=').unwrap_or((definition, ""));
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::InvalidPropertyDefinition(definition.to_string()));
    }
    Ok((name.to_string(), value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ci_property_names() {
        assert_eq!(CiProperty::Sha1.name(), "sha1");
        assert_eq!(CiProperty::Revision.to_string(), "revision");
        assert_eq!(CiProperty::from_name("changelist"), Some(CiProperty::Changelist));
        assert_eq!(CiProperty::from_name("Revision"), None);
        assert_eq!(CiProperty::from_name("user.name"), None);
    }

    #[test]
    fn test_ci_property_from_str() {
        assert_eq!("sha1".parse::<CiProperty>(), Ok(CiProperty::Sha1));
        assert_eq!(
            "version".parse::<CiProperty>(),
            Err(DomainError::UnknownProperty("version".to_string()))
        );
    }

    #[test]
    fn test_ci_property_serde() {
        let json = serde_json::to_string(&CiProperty::Changelist).unwrap();
        assert_eq!(json, "\"changelist\"");
        let parsed: CiProperty = serde_json::from_str("\"revision\"").unwrap();
        assert_eq!(parsed, CiProperty::Revision);
    }

    #[test]
    fn test_property_source_empty_value_is_present() {
        let source = PropertySource::new("env").with_property("changelist", "");
        assert_eq!(source.get("changelist"), Some(""));
        assert_eq!(source.len(), 1);
        assert!(!source.is_empty());
        assert_eq!(source.name(), "env");
    }

    #[test]
    fn test_parse_definition() {
        assert_eq!(
            parse_definition("revision=1.0.0").unwrap(),
            ("revision".to_string(), "1.0.0".to_string())
        );
        assert_eq!(
            parse_definition("changelist").unwrap(),
            ("changelist".to_string(), String::new())
        );
        assert_eq!(
            parse_definition("sha1=a=b").unwrap(),
            ("sha1".to_string(), "a=b".to_string())
        );
        assert!(parse_definition("=value").is_err());
    }
}
