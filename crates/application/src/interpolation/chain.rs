//! Property source chain
//!
//! Holds the property sources for resolution with proper precedence.

use deployable_domain::{CiProperty, PropertySource};

/// Ordered property sources plus the recognized-name allow-list.
///
/// Sources are consulted in order of precedence (first source wins). Only
/// recognized names are ever looked up; every other name is absent, so the
/// chain never acts as a general property resolver.
///
/// The canonical chain for CI properties is:
/// 1. User overrides (`-Dname=value`)
/// 2. Process environment
/// 3. Defaults declared in the document's `properties`
///
/// # Example
///
/// ```
/// use deployable_application::interpolation::PropertySourceChain;
/// use deployable_domain::PropertySource;
///
/// let chain = PropertySourceChain::ci(
///     PropertySource::new("user").with_property("revision", "2.0.0"),
///     PropertySource::new("environment"),
///     PropertySource::new("document").with_property("revision", "1.0.0"),
/// );
///
/// assert_eq!(chain.lookup("revision"), Some("2.0.0"));
/// assert_eq!(chain.lookup("project.version"), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertySourceChain {
    /// Ordered sources, highest precedence first.
    sources: Vec<PropertySource>,

    /// Names this chain answers for.
    recognized: Vec<CiProperty>,
}

impl PropertySourceChain {
    /// Returns a builder for constructing a chain.
    #[must_use]
    pub fn builder() -> PropertySourceChainBuilder {
        PropertySourceChainBuilder::default()
    }

    /// Creates the canonical CI chain recognizing every [`CiProperty`].
    #[must_use]
    pub fn ci(user: PropertySource, environment: PropertySource, document: PropertySource) -> Self {
        Self::builder()
            .source(user)
            .source(environment)
            .source(document)
            .build()
    }

    /// Returns the recognized properties.
    #[must_use]
    pub fn recognized(&self) -> &[CiProperty] {
        &self.recognized
    }

    /// Returns the property a name refers to, if the chain recognizes it.
    #[must_use]
    pub fn recognizes(&self, name: &str) -> Option<CiProperty> {
        CiProperty::from_name(name).filter(|p| self.recognized.contains(p))
    }

    /// Looks up a name, searching through sources in order.
    ///
    /// Returns the value from the first source that contains the name, or
    /// `None` if no source does or the name is not recognized.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.recognizes(name).and_then(|p| self.lookup_property(p))
    }

    /// Looks up a recognized property, searching through sources in order.
    #[must_use]
    pub fn lookup_property(&self, property: CiProperty) -> Option<&str> {
        if !self.recognized.contains(&property) {
            return None;
        }

        self.sources.iter().find_map(|source| {
            let value = source.get(property.name())?;
            tracing::trace!(%property, source = source.name(), "property resolved");
            Some(value)
        })
    }
}

/// Builder for [`PropertySourceChain`].
#[derive(Debug, Default)]
pub struct PropertySourceChainBuilder {
    sources: Vec<PropertySource>,
    recognized: Option<Vec<CiProperty>>,
}

impl PropertySourceChainBuilder {
    /// Appends a source below all previously added ones.
    #[must_use]
    pub fn source(mut self, source: PropertySource) -> Self {
        self.sources.push(source);
        self
    }

    /// Restricts the recognized names. Defaults to all of [`CiProperty::ALL`].
    #[must_use]
    pub fn recognize(mut self, properties: impl IntoIterator<Item = CiProperty>) -> Self {
        let mut recognized: Vec<CiProperty> = properties.into_iter().collect();
        recognized.sort();
        recognized.dedup();
        self.recognized = Some(recognized);
        self
    }

    /// Builds the chain.
    #[must_use]
    pub fn build(self) -> PropertySourceChain {
        PropertySourceChain {
            sources: self.sources,
            recognized: self.recognized.unwrap_or_else(|| CiProperty::ALL.to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_test_chain() -> PropertySourceChain {
        PropertySourceChain::ci(
            PropertySource::new("user").with_property("revision", "from-user"),
            PropertySource::new("environment")
                .with_property("revision", "from-env")
                .with_property("sha1", "abc123"),
            PropertySource::new("document")
                .with_property("revision", "from-doc")
                .with_property("sha1", "doc-sha")
                .with_property("changelist", "-SNAPSHOT")
                .with_property("user.name", "builder"),
        )
    }

    #[test]
    fn test_precedence_user_over_environment() {
        let chain = create_test_chain();
        assert_eq!(chain.lookup("revision"), Some("from-user"));
    }

    #[test]
    fn test_precedence_environment_over_document() {
        let chain = create_test_chain();
        assert_eq!(chain.lookup("sha1"), Some("abc123"));
    }

    #[test]
    fn test_falls_through_to_document() {
        let chain = create_test_chain();
        assert_eq!(chain.lookup("changelist"), Some("-SNAPSHOT"));
    }

    #[test]
    fn test_unrecognized_name_is_absent() {
        let chain = create_test_chain();
        // Present in the document source, but not a CI property
        assert_eq!(chain.lookup("user.name"), None);
        assert_eq!(chain.recognizes("user.name"), None);
    }

    #[test]
    fn test_empty_value_is_present() {
        let chain = PropertySourceChain::ci(
            PropertySource::new("user").with_property("changelist", ""),
            PropertySource::new("environment"),
            PropertySource::new("document").with_property("changelist", "-SNAPSHOT"),
        );
        assert_eq!(chain.lookup("changelist"), Some(""));
    }

    #[test]
    fn test_absent_in_every_source() {
        let chain = PropertySourceChain::ci(
            PropertySource::new("user"),
            PropertySource::new("environment"),
            PropertySource::new("document"),
        );
        assert_eq!(chain.lookup("revision"), None);
        assert_eq!(chain.recognizes("revision"), Some(CiProperty::Revision));
    }

    #[test]
    fn test_restricted_allow_list() {
        let chain = PropertySourceChain::builder()
            .source(PropertySource::new("user").with_property("sha1", "abc"))
            .recognize([CiProperty::Revision, CiProperty::Revision])
            .build();

        assert_eq!(chain.recognized(), &[CiProperty::Revision]);
        assert_eq!(chain.recognizes("sha1"), None);
        assert_eq!(chain.lookup("sha1"), None);
        assert_eq!(chain.lookup_property(CiProperty::Sha1), None);
    }

    #[test]
    fn test_builder_defaults() {
        let chain = PropertySourceChain::builder().build();
        assert_eq!(chain.lookup("revision"), None);
        assert_eq!(chain.recognized(), &CiProperty::ALL);
    }

    #[test]
    fn test_case_sensitive_names() {
        let chain = create_test_chain();
        assert_eq!(chain.lookup("REVISION"), None);
    }
}
