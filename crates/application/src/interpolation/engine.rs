//! Interpolation engine
//!
//! Rewrites every `${name}` placeholder of a document that the property
//! source chain claims, collecting problems along the way.

use deployable_domain::{
    Document, Node, NodeMap, NodePath, PathSegment, Problem, PropertyError, Severity,
};

use super::chain::PropertySourceChain;
use super::problems::ProblemCollector;
use super::scanner::scan;
use crate::ports::DiagnosticSink;

/// Interpolation failed because at least one fatal problem was recorded.
///
/// Carries the message and cause of the first fatal problem, plus every fatal
/// problem of the pass in the order they were found.
#[derive(Debug, thiserror::Error)]
#[error("Failed to interpolate CI properties: {message}")]
pub struct InterpolationFailure {
    message: String,
    #[source]
    cause: Option<PropertyError>,
    problems: Vec<Problem>,
}

impl InterpolationFailure {
    /// Builds a failure from the fatal problems of a pass.
    ///
    /// Returns `None` when there are none.
    #[must_use]
    pub fn from_problems(problems: Vec<Problem>) -> Option<Self> {
        let first = problems.first()?;
        Some(Self {
            message: first.message().to_string(),
            cause: first.cause().cloned(),
            problems,
        })
    }

    /// Returns the message of the first fatal problem.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the cause of the first fatal problem.
    #[must_use]
    pub const fn cause(&self) -> Option<&PropertyError> {
        self.cause.as_ref()
    }

    /// Returns every fatal problem of the pass.
    #[must_use]
    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }
}

/// Counters for one pass, logged at debug level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassStats {
    /// Scalars visited.
    pub scalars: usize,
    /// Placeholders replaced with a value from the chain.
    pub substituted: usize,
    /// Recognized placeholders replaced with the empty default.
    pub defaulted: usize,
    /// Unrecognized placeholders left as literal text.
    pub passed_through: usize,
}

/// The interpolation engine.
///
/// # Example
///
/// ```
/// use deployable_application::interpolation::{Interpolator, PropertySourceChain};
/// use deployable_application::ports::RecordingSink;
/// use deployable_domain::{Document, Node, PropertySource};
///
/// let doc = Document::new(Node::mapping([("version", Node::scalar("1.0.0-${revision}"))]));
/// let chain = PropertySourceChain::ci(
///     PropertySource::new("user").with_property("revision", "5"),
///     PropertySource::new("environment"),
///     PropertySource::new("document"),
/// );
///
/// let sink = RecordingSink::new();
/// let resolved = Interpolator::new(&sink).interpolate(&doc, &chain).unwrap();
/// assert_eq!(resolved.root().get("version").and_then(Node::as_scalar), Some("1.0.0-5"));
/// ```
pub struct Interpolator<'s> {
    sink: &'s dyn DiagnosticSink,
}

impl<'s> Interpolator<'s> {
    /// Creates an engine reporting non-fatal problems to `sink`.
    #[must_use]
    pub fn new(sink: &'s dyn DiagnosticSink) -> Self {
        Self { sink }
    }

    /// Resolves the placeholders of `document` against `chain`.
    ///
    /// The input is not modified; a rewritten copy with the same tree shape
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns [`InterpolationFailure`] if any fatal problem was recorded.
    /// The whole document is still visited first, so every problem of the
    /// pass is reported.
    pub fn interpolate(
        &self,
        document: &Document,
        chain: &PropertySourceChain,
    ) -> Result<Document, InterpolationFailure> {
        self.interpolate_with_stats(document, chain)
            .map(|(document, _)| document)
    }

    /// Same as [`Interpolator::interpolate`], also returning the pass counters.
    ///
    /// # Errors
    ///
    /// Returns [`InterpolationFailure`] if any fatal problem was recorded.
    pub fn interpolate_with_stats(
        &self,
        document: &Document,
        chain: &PropertySourceChain,
    ) -> Result<(Document, PassStats), InterpolationFailure> {
        let mut pass = Pass {
            chain,
            problems: ProblemCollector::new(self.sink),
            path: NodePath::root(),
            stats: PassStats::default(),
        };

        let root = pass.node(document.root());
        let stats = pass.stats;

        tracing::debug!(
            scalars = stats.scalars,
            substituted = stats.substituted,
            defaulted = stats.defaulted,
            passed_through = stats.passed_through,
            "interpolation pass finished"
        );

        match InterpolationFailure::from_problems(pass.problems.into_fatal()) {
            Some(failure) => Err(failure),
            None => Ok((Document::new(root), stats)),
        }
    }
}

impl std::fmt::Debug for Interpolator<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpolator").finish_non_exhaustive()
    }
}

/// Resolves the placeholders of `document` against `chain`, reporting to `sink`.
///
/// # Errors
///
/// Returns [`InterpolationFailure`] if any fatal problem was recorded.
pub fn resolve(
    document: &Document,
    chain: &PropertySourceChain,
    sink: &dyn DiagnosticSink,
) -> Result<Document, InterpolationFailure> {
    Interpolator::new(sink).interpolate(document, chain)
}

/// State of a single traversal.
struct Pass<'a, 's> {
    chain: &'a PropertySourceChain,
    problems: ProblemCollector<'s>,
    path: NodePath,
    stats: PassStats,
}

impl Pass<'_, '_> {
    fn node(&mut self, node: &Node) -> Node {
        match node {
            Node::Scalar(value) => Node::Scalar(self.scalar(value)),
            Node::Sequence(items) => {
                let mut rewritten = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    self.path.push(PathSegment::Index(index));
                    rewritten.push(self.node(item));
                    self.path.pop();
                }
                Node::Sequence(rewritten)
            }
            Node::Mapping(map) => {
                let mut rewritten = NodeMap::with_capacity(map.len());
                for (key, item) in map {
                    self.path.push(PathSegment::Key(key.clone()));
                    rewritten.insert(key.clone(), self.node(item));
                    self.path.pop();
                }
                Node::Mapping(rewritten)
            }
        }
    }

    fn scalar(&mut self, input: &str) -> String {
        self.stats.scalars += 1;
        let chain = self.chain;

        let mut placeholders = scan(input).peekable();
        if placeholders.peek().is_none() {
            return input.to_string();
        }

        let mut result = String::with_capacity(input.len());
        let mut last_end = 0;

        for placeholder in placeholders {
            // Append text before this placeholder
            result.push_str(&input[last_end..placeholder.span.start]);

            if let Some(value) = chain.lookup(placeholder.name) {
                self.inspect(placeholder.name, value);
                result.push_str(value);
                self.stats.substituted += 1;
            } else if chain.recognizes(placeholder.name).is_some() {
                // Recognized names always resolve to some string
                tracing::debug!(
                    property = placeholder.name,
                    path = %self.path,
                    "no value in any source, substituting empty string"
                );
                self.stats.defaulted += 1;
            } else {
                // Not ours to resolve: keep the original ${name}
                result.push_str(&input[placeholder.span.clone()]);
                self.stats.passed_through += 1;
            }

            last_end = placeholder.span.end;
        }

        // Append remaining text after last placeholder
        result.push_str(&input[last_end..]);
        result
    }

    /// Records problems for anomalies in a value about to be substituted.
    fn inspect(&mut self, name: &str, value: &str) {
        for nested in scan(value) {
            if nested.name == name {
                self.report(
                    Severity::Fatal,
                    PropertyError::RecursiveReference {
                        name: name.to_string(),
                        value: value.to_string(),
                    },
                );
                break;
            }
            self.report(
                Severity::Warning,
                PropertyError::NestedPlaceholder {
                    name: name.to_string(),
                    nested: nested.name.to_string(),
                },
            );
        }

        if value.chars().any(char::is_control) {
            self.report(
                Severity::Error,
                PropertyError::ControlCharacters {
                    name: name.to_string(),
                },
            );
        }
    }

    fn report(&mut self, severity: Severity, cause: PropertyError) {
        let message = format!("Resolving '${{{}}}' at {}: {cause}", cause.property(), self.path);
        self.problems.add(Problem::new(severity, message).with_cause(cause));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::RecordingSink;
    use deployable_domain::{CiProperty, PropertySource};
    use pretty_assertions::assert_eq;

    fn chain_with(user: &[(&str, &str)]) -> PropertySourceChain {
        let mut source = PropertySource::new("user");
        for (k, v) in user {
            source = source.with_property(*k, *v);
        }
        PropertySourceChain::ci(
            source,
            PropertySource::new("environment"),
            PropertySource::new("document"),
        )
    }

    fn version_doc(version: &str) -> Document {
        Document::new(Node::mapping([("version", Node::scalar(version))]))
    }

    fn version_of(doc: &Document) -> &str {
        doc.root()
            .get("version")
            .and_then(Node::as_scalar)
            .unwrap_or_default()
    }

    #[test]
    fn test_substitutes_present_values() {
        let sink = RecordingSink::new();
        let chain = chain_with(&[("revision", "5"), ("changelist", "")]);

        let resolved = resolve(&version_doc("1.0.0-${revision}${changelist}"), &chain, &sink)
            .unwrap();

        assert_eq!(version_of(&resolved), "1.0.0-5");
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn test_recognized_absent_defaults_to_empty() {
        let sink = RecordingSink::new();
        let chain = chain_with(&[]);

        let resolved = resolve(&version_doc("1.0.0-${revision}${changelist}"), &chain, &sink)
            .unwrap();

        assert_eq!(version_of(&resolved), "1.0.0-");
    }

    #[test]
    fn test_unrecognized_passes_through() {
        let sink = RecordingSink::new();
        let chain = chain_with(&[("revision", "5")]);
        let doc = Document::new(Node::mapping([("note", Node::scalar("built by ${user.name}"))]));

        let resolved = resolve(&doc, &chain, &sink).unwrap();

        assert_eq!(resolved, doc);
    }

    #[test]
    fn test_not_recognized_by_restricted_chain_passes_through() {
        let sink = RecordingSink::new();
        let chain = PropertySourceChain::builder()
            .source(PropertySource::new("user").with_property("sha1", "abc"))
            .recognize([CiProperty::Revision])
            .build();

        let resolved = resolve(&version_doc("${revision}-${sha1}"), &chain, &sink).unwrap();
        assert_eq!(version_of(&resolved), "-${sha1}");
    }

    #[test]
    fn test_substituted_value_is_not_rescanned() {
        let sink = RecordingSink::new();
        let chain = chain_with(&[("revision", "${changelist}"), ("changelist", "-SNAPSHOT")]);

        let resolved = resolve(&version_doc("${revision}"), &chain, &sink).unwrap();

        assert_eq!(version_of(&resolved), "${changelist}");
        let warnings = sink.with_severity(Severity::Warning);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("version"));
        assert!(warnings[0].message.contains("${revision}"));
    }

    #[test]
    fn test_control_characters_logged_as_error_without_abort() {
        let sink = RecordingSink::new();
        let chain = chain_with(&[("sha1", "abc\n")]);

        let resolved = resolve(&version_doc("${sha1}"), &chain, &sink).unwrap();

        assert_eq!(version_of(&resolved), "abc\n");
        assert_eq!(sink.with_severity(Severity::Error).len(), 1);
    }

    #[test]
    fn test_self_reference_is_fatal() {
        let sink = RecordingSink::new();
        let chain = chain_with(&[("revision", "1.${revision}")]);

        let failure = resolve(&version_doc("${revision}"), &chain, &sink).unwrap_err();

        assert!(failure.to_string().starts_with("Failed to interpolate CI properties: "));
        assert!(failure.message().contains("version"));
        assert!(matches!(
            failure.cause(),
            Some(PropertyError::RecursiveReference { name, .. }) if name == "revision"
        ));
        assert_eq!(failure.problems().len(), 1);
        // Fatal problems are not sent to the sink
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn test_fatal_in_last_node_still_aborts() {
        let sink = RecordingSink::new();
        let chain = chain_with(&[("revision", "1"), ("sha1", "${sha1}")]);
        let doc = Document::new(Node::mapping([
            ("a", Node::scalar("${revision}")),
            ("b", Node::scalar("${revision}")),
            ("last", Node::scalar("${sha1}")),
        ]));

        let failure = resolve(&doc, &chain, &sink).unwrap_err();
        assert!(failure.message().contains("last"));
    }

    #[test]
    fn test_problems_after_fatal_are_still_collected() {
        let sink = RecordingSink::new();
        let chain = chain_with(&[("revision", "${revision}"), ("sha1", "x\ty")]);
        let doc = Document::new(Node::mapping([
            ("first", Node::scalar("${revision}")),
            ("second", Node::scalar("${sha1}")),
            ("third", Node::scalar("${revision}")),
        ]));

        let failure = resolve(&doc, &chain, &sink).unwrap_err();

        // First fatal problem determines the message
        assert!(failure.message().contains("first"));
        assert_eq!(failure.problems().len(), 2);
        // The error in `second` was logged even though the pass had already failed
        assert_eq!(sink.with_severity(Severity::Error).len(), 1);
    }

    #[test]
    fn test_traverses_sequences_and_nested_mappings() {
        let sink = RecordingSink::new();
        let chain = chain_with(&[("sha1", "abc")]);
        let doc = Document::new(Node::mapping([(
            "project",
            Node::mapping([(
                "modules",
                Node::Sequence(vec![
                    Node::scalar("core-${sha1}"),
                    Node::mapping([("name", Node::scalar("${sha1}"))]),
                ]),
            )]),
        )]));

        let (resolved, stats) = Interpolator::new(&sink)
            .interpolate_with_stats(&doc, &chain)
            .unwrap();

        assert!(resolved.same_shape(&doc));
        let modules = resolved
            .root()
            .get("project")
            .and_then(|p| p.get("modules"))
            .and_then(Node::as_sequence)
            .unwrap();
        assert_eq!(modules[0].as_scalar(), Some("core-abc"));
        assert_eq!(modules[1].get("name").and_then(Node::as_scalar), Some("abc"));
        assert_eq!(stats.scalars, 2);
        assert_eq!(stats.substituted, 2);
    }

    #[test]
    fn test_mapping_keys_are_not_interpolated() {
        let sink = RecordingSink::new();
        let chain = chain_with(&[("sha1", "abc")]);
        let doc = Document::new(Node::mapping([("${sha1}", Node::scalar("${sha1}"))]));

        let resolved = resolve(&doc, &chain, &sink).unwrap();

        assert_eq!(
            resolved.root().get("${sha1}").and_then(Node::as_scalar),
            Some("abc")
        );
    }

    #[test]
    fn test_input_document_is_untouched() {
        let sink = RecordingSink::new();
        let chain = chain_with(&[("revision", "9")]);
        let doc = version_doc("${revision}");
        let before = doc.clone();

        let _ = resolve(&doc, &chain, &sink).unwrap();

        assert_eq!(doc, before);
    }

    #[test]
    fn test_malformed_placeholder_left_literal() {
        let sink = RecordingSink::new();
        let chain = chain_with(&[("revision", "9")]);

        let resolved = resolve(&version_doc("${revision}-${revision"), &chain, &sink).unwrap();
        assert_eq!(version_of(&resolved), "9-${revision");
    }

    #[test]
    fn test_failure_without_problems() {
        assert!(InterpolationFailure::from_problems(Vec::new()).is_none());
    }
}
