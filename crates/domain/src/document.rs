//! Structured build-descriptor documents.
//!
//! A [`Document`] is an ordered tree of [`Node`]s. Every codec (XML, YAML,
//! JSON) reads into and writes from this shape, so interpolation never needs
//! to know which format a descriptor came from.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::property::PropertySource;

/// Ordered mapping from names to nodes.
pub type NodeMap = IndexMap<String, Node>;

/// Name of the mapping holding document-declared default properties.
pub const PROPERTIES_KEY: &str = "properties";

/// A node of a document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    /// A string leaf.
    Scalar(String),
    /// An ordered list of nodes.
    Sequence(Vec<Node>),
    /// An ordered name-to-node mapping.
    Mapping(NodeMap),
}

impl Node {
    /// Creates a scalar node.
    pub fn scalar(value: impl Into<String>) -> Self {
        Self::Scalar(value.into())
    }

    /// Creates a mapping node from `(key, node)` pairs, keeping their order.
    pub fn mapping<K: Into<String>>(entries: impl IntoIterator<Item = (K, Self)>) -> Self {
        Self::Mapping(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Returns the scalar value, if this is a scalar.
    #[must_use]
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the mapping, if this is a mapping.
    #[must_use]
    pub const fn as_mapping(&self) -> Option<&NodeMap> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the items, if this is a sequence.
    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a mapping entry by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Returns true if both trees have the same node kinds, keys and ordering.
    ///
    /// Scalar values are not compared.
    #[must_use]
    pub fn same_shape(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Scalar(_), Self::Scalar(_)) => true,
            (Self::Sequence(a), Self::Sequence(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_shape(y))
            }
            (Self::Mapping(a), Self::Mapping(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b)
                        .all(|((ka, va), (kb, vb))| ka == kb && va.same_shape(vb))
            }
            _ => false,
        }
    }

    fn walk<F: FnMut(&NodePath, &str)>(&self, path: &mut NodePath, f: &mut F) {
        match self {
            Self::Scalar(value) => f(&*path, value.as_str()),
            Self::Sequence(items) => {
                for (index, item) in items.iter().enumerate() {
                    path.push(PathSegment::Index(index));
                    item.walk(path, f);
                    path.pop();
                }
            }
            Self::Mapping(map) => {
                for (key, node) in map {
                    path.push(PathSegment::Key(key.clone()));
                    node.walk(path, f);
                    path.pop();
                }
            }
        }
    }
}

/// One step of a [`NodePath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// A mapping key.
    Key(String),
    /// A sequence index.
    Index(usize),
}

/// Location of a node inside a document, rendered as `project.modules[1]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<PathSegment>);

impl NodePath {
    /// The path of the root node.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    /// Appends a segment.
    pub fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    /// Removes the last segment.
    pub fn pop(&mut self) -> Option<PathSegment> {
        self.0.pop()
    }

}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// A structured build descriptor.
///
/// # Example
///
/// ```
/// use deployable_domain::{Document, Node};
///
/// let doc = Document::new(Node::mapping([("version", Node::scalar("1.0.0-${revision}"))]));
/// assert_eq!(doc.root().get("version").and_then(Node::as_scalar), Some("1.0.0-${revision}"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    root: Node,
}

impl Document {
    /// Wraps a root node.
    #[must_use]
    pub const fn new(root: Node) -> Self {
        Self { root }
    }

    /// Returns the root node.
    #[must_use]
    pub const fn root(&self) -> &Node {
        &self.root
    }

    /// Returns true if both documents have the same tree shape.
    #[must_use]
    pub fn same_shape(&self, other: &Self) -> bool {
        self.root.same_shape(&other.root)
    }

    /// Visits every scalar in document order, depth-first.
    pub fn walk_scalars<F: FnMut(&NodePath, &str)>(&self, mut f: F) {
        let mut path = NodePath::root();
        self.root.walk(&mut path, &mut f);
    }

    /// Returns the default properties the document declares.
    ///
    /// These are the scalar entries of a top-level `properties` mapping. When
    /// the root is a single-entry mapping (an XML root element such as
    /// `<project>`), the mapping is looked up inside that entry.
    #[must_use]
    pub fn declared_properties(&self) -> PropertySource {
        let mut source = PropertySource::new("document");

        let Some(properties) = self.properties_node() else {
            return source;
        };
        for (key, node) in properties {
            if let Some(value) = node.as_scalar() {
                source = source.with_property(key.clone(), value);
            }
        }
        source
    }

    fn properties_node(&self) -> Option<&NodeMap> {
        let root = self.root.as_mapping()?;
        if let Some(properties) = root.get(PROPERTIES_KEY) {
            return properties.as_mapping();
        }
        match root.first() {
            Some((_, element)) if root.len() == 1 => element.get(PROPERTIES_KEY)?.as_mapping(),
            _ => None,
        }
    }
}
