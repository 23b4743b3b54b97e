//! YAML documents.

use deployable_domain::{Document, Node, NodeMap};
use serde_yaml::Value;

use super::FormatError;

/// Parses a YAML document.
///
/// # Errors
///
/// Returns an error if the YAML is invalid or uses a mapping key that is not
/// a scalar.
pub fn from_yaml(yaml: &str) -> Result<Document, FormatError> {
    let value: Value = serde_yaml::from_str(yaml)?;
    Ok(Document::new(node_from_value(value)?))
}

/// Renders a document as YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_yaml(document: &Document) -> Result<String, FormatError> {
    Ok(serde_yaml::to_string(document)?)
}

fn node_from_value(value: Value) -> Result<Node, FormatError> {
    Ok(match value {
        Value::Null => Node::Scalar(String::new()),
        Value::Bool(b) => Node::Scalar(b.to_string()),
        Value::Number(n) => Node::Scalar(n.to_string()),
        Value::String(s) => Node::Scalar(s),
        Value::Sequence(items) => Node::Sequence(
            items
                .into_iter()
                .map(node_from_value)
                .collect::<Result<_, _>>()?,
        ),
        Value::Mapping(map) => {
            let mut nodes = NodeMap::with_capacity(map.len());
            for (key, value) in map {
                nodes.insert(key_to_string(key)?, node_from_value(value)?);
            }
            Node::Mapping(nodes)
        }
        Value::Tagged(tagged) => node_from_value(tagged.value)?,
    })
}

fn key_to_string(key: Value) -> Result<String, FormatError> {
    match key {
        Value::String(s) => Ok(s),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(FormatError::Invalid(format!(
            "unsupported mapping key: {other:?}"
        ))),
    }
}
