//! JSON documents with deterministic output.

use deployable_domain::{Document, Node};
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use super::FormatError;

/// Serializes a value to stable JSON.
///
/// Output format:
/// - 2-space indentation
/// - Trailing newline
/// - Mapping order preserved
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, FormatError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n'); // Trailing newline
    Ok(json)
}

/// Parses a JSON document.
///
/// # Errors
///
/// Returns an error if the JSON is invalid.
pub fn from_json(json: &str) -> Result<Document, FormatError> {
    let value: Value = serde_json::from_str(json)?;
    Ok(Document::new(node_from_value(value)))
}

fn node_from_value(value: Value) -> Node {
    match value {
        Value::Null => Node::Scalar(String::new()),
        Value::Bool(b) => Node::Scalar(b.to_string()),
        Value::Number(n) => Node::Scalar(n.to_string()),
        Value::String(s) => Node::Scalar(s),
        Value::Array(items) => Node::Sequence(items.into_iter().map(node_from_value).collect()),
        Value::Object(map) => Node::Mapping(
            map.into_iter()
                .map(|(key, value)| (key, node_from_value(value)))
                .collect(),
        ),
    }
}
