//! XML documents (Maven POM files).
//!
//! Elements map onto the document tree as follows:
//! - an element with only text becomes a scalar (`<foo/>` is an empty scalar)
//! - any other element becomes a mapping
//! - attributes become `@name` entries, text next to child elements `#text`
//! - consecutive sibling elements of one name collapse into a sequence
//! - when a name repeats with other elements in between, the children are
//!   kept in order as a `#children` sequence of single-entry mappings
//! - the root element is the single entry of the root mapping
//!
//! Text split by child elements is joined with a single space. Comments,
//! processing instructions and the doctype are dropped.

use std::collections::HashSet;

use deployable_domain::{Document, Node, NodeMap};
use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::reader::Reader;

use super::FormatError;

const ATTRIBUTE_PREFIX: char = '@';
const TEXT_KEY: &str = "#text";
const CHILDREN_KEY: &str = "#children";
const INDENT: usize = 4;

/// Parses an XML document.
///
/// # Errors
///
/// Returns an error if the XML is malformed or has no single root element.
pub fn from_xml(xml: &str) -> Result<Document, FormatError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<(String, Node)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(Element::open(&start)?),
            Event::Empty(start) => {
                let element = Element::open(&start)?;
                close(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| FormatError::Invalid("unexpected end tag".to_string()))?;
                close(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                if let Some(element) = stack.last_mut() {
                    element.push_text(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(element) = stack.last_mut() {
                    element.push_text(std::str::from_utf8(&data)?);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(FormatError::Invalid(format!("unclosed element <{}>", open.name)));
    }

    let (name, node) = root.ok_or_else(|| FormatError::Invalid("no root element".to_string()))?;
    Ok(Document::new(Node::mapping([(name, node)])))
}

/// Renders a document as XML with a declaration and 4-space indentation.
///
/// # Errors
///
/// Returns an error if the root is not a single-entry mapping.
pub fn to_xml(document: &Document) -> Result<String, FormatError> {
    let (name, node) = match document.root() {
        Node::Mapping(map) if map.len() == 1 => map
            .first()
            .ok_or_else(|| FormatError::Invalid("no root element".to_string()))?,
        _ => {
            return Err(FormatError::Invalid(
                "an XML document needs exactly one root element".to_string(),
            ));
        }
    };

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    write_element(&mut writer, name, node)?;

    let mut xml = String::from_utf8(writer.into_inner())?;
    xml.push('\n');
    Ok(xml)
}

/// An element being read.
struct Element {
    name: String,
    attributes: NodeMap,
    children: Vec<(String, Node)>,
    text: String,
    /// A child element was read since the last text segment.
    text_interrupted: bool,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self, FormatError> {
        let name = std::str::from_utf8(start.name().as_ref())?.to_string();

        let mut attributes = NodeMap::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = std::str::from_utf8(attribute.key.as_ref())?;
            let value = attribute.unescape_value()?;
            attributes.insert(format!("{ATTRIBUTE_PREFIX}{key}"), Node::scalar(value));
        }

        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
            text_interrupted: false,
        })
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.text_interrupted && !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text_interrupted = false;
        self.text.push_str(text);
    }

    fn add_child(&mut self, name: String, node: Node) {
        self.text_interrupted = true;
        self.children.push((name, node));
    }

    fn into_node(self) -> Node {
        if self.attributes.is_empty() && self.children.is_empty() {
            return Node::Scalar(self.text);
        }

        let mut entries = self.attributes;
        if !self.text.is_empty() {
            entries.insert(TEXT_KEY.to_string(), Node::Scalar(self.text));
        }

        if repeats_are_consecutive(&self.children) {
            for (name, node) in self.children {
                match entries.get_mut(&name) {
                    // Elements never read as sequences, so a sequence here is a repeated run
                    Some(Node::Sequence(items)) => items.push(node),
                    Some(existing) => {
                        let first = std::mem::replace(existing, Node::Sequence(Vec::new()));
                        *existing = Node::Sequence(vec![first, node]);
                    }
                    None => {
                        entries.insert(name, node);
                    }
                }
            }
        } else {
            let children = self
                .children
                .into_iter()
                .map(|(name, node)| Node::mapping([(name, node)]))
                .collect();
            entries.insert(CHILDREN_KEY.to_string(), Node::Sequence(children));
        }
        Node::Mapping(entries)
    }
}

/// Returns true when every child name occurs in a single unbroken run.
fn repeats_are_consecutive(children: &[(String, Node)]) -> bool {
    let mut seen = HashSet::new();
    let mut previous: Option<&str> = None;
    for (name, _) in children {
        let name = name.as_str();
        if previous == Some(name) {
            continue;
        }
        if !seen.insert(name) {
            return false;
        }
        previous = Some(name);
    }
    true
}

fn close(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<(String, Node)>,
) -> Result<(), FormatError> {
    let name = element.name.clone();
    let node = element.into_node();

    if let Some(parent) = stack.last_mut() {
        parent.add_child(name, node);
        return Ok(());
    }
    if root.is_some() {
        return Err(FormatError::Invalid(format!(
            "multiple root elements (second is <{name}>)"
        )));
    }
    *root = Some((name, node));
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, name: &str, node: &Node) -> Result<(), FormatError> {
    match node {
        Node::Scalar(text) if text.is_empty() => {
            writer.write_event(Event::Empty(BytesStart::new(name)))?;
        }
        Node::Scalar(text) => {
            writer.write_event(Event::Start(BytesStart::new(name)))?;
            write_text(writer, text)?;
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
        Node::Sequence(items) => {
            for item in items {
                if matches!(item, Node::Sequence(_)) {
                    return Err(FormatError::Invalid(format!(
                        "<{name}> holds a sequence nested in a sequence"
                    )));
                }
                write_element(writer, name, item)?;
            }
        }
        Node::Mapping(map) => {
            let mut start = BytesStart::new(name);
            for (key, value) in map {
                let Some(attribute) = key.strip_prefix(ATTRIBUTE_PREFIX) else {
                    continue;
                };
                let value = value.as_scalar().ok_or_else(|| {
                    FormatError::Invalid(format!("attribute {key} of <{name}> is not a scalar"))
                })?;
                start.push_attribute((attribute, value));
            }

            let mut content = map
                .iter()
                .filter(|(key, _)| !key.starts_with(ATTRIBUTE_PREFIX))
                .peekable();
            if content.peek().is_none() {
                writer.write_event(Event::Empty(start))?;
                return Ok(());
            }

            writer.write_event(Event::Start(start))?;
            for (key, value) in content {
                match key.as_str() {
                    TEXT_KEY => {
                        let text = value.as_scalar().ok_or_else(|| {
                            FormatError::Invalid(format!("{TEXT_KEY} of <{name}> is not a scalar"))
                        })?;
                        write_text(writer, text)?;
                    }
                    CHILDREN_KEY => write_children(writer, name, value)?,
                    _ => write_element(writer, key, value)?,
                }
            }
            writer.write_event(Event::End(BytesEnd::new(name)))?;
        }
    }
    Ok(())
}

/// Writes an ordered `#children` sequence of single-entry mappings.
fn write_children(
    writer: &mut Writer<Vec<u8>>,
    parent: &str,
    children: &Node,
) -> Result<(), FormatError> {
    let invalid = || {
        FormatError::Invalid(format!(
            "{CHILDREN_KEY} of <{parent}> must be a sequence of single-entry mappings"
        ))
    };

    let items = children.as_sequence().ok_or_else(invalid)?;
    for item in items {
        let map = item.as_mapping().filter(|map| map.len() == 1).ok_or_else(invalid)?;
        for (name, node) in map {
            write_element(writer, name, node)?;
        }
    }
    Ok(())
}

fn write_text(writer: &mut Writer<Vec<u8>>, text: &str) -> Result<(), FormatError> {
    writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))?;
    Ok(())
}
