//! Response document normalization
//!
//! Converts the markup returned inside a result field into a [`Node`] tree:
//!
//! - text and CDATA reduce to their trimmed string value
//! - child elements are grouped by tag name, in document order
//! - a tag occurring once maps directly to its value; a tag occurring two or
//!   more times maps to a [`Node::List`]
//! - attributes are hoisted under [`ATTRIBUTES_KEY`]; a text value carrying
//!   attributes moves under [`CONTENT_KEY`]
//! - the root map names its element under [`ROOT_KEY`]
//! - nesting deeper than [`MAX_DEPTH`] is rejected as malformed
//!
//! Callers rely on the collapse rule: a single record is accessed as a map,
//! several records of the same tag as a list. Use [`Node::items`] when either
//! shape may occur.

use crate::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde::Serialize;
use std::collections::BTreeMap;

/// Reserved key holding an element's attributes
pub const ATTRIBUTES_KEY: &str = "@attributes";

/// Reserved key holding the text of an element that also has attributes
pub const CONTENT_KEY: &str = "@content";

/// Reserved key naming the root element
pub const ROOT_KEY: &str = "@root";

/// Deepest element nesting accepted by [`normalize`]
pub const MAX_DEPTH: usize = 256;

/// Normalized document node
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Node {
    /// Leaf value
    Text(String),
    /// Tag name → value
    Map(BTreeMap<String, Node>),
    /// Two or more same-named siblings, in document order
    List(Vec<Node>),
}

impl Node {
    /// Empty map (an element with neither children nor text)
    pub fn empty() -> Self {
        Node::Map(BTreeMap::new())
    }

    /// Child by tag name
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Nested child by tag path
    pub fn path(&self, keys: &[&str]) -> Option<&Node> {
        keys.iter().try_fold(self, |node, key| node.get(key))
    }

    /// Leaf value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Leaf value, looking through an attribute wrapper
    pub fn text(&self) -> Option<&str> {
        match self {
            Node::Text(text) => Some(text),
            Node::Map(map) => map.get(CONTENT_KEY).and_then(Node::as_str),
            Node::List(_) => None,
        }
    }

    /// Map view
    pub fn as_map(&self) -> Option<&BTreeMap<String, Node>> {
        match self {
            Node::Map(map) => Some(map),
            _ => None,
        }
    }

    /// List view
    pub fn as_list(&self) -> Option<&[Node]> {
        match self {
            Node::List(items) => Some(items),
            _ => None,
        }
    }

    /// Records regardless of how many occurred: a list yields its entries,
    /// anything else yields itself
    pub fn items(&self) -> &[Node] {
        match self {
            Node::List(items) => items,
            other => std::slice::from_ref(other),
        }
    }

    /// True for an empty string or an empty map
    pub fn is_empty(&self) -> bool {
        match self {
            Node::Text(text) => text.is_empty(),
            Node::Map(map) => map.is_empty(),
            Node::List(items) => items.is_empty(),
        }
    }

    /// Attributes of this element, if any
    pub fn attributes(&self) -> Option<&Node> {
        self.get(ATTRIBUTES_KEY)
    }

    /// Single attribute value
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes().and_then(|a| a.get(name)).and_then(Node::as_str)
    }

    /// Root tag name (root node only)
    pub fn root_name(&self) -> Option<&str> {
        self.get(ROOT_KEY).and_then(Node::as_str)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Node::Text(text)
    }
}

struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Child>,
}

enum Child {
    Element(Element),
    Text(String),
}

/// Normalize a markup document
pub fn normalize(raw: &str) -> Result<Node> {
    let root = parse(raw)?;
    let name = Node::Text(root.name.clone());

    let node = match normalize_element(&root) {
        Node::Map(mut map) => {
            map.insert(ROOT_KEY.to_string(), name);
            Node::Map(map)
        }
        scalar => {
            let mut map = BTreeMap::new();
            map.insert(CONTENT_KEY.to_string(), scalar);
            map.insert(ROOT_KEY.to_string(), name);
            Node::Map(map)
        }
    };

    Ok(node)
}

fn normalize_element(element: &Element) -> Node {
    let mut groups: BTreeMap<String, Vec<Node>> = BTreeMap::new();
    let mut text = String::new();

    for child in &element.children {
        match child {
            Child::Element(child) => groups
                .entry(child.name.clone())
                .or_default()
                .push(normalize_element(child)),
            // segments split by comments or CDATA are joined back together
            Child::Text(raw) => text.push_str(raw.trim()),
        }
    }

    let mut map = match text {
        text if text.is_empty() => groups
            .into_iter()
            .map(|(tag, mut values)| {
                let value = if values.len() == 1 {
                    values.remove(0)
                } else {
                    Node::List(values)
                };
                (tag, value)
            })
            .collect(),
        text if element.attributes.is_empty() => return Node::Text(text),
        text => {
            let mut map = BTreeMap::new();
            map.insert(CONTENT_KEY.to_string(), Node::Text(text));
            map
        }
    };

    if !element.attributes.is_empty() {
        let attributes = element
            .attributes
            .iter()
            .map(|(k, v)| (k.clone(), Node::Text(v.clone())))
            .collect();
        map.insert(ATTRIBUTES_KEY.to_string(), Node::Map(attributes));
    }

    Node::Map(map)
}

fn parse(raw: &str) -> Result<Element> {
    let mut reader = Reader::from_str(raw);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if stack.len() >= MAX_DEPTH {
                    return Err(Error::MalformedDocument("document nested too deeply".into()));
                }
                stack.push(open_element(&start)?);
            }
            Event::Empty(start) => {
                let element = open_element(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::MalformedDocument("unexpected closing tag".into()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                push_text(&mut stack, &text)?;
            }
            Event::CData(data) => {
                let text = std::str::from_utf8(&data)
                    .map_err(|e| Error::MalformedDocument(e.to_string()))?
                    .to_string();
                push_text(&mut stack, &text)?;
            }
            Event::Eof => break,
            // declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::MalformedDocument(format!(
            "unclosed element <{}>",
            open.name
        )));
    }

    root.ok_or_else(|| Error::MalformedDocument("document has no root element".into()))
}

fn open_element(start: &BytesStart<'_>) -> Result<Element> {
    let name = utf8(start.name().as_ref())?.to_string();
    let mut attributes = Vec::new();

    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::MalformedDocument(e.to_string()))?;
        let key = utf8(attr.key.as_ref())?;
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let value = attr.unescape_value()?;
        attributes.push((key.to_string(), value.into_owned()));
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Child::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(Error::MalformedDocument(format!(
            "second root element <{}>",
            element.name
        )));
    }
    *root = Some(element);
    Ok(())
}

fn push_text(stack: &mut [Element], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Child::Text(text.to_string()));
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(Error::MalformedDocument(
            "text outside the root element".into(),
        )),
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| Error::MalformedDocument(e.to_string()))
}
