//! Render tree.
//!
//! Shells and primitives produce a [`Node`] tree; whatever mounts the UI
//! (server-side HTML, a client renderer, a test) consumes it. Attributes are
//! kept in a `BTreeMap` so serialized output is stable.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// An element with a tag, attributes and children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Tag name (`div`, `nav`, `button`, ...)
    pub tag: String,
    /// Attributes, ordered by name
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attrs: BTreeMap<String, String>,
    /// Child nodes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    /// Element with no attributes or children.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    /// Add a boolean attribute when `on` is set.
    #[must_use]
    pub fn flag(self, name: &str, on: bool) -> Self {
        if on { self.attr(name, "") } else { self }
    }

    /// Append a child.
    #[must_use]
    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    /// Append several children.
    #[must_use]
    pub fn children<I>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = Node>,
    {
        self.children.extend(nodes);
        self
    }

    /// Attribute value, if set.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// A node of the render tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Renders nothing.
    #[default]
    Empty,
    /// Literal text.
    Text {
        /// The text
        value: String,
    },
    /// An element.
    Element(Element),
    /// Several siblings without a wrapper.
    Fragment {
        /// The siblings
        children: Vec<Node>,
    },
}

impl Node {
    /// Text node.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    /// Fragment of `children`.
    #[must_use]
    pub fn fragment(children: Vec<Node>) -> Self {
        Self::Fragment { children }
    }

    /// Whether this node renders nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text { value } => value.is_empty(),
            Self::Element(_) => false,
            Self::Fragment { children } => children.iter().all(Self::is_empty),
        }
    }

    /// Depth-first search for the first element matching `predicate`.
    pub fn find<F>(&self, predicate: F) -> Option<&Element>
    where
        F: Fn(&Element) -> bool + Copy,
    {
        match self {
            Self::Empty | Self::Text { .. } => None,
            Self::Element(element) => {
                if predicate(element) {
                    return Some(element);
                }
                element.children.iter().find_map(|c| c.find(predicate))
            },
            Self::Fragment { children } => children.iter().find_map(|c| c.find(predicate)),
        }
    }

    /// First element whose `name` attribute equals `value`.
    #[must_use]
    pub fn find_by_attr(&self, name: &str, value: &str) -> Option<&Element> {
        self.find(|e| e.get(name) == Some(value))
    }

    /// First element with tag `tag`.
    #[must_use]
    pub fn find_by_tag(&self, tag: &str) -> Option<&Element> {
        self.find(|e| e.tag == tag)
    }

    /// Serialize to HTML. Text and attribute values are escaped.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            Self::Empty => {},
            Self::Text { value } => escape_into(out, value),
            Self::Fragment { children } => {
                for child in children {
                    child.write_html(out);
                }
            },
            Self::Element(element) => {
                let _ = write!(out, "<{}", element.tag);
                for (name, value) in &element.attrs {
                    if value.is_empty() {
                        let _ = write!(out, " {name}");
                    } else {
                        let _ = write!(out, " {name}=\"");
                        escape_into(out, value);
                        out.push('"');
                    }
                }
                out.push('>');
                if is_void(&element.tag) {
                    return;
                }
                for child in &element.children {
                    child.write_html(out);
                }
                let _ = write!(out, "</{}>", element.tag);
            },
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::Text { value }
    }
}

fn is_void(tag: &str) -> bool {
    matches!(tag, "input" | "br" | "hr" | "img" | "meta" | "link")
}

fn escape_into(out: &mut String, value: &str) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
