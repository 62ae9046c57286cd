//! Document trees
//!
//! [`DocNode`] is the parsed, semantic form of a markdown document.
//! [`ViewNode`] is the presentation form: a tree of (tag, attributes,
//! children) that any DOM-like target can render.

use indexmap::IndexMap;
use serde::Serialize;

use crate::helpers::{escape_attr, escape_html};

/// Column alignment of a table cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    None,
    Left,
    Center,
    Right,
}

/// Closed set of semantic markdown elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    Document,
    Heading { level: u8, id: Option<String> },
    Paragraph,
    BlockQuote,
    List { ordered: bool, start: Option<u64> },
    ListItem,
    TaskMarker { checked: bool },
    CodeBlock { lang: Option<String> },
    InlineCode,
    Emphasis,
    Strong,
    Strikethrough,
    Link { href: String, title: String },
    Image { src: String, title: String },
    Table,
    TableHead,
    TableBody,
    TableRow,
    TableCell { align: Align, header: bool },
    Rule,
    HardBreak,
    Html,
    FootnoteReference { label: String },
    FootnoteDefinition { label: String },
}

/// Node of the parsed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocNode {
    Element {
        kind: ElementKind,
        children: Vec<DocNode>,
    },
    Text(String),
}

impl DocNode {
    pub fn element(kind: ElementKind) -> Self {
        DocNode::Element {
            kind,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> Option<&ElementKind> {
        match self {
            DocNode::Element { kind, .. } => Some(kind),
            DocNode::Text(_) => None,
        }
    }

    pub fn children(&self) -> &[DocNode] {
        match self {
            DocNode::Element { children, .. } => children,
            DocNode::Text(_) => &[],
        }
    }

    /// Concatenated text of this node and all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }
}

fn collect_text(node: &DocNode, out: &mut String) {
    match node {
        DocNode::Text(text) => out.push_str(text),
        DocNode::Element { children, .. } => {
            for child in children {
                collect_text(child, out);
            }
        }
    }
}

/// Element names that never carry children
const VOID_TAGS: &[&str] = &["br", "hr", "img", "input"];

/// Presentation node: what actually gets drawn
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ViewNode {
    Element {
        tag: &'static str,
        attrs: IndexMap<String, String>,
        children: Vec<ViewNode>,
    },
    Text(String),
    /// Markup passed through untouched (raw HTML in the source)
    Raw(String),
}

impl ViewNode {
    pub fn new(tag: &'static str) -> Self {
        ViewNode::Element {
            tag,
            attrs: IndexMap::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        ViewNode::Text(text.into())
    }

    /// Builder: set an attribute
    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        if let ViewNode::Element { attrs, .. } = &mut self {
            attrs.insert(name.to_string(), value.into());
        }
        self
    }

    /// Builder: add a class, keeping any existing ones
    pub fn class(mut self, class: &str) -> Self {
        if let ViewNode::Element { attrs, .. } = &mut self {
            attrs
                .entry("class".to_string())
                .and_modify(|existing| {
                    existing.push(' ');
                    existing.push_str(class);
                })
                .or_insert_with(|| class.to_string());
        }
        self
    }

    /// Builder: replace the children
    pub fn children(mut self, nodes: Vec<ViewNode>) -> Self {
        if let ViewNode::Element { children, .. } = &mut self {
            *children = nodes;
        }
        self
    }

    /// Builder: append one child
    pub fn child(mut self, node: ViewNode) -> Self {
        if let ViewNode::Element { children, .. } = &mut self {
            children.push(node);
        }
        self
    }

    /// Builder: append several children after the existing ones
    pub fn append(mut self, nodes: Vec<ViewNode>) -> Self {
        if let ViewNode::Element { children, .. } = &mut self {
            children.extend(nodes);
        }
        self
    }

    pub fn tag(&self) -> Option<&'static str> {
        match self {
            ViewNode::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        match self {
            ViewNode::Element { attrs, .. } => attrs.get(name).map(String::as_str),
            _ => None,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn child_nodes(&self) -> &[ViewNode] {
        match self {
            ViewNode::Element { children, .. } => children,
            _ => &[],
        }
    }

    /// Depth-first search for the first element with `tag`
    pub fn find(&self, tag: &str) -> Option<&ViewNode> {
        if self.tag() == Some(tag) {
            return Some(self);
        }
        self.child_nodes().iter().find_map(|child| child.find(tag))
    }

    /// All elements with `tag`, in document order
    pub fn find_all<'a>(&'a self, tag: &str, out: &mut Vec<&'a ViewNode>) {
        if self.tag() == Some(tag) {
            out.push(self);
        }
        for child in self.child_nodes() {
            child.find_all(tag, out);
        }
    }

    pub fn text_content(&self) -> String {
        match self {
            ViewNode::Text(text) => text.clone(),
            ViewNode::Raw(_) => String::new(),
            ViewNode::Element { children, .. } => {
                children.iter().map(ViewNode::text_content).collect()
            }
        }
    }

    /// Serialize to HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    fn write_html(&self, out: &mut String) {
        match self {
            ViewNode::Text(text) => out.push_str(&escape_html(text)),
            ViewNode::Raw(html) => out.push_str(html),
            ViewNode::Element {
                tag,
                attrs,
                children,
            } => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in attrs {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                if VOID_TAGS.contains(tag) {
                    return;
                }
                for child in children {
                    child.write_html(out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
        }
    }
}
