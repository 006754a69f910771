use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A node in a section's content tree. Text nodes are plain JSON strings in
/// the document format; elements carry a tag, an optional anchor id and
/// children.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Node {
    Text(String),
    Element(Element),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Link target, e.g. "#setup" on a TOC entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            href: None,
            children: Vec::new(),
        }
    }

    pub fn with_text(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            id: None,
            href: None,
            children: vec![Node::Text(text.into())],
        }
    }
}

impl Node {
    pub fn text(text: impl Into<String>) -> Self {
        Node::Text(text.into())
    }

    /// Character count of all text runs under this node.
    pub fn text_len(&self) -> usize {
        match self {
            Node::Text(text) => text.chars().count(),
            Node::Element(el) => el.children.iter().map(Node::text_len).sum(),
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

/// Concatenated text of a node sequence, in depth-first order. Hosts use
/// this to flatten rich pasted content to plain text before insertion.
pub fn plain_text(nodes: &[Node]) -> String {
    let mut out = String::new();
    for node in nodes {
        node.collect_text(&mut out);
    }
    out
}

pub fn text_len(nodes: &[Node]) -> usize {
    nodes.iter().map(Node::text_len).sum()
}

/// Depth-first search for the first element with the given tag.
pub fn find_tag<'a>(nodes: &'a [Node], tag: &str) -> Option<&'a Element> {
    for node in nodes {
        if let Node::Element(el) = node {
            if el.tag == tag {
                return Some(el);
            }
            if let Some(found) = find_tag(&el.children, tag) {
                return Some(found);
            }
        }
    }
    None
}

/// An atomic content block. Never split across pages; cloned whenever it is
/// placed, so the source sequence is never mutated by pagination.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toc_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toc_indent: Option<bool>,
    #[serde(default)]
    pub nodes: Vec<Node>,
}

impl Section {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            id: None,
            toc_title: None,
            toc_indent: None,
            nodes,
        }
    }

    pub fn text_len(&self) -> usize {
        text_len(&self.nodes)
    }

    pub fn plain_text(&self) -> String {
        plain_text(&self.nodes)
    }

    pub fn header(&self, tag: &str) -> Option<&Element> {
        find_tag(&self.nodes, tag)
    }

    pub fn header_text(&self, tag: &str) -> Option<String> {
        self.header(tag)
            .map(|el| plain_text(&el.children).trim().to_string())
    }
}

/// One output page. `fill` is the running sum of placed group heights, not a
/// re-measurement of the page contents.
#[derive(Clone, Debug, PartialEq)]
pub struct Page {
    pub number: usize,
    pub sections: Vec<Section>,
    pub fill: f32,
}

impl Page {
    pub fn new(number: usize) -> Self {
        Self {
            number,
            sections: Vec::new(),
            fill: 0.0,
        }
    }

    pub fn text_len(&self) -> usize {
        self.sections.iter().map(Section::text_len).sum()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    pub id: String,
    pub page: usize,
    pub indent: bool,
}

/// Caret position inside the engine's page set: 0-based page index, child
/// indexes from the page's section list down to a text node, and a char
/// offset within that text node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Caret {
    pub page: usize,
    pub path: Vec<usize>,
    pub offset: usize,
}

/// Page-independent caret record taken immediately before a reflow and
/// consumed immediately after. Never persisted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorSnapshot {
    pub offset: usize,
    pub at_end: bool,
}

#[derive(Clone, Debug)]
pub struct PageOptions {
    pub page_width: f32,
    pub page_height: f32,
    pub padding_top: f32,
    pub padding_right: f32,
    pub padding_bottom: f32,
    pub padding_left: f32,
    /// Tag identifying a section's primary header.
    pub header_tag: String,
    /// Tag identifying a section's sub-header.
    pub subheader_tag: String,
    /// Sections containing a primary header and measuring below this are
    /// grouped with the following section.
    pub header_only_threshold: f32,
    /// Minimum room that must remain under a header for it to start near
    /// the bottom of a page.
    pub min_content_after_header: f32,
    pub toc: bool,
    pub start_page_number: usize,
    pub editable: bool,
    pub reflow_delay: Duration,
}

impl Default for PageOptions {
    fn default() -> Self {
        // US letter at 96dpi with half-inch padding.
        Self {
            page_width: 816.0,
            page_height: 1056.0,
            padding_top: 48.0,
            padding_right: 48.0,
            padding_bottom: 48.0,
            padding_left: 48.0,
            header_tag: "h2".to_string(),
            subheader_tag: "h3".to_string(),
            header_only_threshold: 100.0,
            min_content_after_header: 80.0,
            toc: true,
            start_page_number: 1,
            editable: false,
            reflow_delay: Duration::from_millis(300),
        }
    }
}

impl PageOptions {
    /// Content-box height: the packing budget for one page.
    pub fn content_height(&self) -> f32 {
        self.page_height - self.padding_top - self.padding_bottom
    }

    /// Content-box width handed to the measurer.
    pub fn content_width(&self) -> f32 {
        self.page_width - self.padding_left - self.padding_right
    }

    pub fn validate(&self) -> Result<(), Error> {
        if !(self.content_height() > 0.0) {
            return Err(Error::Config(format!(
                "page content height must be positive, got {} ({} minus vertical padding)",
                self.content_height(),
                self.page_height,
            )));
        }
        if !(self.content_width() > 0.0) {
            return Err(Error::Config(format!(
                "page content width must be positive, got {} ({} minus horizontal padding)",
                self.content_width(),
                self.page_width,
            )));
        }
        if self.header_tag.is_empty() || self.subheader_tag.is_empty() {
            return Err(Error::Config("header tags must be non-empty".into()));
        }
        if self.start_page_number == 0 {
            return Err(Error::Config("start page number must be at least 1".into()));
        }
        Ok(())
    }
}
