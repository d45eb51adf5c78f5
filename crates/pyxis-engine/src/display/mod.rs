//! # Display Tree
//!
//! The rendered form of the buffer: a root container holding one line
//! element per logical line, each holding tagged elements and text leaves.
//! Nodes are addressed by [`DisplayPath`], the child indices walked from the
//! root. Paths are recomputed on every render and never cached.
//!
//! ## Logical length
//!
//! Every display node knows how many logical chars it stands for: text
//! leaves count their chars (minus zero-width placeholders), elements add
//! their hidden markers from the tag table. The suffix marker only counts
//! for elements that were closed.

pub mod markup;
pub mod path;

pub use path::{DisplayPath, DisplayPoint, Selection};

use pyxis_syntax::{NodeKind, TagMeta};

use crate::text::{ZERO_WIDTH_SPACE, logical_len};

/// Element tags the renderer emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// Container for one logical line.
    Line,
    Strong,
    Em,
    Strike,
    Code,
    Heading(u8),
    Anchor,
}

impl Tag {
    /// Markup element name.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Line => "div",
            Tag::Strong => "strong",
            Tag::Em => "em",
            Tag::Strike => "s",
            Tag::Code => "code",
            // clamped like `NodeKind::meta`
            Tag::Heading(0 | 1) => "h1",
            Tag::Heading(2) => "h2",
            Tag::Heading(3) => "h3",
            Tag::Heading(4) => "h4",
            Tag::Heading(5) => "h5",
            Tag::Heading(_) => "h6",
            Tag::Anchor => "a",
        }
    }

    /// Markers this tag hides, taken from the node kind it renders.
    pub fn meta(self) -> TagMeta {
        match self {
            Tag::Line => TagMeta::NONE,
            Tag::Strong => NodeKind::Bold.meta(),
            Tag::Em => NodeKind::Italic.meta(),
            Tag::Strike => NodeKind::Strikethrough.meta(),
            Tag::Code => NodeKind::Code.meta(),
            Tag::Heading(level) => NodeKind::Heading(level).meta(),
            Tag::Anchor => NodeKind::Link.meta(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayElement {
    pub tag: Tag,
    /// Link target, only set on anchors.
    pub href: Option<String>,
    /// The closing marker never arrived.
    pub unclosed: bool,
    pub children: Vec<DisplayNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayNode {
    Text(String),
    Element(DisplayElement),
}

impl DisplayNode {
    pub fn text(value: impl Into<String>) -> Self {
        DisplayNode::Text(value.into())
    }

    pub fn element(tag: Tag, children: Vec<DisplayNode>) -> Self {
        DisplayNode::Element(DisplayElement {
            tag,
            href: None,
            unclosed: false,
            children,
        })
    }

    /// A line container. Empty lines get a zero-width placeholder so the
    /// host still has something to put a caret in.
    pub fn line(children: Vec<DisplayNode>) -> Self {
        if children.is_empty() {
            return DisplayNode::element(
                Tag::Line,
                vec![DisplayNode::text(ZERO_WIDTH_SPACE.to_string())],
            );
        }
        DisplayNode::element(Tag::Line, children)
    }

    pub fn children(&self) -> &[DisplayNode] {
        match self {
            DisplayNode::Text(_) => &[],
            DisplayNode::Element(el) => &el.children,
        }
    }

    pub fn logical_len(&self) -> usize {
        match self {
            DisplayNode::Text(value) => logical_len(value),
            DisplayNode::Element(el) => {
                el.prefix_len() + el.inner_len() + el.suffix_len()
            }
        }
    }

    /// Logical text this node displays, hidden markers restored.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) {
        match self {
            DisplayNode::Text(value) => {
                out.extend(value.chars().filter(|&c| c != ZERO_WIDTH_SPACE));
            }
            DisplayNode::Element(el) => {
                let meta = el.tag.meta();
                out.push_str(meta.prefix());
                for child in &el.children {
                    child.write_text(out);
                }
                out.push_str(meta.suffix(!el.unclosed));
            }
        }
    }
}

impl DisplayElement {
    pub fn prefix_len(&self) -> usize {
        self.tag.meta().prefix_len()
    }

    pub fn suffix_len(&self) -> usize {
        self.tag.meta().suffix_len(!self.unclosed)
    }

    /// Logical length of the children only.
    pub fn inner_len(&self) -> usize {
        self.children.iter().map(DisplayNode::logical_len).sum()
    }
}

/// Sum of logical lengths over a sibling list.
pub fn siblings_len(nodes: &[DisplayNode]) -> usize {
    nodes.iter().map(DisplayNode::logical_len).sum()
}

/// The rendered buffer: one [`Tag::Line`] element per logical line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayTree {
    pub lines: Vec<DisplayNode>,
}

impl DisplayTree {
    pub fn new(lines: Vec<DisplayNode>) -> Self {
        Self { lines }
    }

    pub fn to_markup(&self) -> String {
        markup::to_markup(&self.lines)
    }

    /// Logical text of the whole buffer, lines joined with `\n`.
    pub fn to_text(&self) -> String {
        self.lines
            .iter()
            .map(DisplayNode::to_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Concatenates adjacent text siblings and drops empty ones, the same
/// normalisation a host applies when it parses the markup.
pub fn coalesce_text(nodes: Vec<DisplayNode>) -> Vec<DisplayNode> {
    let mut out: Vec<DisplayNode> = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            DisplayNode::Text(value) if value.is_empty() => {}
            DisplayNode::Text(value) => match out.last_mut() {
                Some(DisplayNode::Text(prev)) => prev.push_str(&value),
                _ => out.push(DisplayNode::Text(value)),
            },
            other => out.push(other),
        }
    }
    out
}
