use crate::tags::NodeKind;

/// One node of a line's AST.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Text(String),
    Element(Element),
}

/// Markup node. `closed` is false only when the line ended before the
/// matching end marker was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub kind: NodeKind,
    pub children: Vec<Node>,
    pub closed: bool,
}

impl Node {
    pub fn text(value: impl Into<String>) -> Self {
        Node::Text(value.into())
    }

    pub fn element(kind: NodeKind, children: Vec<Node>, closed: bool) -> Self {
        Node::Element(Element {
            kind,
            children,
            closed,
        })
    }

    /// The logical text this node was lexed from: markers included, the
    /// closing marker only when it was actually present.
    pub fn literal(&self) -> String {
        let mut out = String::new();
        self.write_literal(&mut out);
        out
    }

    fn write_literal(&self, out: &mut String) {
        match self {
            Node::Text(value) => out.push_str(value),
            Node::Element(el) => {
                let meta = el.kind.meta();
                out.push_str(meta.prefix());
                for child in &el.children {
                    child.write_literal(out);
                }
                out.push_str(meta.suffix(el.closed));
            }
        }
    }

    /// Logical length in chars, equal to `self.literal().chars().count()`.
    pub fn literal_len(&self) -> usize {
        match self {
            Node::Text(value) => value.chars().count(),
            Node::Element(el) => {
                let meta = el.kind.meta();
                meta.prefix_len()
                    + el.children.iter().map(Node::literal_len).sum::<usize>()
                    + meta.suffix_len(el.closed)
            }
        }
    }

    /// Concatenated text leaves, markers left out.
    pub fn plain_text(&self) -> String {
        match self {
            Node::Text(value) => value.clone(),
            Node::Element(el) => el.children.iter().map(Node::plain_text).collect(),
        }
    }

    pub fn is_closed(&self) -> bool {
        match self {
            Node::Text(_) => true,
            Node::Element(el) => el.closed,
        }
    }
}

/// Sum of [`Node::literal_len`] over a sibling list.
pub fn forest_len(nodes: &[Node]) -> usize {
    nodes.iter().map(Node::literal_len).sum()
}
