use crate::tags::NodeKind;

/// What a token stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Text,
    Markup(NodeKind),
}

/// Whether a markup token opens or closes its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Start,
    End,
    /// Text tokens carry no position.
    None,
}

/// A lexed token.
///
/// `index` is a char offset from the start of the line, including the
/// offset accumulated while lexing nested content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    /// The literal marker for markup tokens, the text for text tokens.
    pub value: String,
    pub index: usize,
    pub position: Position,
}

impl Token {
    pub fn text(value: impl Into<String>, index: usize) -> Self {
        Self {
            kind: TokenKind::Text,
            value: value.into(),
            index,
            position: Position::None,
        }
    }

    pub fn start(kind: NodeKind, index: usize) -> Self {
        Self {
            kind: TokenKind::Markup(kind),
            value: kind.meta().marker.to_string(),
            index,
            position: Position::Start,
        }
    }

    pub fn end(kind: NodeKind, index: usize) -> Self {
        Self {
            kind: TokenKind::Markup(kind),
            value: kind.meta().marker.to_string(),
            index,
            position: Position::End,
        }
    }

    pub fn is_text(&self) -> bool {
        self.kind == TokenKind::Text
    }

    /// True for the end token that closes a start token of `kind`.
    pub fn closes(&self, kind: NodeKind) -> bool {
        self.kind == TokenKind::Markup(kind) && self.position == Position::End
    }
}
