//! # pyxis-syntax
//!
//! Line-level markdown syntax for the pyxis editor: lexer, parser and
//! unclosed-markup recovery, plus the tag metadata table shared with the
//! engine.
//!
//! ```
//! use pyxis_syntax::{Node, NodeKind, parse_line};
//!
//! let nodes = parse_line("Hello **world**!");
//! assert_eq!(
//!     nodes,
//!     vec![
//!         Node::text("Hello "),
//!         Node::element(NodeKind::Bold, vec![Node::text("world")], true),
//!         Node::text("!"),
//!     ]
//! );
//! ```
//!
//! All offsets are char offsets within a single line.

pub mod ast;
pub mod lexer;
pub mod merge;
pub mod parser;
pub mod tags;
pub mod token;

pub use ast::{Element, Node, forest_len};
pub use lexer::lex;
pub use merge::merge_unclosed;
pub use parser::parse;
pub use tags::{NodeKind, TagMeta};
pub use token::{Position, Token, TokenKind};

/// `merge_unclosed(parse(lex(line)))`: the committed structure of a line.
pub fn parse_line(line: &str) -> Vec<Node> {
    merge_unclosed(parse(&lex(line)))
}
