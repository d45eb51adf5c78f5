//! # Parser
//!
//! Pairs start tokens with the nearest later end token of the same kind.
//! Tokens in between become the element's children (parsed recursively);
//! when no end token exists every remaining token becomes a child and the
//! element stays unclosed. End tokens without a start are dropped.

use crate::ast::Node;
use crate::token::{Position, Token, TokenKind};

pub fn parse(tokens: &[Token]) -> Vec<Node> {
    let mut out = Vec::new();
    let mut i = 0;

    while i < tokens.len() {
        let token = &tokens[i];
        match (token.kind, token.position) {
            (TokenKind::Text, _) => {
                out.push(Node::text(token.value.clone()));
                i += 1;
            }
            (TokenKind::Markup(kind), Position::Start) => {
                let close = tokens[i + 1..].iter().position(|t| t.closes(kind));
                let end = close.map_or(tokens.len(), |offset| i + 1 + offset);
                let children = parse(&tokens[i + 1..end]);
                out.push(Node::element(kind, children, close.is_some()));
                // skip past the end token as well
                i = end + 1;
            }
            _ => i += 1,
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::tags::NodeKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn closed_bold() {
        assert_eq!(
            parse(&lex("Hello **world**!")),
            vec![
                Node::text("Hello "),
                Node::element(NodeKind::Bold, vec![Node::text("world")], true),
                Node::text("!"),
            ]
        );
    }

    #[test]
    fn unclosed_takes_remaining_tokens() {
        assert_eq!(
            parse(&lex("Hello **world")),
            vec![
                Node::text("Hello "),
                Node::element(NodeKind::Bold, vec![Node::text("world")], false),
            ]
        );
    }

    #[test]
    fn nested_unclosed_inside_closed() {
        // the inner bold never closes, the outer one does
        assert_eq!(
            parse(&lex("**a **b** c")),
            vec![
                Node::element(
                    NodeKind::Bold,
                    vec![
                        Node::text("a "),
                        Node::element(NodeKind::Bold, vec![Node::text("b")], false),
                    ],
                    true,
                ),
                Node::text(" c"),
            ]
        );
    }

    #[test]
    fn bold_italic_and_heading() {
        assert_eq!(
            parse(&lex("# ***x***")),
            vec![Node::element(
                NodeKind::Heading(1),
                vec![Node::text(" ***x***")],
                false
            )]
        );
        assert_eq!(
            parse(&lex("***x***")),
            vec![Node::element(
                NodeKind::BoldItalic,
                vec![Node::text("x")],
                true
            )]
        );
    }

    #[test]
    fn stray_end_tokens_are_skipped() {
        let tokens = vec![
            Token::end(NodeKind::Bold, 0),
            Token::text("x", 2),
            Token::end(NodeKind::Italic, 3),
        ];
        assert_eq!(parse(&tokens), vec![Node::text("x")]);
    }

    #[test]
    fn first_end_token_wins() {
        let tokens = vec![
            Token::start(NodeKind::Bold, 0),
            Token::text("a", 2),
            Token::end(NodeKind::Bold, 3),
            Token::text("b", 5),
            Token::end(NodeKind::Bold, 6),
        ];
        assert_eq!(
            parse(&tokens),
            vec![
                Node::element(NodeKind::Bold, vec![Node::text("a")], true),
                Node::text("b"),
            ]
        );
    }
}
