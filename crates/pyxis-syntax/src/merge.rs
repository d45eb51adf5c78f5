//! # Unclosed-Node Merger
//!
//! A node whose closing marker never arrived is not committed syntax yet.
//! The merger turns such nodes back into the literal text they were lexed
//! from, folding it into the text node already at the end of the output
//! so the sibling list never holds two adjacent text nodes created here.

use crate::ast::Node;

/// Replaces every unclosed element in `nodes` with its literal text.
///
/// Only the given sibling list is rewritten. Unclosed elements nested in a
/// closed parent are kept so the renderer can mark them.
pub fn merge_unclosed(nodes: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());

    for node in nodes {
        if node.is_closed() {
            out.push(node);
            continue;
        }

        let literal = node.literal();
        match out.last_mut() {
            Some(Node::Text(prev)) => prev.push_str(&literal),
            _ => out.push(Node::Text(literal)),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::NodeKind;
    use crate::{lex, parse};
    use pretty_assertions::assert_eq;

    #[test]
    fn unclosed_folds_into_preceding_text() {
        let merged = merge_unclosed(parse(&lex("Hello **world")));
        assert_eq!(merged, vec![Node::text("Hello **world")]);
    }

    #[test]
    fn unclosed_without_text_before_becomes_text() {
        let merged = merge_unclosed(parse(&lex("*a *b c")));
        // neither `*` ever closes
        assert_eq!(merged, vec![Node::text("*a *b c")]);
    }

    #[test]
    fn unclosed_after_element_is_pushed() {
        let nodes = vec![
            Node::element(NodeKind::Code, vec![Node::text("x")], true),
            Node::element(NodeKind::Italic, vec![Node::text("y")], false),
        ];
        assert_eq!(
            merge_unclosed(nodes),
            vec![
                Node::element(NodeKind::Code, vec![Node::text("x")], true),
                Node::text("*y"),
            ]
        );
    }

    #[test]
    fn nested_unclosed_keeps_inner_literal() {
        let nodes = vec![Node::element(
            NodeKind::Italic,
            vec![
                Node::text("a "),
                Node::element(NodeKind::Bold, vec![Node::text("b")], true),
            ],
            false,
        )];
        assert_eq!(merge_unclosed(nodes), vec![Node::text("*a **b**")]);
    }

    #[test]
    fn heading_folds_back_to_its_line() {
        let merged = merge_unclosed(parse(&lex("## Title *x*")));
        assert_eq!(merged, vec![Node::text("## Title *x*")]);
    }

    #[test]
    fn closed_nodes_pass_through() {
        let nodes = parse(&lex("a **b** c"));
        assert_eq!(merge_unclosed(nodes.clone()), nodes);
    }
}
