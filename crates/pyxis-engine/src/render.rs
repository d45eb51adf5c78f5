//! # Renderer
//!
//! AST to display tree. Every node kind maps to one display element (bold
//! italic to a `strong > em` pair), text is carried over verbatim, and any
//! element still unclosed is flagged so position mapping leaves its missing
//! suffix out.

use pyxis_syntax::{Element, Node, NodeKind, parse_line};

use crate::display::{DisplayElement, DisplayNode, Tag};

pub fn render(nodes: &[Node]) -> Vec<DisplayNode> {
    nodes.iter().map(render_node).collect()
}

/// `render(merge_unclosed(parse(lex(line))))`.
pub fn transpile(line: &str) -> Vec<DisplayNode> {
    render(&parse_line(line))
}

fn render_node(node: &Node) -> DisplayNode {
    match node {
        Node::Text(value) => DisplayNode::text(value.clone()),
        Node::Element(el) => render_element(el),
    }
}

fn render_element(el: &Element) -> DisplayNode {
    let children = render(&el.children);
    let unclosed = !el.closed;
    match el.kind {
        // both halves must drop their suffix or the marker count breaks
        NodeKind::BoldItalic => wrap(
            Tag::Strong,
            unclosed,
            None,
            vec![wrap(Tag::Em, unclosed, None, children)],
        ),
        NodeKind::Link => {
            let href = el.children.iter().map(Node::plain_text).collect();
            wrap(Tag::Anchor, unclosed, Some(href), children)
        }
        NodeKind::Bold => wrap(Tag::Strong, unclosed, None, children),
        NodeKind::Italic => wrap(Tag::Em, unclosed, None, children),
        NodeKind::Strikethrough => wrap(Tag::Strike, unclosed, None, children),
        NodeKind::Code => wrap(Tag::Code, unclosed, None, children),
        NodeKind::Heading(level) => wrap(Tag::Heading(level), unclosed, None, children),
    }
}

fn wrap(
    tag: Tag,
    unclosed: bool,
    href: Option<String>,
    children: Vec<DisplayNode>,
) -> DisplayNode {
    DisplayNode::Element(DisplayElement {
        tag,
        href,
        unclosed,
        children,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::markup::to_markup;
    use pretty_assertions::assert_eq;
    use pyxis_syntax::{lex, parse};
    use rstest::rstest;

    fn html(line: &str) -> String {
        to_markup(&transpile(line))
    }

    #[test]
    fn closed_bold_renders() {
        insta::assert_snapshot!(html("Hello **world**!"), @"Hello <strong>world</strong>!");
    }

    #[test]
    fn unclosed_bold_stays_literal() {
        insta::assert_snapshot!(html("Hello **world"), @"Hello **world");
    }

    #[test]
    fn bold_italic_nests() {
        insta::assert_snapshot!(html("***x***"), @"<strong><em>x</em></strong>");
    }

    #[test]
    fn code_renders_raw() {
        insta::assert_snapshot!(html("a `**b**` c"), @"a <code>**b**</code> c");
    }

    #[test]
    fn heading_never_closes_so_it_stays_literal() {
        insta::assert_snapshot!(html("## Title `x`"), @"## Title `x`");
        let unmerged = to_markup(&render(&parse(&lex("# T"))));
        insta::assert_snapshot!(unmerged, @"<h1 unclosed> T</h1>");
    }

    #[test]
    fn link_gets_href() {
        insta::assert_snapshot!(
            html("go www.x.io now"),
            @r#"go <a href="www.x.io">www.x.io</a> now"#
        );
    }

    #[test]
    fn nested_unclosed_is_flagged() {
        insta::assert_snapshot!(html("**a **b** c"), @"<strong>a <strong unclosed>b</strong></strong> c");
    }

    #[rstest]
    #[case("Hello **world**!")]
    #[case("***a*** *b* ~~c~~ `d`")]
    #[case("# heading **bold**")]
    #[case("see https://x.io/a_b")]
    #[case("**a **b** c")]
    #[case("plain")]
    fn render_then_extract_is_identity(#[case] line: &str) {
        let text: String = transpile(line).iter().map(DisplayNode::to_text).collect();
        assert_eq!(text, line);
    }
}
