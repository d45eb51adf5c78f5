//! Markup serialisation for the render sink.
//!
//! Text leaves are written verbatim so literal markers typed by the user
//! show up as typed; only attribute values are escaped.

use super::{DisplayElement, DisplayNode};

pub fn to_markup(nodes: &[DisplayNode]) -> String {
    let mut out = String::new();
    for node in nodes {
        write_node(node, &mut out);
    }
    out
}

fn write_node(node: &DisplayNode, out: &mut String) {
    match node {
        DisplayNode::Text(value) => out.push_str(value),
        DisplayNode::Element(el) => write_element(el, out),
    }
}

fn write_element(el: &DisplayElement, out: &mut String) {
    let name = el.tag.name();
    out.push('<');
    out.push_str(name);
    if let Some(href) = &el.href {
        out.push_str(" href=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(href));
        out.push('"');
    }
    if el.unclosed {
        out.push_str(" unclosed");
    }
    out.push('>');
    for child in &el.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}
