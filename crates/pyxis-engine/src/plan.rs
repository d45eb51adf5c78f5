//! # Selective Render Planner
//!
//! Renders the buffer line by line. Lines the caret touches show the
//! markup around the caret as raw logical text, so the user edits exactly
//! what they typed; every other line is fully rendered. The raw region is
//! widened to whole top-level nodes, which keeps the nodes either side of it
//! structurally intact.

use log::trace;
use pyxis_syntax::{Node, parse_line};

use crate::caret::Caret;
use crate::display::{DisplayNode, DisplayTree, Selection, coalesce_text};
use crate::position::line_point;
use crate::render::{render, transpile};
use crate::text::{char_len, char_slice};

/// Display tree plus the selection recomputed against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderPlan {
    pub tree: DisplayTree,
    pub selection: Selection,
}

impl RenderPlan {
    pub fn markup(&self) -> String {
        self.tree.to_markup()
    }
}

/// Start of the top-level node that contains line offset `caret`.
/// Negative offsets give 0, offsets past the end give the line length.
pub fn get_start(nodes: &[Node], caret: isize) -> usize {
    let mut start = 0;
    for node in nodes {
        let len = node.literal_len();
        if (start + len) as isize > caret {
            return start;
        }
        start += len;
    }
    start
}

/// End of the top-level node that contains line offset `caret`, with the
/// same clamping as [`get_start`].
pub fn get_end(nodes: &[Node], caret: isize) -> usize {
    let mut end = 0;
    for node in nodes {
        end += node.literal_len();
        if end as isize > caret {
            return end;
        }
    }
    end
}

/// Renders `text` for the caret `caret` (char offsets, clamped to the
/// buffer).
pub fn render_document(text: &str, caret: Caret) -> RenderPlan {
    let caret = caret.clamp(char_len(text));
    let (start, end) = (caret.start, caret.end);

    let mut lines = Vec::new();
    let mut anchor = None;
    let mut focus = None;
    let mut parsed = 0;

    for (idx, line) in text.split('\n').enumerate() {
        let line_start = if idx == 0 { 0 } else { parsed + 1 };
        let line_len = char_len(line);
        let line_end = line_start + line_len;
        let start_selected = (line_start..=line_end).contains(&start);
        let end_selected = (line_start..=line_end).contains(&end);

        let children = if start_selected || end_selected {
            let local_start = start as isize - line_start as isize;
            let local_end = end as isize - line_start as isize;
            raw_around(line, local_start, local_end)
        } else if parsed > start && parsed < end {
            vec![DisplayNode::text(line)]
        } else {
            transpile(line)
        };

        let line_node = DisplayNode::line(children);
        if start_selected {
            anchor = Some(line_point(&line_node, idx, start - line_start));
        }
        if end_selected {
            focus = Some(line_point(&line_node, idx, end - line_start));
        }
        lines.push(line_node);
        parsed = line_end;
    }

    let selection = match (anchor, focus) {
        (Some(anchor), Some(focus)) => Selection {
            anchor,
            focus,
            collapsed: caret.is_collapsed(),
        },
        _ => Selection::default(),
    };
    trace!(
        "rendered {} lines, anchor {} focus {}",
        lines.len(),
        selection.anchor.path,
        selection.focus.path
    );

    RenderPlan {
        tree: DisplayTree::new(lines),
        selection,
    }
}

/// A caret line: rendered prefix, raw region, rendered suffix.
fn raw_around(line: &str, local_start: isize, local_end: isize) -> Vec<DisplayNode> {
    let nodes = parse_line(line);
    let raw_start = get_start(&nodes, local_start - 1);
    let raw_end = get_end(&nodes, local_end - 1);

    let mut before = Vec::new();
    let mut after = Vec::new();
    let mut at = 0;
    for node in nodes {
        let len = node.literal_len();
        if at + len <= raw_start {
            before.push(node);
        } else if at >= raw_end {
            after.push(node);
        }
        at += len;
    }

    let mut children = render(&before);
    children.push(DisplayNode::text(char_slice(line, raw_start, raw_end)));
    children.extend(render(&after));
    coalesce_text(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::logical_offset;
    use pretty_assertions::assert_eq;
    use pyxis_syntax::parse_line;

    #[test]
    fn rounding_snaps_to_top_level_nodes() {
        let nodes = parse_line("ab **cd** ef");
        // "ab " 0..3, "**cd**" 3..9, " ef" 9..12
        assert_eq!(get_start(&nodes, 5), 3);
        assert_eq!(get_end(&nodes, 5), 9);
        assert_eq!(get_start(&nodes, -1), 0);
        assert_eq!(get_end(&nodes, -1), 3);
        assert_eq!(get_start(&nodes, 40), 12);
        assert_eq!(get_end(&nodes, 40), 12);
    }

    #[test]
    fn rounding_stays_ordered_and_in_bounds() {
        for line in ["", "x", "a **b** *c* d", "# h", "**open", "`a` `b`"] {
            let nodes = parse_line(line);
            let len = line.chars().count() as isize;
            for s in -1..=len + 1 {
                for e in s..=len + 1 {
                    let start = get_start(&nodes, s - 1);
                    let end = get_end(&nodes, e - 1);
                    assert!(start <= end, "{line:?} {s} {e}");
                    assert!(end as isize <= len, "{line:?} {s} {e}");
                }
            }
        }
    }

    #[test]
    fn caret_line_shows_markup_raw() {
        let plan = render_document("a **b**\nc **d**", Caret::at(5));
        insta::assert_snapshot!(
            plan.markup(),
            @"<div>a **b**</div><div>c <strong>d</strong></div>"
        );
        assert_eq!(plan.selection.anchor.path.to_string(), "0.0");
        assert_eq!(plan.selection.anchor.offset, 5);
        assert!(plan.selection.collapsed);
    }

    #[test]
    fn raw_region_is_only_the_touched_node() {
        let plan = render_document("*x* mid **y**", Caret::at(1));
        insta::assert_snapshot!(plan.markup(), @"<div>*x* mid <strong>y</strong></div>");

        let plan = render_document("*x* mid **y**", Caret::at(13));
        insta::assert_snapshot!(plan.markup(), @"<div><em>x</em> mid **y**</div>");
        assert_eq!(plan.selection.anchor.path.to_string(), "0.1");
        assert_eq!(plan.selection.anchor.offset, 10);
    }

    #[test]
    fn lines_inside_a_selection_are_raw() {
        let plan = render_document("**a**\n**b**\n**c**\n**d**", Caret::new(2, 15));
        insta::assert_snapshot!(
            plan.markup(),
            @"<div>**a**</div><div>**b**</div><div>**c**</div><div><strong>d</strong></div>"
        );
        assert_eq!(plan.selection.anchor.path.to_string(), "0.0");
        assert_eq!(plan.selection.focus.path.to_string(), "2.0");
        assert_eq!(plan.selection.focus.offset, 3);
        assert!(!plan.selection.collapsed);
    }

    #[test]
    fn empty_lines_get_placeholder() {
        let plan = render_document("a\n\nb", Caret::at(2));
        assert_eq!(plan.markup(), "<div>a</div><div>\u{200B}</div><div>b</div>");
        assert_eq!(plan.selection.anchor.path.to_string(), "1");
        assert_eq!(plan.selection.anchor.offset, 0);
    }

    #[test]
    fn caret_past_end_is_clamped() {
        let plan = render_document("ab", Caret::at(99));
        assert_eq!(plan.selection.anchor.path.to_string(), "0.0");
        assert_eq!(plan.selection.anchor.offset, 2);
    }

    #[test]
    fn every_caret_survives_the_round_trip() {
        let text = "# Title\nHello **world**!\n\n***x*** `y` https://z.io\n**open";
        let len = text.chars().count();
        for start in 0..=len {
            for end in [start, (start + 3).min(len)] {
                let plan = render_document(text, Caret::new(start, end));
                let lines = &plan.tree.lines;
                assert_eq!(logical_offset(lines, &plan.selection.anchor), start);
                assert_eq!(logical_offset(lines, &plan.selection.focus), end);
                assert_eq!(plan.tree.to_text(), text);
            }
        }
    }
}
