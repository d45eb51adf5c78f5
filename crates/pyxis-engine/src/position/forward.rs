use crate::display::{DisplayNode, DisplayPath, DisplayPoint};

/// Result of [`node_position`]: which sibling holds the offset and how many
/// logical chars precede it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodePosition {
    pub index: usize,
    pub chars: usize,
}

/// Picks the first sibling whose running logical length meets or exceeds
/// `offset`. Offsets past the end land on the last sibling.
///
/// Returns `None` only for an empty sibling list.
pub fn node_position(nodes: &[DisplayNode], offset: usize) -> Option<NodePosition> {
    let mut sum = 0;
    for (index, node) in nodes.iter().enumerate() {
        let len = node.logical_len();
        if sum + len >= offset {
            return Some(NodePosition { index, chars: sum });
        }
        sum += len;
    }

    let last = nodes.last()?;
    Some(NodePosition {
        index: nodes.len() - 1,
        chars: sum - last.logical_len(),
    })
}

/// Maps a logical offset within `nodes` to a path (relative to `nodes`)
/// and an offset local to the addressed node.
///
/// Descends while the offset falls inside an element's children. An offset
/// inside a hidden prefix or suffix marker stops at the element itself, so
/// the inverse mapping gets every offset back.
pub fn locate(nodes: &[DisplayNode], offset: usize) -> Option<(Vec<usize>, usize)> {
    let mut path = Vec::new();
    let mut siblings = nodes;
    let mut remaining = offset;

    loop {
        let NodePosition { index, chars } = node_position(siblings, remaining)?;
        path.push(index);
        let node = &siblings[index];
        let local = remaining.saturating_sub(chars).min(node.logical_len());

        let DisplayNode::Element(el) = node else {
            return Some((path, local));
        };
        let prefix = el.prefix_len();
        if el.children.is_empty() || local < prefix || local > prefix + el.inner_len() {
            return Some((path, local));
        }
        siblings = &el.children;
        remaining = local - prefix;
    }
}

/// Forward mapping for a whole line: `line` is the line container at index
/// `line_index` of the root, `offset` is relative to the start of the line.
/// A line without logical content maps to the container itself.
pub fn line_point(line: &DisplayNode, line_index: usize, offset: usize) -> DisplayPoint {
    let line_path = DisplayPath::new(vec![line_index]);
    if line.logical_len() == 0 {
        return DisplayPoint::new(line_path, 0);
    }
    match locate(line.children(), offset) {
        Some((rel, local)) => {
            let mut indices = vec![line_index];
            indices.extend(rel);
            DisplayPoint::new(DisplayPath::new(indices), local)
        }
        None => DisplayPoint::new(line_path, 0),
    }
}
