use log::debug;

use crate::display::{DisplayNode, DisplayPath, DisplayPoint, siblings_len};

/// Walks `path` from the root's children. `None` if any index is missing.
pub fn descendant<'a>(lines: &'a [DisplayNode], path: &DisplayPath) -> Option<&'a DisplayNode> {
    let (&first, rest) = path.indices().split_first()?;
    let mut node = lines.get(first)?;
    for &idx in rest {
        node = node.children().get(idx)?;
    }
    Some(node)
}

/// Path of `target` (compared by identity) below the root, depth first.
pub fn relative_position(lines: &[DisplayNode], target: &DisplayNode) -> Option<DisplayPath> {
    fn search(nodes: &[DisplayNode], target: &DisplayNode, path: &mut Vec<usize>) -> bool {
        for (idx, node) in nodes.iter().enumerate() {
            path.push(idx);
            if std::ptr::eq(node, target) || search(node.children(), target, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    let mut path = Vec::new();
    search(lines, target, &mut path).then(|| DisplayPath::new(path))
}

/// Logical offset into the whole buffer for a display point.
///
/// Sums everything before the point: earlier lines plus their newline,
/// earlier siblings at every depth, and the prefix markers of the elements
/// descended through. A path that does not resolve falls back to the
/// deepest node it reaches (offset clamped to that node), or to offset 0 if
/// not even the line exists.
pub fn logical_offset(lines: &[DisplayNode], point: &DisplayPoint) -> usize {
    let Some((&line_idx, rest)) = point.path.indices().split_first() else {
        debug!("selection at root container, using offset 0");
        return 0;
    };
    let Some(line) = lines.get(line_idx) else {
        debug!("line {line_idx} does not exist, using offset 0");
        return 0;
    };

    let mut total: usize = lines[..line_idx]
        .iter()
        .map(|l| l.logical_len() + 1)
        .sum();
    let mut node = line;

    for &idx in rest {
        let children = node.children();
        let Some(child) = children.get(idx) else {
            debug!(
                "path {} stops resolving below depth with {} children, clamping",
                point.path,
                children.len()
            );
            return total + point.offset.min(node.logical_len());
        };
        if let DisplayNode::Element(el) = node {
            total += el.prefix_len();
        }
        total += siblings_len(&children[..idx]);
        node = child;
    }

    total + point.offset.min(node.logical_len())
}
