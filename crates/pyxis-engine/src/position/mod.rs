//! # Position Mapping
//!
//! Logical offsets and display points describe the same caret. The forward
//! direction walks sibling lengths down to the deepest node that holds the
//! offset; the inverse direction sums everything that precedes a point.
//! Both read marker lengths from the shared tag table, which is what keeps
//! them exact inverses of each other.

pub mod forward;
pub mod inverse;

pub use forward::{NodePosition, line_point, locate, node_position};
pub use inverse::{descendant, logical_offset, relative_position};
