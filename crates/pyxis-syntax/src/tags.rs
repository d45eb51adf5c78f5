//! # Tag Metadata
//!
//! The one table that says which literal markers surround each kind of
//! markup. The renderer, the unclosed-node merger and the position mapper
//! all read marker lengths from here; nothing else hardcodes `**` or `#`.
//!
//! | kind            | marker  | prefix | suffix |
//! |-----------------|---------|--------|--------|
//! | `BoldItalic`    | `***`   | yes    | yes    |
//! | `Bold`          | `**`    | yes    | yes    |
//! | `Italic`        | `*`     | yes    | yes    |
//! | `Strikethrough` | `~~`    | yes    | yes    |
//! | `Code`          | `` ` `` | yes    | yes    |
//! | `Heading(n)`    | `#` x n | yes    | no     |
//! | `Link`          | (none)  | no     | no     |

use std::fmt;

/// A kind of inline or line-level markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    BoldItalic,
    Bold,
    Italic,
    Strikethrough,
    Code,
    /// ATX heading, level 1 to 6.
    Heading(u8),
    Link,
}

/// Marker layout for a [`NodeKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagMeta {
    pub marker: &'static str,
    pub has_prefix: bool,
    pub has_suffix: bool,
}

impl TagMeta {
    pub const NONE: TagMeta = TagMeta {
        marker: "",
        has_prefix: false,
        has_suffix: false,
    };

    const fn wrapping(marker: &'static str) -> Self {
        Self {
            marker,
            has_prefix: true,
            has_suffix: true,
        }
    }

    const fn leading(marker: &'static str) -> Self {
        Self {
            marker,
            has_prefix: true,
            has_suffix: false,
        }
    }

    /// Literal text emitted before the content.
    pub fn prefix(&self) -> &'static str {
        if self.has_prefix { self.marker } else { "" }
    }

    /// Literal text emitted after the content. Unclosed nodes never
    /// received their closing marker, so it is empty for them.
    pub fn suffix(&self, closed: bool) -> &'static str {
        if self.has_suffix && closed {
            self.marker
        } else {
            ""
        }
    }

    /// Prefix length in chars.
    pub fn prefix_len(&self) -> usize {
        self.prefix().chars().count()
    }

    /// Suffix length in chars, zero when `closed` is false.
    pub fn suffix_len(&self, closed: bool) -> usize {
        self.suffix(closed).chars().count()
    }
}

const HEADING_MARKERS: [&str; 6] = ["#", "##", "###", "####", "#####", "######"];

impl NodeKind {
    pub const MAX_HEADING: u8 = 6;

    /// Metadata lookup. Out-of-range heading levels clamp to the nearest
    /// valid level.
    pub const fn meta(self) -> TagMeta {
        match self {
            NodeKind::BoldItalic => TagMeta::wrapping("***"),
            NodeKind::Bold => TagMeta::wrapping("**"),
            NodeKind::Italic => TagMeta::wrapping("*"),
            NodeKind::Strikethrough => TagMeta::wrapping("~~"),
            NodeKind::Code => TagMeta::wrapping("`"),
            NodeKind::Heading(level) => {
                let idx = match level {
                    0 => 0,
                    l if l > Self::MAX_HEADING => (Self::MAX_HEADING - 1) as usize,
                    l => (l - 1) as usize,
                };
                TagMeta::leading(HEADING_MARKERS[idx])
            }
            NodeKind::Link => TagMeta::NONE,
        }
    }

    /// Content is captured literally instead of being lexed again.
    pub fn is_text_only(self) -> bool {
        matches!(
            self,
            NodeKind::Code | NodeKind::Heading(_) | NodeKind::Link
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::BoldItalic => write!(f, "bold_italic"),
            NodeKind::Bold => write!(f, "bold"),
            NodeKind::Italic => write!(f, "italic"),
            NodeKind::Strikethrough => write!(f, "strikethrough"),
            NodeKind::Code => write!(f, "code"),
            NodeKind::Heading(level) => write!(f, "h{level}"),
            NodeKind::Link => write!(f, "link"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(NodeKind::BoldItalic, "***", "***")]
    #[case(NodeKind::Bold, "**", "**")]
    #[case(NodeKind::Italic, "*", "*")]
    #[case(NodeKind::Strikethrough, "~~", "~~")]
    #[case(NodeKind::Code, "`", "`")]
    #[case(NodeKind::Heading(3), "###", "")]
    #[case(NodeKind::Link, "", "")]
    fn closed_markers(#[case] kind: NodeKind, #[case] prefix: &str, #[case] suffix: &str) {
        let meta = kind.meta();
        assert_eq!(meta.prefix(), prefix);
        assert_eq!(meta.suffix(true), suffix);
    }

    #[test]
    fn unclosed_nodes_have_no_suffix() {
        assert_eq!(NodeKind::Bold.meta().suffix(false), "");
        assert_eq!(NodeKind::Bold.meta().suffix_len(false), 0);
        assert_eq!(NodeKind::Bold.meta().prefix_len(), 2);
    }

    #[test]
    fn heading_levels_clamp() {
        assert_eq!(NodeKind::Heading(0).meta().marker, "#");
        assert_eq!(NodeKind::Heading(9).meta().marker, "######");
    }

    #[test]
    fn text_only_kinds() {
        assert!(NodeKind::Code.is_text_only());
        assert!(NodeKind::Heading(1).is_text_only());
        assert!(NodeKind::Link.is_text_only());
        assert!(!NodeKind::Bold.is_text_only());
    }
}
