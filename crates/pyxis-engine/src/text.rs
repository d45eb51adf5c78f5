//! Char-offset helpers. Every offset the engine hands out counts chars,
//! while Rust strings slice by byte.

/// Placeholder that keeps empty lines selectable. Never counts toward
/// logical length.
pub const ZERO_WIDTH_SPACE: char = '\u{200B}';

pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Chars that count toward logical length.
pub fn logical_len(s: &str) -> usize {
    s.chars().filter(|&c| c != ZERO_WIDTH_SPACE).count()
}

/// Byte offset of char `idx`, clamped to the end of `s`.
pub fn byte_offset(s: &str, idx: usize) -> usize {
    s.char_indices().nth(idx).map_or(s.len(), |(b, _)| b)
}

/// Chars `start..end` of `s`, clamped.
pub fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let from = byte_offset(s, start);
    let to = byte_offset(s, end.max(start));
    &s[from..to]
}

/// `s[..start] + insert + s[end..]` in char offsets.
pub fn splice(s: &str, start: usize, end: usize, insert: &str) -> String {
    let from = byte_offset(s, start);
    let to = byte_offset(s, end.max(start));
    let mut out = String::with_capacity(s.len() + insert.len());
    out.push_str(&s[..from]);
    out.push_str(insert);
    out.push_str(&s[to..]);
    out
}

pub fn strip_zero_width(s: &str) -> String {
    s.chars().filter(|&c| c != ZERO_WIDTH_SPACE).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_offsets_clamp() {
        assert_eq!(byte_offset("héllo", 2), 3);
        assert_eq!(byte_offset("hi", 9), 2);
    }

    #[test]
    fn splice_replaces_char_range() {
        assert_eq!(splice("ab", 1, 1, "x"), "axb");
        assert_eq!(splice("héllo", 1, 2, "e"), "hello");
        assert_eq!(splice("abc", 2, 1, "-"), "ab-c");
    }

    #[test]
    fn zero_width_is_not_logical() {
        assert_eq!(logical_len("\u{200B}"), 0);
        assert_eq!(char_len("\u{200B}"), 1);
        assert_eq!(strip_zero_width("a\u{200B}b"), "ab");
    }

    #[test]
    fn char_slice_by_chars() {
        assert_eq!(char_slice("ünï", 1, 3), "nï");
        assert_eq!(char_slice("abc", 2, 10), "c");
    }
}
