//! # Matchers
//!
//! Each markup kind is recognised by a validator (may a node start here?)
//! and a breaking condition (does the node close after this char?). The
//! candidate is picked from the leading chars: a run of `*` or `#`, a
//! backtick, a tilde, or a URL prefix.

use std::sync::OnceLock;

use regex::Regex;

use crate::tags::NodeKind;

static LINK_REGEX: OnceLock<Regex> = OnceLock::new();

fn link_regex() -> &'static Regex {
    LINK_REGEX.get_or_init(|| Regex::new(r"(?i)^(https?://|www\.)\S+").expect("Invalid link regex"))
}

/// A successful match at the cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    pub kind: NodeKind,
    /// Chars of opening marker before the content.
    pub marker_len: usize,
    /// Chars of captured content.
    pub len: usize,
    /// The closing marker was found and is consumed after the content.
    pub has_end: bool,
}

impl Capture {
    /// Chars consumed from the cursor by this capture.
    pub fn consumed(&self) -> usize {
        let suffix = if self.has_end { self.marker_len } else { 0 };
        self.marker_len + self.len + suffix
    }

    /// The node gets an end token even without a closing marker. Only
    /// links; a heading never gets one.
    pub fn force_closed(&self) -> bool {
        self.kind == NodeKind::Link
    }
}

/// Tries every matcher applicable to the chars at the front of `rest`.
///
/// `line_start` is true only at offset 0 of the original line; headings
/// never match anywhere else.
pub fn match_at(rest: &[char], line_start: bool) -> Option<Capture> {
    match *rest.first()? {
        Emphasis::STAR => {
            let kind = match leading_run(rest, Emphasis::STAR) {
                1 => NodeKind::Italic,
                2 => NodeKind::Bold,
                3 => NodeKind::BoldItalic,
                _ => return None,
            };
            delimited(rest, kind)
        }
        Heading::HASH => {
            let level = leading_run(rest, Heading::HASH);
            if !line_start || level > NodeKind::MAX_HEADING as usize {
                return None;
            }
            heading(rest, level)
        }
        Code::TICK => code(rest),
        Strikethrough::TILDE => {
            if rest.get(1) != Some(&Strikethrough::TILDE) {
                return None;
            }
            delimited(rest, NodeKind::Strikethrough)
        }
        'h' | 'H' | 'w' | 'W' => link(rest),
        _ => None,
    }
}

/// `*` delimiter owner for italic, bold and bold-italic.
pub struct Emphasis;

impl Emphasis {
    pub const STAR: char = '*';
}

/// `~~` delimiter owner.
pub struct Strikethrough;

impl Strikethrough {
    pub const TILDE: char = '~';
}

/// Backtick owner. Code spans are raw: their content is never lexed.
pub struct Code;

impl Code {
    pub const TICK: char = '`';
}

/// `#` owner for ATX headings.
pub struct Heading;

impl Heading {
    pub const HASH: char = '#';
}

fn leading_run(rest: &[char], c: char) -> usize {
    rest.iter().take_while(|&&x| x == c).count()
}

/// Wrapping markers (`*`, `**`, `***`, `~~`): the char after the opening
/// marker must exist and not be a space; the node closes after a non-space
/// char followed by the full marker.
fn delimited(rest: &[char], kind: NodeKind) -> Option<Capture> {
    let marker: Vec<char> = kind.meta().marker.chars().collect();
    let n = marker.len();
    match rest.get(n) {
        Some(c) if *c != ' ' => {}
        _ => return None,
    }

    let (len, has_end) = scan(rest, n, |s, p| {
        s[p] != ' ' && s.get(p + 1..p + 1 + n) == Some(marker.as_slice())
    });
    Some(Capture {
        kind,
        marker_len: n,
        len,
        has_end,
    })
}

fn code(rest: &[char]) -> Option<Capture> {
    rest.get(1)?;
    let (len, has_end) = scan(rest, 1, |s, p| s.get(p + 1) == Some(&Code::TICK));
    Some(Capture {
        kind: NodeKind::Code,
        marker_len: 1,
        len,
        has_end,
    })
}

/// `#`×level, a space, then at least one more char. The space belongs to
/// the heading content so every char of the line stays accounted for.
fn heading(rest: &[char], level: usize) -> Option<Capture> {
    if rest.get(level) != Some(&' ') || rest.get(level + 1).is_none() {
        return None;
    }
    Some(Capture {
        kind: NodeKind::Heading(level as u8),
        marker_len: level,
        len: rest.len() - level,
        has_end: false,
    })
}

/// A link never spans whitespace, so only the leading word is handed to
/// the regex, and only when it could start with a URL prefix.
fn link(rest: &[char]) -> Option<Capture> {
    let starts_like_url = |prefix: &str| {
        rest.len() >= prefix.len()
            && rest
                .iter()
                .zip(prefix.chars())
                .all(|(c, p)| c.to_ascii_lowercase() == p)
    };
    if !starts_like_url("http") && !starts_like_url("www.") {
        return None;
    }

    let word: String = rest.iter().take_while(|c| !c.is_whitespace()).collect();
    let m = link_regex().find(&word)?;
    Some(Capture {
        kind: NodeKind::Link,
        marker_len: 0,
        len: m.as_str().chars().count(),
        has_end: true,
    })
}

/// Accumulates chars from `from` until `breaks` holds (that char is part
/// of the capture) or the slice ends. Returns the captured length and
/// whether the capture stopped early.
fn scan(rest: &[char], from: usize, breaks: impl Fn(&[char], usize) -> bool) -> (usize, bool) {
    let mut p = from;
    while p < rest.len() {
        if breaks(rest, p) {
            return (p + 1 - from, true);
        }
        p += 1;
    }
    (rest.len().saturating_sub(from), false)
}
