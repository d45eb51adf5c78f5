//! # Key Action Table
//!
//! Pure `(text, caret, key, ctrl) -> (text, caret)` functions. Key names
//! arrive as strings from the host and parse into the closed [`Key`] enum;
//! [`apply`] matches it exhaustively, with one default arm that inserts
//! whatever the key types.

use crate::caret::Caret;
use crate::text::{char_len, splice};

/// Chars that end a word for ctrl+Backspace / ctrl+Delete.
pub const DEFAULT_WORD_BOUNDARIES: [char; 6] = [' ', '\n', '-', '\'', '(', ')'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Backspace,
    Delete,
    Enter,
    Tab,
    Escape,
    Shift,
    Control,
    Alt,
    Meta,
    CapsLock,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Home,
    End,
    PageUp,
    PageDown,
    /// A printable char.
    Char(char),
    /// Any other named key (`F5`, `Insert`, ...). Types nothing.
    Other(String),
}

impl Key {
    /// Parses a host key name. Never fails: single chars become
    /// [`Key::Char`], unknown names [`Key::Other`].
    pub fn from_name(name: &str) -> Key {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Key::Char(c);
        }
        match name {
            "Backspace" => Key::Backspace,
            "Delete" => Key::Delete,
            "Enter" => Key::Enter,
            "Tab" => Key::Tab,
            "Escape" => Key::Escape,
            "Shift" => Key::Shift,
            "Control" => Key::Control,
            "Alt" => Key::Alt,
            "Meta" => Key::Meta,
            "CapsLock" => Key::CapsLock,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "Home" => Key::Home,
            "End" => Key::End,
            "PageUp" => Key::PageUp,
            "PageDown" => Key::PageDown,
            other => Key::Other(other.to_string()),
        }
    }

    /// Text this key types. Empty for modifiers, navigation and unknown
    /// keys.
    pub fn content(&self) -> String {
        match self {
            Key::Char(c) => c.to_string(),
            Key::Enter => "\n".to_string(),
            Key::Tab => "\t".to_string(),
            _ => String::new(),
        }
    }

    /// Keys that only move the native selection.
    pub fn is_navigation(&self) -> bool {
        matches!(
            self,
            Key::ArrowLeft
                | Key::ArrowRight
                | Key::ArrowUp
                | Key::ArrowDown
                | Key::Home
                | Key::End
                | Key::PageUp
                | Key::PageDown
        )
    }

    /// ctrl+`a` and ctrl+`c` select or copy without editing.
    pub fn is_ctrl_selection(&self) -> bool {
        matches!(self, Key::Char('a' | 'A' | 'c' | 'C'))
    }

    /// ctrl+`v` is followed by a paste event that carries the text.
    pub fn is_ctrl_skip(&self) -> bool {
        matches!(self, Key::Char('v' | 'V'))
    }
}

/// Text and caret after a key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    pub caret: Caret,
}

/// Applies `key` to `text` at `caret`.
pub fn apply(text: &str, caret: Caret, key: &Key, ctrl: bool, boundaries: &[char]) -> Edit {
    let caret = caret.clamp(char_len(text));
    match key {
        Key::Backspace => backspace(text, caret, ctrl, boundaries),
        Key::Delete => delete(text, caret, ctrl, boundaries),
        other => insert(text, caret, &other.content()),
    }
}

fn backspace(text: &str, caret: Caret, ctrl: bool, boundaries: &[char]) -> Edit {
    let start = if caret.is_collapsed() && caret.start != 0 {
        if ctrl {
            word_position_backward(text, caret.start, boundaries)
        } else {
            caret.start - 1
        }
    } else {
        caret.start
    };
    Edit {
        text: splice(text, start, caret.end, ""),
        caret: Caret::at(start),
    }
}

fn delete(text: &str, caret: Caret, ctrl: bool, boundaries: &[char]) -> Edit {
    let end = if caret.is_collapsed() {
        if ctrl {
            word_position_forward(text, caret.start, boundaries)
        } else {
            (caret.start + 1).min(char_len(text))
        }
    } else {
        caret.end
    };
    Edit {
        text: splice(text, caret.start, end, ""),
        caret: Caret::at(caret.start),
    }
}

/// Replaces the caret range with `content`, caret after it.
pub fn insert(text: &str, caret: Caret, content: &str) -> Edit {
    Edit {
        text: splice(text, caret.start, caret.end, content),
        caret: Caret::at(caret.start + char_len(content)),
    }
}

/// Scans left from `pos`: skips boundary chars right before the caret,
/// then stops at the next boundary char. Returns the offset just after it.
pub fn word_position_backward(text: &str, pos: usize, boundaries: &[char]) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut idx = pos.min(chars.len());
    let mut in_word = false;
    while idx > 0 {
        let boundary = boundaries.contains(&chars[idx - 1]);
        if !in_word && !boundary {
            in_word = true;
        } else if in_word && boundary {
            break;
        }
        idx -= 1;
    }
    idx
}

/// Mirror of [`word_position_backward`] scanning right.
pub fn word_position_forward(text: &str, pos: usize, boundaries: &[char]) -> usize {
    let chars: Vec<char> = text.chars().collect();
    let mut idx = pos.min(chars.len());
    let mut in_word = false;
    while idx < chars.len() {
        let boundary = boundaries.contains(&chars[idx]);
        if !in_word && !boundary {
            in_word = true;
        } else if in_word && boundary {
            break;
        }
        idx += 1;
    }
    idx
}
