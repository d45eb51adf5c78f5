//! # Line Lexer
//!
//! Turns one line of logical text into a flat token stream. Non-raw markup
//! content is lexed again recursively, so the stream already contains the
//! nested structure in pre-order; the parser only has to pair start and end
//! tokens.
//!
//! ## Termination
//!
//! Every loop iteration advances the cursor by at least one char: either
//! the whole capture (markers plus non-empty content) or the single
//! unmatched char.

pub mod cursor;
pub mod matchers;

use cursor::Cursor;

use crate::token::{Token, TokenKind};

/// Lexes one line. Offsets in the returned tokens are char offsets.
pub fn lex(line: &str) -> Vec<Token> {
    let chars: Vec<char> = line.chars().collect();
    lex_chars(&chars, 0)
}

/// Lexes `s`, whose first char sits at `base` within the line.
pub fn lex_chars(s: &[char], base: usize) -> Vec<Token> {
    let mut cur = Cursor::new(s, base);
    let mut tokens = Vec::new();

    while !cur.eof() {
        if let Some(cap) = matchers::match_at(cur.rest(), cur.pos() == 0) {
            let content_start = cur.i + cap.marker_len;
            let content = &s[content_start..content_start + cap.len];
            let content_pos = base + content_start;

            tokens.push(Token::start(cap.kind, cur.pos()));
            if cap.kind.is_text_only() {
                tokens.push(Token::text(content.iter().collect::<String>(), content_pos));
            } else {
                tokens.extend(lex_chars(content, content_pos));
            }
            if cap.has_end || cap.force_closed() {
                tokens.push(Token::end(cap.kind, content_pos + cap.len));
            }

            cur.bump_n(cap.consumed());
            continue;
        }

        let pos = cur.pos();
        let Some(c) = cur.bump() else { break };
        match tokens.last_mut() {
            Some(last) if last.kind == TokenKind::Text => last.value.push(c),
            _ => tokens.push(Token::text(c.to_string(), pos)),
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::NodeKind;
    use crate::token::Position;
    use pretty_assertions::assert_eq;

    #[test]
    fn plain_text_is_one_token() {
        assert_eq!(lex("just words"), vec![Token::text("just words", 0)]);
    }

    #[test]
    fn empty_line_has_no_tokens() {
        assert!(lex("").is_empty());
    }

    #[test]
    fn closed_bold_between_text() {
        assert_eq!(
            lex("Hello **world**!"),
            vec![
                Token::text("Hello ", 0),
                Token::start(NodeKind::Bold, 6),
                Token::text("world", 8),
                Token::end(NodeKind::Bold, 13),
                Token::text("!", 15),
            ]
        );
    }

    #[test]
    fn unclosed_bold_has_no_end_token() {
        assert_eq!(
            lex("Hello **world"),
            vec![
                Token::text("Hello ", 0),
                Token::start(NodeKind::Bold, 6),
                Token::text("world", 8),
            ]
        );
    }

    #[test]
    fn nested_content_is_lexed_with_line_offsets() {
        assert_eq!(
            lex("**a *b* c**"),
            vec![
                Token::start(NodeKind::Bold, 0),
                Token::text("a ", 2),
                Token::start(NodeKind::Italic, 4),
                Token::text("b", 5),
                Token::end(NodeKind::Italic, 6),
                Token::text(" c", 7),
                Token::end(NodeKind::Bold, 9),
            ]
        );
    }

    #[test]
    fn code_content_is_raw() {
        assert_eq!(
            lex("`**x**`"),
            vec![
                Token::start(NodeKind::Code, 0),
                Token::text("**x**", 1),
                Token::end(NodeKind::Code, 6),
            ]
        );
    }

    #[test]
    fn heading_has_no_end_token() {
        let tokens = lex("# Title");
        assert_eq!(
            tokens,
            vec![
                Token::start(NodeKind::Heading(1), 0),
                Token::text(" Title", 1),
            ]
        );
    }

    #[test]
    fn heading_marker_mid_line_is_text() {
        assert_eq!(lex("a # b"), vec![Token::text("a # b", 0)]);
    }

    #[test]
    fn heading_marker_in_nested_content_is_text() {
        let tokens = lex("*# x*");
        assert_eq!(tokens[1], Token::text("# x", 1));
    }

    #[test]
    fn link_has_empty_markers() {
        let tokens = lex("see https://x.io now");
        assert_eq!(tokens[1].kind, TokenKind::Markup(NodeKind::Link));
        assert_eq!(tokens[1].value, "");
        assert_eq!(tokens[2], Token::text("https://x.io", 4));
        assert_eq!(tokens[3].position, Position::End);
        assert_eq!(tokens[4], Token::text(" now", 16));
    }

    #[test]
    fn unmatched_markers_become_text() {
        assert_eq!(lex("** x"), vec![Token::text("** x", 0)]);
        assert_eq!(lex("a*"), vec![Token::text("a*", 0)]);
    }

    #[test]
    fn offsets_count_chars() {
        let tokens = lex("é**ü**");
        assert_eq!(tokens[1], Token::start(NodeKind::Bold, 1));
        assert_eq!(tokens[2], Token::text("ü", 3));
    }
}
