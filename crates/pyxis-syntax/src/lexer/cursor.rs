/// A cursor for char-by-char line lexing with position tracking.
///
/// Operates over a char slice while tracking the absolute char position
/// in the line (via `base` offset) so nested content reports line offsets.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The chars being lexed.
    pub s: &'a [char],
    /// Offset of `s[0]` within the line.
    pub base: usize,
    /// Current local index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a [char], base: usize) -> Self {
        Self { s, base, i: 0 }
    }

    /// Absolute position within the line (base + local index).
    pub fn pos(&self) -> usize {
        self.base + self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.s.get(self.i).copied()
    }

    /// Everything from the current position to the end of the slice.
    pub fn rest(&self) -> &'a [char] {
        self.s.get(self.i..).unwrap_or(&[])
    }

    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.i += 1;
        Some(c)
    }

    /// Advances by `n` chars. Callers pass lengths taken from `rest()`.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn cursor_basics() {
        let s = chars("hello");
        let mut cur = Cursor::new(&s, 10);
        assert_eq!(cur.pos(), 10);
        assert!(!cur.eof());
        assert_eq!(cur.peek(), Some('h'));
        assert_eq!(cur.bump(), Some('h'));
        assert_eq!(cur.pos(), 11);
        assert_eq!(cur.rest(), &s[1..]);
    }

    #[test]
    fn empty_input() {
        let cur = Cursor::new(&[], 0);
        assert!(cur.eof());
        assert_eq!(cur.peek(), None);
        assert!(cur.rest().is_empty());
    }

    #[test]
    fn bump_n_past_end_is_eof() {
        let s = chars("hi");
        let mut cur = Cursor::new(&s, 0);
        cur.bump_n(10);
        assert!(cur.eof());
        assert_eq!(cur.peek(), None);
        assert!(cur.rest().is_empty());
    }

    #[test]
    fn counts_chars_not_bytes() {
        let s = chars("é*");
        let mut cur = Cursor::new(&s, 0);
        cur.bump();
        assert_eq!(cur.pos(), 1);
        assert_eq!(cur.peek(), Some('*'));
    }
}
