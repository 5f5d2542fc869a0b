//! Character-at-a-time traversal over the source text.
//!
//! An ASCII fast path for the common case plus a UTF-8-aware fallback,
//! since LOLCODE source files are required to be UTF-8 text even though
//! the language's own syntax is ASCII-only.

/// A rewindable position in `source`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorSnapshot {
    position: usize,
    line: u32,
    column: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct Cursor<'a> {
    source: &'a str,
    position: usize,
    line: u32,
    column: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Cursor {
            source,
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// The character at the cursor, or `None` at end of input.
    pub fn current_char(&self) -> Option<char> {
        self.char_at(0)
    }

    pub fn peek_char(&self) -> Option<char> {
        self.char_at(1)
    }

    /// The character `offset` positions ahead of the cursor.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        let rest = self.source.get(self.position..)?;
        if rest.is_ascii() {
            return rest.as_bytes().get(offset).map(|&b| b as char);
        }
        rest.chars().nth(offset)
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Advances past the current character, updating line/column.
    pub fn advance(&mut self) -> Option<char> {
        let c = self.current_char()?;
        self.position += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    /// Advances `n` characters, short-circuiting at end of input.
    pub fn advance_n(&mut self, n: usize) {
        for _ in 0..n {
            if self.advance().is_none() {
                break;
            }
        }
    }

    /// Advances past `c` and returns `true` if the current character is `c`.
    pub fn match_char(&mut self, c: char) -> bool {
        if self.current_char() == Some(c) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skips ASCII space and tab characters only — LOLCODE is line-oriented
    /// and newlines are significant statement separators, so they are left
    /// for the lexer to consume explicitly.
    pub fn skip_inline_whitespace(&mut self) {
        while let Some(c) = self.current_char() {
            if c == ' ' || c == '\t' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.position]
    }

    pub fn remaining(&self) -> &'a str {
        &self.source[self.position..]
    }

    pub fn snapshot(&self) -> CursorSnapshot {
        CursorSnapshot {
            position: self.position,
            line: self.line,
            column: self.column,
        }
    }

    pub fn restore(&mut self, snapshot: CursorSnapshot) {
        self.position = snapshot.position;
        self.line = snapshot.line;
        self.column = snapshot.column;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_tracks_lines_and_columns() {
        let mut cursor = Cursor::new("AB\nCD");
        assert_eq!(cursor.advance(), Some('A'));
        assert_eq!((cursor.line(), cursor.column()), (1, 2));
        cursor.advance();
        assert_eq!(cursor.advance(), Some('\n'));
        assert_eq!((cursor.line(), cursor.column()), (2, 1));
        assert_eq!(cursor.current_char(), Some('C'));
    }

    #[test]
    fn snapshot_and_restore_roundtrip() {
        let mut cursor = Cursor::new("HAI");
        cursor.advance();
        let snap = cursor.snapshot();
        cursor.advance();
        cursor.advance();
        assert!(cursor.is_at_end());
        cursor.restore(snap);
        assert_eq!(cursor.current_char(), Some('A'));
    }

    #[test]
    fn handles_utf_8_in_string_literals() {
        let mut cursor = Cursor::new("café");
        cursor.advance_n(3);
        assert_eq!(cursor.current_char(), Some('é'));
    }

    #[test]
    fn match_char_only_advances_on_match() {
        let mut cursor = Cursor::new("?>");
        assert!(!cursor.match_char('>'));
        assert!(cursor.match_char('?'));
        assert_eq!(cursor.current_char(), Some('>'));
    }
}
