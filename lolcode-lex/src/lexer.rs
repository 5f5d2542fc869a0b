//! Turns LOLCODE source text into a token stream.
//!
//! The scan is a single forward pass with enough look-ahead to recognize
//! the longest multi-word keyword phrase (see [`crate::keywords`]). Line
//! numbering advances on every newline, including newlines consumed while
//! skipping a comment, matching the contract that diagnostics always point
//! at an accurate source line.

use lolcode_util::{LolError, LolResult};

use crate::cursor::Cursor;
use crate::keywords::{self, match_keyword};
use crate::token::{Token, TokenKind};

pub struct Lexer<'a> {
    cursor: Cursor<'a>,
    token_start: usize,
    token_start_line: u32,
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            cursor: Cursor::new(source),
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Tokenizes the entire source, returning every token through a
    /// trailing `Eof`, or the first `InvalidSyntax` error encountered.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn tokenize(mut self) -> LolResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.is_eof();
            tracing::trace!(?token, "lexed token");
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tracing::debug!(count = tokens.len(), "tokenizing complete");
        Ok(tokens)
    }

    fn next_token(&mut self) -> LolResult<Token> {
        self.skip_trivia()?;

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_column = self.cursor.column();

        let Some(c) = self.cursor.current_char() else {
            return Ok(Token::new(
                TokenKind::Eof,
                "",
                self.token_start_line,
                self.token_start_column,
                self.token_start,
            ));
        };

        if c == '"' {
            return self.lex_string();
        }

        if c.is_ascii_digit() || (c == '-' && matches!(self.cursor.peek_char(), Some(d) if d.is_ascii_digit()))
        {
            return self.lex_number();
        }

        if c == '+' {
            self.cursor.advance();
            return Ok(self.finish(TokenKind::Plus));
        }

        if is_word_start(c) {
            return self.lex_word();
        }

        let lexeme = c.to_string();
        Err(LolError::invalid_syntax(
            lexeme,
            self.token_start_line,
            "Unrecognized Character",
        ))
    }

    /// Consumes inline whitespace, newlines, and comments until real
    /// source text is reached.
    fn skip_trivia(&mut self) -> LolResult<()> {
        loop {
            self.cursor.skip_inline_whitespace();
            match self.cursor.current_char() {
                Some('\n') => {
                    self.cursor.advance();
                }
                Some(_) if starts_with_word(&self.cursor, "OBTW") => {
                    self.skip_block_comment()?;
                }
                Some(_) if starts_with_word(&self.cursor, "BTW") => {
                    self.skip_line_comment();
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.cursor.current_char() {
            if c == '\n' {
                break;
            }
            self.cursor.advance();
        }
    }

    fn skip_block_comment(&mut self) -> LolResult<()> {
        let start_line = self.cursor.line();
        loop {
            if self.cursor.remaining().starts_with("TLDR") {
                self.cursor.advance_n(4);
                return Ok(());
            }
            if self.cursor.advance().is_none() {
                return Err(LolError::invalid_syntax(
                    "OBTW",
                    start_line,
                    "Unterminated Comment",
                ));
            }
        }
    }

    fn lex_string(&mut self) -> LolResult<Token> {
        self.cursor.advance(); // opening quote
        loop {
            match self.cursor.current_char() {
                Some('"') => {
                    self.cursor.advance();
                    return Ok(self.finish(TokenKind::StringLit(strip_quotes(
                        self.cursor.slice_from(self.token_start),
                    ))));
                }
                Some('\n') | None => {
                    return Err(LolError::invalid_syntax(
                        self.cursor.slice_from(self.token_start),
                        self.token_start_line,
                        "Unterminated String",
                    ));
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    fn lex_number(&mut self) -> LolResult<Token> {
        if self.cursor.current_char() == Some('-') {
            self.cursor.advance();
        }
        while matches!(self.cursor.current_char(), Some(c) if c.is_ascii_digit()) {
            self.cursor.advance();
        }

        let mut is_float = false;
        if self.cursor.current_char() == Some('.')
            && matches!(self.cursor.peek_char(), Some(c) if c.is_ascii_digit())
        {
            is_float = true;
            self.cursor.advance();
            while matches!(self.cursor.current_char(), Some(c) if c.is_ascii_digit()) {
                self.cursor.advance();
            }
        }

        let lexeme = self.cursor.slice_from(self.token_start);
        if is_float {
            let value: f64 = lexeme.parse().map_err(|_| {
                LolError::invalid_syntax(lexeme, self.token_start_line, "Malformed Float Literal")
            })?;
            Ok(self.finish(TokenKind::Float(value)))
        } else {
            let value: i64 = lexeme.parse().map_err(|_| {
                LolError::invalid_syntax(lexeme, self.token_start_line, "Malformed Integer Literal")
            })?;
            Ok(self.finish(TokenKind::Integer(value)))
        }
    }

    fn lex_word(&mut self) -> LolResult<Token> {
        let first_word = read_word(&mut self.cursor);

        if let Some(b) = keywords::boolean_literal(&first_word) {
            return Ok(self.finish(TokenKind::Boolean(b)));
        }

        let lookahead_cursor = self.cursor;
        let mut words: Vec<String> = vec![first_word.clone()];
        words.extend(peek_words(lookahead_cursor, 3));
        let word_refs: Vec<&str> = words.iter().map(String::as_str).collect();

        match match_keyword(&word_refs) {
            Some((consumed, kind)) => {
                for _ in 0..(consumed - 1) {
                    self.cursor.skip_inline_whitespace();
                    read_word(&mut self.cursor);
                }
                Ok(self.finish(kind))
            }
            None => Ok(self.finish_with_lexeme(TokenKind::Identifier, first_word)),
        }
    }

    fn finish(&self, kind: TokenKind) -> Token {
        let lexeme = self.cursor.slice_from(self.token_start).to_string();
        Token::new(
            kind,
            lexeme,
            self.token_start_line,
            self.token_start_column,
            self.token_start,
        )
    }

    fn finish_with_lexeme(&self, kind: TokenKind, lexeme: String) -> Token {
        Token::new(
            kind,
            lexeme,
            self.token_start_line,
            self.token_start_column,
            self.token_start,
        )
    }
}

fn is_word_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_word_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Reads one identifier-shaped word, including a glued trailing `?` as in
/// `RLY?`/`WTF?`, which LOLCODE writes with no space before the mark.
fn read_word(cursor: &mut Cursor) -> String {
    let start = cursor.position();
    while matches!(cursor.current_char(), Some(c) if is_word_continue(c)) {
        cursor.advance();
    }
    let mut word = cursor.slice_from(start).to_string();
    if cursor.current_char() == Some('?') {
        cursor.advance();
        word.push('?');
    }
    word
}

/// Reads up to `max` further words from a disposable cursor copy, stopping
/// at anything that isn't `<whitespace><word>`.
fn peek_words(mut cursor: Cursor, max: usize) -> Vec<String> {
    let mut words = Vec::new();
    for _ in 0..max {
        cursor.skip_inline_whitespace();
        match cursor.current_char() {
            Some(c) if is_word_start(c) => words.push(read_word(&mut cursor)),
            _ => break,
        }
    }
    words
}

fn starts_with_word(cursor: &Cursor, word: &str) -> bool {
    let rest = cursor.remaining();
    if !rest.starts_with(word) {
        return false;
    }
    match rest[word.len()..].chars().next() {
        Some(c) => !is_word_continue(c),
        None => true,
    }
}

fn strip_quotes(lexeme: &str) -> String {
    lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(lexeme)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_program_delimiters() {
        assert_eq!(
            kinds("HAI\nKTHXBYE"),
            vec![TokenKind::Hai, TokenKind::KThxBye, TokenKind::Eof]
        );
    }

    #[test]
    fn lexes_multi_word_keyword_with_longest_match() {
        assert_eq!(
            kinds("I HAS A X"),
            vec![TokenKind::IHasA, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn lexes_i_iz_distinct_from_i_has_a() {
        assert_eq!(
            kinds("I IZ add MKAY"),
            vec![
                TokenKind::IIz,
                TokenKind::Identifier,
                TokenKind::Mkay,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn lexes_o_rly_with_glued_question_mark() {
        assert_eq!(kinds("O RLY?"), vec![TokenKind::ORly, TokenKind::Eof]);
    }

    #[test]
    fn lexes_integer_and_float_literals() {
        let tokens = kinds("42 -3 3.14 -0.5");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Integer(42),
                TokenKind::Integer(-3),
                TokenKind::Float(3.14),
                TokenKind::Float(-0.5),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn strips_quotes_from_string_literals() {
        let tokens = kinds("\"hello world\"");
        assert_eq!(
            tokens,
            vec![TokenKind::StringLit("hello world".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn unterminated_string_is_invalid_syntax() {
        let err = Lexer::new("\"oops").tokenize().unwrap_err();
        assert!(matches!(err, LolError::InvalidSyntax { .. }));
    }

    #[test]
    fn line_comment_is_skipped_to_end_of_line() {
        assert_eq!(
            kinds("VISIBLE IT BTW this is ignored\nKTHXBYE"),
            vec![
                TokenKind::Visible,
                TokenKind::Identifier,
                TokenKind::KThxBye,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn block_comment_spans_multiple_lines_and_still_counts_them() {
        let tokens = Lexer::new("HAI\nOBTW\nthis\nis\nignored\nTLDR\nKTHXBYE")
            .tokenize()
            .unwrap();
        let kthxbye = tokens.iter().find(|t| t.kind == TokenKind::KThxBye).unwrap();
        assert_eq!(kthxbye.line, 7);
    }

    #[test]
    fn boolean_and_noob_literals() {
        assert_eq!(
            kinds("WIN FAIL NOOB"),
            vec![
                TokenKind::Boolean(true),
                TokenKind::Boolean(false),
                TokenKind::Noob,
                TokenKind::Eof
            ]
        );
    }

    #[test]
    fn unrecognized_character_is_invalid_syntax() {
        let err = Lexer::new("@").tokenize().unwrap_err();
        assert!(matches!(err, LolError::InvalidSyntax { .. }));
    }

    proptest::proptest! {
        /// Lexemes reconstruct a space-joined integer sequence: every
        /// lexable program's source can be rebuilt from its lexemes
        /// modulo whitespace and comments.
        #[test]
        fn integer_lexemes_round_trip(values in proptest::collection::vec(-1_000_000i64..1_000_000, 1..20)) {
            let source = values.iter().map(i64::to_string).collect::<Vec<_>>().join(" ");
            let tokens = Lexer::new(&source).tokenize().unwrap();
            let lexemes: Vec<&str> = tokens
                .iter()
                .filter(|t| !t.is_eof())
                .map(|t| t.lexeme.as_str())
                .collect();
            let reconstructed = lexemes.join(" ");
            proptest::prop_assert_eq!(reconstructed, source);
        }
    }
}
