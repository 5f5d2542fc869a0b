//! Token kinds and the `Token` triple the lexer produces.

use std::fmt;

/// The category a token belongs to, plus any payload a literal carries.
///
/// LOLCODE keywords are represented as dedicated variants (rather than a
/// single `Keyword(String)` catch-all) so the parser can match on them
/// exhaustively instead of stringly-typing them.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    Integer(i64),
    Float(f64),
    StringLit(String),
    Boolean(bool),
    Noob,
    Identifier,

    // Program structure
    Hai,
    KThxBye,
    Wazzup,
    Buhbye,

    // Declarations / assignment
    IHasA,
    Itz,
    R,
    IsNowA,
    MaekA,
    TypeNumbr,
    TypeNumbar,
    TypeYarn,
    TypeTroof,

    // Arithmetic
    SumOf,
    DiffOf,
    ProduktOf,
    QuoshuntOf,
    ModOf,
    BiggrOf,
    SmallrOf,
    An,

    // Boolean
    BothOf,
    EitherOf,
    WonOf,
    Not,
    AllOf,
    AnyOf,
    Mkay,
    BothSaem,
    Diffrint,

    // String
    Smoosh,

    // I/O
    Visible,
    Gimmeh,
    Plus,

    // Conditionals
    ORly,
    YaRly,
    NoWai,
    Oic,

    // Switch
    Wtf,
    Omg,
    OmgWtf,
    Gtfo,

    // Loops
    ImInYr,
    ImOuttaYr,
    Uppin,
    Nerfin,
    Yr,
    Til,
    Wile,

    // Functions
    HowIzI,
    IfUSaySo,
    IIz,
    AnYr,
    FoundYr,

    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// A single lexed token: its kind, the exact source text it came from, the
/// 1-based line/column it starts on, and its byte offset into the source —
/// everything [`lolcode_util::Span`] needs to slice the lexeme back out of
/// the original text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: u32,
    pub column: u32,
    pub start: usize,
}

impl Token {
    pub fn new(
        kind: TokenKind,
        lexeme: impl Into<String>,
        line: u32,
        column: u32,
        start: usize,
    ) -> Self {
        let lexeme = lexeme.into();
        Token {
            kind,
            lexeme,
            line,
            column,
            start,
        }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// The half-open byte range this token's lexeme occupies in the source
    /// it was lexed from.
    pub fn end(&self) -> usize {
        self.start + self.lexeme.len()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}('{}')@{}", self.kind, self.lexeme, self.line)
    }
}
