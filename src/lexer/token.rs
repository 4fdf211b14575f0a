//! Token definitions for teenyc
//!
//! Defines all token types produced by the lexer.

use crate::errors::SourceSpan;
use std::fmt;

/// A token produced by the lexer
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token
    pub kind: TokenKind,
    /// Raw text of the token (string literals without their quotes)
    pub text: String,
    /// Source location of this token
    pub span: SourceSpan,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: SourceSpan) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }
}

/// Reserved words of the language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Label,
    Goto,
    Print,
    Input,
    Let,
    If,
    Then,
    Endif,
    While,
    Repeat,
    Endwhile,
}

impl Keyword {
    /// Try to parse a string as a keyword. Matching is case-sensitive.
    pub fn parse(s: &str) -> Option<Keyword> {
        match s {
            "LABEL" => Some(Keyword::Label),
            "GOTO" => Some(Keyword::Goto),
            "PRINT" => Some(Keyword::Print),
            "INPUT" => Some(Keyword::Input),
            "LET" => Some(Keyword::Let),
            "IF" => Some(Keyword::If),
            "THEN" => Some(Keyword::Then),
            "ENDIF" => Some(Keyword::Endif),
            "WHILE" => Some(Keyword::While),
            "REPEAT" => Some(Keyword::Repeat),
            "ENDWHILE" => Some(Keyword::Endwhile),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Keyword::Label => "LABEL",
            Keyword::Goto => "GOTO",
            Keyword::Print => "PRINT",
            Keyword::Input => "INPUT",
            Keyword::Let => "LET",
            Keyword::If => "IF",
            Keyword::Then => "THEN",
            Keyword::Endif => "ENDIF",
            Keyword::While => "WHILE",
            Keyword::Repeat => "REPEAT",
            Keyword::Endwhile => "ENDWHILE",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The three families a token kind belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenBand {
    Structural,
    Keyword,
    Operator,
}

/// The kind of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structural
    /// End of input
    Eof,
    /// `\n`
    Newline,
    /// Numeric literal, e.g. `12` or `3.25`
    Number,
    /// Identifier
    Ident,
    /// Double-quoted string literal
    String,

    /// Reserved word
    Keyword(Keyword),

    // Operators
    /// `=`
    Eq,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `==`
    EqEq,
    /// `!=`
    BangEq,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,
}

impl TokenKind {
    /// Check if this is an EOF token
    pub fn is_eof(&self) -> bool {
        matches!(self, TokenKind::Eof)
    }

    pub fn band(&self) -> TokenBand {
        match self {
            TokenKind::Eof
            | TokenKind::Newline
            | TokenKind::Number
            | TokenKind::Ident
            | TokenKind::String => TokenBand::Structural,
            TokenKind::Keyword(_) => TokenBand::Keyword,
            TokenKind::Eq
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::EqEq
            | TokenKind::BangEq
            | TokenKind::Lt
            | TokenKind::LtEq
            | TokenKind::Gt
            | TokenKind::GtEq => TokenBand::Operator,
        }
    }

    /// Relational operators allowed between the operands of a comparison
    pub fn is_comparison_op(&self) -> bool {
        matches!(
            self,
            TokenKind::EqEq
                | TokenKind::BangEq
                | TokenKind::Lt
                | TokenKind::LtEq
                | TokenKind::Gt
                | TokenKind::GtEq
        )
    }

    /// Get a human-readable description of this token kind
    pub fn description(&self) -> &'static str {
        match self {
            TokenKind::Eof => "end of file",
            TokenKind::Newline => "newline",
            TokenKind::Number => "number",
            TokenKind::Ident => "identifier",
            TokenKind::String => "string literal",
            TokenKind::Keyword(kw) => kw.as_str(),
            TokenKind::Eq => "'='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::EqEq => "'=='",
            TokenKind::BangEq => "'!='",
            TokenKind::Lt => "'<'",
            TokenKind::LtEq => "'<='",
            TokenKind::Gt => "'>'",
            TokenKind::GtEq => "'>='",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}
