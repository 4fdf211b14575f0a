//! Hand-written lexer/scanner for teenyc
//!
//! Produces one token per call to [`Lexer::next_token`]. Any malformed input
//! is a fatal error; there are no error tokens to recover from.

use log::trace;

use super::token::{Keyword, Token, TokenKind};
use crate::errors::{offset_to_line_col, SourceSpan, TeenyError, TeenyResult};

/// Characters that may not appear inside a string literal
const STRING_FORBIDDEN: [char; 5] = ['\r', '\n', '\t', '\\', '%'];

/// The lexer/scanner for teenyc source code
pub struct Lexer<'src> {
    /// The source code being lexed
    source: &'src str,
    /// Current byte position in the source
    pos: usize,
    /// Start position of the current token
    start: usize,
    /// Set once the iterator has yielded EOF or an error
    finished: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            pos: 0,
            start: 0,
            finished: false,
        }
    }

    /// Peek at the current character without consuming it
    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    /// Advance to the next character and return it
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Get the current span (from start to current position)
    fn current_span(&self) -> SourceSpan {
        SourceSpan::new(self.start, self.pos)
    }

    /// Get the current lexeme (text from start to current position)
    fn current_lexeme(&self) -> &'src str {
        &self.source[self.start..self.pos]
    }

    /// Create a token whose text is the current lexeme
    fn make_token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.current_lexeme(), self.current_span())
    }

    /// Consume the character if it matches the expected one
    fn match_char(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Build a lexer error for the character starting at `at`
    fn error_at(&self, at: usize, what: &str) -> TeenyError {
        let (line, col) = offset_to_line_col(self.source, at);
        let span = match self.source[at..].chars().next() {
            Some(c) => SourceSpan::new(at, at + c.len_utf8()),
            None => SourceSpan::point(at),
        };
        TeenyError::lexer(format!("{} at {}:{}", what, line, col), span)
    }

    fn describe_char(c: Option<char>) -> String {
        match c {
            Some(c) => format!("{:?}", c),
            None => "end of file".to_string(),
        }
    }

    /// Skip blanks and `#` comments. Newlines are significant and stay.
    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                Some(' ' | '\t' | '\r') => {
                    self.advance();
                }
                Some('#') => {
                    while self.peek().is_some_and(|c| c != '\n') {
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    /// Scan a number literal: digits, optionally `.` and more digits
    fn scan_number(&mut self) -> TeenyResult<Token> {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }

        if self.match_char('.') {
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                let what = format!(
                    "illegal character in number: {}",
                    Self::describe_char(self.peek())
                );
                return Err(self.error_at(self.pos, &what));
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
            if self.peek() == Some('.') {
                return Err(self.error_at(self.pos, "illegal character in number: '.'"));
            }
        }

        Ok(self.make_token(TokenKind::Number))
    }

    /// Scan a string literal; the opening quote is already consumed
    fn scan_string(&mut self) -> TeenyResult<Token> {
        let body_start = self.pos;

        loop {
            match self.peek() {
                Some('"') => break,
                Some(c) if STRING_FORBIDDEN.contains(&c) => {
                    let what = format!("illegal character in string: {:?}", c);
                    return Err(self.error_at(self.pos, &what));
                }
                Some(_) => {
                    self.advance();
                }
                None => {
                    return Err(TeenyError::lexer(
                        "unterminated string",
                        SourceSpan::new(self.start, self.pos),
                    ));
                }
            }
        }

        let text = &self.source[body_start..self.pos];
        self.advance(); // closing quote
        Ok(Token::new(TokenKind::String, text, self.current_span()))
    }

    /// Scan an identifier or keyword
    fn scan_identifier(&mut self) -> Token {
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric()) {
            self.advance();
        }

        match Keyword::parse(self.current_lexeme()) {
            Some(kw) => self.make_token(TokenKind::Keyword(kw)),
            None => self.make_token(TokenKind::Ident),
        }
    }

    /// Scan the next token. Once the end of input is reached every further
    /// call returns another EOF token.
    pub fn next_token(&mut self) -> TeenyResult<Token> {
        self.skip_whitespace();
        self.start = self.pos;

        let Some(c) = self.advance() else {
            return Ok(self.make_token(TokenKind::Eof));
        };

        let token = match c {
            '\n' => self.make_token(TokenKind::Newline),
            '+' => self.make_token(TokenKind::Plus),
            '-' => self.make_token(TokenKind::Minus),
            '*' => self.make_token(TokenKind::Star),
            '/' => self.make_token(TokenKind::Slash),

            '=' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::EqEq)
                } else {
                    self.make_token(TokenKind::Eq)
                }
            }

            '<' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::LtEq)
                } else {
                    self.make_token(TokenKind::Lt)
                }
            }

            '>' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::GtEq)
                } else {
                    self.make_token(TokenKind::Gt)
                }
            }

            '!' => {
                if self.match_char('=') {
                    self.make_token(TokenKind::BangEq)
                } else {
                    let what = format!(
                        "expected '!=', found '!' followed by {}",
                        Self::describe_char(self.peek())
                    );
                    return Err(self.error_at(self.start, &what));
                }
            }

            '"' => return self.scan_string(),
            c if c.is_ascii_digit() => return self.scan_number(),
            c if c.is_ascii_alphabetic() => self.scan_identifier(),

            c => {
                let what = format!("unknown token {:?}", c);
                return Err(self.error_at(self.start, &what));
            }
        };

        Ok(token)
    }

    /// Collect all tokens into a vector, ending with the EOF token
    pub fn tokenize(mut self) -> TeenyResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        trace!("tokenized {} tokens", tokens.len());
        Ok(tokens)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = TeenyResult<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.kind.is_eof() => {
                self.finished = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
