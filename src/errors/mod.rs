//! Error handling for teenyc
//!
//! Every failure is fatal: the first lexer, parser or semantic error aborts
//! the whole compilation and carries the source span it was raised at.

mod diagnostic;

use std::ops::Range;
use thiserror::Error;

pub use diagnostic::{format_error, offset_to_line_col, print_error};

/// A span in the source code, represented as a byte range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SourceSpan {
    /// Start byte offset (inclusive)
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl SourceSpan {
    /// Create a new source span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Zero-width span at a single offset
    pub fn point(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }
}

impl From<SourceSpan> for Range<usize> {
    fn from(span: SourceSpan) -> Self {
        span.start..span.end
    }
}

/// The main error type for teenyc operations
#[derive(Error, Debug)]
pub enum TeenyError {
    #[error("Lexer error: {message}")]
    Lexer { message: String, span: SourceSpan },

    #[error("Parser error: {message}")]
    Parser { message: String, span: SourceSpan },

    #[error("Semantic error: {message}")]
    Semantic { message: String, span: SourceSpan },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TeenyError {
    /// Get the source span associated with this error, if any
    pub fn span(&self) -> Option<SourceSpan> {
        match self {
            TeenyError::Lexer { span, .. } => Some(*span),
            TeenyError::Parser { span, .. } => Some(*span),
            TeenyError::Semantic { span, .. } => Some(*span),
            TeenyError::Io(_) => None,
        }
    }

    /// The bare message, without the kind prefix
    pub fn message(&self) -> String {
        match self {
            TeenyError::Lexer { message, .. }
            | TeenyError::Parser { message, .. }
            | TeenyError::Semantic { message, .. } => message.clone(),
            TeenyError::Io(e) => e.to_string(),
        }
    }

    /// Create a lexer error
    pub fn lexer(message: impl Into<String>, span: SourceSpan) -> Self {
        TeenyError::Lexer {
            message: message.into(),
            span,
        }
    }

    /// Create a parser error
    pub fn parser(message: impl Into<String>, span: SourceSpan) -> Self {
        TeenyError::Parser {
            message: message.into(),
            span,
        }
    }

    /// Create a semantic error
    pub fn semantic(message: impl Into<String>, span: SourceSpan) -> Self {
        TeenyError::Semantic {
            message: message.into(),
            span,
        }
    }
}

/// Result type alias for teenyc operations
pub type TeenyResult<T> = Result<T, TeenyError>;
