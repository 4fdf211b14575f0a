//! Pretty error reporting using ariadne
//!
//! Provides colorful, user-friendly error messages with source context.

use std::ops::Range;

use ariadne::{Color, IndexType, Label, Report, ReportKind, Source};
use crate::errors::{SourceSpan, TeenyError};

fn parts(error: &TeenyError) -> Option<(&str, SourceSpan, &'static str)> {
    match error {
        TeenyError::Lexer { message, span } => Some((message.as_str(), *span, "Lexer error")),
        TeenyError::Parser { message, span } => Some((message.as_str(), *span, "Parser error")),
        TeenyError::Semantic { message, span } => {
            Some((message.as_str(), *span, "Semantic error"))
        }
        TeenyError::Io(_) => None,
    }
}

fn build_report(
    message: &str,
    span: SourceSpan,
    kind: &str,
    color: bool,
) -> Report<'static, Range<usize>> {
    let range = Range::from(span);
    // Spans are byte offsets; ariadne defaults to counting chars.
    let config = ariadne::Config::default()
        .with_color(color)
        .with_index_type(IndexType::Byte);

    Report::build(ReportKind::Error, range.clone())
        .with_config(config)
        .with_message(kind.to_string())
        .with_label(
            Label::new(range)
                .with_message(message.to_string())
                .with_color(Color::Red),
        )
        .finish()
}

/// Print an error with source context to stderr
pub fn print_error(source: &str, filename: &str, error: &TeenyError) {
    let Some((message, span, kind)) = parts(error) else {
        eprintln!("{}: {}", filename, error);
        return;
    };

    if build_report(message, span, kind, true)
        .eprint(Source::from(source))
        .is_err()
    {
        eprintln!("{}: {}", filename, error);
    }
}

/// Format an error as a colourless string (for tests and logs)
pub fn format_error(source: &str, filename: &str, error: &TeenyError) -> String {
    let Some((message, span, kind)) = parts(error) else {
        return format!("{}: {}", filename, error);
    };

    let mut output = Vec::new();
    if build_report(message, span, kind, false)
        .write(Source::from(source), &mut output)
        .is_err()
    {
        return format!("{}: {}", filename, error);
    }

    String::from_utf8_lossy(&output).into_owned()
}

/// Get the line and column for a byte offset
pub fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut line = 1;
    let mut col = 1;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
    }

    (line, col)
}
