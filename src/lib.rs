//! teenyc - Teeny Tiny to C translator
//!
//! Lexing, parsing, semantic checks and C generation all happen in a single
//! pass: the parser pulls tokens from the lexer on demand and appends C to
//! the emitter as each production is recognised.

pub mod codegen;
pub mod config;
pub mod errors;
pub mod lexer;
pub mod parser;

use std::path::PathBuf;

use log::debug;

// Re-export commonly used types
pub use codegen::Emitter;
pub use config::Config;
pub use errors::{SourceSpan, TeenyError, TeenyResult};
pub use lexer::{Keyword, Lexer, Token, TokenBand, TokenKind};
pub use parser::Parser;

/// Translate a whole program to C text
pub fn compile(source: &str, config: &Config) -> TeenyResult<String> {
    let emitter = Parser::with_emitter(source, Emitter::new(config.indent_width))?.program()?;
    let output = emitter.finalize();
    debug!("generated {} bytes of C", output.len());
    Ok(output)
}

/// Translate a whole program and write the C file to `config.output`.
///
/// Nothing is written unless the translation succeeds.
pub fn compile_to_file(source: &str, config: &Config) -> TeenyResult<PathBuf> {
    let emitter = Parser::with_emitter(source, Emitter::new(config.indent_width))?.program()?;
    emitter.write_file(&config.output)?;
    Ok(config.output.clone())
}
