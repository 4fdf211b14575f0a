//! Lexer module for teenyc
//!
//! Hand-written, pull-based lexer that turns source text into tokens on demand.

mod scanner;
mod token;

pub use scanner::Lexer;
pub use token::{Keyword, Token, TokenBand, TokenKind};
