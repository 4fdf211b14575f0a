//! Parser module for teenyc
//!
//! Hand-written recursive descent parser that translates to C as it goes.

mod parser;
mod symbols;

pub use parser::Parser;
pub use symbols::{LabelTable, SymbolTable};
