//! Compile options
//!
//! Defaults come from the environment so wrappers can configure the
//! translator without flags; command-line flags override them.

use std::env;
use std::path::{Path, PathBuf};

/// Default output file name
pub const DEFAULT_OUTPUT: &str = "out.c";

/// Default number of spaces per nesting level
pub const DEFAULT_INDENT_WIDTH: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Where the generated C file is written
    pub output: PathBuf,
    /// Spaces per nesting level in the generated C
    pub indent_width: usize,
}

impl Config {
    /// Options read from `TEENY_OUTPUT` and `TEENY_INDENT`
    pub fn from_env() -> Self {
        Self {
            output: env::var("TEENY_OUTPUT")
                .ok()
                .filter(|v| !v.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            indent_width: env::var("TEENY_INDENT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_INDENT_WIDTH),
        }
    }

    pub fn with_output(mut self, output: impl AsRef<Path>) -> Self {
        self.output = output.as_ref().to_path_buf();
        self
    }

    pub fn with_indent_width(mut self, indent_width: usize) -> Self {
        self.indent_width = indent_width;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
