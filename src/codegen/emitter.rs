//! Two-region C output buffer
//!
//! The header region holds the fixed prologue and variable declarations,
//! the body region holds statement translations. Both are append-only and
//! the header always precedes the body in the finished text.

use std::fs::{self, File, Permissions};
use std::io::{self, Write};
use std::path::Path;

use log::debug;
use tempfile::NamedTempFile;

use crate::errors::TeenyResult;

/// Accumulates generated C text in memory until the compilation succeeds
#[derive(Debug, Clone)]
pub struct Emitter {
    header: String,
    body: String,
    /// Current body nesting level
    indent: usize,
    /// Spaces per nesting level
    indent_width: usize,
    /// Whether the next body write begins a new line
    line_start: bool,
}

impl Emitter {
    pub fn new(indent_width: usize) -> Self {
        Self {
            header: String::new(),
            body: String::new(),
            indent: 0,
            indent_width,
            line_start: true,
        }
    }

    fn pad(&self, level: usize) -> String {
        " ".repeat(level * self.indent_width)
    }

    /// Append raw text to the header region
    pub fn append_header(&mut self, text: &str) {
        self.header.push_str(text);
    }

    /// Append raw text to the body region, indenting fresh lines
    pub fn append_body(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.line_start {
            let pad = self.pad(self.indent);
            self.body.push_str(&pad);
        }
        self.body.push_str(text);
        self.line_start = text.ends_with('\n');
    }

    /// Append a full line to the header at the given nesting level
    pub fn header_line(&mut self, level: usize, text: &str) {
        let pad = self.pad(level);
        self.header.push_str(&pad);
        self.header.push_str(text);
        self.header.push('\n');
    }

    /// Append a fragment to the body without ending the line
    pub fn emit(&mut self, text: &str) {
        self.append_body(text);
    }

    /// Append a fragment to the body and end the line
    pub fn emit_line(&mut self, text: &str) {
        self.append_body(text);
        self.append_body("\n");
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Header followed by body
    pub fn finalize(&self) -> String {
        let mut out = String::with_capacity(self.header.len() + self.body.len());
        out.push_str(&self.header);
        out.push_str(&self.body);
        out
    }

    /// Persist the finalized text at `path`.
    ///
    /// The text goes to a temporary file in the destination directory that
    /// is renamed over `path` only after it has been fully written, so a
    /// failure never leaves a truncated artifact behind. An existing file
    /// keeps its permissions; a new one gets the usual `0644`.
    pub fn write_file(&self, path: &Path) -> TeenyResult<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        let text = self.finalize();
        let mut file = NamedTempFile::new_in(dir)?;
        file.write_all(text.as_bytes())?;
        file.flush()?;

        let permissions = match fs::metadata(path) {
            Ok(meta) => meta.permissions(),
            Err(_) => fresh_permissions(file.as_file())?,
        };
        file.as_file().set_permissions(permissions)?;
        file.persist(path).map_err(|e| e.error)?;

        debug!("wrote {} bytes to {}", text.len(), path.display());
        Ok(())
    }
}

/// Temp files are created owner-only; generated sources should not be.
#[cfg(unix)]
fn fresh_permissions(_file: &File) -> io::Result<Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn fresh_permissions(file: &File) -> io::Result<Permissions> {
    Ok(file.metadata()?.permissions())
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new(4)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_precedes_body() {
        let mut emitter = Emitter::new(2);
        emitter.emit_line("x = 1;");
        emitter.append_header("#include <stdio.h>\n");
        assert_eq!(emitter.finalize(), "#include <stdio.h>\nx = 1;\n");
    }

    #[test]
    fn test_fragments_share_one_indented_line() {
        let mut emitter = Emitter::new(4);
        emitter.indent();
        emitter.emit("if (");
        emitter.emit("a > 1");
        emitter.emit_line(") {");
        emitter.indent();
        emitter.emit_line("goto done;");
        emitter.dedent();
        emitter.emit_line("}");
        assert_eq!(
            emitter.finalize(),
            "    if (a > 1) {\n        goto done;\n    }\n"
        );
    }

    #[test]
    fn test_header_line_levels() {
        let mut emitter = Emitter::new(4);
        emitter.header_line(0, "int main(void) {");
        emitter.header_line(1, "float a;");
        assert_eq!(emitter.finalize(), "int main(void) {\n    float a;\n");
    }

    #[test]
    fn test_dedent_saturates() {
        let mut emitter = Emitter::new(4);
        emitter.dedent();
        emitter.emit_line("}");
        assert_eq!(emitter.finalize(), "}\n");
    }

    #[test]
    fn test_write_file_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.c");
        std::fs::write(&path, "stale").unwrap();

        let mut emitter = Emitter::default();
        emitter.append_header("int main(void) {\n");
        emitter.emit_line("return 0;");
        emitter.append_body("}\n");
        emitter.write_file(&path).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "int main(void) {\nreturn 0;\n}\n"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_write_file_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let emitter = Emitter::default();

        let fresh = dir.path().join("fresh.c");
        emitter.write_file(&fresh).unwrap();
        let mode = std::fs::metadata(&fresh).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);

        let shared = dir.path().join("shared.c");
        std::fs::write(&shared, "old").unwrap();
        std::fs::set_permissions(&shared, Permissions::from_mode(0o664)).unwrap();
        emitter.write_file(&shared).unwrap();
        let mode = std::fs::metadata(&shared).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o664);
    }
}
