//! Single-pass recursive descent translator for teenyc
//!
//! Each grammar rule is one method. Semantic checks and C emission happen
//! as soon as a production is recognised; no syntax tree is built.
//!
//! ```text
//! program    := { statement }
//! statement  := "PRINT" ( STRING | expression ) nl
//!             | "IF" comparison "THEN" nl { statement } "ENDIF" nl
//!             | "WHILE" comparison "REPEAT" nl { statement } "ENDWHILE" nl
//!             | "LABEL" IDENT nl
//!             | "GOTO" IDENT nl
//!             | "LET" IDENT "=" expression nl
//!             | "INPUT" IDENT nl
//! comparison := expression ( cmpop expression )+
//! expression := term { ( "+" | "-" ) term }
//! term       := unary { ( "*" | "/" ) unary }
//! unary      := [ "+" | "-" ] primary
//! primary    := NUMBER | IDENT
//! nl         := NEWLINE { NEWLINE }
//! ```

use log::{debug, trace};

use super::symbols::{LabelTable, SymbolTable};
use crate::codegen::Emitter;
use crate::errors::{TeenyError, TeenyResult};
use crate::lexer::{Keyword, Lexer, Token, TokenKind};

/// The parser for teenyc source code
pub struct Parser<'src> {
    /// Token source, pulled on demand
    lexer: Lexer<'src>,
    /// Token under examination
    current: Token,
    /// One token of lookahead past `current`
    peek: Token,
    /// Variables bound so far
    symbols: SymbolTable,
    /// Declared and referenced labels
    labels: LabelTable,
    /// Output buffer
    emitter: Emitter,
}

impl<'src> Parser<'src> {
    /// Create a parser writing into a default emitter
    pub fn new(source: &'src str) -> TeenyResult<Self> {
        Self::with_emitter(source, Emitter::default())
    }

    /// Create a parser writing into the given emitter
    pub fn with_emitter(source: &'src str, emitter: Emitter) -> TeenyResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        let peek = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            peek,
            symbols: SymbolTable::new(),
            labels: LabelTable::new(),
            emitter,
        })
    }

    /// Translate the whole program and hand back the filled emitter
    pub fn program(mut self) -> TeenyResult<Emitter> {
        trace!("PROGRAM");
        self.emitter.header_line(0, "#include <stdio.h>");
        self.emitter.header_line(0, "int main(void) {");
        self.emitter.indent();

        while self.check(TokenKind::Newline) {
            self.advance()?;
        }

        while !self.check(TokenKind::Eof) {
            self.statement()?;
        }

        self.emitter.emit_line("return 0;");
        self.emitter.dedent();
        self.emitter.emit_line("}");

        self.labels.check_references()?;

        debug!("translation finished with {} variables", self.symbols.len());
        Ok(self.emitter)
    }

    // ==================== Helpers ====================

    /// Check if current token matches
    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Check if current token is a keyword
    fn check_keyword(&self, kw: Keyword) -> bool {
        self.check(TokenKind::Keyword(kw))
    }

    /// Check the token after the current one
    fn check_peek(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    /// Shift the lookahead window by one token and return the consumed one
    fn advance(&mut self) -> TeenyResult<Token> {
        let next = self.lexer.next_token()?;
        let peek = std::mem::replace(&mut self.peek, next);
        Ok(std::mem::replace(&mut self.current, peek))
    }

    /// Consume a token if it matches, otherwise error
    fn expect(&mut self, kind: TokenKind) -> TeenyResult<Token> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(TeenyError::parser(
                format!("expected {}, found {}", kind, self.current.kind),
                self.current.span,
            ))
        }
    }

    fn expect_keyword(&mut self, kw: Keyword) -> TeenyResult<Token> {
        self.expect(TokenKind::Keyword(kw))
    }

    // ==================== Statements ====================

    fn statement(&mut self) -> TeenyResult<()> {
        match self.current.kind {
            TokenKind::Keyword(kw) => match kw {
                Keyword::Print => self.print_statement()?,
                Keyword::If => self.if_statement()?,
                Keyword::While => self.while_statement()?,
                Keyword::Label => self.label_statement()?,
                Keyword::Goto => self.goto_statement()?,
                Keyword::Let => self.let_statement()?,
                Keyword::Input => self.input_statement()?,
                Keyword::Then | Keyword::Endif | Keyword::Repeat | Keyword::Endwhile => {
                    return Err(self.invalid_statement());
                }
            },
            TokenKind::Eof
            | TokenKind::Newline
            | TokenKind::Number
            | TokenKind::Ident
            | TokenKind::String
            | TokenKind::Eq
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::EqEq
            | TokenKind::BangEq
            | TokenKind::Lt
            | TokenKind::LtEq
            | TokenKind::Gt
            | TokenKind::GtEq => return Err(self.invalid_statement()),
        }

        self.nl()
    }

    fn invalid_statement(&self) -> TeenyError {
        let message = if self.check(TokenKind::Ident) && self.check_peek(TokenKind::Eq) {
            format!(
                "invalid statement at '{}': assignments must start with LET",
                self.current.text
            )
        } else if self.check(TokenKind::Eof) {
            "invalid statement at end of file".to_string()
        } else {
            format!(
                "invalid statement at {:?} ({})",
                self.current.text, self.current.kind
            )
        };
        TeenyError::parser(message, self.current.span)
    }

    /// Statements up to (and including) the given closing keyword
    fn block(&mut self, terminator: Keyword) -> TeenyResult<()> {
        self.emitter.indent();
        while !self.check_keyword(terminator) {
            if self.check(TokenKind::Eof) {
                return Err(TeenyError::parser(
                    format!("expected {}, found end of file", terminator),
                    self.current.span,
                ));
            }
            self.statement()?;
        }
        self.expect_keyword(terminator)?;
        self.emitter.dedent();
        self.emitter.emit_line("}");
        Ok(())
    }

    fn print_statement(&mut self) -> TeenyResult<()> {
        trace!("STATEMENT-PRINT");
        self.advance()?;

        if self.check(TokenKind::String) {
            let text = self.advance()?.text;
            self.emitter.emit_line(&format!("printf(\"{}\\n\");", text));
        } else {
            self.emitter.emit("printf(\"%.2f\\n\", (float)(");
            self.expression()?;
            self.emitter.emit_line("));");
        }
        Ok(())
    }

    fn if_statement(&mut self) -> TeenyResult<()> {
        trace!("STATEMENT-IF");
        self.advance()?;
        self.emitter.emit("if (");
        self.comparison()?;
        self.expect_keyword(Keyword::Then)?;
        self.emitter.emit_line(") {");
        self.nl()?;
        self.block(Keyword::Endif)
    }

    fn while_statement(&mut self) -> TeenyResult<()> {
        trace!("STATEMENT-WHILE");
        self.advance()?;
        self.emitter.emit("while (");
        self.comparison()?;
        self.expect_keyword(Keyword::Repeat)?;
        self.emitter.emit_line(") {");
        self.nl()?;
        self.block(Keyword::Endwhile)
    }

    fn label_statement(&mut self) -> TeenyResult<()> {
        trace!("STATEMENT-LABEL");
        self.advance()?;
        let name = self.expect(TokenKind::Ident)?;
        self.labels.declare(&name.text, name.span)?;
        self.emitter.emit_line(&format!("{}:;", name.text));
        Ok(())
    }

    fn goto_statement(&mut self) -> TeenyResult<()> {
        trace!("STATEMENT-GOTO");
        self.advance()?;
        let name = self.expect(TokenKind::Ident)?;
        self.labels.reference(&name.text, name.span);
        self.emitter.emit_line(&format!("goto {};", name.text));
        Ok(())
    }

    fn let_statement(&mut self) -> TeenyResult<()> {
        trace!("STATEMENT-LET");
        self.advance()?;
        let name = self.expect(TokenKind::Ident)?;
        self.expect(TokenKind::Eq)?;

        self.emitter.emit(&format!("{} = ", name.text));
        self.expression()?;
        self.emitter.emit_line(";");

        // Bound only after the right-hand side, so `LET a = a` needs a prior `a`.
        self.declare(&name.text);
        Ok(())
    }

    fn input_statement(&mut self) -> TeenyResult<()> {
        trace!("STATEMENT-INPUT");
        self.advance()?;
        let name = self.expect(TokenKind::Ident)?.text;
        self.declare(&name);

        self.emitter
            .emit_line(&format!("if (0 == scanf(\"%f\", &{})) {{", name));
        self.emitter.indent();
        self.emitter.emit_line(&format!("{} = 0;", name));
        self.emitter.emit_line("scanf(\"%*s\");");
        self.emitter.dedent();
        self.emitter.emit_line("}");
        Ok(())
    }

    /// Bind a variable, declaring it in the C prologue on first sight
    fn declare(&mut self, name: &str) {
        if self.symbols.declare(name) {
            self.emitter.header_line(1, &format!("float {};", name));
        }
    }

    fn nl(&mut self) -> TeenyResult<()> {
        trace!("NEWLINE");
        self.expect(TokenKind::Newline)?;
        while self.check(TokenKind::Newline) {
            self.advance()?;
        }
        Ok(())
    }

    // ==================== Expressions ====================

    fn comparison(&mut self) -> TeenyResult<()> {
        trace!("COMPARISON");
        self.expression()?;

        if !self.current.kind.is_comparison_op() {
            return Err(TeenyError::parser(
                format!("expected comparison operator, found {}", self.current.kind),
                self.current.span,
            ));
        }

        while self.current.kind.is_comparison_op() {
            let op = self.advance()?;
            self.emitter.emit(&format!(" {} ", op.text));
            self.expression()?;
        }
        Ok(())
    }

    fn expression(&mut self) -> TeenyResult<()> {
        trace!("EXPRESSION");
        self.term()?;
        while self.check(TokenKind::Plus) || self.check(TokenKind::Minus) {
            let op = self.advance()?;
            self.emitter.emit(&format!(" {} ", op.text));
            self.term()?;
        }
        Ok(())
    }

    fn term(&mut self) -> TeenyResult<()> {
        trace!("TERM");
        self.unary()?;
        while self.check(TokenKind::Star) || self.check(TokenKind::Slash) {
            let op = self.advance()?;
            self.emitter.emit(&format!(" {} ", op.text));
            self.unary()?;
        }
        Ok(())
    }

    fn unary(&mut self) -> TeenyResult<()> {
        trace!("UNARY");
        if self.check(TokenKind::Plus) || self.check(TokenKind::Minus) {
            let op = self.advance()?;
            self.emitter.emit(&op.text);
        }
        self.primary()
    }

    fn primary(&mut self) -> TeenyResult<()> {
        trace!("PRIMARY ({})", self.current.text);
        match self.current.kind {
            TokenKind::Number => {}
            TokenKind::Ident => {
                if !self.symbols.contains(&self.current.text) {
                    return Err(TeenyError::semantic(
                        format!(
                            "referencing variable before assignment: {}",
                            self.current.text
                        ),
                        self.current.span,
                    ));
                }
            }
            TokenKind::Eof
            | TokenKind::Newline
            | TokenKind::String
            | TokenKind::Keyword(_)
            | TokenKind::Eq
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::EqEq
            | TokenKind::BangEq
            | TokenKind::Lt
            | TokenKind::LtEq
            | TokenKind::Gt
            | TokenKind::GtEq => {
                return Err(TeenyError::parser(
                    format!("expected number or identifier, found {}", self.current.kind),
                    self.current.span,
                ));
            }
        }

        let token = self.advance()?;
        match token.kind {
            TokenKind::Number => self.emitter.emit(&c_number(&token.text)),
            _ => self.emitter.emit(&token.text),
        }
        Ok(())
    }
}

/// Spell a number literal so C reads it as decimal: a leading `0` would
/// make it octal.
fn c_number(text: &str) -> String {
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac)) => (int_part, Some(frac)),
        None => (text, None),
    };

    let digits = int_part.trim_start_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };
    match frac_part {
        Some(frac) => format!("{}.{}", digits, frac),
        None => digits.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SourceSpan;
    use assert_matches::assert_matches;

    fn translate(source: &str) -> TeenyResult<String> {
        Ok(Parser::new(source)?.program()?.finalize())
    }

    /// Statement lines of `main`, without the prologue and declarations
    fn body(source: &str) -> String {
        translate(source)
            .unwrap()
            .lines()
            .skip_while(|line| *line != "int main(void) {")
            .skip(1)
            .filter(|line| !line.trim_start().starts_with("float "))
            .map(|line| format!("{}\n", line))
            .collect()
    }

    #[test]
    fn test_empty_program() {
        assert_eq!(
            translate("").unwrap(),
            "#include <stdio.h>\nint main(void) {\n    return 0;\n}\n"
        );
        assert_eq!(translate("\n\n\n").unwrap(), translate("").unwrap());
    }

    #[test]
    fn test_print_string_and_number() {
        assert_eq!(
            body("PRINT \"hello\"\nPRINT 3.5\n"),
            "    printf(\"hello\\n\");\n    printf(\"%.2f\\n\", (float)(3.5));\n    return 0;\n}\n"
        );
    }

    #[test]
    fn test_numbers_are_never_octal() {
        let out = body("PRINT 010\nPRINT 007.50\nPRINT 0.5\nPRINT 000\nPRINT 09\n");
        assert!(out.contains("(float)(10));"));
        assert!(out.contains("(float)(7.50));"));
        assert!(out.contains("(float)(0.5));"));
        assert!(out.contains("(float)(0));"));
        assert!(out.contains("(float)(9));"));
    }

    #[test]
    fn test_expression_operators_keep_order() {
        let out = body("LET a = 2\nLET b = -a * 3 + 4 / +a - -1\n");
        assert!(out.contains("b = -a * 3 + 4 / +a - -1;"));
    }

    #[test]
    fn test_declarations_go_to_header_once() {
        let out = translate("LET a = 1\nLET a = a + 1\nINPUT b\nINPUT a\n").unwrap();
        assert_eq!(out.matches("float a;").count(), 1);
        assert_eq!(out.matches("float b;").count(), 1);
        let header_end = out.find("    a = 1;").unwrap();
        assert!(out.find("float b;").unwrap() < header_end);
    }

    #[test]
    fn test_input_reads_float() {
        let out = body("INPUT n\n");
        assert_eq!(
            out,
            "    if (0 == scanf(\"%f\", &n)) {\n        n = 0;\n        scanf(\"%*s\");\n    }\n    return 0;\n}\n"
        );
    }

    #[test]
    fn test_nested_blocks() {
        let source = "LET n = 0\nWHILE n < 3 REPEAT\nIF n == 1 THEN\nPRINT n\nENDIF\nLET n = n + 1\nENDWHILE\n";
        let out = body(source);
        assert_eq!(
            out,
            concat!(
                "    n = 0;\n",
                "    while (n < 3) {\n",
                "        if (n == 1) {\n",
                "            printf(\"%.2f\\n\", (float)(n));\n",
                "        }\n",
                "        n = n + 1;\n",
                "    }\n",
                "    return 0;\n",
                "}\n",
            )
        );
    }

    #[test]
    fn test_chained_comparison() {
        let out = body("IF 1 < 2 != 0 THEN\nENDIF\n");
        assert!(out.contains("if (1 < 2 != 0) {"));
    }

    #[test]
    fn test_comparison_requires_operator() {
        let err = translate("IF 1 THEN\nENDIF\n").unwrap_err();
        assert_matches!(err, TeenyError::Parser { .. });
        assert_eq!(err.message(), "expected comparison operator, found THEN");
    }

    #[test]
    fn test_undefined_variable() {
        let err = translate("PRINT x\n").unwrap_err();
        assert_matches!(err, TeenyError::Semantic { span, .. } if span == SourceSpan::new(6, 7));
        assert_eq!(err.message(), "referencing variable before assignment: x");
    }

    #[test]
    fn test_let_cannot_read_itself_first() {
        let err = translate("LET a = a + 1\n").unwrap_err();
        assert_matches!(err, TeenyError::Semantic { .. });
    }

    #[test]
    fn test_labels() {
        let out = body("LABEL top\nGOTO top\n");
        assert!(out.contains("    top:;\n    goto top;\n"));

        let err = translate("LABEL a\nLABEL b\nLABEL a\n").unwrap_err();
        assert_eq!(err.message(), "label already exists: a");
        assert_eq!(err.span(), Some(SourceSpan::new(22, 23)));

        let err = translate("GOTO nowhere\nPRINT \"x\"\n").unwrap_err();
        assert_eq!(err.message(), "attempting to GOTO undeclared label: nowhere");
    }

    #[test]
    fn test_statement_needs_newline() {
        let err = translate("PRINT 1").unwrap_err();
        assert_eq!(err.message(), "expected newline, found end of file");

        let err = translate("PRINT 1 2\n").unwrap_err();
        assert_eq!(err.message(), "expected newline, found number");
    }

    #[test]
    fn test_invalid_statements() {
        let err = translate("x = 1\n").unwrap_err();
        assert_eq!(
            err.message(),
            "invalid statement at 'x': assignments must start with LET"
        );

        let err = translate("ENDIF\n").unwrap_err();
        assert_eq!(err.message(), "invalid statement at \"ENDIF\" (ENDIF)");
    }

    #[test]
    fn test_unclosed_block() {
        let err = translate("WHILE 1 > 0 REPEAT\nPRINT 1\n").unwrap_err();
        assert_eq!(err.message(), "expected ENDWHILE, found end of file");
    }

    #[test]
    fn test_lexer_errors_propagate() {
        let err = translate("PRINT 1 ! 2\n").unwrap_err();
        assert_matches!(err, TeenyError::Lexer { .. });
    }
}
