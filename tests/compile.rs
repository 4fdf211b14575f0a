use assert_matches::assert_matches;
use teenyc::{compile, compile_to_file, Config, Lexer, TeenyError, TokenKind};

fn config() -> Config {
    Config::from_env().with_indent_width(4)
}

fn translate(source: &str) -> Result<String, TeenyError> {
    compile(source, &config())
}

#[test]
fn let_then_print_declares_before_use() {
    let out = translate("LET a = 5\nPRINT a\n").unwrap();
    assert_eq!(
        out,
        concat!(
            "#include <stdio.h>\n",
            "int main(void) {\n",
            "    float a;\n",
            "    a = 5;\n",
            "    printf(\"%.2f\\n\", (float)(a));\n",
            "    return 0;\n",
            "}\n",
        )
    );
}

#[test]
fn undeclared_variable_fails_without_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.c");

    let err = compile_to_file("PRINT x\n", &config().with_output(&path)).unwrap_err();
    assert_matches!(err, TeenyError::Semantic { .. });
    assert!(err.message().contains('x'));
    assert!(!path.exists());
}

#[test]
fn failure_leaves_existing_file_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.c");
    std::fs::write(&path, "previous build").unwrap();

    let source = "PRINT \"start\"\nLET a = 1\nGOTO missing\n";
    assert!(compile_to_file(source, &config().with_output(&path)).is_err());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous build");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn forward_goto_is_allowed() {
    let out = translate("GOTO skip\nPRINT \"hi\"\nLABEL skip\n").unwrap();
    let jump = out.find("goto skip;").unwrap();
    let print = out.find("printf(\"hi\\n\");").unwrap();
    let label = out.find("skip:").unwrap();
    assert!(jump < print && print < label);
}

#[test]
fn missing_label_is_reported_after_full_scan() {
    // The undeclared variable comes after the bad GOTO but is reported first,
    // proving labels are only validated once everything has been read.
    let err = translate("GOTO nowhere\nPRINT y\n").unwrap_err();
    assert_matches!(err, TeenyError::Semantic { .. });
    assert_eq!(err.message(), "referencing variable before assignment: y");

    let err = translate("GOTO nowhere\nGOTO elsewhere\nLABEL here\n").unwrap_err();
    assert_eq!(
        err.message(),
        "attempting to GOTO undeclared label: elsewhere, nowhere"
    );
}

#[test]
fn duplicate_label_fails_at_second_declaration() {
    let source = "LABEL loop\nGOTO loop\nLABEL loop\n";
    let err = translate(source).unwrap_err();
    assert_matches!(err, TeenyError::Semantic { .. });
    let span = err.span().unwrap();
    assert_eq!(&source[span.start..span.end], "loop");
    assert_eq!(span.start, source.rfind("loop").unwrap());
}

#[test]
fn if_wraps_print_in_conditional() {
    let out = translate("IF 1 > 2 THEN\nPRINT \"no\"\nENDIF\n").unwrap();
    assert!(out.contains("    if (1 > 2) {\n        printf(\"no\\n\");\n    }\n"));
}

#[test]
fn successful_compile_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fib.c");
    let source = "\
# Fibonacci numbers below a limit
PRINT \"How many fibonacci numbers do you want?\"
INPUT nums
PRINT \"\"

LET a = 0
LET b = 1
WHILE nums > 0 REPEAT
    PRINT a
    LET c = a + b
    LET a = b
    LET b = c
    LET nums = nums - 1
ENDWHILE
";

    let written = compile_to_file(source, &config().with_output(&path)).unwrap();
    assert_eq!(written, path);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("#include <stdio.h>\nint main(void) {\n"));
    for decl in ["float nums;", "float a;", "float b;", "float c;"] {
        assert_eq!(text.matches(decl).count(), 1, "{decl}");
    }
    assert!(text.contains("    while (nums > 0) {\n"));
    assert!(text.contains("        nums = nums - 1;\n"));
    assert!(text.ends_with("    return 0;\n}\n"));
}

#[test]
fn tokenizing_number_and_string_literals() {
    let tokens = Lexer::new("123.45").tokenize().unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].kind, TokenKind::Number);
    assert_eq!(tokens[0].text, "123.45");

    assert_matches!(Lexer::new("12..3").tokenize(), Err(TeenyError::Lexer { .. }));
    assert_matches!(Lexer::new("\"a\nb\"").tokenize(), Err(TeenyError::Lexer { .. }));

    let tokens = Lexer::new("\"abc\"").tokenize().unwrap();
    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].text, "abc");
}

#[test]
fn indent_width_is_configurable() {
    let out = compile("PRINT 1\n", &Config::from_env().with_indent_width(2)).unwrap();
    assert!(out.contains("\n  printf("));
}
