use indoc::indoc;

use super::cst::SyntaxKind;
use super::lexer::{lex, token_text};

fn snapshot(source: &str) -> String {
    lex(source)
        .iter()
        .filter(|token| !matches!(token.kind, SyntaxKind::Whitespace | SyntaxKind::Newline))
        .map(|token| format!("{:?} {:?}", token.kind, token_text(source, token)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn punctuation_and_names() {
    insta::assert_snapshot!(snapshot("(rule name: (identifier) !window) @r"), @r#"
    ParenOpen "("
    Id "rule"
    Id "name"
    Colon ":"
    ParenOpen "("
    Id "identifier"
    ParenClose ")"
    Negation "!"
    Id "window"
    ParenClose ")"
    At "@"
    Id "r"
    "#);
}

#[test]
fn keywords_and_wildcards() {
    insta::assert_snapshot!(snapshot(r#"[(ERROR) (MISSING "}") (_) _] #hit"#), @r##"
    BracketOpen "["
    ParenOpen "("
    KwError "ERROR"
    ParenClose ")"
    ParenOpen "("
    KwMissing "MISSING"
    StringLiteral "\"}\""
    ParenClose ")"
    ParenOpen "("
    Underscore "_"
    ParenClose ")"
    Underscore "_"
    BracketClose "]"
    Hash "#"
    Id "hit"
    "##);
}

#[test]
fn keyword_prefix_is_an_identifier() {
    insta::assert_snapshot!(snapshot("ERRORS MISSING_x"), @r#"
    Id "ERRORS"
    Id "MISSING_x"
    "#);
}

#[test]
fn underscore_prefix_is_an_identifier() {
    insta::assert_snapshot!(snapshot("(_expression) (_) _ __"), @r#"
    ParenOpen "("
    Id "_expression"
    ParenClose ")"
    ParenOpen "("
    Underscore "_"
    ParenClose ")"
    Underscore "_"
    Id "__"
    "#);
}

#[test]
fn string_escapes() {
    insta::assert_snapshot!(snapshot(r#""a\"b" "\\""#), @r#"
    StringLiteral "\"a\\\"b\""
    StringLiteral "\"\\\\\""
    "#);
}

#[test]
fn comments_are_trivia() {
    let source = indoc! {r#"
        ; semicolon comment
        (meta) // trailing
    "#};
    insta::assert_snapshot!(snapshot(source), @r#"
    LineComment "; semicolon comment"
    ParenOpen "("
    Id "meta"
    ParenClose ")"
    LineComment "// trailing"
    "#);
    assert!(lex(source).iter().filter(|t| t.kind.is_trivia()).count() >= 4);
}

#[test]
fn garbage_is_coalesced() {
    insta::assert_snapshot!(snapshot("(a) $%^ (b)"), @r#"
    ParenOpen "("
    Id "a"
    ParenClose ")"
    Garbage "$%^"
    ParenOpen "("
    Id "b"
    ParenClose ")"
    "#);
}

#[test]
fn trailing_garbage() {
    insta::assert_snapshot!(snapshot("(a) {{"), @r#"
    ParenOpen "("
    Id "a"
    ParenClose ")"
    Garbage "{{"
    "#);
}

#[test]
fn spans_cover_source() {
    let source = "(rule\n  (meta) @m)";
    let tokens = lex(source);
    let mut offset = 0;
    for token in &tokens {
        assert_eq!(u32::from(token.span.start()) as usize, offset);
        offset = u32::from(token.span.end()) as usize;
    }
    assert_eq!(offset, source.len());
}
