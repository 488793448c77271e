use indoc::indoc;
use rowan::NodeOrToken;

use super::ast::{Pattern, TreeHead, unquote};
use super::cst::{SyntaxKind, SyntaxNode};
use super::parse;

/// Indented CST without whitespace tokens.
fn dump(node: &SyntaxNode) -> String {
    fn go(node: &SyntaxNode, depth: usize, out: &mut Vec<String>) {
        out.push(format!("{}{:?}", "  ".repeat(depth), node.kind()));
        for child in node.children_with_tokens() {
            match child {
                NodeOrToken::Node(node) => go(&node, depth + 1, out),
                NodeOrToken::Token(token) => {
                    if matches!(token.kind(), SyntaxKind::Whitespace | SyntaxKind::Newline) {
                        continue;
                    }
                    out.push(format!(
                        "{}{:?} {:?}",
                        "  ".repeat(depth + 1),
                        token.kind(),
                        token.text()
                    ));
                }
            }
        }
    }
    let mut out = Vec::new();
    go(node, 0, &mut out);
    out.join("\n")
}

fn cst(source: &str) -> String {
    let result = parse(source);
    assert!(
        result.diagnostics.is_empty(),
        "unexpected diagnostics:\n{}",
        result.diagnostics.render(source)
    );
    dump(result.root.as_cst())
}

fn errors(source: &str) -> String {
    let result = parse(source);
    assert!(result.diagnostics.has_errors(), "expected diagnostics");
    result.diagnostics.render(source)
}

#[test]
fn tree_with_children_and_capture() {
    insta::assert_snapshot!(cst("(rule (meta) (condition) @c)"), @r#"
    Root
      Tree
        ParenOpen "("
        Id "rule"
        Tree
          ParenOpen "("
          Id "meta"
          ParenClose ")"
        Capture
          Tree
            ParenOpen "("
            Id "condition"
            ParenClose ")"
          At "@"
          Id "c"
        ParenClose ")"
    "#);
}

#[test]
fn fields_negation_and_hash_capture() {
    insta::assert_snapshot!(cst("(match !window) (rule name: (identifier) #n)"), @r##"
    Root
      Tree
        ParenOpen "("
        Id "match"
        NegatedField
          Negation "!"
          Id "window"
        ParenClose ")"
      Tree
        ParenOpen "("
        Id "rule"
        Capture
          Field
            Id "name"
            Colon ":"
            Tree
              ParenOpen "("
              Id "identifier"
              ParenClose ")"
          Hash "#"
          Id "n"
        ParenClose ")"
    "##);
}

#[test]
fn alternation_wildcards_and_strings() {
    insta::assert_snapshot!(cst(r#"[(boolean) (null) "not" _ (_)] @v"#), @r#"
    Root
      Capture
        Alt
          BracketOpen "["
          Tree
            ParenOpen "("
            Id "boolean"
            ParenClose ")"
          Tree
            ParenOpen "("
            Id "null"
            ParenClose ")"
          Str
            StringLiteral "\"not\""
          Wildcard
            Underscore "_"
          Tree
            ParenOpen "("
            Underscore "_"
            ParenClose ")"
          BracketClose "]"
        At "@"
        Id "v"
    "#);
}

#[test]
fn special_nodes() {
    insta::assert_snapshot!(cst(r#"(ERROR) (MISSING) (MISSING "}") (MISSING identifier)"#), @r#"
    Root
      Tree
        ParenOpen "("
        KwError "ERROR"
        ParenClose ")"
      Tree
        ParenOpen "("
        KwMissing "MISSING"
        ParenClose ")"
      Tree
        ParenOpen "("
        KwMissing "MISSING"
        StringLiteral "\"}\""
        ParenClose ")"
      Tree
        ParenOpen "("
        KwMissing "MISSING"
        Id "identifier"
        ParenClose ")"
    "#);
}

#[test]
fn comments_stay_in_the_tree() {
    let source = indoc! {"
        ; all conditions
        (condition) @c // trailing
    "};
    insta::assert_snapshot!(cst(source), @r#"
    Root
      LineComment "; all conditions"
      Capture
        Tree
          ParenOpen "("
          Id "condition"
          ParenClose ")"
        At "@"
        Id "c"
      LineComment "// trailing"
    "#);
}

#[test]
fn cst_is_lossless() {
    let source = "( rule\n\t name : (identifier) @n ) ; done\n[oops";
    let result = parse(source);
    assert_eq!(result.root.as_cst().text().to_string(), source);
}

#[test]
fn ast_accessors() {
    let result = parse(r#"(rule name: (identifier) @n !window) [(ERROR) (MISSING "}")] "a\"b""#);
    let patterns: Vec<Pattern> = result.root.patterns().collect();
    assert_eq!(patterns.len(), 3);

    let Pattern::Tree(rule) = &patterns[0] else {
        panic!("expected tree");
    };
    let Some(TreeHead::Kind(kind)) = rule.head() else {
        panic!("expected kind head");
    };
    assert_eq!(kind.text(), "rule");
    let children: Vec<Pattern> = rule.children().collect();
    assert_eq!(children.len(), 2);
    let Pattern::Capture(capture) = &children[0] else {
        panic!("expected capture");
    };
    assert_eq!(capture.name().unwrap().text(), "n");
    let Some(Pattern::Field(field)) = capture.inner() else {
        panic!("expected field");
    };
    assert_eq!(field.name().unwrap().text(), "name");
    assert!(matches!(field.value(), Some(Pattern::Tree(_))));
    let Pattern::NegatedField(negated) = &children[1] else {
        panic!("expected negated field");
    };
    assert_eq!(negated.name().unwrap().text(), "window");

    let Pattern::Alt(alt) = &patterns[1] else {
        panic!("expected alternation");
    };
    let heads: Vec<Option<TreeHead>> = alt
        .branches()
        .map(|branch| match branch {
            Pattern::Tree(tree) => tree.head(),
            _ => None,
        })
        .collect();
    assert_eq!(heads[0], Some(TreeHead::Error));
    assert!(matches!(&heads[1], Some(TreeHead::Missing(Some(t))) if t.text() == "\"}\""));

    let Pattern::Str(string) = &patterns[2] else {
        panic!("expected string");
    };
    assert_eq!(string.value().as_deref(), Some("a\"b"));
}

#[test]
fn unquote_escapes() {
    assert_eq!(unquote(r#""plain""#), "plain");
    assert_eq!(unquote(r#""a\nb""#), "a\nb");
    assert_eq!(unquote(r#""\\""#), "\\");
    assert_eq!(unquote(r#""\q""#), "q");
}

#[test]
fn unclosed_tree() {
    let result = parse("(rule (meta)");
    let filtered = result.diagnostics.filtered();
    assert_eq!(filtered.len(), 1);
    assert_eq!(
        filtered[0].to_string(),
        "error at 0..12: missing closing `)`; expected `)`"
    );
}

#[test]
fn unclosed_alternation() {
    let result = parse("[(a) (b)");
    let kinds: Vec<_> = result.diagnostics.iter().map(|d| d.kind()).collect();
    assert_eq!(kinds, [crate::diagnostics::DiagnosticKind::UnclosedAlternation]);
}

#[test]
fn empty_tree() {
    insta::assert_snapshot!(errors("()"), @r"
    error: empty `()` is not allowed
      |
    1 | ()
      |  ^ empty `()` is not allowed
    ");
}

#[test]
fn bare_identifier() {
    insta::assert_snapshot!(errors("(rule meta)"), @r"
    error: bare identifier is not a pattern
      |
    1 | (rule meta)
      |       ^^^^ bare identifier is not a pattern
    ");
}

#[test]
fn capture_without_target() {
    insta::assert_snapshot!(errors("@c (rule)"), @r"
    error: capture has no target
      |
    1 | @c (rule)
      | ^ capture has no target
    ");
}

#[test]
fn missing_capture_name() {
    insta::assert_snapshot!(errors("(rule) @ (meta)"), @r"
    error: expected capture name
      |
    1 | (rule) @ (meta)
      |          ^ expected capture name
    ");
}

#[test]
fn error_with_children() {
    insta::assert_snapshot!(errors("(ERROR (a))"), @r"
    error: `(ERROR)` cannot have children
      |
    1 | (ERROR (a))
      |        ^ `(ERROR)` cannot have children
    ");
}

#[test]
fn keyword_outside_parens() {
    insta::assert_snapshot!(errors("MISSING"), @r"
    error: special node requires parentheses
      |
    1 | MISSING
      | ^^^^^^^ special node requires parentheses
    ");
}

#[test]
fn field_without_value() {
    insta::assert_snapshot!(errors("(rule name: )"), @r"
    error: expected a pattern: after `field:`
      |
    1 | (rule name: )
      |             ^ expected a pattern: after `field:`
    ");
}

#[test]
fn negated_field_without_name() {
    insta::assert_snapshot!(errors("(match !)"), @r"
    error: expected field name
      |
    1 | (match !)
      |         ^ expected field name
    ");
}

#[test]
fn unmatched_closer_and_garbage() {
    let result = parse("(a)) $ (b)");
    let messages: Vec<String> = result.diagnostics.iter().map(|d| d.to_string()).collect();
    assert_eq!(
        messages,
        [
            "error at 3..4: unexpected token: unmatched `)`",
            "error at 5..6: unexpected token: try `(node)`, `[a b]`, `\"literal\"` or `_`",
        ]
    );
    assert_eq!(result.root.patterns().count(), 2);
}

#[test]
fn deep_nesting_is_cut_off() {
    let source = "(a ".repeat(300);
    let result = parse(&source);
    assert!(
        result
            .diagnostics
            .iter()
            .any(|d| d.kind() == crate::diagnostics::DiagnosticKind::NestingTooDeep)
    );
    assert_eq!(result.root.as_cst().text().to_string(), source);
}
