use yaral_core::Point;
use yaral_runtime::{Parser, SyntaxError, SyntaxErrorKind};

use super::check::{message, render_errors};

fn render(text: &str, path: Option<&str>) -> String {
    let tree = Parser::new(yaral_lang::language().unwrap()).parse(text, None);
    render_errors(&tree.errors(), text, path, false)
}

#[test]
fn unexpected_input() {
    insta::assert_snapshot!(render("rule a { condition: true true }", Some("rules.yaral")).trim_end(), @r"
    error: unexpected input
     --> rules.yaral:1:26
      |
    1 | rule a { condition: true true }
      |                          ^^^^ unexpected input
    ");
}

#[test]
fn missing_token_gets_a_visible_caret() {
    insta::assert_snapshot!(render("rule r { condition: ($a and $b }", None).trim_end(), @r"
    error: missing `)`
      |
    1 | rule r { condition: ($a and $b }
      |                               ^ missing `)`
    ");
}

#[test]
fn missing_token_at_end_of_input() {
    let out = render("rule r { meta:", None);
    assert!(out.starts_with("error: missing `}`"), "{out}");
    assert!(out.contains("rule r { meta:"));
}

#[test]
fn errors_are_separated_by_blank_lines() {
    let out = render(
        "rule a { condition: true true } rule b { condition: ($x }",
        None,
    );
    assert_eq!(out.matches("error:").count(), 2, "{out}");
    assert!(out.contains("\n\nerror:"));
}

#[test]
fn clean_source_renders_nothing() {
    assert_eq!(render("rule r { condition: true }", None), "");
}

#[test]
fn messages() {
    let error = |kind| SyntaxError {
        kind,
        byte_range: 0..0,
        start_point: Point::ZERO,
        end_point: Point::ZERO,
    };
    assert_eq!(
        message(&error(SyntaxErrorKind::Unexpected)),
        "unexpected input"
    );
    assert_eq!(
        message(&error(SyntaxErrorKind::Missing {
            kind: "identifier".to_string(),
            named: true,
        })),
        "missing identifier"
    );
    assert_eq!(
        message(&error(SyntaxErrorKind::Missing {
            kind: "}".to_string(),
            named: false,
        })),
        "missing `}`"
    );
}
