use indoc::indoc;
use yaral_runtime::Language;

use super::{Query, QueryError};
use crate::diagnostics::DiagnosticKind;

fn language() -> Language {
    yaral_lang::language().unwrap()
}

fn compile_error(source: &str) -> QueryError {
    Query::new(&language(), source).unwrap_err()
}

#[test]
fn compiles_patterns_and_capture_names() {
    let source = indoc! {r#"
        ; rules and their names
        (rule name: (identifier) @name) @rule
        (declaration key: (identifier) #key value: [(string_literal) (integer)] @value)
        "not"
    "#};
    let query = Query::new(&language(), source).unwrap();
    assert_eq!(query.pattern_count(), 3);
    assert_eq!(
        query.capture_names().collect::<Vec<_>>(),
        ["name", "rule", "key", "value"]
    );
    assert_eq!(query.language().name(), "yaral");
}

#[test]
fn empty_source_has_no_patterns() {
    let query = Query::new(&language(), "// nothing yet\n").unwrap();
    assert_eq!(query.pattern_count(), 0);
    assert_eq!(query.capture_names().count(), 0);
}

#[test]
fn unknown_kind() {
    let source = "(rule (sektion))";
    let err = compile_error(source);
    let QueryError::UnknownKind { name, range, .. } = &err else {
        panic!("expected UnknownKind, got {err:?}");
    };
    assert_eq!(name, "sektion");
    assert_eq!(u32::from(range.start())..u32::from(range.end()), 7..14);
    assert_eq!(err.to_string(), "unknown node kind `sektion`");

    insta::assert_snapshot!(err.diagnostics().render(source), @r"
    error: `sektion` is not a node kind of this language
      |
    1 | (rule (sektion))
      |        ^^^^^^^ `sektion` is not a node kind of this language
    ");
}

#[test]
fn hidden_rules_are_not_node_kinds() {
    let err = compile_error("(_expression)");
    assert!(matches!(err, QueryError::UnknownKind { name, .. } if name == "_expression"));
}

#[test]
fn unknown_anonymous_kind() {
    let err = compile_error(r#"(condition "nand")"#);
    assert!(matches!(err, QueryError::UnknownKind { name, .. } if name == "\"nand\""));
}

#[test]
fn unknown_missing_kind() {
    let err = compile_error("(MISSING brace)");
    assert!(matches!(err, QueryError::UnknownKind { name, .. } if name == "brace"));
}

#[test]
fn unknown_field() {
    let source = "(rule title: (identifier))";
    let err = compile_error(source);
    assert!(matches!(&err, QueryError::UnknownField { name, .. } if name == "title"));
    assert_eq!(err.to_string(), "unknown field `title`");

    insta::assert_snapshot!(err.diagnostics().render(source), @r"
    error: `title` is not a field of this language
      |
    1 | (rule title: (identifier))
      |       ^^^^^ `title` is not a field of this language
    ");
}

#[test]
fn unknown_negated_field() {
    let err = compile_error("(match !period)");
    assert!(matches!(err, QueryError::UnknownField { name, .. } if name == "period"));
}

#[test]
fn first_unknown_name_is_reported_and_all_are_collected() {
    let err = compile_error("(rulez) (rule titel: (identifier))");
    assert!(matches!(&err, QueryError::UnknownKind { name, .. } if name == "rulez"));
    let kinds: Vec<_> = err.diagnostics().iter().map(|d| d.kind()).collect();
    assert_eq!(
        kinds,
        [DiagnosticKind::UnknownKind, DiagnosticKind::UnknownField]
    );
}

#[test]
fn syntax_error_is_malformed() {
    let source = "(rule (meta)";
    let err = compile_error(source);
    let QueryError::MalformedPattern { message, .. } = &err else {
        panic!("expected MalformedPattern, got {err:?}");
    };
    assert_eq!(message, "missing closing `)`; expected `)`");
    assert_eq!(
        err.to_string(),
        "malformed pattern: missing closing `)`; expected `)`"
    );
}

#[test]
fn syntax_errors_win_over_unknown_names() {
    let err = compile_error("(sektion) @");
    assert!(matches!(err, QueryError::MalformedPattern { .. }));
}

#[test]
fn duplicate_capture_is_malformed() {
    let source = "(rule (meta) @x (condition) @x)";
    let err = compile_error(source);
    assert!(matches!(&err, QueryError::MalformedPattern { .. }));

    insta::assert_snapshot!(err.diagnostics().render(source), @r"
    error: capture `@x` is already bound in this pattern
      |
    1 | (rule (meta) @x (condition) @x)
      |                              ^ capture `@x` is already bound in this pattern
    ");
}

#[test]
fn duplicate_capture_across_spellings() {
    let err = compile_error("(rule (meta) @x (condition) #x)");
    assert!(matches!(err, QueryError::MalformedPattern { .. }));
}

#[test]
fn duplicate_capture_after_alternation() {
    let err = compile_error("(condition [(boolean) @v (null)] (integer) @v)");
    assert!(matches!(err, QueryError::MalformedPattern { .. }));
}

#[test]
fn same_capture_in_each_branch_is_allowed() {
    let query = Query::new(
        &language(),
        "(condition [(boolean) @v (integer) @v (null) @v])",
    )
    .unwrap();
    assert_eq!(query.capture_names().collect::<Vec<_>>(), ["v"]);
}

#[test]
fn same_capture_in_separate_patterns_is_allowed() {
    let query = Query::new(&language(), "(meta) @section (events) @section").unwrap();
    assert_eq!(query.pattern_count(), 2);
    assert_eq!(query.capture_names().collect::<Vec<_>>(), ["section"]);
}

#[test]
fn negated_field_at_top_level_is_malformed() {
    let err = compile_error("!window");
    assert!(matches!(err, QueryError::MalformedPattern { .. }));
    assert_eq!(
        err.diagnostics().iter().next().map(|d| d.kind()),
        Some(DiagnosticKind::NegatedFieldOutsideTree)
    );
}
