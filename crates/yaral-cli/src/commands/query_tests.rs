use indoc::indoc;
use yaral_core::Colors;
use yaral_query::Query;
use yaral_runtime::Parser;

use super::query::format_matches;

fn run(pattern: &str, text: &str) -> String {
    let language = yaral_lang::language().unwrap();
    let query = Query::new(&language, pattern).unwrap();
    let tree = Parser::new(language).parse(text, None);
    format_matches(&query, &tree, text, Colors::OFF)
}

#[test]
fn single_capture() {
    insta::assert_snapshot!(
        run("(rule (meta) (condition) @c)", r#"rule r { meta: author = "a" condition: true }"#),
        @r#"
    pattern 0
      @c condition 0:28-0:43 "condition: true"
    "#
    );
}

#[test]
fn several_patterns_and_captures() {
    let pattern = indoc! {"
        (rule name: (identifier) @name)
        (declaration key: (identifier) @key value: (_) @value)
    "};
    let text = r#"rule a { meta: author = "x" } rule b { condition: true }"#;
    insta::assert_snapshot!(run(pattern, text), @r#"
    pattern 0
      @name identifier 0:5-0:6 "a"
    pattern 1
      @key identifier 0:15-0:21 "author"
      @value string_literal 0:24-0:27 "\"x\""
    pattern 0
      @name identifier 0:35-0:36 "b"
    "#);
}

#[test]
fn no_matches_print_nothing() {
    assert_eq!(run("(events)", "rule r { condition: true }"), "");
}
