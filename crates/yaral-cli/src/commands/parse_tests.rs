use yaral_core::Colors;
use yaral_runtime::{Parser, Tree};

use super::parse::format_tree;

fn parse(text: &str) -> Tree {
    Parser::new(yaral_lang::language().unwrap()).parse(text, None)
}

fn dump(text: &str, raw: bool, spans: bool) -> String {
    format_tree(&parse(text), text, raw, spans, Colors::OFF)
}

#[test]
fn named_nodes() {
    insta::assert_snapshot!(dump("rule r { condition: true }", false, false), @r#"
    (source_file
      (rule
        name: (identifier "r")
        (condition
          (boolean "true"))))
    "#);
}

#[test]
fn raw_includes_anonymous_nodes() {
    insta::assert_snapshot!(dump("rule r { condition: true }", true, false), @r#"
    (source_file
      (rule
        ("rule")
        name: (identifier "r")
        ("{")
        (condition
          ("condition")
          (":")
          (boolean
            ("true")))
        ("}")))
    "#);
}

#[test]
fn spans() {
    insta::assert_snapshot!(dump("rule r { condition: true }", false, true), @r#"
    (source_file [0:0-0:26]
      (rule [0:0-0:26]
        name: (identifier "r") [0:5-0:6]
        (condition [0:9-0:24]
          (boolean "true") [0:20-0:24])))
    "#);
}

#[test]
fn missing_nodes_always_show() {
    insta::assert_snapshot!(dump("rule r { meta:", false, false), @r#"
    (source_file
      (rule
        name: (identifier "r")
        (meta "meta:")
        (MISSING "}")))
    "#);
}

#[test]
fn error_nodes() {
    insta::assert_snapshot!(dump("rule a { condition: true true }", false, false), @r#"
    (source_file
      (rule
        name: (identifier "a")
        (condition
          (boolean "true"))
        (ERROR "true")))
    "#);
}

#[test]
fn text_is_escaped() {
    let text = "rule r { meta: author = \"a\\tb\" }";
    let out = dump(text, false, false);
    assert!(out.contains(r#"(string_literal "\"a\\tb\"")"#), "{out}");
}

#[test]
fn colors() {
    let text = "rule a { condition: true true }";
    let out = format_tree(&parse(text), text, false, false, Colors::ON);
    assert!(out.contains("\x1b[31mERROR\x1b[0m"));
    assert!(out.contains("\x1b[34mrule\x1b[0m"));
    assert!(out.contains("\x1b[2mname:\x1b[0m"));
}
