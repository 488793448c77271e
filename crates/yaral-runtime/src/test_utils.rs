//! Small grammars compiled on the fly.

use yaral_compiler::compile;
use yaral_core::grammar::Grammar;
use yaral_core::grammar::dsl::*;

use crate::{Language, Parser, Tree};

/// Blocks of `key = value;` settings:
///
/// ```text
/// rule name { key = 1; other = "text"; }  # comment
/// ```
pub fn settings_grammar() -> Grammar {
    GrammarBuilder::new("settings")
        .rule("source_file", repeat(sym("rule")))
        .rule(
            "rule",
            seq([
                string("rule"),
                field("name", sym("identifier")),
                string("{"),
                repeat(sym("statement")),
                string("}"),
            ]),
        )
        .rule(
            "statement",
            seq([
                field("key", sym("identifier")),
                string("="),
                field("value", sym("_value")),
                string(";"),
            ]),
        )
        .rule(
            "_value",
            choice([sym("identifier"), sym("number"), sym("string")]),
        )
        .rule("identifier", pattern("[a-z_]+"))
        .rule("number", pattern(r"\d+"))
        .rule("string", pattern(r#""[^"]*""#))
        .rule("comment", pattern("#[^\n]*"))
        .extras([pattern(r"\s"), sym("comment")])
        .word("identifier")
        .build()
}

pub fn calc_grammar() -> Grammar {
    let binary = |op: &str, level: i32| {
        prec_left(
            level,
            seq([
                field("left", sym("expr")),
                field("operator", string(op)),
                field("right", sym("expr")),
            ]),
        )
    };
    GrammarBuilder::new("calc")
        .rule(
            "expr",
            choice([
                binary("+", 1),
                binary("*", 2),
                seq([string("("), sym("expr"), string(")")]),
                sym("number"),
            ]),
        )
        .rule("number", pattern(r"\d+"))
        .extras([pattern(r"\s")])
        .build()
}

pub fn language(grammar: &Grammar) -> Language {
    let artifact = compile(grammar).unwrap();
    Language::load(&artifact).unwrap()
}

pub fn settings() -> Language {
    language(&settings_grammar())
}

pub fn calc() -> Language {
    language(&calc_grammar())
}

pub fn parse(language: &Language, text: &str) -> Tree {
    Parser::new(language.clone()).parse(text, None)
}
