//! Grammar of the Yaral rule language.
//!
//! ```text
//! rule failed_logins {
//!   meta:
//!     author = "secops"
//!   events:
//!     $e.metadata.event_type = "USER_LOGIN"
//!     $user = $e.target.user.userid
//!   match:
//!     $user over 10m before $e
//!   condition:
//!     #e > 3
//! }
//! ```
//!
//! Entries and sections are not separated by punctuation. Statements in
//! `events` follow each other directly, so a `not` after a complete
//! expression always continues it as `not in`.

use yaral_core::grammar::{Grammar, Rule};
use yaral_core::grammar::dsl::*;

const PREC_OR: i32 = 1;
const PREC_AND: i32 = 2;
const PREC_COMPARE: i32 = 3;
const PREC_ADD: i32 = 4;
const PREC_MULTIPLY: i32 = 5;
const PREC_UNARY: i32 = 6;

/// The Yaral grammar, start rule `source_file`.
pub fn grammar() -> Grammar {
    GrammarBuilder::new("yaral")
        .rule("source_file", repeat(sym("rule")))
        .rule(
            "rule",
            seq([
                string("rule"),
                field("name", sym("identifier")),
                string("{"),
                repeat(sym("_section")),
                string("}"),
            ]),
        )
        .rule(
            "_section",
            choice([
                sym("meta"),
                sym("events"),
                sym("match"),
                sym("outcome"),
                sym("condition"),
                sym("options"),
            ]),
        )
        .rule("meta", section("meta", repeat(sym("declaration"))))
        .rule("events", section("events", repeat(sym("_expression"))))
        .rule(
            "match",
            section(
                "match",
                optional(seq([
                    sep1(sym("variable"), ","),
                    optional(field("window", sym("window"))),
                ])),
            ),
        )
        .rule("outcome", section("outcome", repeat(sym("assignment"))))
        .rule("condition", section("condition", optional(sym("_expression"))))
        .rule("options", section("options", repeat(sym("declaration"))))
        .rule(
            "declaration",
            seq([
                field("key", sym("identifier")),
                string("="),
                field(
                    "value",
                    choice([sym("string_literal"), sym("integer"), sym("boolean")]),
                ),
            ]),
        )
        .rule(
            "window",
            seq([
                optional(field("negated", string("not"))),
                string("over"),
                field("duration", sym("duration")),
                optional(seq([
                    field("relation", choice([string("before"), string("after")])),
                    field("anchor", sym("variable")),
                ])),
            ]),
        )
        .rule(
            "assignment",
            seq([
                field("variable", sym("variable")),
                string("="),
                field("value", sym("_expression")),
            ]),
        )
        .rule(
            "_expression",
            choice([
                sym("unary_expression"),
                sym("binary_expression"),
                sym("in_expression"),
                sym("call_expression"),
                sym("index_expression"),
                sym("parenthesized_expression"),
                sym("field_access"),
                sym("variable"),
                sym("string_literal"),
                sym("regex_literal"),
                sym("integer"),
                sym("float"),
                sym("boolean"),
                sym("null"),
            ]),
        )
        .rule(
            "unary_expression",
            prec(
                PREC_UNARY,
                seq([
                    field("operator", choice(["all", "any", "not"].map(string))),
                    field("operand", sym("_expression")),
                ]),
            ),
        )
        .rule(
            "binary_expression",
            choice([
                binary(PREC_OR, string("or")),
                binary(PREC_AND, string("and")),
                binary(
                    PREC_COMPARE,
                    choice(["=", "!=", "<", "<=", ">", ">="].map(string)),
                ),
                binary(PREC_ADD, choice(["+", "-"].map(string))),
                binary(PREC_MULTIPLY, choice(["*", "/"].map(string))),
            ]),
        )
        .rule(
            "in_expression",
            prec_left(
                PREC_COMPARE,
                seq([
                    field("left", sym("_expression")),
                    optional(field("negated", string("not"))),
                    string("in"),
                    optional(field(
                        "modifier",
                        choice([string("regex"), string("cidr")]),
                    )),
                    field("list", sym("reference_list")),
                ]),
            ),
        )
        .rule(
            "call_expression",
            seq([
                field("function", sym("function_name")),
                field("arguments", sym("arguments")),
            ]),
        )
        .rule(
            "function_name",
            seq([sym("identifier"), optional(sym("attribute_path"))]),
        )
        .rule(
            "arguments",
            seq([
                string("("),
                sep(sym("_expression"), ","),
                string(")"),
            ]),
        )
        .rule(
            "index_expression",
            seq([
                field(
                    "operand",
                    choice([sym("variable"), sym("field_access")]),
                ),
                string("["),
                field("index", choice([sym("string_literal"), sym("integer")])),
                string("]"),
            ]),
        )
        .rule(
            "parenthesized_expression",
            seq([string("("), sym("_expression"), string(")")]),
        )
        .rule(
            "field_access",
            seq([
                field("variable", sym("variable")),
                field("path", sym("attribute_path")),
            ]),
        )
        .rule(
            "regex_literal",
            seq([
                field("pattern", sym("regex_pattern")),
                optional(field("modifier", string("nocase"))),
            ]),
        )
        .rule("boolean", choice([string("true"), string("false")]))
        .rule("null", string("null"))
        .rule("identifier", pattern("[A-Za-z_][A-Za-z0-9_]*"))
        .rule("variable", pattern("[$#][A-Za-z_][A-Za-z0-9_]*"))
        .rule(
            "attribute_path",
            pattern(r"\.[A-Za-z_][A-Za-z0-9_]*(\.[A-Za-z_][A-Za-z0-9_]*)*"),
        )
        .rule("reference_list", pattern("%[A-Za-z_][A-Za-z0-9_]*"))
        .rule(
            "string_literal",
            token(choice([
                pattern(r#""([^"\\\n]|\\.)*""#),
                pattern("`[^`]*`"),
            ])),
        )
        // A leading blank, `/` or `*` reads as division, a line comment or
        // a block comment instead.
        .rule(
            "regex_pattern",
            pattern(r"/([^\s/*\\]|\\.)([^/\\\n]|\\.)*/"),
        )
        .rule("duration", pattern(r"\d+[smhd]"))
        .rule("float", pattern(r"\d+\.\d+"))
        .rule("integer", pattern(r"\d+"))
        .rule(
            "comment",
            token(choice([
                pattern("//[^\n]*"),
                pattern(r"/\*[^*]*\*+([^/*][^*]*\*+)*/"),
            ])),
        )
        .extras([pattern(r"\s"), sym("comment")])
        .word("identifier")
        .conflict(["events", "in_expression"])
        .build()
}

fn section(keyword: &str, body: Rule) -> Rule {
    seq([string(keyword), string(":"), body])
}

fn binary(level: i32, operator: Rule) -> Rule {
    prec_left(
        level,
        seq([
            field("left", sym("_expression")),
            field("operator", operator),
            field("right", sym("_expression")),
        ]),
    )
}
