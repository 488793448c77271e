use yaral_core::grammar::Grammar;
use yaral_core::grammar::dsl::*;

use crate::error::CompileError;
use crate::extract_tokens::{ExtractedGrammar, IrRule, VariableKind, extract_tokens, to_regex};
use crate::prepare::prepare;

fn extract(grammar: &Grammar) -> Result<ExtractedGrammar, CompileError> {
    extract_tokens(&prepare(grammar)?)
}

fn names(extracted: &ExtractedGrammar) -> Vec<(&str, VariableKind)> {
    extracted
        .lexical
        .iter()
        .map(|v| (v.name.as_str(), v.kind))
        .collect()
}

#[test]
fn named_tokens_come_first() {
    let grammar = GrammarBuilder::new("order")
        .rule("start", seq([string("rule"), sym("identifier"), string("{")]))
        .rule("identifier", pattern("[a-z]+"))
        .extras([pattern(r"\s")])
        .build();
    let extracted = extract(&grammar).unwrap();

    assert_eq!(
        names(&extracted),
        vec![
            ("identifier", VariableKind::Named),
            ("rule", VariableKind::Anonymous),
            ("{", VariableKind::Anonymous),
            ("extra_token1", VariableKind::Hidden),
        ]
    );
    assert!(extracted.lexical[3].extra);
    assert!(extracted.lexical[1].literal);
    assert!(!extracted.lexical[0].literal);
    assert_eq!(
        extracted.syntax[0].rule,
        IrRule::Seq(vec![
            IrRule::Terminal(1),
            IrRule::Terminal(0),
            IrRule::Terminal(2)
        ])
    );
}

#[test]
fn literals_share_named_rule() {
    let grammar = GrammarBuilder::new("shared")
        .rule("start", seq([string("true"), sym("boolean")]))
        .rule("boolean", string("true"))
        .build();
    let extracted = extract(&grammar).unwrap();

    assert_eq!(names(&extracted), vec![("boolean", VariableKind::Named)]);
    assert_eq!(
        extracted.syntax[0].rule,
        IrRule::Seq(vec![IrRule::Terminal(0), IrRule::Terminal(0)])
    );
}

#[test]
fn inline_patterns_are_deduplicated() {
    let grammar = GrammarBuilder::new("inline")
        .rule("start", seq([pattern("[a-z]+"), string("="), pattern("[a-z]+")]))
        .build();
    let extracted = extract(&grammar).unwrap();

    assert_eq!(
        names(&extracted),
        vec![
            ("start_token1", VariableKind::Hidden),
            ("=", VariableKind::Anonymous),
        ]
    );
}

#[test]
fn token_priority_and_immediacy() {
    let grammar = GrammarBuilder::new("tokens")
        .rule("start", seq([sym("not_in"), sym("suffix")]))
        .rule("not_in", token(prec(1, pattern(r"not\s+in"))))
        .rule("suffix", immediate_token(string("!")))
        .build();
    let extracted = extract(&grammar).unwrap();

    assert_eq!(extracted.lexical[0].priority, 1);
    assert!(!extracted.lexical[0].immediate);
    assert!(extracted.lexical[1].immediate);
    assert!(extracted.lexical[1].literal);
}

#[test]
fn regex_translation() {
    assert_eq!(to_regex(&string("a.b"), "t").unwrap(), r"a\.b");
    assert_eq!(to_regex(&pattern_nocase("abc"), "t").unwrap(), "(?i:abc)");
    assert_eq!(
        to_regex(&repeat1(choice([string("a"), pattern("b")])), "t").unwrap(),
        "(?:(?:a|(?:b)))+"
    );
}

#[test]
fn duplicate_token_kind() {
    let grammar = GrammarBuilder::new("dup")
        .rule("start", seq([sym("a"), sym("b")]))
        .rule("a", pattern("x+"))
        .rule("b", pattern("x+"))
        .build();
    assert_eq!(
        extract(&grammar).unwrap_err(),
        CompileError::DuplicateTokenKind {
            first: "a".into(),
            second: "b".into(),
        }
    );
}

#[test]
fn symbol_inside_token() {
    let grammar = GrammarBuilder::new("bad")
        .rule("start", token(seq([string("a"), sym("b")])))
        .rule("b", string("b"))
        .build();
    assert_eq!(
        extract(&grammar).unwrap_err(),
        CompileError::InvalidToken {
            rule: "start".into()
        }
    );
}

#[test]
fn empty_token() {
    let grammar = GrammarBuilder::new("empty")
        .rule("start", seq([pattern("a*"), string(";")]))
        .build();
    assert_eq!(
        extract(&grammar).unwrap_err(),
        CompileError::EmptyToken("start_token1".into())
    );
}

#[test]
fn invalid_regex() {
    let grammar = GrammarBuilder::new("invalid")
        .rule("start", seq([pattern("("), string(";")]))
        .build();
    assert!(matches!(
        extract(&grammar).unwrap_err(),
        CompileError::InvalidRegex { rule, .. } if rule == "start_token1"
    ));
}

#[test]
fn extras_must_be_lexical() {
    let grammar = GrammarBuilder::new("extras")
        .rule("start", string("a"))
        .rule("comment", seq([string("#"), string("x")]))
        .extras([sym("comment")])
        .build();
    assert_eq!(
        extract(&grammar).unwrap_err(),
        CompileError::NonTerminalExtra("comment".into())
    );
}

#[test]
fn word_must_be_lexical() {
    let grammar = GrammarBuilder::new("word")
        .rule("start", seq([string("a")]))
        .word("start")
        .build();
    assert_eq!(
        extract(&grammar).unwrap_err(),
        CompileError::InvalidWord("start".into())
    );
}
