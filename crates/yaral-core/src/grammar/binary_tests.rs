use super::dsl::*;
use super::*;

#[test]
fn binary_form_preserves_grammar() {
    let grammar = GrammarBuilder::new("test")
        .rule("program", repeat(sym("statement")))
        .rule(
            "statement",
            prec_left(1, seq([field("value", sym("number")), ";".into()])),
        )
        .rule("number", pattern(r"\d+"))
        .extras([pattern(r"\s+")])
        .word("number")
        .build();

    let binary = grammar.to_binary().unwrap();
    let decoded = Grammar::from_binary(&binary).unwrap();

    assert_eq!(decoded, grammar);
    assert_eq!(decoded.rules[0].0, "program");
}

#[test]
fn truncated_binary_is_an_error() {
    let grammar = GrammarBuilder::new("test")
        .rule("program", string("x"))
        .build();
    let binary = grammar.to_binary().unwrap();

    let err = Grammar::from_binary(&binary[..binary.len() / 2]).unwrap_err();
    assert!(matches!(err, GrammarError::Binary(_)));
}
