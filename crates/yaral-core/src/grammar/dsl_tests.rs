use super::dsl::*;
use super::*;

#[test]
fn optional_is_choice_with_blank() {
    assert_eq!(
        optional(sym("window")),
        Rule::Choice(vec![Rule::Symbol("window".into()), Rule::Blank])
    );
}

#[test]
fn str_converts_to_string_rule() {
    let rule: Rule = "condition".into();
    assert_eq!(rule, Rule::String("condition".into()));
}

#[test]
fn sep1_repeats_separator_and_item() {
    let rule = sep1(sym("variable"), ",");
    let expected = seq([
        sym("variable"),
        repeat(seq([string(","), sym("variable")])),
    ]);
    assert_eq!(rule, expected);
}

#[test]
fn lexical_rules() {
    assert!(pattern(r"\d+").is_lexical());
    assert!(prec(1, token(seq([string("/*"), pattern(".*")]))).is_lexical());
    assert!(!seq([string("a")]).is_lexical());
    assert!(!sym("identifier").is_lexical());
}

#[test]
fn builder_collects_declarations() {
    let grammar = GrammarBuilder::new("test")
        .rule("a", sym("b"))
        .rule("b", string("x"))
        .conflict(["a", "b"])
        .precedences(["high", "low"])
        .inline(["b"])
        .supertypes(["a"])
        .build();

    assert_eq!(grammar.conflicts, vec![vec!["a".to_owned(), "b".to_owned()]]);
    assert_eq!(grammar.precedences[0].len(), 2);
    assert_eq!(grammar.inline, vec!["b".to_owned()]);
    assert_eq!(grammar.rule("b"), Some(&string("x")));
}
