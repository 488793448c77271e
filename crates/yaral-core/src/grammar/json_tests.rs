use super::*;

#[test]
fn parse_minimal_grammar() {
    let json = r#"{
        "name": "yaral",
        "rules": {
            "source_file": { "type": "SYMBOL", "name": "rule" },
            "rule": { "type": "STRING", "value": "rule" }
        }
    }"#;

    let grammar = Grammar::from_json(json).unwrap();
    assert_eq!(grammar.name, "yaral");
    assert_eq!(grammar.rules.len(), 2);
    assert_eq!(grammar.start_rule(), Some("source_file"));
}

#[test]
fn parse_prec_and_field() {
    let json = r#"{
        "name": "test",
        "rules": {
            "binary": {
                "type": "PREC_LEFT",
                "value": 2,
                "content": {
                    "type": "FIELD",
                    "name": "left",
                    "content": { "type": "SYMBOL", "name": "number" }
                }
            },
            "number": { "type": "PATTERN", "value": "\\d+" }
        },
        "extras": [{ "type": "PATTERN", "value": "\\s" }],
        "word": "number"
    }"#;

    let grammar = Grammar::from_json(json).unwrap();
    let Rule::PrecLeft { value, content } = &grammar.rules[0].1 else {
        panic!("expected PREC_LEFT, got {:?}", grammar.rules[0].1);
    };
    assert_eq!(*value, Precedence::Integer(2));
    assert!(matches!(content.as_ref(), Rule::Field { name, .. } if name == "left"));
    assert_eq!(grammar.extras.len(), 1);
    assert_eq!(grammar.word.as_deref(), Some("number"));
}

#[test]
fn named_precedence_is_string() {
    let json = r#"{
        "name": "test",
        "rules": {
            "a": { "type": "PREC", "value": "unary", "content": { "type": "STRING", "value": "!" } }
        },
        "precedences": [[{ "type": "STRING", "value": "unary" }, { "type": "SYMBOL", "name": "a" }]]
    }"#;

    let grammar = Grammar::from_json(json).unwrap();
    assert!(matches!(
        &grammar.rules[0].1,
        Rule::Prec { value: Precedence::Name(n), .. } if n == "unary"
    ));
    assert_eq!(
        grammar.precedences[0],
        vec![
            PrecedenceEntry::Name("unary".into()),
            PrecedenceEntry::Symbol("a".into())
        ]
    );
}

#[test]
fn preserves_rule_order() {
    let json = r#"{
        "name": "test",
        "rules": {
            "source_file": { "type": "SYMBOL", "name": "rule" },
            "rule": { "type": "SYMBOL", "name": "condition" },
            "condition": { "type": "STRING", "value": "condition" }
        }
    }"#;

    let grammar = Grammar::from_json(json).unwrap();

    assert_eq!(grammar.rules[0].0, "source_file");
    assert_eq!(grammar.rules[1].0, "rule");
    assert_eq!(grammar.rules[2].0, "condition");
}

#[test]
fn write_then_read_preserves_grammar() {
    let json = r#"{
        "name": "test",
        "rules": {
            "root": {
                "type": "SEQ",
                "members": [
                    { "type": "STRING", "value": "a" },
                    { "type": "CHOICE", "members": [
                        { "type": "ALIAS", "content": { "type": "STRING", "value": "b" }, "value": "bee", "named": true },
                        { "type": "BLANK" }
                    ]},
                    { "type": "IMMEDIATE_TOKEN", "content": { "type": "PATTERN", "value": "c+", "flags": "i" } }
                ]
            }
        },
        "conflicts": [["root"]]
    }"#;

    let grammar = Grammar::from_json(json).unwrap();
    let written = grammar.to_json().unwrap();

    assert_eq!(Grammar::from_json(&written).unwrap(), grammar);
    assert!(!written.contains("externals"));
}

#[test]
fn invalid_json_is_an_error() {
    let err = Grammar::from_json(r#"{ "name": "x", "rules": { "a": { "type": "NOPE" } } }"#)
        .unwrap_err();
    assert!(matches!(err, GrammarError::Json(_)));
    assert!(err.to_string().starts_with("JSON parse error"));
}
