use crate::test_utils::{calc, parse, settings};
use crate::{Parser, RecoveryConfig, SyntaxErrorKind, Tree};

fn assert_covers(tree: &Tree, text: &str) {
    assert_eq!(tree.root_node().byte_range(), 0..text.len());
}

#[test]
fn inserts_missing_semicolon() {
    let text = "rule a { x = 1 }";
    let tree = parse(&settings(), text);
    insta::assert_snapshot!(tree.to_sexp(), @r#"(source_file (rule name: (identifier) (statement key: (identifier) value: (number) (MISSING ";"))))"#);
    assert_covers(&tree, text);

    let errors = tree.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(
        errors[0].kind,
        SyntaxErrorKind::Missing {
            kind: ";".to_owned(),
            named: false
        }
    );
    assert_eq!(errors[0].byte_range, 14..14);
    assert_eq!(errors[0].to_string(), "missing `;` at 0:14");
}

#[test]
fn deletes_stray_token() {
    let text = "rule a { x = 1 1; }";
    let tree = parse(&settings(), text);
    insta::assert_snapshot!(tree.to_sexp(), @"(source_file (rule name: (identifier) (statement key: (identifier) value: (number) (ERROR (number)))))");
    assert_covers(&tree, text);
    let errors = tree.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, SyntaxErrorKind::Unexpected);
    assert_eq!(errors[0].byte_range, 15..16);
}

#[test]
fn skips_unrecognized_characters() {
    let text = "rule a { x = 1; @@ }";
    let tree = parse(&settings(), text);
    insta::assert_snapshot!(tree.to_sexp(), @"(source_file (rule name: (identifier) (statement key: (identifier) value: (number)) (ERROR)))");
    assert_covers(&tree, text);
    assert_eq!(tree.errors()[0].byte_range, 16..18);
}

#[test]
fn closes_truncated_input() {
    let text = "rule a { x = ";
    let tree = parse(&settings(), text);
    insta::assert_snapshot!(tree.to_sexp(), @r#"(source_file (rule name: (identifier) (statement key: (identifier) value: (MISSING identifier) (MISSING ";")) (MISSING "}")))"#);
    assert_covers(&tree, text);
    assert!(tree.errors().iter().all(|error| error.byte_range == (12..12)));
}

#[test]
fn insertion_budget_is_configurable() {
    let text = "rule a { x = ";
    let parser = Parser::new(settings()).with_recovery(RecoveryConfig::new().max_insertions(1));
    let tree = parser.parse(text, None);
    assert_covers(&tree, text);
    assert!(tree.root_node().has_error());
    assert!(!tree.to_sexp().contains("MISSING"));
}

#[test]
fn garbage_between_rules_is_isolated() {
    let text = "rule a { x = 1; } = = = rule b { y = 2; }";
    let tree = parse(&settings(), text);
    assert_covers(&tree, text);
    let root = tree.root_node();
    let rules: Vec<_> = root
        .named_children()
        .filter(|node| node.kind() == "rule")
        .collect();
    assert_eq!(rules.len(), 2);
    assert!(rules.iter().all(|rule| !rule.has_error()));
    assert!(root.named_children().any(|node| node.is_error()));
}

#[test]
fn arbitrary_input_always_yields_a_covering_tree() {
    let inputs = [
        "}}}} rule",
        "rule rule rule { { = ; ;",
        "= 1 ; } rule x { y = \"unterminated",
        "\u{e9}\u{e9} rule \u{1F600} { }",
        "rule a { x = 1; } }",
        ";",
    ];
    let language = settings();
    for text in inputs {
        let tree = parse(&language, text);
        assert_covers(&tree, text);
        assert!(tree.root_node().has_error(), "{text:?}");
    }
}

#[test]
fn unbalanced_parenthesis() {
    let text = "(1 + 2";
    let tree = parse(&calc(), text);
    assert_covers(&tree, text);
    insta::assert_snapshot!(tree.to_sexp(), @r#"(expr (expr left: (expr (number)) right: (expr (number))) (MISSING ")"))"#);
}

#[test]
fn valid_input_has_no_errors() {
    let language = calc();
    for text in ["1", "1 * (2 + 3)", "((1))", " 4 + 5 * 6 "] {
        let tree = parse(&language, text);
        assert!(tree.errors().is_empty(), "{text:?}");
        assert_covers(&tree, text);
    }
}

/// Every node below the root spans exactly from its first child to its last.
fn assert_children_span(tree: &Tree, text: &str) {
    for node in tree.root_node().descendants().skip(1) {
        let children: Vec<_> = node.children().collect();
        let (Some(first), Some(last)) = (children.first(), children.last()) else {
            continue;
        };
        assert_eq!(
            node.byte_range(),
            first.start_byte()..last.end_byte(),
            "`{}` in {text:?}: {}",
            node.kind(),
            tree.to_sexp()
        );
    }
}

#[test]
fn error_nodes_start_at_their_first_child() {
    let language = settings();
    for text in [" { = x", "rule a {  } } } rule", "  ; # note\n }", "rule a { x = 1; }\n  = =  "] {
        let tree = parse(&language, text);
        assert_covers(&tree, text);
        assert_children_span(&tree, text);
    }

    let text = " } = x";
    let tree = parse(&language, text);
    let error = tree
        .root_node()
        .children()
        .find(|node| node.is_error())
        .unwrap();
    assert_eq!(error.start_byte(), 1);
}

#[test]
fn generated_garbage_keeps_node_ranges_consistent() {
    let fragments = [
        "rule", " a", "{", "}", "=", ";", "1", "\"s\"", " ", "\n  ", "# note\n", "@", "x",
    ];
    let language = settings();
    let mut seed: u64 = 0x2545_f491_4f6c_dd1d;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        seed
    };
    for _ in 0..300 {
        let len = 1 + next() % 12;
        let text: String = (0..len)
            .map(|_| fragments[(next() % fragments.len() as u64) as usize])
            .collect();
        let tree = parse(&language, &text);
        assert_covers(&tree, &text);
        assert_children_span(&tree, &text);
    }
}
