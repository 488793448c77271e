use yaral_core::Colors;

use crate::test_utils::{parse, settings};
use crate::{InputEdit, Language, Parser, PrintTracer, Tree, Verbosity};

const TEXT: &str = "rule a { x = 1; }\nrule b { y = 2; }\nrule c { z = 3; }";

fn rule_ids(tree: &Tree) -> Vec<usize> {
    tree.root_node().named_children().map(|rule| rule.id()).collect()
}

fn reparse(language: &Language, text: &str, old: &Tree) -> (Tree, usize) {
    let mut tracer = PrintTracer::new(text, language, Verbosity::Default, Colors::OFF);
    let tree = Parser::new(language.clone()).parse_with_tracer(text, Some(old), &mut tracer);
    let reused = tracer
        .lines()
        .iter()
        .filter(|line| line.starts_with("reuse"))
        .count();
    (tree, reused)
}

#[test]
fn unchanged_text_reuses_every_rule() {
    let language = settings();
    let old = parse(&language, TEXT);
    let (new, reused) = reparse(&language, TEXT, &old);
    assert_eq!(reused, 3);
    assert_eq!(rule_ids(&new), rule_ids(&old));
    assert_eq!(new, old);
}

#[test]
fn edit_keeps_unaffected_rules() {
    let language = settings();
    let mut old = parse(&language, TEXT);
    let old_ids = rule_ids(&old);

    // "2" -> "22" inside rule b.
    let at = TEXT.find('2').unwrap();
    old.edit(&InputEdit::replace(at..at + 1, 2));
    assert!(old.is_edited());
    let text = TEXT.replacen('2', "22", 1);

    let (new, reused) = reparse(&language, &text, &old);
    let new_ids = rule_ids(&new);
    assert!(reused >= 2);
    assert_eq!(new_ids[0], old_ids[0]);
    assert_ne!(new_ids[1], old_ids[1]);
    assert_eq!(new_ids[2], old_ids[2]);

    assert_eq!(new, parse(&language, &text));
    let c = new.root_node().named_child(2).unwrap();
    assert_eq!(c.byte_range(), 37..54);
}

#[test]
fn edited_tree_keeps_old_positions() {
    let language = settings();
    let mut old = parse(&language, TEXT);
    old.edit(&InputEdit::replace(0..0, 10));
    let c = old.root_node().named_child(2).unwrap();
    assert_eq!(c.start_byte(), 36);
    assert_eq!(old.source_len(), TEXT.len());
}

#[test]
fn edits_match_a_fresh_parse() {
    let language = settings();
    let edits: [(std::ops::Range<usize>, &str); 6] = [
        (0..0, "rule new { k = v; }\n"),
        (9..16, ""),
        (13..14, "\"text\""),
        (17..18, " # trailing\n"),
        (TEXT.len()..TEXT.len(), "\nrule d { }"),
        (5..6, "rule"),
    ];
    for (range, insert) in edits {
        let mut old = parse(&language, TEXT);
        old.edit(&InputEdit::replace(range.clone(), insert.len()));
        let mut text = TEXT.to_owned();
        text.replace_range(range, insert);

        let (incremental, _) = reparse(&language, &text, &old);
        let fresh = parse(&language, &text);
        assert_eq!(incremental, fresh, "{text:?}");
        assert_eq!(incremental.root_node().byte_range(), 0..text.len());
    }
}

#[test]
fn successive_edits_accumulate() {
    let language = settings();
    let mut tree = parse(&language, TEXT);
    let mut text = TEXT.to_owned();
    for (at, insert) in [(14, "0"), (33, "9"), (0, "\n")] {
        tree.edit(&InputEdit::replace(at..at, insert.len()));
        text.insert_str(at, insert);
    }
    let (incremental, _) = reparse(&language, &text, &tree);
    assert_eq!(incremental, parse(&language, &text));
}

#[test]
fn tree_of_another_language_is_ignored() {
    let old = parse(&settings(), TEXT);
    let (_, reused) = reparse(&settings(), TEXT, &old);
    assert_eq!(reused, 0);
}

#[test]
fn unedited_tree_of_other_text_is_ignored() {
    let language = settings();
    let old = parse(&language, "rule a { }");
    let (new, reused) = reparse(&language, TEXT, &old);
    assert_eq!(reused, 0);
    assert_eq!(new, parse(&language, TEXT));
}

#[test]
fn erroneous_subtrees_are_not_reused() {
    let language = settings();
    let text = "rule a { x = 1 }\nrule b { y = 2; }";
    let old = parse(&language, text);
    let (new, reused) = reparse(&language, text, &old);
    assert_eq!(reused, 1);
    assert_eq!(new, old);
}

#[test]
fn rules_next_to_an_error_are_parsed_again() {
    let language = settings();
    let text = "rule a { x = 1; }  } rule b { y = 2; }";
    let old = parse(&language, text);
    assert!(old.root_node().has_error());

    let (new, reused) = reparse(&language, text, &old);
    assert!(reused >= 1);
    assert_eq!(new, old);
    let ids = |tree: &Tree| -> Vec<usize> {
        tree.root_node()
            .named_children()
            .filter(|node| node.kind() == "rule")
            .map(|rule| rule.id())
            .collect()
    };
    let (old_ids, new_ids) = (ids(&old), ids(&new));
    assert_ne!(new_ids[0], old_ids[0]);
    assert_eq!(new_ids[1], old_ids[1]);
}
