use yaral_tables::{Header, VERSION};

use crate::{ARTIFACT, grammar, language, parser};
use yaral_runtime::{Language, LoadError};

#[test]
fn shipped_tables_load() {
    let language = language().unwrap();
    assert_eq!(language.name(), "yaral");
    assert!(language.id_for_node_kind("rule", true).is_some());
    assert!(language.id_for_node_kind("rule", false).is_some());
    assert!(language.id_for_node_kind("condition", true).is_some());
    assert!(language.field_id_for_name("name").is_some());
    assert!(language.id_for_node_kind("section", true).is_none());
}

#[test]
fn hidden_rules_have_no_node_kind() {
    let language = language().unwrap();
    assert!(language.id_for_node_kind("_expression", true).is_none());
    assert!(language.id_for_node_kind("_section", true).is_none());
}

#[test]
fn artifact_matches_grammar() {
    let compiled = yaral_compiler::compile(&grammar()).unwrap();
    assert_eq!(compiled, ARTIFACT);
}

#[test]
fn every_load_is_a_separate_handle() {
    let first = language().unwrap();
    let second = language().unwrap();
    assert_ne!(first, second);
    assert_eq!(first, first.clone());
}

#[test]
fn parser_uses_shipped_language() {
    let parser = parser().unwrap();
    assert_eq!(parser.language().name(), "yaral");
}

#[test]
fn version_mismatch_is_rejected() {
    let mut bytes = ARTIFACT.to_vec();
    bytes[4..8].copy_from_slice(&(VERSION + 1).to_le_bytes());

    let err = Language::load(&bytes).unwrap_err();
    assert!(matches!(
        err,
        LoadError::IncompatibleVersion { found, expected }
            if found == VERSION + 1 && expected == VERSION
    ));
}

#[test]
fn corrupted_tables_are_rejected() {
    let mut bytes = ARTIFACT.to_vec();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;

    let err = Language::load(&bytes).unwrap_err();
    assert!(matches!(err, LoadError::ChecksumMismatch { .. }));
}

#[test]
fn truncated_tables_are_rejected() {
    let err = Language::load(&ARTIFACT[..ARTIFACT.len() - 1]).unwrap_err();
    assert!(matches!(err, LoadError::SizeMismatch { .. }));

    let err = Language::load(&ARTIFACT[..Header::SIZE - 1]).unwrap_err();
    assert!(matches!(err, LoadError::FileTooSmall(63)));
}
