use crate::header::Header;
use crate::test_utils::{tiny_artifact, tiny_data, tiny_dfa};
use crate::{Action, LoadError, Tables, VERSION, encode};

#[test]
fn load_valid_artifact() {
    let tables = Tables::load(&tiny_artifact()).unwrap();

    assert_eq!(tables.name(), "tiny");
    assert_eq!(tables.symbol_count(), 3);
    assert_eq!(tables.symbol_name(1), "a");
    assert_eq!(tables.symbol_name(u16::MAX), "ERROR");
    assert_eq!(tables.action(0, 1), Some(Action::Shift(1)));
    assert_eq!(tables.action(0, 0), None);
    assert_eq!(tables.goto(0, 2), Some(2));
    assert_eq!(tables.symbol_for_name("a", false), Some(1));
    assert_eq!(tables.symbol_for_name("a", true), None);
    assert_eq!(tables.symbol_for_name("ERROR", true), Some(u16::MAX));
    assert_eq!(tables.field_id("value").map(|f| f.get()), Some(1));
    assert_eq!(tables.lex_terminal(1).map(|t| t.literal), Some(true));
}

#[test]
fn encoding_is_deterministic() {
    assert_eq!(tiny_artifact(), tiny_artifact());
}

#[test]
fn artifact_is_section_aligned() {
    let bytes = tiny_artifact();
    assert_eq!(bytes.len() % 64, 0);
    assert_eq!(&bytes[..4], b"YRLT");
}

#[test]
fn version_mismatch_is_distinguishable() {
    let mut bytes = tiny_artifact();
    bytes[4..8].copy_from_slice(&(VERSION + 1).to_le_bytes());

    let err = Tables::load(&bytes).unwrap_err();
    assert!(matches!(
        err,
        LoadError::IncompatibleVersion { found, expected } if found == VERSION + 1 && expected == VERSION
    ));
}

#[test]
fn corrupted_body_fails_checksum() {
    let mut bytes = tiny_artifact();
    bytes[Header::SIZE + 3] ^= 0xFF;

    let err = Tables::load(&bytes).unwrap_err();
    assert!(matches!(err, LoadError::ChecksumMismatch { .. }));
}

#[test]
fn truncated_artifact_fails() {
    let bytes = tiny_artifact();

    assert!(matches!(
        Tables::load(&bytes[..10]).unwrap_err(),
        LoadError::FileTooSmall(10)
    ));
    assert!(matches!(
        Tables::load(&bytes[..bytes.len() - 64]).unwrap_err(),
        LoadError::SizeMismatch { .. }
    ));
}

#[test]
fn wrong_magic_fails() {
    let mut bytes = tiny_artifact();
    bytes[0] = b'X';
    assert!(matches!(Tables::load(&bytes).unwrap_err(), LoadError::InvalidMagic));
}

#[test]
fn dangling_shift_target_is_corrupt() {
    let mut data = tiny_data();
    data.states[0].actions[0].1 = Action::Shift(9);
    let bytes = encode(&data, &tiny_dfa()).unwrap();

    let err = Tables::load(&bytes).unwrap_err();
    assert!(matches!(err, LoadError::Corrupt(_)));
    assert!(err.to_string().contains("state 0"));
}

#[test]
fn pattern_count_must_match_terminals() {
    let mut data = tiny_data();
    data.terminals.clear();
    let bytes = encode(&data, &tiny_dfa()).unwrap();

    let err = Tables::load(&bytes).unwrap_err();
    insta::assert_snapshot!(err, @"corrupt tables: lexer has 1 patterns for 0 terminals");
}

#[test]
fn error_messages() {
    let err = LoadError::IncompatibleVersion {
        found: 7,
        expected: 1,
    };
    insta::assert_snapshot!(err, @"incompatible artifact version 7 (this build reads version 1)");

    let err = LoadError::FileTooSmall(32);
    assert!(err.to_string().contains("32"));
}

#[test]
fn dump_lists_symbols_and_states() {
    let tables = Tables::load(&tiny_artifact()).unwrap();
    let out = crate::dump(&tables, yaral_core::Colors::OFF);
    insta::assert_snapshot!(out, @r#"
    [grammar] tiny
    symbols=3 fields=1 productions=1 states=3 terminals=1

    [symbols]
    0 end end hidden
    1 "a" terminal
    2 start rule

    [fields]
    1 value

    [productions]
    0 start → value: _

    [states]
    0 shift=1 reduce=0 goto=1
    1 shift=0 reduce=1 goto=0
    2 shift=0 reduce=0 goto=0 accept
    "#);
}
