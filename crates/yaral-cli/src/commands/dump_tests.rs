use yaral_core::Colors;
use yaral_runtime::LoadError;

use super::dump::format_dump;

#[test]
fn shipped_artifact() {
    let out = format_dump(yaral_lang::ARTIFACT, Colors::OFF).unwrap();
    let first = out.lines().next().unwrap();
    assert!(
        first.starts_with(&format!("[artifact] {} bytes, format v1", yaral_lang::ARTIFACT.len())),
        "{first}"
    );
    assert!(out.contains("[grammar] yaral"));
    assert!(out.contains("[symbols]"));
}

#[test]
fn corrupted_artifact_is_rejected() {
    let mut bytes = yaral_lang::ARTIFACT.to_vec();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    assert!(matches!(
        format_dump(&bytes, Colors::OFF),
        Err(LoadError::ChecksumMismatch { .. })
    ));
}

#[test]
fn truncated_artifact_is_rejected() {
    assert!(format_dump(&yaral_lang::ARTIFACT[..10], Colors::OFF).is_err());
}
