use std::path::PathBuf;

use super::source::{SourceError, SourceInput};

#[test]
fn inline_text() {
    let loaded = SourceInput::new(None, Some("rule r {}".to_string()))
        .load("source")
        .unwrap();
    assert_eq!(loaded.name, "<inline source>");
    assert_eq!(loaded.text, "rule r {}");
}

#[test]
fn file() {
    let path = std::env::temp_dir().join(format!("yaral-source-{}.yaral", std::process::id()));
    std::fs::write(&path, "rule r { condition: true }").unwrap();

    let loaded = SourceInput::new(Some(path.clone()), None)
        .load("source")
        .unwrap();
    assert_eq!(loaded.text, "rule r { condition: true }");
    assert_eq!(loaded.name, path.display().to_string());

    std::fs::remove_file(&path).unwrap();
}

#[test]
fn missing_file() {
    let err = SourceInput::new(Some(PathBuf::from("/nonexistent/rules.yaral")), None)
        .load("source")
        .unwrap_err();
    assert!(matches!(err, SourceError::Read { .. }));
    assert!(
        err.to_string()
            .starts_with("cannot read /nonexistent/rules.yaral: ")
    );
}

#[test]
fn both_or_neither() {
    let both = SourceInput::new(Some(PathBuf::from("q.scm")), Some("(rule)".to_string()));
    assert_eq!(
        both.load("query").unwrap_err().to_string(),
        "cannot use both inline query text and a query file"
    );

    let neither = SourceInput::new(None, None);
    assert_eq!(
        neither.load("source").unwrap_err().to_string(),
        "source required (file path, \"-\" for stdin, or inline text)"
    );
}
