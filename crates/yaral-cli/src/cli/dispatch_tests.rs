//! Tests for CLI dispatch logic: argument parsing, positional shifting and
//! params extraction.

use std::path::PathBuf;

use yaral_runtime::Verbosity;

use super::*;
use crate::cli::commands::{
    check_command, compile_command, dump_command, parse_command, query_command,
};
use crate::commands::check::CheckArgs;
use crate::commands::parse::ParseArgs;
use crate::commands::query::QueryArgs;
use crate::commands::source::SourceInput;

#[test]
fn parse_flags() {
    let m = parse_command()
        .try_get_matches_from(["parse", "rules.yaral", "--raw", "--spans", "--color", "never"])
        .unwrap();
    let params = ParseParams::from_matches(&m);
    assert_eq!(params.source_path, Some(PathBuf::from("rules.yaral")));
    assert!(params.raw);
    assert!(params.spans);
    assert!(!params.trace);
    assert_eq!(params.color, ColorChoice::Never);

    let args: ParseArgs = params.into();
    assert_eq!(args.trace, None);
    assert!(!args.color);
}

#[test]
fn parse_trace_verbosity() {
    let m = parse_command()
        .try_get_matches_from(["parse", "-s", "rule r {}", "--trace", "-vv"])
        .unwrap();
    let args: ParseArgs = ParseParams::from_matches(&m).into();
    assert_eq!(args.trace, Some(Verbosity::VeryVerbose));
    assert_eq!(
        args.source,
        SourceInput::new(None, Some("rule r {}".to_string()))
    );
}

#[test]
fn verbosity_requires_trace() {
    let result = parse_command().try_get_matches_from(["parse", "rules.yaral", "-v"]);
    assert!(result.is_err());
}

#[test]
fn inline_source_conflicts_with_path() {
    let result = check_command().try_get_matches_from(["check", "rules.yaral", "-s", "rule r {}"]);
    assert!(result.is_err());
}

#[test]
fn check_reads_stdin_marker() {
    let m = check_command()
        .try_get_matches_from(["check", "-", "--color", "always"])
        .unwrap();
    let args: CheckArgs = CheckParams::from_matches(&m).into();
    assert_eq!(args.source, SourceInput::new(Some(PathBuf::from("-")), None));
    assert!(args.color);
}

#[test]
fn query_with_two_positionals() {
    let m = query_command()
        .try_get_matches_from(["query", "rules.q", "rules.yaral"])
        .unwrap();
    let params = QueryParams::from_matches(&m);
    assert_eq!(params.query_path, Some(PathBuf::from("rules.q")));
    assert_eq!(params.source_path, Some(PathBuf::from("rules.yaral")));
}

#[test]
fn query_text_shifts_positional_to_source() {
    let m = query_command()
        .try_get_matches_from(["query", "-q", "(rule) @r", "rules.yaral"])
        .unwrap();
    let args: QueryArgs = QueryParams::from_matches(&m).into();
    assert_eq!(
        args.query,
        SourceInput::new(None, Some("(rule) @r".to_string()))
    );
    assert_eq!(
        args.source,
        SourceInput::new(Some(PathBuf::from("rules.yaral")), None)
    );
}

#[test]
fn query_text_and_inline_source() {
    let m = query_command()
        .try_get_matches_from(["query", "-q", "(rule)", "-s", "rule r {}"])
        .unwrap();
    let params = QueryParams::from_matches(&m);
    assert_eq!(params.query_path, None);
    assert_eq!(params.source_path, None);
    assert_eq!(params.source_text.as_deref(), Some("rule r {}"));
}

#[test]
fn compile_output() {
    let m = compile_command()
        .try_get_matches_from(["compile", "grammar.json", "-o", "out.tables"])
        .unwrap();
    let params = CompileParams::from_matches(&m);
    assert_eq!(params.grammar_path, Some(PathBuf::from("grammar.json")));
    assert_eq!(params.output, Some(PathBuf::from("out.tables")));

    let m = compile_command().try_get_matches_from(["compile"]).unwrap();
    let params = CompileParams::from_matches(&m);
    assert_eq!(params.grammar_path, None);
    assert_eq!(params.output, None);
}

#[test]
fn dump_defaults() {
    let m = dump_command().try_get_matches_from(["dump"]).unwrap();
    let params = DumpParams::from_matches(&m);
    assert_eq!(params.artifact_path, None);
    assert_eq!(params.color, ColorChoice::Auto);
}

#[test]
fn unknown_color_is_rejected() {
    let result = dump_command().try_get_matches_from(["dump", "--color", "sometimes"]);
    assert!(result.is_err());
}

#[test]
fn cli_requires_a_subcommand() {
    assert!(build_cli().try_get_matches_from(["yaral"]).is_err());
    let m = build_cli()
        .try_get_matches_from(["yaral", "check", "rules.yaral"])
        .unwrap();
    assert_eq!(m.subcommand_name(), Some("check"));
}

#[test]
fn cli_is_well_formed() {
    build_cli().debug_assert();
}
