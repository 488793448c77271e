//! Command builders for the CLI.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("yaral")
        .about("Parse, check and query Yaral rules")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(parse_command())
        .subcommand(check_command())
        .subcommand(query_command())
        .subcommand(compile_command())
        .subcommand(dump_command())
}

/// Print the syntax tree of a source.
pub fn parse_command() -> Command {
    Command::new("parse")
        .about("Print the syntax tree of a Yaral source")
        .override_usage(
            "\
  yaral parse <SOURCE>
  yaral parse -s <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  yaral parse rules.yaral                  # named nodes
  yaral parse rules.yaral --raw --spans    # all nodes with positions
  yaral parse -s 'rule r { condition: true }' --trace -v
  cat rules.yaral | yaral parse -"#,
        )
        .arg(source_path_arg())
        .arg(source_text_arg())
        .arg(raw_arg())
        .arg(spans_arg())
        .arg(trace_arg())
        .arg(verbose_arg())
        .arg(color_arg())
}

/// Report syntax errors of a source.
pub fn check_command() -> Command {
    Command::new("check")
        .about("Report syntax errors in a Yaral source")
        .override_usage(
            "\
  yaral check <SOURCE>
  yaral check -s <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  yaral check rules.yaral                  # silent when clean
  yaral check -s 'rule r { meta:'          # exit code 1, annotated errors"#,
        )
        .arg(source_path_arg())
        .arg(source_text_arg())
        .arg(color_arg())
}

/// Run a structural query.
pub fn query_command() -> Command {
    Command::new("query")
        .about("Run a structural query against a Yaral source")
        .override_usage(
            "\
  yaral query <QUERY> <SOURCE>
  yaral query -q <TEXT> <SOURCE>
  yaral query -q <TEXT> -s <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  yaral query rules.q rules.yaral
  yaral query -q '(rule name: (identifier) @name)' rules.yaral
  yaral query -q '(condition) @c' -s 'rule r { condition: true }'"#,
        )
        .arg(query_path_arg())
        .arg(source_path_arg())
        .arg(query_text_arg())
        .arg(source_text_arg())
        .arg(color_arg())
}

/// Compile a grammar into an artifact.
pub fn compile_command() -> Command {
    Command::new("compile")
        .about("Compile a grammar into loadable tables")
        .override_usage(
            "\
  yaral compile [GRAMMAR] [-o <FILE>]",
        )
        .after_help(
            r#"EXAMPLES:
  yaral compile                            # built-in grammar -> yaral.tables
  yaral compile grammar.json -o out.tables"#,
        )
        .arg(grammar_path_arg())
        .arg(output_file_arg())
}

/// Summarize an artifact.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Summarize compiled tables")
        .override_usage(
            "\
  yaral dump [ARTIFACT]",
        )
        .after_help(
            r#"EXAMPLES:
  yaral dump                               # built-in tables
  yaral dump out.tables --color always"#,
        )
        .arg(artifact_path_arg())
        .arg(color_arg())
}
