use std::fmt::Write as _;

use yaral_core::Colors;
use yaral_query::Query;
use yaral_runtime::{Parser, Tree};

use super::parse::escape_string;
use super::source::SourceInput;
use super::{fail, yaral_language};

pub struct QueryArgs {
    pub query: SourceInput,
    pub source: SourceInput,
    pub color: bool,
}

pub fn run(args: QueryArgs) {
    let query_source = args.query.load("query").unwrap_or_else(|err| fail(err));
    let source = args.source.load("source").unwrap_or_else(|err| fail(err));
    let language = yaral_language();

    let query = match Query::new(&language, &query_source.text) {
        Ok(query) => query,
        Err(err) => {
            eprint!(
                "{}",
                err.diagnostics()
                    .printer()
                    .source(&query_source.text)
                    .path(&query_source.name)
                    .colored(args.color)
                    .render()
            );
            eprintln!();
            fail(err);
        }
    };

    let tree = Parser::new(language).parse(&source.text, None);
    print!(
        "{}",
        format_matches(&query, &tree, &source.text, Colors::new(args.color))
    );
}

/// One header line per match, then one line per capture.
pub fn format_matches(query: &Query, tree: &Tree, source: &str, colors: Colors) -> String {
    let c = colors;
    let mut out = String::new();
    for found in query.matches(&tree.root_node()) {
        let _ = writeln!(out, "{}pattern {}{}", c.dim, found.pattern_index, c.reset);
        for (name, node) in found.captures() {
            let start = node.start_position();
            let end = node.end_position();
            let text = node.utf8_text(source.as_bytes()).unwrap_or("<invalid utf8>");
            let _ = writeln!(
                out,
                "  @{name} {}{}{} {}{}:{}-{}:{}{} {}\"{}\"{}",
                c.blue,
                node.kind(),
                c.reset,
                c.dim,
                start.row,
                start.column,
                end.row,
                end.column,
                c.reset,
                c.green,
                escape_string(text),
                c.reset
            );
        }
    }
    out
}
