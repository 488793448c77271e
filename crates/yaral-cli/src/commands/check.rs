use std::fmt::Write as _;
use std::ops::Range;

use annotate_snippets::{AnnotationKind, Group, Level, Renderer, Snippet};
use yaral_runtime::{Parser, SyntaxError, SyntaxErrorKind};

use super::source::SourceInput;
use super::{fail, yaral_language};

pub struct CheckArgs {
    pub source: SourceInput,
    pub color: bool,
}

pub fn run(args: CheckArgs) {
    let source = args.source.load("source").unwrap_or_else(|err| fail(err));
    let tree = Parser::new(yaral_language()).parse(&source.text, None);

    let errors = tree.errors();
    if errors.is_empty() {
        // Silent on success.
        return;
    }

    eprint!(
        "{}",
        render_errors(&errors, &source.text, Some(&source.name), args.color)
    );
    std::process::exit(1);
}

pub fn message(error: &SyntaxError) -> String {
    match &error.kind {
        SyntaxErrorKind::Unexpected => "unexpected input".to_string(),
        SyntaxErrorKind::Missing { kind, named: true } => format!("missing {kind}"),
        SyntaxErrorKind::Missing { kind, named: false } => format!("missing `{kind}`"),
    }
}

/// One annotated snippet per error, separated by blank lines.
pub fn render_errors(
    errors: &[SyntaxError],
    source: &str,
    path: Option<&str>,
    colored: bool,
) -> String {
    let renderer = if colored {
        Renderer::styled()
    } else {
        Renderer::plain()
    };

    let mut out = String::new();
    for (i, error) in errors.iter().enumerate() {
        let message = message(error);
        let mut snippet = Snippet::source(source).line_start(1).annotation(
            AnnotationKind::Primary
                .span(visible_range(&error.byte_range, source.len()))
                .label(message.as_str()),
        );
        if let Some(path) = path {
            snippet = snippet.path(path);
        }
        let report: Vec<Group> = vec![Level::ERROR.primary_title(message.as_str()).element(snippet)];

        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "{}", renderer.render(&report));
    }
    out
}

/// Missing nodes are zero-width; widen them by one character so the caret
/// shows.
fn visible_range(range: &Range<usize>, limit: usize) -> Range<usize> {
    if range.start == range.end {
        return range.start..(range.start + 1).min(limit);
    }
    range.clone()
}
