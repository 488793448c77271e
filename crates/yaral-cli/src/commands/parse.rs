use yaral_core::Colors;
use yaral_runtime::{Node, Parser, PrintTracer, Tree, Verbosity};

use super::source::SourceInput;
use super::{fail, yaral_language};

pub struct ParseArgs {
    pub source: SourceInput,
    pub raw: bool,
    pub spans: bool,
    /// Trace verbosity when `--trace` was given.
    pub trace: Option<Verbosity>,
    pub color: bool,
}

pub fn run(args: ParseArgs) {
    let source = args.source.load("source").unwrap_or_else(|err| fail(err));
    let language = yaral_language();
    let parser = Parser::new(language.clone());
    let colors = Colors::new(args.color);

    let tree = match args.trace {
        Some(verbosity) => {
            let mut tracer = PrintTracer::new(&source.text, &language, verbosity, colors);
            let tree = parser.parse_with_tracer(&source.text, None, &mut tracer);
            tracer.print();
            println!();
            tree
        }
        None => parser.parse(&source.text, None),
    };

    print!(
        "{}",
        format_tree(&tree, &source.text, args.raw, args.spans, colors)
    );
}

/// Indented S-expression dump. Anonymous nodes are left out unless `raw`,
/// except missing ones, which always show.
pub fn format_tree(tree: &Tree, source: &str, raw: bool, spans: bool, colors: Colors) -> String {
    let mut out = String::new();
    format_node(&tree.root_node(), source, 0, raw, spans, colors, &mut out);
    out.push('\n');
    out
}

fn format_node(
    node: &Node<'_>,
    source: &str,
    depth: usize,
    raw: bool,
    spans: bool,
    colors: Colors,
    out: &mut String,
) {
    let c = colors;
    out.push_str(&"  ".repeat(depth));
    if let Some(field) = node.field_name() {
        out.push_str(&format!("{}{field}:{} ", c.dim, c.reset));
    }

    let label = if node.is_missing() {
        let kind = if node.is_named() {
            node.kind().to_string()
        } else {
            format!("\"{}\"", escape_string(node.kind()))
        };
        format!("{}MISSING{} {kind}", c.red, c.reset)
    } else if node.is_error() {
        format!("{}ERROR{}", c.red, c.reset)
    } else if node.is_named() {
        format!("{}{}{}", c.blue, node.kind(), c.reset)
    } else {
        String::new()
    };
    let span = if spans {
        let start = node.start_position();
        let end = node.end_position();
        format!(
            " {}[{}:{}-{}:{}]{}",
            c.dim, start.row, start.column, end.row, end.column, c.reset
        )
    } else {
        String::new()
    };

    let children: Vec<Node<'_>> = node
        .children()
        .filter(|child| raw || child.is_named() || child.is_missing())
        .collect();

    if children.is_empty() {
        let text = node.utf8_text(source.as_bytes()).unwrap_or("<invalid utf8>");
        let text = format!("{}\"{}\"{}", c.green, escape_string(text), c.reset);
        if node.is_missing() {
            out.push_str(&format!("({label}){span}"));
        } else if label.is_empty() {
            // Anonymous leaf: its text is its kind.
            out.push_str(&format!("({text}){span}"));
        } else {
            out.push_str(&format!("({label} {text}){span}"));
        }
        return;
    }

    out.push_str(&format!("({label}{span}"));
    for child in &children {
        out.push('\n');
        format_node(child, source, depth + 1, raw, spans, colors, out);
    }
    out.push(')');
}

pub fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            c if c.is_control() => result.push_str(&format!("\\u{{{:04x}}}", c as u32)),
            c => result.push(c),
        }
    }
    result
}
