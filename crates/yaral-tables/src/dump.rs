//! Human-readable summary of loaded tables.

use std::fmt::Write as _;

use yaral_core::Colors;

use crate::tables::{Action, SymbolKind, Tables};

/// Render symbols, fields, productions and per-state action counts.
pub fn dump(tables: &Tables, colors: Colors) -> String {
    let mut out = String::new();
    let c = colors;
    let data = tables.data();

    let _ = writeln!(out, "{}[grammar]{} {}", c.dim, c.reset, data.name);
    let _ = writeln!(
        out,
        "symbols={} fields={} productions={} states={} terminals={}",
        data.symbols.len(),
        data.fields.len(),
        data.productions.len(),
        data.states.len(),
        data.terminals.len()
    );

    let _ = writeln!(out, "\n{}[symbols]{}", c.dim, c.reset);
    let width = width_for_count(data.symbols.len());
    for (id, symbol) in data.symbols.iter().enumerate() {
        let role = match symbol.kind {
            SymbolKind::End => "end",
            SymbolKind::Terminal => "terminal",
            SymbolKind::Extra => "extra",
            SymbolKind::Nonterminal => "rule",
            SymbolKind::Auxiliary => "aux",
            SymbolKind::Alias => "alias",
        };
        let name = if symbol.named {
            format!("{}{}{}", c.blue, symbol.name, c.reset)
        } else {
            format!("{}{:?}{}", c.green, symbol.name, c.reset)
        };
        let hidden = if symbol.visible { "" } else { " hidden" };
        let _ = writeln!(out, "{id:>width$} {name} {}{role}{hidden}{}", c.dim, c.reset);
    }

    if !data.fields.is_empty() {
        let _ = writeln!(out, "\n{}[fields]{}", c.dim, c.reset);
        for (i, field) in data.fields.iter().enumerate() {
            let _ = writeln!(out, "{:>width$} {field}", i + 1);
        }
    }

    let _ = writeln!(out, "\n{}[productions]{}", c.dim, c.reset);
    let width = width_for_count(data.productions.len());
    for (id, production) in data.productions.iter().enumerate() {
        let _ = write!(out, "{id:>width$} {} →", tables.symbol_name(production.lhs));
        if production.is_empty() {
            let _ = write!(out, " ε");
        }
        for step in &production.steps {
            if let Some(field) = step.field.and_then(|f| tables.field_name(f)) {
                let _ = write!(out, " {}{field}:{}", c.dim, c.reset);
            }
            if let Some(alias) = step.alias {
                let _ = write!(out, " @{}", tables.symbol_name(alias));
            } else {
                let _ = write!(out, " _");
            }
        }
        out.push('\n');
    }

    let _ = writeln!(out, "\n{}[states]{}", c.dim, c.reset);
    let width = width_for_count(data.states.len());
    for (id, state) in data.states.iter().enumerate() {
        let shifts = count(&state.actions, |a| matches!(a, Action::Shift(_)));
        let reduces = count(&state.actions, |a| matches!(a, Action::Reduce(_)));
        let accept = if count(&state.actions, |a| matches!(a, Action::Accept)) > 0 {
            " accept"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "{}{id:>width$}{} shift={shifts} reduce={reduces} goto={}{accept}",
            c.blue,
            c.reset,
            state.gotos.len()
        );
    }

    out
}

fn count(actions: &[(u16, Action)], pred: impl Fn(&Action) -> bool) -> usize {
    actions.iter().filter(|(_, a)| pred(a)).count()
}

/// Digits needed to print indices below `count`.
fn width_for_count(count: usize) -> usize {
    count.saturating_sub(1).max(1).ilog10() as usize + 1
}
