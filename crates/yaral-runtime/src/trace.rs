//! Parser instrumentation.
//!
//! The parser is generic over [`Tracer`]. [`NoopTracer`] has empty inline
//! methods and compiles away; [`PrintTracer`] collects one formatted line per
//! event for `parse --trace`.

use yaral_core::{Colors, ProductionId, StateId, SymbolId};

use crate::Language;
use crate::lexer::Token;

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Shifts, reduces, reuse and recovery. Kinds only.
    #[default]
    Default,
    /// Also every scanned token, trivia included.
    Verbose,
    /// Also token text.
    VeryVerbose,
}

/// Observer of parser decisions. Every method receives raw ids; names are
/// resolved by the implementation.
pub trait Tracer {
    /// A token was scanned (trivia included).
    fn trace_lex(&mut self, token: &Token);

    /// `token` was shifted in `state`, moving to `next`.
    fn trace_shift(&mut self, state: StateId, token: &Token, next: StateId);

    /// A missing token was shifted.
    fn trace_shift_missing(&mut self, state: StateId, symbol: SymbolId, next: StateId);

    fn trace_reduce(
        &mut self,
        production: ProductionId,
        lhs: SymbolId,
        children: usize,
        next: StateId,
    );

    /// A subtree of the previous tree was pushed whole.
    fn trace_reuse(&mut self, symbol: SymbolId, start_byte: usize, end_byte: usize);

    /// The lookahead was re-read with only the terminals valid in the state.
    fn trace_relex(&mut self, from: SymbolId, to: SymbolId);

    /// An unrecognized span was skipped as an error.
    fn trace_skip(&mut self, token: &Token);

    /// A token was deleted by recovery.
    fn trace_delete(&mut self, token: &Token);

    /// A missing token was inserted by recovery.
    fn trace_insert(&mut self, symbol: SymbolId, byte: usize);

    /// Recovery discarded `popped` stack entries and `skipped` tokens.
    fn trace_resync(&mut self, popped: usize, skipped: usize);

    fn trace_accept(&mut self);
}

/// Tracer that does nothing.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_lex(&mut self, _token: &Token) {}

    #[inline(always)]
    fn trace_shift(&mut self, _state: StateId, _token: &Token, _next: StateId) {}

    #[inline(always)]
    fn trace_shift_missing(&mut self, _state: StateId, _symbol: SymbolId, _next: StateId) {}

    #[inline(always)]
    fn trace_reduce(
        &mut self,
        _production: ProductionId,
        _lhs: SymbolId,
        _children: usize,
        _next: StateId,
    ) {
    }

    #[inline(always)]
    fn trace_reuse(&mut self, _symbol: SymbolId, _start_byte: usize, _end_byte: usize) {}

    #[inline(always)]
    fn trace_relex(&mut self, _from: SymbolId, _to: SymbolId) {}

    #[inline(always)]
    fn trace_skip(&mut self, _token: &Token) {}

    #[inline(always)]
    fn trace_delete(&mut self, _token: &Token) {}

    #[inline(always)]
    fn trace_insert(&mut self, _symbol: SymbolId, _byte: usize) {}

    #[inline(always)]
    fn trace_resync(&mut self, _popped: usize, _skipped: usize) {}

    #[inline(always)]
    fn trace_accept(&mut self) {}
}

/// Tracer that collects formatted lines.
pub struct PrintTracer<'s> {
    source: &'s str,
    language: Language,
    verbosity: Verbosity,
    colors: Colors,
    lines: Vec<String>,
}

impl<'s> PrintTracer<'s> {
    pub fn new(
        source: &'s str,
        language: &Language,
        verbosity: Verbosity,
        colors: Colors,
    ) -> Self {
        Self {
            source,
            language: language.clone(),
            verbosity,
            colors,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn into_lines(self) -> Vec<String> {
        self.lines
    }

    pub fn print(&self) {
        for line in &self.lines {
            println!("{line}");
        }
    }

    fn kind(&self, symbol: SymbolId) -> String {
        let name = self.language.symbol_name(symbol);
        let c = &self.colors;
        if self.language.node_kind_is_named(symbol) {
            format!("{}{name}{}", c.blue, c.reset)
        } else {
            format!("{}\"{name}\"{}", c.blue, c.reset)
        }
    }

    fn token(&self, token: &Token) -> String {
        let c = &self.colors;
        let mut out = format!(
            "{} {}{}..{}{}",
            self.kind(token.kind),
            c.dim,
            token.start_byte,
            token.end_byte,
            c.reset
        );
        if self.verbosity == Verbosity::VeryVerbose {
            let text = self.source.get(token.start_byte..token.end_byte).unwrap_or("");
            out.push_str(&format!(" {}{:?}{}", c.green, text, c.reset));
        }
        out
    }

    fn push(&mut self, label: &str, detail: String) {
        let c = &self.colors;
        self.lines.push(format!("{}{label:<8}{} {detail}", c.dim, c.reset));
    }

    fn push_error(&mut self, label: &str, detail: String) {
        let c = &self.colors;
        self.lines.push(format!("{}{label:<8}{} {detail}", c.red, c.reset));
    }
}

impl Tracer for PrintTracer<'_> {
    fn trace_lex(&mut self, token: &Token) {
        if self.verbosity != Verbosity::Default {
            let detail = self.token(token);
            self.push("lex", detail);
        }
    }

    fn trace_shift(&mut self, state: StateId, token: &Token, next: StateId) {
        let detail = format!("{} {state} -> {next}", self.token(token));
        self.push("shift", detail);
    }

    fn trace_shift_missing(&mut self, state: StateId, symbol: SymbolId, next: StateId) {
        let detail = format!("{} {state} -> {next}", self.kind(symbol));
        self.push_error("missing", detail);
    }

    fn trace_reduce(
        &mut self,
        production: ProductionId,
        lhs: SymbolId,
        children: usize,
        next: StateId,
    ) {
        let detail = format!(
            "{} ({children} children, production {production}) -> {next}",
            self.kind(lhs)
        );
        self.push("reduce", detail);
    }

    fn trace_reuse(&mut self, symbol: SymbolId, start_byte: usize, end_byte: usize) {
        let detail = format!("{} {start_byte}..{end_byte}", self.kind(symbol));
        self.push("reuse", detail);
    }

    fn trace_relex(&mut self, from: SymbolId, to: SymbolId) {
        let detail = format!("{} as {}", self.kind(from), self.kind(to));
        self.push("relex", detail);
    }

    fn trace_skip(&mut self, token: &Token) {
        let detail = self.token(token);
        self.push_error("skip", detail);
    }

    fn trace_delete(&mut self, token: &Token) {
        let detail = self.token(token);
        self.push_error("delete", detail);
    }

    fn trace_insert(&mut self, symbol: SymbolId, byte: usize) {
        let detail = format!("{} at {byte}", self.kind(symbol));
        self.push_error("insert", detail);
    }

    fn trace_resync(&mut self, popped: usize, skipped: usize) {
        self.push_error("resync", format!("popped {popped}, skipped {skipped}"));
    }

    fn trace_accept(&mut self) {
        self.push("accept", String::new());
    }
}
