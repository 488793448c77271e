//! The shift/reduce loop.

use std::sync::Arc;

use yaral_core::{ERROR_SYMBOL, Point, ProductionId, StateId, SymbolId};
use yaral_tables::{Action, Tables};

use super::RecoveryConfig;
use super::reuse::ReuseIndex;
use super::stack::{StackEntry, Subtree};
use crate::Language;
use crate::lexer::{Lexer, Token};
use crate::trace::Tracer;
use crate::tree::{Edge, Flags, NodeData};

/// Next significant token plus the trivia scanned before it. Trivia stay
/// here until the token is consumed, so they never end up at the edge of a
/// reduced node.
#[derive(Clone, Debug)]
pub(super) struct Lookahead {
    pub trivia: Vec<Token>,
    pub token: Token,
    /// Already re-read in the context of the current state.
    pub relexed: bool,
}

impl Lookahead {
    pub fn after_trivia(&self) -> bool {
        !self.trivia.is_empty()
    }

    fn leaf_flags(&self) -> Flags {
        if self.after_trivia() {
            Flags::AFTER_TRIVIA
        } else {
            Flags::default()
        }
    }
}

pub(super) struct Driver<'a, T: Tracer> {
    pub(super) tables: &'a Tables,
    pub(super) lexer: Lexer<'a>,
    pub(super) config: &'a RecoveryConfig,
    pub(super) tracer: &'a mut T,
    pub(super) stack: Vec<StackEntry>,
    /// End of the consumed input.
    pub(super) pos: usize,
    pub(super) point: Point,
    pub(super) lookahead: Lookahead,
    /// Missing token to shift instead of the lookahead.
    pub(super) inserted: Option<SymbolId>,
    /// Missing tokens inserted since the last real shift.
    pub(super) insertions: usize,
    /// Recoveries since input was last consumed.
    pub(super) stalls: usize,
    pub(super) reuse: Option<ReuseIndex>,
}

impl<'a, T: Tracer> Driver<'a, T> {
    pub fn new(
        language: &'a Language,
        text: &'a str,
        config: &'a RecoveryConfig,
        tracer: &'a mut T,
        reuse: Option<ReuseIndex>,
    ) -> Self {
        let tables = language.tables();
        let lexer = Lexer::with_tables(tables, text);
        let lookahead = scan_lookahead(&lexer, tables, 0, Point::ZERO);
        let mut driver = Self {
            tables,
            lexer,
            config,
            tracer,
            stack: Vec::new(),
            pos: 0,
            point: Point::ZERO,
            lookahead,
            inserted: None,
            insertions: 0,
            stalls: 0,
            reuse,
        };
        driver.trace_lookahead();
        driver
    }

    pub fn run(mut self) -> Arc<NodeData> {
        loop {
            if self.inserted.is_none() && self.try_reuse() {
                continue;
            }
            let state = self.state();
            let kind = self.inserted.unwrap_or(self.lookahead.token.kind);
            match self.tables.action(state, kind) {
                Some(Action::Shift(next)) => self.shift(state, next),
                Some(Action::Reduce(production)) => {
                    if !self.reduce(production) {
                        return self.fallback();
                    }
                }
                Some(Action::Accept) => return self.accept(),
                None => {
                    if self.inserted.is_none() && self.relex(state) {
                        continue;
                    }
                    if !self.recover() {
                        return self.fallback();
                    }
                }
            }
        }
    }

    pub(super) fn state(&self) -> StateId {
        self.stack.last().map_or(0, |entry| entry.state)
    }

    pub(super) fn scan_at(&self, from: usize, point: Point) -> Lookahead {
        scan_lookahead(&self.lexer, self.tables, from, point)
    }

    /// Up to `count` lookaheads following `after`, stopping after the end of
    /// input.
    pub(super) fn peek(&self, after: &Token, count: usize) -> Vec<Lookahead> {
        let mut window = Vec::with_capacity(count);
        let mut last = *after;
        while window.len() < count && !last.is_end() {
            let next = self.scan_at(last.end_byte, last.end_point);
            last = next.token;
            window.push(next);
        }
        window
    }

    pub(super) fn trace_lookahead(&mut self) {
        for trivia in &self.lookahead.trivia {
            self.tracer.trace_lex(trivia);
        }
        self.tracer.trace_lex(&self.lookahead.token);
    }

    /// Consume the lookahead: push its trivia, read the next lookahead and
    /// return the token as a leaf.
    pub(super) fn take_token(&mut self, state: StateId) -> Arc<NodeData> {
        let end = self.lookahead.token.end_byte;
        let end_point = self.lookahead.token.end_point;
        let next = self.scan_at(end, end_point);
        let consumed = std::mem::replace(&mut self.lookahead, next);
        self.trace_lookahead();
        self.pos = end;
        self.point = end_point;
        let leaf = NodeData::leaf(&consumed.token, state, consumed.leaf_flags());
        self.push_trivia(consumed.trivia);
        leaf
    }

    pub(super) fn push_trivia(&mut self, trivia: Vec<Token>) {
        let state = self.state();
        for token in &trivia {
            self.stack.push(StackEntry::extra(state, trivia_leaf(token, state)));
        }
    }

    /// Stack states of the significant entries, bottom first, starting
    /// with the initial state.
    pub(super) fn state_stack(&self) -> Vec<StateId> {
        std::iter::once(0)
            .chain(
                self.stack
                    .iter()
                    .filter(|entry| !entry.extra)
                    .map(|entry| entry.state),
            )
            .collect()
    }

    fn shift(&mut self, state: StateId, next: StateId) {
        if let Some(symbol) = self.inserted.take() {
            self.tracer.trace_shift_missing(state, symbol, next);
            self.stack
                .push(StackEntry::node(next, NodeData::missing(symbol, state)));
            return;
        }
        self.insertions = 0;
        self.stalls = 0;
        self.tracer.trace_shift(state, &self.lookahead.token, next);
        let leaf = self.take_token(state);
        self.stack.push(StackEntry::node(next, leaf));
    }

    fn reduce(&mut self, id: ProductionId) -> bool {
        let tables = self.tables;
        let production = tables.production(id);

        // Extras on top stay outside the new node.
        let mut top = self.stack.len();
        while top > 0 && self.stack[top - 1].extra {
            top -= 1;
        }
        let mut first = top;
        let mut remaining = production.len();
        while remaining > 0 {
            if first == 0 {
                return false;
            }
            first -= 1;
            if !self.stack[first].extra {
                remaining -= 1;
            }
        }
        let pre_state = first.checked_sub(1).map_or(0, |below| self.stack[below].state);
        let lhs = production.lhs;
        let Some(next) = tables.goto(pre_state, lhs) else {
            return false;
        };

        let trailing: Vec<StackEntry> = self.stack.drain(top..).collect();
        let popped: Vec<StackEntry> = self.stack.drain(first..).collect();
        let mut children = Vec::new();
        let mut steps = production.steps.iter();
        for entry in popped {
            if entry.extra {
                entry.append_to(&mut children);
                continue;
            }
            let step = steps.next().copied().unwrap_or_default();
            match entry.subtree {
                Subtree::Node(node) => children.push(Edge {
                    node,
                    field: step.field,
                    alias: step.alias,
                }),
                Subtree::Spliced(edges) => match step.alias {
                    Some(alias) => {
                        let (leading, edges, closing) = trim_trivia(edges);
                        let flags = Flags::default();
                        let node = NodeData::branch(entry.symbol, edges, entry.pre_state, flags);
                        children.extend(leading);
                        children.push(Edge {
                            node,
                            field: step.field,
                            alias: Some(alias),
                        });
                        children.extend(closing);
                    }
                    None => children.extend(edges.into_iter().map(|mut edge| {
                        if edge.field.is_none() && !edge.node.is_extra() {
                            edge.field = step.field;
                        }
                        edge
                    })),
                },
            }
        }

        self.tracer.trace_reduce(id, lhs, production.len(), next);
        if tables.is_visible(lhs) {
            let (leading, children, closing) = trim_trivia(children);
            self.stack.extend(
                leading
                    .into_iter()
                    .map(|edge| StackEntry::extra(pre_state, edge.node)),
            );
            let node = NodeData::branch(lhs, children, pre_state, Flags::default());
            self.stack.push(StackEntry::node(next, node));
            self.stack.extend(
                closing
                    .into_iter()
                    .map(|edge| StackEntry::extra(next, edge.node)),
            );
        } else {
            self.stack
                .push(StackEntry::spliced(next, lhs, pre_state, children));
        }
        for mut extra in trailing {
            extra.state = next;
            self.stack.push(extra);
        }
        true
    }

    /// Re-read the lookahead considering only terminals valid in `state`.
    fn relex(&mut self, state: StateId) -> bool {
        let lookahead = &self.lookahead;
        if lookahead.relexed || lookahead.token.is_end() || lookahead.token.is_error() {
            return false;
        }
        let tables = self.tables;
        let token = self.lexer.lex_filtered(
            lookahead.token.start_byte,
            lookahead.token.start_point,
            lookahead.after_trivia(),
            |symbol| tables.action(state, symbol).is_some(),
        );
        self.lookahead.relexed = true;
        if token.is_error() || token.kind == self.lookahead.token.kind {
            return false;
        }
        self.tracer.trace_relex(self.lookahead.token.kind, token.kind);
        self.lookahead.token = token;
        true
    }

    fn accept(mut self) -> Arc<NodeData> {
        self.tracer.trace_accept();
        let start = self.tables.start_symbol();
        let mut children = Vec::new();
        for entry in std::mem::take(&mut self.stack) {
            if !entry.extra
                && entry.symbol == start
                && let Subtree::Node(node) = &entry.subtree
            {
                children.extend(node.children.iter().cloned());
                continue;
            }
            entry.append_to(&mut children);
        }
        for token in &self.lookahead.trivia {
            children.push(Edge::new(trivia_leaf(token, 0)));
        }
        NodeData::branch(start, children, 0, Flags::default())
    }

    /// Last resort: keep everything parsed so far and put the rest of the
    /// input into a trailing `ERROR` node.
    fn fallback(mut self) -> Arc<NodeData> {
        let mut children = Vec::new();
        for entry in std::mem::take(&mut self.stack) {
            entry.append_to(&mut children);
        }

        let mut rest = Vec::new();
        let mut skipped = 0;
        let mut lookahead = self.lookahead.clone();
        loop {
            for token in &lookahead.trivia {
                rest.push(Edge::new(trivia_leaf(token, 0)));
            }
            if lookahead.token.is_end() {
                break;
            }
            rest.push(Edge::new(NodeData::leaf(
                &lookahead.token,
                0,
                lookahead.leaf_flags(),
            )));
            skipped += 1;
            lookahead = self.scan_at(lookahead.token.end_byte, lookahead.token.end_point);
        }
        self.tracer.trace_resync(0, skipped);

        let (leading, rest, closing) = trim_trivia(rest);
        children.extend(leading);
        if skipped > 0 {
            let error = NodeData::branch(ERROR_SYMBOL, rest, 0, Flags::default());
            children.push(Edge::new(error));
        }
        children.extend(closing);
        NodeData::branch(self.tables.start_symbol(), children, 0, Flags::default())
    }
}

/// Split `children` into leading trivia, the significant middle and
/// trailing trivia. A node starts and ends with its significant children;
/// trivia at either end belong to the enclosing node.
pub(super) fn trim_trivia(mut children: Vec<Edge>) -> (Vec<Edge>, Vec<Edge>, Vec<Edge>) {
    let start = children
        .iter()
        .position(|edge| !edge.node.is_extra())
        .unwrap_or(children.len());
    let end = children
        .iter()
        .rposition(|edge| !edge.node.is_extra())
        .map_or(start, |last| last + 1);
    let closing = children.split_off(end);
    let middle = children.split_off(start);
    (children, middle, closing)
}

pub(super) fn trivia_leaf(token: &Token, state: StateId) -> Arc<NodeData> {
    NodeData::leaf(token, state, Flags::EXTRA)
}

fn scan_lookahead(lexer: &Lexer<'_>, tables: &Tables, from: usize, point: Point) -> Lookahead {
    let mut trivia: Vec<Token> = Vec::new();
    let mut at = from;
    let mut point = point;
    loop {
        let token = lexer.lex(at, point, !trivia.is_empty());
        if tables.is_extra(token.kind) && !token.is_empty() {
            at = token.end_byte;
            point = token.end_point;
            trivia.push(token);
            continue;
        }
        return Lookahead {
            trivia,
            token,
            relexed: false,
        };
    }
}
