//! Error recovery.
//!
//! Invoked when the lookahead has no action in the current state. Repairs
//! are tried cheapest first:
//!
//! 1. an unrecognized span becomes an `ERROR` leaf and is skipped;
//! 2. the lookahead is deleted (wrapped in an `ERROR` node);
//! 3. a missing token is inserted before the lookahead, possibly the first
//!    of a short run of them;
//! 4. tokens are skipped and stack entries discarded until parsing can
//!    resume; everything discarded becomes one `ERROR` node.
//!
//! A repair is only taken when the tokens after it parse cleanly for
//! [`RecoveryConfig::lookahead_window`](super::RecoveryConfig) tokens (or up
//! to the end of input). Checks run on a copy of the state stack and never
//! touch the real one.

use yaral_core::{END_SYMBOL, ERROR_SYMBOL, StateId, SymbolId};
use yaral_tables::Action;

use super::driver::{Driver, Lookahead, trim_trivia, trivia_leaf};
use super::stack::StackEntry;
use crate::trace::Tracer;
use crate::tree::{Edge, Flags, NodeData};

/// Recoveries without consuming input after which resynchronization must
/// skip at least one token, on top of one per stack entry.
const STALL_LIMIT: usize = 16;

enum Simulated {
    Shifted,
    Accepted,
    Failed,
}

impl<T: Tracer> Driver<'_, T> {
    /// Repair the input at the lookahead. `false` when nothing applies and
    /// the parse has to be wrapped up as is.
    pub(super) fn recover(&mut self) -> bool {
        self.stalls += 1;
        if self.inserted.take().is_some() {
            return true;
        }
        if self.lookahead.token.is_error() {
            self.skip_unrecognized();
            return true;
        }
        if !self.lookahead.token.is_end() && self.try_delete() {
            return true;
        }
        if self.insertions < self.config.max_insertions && self.try_insert() {
            return true;
        }
        self.resync()
    }

    fn skip_unrecognized(&mut self) {
        self.tracer.trace_skip(&self.lookahead.token);
        let state = self.state();
        let leaf = self.take_token(state);
        self.stack.push(StackEntry::extra(state, leaf));
        self.stalls = 0;
    }

    fn try_delete(&mut self) -> bool {
        let window = self.peek(&self.lookahead.token, self.config.lookahead_window);
        if !self.simulate(self.state_stack(), None, &window) {
            return false;
        }
        self.tracer.trace_delete(&self.lookahead.token);
        let state = self.state();
        let leaf = self.take_token(state);
        let error = NodeData::branch(ERROR_SYMBOL, vec![Edge::new(leaf)], state, Flags::default());
        self.stack.push(StackEntry::extra(state, error));
        self.stalls = 0;
        true
    }

    /// Insert the first token of the shortest run of missing tokens (within
    /// the remaining insertion budget) after which the lookahead and the
    /// tokens following it parse.
    fn try_insert(&mut self) -> bool {
        let states = self.state_stack();
        let mut window = vec![self.lookahead.clone()];
        window.extend(self.peek(
            &self.lookahead.token,
            self.config.lookahead_window.saturating_sub(1),
        ));

        let budget = self.config.max_insertions.saturating_sub(self.insertions);
        let Some(symbol) = (1..=budget).find_map(|run| self.insertion(&states, &window, run)) else {
            return false;
        };
        self.tracer.trace_insert(symbol, self.pos);
        self.inserted = Some(symbol);
        self.insertions += 1;
        true
    }

    /// First token of a run of exactly `run` insertions that repairs the
    /// input. String-literal terminals are tried before patterns, then by id.
    fn insertion(&self, states: &[StateId], window: &[Lookahead], run: usize) -> Option<SymbolId> {
        let state = states.last().copied()?;
        let mut candidates: Vec<(bool, SymbolId)> = self
            .tables
            .actions(state)
            .iter()
            .map(|&(symbol, _)| symbol)
            .filter(|&symbol| symbol != END_SYMBOL && !self.tables.is_extra(symbol))
            .map(|symbol| {
                let literal = self.tables.lex_terminal(symbol).is_some_and(|t| t.literal);
                (!literal, symbol)
            })
            .collect();
        candidates.sort_unstable();

        candidates.into_iter().find_map(|(_, symbol)| {
            let mut after = states.to_vec();
            if !matches!(self.simulate_token(&mut after, symbol), Simulated::Shifted) {
                return None;
            }
            let repaired = if run == 1 {
                self.simulate(after, None, window)
            } else {
                self.insertion(&after, window, run - 1).is_some()
            };
            repaired.then_some(symbol)
        })
    }

    /// Find the fewest skipped tokens, then the fewest discarded stack
    /// entries, after which the following window parses.
    fn resync(&mut self) -> bool {
        let states = self.state_stack();
        let forced = self.stalls > self.stack.len() + STALL_LIMIT;
        let span = self.config.lookahead_window.saturating_sub(1);

        let mut skipped: Vec<Lookahead> = Vec::new();
        let mut current = self.lookahead.clone();
        loop {
            if !(forced && skipped.is_empty()) {
                let mut window = vec![current.clone()];
                window.extend(self.peek(&current.token, span));
                let min_depth = usize::from(skipped.is_empty());
                for depth in min_depth..states.len() {
                    let kept = states[..states.len() - depth].to_vec();
                    if self.simulate(kept, None, &window) {
                        self.apply_resync(depth, skipped, current);
                        return true;
                    }
                }
            }
            if current.token.is_end() {
                return false;
            }
            let next = self.scan_at(current.token.end_byte, current.token.end_point);
            skipped.push(std::mem::replace(&mut current, next));
        }
    }

    fn apply_resync(&mut self, depth: usize, skipped: Vec<Lookahead>, next: Lookahead) {
        self.tracer.trace_resync(depth, skipped.len());

        let mut popped = Vec::new();
        let mut remaining = depth;
        while remaining > 0
            && let Some(entry) = self.stack.pop()
        {
            if !entry.extra {
                remaining -= 1;
            }
            popped.push(entry);
        }
        let mut children = Vec::new();
        for entry in popped.into_iter().rev() {
            entry.append_to(&mut children);
        }

        let state = self.state();
        for lookahead in &skipped {
            for token in &lookahead.trivia {
                children.push(Edge::new(trivia_leaf(token, state)));
            }
            let flags = if lookahead.after_trivia() {
                Flags::AFTER_TRIVIA
            } else {
                Flags::default()
            };
            children.push(Edge::new(NodeData::leaf(&lookahead.token, state, flags)));
            self.pos = lookahead.token.end_byte;
            self.point = lookahead.token.end_point;
        }
        if !skipped.is_empty() {
            self.stalls = 0;
        }

        let (leading, children, closing) = trim_trivia(children);
        for edge in leading {
            self.stack.push(StackEntry::extra(state, edge.node));
        }
        if !children.is_empty() {
            let error = NodeData::branch(ERROR_SYMBOL, children, state, Flags::default());
            self.stack.push(StackEntry::extra(state, error));
        }
        for edge in closing {
            self.stack.push(StackEntry::extra(state, edge.node));
        }
        self.lookahead = next;
        self.lookahead.relexed = false;
    }

    /// Run the parse actions for `first` (if any) and then `window` on a
    /// copy of the state stack. Reaching accept counts as success.
    pub(super) fn simulate(
        &self,
        mut states: Vec<StateId>,
        first: Option<SymbolId>,
        window: &[Lookahead],
    ) -> bool {
        let lookaheads = window.iter().map(Some);
        for lookahead in std::iter::once(None).chain(lookaheads) {
            let symbol = match (lookahead, first) {
                (Some(lookahead), _) => self.simulated_kind(&states, lookahead),
                (None, Some(symbol)) => symbol,
                (None, None) => continue,
            };
            match self.simulate_token(&mut states, symbol) {
                Simulated::Shifted => {}
                Simulated::Accepted => return true,
                Simulated::Failed => return false,
            }
        }
        true
    }

    /// Kind of `lookahead` when read in the top state, re-reading it the
    /// way the parser would when its first reading has no action.
    fn simulated_kind(&self, states: &[StateId], lookahead: &Lookahead) -> SymbolId {
        let token = &lookahead.token;
        let state = states.last().copied().unwrap_or(0);
        if token.is_end() || token.is_error() || self.tables.action(state, token.kind).is_some() {
            return token.kind;
        }
        let tables = self.tables;
        let relexed = self.lexer.lex_filtered(
            token.start_byte,
            token.start_point,
            lookahead.after_trivia(),
            |symbol| tables.action(state, symbol).is_some(),
        );
        if relexed.is_error() || relexed.end_byte != token.end_byte {
            token.kind
        } else {
            relexed.kind
        }
    }

    fn simulate_token(&self, states: &mut Vec<StateId>, symbol: SymbolId) -> Simulated {
        loop {
            let Some(&state) = states.last() else {
                return Simulated::Failed;
            };
            match self.tables.action(state, symbol) {
                Some(Action::Shift(next)) => {
                    states.push(next);
                    return Simulated::Shifted;
                }
                Some(Action::Reduce(id)) => {
                    let production = self.tables.production(id);
                    if production.len() >= states.len() {
                        return Simulated::Failed;
                    }
                    states.truncate(states.len() - production.len());
                    let below = states.last().copied().unwrap_or(0);
                    let Some(next) = self.tables.goto(below, production.lhs) else {
                        return Simulated::Failed;
                    };
                    states.push(next);
                }
                Some(Action::Accept) => return Simulated::Accepted,
                None => return Simulated::Failed,
            }
        }
    }
}
