//! Incremental reuse of subtrees from the previous tree.
//!
//! A node of the old tree is pushed whole when the parser reaches its new
//! start offset in the same state it was originally parsed in. That is only
//! sound when nothing the parser looked at while building it changed: the
//! node's bytes and the bytes its last token's lookahead inspected. The
//! range checked therefore extends up to the end of the lookahead of the
//! token following the node, which also pins the kind of that token.
//!
//! Nodes touching an error region of the old tree are never reused, even
//! when they are error-free themselves. Recovery there may have reduced
//! them on a repaired lookahead or popped them into an `ERROR` node, so
//! a fresh parse of the same bytes can split them differently.

use std::collections::BTreeMap;
use std::sync::Arc;

use yaral_tables::Tables;

use super::driver::Driver;
use super::stack::StackEntry;
use crate::trace::Tracer;
use crate::tree::{EditMap, Flags, NodeData};
use crate::{Language, Tree};

/// Reusable nodes keyed by start offset in the new text. At one offset,
/// outer nodes come first.
pub(super) struct ReuseIndex {
    by_start: BTreeMap<usize, Vec<Arc<NodeData>>>,
}

impl ReuseIndex {
    /// `None` when `tree` cannot contribute: another language, or no edits
    /// recorded although the text length changed.
    pub fn build(tree: &Tree, language: &Language, new_len: usize) -> Option<Self> {
        if tree.language() != language {
            return None;
        }
        let unedited;
        let edits = match tree.edit_map() {
            Some(edits) => edits,
            None if tree.source_len() == new_len => {
                unedited = EditMap::identity(new_len);
                &unedited
            }
            None => return None,
        };

        let root = tree.root_data();
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        collect_tokens(root, 0, &mut tokens, &mut errors);
        let mut builder = Builder {
            tables: language.tables(),
            edits,
            tokens,
            errors,
            end_of_input: root.size + 1,
            by_start: BTreeMap::new(),
        };
        let mut offset = 0;
        for edge in root.children.iter() {
            builder.visit(&edge.node, offset);
            offset += edge.node.size;
        }
        Some(Self {
            by_start: builder.by_start,
        })
    }

    fn at(&self, start: usize) -> &[Arc<NodeData>] {
        self.by_start.get(&start).map_or(&[], Vec::as_slice)
    }
}

struct Builder<'a> {
    tables: &'a Tables,
    edits: &'a EditMap,
    /// Start and lookahead end of every significant token, in order.
    tokens: Vec<(usize, usize)>,
    /// Byte ranges of `ERROR` and `MISSING` nodes, by start.
    errors: Vec<(usize, usize)>,
    end_of_input: usize,
    by_start: BTreeMap<usize, Vec<Arc<NodeData>>>,
}

impl Builder<'_> {
    fn visit(&mut self, node: &Arc<NodeData>, start: usize) {
        if self.is_candidate(node) {
            let end = start + node.size;
            let next = self.tokens.partition_point(|&(token_start, _)| token_start < end);
            let follow_end = self
                .tokens
                .get(next)
                .map_or(self.end_of_input, |&(_, lookahead_end)| lookahead_end);
            let reach = follow_end.max(end + node.lookahead);
            if !self.touches_error(start, reach)
                && let Some(new_start) = self.edits.translate(start, reach)
            {
                self.by_start
                    .entry(new_start)
                    .or_default()
                    .push(Arc::clone(node));
            }
        }
        let mut offset = start;
        for edge in node.children.iter() {
            self.visit(&edge.node, offset);
            offset += edge.node.size;
        }
    }

    /// Some error region overlaps or borders `start..reach`.
    fn touches_error(&self, start: usize, reach: usize) -> bool {
        let before_reach = self.errors.partition_point(|&(error_start, _)| error_start <= reach);
        self.errors[..before_reach]
            .iter()
            .any(|&(_, error_end)| error_end >= start)
    }

    fn is_candidate(&self, node: &NodeData) -> bool {
        !node.children.is_empty()
            && node.size > 0
            && !node.has_error()
            && !node.is_extra()
            && self.tables.is_visible(node.symbol)
            && !self.tables.is_terminal(node.symbol)
    }
}

fn collect_tokens(
    node: &NodeData,
    start: usize,
    tokens: &mut Vec<(usize, usize)>,
    errors: &mut Vec<(usize, usize)>,
) {
    if node.is_error() || node.is_missing() {
        errors.push((start, start + node.size));
    }
    if node.children.is_empty() {
        if node.size > 0 && !node.is_extra() {
            tokens.push((start, start + node.size + node.lookahead));
        }
        return;
    }
    let mut offset = start;
    for edge in node.children.iter() {
        collect_tokens(&edge.node, offset, tokens, errors);
        offset += edge.node.size;
    }
}

impl<T: Tracer> Driver<'_, T> {
    /// Push a node of the previous tree in place of parsing it again.
    pub(super) fn try_reuse(&mut self) -> bool {
        let Some(index) = &self.reuse else {
            return false;
        };
        let token = self.lookahead.token;
        if token.is_end() {
            return false;
        }
        let state = self.state();
        let after_trivia = self.lookahead.after_trivia();
        let tables = self.tables;
        let found = index.at(token.start_byte).iter().find_map(|node| {
            let fits = node.pre_state == state
                && node.flags.contains(Flags::AFTER_TRIVIA) == after_trivia;
            let next = tables.goto(state, node.symbol).filter(|_| fits)?;
            Some((Arc::clone(node), next))
        });
        let Some((node, next)) = found else {
            return false;
        };

        let end = token.start_byte + node.size;
        let end_point = token.start_point.offset_by(node.extent);
        self.tracer.trace_reuse(node.symbol, token.start_byte, end);
        let following = self.scan_at(end, end_point);
        let consumed = std::mem::replace(&mut self.lookahead, following);
        self.push_trivia(consumed.trivia);
        self.stack.push(StackEntry::node(next, node));
        self.pos = end;
        self.point = end_point;
        self.insertions = 0;
        self.stalls = 0;
        self.trace_lookahead();
        true
    }
}
