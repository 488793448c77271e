use std::sync::Arc;

use yaral_core::{StateId, SymbolId};

use crate::tree::{Edge, NodeData};

/// What a stack entry contributes to its parent.
pub(super) enum Subtree {
    Node(Arc<NodeData>),
    /// Children of a hidden or helper nonterminal, inlined into the parent.
    Spliced(Vec<Edge>),
}

pub(super) struct StackEntry {
    /// State after pushing this entry. Extras repeat the state beneath them.
    pub state: StateId,
    pub symbol: SymbolId,
    /// State the entry's first token was parsed in.
    pub pre_state: StateId,
    pub subtree: Subtree,
    /// Trivia or error nodes. Not counted by reductions.
    pub extra: bool,
}

impl StackEntry {
    pub fn node(state: StateId, node: Arc<NodeData>) -> Self {
        Self {
            state,
            symbol: node.symbol,
            pre_state: node.pre_state,
            subtree: Subtree::Node(node),
            extra: false,
        }
    }

    pub fn extra(state: StateId, node: Arc<NodeData>) -> Self {
        Self {
            extra: true,
            ..Self::node(state, node)
        }
    }

    pub fn spliced(state: StateId, symbol: SymbolId, pre_state: StateId, edges: Vec<Edge>) -> Self {
        Self {
            state,
            symbol,
            pre_state,
            subtree: Subtree::Spliced(edges),
            extra: false,
        }
    }

    pub fn append_to(self, edges: &mut Vec<Edge>) {
        match self.subtree {
            Subtree::Node(node) => edges.push(Edge::new(node)),
            Subtree::Spliced(children) => edges.extend(children),
        }
    }
}
