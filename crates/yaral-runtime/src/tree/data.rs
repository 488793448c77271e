//! Shared, immutable node storage.

use std::sync::Arc;

use yaral_core::{ERROR_SYMBOL, FieldId, Point, StateId, SymbolId};

use crate::lexer::Token;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Flags(u8);

impl Flags {
    pub const ERROR: Self = Self(1);
    pub const MISSING: Self = Self(1 << 1);
    pub const HAS_ERROR: Self = Self(1 << 2);
    pub const EXTRA: Self = Self(1 << 3);
    /// Trivia directly precedes the first token.
    pub const AFTER_TRIVIA: Self = Self(1 << 4);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn with(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Child slot of a node: the child plus what the parent's production says
/// about it.
#[derive(Clone, Debug)]
pub(crate) struct Edge {
    pub node: Arc<NodeData>,
    pub field: Option<FieldId>,
    pub alias: Option<SymbolId>,
}

impl Edge {
    pub fn new(node: Arc<NodeData>) -> Self {
        Self {
            node,
            field: None,
            alias: None,
        }
    }
}

/// Node contents. Positions are relative: a node knows its size, never its
/// offset, so a subtree can be shared by trees where it sits elsewhere.
#[derive(Debug)]
pub(crate) struct NodeData {
    pub symbol: SymbolId,
    pub size: usize,
    /// Rows and trailing column covered, as a point measured from zero.
    pub extent: Point,
    /// Bytes past the end that the lexer examined while producing this node.
    pub lookahead: usize,
    pub flags: Flags,
    /// Parse state in which the first token was shifted.
    pub pre_state: StateId,
    pub children: Box<[Edge]>,
}

impl NodeData {
    pub fn leaf(token: &Token, pre_state: StateId, flags: Flags) -> Arc<Self> {
        let mut flags = flags;
        if token.kind == ERROR_SYMBOL {
            flags = flags.with(Flags::ERROR).with(Flags::HAS_ERROR);
        }
        Arc::new(Self {
            symbol: token.kind,
            size: token.len(),
            extent: extent_between(token.start_point, token.end_point),
            lookahead: token.lookahead_end - token.end_byte,
            flags,
            pre_state,
            children: Box::new([]),
        })
    }

    /// Zero-width leaf standing in for a token the input lacks.
    pub fn missing(symbol: SymbolId, pre_state: StateId) -> Arc<Self> {
        Arc::new(Self {
            symbol,
            size: 0,
            extent: Point::ZERO,
            lookahead: 0,
            flags: Flags::MISSING.with(Flags::HAS_ERROR),
            pre_state,
            children: Box::new([]),
        })
    }

    /// Interior node over `children`; size, extent and lookahead are derived.
    pub fn branch(
        symbol: SymbolId,
        children: Vec<Edge>,
        pre_state: StateId,
        flags: Flags,
    ) -> Arc<Self> {
        let mut size = 0;
        let mut extent = Point::ZERO;
        let mut reach = 0;
        let mut flags = flags;
        for edge in &children {
            let child = &edge.node;
            reach = reach.max(size + child.size + child.lookahead);
            size += child.size;
            extent = extent.offset_by(child.extent);
            if child.flags.contains(Flags::HAS_ERROR) {
                flags = flags.with(Flags::HAS_ERROR);
            }
        }
        if let Some(first) = children.iter().find(|edge| edge.node.size > 0)
            && first.node.flags.contains(Flags::AFTER_TRIVIA)
        {
            flags = flags.with(Flags::AFTER_TRIVIA);
        }
        if symbol == ERROR_SYMBOL {
            flags = flags.with(Flags::ERROR).with(Flags::HAS_ERROR);
        }
        Arc::new(Self {
            symbol,
            size,
            extent,
            lookahead: reach - size,
            flags,
            pre_state,
            children: children.into_boxed_slice(),
        })
    }

    pub fn is_error(&self) -> bool {
        self.flags.contains(Flags::ERROR)
    }

    pub fn is_missing(&self) -> bool {
        self.flags.contains(Flags::MISSING)
    }

    pub fn is_extra(&self) -> bool {
        self.flags.contains(Flags::EXTRA)
    }

    pub fn has_error(&self) -> bool {
        self.flags.contains(Flags::HAS_ERROR)
    }

    /// Deep comparison of kinds, sizes, markers and children. Parse-time
    /// bookkeeping (states, lookahead) is ignored.
    pub fn same_structure(&self, other: &Self) -> bool {
        self.symbol == other.symbol
            && self.size == other.size
            && self.is_error() == other.is_error()
            && self.is_missing() == other.is_missing()
            && self.is_extra() == other.is_extra()
            && self.children.len() == other.children.len()
            && self.children.iter().zip(other.children.iter()).all(|(a, b)| {
                a.field == b.field && a.alias == b.alias && a.node.same_structure(&b.node)
            })
    }
}

/// Distance from `start` to `end` expressed as an extent.
pub(crate) fn extent_between(start: Point, end: Point) -> Point {
    if end.row == start.row {
        Point::new(0, end.column - start.column)
    } else {
        Point::new(end.row - start.row, end.column)
    }
}
