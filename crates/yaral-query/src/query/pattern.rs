//! Patterns resolved against a language, ready for matching.

use yaral_core::{FieldId, SymbolId};

/// Index into the query's capture name table.
pub type CaptureId = u32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// The node must sit in this field of its parent.
    pub field: Option<FieldId>,
    pub test: Test,
    pub captures: Vec<CaptureId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Test {
    /// `_`: any node.
    Any,
    /// `(kind ...)`, or `(_ ...)` with no kind.
    Named {
        kind: Option<SymbolId>,
        /// Matched in order against the node's children, with skipping.
        children: Vec<Element>,
        /// `!field`
        absent: Vec<FieldId>,
    },
    /// `"text"`
    Anonymous(SymbolId),
    /// `(ERROR)`
    Error,
    /// `(MISSING)` with an optional kind.
    Missing(Option<SymbolId>),
    /// `[a b ...]`: the first branch that matches.
    Alternation(Vec<Element>),
}

impl Element {
    pub fn new(test: Test) -> Self {
        Self {
            field: None,
            test,
            captures: Vec::new(),
        }
    }

    /// One element per top-level branch. A top-level alternation yields a
    /// match per satisfied branch, so its branches become separate roots
    /// carrying the alternation's own field and captures.
    pub fn roots(&self) -> Vec<Element> {
        let Test::Alternation(branches) = &self.test else {
            return vec![self.clone()];
        };
        branches
            .iter()
            .flat_map(Element::roots)
            .map(|mut branch| {
                branch.field = branch.field.or(self.field);
                branch.captures.extend(&self.captures);
                branch
            })
            .collect()
    }
}
