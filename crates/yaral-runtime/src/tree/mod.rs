//! Concrete syntax trees.

mod cursor;
mod data;
mod edit;
mod node;

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use yaral_core::Point;

pub use cursor::{Descendants, TreeCursor};
pub(crate) use data::{Edge, Flags, NodeData};
pub(crate) use edit::EditMap;
pub use edit::InputEdit;
pub use node::{Children, Node};

use crate::Language;

/// Parse result: a root node over shared node data, plus the edits applied
/// since it was parsed.
///
/// Cloning is cheap. Equality is structural: kinds, ranges and children,
/// regardless of node identity.
#[derive(Clone)]
pub struct Tree {
    root: Arc<NodeData>,
    language: Language,
    edits: Option<EditMap>,
}

impl Tree {
    pub(crate) fn new(root: Arc<NodeData>, language: Language) -> Self {
        Self {
            root,
            language,
            edits: None,
        }
    }

    pub(crate) fn root_data(&self) -> &Arc<NodeData> {
        &self.root
    }

    pub(crate) fn edit_map(&self) -> Option<&EditMap> {
        self.edits.as_ref()
    }

    pub fn root_node(&self) -> Node<'_> {
        Node::root(self)
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Length of the text this tree was parsed from.
    pub fn source_len(&self) -> usize {
        self.root.size
    }

    /// Record an edit of the source text. Node positions keep describing the
    /// old text; pass the tree back to the parser with the new text to get an
    /// up-to-date tree that shares every unaffected subtree.
    pub fn edit(&mut self, edit: &InputEdit) {
        let len = self.root.size;
        self.edits
            .get_or_insert_with(|| EditMap::identity(len))
            .apply(edit);
    }

    pub fn is_edited(&self) -> bool {
        self.edits.is_some()
    }

    pub fn walk(&self) -> TreeCursor<'_> {
        self.root_node().walk()
    }

    pub fn to_sexp(&self) -> String {
        self.root_node().to_sexp()
    }

    /// `ERROR` and `MISSING` nodes in document order. Errors inside an
    /// `ERROR` node are not reported separately.
    pub fn errors(&self) -> Vec<SyntaxError> {
        let mut errors = Vec::new();
        if !self.root.has_error() {
            return errors;
        }
        collect_errors(self.root_node(), &mut errors);
        errors
    }
}

fn collect_errors(node: Node<'_>, errors: &mut Vec<SyntaxError>) {
    for child in node.children() {
        if child.is_error() {
            errors.push(SyntaxError::new(&child, SyntaxErrorKind::Unexpected));
        } else if child.is_missing() {
            let kind = SyntaxErrorKind::Missing {
                kind: child.kind().to_owned(),
                named: child.is_named(),
            };
            errors.push(SyntaxError::new(&child, kind));
        } else if child.has_error() {
            collect_errors(child, errors);
        }
    }
}

impl PartialEq for Tree {
    fn eq(&self, other: &Self) -> bool {
        self.root.same_structure(&other.root)
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sexp())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// Input the grammar does not allow here.
    Unexpected,
    /// A token the grammar requires here is absent.
    Missing { kind: String, named: bool },
}

/// One reportable error of a tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub byte_range: Range<usize>,
    pub start_point: Point,
    pub end_point: Point,
}

impl SyntaxError {
    fn new(node: &Node<'_>, kind: SyntaxErrorKind) -> Self {
        Self {
            kind,
            byte_range: node.byte_range(),
            start_point: node.start_position(),
            end_point: node.end_position(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            SyntaxErrorKind::Unexpected => write!(f, "unexpected input at {}", self.start_point),
            SyntaxErrorKind::Missing { kind, named: true } => {
                write!(f, "missing {kind} at {}", self.start_point)
            }
            SyntaxErrorKind::Missing { kind, named: false } => {
                write!(f, "missing `{kind}` at {}", self.start_point)
            }
        }
    }
}
