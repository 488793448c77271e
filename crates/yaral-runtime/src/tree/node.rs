//! Read-only node views.
//!
//! A [`Node`] is a position-aware view over shared [`NodeData`]: it knows its
//! offset and the path of ancestors it was reached through. `parent` and the
//! sibling accessors walk that path; nothing is stored in the data itself.

use std::fmt;
use std::ops::Range;
use std::rc::Rc;
use std::str::Utf8Error;
use std::sync::Arc;

use yaral_core::{ERROR_SYMBOL, FieldId, Point, SymbolId};

use super::Tree;
use super::cursor::{Descendants, TreeCursor};
use super::data::{Edge, NodeData};

#[derive(Clone)]
pub struct Node<'t> {
    tree: &'t Tree,
    data: &'t Arc<NodeData>,
    field: Option<FieldId>,
    alias: Option<SymbolId>,
    start_byte: usize,
    start_point: Point,
    /// Edge index in the parent's child list.
    index: usize,
    parent: Option<Rc<Node<'t>>>,
}

impl<'t> Node<'t> {
    pub(crate) fn root(tree: &'t Tree) -> Self {
        Self {
            tree,
            data: tree.root_data(),
            field: None,
            alias: None,
            start_byte: 0,
            start_point: Point::ZERO,
            index: 0,
            parent: None,
        }
    }

    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    /// Identity of the underlying shared node. Reused subtrees keep their id
    /// across incremental parses.
    pub fn id(&self) -> usize {
        Arc::as_ptr(self.data) as usize
    }

    pub fn kind_id(&self) -> SymbolId {
        self.alias.unwrap_or(self.data.symbol)
    }

    pub fn kind(&self) -> &'t str {
        self.tree.language().symbol_name(self.kind_id())
    }

    /// Kind before aliasing.
    pub fn grammar_kind(&self) -> &'t str {
        self.tree.language().symbol_name(self.data.symbol)
    }

    pub fn is_named(&self) -> bool {
        self.tree.language().node_kind_is_named(self.kind_id())
    }

    /// Trivia (whitespace, comments).
    pub fn is_extra(&self) -> bool {
        self.data.is_extra()
    }

    pub fn is_error(&self) -> bool {
        self.data.symbol == ERROR_SYMBOL
    }

    /// Zero-width node inserted by error recovery.
    pub fn is_missing(&self) -> bool {
        self.data.is_missing()
    }

    /// This node or a descendant is an error or missing node.
    pub fn has_error(&self) -> bool {
        self.data.has_error()
    }

    pub fn start_byte(&self) -> usize {
        self.start_byte
    }

    pub fn end_byte(&self) -> usize {
        self.start_byte + self.data.size
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.start_byte..self.end_byte()
    }

    pub fn start_position(&self) -> Point {
        self.start_point
    }

    pub fn end_position(&self) -> Point {
        self.start_point.offset_by(self.data.extent)
    }

    pub fn children(&self) -> Children<'t> {
        Children {
            parent: Rc::new(self.clone()),
            edges: self.data.children.iter().enumerate(),
            byte: self.start_byte,
            point: self.start_point,
        }
    }

    pub fn child_count(&self) -> usize {
        self.children().count()
    }

    pub fn child(&self, index: usize) -> Option<Node<'t>> {
        self.children().nth(index)
    }

    /// Named children, skipping trivia and anonymous tokens.
    pub fn named_children(&self) -> impl Iterator<Item = Node<'t>> + use<'t> {
        self.children().filter(|n| n.is_named() && !n.is_extra())
    }

    pub fn named_child_count(&self) -> usize {
        self.named_children().count()
    }

    pub fn named_child(&self, index: usize) -> Option<Node<'t>> {
        self.named_children().nth(index)
    }

    pub fn child_by_field_name(&self, name: &str) -> Option<Node<'t>> {
        let id = self.tree.language().field_id_for_name(name)?;
        self.child_by_field_id(id)
    }

    pub fn child_by_field_id(&self, id: FieldId) -> Option<Node<'t>> {
        self.children().find(|child| child.field == Some(id))
    }

    pub fn children_by_field_name(&self, name: &str) -> impl Iterator<Item = Node<'t>> + use<'t> {
        let id = self.tree.language().field_id_for_name(name);
        self.children()
            .filter(move |child| id.is_some() && child.field == id)
    }

    pub fn field_id(&self) -> Option<FieldId> {
        self.field
    }

    /// Field this node fills in its parent.
    pub fn field_name(&self) -> Option<&'t str> {
        self.tree.language().field_name_for_id(self.field?)
    }

    pub fn parent(&self) -> Option<Node<'t>> {
        self.parent.as_deref().cloned()
    }

    pub fn next_sibling(&self) -> Option<Node<'t>> {
        let parent = self.parent.as_deref()?;
        parent.children().find(|sibling| sibling.index > self.index)
    }

    pub fn prev_sibling(&self) -> Option<Node<'t>> {
        let parent = self.parent.as_deref()?;
        parent
            .children()
            .take_while(|sibling| sibling.index < self.index)
            .last()
    }

    pub fn next_named_sibling(&self) -> Option<Node<'t>> {
        let parent = self.parent.as_deref()?;
        parent
            .named_children()
            .find(|sibling| sibling.index > self.index)
    }

    pub fn utf8_text<'s>(&self, source: &'s [u8]) -> Result<&'s str, Utf8Error> {
        let bytes = source.get(self.byte_range()).unwrap_or_default();
        std::str::from_utf8(bytes)
    }

    pub fn walk(&self) -> TreeCursor<'t> {
        TreeCursor::new(self.clone())
    }

    /// This node and everything below it in pre-order.
    pub fn descendants(&self) -> Descendants<'t> {
        Descendants::new(self.clone())
    }

    /// S-expression of the named structure, with field labels.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out);
        out
    }

    fn write_sexp(&self, out: &mut String) {
        out.push('(');
        if self.is_missing() {
            out.push_str("MISSING ");
            if self.is_named() {
                out.push_str(self.kind());
            } else {
                out.push('"');
                out.push_str(self.kind());
                out.push('"');
            }
        } else {
            out.push_str(self.kind());
        }
        for child in self.children() {
            if !child.is_named() && !child.is_missing() {
                continue;
            }
            out.push(' ');
            if let Some(field) = child.field_name() {
                out.push_str(field);
                out.push_str(": ");
            }
            child.write_sexp(out);
        }
        out.push(')');
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id() && self.start_byte == other.start_byte
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{} - {}]",
            self.kind(),
            self.start_position(),
            self.end_position()
        )
    }
}

/// Visible children of a node, in order.
pub struct Children<'t> {
    parent: Rc<Node<'t>>,
    edges: std::iter::Enumerate<std::slice::Iter<'t, Edge>>,
    byte: usize,
    point: Point,
}

impl<'t> Iterator for Children<'t> {
    type Item = Node<'t>;

    fn next(&mut self) -> Option<Node<'t>> {
        let tree: &'t Tree = self.parent.tree;
        let language = tree.language();
        for (index, edge) in self.edges.by_ref() {
            let start_byte = self.byte;
            let start_point = self.point;
            self.byte += edge.node.size;
            self.point = self.point.offset_by(edge.node.extent);

            if edge.alias.is_none() && !language.node_kind_is_visible(edge.node.symbol) {
                continue;
            }
            return Some(Node {
                tree,
                data: &edge.node,
                field: edge.field,
                alias: edge.alias,
                start_byte,
                start_point,
                index,
                parent: Some(Rc::clone(&self.parent)),
            });
        }
        None
    }
}
