//! Lazy matching of resolved patterns against a syntax tree.
//!
//! Nodes are visited in pre-order. At every node each pattern is tried in
//! order; the matches found there are buffered and handed out before the walk
//! moves on, so dropping the iterator stops all work.

use std::collections::VecDeque;

use yaral_runtime::{Descendants, Node};

use super::Query;
use super::pattern::{CaptureId, Element, Test};

/// One successful pattern match.
#[derive(Debug, Clone)]
pub struct QueryMatch<'q, 't> {
    pub pattern_index: usize,
    captures: Vec<(&'q str, Node<'t>)>,
}

impl<'q, 't> QueryMatch<'q, 't> {
    /// Node bound to `name`, if the matched branch bound it.
    pub fn get(&self, name: &str) -> Option<&Node<'t>> {
        self.captures
            .iter()
            .find(|(capture, _)| *capture == name)
            .map(|(_, node)| node)
    }

    /// Captures in the order they were bound.
    pub fn captures(&self) -> impl Iterator<Item = (&'q str, &Node<'t>)> + '_ {
        self.captures.iter().map(|(name, node)| (*name, node))
    }
}

pub struct QueryMatches<'q, 't> {
    query: &'q Query,
    /// `None` when the tree belongs to another language.
    nodes: Option<Descendants<'t>>,
    pending: VecDeque<QueryMatch<'q, 't>>,
}

impl<'q, 't> QueryMatches<'q, 't> {
    pub(super) fn new(query: &'q Query, node: &Node<'t>) -> Self {
        let same_language = node.tree().language().name() == query.language().name();
        Self {
            query,
            nodes: same_language.then(|| node.descendants()),
            pending: VecDeque::new(),
        }
    }

    fn visit(&mut self, node: &Node<'t>) {
        let query = self.query;
        for (pattern_index, roots) in query.patterns.iter().enumerate() {
            for root in roots {
                let mut bindings = Bindings::default();
                if !bindings.element(root, node) {
                    continue;
                }
                let captures = bindings
                    .0
                    .into_iter()
                    .filter_map(|(id, node)| {
                        let name = query.capture_names.get_index(id as usize)?;
                        Some((name.as_str(), node))
                    })
                    .collect();
                self.pending.push_back(QueryMatch {
                    pattern_index,
                    captures,
                });
            }
        }
    }
}

impl<'q, 't> Iterator for QueryMatches<'q, 't> {
    type Item = QueryMatch<'q, 't>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(found) = self.pending.pop_front() {
                return Some(found);
            }
            let node = self.nodes.as_mut()?.next()?;
            self.visit(&node);
        }
    }
}

/// Captures bound so far, in binding order.
#[derive(Default)]
struct Bindings<'t>(Vec<(CaptureId, Node<'t>)>);

impl<'t> Bindings<'t> {
    /// On failure the bindings are left as they were.
    fn element(&mut self, element: &Element, node: &Node<'t>) -> bool {
        if let Some(field) = element.field
            && node.field_id() != Some(field)
        {
            return false;
        }
        let mark = self.0.len();
        if !self.test(&element.test, node) {
            self.0.truncate(mark);
            return false;
        }
        self.0
            .extend(element.captures.iter().map(|&id| (id, node.clone())));
        true
    }

    fn test(&mut self, test: &Test, node: &Node<'t>) -> bool {
        match test {
            Test::Any => true,
            Test::Named {
                kind,
                children,
                absent,
            } => {
                let kind_matches = match kind {
                    Some(id) => node.kind_id() == *id,
                    None => node.is_named(),
                };
                kind_matches
                    && absent
                        .iter()
                        .all(|&field| node.child_by_field_id(field).is_none())
                    && self.children(children, node)
            }
            Test::Anonymous(id) => !node.is_named() && node.kind_id() == *id,
            Test::Error => node.is_error(),
            Test::Missing(kind) => {
                node.is_missing() && kind.is_none_or(|id| node.kind_id() == id)
            }
            Test::Alternation(branches) => branches.iter().any(|branch| self.element(branch, node)),
        }
    }

    /// Child patterns match an ordered subsequence of the children. A child
    /// match never constrains its siblings, so taking the leftmost candidate
    /// for each pattern finds an alignment whenever one exists.
    fn children(&mut self, patterns: &[Element], parent: &Node<'t>) -> bool {
        let mut candidates = parent.children();
        patterns.iter().all(|pattern| {
            candidates
                .by_ref()
                .any(|child| self.element(pattern, &child))
        })
    }
}
