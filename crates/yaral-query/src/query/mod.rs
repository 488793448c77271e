//! Compiled queries.
//!
//! [`Query::new`] parses the pattern source, resolves every kind and field
//! name against the language and keeps the resolved patterns. Matching runs
//! lazily over any node of a tree parsed with that language.

mod link;
mod matcher;
mod pattern;

#[cfg(test)]
mod query_tests;

pub use matcher::{QueryMatch, QueryMatches};

use indexmap::IndexSet;
use rowan::TextRange;
use yaral_runtime::{Language, Node};

use self::link::{Linker, Unresolved};
use self::pattern::Element;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::parser;

/// Why a pattern source did not compile. Every variant carries the full
/// diagnostics so callers can render them against the source.
#[derive(Debug, Clone, thiserror::Error)]
pub enum QueryError {
    /// Syntax errors and duplicate capture names.
    #[error("malformed pattern: {message}")]
    MalformedPattern {
        message: String,
        diagnostics: Diagnostics,
    },

    #[error("unknown node kind `{name}`")]
    UnknownKind {
        name: String,
        range: TextRange,
        diagnostics: Diagnostics,
    },

    #[error("unknown field `{name}`")]
    UnknownField {
        name: String,
        range: TextRange,
        diagnostics: Diagnostics,
    },
}

impl QueryError {
    pub fn diagnostics(&self) -> &Diagnostics {
        match self {
            QueryError::MalformedPattern { diagnostics, .. }
            | QueryError::UnknownKind { diagnostics, .. }
            | QueryError::UnknownField { diagnostics, .. } => diagnostics,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Query {
    language: Language,
    /// Per top-level pattern, the elements tried at each node.
    patterns: Vec<Vec<Element>>,
    capture_names: IndexSet<String>,
}

impl Query {
    pub fn new(language: &Language, source: &str) -> Result<Self, QueryError> {
        let parsed = parser::parse(source);
        let mut linker = Linker::new(language);
        let linked = linker.link(&parsed.root);

        let mut diagnostics = parsed.diagnostics;
        diagnostics.extend(linker.diagnostics);

        if diagnostics.has_syntax_errors() {
            let message = diagnostics
                .filtered()
                .first()
                .map(|diagnostic| diagnostic.message().to_string())
                .unwrap_or_default();
            return Err(QueryError::MalformedPattern {
                message,
                diagnostics,
            });
        }

        if let Some(Unresolved { kind, name, range }) = linker.unresolved {
            return Err(match kind {
                DiagnosticKind::UnknownField => QueryError::UnknownField {
                    name,
                    range,
                    diagnostics,
                },
                _ => QueryError::UnknownKind {
                    name,
                    range,
                    diagnostics,
                },
            });
        }

        // Without syntax or resolution errors every pattern linked.
        let patterns = linked
            .into_iter()
            .flatten()
            .map(|element| element.roots())
            .collect();

        Ok(Self {
            language: language.clone(),
            patterns,
            capture_names: linker.capture_names,
        })
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    /// Capture names in order of first appearance, without the sigil.
    pub fn capture_names(&self) -> impl Iterator<Item = &str> {
        self.capture_names.iter().map(String::as_str)
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Matches within the subtree rooted at `node`, in pre-order. A node
    /// from a tree of another language yields nothing.
    pub fn matches<'q, 't>(&'q self, node: &Node<'t>) -> QueryMatches<'q, 't> {
        QueryMatches::new(self, node)
    }
}
