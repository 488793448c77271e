//! LR parser with error recovery and incremental reuse.
//!
//! [`Parser::parse`] always returns a tree. Input the grammar cannot place
//! ends up in `ERROR` nodes, and tokens the input lacks appear as zero-width
//! missing nodes. Given the previous tree of an edited text, unaffected
//! subtrees are taken over by identity instead of being parsed again.

mod driver;
mod recovery;
mod reuse;
mod stack;

use crate::trace::{NoopTracer, Tracer};
use crate::{Language, Tree};

use driver::Driver;
use reuse::ReuseIndex;

/// Knobs for error recovery.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecoveryConfig {
    /// Tokens after the error point a repair must parse without further
    /// errors to be accepted.
    pub lookahead_window: usize,
    /// Missing tokens inserted in a row before recovery falls back to
    /// skipping input.
    pub max_insertions: usize,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            lookahead_window: 3,
            max_insertions: 3,
        }
    }
}

impl RecoveryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lookahead_window(mut self, tokens: usize) -> Self {
        self.lookahead_window = tokens.max(1);
        self
    }

    pub fn max_insertions(mut self, count: usize) -> Self {
        self.max_insertions = count;
        self
    }
}

/// Parser for one language. Holds no per-parse state; one parser may be used
/// for any number of parses.
#[derive(Clone, Debug)]
pub struct Parser {
    language: Language,
    recovery: RecoveryConfig,
}

impl Parser {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            recovery: RecoveryConfig::default(),
        }
    }

    pub fn with_recovery(mut self, recovery: RecoveryConfig) -> Self {
        self.recovery = recovery;
        self
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn recovery(&self) -> &RecoveryConfig {
        &self.recovery
    }

    /// Parse `text`. When `old_tree` is the tree of the previous version of
    /// the text, with every edit since recorded through [`Tree::edit`], its
    /// unchanged subtrees are shared with the result.
    ///
    /// A tree from another language is ignored, as is an old tree that was
    /// neither edited nor parsed from text of the same length.
    pub fn parse(&self, text: &str, old_tree: Option<&Tree>) -> Tree {
        self.parse_with_tracer(text, old_tree, &mut NoopTracer)
    }

    pub fn parse_with_tracer<T: Tracer>(
        &self,
        text: &str,
        old_tree: Option<&Tree>,
        tracer: &mut T,
    ) -> Tree {
        let reuse = old_tree.and_then(|tree| ReuseIndex::build(tree, &self.language, text.len()));
        let root = Driver::new(&self.language, text, &self.recovery, tracer, reuse).run();
        Tree::new(root, self.language.clone())
    }
}
