#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Parser runtime for Yaral grammars.
//!
//! Loads compiled grammar tables into a [`Language`], scans text with the
//! table-driven [`Lexer`] and parses it into a concrete syntax [`Tree`].
//! Parsing never fails: malformed input produces `ERROR` and missing nodes,
//! and a previous tree can be handed back to reuse unchanged subtrees.

mod language;
mod lexer;
mod parser;
mod trace;
mod tree;

#[cfg(test)]
mod recovery_tests;
#[cfg(test)]
mod reuse_tests;
#[cfg(test)]
mod test_utils;

pub use language::Language;
pub use lexer::{Lexer, Token, Tokens, tokens_from};
pub use parser::{Parser, RecoveryConfig};
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
pub use tree::{
    Children, Descendants, InputEdit, Node, SyntaxError, SyntaxErrorKind, Tree, TreeCursor,
};
pub use yaral_tables::LoadError;
