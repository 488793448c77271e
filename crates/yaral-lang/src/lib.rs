#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! The Yaral rule language: grammar definition and the parse tables compiled
//! from it at build time.
//!
//! ```no_run
//! let language = yaral_lang::language().expect("shipped tables load");
//! let parser = yaral_runtime::Parser::new(language);
//! let tree = parser.parse("rule r { condition: true }", None);
//! assert!(!tree.root_node().has_error());
//! ```

pub mod grammar;

#[cfg(test)]
mod lang_tests;

pub use grammar::grammar;

use yaral_runtime::{Language, LoadError, Parser};

/// Compiled tables of [`grammar()`].
pub const ARTIFACT: &[u8] = include_bytes!(concat!(env!("OUT_DIR"), "/yaral.tables"));

/// Load the shipped tables. Every call yields a distinct handle; trees are
/// only reused across parses sharing one handle, so keep it around.
pub fn language() -> Result<Language, LoadError> {
    Language::load(ARTIFACT)
}

/// Parser over a freshly loaded [`language()`].
pub fn parser() -> Result<Parser, LoadError> {
    language().map(Parser::new)
}
