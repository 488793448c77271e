//! Grammar model.
//!
//! A [`Grammar`] is an ordered set of named [`Rule`] trees. It can be read from and
//! written to tree-sitter compatible `grammar.json`, stored in a compact binary form,
//! or built in Rust with the combinators in [`dsl`].

mod binary;
pub mod dsl;
mod json;
mod types;

#[cfg(test)]
mod binary_tests;
#[cfg(test)]
mod dsl_tests;
#[cfg(test)]
mod json_tests;

pub use json::GrammarError;
pub use types::{Grammar, Precedence, PrecedenceEntry, Rule};
