#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures shared by the Yaral crates.
//!
//! - [`grammar`]: the grammar model (JSON, binary and builder forms)
//! - ids for node kinds, fields, parse states and productions
//! - [`Point`] positions and terminal [`Colors`]

use std::num::NonZeroU16;

mod colors;
pub mod grammar;
mod interner;
mod position;

#[cfg(test)]
mod interner_tests;

pub use colors::Colors;
pub use interner::{Interner, Name};
pub use position::Point;

/// Grammar symbol id. Doubles as the node kind id of the syntax tree.
pub type SymbolId = u16;

/// Field id (fields are numbered from 1 so `Option<FieldId>` stays two bytes).
pub type FieldId = NonZeroU16;

/// Parse state id.
pub type StateId = u16;

/// Production id.
pub type ProductionId = u16;

/// End-of-input symbol. Always the first symbol of a compiled grammar.
pub const END_SYMBOL: SymbolId = 0;

/// Kind id of `ERROR` nodes produced by error recovery.
pub const ERROR_SYMBOL: SymbolId = u16::MAX;

/// Node kind name of error nodes.
pub const ERROR_KIND_NAME: &str = "ERROR";
