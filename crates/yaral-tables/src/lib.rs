#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Compiled grammar artifact for Yaral.
//!
//! The table compiler produces an artifact (header + tables + lexer DFA); the loader
//! turns it back into an immutable [`Tables`] handle consumed by the parser runtime.
//! Loading either returns a fully validated handle or a [`LoadError`].

mod artifact;
mod dfa;
mod dump;
mod header;
mod invariants;
mod load;
mod tables;

#[cfg(test)]
mod header_tests;
#[cfg(test)]
mod load_tests;
#[cfg(test)]
mod test_utils;

pub use artifact::encode;
pub use dfa::{LexerDfa, deserialize_dfa};
pub use dump::dump;
pub use header::Header;
pub use load::LoadError;
pub use tables::{
    Action, LexTerminal, ParseState, Production, ProductionStep, SymbolInfo, SymbolKind, Tables,
    TablesData,
};

/// Magic bytes at the start of every artifact.
pub const MAGIC: [u8; 4] = *b"YRLT";

/// Artifact format version. Bumped whenever the table layout changes.
pub const VERSION: u32 = 1;

/// Section alignment in bytes.
pub const SECTION_ALIGN: usize = 64;
