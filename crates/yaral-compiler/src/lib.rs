#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Table compiler for Yaral grammars.
//!
//! Turns a [`Grammar`] into a loadable artifact: an LALR(1) parse table with
//! precedence and associativity resolved, plus a lexer DFA covering every
//! terminal.
//!
//! ```ignore
//! let artifact = yaral_compiler::compile(&grammar)?;
//! let tables = yaral_tables::Tables::load(&artifact)?;
//! ```

mod conflicts;
mod emit;
mod error;
mod extract_tokens;
mod flatten;
mod lalr;
mod lexer;
mod prepare;
mod terminal_set;

#[cfg(test)]
mod extract_tokens_tests;

pub use error::{CompileError, ConflictKind};

use yaral_core::grammar::Grammar;
use yaral_tables::TablesData;

/// Parse tables and serialized lexer DFA, before artifact assembly.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub data: TablesData,
    pub dfa: Vec<u8>,
}

/// Build parse tables and lexer automaton for `grammar`.
pub fn build_tables(grammar: &Grammar) -> Result<Compiled, CompileError> {
    let prepared = prepare::prepare(grammar)?;
    let extracted = extract_tokens::extract_tokens(&prepared)?;
    let flat = flatten::flatten(extracted)?;
    let automaton = lalr::build(&flat);
    let states = conflicts::resolve(&flat, &automaton)?;
    let dfa = lexer::build_lexer(&flat.lexical)?;
    let data = emit::emit(&flat, states)?;
    Ok(Compiled { data, dfa })
}

/// Compile `grammar` into a versioned artifact. Identical grammars produce
/// identical bytes.
pub fn compile(grammar: &Grammar) -> Result<Vec<u8>, CompileError> {
    let Compiled { data, dfa } = build_tables(grammar)?;
    yaral_tables::encode(&data, &dfa).map_err(|e| CompileError::Encode(e.to_string()))
}
