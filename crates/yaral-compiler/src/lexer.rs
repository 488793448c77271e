//! Lexer automaton: one anchored multi-pattern DFA over every terminal.
//!
//! Pattern `i` of the DFA recognizes lexical variable `i`, which is terminal
//! symbol `i + 1`. The DFA reports all matches so the runtime can pick the
//! longest one and break ties with token priority.

use regex_automata::MatchKind;
use regex_automata::dfa::{StartKind, dense};

use crate::error::CompileError;
use crate::extract_tokens::LexicalVariable;

/// Build and serialize the lexer DFA (little endian sparse encoding).
pub(crate) fn build_lexer(lexical: &[LexicalVariable]) -> Result<Vec<u8>, CompileError> {
    let patterns: Vec<&str> = lexical.iter().map(|var| var.regex.as_str()).collect();

    let dense = dense::DFA::builder()
        .configure(
            dense::DFA::config()
                .start_kind(StartKind::Anchored)
                .match_kind(MatchKind::All)
                .minimize(true),
        )
        .build_many(&patterns)
        .map_err(|e| CompileError::Lexer(e.to_string()))?;

    let sparse = dense
        .to_sparse()
        .map_err(|e| CompileError::Lexer(e.to_string()))?;

    Ok(sparse.to_bytes_little_endian())
}
