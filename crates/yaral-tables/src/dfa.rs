//! Lexer DFA deserialization.

use regex_automata::dfa::sparse::DFA;

/// Owned multi-pattern lexer DFA.
pub type LexerDfa = DFA<Vec<u8>>;

/// Deserialize a sparse DFA produced by `DFA::to_bytes_little_endian()`.
///
/// Returns an owned copy, so the artifact bytes need not outlive the tables.
pub fn deserialize_dfa(bytes: &[u8]) -> Result<LexerDfa, String> {
    DFA::from_bytes(bytes)
        .map(|(dfa, _)| dfa.to_owned())
        .map_err(|e| e.to_string())
}
