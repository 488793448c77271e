//! Lazy, restartable lexer driven by the grammar's lexer DFA.
//!
//! Every terminal is one pattern of a single anchored DFA built with
//! all-matches semantics. Scanning walks the DFA byte by byte from the token
//! start, remembers the longest acceptable match and stops at the dead state.
//! Ties on length go to the higher token precedence, then to string literals,
//! then to the lower terminal id.

use regex_automata::dfa::Automaton;
use regex_automata::util::primitives::StateID;
use regex_automata::{Anchored, Input};
use yaral_core::{END_SYMBOL, ERROR_SYMBOL, Point, SymbolId};
use yaral_tables::{LexTerminal, Tables};

use crate::Language;

/// A scanned token. Trivia (whitespace, comments) are tokens too.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: SymbolId,
    pub start_byte: usize,
    pub end_byte: usize,
    pub start_point: Point,
    pub end_point: Point,
    /// One past the last byte examined while scanning; reaching the end of
    /// the input counts as examining one extra byte.
    pub lookahead_end: usize,
}

impl Token {
    pub fn is_end(&self) -> bool {
        self.kind == END_SYMBOL
    }

    pub fn is_error(&self) -> bool {
        self.kind == ERROR_SYMBOL
    }

    pub fn len(&self) -> usize {
        self.end_byte - self.start_byte
    }

    pub fn is_empty(&self) -> bool {
        self.start_byte == self.end_byte
    }
}

/// Scanner over one source text.
#[derive(Clone, Copy)]
pub struct Lexer<'a> {
    tables: &'a Tables,
    text: &'a str,
}

/// Longest acceptable match of one scan.
struct Scan {
    matched: Option<(usize, SymbolId)>,
    read_end: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(language: &'a Language, text: &'a str) -> Self {
        Self::with_tables(language.tables(), text)
    }

    pub(crate) fn with_tables(tables: &'a Tables, text: &'a str) -> Self {
        Self { tables, text }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Scan the token starting at `start`. `after_trivia` disables immediate
    /// tokens.
    pub fn lex(&self, start: usize, start_point: Point, after_trivia: bool) -> Token {
        self.lex_filtered(start, start_point, after_trivia, |_| true)
    }

    /// Scan at `start` considering only terminals accepted by `allowed`.
    ///
    /// Used to re-read a token in the context of a parse state, e.g. to read a
    /// keyword as an identifier where only an identifier is valid.
    pub fn lex_filtered(
        &self,
        start: usize,
        start_point: Point,
        after_trivia: bool,
        allowed: impl Fn(SymbolId) -> bool,
    ) -> Token {
        let len = self.text.len();
        if start >= len {
            return Token {
                kind: END_SYMBOL,
                start_byte: len,
                end_byte: len,
                start_point,
                end_point: start_point,
                lookahead_end: len + 1,
            };
        }

        let accept = |t: &LexTerminal| (!t.immediate || !after_trivia) && allowed(t.symbol);
        let scan = self.scan(start, &accept);
        if let Some((end, kind)) = scan.matched {
            return self.token(kind, start, end, start_point, scan.read_end);
        }

        // Coalesce unmatched characters into one error token, stopping where
        // some terminal matches again.
        let mut end = start;
        let mut read_end = scan.read_end;
        while end < len {
            end += self.char_len(end);
            if end >= len {
                break;
            }
            let next = self.scan(end, &accept);
            read_end = read_end.max(next.read_end);
            if next.matched.is_some() {
                break;
            }
        }
        self.token(ERROR_SYMBOL, start, end, start_point, read_end)
    }

    fn token(
        &self,
        kind: SymbolId,
        start: usize,
        end: usize,
        start_point: Point,
        read_end: usize,
    ) -> Token {
        Token {
            kind,
            start_byte: start,
            end_byte: end,
            start_point,
            end_point: start_point.advance(&self.text[start..end]),
            lookahead_end: read_end.max(end),
        }
    }

    fn char_len(&self, at: usize) -> usize {
        self.text[at..].chars().next().map_or(1, char::len_utf8)
    }

    fn scan(&self, start: usize, accept: &impl Fn(&LexTerminal) -> bool) -> Scan {
        let dfa = self.tables.dfa();
        let bytes = self.text.as_bytes();
        let input = Input::new(bytes).range(start..).anchored(Anchored::Yes);
        let mut scan = Scan {
            matched: None,
            read_end: start,
        };
        let Ok(mut state) = dfa.start_state_forward(&input) else {
            return scan;
        };

        for (i, &byte) in bytes.iter().enumerate().skip(start) {
            state = dfa.next_state(state, byte);
            scan.read_end = i + 1;
            // Matches are reported one byte late: this one ends at `i`.
            if dfa.is_match_state(state) {
                self.record(state, i, accept, &mut scan);
            } else if dfa.is_dead_state(state) {
                return scan;
            }
        }

        state = dfa.next_eoi_state(state);
        scan.read_end = bytes.len() + 1;
        if dfa.is_match_state(state) {
            self.record(state, bytes.len(), accept, &mut scan);
        }
        scan
    }

    fn record(
        &self,
        state: StateID,
        end: usize,
        accept: &impl Fn(&LexTerminal) -> bool,
        scan: &mut Scan,
    ) {
        let dfa = self.tables.dfa();
        let terminals = self.tables.terminals();
        for i in 0..dfa.match_len(state) {
            let pattern = dfa.match_pattern(state, i).as_usize();
            let Some(terminal) = terminals.get(pattern) else {
                continue;
            };
            if !accept(terminal) {
                continue;
            }
            let better = match scan.matched {
                None => true,
                Some((best_end, best_kind)) => {
                    end > best_end || (end == best_end && self.outranks(terminal, best_kind))
                }
            };
            if better {
                scan.matched = Some((end, terminal.symbol));
            }
        }
    }

    fn outranks(&self, terminal: &LexTerminal, other: SymbolId) -> bool {
        let Some(other) = self.tables.lex_terminal(other) else {
            return true;
        };
        (terminal.priority, terminal.literal, std::cmp::Reverse(terminal.symbol))
            > (other.priority, other.literal, std::cmp::Reverse(other.symbol))
    }
}

/// Tokens from `start_byte` to the end of `text`, trivia included, finishing
/// with one end-of-input token.
///
/// `start_byte` must be a token boundary of a previous scan (or 0).
pub fn tokens_from<'a>(language: &'a Language, text: &'a str, start_byte: usize) -> Tokens<'a> {
    let start_byte = start_byte.min(text.len());
    Tokens {
        lexer: Lexer::new(language, text),
        position: start_byte,
        point: Point::of_offset(text, start_byte),
        after_trivia: false,
        done: false,
    }
}

/// Iterator returned by [`tokens_from`].
pub struct Tokens<'a> {
    lexer: Lexer<'a>,
    position: usize,
    point: Point,
    after_trivia: bool,
    done: bool,
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let token = self
            .lexer
            .lex(self.position, self.point, self.after_trivia);
        self.done = token.is_end();
        self.position = token.end_byte;
        self.point = token.end_point;
        self.after_trivia = self.lexer.tables.is_extra(token.kind);
        Some(token)
    }
}
