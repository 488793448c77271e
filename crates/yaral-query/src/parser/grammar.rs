//! Productions of the pattern language.
//!
//! ```text
//! root     = pattern*
//! pattern  = primary (("@" | "#") name)*
//! primary  = tree | alt | "_" | string | field | "!" name
//! tree     = "(" ("_" | kind | "ERROR" | "MISSING" (kind | string)?) pattern* ")"
//! alt      = "[" pattern* "]"
//! field    = name ":" primary
//! ```

use super::core::Parser;
use super::cst::SyntaxKind;
use super::cst::token_sets::{CAPTURE_SIGILS, PATTERN_FIRST};
use crate::diagnostics::DiagnosticKind;

impl Parser<'_> {
    pub(super) fn parse_root(&mut self) {
        self.start_node(SyntaxKind::Root);

        loop {
            match self.current() {
                SyntaxKind::Eof => break,
                kind if PATTERN_FIRST.contains(kind) => self.parse_pattern(),
                SyntaxKind::At | SyntaxKind::Hash => self.error_capture_without_target(),
                SyntaxKind::ParenClose => {
                    self.error_and_bump_msg(DiagnosticKind::UnexpectedToken, "unmatched `)`")
                }
                SyntaxKind::BracketClose => {
                    self.error_and_bump_msg(DiagnosticKind::UnexpectedToken, "unmatched `]`")
                }
                _ => self.error_and_bump_msg(
                    DiagnosticKind::UnexpectedToken,
                    "try `(node)`, `[a b]`, `\"literal\"` or `_`",
                ),
            }
        }

        self.drain_trivia();
        self.finish_node();
    }

    /// A pattern with its trailing captures.
    fn parse_pattern(&mut self) {
        self.parse_pattern_inner(true);
    }

    /// Field values leave the captures to the field, so `name: (x) @n`
    /// captures through the field.
    fn parse_pattern_inner(&mut self, with_captures: bool) {
        if !self.enter_recursion() {
            self.error_rest(DiagnosticKind::NestingTooDeep);
            return;
        }

        let checkpoint = self.checkpoint();
        match self.current() {
            SyntaxKind::ParenOpen => self.parse_tree(),
            SyntaxKind::BracketOpen => self.parse_alt(),
            SyntaxKind::Underscore => self.parse_token_node(SyntaxKind::Wildcard),
            SyntaxKind::StringLiteral => self.parse_token_node(SyntaxKind::Str),
            SyntaxKind::Id => self.parse_field_or_bare(),
            SyntaxKind::Negation => self.parse_negated_field(),
            SyntaxKind::KwError | SyntaxKind::KwMissing => {
                self.error_and_bump(DiagnosticKind::ErrorMissingOutsideParens)
            }
            _ => self.error_and_bump_msg(DiagnosticKind::UnexpectedToken, "not a valid pattern"),
        }

        if with_captures {
            while self.currently_is_one_of(CAPTURE_SIGILS) {
                self.start_node_at(checkpoint, SyntaxKind::Capture);
                self.bump();
                if !self.eat(SyntaxKind::Id) {
                    self.error(DiagnosticKind::ExpectedCaptureName);
                }
                self.finish_node();
            }
        }

        self.exit_recursion();
    }

    fn parse_token_node(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.finish_node();
    }

    /// `(kind ...)`, `(_ ...)`, `(ERROR)`, `(MISSING)`, `(MISSING kind)`.
    fn parse_tree(&mut self) {
        self.start_node(SyntaxKind::Tree);
        self.push_delimiter();
        self.bump();

        match self.current() {
            SyntaxKind::ParenClose => self.error(DiagnosticKind::EmptyTree),
            SyntaxKind::Underscore => {
                self.bump();
                self.parse_tree_children();
            }
            SyntaxKind::Id if !self.next_is(SyntaxKind::Colon) => {
                self.bump();
                self.parse_tree_children();
            }
            SyntaxKind::KwError => {
                self.bump();
                if !self.currently_is(SyntaxKind::ParenClose) && !self.at_eof() {
                    self.error(DiagnosticKind::ErrorTakesNoArguments);
                    self.parse_tree_children();
                }
            }
            SyntaxKind::KwMissing => {
                self.bump();
                if matches!(self.current(), SyntaxKind::Id | SyntaxKind::StringLiteral) {
                    self.bump();
                }
                if !self.currently_is(SyntaxKind::ParenClose) && !self.at_eof() {
                    self.error_msg(
                        DiagnosticKind::UnexpectedToken,
                        "`(MISSING)` takes at most one node kind",
                    );
                    self.parse_tree_children();
                }
            }
            _ => {
                self.error(DiagnosticKind::ExpectedNodeKind);
                self.parse_tree_children();
            }
        }

        if self.at_eof() {
            self.error_unclosed(DiagnosticKind::UnclosedTree, "`)`", "tree");
        } else {
            self.bump();
        }
        self.pop_delimiter();
        self.finish_node();
    }

    fn parse_tree_children(&mut self) {
        loop {
            match self.current() {
                SyntaxKind::ParenClose | SyntaxKind::Eof => break,
                kind if PATTERN_FIRST.contains(kind) => self.parse_pattern(),
                SyntaxKind::At | SyntaxKind::Hash => self.error_capture_without_target(),
                _ => self.error_and_bump_msg(
                    DiagnosticKind::UnexpectedToken,
                    "not valid inside a node; try `(child)` or close with `)`",
                ),
            }
        }
    }

    /// `[a b c]`
    fn parse_alt(&mut self) {
        self.start_node(SyntaxKind::Alt);
        self.push_delimiter();
        self.bump();

        loop {
            match self.current() {
                SyntaxKind::BracketClose | SyntaxKind::Eof => break,
                kind if PATTERN_FIRST.contains(kind) => self.parse_pattern(),
                SyntaxKind::At | SyntaxKind::Hash => self.error_capture_without_target(),
                _ => self.error_and_bump_msg(
                    DiagnosticKind::UnexpectedToken,
                    "not valid inside alternation; try `(node)` or close with `]`",
                ),
            }
        }

        if self.at_eof() {
            self.error_unclosed(DiagnosticKind::UnclosedAlternation, "`]`", "alternation");
        } else {
            self.bump();
        }
        self.pop_delimiter();
        self.finish_node();
    }

    /// `name: pattern`, or a bare identifier, which is an error.
    fn parse_field_or_bare(&mut self) {
        if !self.next_is(SyntaxKind::Colon) {
            self.error_and_bump(DiagnosticKind::BareIdentifier);
            return;
        }

        self.start_node(SyntaxKind::Field);
        self.bump();
        self.bump();
        if self.currently_is_one_of(PATTERN_FIRST) {
            self.parse_pattern_inner(false);
        } else {
            self.error_msg(DiagnosticKind::ExpectedExpression, "after `field:`");
        }
        self.finish_node();
    }

    /// `!name`: the field must be absent.
    fn parse_negated_field(&mut self) {
        self.start_node(SyntaxKind::NegatedField);
        self.bump();
        if !self.eat(SyntaxKind::Id) {
            self.error(DiagnosticKind::ExpectedFieldName);
        }
        self.finish_node();
    }

    /// `@name` with nothing before it. The sigil and name become one error.
    fn error_capture_without_target(&mut self) {
        self.error(DiagnosticKind::CaptureWithoutTarget);
        self.start_node(SyntaxKind::Error);
        self.bump();
        self.eat(SyntaxKind::Id);
        self.finish_node();
    }
}
