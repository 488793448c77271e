//! Rust combinators mirroring the tree-sitter `grammar.js` DSL.
//!
//! ```
//! use yaral_core::grammar::dsl::*;
//!
//! let grammar = GrammarBuilder::new("calc")
//!     .rule("program", repeat(sym("statement")))
//!     .rule("statement", seq([field("value", sym("number")), ";".into()]))
//!     .rule("number", pattern(r"\d+"))
//!     .extras([pattern(r"\s+")])
//!     .build();
//!
//! assert_eq!(grammar.start_rule(), Some("program"));
//! ```

use super::types::{Grammar, Precedence, PrecedenceEntry, Rule};

pub fn blank() -> Rule {
    Rule::Blank
}

pub fn string(value: impl Into<String>) -> Rule {
    Rule::String(value.into())
}

pub fn pattern(value: impl Into<String>) -> Rule {
    Rule::Pattern {
        value: value.into(),
        flags: None,
    }
}

/// Case-insensitive pattern.
pub fn pattern_nocase(value: impl Into<String>) -> Rule {
    Rule::Pattern {
        value: value.into(),
        flags: Some("i".to_owned()),
    }
}

pub fn sym(name: impl Into<String>) -> Rule {
    Rule::Symbol(name.into())
}

pub fn seq(members: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::Seq(members.into_iter().collect())
}

pub fn choice(members: impl IntoIterator<Item = Rule>) -> Rule {
    Rule::Choice(members.into_iter().collect())
}

pub fn optional(rule: Rule) -> Rule {
    choice([rule, blank()])
}

pub fn repeat(rule: Rule) -> Rule {
    Rule::Repeat(Box::new(rule))
}

pub fn repeat1(rule: Rule) -> Rule {
    Rule::Repeat1(Box::new(rule))
}

pub fn field(name: impl Into<String>, content: Rule) -> Rule {
    Rule::Field {
        name: name.into(),
        content: Box::new(content),
    }
}

pub fn alias(content: Rule, value: impl Into<String>, named: bool) -> Rule {
    Rule::Alias {
        content: Box::new(content),
        value: value.into(),
        named,
    }
}

pub fn token(content: Rule) -> Rule {
    Rule::Token(Box::new(content))
}

pub fn immediate_token(content: Rule) -> Rule {
    Rule::ImmediateToken(Box::new(content))
}

pub fn prec(value: i32, content: Rule) -> Rule {
    Rule::Prec {
        value: Precedence::Integer(value),
        content: Box::new(content),
    }
}

pub fn prec_left(value: i32, content: Rule) -> Rule {
    Rule::PrecLeft {
        value: Precedence::Integer(value),
        content: Box::new(content),
    }
}

pub fn prec_right(value: i32, content: Rule) -> Rule {
    Rule::PrecRight {
        value: Precedence::Integer(value),
        content: Box::new(content),
    }
}

pub fn prec_dynamic(value: i32, content: Rule) -> Rule {
    Rule::PrecDynamic {
        value,
        content: Box::new(content),
    }
}

/// `rule (separator rule)*`
pub fn sep1(rule: Rule, separator: &str) -> Rule {
    seq([rule.clone(), repeat(seq([string(separator), rule]))])
}

/// Optional [`sep1`].
pub fn sep(rule: Rule, separator: &str) -> Rule {
    optional(sep1(rule, separator))
}

impl From<&str> for Rule {
    fn from(value: &str) -> Self {
        string(value)
    }
}

/// Builder for a [`Grammar`]. The first rule added is the start rule.
#[derive(Debug, Clone)]
pub struct GrammarBuilder {
    grammar: Grammar,
}

impl GrammarBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            grammar: Grammar {
                name: name.into(),
                rules: Vec::new(),
                extras: Vec::new(),
                precedences: Vec::new(),
                conflicts: Vec::new(),
                externals: Vec::new(),
                inline: Vec::new(),
                supertypes: Vec::new(),
                word: None,
                reserved: Vec::new(),
                inherits: None,
            },
        }
    }

    pub fn rule(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.grammar.rules.push((name.into(), rule));
        self
    }

    pub fn extras(mut self, extras: impl IntoIterator<Item = Rule>) -> Self {
        self.grammar.extras = extras.into_iter().collect();
        self
    }

    pub fn word(mut self, name: impl Into<String>) -> Self {
        self.grammar.word = Some(name.into());
        self
    }

    /// Declare rules whose mutual conflicts fall back to default resolution.
    pub fn conflict<S: Into<String>>(mut self, rules: impl IntoIterator<Item = S>) -> Self {
        self.grammar
            .conflicts
            .push(rules.into_iter().map(Into::into).collect());
        self
    }

    /// Named precedence levels, highest first.
    pub fn precedences<S: Into<String>>(mut self, levels: impl IntoIterator<Item = S>) -> Self {
        self.grammar.precedences.push(
            levels
                .into_iter()
                .map(|s| PrecedenceEntry::Name(s.into()))
                .collect(),
        );
        self
    }

    pub fn inline<S: Into<String>>(mut self, rules: impl IntoIterator<Item = S>) -> Self {
        self.grammar.inline.extend(rules.into_iter().map(Into::into));
        self
    }

    pub fn supertypes<S: Into<String>>(mut self, rules: impl IntoIterator<Item = S>) -> Self {
        self.grammar
            .supertypes
            .extend(rules.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Grammar {
        self.grammar
    }
}
