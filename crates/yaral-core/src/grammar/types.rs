//! Grammar type definitions.

use serde::{Deserialize, Serialize};

/// Complete grammar. The first rule is the start rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grammar {
    pub name: String,
    /// Production rules, preserving definition order.
    pub rules: Vec<(String, Rule)>,
    /// Trivia allowed between any two tokens (comments, whitespace).
    #[serde(default)]
    pub extras: Vec<Rule>,
    /// Named precedence orderings, highest first.
    #[serde(default)]
    pub precedences: Vec<Vec<PrecedenceEntry>>,
    /// Rule groups whose conflicts are expected.
    #[serde(default)]
    pub conflicts: Vec<Vec<String>>,
    /// External scanner tokens. Not supported by the table compiler.
    #[serde(default)]
    pub externals: Vec<Rule>,
    /// Rules substituted into their parents at compile time.
    #[serde(default)]
    pub inline: Vec<String>,
    #[serde(default)]
    pub supertypes: Vec<String>,
    /// Identifier-like token that keywords are carved out of.
    #[serde(default)]
    pub word: Option<String>,
    #[serde(default)]
    pub reserved: Vec<(String, Vec<Rule>)>,
    #[serde(default)]
    pub inherits: Option<String>,
}

impl Grammar {
    /// Start rule name.
    pub fn start_rule(&self) -> Option<&str> {
        self.rules.first().map(|(name, _)| name.as_str())
    }

    /// Look up a rule by name.
    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|(n, _)| n == name).map(|(_, r)| r)
    }
}

/// Grammar rule variants.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rule {
    /// Epsilon (empty match).
    Blank,
    /// Literal token.
    String(String),
    /// Regex token.
    Pattern {
        value: String,
        #[serde(default)]
        flags: Option<String>,
    },
    /// Reference to another rule.
    Symbol(String),
    Seq(Vec<Rule>),
    Choice(Vec<Rule>),
    Repeat(Box<Rule>),
    Repeat1(Box<Rule>),
    /// Named field.
    Field { name: String, content: Box<Rule> },
    /// Rename node.
    Alias {
        content: Box<Rule>,
        value: String,
        named: bool,
    },
    /// Force tokenization.
    Token(Box<Rule>),
    /// Token that only matches with no trivia before it.
    ImmediateToken(Box<Rule>),
    Prec {
        value: Precedence,
        content: Box<Rule>,
    },
    PrecLeft {
        value: Precedence,
        content: Box<Rule>,
    },
    PrecRight {
        value: Precedence,
        content: Box<Rule>,
    },
    /// Runtime precedence. Accepted and ignored by the LALR compiler.
    PrecDynamic { value: i32, content: Box<Rule> },
    Reserved {
        context_name: String,
        content: Box<Rule>,
    },
}

impl Rule {
    /// Whether this rule describes a single token on its own.
    pub fn is_lexical(&self) -> bool {
        match self {
            Rule::String(_) | Rule::Pattern { .. } | Rule::Token(_) | Rule::ImmediateToken(_) => {
                true
            }
            Rule::Prec { content, .. }
            | Rule::PrecLeft { content, .. }
            | Rule::PrecRight { content, .. } => content.is_lexical(),
            _ => false,
        }
    }
}

/// Precedence value (numeric or named).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Precedence {
    Integer(i32),
    Name(String),
}

/// Entry in a precedence ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrecedenceEntry {
    Name(String),
    Symbol(String),
}
