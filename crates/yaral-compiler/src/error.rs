use std::fmt;

/// Kind of an unresolved parse table conflict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictKind {
    ShiftReduce,
    ReduceReduce,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShiftReduce => f.write_str("shift/reduce"),
            Self::ReduceReduce => f.write_str("reduce/reduce"),
        }
    }
}

/// Grammar compilation error. Always fatal; surfaced at build time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("grammar has no rules")]
    EmptyGrammar,

    #[error("rule `{0}` is defined more than once")]
    DuplicateRule(String),

    #[error("rule `{referenced_by}` references undefined rule `{name}`")]
    UndefinedRule { name: String, referenced_by: String },

    #[error("rule `{0}` is unreachable from the start rule")]
    UnreachableRule(String),

    #[error("tokens `{first}` and `{second}` have identical definitions")]
    DuplicateTokenKind { first: String, second: String },

    #[error("{kind} conflict on {lookahead} between rules {}", format_rules(.rules))]
    AmbiguousGrammar {
        kind: ConflictKind,
        lookahead: String,
        rules: Vec<String>,
    },

    #[error("rule `{rule}` uses undeclared precedence `{name}`")]
    UnknownPrecedence { name: String, rule: String },

    #[error("external scanners are not supported")]
    UnsupportedExternals,

    #[error("word token `{0}` must be a lexical rule")]
    InvalidWord(String),

    #[error("extra `{0}` must be a lexical rule")]
    NonTerminalExtra(String),

    #[error("inline rule `{0}` is recursive")]
    RecursiveInline(String),

    #[error("token in `{rule}` may only contain strings, patterns and repetitions")]
    InvalidToken { rule: String },

    #[error("token `{0}` matches the empty string")]
    EmptyToken(String),

    #[error("invalid pattern in `{rule}`: {message}")]
    InvalidRegex { rule: String, message: String },

    #[error("alias in `{0}` must wrap a single symbol")]
    InvalidAlias(String),

    #[error("cannot build lexer: {0}")]
    Lexer(String),

    #[error("grammar too large: more than {limit} {what}")]
    TooLarge { what: &'static str, limit: usize },

    #[error("cannot encode tables: {0}")]
    Encode(String),
}

fn format_rules(rules: &[String]) -> String {
    rules
        .iter()
        .map(|r| format!("`{r}`"))
        .collect::<Vec<_>>()
        .join(" and ")
}
