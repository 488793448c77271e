use std::fmt;

use rowan::TextRange;

/// Diagnostic kinds ordered by priority (highest priority first).
///
/// When two diagnostics overlap, the higher-priority one suppresses the
/// lower-priority one, so an unclosed `(` is reported once instead of as a
/// string of unexpected tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Cascade through the rest of the pattern
    UnclosedTree,
    UnclosedAlternation,
    NestingTooDeep,

    // Something required was left out
    ExpectedExpression,
    ExpectedCaptureName,
    ExpectedFieldName,
    ExpectedNodeKind,

    // Something that does not belong
    EmptyTree,
    BareIdentifier,
    ErrorTakesNoArguments,
    ErrorMissingOutsideParens,
    UnexpectedToken,
    CaptureWithoutTarget,
    NegatedFieldOutsideTree,

    // Valid syntax, invalid pattern
    DuplicateCapture,

    // Resolution against the grammar
    UnknownKind,
    UnknownField,
}

impl DiagnosticKind {
    /// Whether this kind suppresses `other` when their spans overlap.
    pub fn suppresses(&self, other: &DiagnosticKind) -> bool {
        self < other
    }

    pub fn is_structural_error(&self) -> bool {
        matches!(self, Self::UnclosedTree | Self::UnclosedAlternation)
    }

    /// Something was omitted. These win over `Unclosed*` at the same position.
    pub fn is_root_cause_error(&self) -> bool {
        matches!(
            self,
            Self::ExpectedExpression
                | Self::ExpectedCaptureName
                | Self::ExpectedFieldName
                | Self::ExpectedNodeKind
        )
    }

    /// Name resolution failures; everything before them is malformed syntax.
    pub fn is_resolution_error(&self) -> bool {
        matches!(self, Self::UnknownKind | Self::UnknownField)
    }

    pub fn default_hint(&self) -> Option<&'static str> {
        match self {
            Self::EmptyTree => Some("use `(_)` to match any named node, or `_` for any node"),
            Self::BareIdentifier => Some("node kinds go in parentheses, e.g. `(identifier)`"),
            Self::ExpectedFieldName => Some("e.g., `!window`"),
            _ => None,
        }
    }

    /// Message used when the call site gives no detail.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::UnclosedTree => "missing closing `)`",
            Self::UnclosedAlternation => "missing closing `]`",
            Self::NestingTooDeep => "pattern is nested too deeply",

            Self::ExpectedExpression => "expected a pattern",
            Self::ExpectedCaptureName => "expected capture name",
            Self::ExpectedFieldName => "expected field name",
            Self::ExpectedNodeKind => "expected node kind",

            Self::EmptyTree => "empty `()` is not allowed",
            Self::BareIdentifier => "bare identifier is not a pattern",
            Self::ErrorTakesNoArguments => "`(ERROR)` cannot have children",
            Self::ErrorMissingOutsideParens => "special node requires parentheses",
            Self::UnexpectedToken => "unexpected token",
            Self::CaptureWithoutTarget => "capture has no target",
            Self::NegatedFieldOutsideTree => "negated field must be a child of a node pattern",

            Self::DuplicateCapture => "duplicate capture",

            Self::UnknownKind => "unknown node kind",
            Self::UnknownField => "unknown field",
        }
    }

    /// Template for messages with detail; `{}` is replaced by the detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::UnclosedTree | Self::UnclosedAlternation => {
                format!("{}; {{}}", self.fallback_message())
            }
            Self::DuplicateCapture => "capture `@{}` is already bound in this pattern".to_string(),
            Self::UnknownKind => "`{}` is not a node kind of this language".to_string(),
            Self::UnknownField => "`{}` is not a field of this language".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// `None` gives the fallback message, `Some(detail)` the filled template.
    pub fn message(&self, detail: Option<&str>) -> String {
        match detail {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub(crate) range: TextRange,
    pub(crate) message: String,
}

impl RelatedInfo {
    pub fn new(range: TextRange, message: impl Into<String>) -> Self {
        Self {
            range,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    /// Underlined in the rendered output.
    pub(crate) range: TextRange,
    pub(crate) message: String,
    pub(crate) related: Vec<RelatedInfo>,
    pub(crate) hints: Vec<String>,
}

impl DiagnosticMessage {
    pub(crate) fn with_default_message(kind: DiagnosticKind, range: TextRange) -> Self {
        Self {
            kind,
            range,
            message: kind.fallback_message().to_string(),
            related: Vec::new(),
            hints: kind.default_hint().map(String::from).into_iter().collect(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn range(&self) -> TextRange {
        self.range
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "error at {}..{}: {}",
            u32::from(self.range.start()),
            u32::from(self.range.end()),
            self.message
        )?;
        for hint in &self.hints {
            write!(f, " (help: {hint})")?;
        }
        Ok(())
    }
}
