//! Syntax kinds of the pattern language.
//!
//! `SyntaxKind` covers both tokens (recognized by Logos) and nodes (built by
//! the parser). `PatternLang` plugs it into Rowan.

use logos::Logos;
use rowan::Language;

/// Tokens first, then nodes, then the `__LAST` sentinel.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("(")]
    ParenOpen = 0,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token(":")]
    Colon,

    #[token("!")]
    Negation,

    #[token("_")]
    Underscore,

    #[token("@")]
    At,

    /// Alternative capture sigil, `#name`.
    #[token("#")]
    Hash,

    #[regex(r#""(?:[^"\\\n]|\\.)*""#)]
    StringLiteral,

    #[token("ERROR")]
    KwError,

    #[token("MISSING")]
    KwMissing,

    /// Defined after the keywords so they take precedence. A lone `_` is
    /// [`Underscore`](Self::Underscore); `_name` is an identifier.
    #[regex(r"[a-zA-Z][a-zA-Z0-9_]*")]
    #[regex(r"_[a-zA-Z0-9_]+")]
    Id,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[token("\n")]
    #[token("\r\n")]
    Newline,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    #[regex(r";[^\n]*", allow_greedy = true)]
    LineComment,

    /// Coalesced unrecognized characters
    Garbage,
    /// Returned past the last token.
    Eof,

    // --- Node kinds ---
    Root,
    Tree,
    Wildcard,
    Str,
    Field,
    NegatedField,
    Alt,
    Capture,
    Error,

    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Newline | LineComment)
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    #[inline]
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PatternLang {}

impl Language for PatternLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        assert!(raw.0 < __LAST as u16);
        // SAFETY: in bounds, and SyntaxKind is repr(u16) with contiguous discriminants
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<PatternLang>;
pub type SyntaxToken = rowan::SyntaxToken<PatternLang>;

/// Bitset of token kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u64);

impl TokenSet {
    /// Panics at compile time if a kind does not fit.
    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < kinds.len() {
            let kind = kinds[i] as u16;
            assert!(kind < 64, "SyntaxKind value exceeds TokenSet capacity");
            bits |= 1 << kind;
            i += 1;
        }
        TokenSet(bits)
    }

    #[inline]
    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        let kind = kind as u16;
        kind < 64 && self.0 & (1 << kind) != 0
    }
}

pub mod token_sets {
    use super::*;

    /// Tokens that can start a pattern. Captures wrap a pattern, they never
    /// start one.
    pub const PATTERN_FIRST: TokenSet = TokenSet::new(&[
        ParenOpen,
        BracketOpen,
        Underscore,
        StringLiteral,
        Id,
        Negation,
        KwError,
        KwMissing,
    ]);

    pub const CAPTURE_SIGILS: TokenSet = TokenSet::new(&[At, Hash]);
}
