//! Typed views over CST nodes.
//!
//! Casting checks only the node kind. Accessors return `None` where the
//! parser recovered from an error.

use super::cst::{SyntaxKind, SyntaxNode, SyntaxToken};

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl $name {
            pub fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == SyntaxKind::$kind).then(|| Self(node))
            }

            pub fn as_cst(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

ast_node!(Root, Root);
ast_node!(Tree, Tree);
ast_node!(Wildcard, Wildcard);
ast_node!(Str, Str);
ast_node!(Field, Field);
ast_node!(NegatedField, NegatedField);
ast_node!(Alt, Alt);
ast_node!(Capture, Capture);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pattern {
    Tree(Tree),
    Wildcard(Wildcard),
    Str(Str),
    Field(Field),
    NegatedField(NegatedField),
    Alt(Alt),
    Capture(Capture),
}

impl Pattern {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::Tree => Tree::cast(node).map(Pattern::Tree),
            SyntaxKind::Wildcard => Wildcard::cast(node).map(Pattern::Wildcard),
            SyntaxKind::Str => Str::cast(node).map(Pattern::Str),
            SyntaxKind::Field => Field::cast(node).map(Pattern::Field),
            SyntaxKind::NegatedField => NegatedField::cast(node).map(Pattern::NegatedField),
            SyntaxKind::Alt => Alt::cast(node).map(Pattern::Alt),
            SyntaxKind::Capture => Capture::cast(node).map(Pattern::Capture),
            _ => None,
        }
    }

    pub fn as_cst(&self) -> &SyntaxNode {
        match self {
            Pattern::Tree(n) => n.as_cst(),
            Pattern::Wildcard(n) => n.as_cst(),
            Pattern::Str(n) => n.as_cst(),
            Pattern::Field(n) => n.as_cst(),
            Pattern::NegatedField(n) => n.as_cst(),
            Pattern::Alt(n) => n.as_cst(),
            Pattern::Capture(n) => n.as_cst(),
        }
    }
}

fn tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> + '_ {
    node.children_with_tokens().filter_map(|it| it.into_token())
}

fn token_of(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    tokens(node).find(|t| t.kind() == kind)
}

impl Root {
    pub fn patterns(&self) -> impl Iterator<Item = Pattern> + '_ {
        self.0.children().filter_map(Pattern::cast)
    }
}

/// What a parenthesized pattern tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeHead {
    /// `(kind ...)`
    Kind(SyntaxToken),
    /// `(_ ...)`
    Any,
    /// `(ERROR)`
    Error,
    /// `(MISSING)`, `(MISSING kind)`, `(MISSING "text")`
    Missing(Option<SyntaxToken>),
}

impl Tree {
    /// `None` for `()` and trees that start with something else.
    pub fn head(&self) -> Option<TreeHead> {
        let mut tokens = tokens(&self.0).filter(|t| !t.kind().is_trivia());
        tokens.next()?; // `(`
        let first = tokens.next()?;
        match first.kind() {
            SyntaxKind::Id => Some(TreeHead::Kind(first)),
            SyntaxKind::Underscore => Some(TreeHead::Any),
            SyntaxKind::KwError => Some(TreeHead::Error),
            SyntaxKind::KwMissing => {
                let argument = tokens
                    .next()
                    .filter(|t| matches!(t.kind(), SyntaxKind::Id | SyntaxKind::StringLiteral));
                Some(TreeHead::Missing(argument))
            }
            _ => None,
        }
    }

    pub fn children(&self) -> impl Iterator<Item = Pattern> + '_ {
        self.0.children().filter_map(Pattern::cast)
    }
}

impl Str {
    pub fn token(&self) -> Option<SyntaxToken> {
        token_of(&self.0, SyntaxKind::StringLiteral)
    }

    /// Content between the quotes with escapes resolved.
    pub fn value(&self) -> Option<String> {
        self.token().map(|t| unquote(t.text()))
    }
}

impl Field {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_of(&self.0, SyntaxKind::Id)
    }

    pub fn value(&self) -> Option<Pattern> {
        self.0.children().find_map(Pattern::cast)
    }
}

impl NegatedField {
    pub fn name(&self) -> Option<SyntaxToken> {
        token_of(&self.0, SyntaxKind::Id)
    }
}

impl Alt {
    pub fn branches(&self) -> impl Iterator<Item = Pattern> + '_ {
        self.0.children().filter_map(Pattern::cast)
    }
}

impl Capture {
    pub fn inner(&self) -> Option<Pattern> {
        self.0.children().find_map(Pattern::cast)
    }

    /// The name after the sigil. The wrapped pattern's own tokens sit in a
    /// child node, so the first `Id` token is the name.
    pub fn name(&self) -> Option<SyntaxToken> {
        token_of(&self.0, SyntaxKind::Id)
    }
}

/// `"a\"b"` → `a"b`. Unknown escapes keep the escaped character.
pub fn unquote(literal: &str) -> String {
    let inner = literal
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(literal);
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}
