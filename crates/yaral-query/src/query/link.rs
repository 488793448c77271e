//! Resolves parsed patterns against a language.
//!
//! Kind and field names become ids, capture names become indices into the
//! query's name table. Problems are reported and the walk continues, so one
//! pass collects every unknown name.

use std::collections::HashSet;

use indexmap::IndexSet;
use rowan::TextRange;
use yaral_core::FieldId;
use yaral_runtime::Language;

use super::pattern::{CaptureId, Element, Test};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::parser::{SyntaxKind, SyntaxToken};
use crate::parser::ast::{self, Pattern, TreeHead};

/// First unknown kind or field, in source order.
#[derive(Debug, Clone)]
pub struct Unresolved {
    pub kind: DiagnosticKind,
    pub name: String,
    pub range: TextRange,
}

pub struct Linker<'a> {
    language: &'a Language,
    pub capture_names: IndexSet<String>,
    pub diagnostics: Diagnostics,
    pub unresolved: Option<Unresolved>,
}

/// Captures bound on the current path through a pattern.
type Scope = HashSet<CaptureId>;

impl<'a> Linker<'a> {
    pub fn new(language: &'a Language) -> Self {
        Self {
            language,
            capture_names: IndexSet::new(),
            diagnostics: Diagnostics::new(),
            unresolved: None,
        }
    }

    /// One entry per top-level pattern; `None` where it did not resolve.
    pub fn link(&mut self, root: &ast::Root) -> Vec<Option<Element>> {
        root.patterns()
            .map(|pattern| {
                let mut scope = Scope::new();
                self.element(&pattern, &mut scope)
            })
            .collect()
    }

    fn element(&mut self, pattern: &Pattern, scope: &mut Scope) -> Option<Element> {
        match pattern {
            Pattern::Tree(tree) => self.tree(tree, scope),
            Pattern::Wildcard(_) => Some(Element::new(Test::Any)),
            Pattern::Str(string) => {
                let token = string.token()?;
                let text = ast::unquote(token.text());
                match self.language.id_for_node_kind(&text, false) {
                    Some(id) => Some(Element::new(Test::Anonymous(id))),
                    None => {
                        self.unknown(DiagnosticKind::UnknownKind, token.text(), &token);
                        None
                    }
                }
            }
            Pattern::Field(field) => {
                let id = field.name().and_then(|name| self.field_id(&name));
                let mut value = self.element(&field.value()?, scope)?;
                value.field = Some(id?);
                Some(value)
            }
            Pattern::NegatedField(negated) => {
                self.diagnostics
                    .report(
                        DiagnosticKind::NegatedFieldOutsideTree,
                        negated.as_cst().text_range(),
                    )
                    .emit();
                None
            }
            Pattern::Alt(alt) => {
                let mut bound = Scope::new();
                let mut branches = Vec::new();
                let mut complete = true;
                for branch in alt.branches() {
                    let mut branch_scope = scope.clone();
                    match self.element(&branch, &mut branch_scope) {
                        Some(element) => branches.push(element),
                        None => complete = false,
                    }
                    bound.extend(branch_scope);
                }
                scope.extend(bound);
                complete.then(|| Element::new(Test::Alternation(branches)))
            }
            Pattern::Capture(capture) => {
                let inner = capture.inner().and_then(|inner| self.element(&inner, scope));
                let name = capture.name()?;
                let id = self.capture(&name, scope);
                let mut element = inner?;
                element.captures.push(id);
                Some(element)
            }
        }
    }

    fn tree(&mut self, tree: &ast::Tree, scope: &mut Scope) -> Option<Element> {
        let (kind, mut complete) = match tree.head()? {
            TreeHead::Error => return Some(Element::new(Test::Error)),
            TreeHead::Missing(None) => return Some(Element::new(Test::Missing(None))),
            TreeHead::Missing(Some(token)) => {
                let named = token.kind() != SyntaxKind::StringLiteral;
                let name = if named {
                    token.text().to_string()
                } else {
                    ast::unquote(token.text())
                };
                let Some(id) = self.language.id_for_node_kind(&name, named) else {
                    self.unknown(DiagnosticKind::UnknownKind, token.text(), &token);
                    return None;
                };
                return Some(Element::new(Test::Missing(Some(id))));
            }
            TreeHead::Any => (None, true),
            TreeHead::Kind(token) => match self.language.id_for_node_kind(token.text(), true) {
                Some(id) => (Some(id), true),
                None => {
                    self.unknown(DiagnosticKind::UnknownKind, token.text(), &token);
                    (None, false)
                }
            },
        };

        let mut children = Vec::new();
        let mut absent = Vec::new();
        for child in tree.children() {
            if let Pattern::NegatedField(negated) = &child {
                match negated.name().and_then(|name| self.field_id(&name)) {
                    Some(id) => absent.push(id),
                    None => complete = false,
                }
                continue;
            }
            match self.element(&child, scope) {
                Some(element) => children.push(element),
                None => complete = false,
            }
        }

        complete.then(|| {
            Element::new(Test::Named {
                kind,
                children,
                absent,
            })
        })
    }

    fn field_id(&mut self, name: &SyntaxToken) -> Option<FieldId> {
        let id = self.language.field_id_for_name(name.text());
        if id.is_none() {
            self.unknown(DiagnosticKind::UnknownField, name.text(), name);
        }
        id
    }

    fn capture(&mut self, name: &SyntaxToken, scope: &mut Scope) -> CaptureId {
        let (index, _) = self.capture_names.insert_full(name.text().to_string());
        let id = index as CaptureId;
        if !scope.insert(id) {
            self.diagnostics
                .report(DiagnosticKind::DuplicateCapture, name.text_range())
                .message(name.text())
                .emit();
        }
        id
    }

    fn unknown(&mut self, kind: DiagnosticKind, name: &str, token: &SyntaxToken) {
        let range = token.text_range();
        self.diagnostics.report(kind, range).message(name).emit();
        self.unresolved.get_or_insert_with(|| Unresolved {
            kind,
            name: name.to_string(),
            range,
        });
    }
}
