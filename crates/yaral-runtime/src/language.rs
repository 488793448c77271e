//! Runtime grammar handle.

use std::fmt;
use std::sync::Arc;

use yaral_core::{FieldId, SymbolId};
use yaral_tables::{LoadError, Tables};

/// Loaded grammar shared by parsers, trees and queries.
///
/// Cheap to clone. Two handles are equal when they share the same loaded
/// tables; trees are only reused by a parser with the same handle.
#[derive(Clone)]
pub struct Language(Arc<Tables>);

impl Language {
    /// Load and validate an artifact. Never yields a partially usable handle.
    pub fn load(bytes: &[u8]) -> Result<Self, LoadError> {
        Tables::load(bytes).map(Self::from_tables)
    }

    pub fn from_tables(tables: Tables) -> Self {
        Self(Arc::new(tables))
    }

    pub fn tables(&self) -> &Tables {
        &self.0
    }

    pub fn name(&self) -> &str {
        self.0.name()
    }

    pub fn node_kind_count(&self) -> usize {
        self.0.symbol_count()
    }

    /// Kind name for `id`; `ERROR` for the error kind.
    pub fn node_kind_for_id(&self, id: SymbolId) -> Option<&str> {
        if id == yaral_core::ERROR_SYMBOL {
            return Some(yaral_core::ERROR_KIND_NAME);
        }
        self.0.symbol(id).map(|s| s.name.as_str())
    }

    /// Id of a visible node kind. `named` distinguishes `identifier` from the
    /// literal `"identifier"`.
    pub fn id_for_node_kind(&self, name: &str, named: bool) -> Option<SymbolId> {
        self.0.symbol_for_name(name, named)
    }

    pub fn node_kind_is_named(&self, id: SymbolId) -> bool {
        self.0.is_named(id)
    }

    pub fn node_kind_is_visible(&self, id: SymbolId) -> bool {
        self.0.is_visible(id)
    }

    pub fn field_count(&self) -> usize {
        self.0.field_count()
    }

    pub fn field_id_for_name(&self, name: &str) -> Option<FieldId> {
        self.0.field_id(name)
    }

    pub fn field_name_for_id(&self, id: FieldId) -> Option<&str> {
        self.0.field_name(id)
    }

    pub(crate) fn symbol_name(&self, id: SymbolId) -> &str {
        self.0.symbol_name(id)
    }
}

impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for Language {}

impl fmt::Debug for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Language")
            .field("name", &self.name())
            .field("node_kinds", &self.node_kind_count())
            .field("fields", &self.field_count())
            .finish()
    }
}
