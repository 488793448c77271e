//! Invariant checks excluded from coverage reports.
//!
//! Ids reaching these accessors were validated when the tables were loaded.

#![cfg_attr(coverage_nightly, coverage(off))]

use yaral_core::{ProductionId, StateId, SymbolId};

use crate::tables::{ParseState, Production, SymbolInfo, Tables};

impl Tables {
    pub(crate) fn ensure_symbol(&self, id: SymbolId) -> &SymbolInfo {
        self.data.symbols.get(id as usize).unwrap_or_else(|| {
            panic!(
                "Tables: symbol {id} out of range ({} symbols)",
                self.data.symbols.len()
            )
        })
    }

    pub(crate) fn ensure_state(&self, id: StateId) -> &ParseState {
        self.data.states.get(id as usize).unwrap_or_else(|| {
            panic!(
                "Tables: state {id} out of range ({} states)",
                self.data.states.len()
            )
        })
    }

    pub(crate) fn ensure_production(&self, id: ProductionId) -> &Production {
        self.data.productions.get(id as usize).unwrap_or_else(|| {
            panic!(
                "Tables: production {id} out of range ({} productions)",
                self.data.productions.len()
            )
        })
    }
}
