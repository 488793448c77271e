//! Table data model and the loaded [`Tables`] handle.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use yaral_core::{
    END_SYMBOL, ERROR_KIND_NAME, ERROR_SYMBOL, FieldId, ProductionId, StateId, SymbolId,
};

use crate::dfa::LexerDfa;

/// Role of a grammar symbol.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    /// End of input.
    End,
    Terminal,
    /// Terminal allowed anywhere between tokens (trivia).
    Extra,
    Nonterminal,
    /// Generated helper rule (repetitions). Never visible.
    Auxiliary,
    /// Name only introduced by an alias.
    Alias,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    pub named: bool,
    /// Hidden symbols never appear as tree nodes; hidden nonterminals are spliced
    /// into their parent.
    pub visible: bool,
    pub kind: SymbolKind,
}

impl SymbolInfo {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::End | SymbolKind::Terminal | SymbolKind::Extra
        )
    }
}

/// Field and alias attached to one step of a production.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionStep {
    pub field: Option<FieldId>,
    pub alias: Option<SymbolId>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Production {
    pub lhs: SymbolId,
    /// One entry per right-hand side symbol.
    pub steps: Vec<ProductionStep>,
}

impl Production {
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Shift(StateId),
    Reduce(ProductionId),
    Accept,
}

/// One LR state: actions keyed by terminal and gotos keyed by nonterminal, both
/// sorted by symbol id.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseState {
    pub actions: Vec<(SymbolId, Action)>,
    pub gotos: Vec<(SymbolId, StateId)>,
}

/// Lexer entry for one terminal. Pattern `i` of the lexer DFA belongs to
/// `terminals[i]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexTerminal {
    pub symbol: SymbolId,
    /// Token precedence; breaks ties between equal-length matches.
    pub priority: i32,
    /// Defined by a string literal (keywords, punctuation).
    pub literal: bool,
    /// Only matches when no trivia precedes it.
    pub immediate: bool,
}

/// Serialized body of an artifact.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TablesData {
    pub name: String,
    pub symbols: Vec<SymbolInfo>,
    /// Field names; `FieldId` n names `fields[n - 1]`.
    pub fields: Vec<String>,
    pub productions: Vec<Production>,
    pub states: Vec<ParseState>,
    pub terminals: Vec<LexTerminal>,
    pub start_symbol: SymbolId,
    pub word: Option<SymbolId>,
}

/// Loaded, validated grammar tables.
///
/// Created by [`Tables::load`]; immutable afterwards.
#[derive(Debug)]
pub struct Tables {
    pub(crate) data: TablesData,
    pub(crate) dfa: LexerDfa,
    pub(crate) kind_lookup: HashMap<(String, bool), SymbolId>,
    pub(crate) field_lookup: HashMap<String, FieldId>,
    /// Symbol id → index into `terminals`.
    pub(crate) terminal_index: Vec<Option<u16>>,
}

impl Tables {
    pub(crate) fn new(data: TablesData, dfa: LexerDfa) -> Self {
        let mut kind_lookup = HashMap::new();
        for (id, info) in data.symbols.iter().enumerate() {
            if info.visible || info.kind == SymbolKind::Alias {
                kind_lookup
                    .entry((info.name.clone(), info.named))
                    .or_insert(id as SymbolId);
            }
        }
        kind_lookup.insert((ERROR_KIND_NAME.to_owned(), true), ERROR_SYMBOL);

        let field_lookup = data
            .fields
            .iter()
            .enumerate()
            .filter_map(|(i, name)| FieldId::new(i as u16 + 1).map(|id| (name.clone(), id)))
            .collect();

        let mut terminal_index = vec![None; data.symbols.len()];
        for (i, terminal) in data.terminals.iter().enumerate() {
            terminal_index[terminal.symbol as usize] = Some(i as u16);
        }

        Self {
            data,
            dfa,
            kind_lookup,
            field_lookup,
            terminal_index,
        }
    }

    pub fn name(&self) -> &str {
        &self.data.name
    }

    pub fn data(&self) -> &TablesData {
        &self.data
    }

    pub fn symbol_count(&self) -> usize {
        self.data.symbols.len()
    }

    pub fn symbol(&self, id: SymbolId) -> Option<&SymbolInfo> {
        self.data.symbols.get(id as usize)
    }

    /// Kind name; `ERROR` for error nodes.
    pub fn symbol_name(&self, id: SymbolId) -> &str {
        if id == ERROR_SYMBOL {
            return ERROR_KIND_NAME;
        }
        &self.ensure_symbol(id).name
    }

    pub fn is_named(&self, id: SymbolId) -> bool {
        id == ERROR_SYMBOL || self.ensure_symbol(id).named
    }

    pub fn is_visible(&self, id: SymbolId) -> bool {
        id == ERROR_SYMBOL || self.ensure_symbol(id).visible
    }

    pub fn is_extra(&self, id: SymbolId) -> bool {
        id != ERROR_SYMBOL && self.ensure_symbol(id).kind == SymbolKind::Extra
    }

    pub fn is_terminal(&self, id: SymbolId) -> bool {
        id == END_SYMBOL || (id != ERROR_SYMBOL && self.ensure_symbol(id).is_terminal())
    }

    /// Kind id for a visible kind name (`named` selects `identifier` vs `"identifier"`).
    pub fn symbol_for_name(&self, name: &str, named: bool) -> Option<SymbolId> {
        self.kind_lookup.get(&(name.to_owned(), named)).copied()
    }

    pub fn field_count(&self) -> usize {
        self.data.fields.len()
    }

    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.field_lookup.get(name).copied()
    }

    pub fn field_name(&self, id: FieldId) -> Option<&str> {
        self.data
            .fields
            .get(id.get() as usize - 1)
            .map(String::as_str)
    }

    pub fn start_symbol(&self) -> SymbolId {
        self.data.start_symbol
    }

    pub fn word(&self) -> Option<SymbolId> {
        self.data.word
    }

    pub fn state_count(&self) -> usize {
        self.data.states.len()
    }

    pub fn production(&self, id: ProductionId) -> &Production {
        self.ensure_production(id)
    }

    pub fn production_count(&self) -> usize {
        self.data.productions.len()
    }

    /// All actions of a state, sorted by terminal id.
    pub fn actions(&self, state: StateId) -> &[(SymbolId, Action)] {
        &self.ensure_state(state).actions
    }

    pub fn action(&self, state: StateId, terminal: SymbolId) -> Option<Action> {
        let actions = self.actions(state);
        actions
            .binary_search_by_key(&terminal, |&(sym, _)| sym)
            .ok()
            .map(|i| actions[i].1)
    }

    pub fn goto(&self, state: StateId, nonterminal: SymbolId) -> Option<StateId> {
        let gotos = &self.ensure_state(state).gotos;
        gotos
            .binary_search_by_key(&nonterminal, |&(sym, _)| sym)
            .ok()
            .map(|i| gotos[i].1)
    }

    pub fn terminals(&self) -> &[LexTerminal] {
        &self.data.terminals
    }

    /// Lexer entry of a terminal symbol.
    pub fn lex_terminal(&self, symbol: SymbolId) -> Option<&LexTerminal> {
        let index = (*self.terminal_index.get(symbol as usize)?)?;
        self.data.terminals.get(index as usize)
    }

    pub fn dfa(&self) -> &LexerDfa {
        &self.dfa
    }
}
