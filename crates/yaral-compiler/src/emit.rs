//! Narrow compiler ids to the table encoding and assemble the artifact body.

use std::num::NonZeroU16;

use yaral_core::{ERROR_SYMBOL, ProductionId, StateId, SymbolId};
use yaral_tables::{
    Action, LexTerminal, ParseState, Production, ProductionStep, SymbolInfo, TablesData,
};

use crate::conflicts::{ParseAction, StateActions};
use crate::error::CompileError;
use crate::flatten::FlatGrammar;

pub(crate) fn emit(
    grammar: &FlatGrammar,
    states: Vec<StateActions>,
) -> Result<TablesData, CompileError> {
    // ERROR_SYMBOL is reserved, so the last usable symbol id is one below it.
    check_limit("symbols", grammar.symbols.len(), ERROR_SYMBOL as usize)?;
    check_limit("fields", grammar.fields.len(), u16::MAX as usize)?;
    check_limit("productions", grammar.productions.len(), u16::MAX as usize)?;
    check_limit("states", states.len(), u16::MAX as usize)?;

    let symbols = grammar
        .symbols
        .iter()
        .map(|entry| SymbolInfo {
            name: entry.name.clone(),
            named: entry.named,
            visible: entry.visible,
            kind: entry.kind,
        })
        .collect();

    let productions = grammar
        .productions
        .iter()
        .map(|production| Production {
            lhs: production.lhs as SymbolId,
            steps: production
                .steps
                .iter()
                .map(|step| ProductionStep {
                    field: step.field.and_then(|f| NonZeroU16::new(f as u16)),
                    alias: step.alias.map(|a| a as SymbolId),
                })
                .collect(),
        })
        .collect();

    let states = states
        .into_iter()
        .map(|state| ParseState {
            actions: state
                .actions
                .into_iter()
                .map(|(symbol, action)| {
                    let action = match action {
                        ParseAction::Shift(target) => Action::Shift(target as StateId),
                        ParseAction::Reduce(production) => {
                            Action::Reduce(production as ProductionId)
                        }
                        ParseAction::Accept => Action::Accept,
                    };
                    (symbol as SymbolId, action)
                })
                .collect(),
            gotos: state
                .gotos
                .into_iter()
                .map(|(symbol, target)| (symbol as SymbolId, target as StateId))
                .collect(),
        })
        .collect();

    let terminals = grammar
        .lexical
        .iter()
        .enumerate()
        .map(|(index, var)| LexTerminal {
            symbol: (index + 1) as SymbolId,
            priority: var.priority,
            literal: var.literal,
            immediate: var.immediate,
        })
        .collect();

    Ok(TablesData {
        name: grammar.name.clone(),
        symbols,
        fields: grammar.fields.clone(),
        productions,
        states,
        terminals,
        start_symbol: grammar.start as SymbolId,
        word: grammar.word.map(|w| w as SymbolId),
    })
}

fn check_limit(what: &'static str, count: usize, limit: usize) -> Result<(), CompileError> {
    if count > limit {
        return Err(CompileError::TooLarge { what, limit });
    }
    Ok(())
}
