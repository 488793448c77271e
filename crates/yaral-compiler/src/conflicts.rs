//! Turn automaton states into parse actions, resolving conflicts with
//! precedence, associativity and the grammar's declared conflict groups.

use std::collections::{BTreeMap, BTreeSet};

use yaral_tables::SymbolKind;

use crate::error::{CompileError, ConflictKind};
use crate::extract_tokens::Assoc;
use crate::flatten::FlatGrammar;
use crate::lalr::{Automaton, LalrState, completed};

/// Resolved action before ids are narrowed for the tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ParseAction {
    Shift(usize),
    Reduce(usize),
    Accept,
}

#[derive(Debug, Default)]
pub(crate) struct StateActions {
    pub actions: BTreeMap<usize, ParseAction>,
    pub gotos: BTreeMap<usize, usize>,
}

pub(crate) fn resolve(
    grammar: &FlatGrammar,
    automaton: &Automaton,
) -> Result<Vec<StateActions>, CompileError> {
    automaton
        .states
        .iter()
        .map(|state| resolve_state(grammar, automaton, state))
        .collect()
}

fn resolve_state(
    grammar: &FlatGrammar,
    automaton: &Automaton,
    state: &LalrState,
) -> Result<StateActions, CompileError> {
    let mut result = StateActions::default();
    let mut reduces: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    let mut accepts = false;

    for (production, lookahead) in completed(state, grammar, automaton) {
        if production == automaton.accept_production {
            accepts = true;
            continue;
        }
        for terminal in lookahead.iter() {
            reduces.entry(terminal).or_default().push(production);
        }
    }

    for (&symbol, &target) in &state.transitions {
        if grammar.is_terminal(symbol) {
            result.actions.insert(symbol, ParseAction::Shift(target));
        } else {
            result.gotos.insert(symbol, target);
        }
    }

    for (terminal, mut productions) in reduces {
        productions.sort_unstable();
        productions.dedup();
        let reduce = pick_reduce(grammar, terminal, &productions)?;

        let action = match result.actions.get(&terminal) {
            Some(ParseAction::Shift(_)) => {
                match shift_or_reduce(grammar, automaton, state, terminal, reduce)? {
                    Resolution::Shift => continue,
                    Resolution::Reduce => ParseAction::Reduce(reduce),
                }
            }
            _ => ParseAction::Reduce(reduce),
        };
        result.actions.insert(terminal, action);
    }

    if accepts {
        result.actions.insert(0, ParseAction::Accept);
    }
    Ok(result)
}

enum Resolution {
    Shift,
    Reduce,
}

fn reduce_precedence(grammar: &FlatGrammar, production: usize) -> (i32, Option<Assoc>) {
    grammar.productions[production]
        .steps
        .last()
        .map_or((0, None), |step| (step.prec, step.assoc))
}

fn pick_reduce(
    grammar: &FlatGrammar,
    terminal: usize,
    productions: &[usize],
) -> Result<usize, CompileError> {
    if let [only] = productions {
        return Ok(*only);
    }

    let best = productions
        .iter()
        .map(|&p| reduce_precedence(grammar, p).0)
        .max()
        .unwrap_or(0);
    let winners: Vec<usize> = productions
        .iter()
        .copied()
        .filter(|&p| reduce_precedence(grammar, p).0 == best)
        .collect();
    if let [winner] = winners.as_slice() {
        return Ok(*winner);
    }

    let rules = owners(grammar, winners.iter().map(|&p| grammar.productions[p].lhs));
    if is_expected(grammar, &rules) {
        return Ok(winners[0]);
    }
    Err(ambiguity(grammar, ConflictKind::ReduceReduce, terminal, rules))
}

fn shift_or_reduce(
    grammar: &FlatGrammar,
    automaton: &Automaton,
    state: &LalrState,
    terminal: usize,
    reduce: usize,
) -> Result<Resolution, CompileError> {
    let shifting: Vec<_> = state
        .items
        .iter()
        .map(|(item, _)| *item)
        .filter(|item| {
            item.production != automaton.accept_production
                && grammar.productions[item.production]
                    .steps
                    .get(item.dot)
                    .is_some_and(|step| step.symbol == terminal)
        })
        .collect();

    // Shifting items carry the precedence of the step before the dot, or of the
    // shifted step itself at the start of a production.
    let shift_prec = shifting
        .iter()
        .map(|item| {
            let steps = &grammar.productions[item.production].steps;
            steps[item.dot.saturating_sub(1)].prec
        })
        .max()
        .unwrap_or(0);
    let (reduce_prec, reduce_assoc) = reduce_precedence(grammar, reduce);

    if shift_prec > reduce_prec {
        return Ok(Resolution::Shift);
    }
    if shift_prec < reduce_prec {
        return Ok(Resolution::Reduce);
    }
    match reduce_assoc {
        Some(Assoc::Left) => Ok(Resolution::Reduce),
        Some(Assoc::Right) => Ok(Resolution::Shift),
        None => {
            let lhs = shifting
                .iter()
                .map(|item| grammar.productions[item.production].lhs)
                .chain([grammar.productions[reduce].lhs]);
            let rules = owners(grammar, lhs);
            if is_expected(grammar, &rules) {
                Ok(Resolution::Shift)
            } else {
                Err(ambiguity(grammar, ConflictKind::ShiftReduce, terminal, rules))
            }
        }
    }
}

/// Sorted rule names for `symbols`, mapping repetition helpers to their owner.
fn owners(grammar: &FlatGrammar, symbols: impl Iterator<Item = usize>) -> Vec<String> {
    symbols
        .map(|s| grammar.symbols[s].owner.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Whether one declared conflict group covers every involved rule.
fn is_expected(grammar: &FlatGrammar, rules: &[String]) -> bool {
    grammar
        .conflicts
        .iter()
        .any(|group| rules.iter().all(|rule| group.contains(rule)))
}

fn ambiguity(
    grammar: &FlatGrammar,
    kind: ConflictKind,
    terminal: usize,
    rules: Vec<String>,
) -> CompileError {
    let entry = &grammar.symbols[terminal];
    let lookahead = match entry.kind {
        SymbolKind::End => "end of input".to_owned(),
        _ if entry.named => entry.name.clone(),
        _ => format!("'{}'", entry.name),
    };
    CompileError::AmbiguousGrammar {
        kind,
        lookahead,
        rules,
    }
}
