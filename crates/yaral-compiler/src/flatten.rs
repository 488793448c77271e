//! Expand syntax rules into flat productions over numbered symbols.
//!
//! Symbol ids: `0` is end of input, then every terminal in lexical order, then
//! syntax rules in definition order, then generated repetition helpers, then
//! names that only exist through an alias.

use std::collections::HashMap;

use yaral_core::Name;
use yaral_tables::SymbolKind;

use crate::error::CompileError;
use crate::extract_tokens::{Assoc, ExtractedGrammar, IrRule, LexicalVariable, VariableKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct SymbolEntry {
    pub name: String,
    pub named: bool,
    pub visible: bool,
    pub kind: SymbolKind,
    /// Rule reported in conflict messages; repetition helpers report their owner.
    pub owner: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct FlatStep {
    pub symbol: usize,
    /// Field id, 1-based over the sorted field names.
    pub field: Option<usize>,
    pub alias: Option<usize>,
    pub prec: i32,
    pub assoc: Option<Assoc>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct FlatProduction {
    pub lhs: usize,
    pub steps: Vec<FlatStep>,
}

#[derive(Debug)]
pub(crate) struct FlatGrammar {
    pub name: String,
    pub symbols: Vec<SymbolEntry>,
    /// Terminal ids are `1..=terminal_count`.
    pub terminal_count: usize,
    pub productions: Vec<FlatProduction>,
    pub lexical: Vec<LexicalVariable>,
    pub fields: Vec<String>,
    pub conflicts: Vec<Vec<String>>,
    pub start: usize,
    pub word: Option<usize>,
}

impl FlatGrammar {
    pub fn is_terminal(&self, symbol: usize) -> bool {
        symbol <= self.terminal_count
    }
}

/// Step before field and alias ids are final.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct Step {
    symbol: usize,
    field: Option<Name>,
    alias: Option<(String, bool)>,
    prec: Option<i32>,
    assoc: Option<Assoc>,
}

pub(crate) fn flatten(grammar: ExtractedGrammar) -> Result<FlatGrammar, CompileError> {
    let terminal_count = grammar.lexical.len();
    let first_nonterminal = terminal_count + 1;

    let mut symbols = Vec::with_capacity(first_nonterminal + grammar.syntax.len());
    symbols.push(SymbolEntry {
        name: "end".to_owned(),
        named: false,
        visible: false,
        kind: SymbolKind::End,
        owner: "end".to_owned(),
    });
    for var in &grammar.lexical {
        symbols.push(SymbolEntry {
            name: var.name.clone(),
            named: var.kind != VariableKind::Anonymous,
            visible: matches!(var.kind, VariableKind::Named | VariableKind::Anonymous),
            kind: if var.extra {
                SymbolKind::Extra
            } else {
                SymbolKind::Terminal
            },
            owner: var.name.clone(),
        });
    }
    for var in &grammar.syntax {
        symbols.push(SymbolEntry {
            name: var.name.clone(),
            named: true,
            visible: var.kind == VariableKind::Named,
            kind: SymbolKind::Nonterminal,
            owner: var.name.clone(),
        });
    }

    let mut flattener = Flattener {
        first_nonterminal,
        symbols,
        productions: Vec::new(),
        repeats: HashMap::new(),
        repeat_counts: HashMap::new(),
    };

    for (index, var) in grammar.syntax.iter().enumerate() {
        let lhs = first_nonterminal + index;
        let alternatives = flattener.flatten(&var.rule, lhs)?;
        flattener.add_productions(lhs, alternatives);
    }

    let Flattener {
        mut symbols,
        productions,
        ..
    } = flattener;

    let mut field_names: Vec<(Name, &str)> = grammar.fields.iter().collect();
    field_names.sort_by(|a, b| a.1.cmp(b.1));
    let mut field_ids = HashMap::new();
    for (position, (name, _)) in field_names.iter().enumerate() {
        field_ids.insert(*name, position + 1);
    }
    let fields = field_names.iter().map(|(_, s)| (*s).to_owned()).collect();

    let mut alias_ids: HashMap<(String, bool), usize> = HashMap::new();
    let mut resolve_alias = |alias: &(String, bool), symbols: &mut Vec<SymbolEntry>| {
        if let Some(&id) = alias_ids.get(alias) {
            return id;
        }
        let existing = symbols
            .iter()
            .position(|s| s.visible && s.name == alias.0 && s.named == alias.1);
        let id = existing.unwrap_or_else(|| {
            symbols.push(SymbolEntry {
                name: alias.0.clone(),
                named: alias.1,
                visible: true,
                kind: SymbolKind::Alias,
                owner: alias.0.clone(),
            });
            symbols.len() - 1
        });
        alias_ids.insert(alias.clone(), id);
        id
    };

    let mut flat = Vec::with_capacity(productions.len());
    for (lhs, steps) in productions {
        let steps = steps
            .into_iter()
            .map(|step| FlatStep {
                symbol: step.symbol,
                field: step.field.map(|f| field_ids[&f]),
                alias: step.alias.as_ref().map(|a| resolve_alias(a, &mut symbols)),
                prec: step.prec.unwrap_or(0),
                assoc: step.assoc,
            })
            .collect();
        flat.push(FlatProduction { lhs, steps });
    }

    Ok(FlatGrammar {
        name: grammar.name,
        symbols,
        terminal_count,
        productions: flat,
        lexical: grammar.lexical,
        fields,
        conflicts: grammar.conflicts,
        start: first_nonterminal,
        word: grammar.word.map(|index| index + 1),
    })
}

struct Flattener {
    first_nonterminal: usize,
    symbols: Vec<SymbolEntry>,
    productions: Vec<(usize, Vec<Step>)>,
    /// Repetition helper per (owner, content), so equal repetitions share one.
    repeats: HashMap<(usize, IrRule), usize>,
    repeat_counts: HashMap<usize, usize>,
}

impl Flattener {
    fn add_productions(&mut self, lhs: usize, alternatives: Vec<Vec<Step>>) {
        for steps in alternatives {
            let duplicate = self
                .productions
                .iter()
                .any(|(l, s)| *l == lhs && *s == steps);
            if !duplicate {
                self.productions.push((lhs, steps));
            }
        }
    }

    /// All alternative step sequences for `rule`. `owner` names generated helpers.
    fn flatten(&mut self, rule: &IrRule, owner: usize) -> Result<Vec<Vec<Step>>, CompileError> {
        Ok(match rule {
            IrRule::Blank => vec![Vec::new()],
            IrRule::Terminal(index) => vec![vec![Step::new(index + 1)]],
            IrRule::NonTerminal(index) => vec![vec![Step::new(self.first_nonterminal + index)]],
            IrRule::Seq(members) => {
                let mut result = vec![Vec::new()];
                for member in members {
                    let tails = self.flatten(member, owner)?;
                    let mut next = Vec::with_capacity(result.len() * tails.len());
                    for head in &result {
                        for tail in &tails {
                            let mut steps: Vec<Step> = head.clone();
                            steps.extend(tail.iter().cloned());
                            next.push(steps);
                        }
                    }
                    result = next;
                }
                result
            }
            IrRule::Choice(members) => {
                let mut result = Vec::new();
                for member in members {
                    for alternative in self.flatten(member, owner)? {
                        if !result.contains(&alternative) {
                            result.push(alternative);
                        }
                    }
                }
                result
            }
            IrRule::Repeat1(content) => vec![vec![Step::new(self.repeat(content, owner)?)]],
            IrRule::Field(name, content) => {
                let mut alternatives = self.flatten(content, owner)?;
                for step in alternatives.iter_mut().flatten() {
                    step.field.get_or_insert(*name);
                }
                alternatives
            }
            IrRule::Alias {
                value,
                named,
                content,
            } => {
                let symbol = match content.as_ref() {
                    IrRule::Terminal(index) => index + 1,
                    IrRule::NonTerminal(index) => self.first_nonterminal + index,
                    _ => return Err(CompileError::InvalidAlias(self.symbols[owner].owner.clone())),
                };
                let mut step = Step::new(symbol);
                step.alias = Some((value.clone(), *named));
                vec![vec![step]]
            }
            IrRule::Prec {
                value,
                assoc,
                content,
            } => {
                let mut alternatives = self.flatten(content, owner)?;
                for step in alternatives.iter_mut().flatten() {
                    if step.prec.is_none() {
                        step.prec = Some(*value);
                        step.assoc = *assoc;
                    }
                }
                alternatives
            }
        })
    }

    /// Left-recursive helper `aux → aux x | x` for one-or-more repetition.
    fn repeat(&mut self, content: &IrRule, owner: usize) -> Result<usize, CompileError> {
        let key = (owner, content.clone());
        if let Some(&symbol) = self.repeats.get(&key) {
            return Ok(symbol);
        }

        let count = self.repeat_counts.entry(owner).or_insert(0);
        *count += 1;
        let owner_name = self.symbols[owner].owner.clone();
        let symbol = self.symbols.len();
        self.symbols.push(SymbolEntry {
            name: format!("{owner_name}_repeat{count}"),
            named: false,
            visible: false,
            kind: SymbolKind::Auxiliary,
            owner: owner_name,
        });
        self.repeats.insert(key, symbol);

        let alternatives = self.flatten(content, owner)?;
        let mut productions = Vec::with_capacity(alternatives.len() * 2);
        for alternative in &alternatives {
            let mut recursive = vec![Step::new(symbol)];
            recursive.extend(alternative.iter().cloned());
            productions.push(recursive);
        }
        productions.extend(alternatives);
        self.add_productions(symbol, productions);
        Ok(symbol)
    }
}

impl Step {
    fn new(symbol: usize) -> Self {
        Self {
            symbol,
            field: None,
            alias: None,
            prec: None,
            assoc: None,
        }
    }
}
