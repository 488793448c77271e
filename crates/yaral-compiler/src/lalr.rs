//! LALR(1) automaton construction.
//!
//! States are built as LR(1) item sets whose lookaheads are merged whenever two
//! states share the same core (the items without lookaheads). A state whose
//! kernel lookaheads grow is processed again until nothing changes.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::flatten::FlatGrammar;
use crate::terminal_set::TerminalSet;

/// Production index and dot position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct Item {
    pub production: usize,
    pub dot: usize,
}

#[derive(Debug, Default)]
pub(crate) struct LalrState {
    /// Closure items with their lookaheads, kernel first.
    pub items: Vec<(Item, TerminalSet)>,
    /// Successor state per symbol (terminal shifts and nonterminal gotos).
    pub transitions: BTreeMap<usize, usize>,
}

#[derive(Debug)]
pub(crate) struct Automaton {
    pub states: Vec<LalrState>,
    /// Index of the augmented `start' → start` production, one past the
    /// grammar's productions.
    pub accept_production: usize,
}

/// Right-hand sides indexed by production, including the augmented one.
struct Rhs<'a> {
    grammar: &'a FlatGrammar,
    augmented: [usize; 1],
    by_lhs: HashMap<usize, Vec<usize>>,
}

impl Rhs<'_> {
    fn symbols(&self, production: usize) -> RhsIter<'_> {
        match self.grammar.productions.get(production) {
            Some(p) => RhsIter::Steps(p.steps.iter()),
            None => RhsIter::Start(self.augmented.iter()),
        }
    }

    fn symbol_at(&self, item: Item) -> Option<usize> {
        self.symbols(item.production).nth(item.dot)
    }
}

enum RhsIter<'a> {
    Steps(std::slice::Iter<'a, crate::flatten::FlatStep>),
    Start(std::slice::Iter<'a, usize>),
}

impl Iterator for RhsIter<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        match self {
            RhsIter::Steps(steps) => steps.next().map(|s| s.symbol),
            RhsIter::Start(symbols) => symbols.next().copied(),
        }
    }
}

struct FirstSets {
    first: Vec<TerminalSet>,
    nullable: Vec<bool>,
}

impl FirstSets {
    fn compute(grammar: &FlatGrammar) -> Self {
        let count = grammar.symbols.len();
        let mut first = vec![TerminalSet::new(); count];
        let mut nullable = vec![false; count];
        for terminal in 0..=grammar.terminal_count {
            first[terminal].insert(terminal);
        }

        let mut changed = true;
        while changed {
            changed = false;
            for production in &grammar.productions {
                let mut all_nullable = true;
                for step in &production.steps {
                    if step.symbol != production.lhs {
                        let (head, tail) = split_pair(&mut first, production.lhs, step.symbol);
                        changed |= head.union_with(tail);
                    }
                    if !nullable[step.symbol] {
                        all_nullable = false;
                        break;
                    }
                }
                if all_nullable && !nullable[production.lhs] {
                    nullable[production.lhs] = true;
                    changed = true;
                }
            }
        }

        Self { first, nullable }
    }

    /// FIRST of `symbols` followed by `lookahead`.
    fn of_sequence(
        &self,
        symbols: impl Iterator<Item = usize>,
        lookahead: &TerminalSet,
    ) -> TerminalSet {
        let mut result = TerminalSet::new();
        for symbol in symbols {
            result.union_with(&self.first[symbol]);
            if !self.nullable[symbol] {
                return result;
            }
        }
        result.union_with(lookahead);
        result
    }
}

/// Mutable reference to `sets[target]` and shared reference to `sets[source]`.
fn split_pair(
    sets: &mut [TerminalSet],
    target: usize,
    source: usize,
) -> (&mut TerminalSet, &TerminalSet) {
    if target < source {
        let (low, high) = sets.split_at_mut(source);
        (&mut low[target], &high[0])
    } else {
        let (low, high) = sets.split_at_mut(target);
        (&mut high[0], &low[source])
    }
}

pub(crate) fn build(grammar: &FlatGrammar) -> Automaton {
    let accept_production = grammar.productions.len();
    let mut by_lhs: HashMap<usize, Vec<usize>> = HashMap::new();
    for (index, production) in grammar.productions.iter().enumerate() {
        by_lhs.entry(production.lhs).or_default().push(index);
    }
    let rhs = Rhs {
        grammar,
        augmented: [grammar.start],
        by_lhs,
    };
    let firsts = FirstSets::compute(grammar);

    let start = vec![(
        Item {
            production: accept_production,
            dot: 0,
        },
        TerminalSet::single(0),
    )];

    let mut kernels: Vec<Vec<(Item, TerminalSet)>> = vec![start.clone()];
    let mut transitions: Vec<BTreeMap<usize, usize>> = vec![BTreeMap::new()];
    let mut by_core: HashMap<Vec<Item>, usize> = HashMap::new();
    by_core.insert(vec![start[0].0], 0);

    let mut queue = VecDeque::from([0]);
    let mut queued = vec![true];

    while let Some(state) = queue.pop_front() {
        queued[state] = false;
        let items = closure(&kernels[state], &rhs, &firsts);

        let mut successors: BTreeMap<usize, Vec<(Item, TerminalSet)>> = BTreeMap::new();
        for (item, lookahead) in &items {
            if let Some(symbol) = rhs.symbol_at(*item) {
                let next = Item {
                    production: item.production,
                    dot: item.dot + 1,
                };
                let kernel = successors.entry(symbol).or_default();
                match kernel.iter_mut().find(|(i, _)| *i == next) {
                    Some((_, existing)) => {
                        existing.union_with(lookahead);
                    }
                    None => kernel.push((next, lookahead.clone())),
                }
            }
        }

        for (symbol, mut kernel) in successors {
            kernel.sort_by_key(|(item, _)| *item);
            let core: Vec<Item> = kernel.iter().map(|(item, _)| *item).collect();
            let target = match by_core.get(&core) {
                Some(&target) => {
                    let mut grew = false;
                    let merged = kernels[target].iter_mut().zip(&kernel);
                    for ((_, existing), (_, incoming)) in merged {
                        grew |= existing.union_with(incoming);
                    }
                    if grew && !queued[target] {
                        queued[target] = true;
                        queue.push_back(target);
                    }
                    target
                }
                None => {
                    let target = kernels.len();
                    kernels.push(kernel);
                    transitions.push(BTreeMap::new());
                    queued.push(true);
                    queue.push_back(target);
                    by_core.insert(core, target);
                    target
                }
            };
            transitions[state].insert(symbol, target);
        }
    }

    let states = kernels
        .iter()
        .zip(transitions)
        .map(|(kernel, transitions)| LalrState {
            items: closure(kernel, &rhs, &firsts),
            transitions,
        })
        .collect();

    Automaton {
        states,
        accept_production,
    }
}

impl Automaton {
    pub fn production_len(&self, grammar: &FlatGrammar, production: usize) -> usize {
        if production == self.accept_production {
            1
        } else {
            grammar.productions[production].steps.len()
        }
    }
}

fn closure(
    kernel: &[(Item, TerminalSet)],
    rhs: &Rhs<'_>,
    firsts: &FirstSets,
) -> Vec<(Item, TerminalSet)> {
    let mut items: Vec<(Item, TerminalSet)> = kernel.to_vec();
    let mut index: HashMap<Item, usize> = items
        .iter()
        .enumerate()
        .map(|(i, (item, _))| (*item, i))
        .collect();

    let mut pending: VecDeque<usize> = (0..items.len()).collect();
    while let Some(position) = pending.pop_front() {
        let (item, lookahead) = items[position].clone();
        let Some(symbol) = rhs.symbol_at(item) else {
            continue;
        };
        let Some(productions) = rhs.by_lhs.get(&symbol) else {
            continue;
        };
        let rest = rhs.symbols(item.production).skip(item.dot + 1);
        let follow = firsts.of_sequence(rest, &lookahead);

        for &production in productions {
            let new_item = Item { production, dot: 0 };
            match index.get(&new_item) {
                Some(&existing) => {
                    if items[existing].1.union_with(&follow) {
                        pending.push_back(existing);
                    }
                }
                None => {
                    index.insert(new_item, items.len());
                    pending.push_back(items.len());
                    items.push((new_item, follow.clone()));
                }
            }
        }
    }
    items
}

/// Items whose dot is at the end, with the lookaheads that trigger a reduce.
pub(crate) fn completed<'a>(
    state: &'a LalrState,
    grammar: &'a FlatGrammar,
    automaton: &'a Automaton,
) -> impl Iterator<Item = (usize, &'a TerminalSet)> + 'a {
    state.items.iter().filter_map(move |(item, lookahead)| {
        (item.dot == automaton.production_len(grammar, item.production))
            .then_some((item.production, lookahead))
    })
}
