//! Hand-built tables for `S → "a"`.

use regex_automata::dfa::{StartKind, dense};

use crate::tables::{
    Action, LexTerminal, ParseState, Production, ProductionStep, SymbolInfo, SymbolKind,
    TablesData,
};

fn symbol(name: &str, named: bool, kind: SymbolKind) -> SymbolInfo {
    SymbolInfo {
        name: name.to_owned(),
        named,
        visible: kind != SymbolKind::End,
        kind,
    }
}

pub fn tiny_data() -> TablesData {
    TablesData {
        name: "tiny".to_owned(),
        symbols: vec![
            symbol("end", true, SymbolKind::End),
            symbol("a", false, SymbolKind::Terminal),
            symbol("start", true, SymbolKind::Nonterminal),
        ],
        fields: vec!["value".to_owned()],
        productions: vec![Production {
            lhs: 2,
            steps: vec![ProductionStep {
                field: std::num::NonZeroU16::new(1),
                alias: None,
            }],
        }],
        states: vec![
            ParseState {
                actions: vec![(1, Action::Shift(1))],
                gotos: vec![(2, 2)],
            },
            ParseState {
                actions: vec![(0, Action::Reduce(0))],
                gotos: vec![],
            },
            ParseState {
                actions: vec![(0, Action::Accept)],
                gotos: vec![],
            },
        ],
        terminals: vec![LexTerminal {
            symbol: 1,
            priority: 0,
            literal: true,
            immediate: false,
        }],
        start_symbol: 2,
        word: None,
    }
}

pub fn tiny_dfa() -> Vec<u8> {
    let dense = dense::DFA::builder()
        .configure(dense::DFA::config().start_kind(StartKind::Anchored))
        .build_many(&["a"])
        .unwrap();
    dense.to_sparse().unwrap().to_bytes_little_endian()
}

pub fn tiny_artifact() -> Vec<u8> {
    crate::encode(&tiny_data(), &tiny_dfa()).unwrap()
}
