//! Artifact loading and validation.

use std::io;
use std::path::Path;

use yaral_core::{END_SYMBOL, FieldId, SymbolId};

use crate::dfa::deserialize_dfa;
use crate::header::Header;
use crate::tables::{Action, SymbolKind, Tables, TablesData};
use crate::VERSION;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("file too small: {0} bytes (minimum 64)")]
    FileTooSmall(usize),
    #[error("invalid magic: expected YRLT")]
    InvalidMagic,
    #[error("incompatible artifact version {found} (this build reads version {expected})")]
    IncompatibleVersion { found: u32, expected: u32 },
    #[error("size mismatch: header says {header} bytes, got {actual}")]
    SizeMismatch { header: u32, actual: usize },
    #[error("checksum mismatch: header says {expected:#010x}, content hashes to {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
    #[error("cannot decode tables: {0}")]
    Decode(#[from] postcard::Error),
    #[error("cannot decode lexer automaton: {0}")]
    Dfa(String),
    #[error("corrupt tables: {0}")]
    Corrupt(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl Tables {
    /// Load and validate an artifact.
    pub fn load(bytes: &[u8]) -> Result<Self, LoadError> {
        if bytes.len() < Header::SIZE {
            return Err(LoadError::FileTooSmall(bytes.len()));
        }

        let header = Header::from_bytes(&bytes[..Header::SIZE]);

        if !header.validate_magic() {
            return Err(LoadError::InvalidMagic);
        }
        if !header.validate_version() {
            return Err(LoadError::IncompatibleVersion {
                found: header.version,
                expected: VERSION,
            });
        }
        if header.total_size as usize != bytes.len() {
            return Err(LoadError::SizeMismatch {
                header: header.total_size,
                actual: bytes.len(),
            });
        }

        let actual = crc32fast::hash(&bytes[Header::SIZE..]);
        if actual != header.checksum {
            return Err(LoadError::ChecksumMismatch {
                expected: header.checksum,
                actual,
            });
        }

        let offsets = header.compute_offsets();
        if offsets.end as usize > bytes.len() {
            return Err(LoadError::Corrupt(format!(
                "sections end at {} but the artifact has {} bytes",
                offsets.end,
                bytes.len()
            )));
        }

        let body = &bytes[offsets.body as usize..(offsets.body + header.body_size) as usize];
        let data: TablesData = postcard::from_bytes(body)?;
        check_counts(&header, &data)?;
        validate(&data)?;

        let dfa = deserialize_dfa(&bytes[offsets.dfa as usize..offsets.end as usize])
            .map_err(LoadError::Dfa)?;
        let patterns = regex_automata::dfa::Automaton::pattern_len(&dfa);
        if patterns != data.terminals.len() {
            return Err(LoadError::Corrupt(format!(
                "lexer has {patterns} patterns for {} terminals",
                data.terminals.len()
            )));
        }

        Ok(Tables::new(data, dfa))
    }

    /// Read and load an artifact file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let bytes = std::fs::read(path)?;
        Self::load(&bytes)
    }
}

fn check_counts(header: &Header, data: &TablesData) -> Result<(), LoadError> {
    let pairs = [
        ("symbols", header.symbols_count, data.symbols.len()),
        ("fields", header.fields_count, data.fields.len()),
        ("productions", header.productions_count, data.productions.len()),
        ("states", header.states_count, data.states.len()),
        ("terminals", header.terminals_count, data.terminals.len()),
    ];
    for (what, declared, actual) in pairs {
        if declared as usize != actual {
            return Err(LoadError::Corrupt(format!(
                "header declares {declared} {what}, body has {actual}"
            )));
        }
    }
    Ok(())
}

/// Cross-reference validation: every id in the tables points at something that exists
/// and has the right role.
fn validate(data: &TablesData) -> Result<(), LoadError> {
    let corrupt = |msg: String| Err(LoadError::Corrupt(msg));
    let symbols = data.symbols.len();
    let kind_of = |id: SymbolId| data.symbols.get(id as usize).map(|s| s.kind);
    let is_terminal = |id: SymbolId| {
        matches!(
            kind_of(id),
            Some(SymbolKind::End | SymbolKind::Terminal | SymbolKind::Extra)
        )
    };
    let is_nonterminal = |id: SymbolId| {
        matches!(
            kind_of(id),
            Some(SymbolKind::Nonterminal | SymbolKind::Auxiliary)
        )
    };
    let field_ok = |f: Option<FieldId>| f.is_none_or(|f| (f.get() as usize) <= data.fields.len());

    if kind_of(END_SYMBOL) != Some(SymbolKind::End) {
        return corrupt("symbol 0 is not the end symbol".into());
    }
    if !is_nonterminal(data.start_symbol) {
        return corrupt(format!("start symbol {} is not a rule", data.start_symbol));
    }
    if data.word.is_some_and(|w| !is_terminal(w)) {
        return corrupt("word symbol is not a terminal".into());
    }
    if data.states.is_empty() {
        return corrupt("no parse states".into());
    }

    for (i, production) in data.productions.iter().enumerate() {
        if !is_nonterminal(production.lhs) {
            return corrupt(format!("production {i} reduces to a non-rule symbol"));
        }
        for step in &production.steps {
            if !field_ok(step.field) {
                return corrupt(format!("production {i} has an unknown field"));
            }
            if step.alias.is_some_and(|a| a as usize >= symbols) {
                return corrupt(format!("production {i} has an unknown alias"));
            }
        }
    }

    for (i, state) in data.states.iter().enumerate() {
        if !state.actions.is_sorted_by_key(|&(sym, _)| sym)
            || !state.gotos.is_sorted_by_key(|&(sym, _)| sym)
        {
            return corrupt(format!("state {i} is not sorted"));
        }
        for &(sym, action) in &state.actions {
            if !is_terminal(sym) {
                return corrupt(format!("state {i} has an action on non-terminal {sym}"));
            }
            let ok = match action {
                Action::Shift(target) => (target as usize) < data.states.len(),
                Action::Reduce(p) => (p as usize) < data.productions.len(),
                Action::Accept => sym == END_SYMBOL,
            };
            if !ok {
                return corrupt(format!("state {i} has an invalid action {action:?}"));
            }
        }
        for &(sym, target) in &state.gotos {
            if !is_nonterminal(sym) || target as usize >= data.states.len() {
                return corrupt(format!("state {i} has an invalid goto on {sym}"));
            }
        }
    }

    for terminal in &data.terminals {
        if !is_terminal(terminal.symbol) || terminal.symbol == END_SYMBOL {
            return corrupt(format!("lexer entry for non-terminal {}", terminal.symbol));
        }
    }

    Ok(())
}
