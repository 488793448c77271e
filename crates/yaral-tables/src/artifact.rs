//! Artifact assembly: header, postcard body, lexer DFA.

use crate::header::{Header, align_up};
use crate::tables::TablesData;
use crate::{SECTION_ALIGN, VERSION};

/// Assemble an artifact from table data and a serialized sparse lexer DFA.
///
/// The output is deterministic: identical inputs produce identical bytes.
pub fn encode(data: &TablesData, dfa_bytes: &[u8]) -> Result<Vec<u8>, postcard::Error> {
    let body = postcard::to_allocvec(data)?;

    let mut header = Header {
        version: VERSION,
        body_size: body.len() as u32,
        dfa_size: dfa_bytes.len() as u32,
        symbols_count: data.symbols.len() as u16,
        fields_count: data.fields.len() as u16,
        productions_count: data.productions.len() as u16,
        states_count: data.states.len() as u16,
        terminals_count: data.terminals.len() as u16,
        ..Default::default()
    };
    let offsets = header.compute_offsets();

    let mut bytes = vec![0u8; offsets.end as usize];
    let body_start = offsets.body as usize;
    bytes[body_start..body_start + body.len()].copy_from_slice(&body);
    let dfa_start = offsets.dfa as usize;
    bytes[dfa_start..dfa_start + dfa_bytes.len()].copy_from_slice(dfa_bytes);

    let total = align_up(offsets.end, SECTION_ALIGN as u32) as usize;
    bytes.resize(total, 0);

    header.total_size = total as u32;
    header.checksum = crc32fast::hash(&bytes[Header::SIZE..]);
    bytes[..Header::SIZE].copy_from_slice(&header.to_bytes());

    Ok(bytes)
}
