//! Artifact header (64 bytes).
//!
//! Layout (little-endian):
//! - 0-23: identity and sizes (magic, version, checksum, total_size, body_size, dfa_size)
//! - 24-33: counts (5 × u16) used to cross-check the decoded body
//! - 34-63: reserved
//!
//! Sections follow the header, each aligned to [`SECTION_ALIGN`]:
//! Header → Body (postcard tables) → Lexer DFA

use super::{MAGIC, SECTION_ALIGN, VERSION};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(C, align(64))]
pub struct Header {
    /// Magic bytes: b"YRLT"
    pub magic: [u8; 4],
    pub version: u32,
    /// CRC32 of everything after the header.
    pub checksum: u32,
    /// Total artifact size in bytes.
    pub total_size: u32,
    pub body_size: u32,
    pub dfa_size: u32,

    pub symbols_count: u16,
    pub fields_count: u16,
    pub productions_count: u16,
    pub states_count: u16,
    pub terminals_count: u16,

    pub _reserved: [u8; 30],
}

const _: () = assert!(std::mem::size_of::<Header>() == 64);

impl Default for Header {
    fn default() -> Self {
        Self {
            magic: MAGIC,
            version: VERSION,
            checksum: 0,
            total_size: 0,
            body_size: 0,
            dfa_size: 0,
            symbols_count: 0,
            fields_count: 0,
            productions_count: 0,
            states_count: 0,
            terminals_count: 0,
            _reserved: [0; 30],
        }
    }
}

/// Section offsets derived from the header sizes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionOffsets {
    pub body: u32,
    pub dfa: u32,
    pub end: u32,
}

impl Header {
    pub const SIZE: usize = 64;

    /// Decode a header from the first 64 bytes.
    ///
    /// # Panics
    /// Panics if `bytes` is shorter than 64 bytes; callers check the length first.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        assert!(bytes.len() >= Self::SIZE, "header too short");

        let u32_at = |i: usize| u32::from_le_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]);
        let u16_at = |i: usize| u16::from_le_bytes([bytes[i], bytes[i + 1]]);

        let mut reserved = [0u8; 30];
        reserved.copy_from_slice(&bytes[34..64]);

        Self {
            magic: [bytes[0], bytes[1], bytes[2], bytes[3]],
            version: u32_at(4),
            checksum: u32_at(8),
            total_size: u32_at(12),
            body_size: u32_at(16),
            dfa_size: u32_at(20),
            symbols_count: u16_at(24),
            fields_count: u16_at(26),
            productions_count: u16_at(28),
            states_count: u16_at(30),
            terminals_count: u16_at(32),
            _reserved: reserved,
        }
    }

    pub fn to_bytes(&self) -> [u8; 64] {
        let mut bytes = [0u8; 64];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4..8].copy_from_slice(&self.version.to_le_bytes());
        bytes[8..12].copy_from_slice(&self.checksum.to_le_bytes());
        bytes[12..16].copy_from_slice(&self.total_size.to_le_bytes());
        bytes[16..20].copy_from_slice(&self.body_size.to_le_bytes());
        bytes[20..24].copy_from_slice(&self.dfa_size.to_le_bytes());
        bytes[24..26].copy_from_slice(&self.symbols_count.to_le_bytes());
        bytes[26..28].copy_from_slice(&self.fields_count.to_le_bytes());
        bytes[28..30].copy_from_slice(&self.productions_count.to_le_bytes());
        bytes[30..32].copy_from_slice(&self.states_count.to_le_bytes());
        bytes[32..34].copy_from_slice(&self.terminals_count.to_le_bytes());
        bytes[34..64].copy_from_slice(&self._reserved);
        bytes
    }

    pub fn validate_magic(&self) -> bool {
        self.magic == MAGIC
    }

    pub fn validate_version(&self) -> bool {
        self.version == VERSION
    }

    /// Compute section offsets from the blob sizes.
    pub fn compute_offsets(&self) -> SectionOffsets {
        let align = SECTION_ALIGN as u32;
        let body = align;
        let dfa = align_up(body + self.body_size, align);
        let end = dfa + self.dfa_size;
        SectionOffsets { body, dfa, end }
    }
}

/// Round up to the next multiple of `align` (a power of two).
pub(crate) fn align_up(value: u32, align: u32) -> u32 {
    (value + align - 1) & !(align - 1)
}
