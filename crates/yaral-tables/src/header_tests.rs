use crate::header::{Header, align_up};
use crate::{MAGIC, VERSION};

#[test]
fn default_header_has_magic_and_version() {
    let header = Header::default();
    assert!(header.validate_magic());
    assert!(header.validate_version());
    assert_eq!(header.magic, MAGIC);
    assert_eq!(header.version, VERSION);
}

#[test]
fn bytes_layout() {
    let header = Header {
        checksum: 0xDEADBEEF,
        total_size: 300,
        body_size: 100,
        dfa_size: 72,
        symbols_count: 7,
        terminals_count: 3,
        ..Default::default()
    };

    let bytes = header.to_bytes();
    assert_eq!(&bytes[0..4], b"YRLT");
    assert_eq!(&bytes[8..12], &0xDEADBEEFu32.to_le_bytes());
    assert_eq!(&bytes[24..26], &7u16.to_le_bytes());
    assert_eq!(Header::from_bytes(&bytes), header);
}

#[test]
fn offsets_are_section_aligned() {
    let header = Header {
        body_size: 100,
        dfa_size: 72,
        ..Default::default()
    };

    let offsets = header.compute_offsets();
    assert_eq!(offsets.body, 64);
    assert_eq!(offsets.dfa, 192);
    assert_eq!(offsets.end, 264);
}

#[test]
fn align_up_rounds_to_multiple() {
    assert_eq!(align_up(0, 64), 0);
    assert_eq!(align_up(1, 64), 64);
    assert_eq!(align_up(64, 64), 64);
    assert_eq!(align_up(65, 64), 128);
}
