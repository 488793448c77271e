use std::fmt::Write as _;
use std::fs;
use std::path::PathBuf;

use yaral_core::Colors;
use yaral_runtime::{Language, LoadError};
use yaral_tables::Header;

use super::fail;

pub struct DumpArgs {
    pub artifact_path: Option<PathBuf>,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let bytes = match &args.artifact_path {
        Some(path) => fs::read(path)
            .unwrap_or_else(|err| fail(format!("cannot read {}: {err}", path.display()))),
        None => yaral_lang::ARTIFACT.to_vec(),
    };

    match format_dump(&bytes, Colors::new(args.color)) {
        Ok(out) => print!("{out}"),
        Err(err) => fail(err),
    }
}

/// Header fields followed by the table summary. The artifact is fully
/// validated first, so a corrupted file reports its load error instead.
pub fn format_dump(bytes: &[u8], colors: Colors) -> Result<String, LoadError> {
    let language = Language::load(bytes)?;
    let header = Header::from_bytes(bytes);
    let c = colors;

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}[artifact]{} {} bytes, format v{}, crc32 {:08x}",
        c.dim, c.reset, header.total_size, header.version, header.checksum
    );
    let _ = writeln!(
        out,
        "body={} dfa={}\n",
        header.body_size, header.dfa_size
    );
    out.push_str(&yaral_tables::dump(language.tables(), colors));
    Ok(out)
}
