use std::path::PathBuf;

#[path = "src/grammar.rs"]
mod grammar;

fn main() {
    let out_dir = std::env::var("OUT_DIR").expect("OUT_DIR not set");
    let out_path = PathBuf::from(out_dir).join("yaral.tables");

    let artifact = yaral_compiler::compile(&grammar::grammar())
        .unwrap_or_else(|err| panic!("yaral grammar does not compile: {err}"));
    std::fs::write(&out_path, artifact)
        .unwrap_or_else(|err| panic!("failed to write {}: {err}", out_path.display()));

    println!("cargo::rerun-if-changed=build.rs");
    println!("cargo::rerun-if-changed=src/grammar.rs");
}
