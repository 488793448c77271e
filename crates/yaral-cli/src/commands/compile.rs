use std::fs;
use std::path::PathBuf;

use yaral_core::grammar::Grammar;

use super::fail;

pub struct CompileArgs {
    pub grammar_path: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

pub fn run(args: CompileArgs) {
    let grammar = match &args.grammar_path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .unwrap_or_else(|err| fail(format!("cannot read {}: {err}", path.display())));
            Grammar::from_json(&json)
                .unwrap_or_else(|err| fail(format!("invalid grammar {}: {err}", path.display())))
        }
        None => yaral_lang::grammar(),
    };

    let artifact = yaral_compiler::compile(&grammar).unwrap_or_else(|err| fail(err));
    let output = args
        .output
        .unwrap_or_else(|| PathBuf::from(format!("{}.tables", grammar.name)));

    fs::write(&output, &artifact)
        .unwrap_or_else(|err| fail(format!("cannot write {}: {err}", output.display())));
    eprintln!(
        "compiled `{}` ({} bytes) to {}",
        grammar.name,
        artifact.len(),
        output.display()
    );
}
