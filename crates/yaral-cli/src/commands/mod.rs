pub mod check;
pub mod compile;
pub mod dump;
pub mod parse;
pub mod query;
pub mod source;

#[cfg(test)]
mod check_tests;
#[cfg(test)]
mod dump_tests;
#[cfg(test)]
mod parse_tests;
#[cfg(test)]
mod query_tests;
#[cfg(test)]
mod source_tests;

use std::fmt::Display;

use yaral_runtime::Language;

/// Print `error: {message}` and exit with code 1.
pub fn fail(message: impl Display) -> ! {
    eprintln!("error: {message}");
    std::process::exit(1);
}

/// The shipped Yaral language.
pub fn yaral_language() -> Language {
    yaral_lang::language().unwrap_or_else(|err| fail(format!("cannot load Yaral tables: {err}")))
}
