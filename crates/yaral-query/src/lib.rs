//! Structural queries over Yaral syntax trees.
//!
//! # Example
//!
//! ```
//! use yaral_query::Query;
//!
//! let language = yaral_lang::language().expect("shipped tables load");
//! let tree = yaral_runtime::Parser::new(language.clone())
//!     .parse(r#"rule r { meta: author = "a" condition: true }"#, None);
//!
//! let query = Query::new(&language, "(rule (meta) (condition) @c)").expect("valid query");
//! let found: Vec<_> = query.matches(&tree.root_node()).collect();
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].get("c").map(|node| node.kind()), Some("condition"));
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod diagnostics;
pub mod parser;
mod query;

pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter};
pub use query::{Query, QueryError, QueryMatch, QueryMatches};
