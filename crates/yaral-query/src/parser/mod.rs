//! Pattern source → lossless CST → typed AST.
//!
//! Parsing always produces a tree covering the whole source; problems are
//! collected as diagnostics next to it.

pub mod ast;
mod core;
pub mod cst;
mod grammar;
pub mod lexer;

#[cfg(test)]
mod lexer_tests;
#[cfg(test)]
mod parser_tests;

pub use ast::Root;
pub use cst::{SyntaxKind, SyntaxNode, SyntaxToken};

use crate::diagnostics::Diagnostics;
use self::core::Parser;

#[derive(Debug)]
pub struct ParseResult {
    pub root: Root,
    pub diagnostics: Diagnostics,
}

pub fn parse(source: &str) -> ParseResult {
    let mut parser = Parser::new(source, lexer::lex(source));
    parser.parse_root();
    let (green, diagnostics) = parser.finish();
    let root = SyntaxNode::new_root(green);
    ParseResult {
        // The root production always opens a `Root` node.
        root: Root::cast(root).unwrap_or_else(|| unreachable!()),
        diagnostics,
    }
}
