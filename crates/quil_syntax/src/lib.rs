// Copyright contributors to the quil-frontend project
// SPDX-License-Identifier: Apache-2.0

//! Syntax-tree contract for the Quil front end.
//!
//! Lexing and context-free parsing happen outside this workspace; the parser
//! produces a [`GreenNode`] through [`SyntaxTreeBuilder`], and this crate
//! defines the node kinds, traversal types and typed views the semantic
//! analyzer consumes. A parse failure is delivered as a [`TokenMismatch`]
//! instead of a tree.

pub mod ast;
mod syntax_kind;
mod syntax_node;

pub use crate::ast::{AstChildren, AstNode, HasName};
pub use crate::syntax_kind::SyntaxKind;
pub use crate::syntax_node::{
    GreenNode, Preorder, QuilLanguage, SyntaxElement, SyntaxElementChildren, SyntaxNode,
    SyntaxNodeChildren, SyntaxToken, SyntaxTreeBuilder, WalkEvent,
};

pub use rowan::{TextRange, TextSize};

/// A grammar-level mismatch reported by the external lexer/parser: the
/// offending token, its position, and the admissible alternatives at that
/// point. Line is 1-based and column 0-based, as the tree library reports
/// them; diagnostics render the column 1-based.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenMismatch {
    pub line: usize,
    pub column: usize,
    pub token: String,
    pub expected: Vec<SyntaxKind>,
}
