// Copyright contributors to the quil-frontend project
// SPDX-License-Identifier: Apache-2.0

//! Semantic analysis for Quil programs.
//!
//! The input is the concrete syntax tree defined by `quil_syntax`; the
//! output is a flat list of typed [`ast::Instruction`]s in source order.
//! See [`syntax_to_ast::analyze`] for the entry point.

pub mod ast;
mod display;
pub mod error;
pub mod expression;
pub mod gates;
pub mod syntax_to_ast;
pub mod waveforms;

pub use error::QuilError;
pub use syntax_to_ast::{analyze, from_expr, syntax_to_instructions, Analyzer};

pub use quil_syntax::TokenMismatch;
