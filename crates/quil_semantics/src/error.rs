// Copyright contributors to the quil-frontend project
// SPDX-License-Identifier: Apache-2.0

//! Errors raised while lowering a syntax tree to instructions.
//!
//! Grammar-level failures arrive as `TokenMismatch` values from the parser
//! and are converted into [`QuilError::Syntax`] here, so callers see a single
//! error type for the whole front end.

use quil_syntax::TokenMismatch;
use thiserror::Error;

use crate::ast::MemoryReference;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum QuilError {
    #[error("error at line {line} and column {column}: received an '{token}' but was expecting one of [ {} ]", .expected.join(", "))]
    Syntax {
        line: usize,
        column: usize,
        token: String,
        expected: Vec<String>,
    },

    #[error("unexpected expression node: {0}")]
    MalformedExpression(String),

    #[error("unexpected number: {0}")]
    MalformedNumber(String),

    #[error("unsupported gate modifier: {0}")]
    UnsupportedModifier(String),

    #[error("gate {name} takes {expected_params} parameter(s) and {expected_qubits} qubit(s), but was given {found_params} and {found_qubits}")]
    GateArity {
        name: String,
        expected_params: usize,
        expected_qubits: usize,
        found_params: usize,
        found_qubits: usize,
    },

    #[error("unknown template waveform: {0}")]
    UnknownWaveform(String),

    #[error("cannot redefine built-in template waveform: {0}")]
    ReservedWaveform(String),

    #[error("unexpected memory references {} in DEFCAL {name}. Did you forget a '%'?", format_references(.references))]
    CalibrationReferencesMemory {
        name: String,
        references: Vec<MemoryReference>,
    },

    #[error("unexpected attribute {attribute} in definition of frame {frame}")]
    UnexpectedFrameAttribute { attribute: String, frame: String },

    #[error("expected an integer qubit index, got: {0}")]
    InvalidQubit(String),

    #[error("expected a memory reference instead of the immediate value {0}; OR has been deprecated in favor of IOR")]
    DisallowedImmediate(String),

    #[error("permutation gates are defined by a single matrix row, found {0}")]
    PermutationShape(usize),
}

fn format_references(references: &[MemoryReference]) -> String {
    let rendered: Vec<String> = references.iter().map(|r| r.to_string()).collect();
    format!("[{}]", rendered.join(", "))
}

impl From<TokenMismatch> for QuilError {
    fn from(mismatch: TokenMismatch) -> QuilError {
        let expected = mismatch
            .expected
            .iter()
            .map(|kind| match kind.literal_name() {
                Some(literal) => format!("'{literal}'"),
                None => format!("{kind:?}"),
            })
            .collect();
        QuilError::Syntax {
            line: mismatch.line,
            // The tree library counts columns from zero.
            column: mismatch.column + 1,
            token: mismatch.token,
            expected,
        }
    }
}
