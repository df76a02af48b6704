// Copyright contributors to the quil-frontend project
// SPDX-License-Identifier: Apache-2.0

//! Concrete node views. One view per rule node the analyzer consumes;
//! accessors return the kind-checked children the corresponding builder
//! reads, nothing more.

use super::{support, AstChildren, AstNode, HasName};
use crate::syntax_node::{SyntaxNode, SyntaxToken};
use crate::SyntaxKind;

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name {
            pub(crate) syntax: SyntaxNode,
        }

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }
            fn cast(syntax: SyntaxNode) -> Option<Self> {
                if Self::can_cast(syntax.kind()) {
                    Some(Self { syntax })
                } else {
                    None
                }
            }
            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

// Atoms ---------------------------------------------------------------------

ast_node!(Name, NAME);
ast_node!(Variable, VARIABLE);
ast_node!(Qubit, QUBIT);
ast_node!(Address, ADDRESS);
ast_node!(Label, LABEL);
ast_node!(Frame, FRAME);
ast_node!(WaveformName, WAVEFORM_NAME);
ast_node!(Waveform, WAVEFORM);
ast_node!(NamedParam, NAMED_PARAM);
ast_node!(Matrix, MATRIX);
ast_node!(MatrixRow, MATRIX_ROW);
ast_node!(Number, NUMBER);
ast_node!(Imaginary, IMAGINARY);
ast_node!(FrameAttr, FRAME_ATTR);
ast_node!(PragmaName, PRAGMA_NAME);
ast_node!(OffsetDescriptor, OFFSET_DESCRIPTOR);

impl Variable {
    pub fn identifier_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::IDENTIFIER)
    }
}

impl Address {
    pub fn identifier_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::IDENTIFIER)
    }
    pub fn int_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::INT)
    }
}

impl Label {
    pub fn identifier_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::IDENTIFIER)
    }
}

impl Frame {
    pub fn qubits(&self) -> AstChildren<Qubit> {
        support::children(&self.syntax)
    }
    pub fn string_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::STRING)
    }
}

impl WaveformName {
    pub fn names(&self) -> AstChildren<Name> {
        support::children(&self.syntax)
    }
}

impl Waveform {
    pub fn waveform_name(&self) -> Option<WaveformName> {
        support::child(&self.syntax)
    }
    pub fn named_params(&self) -> AstChildren<NamedParam> {
        support::children(&self.syntax)
    }
}

impl NamedParam {
    pub fn identifier_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::IDENTIFIER)
    }
    pub fn expression(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl Matrix {
    pub fn rows(&self) -> AstChildren<MatrixRow> {
        support::children(&self.syntax)
    }
}

impl MatrixRow {
    pub fn expressions(&self) -> AstChildren<Expr> {
        support::children(&self.syntax)
    }
}

impl Number {
    pub fn minus_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::MINUS)
    }
    pub fn int_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::INT)
    }
    pub fn float_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::FLOAT)
    }
    pub fn i_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::I_KW)
    }
    pub fn pi_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::PI_KW)
    }
    pub fn imaginary(&self) -> Option<Imaginary> {
        support::child(&self.syntax)
    }
}

impl Imaginary {
    pub fn int_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::INT)
    }
    pub fn float_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::FLOAT)
    }
}

impl OffsetDescriptor {
    pub fn int_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::INT)
    }
    pub fn identifier_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::IDENTIFIER)
    }
}

// Expressions ---------------------------------------------------------------

/// A view over any node in an expression position. The analyzer dispatches
/// on the node kind; see `SyntaxKind::is_expression`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Expr {
    pub(crate) syntax: SyntaxNode,
}

impl AstNode for Expr {
    fn can_cast(kind: SyntaxKind) -> bool {
        kind.is_expression()
    }
    fn cast(syntax: SyntaxNode) -> Option<Self> {
        if Self::can_cast(syntax.kind()) {
            Some(Self { syntax })
        } else {
            None
        }
    }
    fn syntax(&self) -> &SyntaxNode {
        &self.syntax
    }
}

// Instructions --------------------------------------------------------------

ast_node!(Gate, GATE);
ast_node!(CircuitGate, CIRCUIT_GATE);
ast_node!(Measure, MEASURE);
ast_node!(CircuitMeasure, CIRCUIT_MEASURE);
ast_node!(DefLabel, DEF_LABEL);
ast_node!(Jump, JUMP);
ast_node!(JumpWhen, JUMP_WHEN);
ast_node!(JumpUnless, JUMP_UNLESS);
ast_node!(ResetState, RESET_STATE);
ast_node!(CircuitResetState, CIRCUIT_RESET_STATE);
ast_node!(ClassicalUnary, CLASSICAL_UNARY);
ast_node!(LogicalBinaryOp, LOGICAL_BINARY_OP);
ast_node!(ArithmeticBinaryOp, ARITHMETIC_BINARY_OP);
ast_node!(Move, MOVE);
ast_node!(Exchange, EXCHANGE);
ast_node!(Convert, CONVERT);
ast_node!(Load, LOAD);
ast_node!(Store, STORE);
ast_node!(ClassicalComparison, CLASSICAL_COMPARISON);
ast_node!(Include, INCLUDE);
ast_node!(Pragma, PRAGMA);
ast_node!(MemoryDescriptor, MEMORY_DESCRIPTOR);
ast_node!(DefGate, DEF_GATE);
ast_node!(DefCircuit, DEF_CIRCUIT);
ast_node!(DefFrame, DEF_FRAME);
ast_node!(FrameSpec, FRAME_SPEC);
ast_node!(DefCalibration, DEF_CALIBRATION);
ast_node!(DefMeasCalibration, DEF_MEAS_CALIBRATION);
ast_node!(DefWaveform, DEF_WAVEFORM);
ast_node!(Pulse, PULSE);
ast_node!(SetFrequency, SET_FREQUENCY);
ast_node!(ShiftFrequency, SHIFT_FREQUENCY);
ast_node!(SetPhase, SET_PHASE);
ast_node!(ShiftPhase, SHIFT_PHASE);
ast_node!(SwapPhase, SWAP_PHASE);
ast_node!(SetScale, SET_SCALE);
ast_node!(Capture, CAPTURE);
ast_node!(RawCapture, RAW_CAPTURE);
ast_node!(Delay, DELAY);
ast_node!(Fence, FENCE);

impl HasName for Gate {}
impl HasName for CircuitGate {}
impl HasName for DefGate {}
impl HasName for DefCircuit {}
impl HasName for DefCalibration {}
impl HasName for DefMeasCalibration {}

impl Gate {
    /// Modifier keywords in source order, leftmost (outermost) first.
    pub fn modifiers(&self) -> Vec<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|it| it.kind().is_gate_modifier())
            .collect()
    }
    pub fn params(&self) -> AstChildren<Expr> {
        support::children(&self.syntax)
    }
    pub fn qubits(&self) -> AstChildren<Qubit> {
        support::children(&self.syntax)
    }
}

impl CircuitGate {
    pub fn params(&self) -> AstChildren<Expr> {
        support::children(&self.syntax)
    }
    pub fn qubits(&self) -> AstChildren<Qubit> {
        support::children(&self.syntax)
    }
}

impl Measure {
    pub fn qubit(&self) -> Option<Qubit> {
        support::child(&self.syntax)
    }
    pub fn address(&self) -> Option<Address> {
        support::child(&self.syntax)
    }
}

impl CircuitMeasure {
    pub fn qubit(&self) -> Option<Qubit> {
        support::child(&self.syntax)
    }
    pub fn address(&self) -> Option<Address> {
        support::child(&self.syntax)
    }
}

impl DefLabel {
    pub fn label(&self) -> Option<Label> {
        support::child(&self.syntax)
    }
}

impl Jump {
    pub fn label(&self) -> Option<Label> {
        support::child(&self.syntax)
    }
}

impl JumpWhen {
    pub fn label(&self) -> Option<Label> {
        support::child(&self.syntax)
    }
    pub fn address(&self) -> Option<Address> {
        support::child(&self.syntax)
    }
}

impl JumpUnless {
    pub fn label(&self) -> Option<Label> {
        support::child(&self.syntax)
    }
    pub fn address(&self) -> Option<Address> {
        support::child(&self.syntax)
    }
}

impl ResetState {
    pub fn qubit(&self) -> Option<Qubit> {
        support::child(&self.syntax)
    }
}

impl CircuitResetState {
    pub fn qubit(&self) -> Option<Qubit> {
        support::child(&self.syntax)
    }
}

impl ClassicalUnary {
    pub fn op_token(&self) -> Option<SyntaxToken> {
        use SyntaxKind::*;
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|it| matches!(it.kind(), TRUE_KW | FALSE_KW | NOT_KW | NEG_KW))
    }
    pub fn address(&self) -> Option<Address> {
        support::child(&self.syntax)
    }
}

impl LogicalBinaryOp {
    pub fn op_token(&self) -> Option<SyntaxToken> {
        use SyntaxKind::*;
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|it| matches!(it.kind(), AND_KW | OR_KW | IOR_KW | XOR_KW))
    }
    pub fn addresses(&self) -> AstChildren<Address> {
        support::children(&self.syntax)
    }
    pub fn int_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::INT)
    }
}

impl ArithmeticBinaryOp {
    pub fn op_token(&self) -> Option<SyntaxToken> {
        use SyntaxKind::*;
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|it| matches!(it.kind(), ADD_KW | SUB_KW | MUL_KW | DIV_KW))
    }
    pub fn addresses(&self) -> AstChildren<Address> {
        support::children(&self.syntax)
    }
    pub fn number(&self) -> Option<Number> {
        support::child(&self.syntax)
    }
}

impl Move {
    pub fn addresses(&self) -> AstChildren<Address> {
        support::children(&self.syntax)
    }
    pub fn number(&self) -> Option<Number> {
        support::child(&self.syntax)
    }
}

impl Exchange {
    pub fn addresses(&self) -> AstChildren<Address> {
        support::children(&self.syntax)
    }
}

impl Convert {
    pub fn addresses(&self) -> AstChildren<Address> {
        support::children(&self.syntax)
    }
}

impl Load {
    pub fn addresses(&self) -> AstChildren<Address> {
        support::children(&self.syntax)
    }
    pub fn identifier_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::IDENTIFIER)
    }
}

impl Store {
    pub fn addresses(&self) -> AstChildren<Address> {
        support::children(&self.syntax)
    }
    pub fn identifier_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::IDENTIFIER)
    }
    pub fn number(&self) -> Option<Number> {
        support::child(&self.syntax)
    }
}

impl ClassicalComparison {
    pub fn op_token(&self) -> Option<SyntaxToken> {
        use SyntaxKind::*;
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|it| matches!(it.kind(), EQ_KW | GT_KW | GE_KW | LT_KW | LE_KW))
    }
    pub fn addresses(&self) -> AstChildren<Address> {
        support::children(&self.syntax)
    }
    pub fn number(&self) -> Option<Number> {
        support::child(&self.syntax)
    }
}

impl Include {
    pub fn string_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::STRING)
    }
}

impl Pragma {
    pub fn identifier_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::IDENTIFIER)
    }
    pub fn pragma_names(&self) -> AstChildren<PragmaName> {
        support::children(&self.syntax)
    }
    pub fn string_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::STRING)
    }
}

impl MemoryDescriptor {
    /// Direct `IDENTIFIER` tokens in order: name, type, shared region.
    pub fn identifier_tokens(&self) -> impl Iterator<Item = SyntaxToken> {
        support::tokens(&self.syntax, SyntaxKind::IDENTIFIER)
    }
    pub fn int_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::INT)
    }
    pub fn sharing_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::SHARING_KW)
    }
    pub fn offset_descriptors(&self) -> AstChildren<OffsetDescriptor> {
        support::children(&self.syntax)
    }
}

impl DefGate {
    pub fn variables(&self) -> AstChildren<Variable> {
        support::children(&self.syntax)
    }
    /// `MATRIX` or `PERMUTATION` after `AS`, if present.
    pub fn gate_type(&self) -> Option<SyntaxToken> {
        use SyntaxKind::*;
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|it| matches!(it.kind(), MATRIX_KW | PERMUTATION_KW))
    }
    pub fn matrix(&self) -> Option<Matrix> {
        support::child(&self.syntax)
    }
}

impl DefCircuit {
    pub fn variables(&self) -> AstChildren<Variable> {
        support::children(&self.syntax)
    }
    pub fn qubit_variables(&self) -> AstChildren<Qubit> {
        support::children(&self.syntax)
    }
}

impl DefFrame {
    pub fn frame(&self) -> Option<Frame> {
        support::child(&self.syntax)
    }
    pub fn frame_specs(&self) -> AstChildren<FrameSpec> {
        support::children(&self.syntax)
    }
}

impl FrameSpec {
    pub fn attr(&self) -> Option<FrameAttr> {
        support::child(&self.syntax)
    }
    pub fn string_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::STRING)
    }
    pub fn expression(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl DefCalibration {
    pub fn params(&self) -> AstChildren<Expr> {
        support::children(&self.syntax)
    }
    pub fn qubits(&self) -> AstChildren<Qubit> {
        support::children(&self.syntax)
    }
}

impl DefMeasCalibration {
    pub fn qubit(&self) -> Option<Qubit> {
        support::child(&self.syntax)
    }
}

impl DefWaveform {
    pub fn waveform_name(&self) -> Option<WaveformName> {
        support::child(&self.syntax)
    }
    pub fn params(&self) -> AstChildren<Variable> {
        support::children(&self.syntax)
    }
    pub fn matrix(&self) -> Option<Matrix> {
        support::child(&self.syntax)
    }
}

impl Pulse {
    pub fn nonblocking_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::NONBLOCKING_KW)
    }
    pub fn frame(&self) -> Option<Frame> {
        support::child(&self.syntax)
    }
    pub fn waveform(&self) -> Option<Waveform> {
        support::child(&self.syntax)
    }
}

impl SetFrequency {
    pub fn frame(&self) -> Option<Frame> {
        support::child(&self.syntax)
    }
    pub fn expression(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl ShiftFrequency {
    pub fn frame(&self) -> Option<Frame> {
        support::child(&self.syntax)
    }
    pub fn expression(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl SetPhase {
    pub fn frame(&self) -> Option<Frame> {
        support::child(&self.syntax)
    }
    pub fn expression(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl ShiftPhase {
    pub fn frame(&self) -> Option<Frame> {
        support::child(&self.syntax)
    }
    pub fn expression(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl SwapPhase {
    pub fn frames(&self) -> AstChildren<Frame> {
        support::children(&self.syntax)
    }
}

impl SetScale {
    pub fn frame(&self) -> Option<Frame> {
        support::child(&self.syntax)
    }
    pub fn expression(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl Capture {
    pub fn nonblocking_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::NONBLOCKING_KW)
    }
    pub fn frame(&self) -> Option<Frame> {
        support::child(&self.syntax)
    }
    pub fn waveform(&self) -> Option<Waveform> {
        support::child(&self.syntax)
    }
    pub fn address(&self) -> Option<Address> {
        support::child(&self.syntax)
    }
}

impl RawCapture {
    pub fn nonblocking_token(&self) -> Option<SyntaxToken> {
        support::token(&self.syntax, SyntaxKind::NONBLOCKING_KW)
    }
    pub fn frame(&self) -> Option<Frame> {
        support::child(&self.syntax)
    }
    pub fn expression(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
    pub fn address(&self) -> Option<Address> {
        support::child(&self.syntax)
    }
}

impl Delay {
    pub fn qubits(&self) -> AstChildren<Qubit> {
        support::children(&self.syntax)
    }
    /// Explicit frame-name string literals, in source order.
    pub fn string_tokens(&self) -> impl Iterator<Item = SyntaxToken> {
        support::tokens(&self.syntax, SyntaxKind::STRING)
    }
    pub fn expression(&self) -> Option<Expr> {
        support::child(&self.syntax)
    }
}

impl Fence {
    pub fn qubits(&self) -> AstChildren<Qubit> {
        support::children(&self.syntax)
    }
}
