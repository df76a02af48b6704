// Copyright contributors to the quil-frontend project
// SPDX-License-Identifier: Apache-2.0

//! Lowering from the concrete syntax tree to [`Instruction`]s.
//!
//! The analyzer walks the tree in one depth-first pass. Instructions are
//! built on `Leave` events, so an instruction node is only processed once
//! all of its children exist. `Enter` events matter only for the definition
//! forms whose bodies collect into a separate instruction list: the current
//! output buffer is set aside on entry and restored on exit, with the body
//! becoming part of the definition instruction.
//!
//! The first error aborts the walk.

use indexmap::IndexMap;
use num_complex::Complex64;

use quil_syntax::ast as syn;
use quil_syntax::{
    AstChildren, AstNode, HasName, SyntaxKind, SyntaxNode, SyntaxToken, TokenMismatch, WalkEvent,
};

use crate::ast::*;
use crate::error::QuilError;
use crate::expression::{Expression, ExpressionFunction, InfixOperator, Number};
use crate::gates::{GateCatalog, STANDARD_GATES};
use crate::waveforms::{WaveformCatalog, STANDARD_WAVEFORMS};

/// Analyze a parse outcome: a grammar failure is promoted to
/// [`QuilError::Syntax`], a tree is lowered to instructions.
pub fn analyze(outcome: Result<SyntaxNode, TokenMismatch>) -> Result<Vec<Instruction>, QuilError> {
    let root = outcome?;
    syntax_to_instructions(&root)
}

/// Lower a program tree to instructions using the standard catalogs.
pub fn syntax_to_instructions(root: &SyntaxNode) -> Result<Vec<Instruction>, QuilError> {
    Analyzer::new(&STANDARD_GATES, &STANDARD_WAVEFORMS).walk(root)
}

pub struct Analyzer<'c> {
    gates: &'c GateCatalog,
    waveforms: &'c WaveformCatalog,
    result: Vec<Instruction>,
    previous_result: Option<Vec<Instruction>>,
}

impl<'c> Analyzer<'c> {
    pub fn new(gates: &'c GateCatalog, waveforms: &'c WaveformCatalog) -> Analyzer<'c> {
        Analyzer {
            gates,
            waveforms,
            result: Vec::new(),
            previous_result: None,
        }
    }

    pub fn walk(mut self, root: &SyntaxNode) -> Result<Vec<Instruction>, QuilError> {
        for event in root.preorder() {
            match event {
                WalkEvent::Enter(node) => self.enter_node(&node),
                WalkEvent::Leave(node) => self.leave_node(&node)?,
            }
        }
        Ok(self.result)
    }

    fn enter_node(&mut self, node: &SyntaxNode) {
        use SyntaxKind::*;
        if matches!(node.kind(), DEF_CIRCUIT | DEF_CALIBRATION | DEF_MEAS_CALIBRATION) {
            // Definition bodies do not nest, so one saved buffer suffices.
            self.previous_result = Some(std::mem::take(&mut self.result));
        }
    }

    /// Restore the outer output buffer, returning the body collected since
    /// the matching enter.
    fn exit_definition_scope(&mut self) -> Vec<Instruction> {
        let outer = self.previous_result.take().unwrap_or_default();
        std::mem::replace(&mut self.result, outer)
    }

    fn push(&mut self, instruction: Instruction) {
        self.result.push(instruction);
    }

    fn leave_node(&mut self, node: &SyntaxNode) -> Result<(), QuilError> {
        use SyntaxKind::*;
        match node.kind() {
            GATE => self.exit_gate(&cast(node)),
            CIRCUIT_GATE => self.exit_circuit_gate(&cast(node)),
            MEASURE => self.exit_measure(&cast(node)),
            CIRCUIT_MEASURE => self.exit_circuit_measure(&cast(node)),
            DEF_LABEL => self.exit_def_label(&cast(node)),
            HALT => {
                self.push(Instruction::Halt);
                Ok(())
            }
            WAIT => {
                self.push(Instruction::Wait);
                Ok(())
            }
            NOP => {
                self.push(Instruction::Nop);
                Ok(())
            }
            JUMP => self.exit_jump(&cast(node)),
            JUMP_WHEN => self.exit_jump_when(&cast(node)),
            JUMP_UNLESS => self.exit_jump_unless(&cast(node)),
            RESET_STATE => self.exit_reset(&cast(node)),
            CIRCUIT_RESET_STATE => self.exit_circuit_reset(&cast(node)),
            CLASSICAL_UNARY => self.exit_classical_unary(&cast(node)),
            LOGICAL_BINARY_OP => self.exit_logical_binary(&cast(node)),
            ARITHMETIC_BINARY_OP => self.exit_arithmetic_binary(&cast(node)),
            MOVE => self.exit_move(&cast(node)),
            EXCHANGE => self.exit_exchange(&cast(node)),
            CONVERT => self.exit_convert(&cast(node)),
            LOAD => self.exit_load(&cast(node)),
            STORE => self.exit_store(&cast(node)),
            CLASSICAL_COMPARISON => self.exit_comparison(&cast(node)),
            INCLUDE => self.exit_include(&cast(node)),
            PRAGMA => self.exit_pragma(&cast(node)),
            MEMORY_DESCRIPTOR => self.exit_memory_descriptor(&cast(node)),
            DEF_GATE => self.exit_def_gate(&cast(node)),
            DEF_CIRCUIT => self.exit_def_circuit(&cast(node)),
            DEF_FRAME => self.exit_def_frame(&cast(node)),
            DEF_CALIBRATION => self.exit_def_calibration(&cast(node)),
            DEF_MEAS_CALIBRATION => self.exit_def_meas_calibration(&cast(node)),
            DEF_WAVEFORM => self.exit_def_waveform(&cast(node)),
            PULSE => self.exit_pulse(&cast(node)),
            SET_FREQUENCY => self.exit_set_frequency(&cast(node)),
            SHIFT_FREQUENCY => self.exit_shift_frequency(&cast(node)),
            SET_PHASE => self.exit_set_phase(&cast(node)),
            SHIFT_PHASE => self.exit_shift_phase(&cast(node)),
            SWAP_PHASE => self.exit_swap_phase(&cast(node)),
            SET_SCALE => self.exit_set_scale(&cast(node)),
            CAPTURE => self.exit_capture(&cast(node)),
            RAW_CAPTURE => self.exit_raw_capture(&cast(node)),
            DELAY => self.exit_delay(&cast(node)),
            FENCE => self.exit_fence(&cast(node)),
            FENCE_ALL => {
                self.push(Instruction::FenceAll);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    // Gates -----------------------------------------------------------------

    fn exit_gate(&mut self, node: &syn::Gate) -> Result<(), QuilError> {
        use SyntaxKind::*;
        let gate_name = name_of(node)?;
        let modifiers = node.modifiers();
        let params = expressions(node.params())?;
        let qubits = node
            .qubits()
            .map(|q| qubit(&q))
            .collect::<Result<Vec<_>, _>>()?;

        // CONTROLLED and FORKED each consume one qubit, taken left to right
        // from the front of the written qubit list.
        let mut modifier_qubits = Vec::new();
        for modifier in &modifiers {
            if matches!(modifier.kind(), CONTROLLED_KW | FORKED_KW) {
                match qubits.get(modifier_qubits.len()) {
                    Some(q) => modifier_qubits.push(q.clone()),
                    None => return Err(structural(node.syntax())),
                }
            }
        }
        let base_qubits = qubits[modifier_qubits.len()..].to_vec();

        // Each FORKED halves the parameter group belonging to the base gate.
        let forked_count = modifiers.iter().filter(|m| m.kind() == FORKED_KW).count();
        let mut forked_offset = params.len() >> forked_count;
        let base_params = params[..forked_offset].to_vec();

        let mut gate = match self.gates.lookup(&gate_name) {
            Some(standard) => standard.instantiate(base_params, base_qubits)?,
            None => Gate::new(gate_name, base_params, base_qubits),
        };

        // Apply modifiers innermost first, i.e. in reverse written order.
        for modifier in modifiers.iter().rev() {
            match modifier.kind() {
                CONTROLLED_KW => {
                    let control = pop_modifier_qubit(&mut modifier_qubits, node)?;
                    gate.controlled(control);
                }
                DAGGER_KW => gate.dagger(),
                FORKED_KW => {
                    let fork = pop_modifier_qubit(&mut modifier_qubits, node)?;
                    let alternate = params[forked_offset..2 * forked_offset].to_vec();
                    gate.forked(fork, alternate);
                    forked_offset *= 2;
                }
                _ => {
                    return Err(QuilError::UnsupportedModifier(modifier.text().to_string()));
                }
            }
        }

        self.push(Instruction::Gate(gate));
        Ok(())
    }

    fn exit_circuit_gate(&mut self, node: &syn::CircuitGate) -> Result<(), QuilError> {
        let gate_name = name_of(node)?;
        let params: Vec<String> = node.params().map(|p| p.text()).collect();
        let qubits: Vec<String> = node.qubits().map(|q| q.text()).collect();
        let raw = if params.is_empty() {
            format!("{} {}", gate_name, qubits.join(" "))
        } else {
            format!("{}({}) {}", gate_name, params.join(", "), qubits.join(" "))
        };
        self.push(Instruction::RawInstruction(raw));
        Ok(())
    }

    // Measurement and control flow -------------------------------------------

    fn exit_measure(&mut self, node: &syn::Measure) -> Result<(), QuilError> {
        let q = node.qubit().ok_or_else(|| structural(node.syntax()))?;
        let target = match node.address() {
            Some(a) => Some(address(&a)?),
            None => None,
        };
        self.push(Instruction::Measurement(Measurement {
            qubit: qubit(&q)?,
            target,
        }));
        Ok(())
    }

    fn exit_circuit_measure(&mut self, node: &syn::CircuitMeasure) -> Result<(), QuilError> {
        let q = node.qubit().ok_or_else(|| structural(node.syntax()))?;
        let mut raw = format!("MEASURE {}", q.text());
        if let Some(a) = node.address() {
            raw.push(' ');
            raw.push_str(&a.text());
        }
        self.push(Instruction::RawInstruction(raw));
        Ok(())
    }

    fn exit_def_label(&mut self, node: &syn::DefLabel) -> Result<(), QuilError> {
        let target = label(&node.label().ok_or_else(|| structural(node.syntax()))?)?;
        self.push(Instruction::JumpTarget(target));
        Ok(())
    }

    fn exit_jump(&mut self, node: &syn::Jump) -> Result<(), QuilError> {
        let target = label(&node.label().ok_or_else(|| structural(node.syntax()))?)?;
        self.push(Instruction::Jump(target));
        Ok(())
    }

    fn exit_jump_when(&mut self, node: &syn::JumpWhen) -> Result<(), QuilError> {
        let target = label(&node.label().ok_or_else(|| structural(node.syntax()))?)?;
        let condition = address(&node.address().ok_or_else(|| structural(node.syntax()))?)?;
        self.push(Instruction::JumpWhen { target, condition });
        Ok(())
    }

    fn exit_jump_unless(&mut self, node: &syn::JumpUnless) -> Result<(), QuilError> {
        let target = label(&node.label().ok_or_else(|| structural(node.syntax()))?)?;
        let condition = address(&node.address().ok_or_else(|| structural(node.syntax()))?)?;
        self.push(Instruction::JumpUnless { target, condition });
        Ok(())
    }

    fn exit_reset(&mut self, node: &syn::ResetState) -> Result<(), QuilError> {
        let target = match node.qubit() {
            Some(q) => Some(qubit(&q)?),
            None => None,
        };
        self.push(Instruction::Reset(target));
        Ok(())
    }

    fn exit_circuit_reset(&mut self, node: &syn::CircuitResetState) -> Result<(), QuilError> {
        let q = node.qubit().ok_or_else(|| structural(node.syntax()))?;
        self.push(Instruction::RawInstruction(format!("RESET {}", q.text())));
        Ok(())
    }

    // Classical instructions -------------------------------------------------

    fn exit_classical_unary(&mut self, node: &syn::ClassicalUnary) -> Result<(), QuilError> {
        use SyntaxKind::*;
        let operator = match node.op_token().map(|t| t.kind()) {
            Some(TRUE_KW) => UnaryClassicalOperator::True,
            Some(FALSE_KW) => UnaryClassicalOperator::False,
            Some(NOT_KW) => UnaryClassicalOperator::Not,
            Some(NEG_KW) => UnaryClassicalOperator::Neg,
            _ => return Err(structural(node.syntax())),
        };
        let target = address(&node.address().ok_or_else(|| structural(node.syntax()))?)?;
        self.push(Instruction::UnaryClassical { operator, target });
        Ok(())
    }

    fn exit_logical_binary(&mut self, node: &syn::LogicalBinaryOp) -> Result<(), QuilError> {
        use SyntaxKind::*;
        let operator = match node.op_token().map(|t| t.kind()) {
            Some(AND_KW) => LogicalOperator::And,
            Some(OR_KW) => LogicalOperator::Or,
            Some(IOR_KW) => LogicalOperator::Ior,
            Some(XOR_KW) => LogicalOperator::Xor,
            _ => return Err(structural(node.syntax())),
        };
        let mut addresses = node.addresses();
        let target = address(&addresses.next().ok_or_else(|| structural(node.syntax()))?)?;
        let operand = match node.int_token() {
            Some(t) => Operand::Immediate(Number::Int(parse_i64(&t)?)),
            None => {
                Operand::Address(address(&addresses.next().ok_or_else(|| structural(node.syntax()))?)?)
            }
        };
        // OR is deprecated and only ever took two memory operands.
        if operator == LogicalOperator::Or {
            if let Operand::Immediate(value) = &operand {
                return Err(QuilError::DisallowedImmediate(value.to_string()));
            }
        }
        self.push(Instruction::LogicalBinary {
            operator,
            target,
            operand,
        });
        Ok(())
    }

    fn exit_arithmetic_binary(&mut self, node: &syn::ArithmeticBinaryOp) -> Result<(), QuilError> {
        use SyntaxKind::*;
        let operator = match node.op_token().map(|t| t.kind()) {
            Some(ADD_KW) => ArithmeticOperator::Add,
            Some(SUB_KW) => ArithmeticOperator::Sub,
            Some(MUL_KW) => ArithmeticOperator::Mul,
            Some(DIV_KW) => ArithmeticOperator::Div,
            _ => return Err(structural(node.syntax())),
        };
        let mut addresses = node.addresses();
        let target = address(&addresses.next().ok_or_else(|| structural(node.syntax()))?)?;
        let operand = match node.number() {
            Some(n) => Operand::Immediate(number(&n)?),
            None => {
                Operand::Address(address(&addresses.next().ok_or_else(|| structural(node.syntax()))?)?)
            }
        };
        self.push(Instruction::ArithmeticBinary {
            operator,
            target,
            operand,
        });
        Ok(())
    }

    fn exit_move(&mut self, node: &syn::Move) -> Result<(), QuilError> {
        let mut addresses = node.addresses();
        let target = address(&addresses.next().ok_or_else(|| structural(node.syntax()))?)?;
        let source = match node.number() {
            Some(n) => Operand::Immediate(number(&n)?),
            None => {
                Operand::Address(address(&addresses.next().ok_or_else(|| structural(node.syntax()))?)?)
            }
        };
        self.push(Instruction::Move { target, source });
        Ok(())
    }

    fn exit_exchange(&mut self, node: &syn::Exchange) -> Result<(), QuilError> {
        let mut addresses = node.addresses();
        let left = address(&addresses.next().ok_or_else(|| structural(node.syntax()))?)?;
        let right = address(&addresses.next().ok_or_else(|| structural(node.syntax()))?)?;
        self.push(Instruction::Exchange { left, right });
        Ok(())
    }

    fn exit_convert(&mut self, node: &syn::Convert) -> Result<(), QuilError> {
        let mut addresses = node.addresses();
        let target = address(&addresses.next().ok_or_else(|| structural(node.syntax()))?)?;
        let source = address(&addresses.next().ok_or_else(|| structural(node.syntax()))?)?;
        self.push(Instruction::Convert { target, source });
        Ok(())
    }

    fn exit_load(&mut self, node: &syn::Load) -> Result<(), QuilError> {
        let mut addresses = node.addresses();
        let target = address(&addresses.next().ok_or_else(|| structural(node.syntax()))?)?;
        let source_region = node
            .identifier_token()
            .ok_or_else(|| structural(node.syntax()))?
            .text()
            .to_string();
        let index = address(&addresses.next().ok_or_else(|| structural(node.syntax()))?)?;
        self.push(Instruction::Load {
            target,
            source_region,
            index,
        });
        Ok(())
    }

    fn exit_store(&mut self, node: &syn::Store) -> Result<(), QuilError> {
        let target_region = node
            .identifier_token()
            .ok_or_else(|| structural(node.syntax()))?
            .text()
            .to_string();
        let mut addresses = node.addresses();
        let index = address(&addresses.next().ok_or_else(|| structural(node.syntax()))?)?;
        let source = match node.number() {
            Some(n) => Operand::Immediate(number(&n)?),
            None => {
                Operand::Address(address(&addresses.next().ok_or_else(|| structural(node.syntax()))?)?)
            }
        };
        self.push(Instruction::Store {
            target_region,
            index,
            source,
        });
        Ok(())
    }

    fn exit_comparison(&mut self, node: &syn::ClassicalComparison) -> Result<(), QuilError> {
        use SyntaxKind::*;
        let operator = match node.op_token().map(|t| t.kind()) {
            Some(EQ_KW) => ComparisonOperator::Equal,
            Some(GT_KW) => ComparisonOperator::GreaterThan,
            Some(GE_KW) => ComparisonOperator::GreaterEqual,
            Some(LT_KW) => ComparisonOperator::LessThan,
            Some(LE_KW) => ComparisonOperator::LessEqual,
            _ => return Err(structural(node.syntax())),
        };
        let mut addresses = node.addresses();
        let target = address(&addresses.next().ok_or_else(|| structural(node.syntax()))?)?;
        let left = address(&addresses.next().ok_or_else(|| structural(node.syntax()))?)?;
        let right = match node.number() {
            Some(n) => Operand::Immediate(number(&n)?),
            None => {
                Operand::Address(address(&addresses.next().ok_or_else(|| structural(node.syntax()))?)?)
            }
        };
        self.push(Instruction::Comparison {
            operator,
            target,
            left,
            right,
        });
        Ok(())
    }

    // Directives -------------------------------------------------------------

    fn exit_include(&mut self, node: &syn::Include) -> Result<(), QuilError> {
        let file = node
            .string_token()
            .ok_or_else(|| structural(node.syntax()))?;
        self.push(Instruction::RawInstruction(format!(
            "INCLUDE {}",
            file.text()
        )));
        Ok(())
    }

    fn exit_pragma(&mut self, node: &syn::Pragma) -> Result<(), QuilError> {
        let command = node
            .identifier_token()
            .ok_or_else(|| structural(node.syntax()))?
            .text()
            .to_string();
        let args = node.pragma_names().map(|n| n.text()).collect();
        let data = node.string_token().map(|t| string_contents(&t));
        self.push(Instruction::Pragma(Pragma {
            command,
            args,
            data,
        }));
        Ok(())
    }

    fn exit_memory_descriptor(&mut self, node: &syn::MemoryDescriptor) -> Result<(), QuilError> {
        let mut identifiers = node.identifier_tokens();
        let name = identifiers
            .next()
            .ok_or_else(|| structural(node.syntax()))?
            .text()
            .to_string();
        let memory_type = identifiers
            .next()
            .ok_or_else(|| structural(node.syntax()))?
            .text()
            .to_string();
        let size = match node.int_token() {
            Some(t) => parse_u64(&t)?,
            None => 1,
        };
        let (shared_region, offsets) = if node.sharing_token().is_some() {
            let region = identifiers
                .next()
                .ok_or_else(|| structural(node.syntax()))?
                .text()
                .to_string();
            let mut offsets = Vec::new();
            for descriptor in node.offset_descriptors() {
                let length =
                    parse_u64(&descriptor.int_token().ok_or_else(|| structural(node.syntax()))?)?;
                let offset_type = descriptor
                    .identifier_token()
                    .ok_or_else(|| structural(node.syntax()))?
                    .text()
                    .to_string();
                offsets.push((length, offset_type));
            }
            (Some(region), offsets)
        } else {
            (None, Vec::new())
        };
        self.push(Instruction::Declare(Declaration {
            name,
            memory_type,
            size,
            shared_region,
            offsets,
        }));
        Ok(())
    }

    // Definitions ------------------------------------------------------------

    fn exit_def_gate(&mut self, node: &syn::DefGate) -> Result<(), QuilError> {
        let name = name_of(node)?;
        let matrix_node = node.matrix().ok_or_else(|| structural(node.syntax()))?;
        let as_permutation = node
            .gate_type()
            .map(|t| t.kind() == SyntaxKind::PERMUTATION_KW)
            .unwrap_or(false);
        if as_permutation {
            let mut rows: Vec<syn::MatrixRow> = matrix_node.rows().collect();
            if rows.len() != 1 {
                return Err(QuilError::PermutationShape(rows.len()));
            }
            let permutation = expressions(rows.remove(0).expressions())?;
            self.push(Instruction::DefPermutationGate(PermutationGateDefinition {
                name,
                permutation,
            }));
        } else {
            let parameters = node
                .variables()
                .map(|v| variable_name(&v))
                .collect::<Result<Vec<_>, _>>()?;
            let matrix = matrix_rows(&matrix_node)?;
            self.push(Instruction::DefGate(GateDefinition {
                name,
                parameters,
                matrix,
            }));
        }
        Ok(())
    }

    fn exit_def_circuit(&mut self, node: &syn::DefCircuit) -> Result<(), QuilError> {
        let name = name_of(node)?;
        let variables: Vec<String> = node.variables().map(|v| v.text()).collect();
        let qubit_variables: Vec<String> = node.qubit_variables().map(|q| q.text()).collect();
        let body = self.exit_definition_scope();

        // Circuits are re-serialized as opaque text: the expansion happens
        // in a later stage that works on the surface syntax.
        let space = if qubit_variables.is_empty() { "" } else { " " };
        let mut raw = if variables.is_empty() {
            format!("DEFCIRCUIT {}{}{}:", name, space, qubit_variables.join(" "))
        } else {
            format!(
                "DEFCIRCUIT {}({}){}{}:",
                name,
                variables.join(", "),
                space,
                qubit_variables.join(" ")
            )
        };
        for instruction in &body {
            raw.push_str("\n    ");
            raw.push_str(&instruction.to_string());
        }
        self.push(Instruction::RawInstruction(raw));
        Ok(())
    }

    fn exit_def_frame(&mut self, node: &syn::DefFrame) -> Result<(), QuilError> {
        let frame = frame(&node.frame().ok_or_else(|| structural(node.syntax()))?)?;
        let mut attributes = Vec::new();
        for spec in node.frame_specs() {
            let attr = spec.attr().ok_or_else(|| structural(node.syntax()))?.text();
            let attribute = match attr.as_str() {
                "DIRECTION" => FrameAttribute::Direction(spec_string(&spec)?),
                "HARDWARE-OBJECT" => FrameAttribute::HardwareObject(spec_string(&spec)?),
                "INITIAL-FREQUENCY" => FrameAttribute::InitialFrequency(spec_expression(&spec)?),
                "CENTER-FREQUENCY" => FrameAttribute::CenterFrequency(spec_expression(&spec)?),
                "SAMPLE-RATE" => FrameAttribute::SampleRate(spec_expression(&spec)?),
                _ => {
                    return Err(QuilError::UnexpectedFrameAttribute {
                        attribute: attr,
                        frame: frame.to_string(),
                    })
                }
            };
            attributes.push(attribute);
        }
        self.push(Instruction::DefFrame(FrameDefinition { frame, attributes }));
        Ok(())
    }

    fn exit_def_calibration(&mut self, node: &syn::DefCalibration) -> Result<(), QuilError> {
        let name = name_of(node)?;
        let parameters = expressions(node.params())?;
        for parameter in &parameters {
            let references = parameter.contained_memory_references();
            if !references.is_empty() {
                return Err(QuilError::CalibrationReferencesMemory { name, references });
            }
        }
        let qubits: Vec<QubitRef> = node.qubits().map(|q| formal_qubit(&q)).collect();
        let instructions = self.exit_definition_scope();
        self.push(Instruction::DefCalibration(CalibrationDefinition {
            name,
            parameters,
            qubits,
            instructions,
        }));
        Ok(())
    }

    fn exit_def_meas_calibration(
        &mut self,
        node: &syn::DefMeasCalibration,
    ) -> Result<(), QuilError> {
        let qubit = formal_qubit(&node.qubit().ok_or_else(|| structural(node.syntax()))?);
        let target = node.name().map(|n| n.text());
        let instructions = self.exit_definition_scope();
        self.push(Instruction::DefMeasureCalibration(
            MeasureCalibrationDefinition {
                qubit,
                target,
                instructions,
            },
        ));
        Ok(())
    }

    fn exit_def_waveform(&mut self, node: &syn::DefWaveform) -> Result<(), QuilError> {
        let name = waveform_name(
            &node
                .waveform_name()
                .ok_or_else(|| structural(node.syntax()))?,
        );
        if self.waveforms.contains(&name) {
            return Err(QuilError::ReservedWaveform(name));
        }
        let parameters: Vec<String> = node.params().map(|p| p.text()).collect();
        let matrix_node = node.matrix().ok_or_else(|| structural(node.syntax()))?;
        let mut entries = Vec::new();
        for row in matrix_node.rows() {
            entries.extend(expressions(row.expressions())?);
        }
        self.push(Instruction::DefWaveform(WaveformDefinition {
            name,
            parameters,
            entries,
        }));
        Ok(())
    }

    // Pulse-level instructions ------------------------------------------------

    fn exit_pulse(&mut self, node: &syn::Pulse) -> Result<(), QuilError> {
        let frame = frame(&node.frame().ok_or_else(|| structural(node.syntax()))?)?;
        let waveform =
            self.waveform(&node.waveform().ok_or_else(|| structural(node.syntax()))?)?;
        self.push(Instruction::Pulse {
            frame,
            waveform,
            nonblocking: node.nonblocking_token().is_some(),
        });
        Ok(())
    }

    fn exit_set_frequency(&mut self, node: &syn::SetFrequency) -> Result<(), QuilError> {
        let frame = frame(&node.frame().ok_or_else(|| structural(node.syntax()))?)?;
        let frequency = instruction_expression(node.syntax(), node.expression())?;
        self.push(Instruction::SetFrequency { frame, frequency });
        Ok(())
    }

    fn exit_shift_frequency(&mut self, node: &syn::ShiftFrequency) -> Result<(), QuilError> {
        let frame = frame(&node.frame().ok_or_else(|| structural(node.syntax()))?)?;
        let frequency = instruction_expression(node.syntax(), node.expression())?;
        self.push(Instruction::ShiftFrequency { frame, frequency });
        Ok(())
    }

    fn exit_set_phase(&mut self, node: &syn::SetPhase) -> Result<(), QuilError> {
        let frame = frame(&node.frame().ok_or_else(|| structural(node.syntax()))?)?;
        let phase = instruction_expression(node.syntax(), node.expression())?;
        self.push(Instruction::SetPhase { frame, phase });
        Ok(())
    }

    fn exit_shift_phase(&mut self, node: &syn::ShiftPhase) -> Result<(), QuilError> {
        let frame = frame(&node.frame().ok_or_else(|| structural(node.syntax()))?)?;
        let phase = instruction_expression(node.syntax(), node.expression())?;
        self.push(Instruction::ShiftPhase { frame, phase });
        Ok(())
    }

    fn exit_swap_phase(&mut self, node: &syn::SwapPhase) -> Result<(), QuilError> {
        let mut frames = node.frames();
        let frame_a = frame(&frames.next().ok_or_else(|| structural(node.syntax()))?)?;
        let frame_b = frame(&frames.next().ok_or_else(|| structural(node.syntax()))?)?;
        self.push(Instruction::SwapPhase { frame_a, frame_b });
        Ok(())
    }

    fn exit_set_scale(&mut self, node: &syn::SetScale) -> Result<(), QuilError> {
        let frame = frame(&node.frame().ok_or_else(|| structural(node.syntax()))?)?;
        let scale = instruction_expression(node.syntax(), node.expression())?;
        self.push(Instruction::SetScale { frame, scale });
        Ok(())
    }

    fn exit_capture(&mut self, node: &syn::Capture) -> Result<(), QuilError> {
        let frame = frame(&node.frame().ok_or_else(|| structural(node.syntax()))?)?;
        let kernel =
            self.waveform(&node.waveform().ok_or_else(|| structural(node.syntax()))?)?;
        let memory = address(&node.address().ok_or_else(|| structural(node.syntax()))?)?;
        self.push(Instruction::Capture {
            frame,
            kernel,
            memory,
            nonblocking: node.nonblocking_token().is_some(),
        });
        Ok(())
    }

    fn exit_raw_capture(&mut self, node: &syn::RawCapture) -> Result<(), QuilError> {
        let frame = frame(&node.frame().ok_or_else(|| structural(node.syntax()))?)?;
        let duration = instruction_expression(node.syntax(), node.expression())?;
        let memory = address(&node.address().ok_or_else(|| structural(node.syntax()))?)?;
        self.push(Instruction::RawCapture {
            frame,
            duration,
            memory,
            nonblocking: node.nonblocking_token().is_some(),
        });
        Ok(())
    }

    fn exit_delay(&mut self, node: &syn::Delay) -> Result<(), QuilError> {
        let duration = instruction_expression(node.syntax(), node.expression())?;
        let qubits: Vec<QubitRef> = node.qubits().map(|q| formal_qubit(&q)).collect();
        let frame_names: Vec<String> = node.string_tokens().map(|t| string_contents(&t)).collect();
        if frame_names.is_empty() {
            self.push(Instruction::DelayQubits { qubits, duration });
        } else {
            let frames = frame_names
                .into_iter()
                .map(|name| Frame {
                    qubits: qubits.clone(),
                    name,
                })
                .collect();
            self.push(Instruction::DelayFrames { frames, duration });
        }
        Ok(())
    }

    fn exit_fence(&mut self, node: &syn::Fence) -> Result<(), QuilError> {
        let qubits: Vec<QubitRef> = node.qubits().map(|q| formal_qubit(&q)).collect();
        if qubits.is_empty() {
            self.push(Instruction::FenceAll);
        } else {
            self.push(Instruction::Fence(qubits));
        }
        Ok(())
    }

    fn waveform(&self, node: &syn::Waveform) -> Result<Waveform, QuilError> {
        let name = waveform_name(
            &node
                .waveform_name()
                .ok_or_else(|| structural(node.syntax()))?,
        );
        let parameters = named_parameters(node.named_params())?;
        if parameters.is_empty() {
            Ok(Waveform::Reference(name))
        } else {
            self.waveforms
                .instantiate(&name, parameters)
                .ok_or(QuilError::UnknownWaveform(name))
        }
    }
}

// Expression lowering ---------------------------------------------------------

/// Lower an expression node, folding concrete arithmetic as it goes. Any
/// node shape the dispatch does not recognize is a malformed expression.
pub fn from_expr(node: &SyntaxNode) -> Result<Expression, QuilError> {
    use SyntaxKind::*;
    match node.kind() {
        PAREN_EXPRESSION => from_expr(&inner_expression(node)?),
        POWER_EXPRESSION => binary(node, InfixOperator::Caret),
        MUL_DIV_EXPRESSION => {
            if has_token(node, TIMES) {
                binary(node, InfixOperator::Star)
            } else if has_token(node, DIVIDE) {
                binary(node, InfixOperator::Slash)
            } else {
                Err(structural(node))
            }
        }
        ADD_SUB_EXPRESSION => {
            if has_token(node, PLUS) {
                binary(node, InfixOperator::Plus)
            } else if has_token(node, MINUS) {
                binary(node, InfixOperator::Minus)
            } else {
                Err(structural(node))
            }
        }
        SIGNED_EXPRESSION => {
            let inner = from_expr(&inner_expression(node)?)?;
            if has_token(node, MINUS) {
                Ok(inner.negate())
            } else if has_token(node, PLUS) {
                Ok(inner)
            } else {
                Err(structural(node))
            }
        }
        FUNCTION_EXPRESSION => {
            let function = node
                .children_with_tokens()
                .filter_map(|it| it.into_token())
                .find_map(|t| match t.kind() {
                    SIN_KW => Some(ExpressionFunction::Sine),
                    COS_KW => Some(ExpressionFunction::Cosine),
                    SQRT_KW => Some(ExpressionFunction::SquareRoot),
                    EXP_KW => Some(ExpressionFunction::Exponent),
                    CIS_KW => Some(ExpressionFunction::Cis),
                    _ => None,
                })
                .ok_or_else(|| structural(node))?;
            let argument = from_expr(&inner_expression(node)?)?;
            Ok(Expression::apply_function(function, argument))
        }
        NUMBER => {
            let view = cast::<syn::Number>(node);
            Ok(Expression::Number(number(&view)?))
        }
        VARIABLE => {
            let view = cast::<syn::Variable>(node);
            Ok(Expression::Parameter(variable_name(&view)?))
        }
        ADDRESS => {
            let view = cast::<syn::Address>(node);
            Ok(Expression::Address(address(&view)?))
        }
        _ => Err(QuilError::MalformedExpression(node.text().to_string())),
    }
}

fn binary(node: &SyntaxNode, operator: InfixOperator) -> Result<Expression, QuilError> {
    let mut operands = node.children().filter(|n| n.kind().is_expression());
    let left = operands.next().ok_or_else(|| structural(node))?;
    let right = operands.next().ok_or_else(|| structural(node))?;
    Ok(Expression::infix(
        operator,
        from_expr(&left)?,
        from_expr(&right)?,
    ))
}

fn inner_expression(node: &SyntaxNode) -> Result<SyntaxNode, QuilError> {
    node.children()
        .find(|n| n.kind().is_expression())
        .ok_or_else(|| structural(node))
}

fn has_token(node: &SyntaxNode, kind: SyntaxKind) -> bool {
    node.children_with_tokens()
        .filter_map(|it| it.into_token())
        .any(|t| t.kind() == kind)
}

// Reference resolution ---------------------------------------------------------

fn cast<N: AstNode>(node: &SyntaxNode) -> N {
    match N::cast(node.clone()) {
        Some(view) => view,
        // leave_node and from_expr only cast after matching on the kind.
        None => unreachable!("cast after kind match"),
    }
}

fn structural(node: &SyntaxNode) -> QuilError {
    QuilError::MalformedExpression(node.text().to_string())
}

fn name_of<N: HasName>(node: &N) -> Result<String, QuilError> {
    node.name()
        .map(|n| n.text())
        .ok_or_else(|| structural(node.syntax()))
}

fn parse_u64(token: &SyntaxToken) -> Result<u64, QuilError> {
    token
        .text()
        .parse()
        .map_err(|_| QuilError::MalformedNumber(token.text().to_string()))
}

fn parse_i64(token: &SyntaxToken) -> Result<i64, QuilError> {
    token
        .text()
        .parse()
        .map_err(|_| QuilError::MalformedNumber(token.text().to_string()))
}

fn parse_f64(token: &SyntaxToken) -> Result<f64, QuilError> {
    token
        .text()
        .parse()
        .map_err(|_| QuilError::MalformedNumber(token.text().to_string()))
}

/// A concrete qubit index. Anything else is an error at this position.
fn qubit(node: &syn::Qubit) -> Result<QubitRef, QuilError> {
    let text = node.text();
    text.parse::<u64>()
        .map(QubitRef::Fixed)
        .map_err(|_| QuilError::InvalidQubit(text))
}

/// A qubit position that may be a formal name, as in calibration signatures
/// and pulse-level operands.
fn formal_qubit(node: &syn::Qubit) -> QubitRef {
    let text = node.text();
    match text.parse::<u64>() {
        Ok(index) => QubitRef::Fixed(index),
        Err(_) => QubitRef::Formal(text),
    }
}

/// A classical operand: `name`, `name[offset]`, or the deprecated `[n]`.
fn address(node: &syn::Address) -> Result<Address, QuilError> {
    match node.identifier_token() {
        Some(name) => {
            let offset = match node.int_token() {
                Some(t) => parse_u64(&t)?,
                None => 0,
            };
            Ok(Address::Memory(MemoryReference::new(
                name.text().to_string(),
                offset,
            )))
        }
        None => {
            let index = node.int_token().ok_or_else(|| structural(node.syntax()))?;
            Ok(Address::Register(parse_u64(&index)?))
        }
    }
}

fn label(node: &syn::Label) -> Result<String, QuilError> {
    node.identifier_token()
        .map(|t| t.text().to_string())
        .ok_or_else(|| structural(node.syntax()))
}

fn variable_name(node: &syn::Variable) -> Result<String, QuilError> {
    node.identifier_token()
        .map(|t| t.text().to_string())
        .ok_or_else(|| structural(node.syntax()))
}

fn number(node: &syn::Number) -> Result<Number, QuilError> {
    let negative = node.minus_token().is_some();
    let value = if let Some(imaginary) = node.imaginary() {
        let magnitude = match (imaginary.int_token(), imaginary.float_token()) {
            (Some(t), _) | (None, Some(t)) => parse_f64(&t)?,
            (None, None) => return Err(QuilError::MalformedNumber(node.text())),
        };
        Number::Complex(Complex64::new(0.0, magnitude))
    } else if let Some(t) = node.int_token() {
        Number::Int(parse_i64(&t)?)
    } else if let Some(t) = node.float_token() {
        Number::Real(parse_f64(&t)?)
    } else if node.i_token().is_some() {
        Number::Complex(Complex64::i())
    } else if node.pi_token().is_some() {
        Number::Real(std::f64::consts::PI)
    } else {
        return Err(QuilError::MalformedNumber(node.text()));
    };
    Ok(if negative { value.neg() } else { value })
}

fn expressions(children: AstChildren<syn::Expr>) -> Result<Vec<Expression>, QuilError> {
    children.map(|e| from_expr(e.syntax())).collect()
}

fn matrix_rows(node: &syn::Matrix) -> Result<Vec<Vec<Expression>>, QuilError> {
    node.rows().map(|row| expressions(row.expressions())).collect()
}

fn string_contents(token: &SyntaxToken) -> String {
    token.text().trim_matches('"').to_string()
}

/// Segments of a waveform name joined with `/`, e.g. `q0/flat`.
fn waveform_name(node: &syn::WaveformName) -> String {
    node.names().map(|n| n.text()).collect::<Vec<_>>().join("/")
}

fn named_parameters(
    params: AstChildren<syn::NamedParam>,
) -> Result<IndexMap<String, Expression>, QuilError> {
    let mut map = IndexMap::new();
    for param in params {
        let name = param
            .identifier_token()
            .ok_or_else(|| structural(param.syntax()))?
            .text()
            .to_string();
        let value = from_expr(
            param
                .expression()
                .ok_or_else(|| structural(param.syntax()))?
                .syntax(),
        )?;
        // A repeated name keeps its original position; the last value wins.
        map.insert(name, value);
    }
    Ok(map)
}

fn frame(node: &syn::Frame) -> Result<Frame, QuilError> {
    let qubits = node.qubits().map(|q| formal_qubit(&q)).collect();
    let name = node
        .string_token()
        .map(|t| string_contents(&t))
        .ok_or_else(|| structural(node.syntax()))?;
    Ok(Frame { qubits, name })
}

fn spec_string(spec: &syn::FrameSpec) -> Result<String, QuilError> {
    spec.string_token()
        .map(|t| string_contents(&t))
        .ok_or_else(|| structural(spec.syntax()))
}

fn spec_expression(spec: &syn::FrameSpec) -> Result<Expression, QuilError> {
    from_expr(
        spec.expression()
            .ok_or_else(|| structural(spec.syntax()))?
            .syntax(),
    )
}

fn instruction_expression(
    parent: &SyntaxNode,
    child: Option<syn::Expr>,
) -> Result<Expression, QuilError> {
    from_expr(child.ok_or_else(|| structural(parent))?.syntax())
}

fn pop_modifier_qubit(
    modifier_qubits: &mut Vec<QubitRef>,
    node: &syn::Gate,
) -> Result<QubitRef, QuilError> {
    modifier_qubits
        .pop()
        .ok_or_else(|| structural(node.syntax()))
}
