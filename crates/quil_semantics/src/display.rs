// Copyright contributors to the quil-frontend project
// SPDX-License-Identifier: Apache-2.0

//! Surface-syntax rendering for instructions and expressions.
//!
//! `Display` output is valid Quil and is what `DEFCIRCUIT` bodies are
//! re-serialized through. Reals always carry a decimal point so they read
//! back as floats; nested infix operands are parenthesized.

use std::fmt;

use itertools::Itertools;

use crate::ast::{
    Address, CalibrationDefinition, Declaration, Frame, FrameAttribute, FrameDefinition, Gate,
    GateDefinition, GateModifier, Instruction, Measurement, MeasureCalibrationDefinition,
    MemoryReference, Operand, PermutationGateDefinition, Pragma, QubitRef, TemplateWaveform,
    Waveform, WaveformDefinition,
};
use crate::expression::{Expression, ExpressionFunction, InfixOperator, Number};

fn format_real(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{n}"),
            Number::Real(r) => write!(f, "{}", format_real(*r)),
            Number::Complex(c) => {
                if c.re == 0.0 {
                    write!(f, "{}i", format_real(c.im))
                } else if c.im < 0.0 {
                    write!(f, "{}-{}i", format_real(c.re), format_real(-c.im))
                } else {
                    write!(f, "{}+{}i", format_real(c.re), format_real(c.im))
                }
            }
        }
    }
}

impl fmt::Display for InfixOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            InfixOperator::Plus => "+",
            InfixOperator::Minus => "-",
            InfixOperator::Star => "*",
            InfixOperator::Slash => "/",
            InfixOperator::Caret => "^",
        })
    }
}

impl fmt::Display for ExpressionFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ExpressionFunction::Sine => "SIN",
            ExpressionFunction::Cosine => "COS",
            ExpressionFunction::SquareRoot => "SQRT",
            ExpressionFunction::Exponent => "EXP",
            ExpressionFunction::Cis => "CIS",
        })
    }
}

// Operands of a nested operation get parentheses; precedence is not
// re-derived on output.
fn format_operand(expression: &Expression) -> String {
    match expression {
        Expression::Infix { .. } => format!("({expression})"),
        _ => expression.to_string(),
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Number(n) => write!(f, "{n}"),
            Expression::Parameter(name) => write!(f, "%{name}"),
            Expression::Address(address) => write!(f, "{address}"),
            Expression::Infix {
                operator,
                left,
                right,
            } => write!(
                f,
                "{}{}{}",
                format_operand(left),
                operator,
                format_operand(right)
            ),
            Expression::FunctionCall { function, argument } => {
                write!(f, "{function}({argument})")
            }
        }
    }
}

impl fmt::Display for QubitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QubitRef::Fixed(index) => write!(f, "{index}"),
            QubitRef::Formal(name) => write!(f, "{name}"),
        }
    }
}

impl fmt::Display for MemoryReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.offset)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::Register(n) => write!(f, "[{n}]"),
            Address::Memory(reference) => write!(f, "{reference}"),
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Address(address) => write!(f, "{address}"),
            Operand::Immediate(number) => write!(f, "{number}"),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} \"{}\"", self.qubits.iter().join(" "), self.name)
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Waveform::Reference(name) => write!(f, "{name}"),
            Waveform::Template(template) => write!(f, "{template}"),
        }
    }
}

impl fmt::Display for TemplateWaveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parameters = self
            .parameters
            .iter()
            .map(|(name, value)| format!("{name}: {value}"))
            .join(", ");
        write!(f, "{}({})", self.name, parameters)
    }
}

impl fmt::Display for GateModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GateModifier::Controlled => "CONTROLLED",
            GateModifier::Dagger => "DAGGER",
            GateModifier::Forked => "FORKED",
        })
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for modifier in &self.modifiers {
            write!(f, "{modifier} ")?;
        }
        write!(f, "{}", self.name)?;
        if !self.parameters.is_empty() {
            write!(f, "({})", self.parameters.iter().join(", "))?;
        }
        write!(f, " {}", self.qubits.iter().join(" "))
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MEASURE {}", self.qubit)?;
        if let Some(target) = &self.target {
            write!(f, " {target}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DECLARE {} {}[{}]", self.name, self.memory_type, self.size)?;
        if let Some(region) = &self.shared_region {
            write!(f, " SHARING {region}")?;
            for (length, memory_type) in &self.offsets {
                write!(f, " OFFSET {length} {memory_type}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for Pragma {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PRAGMA {}", self.command)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        if let Some(data) = &self.data {
            write!(f, " \"{data}\"")?;
        }
        Ok(())
    }
}

impl fmt::Display for GateDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DEFGATE {}", self.name)?;
        if !self.parameters.is_empty() {
            let parameters = self.parameters.iter().map(|p| format!("%{p}")).join(", ");
            write!(f, "({parameters})")?;
        }
        write!(f, ":")?;
        for row in &self.matrix {
            write!(f, "\n    {}", row.iter().join(", "))?;
        }
        Ok(())
    }
}

impl fmt::Display for PermutationGateDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DEFGATE {} AS PERMUTATION:\n    {}",
            self.name,
            self.permutation.iter().join(", ")
        )
    }
}

impl fmt::Display for FrameAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameAttribute::Direction(s) => write!(f, "DIRECTION: \"{s}\""),
            FrameAttribute::HardwareObject(s) => write!(f, "HARDWARE-OBJECT: \"{s}\""),
            FrameAttribute::InitialFrequency(e) => write!(f, "INITIAL-FREQUENCY: {e}"),
            FrameAttribute::CenterFrequency(e) => write!(f, "CENTER-FREQUENCY: {e}"),
            FrameAttribute::SampleRate(e) => write!(f, "SAMPLE-RATE: {e}"),
        }
    }
}

impl fmt::Display for FrameDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DEFFRAME {}:", self.frame)?;
        for attribute in &self.attributes {
            write!(f, "\n    {attribute}")?;
        }
        Ok(())
    }
}

impl fmt::Display for CalibrationDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DEFCAL {}", self.name)?;
        if !self.parameters.is_empty() {
            write!(f, "({})", self.parameters.iter().join(", "))?;
        }
        write!(f, " {}:", self.qubits.iter().join(" "))?;
        for instruction in &self.instructions {
            write!(f, "\n    {instruction}")?;
        }
        Ok(())
    }
}

impl fmt::Display for MeasureCalibrationDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DEFCAL MEASURE {}", self.qubit)?;
        if let Some(target) = &self.target {
            write!(f, " {target}")?;
        }
        write!(f, ":")?;
        for instruction in &self.instructions {
            write!(f, "\n    {instruction}")?;
        }
        Ok(())
    }
}

impl fmt::Display for WaveformDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DEFWAVEFORM {}", self.name)?;
        if !self.parameters.is_empty() {
            write!(f, "({})", self.parameters.iter().join(", "))?;
        }
        write!(f, ":\n    {}", self.entries.iter().join(", "))
    }
}

fn nonblocking_prefix(nonblocking: bool) -> &'static str {
    if nonblocking {
        "NONBLOCKING "
    } else {
        ""
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Gate(gate) => write!(f, "{gate}"),
            Instruction::Measurement(measurement) => write!(f, "{measurement}"),
            Instruction::JumpTarget(label) => write!(f, "LABEL @{label}"),
            Instruction::Jump(label) => write!(f, "JUMP @{label}"),
            Instruction::JumpWhen { target, condition } => {
                write!(f, "JUMP-WHEN @{target} {condition}")
            }
            Instruction::JumpUnless { target, condition } => {
                write!(f, "JUMP-UNLESS @{target} {condition}")
            }
            Instruction::Halt => f.write_str("HALT"),
            Instruction::Wait => f.write_str("WAIT"),
            Instruction::Nop => f.write_str("NOP"),
            Instruction::Reset(None) => f.write_str("RESET"),
            Instruction::Reset(Some(qubit)) => write!(f, "RESET {qubit}"),
            Instruction::UnaryClassical { operator, target } => {
                let name = match operator {
                    crate::ast::UnaryClassicalOperator::True => "TRUE",
                    crate::ast::UnaryClassicalOperator::False => "FALSE",
                    crate::ast::UnaryClassicalOperator::Not => "NOT",
                    crate::ast::UnaryClassicalOperator::Neg => "NEG",
                };
                write!(f, "{name} {target}")
            }
            Instruction::LogicalBinary {
                operator,
                target,
                operand,
            } => {
                let name = match operator {
                    crate::ast::LogicalOperator::And => "AND",
                    crate::ast::LogicalOperator::Or => "OR",
                    crate::ast::LogicalOperator::Ior => "IOR",
                    crate::ast::LogicalOperator::Xor => "XOR",
                };
                write!(f, "{name} {target} {operand}")
            }
            Instruction::ArithmeticBinary {
                operator,
                target,
                operand,
            } => {
                let name = match operator {
                    crate::ast::ArithmeticOperator::Add => "ADD",
                    crate::ast::ArithmeticOperator::Sub => "SUB",
                    crate::ast::ArithmeticOperator::Mul => "MUL",
                    crate::ast::ArithmeticOperator::Div => "DIV",
                };
                write!(f, "{name} {target} {operand}")
            }
            Instruction::Move { target, source } => write!(f, "MOVE {target} {source}"),
            Instruction::Exchange { left, right } => write!(f, "EXCHANGE {left} {right}"),
            Instruction::Convert { target, source } => write!(f, "CONVERT {target} {source}"),
            Instruction::Load {
                target,
                source_region,
                index,
            } => write!(f, "LOAD {target} {source_region} {index}"),
            Instruction::Store {
                target_region,
                index,
                source,
            } => write!(f, "STORE {target_region} {index} {source}"),
            Instruction::Comparison {
                operator,
                target,
                left,
                right,
            } => {
                let name = match operator {
                    crate::ast::ComparisonOperator::Equal => "EQ",
                    crate::ast::ComparisonOperator::GreaterThan => "GT",
                    crate::ast::ComparisonOperator::GreaterEqual => "GE",
                    crate::ast::ComparisonOperator::LessThan => "LT",
                    crate::ast::ComparisonOperator::LessEqual => "LE",
                };
                write!(f, "{name} {target} {left} {right}")
            }
            Instruction::Declare(declaration) => write!(f, "{declaration}"),
            Instruction::Pragma(pragma) => write!(f, "{pragma}"),
            Instruction::RawInstruction(text) => f.write_str(text),
            Instruction::DefGate(definition) => write!(f, "{definition}"),
            Instruction::DefPermutationGate(definition) => write!(f, "{definition}"),
            Instruction::DefFrame(definition) => write!(f, "{definition}"),
            Instruction::DefCalibration(definition) => write!(f, "{definition}"),
            Instruction::DefMeasureCalibration(definition) => write!(f, "{definition}"),
            Instruction::DefWaveform(definition) => write!(f, "{definition}"),
            Instruction::Pulse {
                frame,
                waveform,
                nonblocking,
            } => write!(
                f,
                "{}PULSE {frame} {waveform}",
                nonblocking_prefix(*nonblocking)
            ),
            Instruction::SetFrequency { frame, frequency } => {
                write!(f, "SET-FREQUENCY {frame} {frequency}")
            }
            Instruction::ShiftFrequency { frame, frequency } => {
                write!(f, "SHIFT-FREQUENCY {frame} {frequency}")
            }
            Instruction::SetPhase { frame, phase } => write!(f, "SET-PHASE {frame} {phase}"),
            Instruction::ShiftPhase { frame, phase } => write!(f, "SHIFT-PHASE {frame} {phase}"),
            Instruction::SwapPhase { frame_a, frame_b } => {
                write!(f, "SWAP-PHASE {frame_a} {frame_b}")
            }
            Instruction::SetScale { frame, scale } => write!(f, "SET-SCALE {frame} {scale}"),
            Instruction::Capture {
                frame,
                kernel,
                memory,
                nonblocking,
            } => write!(
                f,
                "{}CAPTURE {frame} {kernel} {memory}",
                nonblocking_prefix(*nonblocking)
            ),
            Instruction::RawCapture {
                frame,
                duration,
                memory,
                nonblocking,
            } => write!(
                f,
                "{}RAW-CAPTURE {frame} {duration} {memory}",
                nonblocking_prefix(*nonblocking)
            ),
            Instruction::DelayFrames { frames, duration } => {
                // Every frame in a DELAY names the same qubit set.
                write!(f, "DELAY")?;
                if let Some(first) = frames.first() {
                    for qubit in &first.qubits {
                        write!(f, " {qubit}")?;
                    }
                }
                for frame in frames {
                    write!(f, " \"{}\"", frame.name)?;
                }
                write!(f, " {duration}")
            }
            Instruction::DelayQubits { qubits, duration } => {
                write!(f, "DELAY {} {duration}", qubits.iter().join(" "))
            }
            Instruction::Fence(qubits) => write!(f, "FENCE {}", qubits.iter().join(" ")),
            Instruction::FenceAll => f.write_str("FENCE"),
        }
    }
}
