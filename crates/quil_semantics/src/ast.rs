// Copyright contributors to the quil-frontend project
// SPDX-License-Identifier: Apache-2.0

//! The typed instruction AST the analyzer produces.
//!
//! One `Instruction` per program line. Definition bodies (`DEFCAL`,
//! `DEFCAL MEASURE`) carry their own instruction lists; `DEFCIRCUIT` and a
//! few other forms that later stages treat as opaque text are kept as
//! `RawInstruction`.

use indexmap::IndexMap;

use crate::expression::Expression;

/// A qubit position: either a concrete index or a formal name bound by a
/// surrounding `DEFCAL` or `DEFCIRCUIT`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum QubitRef {
    Fixed(u64),
    Formal(String),
}

/// A named classical memory cell, e.g. `ro[3]`. A bare name denotes
/// offset zero.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MemoryReference {
    pub name: String,
    pub offset: u64,
}

impl MemoryReference {
    pub fn new(name: String, offset: u64) -> MemoryReference {
        MemoryReference { name, offset }
    }
}

/// A classical operand position: the modern named form or the deprecated
/// numbered-register form `[n]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Address {
    Register(u64),
    Memory(MemoryReference),
}

/// A frame: an ordered qubit list plus a frame name, e.g. `0 1 "cz"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Frame {
    pub qubits: Vec<QubitRef>,
    pub name: String,
}

/// A waveform in operand position: either a reference to a defined waveform
/// or a built-in template instantiated with named parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum Waveform {
    Reference(String),
    Template(TemplateWaveform),
}

#[derive(Clone, Debug, PartialEq)]
pub struct TemplateWaveform {
    pub name: String,
    pub parameters: IndexMap<String, Expression>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateModifier {
    Controlled,
    Dagger,
    Forked,
}

/// A gate application. Modifiers are stored outermost first, matching the
/// order they are written; the qubit and parameter lists already include
/// everything the modifiers consume.
#[derive(Clone, Debug, PartialEq)]
pub struct Gate {
    pub name: String,
    pub parameters: Vec<Expression>,
    pub qubits: Vec<QubitRef>,
    pub modifiers: Vec<GateModifier>,
}

impl Gate {
    pub fn new(name: impl Into<String>, parameters: Vec<Expression>, qubits: Vec<QubitRef>) -> Gate {
        Gate {
            name: name.into(),
            parameters,
            qubits,
            modifiers: Vec::new(),
        }
    }

    /// Wrap in `CONTROLLED`, with `control` as the new outermost qubit.
    pub fn controlled(&mut self, control: QubitRef) {
        self.modifiers.insert(0, GateModifier::Controlled);
        self.qubits.insert(0, control);
    }

    /// Wrap in `DAGGER`.
    pub fn dagger(&mut self) {
        self.modifiers.insert(0, GateModifier::Dagger);
    }

    /// Wrap in `FORKED`: `fork` selects between the existing parameter group
    /// and `alternate_parameters`.
    pub fn forked(&mut self, fork: QubitRef, alternate_parameters: Vec<Expression>) {
        self.modifiers.insert(0, GateModifier::Forked);
        self.qubits.insert(0, fork);
        self.parameters.extend(alternate_parameters);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Measurement {
    pub qubit: QubitRef,
    pub target: Option<Address>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnaryClassicalOperator {
    True,
    False,
    Not,
    Neg,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
    Or,
    Ior,
    Xor,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArithmeticOperator {
    Add,
    Sub,
    Mul,
    Div,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComparisonOperator {
    Equal,
    GreaterThan,
    GreaterEqual,
    LessThan,
    LessEqual,
}

/// The right-hand side of a two-operand classical instruction.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Address(Address),
    Immediate(crate::expression::Number),
}

/// A `DECLARE` line. `size` defaults to 1 when no length is written.
#[derive(Clone, Debug, PartialEq)]
pub struct Declaration {
    pub name: String,
    pub memory_type: String,
    pub size: u64,
    pub shared_region: Option<String>,
    pub offsets: Vec<(u64, String)>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pragma {
    pub command: String,
    pub args: Vec<String>,
    pub data: Option<String>,
}

/// `DEFGATE name(%a, %b): ...` with an explicit matrix. Parameter names are
/// stored without the `%` sigil.
#[derive(Clone, Debug, PartialEq)]
pub struct GateDefinition {
    pub name: String,
    pub parameters: Vec<String>,
    pub matrix: Vec<Vec<Expression>>,
}

/// `DEFGATE name AS PERMUTATION: ...` with a single row of basis indices.
#[derive(Clone, Debug, PartialEq)]
pub struct PermutationGateDefinition {
    pub name: String,
    pub permutation: Vec<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FrameAttribute {
    Direction(String),
    HardwareObject(String),
    InitialFrequency(Expression),
    CenterFrequency(Expression),
    SampleRate(Expression),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameDefinition {
    pub frame: Frame,
    pub attributes: Vec<FrameAttribute>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CalibrationDefinition {
    pub name: String,
    pub parameters: Vec<Expression>,
    pub qubits: Vec<QubitRef>,
    pub instructions: Vec<Instruction>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeasureCalibrationDefinition {
    pub qubit: QubitRef,
    /// The formal name bound to the measurement target, when one is written.
    pub target: Option<String>,
    pub instructions: Vec<Instruction>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct WaveformDefinition {
    pub name: String,
    /// Parameter names as written, `%` sigil included.
    pub parameters: Vec<String>,
    pub entries: Vec<Expression>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Instruction {
    Gate(Gate),
    Measurement(Measurement),
    JumpTarget(String),
    Jump(String),
    JumpWhen { target: String, condition: Address },
    JumpUnless { target: String, condition: Address },
    Halt,
    Wait,
    Nop,
    Reset(Option<QubitRef>),
    UnaryClassical { operator: UnaryClassicalOperator, target: Address },
    LogicalBinary { operator: LogicalOperator, target: Address, operand: Operand },
    ArithmeticBinary { operator: ArithmeticOperator, target: Address, operand: Operand },
    Move { target: Address, source: Operand },
    Exchange { left: Address, right: Address },
    Convert { target: Address, source: Address },
    Load { target: Address, source_region: String, index: Address },
    Store { target_region: String, index: Address, source: Operand },
    Comparison { operator: ComparisonOperator, target: Address, left: Address, right: Operand },
    Declare(Declaration),
    Pragma(Pragma),
    /// A line later stages treat as opaque text: `INCLUDE`, `DEFCIRCUIT`
    /// and the schematic instruction forms inside circuit bodies.
    RawInstruction(String),
    DefGate(GateDefinition),
    DefPermutationGate(PermutationGateDefinition),
    DefFrame(FrameDefinition),
    DefCalibration(CalibrationDefinition),
    DefMeasureCalibration(MeasureCalibrationDefinition),
    DefWaveform(WaveformDefinition),
    Pulse { frame: Frame, waveform: Waveform, nonblocking: bool },
    SetFrequency { frame: Frame, frequency: Expression },
    ShiftFrequency { frame: Frame, frequency: Expression },
    SetPhase { frame: Frame, phase: Expression },
    ShiftPhase { frame: Frame, phase: Expression },
    SwapPhase { frame_a: Frame, frame_b: Frame },
    SetScale { frame: Frame, scale: Expression },
    Capture { frame: Frame, kernel: Waveform, memory: Address, nonblocking: bool },
    RawCapture { frame: Frame, duration: Expression, memory: Address, nonblocking: bool },
    DelayFrames { frames: Vec<Frame>, duration: Expression },
    DelayQubits { qubits: Vec<QubitRef>, duration: Expression },
    Fence(Vec<QubitRef>),
    FenceAll,
}
