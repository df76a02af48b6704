// Copyright contributors to the quil-frontend project
// SPDX-License-Identifier: Apache-2.0

//! Lowering of gate, classical and control-flow instructions.

mod common;

use common::*;
use quil_semantics::ast::*;
use quil_semantics::expression::{Expression, Number};
use quil_semantics::{analyze, syntax_to_instructions, QuilError, TokenMismatch};
use quil_syntax::SyntaxKind::{self, *};

fn lower(build: impl FnOnce(&mut quil_syntax::SyntaxTreeBuilder)) -> Vec<Instruction> {
    syntax_to_instructions(&program(build)).unwrap()
}

fn lower_err(build: impl FnOnce(&mut quil_syntax::SyntaxTreeBuilder)) -> QuilError {
    syntax_to_instructions(&program(build)).unwrap_err()
}

#[test]
fn simple_gate() {
    let instructions = lower(|b| {
        node(b, GATE, |b| {
            name(b, "H");
            qubit(b, "0");
        });
    });
    assert_eq!(
        instructions,
        vec![Instruction::Gate(Gate::new("H", vec![], vec![QubitRef::Fixed(0)]))]
    );
}

#[test]
fn parameterized_gate() {
    let instructions = lower(|b| {
        node(b, GATE, |b| {
            name(b, "RX");
            b.token(L_PAREN, "(");
            pi(b, false);
            b.token(R_PAREN, ")");
            qubit(b, "2");
        });
    });
    assert_eq!(
        instructions,
        vec![Instruction::Gate(Gate::new(
            "RX",
            vec![Expression::Number(Number::Real(std::f64::consts::PI))],
            vec![QubitRef::Fixed(2)],
        ))]
    );
}

#[test]
fn forked_gate_splits_parameter_groups() {
    let instructions = lower(|b| {
        node(b, GATE, |b| {
            b.token(FORKED_KW, "FORKED");
            name(b, "RX");
            b.token(L_PAREN, "(");
            float(b, "0.5");
            b.token(COMMA, ",");
            float(b, "1.5");
            b.token(R_PAREN, ")");
            qubit(b, "0");
            qubit(b, "1");
        });
    });
    let mut expected = Gate::new(
        "RX",
        vec![Expression::Number(Number::Real(0.5))],
        vec![QubitRef::Fixed(1)],
    );
    expected.forked(
        QubitRef::Fixed(0),
        vec![Expression::Number(Number::Real(1.5))],
    );
    assert_eq!(instructions, vec![Instruction::Gate(expected.clone())]);
    assert_eq!(expected.to_string(), "FORKED RX(0.5, 1.5) 0 1");
}

#[test]
fn modifier_order_is_preserved() {
    let dagger_controlled = lower(|b| {
        node(b, GATE, |b| {
            b.token(DAGGER_KW, "DAGGER");
            b.token(CONTROLLED_KW, "CONTROLLED");
            name(b, "X");
            qubit(b, "0");
            qubit(b, "1");
        });
    });
    let controlled_dagger = lower(|b| {
        node(b, GATE, |b| {
            b.token(CONTROLLED_KW, "CONTROLLED");
            b.token(DAGGER_KW, "DAGGER");
            name(b, "X");
            qubit(b, "0");
            qubit(b, "1");
        });
    });

    let modifiers = |instructions: &[Instruction]| match &instructions[0] {
        Instruction::Gate(gate) => (gate.modifiers.clone(), gate.qubits.clone()),
        other => panic!("expected a gate, got {other:?}"),
    };

    let (first, first_qubits) = modifiers(&dagger_controlled);
    assert_eq!(first, vec![GateModifier::Dagger, GateModifier::Controlled]);
    assert_eq!(first_qubits, vec![QubitRef::Fixed(0), QubitRef::Fixed(1)]);

    let (second, second_qubits) = modifiers(&controlled_dagger);
    assert_eq!(second, vec![GateModifier::Controlled, GateModifier::Dagger]);
    assert_eq!(second_qubits, vec![QubitRef::Fixed(0), QubitRef::Fixed(1)]);
}

#[test]
fn standard_gate_arity_is_checked() {
    let err = lower_err(|b| {
        node(b, GATE, |b| {
            name(b, "RX");
            qubit(b, "0");
        });
    });
    assert!(matches!(
        err,
        QuilError::GateArity {
            expected_params: 1,
            found_params: 0,
            ..
        }
    ));
}

#[test]
fn unknown_gates_pass_unchecked() {
    let instructions = lower(|b| {
        node(b, GATE, |b| {
            name(b, "MYGATE");
            qubit(b, "0");
            qubit(b, "1");
            qubit(b, "2");
        });
    });
    match &instructions[0] {
        Instruction::Gate(gate) => assert_eq!(gate.qubits.len(), 3),
        other => panic!("expected a gate, got {other:?}"),
    }
}

#[test]
fn measure_with_and_without_target() {
    let instructions = lower(|b| {
        node(b, MEASURE, |b| {
            b.token(MEASURE_KW, "MEASURE");
            qubit(b, "0");
            memory(b, "ro", Some("1"));
        });
        node(b, MEASURE, |b| {
            b.token(MEASURE_KW, "MEASURE");
            qubit(b, "4");
        });
    });
    assert_eq!(
        instructions,
        vec![
            Instruction::Measurement(Measurement {
                qubit: QubitRef::Fixed(0),
                target: Some(Address::Memory(MemoryReference::new("ro".to_string(), 1))),
            }),
            Instruction::Measurement(Measurement {
                qubit: QubitRef::Fixed(4),
                target: None,
            }),
        ]
    );
}

#[test]
fn control_flow_instructions() {
    let instructions = lower(|b| {
        node(b, DEF_LABEL, |b| {
            b.token(LABEL_KW, "LABEL");
            label(b, "start");
        });
        node(b, JUMP_WHEN, |b| {
            b.token(JUMP_WHEN_KW, "JUMP-WHEN");
            label(b, "start");
            memory(b, "ro", None);
        });
        node(b, JUMP, |b| {
            b.token(JUMP_KW, "JUMP");
            label(b, "end");
        });
        node(b, HALT, |b| b.token(HALT_KW, "HALT"));
    });
    assert_eq!(
        instructions,
        vec![
            Instruction::JumpTarget("start".to_string()),
            Instruction::JumpWhen {
                target: "start".to_string(),
                condition: Address::Memory(MemoryReference::new("ro".to_string(), 0)),
            },
            Instruction::Jump("end".to_string()),
            Instruction::Halt,
        ]
    );
}

#[test]
fn wait_nop_reset() {
    let instructions = lower(|b| {
        node(b, WAIT, |b| b.token(WAIT_KW, "WAIT"));
        node(b, NOP, |b| b.token(NOP_KW, "NOP"));
        node(b, RESET_STATE, |b| b.token(RESET_KW, "RESET"));
        node(b, RESET_STATE, |b| {
            b.token(RESET_KW, "RESET");
            qubit(b, "2");
        });
    });
    assert_eq!(
        instructions,
        vec![
            Instruction::Wait,
            Instruction::Nop,
            Instruction::Reset(None),
            Instruction::Reset(Some(QubitRef::Fixed(2))),
        ]
    );
}

#[test]
fn classical_binary_operands() {
    let instructions = lower(|b| {
        node(b, LOGICAL_BINARY_OP, |b| {
            b.token(AND_KW, "AND");
            memory(b, "ro", None);
            b.token(INT, "1");
        });
        node(b, ARITHMETIC_BINARY_OP, |b| {
            b.token(ADD_KW, "ADD");
            memory(b, "theta", Some("0"));
            float(b, "0.5");
        });
        node(b, MOVE, |b| {
            b.token(MOVE_KW, "MOVE");
            memory(b, "dest", None);
            register(b, "3");
        });
    });
    assert_eq!(
        instructions,
        vec![
            Instruction::LogicalBinary {
                operator: LogicalOperator::And,
                target: Address::Memory(MemoryReference::new("ro".to_string(), 0)),
                operand: Operand::Immediate(Number::Int(1)),
            },
            Instruction::ArithmeticBinary {
                operator: ArithmeticOperator::Add,
                target: Address::Memory(MemoryReference::new("theta".to_string(), 0)),
                operand: Operand::Immediate(Number::Real(0.5)),
            },
            Instruction::Move {
                target: Address::Memory(MemoryReference::new("dest".to_string(), 0)),
                source: Operand::Address(Address::Register(3)),
            },
        ]
    );
    assert_eq!(instructions[2].to_string(), "MOVE dest[0] [3]");
}

#[test]
fn deprecated_or_rejects_immediates() {
    let err = lower_err(|b| {
        node(b, LOGICAL_BINARY_OP, |b| {
            b.token(OR_KW, "OR");
            memory(b, "ro", None);
            b.token(INT, "1");
        });
    });
    assert_eq!(err, QuilError::DisallowedImmediate("1".to_string()));

    // the memory-operand form is still accepted
    let instructions = lower(|b| {
        node(b, LOGICAL_BINARY_OP, |b| {
            b.token(OR_KW, "OR");
            memory(b, "ro", None);
            memory(b, "mask", None);
        });
    });
    assert!(matches!(
        instructions[0],
        Instruction::LogicalBinary {
            operator: LogicalOperator::Or,
            operand: Operand::Address(_),
            ..
        }
    ));
}

#[test]
fn load_store_exchange_convert() {
    let instructions = lower(|b| {
        node(b, LOAD, |b| {
            b.token(LOAD_KW, "LOAD");
            memory(b, "dest", None);
            b.token(IDENTIFIER, "source");
            memory(b, "idx", None);
        });
        node(b, STORE, |b| {
            b.token(STORE_KW, "STORE");
            b.token(IDENTIFIER, "dest");
            memory(b, "idx", None);
            int(b, "7");
        });
        node(b, EXCHANGE, |b| {
            b.token(EXCHANGE_KW, "EXCHANGE");
            memory(b, "a", None);
            memory(b, "b", None);
        });
        node(b, CONVERT, |b| {
            b.token(CONVERT_KW, "CONVERT");
            memory(b, "real_dest", None);
            memory(b, "int_src", None);
        });
    });
    assert_eq!(instructions.len(), 4);
    assert_eq!(instructions[0].to_string(), "LOAD dest[0] source idx[0]");
    assert_eq!(instructions[1].to_string(), "STORE dest idx[0] 7");
    assert_eq!(instructions[2].to_string(), "EXCHANGE a[0] b[0]");
    assert_eq!(instructions[3].to_string(), "CONVERT real_dest[0] int_src[0]");
}

#[test]
fn comparisons() {
    let instructions = lower(|b| {
        node(b, CLASSICAL_COMPARISON, |b| {
            b.token(EQ_KW, "EQ");
            memory(b, "flag", None);
            memory(b, "ro", Some("0"));
            int(b, "0");
        });
    });
    assert_eq!(
        instructions,
        vec![Instruction::Comparison {
            operator: ComparisonOperator::Equal,
            target: Address::Memory(MemoryReference::new("flag".to_string(), 0)),
            left: Address::Memory(MemoryReference::new("ro".to_string(), 0)),
            right: Operand::Immediate(Number::Int(0)),
        }]
    );
}

#[test]
fn unary_classical() {
    let instructions = lower(|b| {
        node(b, CLASSICAL_UNARY, |b| {
            b.token(NOT_KW, "NOT");
            memory(b, "ro", None);
        });
    });
    assert_eq!(instructions[0].to_string(), "NOT ro[0]");
}

#[test]
fn declare_defaults_to_length_one() {
    let instructions = lower(|b| {
        node(b, MEMORY_DESCRIPTOR, |b| {
            b.token(DECLARE_KW, "DECLARE");
            b.token(IDENTIFIER, "ro");
            b.token(IDENTIFIER, "BIT");
        });
    });
    assert_eq!(
        instructions,
        vec![Instruction::Declare(Declaration {
            name: "ro".to_string(),
            memory_type: "BIT".to_string(),
            size: 1,
            shared_region: None,
            offsets: vec![],
        })]
    );
}

#[test]
fn declare_with_sharing_and_offsets() {
    let instructions = lower(|b| {
        node(b, MEMORY_DESCRIPTOR, |b| {
            b.token(DECLARE_KW, "DECLARE");
            b.token(IDENTIFIER, "ro");
            b.token(IDENTIFIER, "BIT");
            b.token(L_BRACKET, "[");
            b.token(INT, "16");
            b.token(R_BRACKET, "]");
            b.token(SHARING_KW, "SHARING");
            b.token(IDENTIFIER, "foo");
            node(b, OFFSET_DESCRIPTOR, |b| {
                b.token(OFFSET_KW, "OFFSET");
                b.token(INT, "2");
                b.token(IDENTIFIER, "INTEGER");
            });
        });
    });
    assert_eq!(
        instructions,
        vec![Instruction::Declare(Declaration {
            name: "ro".to_string(),
            memory_type: "BIT".to_string(),
            size: 16,
            shared_region: Some("foo".to_string()),
            offsets: vec![(2, "INTEGER".to_string())],
        })]
    );
    assert_eq!(
        instructions[0].to_string(),
        "DECLARE ro BIT[16] SHARING foo OFFSET 2 INTEGER"
    );
}

#[test]
fn include_and_pragma() {
    let instructions = lower(|b| {
        node(b, INCLUDE, |b| {
            b.token(INCLUDE_KW, "INCLUDE");
            quoted(b, "other.quil");
        });
        node(b, PRAGMA, |b| {
            b.token(PRAGMA_KW, "PRAGMA");
            b.token(IDENTIFIER, "READOUT-POVM");
            pragma_arg(b, "0");
            quoted(b, "(0.9 0.2 0.1 0.8)");
        });
    });
    assert_eq!(
        instructions[0],
        Instruction::RawInstruction("INCLUDE \"other.quil\"".to_string())
    );
    assert_eq!(
        instructions[1],
        Instruction::Pragma(Pragma {
            command: "READOUT-POVM".to_string(),
            args: vec!["0".to_string()],
            data: Some("(0.9 0.2 0.1 0.8)".to_string()),
        })
    );
    assert_eq!(
        instructions[1].to_string(),
        "PRAGMA READOUT-POVM 0 \"(0.9 0.2 0.1 0.8)\""
    );
}

#[test]
fn defgate_with_parameters() {
    let instructions = lower(|b| {
        node(b, DEF_GATE, |b| {
            b.token(DEFGATE_KW, "DEFGATE");
            name(b, "FLIP");
            b.token(L_PAREN, "(");
            variable(b, "theta");
            b.token(R_PAREN, ")");
            b.token(COLON, ":");
            node(b, MATRIX, |b| {
                node(b, MATRIX_ROW, |b| {
                    int(b, "0");
                    int(b, "1");
                });
                node(b, MATRIX_ROW, |b| {
                    int(b, "1");
                    int(b, "0");
                });
            });
        });
    });
    match &instructions[0] {
        Instruction::DefGate(definition) => {
            assert_eq!(definition.name, "FLIP");
            assert_eq!(definition.parameters, vec!["theta".to_string()]);
            assert_eq!(definition.matrix.len(), 2);
        }
        other => panic!("expected a gate definition, got {other:?}"),
    }
}

#[test]
fn defgate_as_permutation() {
    let instructions = lower(|b| {
        node(b, DEF_GATE, |b| {
            b.token(DEFGATE_KW, "DEFGATE");
            name(b, "CCNOT2");
            b.token(AS_KW, "AS");
            b.token(PERMUTATION_KW, "PERMUTATION");
            b.token(COLON, ":");
            node(b, MATRIX, |b| {
                node(b, MATRIX_ROW, |b| {
                    for index in ["0", "1", "3", "2"] {
                        int(b, index);
                    }
                });
            });
        });
    });
    match &instructions[0] {
        Instruction::DefPermutationGate(definition) => {
            assert_eq!(definition.name, "CCNOT2");
            assert_eq!(definition.permutation.len(), 4);
        }
        other => panic!("expected a permutation gate, got {other:?}"),
    }
}

#[test]
fn permutation_requires_a_single_row() {
    let err = lower_err(|b| {
        node(b, DEF_GATE, |b| {
            b.token(DEFGATE_KW, "DEFGATE");
            name(b, "BAD");
            b.token(AS_KW, "AS");
            b.token(PERMUTATION_KW, "PERMUTATION");
            b.token(COLON, ":");
            node(b, MATRIX, |b| {
                node(b, MATRIX_ROW, |b| int(b, "0"));
                node(b, MATRIX_ROW, |b| int(b, "1"));
            });
        });
    });
    assert_eq!(err, QuilError::PermutationShape(2));
}

#[test]
fn syntax_errors_report_one_based_columns() {
    let mismatch = TokenMismatch {
        line: 3,
        column: 5,
        token: ")".to_string(),
        expected: vec![SyntaxKind::INT, SyntaxKind::PLUS],
    };
    let err = analyze(Err(mismatch)).unwrap_err();
    match &err {
        QuilError::Syntax {
            line,
            column,
            token,
            expected,
        } => {
            assert_eq!(*line, 3);
            assert_eq!(*column, 6);
            assert_eq!(token, ")");
            assert_eq!(expected, &vec!["INT".to_string(), "'+'".to_string()]);
        }
        other => panic!("expected a syntax error, got {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("line 3 and column 6"), "{message}");
    assert!(message.contains("[ INT, '+' ]"), "{message}");
}

#[test]
fn gate_qubits_must_be_concrete_outside_definitions() {
    let err = lower_err(|b| {
        node(b, GATE, |b| {
            name(b, "X");
            qubit(b, "q");
        });
    });
    assert_eq!(err, QuilError::InvalidQubit("q".to_string()));
}
