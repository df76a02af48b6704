// Copyright contributors to the quil-frontend project
// SPDX-License-Identifier: Apache-2.0

//! Lowering and folding of expression trees.

mod common;

use common::*;
use quil_semantics::ast::{Address, MemoryReference};
use quil_semantics::expression::{Expression, InfixOperator, Number};
use quil_semantics::from_expr;
use quil_syntax::SyntaxKind::*;

#[test]
fn concrete_arithmetic_folds() {
    // 2+3*4, shaped the way precedence parses it
    let expr = single_node(|b| {
        node(b, ADD_SUB_EXPRESSION, |b| {
            int(b, "2");
            b.token(PLUS, "+");
            node(b, MUL_DIV_EXPRESSION, |b| {
                int(b, "3");
                b.token(TIMES, "*");
                int(b, "4");
            });
        });
    });
    assert_eq!(from_expr(&expr).unwrap(), Expression::Number(Number::Int(14)));
}

#[test]
fn negative_pi_over_two() {
    let expr = single_node(|b| {
        node(b, MUL_DIV_EXPRESSION, |b| {
            pi(b, true);
            b.token(DIVIDE, "/");
            int(b, "2");
        });
    });
    match from_expr(&expr).unwrap() {
        Expression::Number(Number::Real(value)) => {
            assert!((value + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
        }
        other => panic!("expected a real number, got {other:?}"),
    }
}

#[test]
fn integer_power_stays_integral() {
    let expr = single_node(|b| {
        node(b, POWER_EXPRESSION, |b| {
            int(b, "2");
            b.token(POWER, "^");
            int(b, "10");
        });
    });
    assert_eq!(
        from_expr(&expr).unwrap(),
        Expression::Number(Number::Int(1024))
    );
}

#[test]
fn cis_of_pi_over_four() {
    let expr = single_node(|b| {
        node(b, FUNCTION_EXPRESSION, |b| {
            b.token(CIS_KW, "CIS");
            b.token(L_PAREN, "(");
            node(b, MUL_DIV_EXPRESSION, |b| {
                pi(b, false);
                b.token(DIVIDE, "/");
                int(b, "4");
            });
            b.token(R_PAREN, ")");
        });
    });
    match from_expr(&expr).unwrap() {
        Expression::Number(Number::Complex(z)) => {
            let half_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
            assert!((z.re - half_sqrt2).abs() < 1e-12);
            assert!((z.im - half_sqrt2).abs() < 1e-12);
        }
        other => panic!("expected a complex number, got {other:?}"),
    }
}

#[test]
fn negated_parameter_becomes_multiplication() {
    let expr = single_node(|b| {
        node(b, SIGNED_EXPRESSION, |b| {
            b.token(MINUS, "-");
            variable(b, "theta");
        });
    });
    let lowered = from_expr(&expr).unwrap();
    assert_eq!(
        lowered,
        Expression::Infix {
            operator: InfixOperator::Star,
            left: Box::new(Expression::Number(Number::Int(-1))),
            right: Box::new(Expression::Parameter("theta".to_string())),
        }
    );
    assert_eq!(lowered.to_string(), "-1*%theta");
}

#[test]
fn parenthesized_expressions_unwrap() {
    let expr = single_node(|b| {
        node(b, PAREN_EXPRESSION, |b| {
            b.token(L_PAREN, "(");
            float(b, "0.25");
            b.token(R_PAREN, ")");
        });
    });
    assert_eq!(
        from_expr(&expr).unwrap(),
        Expression::Number(Number::Real(0.25))
    );
}

#[test]
fn memory_reference_operand() {
    let expr = single_node(|b| memory(b, "ro", Some("3")));
    assert_eq!(
        from_expr(&expr).unwrap(),
        Expression::Address(Address::Memory(MemoryReference::new("ro".to_string(), 3)))
    );
}

#[test]
fn symbolic_halves_stay_symbolic() {
    let expr = single_node(|b| {
        node(b, MUL_DIV_EXPRESSION, |b| {
            variable(b, "theta");
            b.token(DIVIDE, "/");
            int(b, "2");
        });
    });
    let lowered = from_expr(&expr).unwrap();
    assert!(matches!(lowered, Expression::Infix { .. }));
    assert_eq!(lowered.to_string(), "%theta/2");
}

#[test]
fn imaginary_literals_are_complex() {
    let expr = single_node(|b| {
        node(b, NUMBER, |b| {
            b.token(MINUS, "-");
            node(b, IMAGINARY, |b| {
                b.token(FLOAT, "2.0");
                b.token(I_KW, "i");
            });
        });
    });
    match from_expr(&expr).unwrap() {
        Expression::Number(Number::Complex(z)) => {
            assert_eq!(z.re, 0.0);
            assert_eq!(z.im, -2.0);
        }
        other => panic!("expected a complex number, got {other:?}"),
    }
}

#[test]
fn unexpected_node_is_a_malformed_expression() {
    let expr = single_node(|b| qubit(b, "7"));
    let err = from_expr(&expr).unwrap_err();
    assert_eq!(
        err,
        quil_semantics::QuilError::MalformedExpression("7".to_string())
    );
}
