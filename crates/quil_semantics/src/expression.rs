// Copyright contributors to the quil-frontend project
// SPDX-License-Identifier: Apache-2.0

//! Arithmetic expressions over numbers, `%parameters` and memory references.
//!
//! Expressions fold eagerly: combining two concrete numbers yields a number,
//! and an operation is kept symbolic only when at least one operand mentions
//! a parameter or a memory reference. Numeric promotion follows the usual
//! tower int -> real -> complex, with true division always leaving int.

use num_complex::Complex64;

use crate::ast::{Address, MemoryReference};

/// A concrete numeric value. Integer literals stay integral until an
/// operation forces promotion.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    Int(i64),
    Real(f64),
    Complex(Complex64),
}

impl Number {
    pub fn as_complex(self) -> Complex64 {
        match self {
            Number::Int(n) => Complex64::new(n as f64, 0.0),
            Number::Real(r) => Complex64::new(r, 0.0),
            Number::Complex(c) => c,
        }
    }

    fn as_real(self) -> Option<f64> {
        match self {
            Number::Int(n) => Some(n as f64),
            Number::Real(r) => Some(r),
            Number::Complex(_) => None,
        }
    }

    pub fn neg(self) -> Number {
        match self {
            Number::Int(n) => Number::Int(-n),
            Number::Real(r) => Number::Real(-r),
            Number::Complex(c) => Number::Complex(-c),
        }
    }

    fn add(self, other: Number) -> Number {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Number::Int(a + b),
            (a, b) => match (a.as_real(), b.as_real()) {
                (Some(x), Some(y)) => Number::Real(x + y),
                _ => Number::Complex(a.as_complex() + b.as_complex()),
            },
        }
    }

    fn sub(self, other: Number) -> Number {
        self.add(other.neg())
    }

    fn mul(self, other: Number) -> Number {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => Number::Int(a * b),
            (a, b) => match (a.as_real(), b.as_real()) {
                (Some(x), Some(y)) => Number::Real(x * y),
                _ => Number::Complex(a.as_complex() * b.as_complex()),
            },
        }
    }

    // True division: int / int yields a real.
    fn div(self, other: Number) -> Number {
        match (self.as_real(), other.as_real()) {
            (Some(x), Some(y)) => Number::Real(x / y),
            _ => Number::Complex(self.as_complex() / other.as_complex()),
        }
    }

    fn pow(self, other: Number) -> Number {
        match (self, other) {
            (Number::Int(base), Number::Int(exp)) if exp >= 0 => {
                match u32::try_from(exp).ok().and_then(|e| base.checked_pow(e)) {
                    Some(n) => Number::Int(n),
                    None => Number::Real((base as f64).powf(exp as f64)),
                }
            }
            (a, b) => match (a.as_real(), b.as_real()) {
                // A negative base with a fractional exponent leaves the reals.
                (Some(x), Some(y)) if x < 0.0 && y.fract() != 0.0 => {
                    Number::Complex(a.as_complex().powc(b.as_complex()))
                }
                (Some(x), Some(y)) => Number::Real(x.powf(y)),
                _ => Number::Complex(a.as_complex().powc(b.as_complex())),
            },
        }
    }

    fn apply(self, operator: InfixOperator, other: Number) -> Number {
        match operator {
            InfixOperator::Plus => self.add(other),
            InfixOperator::Minus => self.sub(other),
            InfixOperator::Star => self.mul(other),
            InfixOperator::Slash => self.div(other),
            InfixOperator::Caret => self.pow(other),
        }
    }

    fn call(self, function: ExpressionFunction) -> Number {
        match self {
            Number::Complex(c) => Number::Complex(match function {
                ExpressionFunction::Sine => c.sin(),
                ExpressionFunction::Cosine => c.cos(),
                ExpressionFunction::SquareRoot => c.sqrt(),
                ExpressionFunction::Exponent => c.exp(),
                ExpressionFunction::Cis => c.cos() + Complex64::i() * c.sin(),
            }),
            _ => {
                // `as_real` cannot fail for Int/Real.
                let x = self.as_real().unwrap_or_default();
                match function {
                    ExpressionFunction::Sine => Number::Real(x.sin()),
                    ExpressionFunction::Cosine => Number::Real(x.cos()),
                    ExpressionFunction::SquareRoot if x < 0.0 => {
                        Number::Complex(Complex64::new(x, 0.0).sqrt())
                    }
                    ExpressionFunction::SquareRoot => Number::Real(x.sqrt()),
                    ExpressionFunction::Exponent => Number::Real(x.exp()),
                    ExpressionFunction::Cis => Number::Complex(Complex64::new(x.cos(), x.sin())),
                }
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InfixOperator {
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpressionFunction {
    Sine,
    Cosine,
    SquareRoot,
    Exponent,
    Cis,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Number(Number),
    /// A gate or waveform parameter, stored without the `%` sigil.
    Parameter(String),
    Address(Address),
    Infix {
        operator: InfixOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    FunctionCall {
        function: ExpressionFunction,
        argument: Box<Expression>,
    },
}

impl Expression {
    /// Combine two expressions, folding when both sides are concrete.
    pub fn infix(operator: InfixOperator, left: Expression, right: Expression) -> Expression {
        match (left, right) {
            (Expression::Number(a), Expression::Number(b)) => {
                Expression::Number(a.apply(operator, b))
            }
            (left, right) => Expression::Infix {
                operator,
                left: Box::new(left),
                right: Box::new(right),
            },
        }
    }

    /// Unary minus, expressed as multiplication by -1 when symbolic.
    pub fn negate(self) -> Expression {
        match self {
            Expression::Number(n) => Expression::Number(n.neg()),
            expression => Expression::Infix {
                operator: InfixOperator::Star,
                left: Box::new(Expression::Number(Number::Int(-1))),
                right: Box::new(expression),
            },
        }
    }

    pub fn apply_function(function: ExpressionFunction, argument: Expression) -> Expression {
        match argument {
            Expression::Number(n) => Expression::Number(n.call(function)),
            argument => Expression::FunctionCall {
                function,
                argument: Box::new(argument),
            },
        }
    }

    /// Every memory reference mentioned anywhere in this expression.
    pub fn contained_memory_references(&self) -> Vec<MemoryReference> {
        let mut references = Vec::new();
        self.collect_memory_references(&mut references);
        references
    }

    fn collect_memory_references(&self, references: &mut Vec<MemoryReference>) {
        match self {
            Expression::Address(Address::Memory(reference)) => references.push(reference.clone()),
            Expression::Infix { left, right, .. } => {
                left.collect_memory_references(references);
                right.collect_memory_references(references);
            }
            Expression::FunctionCall { argument, .. } => {
                argument.collect_memory_references(references);
            }
            _ => {}
        }
    }
}
