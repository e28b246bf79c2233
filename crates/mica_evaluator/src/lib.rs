//! mica_evaluator: Compile-time constant evaluation.
//!
//! The binder calls [`fold_unary`] and [`fold_binary`] while it builds
//! operator expressions. A result is only produced when every operand is
//! already constant; there is no partial (short-circuit) folding.
//!
//! Integer arithmetic is 32-bit two's complement and wraps on overflow.

use std::fmt;
use thiserror::Error;

/// A value known at compile time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConstantValue {
    Bool(bool),
    Int(i32),
    String(String),
}

impl ConstantValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConstantValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i32> {
        match self {
            ConstantValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConstantValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ConstantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstantValue::Bool(b) => write!(f, "{}", b),
            ConstantValue::Int(i) => write!(f, "{}", i),
            ConstantValue::String(s) => f.write_str(s),
        }
    }
}

impl From<bool> for ConstantValue {
    fn from(value: bool) -> Self {
        ConstantValue::Bool(value)
    }
}

impl From<i32> for ConstantValue {
    fn from(value: i32) -> Self {
        ConstantValue::Int(value)
    }
}

impl From<&str> for ConstantValue {
    fn from(value: &str) -> Self {
        ConstantValue::String(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOperatorKind {
    Identity,
    Negation,
    LogicalNegation,
    OnesComplement,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOperatorKind {
    Addition,
    Subtraction,
    Multiplication,
    Division,
    BitwiseAnd,
    BitwiseOr,
    BitwiseXor,
    LogicalAnd,
    LogicalOr,
    Equals,
    NotEquals,
    Less,
    LessOrEquals,
    Greater,
    GreaterOrEquals,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    #[error("division by zero")]
    DivisionByZero,
    #[error("operator {operator:?} cannot be applied to {left} and {right}")]
    InvalidOperands {
        operator: BinaryOperatorKind,
        left: ConstantValue,
        right: ConstantValue,
    },
    #[error("operator {operator:?} cannot be applied to {operand}")]
    InvalidOperand {
        operator: UnaryOperatorKind,
        operand: ConstantValue,
    },
}

/// Fold a unary operator over a constant operand.
pub fn fold_unary(
    operator: UnaryOperatorKind,
    operand: Option<&ConstantValue>,
) -> Result<Option<ConstantValue>, EvalError> {
    let Some(operand) = operand else {
        return Ok(None);
    };
    let value = match (operator, operand) {
        (UnaryOperatorKind::Identity, ConstantValue::Int(i)) => ConstantValue::Int(*i),
        (UnaryOperatorKind::Negation, ConstantValue::Int(i)) => ConstantValue::Int(i.wrapping_neg()),
        (UnaryOperatorKind::LogicalNegation, ConstantValue::Bool(b)) => ConstantValue::Bool(!b),
        (UnaryOperatorKind::OnesComplement, ConstantValue::Int(i)) => ConstantValue::Int(!i),
        _ => {
            return Err(EvalError::InvalidOperand {
                operator,
                operand: operand.clone(),
            })
        }
    };
    Ok(Some(value))
}

/// Fold a binary operator over two constant operands.
pub fn fold_binary(
    left: Option<&ConstantValue>,
    operator: BinaryOperatorKind,
    right: Option<&ConstantValue>,
) -> Result<Option<ConstantValue>, EvalError> {
    let (Some(left), Some(right)) = (left, right) else {
        return Ok(None);
    };

    use BinaryOperatorKind::*;
    use ConstantValue::{Bool, Int, String as Str};

    let value = match (left, operator, right) {
        (Int(l), Addition, Int(r)) => Int(l.wrapping_add(*r)),
        (Str(l), Addition, Str(r)) => Str(format!("{}{}", l, r)),
        (Int(l), Subtraction, Int(r)) => Int(l.wrapping_sub(*r)),
        (Int(l), Multiplication, Int(r)) => Int(l.wrapping_mul(*r)),
        (Int(_), Division, Int(0)) => return Err(EvalError::DivisionByZero),
        (Int(l), Division, Int(r)) => Int(l.wrapping_div(*r)),
        (Int(l), BitwiseAnd, Int(r)) => Int(l & r),
        (Bool(l), BitwiseAnd, Bool(r)) => Bool(l & r),
        (Int(l), BitwiseOr, Int(r)) => Int(l | r),
        (Bool(l), BitwiseOr, Bool(r)) => Bool(l | r),
        (Int(l), BitwiseXor, Int(r)) => Int(l ^ r),
        (Bool(l), BitwiseXor, Bool(r)) => Bool(l ^ r),
        (Bool(l), LogicalAnd, Bool(r)) => Bool(*l && *r),
        (Bool(l), LogicalOr, Bool(r)) => Bool(*l || *r),
        (l, Equals, r) if same_kind(l, r) => Bool(l == r),
        (l, NotEquals, r) if same_kind(l, r) => Bool(l != r),
        (Int(l), Less, Int(r)) => Bool(l < r),
        (Int(l), LessOrEquals, Int(r)) => Bool(l <= r),
        (Int(l), Greater, Int(r)) => Bool(l > r),
        (Int(l), GreaterOrEquals, Int(r)) => Bool(l >= r),
        _ => {
            return Err(EvalError::InvalidOperands {
                operator,
                left: left.clone(),
                right: right.clone(),
            })
        }
    };
    Ok(Some(value))
}

fn same_kind(left: &ConstantValue, right: &ConstantValue) -> bool {
    std::mem::discriminant(left) == std::mem::discriminant(right)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binary(left: ConstantValue, op: BinaryOperatorKind, right: ConstantValue) -> Option<ConstantValue> {
        fold_binary(Some(&left), op, Some(&right)).unwrap()
    }

    #[test]
    fn test_fold_integer_addition() {
        assert_eq!(binary(1.into(), BinaryOperatorKind::Addition, 2.into()), Some(ConstantValue::Int(3)));
    }

    #[test]
    fn test_fold_string_concatenation() {
        assert_eq!(
            binary("a".into(), BinaryOperatorKind::Addition, "b".into()),
            Some(ConstantValue::String("ab".to_string()))
        );
    }

    #[test]
    fn test_fold_logical_and() {
        assert_eq!(binary(true.into(), BinaryOperatorKind::LogicalAnd, false.into()), Some(ConstantValue::Bool(false)));
        assert_eq!(binary(false.into(), BinaryOperatorKind::LogicalOr, true.into()), Some(ConstantValue::Bool(true)));
    }

    #[test]
    fn test_fold_comparisons() {
        assert_eq!(binary(3.into(), BinaryOperatorKind::LessOrEquals, 3.into()), Some(true.into()));
        assert_eq!(binary(3.into(), BinaryOperatorKind::Greater, 4.into()), Some(false.into()));
        assert_eq!(binary("x".into(), BinaryOperatorKind::Equals, "x".into()), Some(true.into()));
        assert_eq!(binary(true.into(), BinaryOperatorKind::NotEquals, false.into()), Some(true.into()));
    }

    #[test]
    fn test_non_constant_operand_yields_nothing() {
        let one = ConstantValue::Int(1);
        assert_eq!(fold_binary(Some(&one), BinaryOperatorKind::Addition, None), Ok(None));
        assert_eq!(fold_binary(None, BinaryOperatorKind::Addition, Some(&one)), Ok(None));
        assert_eq!(fold_unary(UnaryOperatorKind::Negation, None), Ok(None));
    }

    #[test]
    fn test_division_by_zero_is_an_error() {
        let err = fold_binary(Some(&7.into()), BinaryOperatorKind::Division, Some(&0.into())).unwrap_err();
        assert_eq!(err, EvalError::DivisionByZero);
        assert_eq!(err.to_string(), "division by zero");
    }

    #[test]
    fn test_arithmetic_wraps() {
        assert_eq!(binary(i32::MAX.into(), BinaryOperatorKind::Addition, 1.into()), Some(ConstantValue::Int(i32::MIN)));
        assert_eq!(binary(i32::MIN.into(), BinaryOperatorKind::Division, (-1).into()), Some(ConstantValue::Int(i32::MIN)));
    }

    #[test]
    fn test_fold_unary() {
        let five = ConstantValue::Int(5);
        assert_eq!(fold_unary(UnaryOperatorKind::Negation, Some(&five)), Ok(Some(ConstantValue::Int(-5))));
        assert_eq!(fold_unary(UnaryOperatorKind::OnesComplement, Some(&five)), Ok(Some(ConstantValue::Int(-6))));
        assert_eq!(fold_unary(UnaryOperatorKind::LogicalNegation, Some(&true.into())), Ok(Some(false.into())));
        assert!(fold_unary(UnaryOperatorKind::LogicalNegation, Some(&five)).is_err());
    }

    #[test]
    fn test_mismatched_operands_are_rejected() {
        let result = fold_binary(Some(&1.into()), BinaryOperatorKind::Addition, Some(&true.into()));
        assert!(matches!(result, Err(EvalError::InvalidOperands { .. })));
    }
}
