//! Operator resolution tables.

use crate::types::TypeSymbol;
use mica_evaluator::{BinaryOperatorKind, UnaryOperatorKind};
use mica_syntax::SyntaxKind;

use crate::types::TypeSymbol as T;
use mica_evaluator::BinaryOperatorKind as B;
use mica_syntax::SyntaxKind as K;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundUnaryOperator {
    pub syntax_kind: SyntaxKind,
    pub kind: UnaryOperatorKind,
    pub operand_type: TypeSymbol,
    pub ty: TypeSymbol,
}

impl BoundUnaryOperator {
    const fn new(syntax_kind: SyntaxKind, kind: UnaryOperatorKind, operand_type: TypeSymbol) -> Self {
        Self {
            syntax_kind,
            kind,
            operand_type,
            ty: operand_type,
        }
    }

    pub fn bind(syntax_kind: SyntaxKind, operand_type: TypeSymbol) -> Option<Self> {
        UNARY_OPERATORS
            .iter()
            .find(|op| op.syntax_kind == syntax_kind && op.operand_type == operand_type)
            .copied()
    }
}

static UNARY_OPERATORS: [BoundUnaryOperator; 4] = [
    BoundUnaryOperator::new(SyntaxKind::BangToken, UnaryOperatorKind::LogicalNegation, TypeSymbol::Bool),
    BoundUnaryOperator::new(SyntaxKind::PlusToken, UnaryOperatorKind::Identity, TypeSymbol::Int),
    BoundUnaryOperator::new(SyntaxKind::MinusToken, UnaryOperatorKind::Negation, TypeSymbol::Int),
    BoundUnaryOperator::new(SyntaxKind::TildeToken, UnaryOperatorKind::OnesComplement, TypeSymbol::Int),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundBinaryOperator {
    pub syntax_kind: SyntaxKind,
    pub kind: BinaryOperatorKind,
    pub left_type: TypeSymbol,
    pub right_type: TypeSymbol,
    pub ty: TypeSymbol,
}

impl BoundBinaryOperator {
    const fn new(syntax_kind: SyntaxKind, kind: BinaryOperatorKind, operand_type: TypeSymbol, ty: TypeSymbol) -> Self {
        Self {
            syntax_kind,
            kind,
            left_type: operand_type,
            right_type: operand_type,
            ty,
        }
    }

    pub fn bind(syntax_kind: SyntaxKind, left_type: TypeSymbol, right_type: TypeSymbol) -> Option<Self> {
        BINARY_OPERATORS
            .iter()
            .find(|op| op.syntax_kind == syntax_kind && op.left_type == left_type && op.right_type == right_type)
            .copied()
    }
}

static BINARY_OPERATORS: [BoundBinaryOperator; 25] = [
    BoundBinaryOperator::new(K::PlusToken, B::Addition, T::Int, T::Int),
    BoundBinaryOperator::new(K::MinusToken, B::Subtraction, T::Int, T::Int),
    BoundBinaryOperator::new(K::StarToken, B::Multiplication, T::Int, T::Int),
    BoundBinaryOperator::new(K::SlashToken, B::Division, T::Int, T::Int),
    BoundBinaryOperator::new(K::AmpersandToken, B::BitwiseAnd, T::Int, T::Int),
    BoundBinaryOperator::new(K::PipeToken, B::BitwiseOr, T::Int, T::Int),
    BoundBinaryOperator::new(K::HatToken, B::BitwiseXor, T::Int, T::Int),
    BoundBinaryOperator::new(K::EqualsEqualsToken, B::Equals, T::Int, T::Bool),
    BoundBinaryOperator::new(K::BangEqualsToken, B::NotEquals, T::Int, T::Bool),
    BoundBinaryOperator::new(K::LessToken, B::Less, T::Int, T::Bool),
    BoundBinaryOperator::new(K::LessOrEqualsToken, B::LessOrEquals, T::Int, T::Bool),
    BoundBinaryOperator::new(K::GreaterToken, B::Greater, T::Int, T::Bool),
    BoundBinaryOperator::new(K::GreaterOrEqualsToken, B::GreaterOrEquals, T::Int, T::Bool),
    BoundBinaryOperator::new(K::AmpersandToken, B::BitwiseAnd, T::Bool, T::Bool),
    BoundBinaryOperator::new(K::AmpersandAmpersandToken, B::LogicalAnd, T::Bool, T::Bool),
    BoundBinaryOperator::new(K::PipeToken, B::BitwiseOr, T::Bool, T::Bool),
    BoundBinaryOperator::new(K::PipePipeToken, B::LogicalOr, T::Bool, T::Bool),
    BoundBinaryOperator::new(K::HatToken, B::BitwiseXor, T::Bool, T::Bool),
    BoundBinaryOperator::new(K::EqualsEqualsToken, B::Equals, T::Bool, T::Bool),
    BoundBinaryOperator::new(K::BangEqualsToken, B::NotEquals, T::Bool, T::Bool),
    BoundBinaryOperator::new(K::PlusToken, B::Addition, T::String, T::String),
    BoundBinaryOperator::new(K::EqualsEqualsToken, B::Equals, T::String, T::Bool),
    BoundBinaryOperator::new(K::BangEqualsToken, B::NotEquals, T::String, T::Bool),
    BoundBinaryOperator::new(K::EqualsEqualsToken, B::Equals, T::Any, T::Bool),
    BoundBinaryOperator::new(K::BangEqualsToken, B::NotEquals, T::Any, T::Bool),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unary_operators() {
        let op = BoundUnaryOperator::bind(SyntaxKind::BangToken, TypeSymbol::Bool).unwrap();
        assert_eq!(op.kind, UnaryOperatorKind::LogicalNegation);
        assert_eq!(op.ty, TypeSymbol::Bool);
        assert!(BoundUnaryOperator::bind(SyntaxKind::BangToken, TypeSymbol::Int).is_none());
        assert!(BoundUnaryOperator::bind(SyntaxKind::MinusToken, TypeSymbol::String).is_none());
    }

    #[test]
    fn test_comparison_yields_bool() {
        let op = BoundBinaryOperator::bind(SyntaxKind::LessOrEqualsToken, TypeSymbol::Int, TypeSymbol::Int).unwrap();
        assert_eq!(op.ty, TypeSymbol::Bool);
        assert_eq!(op.kind, BinaryOperatorKind::LessOrEquals);
    }

    #[test]
    fn test_string_concatenation() {
        let op = BoundBinaryOperator::bind(SyntaxKind::PlusToken, TypeSymbol::String, TypeSymbol::String).unwrap();
        assert_eq!(op.ty, TypeSymbol::String);
    }

    #[test]
    fn test_mixed_operands_are_undefined() {
        assert!(BoundBinaryOperator::bind(SyntaxKind::PlusToken, TypeSymbol::String, TypeSymbol::Int).is_none());
        assert!(BoundBinaryOperator::bind(SyntaxKind::AmpersandAmpersandToken, TypeSymbol::Int, TypeSymbol::Int).is_none());
        assert!(BoundBinaryOperator::bind(SyntaxKind::LessToken, TypeSymbol::Bool, TypeSymbol::Bool).is_none());
    }

    #[test]
    fn test_any_supports_only_equality() {
        assert!(BoundBinaryOperator::bind(SyntaxKind::EqualsEqualsToken, TypeSymbol::Any, TypeSymbol::Any).is_some());
        assert!(BoundBinaryOperator::bind(SyntaxKind::PlusToken, TypeSymbol::Any, TypeSymbol::Any).is_none());
    }
}
