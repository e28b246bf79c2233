//! Bound node definitions.
//!
//! Every node carries the span of the syntax it was bound from. Nodes made
//! up by lowering reuse the span of the statement they replace.

use super::operators::{BoundBinaryOperator, BoundUnaryOperator};
use crate::symbol::{FunctionSymbol, VariableSymbol};
use crate::types::TypeSymbol;
use mica_core::text::TextSpan;
use mica_evaluator::{fold_binary, fold_unary, ConstantValue};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoundNodeKind {
    // Statements
    BlockStatement,
    VariableDeclaration,
    IfStatement,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    LabelStatement,
    GotoStatement,
    ConditionalGotoStatement,
    ReturnStatement,
    ExpressionStatement,
    DeferStatement,
    MatchStatement,
    PatternSectionStatement,
    NopStatement,

    // Expressions
    ErrorExpression,
    LiteralExpression,
    VariableExpression,
    AssignmentExpression,
    UnaryExpression,
    BinaryExpression,
    CallExpression,
    ConversionExpression,
    MatchExpression,
    PatternSectionExpression,
}

// ============================================================================
// Labels
// ============================================================================

static NEXT_LABEL_ID: AtomicU32 = AtomicU32::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(pub u32);

/// A jump target. Labels are equal only when they are the same label; the
/// name is for display.
#[derive(Debug, Clone)]
pub struct BoundLabel {
    id: LabelId,
    name: Arc<str>,
}

impl BoundLabel {
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            id: LabelId(NEXT_LABEL_ID.fetch_add(1, Ordering::Relaxed)),
            name: name.into(),
        }
    }

    pub fn id(&self) -> LabelId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl PartialEq for BoundLabel {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for BoundLabel {}

impl std::hash::Hash for BoundLabel {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for BoundLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum BoundStatement {
    Block(BoundBlockStatement),
    VariableDeclaration(BoundVariableDeclaration),
    If(BoundIfStatement),
    While(BoundWhileStatement),
    DoWhile(BoundDoWhileStatement),
    For(BoundForStatement),
    Label(BoundLabelStatement),
    Goto(BoundGotoStatement),
    ConditionalGoto(BoundConditionalGotoStatement),
    Return(BoundReturnStatement),
    Expression(BoundExpressionStatement),
    Defer(BoundDeferStatement),
    Match(BoundMatchStatement),
    Nop(BoundNopStatement),
}

impl BoundStatement {
    pub fn kind(&self) -> BoundNodeKind {
        match self {
            BoundStatement::Block(_) => BoundNodeKind::BlockStatement,
            BoundStatement::VariableDeclaration(_) => BoundNodeKind::VariableDeclaration,
            BoundStatement::If(_) => BoundNodeKind::IfStatement,
            BoundStatement::While(_) => BoundNodeKind::WhileStatement,
            BoundStatement::DoWhile(_) => BoundNodeKind::DoWhileStatement,
            BoundStatement::For(_) => BoundNodeKind::ForStatement,
            BoundStatement::Label(_) => BoundNodeKind::LabelStatement,
            BoundStatement::Goto(_) => BoundNodeKind::GotoStatement,
            BoundStatement::ConditionalGoto(_) => BoundNodeKind::ConditionalGotoStatement,
            BoundStatement::Return(_) => BoundNodeKind::ReturnStatement,
            BoundStatement::Expression(_) => BoundNodeKind::ExpressionStatement,
            BoundStatement::Defer(_) => BoundNodeKind::DeferStatement,
            BoundStatement::Match(_) => BoundNodeKind::MatchStatement,
            BoundStatement::Nop(_) => BoundNodeKind::NopStatement,
        }
    }

    pub fn span(&self) -> TextSpan {
        match self {
            BoundStatement::Block(n) => n.span,
            BoundStatement::VariableDeclaration(n) => n.span,
            BoundStatement::If(n) => n.span,
            BoundStatement::While(n) => n.span,
            BoundStatement::DoWhile(n) => n.span,
            BoundStatement::For(n) => n.span,
            BoundStatement::Label(n) => n.span,
            BoundStatement::Goto(n) => n.span,
            BoundStatement::ConditionalGoto(n) => n.span,
            BoundStatement::Return(n) => n.span,
            BoundStatement::Expression(n) => n.span,
            BoundStatement::Defer(n) => n.span,
            BoundStatement::Match(n) => n.span,
            BoundStatement::Nop(n) => n.span,
        }
    }

    pub fn label(span: TextSpan, label: BoundLabel) -> Self {
        BoundStatement::Label(BoundLabelStatement { span, label })
    }

    pub fn goto(span: TextSpan, label: BoundLabel) -> Self {
        BoundStatement::Goto(BoundGotoStatement { span, label })
    }

    pub fn conditional_goto(span: TextSpan, label: BoundLabel, condition: BoundExpression, jump_if_true: bool) -> Self {
        BoundStatement::ConditionalGoto(BoundConditionalGotoStatement {
            span,
            label,
            condition,
            jump_if_true,
        })
    }

    pub fn expression(expression: BoundExpression) -> Self {
        BoundStatement::Expression(BoundExpressionStatement {
            span: expression.span(),
            expression,
        })
    }

    pub fn block(span: TextSpan, statements: Vec<BoundStatement>) -> Self {
        BoundStatement::Block(BoundBlockStatement { span, statements })
    }

    /// What a statement that failed to bind turns into.
    pub fn error(span: TextSpan) -> Self {
        BoundStatement::expression(BoundExpression::Error(BoundErrorExpression { span }))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundBlockStatement {
    pub span: TextSpan,
    pub statements: Vec<BoundStatement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundVariableDeclaration {
    pub span: TextSpan,
    pub variable: Arc<VariableSymbol>,
    pub initializer: BoundExpression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundIfStatement {
    pub span: TextSpan,
    pub condition: BoundExpression,
    pub then_statement: Box<BoundStatement>,
    pub else_statement: Option<Box<BoundStatement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundWhileStatement {
    pub span: TextSpan,
    pub condition: BoundExpression,
    pub body: Box<BoundStatement>,
    pub break_label: BoundLabel,
    pub continue_label: BoundLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundDoWhileStatement {
    pub span: TextSpan,
    pub body: Box<BoundStatement>,
    pub condition: BoundExpression,
    pub break_label: BoundLabel,
    pub continue_label: BoundLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundForStatement {
    pub span: TextSpan,
    pub variable: Arc<VariableSymbol>,
    pub lower_bound: BoundExpression,
    pub upper_bound: BoundExpression,
    pub body: Box<BoundStatement>,
    pub break_label: BoundLabel,
    pub continue_label: BoundLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundLabelStatement {
    pub span: TextSpan,
    pub label: BoundLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundGotoStatement {
    pub span: TextSpan,
    pub label: BoundLabel,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundConditionalGotoStatement {
    pub span: TextSpan,
    pub label: BoundLabel,
    pub condition: BoundExpression,
    pub jump_if_true: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundReturnStatement {
    pub span: TextSpan,
    pub expression: Option<BoundExpression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundExpressionStatement {
    pub span: TextSpan,
    pub expression: BoundExpression,
}

/// Runs `expression` when the enclosing block ends normally.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundDeferStatement {
    pub span: TextSpan,
    pub expression: BoundExpression,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundMatchStatement {
    pub span: TextSpan,
    pub expression: BoundExpression,
    pub sections: Vec<BoundPatternSection<BoundStatement>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundNopStatement {
    pub span: TextSpan,
}

// ============================================================================
// Patterns
// ============================================================================

/// One `patterns => result` arm of a match.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundPatternSection<T> {
    pub span: TextSpan,
    pub patterns: Vec<BoundPattern>,
    pub result: T,
}

impl BoundPatternSection<BoundStatement> {
    pub fn kind(&self) -> BoundNodeKind {
        BoundNodeKind::PatternSectionStatement
    }
}

impl BoundPatternSection<BoundExpression> {
    pub fn kind(&self) -> BoundNodeKind {
        BoundNodeKind::PatternSectionExpression
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BoundPattern {
    /// Already converted to the type of the matched expression.
    Constant(BoundExpression),
    MatchAny(TextSpan),
}

impl BoundPattern {
    pub fn span(&self) -> TextSpan {
        match self {
            BoundPattern::Constant(e) => e.span(),
            BoundPattern::MatchAny(span) => *span,
        }
    }
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum BoundExpression {
    Error(BoundErrorExpression),
    Literal(BoundLiteralExpression),
    Variable(BoundVariableExpression),
    Assignment(BoundAssignmentExpression),
    Unary(BoundUnaryExpression),
    Binary(BoundBinaryExpression),
    Call(BoundCallExpression),
    Conversion(BoundConversionExpression),
    Match(BoundMatchExpression),
}

impl BoundExpression {
    pub fn kind(&self) -> BoundNodeKind {
        match self {
            BoundExpression::Error(_) => BoundNodeKind::ErrorExpression,
            BoundExpression::Literal(_) => BoundNodeKind::LiteralExpression,
            BoundExpression::Variable(_) => BoundNodeKind::VariableExpression,
            BoundExpression::Assignment(_) => BoundNodeKind::AssignmentExpression,
            BoundExpression::Unary(_) => BoundNodeKind::UnaryExpression,
            BoundExpression::Binary(_) => BoundNodeKind::BinaryExpression,
            BoundExpression::Call(_) => BoundNodeKind::CallExpression,
            BoundExpression::Conversion(_) => BoundNodeKind::ConversionExpression,
            BoundExpression::Match(_) => BoundNodeKind::MatchExpression,
        }
    }

    pub fn span(&self) -> TextSpan {
        match self {
            BoundExpression::Error(n) => n.span,
            BoundExpression::Literal(n) => n.span,
            BoundExpression::Variable(n) => n.span,
            BoundExpression::Assignment(n) => n.span,
            BoundExpression::Unary(n) => n.span,
            BoundExpression::Binary(n) => n.span,
            BoundExpression::Call(n) => n.span,
            BoundExpression::Conversion(n) => n.span,
            BoundExpression::Match(n) => n.span,
        }
    }

    pub fn ty(&self) -> TypeSymbol {
        match self {
            BoundExpression::Error(_) => TypeSymbol::Error,
            BoundExpression::Literal(n) => TypeSymbol::of_constant(&n.value),
            BoundExpression::Variable(n) => n.variable.ty,
            BoundExpression::Assignment(n) => n.variable.ty,
            BoundExpression::Unary(n) => n.op.ty,
            BoundExpression::Binary(n) => n.op.ty,
            BoundExpression::Call(n) => n.function.return_type,
            BoundExpression::Conversion(n) => n.ty,
            BoundExpression::Match(n) => n.ty,
        }
    }

    /// The compile-time value of this expression, if it has one.
    pub fn constant_value(&self) -> Option<&ConstantValue> {
        match self {
            BoundExpression::Literal(n) => Some(&n.value),
            BoundExpression::Variable(n) => n.variable.constant.as_ref(),
            BoundExpression::Unary(n) => n.constant.as_ref(),
            BoundExpression::Binary(n) => n.constant.as_ref(),
            _ => None,
        }
    }

    pub fn error(span: TextSpan) -> Self {
        BoundExpression::Error(BoundErrorExpression { span })
    }

    pub fn literal(span: TextSpan, value: impl Into<ConstantValue>) -> Self {
        BoundExpression::Literal(BoundLiteralExpression {
            span,
            value: value.into(),
        })
    }

    pub fn variable(span: TextSpan, variable: Arc<VariableSymbol>) -> Self {
        BoundExpression::Variable(BoundVariableExpression { span, variable })
    }

    pub fn assignment(span: TextSpan, variable: Arc<VariableSymbol>, expression: BoundExpression) -> Self {
        BoundExpression::Assignment(BoundAssignmentExpression {
            span,
            variable,
            expression: Box::new(expression),
        })
    }

    /// A unary expression, folded when the operand is constant. Folding
    /// failures leave the expression non-constant.
    pub fn unary(span: TextSpan, op: BoundUnaryOperator, operand: BoundExpression) -> Self {
        let constant = fold_unary(op.kind, operand.constant_value()).ok().flatten();
        BoundExpression::Unary(BoundUnaryExpression {
            span,
            op,
            operand: Box::new(operand),
            constant,
        })
    }

    /// A binary expression, folded when both operands are constant. Folding
    /// failures leave the expression non-constant.
    pub fn binary(span: TextSpan, left: BoundExpression, op: BoundBinaryOperator, right: BoundExpression) -> Self {
        let constant = fold_binary(left.constant_value(), op.kind, right.constant_value())
            .ok()
            .flatten();
        BoundExpression::Binary(BoundBinaryExpression {
            span,
            left: Box::new(left),
            op,
            right: Box::new(right),
            constant,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundErrorExpression {
    pub span: TextSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundLiteralExpression {
    pub span: TextSpan,
    pub value: ConstantValue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundVariableExpression {
    pub span: TextSpan,
    pub variable: Arc<VariableSymbol>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundAssignmentExpression {
    pub span: TextSpan,
    pub variable: Arc<VariableSymbol>,
    pub expression: Box<BoundExpression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundUnaryExpression {
    pub span: TextSpan,
    pub op: BoundUnaryOperator,
    pub operand: Box<BoundExpression>,
    pub constant: Option<ConstantValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundBinaryExpression {
    pub span: TextSpan,
    pub left: Box<BoundExpression>,
    pub op: BoundBinaryOperator,
    pub right: Box<BoundExpression>,
    pub constant: Option<ConstantValue>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundCallExpression {
    pub span: TextSpan,
    pub function: Arc<FunctionSymbol>,
    pub arguments: Vec<BoundExpression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundConversionExpression {
    pub span: TextSpan,
    pub ty: TypeSymbol,
    pub expression: Box<BoundExpression>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BoundMatchExpression {
    pub span: TextSpan,
    /// The type of the first section's result; later results are converted
    /// to it.
    pub ty: TypeSymbol,
    pub expression: Box<BoundExpression>,
    pub sections: Vec<BoundPatternSection<BoundExpression>>,
}
