//! Syntax node definitions.
//!
//! The tree is fully owned and immutable once built. Function declarations
//! are reference counted so a declared function symbol can keep its
//! declaration alive for the per-function binding pass.

use crate::syntax_kind::SyntaxKind;
use mica_core::intern::InternedString;
use mica_core::text::TextSpan;
use std::sync::Arc;

// ============================================================================
// Core Node Wrapper
// ============================================================================

/// Common data shared by all syntax nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeData {
    pub kind: SyntaxKind,
    pub span: TextSpan,
}

impl NodeData {
    pub fn new(kind: SyntaxKind, span: TextSpan) -> Self {
        Self { kind, span }
    }
}

/// A token with its kind and location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub data: NodeData,
}

impl Token {
    pub fn new(kind: SyntaxKind, span: TextSpan) -> Self {
        Self {
            data: NodeData::new(kind, span),
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data.kind
    }

    pub fn span(&self) -> TextSpan {
        self.data.span
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub data: NodeData,
    pub text: InternedString,
    pub text_name: String,
    /// Set when the parser synthesized the identifier during error recovery.
    /// Missing identifiers are never declared and never reported twice.
    pub is_missing: bool,
}

impl Identifier {
    pub fn span(&self) -> TextSpan {
        self.data.span
    }
}

// ============================================================================
// Tree and members
// ============================================================================

#[derive(Debug, Clone)]
pub struct SyntaxTree {
    pub file_name: Arc<str>,
    pub root: CompilationUnit,
}

#[derive(Debug, Clone)]
pub struct CompilationUnit {
    pub data: NodeData,
    pub members: Vec<Member>,
}

#[derive(Debug, Clone)]
pub enum Member {
    FunctionDeclaration(Arc<FunctionDeclaration>),
    GlobalStatement(GlobalStatement),
}

#[derive(Debug, Clone)]
pub struct GlobalStatement {
    pub data: NodeData,
    pub statement: Statement,
}

#[derive(Debug, Clone)]
pub struct FunctionDeclaration {
    pub data: NodeData,
    pub identifier: Identifier,
    pub parameters: Vec<Parameter>,
    pub type_clause: Option<TypeClause>,
    pub body: BlockStatement,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub data: NodeData,
    pub identifier: Identifier,
    pub type_clause: TypeClause,
}

/// `: <type name>`
#[derive(Debug, Clone)]
pub struct TypeClause {
    pub data: NodeData,
    pub identifier: Identifier,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone)]
pub enum Statement {
    Block(BlockStatement),
    VariableDeclaration(VariableDeclaration),
    If(IfStatement),
    While(WhileStatement),
    DoWhile(DoWhileStatement),
    For(ForStatement),
    Break(BreakStatement),
    Continue(ContinueStatement),
    Return(ReturnStatement),
    Expression(ExpressionStatement),
    Defer(DeferStatement),
    Match(MatchStatement),
}

impl Statement {
    pub fn data(&self) -> &NodeData {
        match self {
            Statement::Block(n) => &n.data,
            Statement::VariableDeclaration(n) => &n.data,
            Statement::If(n) => &n.data,
            Statement::While(n) => &n.data,
            Statement::DoWhile(n) => &n.data,
            Statement::For(n) => &n.data,
            Statement::Break(n) => &n.data,
            Statement::Continue(n) => &n.data,
            Statement::Return(n) => &n.data,
            Statement::Expression(n) => &n.data,
            Statement::Defer(n) => &n.data,
            Statement::Match(n) => &n.data,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    pub fn span(&self) -> TextSpan {
        self.data().span
    }
}

#[derive(Debug, Clone)]
pub struct BlockStatement {
    pub data: NodeData,
    pub statements: Vec<Statement>,
}

/// `var x = e`, `let x: int = e`
#[derive(Debug, Clone)]
pub struct VariableDeclaration {
    pub data: NodeData,
    /// Either `LetKeyword` (read-only) or `VarKeyword`.
    pub keyword: Token,
    pub identifier: Identifier,
    pub type_clause: Option<TypeClause>,
    pub initializer: Expression,
}

#[derive(Debug, Clone)]
pub struct IfStatement {
    pub data: NodeData,
    pub condition: Expression,
    pub then_statement: Box<Statement>,
    pub else_clause: Option<ElseClause>,
}

#[derive(Debug, Clone)]
pub struct ElseClause {
    pub data: NodeData,
    pub statement: Box<Statement>,
}

#[derive(Debug, Clone)]
pub struct WhileStatement {
    pub data: NodeData,
    pub condition: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone)]
pub struct DoWhileStatement {
    pub data: NodeData,
    pub body: Box<Statement>,
    pub condition: Expression,
}

/// `for i = lower to upper body`
#[derive(Debug, Clone)]
pub struct ForStatement {
    pub data: NodeData,
    pub identifier: Identifier,
    pub lower_bound: Expression,
    pub upper_bound: Expression,
    pub body: Box<Statement>,
}

#[derive(Debug, Clone)]
pub struct BreakStatement {
    pub data: NodeData,
    pub keyword: Token,
}

#[derive(Debug, Clone)]
pub struct ContinueStatement {
    pub data: NodeData,
    pub keyword: Token,
}

#[derive(Debug, Clone)]
pub struct ReturnStatement {
    pub data: NodeData,
    pub keyword: Token,
    pub expression: Option<Expression>,
}

#[derive(Debug, Clone)]
pub struct ExpressionStatement {
    pub data: NodeData,
    pub expression: Expression,
}

/// `defer e` - runs `e` when the enclosing block ends.
#[derive(Debug, Clone)]
pub struct DeferStatement {
    pub data: NodeData,
    pub keyword: Token,
    pub expression: Expression,
}

#[derive(Debug, Clone)]
pub struct MatchStatement {
    pub data: NodeData,
    pub expression: Expression,
    pub sections: Vec<PatternSection<Statement>>,
}

// ============================================================================
// Patterns
// ============================================================================

/// `p1, p2 => result`. The result is a statement inside a match statement
/// and an expression inside a match expression.
#[derive(Debug, Clone)]
pub struct PatternSection<T> {
    pub data: NodeData,
    pub patterns: Vec<Pattern>,
    pub result: T,
}

#[derive(Debug, Clone)]
pub enum Pattern {
    Constant(ConstantPattern),
    /// `_`
    MatchAny(Token),
}

impl Pattern {
    pub fn span(&self) -> TextSpan {
        match self {
            Pattern::Constant(p) => p.data.span,
            Pattern::MatchAny(t) => t.span(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConstantPattern {
    pub data: NodeData,
    pub expression: Expression,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone)]
pub enum Expression {
    Literal(LiteralExpression),
    Name(NameExpression),
    Assignment(AssignmentExpression),
    Unary(UnaryExpression),
    Binary(BinaryExpression),
    Parenthesized(ParenthesizedExpression),
    Call(CallExpression),
    Match(MatchExpression),
}

impl Expression {
    pub fn data(&self) -> &NodeData {
        match self {
            Expression::Literal(n) => &n.data,
            Expression::Name(n) => &n.data,
            Expression::Assignment(n) => &n.data,
            Expression::Unary(n) => &n.data,
            Expression::Binary(n) => &n.data,
            Expression::Parenthesized(n) => &n.data,
            Expression::Call(n) => &n.data,
            Expression::Match(n) => &n.data,
        }
    }

    pub fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    pub fn span(&self) -> TextSpan {
        self.data().span
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiteralValue {
    Int(i32),
    Bool(bool),
    String(String),
}

#[derive(Debug, Clone)]
pub struct LiteralExpression {
    pub data: NodeData,
    pub value: LiteralValue,
}

#[derive(Debug, Clone)]
pub struct NameExpression {
    pub data: NodeData,
    pub identifier: Identifier,
}

#[derive(Debug, Clone)]
pub struct AssignmentExpression {
    pub data: NodeData,
    pub identifier: Identifier,
    pub expression: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct UnaryExpression {
    pub data: NodeData,
    pub operator: Token,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct BinaryExpression {
    pub data: NodeData,
    pub left: Box<Expression>,
    pub operator: Token,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone)]
pub struct ParenthesizedExpression {
    pub data: NodeData,
    pub expression: Box<Expression>,
}

/// `name(arg, ...)`. A call whose name is a type with one argument is an
/// explicit conversion.
#[derive(Debug, Clone)]
pub struct CallExpression {
    pub data: NodeData,
    pub identifier: Identifier,
    pub arguments: Vec<Expression>,
    pub close_parenthesis: Token,
}

#[derive(Debug, Clone)]
pub struct MatchExpression {
    pub data: NodeData,
    pub expression: Box<Expression>,
    pub sections: Vec<PatternSection<Expression>>,
}
