//! Programmatic syntax tree construction.
//!
//! The factory hands out synthetic but distinct source spans: every token
//! advances an internal cursor by its text length, and composite nodes span
//! the union of their parts. Building a tree in source order therefore
//! yields spans in source order.

use crate::node::*;
use crate::syntax_kind::SyntaxKind;
use mica_core::intern::StringInterner;
use mica_core::text::TextSpan;
use std::cell::Cell;
use std::sync::Arc;

pub struct SyntaxFactory {
    interner: StringInterner,
    cursor: Cell<u32>,
}

impl SyntaxFactory {
    pub fn new(interner: StringInterner) -> Self {
        Self {
            interner,
            cursor: Cell::new(0),
        }
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    fn advance(&self, len: usize) -> TextSpan {
        let start = self.cursor.get();
        let len = len.max(1) as u32;
        self.cursor.set(start + len + 1);
        TextSpan::new(start, len)
    }

    // ========================================================================
    // Tokens
    // ========================================================================

    pub fn token(&self, kind: SyntaxKind) -> Token {
        let len = kind.text().map_or(1, str::len);
        Token::new(kind, self.advance(len))
    }

    pub fn identifier(&self, name: &str) -> Identifier {
        Identifier {
            data: NodeData::new(SyntaxKind::IdentifierToken, self.advance(name.len())),
            text: self.interner.intern(name),
            text_name: name.to_string(),
            is_missing: false,
        }
    }

    /// An identifier the parser inserted while recovering from an error.
    pub fn missing_identifier(&self) -> Identifier {
        Identifier {
            data: NodeData::new(SyntaxKind::IdentifierToken, TextSpan::empty(self.cursor.get())),
            text: self.interner.intern(""),
            text_name: String::new(),
            is_missing: true,
        }
    }

    pub fn type_clause(&self, type_name: &str) -> TypeClause {
        let colon = self.token(SyntaxKind::ColonToken);
        let identifier = self.identifier(type_name);
        TypeClause {
            data: NodeData::new(SyntaxKind::TypeClause, colon.span().union(&identifier.span())),
            identifier,
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    pub fn int(&self, value: i32) -> Expression {
        let span = self.advance(value.to_string().len());
        Expression::Literal(LiteralExpression {
            data: NodeData::new(SyntaxKind::LiteralExpression, span),
            value: LiteralValue::Int(value),
        })
    }

    pub fn bool(&self, value: bool) -> Expression {
        let span = self.advance(if value { 4 } else { 5 });
        Expression::Literal(LiteralExpression {
            data: NodeData::new(SyntaxKind::LiteralExpression, span),
            value: LiteralValue::Bool(value),
        })
    }

    pub fn string(&self, value: &str) -> Expression {
        let span = self.advance(value.len() + 2);
        Expression::Literal(LiteralExpression {
            data: NodeData::new(SyntaxKind::LiteralExpression, span),
            value: LiteralValue::String(value.to_string()),
        })
    }

    pub fn name(&self, name: &str) -> Expression {
        let identifier = self.identifier(name);
        Expression::Name(NameExpression {
            data: NodeData::new(SyntaxKind::NameExpression, identifier.span()),
            identifier,
        })
    }

    pub fn assign(&self, name: &str, expression: Expression) -> Expression {
        let identifier = self.identifier(name);
        let span = identifier.span().union(&expression.span());
        Expression::Assignment(AssignmentExpression {
            data: NodeData::new(SyntaxKind::AssignmentExpression, span),
            identifier,
            expression: Box::new(expression),
        })
    }

    pub fn unary(&self, operator: SyntaxKind, operand: Expression) -> Expression {
        let operator = self.token(operator);
        let span = operator.span().union(&operand.span());
        Expression::Unary(UnaryExpression {
            data: NodeData::new(SyntaxKind::UnaryExpression, span),
            operator,
            operand: Box::new(operand),
        })
    }

    pub fn binary(&self, left: Expression, operator: SyntaxKind, right: Expression) -> Expression {
        let operator = self.token(operator);
        let span = left.span().union(&right.span()).union(&operator.span());
        Expression::Binary(BinaryExpression {
            data: NodeData::new(SyntaxKind::BinaryExpression, span),
            left: Box::new(left),
            operator,
            right: Box::new(right),
        })
    }

    pub fn paren(&self, expression: Expression) -> Expression {
        Expression::Parenthesized(ParenthesizedExpression {
            data: NodeData::new(SyntaxKind::ParenthesizedExpression, expression.span()),
            expression: Box::new(expression),
        })
    }

    pub fn call(&self, name: &str, arguments: Vec<Expression>) -> Expression {
        let identifier = self.identifier(name);
        let close_parenthesis = self.token(SyntaxKind::CloseParenthesisToken);
        let span = arguments
            .iter()
            .fold(identifier.span().union(&close_parenthesis.span()), |acc, a| acc.union(&a.span()));
        Expression::Call(CallExpression {
            data: NodeData::new(SyntaxKind::CallExpression, span),
            identifier,
            arguments,
            close_parenthesis,
        })
    }

    pub fn match_expression(
        &self,
        expression: Expression,
        sections: Vec<PatternSection<Expression>>,
    ) -> Expression {
        let keyword = self.token(SyntaxKind::MatchKeyword);
        let span = sections
            .iter()
            .fold(keyword.span().union(&expression.span()), |acc, s| acc.union(&s.data.span));
        Expression::Match(MatchExpression {
            data: NodeData::new(SyntaxKind::MatchExpression, span),
            expression: Box::new(expression),
            sections,
        })
    }

    // ========================================================================
    // Patterns
    // ========================================================================

    pub fn constant_pattern(&self, expression: Expression) -> Pattern {
        Pattern::Constant(ConstantPattern {
            data: NodeData::new(SyntaxKind::ConstantPattern, expression.span()),
            expression,
        })
    }

    pub fn wildcard(&self) -> Pattern {
        Pattern::MatchAny(self.token(SyntaxKind::UnderscoreToken))
    }

    pub fn expression_section(&self, patterns: Vec<Pattern>, result: Expression) -> PatternSection<Expression> {
        let span = patterns
            .iter()
            .fold(result.span(), |acc, p| acc.union(&p.span()));
        PatternSection {
            data: NodeData::new(SyntaxKind::PatternSection, span),
            patterns,
            result,
        }
    }

    pub fn statement_section(&self, patterns: Vec<Pattern>, result: Statement) -> PatternSection<Statement> {
        let span = patterns
            .iter()
            .fold(result.span(), |acc, p| acc.union(&p.span()));
        PatternSection {
            data: NodeData::new(SyntaxKind::PatternSection, span),
            patterns,
            result,
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    pub fn block(&self, statements: Vec<Statement>) -> BlockStatement {
        let open = self.token(SyntaxKind::OpenBraceToken);
        let close = self.token(SyntaxKind::CloseBraceToken);
        let span = statements
            .iter()
            .fold(open.span().union(&close.span()), |acc, s| acc.union(&s.span()));
        BlockStatement {
            data: NodeData::new(SyntaxKind::BlockStatement, span),
            statements,
        }
    }

    pub fn block_statement(&self, statements: Vec<Statement>) -> Statement {
        Statement::Block(self.block(statements))
    }

    /// `var name = initializer`
    pub fn var(&self, name: &str, initializer: Expression) -> Statement {
        self.variable(SyntaxKind::VarKeyword, name, None, initializer)
    }

    /// `let name = initializer`
    pub fn let_(&self, name: &str, initializer: Expression) -> Statement {
        self.variable(SyntaxKind::LetKeyword, name, None, initializer)
    }

    pub fn variable(
        &self,
        keyword: SyntaxKind,
        name: &str,
        type_name: Option<&str>,
        initializer: Expression,
    ) -> Statement {
        let keyword = self.token(keyword);
        let identifier = self.identifier(name);
        let type_clause = type_name.map(|t| self.type_clause(t));
        let span = keyword.span().union(&initializer.span());
        Statement::VariableDeclaration(VariableDeclaration {
            data: NodeData::new(SyntaxKind::VariableDeclaration, span),
            keyword,
            identifier,
            type_clause,
            initializer,
        })
    }

    pub fn if_(&self, condition: Expression, then_statement: Statement, else_statement: Option<Statement>) -> Statement {
        let keyword = self.token(SyntaxKind::IfKeyword);
        let mut span = keyword.span().union(&condition.span()).union(&then_statement.span());
        let else_clause = else_statement.map(|statement| {
            let else_keyword = self.token(SyntaxKind::ElseKeyword);
            let clause_span = else_keyword.span().union(&statement.span());
            span = span.union(&clause_span);
            ElseClause {
                data: NodeData::new(SyntaxKind::ElseClause, clause_span),
                statement: Box::new(statement),
            }
        });
        Statement::If(IfStatement {
            data: NodeData::new(SyntaxKind::IfStatement, span),
            condition,
            then_statement: Box::new(then_statement),
            else_clause,
        })
    }

    pub fn while_(&self, condition: Expression, body: Statement) -> Statement {
        let keyword = self.token(SyntaxKind::WhileKeyword);
        let span = keyword.span().union(&condition.span()).union(&body.span());
        Statement::While(WhileStatement {
            data: NodeData::new(SyntaxKind::WhileStatement, span),
            condition,
            body: Box::new(body),
        })
    }

    pub fn do_while(&self, body: Statement, condition: Expression) -> Statement {
        let keyword = self.token(SyntaxKind::DoKeyword);
        let span = keyword.span().union(&condition.span()).union(&body.span());
        Statement::DoWhile(DoWhileStatement {
            data: NodeData::new(SyntaxKind::DoWhileStatement, span),
            body: Box::new(body),
            condition,
        })
    }

    pub fn for_(&self, name: &str, lower_bound: Expression, upper_bound: Expression, body: Statement) -> Statement {
        let keyword = self.token(SyntaxKind::ForKeyword);
        let identifier = self.identifier(name);
        let span = keyword.span().union(&body.span()).union(&upper_bound.span());
        Statement::For(ForStatement {
            data: NodeData::new(SyntaxKind::ForStatement, span),
            identifier,
            lower_bound,
            upper_bound,
            body: Box::new(body),
        })
    }

    pub fn break_(&self) -> Statement {
        let keyword = self.token(SyntaxKind::BreakKeyword);
        Statement::Break(BreakStatement {
            data: NodeData::new(SyntaxKind::BreakStatement, keyword.span()),
            keyword,
        })
    }

    pub fn continue_(&self) -> Statement {
        let keyword = self.token(SyntaxKind::ContinueKeyword);
        Statement::Continue(ContinueStatement {
            data: NodeData::new(SyntaxKind::ContinueStatement, keyword.span()),
            keyword,
        })
    }

    pub fn return_(&self, expression: Option<Expression>) -> Statement {
        let keyword = self.token(SyntaxKind::ReturnKeyword);
        let span = expression
            .as_ref()
            .map_or(keyword.span(), |e| keyword.span().union(&e.span()));
        Statement::Return(ReturnStatement {
            data: NodeData::new(SyntaxKind::ReturnStatement, span),
            keyword,
            expression,
        })
    }

    pub fn expression_statement(&self, expression: Expression) -> Statement {
        Statement::Expression(ExpressionStatement {
            data: NodeData::new(SyntaxKind::ExpressionStatement, expression.span()),
            expression,
        })
    }

    pub fn defer(&self, expression: Expression) -> Statement {
        let keyword = self.token(SyntaxKind::DeferKeyword);
        let span = keyword.span().union(&expression.span());
        Statement::Defer(DeferStatement {
            data: NodeData::new(SyntaxKind::DeferStatement, span),
            keyword,
            expression,
        })
    }

    pub fn match_statement(&self, expression: Expression, sections: Vec<PatternSection<Statement>>) -> Statement {
        let keyword = self.token(SyntaxKind::MatchKeyword);
        let span = sections
            .iter()
            .fold(keyword.span().union(&expression.span()), |acc, s| acc.union(&s.data.span));
        Statement::Match(MatchStatement {
            data: NodeData::new(SyntaxKind::MatchStatement, span),
            expression,
            sections,
        })
    }

    // ========================================================================
    // Members
    // ========================================================================

    pub fn parameter(&self, name: &str, type_name: &str) -> Parameter {
        let identifier = self.identifier(name);
        let type_clause = self.type_clause(type_name);
        Parameter {
            data: NodeData::new(SyntaxKind::Parameter, identifier.span().union(&type_clause.data.span)),
            identifier,
            type_clause,
        }
    }

    pub fn function(
        &self,
        name: &str,
        parameters: Vec<Parameter>,
        return_type: Option<&str>,
        body: BlockStatement,
    ) -> Member {
        let keyword = self.token(SyntaxKind::FunctionKeyword);
        let identifier = self.identifier(name);
        let type_clause = return_type.map(|t| self.type_clause(t));
        let span = keyword.span().union(&body.data.span).union(&identifier.span());
        Member::FunctionDeclaration(Arc::new(FunctionDeclaration {
            data: NodeData::new(SyntaxKind::FunctionDeclaration, span),
            identifier,
            parameters,
            type_clause,
            body,
        }))
    }

    pub fn global(&self, statement: Statement) -> Member {
        Member::GlobalStatement(GlobalStatement {
            data: NodeData::new(SyntaxKind::GlobalStatement, statement.span()),
            statement,
        })
    }

    pub fn tree(&self, file_name: &str, members: Vec<Member>) -> SyntaxTree {
        let end = self.token(SyntaxKind::EndOfFileToken);
        SyntaxTree {
            file_name: Arc::from(file_name),
            root: CompilationUnit {
                data: NodeData::new(SyntaxKind::CompilationUnit, TextSpan::from_bounds(0, end.span().end())),
                members,
            },
        }
    }

    /// A tree made only of global statements.
    pub fn script(&self, file_name: &str, statements: Vec<Statement>) -> SyntaxTree {
        let members = statements.into_iter().map(|s| self.global(s)).collect();
        self.tree(file_name, members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spans_follow_construction_order() {
        let f = SyntaxFactory::new(StringInterner::new());
        let left = f.int(1);
        let right = f.int(2);
        assert!(left.span().end() <= right.span().start);
        let sum = f.binary(left, SyntaxKind::PlusToken, right);
        assert_eq!(sum.kind(), SyntaxKind::BinaryExpression);
        assert_eq!(sum.span().start, 0);
    }

    #[test]
    fn test_identifiers_share_interner() {
        let interner = StringInterner::new();
        let f = SyntaxFactory::new(interner.clone());
        let a = f.identifier("count");
        let b = f.identifier("count");
        assert_eq!(a.text, b.text);
        assert_ne!(a.span(), b.span());
        assert_eq!(interner.resolve(a.text), "count");
    }

    #[test]
    fn test_call_span_ends_at_close_parenthesis() {
        let f = SyntaxFactory::new(StringInterner::new());
        let call = f.call("print", vec![f.string("hi")]);
        match call {
            Expression::Call(c) => {
                assert_eq!(c.data.span.end(), c.close_parenthesis.span().end());
                assert_eq!(c.arguments.len(), 1);
            }
            other => panic!("expected call, got {:?}", other.kind()),
        }
    }
}
