//! Generic bound tree rewriting.
//!
//! [`BoundTreeRewriter`] takes nodes by value and returns their
//! replacement. Every method has a default that rewrites the children and
//! rebuilds the node, so an implementation only overrides the node kinds it
//! cares about. Subtrees nobody overrides are moved through unchanged; no
//! node is ever copied by the walk itself. Operator expressions are folded
//! again after their operands are rewritten.

use super::tree::*;

pub trait BoundTreeRewriter {
    fn rewrite_statement(&mut self, node: BoundStatement) -> BoundStatement {
        match node {
            BoundStatement::Block(n) => self.rewrite_block_statement(n),
            BoundStatement::VariableDeclaration(n) => self.rewrite_variable_declaration(n),
            BoundStatement::If(n) => self.rewrite_if_statement(n),
            BoundStatement::While(n) => self.rewrite_while_statement(n),
            BoundStatement::DoWhile(n) => self.rewrite_do_while_statement(n),
            BoundStatement::For(n) => self.rewrite_for_statement(n),
            BoundStatement::Label(n) => self.rewrite_label_statement(n),
            BoundStatement::Goto(n) => self.rewrite_goto_statement(n),
            BoundStatement::ConditionalGoto(n) => self.rewrite_conditional_goto_statement(n),
            BoundStatement::Return(n) => self.rewrite_return_statement(n),
            BoundStatement::Expression(n) => self.rewrite_expression_statement(n),
            BoundStatement::Defer(n) => self.rewrite_defer_statement(n),
            BoundStatement::Match(n) => self.rewrite_match_statement(n),
            BoundStatement::Nop(n) => BoundStatement::Nop(n),
        }
    }

    fn rewrite_block_statement(&mut self, node: BoundBlockStatement) -> BoundStatement {
        let statements = node
            .statements
            .into_iter()
            .map(|s| self.rewrite_statement(s))
            .collect();
        BoundStatement::Block(BoundBlockStatement {
            span: node.span,
            statements,
        })
    }

    fn rewrite_variable_declaration(&mut self, node: BoundVariableDeclaration) -> BoundStatement {
        let initializer = self.rewrite_expression(node.initializer);
        BoundStatement::VariableDeclaration(BoundVariableDeclaration { initializer, ..node })
    }

    fn rewrite_if_statement(&mut self, node: BoundIfStatement) -> BoundStatement {
        let condition = self.rewrite_expression(node.condition);
        let then_statement = Box::new(self.rewrite_statement(*node.then_statement));
        let else_statement = node
            .else_statement
            .map(|s| Box::new(self.rewrite_statement(*s)));
        BoundStatement::If(BoundIfStatement {
            span: node.span,
            condition,
            then_statement,
            else_statement,
        })
    }

    fn rewrite_while_statement(&mut self, node: BoundWhileStatement) -> BoundStatement {
        let condition = self.rewrite_expression(node.condition);
        let body = Box::new(self.rewrite_statement(*node.body));
        BoundStatement::While(BoundWhileStatement {
            condition,
            body,
            ..node
        })
    }

    fn rewrite_do_while_statement(&mut self, node: BoundDoWhileStatement) -> BoundStatement {
        let body = Box::new(self.rewrite_statement(*node.body));
        let condition = self.rewrite_expression(node.condition);
        BoundStatement::DoWhile(BoundDoWhileStatement {
            body,
            condition,
            ..node
        })
    }

    fn rewrite_for_statement(&mut self, node: BoundForStatement) -> BoundStatement {
        let lower_bound = self.rewrite_expression(node.lower_bound);
        let upper_bound = self.rewrite_expression(node.upper_bound);
        let body = Box::new(self.rewrite_statement(*node.body));
        BoundStatement::For(BoundForStatement {
            lower_bound,
            upper_bound,
            body,
            ..node
        })
    }

    fn rewrite_label_statement(&mut self, node: BoundLabelStatement) -> BoundStatement {
        BoundStatement::Label(node)
    }

    fn rewrite_goto_statement(&mut self, node: BoundGotoStatement) -> BoundStatement {
        BoundStatement::Goto(node)
    }

    fn rewrite_conditional_goto_statement(&mut self, node: BoundConditionalGotoStatement) -> BoundStatement {
        let condition = self.rewrite_expression(node.condition);
        BoundStatement::ConditionalGoto(BoundConditionalGotoStatement { condition, ..node })
    }

    fn rewrite_return_statement(&mut self, node: BoundReturnStatement) -> BoundStatement {
        let expression = node.expression.map(|e| self.rewrite_expression(e));
        BoundStatement::Return(BoundReturnStatement {
            span: node.span,
            expression,
        })
    }

    fn rewrite_expression_statement(&mut self, node: BoundExpressionStatement) -> BoundStatement {
        let expression = self.rewrite_expression(node.expression);
        BoundStatement::Expression(BoundExpressionStatement {
            span: node.span,
            expression,
        })
    }

    fn rewrite_defer_statement(&mut self, node: BoundDeferStatement) -> BoundStatement {
        let expression = self.rewrite_expression(node.expression);
        BoundStatement::Defer(BoundDeferStatement {
            span: node.span,
            expression,
        })
    }

    fn rewrite_match_statement(&mut self, node: BoundMatchStatement) -> BoundStatement {
        let expression = self.rewrite_expression(node.expression);
        let sections = node
            .sections
            .into_iter()
            .map(|section| BoundPatternSection {
                span: section.span,
                patterns: self.rewrite_patterns(section.patterns),
                result: self.rewrite_statement(section.result),
            })
            .collect();
        BoundStatement::Match(BoundMatchStatement {
            span: node.span,
            expression,
            sections,
        })
    }

    fn rewrite_patterns(&mut self, patterns: Vec<BoundPattern>) -> Vec<BoundPattern> {
        patterns
            .into_iter()
            .map(|p| match p {
                BoundPattern::Constant(e) => BoundPattern::Constant(self.rewrite_expression(e)),
                BoundPattern::MatchAny(span) => BoundPattern::MatchAny(span),
            })
            .collect()
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn rewrite_expression(&mut self, node: BoundExpression) -> BoundExpression {
        match node {
            BoundExpression::Error(n) => BoundExpression::Error(n),
            BoundExpression::Literal(n) => BoundExpression::Literal(n),
            BoundExpression::Variable(n) => BoundExpression::Variable(n),
            BoundExpression::Assignment(n) => self.rewrite_assignment_expression(n),
            BoundExpression::Unary(n) => self.rewrite_unary_expression(n),
            BoundExpression::Binary(n) => self.rewrite_binary_expression(n),
            BoundExpression::Call(n) => self.rewrite_call_expression(n),
            BoundExpression::Conversion(n) => self.rewrite_conversion_expression(n),
            BoundExpression::Match(n) => self.rewrite_match_expression(n),
        }
    }

    fn rewrite_assignment_expression(&mut self, node: BoundAssignmentExpression) -> BoundExpression {
        let expression = Box::new(self.rewrite_expression(*node.expression));
        BoundExpression::Assignment(BoundAssignmentExpression { expression, ..node })
    }

    fn rewrite_unary_expression(&mut self, node: BoundUnaryExpression) -> BoundExpression {
        let operand = self.rewrite_expression(*node.operand);
        BoundExpression::unary(node.span, node.op, operand)
    }

    fn rewrite_binary_expression(&mut self, node: BoundBinaryExpression) -> BoundExpression {
        let left = self.rewrite_expression(*node.left);
        let right = self.rewrite_expression(*node.right);
        BoundExpression::binary(node.span, left, node.op, right)
    }

    fn rewrite_call_expression(&mut self, node: BoundCallExpression) -> BoundExpression {
        let arguments = node
            .arguments
            .into_iter()
            .map(|a| self.rewrite_expression(a))
            .collect();
        BoundExpression::Call(BoundCallExpression {
            span: node.span,
            function: node.function,
            arguments,
        })
    }

    fn rewrite_conversion_expression(&mut self, node: BoundConversionExpression) -> BoundExpression {
        let expression = Box::new(self.rewrite_expression(*node.expression));
        BoundExpression::Conversion(BoundConversionExpression { expression, ..node })
    }

    fn rewrite_match_expression(&mut self, node: BoundMatchExpression) -> BoundExpression {
        let expression = Box::new(self.rewrite_expression(*node.expression));
        let sections = node
            .sections
            .into_iter()
            .map(|section| BoundPatternSection {
                span: section.span,
                patterns: self.rewrite_patterns(section.patterns),
                result: self.rewrite_expression(section.result),
            })
            .collect();
        BoundExpression::Match(BoundMatchExpression {
            span: node.span,
            ty: node.ty,
            expression,
            sections,
        })
    }
}
