//! Lowering: structured control flow to labels and gotos.
//!
//! After lowering, a body is one flat list of declarations, expression
//! statements, labels, gotos, conditional gotos and returns. The shapes
//! produced are:
//!
//! ```text
//! if c T else E    =>  goto else unless c; T; goto end; else:; E; end:
//! while c B        =>  continue:; goto break unless c; B; goto continue; break:
//! do B while c     =>  body:; B; continue:; goto body if c; break:
//! for i = l to u B =>  var i = l; let upperBound = u; while i <= upperBound { B; continue:; i = i + 1 }
//! ```
//!
//! `defer` statements that are direct children of a block move to the end
//! of that block, last one first. Match statements become a chain of
//! equality tests on a temporary; match expressions are left alone.
//!
//! Children are rewritten before a construct is replaced, and the
//! replacement is never rewritten again. Lowering already lowered code
//! returns it unchanged.

use mica_binder::bound::*;
use mica_binder::{FunctionSymbol, TypeSymbol, VariableKind, VariableSymbol};
use mica_core::text::TextSpan;
use mica_syntax::SyntaxKind;
use std::sync::Arc;
use tracing::{debug, trace};

/// Lower a block of global statements.
pub fn lower(block: BoundBlockStatement) -> BoundBlockStatement {
    lower_with(Lowerer::new(VariableKind::Global), block)
}

fn lower_with(mut lowerer: Lowerer, block: BoundBlockStatement) -> BoundBlockStatement {
    let span = block.span;
    let result = lowerer.rewrite_statement(BoundStatement::Block(block));
    flatten(span, result)
}

/// Lower a function body. A `void` function whose body can run off its end
/// gets an explicit `return` appended.
#[tracing::instrument(skip_all, fields(function = %function.name))]
pub fn lower_function(function: &FunctionSymbol, body: BoundBlockStatement) -> BoundBlockStatement {
    let mut result = lower_with(Lowerer::new(VariableKind::Local), body);
    if function.return_type == TypeSymbol::Void && can_fall_through(&result) {
        let span = TextSpan::new(result.span.end(), 0);
        result
            .statements
            .push(BoundStatement::Return(BoundReturnStatement { span, expression: None }));
    }
    debug!(statements = result.statements.len(), "function body lowered");
    result
}

fn can_fall_through(block: &BoundBlockStatement) -> bool {
    !matches!(
        block.statements.last(),
        Some(BoundStatement::Return(_)) | Some(BoundStatement::Goto(_))
    )
}

/// Collapse nested blocks into a single statement list.
fn flatten(span: TextSpan, statement: BoundStatement) -> BoundBlockStatement {
    let mut statements = Vec::new();
    let mut stack = vec![statement];
    while let Some(current) = stack.pop() {
        match current {
            BoundStatement::Block(block) => stack.extend(block.statements.into_iter().rev()),
            other => statements.push(other),
        }
    }
    BoundBlockStatement { span, statements }
}

/// The rewriter that does the lowering. Holds the counters for the labels
/// and temporaries it makes up.
#[derive(Debug)]
pub struct Lowerer {
    /// Kind of the temporaries it declares: `Global` for global code,
    /// `Local` inside a function body.
    storage: VariableKind,
    label_count: u32,
    temp_count: u32,
}

impl Lowerer {
    pub fn new(storage: VariableKind) -> Self {
        Self {
            storage,
            label_count: 0,
            temp_count: 0,
        }
    }

    fn generate_label(&mut self) -> BoundLabel {
        self.label_count += 1;
        BoundLabel::new(format!("Label{}", self.label_count))
    }

    fn generate_temp(&mut self, name: &str, initializer: &BoundExpression) -> Arc<VariableSymbol> {
        self.temp_count += 1;
        Arc::new(VariableSymbol::new(
            format!("${}{}", name, self.temp_count),
            self.storage,
            true,
            initializer.ty(),
            initializer.constant_value().cloned(),
        ))
    }

    fn lower_while(
        span: TextSpan,
        condition: BoundExpression,
        body: BoundStatement,
        break_label: BoundLabel,
        continue_label: BoundLabel,
    ) -> BoundStatement {
        BoundStatement::block(
            span,
            vec![
                BoundStatement::label(span, continue_label.clone()),
                BoundStatement::conditional_goto(span, break_label.clone(), condition, false),
                body,
                BoundStatement::goto(span, continue_label),
                BoundStatement::label(span, break_label),
            ],
        )
    }
}

/// `left <op> right`, or an error expression when the operand types have
/// no such operator (only possible for poisoned operands).
fn binary(span: TextSpan, left: BoundExpression, kind: SyntaxKind, right: BoundExpression) -> BoundExpression {
    match BoundBinaryOperator::bind(kind, left.ty(), right.ty()) {
        Some(op) => BoundExpression::binary(span, left, op, right),
        None => BoundExpression::error(span),
    }
}

fn declaration(span: TextSpan, variable: Arc<VariableSymbol>, initializer: BoundExpression) -> BoundStatement {
    BoundStatement::VariableDeclaration(BoundVariableDeclaration {
        span,
        variable,
        initializer,
    })
}

impl BoundTreeRewriter for Lowerer {
    fn rewrite_block_statement(&mut self, node: BoundBlockStatement) -> BoundStatement {
        let mut statements = Vec::with_capacity(node.statements.len());
        let mut deferred = Vec::new();
        for statement in node.statements {
            match statement {
                BoundStatement::Defer(defer) => {
                    let expression = self.rewrite_expression(defer.expression);
                    deferred.push(BoundStatement::Expression(BoundExpressionStatement {
                        span: defer.span,
                        expression,
                    }));
                }
                other => statements.push(self.rewrite_statement(other)),
            }
        }
        if !deferred.is_empty() {
            trace!(count = deferred.len(), "moved deferred statements to block end");
        }
        statements.extend(deferred.into_iter().rev());
        BoundStatement::block(node.span, statements)
    }

    fn rewrite_defer_statement(&mut self, node: BoundDeferStatement) -> BoundStatement {
        // Not inside a block: the implicit body ends right after it.
        let expression = self.rewrite_expression(node.expression);
        BoundStatement::Expression(BoundExpressionStatement {
            span: node.span,
            expression,
        })
    }

    fn rewrite_if_statement(&mut self, node: BoundIfStatement) -> BoundStatement {
        let span = node.span;
        let condition = self.rewrite_expression(node.condition);
        let then_statement = self.rewrite_statement(*node.then_statement);
        trace!(has_else = node.else_statement.is_some(), "lowering if");

        match node.else_statement {
            None => {
                let end_label = self.generate_label();
                BoundStatement::block(
                    span,
                    vec![
                        BoundStatement::conditional_goto(span, end_label.clone(), condition, false),
                        then_statement,
                        BoundStatement::label(span, end_label),
                    ],
                )
            }
            Some(else_statement) => {
                let else_statement = self.rewrite_statement(*else_statement);
                let else_label = self.generate_label();
                let end_label = self.generate_label();
                BoundStatement::block(
                    span,
                    vec![
                        BoundStatement::conditional_goto(span, else_label.clone(), condition, false),
                        then_statement,
                        BoundStatement::goto(span, end_label.clone()),
                        BoundStatement::label(span, else_label),
                        else_statement,
                        BoundStatement::label(span, end_label),
                    ],
                )
            }
        }
    }

    fn rewrite_while_statement(&mut self, node: BoundWhileStatement) -> BoundStatement {
        trace!(label = %node.continue_label, "lowering while");
        let condition = self.rewrite_expression(node.condition);
        let body = self.rewrite_statement(*node.body);
        Self::lower_while(node.span, condition, body, node.break_label, node.continue_label)
    }

    fn rewrite_do_while_statement(&mut self, node: BoundDoWhileStatement) -> BoundStatement {
        trace!(label = %node.continue_label, "lowering do-while");
        let span = node.span;
        let body = self.rewrite_statement(*node.body);
        let condition = self.rewrite_expression(node.condition);
        let body_label = self.generate_label();
        BoundStatement::block(
            span,
            vec![
                BoundStatement::label(span, body_label.clone()),
                body,
                BoundStatement::label(span, node.continue_label),
                BoundStatement::conditional_goto(span, body_label, condition, true),
                BoundStatement::label(span, node.break_label),
            ],
        )
    }

    fn rewrite_for_statement(&mut self, node: BoundForStatement) -> BoundStatement {
        trace!(variable = %node.variable.name, "lowering for");
        let span = node.span;
        let lower_bound = self.rewrite_expression(node.lower_bound);
        let upper_bound = self.rewrite_expression(node.upper_bound);
        let body = self.rewrite_statement(*node.body);

        let upper_bound_symbol = Arc::new(VariableSymbol::new(
            "upperBound",
            node.variable.kind,
            true,
            TypeSymbol::Int,
            upper_bound.constant_value().cloned(),
        ));

        let variable = BoundExpression::variable(span, node.variable.clone());
        let condition = binary(
            span,
            variable.clone(),
            SyntaxKind::LessOrEqualsToken,
            BoundExpression::variable(span, upper_bound_symbol.clone()),
        );
        let increment = BoundStatement::expression(BoundExpression::assignment(
            span,
            node.variable.clone(),
            binary(span, variable, SyntaxKind::PlusToken, BoundExpression::literal(span, 1)),
        ));

        // `continue` in the body has to reach the increment, so the while
        // loop gets a label of its own.
        let while_body = BoundStatement::block(
            span,
            vec![body, BoundStatement::label(span, node.continue_label), increment],
        );
        let while_continue = self.generate_label();
        let while_statement = Self::lower_while(span, condition, while_body, node.break_label, while_continue);

        BoundStatement::block(
            span,
            vec![
                declaration(span, node.variable, lower_bound),
                declaration(span, upper_bound_symbol, upper_bound),
                while_statement,
            ],
        )
    }

    fn rewrite_match_statement(&mut self, node: BoundMatchStatement) -> BoundStatement {
        trace!(sections = node.sections.len(), "lowering match");
        let span = node.span;
        let expression = self.rewrite_expression(node.expression);
        let temp = self.generate_temp("match", &expression);
        let end_label = self.generate_label();

        let mut tests = vec![declaration(span, temp.clone(), expression)];
        let mut bodies = Vec::new();
        let mut has_default = false;

        for section in node.sections {
            let section_label = self.generate_label();
            let patterns = self.rewrite_patterns(section.patterns);
            let result = self.rewrite_statement(section.result);

            for pattern in patterns {
                if has_default {
                    break;
                }
                match pattern {
                    BoundPattern::Constant(value) => {
                        let pattern_span = value.span();
                        let test = binary(
                            pattern_span,
                            BoundExpression::variable(pattern_span, temp.clone()),
                            SyntaxKind::EqualsEqualsToken,
                            value,
                        );
                        tests.push(BoundStatement::conditional_goto(pattern_span, section_label.clone(), test, true));
                    }
                    BoundPattern::MatchAny(pattern_span) => {
                        tests.push(BoundStatement::goto(pattern_span, section_label.clone()));
                        has_default = true;
                    }
                }
            }

            bodies.push(BoundStatement::label(section.span, section_label));
            bodies.push(result);
            bodies.push(BoundStatement::goto(section.span, end_label.clone()));
        }

        if !has_default {
            tests.push(BoundStatement::goto(span, end_label.clone()));
        }

        tests.extend(bodies);
        tests.push(BoundStatement::label(span, end_label));
        BoundStatement::block(span, tests)
    }
}
