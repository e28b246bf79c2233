//! Bound tree to text output.
//!
//! The output is meant for humans and tests, not for reparsing. Labels and
//! gotos print the way lowering leaves them:
//!
//! ```text
//! goto continue1
//! body1:
//! print(i)
//! continue1:
//! goto body1 if i < 10
//! ```

use super::tree::*;
use mica_evaluator::ConstantValue;
use std::fmt;

pub struct BoundTreePrinter {
    output: String,
    indent_level: u32,
    indent_str: &'static str,
}

impl BoundTreePrinter {
    pub fn new() -> Self {
        Self {
            output: String::with_capacity(256),
            indent_level: 0,
            indent_str: "    ",
        }
    }

    /// Print a statement as one line per statement, nested bodies indented.
    pub fn print_statement(mut self, statement: &BoundStatement) -> String {
        self.write_statement(statement);
        self.output
    }

    pub fn print_expression(mut self, expression: &BoundExpression) -> String {
        self.write_expression(expression);
        self.output
    }

    fn write_statement(&mut self, statement: &BoundStatement) {
        match statement {
            BoundStatement::Block(n) => {
                self.write_line("{");
                self.indent_level += 1;
                for s in &n.statements {
                    self.write_statement(s);
                }
                self.indent_level -= 1;
                self.write_line("}");
            }
            BoundStatement::VariableDeclaration(n) => {
                self.write_indent();
                self.write(if n.variable.is_read_only { "let " } else { "var " });
                self.write(&n.variable.name);
                self.write(" = ");
                self.write_expression(&n.initializer);
                self.write_newline();
            }
            BoundStatement::If(n) => {
                self.write_indent();
                self.write("if ");
                self.write_expression(&n.condition);
                self.write_newline();
                self.write_nested(&n.then_statement);
                if let Some(else_statement) = &n.else_statement {
                    self.write_line("else");
                    self.write_nested(else_statement);
                }
            }
            BoundStatement::While(n) => {
                self.write_indent();
                self.write("while ");
                self.write_expression(&n.condition);
                self.write_newline();
                self.write_nested(&n.body);
            }
            BoundStatement::DoWhile(n) => {
                self.write_line("do");
                self.write_nested(&n.body);
                self.write_indent();
                self.write("while ");
                self.write_expression(&n.condition);
                self.write_newline();
            }
            BoundStatement::For(n) => {
                self.write_indent();
                self.write("for ");
                self.write(&n.variable.name);
                self.write(" = ");
                self.write_expression(&n.lower_bound);
                self.write(" to ");
                self.write_expression(&n.upper_bound);
                self.write_newline();
                self.write_nested(&n.body);
            }
            BoundStatement::Label(n) => {
                // Labels stick out one level so jump targets are easy to spot.
                let saved = self.indent_level;
                self.indent_level = saved.saturating_sub(1);
                self.write_indent();
                self.write(n.label.name());
                self.write(":");
                self.write_newline();
                self.indent_level = saved;
            }
            BoundStatement::Goto(n) => {
                self.write_indent();
                self.write("goto ");
                self.write(n.label.name());
                self.write_newline();
            }
            BoundStatement::ConditionalGoto(n) => {
                self.write_indent();
                self.write("goto ");
                self.write(n.label.name());
                self.write(if n.jump_if_true { " if " } else { " unless " });
                self.write_expression(&n.condition);
                self.write_newline();
            }
            BoundStatement::Return(n) => {
                self.write_indent();
                self.write("return");
                if let Some(expression) = &n.expression {
                    self.write(" ");
                    self.write_expression(expression);
                }
                self.write_newline();
            }
            BoundStatement::Expression(n) => {
                self.write_indent();
                self.write_expression(&n.expression);
                self.write_newline();
            }
            BoundStatement::Defer(n) => {
                self.write_indent();
                self.write("defer ");
                self.write_expression(&n.expression);
                self.write_newline();
            }
            BoundStatement::Match(n) => {
                self.write_indent();
                self.write("match ");
                self.write_expression(&n.expression);
                self.write(" {");
                self.write_newline();
                self.indent_level += 1;
                for section in &n.sections {
                    self.write_indent();
                    self.write_patterns(&section.patterns);
                    self.write(" =>");
                    self.write_newline();
                    self.write_nested(&section.result);
                }
                self.indent_level -= 1;
                self.write_line("}");
            }
            BoundStatement::Nop(_) => self.write_line("nop"),
        }
    }

    fn write_nested(&mut self, statement: &BoundStatement) {
        if matches!(statement, BoundStatement::Block(_)) {
            self.write_statement(statement);
        } else {
            self.indent_level += 1;
            self.write_statement(statement);
            self.indent_level -= 1;
        }
    }

    fn write_patterns(&mut self, patterns: &[BoundPattern]) {
        for (i, pattern) in patterns.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            match pattern {
                BoundPattern::Constant(e) => self.write_expression(e),
                BoundPattern::MatchAny(_) => self.write("_"),
            }
        }
    }

    fn write_expression(&mut self, expression: &BoundExpression) {
        match expression {
            BoundExpression::Error(_) => self.write("?"),
            BoundExpression::Literal(n) => self.write_constant(&n.value),
            BoundExpression::Variable(n) => self.write(&n.variable.name),
            BoundExpression::Assignment(n) => {
                self.write(&n.variable.name);
                self.write(" = ");
                self.write_expression(&n.expression);
            }
            BoundExpression::Unary(n) => {
                self.write(n.op.syntax_kind.text().unwrap_or("?"));
                self.write_operand(&n.operand);
            }
            BoundExpression::Binary(n) => {
                self.write_operand(&n.left);
                self.write(" ");
                self.write(n.op.syntax_kind.text().unwrap_or("?"));
                self.write(" ");
                self.write_operand(&n.right);
            }
            BoundExpression::Call(n) => {
                self.write(&n.function.name);
                self.write("(");
                for (i, argument) in n.arguments.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.write_expression(argument);
                }
                self.write(")");
            }
            BoundExpression::Conversion(n) => {
                self.write(n.ty.name());
                self.write("(");
                self.write_expression(&n.expression);
                self.write(")");
            }
            BoundExpression::Match(n) => {
                self.write("match ");
                self.write_expression(&n.expression);
                self.write(" { ");
                for (i, section) in n.sections.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.write_patterns(&section.patterns);
                    self.write(" => ");
                    self.write_expression(&section.result);
                }
                self.write(" }");
            }
        }
    }

    fn write_operand(&mut self, operand: &BoundExpression) {
        let parenthesize = matches!(
            operand,
            BoundExpression::Binary(_) | BoundExpression::Assignment(_) | BoundExpression::Match(_)
        );
        if parenthesize {
            self.write("(");
        }
        self.write_expression(operand);
        if parenthesize {
            self.write(")");
        }
    }

    fn write_constant(&mut self, value: &ConstantValue) {
        match value {
            ConstantValue::String(s) => {
                self.write("\"");
                self.write(&s.replace('"', "\"\""));
                self.write("\"");
            }
            other => self.write_owned(other.to_string()),
        }
    }

    fn write_line(&mut self, s: &str) {
        self.write_indent();
        self.write(s);
        self.write_newline();
    }

    fn write(&mut self, s: &str) {
        self.output.push_str(s);
    }

    fn write_owned(&mut self, s: String) {
        self.output.push_str(&s);
    }

    fn write_newline(&mut self) {
        self.output.push('\n');
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(self.indent_str);
        }
    }
}

impl Default for BoundTreePrinter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoundStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&BoundTreePrinter::new().print_statement(self))
    }
}

impl fmt::Display for BoundExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&BoundTreePrinter::new().print_expression(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bound::operators::BoundBinaryOperator;
    use crate::symbol::{VariableKind, VariableSymbol};
    use crate::types::TypeSymbol;
    use mica_core::text::TextSpan;
    use mica_syntax::SyntaxKind;
    use std::sync::Arc;

    #[test]
    fn test_print_lowered_loop_shape() {
        let span = TextSpan::new(0, 1);
        let i = Arc::new(VariableSymbol::new("i", VariableKind::Local, false, TypeSymbol::Int, None));
        let less = BoundBinaryOperator::bind(SyntaxKind::LessToken, TypeSymbol::Int, TypeSymbol::Int).unwrap();
        let body = BoundLabel::new("body1");
        let block = BoundStatement::block(
            span,
            vec![
                BoundStatement::label(span, body.clone()),
                BoundStatement::conditional_goto(
                    span,
                    body,
                    BoundExpression::binary(
                        span,
                        BoundExpression::variable(span, i),
                        less,
                        BoundExpression::literal(span, 10),
                    ),
                    true,
                ),
            ],
        );
        assert_eq!(block.to_string(), "{\nbody1:\n    goto body1 if i < 10\n}\n");
    }

    #[test]
    fn test_print_string_literal() {
        let e = BoundExpression::literal(TextSpan::new(0, 1), "say \"hi\"");
        assert_eq!(e.to_string(), "\"say \"\"hi\"\"\"");
    }
}
