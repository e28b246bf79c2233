//! The binder turns syntax into the bound tree.
//!
//! A binder is created either for the top level of a submission or for the
//! body of one declared function. Its scope chain always starts at a root
//! scope holding the built-in functions, followed by one scope per earlier
//! submission (oldest first), followed by the scope it binds into.
//!
//! Errors never stop binding. Whatever could not be bound becomes an
//! expression of type [`TypeSymbol::Error`], and anything consuming such an
//! expression stays silent so one mistake yields one diagnostic.

use crate::bound::*;
use crate::builtins::builtin_functions;
use crate::conversion::classify;
use crate::global_scope::BoundGlobalScope;
use crate::scope::{ScopeArena, ScopeId, ScopeKind};
use crate::symbol::*;
use crate::types::TypeSymbol;
use mica_core::intern::{InternedString, StringInterner};
use mica_core::text::TextSpan;
use mica_diagnostics::{messages, Diagnostic, DiagnosticCollection, DiagnosticMessage};
use mica_evaluator::{fold_binary, ConstantValue, EvalError};
use mica_syntax::{
    self as syntax, Expression, Identifier, LiteralValue, Member, Pattern, Statement, SyntaxKind,
    SyntaxTree, Token, TypeClause,
};
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::{debug, trace};

pub struct Binder {
    is_script: bool,
    /// The function whose body is being bound; `None` at top level.
    function: Option<Arc<FunctionSymbol>>,
    /// File of the syntax currently being bound, attached to diagnostics.
    file_name: Option<Arc<str>>,
    scopes: ScopeArena,
    /// The innermost open scope.
    scope: ScopeId,
    /// Break and continue targets of the enclosing loops, innermost last.
    loop_stack: Vec<(BoundLabel, BoundLabel)>,
    label_counter: u32,
    diagnostics: DiagnosticCollection,
}

impl Binder {
    pub fn new(
        interner: &StringInterner,
        is_script: bool,
        previous: Option<&BoundGlobalScope>,
        function: Option<Arc<FunctionSymbol>>,
    ) -> Self {
        let mut scopes = ScopeArena::new();
        let parent = Self::create_parent_scopes(&mut scopes, interner, previous);
        let scope = match &function {
            Some(function) => {
                let scope = scopes.push(ScopeKind::Function, Some(parent));
                for parameter in &function.parameters {
                    scopes.try_declare(scope, interner.intern(&parameter.name), Symbol::Variable(parameter.clone()));
                }
                scope
            }
            None => scopes.push(ScopeKind::Global, Some(parent)),
        };
        let file_name = function
            .as_ref()
            .and_then(|f| f.declaration.as_ref())
            .map(|d| d.file_name.clone());

        Self {
            is_script,
            function,
            file_name,
            scopes,
            scope,
            loop_stack: Vec::new(),
            label_counter: 0,
            diagnostics: DiagnosticCollection::new(),
        }
    }

    fn create_parent_scopes(
        scopes: &mut ScopeArena,
        interner: &StringInterner,
        previous: Option<&BoundGlobalScope>,
    ) -> ScopeId {
        let root = scopes.push(ScopeKind::Root, None);
        for function in builtin_functions() {
            scopes.try_declare(root, interner.intern(&function.name), Symbol::Function(function));
        }

        let mut submissions: Vec<&BoundGlobalScope> = previous.map(|p| p.chain().collect()).unwrap_or_default();
        submissions.reverse();

        let mut parent = root;
        for submission in submissions {
            let scope = scopes.push(ScopeKind::Submission, Some(parent));
            for function in &submission.functions {
                scopes.try_declare(scope, interner.intern(&function.name), Symbol::Function(function.clone()));
            }
            for variable in &submission.variables {
                scopes.try_declare(scope, interner.intern(&variable.name), Symbol::Variable(variable.clone()));
            }
            parent = scope;
        }
        parent
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Bind the top-level members of one submission.
    ///
    /// Every function signature is declared before any global statement is
    /// bound, so statements can call functions declared after them.
    #[tracing::instrument(skip_all, fields(trees = syntax_trees.len(), is_script = is_script))]
    pub fn bind_global_scope(
        interner: &StringInterner,
        is_script: bool,
        previous: Option<Arc<BoundGlobalScope>>,
        syntax_trees: &[Arc<SyntaxTree>],
    ) -> BoundGlobalScope {
        let mut binder = Binder::new(interner, is_script, previous.as_deref(), None);

        for tree in syntax_trees {
            binder.file_name = Some(tree.file_name.clone());
            for member in &tree.root.members {
                if let Member::FunctionDeclaration(declaration) = member {
                    binder.bind_function_declaration(&tree.file_name, declaration);
                }
            }
        }

        let mut statements = Vec::new();
        for tree in syntax_trees {
            binder.file_name = Some(tree.file_name.clone());
            for member in &tree.root.members {
                if let Member::GlobalStatement(global) = member {
                    statements.push(binder.bind_statement(&global.statement, true));
                }
            }
        }

        let functions = binder.scopes.functions(binder.scope);
        let variables = binder.scopes.variables(binder.scope);
        let mut diagnostics = binder.diagnostics;
        if let Some(previous) = &previous {
            diagnostics.prepend(previous.diagnostics.diagnostics());
        }

        debug!(
            functions = functions.len(),
            variables = variables.len(),
            statements = statements.len(),
            diagnostics = diagnostics.len(),
            "bound global scope"
        );

        BoundGlobalScope {
            previous,
            diagnostics,
            functions,
            variables,
            statements,
        }
    }

    /// Bind the body of a declared function against a finished global
    /// scope. Built-in functions have no body and yield `None`.
    #[tracing::instrument(skip_all, fields(function = %function.name))]
    pub fn bind_function_body(
        interner: &StringInterner,
        is_script: bool,
        global_scope: &BoundGlobalScope,
        function: &Arc<FunctionSymbol>,
    ) -> Option<(BoundBlockStatement, DiagnosticCollection)> {
        let declaration = function.declaration.as_ref()?;
        let mut binder = Binder::new(interner, is_script, Some(global_scope), Some(function.clone()));
        let body = binder.bind_block_statement(&declaration.syntax.body);
        debug!(diagnostics = binder.diagnostics.len(), "bound function body");
        Some((body, binder.diagnostics))
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn bind_function_declaration(&mut self, file_name: &Arc<str>, declaration: &Arc<syntax::FunctionDeclaration>) {
        let mut parameters = Vec::with_capacity(declaration.parameters.len());
        let mut seen = FxHashSet::default();
        for parameter in &declaration.parameters {
            let ty = self
                .bind_type_clause(Some(&parameter.type_clause))
                .unwrap_or(TypeSymbol::Error);
            let name = parameter.identifier.text_name.as_str();
            if seen.insert(parameter.identifier.text) {
                parameters.push(Arc::new(VariableSymbol::parameter(name, ty)));
            } else {
                self.error(parameter.identifier.span(), &messages::PARAMETER_ALREADY_DECLARED, &[name]);
            }
        }

        let return_type = self
            .bind_type_clause(declaration.type_clause.as_ref())
            .unwrap_or(TypeSymbol::Void);
        let identifier = &declaration.identifier;
        let function = Arc::new(FunctionSymbol::declared(
            identifier.text_name.as_str(),
            parameters,
            return_type,
            FunctionDeclarationRef {
                file_name: file_name.clone(),
                syntax: declaration.clone(),
            },
        ));
        trace!(%function, "declared function");

        if !identifier.is_missing && !self.try_declare(identifier.text, Symbol::Function(function)) {
            self.error(identifier.span(), &messages::SYMBOL_ALREADY_DECLARED, &[identifier.text_name.as_str()]);
        }
    }

    fn bind_type_clause(&mut self, clause: Option<&TypeClause>) -> Option<TypeSymbol> {
        let clause = clause?;
        let name = clause.identifier.text_name.as_str();
        match TypeSymbol::lookup(name) {
            Some(ty) => Some(ty),
            None => {
                self.error(clause.identifier.span(), &messages::UNDEFINED_TYPE, &[name]);
                Some(TypeSymbol::Error)
            }
        }
    }

    fn bind_variable(
        &mut self,
        identifier: &Identifier,
        is_read_only: bool,
        ty: TypeSymbol,
        constant: Option<ConstantValue>,
    ) -> Arc<VariableSymbol> {
        let kind = if self.function.is_none() {
            VariableKind::Global
        } else {
            VariableKind::Local
        };
        let variable = Arc::new(VariableSymbol::new(
            identifier.text_name.as_str(),
            kind,
            is_read_only,
            ty,
            constant,
        ));
        if !identifier.is_missing && !self.try_declare(identifier.text, Symbol::Variable(variable.clone())) {
            self.error(identifier.span(), &messages::SYMBOL_ALREADY_DECLARED, &[identifier.text_name.as_str()]);
        }
        variable
    }

    /// Declare in the innermost scope. At submission top level a name taken
    /// by an earlier submission counts as already declared.
    fn try_declare(&mut self, name: InternedString, symbol: Symbol) -> bool {
        if self.scopes.get(self.scope).kind == ScopeKind::Global
            && self.scopes.declared_in_submission(self.scope, name)
        {
            return false;
        }
        self.scopes.try_declare(self.scope, name, symbol)
    }

    fn lookup(&self, name: InternedString) -> Option<Symbol> {
        self.scopes.lookup(self.scope, name).cloned()
    }

    fn push_scope(&mut self) {
        self.scope = self.scopes.push(ScopeKind::Block, Some(self.scope));
    }

    fn pop_scope(&mut self) {
        if let Some(parent) = self.scopes.parent(self.scope) {
            self.scope = parent;
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn bind_statement(&mut self, syntax: &Statement, is_global: bool) -> BoundStatement {
        let result = self.bind_statement_internal(syntax);
        if !self.is_script || !is_global {
            if let BoundStatement::Expression(statement) = &result {
                let allowed = matches!(
                    statement.expression,
                    BoundExpression::Error(_)
                        | BoundExpression::Assignment(_)
                        | BoundExpression::Call(_)
                        | BoundExpression::Match(_)
                );
                if !allowed {
                    self.error(syntax.span(), &messages::INVALID_EXPRESSION_STATEMENT, &[]);
                }
            }
        }
        result
    }

    fn bind_statement_internal(&mut self, syntax: &Statement) -> BoundStatement {
        match syntax {
            Statement::Block(n) => BoundStatement::Block(self.bind_block_statement(n)),
            Statement::VariableDeclaration(n) => self.bind_variable_declaration(n),
            Statement::If(n) => self.bind_if_statement(n),
            Statement::While(n) => self.bind_while_statement(n),
            Statement::DoWhile(n) => self.bind_do_while_statement(n),
            Statement::For(n) => self.bind_for_statement(n),
            Statement::Break(n) => self.bind_break_or_continue(&n.keyword),
            Statement::Continue(n) => self.bind_break_or_continue(&n.keyword),
            Statement::Return(n) => self.bind_return_statement(n),
            Statement::Expression(n) => {
                let expression = self.bind_expression(&n.expression, true);
                BoundStatement::Expression(BoundExpressionStatement {
                    span: n.data.span,
                    expression,
                })
            }
            Statement::Defer(n) => {
                let expression = self.bind_expression(&n.expression, true);
                BoundStatement::Defer(BoundDeferStatement {
                    span: n.data.span,
                    expression,
                })
            }
            Statement::Match(n) => self.bind_match_statement(n),
        }
    }

    fn bind_block_statement(&mut self, syntax: &syntax::BlockStatement) -> BoundBlockStatement {
        self.push_scope();
        let statements = syntax
            .statements
            .iter()
            .map(|s| self.bind_statement(s, false))
            .collect();
        self.pop_scope();
        BoundBlockStatement {
            span: syntax.data.span,
            statements,
        }
    }

    fn bind_variable_declaration(&mut self, syntax: &syntax::VariableDeclaration) -> BoundStatement {
        let is_read_only = syntax.keyword.kind() == SyntaxKind::LetKeyword;
        let declared_type = self.bind_type_clause(syntax.type_clause.as_ref());
        // The initializer is bound before the name exists, so `var x = x`
        // refers to an outer `x`.
        let initializer = self.bind_expression(&syntax.initializer, false);
        let ty = declared_type.unwrap_or_else(|| initializer.ty());
        let initializer = self.bind_conversion(syntax.initializer.span(), initializer, ty, false);
        let constant = if is_read_only {
            initializer.constant_value().cloned()
        } else {
            None
        };
        let variable = self.bind_variable(&syntax.identifier, is_read_only, ty, constant);
        BoundStatement::VariableDeclaration(BoundVariableDeclaration {
            span: syntax.data.span,
            variable,
            initializer,
        })
    }

    fn bind_if_statement(&mut self, syntax: &syntax::IfStatement) -> BoundStatement {
        let condition = self.bind_expression_of_type(&syntax.condition, TypeSymbol::Bool);
        let then_statement = Box::new(self.bind_statement(&syntax.then_statement, false));
        let else_statement = syntax
            .else_clause
            .as_ref()
            .map(|clause| Box::new(self.bind_statement(&clause.statement, false)));
        BoundStatement::If(BoundIfStatement {
            span: syntax.data.span,
            condition,
            then_statement,
            else_statement,
        })
    }

    fn bind_while_statement(&mut self, syntax: &syntax::WhileStatement) -> BoundStatement {
        let condition = self.bind_expression_of_type(&syntax.condition, TypeSymbol::Bool);
        let (body, break_label, continue_label) = self.bind_loop_body(&syntax.body);
        BoundStatement::While(BoundWhileStatement {
            span: syntax.data.span,
            condition,
            body: Box::new(body),
            break_label,
            continue_label,
        })
    }

    fn bind_do_while_statement(&mut self, syntax: &syntax::DoWhileStatement) -> BoundStatement {
        let (body, break_label, continue_label) = self.bind_loop_body(&syntax.body);
        let condition = self.bind_expression_of_type(&syntax.condition, TypeSymbol::Bool);
        BoundStatement::DoWhile(BoundDoWhileStatement {
            span: syntax.data.span,
            body: Box::new(body),
            condition,
            break_label,
            continue_label,
        })
    }

    fn bind_for_statement(&mut self, syntax: &syntax::ForStatement) -> BoundStatement {
        let lower_bound = self.bind_expression_of_type(&syntax.lower_bound, TypeSymbol::Int);
        let upper_bound = self.bind_expression_of_type(&syntax.upper_bound, TypeSymbol::Int);

        self.push_scope();
        let variable = self.bind_variable(&syntax.identifier, true, TypeSymbol::Int, None);
        let (body, break_label, continue_label) = self.bind_loop_body(&syntax.body);
        self.pop_scope();

        BoundStatement::For(BoundForStatement {
            span: syntax.data.span,
            variable,
            lower_bound,
            upper_bound,
            body: Box::new(body),
            break_label,
            continue_label,
        })
    }

    fn bind_loop_body(&mut self, body: &Statement) -> (BoundStatement, BoundLabel, BoundLabel) {
        self.label_counter += 1;
        let break_label = BoundLabel::new(format!("break{}", self.label_counter));
        let continue_label = BoundLabel::new(format!("continue{}", self.label_counter));

        self.loop_stack.push((break_label.clone(), continue_label.clone()));
        let body = self.bind_statement(body, false);
        self.loop_stack.pop();

        (body, break_label, continue_label)
    }

    fn bind_break_or_continue(&mut self, keyword: &Token) -> BoundStatement {
        let span = keyword.span();
        match self.loop_stack.last().cloned() {
            Some((break_label, _)) if keyword.kind() == SyntaxKind::BreakKeyword => {
                BoundStatement::goto(span, break_label)
            }
            Some((_, continue_label)) => BoundStatement::goto(span, continue_label),
            None => {
                let text = keyword.kind().text().unwrap_or_default();
                self.error(span, &messages::INVALID_BREAK_OR_CONTINUE, &[text]);
                BoundStatement::error(span)
            }
        }
    }

    fn bind_return_statement(&mut self, syntax: &syntax::ReturnStatement) -> BoundStatement {
        let span = syntax.data.span;
        let expression = syntax
            .expression
            .as_ref()
            .map(|e| self.bind_expression(e, false));

        let Some(function) = self.function.clone() else {
            self.error(syntax.keyword.span(), &messages::INVALID_RETURN, &[]);
            return BoundStatement::error(span);
        };

        let expression = match (function.return_type, expression) {
            (TypeSymbol::Void, None) => None,
            (TypeSymbol::Void, Some(expression)) => {
                self.error(expression.span(), &messages::INVALID_RETURN_EXPRESSION, &[function.name.as_str()]);
                Some(expression)
            }
            (ty, None) => {
                if !ty.is_error() {
                    self.error(syntax.keyword.span(), &messages::MISSING_RETURN_EXPRESSION, &[ty.name()]);
                }
                None
            }
            (ty, Some(expression)) => Some(self.bind_conversion(expression.span(), expression, ty, false)),
        };

        BoundStatement::Return(BoundReturnStatement { span, expression })
    }

    fn bind_match_statement(&mut self, syntax: &syntax::MatchStatement) -> BoundStatement {
        let expression = self.bind_expression(&syntax.expression, false);
        if syntax.sections.is_empty() {
            self.error(syntax.data.span, &messages::MATCH_REQUIRES_SECTIONS, &[]);
        }

        let mut wildcards = 0;
        let mut sections = Vec::with_capacity(syntax.sections.len());
        for section in &syntax.sections {
            let patterns = self.bind_patterns(&section.patterns, expression.ty(), &mut wildcards);
            let result = self.bind_statement(&section.result, false);
            sections.push(BoundPatternSection {
                span: section.data.span,
                patterns,
                result,
            });
        }

        BoundStatement::Match(BoundMatchStatement {
            span: syntax.data.span,
            expression,
            sections,
        })
    }

    /// Bind the patterns of one section. `wildcards` counts `_` patterns
    /// across the whole match; only the second one is reported.
    fn bind_patterns(&mut self, patterns: &[Pattern], ty: TypeSymbol, wildcards: &mut usize) -> Vec<BoundPattern> {
        patterns
            .iter()
            .map(|pattern| match pattern {
                Pattern::MatchAny(token) => {
                    *wildcards += 1;
                    if *wildcards == 2 {
                        self.error(token.span(), &messages::MULTIPLE_MATCH_ANY_PATTERN, &[]);
                    }
                    BoundPattern::MatchAny(token.span())
                }
                Pattern::Constant(constant) => {
                    let expression = self.bind_expression(&constant.expression, false);
                    BoundPattern::Constant(self.bind_conversion(constant.data.span, expression, ty, false))
                }
            })
            .collect()
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn bind_expression(&mut self, syntax: &Expression, can_be_void: bool) -> BoundExpression {
        let result = self.bind_expression_internal(syntax);
        if !can_be_void && result.ty() == TypeSymbol::Void {
            self.error(syntax.span(), &messages::EXPRESSION_MUST_HAVE_VALUE, &[]);
            return BoundExpression::error(syntax.span());
        }
        result
    }

    fn bind_expression_of_type(&mut self, syntax: &Expression, ty: TypeSymbol) -> BoundExpression {
        let expression = self.bind_expression(syntax, false);
        self.bind_conversion(syntax.span(), expression, ty, false)
    }

    fn bind_expression_internal(&mut self, syntax: &Expression) -> BoundExpression {
        match syntax {
            Expression::Literal(n) => {
                let value = match &n.value {
                    LiteralValue::Int(i) => ConstantValue::Int(*i),
                    LiteralValue::Bool(b) => ConstantValue::Bool(*b),
                    LiteralValue::String(s) => ConstantValue::String(s.clone()),
                };
                BoundExpression::literal(n.data.span, value)
            }
            Expression::Name(n) => self.bind_name_expression(n),
            Expression::Assignment(n) => self.bind_assignment_expression(n),
            Expression::Unary(n) => self.bind_unary_expression(n),
            Expression::Binary(n) => self.bind_binary_expression(n),
            Expression::Parenthesized(n) => self.bind_expression_internal(&n.expression),
            Expression::Call(n) => self.bind_call_expression(n),
            Expression::Match(n) => self.bind_match_expression(n),
        }
    }

    /// Convert `expression` to `ty`, reporting when that is not allowed.
    /// With `allow_explicit` unset, explicit conversions are reported but
    /// still applied.
    fn bind_conversion(
        &mut self,
        span: TextSpan,
        expression: BoundExpression,
        ty: TypeSymbol,
        allow_explicit: bool,
    ) -> BoundExpression {
        let from = expression.ty();
        if from.is_error() || ty.is_error() {
            return expression;
        }

        let conversion = classify(from, ty);
        if !conversion.exists() {
            self.error(span, &messages::CANNOT_CONVERT, &[from.name(), ty.name()]);
            return BoundExpression::error(span);
        }
        if !allow_explicit && conversion.is_explicit() {
            self.error(span, &messages::CANNOT_CONVERT_IMPLICITLY, &[from.name(), ty.name()]);
        }
        if conversion.is_identity() {
            return expression;
        }
        BoundExpression::Conversion(BoundConversionExpression {
            span,
            ty,
            expression: Box::new(expression),
        })
    }

    fn bind_name_expression(&mut self, syntax: &syntax::NameExpression) -> BoundExpression {
        let span = syntax.data.span;
        let identifier = &syntax.identifier;
        if identifier.is_missing {
            // The parser has already reported it.
            return BoundExpression::error(span);
        }
        match self.lookup(identifier.text) {
            Some(Symbol::Variable(variable)) => BoundExpression::variable(span, variable),
            Some(Symbol::Function(_)) => {
                self.error(identifier.span(), &messages::NOT_A_VARIABLE, &[identifier.text_name.as_str()]);
                BoundExpression::error(span)
            }
            None => {
                self.error(identifier.span(), &messages::UNDEFINED_VARIABLE, &[identifier.text_name.as_str()]);
                BoundExpression::error(span)
            }
        }
    }

    fn bind_assignment_expression(&mut self, syntax: &syntax::AssignmentExpression) -> BoundExpression {
        let span = syntax.data.span;
        let expression = self.bind_expression(&syntax.expression, false);
        let identifier = &syntax.identifier;
        if identifier.is_missing {
            return BoundExpression::error(span);
        }

        let variable = match self.lookup(identifier.text) {
            Some(Symbol::Variable(variable)) => variable,
            Some(Symbol::Function(_)) => {
                self.error(identifier.span(), &messages::NOT_A_VARIABLE, &[identifier.text_name.as_str()]);
                return BoundExpression::error(span);
            }
            None => {
                self.error(identifier.span(), &messages::UNDEFINED_VARIABLE, &[identifier.text_name.as_str()]);
                return BoundExpression::error(span);
            }
        };

        if variable.is_read_only {
            self.error(identifier.span(), &messages::CANNOT_ASSIGN, &[identifier.text_name.as_str()]);
        }
        let ty = variable.ty;
        let expression = self.bind_conversion(syntax.expression.span(), expression, ty, false);
        BoundExpression::assignment(span, variable, expression)
    }

    fn bind_unary_expression(&mut self, syntax: &syntax::UnaryExpression) -> BoundExpression {
        let span = syntax.data.span;
        let operand = self.bind_expression(&syntax.operand, false);
        if operand.ty().is_error() {
            return BoundExpression::error(span);
        }

        let Some(op) = BoundUnaryOperator::bind(syntax.operator.kind(), operand.ty()) else {
            let text = syntax.operator.kind().text().unwrap_or_default();
            self.error(syntax.operator.span(), &messages::UNDEFINED_UNARY_OPERATOR, &[text, operand.ty().name()]);
            return BoundExpression::error(span);
        };
        BoundExpression::unary(span, op, operand)
    }

    fn bind_binary_expression(&mut self, syntax: &syntax::BinaryExpression) -> BoundExpression {
        let span = syntax.data.span;
        let left = self.bind_expression(&syntax.left, false);
        let right = self.bind_expression(&syntax.right, false);
        if left.ty().is_error() || right.ty().is_error() {
            return BoundExpression::error(span);
        }

        let Some(op) = BoundBinaryOperator::bind(syntax.operator.kind(), left.ty(), right.ty()) else {
            let text = syntax.operator.kind().text().unwrap_or_default();
            self.error(
                syntax.operator.span(),
                &messages::UNDEFINED_BINARY_OPERATOR,
                &[text, left.ty().name(), right.ty().name()],
            );
            return BoundExpression::error(span);
        };

        let constant = match fold_binary(left.constant_value(), op.kind, right.constant_value()) {
            Ok(constant) => constant,
            Err(EvalError::DivisionByZero) => {
                self.error(span, &messages::DIVISION_BY_ZERO, &[]);
                None
            }
            Err(error) => {
                trace!(%error, "constant folding skipped");
                None
            }
        };

        BoundExpression::Binary(BoundBinaryExpression {
            span,
            left: Box::new(left),
            op,
            right: Box::new(right),
            constant,
        })
    }

    fn bind_call_expression(&mut self, syntax: &syntax::CallExpression) -> BoundExpression {
        let span = syntax.data.span;
        let identifier = &syntax.identifier;

        // `int(x)`, `string(x)` and friends are explicit conversions.
        if syntax.arguments.len() == 1 {
            if let Some(ty) = TypeSymbol::lookup(&identifier.text_name) {
                let argument = &syntax.arguments[0];
                let expression = self.bind_expression(argument, false);
                return self.bind_conversion(span, expression, ty, true);
            }
        }

        let arguments: Vec<BoundExpression> = syntax
            .arguments
            .iter()
            .map(|a| self.bind_expression(a, false))
            .collect();

        if identifier.is_missing {
            return BoundExpression::error(span);
        }
        let function = match self.lookup(identifier.text) {
            Some(Symbol::Function(function)) => function,
            Some(Symbol::Variable(_)) => {
                self.error(identifier.span(), &messages::NOT_A_FUNCTION, &[identifier.text_name.as_str()]);
                return BoundExpression::error(span);
            }
            None => {
                self.error(identifier.span(), &messages::UNDEFINED_FUNCTION, &[identifier.text_name.as_str()]);
                return BoundExpression::error(span);
            }
        };

        let expected = function.parameters.len();
        let given = syntax.arguments.len();
        if given != expected {
            let error_span = match (syntax.arguments.get(expected), syntax.arguments.last()) {
                (Some(first_extra), Some(last)) if given > expected => {
                    TextSpan::from_bounds(first_extra.span().start, last.span().end())
                }
                _ => syntax.close_parenthesis.span(),
            };
            let expected_text = expected.to_string();
            let given_text = given.to_string();
            self.error(
                error_span,
                &messages::WRONG_ARGUMENT_COUNT,
                &[function.name.as_str(), expected_text.as_str(), given_text.as_str()],
            );
            return BoundExpression::error(span);
        }

        let mut has_errors = false;
        let mut converted = Vec::with_capacity(expected);
        for ((argument, argument_syntax), parameter) in arguments
            .into_iter()
            .zip(&syntax.arguments)
            .zip(&function.parameters)
        {
            let from = argument.ty();
            if from.is_error() || parameter.ty.is_error() {
                has_errors = true;
                continue;
            }
            if !classify(from, parameter.ty).exists() {
                self.error(
                    argument_syntax.span(),
                    &messages::WRONG_ARGUMENT_TYPE,
                    &[parameter.name.as_str(), parameter.ty.name(), from.name()],
                );
                has_errors = true;
                continue;
            }
            converted.push(self.bind_conversion(argument_syntax.span(), argument, parameter.ty, false));
        }

        if has_errors {
            return BoundExpression::error(span);
        }
        BoundExpression::Call(BoundCallExpression {
            span,
            function,
            arguments: converted,
        })
    }

    fn bind_match_expression(&mut self, syntax: &syntax::MatchExpression) -> BoundExpression {
        let span = syntax.data.span;
        let expression = self.bind_expression(&syntax.expression, false);
        if syntax.sections.is_empty() {
            self.error(span, &messages::MATCH_REQUIRES_SECTIONS, &[]);
            return BoundExpression::error(span);
        }

        let mut wildcards = 0;
        let mut result_type = None;
        let mut sections = Vec::with_capacity(syntax.sections.len());
        for section in &syntax.sections {
            let patterns = self.bind_patterns(&section.patterns, expression.ty(), &mut wildcards);
            let result = self.bind_expression(&section.result, false);
            let ty = *result_type.get_or_insert(result.ty());
            let result = self.bind_conversion(section.result.span(), result, ty, false);
            sections.push(BoundPatternSection {
                span: section.data.span,
                patterns,
                result,
            });
        }

        BoundExpression::Match(BoundMatchExpression {
            span,
            ty: result_type.unwrap_or(TypeSymbol::Error),
            expression: Box::new(expression),
            sections,
        })
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    fn error(&mut self, span: TextSpan, message: &DiagnosticMessage, args: &[&str]) {
        let diagnostic = match &self.file_name {
            Some(file) => Diagnostic::with_location(file.to_string(), span, message, args),
            None => Diagnostic::new(span, message, args),
        };
        trace!(code = diagnostic.code, message = %diagnostic.message_text, "diagnostic");
        self.diagnostics.add(diagnostic);
    }
}
