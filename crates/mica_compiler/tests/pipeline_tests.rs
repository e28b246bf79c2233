//! End-to-end tests: syntax trees in, lowered program and diagnostics out.

use mica_binder::bound::{BoundNodeKind, BoundStatement};
use mica_binder::{Symbol, TypeSymbol};
use mica_compiler::{BoundProgram, Compilation};
use mica_core::intern::StringInterner;
use mica_syntax::{Member, Statement, SyntaxFactory, SyntaxKind};
use std::sync::Arc;

fn factory() -> SyntaxFactory {
    SyntaxFactory::new(StringInterner::new())
}

fn compile(f: &SyntaxFactory, members: Vec<Member>) -> BoundProgram {
    let tree = Arc::new(f.tree("main.mc", members));
    Compilation::new(f.interner().clone(), vec![tree])
        .program()
        .expect("pipeline runs")
}

fn submit(f: &SyntaxFactory, previous: Option<Arc<Compilation>>, statements: Vec<Statement>) -> Arc<Compilation> {
    let tree = Arc::new(f.script("repl.mc", statements));
    Arc::new(Compilation::create_script(previous, f.interner().clone(), tree))
}

// ============================================================================
// Whole programs
// ============================================================================

#[test]
fn test_empty_program() {
    let f = factory();
    let program = compile(&f, vec![]);
    assert!(program.diagnostics.is_empty());
    assert!(program.functions.is_empty());
    assert!(program.statement.statements.is_empty());
}

#[test]
fn test_function_and_global_call() {
    let f = factory();
    let program = compile(
        &f,
        vec![
            f.function(
                "add",
                vec![f.parameter("a", "int"), f.parameter("b", "int")],
                Some("int"),
                f.block(vec![f.return_(Some(f.binary(f.name("a"), SyntaxKind::PlusToken, f.name("b"))))]),
            ),
            f.global(f.var("x", f.call("add", vec![f.int(1), f.int(2)]))),
        ],
    );
    assert!(program.diagnostics.is_empty(), "{:?}", program.diagnostics);
    assert_eq!(program.functions.len(), 1);
    let (function, body) = program.functions.first().unwrap();
    assert_eq!(function.name, "add");
    assert_eq!(function.return_type, TypeSymbol::Int);
    assert_eq!(body.statements.len(), 1);
    assert_eq!(program.statement.statements[0].kind(), BoundNodeKind::VariableDeclaration);
}

#[test]
fn test_functions_may_call_each_other_before_declaration() {
    let f = factory();
    let program = compile(
        &f,
        vec![
            f.function("first", vec![], None, f.block(vec![f.expression_statement(f.call("second", vec![]))])),
            f.function("second", vec![], None, f.block(vec![])),
        ],
    );
    assert!(program.diagnostics.is_empty(), "{:?}", program.diagnostics);
}

#[test]
fn test_missing_return_is_reported_at_function_name() {
    let f = factory();
    let function = f.function(
        "pick",
        vec![f.parameter("c", "bool")],
        Some("int"),
        f.block(vec![f.if_(f.name("c"), f.return_(Some(f.int(1))), None)]),
    );
    let name_span = match &function {
        Member::FunctionDeclaration(declaration) => declaration.identifier.span(),
        _ => unreachable!(),
    };
    let program = compile(&f, vec![function]);

    assert_eq!(program.diagnostics.codes(), vec![3020]);
    let diagnostic = &program.diagnostics.diagnostics()[0];
    assert_eq!(diagnostic.span, name_span);
    assert_eq!(diagnostic.file.as_deref(), Some("main.mc"));
    assert_eq!(diagnostic.message_text, "Not all code paths return a value.");
}

#[test]
fn test_if_else_returning_is_accepted() {
    let f = factory();
    let program = compile(
        &f,
        vec![f.function(
            "pick",
            vec![f.parameter("c", "bool")],
            Some("int"),
            f.block(vec![f.if_(
                f.name("c"),
                f.return_(Some(f.int(1))),
                Some(f.return_(Some(f.int(2)))),
            )]),
        )],
    );
    assert!(program.diagnostics.is_empty(), "{:?}", program.diagnostics);
}

#[test]
fn test_void_function_body_ends_in_return() {
    let f = factory();
    let program = compile(
        &f,
        vec![f.function(
            "greet",
            vec![],
            None,
            f.block(vec![f.expression_statement(f.call("print", vec![f.string("hi")]))]),
        )],
    );
    let body = program.functions.values().next().unwrap();
    assert_eq!(body.statements.last().map(|s| s.kind()), Some(BoundNodeKind::ReturnStatement));
}

#[test]
fn test_undefined_return_type_skips_flow_check() {
    let f = factory();
    let program = compile(&f, vec![f.function("f", vec![], Some("number"), f.block(vec![]))]);
    assert_eq!(program.diagnostics.codes(), vec![3003]);
}

#[test]
fn test_body_diagnostics_follow_global_ones() {
    let f = factory();
    let program = compile(
        &f,
        vec![
            f.function("f", vec![], None, f.block(vec![f.expression_statement(f.int(1))])),
            f.global(f.var("x", f.name("other"))),
        ],
    );
    assert_eq!(program.diagnostics.codes(), vec![3001, 3022]);
}

#[test]
fn test_global_statements_are_lowered() {
    let f = factory();
    let program = compile(
        &f,
        vec![
            f.global(f.var("i", f.int(0))),
            f.global(f.while_(
                f.binary(f.name("i"), SyntaxKind::LessToken, f.int(3)),
                f.expression_statement(f.assign("i", f.binary(f.name("i"), SyntaxKind::PlusToken, f.int(1)))),
            )),
        ],
    );
    assert!(program.diagnostics.is_empty(), "{:?}", program.diagnostics);
    assert!(program
        .statement
        .statements
        .iter()
        .all(|s| !matches!(s, BoundStatement::While(_) | BoundStatement::Block(_))));
}

// ============================================================================
// Submissions
// ============================================================================

#[test]
fn test_global_scope_is_bound_once() {
    let f = factory();
    let compilation = submit(&f, None, vec![f.var("x", f.int(1))]);
    assert!(Arc::ptr_eq(&compilation.global_scope(), &compilation.global_scope()));
}

#[test]
fn test_submission_uses_earlier_declarations() {
    let f = factory();
    let first = submit(&f, None, vec![f.var("x", f.int(1))]);
    let second = submit(
        &f,
        Some(first),
        vec![f.expression_statement(f.assign("x", f.binary(f.name("x"), SyntaxKind::PlusToken, f.int(1))))],
    );
    let program = second.program().unwrap();
    assert!(program.diagnostics.is_empty(), "{:?}", program.diagnostics);
    assert!(program.previous.is_some());
}

#[test]
fn test_submission_calls_earlier_function() {
    let f = factory();
    let first_tree = Arc::new(f.tree(
        "repl.mc",
        vec![f.function("answer", vec![], Some("int"), f.block(vec![f.return_(Some(f.int(42)))]))],
    ));
    let first = Arc::new(Compilation::create_script(None, f.interner().clone(), first_tree));
    let second = submit(&f, Some(first.clone()), vec![f.var("x", f.call("answer", vec![]))]);

    let program = second.program().unwrap();
    assert!(program.diagnostics.is_empty(), "{:?}", program.diagnostics);

    let answer = first.global_scope().functions[0].clone();
    assert!(program.functions.is_empty());
    assert!(program.function_body(&answer).is_some());
}

#[test]
fn test_submission_cannot_redeclare() {
    let f = factory();
    let first = submit(&f, None, vec![f.var("x", f.int(1))]);
    let second = submit(&f, Some(first), vec![f.var("x", f.string("again"))]);
    assert_eq!(second.program().unwrap().diagnostics.codes(), vec![3006]);
}

#[test]
fn test_earlier_diagnostics_come_first() {
    let f = factory();
    let first = submit(&f, None, vec![f.var("a", f.name("missing"))]);
    let second = submit(&f, Some(first), vec![f.break_()]);
    assert_eq!(second.program().unwrap().diagnostics.codes(), vec![3001, 3016]);
}

#[test]
fn test_script_allows_bare_expressions() {
    let f = factory();
    let compilation = submit(&f, None, vec![f.expression_statement(f.int(1))]);
    assert!(compilation.program().unwrap().diagnostics.is_empty());

    let tree = Arc::new(f.script("main.mc", vec![f.expression_statement(f.int(1))]));
    let regular = Compilation::new(f.interner().clone(), vec![tree]);
    assert_eq!(regular.program().unwrap().diagnostics.codes(), vec![3022]);
}

#[test]
fn test_symbols_newest_first() {
    let f = factory();
    let first = submit(&f, None, vec![f.var("x", f.int(1)), f.var("y", f.int(2))]);
    let second = submit(&f, Some(first), vec![f.var("z", f.int(3))]);
    let names: Vec<String> = second.symbols().iter().map(|s| s.name().to_string()).collect();
    assert_eq!(names, vec!["z", "x", "y"]);
    assert!(matches!(second.symbols()[0], Symbol::Variable(_)));
}

#[test]
fn test_earlier_function_body_diagnostics_come_first() {
    let f = factory();
    let first_tree = Arc::new(f.tree(
        "repl.mc",
        vec![
            f.function("f", vec![], None, f.block(vec![f.break_()])),
            f.global(f.var("a", f.name("missing"))),
        ],
    ));
    let first = Arc::new(Compilation::create_script(None, f.interner().clone(), first_tree));
    assert_eq!(first.program().unwrap().diagnostics.codes(), vec![3001, 3016]);

    let clean = submit(&f, Some(first.clone()), vec![f.var("b", f.int(1))]);
    assert_eq!(clean.program().unwrap().diagnostics.codes(), vec![3001, 3016]);

    let broken = submit(&f, Some(first), vec![f.var("c", f.name("other"))]);
    assert_eq!(broken.program().unwrap().diagnostics.codes(), vec![3001, 3016, 3001]);
}

#[test]
fn test_missing_return_follows_body_diagnostics() {
    let f = factory();
    let program = compile(
        &f,
        vec![f.function(
            "h",
            vec![],
            Some("int"),
            f.block(vec![f.expression_statement(f.call("print", vec![f.name("nope")]))]),
        )],
    );
    assert_eq!(program.diagnostics.codes(), vec![3001, 3020]);
}
