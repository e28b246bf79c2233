//! Benchmark harness for the mica front end.
//!
//! Uses criterion for reliable benchmarking.
//! Run with: cargo bench -p mica_compiler

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mica_compiler::Compilation;
use mica_core::intern::StringInterner;
use mica_syntax::{Member, SyntaxFactory, SyntaxKind, SyntaxTree};
use std::sync::Arc;

/// A function counting up to `n` with a loop, a match and a defer, followed
/// by a global call.
fn counter_function(f: &SyntaxFactory, index: usize) -> Member {
    let name = format!("count{}", index);
    f.function(
        &name,
        vec![f.parameter("n", "int")],
        Some("int"),
        f.block(vec![
            f.defer(f.call("print", vec![f.string("done")])),
            f.var("total", f.int(0)),
            f.for_(
                "i",
                f.int(1),
                f.name("n"),
                f.block_statement(vec![
                    f.match_statement(
                        f.binary(f.name("i"), SyntaxKind::SlashToken, f.int(2)),
                        vec![
                            f.statement_section(
                                vec![f.constant_pattern(f.int(0))],
                                f.expression_statement(f.assign("total", f.int(0))),
                            ),
                            f.statement_section(
                                vec![f.wildcard()],
                                f.expression_statement(f.assign(
                                    "total",
                                    f.binary(f.name("total"), SyntaxKind::PlusToken, f.name("i")),
                                )),
                            ),
                        ],
                    ),
                    f.if_(
                        f.binary(f.name("total"), SyntaxKind::GreaterToken, f.int(100)),
                        f.break_(),
                        None,
                    ),
                ]),
            ),
            f.return_(Some(f.name("total"))),
        ]),
    )
}

fn build_tree(f: &SyntaxFactory, functions: usize) -> Arc<SyntaxTree> {
    let mut members: Vec<Member> = (0..functions).map(|i| counter_function(f, i)).collect();
    members.push(f.global(f.expression_statement(f.call("print", vec![f.string("start")]))));
    Arc::new(f.tree("bench.mc", members))
}

fn bench_bind_program(c: &mut Criterion) {
    let mut group = c.benchmark_group("bind_program");
    for functions in [1usize, 10, 100] {
        let f = SyntaxFactory::new(StringInterner::new());
        let tree = build_tree(&f, functions);
        group.bench_with_input(BenchmarkId::from_parameter(functions), &tree, |b, tree| {
            b.iter(|| {
                let compilation = Compilation::new(f.interner().clone(), vec![tree.clone()]);
                black_box(compilation.program())
            });
        });
    }
    group.finish();
}

fn bench_global_scope_only(c: &mut Criterion) {
    let f = SyntaxFactory::new(StringInterner::new());
    let tree = build_tree(&f, 50);
    c.bench_function("global_scope_50_functions", |b| {
        b.iter(|| {
            let compilation = Compilation::new(f.interner().clone(), vec![tree.clone()]);
            black_box(compilation.global_scope())
        });
    });
}

fn bench_submission_chain(c: &mut Criterion) {
    c.bench_function("submission_chain_20", |b| {
        b.iter(|| {
            let f = SyntaxFactory::new(StringInterner::new());
            let mut previous: Option<Arc<Compilation>> = None;
            for i in 0..20 {
                let tree = Arc::new(f.script("repl.mc", vec![f.var(&format!("v{}", i), f.int(i))]));
                previous = Some(Arc::new(Compilation::create_script(previous, f.interner().clone(), tree)));
            }
            black_box(previous.map(|c| c.program()))
        });
    });
}

criterion_group!(benches, bench_bind_program, bench_global_scope_only, bench_submission_chain);
criterion_main!(benches);
