use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlweave::{Buffer, Builder, Condition, SelectStmt, compile, dialect, eq, in_list, select};

/// SELECT col0, col1, ... FROM t WHERE col0 = ? AND col1 = ? ...
fn build_select(n: usize) -> SelectStmt {
    let columns: Vec<String> = (0..n).map(|i| format!("col{i}")).collect();
    let mut stmt = select(columns).from("t");
    for i in 0..n {
        stmt = stmt.where_(eq(format!("col{i}"), i as i64));
    }
    stmt
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_build/build");

    for n in [1, 5, 10, 50, 100] {
        let stmt = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &stmt, |b, stmt| {
            b.iter(|| {
                let mut buf = Buffer::new();
                stmt.build(dialect::MYSQL, &mut buf).unwrap();
                black_box(buf);
            });
        });
    }

    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_build/compile");

    for n in [1, 5, 10, 50, 100] {
        let stmt = build_select(n);
        group.bench_with_input(BenchmarkId::new("postgres", n), &stmt, |b, stmt| {
            b.iter(|| black_box(compile(stmt, dialect::POSTGRES, false).unwrap()));
        });
        group.bench_with_input(BenchmarkId::new("interpolate", n), &stmt, |b, stmt| {
            b.iter(|| black_box(compile(stmt, dialect::MYSQL, true).unwrap()));
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_build/in_list");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let stmt = select(["*"]).from("t").where_(in_list("id", values.iter().copied()));
                black_box(compile(&stmt, dialect::POSTGRES, false).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_condition_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement_build/condition_tree");

    for n in [1, 5, 10, 50] {
        let cond = (0..n).fold(Condition::And(Vec::new()), |acc, i| {
            acc.and(eq(format!("a{i}"), i as i64).or(eq(format!("b{i}"), i as i64)))
        });
        group.bench_with_input(BenchmarkId::from_parameter(n), &cond, |b, cond| {
            b.iter(|| {
                let mut buf = Buffer::new();
                cond.build(dialect::SQLITE3, &mut buf).unwrap();
                black_box(buf);
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_compile,
    bench_in_list,
    bench_condition_tree
);
criterion_main!(benches);
