use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlforge::{Predicate, SelectStatement, Statement, qb};

/// select col0, col1, ... from t where col0 = :param0 and col1 = :param1 ...
fn build_select(n: usize) -> SelectStatement {
    let mut stmt = qb::select("t");
    for i in 0..n {
        stmt = stmt.column(format!("col{i}"));
    }
    for i in 0..n {
        stmt = stmt.where_eq(format!("col{i}"), i as i64);
    }
    stmt
}

fn bench_template(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement/template");

    for n in [1, 5, 10, 50, 100] {
        let stmt = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &stmt, |b, stmt| {
            b.iter(|| black_box(stmt.template()));
        });
    }

    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement/compile");

    for n in [1, 5, 10, 50, 100] {
        let stmt = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &stmt, |b, stmt| {
            b.iter(|| black_box(stmt.compile()));
        });
    }

    group.finish();
}

fn bench_build_and_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement/build_and_compile");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_select(n).compile()));
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("statement/in_list");

    for n in [5, 20, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let stmt = qb::select("t").where_pred(Predicate::in_list("id", values.iter().copied()));
                black_box(stmt.compile())
            });
        });
    }

    group.finish();
}

fn bench_nested_predicates(c: &mut Criterion) {
    c.bench_function("statement/nested_predicates", |b| {
        b.iter(|| {
            let stmt = qb::select("Emp e").where_pred(Predicate::and(vec![
                Predicate::or(vec![
                    Predicate::eq("e.dept", "Sales"),
                    Predicate::gt("e.salary", 100_000),
                ]),
                Predicate::not(Predicate::is_null("e.manager_id")),
                Predicate::exists("Dept d")
                    .where_("d.id = e.dept_id")
                    .where_pred(Predicate::bitmask_any("d.flags", 0b101))
                    .into(),
            ]));
            black_box(stmt.compile())
        });
    });
}

criterion_group!(
    benches,
    bench_template,
    bench_compile,
    bench_build_and_compile,
    bench_in_list,
    bench_nested_predicates
);
criterion_main!(benches);
