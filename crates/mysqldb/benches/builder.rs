use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use mysqldb::builder::{InsertBuilder, JoinClause, JoinKind, SqlBuilder, TableSpec, render_select};

fn columns(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("col{i}")).collect()
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("builder/insert");

    for n in [1, 5, 10, 50, 100] {
        let fields = columns(n).join(", ");
        group.bench_with_input(BenchmarkId::from_parameter(n), &fields, |b, fields| {
            b.iter(|| {
                let mut insert = InsertBuilder::new("t", fields);
                insert.values(0..n as i64);
                black_box(insert.build())
            });
        });
    }

    group.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut group = c.benchmark_group("builder/select");
    let join = JoinClause::new(JoinKind::Inner, Some("albums"), Some("ArtistId"))
        .expect("valid join");

    for n in [1, 10, 100] {
        let cols = columns(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &cols, |b, cols| {
            b.iter(|| black_box(render_select("artists", cols, &join, Some("ArtistId < 5"))));
        });
    }

    group.finish();
}

fn bench_create_table(c: &mut Criterion) {
    let spec = TableSpec::new(
        "WebPages",
        columns(20).into_iter().map(|c| format!("{c} VARCHAR(255)")),
    );
    c.bench_function("builder/create_table", |b| {
        b.iter(|| black_box(spec.build_sql()));
    });
}

criterion_group!(benches, bench_insert, bench_select, bench_create_table);
criterion_main!(benches);
