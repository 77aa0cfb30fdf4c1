use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rdf_stores::{Quad, RdfStore, Term};

const SENSORS: usize = 1000;
const READINGS: usize = 50_000;

fn populated_store() -> RdfStore {
    let mut store = RdfStore::create_default();
    let quads = (0..READINGS).map(|i| {
        Quad::triple(
            Term::quoted(
                Term::named_node(format!("http://example.org/sensor{}", i % SENSORS)),
                Term::named_node("http://example.org/observed"),
                Term::literal(i.to_string()),
            ),
            Term::named_node("http://example.org/certainty"),
            Term::literal(format!("0.{}", i % 10)),
        )
    });
    store.import(quads).unwrap();
    store
}

fn bench_patterns(c: &mut Criterion) {
    let store = populated_store();
    let certainty = Term::named_node("http://example.org/certainty");
    let sensor_pattern = Term::quoted(
        Term::named_node("http://example.org/sensor7"),
        Term::named_node("http://example.org/observed"),
        Term::variable("value"),
    );

    let mut group = c.benchmark_group("query");
    group.bench_function("wildcard_count", |b| {
        b.iter(|| black_box(store.count_quads(None, None, None, None)));
    });
    group.bench_function("bound_predicate_read", |b| {
        b.iter(|| black_box(store.read_quads(None, Some(&certainty), None, None).count()));
    });
    group.bench_function("quoted_pattern_read", |b| {
        b.iter(|| black_box(store.read_quads(Some(&sensor_pattern), None, None, None).count()));
    });
    group.bench_function("quoted_pattern_count", |b| {
        b.iter(|| black_box(store.count_quads(Some(&sensor_pattern), None, None, None)));
    });
    group.finish();
}

criterion_group!(benches, bench_patterns);
criterion_main!(benches);
