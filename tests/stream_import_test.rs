use futures_util::stream::{self, StreamExt};
use rdf_stores::{Quad, RdfStore, Result, Term};

fn nn(iri: &str) -> Term {
    Term::named_node(iri)
}

fn sensor_readings(count: usize) -> Vec<Quad> {
    (0..count)
        .map(|i| {
            Quad::new(
                nn(&format!("http://example.org/sensor{}", i % 4)),
                nn("http://saref.etsi.org/core/hasValue"),
                Term::literal(format!("{}", i)),
                nn("http://example.org/graph/readings"),
            )
        })
        .collect()
}

#[tokio::test]
async fn test_import_stream() {
    let mut store = RdfStore::create_default();
    let mut readings = sensor_readings(20);
    readings.push(readings[0].clone());

    let added = store.import_stream(stream::iter(readings)).await.unwrap();
    assert_eq!(added, 20);
    assert_eq!(store.size(), 20);
}

#[tokio::test]
async fn test_match_stream_yields_matching_quads() {
    let mut store = RdfStore::create_default();
    store.import(sensor_readings(20)).unwrap();

    let sensor = nn("http://example.org/sensor1");
    let matched: Vec<Quad> = store
        .match_stream(Some(&sensor), None, None, None)
        .collect::<Vec<Result<Quad>>>()
        .await
        .into_iter()
        .collect::<Result<_>>()
        .unwrap();

    assert_eq!(matched.len(), 5);
    assert!(matched.iter().all(|quad| quad.subject == sensor));
}

#[tokio::test]
async fn test_remove_stream() {
    let mut store = RdfStore::create_default();
    let readings = sensor_readings(10);
    store.import(readings.clone()).unwrap();

    let removed = store
        .remove_stream(stream::iter(readings.into_iter().take(4).chain(sensor_readings(30).into_iter().skip(25))))
        .await;
    assert_eq!(removed, 4);
    assert_eq!(store.size(), 6);
}

#[tokio::test]
async fn test_import_stream_stops_at_first_invalid_quad() {
    let mut store = RdfStore::create_default();
    let invalid = Term::Quad(Box::new(Quad::new(nn("s"), nn("p"), nn("o"), nn("g"))));
    let quads = vec![
        Quad::triple(nn("a"), nn("b"), nn("c")),
        Quad::triple(invalid, nn("b"), nn("c")),
        Quad::triple(nn("d"), nn("e"), nn("f")),
    ];

    assert!(store.import_stream(stream::iter(quads)).await.is_err());
    assert_eq!(store.size(), 1);
}
