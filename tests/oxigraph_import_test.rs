//! Loading oxigraph model quads into the store

use oxigraph::model::{GraphName, Literal, NamedNode, Quad as OxQuad};
use rdf_stores::{Quad, RdfStore, Result, Term};

fn named(iri: &str) -> NamedNode {
    NamedNode::new(iri).unwrap()
}

#[test]
fn test_import_oxigraph_quads() {
    let graph = GraphName::NamedNode(named("http://example.org/graph1"));
    let ox_quads = vec![
        OxQuad::new(
            named("http://example.org/alice"),
            named("http://example.org/knows"),
            named("http://example.org/bob"),
            graph.clone(),
        ),
        OxQuad::new(
            named("http://example.org/alice"),
            named("http://example.org/age"),
            Literal::new_typed_literal("30", named("http://www.w3.org/2001/XMLSchema#integer")),
            graph,
        ),
        OxQuad::new(
            named("http://example.org/bob"),
            named("http://example.org/name"),
            Literal::new_language_tagged_literal("Bob", "en").unwrap(),
            GraphName::DefaultGraph,
        ),
    ];

    let quads = ox_quads.iter().map(Quad::try_from).collect::<Result<Vec<_>>>().unwrap();
    let mut store = RdfStore::create_default();
    assert_eq!(store.import(quads).unwrap(), 3);

    let alice = Term::named_node("http://example.org/alice");
    assert_eq!(store.count_quads(Some(&alice), None, None, None), 2);
    assert_eq!(store.count_quads(None, None, None, Some(&Term::DefaultGraph)), 1);

    for quad in store.read_quads(Some(&alice), None, None, None) {
        let quad = quad.unwrap();
        let object = quad.object.to_oxigraph().unwrap();
        assert!(ox_quads.iter().any(|expected| expected.object == object));
    }
}
