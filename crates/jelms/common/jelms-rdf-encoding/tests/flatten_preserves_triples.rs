use std::collections::HashSet;

use jelms_rdf_encoding::{Quad, jsonld};
use serde_json::json;
use tracing_subscriber::filter;

fn quad_set(doc: &serde_json::Value) -> HashSet<Quad> {
    jsonld::expand_and_to_rdf(doc)
        .expect("document converts to RDF")
        .quads()
        .iter()
        .cloned()
        .collect()
}

/// Flattening rewrites the tree shape but must describe exactly the same triples.
#[test]
fn flattened_document_has_same_triples() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter::EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let doc = json!({
        "@context": {
            "schema": "http://schema.org/",
            "xsd": "http://www.w3.org/2001/XMLSchema#",
            "name": {"@id": "schema:name"},
            "age": {"@id": "schema:age", "@type": "xsd:integer"},
            "knows": {"@id": "schema:knows", "@type": "@id"},
            "Person": {"@id": "schema:Person"}
        },
        "@graph": [
            {
                "@id": "http://example.org/first-person",
                "@type": "Person",
                "name": "First Person",
                "age": 40,
                "knows": {
                    "@id": "http://example.org/second-person",
                    "@type": "Person",
                    "name": "Second Person"
                }
            },
            {
                "@id": "http://example.org/third-person",
                "@type": "Person",
                "name": "Third Person",
                "knows": ["http://example.org/first-person"]
            }
        ]
    });

    let flattened = jelms_rdf_encoding::flatten(&doc).unwrap();
    assert_eq!(flattened["@graph"].as_array().unwrap().len(), 3);

    let before = quad_set(&doc);
    let after = quad_set(&flattened);
    assert_eq!(before.len(), 9);
    assert_eq!(before, after);
}

#[test]
fn flattening_is_idempotent() {
    let doc = json!({
        "@context": {"ex": "http://example.org/", "p": {"@id": "ex:p", "@type": "@id"}},
        "@id": "ex:a",
        "p": {"@id": "ex:b", "p": {"@id": "ex:c", "p": "ex:a"}}
    });

    let once = jelms_rdf_encoding::flatten(&doc).unwrap();
    let twice = jelms_rdf_encoding::flatten(&once).unwrap();
    assert_eq!(once, twice);
}
