//! Serializes Person records against `tests/data/person.yaml` and checks the
//! resulting documents by converting them back to RDF.

use std::path::PathBuf;

use jelms::{
    ContextMode, CyclePolicy, DumpOptions, JelmsError, JsonLdDumper, TypedObject, load_object,
};
use jelms_rdf_encoding::{Dataset, Literal, NamedNode, Object, Subject, jsonld, rdf, xsd};
use jelms_schema::{SchemaError, SchemaView};
use serde_json::{Value, json};
use tracing_subscriber::filter;

const SCHEMA_NAME: &str = "http://schema.org/name";
const SCHEMA_AGE: &str = "http://schema.org/age";
const SCHEMA_KNOWS: &str = "http://schema.org/knows";
const SCHEMA_COLLEAGUE: &str = "http://schema.org/colleague";
const SCHEMA_PERSON: &str = "http://schema.org/Person";

const FIRST: &str = "http://example.org/first-person";
const SECOND: &str = "http://example.org/second-person";
const THIRD: &str = "http://example.org/third-person";

fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter::EnvFilter::from_default_env())
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

fn schema() -> SchemaView {
    init_tracing();
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/person.yaml");
    SchemaView::from_path(path).expect("test schema loads")
}

fn person(id: &str, name: &str) -> TypedObject {
    TypedObject::new("Person").with("id", id).with("name", name)
}

fn to_dataset(text: &str) -> Dataset {
    let document: Value = serde_json::from_str(text).expect("output is JSON");
    jsonld::expand_and_to_rdf(&document).expect("output is valid JSON-LD")
}

fn subject(iri: &str) -> Subject {
    Subject::Named(NamedNode::new(iri))
}

fn named(iri: &str) -> Object {
    Object::Named(NamedNode::new(iri))
}

fn string(value: &str) -> Object {
    Object::Literal(Literal::new(value))
}

#[test]
fn identifier_promoted_to_id() {
    let text = JsonLdDumper::new()
        .dumps(&person(FIRST, "First Person"), &schema())
        .unwrap();
    let document: Value = serde_json::from_str(&text).unwrap();

    assert_eq!(document["@id"], FIRST);
    assert!(document.get("id").is_none());
    assert!(document["@context"].get("id").is_none());
}

#[test]
fn type_resolves_to_class_uri() {
    let text = JsonLdDumper::new()
        .dumps(&person(FIRST, "First Person"), &schema())
        .unwrap();
    let dataset = to_dataset(&text);

    assert_eq!(
        dataset.objects(&subject(FIRST), rdf::TYPE),
        vec![&named(SCHEMA_PERSON)]
    );
    assert_eq!(
        dataset.objects(&subject(FIRST), SCHEMA_NAME),
        vec![&string("First Person")]
    );
}

#[test]
fn integer_fields_are_typed_literals() {
    let record = person(FIRST, "First Person").with("age", 40);
    let dataset = to_dataset(&JsonLdDumper::new().dumps(&record, &schema()).unwrap());

    assert_eq!(
        dataset.objects(&subject(FIRST), SCHEMA_AGE),
        vec![&Object::Literal(Literal::typed("40", NamedNode::new(xsd::INTEGER)))]
    );
}

#[test]
fn empty_fields_are_omitted() {
    let record = person(FIRST, "First Person")
        .with("age", None::<i64>)
        .with("colleagues", Vec::<TypedObject>::new());
    let text = JsonLdDumper::new().dumps(&record, &schema()).unwrap();
    let document: Value = serde_json::from_str(&text).unwrap();

    assert!(document.get("age").is_none());
    assert!(document.get("colleagues").is_none());
    assert_eq!(jelms::remove_empty(document.clone()), document);
}

#[test]
fn relationship_becomes_triple() {
    let record = person(FIRST, "First Person").with("knows", person(SECOND, "Second Person"));
    let dataset = to_dataset(&JsonLdDumper::new().dumps(&record, &schema()).unwrap());

    assert_eq!(
        dataset.objects(&subject(FIRST), SCHEMA_KNOWS),
        vec![&named(SECOND)]
    );
    assert_eq!(
        dataset.objects(&subject(SECOND), SCHEMA_NAME),
        vec![&string("Second Person")]
    );
    assert_eq!(
        dataset.objects(&subject(SECOND), rdf::TYPE),
        vec![&named(SCHEMA_PERSON)]
    );
}

#[test]
fn multivalued_relationships() {
    let record = person(FIRST, "First Person").with(
        "colleagues",
        vec![person(SECOND, "Second Person"), person(THIRD, "Third Person")],
    );
    let dataset = to_dataset(&JsonLdDumper::new().dumps(&record, &schema()).unwrap());

    assert_eq!(
        dataset.objects(&subject(FIRST), SCHEMA_COLLEAGUE),
        vec![&named(SECOND), &named(THIRD)]
    );
}

#[test]
fn collection_of_unrelated_people() {
    let people = vec![person(FIRST, "First Person"), person(SECOND, "Second Person")];
    let text = JsonLdDumper::new().dumps(&people, &schema()).unwrap();
    let document: Value = serde_json::from_str(&text).unwrap();

    let graph = document["@graph"].as_array().unwrap();
    assert_eq!(graph.len(), 2);
    for node in graph {
        assert_eq!(node["@type"], "Person");
        assert!(node["@id"].is_string());
        assert!(node.get("knows").is_none());
    }

    let dataset = to_dataset(&text);
    let subjects = dataset.subjects();
    assert_eq!(subjects.len(), 2);
    assert!(subjects.contains(&subject(FIRST)));
    assert!(subjects.contains(&subject(SECOND)));
    assert_eq!(
        dataset.objects(&subject(SECOND), SCHEMA_NAME),
        vec![&string("Second Person")]
    );
    assert_eq!(dataset.len(), 4);
}

#[test]
fn context_has_no_duplicate_id_aliases() {
    let text = JsonLdDumper::new()
        .dumps(&person(FIRST, "First Person"), &schema())
        .unwrap();
    let document: Value = serde_json::from_str(&text).unwrap();

    let aliases: Vec<&String> = document["@context"]
        .as_object()
        .unwrap()
        .iter()
        .filter(|(key, value)| key.as_str() != "@id" && value.as_str() == Some("@id"))
        .map(|(key, _)| key)
        .collect();
    assert!(aliases.is_empty(), "unexpected @id aliases: {aliases:?}");
}

#[test]
fn missing_identifier_is_a_schema_error() {
    let memo = TypedObject::new("Memo").with("text", "remember");
    assert!(matches!(
        JsonLdDumper::new().dumps(&memo, &schema()),
        Err(JelmsError::Schema(SchemaError::MissingIdentifier { class })) if class == "Memo"
    ));
}

#[test]
fn unknown_class_is_a_schema_error() {
    let robot = TypedObject::new("Robot").with("id", "http://example.org/r2");
    assert!(matches!(
        JsonLdDumper::new().dumps(&robot, &schema()),
        Err(JelmsError::Schema(SchemaError::UnresolvableClass(_)))
    ));
}

#[test]
fn non_finite_numbers_are_rejected() {
    let record = person(FIRST, "First Person").with("height", f64::INFINITY);
    assert!(matches!(
        JsonLdDumper::new().dumps(&record, &schema()),
        Err(JelmsError::UnsupportedValue { .. })
    ));
}

#[test]
fn per_object_context_round_trips() {
    let options = DumpOptions::builder()
        .with_context_mode(ContextMode::PerObject)
        .build();
    let record = person(FIRST, "First Person").with("knows", person(SECOND, "Second Person"));
    let text = JsonLdDumper::with_options(options)
        .dumps(&record, &schema())
        .unwrap();

    let dataset = to_dataset(&text);
    assert_eq!(
        dataset.objects(&subject(FIRST), SCHEMA_KNOWS),
        vec![&named(SECOND)]
    );
}

#[test]
fn flattened_collection_describes_same_triples() {
    let people = vec![
        person(FIRST, "First Person").with("knows", person(SECOND, "Second Person")),
        person(THIRD, "Third Person"),
    ];
    let schema = schema();
    let embedded = JsonLdDumper::new().dumps(&people, &schema).unwrap();
    let flat = JsonLdDumper::with_options(DumpOptions::builder().with_flatten(true).build())
        .dumps(&people, &schema)
        .unwrap();

    let document: Value = serde_json::from_str(&flat).unwrap();
    assert_eq!(document["@graph"].as_array().unwrap().len(), 3);

    let mut before: Vec<String> = to_dataset(&embedded)
        .quads()
        .iter()
        .map(|q| q.to_string())
        .collect();
    let mut after: Vec<String> = to_dataset(&flat).quads().iter().map(|q| q.to_string()).collect();
    before.sort();
    after.sort();
    assert_eq!(before, after);
}

#[test]
fn cycles_are_broken_with_references() {
    // first knows second, second knows (a copy of) first
    let record = person(FIRST, "First Person").with(
        "knows",
        person(SECOND, "Second Person").with("knows", person(FIRST, "First Person")),
    );
    let schema = schema();

    let text = JsonLdDumper::new().dumps(&record, &schema).unwrap();
    let document: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(document["knows"]["knows"], json!({"@id": FIRST}));

    let dataset = to_dataset(&text);
    assert_eq!(
        dataset.objects(&subject(SECOND), SCHEMA_KNOWS),
        vec![&named(FIRST)]
    );

    let strict = DumpOptions::builder()
        .with_cycle_policy(CyclePolicy::Fail)
        .build();
    assert!(matches!(
        JsonLdDumper::with_options(strict).dumps(&record, &schema),
        Err(JelmsError::CyclicReference { id }) if id == FIRST
    ));
}

#[test]
fn loaded_records_serialize() {
    let schema = schema();
    let record = load_object(
        &json!({
            "id": FIRST,
            "name": "First Person",
            "knows": SECOND,
            "colleagues": [{"id": THIRD, "name": "Third Person"}]
        }),
        "Person",
        &schema,
    )
    .unwrap();

    let dataset = to_dataset(&JsonLdDumper::new().dumps(&record, &schema).unwrap());
    assert_eq!(
        dataset.objects(&subject(FIRST), SCHEMA_KNOWS),
        vec![&named(SECOND)]
    );
    assert_eq!(
        dataset.objects(&subject(THIRD), SCHEMA_NAME),
        vec![&string("Third Person")]
    );
}

#[test]
fn dump_writes_file() {
    let path = std::env::temp_dir().join(format!("jelms-dump-{}.jsonld", std::process::id()));
    JsonLdDumper::new()
        .dump(&person(FIRST, "First Person"), &schema(), &path)
        .unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        to_dataset(&text).objects(&subject(FIRST), SCHEMA_NAME),
        vec![&string("First Person")]
    );
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn options_from_configuration() {
    let options: DumpOptions =
        serde_json::from_value(json!({"pretty": true, "cycle_policy": "fail"})).unwrap();
    let text = JsonLdDumper::with_options(options)
        .dumps(&person(FIRST, "First Person"), &schema())
        .unwrap();
    assert!(text.starts_with("{\n"));
}
