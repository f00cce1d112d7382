/*!
 * JSON-LD context generation from a schema
 */

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::{definition::SlotDefinition, error::Result, view::SchemaView};

const XSD_PREFIX: &str = "xsd";
const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

/// Produces the `@context` mapping (term -> IRI or expanded term definition) for a schema.
pub trait ContextGenerator {
    fn generate(&self) -> Result<Map<String, Value>>;
}

/// Context generator driven by a [`SchemaView`].
///
/// Emits the schema prefixes, an `@vocab` for the default prefix, one entry per
/// slot and one per class with an explicit `class_uri`. Identifier slots are
/// emitted as plain `"<slot>": "@id"` aliases.
pub struct SchemaContextGenerator<'a> {
    view: &'a SchemaView,
}

impl<'a> SchemaContextGenerator<'a> {
    pub fn new(view: &'a SchemaView) -> Self {
        SchemaContextGenerator { view }
    }

    /// Type coercion for a slot's range, if the range needs one.
    fn coercion(&self, slot: &SlotDefinition) -> Option<String> {
        let range = self.view.slot_range(slot);
        if self.view.is_class(&range) {
            return Some("@id".to_string());
        }
        let xsd = match range.as_str() {
            "uri" | "uriorcurie" => return Some("@id".to_string()),
            "integer" => "integer",
            "float" => "float",
            "double" => "double",
            "decimal" => "decimal",
            "boolean" => "boolean",
            "date" => "date",
            "datetime" => "dateTime",
            _ => return None,
        };
        Some(format!("{XSD_PREFIX}:{xsd}"))
    }

    fn slot_term(&self, slot: &SlotDefinition) -> Option<Value> {
        if slot.is_identifier() {
            return Some(json!("@id"));
        }
        let mut term = Map::new();
        if let Some(uri) = &slot.slot_uri {
            term.insert("@id".to_string(), json!(uri));
        }
        if let Some(coercion) = self.coercion(slot) {
            term.insert("@type".to_string(), json!(coercion));
        }
        // Nothing to say: the term resolves through @vocab
        (!term.is_empty()).then_some(Value::Object(term))
    }
}

impl ContextGenerator for SchemaContextGenerator<'_> {
    fn generate(&self) -> Result<Map<String, Value>> {
        let schema = self.view.schema();
        let mut context = Map::new();

        context.insert(XSD_PREFIX.to_string(), json!(XSD_NAMESPACE));
        for (name, prefix) in &schema.prefixes {
            context.insert(name.clone(), json!(prefix.reference()));
        }
        if let Some(vocab) = self.view.default_prefix_iri() {
            context.insert("@vocab".to_string(), json!(vocab));
        }

        let attributes = schema
            .classes
            .iter()
            .flat_map(|(_, class)| class.attributes.iter());
        for (name, slot) in schema.slots.iter().chain(attributes) {
            if context.contains_key(name) {
                continue;
            }
            if let Some(term) = self.slot_term(slot) {
                context.insert(name.to_string(), term);
            }
        }

        for (name, class) in schema.classes.iter() {
            if let Some(uri) = &class.class_uri {
                context.insert(name.to_string(), json!({ "@id": uri }));
            }
        }

        debug!(terms = context.len(), "generated JSON-LD context");
        Ok(context)
    }
}
