/*!
 * Document assembly: one record or a collection of records to JSON-LD text
 */

use std::path::Path;

use jelms_schema::{FieldLookup, SchemaContextGenerator, SchemaView};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::{
    annotate::{Scope, annotate_with},
    context::{dedupe_context, generate_context},
    error::Result,
    options::{ContextMode, DumpOptions},
    value::TypedObject,
};

/// What is being serialized.
#[derive(Clone, Copy, Debug)]
pub enum Element<'a> {
    /// One record, written as a single node object
    Single(&'a TypedObject),
    /// An ordered collection, written as a `@graph`
    Collection(&'a [TypedObject]),
}

impl<'a> From<&'a TypedObject> for Element<'a> {
    fn from(object: &'a TypedObject) -> Self {
        Element::Single(object)
    }
}

impl<'a> From<&'a [TypedObject]> for Element<'a> {
    fn from(objects: &'a [TypedObject]) -> Self {
        Element::Collection(objects)
    }
}

impl<'a> From<&'a Vec<TypedObject>> for Element<'a> {
    fn from(objects: &'a Vec<TypedObject>) -> Self {
        Element::Collection(objects.as_slice())
    }
}

/// Serializes typed records to JSON-LD.
///
/// A dumper holds only its options; the schema is passed to every call, so one
/// dumper (and one [`SchemaView`]) can be shared between threads.
#[derive(Clone, Debug, Default)]
pub struct JsonLdDumper {
    options: DumpOptions,
}

impl JsonLdDumper {
    pub fn new() -> Self {
        JsonLdDumper::default()
    }

    pub fn with_options(options: DumpOptions) -> Self {
        JsonLdDumper { options }
    }

    pub fn options(&self) -> &DumpOptions {
        &self.options
    }

    /// Serializes `element` to JSON-LD text.
    /// Example:
    /// ```
    /// use jelms::{JsonLdDumper, TypedObject};
    /// use jelms_schema::SchemaView;
    ///
    /// let schema = SchemaView::from_yaml_str(
    ///     "id: http://example.org/s\nclasses:\n  Person:\n    attributes:\n      id:\n        identifier: true\n      name:\n",
    /// )?;
    /// let person = TypedObject::new("Person")
    ///     .with("id", "http://example.org/first-person")
    ///     .with("name", "First Person");
    ///
    /// let text = JsonLdDumper::new().dumps(&person, &schema)?;
    /// assert!(text.contains(r#""@id":"http://example.org/first-person""#));
    /// # Ok::<(), jelms::JelmsError>(())
    /// ```
    pub fn dumps<'a>(&self, element: impl Into<Element<'a>>, schema: &SchemaView) -> Result<String> {
        let document = self.to_document(element, schema)?;
        self.encode(&document)
    }

    /// Like [`JsonLdDumper::dumps`] but writes the text to `path`.
    pub fn dump<'a>(
        &self,
        element: impl Into<Element<'a>>,
        schema: &SchemaView,
        path: impl AsRef<Path>,
    ) -> Result<()> {
        let text = self.dumps(element, schema)?;
        std::fs::write(path.as_ref(), text)?;
        debug!(path = %path.as_ref().display(), "wrote JSON-LD document");
        Ok(())
    }

    /// Builds the JSON-LD document without encoding it.
    pub fn to_document<'a>(
        &self,
        element: impl Into<Element<'a>>,
        schema: &SchemaView,
    ) -> Result<Value> {
        let context = generate_context(&SchemaContextGenerator::new(schema))?;
        self.serialize_with(element, schema, &context)
    }

    /// Builds the document from any field lookup and an already generated context.
    ///
    /// The context is deduplicated (`@id` aliases removed) before it is embedded.
    pub fn serialize_with<'a>(
        &self,
        element: impl Into<Element<'a>>,
        lookup: &dyn FieldLookup,
        context: &Value,
    ) -> Result<Value> {
        let context = dedupe_context(context);
        let mut scope = Scope::new(lookup).with_cycle_policy(self.options.cycle_policy);
        if self.options.context_mode == ContextMode::PerObject {
            scope = scope.with_node_context(&context);
        }

        match element.into() {
            Element::Single(object) => {
                let record = annotate_with(object, &scope)?;
                let document = match self.options.context_mode {
                    ContextMode::Root => {
                        let mut document = Map::with_capacity(record.len() + 1);
                        document.insert("@context".to_string(), context.clone());
                        document.extend(record);
                        document
                    }
                    ContextMode::PerObject => record,
                };
                debug!(class = object.class_name(), "serialized record");
                Ok(Value::Object(document))
            }
            Element::Collection(objects) => {
                let graph = objects
                    .iter()
                    .map(|object| annotate_with(object, &scope).map(Value::Object))
                    .collect::<Result<Vec<_>>>()?;
                debug!(nodes = graph.len(), "serialized collection");

                let document = match self.options.context_mode {
                    ContextMode::Root => json!({ "@graph": graph, "@context": context }),
                    ContextMode::PerObject => json!({ "@graph": graph }),
                };
                if self.options.flatten {
                    Ok(jelms_rdf_encoding::flatten(&document)?)
                } else {
                    Ok(document)
                }
            }
        }
    }

    fn encode(&self, document: &Value) -> Result<String> {
        if self.options.pretty {
            Ok(serde_json::to_string_pretty(document)?)
        } else {
            Ok(serde_json::to_string(document)?)
        }
    }
}
