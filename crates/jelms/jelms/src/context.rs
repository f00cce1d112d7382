use jelms_schema::ContextGenerator;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::Result;

const ID_KEYWORD: &str = "@id";

/// Removes context entries that alias a term to `@id`.
///
/// The record's identifier is already written under `@id`, so an alias such as
/// `"id": "@id"` would give the document two keys denoting the identifier.
/// Arrays of contexts are cleaned element by element; remote context references
/// are left untouched.
pub fn dedupe_context(context: &Value) -> Value {
    match context {
        Value::Object(map) => {
            let kept: Map<String, Value> = map
                .iter()
                .filter(|(key, value)| key.as_str() == ID_KEYWORD || value.as_str() != Some(ID_KEYWORD))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect();
            if kept.len() != map.len() {
                debug!(removed = map.len() - kept.len(), "dropped @id aliases from context");
            }
            Value::Object(kept)
        }
        Value::Array(items) => Value::Array(items.iter().map(dedupe_context).collect()),
        other => other.clone(),
    }
}

/// Runs a context generator and returns its mapping ready for embedding.
pub fn generate_context(generator: &dyn ContextGenerator) -> Result<Value> {
    Ok(dedupe_context(&Value::Object(generator.generate()?)))
}
