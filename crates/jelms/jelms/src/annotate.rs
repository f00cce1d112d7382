/*!
 * Identifier and type annotation of typed records
 *
 * Turns a [`TypedObject`] into a JSON-LD node object: the class's identifier
 * field becomes `@id`, the class name becomes `@type`, nested records become
 * embedded node objects and empty values are dropped at every level.
 */

use jelms_schema::{FieldDescriptor, FieldLookup, SchemaError};
use serde_json::{Map, Value, json};
use tracing::{debug, warn};

use crate::{
    error::{JelmsError, Result},
    options::CyclePolicy,
    value::{FieldValue, TypedObject},
};

/// Everything a single annotation pass needs, passed explicitly down the recursion.
#[derive(Clone, Copy)]
pub struct Scope<'a> {
    pub lookup: &'a dyn FieldLookup,
    /// Context attached to every node (per-object context mode)
    pub node_context: Option<&'a Value>,
    pub cycle_policy: CyclePolicy,
}

impl<'a> Scope<'a> {
    pub fn new(lookup: &'a dyn FieldLookup) -> Self {
        Scope {
            lookup,
            node_context: None,
            cycle_policy: CyclePolicy::default(),
        }
    }

    pub fn with_node_context(mut self, context: &'a Value) -> Self {
        self.node_context = Some(context);
        self
    }

    pub fn with_cycle_policy(mut self, cycle_policy: CyclePolicy) -> Self {
        self.cycle_policy = cycle_policy;
        self
    }
}

/// Annotate one record: `@id` from its identifier field, `@type` from its class.
///
/// Fails with [`SchemaError::MissingIdentifier`] when the class (or any nested
/// record's class) has no identifier field.
pub fn annotate(object: &TypedObject, lookup: &dyn FieldLookup) -> Result<Map<String, Value>> {
    annotate_with(object, &Scope::new(lookup))
}

/// [`annotate`] with explicit context and cycle handling.
pub fn annotate_with(object: &TypedObject, scope: &Scope<'_>) -> Result<Map<String, Value>> {
    let mut path = Vec::new();
    let node = annotate_node(object, scope, &mut path)?;
    Ok(remove_empty_map(node))
}

/// `path` holds the identifiers of the records currently being embedded.
fn annotate_node(
    object: &TypedObject,
    scope: &Scope<'_>,
    path: &mut Vec<String>,
) -> Result<Map<String, Value>> {
    let class = object.class_name();
    let fields = scope.lookup.fields_of(class)?;
    let id_field = fields
        .iter()
        .find(|f| f.is_identifier)
        .ok_or_else(|| SchemaError::MissingIdentifier {
            class: class.to_string(),
        })?;
    let id = identifier(object, id_field)?;

    if !id.is_empty() && path.contains(&id) {
        return match scope.cycle_policy {
            CyclePolicy::Reference => {
                warn!(id = %id, class, "cyclic embedding replaced by node reference");
                Ok(Map::from_iter([("@id".to_string(), json!(id))]))
            }
            CyclePolicy::Fail => Err(JelmsError::CyclicReference { id }),
        };
    }

    let mut record = Map::new();
    if let Some(context) = scope.node_context {
        record.insert("@context".to_string(), context.clone());
    }
    record.insert("@id".to_string(), json!(id));
    record.insert("@type".to_string(), json!(class));

    path.push(id);
    for field in fields.iter().filter(|f| f.name != id_field.name) {
        if let Some(value) = object.get(&field.name) {
            let encoded = encode_value(value, class, &field.name, scope, path)?;
            record.insert(field.name.clone(), encoded);
        }
    }
    // Fields the class does not declare are kept after the declared ones
    for (name, value) in object.fields() {
        if name.starts_with('@') {
            return Err(JelmsError::unsupported(
                class,
                name,
                "field names may not be JSON-LD keywords",
            ));
        }
        if !fields.iter().any(|f| f.name == name) {
            let encoded = encode_value(value, class, name, scope, path)?;
            record.insert(name.to_string(), encoded);
        }
    }
    path.pop();

    debug!(class, fields = record.len(), "annotated record");
    Ok(record)
}

fn identifier(object: &TypedObject, field: &FieldDescriptor) -> Result<String> {
    match object.get(&field.name) {
        None | Some(FieldValue::Null) => {
            warn!(
                class = object.class_name(),
                field = %field.name,
                "record has no identifier value; emitting empty @id"
            );
            Ok(String::new())
        }
        Some(FieldValue::Scalar(scalar)) => match scalar.to_json() {
            Some(_) => Ok(scalar.to_string()),
            None => Err(JelmsError::unsupported(
                object.class_name(),
                &field.name,
                "identifier is not a finite number",
            )),
        },
        Some(FieldValue::Object(_) | FieldValue::Sequence(_)) => Err(JelmsError::unsupported(
            object.class_name(),
            &field.name,
            "identifier must be a scalar",
        )),
    }
}

fn encode_value(
    value: &FieldValue,
    class: &str,
    field: &str,
    scope: &Scope<'_>,
    path: &mut Vec<String>,
) -> Result<Value> {
    match value {
        FieldValue::Null => Ok(Value::Null),
        FieldValue::Scalar(scalar) => scalar
            .to_json()
            .ok_or_else(|| JelmsError::unsupported(class, field, format!("{scalar} has no JSON form"))),
        FieldValue::Object(nested) => Ok(Value::Object(annotate_node(nested, scope, path)?)),
        FieldValue::Sequence(items) => {
            let mut encoded = Vec::with_capacity(items.len());
            for item in items {
                if let FieldValue::Sequence(_) = item {
                    return Err(JelmsError::unsupported(
                        class,
                        field,
                        "sequences cannot directly contain sequences",
                    ));
                }
                encoded.push(encode_value(item, class, field, scope, path)?);
            }
            Ok(Value::Array(encoded))
        }
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Recursively drops `null`, `[]` and `{}` values. `@context` values are left as given.
pub fn remove_empty(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(remove_empty_map(map)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(remove_empty)
                .filter(|v| !is_empty(v))
                .collect(),
        ),
        other => other,
    }
}

fn remove_empty_map(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .filter_map(|(key, value)| {
            if key == "@context" {
                return Some((key, value));
            }
            let value = remove_empty(value);
            (!is_empty(&value)).then_some((key, value))
        })
        .collect()
}
