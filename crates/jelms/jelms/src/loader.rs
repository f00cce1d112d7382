/*!
 * Builds typed records from plain JSON using the schema's slot ranges
 */

use std::collections::HashMap;

use jelms_schema::{FieldDescriptor, FieldLookup, SchemaView};
use serde_json::{Map, Value};
use tracing::debug;

use crate::{
    error::{JelmsError, Result},
    value::{FieldValue, Scalar, TypedObject},
};

/// Reads a JSON object as an instance of `class_name`.
///
/// Objects under a slot whose range is a class become nested records of that
/// class; strings under such a slot stay scalars (references by identifier).
/// Keys starting with `@` are ignored.
/// Example:
/// ```
/// use jelms::load_object;
/// use jelms_schema::SchemaView;
/// use serde_json::json;
///
/// let schema = SchemaView::from_yaml_str(
///     "id: http://example.org/s\nclasses:\n  Person:\n    attributes:\n      id:\n        identifier: true\n      knows:\n        range: Person\n",
/// )?;
/// let person = load_object(
///     &json!({"id": "http://example.org/a", "knows": {"id": "http://example.org/b"}}),
///     "Person",
///     &schema,
/// )?;
/// assert!(person.get("knows").is_some());
/// # Ok::<(), jelms::JelmsError>(())
/// ```
pub fn load_object(json: &Value, class_name: &str, schema: &SchemaView) -> Result<TypedObject> {
    let map = json.as_object().ok_or_else(|| {
        JelmsError::InvalidInput(format!("{class_name} must be read from a JSON object"))
    })?;
    let object = load_map(map, class_name, schema)?;
    debug!(class = class_name, "loaded record from JSON");
    Ok(object)
}

fn load_map(map: &Map<String, Value>, class_name: &str, schema: &SchemaView) -> Result<TypedObject> {
    let fields: HashMap<String, FieldDescriptor> = schema
        .fields_of(class_name)?
        .into_iter()
        .map(|f| (f.name.clone(), f))
        .collect();

    let mut object = TypedObject::new(class_name);
    for (key, value) in map {
        if key.starts_with('@') {
            continue;
        }
        let range = fields
            .get(key)
            .map(|f| f.range.as_str())
            .filter(|range| schema.is_class(range));
        let loaded = load_value(value, range, class_name, key, schema)?;
        object.set(key.as_str(), loaded);
    }
    Ok(object)
}

fn load_value(
    value: &Value,
    class_range: Option<&str>,
    class_name: &str,
    field: &str,
    schema: &SchemaView,
) -> Result<FieldValue> {
    match value {
        Value::Null => Ok(FieldValue::Null),
        Value::Bool(b) => Ok(Scalar::Boolean(*b).into()),
        Value::String(s) => Ok(Scalar::String(s.clone()).into()),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => Ok(Scalar::Integer(i).into()),
            (None, Some(f)) => Ok(Scalar::Float(f).into()),
            (None, None) => Err(JelmsError::unsupported(
                class_name,
                field,
                format!("number {n} does not fit an integer or a float"),
            )),
        },
        Value::Object(nested) => match class_range {
            Some(range) => Ok(load_map(nested, range, schema)?.into()),
            None => Err(JelmsError::InvalidInput(format!(
                "{class_name}.{field} holds an object but its range is not a class"
            ))),
        },
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Array(_) => Err(JelmsError::unsupported(
                    class_name,
                    field,
                    "sequences cannot directly contain sequences",
                )),
                _ => load_value(item, class_range, class_name, field, schema),
            })
            .collect::<Result<Vec<_>>>()
            .map(FieldValue::Sequence),
    }
}
