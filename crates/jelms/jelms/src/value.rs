/*!
 * Typed records handed to the dumper
 */

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde_json::{Number, Value};

/// A single scalar field value.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl Scalar {
    /// JSON form of the scalar; `None` for floats JSON cannot represent (NaN, infinities).
    pub fn to_json(&self) -> Option<Value> {
        match self {
            Scalar::String(s) => Some(Value::String(s.clone())),
            Scalar::Integer(i) => Some(Value::Number((*i).into())),
            Scalar::Float(f) => Number::from_f64(*f).map(Value::Number),
            Scalar::Boolean(b) => Some(Value::Bool(*b)),
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => f.write_str(s),
            Scalar::Integer(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Boolean(b) => write!(f, "{b}"),
        }
    }
}

/// The value of one field of a [`TypedObject`].
#[derive(Clone, Debug, Default, PartialEq)]
pub enum FieldValue {
    #[default]
    Null,
    Scalar(Scalar),
    /// A nested record, embedded as a node of its own
    Object(Arc<TypedObject>),
    /// Scalars and/or nested records
    Sequence(Vec<FieldValue>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

/// An instance of a schema class: a class name plus named field values.
#[derive(Clone, Debug, PartialEq)]
pub struct TypedObject {
    class_name: String,
    fields: BTreeMap<String, FieldValue>,
}

impl TypedObject {
    pub fn new(class_name: impl Into<String>) -> Self {
        TypedObject {
            class_name: class_name.into(),
            fields: BTreeMap::new(),
        }
    }

    /// Builder-style field assignment.
    /// Example:
    /// ```
    /// use jelms::TypedObject;
    ///
    /// let person = TypedObject::new("Person")
    ///     .with("id", "http://example.org/first-person")
    ///     .with("name", "First Person");
    /// assert_eq!(person.class_name(), "Person");
    /// ```
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(field, value);
        self
    }

    pub fn set(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn class_name(&self) -> &str {
        &self.class_name
    }

    /// Fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl From<Scalar> for FieldValue {
    fn from(value: Scalar) -> Self {
        FieldValue::Scalar(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Scalar(Scalar::String(value.to_string()))
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Scalar(Scalar::String(value))
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Scalar(Scalar::Integer(value))
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Scalar(Scalar::Integer(value.into()))
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Scalar(Scalar::Float(value))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Scalar(Scalar::Boolean(value))
    }
}

impl From<TypedObject> for FieldValue {
    fn from(value: TypedObject) -> Self {
        FieldValue::Object(Arc::new(value))
    }
}

impl From<Arc<TypedObject>> for FieldValue {
    fn from(value: Arc<TypedObject>) -> Self {
        FieldValue::Object(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(value: Vec<T>) -> Self {
        FieldValue::Sequence(value.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversions() {
        let knows = TypedObject::new("Person").with("id", "http://example.org/b");
        let person = TypedObject::new("Person")
            .with("id", "http://example.org/a")
            .with("age", 42)
            .with("nickname", None::<String>)
            .with("tags", vec!["x", "y"])
            .with("knows", knows.clone());

        assert_eq!(
            person.get("age"),
            Some(&FieldValue::Scalar(Scalar::Integer(42)))
        );
        assert!(person.get("nickname").unwrap().is_null());
        assert_eq!(
            person.get("knows"),
            Some(&FieldValue::Object(Arc::new(knows)))
        );
        let names: Vec<&str> = person.fields().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["age", "id", "knows", "nickname", "tags"]);
    }

    #[test]
    fn non_finite_floats_have_no_json_form() {
        assert_eq!(Scalar::Float(f64::NAN).to_json(), None);
        assert_eq!(Scalar::Float(1.5).to_json(), Some(serde_json::json!(1.5)));
        assert_eq!(Scalar::Integer(7).to_string(), "7");
    }
}
