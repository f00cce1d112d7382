use crate::error::{Result, SchemaError};

/// Metadata for one field of a class, as seen by the serializer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub is_identifier: bool,
    /// Range name: a class name, or a built-in type such as `string` or `integer`
    pub range: String,
    pub multivalued: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        FieldDescriptor {
            name: name.into(),
            is_identifier: false,
            range: "string".to_string(),
            multivalued: false,
        }
    }

    pub fn identifier(mut self) -> Self {
        self.is_identifier = true;
        self
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = range.into();
        self
    }

    pub fn multivalued(mut self) -> Self {
        self.multivalued = true;
        self
    }
}

/// Answers "which fields does this class have?" for the serializer.
///
/// Implementations are read-only once constructed and may be shared between
/// concurrent serialization calls.
pub trait FieldLookup {
    /// Ordered field list of `class_name`, inherited fields included.
    fn fields_of(&self, class_name: &str) -> Result<Vec<FieldDescriptor>>;

    /// Metadata of one field of `class_name`.
    fn field(&self, class_name: &str, field_name: &str) -> Result<FieldDescriptor> {
        self.fields_of(class_name)?
            .into_iter()
            .find(|f| f.name == field_name)
            .ok_or_else(|| SchemaError::UnknownSlot {
                class: class_name.to_string(),
                slot: field_name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed;

    impl FieldLookup for Fixed {
        fn fields_of(&self, class_name: &str) -> Result<Vec<FieldDescriptor>> {
            match class_name {
                "Thing" => Ok(vec![
                    FieldDescriptor::new("id").identifier(),
                    FieldDescriptor::new("tags").multivalued(),
                ]),
                other => Err(SchemaError::UnresolvableClass(other.to_string())),
            }
        }
    }

    #[test]
    fn field_lookup_by_name() {
        let field = Fixed.field("Thing", "tags").unwrap();
        assert!(field.multivalued);
        assert!(!field.is_identifier);
    }

    #[test]
    fn unknown_field() {
        assert!(matches!(
            Fixed.field("Thing", "nope"),
            Err(SchemaError::UnknownSlot { .. })
        ));
        assert!(matches!(
            Fixed.field("Other", "id"),
            Err(SchemaError::UnresolvableClass(_))
        ));
    }
}
