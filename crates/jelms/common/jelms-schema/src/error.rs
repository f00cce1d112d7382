/*!
 * Schema loading and lookup errors
 */

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    /// The class declares no identifier slot, so its instances have no `@id`
    #[error("Class {class} has no identifier, so it cannot be serialized to JSON-LD")]
    MissingIdentifier { class: String },

    #[error("Unresolvable class: {0}")]
    UnresolvableClass(String),

    #[error("Class {class} has no slot named '{slot}'")]
    UnknownSlot { class: String, slot: String },

    #[error("Cyclic class hierarchy involving {0}")]
    CyclicInheritance(String),

    #[error("Schema parse error: {0}")]
    Parse(String),

    #[error("Schema I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SchemaError>;

impl From<serde_yaml::Error> for SchemaError {
    fn from(error: serde_yaml::Error) -> Self {
        SchemaError::Parse(error.to_string())
    }
}

impl From<serde_json::Error> for SchemaError {
    fn from(error: serde_json::Error) -> Self {
        SchemaError::Parse(error.to_string())
    }
}
