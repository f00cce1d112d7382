/*!
 * Errors returned by the JSON-LD dumper
 */

use jelms_rdf_encoding::RdfError;
use jelms_schema::SchemaError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum JelmsError {
    /// Schema lookups failed or the schema cannot describe the record (no identifier)
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A field holds a value JSON-LD cannot express
    #[error("Unsupported value for {class}.{field}: {reason}")]
    UnsupportedValue {
        class: String,
        field: String,
        reason: String,
    },

    /// A record embeds one of its own ancestors and the cycle policy forbids back-references
    #[error("Cyclic reference to {id}")]
    CyclicReference { id: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("JSON-LD processing error: {0}")]
    JsonLd(#[from] RdfError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, JelmsError>;

impl JelmsError {
    pub(crate) fn unsupported(
        class: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        JelmsError::UnsupportedValue {
            class: class.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }
}
