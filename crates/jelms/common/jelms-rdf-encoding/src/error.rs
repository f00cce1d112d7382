use std::fmt;

/// Errors that can occur during JSON-LD and RDF processing.
#[derive(Debug, thiserror::Error)]
pub enum RdfError {
    #[error("JSON-LD expansion error: {0}")]
    JsonLdExpansionError(String),

    #[error("Context error: {0}")]
    ContextError(String),

    #[error("JSON-LD flattening error: {0}")]
    FlattenError(String),

    #[error("To-RDF conversion error: {0}")]
    ToRdfError(String),

    #[error("Invalid IRI: {0}")]
    InvalidIri(String),
}

/// Result type alias for RDF operations.
pub type Result<T> = std::result::Result<T, RdfError>;

impl RdfError {
    pub fn expansion(msg: impl fmt::Display) -> Self {
        Self::JsonLdExpansionError(msg.to_string())
    }

    pub fn context(msg: impl fmt::Display) -> Self {
        Self::ContextError(msg.to_string())
    }

    pub fn flatten(msg: impl fmt::Display) -> Self {
        Self::FlattenError(msg.to_string())
    }

    pub fn to_rdf(msg: impl fmt::Display) -> Self {
        Self::ToRdfError(msg.to_string())
    }
}
