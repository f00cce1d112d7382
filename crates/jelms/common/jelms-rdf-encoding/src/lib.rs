//! JSON-LD processing for the jelms dumper.
//!
//! Provides the pieces of the JSON-LD processing model the dumper relies on:
//! context processing, expansion, flattening, and conversion of expanded
//! documents into an RDF [`Dataset`]. Only inline contexts are supported.

pub mod error;
pub mod jsonld;
pub mod model;

pub use error::{RdfError, Result};
pub use model::{
    BlankNode, Dataset, GraphLabel, Literal, NamedNode, Object, Quad, Subject, rdf, xsd,
};

/// Convenience: flatten a compacted JSON-LD document.
///
/// Equivalent to [`jsonld::flatten::flatten`].
pub fn flatten(document: &serde_json::Value) -> Result<serde_json::Value> {
    jsonld::flatten::flatten(document)
}
