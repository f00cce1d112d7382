pub mod context;
pub mod expand;
pub mod flatten;
pub mod to_rdf;

use serde_json::Value;

use crate::error::Result;
use crate::model::Dataset;

/// Expand a JSON-LD document and convert it to an RDF Dataset.
///
/// Processes every inline `@context`, expands all terms to full IRIs and
/// converts the expanded form to RDF quads. Named graphs are preserved; a
/// top-level `@graph` wrapper contributes its nodes to the default graph.
pub fn expand_and_to_rdf(document: &Value) -> Result<Dataset> {
    let expanded = expand::expand_document(document)?;
    tracing::debug!(expanded = %expanded, "JSON-LD expanded form");
    to_rdf::to_rdf(&expanded)
}
