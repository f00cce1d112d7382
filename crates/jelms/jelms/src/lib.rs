/*!
 * Identifier-aware JSON-LD serialization of schema-typed records.
 *
 * A record's identifier field becomes `@id`, its class becomes `@type`, nested
 * records are embedded as node objects and empty values are dropped. The
 * JSON-LD context is generated from the schema and attached at the document
 * root or on every node. Collections are written as a `@graph` and can be
 * flattened.
 */

pub mod annotate;
pub mod context;
pub mod dumper;
pub mod error;
pub mod loader;
pub mod options;
pub mod value;

pub use annotate::{annotate, remove_empty};
pub use context::{dedupe_context, generate_context};
pub use dumper::{Element, JsonLdDumper};
pub use error::{JelmsError, Result};
pub use loader::load_object;
pub use options::{ContextMode, CyclePolicy, DumpOptions, DumpOptionsBuilder};
pub use value::{FieldValue, Scalar, TypedObject};
