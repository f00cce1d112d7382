//! Schema model and schema-derived services for the jelms JSON-LD dumper.

pub mod context;
pub mod definition;
pub mod error;
pub mod lookup;
pub mod view;

pub use context::{ContextGenerator, SchemaContextGenerator};
pub use definition::{ClassDefinition, Definitions, Prefix, SchemaDefinition, SlotDefinition};
pub use error::{Result, SchemaError};
pub use lookup::{FieldDescriptor, FieldLookup};
pub use view::SchemaView;
