/*!
 * Dumper configuration options
 */

use serde::Deserialize;

/// Where the JSON-LD context is attached.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ContextMode {
    /// Once, as `@context` on the document root
    #[default]
    Root,
    /// On every node object, embedded nodes included.
    ///
    /// A collection is then written as `{"@graph": [...]}` with no root
    /// `@context`, since each graph node already carries its own.
    PerObject,
}

/// What to do when a record embeds a node that is already being serialized
/// further up the same embedding path (same `@id`).
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum CyclePolicy {
    /// Emit a `{"@id": ...}` node reference instead of embedding again
    #[default]
    Reference,
    /// Fail with [`crate::JelmsError::CyclicReference`]
    Fail,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DumpOptions {
    pub flatten: bool,
    pub context_mode: ContextMode,
    pub cycle_policy: CyclePolicy,
    pub pretty: bool,
}

impl DumpOptions {
    /// Returns a builder for `DumpOptions`
    /// Example:
    /// ```
    /// use jelms::DumpOptions;
    ///
    /// let options = DumpOptions::builder().build();
    /// ```
    pub fn builder() -> DumpOptionsBuilder {
        DumpOptionsBuilder::default()
    }
}

/// Builder for `DumpOptions`.
/// Example:
/// ```
/// use jelms::{ContextMode, DumpOptions};
///
/// let options = DumpOptions::builder()
///     .with_flatten(true)
///     .with_context_mode(ContextMode::Root)
///     .build();
/// assert!(options.flatten);
/// ```
#[derive(Default)]
pub struct DumpOptionsBuilder {
    /// Flatten collections through the JSON-LD flattening algorithm
    /// Default: false
    flatten: bool,

    /// Default: `ContextMode::Root`
    context_mode: ContextMode,

    /// Default: `CyclePolicy::Reference`
    cycle_policy: CyclePolicy,

    /// Indent the JSON text
    /// Default: false
    pretty: bool,
}

impl DumpOptionsBuilder {
    pub fn new() -> DumpOptionsBuilder {
        DumpOptionsBuilder::default()
    }

    pub fn build(self) -> DumpOptions {
        DumpOptions {
            flatten: self.flatten,
            context_mode: self.context_mode,
            cycle_policy: self.cycle_policy,
            pretty: self.pretty,
        }
    }

    /// Run collections through JSON-LD flattening before encoding.
    /// Single records are never flattened.
    pub fn with_flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }

    pub fn with_context_mode(mut self, context_mode: ContextMode) -> Self {
        self.context_mode = context_mode;
        self
    }

    pub fn with_cycle_policy(mut self, cycle_policy: CyclePolicy) -> Self {
        self.cycle_policy = cycle_policy;
        self
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}
