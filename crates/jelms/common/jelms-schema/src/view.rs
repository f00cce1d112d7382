/*!
 * Read-only view over a loaded schema
 */

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::{
    definition::{ClassDefinition, SchemaDefinition, SlotDefinition},
    error::{Result, SchemaError},
    lookup::{FieldDescriptor, FieldLookup},
};

/// Range used when neither the slot nor the schema names one.
const DEFAULT_RANGE: &str = "string";

/// Imports with this prefix refer to the LinkML built-in type library.
const BUILTIN_IMPORT_PREFIX: &str = "linkml:";

/// A read-only, cheaply cloneable view over a schema.
///
/// Built once per schema and shared across every serialization call.
#[derive(Clone, Debug)]
pub struct SchemaView {
    schema: Arc<SchemaDefinition>,
}

impl SchemaView {
    pub fn new(mut schema: SchemaDefinition) -> Self {
        schema.fill_names();
        SchemaView {
            schema: Arc::new(schema),
        }
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(Self::new(serde_yaml::from_str(yaml)?))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    /// Loads a schema file; `.json` files are read as JSON, anything else as YAML.
    /// Local imports are resolved relative to the file's directory.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut visited = HashSet::new();
        let schema = load_with_imports(path, &mut visited)?;
        debug!(
            path = %path.display(),
            classes = schema.classes.len(),
            slots = schema.slots.len(),
            "loaded schema"
        );
        Ok(Self::new(schema))
    }

    pub fn schema(&self) -> &SchemaDefinition {
        &self.schema
    }

    pub fn get_class(&self, name: &str) -> Option<&ClassDefinition> {
        self.schema.classes.get(name)
    }

    pub fn get_slot(&self, name: &str) -> Option<&SlotDefinition> {
        self.schema.slots.get(name)
    }

    pub fn is_class(&self, name: &str) -> bool {
        self.schema.classes.contains(name)
    }

    /// The class itself followed by its mixins and `is_a` ancestors, depth first.
    pub fn class_ancestors(&self, name: &str) -> Result<Vec<&ClassDefinition>> {
        let mut ancestors = Vec::new();
        let mut path = Vec::new();
        self.collect_ancestors(name, &mut path, &mut ancestors)?;
        Ok(ancestors)
    }

    fn collect_ancestors<'a>(
        &'a self,
        name: &str,
        path: &mut Vec<String>,
        ancestors: &mut Vec<&'a ClassDefinition>,
    ) -> Result<()> {
        if path.iter().any(|p| p == name) {
            return Err(SchemaError::CyclicInheritance(name.to_string()));
        }
        let class = self
            .get_class(name)
            .ok_or_else(|| SchemaError::UnresolvableClass(name.to_string()))?;
        if ancestors.iter().any(|c| c.name == class.name) {
            return Ok(());
        }
        ancestors.push(class);

        path.push(name.to_string());
        for mixin in &class.mixins {
            self.collect_ancestors(mixin, path, ancestors)?;
        }
        if let Some(parent) = &class.is_a {
            self.collect_ancestors(parent, path, ancestors)?;
        }
        path.pop();
        Ok(())
    }

    /// All slots of a class, in declaration order, with `slot_usage` applied.
    pub fn induced_slots(&self, class_name: &str) -> Result<Vec<SlotDefinition>> {
        let ancestors = self.class_ancestors(class_name)?;
        let mut slots: Vec<SlotDefinition> = Vec::new();

        for class in &ancestors {
            let declared = class
                .slots
                .iter()
                .map(|name| {
                    self.get_slot(name)
                        .cloned()
                        .unwrap_or_else(|| SlotDefinition::named(name.as_str()))
                })
                .chain(class.attributes.iter().map(|(_, attr)| attr.clone()));

            for slot in declared {
                if slots.iter().any(|s| s.name == slot.name) {
                    continue;
                }
                // The most specific usage wins
                let refined = ancestors
                    .iter()
                    .find_map(|c| c.slot_usage.get(&slot.name))
                    .map(|usage| slot.refined_by(usage))
                    .unwrap_or(slot);
                slots.push(refined);
            }
        }

        Ok(slots)
    }

    /// Range of a slot, falling back to the schema's `default_range`.
    pub fn slot_range(&self, slot: &SlotDefinition) -> String {
        slot.range
            .clone()
            .or_else(|| self.schema.default_range.clone())
            .unwrap_or_else(|| DEFAULT_RANGE.to_string())
    }

    /// Expands `prefix:suffix` using the schema's prefixes; other values are returned as-is.
    pub fn expand_curie(&self, curie: &str) -> String {
        if curie.contains("://") {
            return curie.to_string();
        }
        match curie.split_once(':') {
            Some((prefix, suffix)) => match self.schema.prefixes.get(prefix) {
                Some(p) => format!("{}{suffix}", p.reference()),
                None => curie.to_string(),
            },
            None => curie.to_string(),
        }
    }

    /// Namespace IRI for elements that declare no explicit URI.
    pub fn default_prefix_iri(&self) -> Option<String> {
        match &self.schema.default_prefix {
            Some(prefix) => match self.schema.prefixes.get(prefix) {
                Some(p) => Some(p.reference().to_string()),
                None if prefix.contains("://") => Some(prefix.clone()),
                None => None,
            },
            None if !self.schema.id.is_empty() => Some(format!("{}/", self.schema.id)),
            None => None,
        }
    }

    pub fn class_uri(&self, class_name: &str) -> Option<String> {
        let class = self.get_class(class_name)?;
        match &class.class_uri {
            Some(uri) => Some(self.expand_curie(uri)),
            None => self
                .default_prefix_iri()
                .map(|ns| format!("{ns}{class_name}")),
        }
    }

    pub fn slot_uri(&self, slot_name: &str) -> Option<String> {
        let explicit = self.get_slot(slot_name).and_then(|s| s.slot_uri.as_ref());
        match explicit {
            Some(uri) => Some(self.expand_curie(uri)),
            None => self
                .default_prefix_iri()
                .map(|ns| format!("{ns}{slot_name}")),
        }
    }
}

impl FieldLookup for SchemaView {
    fn fields_of(&self, class_name: &str) -> Result<Vec<FieldDescriptor>> {
        Ok(self
            .induced_slots(class_name)?
            .into_iter()
            .map(|slot| FieldDescriptor {
                is_identifier: slot.is_identifier(),
                multivalued: slot.is_multivalued(),
                range: self.slot_range(&slot),
                name: slot.name,
            })
            .collect())
    }
}

fn parse_schema_file(path: &Path) -> Result<SchemaDefinition> {
    let text = std::fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => Ok(serde_json::from_str(&text)?),
        _ => Ok(serde_yaml::from_str(&text)?),
    }
}

fn import_path(dir: &Path, import: &str) -> PathBuf {
    let candidate = dir.join(import);
    if candidate.extension().is_some() {
        candidate
    } else {
        dir.join(format!("{import}.yaml"))
    }
}

fn load_with_imports(path: &Path, visited: &mut HashSet<PathBuf>) -> Result<SchemaDefinition> {
    visited.insert(path.to_path_buf());
    let mut schema = parse_schema_file(path)?;
    let dir = path.parent().unwrap_or_else(|| Path::new("."));

    for import in schema.imports.clone() {
        if import.starts_with(BUILTIN_IMPORT_PREFIX) {
            continue;
        }
        let import_file = import_path(dir, &import);
        if visited.contains(&import_file) {
            continue;
        }
        debug!(import = %import, file = %import_file.display(), "resolving schema import");
        let imported = load_with_imports(&import_file, visited)?;
        schema.merge_import(imported);
    }

    Ok(schema)
}
