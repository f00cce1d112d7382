/*!
 * Serde model of the LinkML schema subset understood by jelms
 */

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Name-keyed definitions that keep the order in which the schema declares them.
///
/// LinkML allows a definition body to be omitted (`Person:` with no content),
/// which deserializes to the default definition.
#[derive(Clone, Debug, PartialEq)]
pub struct Definitions<T> {
    entries: Vec<(String, T)>,
}

impl<T> Default for Definitions<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> Definitions<T> {
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Adds a definition; an existing definition with the same name is kept.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, value: T) {
        let name = name.into();
        if !self.contains(&name) {
            self.entries.push((name, value));
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn values_mut(&mut self) -> impl Iterator<Item = (&str, &mut T)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }
}

impl<T> FromIterator<(String, T)> for Definitions<T> {
    fn from_iter<I: IntoIterator<Item = (String, T)>>(iter: I) -> Self {
        let mut defs = Definitions::default();
        for (name, value) in iter {
            defs.insert_if_absent(name, value);
        }
        defs
    }
}

struct DefinitionsVisitor<T>(PhantomData<T>);

impl<'de, T> Visitor<'de> for DefinitionsVisitor<T>
where
    T: Deserialize<'de> + Default,
{
    type Value = Definitions<T>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a mapping of names to definitions")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut defs = Definitions::default();
        while let Some((name, value)) = access.next_entry::<String, Option<T>>()? {
            defs.entries.push((name, value.unwrap_or_default()));
        }
        Ok(defs)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E> {
        Ok(Definitions::default())
    }
}

impl<'de, T> Deserialize<'de> for Definitions<T>
where
    T: Deserialize<'de> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(DefinitionsVisitor(PhantomData))
    }
}

/// A prefix declaration, either `schema: http://schema.org/` or the expanded
/// `{prefix_prefix, prefix_reference}` form.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Prefix {
    Reference(String),
    Expanded {
        #[serde(default)]
        prefix_prefix: Option<String>,
        prefix_reference: String,
    },
}

impl Prefix {
    pub fn reference(&self) -> &str {
        match self {
            Prefix::Reference(iri) => iri,
            Prefix::Expanded {
                prefix_reference, ..
            } => prefix_reference,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct SchemaDefinition {
    pub id: String,
    pub name: Option<String>,
    pub description: Option<String>,
    pub prefixes: BTreeMap<String, Prefix>,
    pub default_prefix: Option<String>,
    pub default_range: Option<String>,
    pub imports: Vec<String>,
    pub classes: Definitions<ClassDefinition>,
    pub slots: Definitions<SlotDefinition>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassDefinition {
    pub name: String,
    pub description: Option<String>,
    pub class_uri: Option<String>,
    pub is_a: Option<String>,
    pub mixins: Vec<String>,
    pub slots: Vec<String>,
    pub attributes: Definitions<SlotDefinition>,
    pub slot_usage: Definitions<SlotDefinition>,
    #[serde(rename = "abstract")]
    pub abstract_: bool,
    pub mixin: bool,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct SlotDefinition {
    pub name: String,
    pub description: Option<String>,
    pub slot_uri: Option<String>,
    pub range: Option<String>,
    pub identifier: Option<bool>,
    pub multivalued: Option<bool>,
    pub required: Option<bool>,
}

impl SlotDefinition {
    pub fn named(name: impl Into<String>) -> Self {
        SlotDefinition {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_identifier(&self) -> bool {
        self.identifier.unwrap_or(false)
    }

    pub fn is_multivalued(&self) -> bool {
        self.multivalued.unwrap_or(false)
    }

    /// Applies a `slot_usage` refinement: every property the usage sets wins.
    pub fn refined_by(&self, usage: &SlotDefinition) -> SlotDefinition {
        SlotDefinition {
            name: self.name.clone(),
            description: usage.description.clone().or_else(|| self.description.clone()),
            slot_uri: usage.slot_uri.clone().or_else(|| self.slot_uri.clone()),
            range: usage.range.clone().or_else(|| self.range.clone()),
            identifier: usage.identifier.or(self.identifier),
            multivalued: usage.multivalued.or(self.multivalued),
            required: usage.required.or(self.required),
        }
    }
}

impl SchemaDefinition {
    /// Copies map keys into the `name` field of definitions that omit it.
    pub(crate) fn fill_names(&mut self) {
        for (name, class) in self.classes.values_mut() {
            if class.name.is_empty() {
                class.name = name.to_string();
            }
            for (attr_name, attr) in class.attributes.values_mut() {
                if attr.name.is_empty() {
                    attr.name = attr_name.to_string();
                }
            }
            for (usage_name, usage) in class.slot_usage.values_mut() {
                if usage.name.is_empty() {
                    usage.name = usage_name.to_string();
                }
            }
        }
        for (name, slot) in self.slots.values_mut() {
            if slot.name.is_empty() {
                slot.name = name.to_string();
            }
        }
    }

    /// Merges an imported schema; definitions already present here win.
    pub(crate) fn merge_import(&mut self, imported: SchemaDefinition) {
        for (prefix, value) in imported.prefixes {
            self.prefixes.entry(prefix).or_insert(value);
        }
        for (name, class) in imported.classes.entries {
            self.classes.insert_if_absent(name, class);
        }
        for (name, slot) in imported.slots.entries {
            self.slots.insert_if_absent(name, slot);
        }
    }
}
