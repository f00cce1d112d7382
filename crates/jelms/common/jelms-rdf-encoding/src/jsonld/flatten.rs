use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value, json};

use super::expand::expand_document;
use crate::error::{RdfError, Result};

/// Flatten a JSON-LD document.
///
/// The document is expanded, then every node object (top level or embedded) is
/// collected into a single node map keyed by `@id`. Embedded nodes are replaced
/// by `{"@id": ...}` references, nodes sharing an `@id` are merged, and nodes
/// without an identifier receive fresh blank node labels.
///
/// Returns `{"@graph": [...]}` holding the expanded node objects ordered by `@id`.
/// Nodes that carry nothing but their `@id` are omitted.
pub fn flatten(document: &Value) -> Result<Value> {
    let expanded = expand_document(document)?;
    let items = expanded
        .as_array()
        .ok_or_else(|| RdfError::flatten("expanded JSON-LD must be an array"))?;

    let mut node_map = NodeMap::default();
    for item in items {
        if let Some(node) = item.as_object()
            && !node.contains_key("@value")
        {
            node_map.add_node(node)?;
        }
    }

    let nodes = node_map.into_nodes();
    tracing::debug!(nodes = nodes.len(), "flattened JSON-LD document");
    Ok(json!({ "@graph": nodes }))
}

/// Issues `_:bN` labels, relabelling existing blank node identifiers consistently.
#[derive(Default)]
struct BlankNodeIssuer {
    counter: u64,
    issued: HashMap<String, String>,
}

impl BlankNodeIssuer {
    fn issue(&mut self, existing: Option<&str>) -> String {
        if let Some(label) = existing
            && let Some(issued) = self.issued.get(label)
        {
            return issued.clone();
        }
        let label = format!("_:b{}", self.counter);
        self.counter += 1;
        if let Some(existing) = existing {
            self.issued.insert(existing.to_string(), label.clone());
        }
        label
    }
}

#[derive(Default)]
struct NodeMap {
    nodes: BTreeMap<String, Map<String, Value>>,
    issuer: BlankNodeIssuer,
}

impl NodeMap {
    fn node_id(&mut self, node: &Map<String, Value>) -> Result<String> {
        match node.get("@id") {
            None => Ok(self.issuer.issue(None)),
            Some(Value::String(id)) if id.starts_with("_:") => Ok(self.issuer.issue(Some(id))),
            Some(Value::String(id)) => Ok(id.clone()),
            Some(other) => Err(RdfError::flatten(format!("@id must be a string: {other}"))),
        }
    }

    /// Adds a node and everything embedded in it; returns the node's identifier.
    fn add_node(&mut self, node: &Map<String, Value>) -> Result<String> {
        let id = self.node_id(node)?;
        self.nodes
            .entry(id.clone())
            .or_insert_with(|| Map::from_iter([("@id".to_string(), json!(id))]));

        for (key, value) in node {
            match key.as_str() {
                "@id" => {}
                "@type" => {
                    let types = self.flatten_types(value)?;
                    self.merge(&id, "@type", types);
                }
                "@graph" => {
                    // Named graph members are merged into the default graph
                    for member in value.as_array().into_iter().flatten() {
                        if let Some(member) = member.as_object() {
                            self.add_node(member)?;
                        }
                    }
                }
                k if k.starts_with('@') => {}
                property => {
                    let mut flattened = Vec::new();
                    for item in value.as_array().into_iter().flatten() {
                        flattened.push(self.flatten_value(item)?);
                    }
                    self.merge(&id, property, flattened);
                }
            }
        }

        Ok(id)
    }

    fn flatten_types(&mut self, value: &Value) -> Result<Vec<Value>> {
        let types = value
            .as_array()
            .ok_or_else(|| RdfError::flatten(format!("@type must be an array: {value}")))?;
        Ok(types
            .iter()
            .filter_map(|t| t.as_str())
            .map(|t| {
                if t.starts_with("_:") {
                    json!(self.issuer.issue(Some(t)))
                } else {
                    json!(t)
                }
            })
            .collect())
    }

    /// Replaces embedded nodes with references, recursing into lists.
    fn flatten_value(&mut self, value: &Value) -> Result<Value> {
        let Some(obj) = value.as_object() else {
            return Err(RdfError::flatten(format!(
                "expanded property value must be an object: {value}"
            )));
        };

        if obj.contains_key("@value") {
            return Ok(value.clone());
        }

        if let Some(list) = obj.get("@list") {
            let mut items = Vec::new();
            for item in list.as_array().into_iter().flatten() {
                items.push(self.flatten_value(item)?);
            }
            return Ok(json!({ "@list": items }));
        }

        let id = self.add_node(obj)?;
        Ok(json!({ "@id": id }))
    }

    fn merge(&mut self, id: &str, key: &str, values: Vec<Value>) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        let entry = node
            .entry(key.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(existing) = entry {
            for value in values {
                // Lists are never merged with each other
                if value.get("@list").is_some() || !existing.contains(&value) {
                    existing.push(value);
                }
            }
        }
    }

    fn into_nodes(self) -> Vec<Value> {
        self.nodes
            .into_values()
            .filter(|node| !(node.len() == 1 && node.contains_key("@id")))
            .map(Value::Object)
            .collect()
    }
}
