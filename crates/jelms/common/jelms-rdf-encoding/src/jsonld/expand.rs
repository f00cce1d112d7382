use serde_json::{Map, Value, json};
use tracing::trace;

use super::context::{Context, is_absolute_iri};
use crate::error::{RdfError, Result};

/// Expands a JSON-LD document.
///
/// Every term becomes a full IRI, every property value an array, and every
/// `@context` (including contexts embedded on nested nodes) is applied and
/// removed. A top-level object that only wraps a `@graph` expands to the
/// graph's nodes.
pub fn expand_document(document: &Value) -> Result<Value> {
    match expand_element(document, &Context::default())? {
        Value::Null => Ok(json!([])),
        Value::Array(nodes) => Ok(Value::Array(nodes)),
        Value::Object(mut node) if node.len() == 1 && node.contains_key("@graph") => {
            Ok(node.remove("@graph").unwrap_or_else(|| json!([])))
        }
        node => Ok(json!([node])),
    }
}

fn expand_element(element: &Value, context: &Context) -> Result<Value> {
    match element {
        Value::Array(items) => {
            let mut nodes = Vec::with_capacity(items.len());
            for item in items {
                match expand_element(item, context)? {
                    Value::Null => {}
                    Value::Array(inner) => nodes.extend(inner),
                    node => nodes.push(node),
                }
            }
            Ok(Value::Array(nodes))
        }
        Value::Object(map) => expand_object(map, context),
        // Free-floating scalars carry no triples
        _ => Ok(Value::Null),
    }
}

/// Expands the members of a property value array, splicing nested arrays and dropping nulls.
fn expand_items(items: &[Value], context: &Context, coercion: Option<&str>) -> Result<Vec<Value>> {
    let mut expanded = Vec::with_capacity(items.len());
    for item in items {
        match expand_value(item, coercion, context)? {
            Value::Null => {}
            Value::Array(inner) => expanded.extend(inner),
            other => expanded.push(other),
        }
    }
    Ok(expanded)
}

/// The keyword a key stands for, directly or through an alias such as `"id": "@id"`.
fn keyword_of<'a>(key: &'a str, context: &'a Context) -> Option<&'a str> {
    if key.starts_with('@') {
        return Some(key);
    }
    context
        .get_term(key)
        .map(|definition| definition.iri.as_str())
        .filter(|iri| iri.starts_with('@'))
}

fn expand_object(map: &Map<String, Value>, parent: &Context) -> Result<Value> {
    let local;
    let context = match map.get("@context") {
        Some(embedded) => {
            let mut merged = parent.clone();
            merged.process(embedded)?;
            local = merged;
            &local
        }
        None => parent,
    };

    if map.contains_key("@value") {
        return expand_value_object(map, context);
    }
    if let Some(list) = map.get("@list") {
        let items = list.as_array().map(Vec::as_slice).unwrap_or(std::slice::from_ref(list));
        return Ok(json!({ "@list": expand_items(items, context, None)? }));
    }

    let mut node = Map::new();
    for (key, value) in map {
        match keyword_of(key, context) {
            Some("@id") => {
                let id = value
                    .as_str()
                    .ok_or_else(|| RdfError::expansion(format!("@id must be a string: {value}")))?;
                node.insert("@id".to_string(), json!(expand_id(id, context)));
            }
            Some("@type") => {
                node.insert("@type".to_string(), expand_types(value, context)?);
            }
            Some("@graph") => {
                let members = match expand_element(value, context)? {
                    Value::Array(members) => members,
                    Value::Null => Vec::new(),
                    member => vec![member],
                };
                node.insert("@graph".to_string(), Value::Array(members));
            }
            Some(_) => {}
            None => expand_property(&mut node, key, value, context)?,
        }
    }

    if node.is_empty() {
        return Ok(Value::Null);
    }
    Ok(Value::Object(node))
}

fn expand_property(
    node: &mut Map<String, Value>,
    term: &str,
    value: &Value,
    context: &Context,
) -> Result<()> {
    let Some(iri) = context.expand_iri(term).filter(|iri| is_absolute_iri(iri)) else {
        trace!(term, "dropping unmapped term");
        return Ok(());
    };
    let coercion = context
        .get_term(term)
        .and_then(|definition| definition.type_mapping.as_deref());

    let values = match value {
        Value::Array(items) => expand_items(items, context, coercion)?,
        single => match expand_value(single, coercion, context)? {
            Value::Null => return Ok(()),
            expanded => vec![expanded],
        },
    };
    if values.is_empty() {
        return Ok(());
    }

    match node.get_mut(&iri) {
        Some(Value::Array(existing)) => existing.extend(values),
        _ => {
            node.insert(iri, Value::Array(values));
        }
    }
    Ok(())
}

/// Expands a node identifier. Compact IRIs use the context's prefixes, relative
/// ones its `@base`; `@vocab` never applies to identifiers.
fn expand_id(id: &str, context: &Context) -> String {
    if id.starts_with("_:") || is_absolute_iri(id) {
        return id.to_string();
    }
    if let Some((prefix, suffix)) = id.split_once(':')
        && let Some(definition) = context.get_term(prefix)
    {
        return format!("{}{suffix}", definition.iri);
    }
    match &context.base {
        Some(base) => format!("{base}{id}"),
        None => id.to_string(),
    }
}

fn expand_types(value: &Value, context: &Context) -> Result<Value> {
    let names: Vec<&str> = match value {
        Value::String(name) => vec![name.as_str()],
        Value::Array(names) => names.iter().filter_map(Value::as_str).collect(),
        other => return Err(RdfError::expansion(format!("invalid @type value: {other}"))),
    };
    Ok(names
        .into_iter()
        .map(|name| {
            context
                .expand_iri(name)
                .filter(|iri| is_absolute_iri(iri))
                .unwrap_or_else(|| name.to_string())
        })
        .collect())
}

fn expand_value_object(map: &Map<String, Value>, context: &Context) -> Result<Value> {
    let mut expanded = Map::new();
    if let Some(value) = map.get("@value") {
        if value.is_array() || value.is_object() {
            return Err(RdfError::expansion(format!("invalid @value: {value}")));
        }
        expanded.insert("@value".to_string(), value.clone());
    }
    if let Some(datatype) = map.get("@type").and_then(Value::as_str) {
        let iri = context.expand_iri(datatype).unwrap_or_else(|| datatype.to_string());
        expanded.insert("@type".to_string(), json!(iri));
    }
    if let Some(language) = map.get("@language") {
        expanded.insert("@language".to_string(), language.clone());
    }
    Ok(Value::Object(expanded))
}

/// Expands one property value under the term's type coercion.
fn expand_value(value: &Value, coercion: Option<&str>, context: &Context) -> Result<Value> {
    match (value, coercion) {
        (Value::Null, _) => Ok(Value::Null),
        (Value::Object(map), _) => expand_object(map, context),
        (Value::Array(items), _) => Ok(Value::Array(expand_items(items, context, coercion)?)),
        (Value::String(s), Some("@id")) => Ok(json!({ "@id": expand_id(s, context) })),
        (Value::String(s), Some("@vocab")) => {
            let iri = context.expand_iri(s).unwrap_or_else(|| s.clone());
            Ok(json!({ "@id": iri }))
        }
        (Value::String(_) | Value::Number(_), Some(datatype)) if !datatype.starts_with('@') => {
            Ok(json!({ "@value": value, "@type": datatype }))
        }
        (Value::String(s), _) => match &context.default_language {
            Some(language) => Ok(json!({ "@value": s, "@language": language })),
            None => Ok(json!({ "@value": s })),
        },
        (Value::Number(_) | Value::Bool(_), _) => Ok(json!({ "@value": value })),
    }
}
