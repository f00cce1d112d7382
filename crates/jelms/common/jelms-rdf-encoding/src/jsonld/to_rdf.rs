use serde_json::{Map, Value};

use super::context::is_absolute_iri;
use crate::error::{RdfError, Result};
use crate::model::*;

/// Convert expanded JSON-LD to an RDF Dataset.
pub fn to_rdf(expanded: &Value) -> Result<Dataset> {
    let nodes = expanded
        .as_array()
        .ok_or_else(|| RdfError::to_rdf("expanded JSON-LD must be an array"))?;

    let mut writer = QuadWriter::default();
    for node in nodes.iter().filter_map(Value::as_object) {
        writer.node(node, &GraphLabel::Default)?;
    }
    Ok(writer.dataset)
}

/// Accumulates quads while walking expanded node objects.
#[derive(Default)]
struct QuadWriter {
    dataset: Dataset,
    next_blank: u64,
}

impl QuadWriter {
    fn fresh_blank(&mut self) -> BlankNode {
        let node = BlankNode::new(format!("b{}", self.next_blank));
        self.next_blank += 1;
        node
    }

    fn emit(&mut self, subject: &Subject, predicate: &str, object: Object, graph: &GraphLabel) {
        self.dataset.add(Quad::new(
            subject.clone(),
            NamedNode::new(predicate),
            object,
            graph.clone(),
        ));
    }

    /// Writes a node's triples into `graph`, returning the node's subject.
    fn node(&mut self, node: &Map<String, Value>, graph: &GraphLabel) -> Result<Subject> {
        let subject = match node.get("@id") {
            Some(id) => node_subject(
                id.as_str()
                    .ok_or_else(|| RdfError::to_rdf("@id must be a string"))?,
            )?,
            None => Subject::Blank(self.fresh_blank()),
        };

        for class in node
            .get("@type")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
        {
            self.emit(&subject, rdf::TYPE, NamedNode::new(class).into(), graph);
        }

        // A node's own @graph is a graph named after the node
        if let Some(members) = node.get("@graph").and_then(Value::as_array) {
            let named = GraphLabel::from(&subject);
            for member in members.iter().filter_map(Value::as_object) {
                self.node(member, &named)?;
            }
        }

        for (predicate, values) in node.iter().filter(|(k, _)| !k.starts_with('@')) {
            for value in values.as_array().into_iter().flatten() {
                if let Some(object) = self.object(value, graph)? {
                    self.emit(&subject, predicate, object, graph);
                }
            }
        }

        Ok(subject)
    }

    fn object(&mut self, value: &Value, graph: &GraphLabel) -> Result<Option<Object>> {
        let Some(obj) = value.as_object() else {
            return Ok(None);
        };

        if let Some(literal) = obj.get("@value") {
            return Ok(Some(literal_of(literal, obj).into()));
        }
        if let Some(list) = obj.get("@list") {
            return self.list(list, graph).map(Some);
        }
        let subject = match obj.get("@id") {
            Some(id) if obj.len() == 1 => node_subject(
                id.as_str()
                    .ok_or_else(|| RdfError::to_rdf("@id must be a string"))?,
            )?,
            _ => self.node(obj, graph)?,
        };
        Ok(Some(subject.into()))
    }

    /// `rdf:first`/`rdf:rest` chain, built back to front.
    fn list(&mut self, list: &Value, graph: &GraphLabel) -> Result<Object> {
        let items = list
            .as_array()
            .ok_or_else(|| RdfError::to_rdf("@list must be an array"))?;

        let mut rest = Object::from(NamedNode::new(rdf::NIL));
        for item in items.iter().rev() {
            let first = self
                .object(item, graph)?
                .ok_or_else(|| RdfError::to_rdf(format!("invalid list item: {item}")))?;
            let cell = Subject::Blank(self.fresh_blank());
            self.emit(&cell, rdf::FIRST, first, graph);
            self.emit(&cell, rdf::REST, rest, graph);
            rest = cell.into();
        }
        Ok(rest)
    }
}

/// Blank labels pass through; anything else must be an absolute IRI.
fn node_subject(id: &str) -> Result<Subject> {
    match id.strip_prefix("_:") {
        Some(label) => Ok(Subject::Blank(BlankNode::new(label))),
        None if is_absolute_iri(id) => Ok(Subject::Named(NamedNode::new(id))),
        None => Err(RdfError::InvalidIri(id.to_string())),
    }
}

fn literal_of(value: &Value, obj: &Map<String, Value>) -> Literal {
    let explicit = obj.get("@type").and_then(Value::as_str);
    let (lexical, datatype) = match value {
        Value::Number(n) => number_literal(n, explicit),
        Value::Bool(b) => (b.to_string(), explicit.unwrap_or(xsd::BOOLEAN)),
        Value::String(s) => (s.clone(), explicit.unwrap_or(xsd::STRING)),
        other => (other.to_string(), explicit.unwrap_or(xsd::STRING)),
    };

    if let Some(lang) = obj.get("@language").and_then(Value::as_str) {
        return Literal::lang(lexical, lang);
    }
    Literal::typed(lexical, NamedNode::new(datatype))
}

/// Canonical lexical form of a native number: integral values below 1e21 are
/// `xsd:integer` digits, everything else (or an explicit `xsd:double`) is an
/// `xsd:double` in `d.dddE±n` form.
fn number_literal<'a>(n: &serde_json::Number, explicit: Option<&'a str>) -> (String, &'a str) {
    if let Some(i) = n.as_i64() {
        if explicit != Some(xsd::DOUBLE) {
            return (i.to_string(), explicit.unwrap_or(xsd::INTEGER));
        }
    } else if let Some(u) = n.as_u64()
        && explicit != Some(xsd::DOUBLE)
    {
        return (u.to_string(), explicit.unwrap_or(xsd::INTEGER));
    }

    let f = n.as_f64().unwrap_or(f64::NAN);
    if f.fract() == 0.0 && f.abs() < 1e21 && explicit != Some(xsd::DOUBLE) {
        return (format!("{f:.0}"), explicit.unwrap_or(xsd::INTEGER));
    }
    (canonical_double(f), explicit.unwrap_or(xsd::DOUBLE))
}

fn canonical_double(f: f64) -> String {
    let formatted = format!("{f:E}");
    match formatted.split_once('E') {
        Some((mantissa, exponent)) if !mantissa.contains('.') => {
            format!("{mantissa}.0E{exponent}")
        }
        _ => formatted,
    }
}
