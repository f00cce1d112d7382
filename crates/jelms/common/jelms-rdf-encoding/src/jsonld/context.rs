use std::collections::HashMap;

use serde_json::{Map, Value};

use crate::error::{RdfError, Result};

/// An active JSON-LD context: term definitions plus the document-wide defaults.
#[derive(Clone, Debug, Default)]
pub struct Context {
    pub terms: HashMap<String, TermDefinition>,
    pub vocab: Option<String>,
    pub base: Option<String>,
    pub default_language: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct TermDefinition {
    /// Expanded IRI or keyword; empty when the term was defined as `null`
    pub iri: String,
    /// `@id`, `@vocab` or a datatype IRI
    pub type_mapping: Option<String>,
}

/// Progress of a term while a local context is being processed.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Defining {
    InProgress,
    Done,
}

impl Context {
    /// Merges a `@context` value into this context.
    ///
    /// Arrays are processed in order and `null` resets the context. Remote
    /// (string) contexts are rejected: every context must be given inline.
    pub fn process(&mut self, context_value: &Value) -> Result<()> {
        match context_value {
            Value::Array(items) => items.iter().try_for_each(|item| self.process(item)),
            Value::Object(local) => self.process_local(local),
            Value::Null => {
                *self = Context::default();
                Ok(())
            }
            Value::String(url) => Err(RdfError::context(format!(
                "remote context '{url}' cannot be loaded; supply the context inline"
            ))),
            other => Err(RdfError::context(format!("invalid @context value: {other}"))),
        }
    }

    fn process_local(&mut self, local: &Map<String, Value>) -> Result<()> {
        let text = |key: &str| local.get(key).and_then(Value::as_str).map(str::to_string);
        if local.contains_key("@vocab") {
            self.vocab = text("@vocab");
        }
        if local.contains_key("@base") {
            self.base = text("@base");
        }
        if local.contains_key("@language") {
            self.default_language = text("@language");
        }

        let mut progress = HashMap::new();
        for term in local.keys().filter(|k| !k.starts_with('@')) {
            self.define(local, term, &mut progress)?;
        }
        Ok(())
    }

    /// Defines `term`, first defining any prefix from the same local context
    /// that the term's IRIs are written against.
    fn define(
        &mut self,
        local: &Map<String, Value>,
        term: &str,
        progress: &mut HashMap<String, Defining>,
    ) -> Result<()> {
        match progress.get(term) {
            Some(Defining::Done) => return Ok(()),
            Some(Defining::InProgress) => {
                return Err(RdfError::context(format!(
                    "cyclic IRI mapping detected for term '{term}'"
                )));
            }
            None => {}
        }
        let value = local
            .get(term)
            .ok_or_else(|| RdfError::context(format!("term '{term}' is not defined")))?;
        progress.insert(term.to_string(), Defining::InProgress);

        for prefix in prefixes_of(value) {
            if prefix != term && local.contains_key(prefix) {
                self.define(local, prefix, progress)?;
            }
        }

        let definition = self.term_definition(term, value)?;
        self.terms.insert(term.to_string(), definition);
        progress.insert(term.to_string(), Defining::Done);
        Ok(())
    }

    fn term_definition(&self, term: &str, value: &Value) -> Result<TermDefinition> {
        match value {
            Value::Null => Ok(TermDefinition::default()),
            Value::String(iri) => Ok(TermDefinition {
                iri: self.resolve(iri),
                ..TermDefinition::default()
            }),
            Value::Object(expanded) => {
                let id = expanded.get("@id").and_then(Value::as_str).unwrap_or(term);
                let type_mapping = expanded
                    .get("@type")
                    .and_then(Value::as_str)
                    .map(|t| if t.starts_with('@') { t.to_string() } else { self.resolve(t) });
                Ok(TermDefinition {
                    iri: self.resolve(id),
                    type_mapping,
                })
            }
            other => Err(RdfError::context(format!(
                "invalid term definition for '{term}': {other}"
            ))),
        }
    }

    fn resolve(&self, value: &str) -> String {
        self.expand_iri(value).unwrap_or_else(|| value.to_string())
    }

    /// Expands a term, compact IRI or vocabulary-relative name to an IRI.
    ///
    /// Returns `None` for terms defined as `null` and for names nothing maps.
    pub fn expand_iri(&self, value: &str) -> Option<String> {
        if value.starts_with('@') || is_absolute_iri(value) {
            return Some(value.to_string());
        }
        if let Some(definition) = self.terms.get(value) {
            return (!definition.iri.is_empty()).then(|| definition.iri.clone());
        }
        if let Some((prefix, suffix)) = value.split_once(':') {
            if let Some(definition) = self.terms.get(prefix) {
                return Some(format!("{}{suffix}", definition.iri));
            }
            if is_scheme(prefix) {
                return Some(value.to_string());
            }
        }
        self.vocab.as_ref().map(|vocab| format!("{vocab}{value}"))
    }

    pub fn get_term(&self, term: &str) -> Option<&TermDefinition> {
        self.terms.get(term)
    }
}

/// Prefixes of the compact IRIs a term definition refers to.
fn prefixes_of(value: &Value) -> Vec<&str> {
    let references = match value {
        Value::String(s) => vec![s.as_str()],
        Value::Object(expanded) => ["@id", "@type"]
            .iter()
            .filter_map(|k| expanded.get(*k).and_then(Value::as_str))
            .collect(),
        _ => Vec::new(),
    };
    references
        .into_iter()
        .filter_map(|r| r.split_once(':'))
        .filter(|(_, suffix)| !suffix.starts_with("//"))
        .map(|(prefix, _)| prefix)
        .collect()
}

fn is_scheme(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Whether `value` is an absolute IRI: hierarchical (`scheme://`) or one of the
/// common non-hierarchical schemes.
pub(crate) fn is_absolute_iri(value: &str) -> bool {
    match value.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => {
            rest.starts_with("//")
                || matches!(
                    scheme,
                    "urn" | "did" | "tel" | "mailto" | "data" | "blob" | "cid" | "mid" | "tag"
                )
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn processed(context: Value) -> Context {
        let mut ctx = Context::default();
        ctx.process(&context).unwrap();
        ctx
    }

    #[test]
    fn prefix_defined_after_the_term_using_it() {
        // "name" is visited before "schema"
        let ctx = processed(json!({
            "name": {"@id": "schema:name"},
            "schema": "http://schema.org/"
        }));
        assert_eq!(ctx.expand_iri("name").as_deref(), Some("http://schema.org/name"));
        assert_eq!(ctx.expand_iri("schema:age").as_deref(), Some("http://schema.org/age"));
    }

    #[test]
    fn vocab_and_aliases() {
        let ctx = processed(json!({"@vocab": "http://example.org/", "id": "@id"}));
        assert_eq!(ctx.expand_iri("age").as_deref(), Some("http://example.org/age"));
        assert_eq!(ctx.expand_iri("id").as_deref(), Some("@id"));
    }

    #[test]
    fn type_coercions_are_expanded() {
        let ctx = processed(json!({
            "xsd": "http://www.w3.org/2001/XMLSchema#",
            "age": {"@id": "http://schema.org/age", "@type": "xsd:integer"},
            "knows": {"@id": "http://schema.org/knows", "@type": "@id"}
        }));
        let mapping = |term| ctx.get_term(term).and_then(|t| t.type_mapping.as_deref());
        assert_eq!(mapping("age"), Some("http://www.w3.org/2001/XMLSchema#integer"));
        assert_eq!(mapping("knows"), Some("@id"));
    }

    #[test]
    fn null_term_is_unmapped() {
        let ctx = processed(json!({"@vocab": "http://example.org/", "secret": null}));
        assert_eq!(ctx.expand_iri("secret"), None);
    }

    #[test]
    fn invalid_contexts() {
        let mut ctx = Context::default();
        assert!(matches!(
            ctx.process(&json!({"a": "b:x", "b": "a:y"})),
            Err(RdfError::ContextError(_))
        ));
        assert!(ctx.process(&json!("https://example.org/context.jsonld")).is_err());
        assert!(ctx.process(&json!({"a": 42})).is_err());
    }

    #[test]
    fn null_resets_context() {
        let ctx = processed(json!([{"@vocab": "http://example.org/"}, null]));
        assert!(ctx.vocab.is_none());
    }

    #[test]
    fn absolute_iris() {
        assert!(is_absolute_iri("http://example.org/foo"));
        assert!(is_absolute_iri("urn:uuid:1234"));
        assert!(!is_absolute_iri("schema:name"));
        assert!(!is_absolute_iri(""));
    }
}
