use std::collections::HashSet;
use std::fmt;

/// An IRI-identified RDF node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NamedNode {
    pub iri: String,
}

impl NamedNode {
    pub fn new(iri: impl Into<String>) -> Self {
        Self { iri: iri.into() }
    }
}

/// A blank node; `id` is the label without its `_:` prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlankNode {
    pub id: String,
}

impl BlankNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Literal {
    pub value: String,
    pub datatype: NamedNode,
    pub language: Option<String>,
}

impl Literal {
    /// An `xsd:string` literal.
    pub fn new(value: impl Into<String>) -> Self {
        Self::typed(value, NamedNode::new(xsd::STRING))
    }

    pub fn typed(value: impl Into<String>, datatype: NamedNode) -> Self {
        Self {
            value: value.into(),
            datatype,
            language: None,
        }
    }

    /// An `rdf:langString` literal.
    pub fn lang(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            ..Self::typed(value, NamedNode::new(rdf::LANG_STRING))
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Subject {
    Named(NamedNode),
    Blank(BlankNode),
}

impl From<NamedNode> for Subject {
    fn from(n: NamedNode) -> Self {
        Self::Named(n)
    }
}

impl From<BlankNode> for Subject {
    fn from(b: BlankNode) -> Self {
        Self::Blank(b)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Object {
    Named(NamedNode),
    Blank(BlankNode),
    Literal(Literal),
}

impl From<Subject> for Object {
    fn from(s: Subject) -> Self {
        match s {
            Subject::Named(n) => Self::Named(n),
            Subject::Blank(b) => Self::Blank(b),
        }
    }
}

impl From<NamedNode> for Object {
    fn from(n: NamedNode) -> Self {
        Self::Named(n)
    }
}

impl From<BlankNode> for Object {
    fn from(b: BlankNode) -> Self {
        Self::Blank(b)
    }
}

impl From<Literal> for Object {
    fn from(l: Literal) -> Self {
        Self::Literal(l)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GraphLabel {
    Named(NamedNode),
    Blank(BlankNode),
    Default,
}

impl From<&Subject> for GraphLabel {
    fn from(s: &Subject) -> Self {
        match s {
            Subject::Named(n) => Self::Named(n.clone()),
            Subject::Blank(b) => Self::Blank(b.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Quad {
    pub subject: Subject,
    pub predicate: NamedNode,
    pub object: Object,
    pub graph: GraphLabel,
}

impl Quad {
    pub fn new(
        subject: impl Into<Subject>,
        predicate: NamedNode,
        object: impl Into<Object>,
        graph: GraphLabel,
    ) -> Self {
        Self {
            subject: subject.into(),
            predicate,
            object: object.into(),
            graph,
        }
    }
}

impl fmt::Display for NamedNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}>", self.iri)
    }
}

impl fmt::Display for BlankNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.id)
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)?;
        match &self.language {
            Some(lang) => write!(f, "@{lang}"),
            None if self.datatype.iri == xsd::STRING => Ok(()),
            None => write!(f, "^^{}", self.datatype),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => n.fmt(f),
            Self::Blank(b) => b.fmt(f),
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(n) => n.fmt(f),
            Self::Blank(b) => b.fmt(f),
            Self::Literal(l) => l.fmt(f),
        }
    }
}

/// One N-Quads statement, without the trailing newline.
impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} ", self.subject, self.predicate, self.object)?;
        match &self.graph {
            GraphLabel::Named(n) => write!(f, "{n} ")?,
            GraphLabel::Blank(b) => write!(f, "{b} ")?,
            GraphLabel::Default => {}
        }
        f.write_str(".")
    }
}

/// A set of quads, kept in insertion order.
#[derive(Clone, Debug, Default)]
pub struct Dataset {
    quads: Vec<Quad>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a quad; duplicates are ignored.
    pub fn add(&mut self, quad: Quad) {
        if !self.quads.contains(&quad) {
            self.quads.push(quad);
        }
    }

    pub fn quads(&self) -> &[Quad] {
        &self.quads
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    /// Objects of every triple with this subject and predicate IRI.
    pub fn objects(&self, subject: &Subject, predicate: &str) -> Vec<&Object> {
        self.quads
            .iter()
            .filter(|q| &q.subject == subject && q.predicate.iri == predicate)
            .map(|q| &q.object)
            .collect()
    }

    pub fn subjects(&self) -> HashSet<&Subject> {
        self.quads.iter().map(|q| &q.subject).collect()
    }
}

pub mod xsd {
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";
}

pub mod rdf {
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
    pub const FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
    pub const REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
    pub const NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERSON: &str = "http://example.org/first-person";
    const NAME: &str = "http://schema.org/name";

    fn person() -> Subject {
        Subject::Named(NamedNode::new(PERSON))
    }

    #[test]
    fn objects_by_subject_and_predicate() {
        let mut ds = Dataset::new();
        ds.add(Quad::new(
            person(),
            NamedNode::new(NAME),
            Literal::new("First Person"),
            GraphLabel::Default,
        ));
        ds.add(Quad::new(
            person(),
            NamedNode::new(rdf::TYPE),
            NamedNode::new("http://schema.org/Person"),
            GraphLabel::Default,
        ));
        ds.add(Quad::new(
            BlankNode::new("b0"),
            NamedNode::new(NAME),
            Literal::new("Nobody"),
            GraphLabel::Default,
        ));

        assert_eq!(
            ds.objects(&person(), NAME),
            vec![&Object::Literal(Literal::new("First Person"))]
        );
        assert_eq!(ds.subjects().len(), 2);
    }

    #[test]
    fn duplicate_quads_collapse() {
        let quad = Quad::new(
            person(),
            NamedNode::new(NAME),
            Literal::new("First Person"),
            GraphLabel::Default,
        );
        let mut ds = Dataset::new();
        ds.add(quad.clone());
        ds.add(quad);
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn nquads_statements() {
        let in_graph = Quad::new(
            person(),
            NamedNode::new("http://schema.org/age"),
            Literal::typed("40", NamedNode::new(xsd::INTEGER)),
            GraphLabel::Named(NamedNode::new("http://example.org/people")),
        );
        assert_eq!(
            in_graph.to_string(),
            "<http://example.org/first-person> <http://schema.org/age> \"40\"^^<http://www.w3.org/2001/XMLSchema#integer> <http://example.org/people> ."
        );

        let tagged = Quad::new(
            BlankNode::new("b0"),
            NamedNode::new(NAME),
            Literal::lang("Première", "fr"),
            GraphLabel::Default,
        );
        assert_eq!(tagged.to_string(), "_:b0 <http://schema.org/name> \"Première\"@fr .");
    }
}
