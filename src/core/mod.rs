//! Core data structures and types for the RDF store
//!
//! Terms and quads are plain owned values. A [`Term::Quad`] embeds a whole
//! quad as the value of another statement's position (an RDF-star quoted
//! triple); its graph must be [`Term::DefaultGraph`] to be storable.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod encoding;
pub mod conversion;

pub use encoding::Code;

/// Datatype IRI of simple literals
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";
/// Datatype IRI of language-tagged literals
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// A single RDF term occupying one position of a quad.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    NamedNode(String),
    BlankNode(String),
    Literal(Literal),
    Variable(String),
    DefaultGraph,
    /// A quoted triple, recursively holding another quad
    Quad(Box<Quad>),
}

/// Literal value with its datatype IRI and optional language tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal {
    pub value: String,
    pub datatype: String,
    pub language: Option<String>,
}

impl Literal {
    pub fn new_simple(value: impl Into<String>) -> Self {
        Self { value: value.into(), datatype: XSD_STRING.to_string(), language: None }
    }

    pub fn new_typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self { value: value.into(), datatype: datatype.into(), language: None }
    }

    /// Language tags are normalised to lowercase.
    pub fn new_language_tagged(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: RDF_LANG_STRING.to_string(),
            language: Some(language.into().to_ascii_lowercase()),
        }
    }
}

/// An ordered (subject, predicate, object, graph) statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quad {
    pub subject: Term,
    pub predicate: Term,
    pub object: Term,
    pub graph: Term,
}

/// One of the four positions of a quad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuadPosition {
    Subject,
    Predicate,
    Object,
    Graph,
}

impl QuadPosition {
    /// All positions in canonical SPOG order.
    pub const ALL: [QuadPosition; 4] =
        [QuadPosition::Subject, QuadPosition::Predicate, QuadPosition::Object, QuadPosition::Graph];

    /// Slot of this position in a canonically ordered quad.
    pub fn index(self) -> usize {
        match self {
            QuadPosition::Subject => 0,
            QuadPosition::Predicate => 1,
            QuadPosition::Object => 2,
            QuadPosition::Graph => 3,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            's' => Some(QuadPosition::Subject),
            'p' => Some(QuadPosition::Predicate),
            'o' => Some(QuadPosition::Object),
            'g' => Some(QuadPosition::Graph),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            QuadPosition::Subject => 's',
            QuadPosition::Predicate => 'p',
            QuadPosition::Object => 'o',
            QuadPosition::Graph => 'g',
        }
    }
}

impl Term {
    pub fn named_node(iri: impl Into<String>) -> Self {
        Term::NamedNode(iri.into())
    }

    pub fn blank_node(label: impl Into<String>) -> Self {
        Term::BlankNode(label.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(Literal::new_simple(value))
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    /// A quoted triple in the default graph.
    pub fn quoted(subject: Term, predicate: Term, object: Term) -> Self {
        Term::Quad(Box::new(Quad::triple(subject, predicate, object)))
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    pub fn is_quoted(&self) -> bool {
        matches!(self, Term::Quad(_))
    }

    /// True if this term is a variable or a quoted triple containing one at any depth.
    pub fn has_variables(&self) -> bool {
        match self {
            Term::Variable(_) => true,
            Term::Quad(quad) => quad.has_variables(),
            _ => false,
        }
    }

    /// True if this term is, or nests, a quoted triple outside the default graph.
    pub fn has_quoted_outside_default_graph(&self) -> bool {
        match self {
            Term::Quad(quad) => {
                quad.graph != Term::DefaultGraph
                    || quad.components().iter().any(|term| term.has_quoted_outside_default_graph())
            }
            _ => false,
        }
    }

    /// Structural match of a concrete term against a pattern term.
    ///
    /// Variables in the pattern match anything; quoted triple patterns match
    /// quoted triples component-wise.
    pub fn matches(&self, pattern: &Term) -> bool {
        match (pattern, self) {
            (Term::Variable(_), _) => true,
            (Term::Quad(pattern), Term::Quad(quad)) => quad.matches_pattern(
                Some(&pattern.subject),
                Some(&pattern.predicate),
                Some(&pattern.object),
                Some(&pattern.graph),
            ),
            _ => pattern == self,
        }
    }
}

impl Quad {
    pub fn new(subject: Term, predicate: Term, object: Term, graph: Term) -> Self {
        Self { subject, predicate, object, graph }
    }

    /// A quad in the default graph.
    pub fn triple(subject: Term, predicate: Term, object: Term) -> Self {
        Self::new(subject, predicate, object, Term::DefaultGraph)
    }

    pub fn from_components([subject, predicate, object, graph]: [Term; 4]) -> Self {
        Self { subject, predicate, object, graph }
    }

    pub fn components(&self) -> [&Term; 4] {
        [&self.subject, &self.predicate, &self.object, &self.graph]
    }

    pub fn into_components(self) -> [Term; 4] {
        [self.subject, self.predicate, self.object, self.graph]
    }

    pub fn get(&self, position: QuadPosition) -> &Term {
        match position {
            QuadPosition::Subject => &self.subject,
            QuadPosition::Predicate => &self.predicate,
            QuadPosition::Object => &self.object,
            QuadPosition::Graph => &self.graph,
        }
    }

    pub fn has_variables(&self) -> bool {
        self.components().iter().any(|term| term.has_variables())
    }

    /// Check this quad against an optional pattern per position; `None` is a wildcard.
    pub fn matches_pattern(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> bool {
        self.components()
            .into_iter()
            .zip([subject, predicate, object, graph])
            .all(|(term, pattern)| pattern.map_or(true, |pattern| term.matches(pattern)))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::NamedNode(iri) => write!(f, "<{}>", iri),
            Term::BlankNode(label) => write!(f, "_:{}", label),
            Term::Literal(literal) => match &literal.language {
                Some(language) => write!(f, "\"{}\"@{}", literal.value, language),
                None if literal.datatype == XSD_STRING => write!(f, "\"{}\"", literal.value),
                None => write!(f, "\"{}\"^^<{}>", literal.value, literal.datatype),
            },
            Term::Variable(name) => write!(f, "?{}", name),
            Term::DefaultGraph => Ok(()),
            Term::Quad(quad) => write!(f, "<< {} >>", quad),
        }
    }
}

impl fmt::Display for Quad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if self.graph != Term::DefaultGraph {
            write!(f, " {}", self.graph)?;
        }
        Ok(())
    }
}
