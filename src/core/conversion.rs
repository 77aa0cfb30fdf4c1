//! Conversions between `oxigraph` model values and store terms.
//!
//! ```rust
//! use oxigraph::model::{GraphName, NamedNode, Quad as OxQuad};
//! use rdf_stores::core::{Quad, Term};
//!
//! let alice = NamedNode::new("http://example.org/alice").unwrap();
//! let knows = NamedNode::new("http://example.org/knows").unwrap();
//! let quad = OxQuad::new(alice.clone(), knows, alice, GraphName::DefaultGraph);
//!
//! let quad = Quad::try_from(&quad).unwrap();
//! assert_eq!(quad.graph, Term::DefaultGraph);
//! ```

use ::oxigraph::model as ox;

use crate::core::{Literal, Quad, Term};
use crate::error::{Result, StoreError};

impl From<&ox::NamedNode> for Term {
    fn from(node: &ox::NamedNode) -> Self {
        Term::NamedNode(node.as_str().to_string())
    }
}

impl From<&ox::BlankNode> for Term {
    fn from(node: &ox::BlankNode) -> Self {
        Term::BlankNode(node.as_str().to_string())
    }
}

impl From<&ox::Literal> for Term {
    fn from(literal: &ox::Literal) -> Self {
        Term::Literal(Literal {
            value: literal.value().to_string(),
            datatype: literal.datatype().as_str().to_string(),
            language: literal.language().map(str::to_string),
        })
    }
}

impl From<&ox::GraphName> for Term {
    fn from(graph: &ox::GraphName) -> Self {
        match graph {
            ox::GraphName::NamedNode(node) => node.into(),
            ox::GraphName::BlankNode(node) => node.into(),
            ox::GraphName::DefaultGraph => Term::DefaultGraph,
        }
    }
}

impl TryFrom<&ox::Term> for Term {
    type Error = StoreError;

    fn try_from(term: &ox::Term) -> Result<Self> {
        match term {
            ox::Term::NamedNode(node) => Ok(node.into()),
            ox::Term::BlankNode(node) => Ok(node.into()),
            ox::Term::Literal(literal) => Ok(literal.into()),
            #[allow(unreachable_patterns)]
            _ => Err(StoreError::Conversion(format!("Unsupported term {}", term))),
        }
    }
}

impl TryFrom<&ox::Quad> for Quad {
    type Error = StoreError;

    fn try_from(quad: &ox::Quad) -> Result<Self> {
        Ok(Quad::new(
            Term::try_from(&ox::Term::from(quad.subject.clone()))?,
            Term::from(&quad.predicate),
            Term::try_from(&quad.object)?,
            Term::from(&quad.graph_name),
        ))
    }
}

impl Term {
    /// Materialize this term as an `oxigraph` term. Variables, the default
    /// graph and quoted triples have no counterpart there. A literal carrying a
    /// language tag always becomes a language-tagged literal.
    pub fn to_oxigraph(&self) -> Result<ox::Term> {
        match self {
            Term::NamedNode(iri) => Ok(ox::NamedNode::new_unchecked(iri.clone()).into()),
            Term::BlankNode(label) => Ok(ox::BlankNode::new_unchecked(label.clone()).into()),
            Term::Literal(literal) => Ok(match &literal.language {
                Some(language) => {
                    ox::Literal::new_language_tagged_literal_unchecked(
                        literal.value.clone(),
                        language.clone(),
                    )
                }
                None => ox::Literal::new_typed_literal(
                    literal.value.clone(),
                    ox::NamedNode::new_unchecked(literal.datatype.clone()),
                ),
            }
            .into()),
            other => Err(StoreError::Conversion(format!(
                "Term {:?} has no oxigraph counterpart",
                other
            ))),
        }
    }
}
