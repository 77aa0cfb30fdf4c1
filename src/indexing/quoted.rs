use std::collections::HashMap;

use crate::core::{Code, Quad, Term};
use crate::error::{Result, StoreError};
use crate::indexing::dictionary::{TermDictionary, TermTable};

/// Term dictionary giving quoted triples their own tagged code range.
///
/// Plain terms are delegated to the wrapped table. A quoted triple is encoded
/// recursively into the codes of its subject, predicate and object, and that
/// code triple is interned in an append-only table, so structurally equal
/// quoted triples share one code at any nesting depth.
#[derive(Debug, Default)]
pub struct QuotedTermDictionary<P = TermTable> {
    plain: P,
    quoted_triples: Vec<[Code; 3]>,
    quoted_positions: HashMap<[Code; 3], usize>,
}

/// Compiled form of one component of a quoted triple pattern.
#[derive(Debug)]
enum ComponentMatcher {
    Any,
    Exact(Code),
    Nested(Box<[ComponentMatcher; 3]>),
}

impl<P: TermDictionary> QuotedTermDictionary<P> {
    pub fn new(plain: P) -> Self {
        Self { plain, quoted_triples: Vec::new(), quoted_positions: HashMap::new() }
    }

    /// The wrapped plain term table.
    pub fn plain(&self) -> &P {
        &self.plain
    }

    /// Number of distinct quoted triples encoded so far.
    pub fn quoted_len(&self) -> usize {
        self.quoted_triples.len()
    }

    fn quoted_entry(&self, code: Code) -> Option<&[Code; 3]> {
        code.quoted_position()
            .and_then(|position| position.checked_sub(1))
            .and_then(|index| self.quoted_triples.get(index))
    }

    /// Resolve a triple pattern against the dictionary. `None` means no stored
    /// quoted triple can match, because a bound component was never encoded.
    fn compile_pattern(&self, pattern: &Quad) -> Option<[ComponentMatcher; 3]> {
        if !matches!(pattern.graph, Term::DefaultGraph | Term::Variable(_)) {
            return None;
        }
        Some([
            self.compile_component(&pattern.subject)?,
            self.compile_component(&pattern.predicate)?,
            self.compile_component(&pattern.object)?,
        ])
    }

    fn compile_component(&self, term: &Term) -> Option<ComponentMatcher> {
        match term {
            Term::Variable(_) => Some(ComponentMatcher::Any),
            Term::Quad(quad) if quad.has_variables() => {
                Some(ComponentMatcher::Nested(Box::new(self.compile_pattern(quad)?)))
            }
            _ => self.encode_optional(term).map(ComponentMatcher::Exact),
        }
    }

    fn entry_matches(&self, entry: &[Code; 3], matchers: &[ComponentMatcher; 3]) -> bool {
        entry.iter().zip(matchers.iter()).all(|(&code, matcher)| match matcher {
            ComponentMatcher::Any => true,
            ComponentMatcher::Exact(expected) => code == *expected,
            ComponentMatcher::Nested(nested) => self
                .quoted_entry(code)
                .map_or(false, |nested_entry| self.entry_matches(nested_entry, nested)),
        })
    }
}

impl<P: TermDictionary> TermDictionary for QuotedTermDictionary<P> {
    fn encode(&mut self, term: &Term) -> Result<Code> {
        let Term::Quad(quad) = term else {
            return self.plain.encode(term);
        };
        if quad.graph != Term::DefaultGraph {
            return Err(StoreError::ConstraintViolation(
                "Encoding of quoted quads outside of the default graph is not allowed".to_string(),
            ));
        }

        let key = [
            self.encode(&quad.subject)?,
            self.encode(&quad.predicate)?,
            self.encode(&quad.object)?,
        ];
        self.encode(&quad.graph)?;

        if let Some(&position) = self.quoted_positions.get(&key) {
            return Code::quoted(position);
        }
        let position = self.quoted_triples.len() + 1;
        let code = Code::quoted(position)?;
        self.quoted_triples.push(key);
        self.quoted_positions.insert(key, position);
        Ok(code)
    }

    fn encode_optional(&self, term: &Term) -> Option<Code> {
        let Term::Quad(quad) = term else {
            return self.plain.encode_optional(term);
        };
        if quad.graph != Term::DefaultGraph {
            return None;
        }
        let key = [
            self.encode_optional(&quad.subject)?,
            self.encode_optional(&quad.predicate)?,
            self.encode_optional(&quad.object)?,
        ];
        self.quoted_positions.get(&key).and_then(|&position| Code::quoted(position).ok())
    }

    fn decode(&self, code: Code) -> Result<Term> {
        if !code.is_quoted() {
            return self.plain.decode(code);
        }
        let [subject, predicate, object] = *self.quoted_entry(code).ok_or_else(|| {
            StoreError::Lookup(format!(
                "The value {} is not present in the quoted triples range of the dictionary",
                code.as_u32()
            ))
        })?;
        Ok(Term::quoted(self.decode(subject)?, self.decode(predicate)?, self.decode(object)?))
    }

    fn find_quoted_triples_encoded<'a>(
        &'a self,
        pattern: &Quad,
    ) -> Box<dyn Iterator<Item = Code> + 'a> {
        let Some(matchers) = self.compile_pattern(pattern) else {
            return Box::new(std::iter::empty());
        };
        Box::new(
            self.quoted_triples
                .iter()
                .enumerate()
                .filter(move |(_, entry)| self.entry_matches(entry, &matchers))
                .filter_map(|(index, _)| Code::quoted(index + 1).ok()),
        )
    }

    fn supports_quoted_triples(&self) -> bool {
        true
    }
}
