use std::collections::HashMap;

use crate::core::{Code, Quad, Term};
use crate::error::{Result, StoreError};

/// Bidirectional mapping between terms and their integer codes.
///
/// Codes, once minted, stay valid for the dictionary's lifetime; only `encode`
/// mutates, and only by growth.
pub trait TermDictionary {
    /// Encode a term, minting a new code if it was not seen before.
    fn encode(&mut self, term: &Term) -> Result<Code>;

    /// Encode a term without mutating; `None` if it (or any nested component) was never encoded.
    fn encode_optional(&self, term: &Term) -> Option<Code>;

    /// Recover the term behind a code minted by this dictionary.
    fn decode(&self, code: Code) -> Result<Term>;

    /// Codes of all known quoted triples structurally matching the given triple pattern.
    fn find_quoted_triples_encoded<'a>(
        &'a self,
        pattern: &Quad,
    ) -> Box<dyn Iterator<Item = Code> + 'a>;

    /// Whether quoted triples get their own structural code range.
    fn supports_quoted_triples(&self) -> bool;
}

/// Plain term table interning whole terms by structural equality.
///
/// Quoted triples are interned as opaque values, so a store built directly on
/// this table cannot match partially bound quoted patterns through its indexes.
#[derive(Debug, Default)]
pub struct TermTable {
    term_to_id: HashMap<Term, u32>,
    id_to_term: Vec<Term>,
}

impl TermTable {
    pub fn new() -> Self {
        Self { term_to_id: HashMap::new(), id_to_term: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.id_to_term.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_term.is_empty()
    }
}

impl TermDictionary for TermTable {
    fn encode(&mut self, term: &Term) -> Result<Code> {
        if term.has_quoted_outside_default_graph() {
            return Err(StoreError::ConstraintViolation(
                "Encoding of quoted quads outside of the default graph is not allowed".to_string(),
            ));
        }
        if let Some(&id) = self.term_to_id.get(term) {
            return Code::try_plain(id);
        }
        let id = u32::try_from(self.id_to_term.len()).unwrap_or(u32::MAX);
        let code = Code::try_plain(id)?;
        self.term_to_id.insert(term.clone(), id);
        self.id_to_term.push(term.clone());
        Ok(code)
    }

    fn encode_optional(&self, term: &Term) -> Option<Code> {
        if term.has_quoted_outside_default_graph() {
            return None;
        }
        self.term_to_id.get(term).copied().and_then(Code::plain)
    }

    fn decode(&self, code: Code) -> Result<Term> {
        code.plain_index()
            .and_then(|id| self.id_to_term.get(id as usize))
            .cloned()
            .ok_or_else(|| {
                StoreError::Lookup(format!(
                    "The value {} is not present in this dictionary",
                    code.as_u32()
                ))
            })
    }

    fn find_quoted_triples_encoded<'a>(
        &'a self,
        _pattern: &Quad,
    ) -> Box<dyn Iterator<Item = Code> + 'a> {
        Box::new(std::iter::empty())
    }

    fn supports_quoted_triples(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_codes_and_dedup() {
        let mut table = TermTable::new();
        let s1 = table.encode(&Term::named_node("ex:s1")).unwrap();
        let s2 = table.encode(&Term::named_node("ex:s2")).unwrap();
        let b1 = table.encode(&Term::blank_node("ex:s1")).unwrap();

        assert_eq!(s1.plain_index(), Some(0));
        assert_eq!(s2.plain_index(), Some(1));
        assert_eq!(b1.plain_index(), Some(2));
        assert_eq!(table.encode(&Term::named_node("ex:s1")).unwrap(), s1);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_encode_optional_never_mutates() {
        let mut table = TermTable::new();
        table.encode(&Term::literal("abc")).unwrap();

        assert!(table.encode_optional(&Term::literal("abc")).is_some());
        assert!(table.encode_optional(&Term::literal("def")).is_none());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_decode_unknown_code() {
        let table = TermTable::new();
        let err = table.decode(Code::plain(0).unwrap()).unwrap_err();
        assert_eq!(err.to_string(), "Lookup error: The value 0 is not present in this dictionary");
    }

    #[test]
    fn test_quoted_triples_are_opaque() {
        let mut table = TermTable::new();
        let quoted = Term::quoted(Term::named_node("s"), Term::named_node("p"), Term::named_node("o"));
        let code = table.encode(&quoted).unwrap();

        assert!(!code.is_quoted());
        assert_eq!(table.decode(code).unwrap(), quoted);
        assert!(!table.supports_quoted_triples());
        assert_eq!(table.find_quoted_triples_encoded(&Quad::triple(
            Term::variable("s"),
            Term::named_node("p"),
            Term::named_node("o"),
        )).count(), 0);
    }

    #[test]
    fn test_quoted_triples_outside_default_graph_are_rejected() {
        let mut table = TermTable::new();
        let nn = Term::named_node;
        let named = Term::Quad(Box::new(Quad::new(nn("s"), nn("p"), nn("o"), nn("g"))));
        let nested = Term::quoted(nn("s"), nn("p"), named.clone());

        assert!(matches!(table.encode(&named), Err(StoreError::ConstraintViolation(_))));
        assert!(matches!(table.encode(&nested), Err(StoreError::ConstraintViolation(_))));
        assert!(table.encode_optional(&named).is_none());
        assert!(table.encode_optional(&nested).is_none());
        assert!(table.is_empty());
    }
}
