//! Four-level trie index over encoded quads.
//!
//! Nodes live in two arenas addressed by integer handles: branches for the
//! first three levels and leaf sets for the last. Levels are created lazily on
//! insert and pruned bottom-up once a removal empties them. Traversals are four
//! unrolled nested loops since the arity never varies.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::core::{Code, Term};
use crate::error::Result;
use crate::indexing::dictionary::TermDictionary;
use crate::indexing::order::{are_patterns_quoted, encode_optional_terms, QuadPattern};

/// Storage for encoded quads in one component order.
///
/// Codes and patterns passed to an index are already reordered into the
/// index's component order; results come back in that same order.
pub trait QuadIndex {
    /// Insert a quad; true iff it was not present before.
    fn set(&mut self, codes: [Code; 4]) -> bool;

    /// Remove a quad; true iff it was present.
    fn remove(&mut self, codes: [Code; 4]) -> bool;

    fn contains(&self, codes: [Code; 4]) -> bool;

    /// Decoded quads matching the pattern.
    fn find<'a, D: TermDictionary + ?Sized>(
        &'a self,
        dictionary: &'a D,
        pattern: &QuadPattern,
    ) -> Box<dyn Iterator<Item = Result<[Term; 4]>> + 'a>;

    /// Raw codes of the quads matching pre-encoded `codes`, with `pattern`
    /// consulted only for quoted triple slots.
    fn find_encoded<'a, D: TermDictionary + ?Sized>(
        &'a self,
        dictionary: &'a D,
        codes: [Option<Code>; 4],
        pattern: &QuadPattern,
    ) -> Box<dyn Iterator<Item = [Code; 4]> + 'a>;

    /// Exact number of quads matching the pattern.
    fn count<D: TermDictionary + ?Sized>(&self, dictionary: &D, pattern: &QuadPattern) -> usize;

    /// Number of stored quads.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn supports_quoted_pattern_filtering(&self) -> bool;
}

const ROOT: usize = 0;

/// Per-level key selection derived from a pattern slot.
#[derive(Debug, Clone)]
enum SlotFilter {
    Any,
    Exact(Code),
    /// Codes of the quoted triples matching a partially bound quoted pattern
    OneOf(Arc<HashSet<Code>>),
}

impl SlotFilter {
    fn accepts(&self, code: &Code) -> bool {
        match self {
            SlotFilter::Any => true,
            SlotFilter::Exact(expected) => expected == code,
            SlotFilter::OneOf(codes) => codes.contains(code),
        }
    }
}

/// Trie index backed by integer-addressed node arenas.
#[derive(Debug)]
pub struct TrieIndex {
    /// Levels 0-2; `branches[ROOT]` always exists. Values of level 0 and 1
    /// point into `branches`, values of level 2 into `leaves`.
    branches: Vec<HashMap<Code, usize>>,
    leaves: Vec<HashSet<Code>>,
    free_branches: Vec<usize>,
    free_leaves: Vec<usize>,
    quoted_filtering: bool,
    len: usize,
}

impl Default for TrieIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl TrieIndex {
    pub fn new() -> Self {
        Self {
            branches: vec![HashMap::new()],
            leaves: Vec::new(),
            free_branches: Vec::new(),
            free_leaves: Vec::new(),
            quoted_filtering: true,
            len: 0,
        }
    }

    /// An index that only matches exact codes, so partially bound quoted
    /// patterns must be filtered by the caller.
    pub fn without_quoted_filtering() -> Self {
        Self { quoted_filtering: false, ..Self::new() }
    }

    /// Live nodes across all levels, root included.
    pub fn node_count(&self) -> usize {
        (self.branches.len() - self.free_branches.len()) + (self.leaves.len() - self.free_leaves.len())
    }

    fn alloc_branch(&mut self) -> usize {
        match self.free_branches.pop() {
            Some(id) => id,
            None => {
                self.branches.push(HashMap::new());
                self.branches.len() - 1
            }
        }
    }

    fn alloc_leaf(&mut self) -> usize {
        match self.free_leaves.pop() {
            Some(id) => id,
            None => {
                self.leaves.push(HashSet::new());
                self.leaves.len() - 1
            }
        }
    }

    fn free_branch(&mut self, id: usize) {
        self.branches[id] = HashMap::new();
        self.free_branches.push(id);
    }

    fn free_leaf(&mut self, id: usize) {
        self.leaves[id] = HashSet::new();
        self.free_leaves.push(id);
    }

    fn child_branch(&mut self, parent: usize, code: Code) -> usize {
        if let Some(&child) = self.branches[parent].get(&code) {
            return child;
        }
        let child = self.alloc_branch();
        self.branches[parent].insert(code, child);
        child
    }

    fn child_leaf(&mut self, parent: usize, code: Code) -> usize {
        if let Some(&child) = self.branches[parent].get(&code) {
            return child;
        }
        let child = self.alloc_leaf();
        self.branches[parent].insert(code, child);
        child
    }

    fn filters_quoted<D: TermDictionary + ?Sized>(&self, dictionary: &D) -> bool {
        self.quoted_filtering && dictionary.supports_quoted_triples()
    }

    /// Slots resolved through the dictionary's quoted triple lookup. A fully
    /// bound quoted triple is encoded and matched like any other term.
    fn quoted_slots<D: TermDictionary + ?Sized>(
        &self,
        dictionary: &D,
        pattern: &QuadPattern,
    ) -> [bool; 4] {
        if !self.filters_quoted(dictionary) {
            return [false; 4];
        }
        let quoted = are_patterns_quoted(pattern);
        [0, 1, 2, 3]
            .map(|slot| quoted[slot] && pattern[slot].as_ref().map_or(false, Term::has_variables))
    }

    fn plan<D: TermDictionary + ?Sized>(
        &self,
        dictionary: &D,
        codes: [Option<Code>; 4],
        pattern: &QuadPattern,
        quoted: [bool; 4],
    ) -> [SlotFilter; 4] {
        [0, 1, 2, 3].map(|slot| match (&pattern[slot], codes[slot]) {
            (Some(Term::Quad(quad)), None) if quoted[slot] => SlotFilter::OneOf(Arc::new(
                dictionary.find_quoted_triples_encoded(quad).collect(),
            )),
            (_, Some(code)) => SlotFilter::Exact(code),
            _ => SlotFilter::Any,
        })
    }

    fn pattern_plan<D: TermDictionary + ?Sized>(
        &self,
        dictionary: &D,
        pattern: &QuadPattern,
    ) -> Option<[SlotFilter; 4]> {
        let quoted = self.quoted_slots(dictionary, pattern);
        let codes = encode_optional_terms(pattern, &quoted, dictionary)?;
        Some(self.plan(dictionary, codes, pattern, quoted))
    }

    fn traverse(&self, plan: [SlotFilter; 4]) -> impl Iterator<Item = [Code; 4]> + '_ {
        let [filter0, filter1, filter2, filter3] = plan;
        branch_keys(&self.branches[ROOT], filter0).flat_map(move |(key0, node1)| {
            let (filter2, filter3) = (filter2.clone(), filter3.clone());
            branch_keys(&self.branches[node1], filter1.clone()).flat_map(move |(key1, node2)| {
                let filter3 = filter3.clone();
                branch_keys(&self.branches[node2], filter2.clone()).flat_map(move |(key2, leaf)| {
                    leaf_keys(&self.leaves[leaf], filter3.clone())
                        .map(move |key3| [key0, key1, key2, key3])
                })
            })
        })
    }
}

fn branch_keys(
    branch: &HashMap<Code, usize>,
    filter: SlotFilter,
) -> Box<dyn Iterator<Item = (Code, usize)> + '_> {
    match filter {
        SlotFilter::Any => Box::new(branch.iter().map(|(&code, &child)| (code, child))),
        SlotFilter::Exact(code) => Box::new(branch.get(&code).map(|&child| (code, child)).into_iter()),
        SlotFilter::OneOf(codes) => Box::new(
            branch
                .iter()
                .filter(move |(code, _)| codes.contains(*code))
                .map(|(&code, &child)| (code, child)),
        ),
    }
}

fn leaf_keys(leaf: &HashSet<Code>, filter: SlotFilter) -> Box<dyn Iterator<Item = Code> + '_> {
    match filter {
        SlotFilter::Any => Box::new(leaf.iter().copied()),
        SlotFilter::Exact(code) => Box::new(leaf.contains(&code).then_some(code).into_iter()),
        SlotFilter::OneOf(codes) => Box::new(leaf.iter().copied().filter(move |code| codes.contains(code))),
    }
}

fn leaf_count(leaf: &HashSet<Code>, filter: &SlotFilter) -> usize {
    match filter {
        SlotFilter::Any => leaf.len(),
        SlotFilter::Exact(code) => usize::from(leaf.contains(code)),
        SlotFilter::OneOf(codes) if codes.len() < leaf.len() => {
            codes.iter().filter(|code| leaf.contains(*code)).count()
        }
        SlotFilter::OneOf(_) => leaf.iter().filter(|code| filter.accepts(code)).count(),
    }
}

impl QuadIndex for TrieIndex {
    fn set(&mut self, [c0, c1, c2, c3]: [Code; 4]) -> bool {
        let node1 = self.child_branch(ROOT, c0);
        let node2 = self.child_branch(node1, c1);
        let leaf = self.child_leaf(node2, c2);
        let inserted = self.leaves[leaf].insert(c3);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    fn remove(&mut self, [c0, c1, c2, c3]: [Code; 4]) -> bool {
        let Some(&node1) = self.branches[ROOT].get(&c0) else {
            return false;
        };
        let Some(&node2) = self.branches[node1].get(&c1) else {
            return false;
        };
        let Some(&leaf) = self.branches[node2].get(&c2) else {
            return false;
        };
        if !self.leaves[leaf].remove(&c3) {
            return false;
        }
        self.len -= 1;

        if self.leaves[leaf].is_empty() {
            self.branches[node2].remove(&c2);
            self.free_leaf(leaf);
            if self.branches[node2].is_empty() {
                self.branches[node1].remove(&c1);
                self.free_branch(node2);
                if self.branches[node1].is_empty() {
                    self.branches[ROOT].remove(&c0);
                    self.free_branch(node1);
                }
            }
        }
        true
    }

    fn contains(&self, [c0, c1, c2, c3]: [Code; 4]) -> bool {
        self.branches[ROOT]
            .get(&c0)
            .and_then(|&node1| self.branches[node1].get(&c1))
            .and_then(|&node2| self.branches[node2].get(&c2))
            .map_or(false, |&leaf| self.leaves[leaf].contains(&c3))
    }

    fn find<'a, D: TermDictionary + ?Sized>(
        &'a self,
        dictionary: &'a D,
        pattern: &QuadPattern,
    ) -> Box<dyn Iterator<Item = Result<[Term; 4]>> + 'a> {
        let Some(plan) = self.pattern_plan(dictionary, pattern) else {
            return Box::new(std::iter::empty());
        };
        Box::new(self.traverse(plan).map(move |[c0, c1, c2, c3]| -> Result<[Term; 4]> {
            Ok([
                dictionary.decode(c0)?,
                dictionary.decode(c1)?,
                dictionary.decode(c2)?,
                dictionary.decode(c3)?,
            ])
        }))
    }

    fn find_encoded<'a, D: TermDictionary + ?Sized>(
        &'a self,
        dictionary: &'a D,
        codes: [Option<Code>; 4],
        pattern: &QuadPattern,
    ) -> Box<dyn Iterator<Item = [Code; 4]> + 'a> {
        let quoted = self.quoted_slots(dictionary, pattern);
        Box::new(self.traverse(self.plan(dictionary, codes, pattern, quoted)))
    }

    fn count<D: TermDictionary + ?Sized>(&self, dictionary: &D, pattern: &QuadPattern) -> usize {
        let Some([filter0, filter1, filter2, filter3]) = self.pattern_plan(dictionary, pattern) else {
            return 0;
        };
        let mut count = 0;
        for (_, node1) in branch_keys(&self.branches[ROOT], filter0) {
            for (_, node2) in branch_keys(&self.branches[node1], filter1.clone()) {
                for (_, leaf) in branch_keys(&self.branches[node2], filter2.clone()) {
                    count += leaf_count(&self.leaves[leaf], &filter3);
                }
            }
        }
        count
    }

    fn len(&self) -> usize {
        self.len
    }

    fn supports_quoted_pattern_filtering(&self) -> bool {
        self.quoted_filtering
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indexing::dictionary::TermTable;
    use crate::indexing::quoted::QuotedTermDictionary;

    fn encode_all(dict: &mut impl TermDictionary, terms: &[Term; 4]) -> [Code; 4] {
        [
            dict.encode(&terms[0]).unwrap(),
            dict.encode(&terms[1]).unwrap(),
            dict.encode(&terms[2]).unwrap(),
            dict.encode(&terms[3]).unwrap(),
        ]
    }

    fn nn(iri: &str) -> Term {
        Term::named_node(iri)
    }

    #[test]
    fn test_set_and_remove_prune_empty_levels() {
        let mut dict = TermTable::new();
        let mut index = TrieIndex::new();
        let a = encode_all(&mut dict, &[nn("g"), nn("s"), nn("p"), nn("o1")]);
        let b = encode_all(&mut dict, &[nn("g"), nn("s"), nn("p"), nn("o2")]);

        assert!(index.set(a));
        assert!(!index.set(a));
        assert!(index.set(b));
        assert_eq!(index.len(), 2);
        assert_eq!(index.node_count(), 4);

        assert!(index.remove(a));
        assert!(!index.remove(a));
        assert_eq!(index.node_count(), 4);
        assert!(index.remove(b));
        assert_eq!(index.node_count(), 1);
        assert!(index.is_empty());

        // freed slots are reused
        assert!(index.set(a));
        assert_eq!(index.node_count(), 4);
        assert!(index.contains(a));
        assert!(!index.contains(b));
    }

    #[test]
    fn test_find_and_count() {
        let mut dict = TermTable::new();
        let mut index = TrieIndex::new();
        for quad in [
            [nn("g"), nn("s1"), nn("p"), nn("o1")],
            [nn("g"), nn("s1"), nn("p"), nn("o2")],
            [nn("g"), nn("s2"), nn("p"), nn("o1")],
            [nn("g2"), nn("s1"), nn("q"), nn("o1")],
        ] {
            let codes = encode_all(&mut dict, &quad);
            index.set(codes);
        }

        let pattern = [Some(nn("g")), Some(nn("s1")), None, None];
        let mut found: Vec<[Term; 4]> =
            index.find(&dict, &pattern).collect::<Result<Vec<_>>>().unwrap();
        found.sort_by_key(|quad| quad[3].to_string());
        assert_eq!(found, vec![
            [nn("g"), nn("s1"), nn("p"), nn("o1")],
            [nn("g"), nn("s1"), nn("p"), nn("o2")],
        ]);
        assert_eq!(index.count(&dict, &pattern), 2);
        assert_eq!(index.count(&dict, &[None, None, None, Some(nn("o1"))]), 3);
        assert_eq!(index.count(&dict, &[None, None, None, None]), 4);

        // a bound term the dictionary never saw matches nothing
        let unknown = [Some(nn("nope")), None, None, None];
        assert_eq!(index.find(&dict, &unknown).count(), 0);
        assert_eq!(index.count(&dict, &unknown), 0);
    }

    #[test]
    fn test_find_encoded_matches_find() {
        let mut dict = TermTable::new();
        let mut index = TrieIndex::new();
        let codes = encode_all(&mut dict, &[nn("g"), nn("s"), nn("p"), nn("o")]);
        index.set(codes);

        let found: Vec<[Code; 4]> =
            index.find_encoded(&dict, [Some(codes[0]), None, None, None], &[None, None, None, None]).collect();
        assert_eq!(found, vec![codes]);
    }

    #[test]
    fn test_quoted_pattern_filtering() {
        let mut dict = QuotedTermDictionary::new(TermTable::new());
        let mut index = TrieIndex::new();
        let quoted_a = Term::quoted(nn("alice"), nn("knows"), nn("bob"));
        let quoted_b = Term::quoted(nn("carol"), nn("knows"), nn("bob"));
        let quoted_c = Term::quoted(nn("alice"), nn("likes"), nn("bob"));
        for quoted in [&quoted_a, &quoted_b, &quoted_c] {
            let codes = encode_all(&mut dict, &[Term::DefaultGraph, nn("ex:says"), quoted.clone(), nn("ex:dan")]);
            index.set(codes);
        }

        let pattern = [
            None,
            None,
            Some(Term::quoted(Term::variable("x"), nn("knows"), nn("bob"))),
            None,
        ];
        let mut objects: Vec<Term> = index
            .find(&dict, &pattern)
            .map(|quad| quad.unwrap()[2].clone())
            .collect();
        objects.sort_by_key(|term| term.to_string());
        assert_eq!(objects, vec![quoted_a.clone(), quoted_b]);
        assert_eq!(index.count(&dict, &pattern), 2);

        // the same pattern at the leaf level goes through leaf_count
        let mut leaf_index = TrieIndex::new();
        let codes = encode_all(&mut dict, &[Term::DefaultGraph, nn("ex:says"), nn("ex:dan"), quoted_a]);
        leaf_index.set(codes);
        let leaf_pattern = [None, None, None, pattern[2].clone()];
        assert_eq!(leaf_index.count(&dict, &leaf_pattern), 1);

        let without = TrieIndex::without_quoted_filtering();
        assert!(!without.supports_quoted_pattern_filtering());
    }

    #[test]
    fn test_bound_quoted_triple_is_an_exact_lookup() {
        let mut dict = QuotedTermDictionary::new(TermTable::new());
        let mut index = TrieIndex::new();
        let stated = Term::quoted(nn("alice"), nn("knows"), nn("bob"));
        let other = Term::quoted(nn("carol"), nn("knows"), nn("bob"));
        for quoted in [&stated, &other] {
            index.set(encode_all(&mut dict, &[Term::DefaultGraph, nn("ex:says"), quoted.clone(), nn("ex:dan")]));
        }

        let pattern = [None, None, Some(stated.clone()), None];
        let plan = index.pattern_plan(&dict, &pattern).unwrap();
        let expected = dict.encode_optional(&stated).unwrap();
        assert!(matches!(plan[2], SlotFilter::Exact(code) if code == expected));
        assert_eq!(index.count(&dict, &pattern), 1);
        assert_eq!(index.find(&dict, &pattern).next().unwrap().unwrap()[2], stated);

        let unseen = [None, None, Some(Term::quoted(nn("dan"), nn("knows"), nn("bob"))), None];
        assert!(index.pattern_plan(&dict, &unseen).is_none());
        assert_eq!(index.count(&dict, &unseen), 0);
    }
}
