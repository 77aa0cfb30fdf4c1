//! The store orchestrator: one dictionary, N indexes, optional cardinality sets.

use std::collections::HashSet;

use futures_util::stream::{self, Stream, StreamExt};
use log::{debug, trace, warn};

use crate::core::{Code, Quad, QuadPosition, Term};
use crate::error::{Result, StoreError};
use crate::indexing::cardinality::{CardinalitySet, TermsCardinalitySet};
use crate::indexing::dictionary::{TermDictionary, TermTable};
use crate::indexing::order::{
    deorder_quad_components, get_best_index, order_quad_components, quad_to_pattern,
    ComponentOrder,
};
use crate::indexing::quoted::QuotedTermDictionary;
use crate::indexing::trie::{QuadIndex, TrieIndex};
use crate::storage::util::StoreConfig;

type BoxedCardinalitySet = Box<dyn TermsCardinalitySet + Send + Sync>;

struct WrappedIndex<I> {
    order: ComponentOrder,
    index: I,
}

/// An in-memory RDF quad store.
///
/// Every quad is stored once per configured component order, and every
/// index always holds the same set of quads. Queries are answered by the
/// index whose order has the longest leading run of bound positions.
///
/// Mutation takes `&mut self`, so a query iterator must be dropped before the
/// store can change again.
pub struct RdfStore<D = QuotedTermDictionary<TermTable>, I = TrieIndex> {
    dictionary: D,
    indexes: Vec<WrappedIndex<I>>,
    orders: Vec<ComponentOrder>,
    cardinality_sets: [Option<BoxedCardinalitySet>; 4],
    size: usize,
}

impl RdfStore {
    pub const DEFAULT_INDEX_COMBINATIONS: [ComponentOrder; 3] =
        [ComponentOrder::GSPO, ComponentOrder::GPOS, ComponentOrder::GOSP];

    /// A store indexing GSPO, GPOS and GOSP over a quoted-triple-aware dictionary.
    pub fn create_default() -> Self {
        Self::from_parts(
            &Self::DEFAULT_INDEX_COMBINATIONS,
            &[],
            QuotedTermDictionary::new(TermTable::new()),
            |_| TrieIndex::new(),
        )
    }
}

impl<D: TermDictionary, I: QuadIndex> RdfStore<D, I> {
    /// Build a store with one index per configured component order.
    pub fn new<F>(config: StoreConfig, dictionary: D, index_constructor: F) -> Result<Self>
    where
        F: FnMut(&ComponentOrder) -> I,
    {
        config.validate()?;
        Ok(Self::from_parts(
            &config.index_combinations,
            &config.terms_cardinality_sets,
            dictionary,
            index_constructor,
        ))
    }

    fn from_parts<F>(
        orders: &[ComponentOrder],
        cardinality_positions: &[QuadPosition],
        dictionary: D,
        mut index_constructor: F,
    ) -> Self
    where
        F: FnMut(&ComponentOrder) -> I,
    {
        let indexes: Vec<WrappedIndex<I>> = orders
            .iter()
            .map(|order| WrappedIndex { order: *order, index: index_constructor(order) })
            .collect();
        let mut cardinality_sets: [Option<BoxedCardinalitySet>; 4] = [None, None, None, None];
        for position in cardinality_positions {
            cardinality_sets[position.index()] = Some(Box::new(CardinalitySet::new()));
        }
        debug!(
            "Created RDF store with index orders {:?} and cardinality sets for {:?}",
            orders.iter().map(ToString::to_string).collect::<Vec<_>>(),
            cardinality_positions
        );
        Self { dictionary, indexes, orders: orders.to_vec(), cardinality_sets, size: 0 }
    }

    /// Replace the distinct-term tracker of one position. Only allowed while the store is empty.
    pub fn set_cardinality_set(
        &mut self,
        position: QuadPosition,
        set: BoxedCardinalitySet,
    ) -> Result<()> {
        if self.size > 0 {
            return Err(StoreError::Config(
                "Cardinality sets can only be configured on an empty store".to_string(),
            ));
        }
        self.cardinality_sets[position.index()] = Some(set);
        Ok(())
    }

    /// The number of quads in this store.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub fn dictionary(&self) -> &D {
        &self.dictionary
    }

    pub fn index_orders(&self) -> &[ComponentOrder] {
        &self.orders
    }

    /// Whether the dictionary and every index can match partially bound quoted patterns natively.
    pub fn supports_quoted_pattern_filtering(&self) -> bool {
        self.dictionary.supports_quoted_triples()
            && self.indexes.iter().all(|wrapped| wrapped.index.supports_quoted_pattern_filtering())
    }

    fn encode_optional_quad(&self, quad: &Quad) -> Option<[Code; 4]> {
        Some([
            self.dictionary.encode_optional(&quad.subject)?,
            self.dictionary.encode_optional(&quad.predicate)?,
            self.dictionary.encode_optional(&quad.object)?,
            self.dictionary.encode_optional(&quad.graph)?,
        ])
    }

    /// Add a quad; true iff it was not yet present.
    pub fn add_quad(&mut self, quad: &Quad) -> Result<bool> {
        let codes = [
            self.dictionary.encode(&quad.subject)?,
            self.dictionary.encode(&quad.predicate)?,
            self.dictionary.encode(&quad.object)?,
            self.dictionary.encode(&quad.graph)?,
        ];

        let mut wrapped_indexes = self.indexes.iter_mut();
        let added = match wrapped_indexes.next() {
            Some(canonical) => canonical.index.set(order_quad_components(&canonical.order, &codes)),
            None => false,
        };
        for wrapped in wrapped_indexes {
            if wrapped.index.set(order_quad_components(&wrapped.order, &codes)) != added {
                warn!("Index {} disagrees with the canonical index on {}", wrapped.order, quad);
            }
        }

        if added {
            self.size += 1;
            for (set, code) in self.cardinality_sets.iter_mut().zip(codes) {
                if let Some(set) = set {
                    set.add(code);
                }
            }
        }
        trace!("add_quad {} -> {}", quad, added);
        Ok(added)
    }

    /// Remove a quad; true iff it was present.
    pub fn remove_quad(&mut self, quad: &Quad) -> bool {
        let Some(codes) = self.encode_optional_quad(quad) else {
            return false;
        };

        let mut removed = false;
        for (position, wrapped) in self.indexes.iter_mut().enumerate() {
            if !wrapped.index.remove(order_quad_components(&wrapped.order, &codes)) {
                if position > 0 {
                    warn!("Index {} did not contain {} held by the canonical index", wrapped.order, quad);
                }
                break;
            }
            if position == 0 {
                removed = true;
            }
        }

        if removed {
            self.size -= 1;
            for (set, code) in self.cardinality_sets.iter_mut().zip(codes) {
                if let Some(set) = set {
                    set.remove(code);
                }
            }
        }
        trace!("remove_quad {} -> {}", quad, removed);
        removed
    }

    pub fn contains_quad(&self, quad: &Quad) -> bool {
        match (self.encode_optional_quad(quad), self.indexes.first()) {
            (Some(codes), Some(wrapped)) => {
                wrapped.index.contains(order_quad_components(&wrapped.order, &codes))
            }
            _ => false,
        }
    }

    /// Lazily produce all quads matching the pattern; `None` and variables are wildcards.
    pub fn read_quads<'a>(
        &'a self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> impl Iterator<Item = Result<Quad>> + 'a {
        let (pattern, requires_post_filter) = quad_to_pattern(
            subject,
            predicate,
            object,
            graph,
            self.supports_quoted_pattern_filtering(),
        );
        let best = get_best_index(&self.orders, &pattern);
        let wrapped = &self.indexes[best];
        trace!("read_quads using index {}", wrapped.order);

        let order = wrapped.order;
        let post_filter =
            requires_post_filter.then(|| [subject, predicate, object, graph].map(|term| term.cloned()));
        wrapped
            .index
            .find(&self.dictionary, &order_quad_components(&order, &pattern))
            .filter_map(move |components| {
                let quad = match components {
                    Ok(components) => Quad::from_components(deorder_quad_components(&order, components)),
                    Err(err) => return Some(Err(err)),
                };
                match &post_filter {
                    Some([s, p, o, g])
                        if !quad.matches_pattern(s.as_ref(), p.as_ref(), o.as_ref(), g.as_ref()) =>
                    {
                        None
                    }
                    _ => Some(Ok(quad)),
                }
            })
    }

    /// All quads matching the pattern, collected eagerly.
    pub fn get_quads(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> Result<Vec<Quad>> {
        self.read_quads(subject, predicate, object, graph).collect()
    }

    /// Quads matching the pattern as a pull-driven stream.
    pub fn match_stream<'a>(
        &'a self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> impl Stream<Item = Result<Quad>> + 'a {
        stream::iter(self.read_quads(subject, predicate, object, graph))
    }

    /// Exact number of quads matching the pattern.
    ///
    /// Patterns that need a post-filter are counted by decoding candidates.
    /// Decoding only fails for codes this store did not mint; such a candidate
    /// is logged and left out of the count.
    pub fn count_quads(
        &self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> usize {
        let (pattern, requires_post_filter) = quad_to_pattern(
            subject,
            predicate,
            object,
            graph,
            self.supports_quoted_pattern_filtering(),
        );
        if requires_post_filter {
            return self
                .read_quads(subject, predicate, object, graph)
                .filter(|quad| match quad {
                    Ok(_) => true,
                    Err(err) => {
                        warn!("Skipping undecodable quad while counting: {}", err);
                        false
                    }
                })
                .count();
        }
        if pattern.iter().all(Option::is_none) {
            return self.size;
        }
        let wrapped = &self.indexes[get_best_index(&self.orders, &pattern)];
        wrapped.index.count(&self.dictionary, &order_quad_components(&wrapped.order, &pattern))
    }

    /// Add every quad of the sequence; returns how many were new.
    pub fn import<T: IntoIterator<Item = Quad>>(&mut self, quads: T) -> Result<usize> {
        let mut added = 0;
        for quad in quads {
            if self.add_quad(&quad)? {
                added += 1;
            }
        }
        debug!("Imported {} new quads, store size is now {}", added, self.size);
        Ok(added)
    }

    /// Remove every quad of the sequence; returns how many were present.
    pub fn remove_all<T: IntoIterator<Item = Quad>>(&mut self, quads: T) -> usize {
        let removed = quads.into_iter().filter(|quad| self.remove_quad(quad)).count();
        debug!("Removed {} quads, store size is now {}", removed, self.size);
        removed
    }

    /// Drain a stream of quads into the store.
    pub async fn import_stream<S: Stream<Item = Quad>>(&mut self, quads: S) -> Result<usize> {
        futures_util::pin_mut!(quads);
        let mut added = 0;
        while let Some(quad) = quads.next().await {
            if self.add_quad(&quad)? {
                added += 1;
            }
        }
        debug!("Imported {} new quads from stream", added);
        Ok(added)
    }

    /// Remove every quad produced by a stream.
    pub async fn remove_stream<S: Stream<Item = Quad>>(&mut self, quads: S) -> usize {
        futures_util::pin_mut!(quads);
        let mut removed = 0;
        while let Some(quad) = quads.next().await {
            if self.remove_quad(&quad) {
                removed += 1;
            }
        }
        debug!("Removed {} quads from stream", removed);
        removed
    }

    /// Remove all quads matching the pattern.
    pub fn remove_matches(
        &mut self,
        subject: Option<&Term>,
        predicate: Option<&Term>,
        object: Option<&Term>,
        graph: Option<&Term>,
    ) -> Result<usize> {
        let matches = self.get_quads(subject, predicate, object, graph)?;
        Ok(self.remove_all(matches))
    }

    /// Remove all quads in the given graph.
    pub fn delete_graph(&mut self, graph: &Term) -> Result<usize> {
        self.remove_matches(None, None, None, Some(graph))
    }

    pub fn get_subjects(&self) -> Result<Vec<Term>> {
        self.terms_at(QuadPosition::Subject)
    }

    pub fn get_predicates(&self) -> Result<Vec<Term>> {
        self.terms_at(QuadPosition::Predicate)
    }

    pub fn get_objects(&self) -> Result<Vec<Term>> {
        self.terms_at(QuadPosition::Object)
    }

    pub fn get_graphs(&self) -> Result<Vec<Term>> {
        self.terms_at(QuadPosition::Graph)
    }

    /// Distinct terms at one position, from the cardinality set if tracked, else by a full scan.
    fn terms_at(&self, position: QuadPosition) -> Result<Vec<Term>> {
        if let Some(set) = &self.cardinality_sets[position.index()] {
            return set.terms().into_iter().map(|code| self.dictionary.decode(code)).collect();
        }
        let mut seen = HashSet::new();
        let mut terms = Vec::new();
        for quad in self.read_quads(None, None, None, None) {
            let term = quad?.get(position).clone();
            if seen.insert(term.clone()) {
                terms.push(term);
            }
        }
        Ok(terms)
    }
}
