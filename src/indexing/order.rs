//! Component orders and the pure helpers that move quads and patterns between
//! canonical SPOG order and an index's nesting order.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{Code, QuadPosition, Term};
use crate::error::{Result, StoreError};
use crate::indexing::dictionary::TermDictionary;

/// A quad pattern in some component order; `None` is a wildcard.
pub type QuadPattern = [Option<Term>; 4];

/// A total ordering of the four quad positions, defining one index's trie nesting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComponentOrder([QuadPosition; 4]);

impl ComponentOrder {
    pub const GSPO: ComponentOrder = ComponentOrder([
        QuadPosition::Graph,
        QuadPosition::Subject,
        QuadPosition::Predicate,
        QuadPosition::Object,
    ]);
    pub const GPOS: ComponentOrder = ComponentOrder([
        QuadPosition::Graph,
        QuadPosition::Predicate,
        QuadPosition::Object,
        QuadPosition::Subject,
    ]);
    pub const GOSP: ComponentOrder = ComponentOrder([
        QuadPosition::Graph,
        QuadPosition::Object,
        QuadPosition::Subject,
        QuadPosition::Predicate,
    ]);
    pub const SPOG: ComponentOrder = ComponentOrder(QuadPosition::ALL);

    /// Build an order from a position list, rejecting anything but a bijection over all four positions.
    pub fn from_positions(positions: &[QuadPosition]) -> Result<Self> {
        if !Self::is_valid(positions) {
            return Err(StoreError::Config(format!(
                "Invalid index combination: {:?}",
                positions
            )));
        }
        Ok(ComponentOrder([positions[0], positions[1], positions[2], positions[3]]))
    }

    pub fn is_valid(positions: &[QuadPosition]) -> bool {
        positions.len() == 4 && QuadPosition::ALL.iter().all(|position| positions.contains(position))
    }

    pub fn positions(&self) -> [QuadPosition; 4] {
        self.0
    }

    /// Slot index of each canonical position within this order.
    pub fn inverse(&self) -> [usize; 4] {
        let mut inverse = [0; 4];
        for (slot, position) in self.0.iter().enumerate() {
            inverse[position.index()] = slot;
        }
        inverse
    }
}

impl FromStr for ComponentOrder {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        let positions = s
            .chars()
            .map(|c| {
                QuadPosition::from_char(c.to_ascii_lowercase()).ok_or_else(|| {
                    StoreError::Config(format!("Invalid index combination: {}", s))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_positions(&positions)
    }
}

impl TryFrom<String> for ComponentOrder {
    type Error = StoreError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ComponentOrder> for String {
    fn from(order: ComponentOrder) -> Self {
        order.to_string()
    }
}

impl fmt::Display for ComponentOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for position in self.0 {
            write!(f, "{}", position.as_char())?;
        }
        Ok(())
    }
}

/// Reorder canonical SPOG components into the given order.
pub fn order_quad_components<T: Clone>(order: &ComponentOrder, components: &[T; 4]) -> [T; 4] {
    order.positions().map(|position| components[position.index()].clone())
}

/// Undo [`order_quad_components`], moving components back into SPOG order.
pub fn deorder_quad_components<T>(order: &ComponentOrder, ordered: [T; 4]) -> [T; 4] {
    let [c0, c1, c2, c3] = ordered;
    let [p0, p1, p2, p3] = order.positions();
    let mut slots = [(p0, c0), (p1, c1), (p2, c2), (p3, c3)];
    slots.sort_unstable_by_key(|(position, _)| *position);
    slots.map(|(_, component)| component)
}

/// Build a canonical pattern from optional terms.
///
/// Variables become wildcards. A quoted triple containing variables stays bound
/// when quoted pattern filtering is available; otherwise it is widened to a
/// wildcard and the returned flag asks the caller to post-filter results.
pub fn quad_to_pattern(
    subject: Option<&Term>,
    predicate: Option<&Term>,
    object: Option<&Term>,
    graph: Option<&Term>,
    quoted_filtering: bool,
) -> (QuadPattern, bool) {
    let mut requires_post_filter = false;
    let pattern = [subject, predicate, object, graph].map(|term| match term {
        None | Some(Term::Variable(_)) => None,
        Some(term @ Term::Quad(_)) if !quoted_filtering && term.has_variables() => {
            requires_post_filter = true;
            None
        }
        Some(term) => Some(term.clone()),
    });
    (pattern, requires_post_filter)
}

/// Flags the slots holding a quoted triple term.
pub fn are_patterns_quoted(pattern: &QuadPattern) -> [bool; 4] {
    [0, 1, 2, 3].map(|slot| matches!(pattern[slot], Some(Term::Quad(_))))
}

/// Encode the bound, non-quoted slots of a pattern without mutating the dictionary.
///
/// Returns `None` when a bound term was never encoded, since the pattern can
/// then match nothing. Wildcard and quoted slots yield `None` codes.
pub fn encode_optional_terms<D: TermDictionary + ?Sized>(
    pattern: &QuadPattern,
    quoted: &[bool; 4],
    dictionary: &D,
) -> Option<[Option<Code>; 4]> {
    let mut codes = [None; 4];
    for (slot, term) in pattern.iter().enumerate() {
        if let Some(term) = term {
            if !quoted[slot] {
                codes[slot] = Some(dictionary.encode_optional(term)?);
            }
        }
    }
    Some(codes)
}

/// Pick the order whose leading run of bound positions is longest; ties go to the earliest.
pub fn get_best_index(orders: &[ComponentOrder], pattern: &QuadPattern) -> usize {
    let mut best_index = 0;
    let mut best_score = None;
    for (index, order) in orders.iter().enumerate() {
        let score = order
            .positions()
            .iter()
            .take_while(|position| pattern[position.index()].is_some())
            .count();
        if best_score.map_or(true, |best| score > best) {
            best_index = index;
            best_score = Some(score);
        }
    }
    best_index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_orders() {
        assert_eq!("gspo".parse::<ComponentOrder>().unwrap(), ComponentOrder::GSPO);
        assert_eq!("SPOG".parse::<ComponentOrder>().unwrap(), ComponentOrder::SPOG);
        assert!("gsp".parse::<ComponentOrder>().is_err());
        assert!("gspp".parse::<ComponentOrder>().is_err());
        assert!("gspox".parse::<ComponentOrder>().is_err());
        assert!("gspa".parse::<ComponentOrder>().is_err());
        assert_eq!(ComponentOrder::GOSP.to_string(), "gosp");
    }

    #[test]
    fn test_order_and_deorder() {
        let quad = ["s", "p", "o", "g"];
        let ordered = order_quad_components(&ComponentOrder::GPOS, &quad);
        assert_eq!(ordered, ["g", "p", "o", "s"]);
        assert_eq!(deorder_quad_components(&ComponentOrder::GPOS, ordered), quad);

        let inverse = ComponentOrder::GPOS.inverse();
        assert_eq!(inverse, [3, 1, 2, 0]);
        for (canonical, slot) in inverse.iter().enumerate() {
            assert_eq!(ordered[*slot], quad[canonical]);
        }
    }

    #[test]
    fn test_quad_to_pattern() {
        let s = Term::named_node("s");
        let quoted = Term::quoted(Term::variable("x"), Term::named_node("p"), Term::named_node("o"));

        let (pattern, post_filter) =
            quad_to_pattern(Some(&s), Some(&Term::variable("p")), Some(&quoted), None, true);
        assert_eq!(pattern, [Some(s.clone()), None, Some(quoted.clone()), None]);
        assert!(!post_filter);

        let (pattern, post_filter) = quad_to_pattern(Some(&s), None, Some(&quoted), None, false);
        assert_eq!(pattern, [Some(s), None, None, None]);
        assert!(post_filter);
    }

    #[test]
    fn test_best_index_prefers_longest_bound_prefix() {
        let orders = [ComponentOrder::GSPO, ComponentOrder::GPOS, ComponentOrder::GOSP];
        let p = Some(Term::named_node("p"));
        let g = Some(Term::named_node("g"));
        let o = Some(Term::named_node("o"));

        assert_eq!(get_best_index(&orders, &[None, None, None, None]), 0);
        assert_eq!(get_best_index(&orders, &[None, p.clone(), None, g.clone()]), 1);
        assert_eq!(get_best_index(&orders, &[None, None, o.clone(), g.clone()]), 2);
        assert_eq!(get_best_index(&orders, &[None, p, o, None]), 0);
    }
}
