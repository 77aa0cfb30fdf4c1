use std::collections::HashMap;

use crate::core::Code;

/// Tracks which codes are currently in use at one quad position.
pub trait TermsCardinalitySet {
    fn add(&mut self, code: Code);

    fn remove(&mut self, code: Code);

    /// Codes with a positive reference count, in arbitrary order.
    fn terms(&self) -> Vec<Code>;
}

/// Reference-counted multiset of codes.
#[derive(Debug, Default)]
pub struct CardinalitySet {
    counts: HashMap<Code, usize>,
}

impl CardinalitySet {
    pub fn new() -> Self {
        Self { counts: HashMap::new() }
    }

    pub fn count(&self, code: Code) -> usize {
        self.counts.get(&code).copied().unwrap_or(0)
    }
}

impl TermsCardinalitySet for CardinalitySet {
    fn add(&mut self, code: Code) {
        *self.counts.entry(code).or_insert(0) += 1;
    }

    fn remove(&mut self, code: Code) {
        if let Some(count) = self.counts.get_mut(&code) {
            *count -= 1;
            if *count == 0 {
                self.counts.remove(&code);
            }
        }
    }

    fn terms(&self) -> Vec<Code> {
        self.counts.keys().copied().collect()
    }
}
