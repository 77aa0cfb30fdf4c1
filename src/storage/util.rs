use serde::{Deserialize, Serialize};

use crate::core::QuadPosition;
use crate::error::{Result, StoreError};
use crate::indexing::order::ComponentOrder;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// Construction options for an [`RdfStore`](crate::storage::rdf_store::RdfStore)
pub struct StoreConfig {
    /// Component orders to build one index each for; the first is canonical
    /// for add/remove bookkeeping
    pub index_combinations: Vec<ComponentOrder>,
    /// Positions whose distinct terms are tracked with reference counts
    pub terms_cardinality_sets: Vec<QuadPosition>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            index_combinations: vec![
                ComponentOrder::GSPO,
                ComponentOrder::GPOS,
                ComponentOrder::GOSP,
            ],
            terms_cardinality_sets: Vec::new(),
        }
    }
}

impl StoreConfig {
    /// Parse a JSON configuration such as
    /// `{"index_combinations": ["gspo", "gpos"], "terms_cardinality_sets": ["subject"]}`.
    /// Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: StoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Build a configuration from raw position lists, validating each one.
    pub fn with_index_combinations(combinations: &[Vec<QuadPosition>]) -> Result<Self> {
        let index_combinations = combinations
            .iter()
            .map(|positions| ComponentOrder::from_positions(positions))
            .collect::<Result<Vec<_>>>()?;
        let config = Self { index_combinations, ..Self::default() };
        config.validate()?;
        Ok(config)
    }

    pub fn with_cardinality_sets(mut self, positions: &[QuadPosition]) -> Self {
        self.terms_cardinality_sets = positions.to_vec();
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.index_combinations.is_empty() {
            return Err(StoreError::Config(
                "At least one index combination is required".to_string(),
            ));
        }
        Ok(())
    }
}
