//! Inputs and outputs of outfit pairing.

use serde::{Deserialize, Serialize};

use crate::domain::product::Product;

/// A candidate product with its derived, non-persisted score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    pub product: Product,
    pub score: u32,
    /// Shirt neck size translated from the shopper's suit size, when one applies.
    pub suggested_size: Option<String>,
    pub breakdown: ScoreBreakdown,
}

/// Points earned from each pairing signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub pairs_well_with: u32,
    pub category_affinity: u32,
    pub color_match: u32,
    pub price_proximity: u32,
}

impl ScoreBreakdown {
    pub fn total(&self) -> u32 {
        self.pairs_well_with + self.category_affinity + self.color_match + self.price_proximity
    }
}

/// What the shopper is looking at, plus how many pairings to show.
#[derive(Debug, Clone)]
pub struct RecommendationRequest<'a> {
    /// Product on the detail page.
    pub current: &'a Product,
    /// Cap on returned candidates.
    pub max_items: usize,
    /// Suit size the shopper picked; only annotates shirt candidates.
    pub selected_size: Option<String>,
}

impl<'a> RecommendationRequest<'a> {
    pub fn new(current: &'a Product) -> Self {
        Self { current, max_items: super::DEFAULT_MAX_RECOMMENDATIONS, selected_size: None }
    }

    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = max_items;
        self
    }

    pub fn with_selected_size(mut self, size: impl Into<String>) -> Self {
        self.selected_size = Some(size.into());
        self
    }
}
