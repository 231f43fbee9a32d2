//! Cross-sell recommendations.
//!
//! Candidates are ranked against the product being viewed by declared pairing,
//! category affinity, shared colors, and price proximity.

mod scoring;
mod sizing;
mod types;

pub use scoring::{AffinityTable, RecommendationScorer};
pub use sizing::suggest_shirt_size;
pub use types::*;

/// Candidate category is listed in the current product's `pairs_well_with`.
pub const PAIRS_WELL_WITH_POINTS: u32 = 10;

/// Candidate shares at least one variant color with the current product.
pub const COLOR_MATCH_POINTS: u32 = 5;

/// Candidate price is within half of the current price.
pub const PRICE_PROXIMITY_POINTS: u32 = 3;

/// Maximum recommendations to return when the caller does not say.
pub const DEFAULT_MAX_RECOMMENDATIONS: usize = 4;
