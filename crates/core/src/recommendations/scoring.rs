//! Ranks catalog products that complete an outfit with the one being viewed.

use std::collections::BTreeSet;

use rust_decimal::Decimal;

use super::sizing::suggest_shirt_size;
use super::types::*;
use super::{COLOR_MATCH_POINTS, PAIRS_WELL_WITH_POINTS, PRICE_PROXIMITY_POINTS};
use crate::domain::product::Product;
use crate::trace::{NoopTraceSink, TraceEvent, TraceSink, TraceStage};
use crate::variants::{normalize, CategoryKind, NO_COLOR};

/// Points awarded for a (current, candidate) category pairing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AffinityTable {
    pairs: Vec<(CategoryKind, CategoryKind, u32)>,
}

impl AffinityTable {
    pub fn empty() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Adds a pairing, replacing any existing points for the same direction.
    pub fn with_pair(mut self, current: CategoryKind, candidate: CategoryKind, points: u32) -> Self {
        match self.pairs.iter_mut().find(|(from, to, _)| *from == current && *to == candidate) {
            Some(pair) => pair.2 = points,
            None => self.pairs.push((current, candidate, points)),
        }
        self
    }

    pub fn points(&self, current: CategoryKind, candidate: CategoryKind) -> u32 {
        self.pairs
            .iter()
            .find(|(from, to, _)| *from == current && *to == candidate)
            .map_or(0, |(_, _, points)| *points)
    }
}

impl Default for AffinityTable {
    fn default() -> Self {
        Self::empty()
            .with_pair(CategoryKind::Suit, CategoryKind::Shirt, 8)
            .with_pair(CategoryKind::Suit, CategoryKind::Tie, 7)
            .with_pair(CategoryKind::Shirt, CategoryKind::Tie, 6)
    }
}

/// Scores every candidate against the product on screen using an [`AffinityTable`].
#[derive(Debug, Clone, Default)]
pub struct RecommendationScorer {
    affinity: AffinityTable,
}

impl RecommendationScorer {
    /// Suit, shirt and tie pairings from [`AffinityTable::default`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the built-in pairings, e.g. to add belts or pocket squares.
    pub fn with_affinity(affinity: AffinityTable) -> Self {
        Self { affinity }
    }

    pub fn affinity(&self) -> &AffinityTable {
        &self.affinity
    }

    /// Ranks `candidates` against `current`, highest score first, keeping
    /// input order among equal scores.
    pub fn score(
        &self,
        current: &Product,
        candidates: &[Product],
        max_items: usize,
    ) -> Vec<ScoredCandidate> {
        self.recommend(&RecommendationRequest::new(current).with_max_items(max_items), candidates)
    }

    pub fn recommend(
        &self,
        request: &RecommendationRequest<'_>,
        candidates: &[Product],
    ) -> Vec<ScoredCandidate> {
        self.recommend_traced(request, candidates, &NoopTraceSink, "recommend")
    }

    pub fn recommend_traced<S>(
        &self,
        request: &RecommendationRequest<'_>,
        candidates: &[Product],
        sink: &S,
        correlation_id: &str,
    ) -> Vec<ScoredCandidate>
    where
        S: TraceSink + ?Sized,
    {
        let current = request.current;
        let current_kind = current.category_kind();
        let current_colors = normalized_colors(current, current_kind);

        let mut scored = candidates
            .iter()
            .filter(|candidate| candidate.id != current.id)
            .map(|candidate| {
                let candidate_kind = candidate.category_kind();
                let breakdown = self.score_components(
                    current,
                    current_kind,
                    &current_colors,
                    candidate,
                    candidate_kind,
                );
                let suggested_size = match (current_kind, candidate_kind) {
                    (CategoryKind::Suit, CategoryKind::Shirt) => request
                        .selected_size
                        .as_deref()
                        .and_then(suggest_shirt_size)
                        .map(str::to_owned),
                    _ => None,
                };

                sink.emit(
                    TraceEvent::new(
                        correlation_id,
                        "recommendations.candidate_scored",
                        TraceStage::Recommendation,
                    )
                    .with_metadata("candidate_id", candidate.id.0.clone())
                    .with_metadata("score", breakdown.total().to_string()),
                );

                ScoredCandidate {
                    product: candidate.clone(),
                    score: breakdown.total(),
                    suggested_size,
                    breakdown,
                }
            })
            .collect::<Vec<_>>();

        scored.sort_by(|left, right| right.score.cmp(&left.score));
        scored.truncate(request.max_items);
        scored
    }

    /// Per-signal points for one candidate; their sum is its score.
    pub fn score_candidate(&self, current: &Product, candidate: &Product) -> ScoreBreakdown {
        let current_kind = current.category_kind();
        self.score_components(
            current,
            current_kind,
            &normalized_colors(current, current_kind),
            candidate,
            candidate.category_kind(),
        )
    }

    fn score_components(
        &self,
        current: &Product,
        current_kind: CategoryKind,
        current_colors: &BTreeSet<String>,
        candidate: &Product,
        candidate_kind: CategoryKind,
    ) -> ScoreBreakdown {
        let pairs_well_with =
            if current.pairs_well_with.iter().any(|category| *category == candidate.category) {
                PAIRS_WELL_WITH_POINTS
            } else {
                0
            };

        let candidate_colors = normalized_colors(candidate, candidate_kind);
        let color_match = if current_colors.intersection(&candidate_colors).next().is_some() {
            COLOR_MATCH_POINTS
        } else {
            0
        };

        let price_proximity = if is_price_close(current.price, candidate.price) {
            PRICE_PROXIMITY_POINTS
        } else {
            0
        };

        ScoreBreakdown {
            pairs_well_with,
            category_affinity: self.affinity.points(current_kind, candidate_kind),
            color_match,
            price_proximity,
        }
    }
}

/// `|candidate - current| / current < 0.5`; never true for a non-positive current price.
fn is_price_close(current: Decimal, candidate: Decimal) -> bool {
    current > Decimal::ZERO && (candidate - current).abs() < current * Decimal::new(5, 1)
}

fn normalized_colors(product: &Product, kind: CategoryKind) -> BTreeSet<String> {
    product
        .variants
        .iter()
        .filter_map(|variant| normalize(variant, kind).color().map(str::to_owned))
        .filter(|color| color.as_str() != NO_COLOR)
        .collect()
}
