use crate::config::AppConfig;
use crate::domain::bundle::{BundleLineItem, DiscountTier};
use crate::domain::product::{Product, Variant};
use crate::pricing::{BundlePricer, DeterministicBundlePricer, PriceBreakdown};
use crate::recommendations::{
    RecommendationRequest, RecommendationScorer, ScoredCandidate, DEFAULT_MAX_RECOMMENDATIONS,
};
use crate::trace::{NoopTraceSink, TraceEvent, TraceSink, TraceStage};
use crate::variants::{normalize_all, organize_traced, SelectionOutcome, VariantGrouping};

/// Bundles the engine components with their static configuration and an
/// optional trace sink.
pub struct CatalogEngine<P, S> {
    pricer: P,
    scorer: RecommendationScorer,
    sink: S,
    tiers: Vec<DiscountTier>,
    max_recommendations: usize,
    correlation_id: String,
}

impl<P, S> CatalogEngine<P, S> {
    pub fn new(pricer: P, scorer: RecommendationScorer, sink: S) -> Self {
        Self {
            pricer,
            scorer,
            sink,
            tiers: Vec::new(),
            max_recommendations: DEFAULT_MAX_RECOMMENDATIONS,
            correlation_id: "engine".to_owned(),
        }
    }

    pub fn with_config(mut self, config: &AppConfig) -> Self {
        self.tiers = config.bundle.tiers.clone();
        self.max_recommendations = config.recommendations.max_items;
        self
    }

    pub fn with_tiers(mut self, tiers: Vec<DiscountTier>) -> Self {
        self.tiers = tiers;
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = correlation_id.into();
        self
    }

    pub fn tiers(&self) -> &[DiscountTier] {
        &self.tiers
    }

    pub fn max_recommendations(&self) -> usize {
        self.max_recommendations
    }
}

impl Default for CatalogEngine<DeterministicBundlePricer, NoopTraceSink> {
    fn default() -> Self {
        Self::new(DeterministicBundlePricer, RecommendationScorer::default(), NoopTraceSink)
            .with_config(&AppConfig::default())
    }
}

impl<P, S> CatalogEngine<P, S>
where
    P: BundlePricer,
    S: TraceSink,
{
    /// Normalized copies of a product's variants, ready for a selector.
    pub fn normalized_variants(&self, product: &Product) -> Vec<Variant> {
        let kind = product.category_kind();
        let variants = normalize_all(&product.variants, kind);
        self.sink.emit(
            TraceEvent::new(&self.correlation_id, "variants.normalized", TraceStage::Normalize)
                .with_metadata("product_id", product.id.0.clone())
                .with_metadata("kind", kind.as_str())
                .with_metadata("variants", variants.len().to_string()),
        );
        variants
    }

    /// Records one selector transition for `product`.
    pub fn record_selection(&self, product: &Product, outcome: &SelectionOutcome<'_>) {
        let emitted = outcome.emitted.map_or_else(String::new, |variant| variant.sku.clone());
        self.sink.emit(
            TraceEvent::new(&self.correlation_id, "variants.selection_changed", TraceStage::Select)
                .with_metadata("product_id", product.id.0.clone())
                .with_metadata("from", format!("{:?}", outcome.from))
                .with_metadata("to", format!("{:?}", outcome.to))
                .with_metadata("emitted_sku", emitted),
        );
    }

    pub fn organize(&self, product: &Product) -> VariantGrouping {
        organize_traced(&product.variants, product.category_kind(), &self.sink, &self.correlation_id)
    }

    pub fn price(&self, items: &[BundleLineItem]) -> PriceBreakdown {
        let breakdown = self.pricer.price(items, &self.tiers);
        self.sink.emit(
            TraceEvent::new(&self.correlation_id, "pricing.computed", TraceStage::Pricing)
                .with_metadata("total_items", breakdown.total_items.to_string())
                .with_metadata("final_price", breakdown.final_price.to_string())
                .with_metadata("items_needed", breakdown.items_needed.to_string()),
        );
        breakdown
    }

    pub fn recommend(
        &self,
        current: &Product,
        catalog: &[Product],
        max_items: Option<usize>,
        selected_size: Option<&str>,
    ) -> Vec<ScoredCandidate> {
        let mut request = RecommendationRequest::new(current)
            .with_max_items(max_items.unwrap_or(self.max_recommendations));
        if let Some(size) = selected_size {
            request = request.with_selected_size(size);
        }
        self.scorer.recommend_traced(&request, catalog, &self.sink, &self.correlation_id)
    }
}
