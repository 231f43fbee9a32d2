//! Variant resolution and bundle pricing for a menswear catalog.
//!
//! Every operation here is pure and synchronous over in-memory records. Inputs
//! are borrowed and never mutated; results are new derived structures.

pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod pricing;
pub mod recommendations;
pub mod trace;
pub mod variants;

pub use domain::bundle::{Bundle, BundleLineItem, DiscountKind, DiscountTier, VariantSelection};
pub use domain::product::{Product, ProductId, Variant, VariantId};
pub use engine::CatalogEngine;
pub use errors::{ApplicationError, DomainError};
pub use pricing::{compute_price, BundlePricer, DeterministicBundlePricer, PriceBreakdown};
pub use recommendations::{AffinityTable, RecommendationScorer, ScoredCandidate};
pub use trace::{InMemoryTraceSink, NoopTraceSink, TraceEvent, TraceSink, TracingTraceSink};
pub use variants::{
    normalize, organize, CategoryKind, SelectionState, VariantGrouping, VariantSelector,
};
