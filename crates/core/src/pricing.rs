//! Tiered bundle pricing.
//!
//! [`compute_price`] is pure and cheap enough to rerun on every quantity change.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::bundle::{Bundle, BundleLineItem, DiscountKind, DiscountTier};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingTraceStep {
    pub stage: String,
    pub detail: String,
    pub amount: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    pub total_items: u32,
    pub subtotal: Decimal,
    pub original_total: Decimal,
    pub best_discount: Option<DiscountTier>,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
    pub total_savings: Decimal,
    pub savings_percentage: Decimal,
    pub next_tier: Option<DiscountTier>,
    pub items_needed: u32,
    pub trace: Vec<PricingTraceStep>,
}

pub trait BundlePricer: Send + Sync {
    fn price(&self, items: &[BundleLineItem], tiers: &[DiscountTier]) -> PriceBreakdown;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DeterministicBundlePricer;

impl BundlePricer for DeterministicBundlePricer {
    fn price(&self, items: &[BundleLineItem], tiers: &[DiscountTier]) -> PriceBreakdown {
        compute_price(items, tiers)
    }
}

impl Bundle {
    pub fn price<P>(&self, pricer: &P, tiers: &[DiscountTier]) -> PriceBreakdown
    where
        P: BundlePricer + ?Sized,
    {
        pricer.price(self.items(), tiers)
    }
}

pub fn compute_price(items: &[BundleLineItem], tiers: &[DiscountTier]) -> PriceBreakdown {
    let total_items: u32 = items.iter().map(|item| item.quantity).sum();
    let subtotal: Decimal = items.iter().map(BundleLineItem::line_total).sum();
    let original_total: Decimal = items.iter().map(BundleLineItem::original_line_total).sum();

    // An empty bundle takes no discount, even from a tier without a minimum.
    let best_discount =
        if total_items == 0 { None } else { best_applicable_tier(tiers, total_items) };
    let discount_amount = best_discount.map_or(Decimal::ZERO, |tier| match tier.kind {
        DiscountKind::Percentage => subtotal * tier.value / Decimal::ONE_HUNDRED,
        DiscountKind::Fixed => tier.value,
    });
    let final_price = subtotal - discount_amount;

    let total_savings = original_total - final_price;
    let savings_percentage = if original_total > Decimal::ZERO {
        total_savings / original_total * Decimal::ONE_HUNDRED
    } else {
        Decimal::ZERO
    };

    let next_tier = next_tier(tiers, total_items);
    let items_needed =
        next_tier.and_then(|tier| tier.min_items).map_or(0, |min_items| min_items - total_items);

    let mut trace = vec![
        PricingTraceStep {
            stage: "subtotal".to_string(),
            detail: "sum(price * quantity)".to_string(),
            amount: subtotal,
        },
        PricingTraceStep {
            stage: "original_total".to_string(),
            detail: "sum((compare_at_price or price) * quantity)".to_string(),
            amount: original_total,
        },
    ];
    if let Some(tier) = best_discount {
        trace.push(PricingTraceStep {
            stage: "discount".to_string(),
            detail: format!("{:?} {} ({})", tier.kind, tier.value, tier.description),
            amount: discount_amount,
        });
    }
    trace.push(PricingTraceStep {
        stage: "final_price".to_string(),
        detail: "subtotal - discount".to_string(),
        amount: final_price,
    });

    PriceBreakdown {
        total_items,
        subtotal,
        original_total,
        best_discount: best_discount.cloned(),
        discount_amount,
        final_price,
        total_savings,
        savings_percentage,
        next_tier: next_tier.cloned(),
        items_needed,
        trace,
    }
}

/// Highest `value` among tiers whose minimum is met. Equal values keep the
/// earliest tier, the same pick a stable descending sort would make.
fn best_applicable_tier(tiers: &[DiscountTier], total_items: u32) -> Option<&DiscountTier> {
    tiers.iter().filter(|tier| tier.applies_to(total_items)).fold(None, |best, tier| match best {
        Some(current) if tier.value <= current.value => Some(current),
        _ => Some(tier),
    })
}

/// Lowest `min_items` still above the current count; earliest tier on ties.
fn next_tier(tiers: &[DiscountTier], total_items: u32) -> Option<&DiscountTier> {
    tiers
        .iter()
        .filter(|tier| tier.min_items.is_some_and(|min_items| min_items > total_items))
        .fold(None, |next, tier| match next {
            Some(current) if tier.min_items >= current.min_items => Some(current),
            _ => Some(tier),
        })
}
