use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::{Product, ProductId, Variant};
use crate::errors::DomainError;

/// The size/color a line item was added with.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantSelection {
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl VariantSelection {
    pub fn from_variant(variant: &Variant) -> Self {
        Self { size: variant.size.clone(), color: variant.color.clone() }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleLineItem {
    pub product_id: ProductId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub compare_at_price: Option<Decimal>,
    pub category: String,
    #[serde(default)]
    pub variant: Option<VariantSelection>,
    pub quantity: u32,
}

impl BundleLineItem {
    /// Builds a line from a catalog product and the variant the shopper resolved.
    /// A variant-level price overrides the product price.
    pub fn from_product(product: &Product, variant: Option<&Variant>, quantity: u32) -> Self {
        let price = variant.and_then(|variant| variant.price).unwrap_or(product.price);
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price,
            compare_at_price: product.compare_at_price,
            category: product.category.clone(),
            variant: variant.map(VariantSelection::from_variant),
            quantity,
        }
    }

    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Pre-sale value of the line; falls back to `price` without a compare-at price.
    pub fn original_line_total(&self) -> Decimal {
        self.compare_at_price.unwrap_or(self.price) * Decimal::from(self.quantity)
    }

    fn same_line(&self, product_id: &ProductId, variant: Option<&VariantSelection>) -> bool {
        &self.product_id == product_id && self.variant.as_ref() == variant
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountKind {
    Percentage,
    Fixed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountTier {
    #[serde(rename = "type")]
    pub kind: DiscountKind,
    pub value: Decimal,
    #[serde(default, alias = "min_items")]
    pub min_items: Option<u32>,
    #[serde(default)]
    pub description: String,
}

impl DiscountTier {
    pub fn percentage(value: Decimal, min_items: Option<u32>, description: impl Into<String>) -> Self {
        Self { kind: DiscountKind::Percentage, value, min_items, description: description.into() }
    }

    pub fn fixed(value: Decimal, min_items: Option<u32>, description: impl Into<String>) -> Self {
        Self { kind: DiscountKind::Fixed, value, min_items, description: description.into() }
    }

    pub fn applies_to(&self, total_items: u32) -> bool {
        self.min_items.map_or(true, |min_items| total_items >= min_items)
    }
}

/// A shopper's working bundle. Lines keep insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bundle {
    items: Vec<BundleLineItem>,
}

impl Bundle {
    pub fn new(items: Vec<BundleLineItem>) -> Self {
        let mut bundle = Self::default();
        for item in items {
            bundle.add_item(item);
        }
        bundle
    }

    pub fn items(&self) -> &[BundleLineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Adds a line, merging into an existing line for the same product and variant.
    /// A zero-quantity item is ignored.
    pub fn add_item(&mut self, item: BundleLineItem) {
        if item.quantity == 0 {
            return;
        }

        let existing = self
            .items
            .iter_mut()
            .find(|line| line.same_line(&item.product_id, item.variant.as_ref()));
        match existing {
            Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
            None => self.items.push(item),
        }
    }

    /// Sets a line's quantity; zero removes the line.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        variant: Option<&VariantSelection>,
        quantity: u32,
    ) -> Result<(), DomainError> {
        let position = self
            .items
            .iter()
            .position(|line| line.same_line(product_id, variant))
            .ok_or_else(|| DomainError::LineItemNotFound { product_id: product_id.0.clone() })?;

        if quantity == 0 {
            self.items.remove(position);
        } else {
            self.items[position].quantity = quantity;
        }
        Ok(())
    }

    pub fn remove_item(
        &mut self,
        product_id: &ProductId,
        variant: Option<&VariantSelection>,
    ) -> Result<BundleLineItem, DomainError> {
        let position = self
            .items
            .iter()
            .position(|line| line.same_line(product_id, variant))
            .ok_or_else(|| DomainError::LineItemNotFound { product_id: product_id.0.clone() })?;
        Ok(self.items.remove(position))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{Bundle, BundleLineItem, DiscountKind, DiscountTier, VariantSelection};
    use crate::domain::product::{Product, ProductId, Variant};
    use crate::errors::DomainError;

    fn line(product: &str, size: &str, quantity: u32) -> BundleLineItem {
        BundleLineItem {
            product_id: ProductId(product.to_owned()),
            name: format!("{product} name"),
            price: Decimal::new(5_000, 2),
            compare_at_price: None,
            category: "Shirts".to_owned(),
            variant: Some(VariantSelection { size: Some(size.to_owned()), color: None }),
            quantity,
        }
    }

    #[test]
    fn adding_same_product_and_variant_merges_quantity() {
        let mut bundle = Bundle::default();
        bundle.add_item(line("shirt-1", "15.5\"", 1));
        bundle.add_item(line("shirt-1", "15.5\"", 2));
        bundle.add_item(line("shirt-1", "16\"", 1));

        assert_eq!(bundle.items().len(), 2);
        assert_eq!(bundle.items()[0].quantity, 3);
        assert_eq!(bundle.total_items(), 4);
    }

    #[test]
    fn zero_quantity_destroys_the_line() {
        let mut bundle = Bundle::new(vec![line("shirt-1", "16\"", 2), line("tie-1", "n/a", 1)]);
        let selection = VariantSelection { size: Some("16\"".to_owned()), color: None };

        bundle
            .set_quantity(&ProductId("shirt-1".to_owned()), Some(&selection), 0)
            .expect("line exists");

        assert_eq!(bundle.items().len(), 1);
        assert_eq!(bundle.items()[0].product_id, ProductId("tie-1".to_owned()));
    }

    #[test]
    fn updating_unknown_line_is_rejected() {
        let mut bundle = Bundle::new(vec![line("shirt-1", "16\"", 2)]);
        let error = bundle
            .set_quantity(&ProductId("suit-9".to_owned()), None, 1)
            .expect_err("unknown line");

        assert!(matches!(error, DomainError::LineItemNotFound { ref product_id } if product_id == "suit-9"));
    }

    #[test]
    fn line_from_product_prefers_variant_price() {
        let product = Product {
            id: ProductId("suit-1".to_owned()),
            name: "Charcoal Suit".to_owned(),
            category: "Suits".to_owned(),
            price: Decimal::new(45_000, 2),
            compare_at_price: Some(Decimal::new(60_000, 2)),
            variants: Vec::new(),
            pairs_well_with: Vec::new(),
        };
        let variant = Variant {
            id: None,
            name: "Charcoal 44L".to_owned(),
            sku: "CH-44L".to_owned(),
            size: Some("44L".to_owned()),
            color: None,
            stock: 2,
            price: Some(Decimal::new(47_500, 2)),
            is_active: true,
        };

        let item = BundleLineItem::from_product(&product, Some(&variant), 1);

        assert_eq!(item.price, Decimal::new(47_500, 2));
        assert_eq!(item.compare_at_price, Some(Decimal::new(60_000, 2)));
        assert_eq!(item.variant.and_then(|selection| selection.size).as_deref(), Some("44L"));
    }

    #[test]
    fn tier_without_minimum_always_applies() {
        let open = DiscountTier::fixed(Decimal::new(5, 0), None, "launch credit");
        let gated = DiscountTier::percentage(Decimal::new(10, 0), Some(3), "3+ items");

        assert!(open.applies_to(0));
        assert!(!gated.applies_to(2));
        assert!(gated.applies_to(3));
        assert_eq!(gated.kind, DiscountKind::Percentage);
    }

    #[test]
    fn tier_json_accepts_type_tag() {
        let tier: DiscountTier =
            serde_json::from_str(r#"{"type":"percentage","value":10,"minItems":2,"description":"Buy 2"}"#)
                .expect("tier should parse");

        assert_eq!(tier.kind, DiscountKind::Percentage);
        assert_eq!(tier.min_items, Some(2));
    }
}
