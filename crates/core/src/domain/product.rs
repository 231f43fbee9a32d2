use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::variants::CategoryKind;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId(pub String);

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantId(pub String);

/// A concrete purchasable configuration of a product.
///
/// `size` and `color` may be missing on raw catalog records; see
/// [`crate::variants::normalize`] for how they are derived from `name`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(default)]
    pub id: Option<VariantId>,
    pub name: String,
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub price: Option<Decimal>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Variant {
    /// Active and in stock.
    pub fn is_available(&self) -> bool {
        self.is_active && self.stock > 0
    }

    pub fn size(&self) -> Option<&str> {
        self.size.as_deref().filter(|value| !value.is_empty())
    }

    pub fn color(&self) -> Option<&str> {
        self.color.as_deref().filter(|value| !value.is_empty())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub price: Decimal,
    #[serde(default)]
    pub compare_at_price: Option<Decimal>,
    #[serde(default)]
    pub variants: Vec<Variant>,
    #[serde(default)]
    pub pairs_well_with: Vec<String>,
}

impl Product {
    pub fn category_kind(&self) -> CategoryKind {
        CategoryKind::classify(&self.category)
    }

    pub fn find_variant(&self, variant_id: &VariantId) -> Option<&Variant> {
        self.variants.iter().find(|variant| variant.id.as_ref() == Some(variant_id))
    }

    /// Distinct non-empty variant colors.
    pub fn variant_colors(&self) -> std::collections::BTreeSet<&str> {
        self.variants.iter().filter_map(Variant::color).collect()
    }
}
