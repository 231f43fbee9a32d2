use std::path::Path;

use haberdash_core::config::AppConfig;
use haberdash_core::{ApplicationError, Bundle, BundleLineItem, DiscountTier, PriceBreakdown};
use serde::Serialize;

use crate::commands::input::{load_config, load_line_items, load_tiers};
use crate::commands::{engine, CommandResult};

const COMMAND: &str = "price";

#[derive(Debug, Serialize)]
struct PriceOutput {
    items: Vec<BundleLineItem>,
    breakdown: PriceBreakdown,
}

pub fn run(bundle_path: &Path, tiers_path: Option<&Path>) -> CommandResult {
    match price(bundle_path, tiers_path) {
        Ok(output) => {
            let breakdown = &output.breakdown;
            let message = match &breakdown.next_tier {
                Some(next) => format!(
                    "final price {} for {} item(s); add {} more for `{}`",
                    breakdown.final_price,
                    breakdown.total_items,
                    breakdown.items_needed,
                    next.description
                ),
                None => format!(
                    "final price {} for {} item(s)",
                    breakdown.final_price, breakdown.total_items
                ),
            };
            CommandResult::success_with_data(COMMAND, message, &output)
        }
        Err(error) => CommandResult::from_error(COMMAND, &error),
    }
}

fn price(bundle_path: &Path, tiers_path: Option<&Path>) -> Result<PriceOutput, ApplicationError> {
    let tiers = match tiers_path {
        Some(path) => validated_tiers(load_tiers(path)?)?,
        None => load_config()?.bundle.tiers,
    };

    let bundle = Bundle::new(load_line_items(bundle_path)?);
    let breakdown = engine(COMMAND).with_tiers(tiers).price(bundle.items());

    Ok(PriceOutput { items: bundle.items().to_vec(), breakdown })
}

/// Tier files go through the same checks as `bundle.tiers` in config.
fn validated_tiers(tiers: Vec<DiscountTier>) -> Result<Vec<DiscountTier>, ApplicationError> {
    let mut config = AppConfig::default();
    config.bundle.tiers = tiers;
    config.validate().map_err(|error| ApplicationError::Input(error.to_string()))?;
    Ok(config.bundle.tiers)
}
