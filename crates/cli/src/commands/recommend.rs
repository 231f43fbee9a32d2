use std::path::Path;

use haberdash_core::{ApplicationError, ScoredCandidate};
use serde::Serialize;

use crate::commands::input::{find_product, load_catalog, load_config};
use crate::commands::{engine, CommandResult};

const COMMAND: &str = "recommend";

#[derive(Debug, Serialize)]
struct RecommendOutput {
    product_id: String,
    max_items: usize,
    recommendations: Vec<ScoredCandidate>,
}

pub fn run(
    catalog_path: &Path,
    product_id: &str,
    max_items: Option<usize>,
    selected_size: Option<&str>,
) -> CommandResult {
    match recommend(catalog_path, product_id, max_items, selected_size) {
        Ok(output) => {
            let message = format!(
                "{} recommendation(s) for `{}`",
                output.recommendations.len(),
                output.product_id
            );
            CommandResult::success_with_data(COMMAND, message, &output)
        }
        Err(error) => CommandResult::from_error(COMMAND, &error),
    }
}

fn recommend(
    catalog_path: &Path,
    product_id: &str,
    max_items: Option<usize>,
    selected_size: Option<&str>,
) -> Result<RecommendOutput, ApplicationError> {
    let config = load_config()?;
    let catalog = load_catalog(catalog_path)?;
    let current = find_product(&catalog, product_id)?;

    let engine = engine(product_id).with_config(&config);
    let max_items = max_items.unwrap_or(engine.max_recommendations());
    let recommendations = engine.recommend(current, &catalog, Some(max_items), selected_size);

    Ok(RecommendOutput { product_id: current.id.0.clone(), max_items, recommendations })
}
