use std::path::Path;

use haberdash_core::{ApplicationError, VariantGrouping};
use serde::Serialize;

use crate::commands::input::{find_product, load_catalog};
use crate::commands::{engine, CommandResult};

const COMMAND: &str = "organize";

#[derive(Debug, Serialize)]
struct OrganizeOutput {
    product_id: String,
    category: &'static str,
    grouping: VariantGrouping,
}

pub fn run(catalog_path: &Path, product_id: &str) -> CommandResult {
    match organize(catalog_path, product_id) {
        Ok(output) => {
            let message = format!(
                "organized {} variant(s) into {} group(s)",
                output.grouping.len(),
                output.grouping.groups().len()
            );
            CommandResult::success_with_data(COMMAND, message, &output)
        }
        Err(error) => CommandResult::from_error(COMMAND, &error),
    }
}

fn organize(catalog_path: &Path, product_id: &str) -> Result<OrganizeOutput, ApplicationError> {
    let catalog = load_catalog(catalog_path)?;
    let product = find_product(&catalog, product_id)?;

    Ok(OrganizeOutput {
        product_id: product.id.0.clone(),
        category: product.category_kind().as_str(),
        grouping: engine(product_id).organize(product),
    })
}
