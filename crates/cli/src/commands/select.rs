use std::path::PathBuf;

use haberdash_core::variants::PickerOption;
use haberdash_core::{ApplicationError, SelectionState, Variant, VariantId, VariantSelector};
use serde::Serialize;

use crate::commands::input::{find_product, load_catalog};
use crate::commands::{engine, CommandResult};

const COMMAND: &str = "select";

#[derive(Debug, Clone)]
pub struct SelectArgs {
    pub catalog: PathBuf,
    pub product: String,
    pub color: Option<String>,
    pub size: Option<String>,
    pub variant: Option<String>,
}

#[derive(Debug, Serialize)]
struct Transition {
    action: String,
    from: SelectionState,
    to: SelectionState,
    emitted: Option<Variant>,
}

#[derive(Debug, Serialize)]
struct SelectOutput {
    product_id: String,
    state: SelectionState,
    selected_color: Option<String>,
    selected_size: Option<String>,
    variant: Option<Variant>,
    transitions: Vec<Transition>,
    color_options: Vec<PickerOption>,
    size_options: Vec<PickerOption>,
}

pub fn run(args: &SelectArgs) -> CommandResult {
    match select(args) {
        Ok(output) => {
            let message = match &output.variant {
                Some(variant) => format!("selected variant `{}`", variant.name),
                None => format!("no available variant resolved ({:?})", output.state),
            };
            CommandResult::success_with_data(COMMAND, message, &output)
        }
        Err(error) => CommandResult::from_error(COMMAND, &error),
    }
}

fn select(args: &SelectArgs) -> Result<SelectOutput, ApplicationError> {
    let catalog = load_catalog(&args.catalog)?;
    let product = find_product(&catalog, &args.product)?;
    let engine = engine(&args.product);
    let variants = engine.normalized_variants(product);

    let mut selector = match &args.variant {
        Some(id) => {
            let id = VariantId(id.clone());
            if !variants.iter().any(|variant| variant.id.as_ref() == Some(&id)) {
                return Err(ApplicationError::Input(format!(
                    "variant `{}` does not belong to product `{}`",
                    id.0, args.product
                )));
            }
            VariantSelector::with_selected_variant(&variants, &id)
        }
        None => VariantSelector::new(&variants),
    };

    let mut transitions = Vec::new();
    if let Some(color) = &args.color {
        let outcome = selector.select_color(color.as_str());
        engine.record_selection(product, &outcome);
        transitions.push(Transition {
            action: format!("color:{color}"),
            from: outcome.from,
            to: outcome.to,
            emitted: outcome.emitted.cloned(),
        });
    }
    if let Some(size) = &args.size {
        let outcome = selector.select_size(size.as_str());
        engine.record_selection(product, &outcome);
        transitions.push(Transition {
            action: format!("size:{size}"),
            from: outcome.from,
            to: outcome.to,
            emitted: outcome.emitted.cloned(),
        });
    }

    tracing::info!(
        event_name = "variants.selection.settled",
        product_id = %args.product,
        state = ?selector.state(),
        transitions = transitions.len(),
    );

    Ok(SelectOutput {
        product_id: product.id.0.clone(),
        state: selector.state(),
        selected_color: selector.selected_color().map(str::to_owned),
        selected_size: selector.selected_size().map(str::to_owned),
        variant: selector.selected_variant().cloned(),
        transitions,
        color_options: selector.color_options(),
        size_options: selector.size_options(),
    })
}
