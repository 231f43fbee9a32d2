//! Resolves a (color, size) pick to a concrete, purchasable variant.
//!
//! Selection is commutative: color and size may be picked in either order. A
//! pick that resolves to an inactive or out-of-stock variant is not an error;
//! nothing is emitted and the selector stays partial.

use serde::{Deserialize, Serialize};

use crate::domain::product::{Variant, VariantId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionState {
    NoSelection,
    ColorOnly,
    SizeOnly,
    FullySelected,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SelectionOutcome<'a> {
    pub from: SelectionState,
    pub to: SelectionState,
    /// The variant handed to the caller, only when it is available.
    pub emitted: Option<&'a Variant>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerOption {
    pub value: String,
    pub available: bool,
}

/// First variant, in catalog order, whose fields match every non-`None` filter.
pub fn resolve<'a>(
    variants: &'a [Variant],
    color: Option<&str>,
    size: Option<&str>,
) -> Option<&'a Variant> {
    resolve_index(variants, color, size).map(|index| &variants[index])
}

pub fn is_available(variants: &[Variant], color: Option<&str>, size: Option<&str>) -> bool {
    resolve(variants, color, size).is_some_and(Variant::is_available)
}

fn resolve_index(variants: &[Variant], color: Option<&str>, size: Option<&str>) -> Option<usize> {
    variants.iter().position(|variant| {
        color.map_or(true, |color| variant.color() == Some(color))
            && size.map_or(true, |size| variant.size() == Some(size))
    })
}

#[derive(Clone, Debug)]
pub struct VariantSelector<'a> {
    variants: &'a [Variant],
    selected_color: Option<String>,
    selected_size: Option<String>,
    selected: Option<usize>,
    state: SelectionState,
}

impl<'a> VariantSelector<'a> {
    pub fn new(variants: &'a [Variant]) -> Self {
        Self {
            variants,
            selected_color: None,
            selected_size: None,
            selected: None,
            state: SelectionState::NoSelection,
        }
    }

    /// Seeds the selection from an externally chosen variant. An unknown id
    /// leaves the selector in `NoSelection`.
    pub fn with_selected_variant(variants: &'a [Variant], variant_id: &VariantId) -> Self {
        let mut selector = Self::new(variants);
        let seeded =
            variants.iter().position(|variant| variant.id.as_ref() == Some(variant_id));
        if let Some(index) = seeded {
            selector.selected_color = variants[index].color().map(str::to_owned);
            selector.selected_size = variants[index].size().map(str::to_owned);
            selector.selected = Some(index);
            selector.state = SelectionState::FullySelected;
        }
        selector
    }

    pub fn state(&self) -> SelectionState {
        self.state
    }

    pub fn selected_color(&self) -> Option<&str> {
        self.selected_color.as_deref()
    }

    pub fn selected_size(&self) -> Option<&str> {
        self.selected_size.as_deref()
    }

    pub fn selected_variant(&self) -> Option<&'a Variant> {
        let variants = self.variants;
        self.selected.map(|index| &variants[index])
    }

    pub fn select_color(&mut self, color: impl Into<String>) -> SelectionOutcome<'a> {
        self.selected_color = Some(color.into());
        self.settle(SelectionState::ColorOnly)
    }

    pub fn select_size(&mut self, size: impl Into<String>) -> SelectionOutcome<'a> {
        self.selected_size = Some(size.into());
        self.settle(SelectionState::SizeOnly)
    }

    pub fn clear(&mut self) {
        self.selected_color = None;
        self.selected_size = None;
        self.selected = None;
        self.state = SelectionState::NoSelection;
    }

    pub fn resolve(&self, color: Option<&str>, size: Option<&str>) -> Option<&'a Variant> {
        resolve(self.variants, color, size)
    }

    pub fn is_available(&self, color: Option<&str>, size: Option<&str>) -> bool {
        is_available(self.variants, color, size)
    }

    /// Distinct colors in catalog order, flagged against the current size.
    pub fn color_options(&self) -> Vec<PickerOption> {
        self.options(Variant::color, |color| {
            self.is_available(Some(color), self.selected_size())
        })
    }

    /// Distinct sizes in catalog order, flagged against the current color.
    pub fn size_options(&self) -> Vec<PickerOption> {
        self.options(Variant::size, |size| {
            self.is_available(self.selected_color(), Some(size))
        })
    }

    fn options<F, A>(&self, field: F, available: A) -> Vec<PickerOption>
    where
        F: Fn(&Variant) -> Option<&str>,
        A: Fn(&str) -> bool,
    {
        let mut options: Vec<PickerOption> = Vec::new();
        for value in self.variants.iter().filter_map(|variant| field(variant)) {
            if options.iter().all(|option| option.value != value) {
                options.push(PickerOption { value: value.to_owned(), available: available(value) });
            }
        }
        options
    }

    fn settle(&mut self, partial: SelectionState) -> SelectionOutcome<'a> {
        let from = self.state;
        let resolved = resolve_index(self.variants, self.selected_color(), self.selected_size())
            .filter(|index| self.variants[*index].is_available());

        self.selected = resolved;
        self.state = match (resolved, from) {
            (Some(_), _) => SelectionState::FullySelected,
            (None, SelectionState::ColorOnly | SelectionState::SizeOnly) => from,
            (None, _) => partial,
        };

        SelectionOutcome { from, to: self.state, emitted: self.selected_variant() }
    }
}

#[cfg(test)]
mod tests {
    use super::{is_available, resolve, PickerOption, SelectionState, VariantSelector};
    use crate::domain::product::{Variant, VariantId};

    fn variant(id: &str, color: &str, size: &str, stock: u32, is_active: bool) -> Variant {
        Variant {
            id: Some(VariantId(id.to_owned())),
            name: format!("{color} {size}"),
            sku: id.to_uppercase(),
            size: Some(size.to_owned()),
            color: Some(color.to_owned()),
            stock,
            price: None,
            is_active,
        }
    }

    fn catalog() -> Vec<Variant> {
        vec![
            variant("v1", "Navy", "40R", 2, true),
            variant("v2", "Navy", "42R", 0, true),
            variant("v3", "Grey", "40R", 5, false),
            variant("v4", "Grey", "42R", 1, true),
        ]
    }

    #[test]
    fn none_filters_act_as_wildcards() {
        let variants = catalog();
        assert_eq!(resolve(&variants, None, None).and_then(|v| v.id.clone()), Some(VariantId("v1".to_owned())));
        assert_eq!(resolve(&variants, Some("Grey"), None).map(|v| v.sku.as_str()), Some("V3"));
        assert_eq!(resolve(&variants, None, Some("42R")).map(|v| v.sku.as_str()), Some("V2"));
        assert!(resolve(&variants, Some("Black"), None).is_none());
    }

    #[test]
    fn duplicate_matches_resolve_to_first_in_catalog_order() {
        let mut variants = catalog();
        variants.push(variant("v5", "Navy", "40R", 9, true));
        assert_eq!(resolve(&variants, Some("Navy"), Some("40R")).map(|v| v.sku.as_str()), Some("V1"));
    }

    #[test]
    fn out_of_stock_or_inactive_is_unavailable() {
        let variants = catalog();
        assert!(is_available(&variants, Some("Navy"), Some("40R")));
        assert!(!is_available(&variants, Some("Navy"), Some("42R")));
        assert!(!is_available(&variants, Some("Grey"), Some("40R")));
        assert!(!is_available(&variants, Some("Black"), Some("40R")));
    }

    #[test]
    fn color_then_size_reaches_full_selection() {
        let variants = catalog();
        let mut selector = VariantSelector::new(&variants);
        selector.select_size("42R");
        assert_eq!(selector.state(), SelectionState::SizeOnly);

        let outcome = selector.select_color("Grey");

        assert_eq!(outcome.from, SelectionState::SizeOnly);
        assert_eq!(outcome.to, SelectionState::FullySelected);
        assert_eq!(outcome.emitted.map(|v| v.sku.as_str()), Some("V4"));
        assert_eq!(selector.selected_variant().map(|v| v.sku.as_str()), Some("V4"));
    }

    #[test]
    fn single_pick_emits_when_wildcard_match_is_available() {
        let variants = catalog();
        let mut selector = VariantSelector::new(&variants);

        let outcome = selector.select_color("Navy");

        assert_eq!(outcome.to, SelectionState::FullySelected);
        assert_eq!(outcome.emitted.map(|v| v.sku.as_str()), Some("V1"));
        assert!(selector.selected_size().is_none());
    }

    #[test]
    fn unavailable_combination_is_not_emitted() {
        let variants = catalog();
        let mut selector = VariantSelector::new(&variants);

        let first = selector.select_color("Grey");
        assert_eq!(first.to, SelectionState::ColorOnly);
        assert!(first.emitted.is_none());

        let second = selector.select_size("40R");
        assert_eq!(second.to, SelectionState::ColorOnly);
        assert!(second.emitted.is_none());
        assert!(selector.selected_variant().is_none());
        assert_eq!(selector.selected_color(), Some("Grey"));
        assert_eq!(selector.selected_size(), Some("40R"));
    }

    #[test]
    fn losing_availability_drops_back_to_partial() {
        let variants = catalog();
        let mut selector = VariantSelector::new(&variants);
        selector.select_color("Navy");
        selector.select_size("40R");
        assert_eq!(selector.state(), SelectionState::FullySelected);

        let outcome = selector.select_size("42R");

        assert_eq!(outcome.from, SelectionState::FullySelected);
        assert_eq!(outcome.to, SelectionState::SizeOnly);
        assert!(outcome.emitted.is_none());
    }

    #[test]
    fn seeded_selection_starts_fully_selected() {
        let variants = catalog();
        let selector = VariantSelector::with_selected_variant(&variants, &VariantId("v4".to_owned()));

        assert_eq!(selector.state(), SelectionState::FullySelected);
        assert_eq!(selector.selected_color(), Some("Grey"));
        assert_eq!(selector.selected_size(), Some("42R"));

        let unknown = VariantSelector::with_selected_variant(&variants, &VariantId("nope".to_owned()));
        assert_eq!(unknown.state(), SelectionState::NoSelection);
    }

    #[test]
    fn picker_options_track_the_other_dimension() {
        let variants = catalog();
        let mut selector = VariantSelector::new(&variants);
        selector.select_color("Navy");

        assert_eq!(
            selector.size_options(),
            vec![
                PickerOption { value: "40R".to_owned(), available: true },
                PickerOption { value: "42R".to_owned(), available: false },
            ]
        );

        selector.clear();
        selector.select_size("40R");
        assert_eq!(
            selector.color_options(),
            vec![
                PickerOption { value: "Navy".to_owned(), available: true },
                PickerOption { value: "Grey".to_owned(), available: false },
            ]
        );
    }

    #[test]
    fn clear_returns_to_no_selection() {
        let variants = catalog();
        let mut selector = VariantSelector::new(&variants);
        selector.select_color("Navy");
        selector.clear();

        assert_eq!(selector.state(), SelectionState::NoSelection);
        assert!(selector.selected_variant().is_none());
        assert!(selector.selected_color().is_none());
    }
}
