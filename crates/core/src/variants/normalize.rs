//! Fills missing `size`/`color` on a variant from its free-text name.
//!
//! Normalization is display-only: the source record is borrowed and an enriched
//! copy is returned. Re-normalizing a normalized variant is a no-op.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::product::Variant;
use crate::variants::CategoryKind;

pub const NO_COLOR: &str = "No Color";
pub const NO_SIZE: &str = "No Size";

const TIE_COLOR_SEPARATOR: &str = " - ";

pub fn normalize(variant: &Variant, kind: CategoryKind) -> Variant {
    let mut normalized = variant.clone();

    match kind {
        CategoryKind::Tie if normalized.color().is_none() => {
            normalized.color = Some(parse_tie_color(&variant.name).unwrap_or(NO_COLOR).to_owned());
        }
        CategoryKind::Suit if normalized.size().is_none() => {
            normalized.size = Some(parse_suit_size(&variant.name).unwrap_or(NO_SIZE).to_owned());
        }
        CategoryKind::Shirt if normalized.size().is_none() => {
            normalized.size = Some(
                parse_shirt_neck(&variant.name)
                    .map(|neck| format!("{neck}\""))
                    .unwrap_or_else(|| NO_SIZE.to_owned()),
            );
        }
        _ => {}
    }

    normalized
}

pub fn normalize_all(variants: &[Variant], kind: CategoryKind) -> Vec<Variant> {
    variants.iter().map(|variant| normalize(variant, kind)).collect()
}

/// Text after the last `" - "` in a tie name, e.g. `"Silk Tie - Navy"` -> `"Navy"`.
pub(crate) fn parse_tie_color(name: &str) -> Option<&str> {
    name.rfind(TIE_COLOR_SEPARATOR).map(|position| &name[position + TIE_COLOR_SEPARATOR.len()..])
}

/// Two digits followed by a length code, e.g. `"42R"`.
pub(crate) fn parse_suit_size(name: &str) -> Option<&str> {
    static SUIT_SIZE: OnceLock<Regex> = OnceLock::new();
    let re = SUIT_SIZE.get_or_init(|| Regex::new(r"\d{2}[RSL]").expect("valid suit size regex"));
    re.find(name).map(|found| found.as_str())
}

/// First integer or one-decimal number, e.g. `"15.5"` in `"Oxford 15.5 Slim"`.
pub(crate) fn parse_shirt_neck(name: &str) -> Option<&str> {
    static SHIRT_NECK: OnceLock<Regex> = OnceLock::new();
    let re =
        SHIRT_NECK.get_or_init(|| Regex::new(r"\d+(?:\.\d)?").expect("valid shirt neck regex"));
    re.find(name).map(|found| found.as_str())
}

#[cfg(test)]
mod tests {
    use super::{normalize, NO_COLOR, NO_SIZE};
    use crate::domain::product::Variant;
    use crate::variants::CategoryKind;

    fn variant(name: &str) -> Variant {
        Variant {
            id: None,
            name: name.to_owned(),
            sku: "SKU".to_owned(),
            size: None,
            color: None,
            stock: 1,
            price: None,
            is_active: true,
        }
    }

    #[test]
    fn tie_color_comes_from_last_separator() {
        let normalized = normalize(&variant("Silk Tie - Paisley - Burgundy"), CategoryKind::Tie);
        assert_eq!(normalized.color.as_deref(), Some("Burgundy"));
        assert!(normalized.size.is_none());
    }

    #[test]
    fn tie_without_separator_has_no_color() {
        let normalized = normalize(&variant("Knit Tie Navy"), CategoryKind::Tie);
        assert_eq!(normalized.color.as_deref(), Some(NO_COLOR));
    }

    #[test]
    fn existing_fields_are_kept() {
        let mut source = variant("Silk Tie - Navy");
        source.color = Some("Midnight".to_owned());
        let normalized = normalize(&source, CategoryKind::Tie);
        assert_eq!(normalized.color.as_deref(), Some("Midnight"));
    }

    #[test]
    fn suit_size_matches_two_digits_and_length_code() {
        assert_eq!(normalize(&variant("Navy Wool 42R"), CategoryKind::Suit).size.as_deref(), Some("42R"));
        assert_eq!(normalize(&variant("Navy 38S Slim"), CategoryKind::Suit).size.as_deref(), Some("38S"));
        assert_eq!(normalize(&variant("Navy Wool"), CategoryKind::Suit).size.as_deref(), Some(NO_SIZE));
        assert_eq!(normalize(&variant("Navy 42X"), CategoryKind::Suit).size.as_deref(), Some(NO_SIZE));
    }

    #[test]
    fn shirt_size_gets_inch_mark() {
        assert_eq!(
            normalize(&variant("Oxford White 15.5"), CategoryKind::Shirt).size.as_deref(),
            Some("15.5\"")
        );
        assert_eq!(normalize(&variant("Poplin 16 Slim"), CategoryKind::Shirt).size.as_deref(), Some("16\""));
        assert_eq!(normalize(&variant("Poplin Blue"), CategoryKind::Shirt).size.as_deref(), Some(NO_SIZE));
    }

    #[test]
    fn generic_variants_are_untouched() {
        let source = variant("Leather Belt - Brown 34");
        assert_eq!(normalize(&source, CategoryKind::Generic), source);
    }

    #[test]
    fn source_record_is_not_mutated() {
        let source = variant("Silk Tie - Navy");
        let _ = normalize(&source, CategoryKind::Tie);
        assert!(source.color.is_none());
    }

    #[test]
    fn normalization_is_idempotent() {
        let names = [
            "Silk Tie - Navy",
            "Knit Tie",
            "Tie - ",
            "Navy 42R",
            "Navy Suit",
            "Oxford 15.5",
            "Oxford 16",
            "Oxford",
            "",
        ];
        let kinds =
            [CategoryKind::Tie, CategoryKind::Suit, CategoryKind::Shirt, CategoryKind::Generic];

        for name in names {
            for kind in kinds {
                let once = normalize(&variant(name), kind);
                let twice = normalize(&once, kind);
                assert_eq!(once, twice, "normalize must be idempotent for {name:?} / {kind:?}");
            }
        }
    }
}
