use rust_decimal::prelude::ToPrimitive;

use crate::variants::organize::split_suit_size;

/// Suit chest size to shirt neck size.
const SUIT_TO_SHIRT_NECK: &[(u32, &str)] = &[
    (36, "14.5"),
    (38, "15"),
    (40, "15.5"),
    (42, "16"),
    (44, "16.5"),
    (46, "17"),
    (48, "17.5"),
    (50, "18"),
];

/// Recommended shirt neck size for a suit size, keyed on the chest number so
/// `42S`, `42R` and `42L` all map to `16`.
pub fn suggest_shirt_size(suit_size: &str) -> Option<&'static str> {
    let (chest, _) = split_suit_size(suit_size);
    let chest = chest?.to_u32()?;
    SUIT_TO_SHIRT_NECK.iter().find(|(suit, _)| *suit == chest).map(|(_, neck)| *neck)
}

#[cfg(test)]
mod tests {
    use super::suggest_shirt_size;

    #[test]
    fn regular_suit_sizes_translate() {
        assert_eq!(suggest_shirt_size("42R"), Some("16"));
        assert_eq!(suggest_shirt_size("38R"), Some("15"));
        assert_eq!(suggest_shirt_size("36"), Some("14.5"));
    }

    #[test]
    fn length_code_does_not_change_neck_size() {
        assert_eq!(suggest_shirt_size("44S"), suggest_shirt_size("44L"));
    }

    #[test]
    fn unknown_sizes_have_no_suggestion() {
        assert_eq!(suggest_shirt_size("52R"), None);
        assert_eq!(suggest_shirt_size("No Size"), None);
        assert_eq!(suggest_shirt_size(""), None);
    }
}
