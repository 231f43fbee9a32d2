use serde::{Deserialize, Serialize};

/// Closed classification of a free-text catalog category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    Tie,
    Suit,
    Shirt,
    Generic,
}

impl CategoryKind {
    /// Case-insensitive substring match against `tie`, `suit`, `shirt`, checked in
    /// that order. Anything else is [`CategoryKind::Generic`].
    pub fn classify(category: &str) -> Self {
        let lower = category.to_lowercase();
        if lower.contains("tie") {
            Self::Tie
        } else if lower.contains("suit") {
            Self::Suit
        } else if lower.contains("shirt") {
            Self::Shirt
        } else {
            Self::Generic
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tie => "ties",
            Self::Suit => "suits",
            Self::Shirt => "shirts",
            Self::Generic => "default",
        }
    }
}
