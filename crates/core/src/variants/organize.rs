//! Partitions a product's variants into category-specific display groups.
//!
//! Every input variant lands in exactly one group, tagged with its position in
//! the caller's source slice so edit/delete callbacks can address the
//! un-grouped array.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::product::Variant;
use crate::trace::{NoopTraceSink, TraceEvent, TraceSink, TraceStage};
use crate::variants::normalize::{normalize, NO_COLOR, NO_SIZE};
use crate::variants::CategoryKind;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedVariant {
    pub original_index: usize,
    pub variant: Variant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantGroup {
    pub key: String,
    /// Sum of member stock, used for the per-group availability chip.
    pub total_stock: u32,
    pub variants: Vec<IndexedVariant>,
}

impl VariantGroup {
    fn new(key: String) -> Self {
        Self { key, total_stock: 0, variants: Vec::new() }
    }

    fn push(&mut self, member: IndexedVariant) {
        self.total_stock = self.total_stock.saturating_add(member.variant.stock);
        self.variants.push(member);
    }

    pub fn has_stock(&self) -> bool {
        self.total_stock > 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "groups", rename_all = "snake_case")]
pub enum VariantGrouping {
    Ties(Vec<VariantGroup>),
    Suits(Vec<VariantGroup>),
    Shirts(Vec<VariantGroup>),
    #[serde(rename = "default")]
    Flat(Vec<IndexedVariant>),
}

impl VariantGrouping {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ties(_) => CategoryKind::Tie.as_str(),
            Self::Suits(_) => CategoryKind::Suit.as_str(),
            Self::Shirts(_) => CategoryKind::Shirt.as_str(),
            Self::Flat(_) => CategoryKind::Generic.as_str(),
        }
    }

    /// Display groups; empty for a flat listing.
    pub fn groups(&self) -> &[VariantGroup] {
        match self {
            Self::Ties(groups) | Self::Suits(groups) | Self::Shirts(groups) => groups,
            Self::Flat(_) => &[],
        }
    }

    pub fn group(&self, key: &str) -> Option<&VariantGroup> {
        self.groups().iter().find(|group| group.key == key)
    }

    /// All members in display order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = &IndexedVariant> + '_> {
        match self {
            Self::Flat(variants) => Box::new(variants.iter()),
            _ => Box::new(self.groups().iter().flat_map(|group| group.variants.iter())),
        }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub fn organize(variants: &[Variant], kind: CategoryKind) -> VariantGrouping {
    organize_traced(variants, kind, &NoopTraceSink, "organize")
}

pub fn organize_traced<S>(
    variants: &[Variant],
    kind: CategoryKind,
    sink: &S,
    correlation_id: &str,
) -> VariantGrouping
where
    S: TraceSink + ?Sized,
{
    let indexed = variants
        .iter()
        .enumerate()
        .map(|(original_index, variant)| IndexedVariant {
            original_index,
            variant: normalize(variant, kind),
        })
        .collect::<Vec<_>>();

    let grouping = match kind {
        CategoryKind::Tie => VariantGrouping::Ties(group_by(indexed, |variant| {
            variant.color().unwrap_or(NO_COLOR).to_owned()
        })),
        CategoryKind::Suit => {
            let mut groups = group_by(indexed, size_key);
            groups.sort_by(|left, right| compare_suit_sizes(&left.key, &right.key));
            VariantGrouping::Suits(groups)
        }
        CategoryKind::Shirt => {
            let mut groups = group_by(indexed, size_key);
            groups.sort_by(|left, right| compare_shirt_sizes(&left.key, &right.key));
            VariantGrouping::Shirts(groups)
        }
        CategoryKind::Generic => VariantGrouping::Flat(indexed),
    };

    for group in grouping.groups() {
        sink.emit(
            TraceEvent::new(correlation_id, "variants.group_built", TraceStage::Organize)
                .with_metadata("key", group.key.clone())
                .with_metadata("members", group.variants.len().to_string())
                .with_metadata("total_stock", group.total_stock.to_string()),
        );
    }
    sink.emit(
        TraceEvent::new(correlation_id, "variants.organized", TraceStage::Organize)
            .with_metadata("kind", grouping.kind())
            .with_metadata("groups", grouping.groups().len().to_string())
            .with_metadata("variants", variants.len().to_string()),
    );

    grouping
}

fn size_key(variant: &Variant) -> String {
    variant.size().unwrap_or(NO_SIZE).to_owned()
}

/// Groups keep first-appearance order; members keep input order.
fn group_by<F>(indexed: Vec<IndexedVariant>, key_of: F) -> Vec<VariantGroup>
where
    F: Fn(&Variant) -> String,
{
    let mut groups: Vec<VariantGroup> = Vec::new();
    for member in indexed {
        let key = key_of(&member.variant);
        match groups.iter_mut().find(|group| group.key == key) {
            Some(group) => group.push(member),
            None => {
                let mut group = VariantGroup::new(key);
                group.push(member);
                groups.push(group);
            }
        }
    }
    groups
}

/// Leading chest number ascending, then length code `S < R < L`. A missing
/// length code reads as `R`. Keys without a leading number sort last.
pub(crate) fn compare_suit_sizes(left: &str, right: &str) -> Ordering {
    let (left_chest, left_length) = split_suit_size(left);
    let (right_chest, right_length) = split_suit_size(right);

    compare_numeric(left_chest, right_chest)
        .then_with(|| length_rank(left_length).cmp(&length_rank(right_length)))
        .then_with(|| left.cmp(right))
}

/// Neck size ascending, ignoring the inch mark. Unparseable keys sort last.
pub(crate) fn compare_shirt_sizes(left: &str, right: &str) -> Ordering {
    compare_numeric(parse_neck(left), parse_neck(right)).then_with(|| left.cmp(right))
}

fn compare_numeric(left: Option<Decimal>, right: Option<Decimal>) -> Ordering {
    match (left, right) {
        (Some(left), Some(right)) => left.cmp(&right),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

pub(crate) fn split_suit_size(size: &str) -> (Option<Decimal>, &str) {
    let trimmed = size.trim();
    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return (None, trimmed);
    }
    let (chest, length) = trimmed.split_at(digits);
    (chest.parse::<Decimal>().ok(), length.trim())
}

fn length_rank(length: &str) -> u8 {
    match length.to_ascii_uppercase().as_str() {
        "S" => 0,
        "" | "R" => 1,
        "L" => 2,
        _ => 3,
    }
}

fn parse_neck(size: &str) -> Option<Decimal> {
    size.trim().trim_end_matches('"').trim().parse::<Decimal>().ok()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{compare_suit_sizes, organize, organize_traced, VariantGrouping};
    use crate::domain::product::Variant;
    use crate::trace::InMemoryTraceSink;
    use crate::variants::CategoryKind;

    fn variant(name: &str, size: Option<&str>, color: Option<&str>, stock: u32) -> Variant {
        Variant {
            id: None,
            name: name.to_owned(),
            sku: format!("SKU-{name}"),
            size: size.map(str::to_owned),
            color: color.map(str::to_owned),
            stock,
            price: None,
            is_active: true,
        }
    }

    fn keys(grouping: &VariantGrouping) -> Vec<&str> {
        grouping.groups().iter().map(|group| group.key.as_str()).collect()
    }

    #[test]
    fn ties_group_by_color_and_sum_stock() {
        let variants = vec![
            variant("Silk Tie - Navy", None, None, 2),
            variant("Silk Tie - Red", None, None, 0),
            variant("Silk Tie Wide", None, Some("Navy"), 3),
            variant("Silk Tie", None, None, 1),
        ];

        let grouping = organize(&variants, CategoryKind::Tie);

        assert_eq!(grouping.kind(), "ties");
        assert_eq!(keys(&grouping), vec!["Navy", "Red", "No Color"]);
        let navy = grouping.group("Navy").expect("navy group");
        assert_eq!(navy.total_stock, 5);
        assert_eq!(
            navy.variants.iter().map(|member| member.original_index).collect::<Vec<_>>(),
            vec![0, 2]
        );
        assert!(!grouping.group("Red").expect("red group").has_stock());
    }

    #[test]
    fn suits_sort_by_chest_number() {
        let variants = vec![
            variant("Navy 42R", None, None, 1),
            variant("Navy 38R", None, None, 1),
            variant("Navy 40R", None, None, 1),
        ];

        let grouping = organize(&variants, CategoryKind::Suit);
        assert_eq!(keys(&grouping), vec!["38R", "40R", "42R"]);
    }

    #[test]
    fn suits_with_equal_chest_sort_short_regular_long() {
        let variants = vec![
            variant("Navy", Some("40L"), None, 1),
            variant("Navy", Some("40R"), None, 1),
            variant("Navy", Some("40S"), None, 1),
        ];

        let grouping = organize(&variants, CategoryKind::Suit);
        assert_eq!(keys(&grouping), vec!["40S", "40R", "40L"]);
    }

    #[test]
    fn missing_length_code_sorts_as_regular() {
        let mut sizes = vec!["40L", "40", "40S", "38L", "No Size", "44R"];
        sizes.sort_by(|left, right| compare_suit_sizes(left, right));
        assert_eq!(sizes, vec!["38L", "40S", "40", "40L", "44R", "No Size"]);
    }

    #[test]
    fn shirts_sort_by_numeric_neck_size() {
        let variants = vec![
            variant("Oxford 16.5", None, None, 1),
            variant("Oxford 15", None, None, 1),
            variant("Oxford 15.5", None, None, 1),
            variant("Oxford", None, None, 1),
            variant("Oxford 17", None, None, 1),
        ];

        let grouping = organize(&variants, CategoryKind::Shirt);
        assert_eq!(keys(&grouping), vec!["15\"", "15.5\"", "16.5\"", "17\"", "No Size"]);
    }

    #[test]
    fn generic_category_is_flat_in_original_order() {
        let variants = vec![
            variant("Belt 36", None, None, 1),
            variant("Belt 32", None, None, 1),
            variant("Belt 34", None, None, 0),
        ];

        let grouping = organize(&variants, CategoryKind::Generic);

        let VariantGrouping::Flat(listing) = &grouping else {
            panic!("expected flat listing, got {grouping:?}");
        };
        assert_eq!(listing.iter().map(|member| member.original_index).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert_eq!(listing[1].variant, variants[1]);
        assert!(grouping.groups().is_empty());
    }

    #[test]
    fn groups_partition_the_input() {
        let variants = vec![
            variant("Silk Tie - Navy", None, None, 1),
            variant("Navy 42R", None, None, 1),
            variant("Navy 42R", None, None, 1),
            variant("Oxford 15.5", None, None, 0),
            variant("Plain", Some("M"), Some("Black"), 4),
            variant("", None, None, 0),
        ];

        for kind in
            [CategoryKind::Tie, CategoryKind::Suit, CategoryKind::Shirt, CategoryKind::Generic]
        {
            let grouping = organize(&variants, kind);
            let indices = grouping.iter().map(|member| member.original_index).collect::<Vec<_>>();
            let unique = indices.iter().copied().collect::<BTreeSet<_>>();

            assert_eq!(indices.len(), variants.len(), "no variant dropped or duplicated for {kind:?}");
            assert_eq!(unique, (0..variants.len()).collect::<BTreeSet<_>>());
        }
    }

    #[test]
    fn repeated_calls_are_deterministic() {
        let variants = vec![
            variant("Navy 44L", None, None, 1),
            variant("Navy 40S", None, None, 1),
            variant("Navy 44S", None, None, 1),
        ];

        assert_eq!(organize(&variants, CategoryKind::Suit), organize(&variants, CategoryKind::Suit));
    }

    #[test]
    fn empty_input_yields_empty_grouping() {
        assert!(organize(&[], CategoryKind::Suit).is_empty());
        assert!(organize(&[], CategoryKind::Generic).is_empty());
    }

    #[test]
    fn trace_hook_receives_group_events() {
        let sink = InMemoryTraceSink::default();
        let variants = vec![variant("Navy 42R", None, None, 2), variant("Navy 40R", None, None, 1)];

        let _ = organize_traced(&variants, CategoryKind::Suit, &sink, "req-7");

        let events = sink.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].metadata.get("key").map(String::as_str), Some("40R"));
        assert_eq!(events[2].event_type, "variants.organized");
        assert!(events.iter().all(|event| event.correlation_id == "req-7"));
    }
}
