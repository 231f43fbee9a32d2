//! Variant presentation: classification, normalization, grouping, selection.

pub mod category;
pub mod normalize;
pub mod organize;
pub mod selector;

pub use category::CategoryKind;
pub use normalize::{normalize, normalize_all, NO_COLOR, NO_SIZE};
pub use organize::{organize, organize_traced, IndexedVariant, VariantGroup, VariantGrouping};
pub use selector::{
    is_available, resolve, PickerOption, SelectionOutcome, SelectionState, VariantSelector,
};
