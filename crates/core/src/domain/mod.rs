pub mod bundle;
pub mod product;
