use std::fs;
use std::path::Path;

use anyhow::Context;
use haberdash_core::config::{AppConfig, LoadOptions};
use haberdash_core::{ApplicationError, BundleLineItem, DiscountTier, Product};
use serde::de::DeserializeOwned;

pub fn load_config() -> Result<AppConfig, ApplicationError> {
    AppConfig::load(LoadOptions::default())
        .map_err(|error| ApplicationError::Configuration(error.to_string()))
}

pub fn load_catalog(path: &Path) -> Result<Vec<Product>, ApplicationError> {
    read_json(path, "catalog")
}

pub fn load_line_items(path: &Path) -> Result<Vec<BundleLineItem>, ApplicationError> {
    read_json(path, "bundle")
}

pub fn load_tiers(path: &Path) -> Result<Vec<DiscountTier>, ApplicationError> {
    read_json(path, "tiers")
}

pub fn find_product<'a>(catalog: &'a [Product], id: &str) -> Result<&'a Product, ApplicationError> {
    catalog
        .iter()
        .find(|product| product.id.0 == id)
        .ok_or_else(|| ApplicationError::Input(format!("product `{id}` is not in the catalog")))
}

fn read_json<T: DeserializeOwned>(path: &Path, label: &str) -> Result<T, ApplicationError> {
    parse_file(path, label).map_err(|error| ApplicationError::Input(format!("{error:#}")))
}

fn parse_file<T: DeserializeOwned>(path: &Path, label: &str) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("could not read {label} file `{}`", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("could not parse {label} file `{}`", path.display()))
}
