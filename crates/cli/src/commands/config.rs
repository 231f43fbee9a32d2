use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use toml::Value;

use crate::commands::input::load_config;
use crate::commands::CommandResult;

const COMMAND: &str = "config";

#[derive(Debug, Serialize)]
struct ConfigEntry {
    key: &'static str,
    value: String,
    source: String,
}

pub fn run() -> CommandResult {
    let config = match load_config() {
        Ok(config) => config,
        Err(error) => return CommandResult::from_error(COMMAND, &error),
    };

    let config_file_path = detect_config_path();
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let tiers = config
        .bundle
        .tiers
        .iter()
        .map(|tier| match tier.min_items {
            Some(min_items) => format!("{:?} {} @ {min_items}", tier.kind, tier.value),
            None => format!("{:?} {}", tier.kind, tier.value),
        })
        .collect::<Vec<_>>()
        .join(", ");

    let entries = vec![
        ConfigEntry {
            key: "logging.level",
            value: config.logging.level.clone(),
            source: source("logging.level", &["HABERDASH_LOGGING_LEVEL", "HABERDASH_LOG_LEVEL"]),
        },
        ConfigEntry {
            key: "logging.format",
            value: format!("{:?}", config.logging.format),
            source: source(
                "logging.format",
                &["HABERDASH_LOGGING_FORMAT", "HABERDASH_LOG_FORMAT"],
            ),
        },
        ConfigEntry {
            key: "bundle.tiers",
            value: format!("[{tiers}]"),
            source: source("bundle.tiers", &[]),
        },
        ConfigEntry {
            key: "recommendations.max_items",
            value: config.recommendations.max_items.to_string(),
            source: source(
                "recommendations.max_items",
                &["HABERDASH_RECOMMENDATIONS_MAX_ITEMS"],
            ),
        },
    ];

    let mut lines = vec!["effective config (source precedence: env > file > default):".to_string()];
    lines.extend(entries.iter().map(render_line));

    CommandResult::success_with_data(COMMAND, lines.join("\n"), &entries)
}

fn detect_config_path() -> Option<PathBuf> {
    [PathBuf::from("haberdash.toml"), PathBuf::from("config/haberdash.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) = env_keys.iter().find(|key| env::var_os(key).is_some()) {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(entry: &ConfigEntry) -> String {
    format!("- {} = {} (source: {})", entry.key, entry.value, entry.source)
}
