//! Configuration file loading.
//!
//! Formats are picked by extension: `.json`, or `.yaml` / `.yml`. Anything
//! else is tried as JSON first, then YAML.

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

/// Read and parse a configuration document.
pub fn load_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;

    let value = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => parse_json(&content),
        Some("yaml" | "yml") => parse_yaml(&content),
        _ => parse_json(&content).or_else(|_| parse_yaml(&content)),
    };
    value.with_context(|| format!("invalid configuration in {}", path.display()))
}

fn parse_json(content: &str) -> Result<Value> {
    serde_json::from_str(content).context("invalid JSON")
}

fn parse_yaml(content: &str) -> Result<Value> {
    serde_yaml::from_str(content).context("invalid YAML")
}
