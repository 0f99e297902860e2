//! YAML parsing for configuration layers.
//!
//! Two file shapes exist:
//!
//! - **Global files** (`config.yaml`, `-g`): a mapping of keys to values.
//! - **Namespace files** (`configs/*.yaml`, `-c`): a list of single-key
//!   mappings, merged in order into one namespace. A plain mapping is
//!   accepted as well.
//!
//! ```yaml
//! # configs/KOS-main.yaml  ->  namespace "KOS"
//! - version: 1.0.0
//! - changelog: "@CHANGELOG.md"
//! ```
//!
//! An empty file is an empty layer. A file that is not valid YAML is a
//! [`RenderKitError::ConfigParse`]; valid YAML of the wrong shape is a
//! [`RenderKitError::InvalidDocument`].

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

use crate::core::RenderKitError;
use crate::document::Document;

/// The two accepted shapes of a namespace file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NamespaceLayer {
    Mapping(Document),
    Entries(Vec<NamespaceEntry>),
}

/// One item of a namespace entry list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NamespaceEntry {
    Single(Document),
    Other(Value),
}

/// Read a YAML file into a generic value. Empty files yield `Null`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid YAML.
pub fn parse_yaml(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_yaml::from_str(&content).map_err(|e| {
        RenderKitError::ConfigParse {
            path: path.display().to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Parse a global configuration file.
///
/// # Errors
///
/// Returns an error if the file cannot be parsed or is not a mapping.
pub fn parse_global(path: &Path) -> Result<Document> {
    match parse_yaml(path)? {
        Value::Null => Ok(Document::new()),
        Value::Object(map) => Ok(map),
        other => Err(invalid(path, format!("expected a mapping, found {}", kind(&other)))),
    }
}

/// Parse a namespace configuration file into the namespace's entries.
///
/// List items that are not single-key mappings are skipped with a warning.
///
/// # Errors
///
/// Returns an error if the file cannot be parsed or is neither a list nor a
/// mapping.
pub fn parse_namespace(path: &Path) -> Result<Document> {
    let value = parse_yaml(path)?;
    if value.is_null() {
        return Ok(Document::new());
    }

    let found = kind(&value);
    let layer: NamespaceLayer = serde_json::from_value(value)
        .map_err(|_| invalid(path, format!("expected a list of entries, found {found}")))?;

    match layer {
        NamespaceLayer::Mapping(map) => Ok(map),
        NamespaceLayer::Entries(items) => {
            let mut entries = Document::new();
            for (index, item) in items.into_iter().enumerate() {
                match item {
                    NamespaceEntry::Single(map) if map.len() == 1 => entries.extend(map),
                    NamespaceEntry::Single(map) => tracing::warn!(
                        "Skipping item {index} in {}: expected a single-key mapping, found {} keys",
                        path.display(),
                        map.len()
                    ),
                    NamespaceEntry::Other(other) => tracing::warn!(
                        "Skipping item {index} in {}: expected a single-key mapping, found {}",
                        path.display(),
                        kind(&other)
                    ),
                }
            }
            Ok(entries)
        }
    }
}

/// Namespace name for a namespace file: the file stem up to the first `-`.
///
/// `KOS-main.yaml` and `KOS.yaml` both name `KOS`.
#[must_use]
pub fn namespace_name(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let name = stem.split('-').next().unwrap_or(stem);
    (!name.is_empty()).then(|| name.to_string())
}

fn invalid(path: &Path, message: String) -> anyhow::Error {
    RenderKitError::InvalidDocument {
        path: path.display().to_string(),
        message,
    }
    .into()
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
