//! Configuration loading for RenderKit projects.
//!
//! A project is a directory laid out as:
//!
//! ```text
//! project/
//! ├── config.yaml          # global keys
//! ├── configs/
//! │   ├── KOS-main.yaml    # entries of namespace "KOS"
//! │   └── web.yaml         # entries of namespace "web"
//! ├── templates/           # directory mode input
//! └── outputs/             # directory mode output
//! ```
//!
//! [`load_document`] merges the configuration layers into one raw
//! [`Document`], lowest precedence first:
//!
//! 1. the project's `config.yaml` and `configs/*.yaml` (unless disabled)
//! 2. `-g` global files, deep-merged over the globals
//! 3. `-c` namespace files, deep-merged over their namespace
//! 4. namespaces laid over globals; a namespace replaces a same-named global
//! 5. the `-r` repo root override
//! 6. `repo_root` defaulting to the project root
//! 7. `--set KEY=VALUE` assignments, in order
//!
//! Values are loaded raw. Nothing is rendered, read or executed here; that
//! happens lazily in [`crate::resolver`].

pub mod parser;

pub use parser::{namespace_name, parse_global, parse_namespace, parse_yaml};

use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::constants::{CONFIGS_DIR_NAME, GLOBAL_CONFIG_FILENAME, REPO_ROOT_KEY};
use crate::document::{Document, deep_merge, set_path};
use crate::utils::platform::resolve_path;

/// Inputs to [`load_document`].
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Project directory holding `config.yaml` and `configs/`.
    pub project_root: PathBuf,
    /// Skip the project's own configuration files.
    pub no_project_config: bool,
    /// Extra global files (`-g`), applied in order.
    pub global_configs: Vec<PathBuf>,
    /// Extra namespace files (`-c`), applied in order.
    pub namespace_configs: Vec<PathBuf>,
    /// Overrides the document's `repo_root` (`-r`).
    pub repo_root: Option<PathBuf>,
    /// Raw `KEY=VALUE` assignments (`--set`), applied last.
    pub set_vars: Vec<String>,
}

/// The merged raw document and the effective repo root.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: Document,
    /// `repo_root` from the document when it names an existing directory.
    pub repo_root: Option<PathBuf>,
}

/// Load and merge every configuration layer.
///
/// # Errors
///
/// Returns an error if any configuration file cannot be read, is not valid
/// YAML, or has the wrong shape.
pub fn load_document(options: &LoadOptions) -> Result<LoadedDocument> {
    let mut globals = Document::new();
    let mut namespaces: BTreeMap<String, Document> = BTreeMap::new();

    if options.no_project_config {
        tracing::debug!("Skipping project configuration");
    } else {
        load_project(&options.project_root, &mut globals, &mut namespaces)?;
    }

    for path in &options.global_configs {
        tracing::info!("Applying global config: {}", path.display());
        deep_merge(parse_global(path)?, &mut globals);
    }

    for path in &options.namespace_configs {
        let name = namespace_name(path)
            .with_context(|| format!("Cannot derive a namespace from file name: {}", path.display()))?;
        tracing::info!("Applying namespace config '{name}': {}", path.display());
        deep_merge(parse_namespace(path)?, namespaces.entry(name).or_default());
    }

    let mut document = globals;
    for (name, entries) in namespaces {
        document.insert(name, Value::Object(entries));
    }

    if let Some(root) = &options.repo_root {
        tracing::info!("Overriding repo_root: {}", root.display());
        document.insert(REPO_ROOT_KEY.to_string(), Value::String(root.display().to_string()));
    }
    if !document.contains_key(REPO_ROOT_KEY) {
        document.insert(
            REPO_ROOT_KEY.to_string(),
            Value::String(options.project_root.display().to_string()),
        );
    }

    apply_set_vars(&mut document, &options.set_vars);

    let repo_root = effective_repo_root(&document, &options.project_root);
    tracing::debug!("Loaded document with {} top-level key(s)", document.len());

    Ok(LoadedDocument {
        document,
        repo_root,
    })
}

fn load_project(
    project_root: &Path,
    globals: &mut Document,
    namespaces: &mut BTreeMap<String, Document>,
) -> Result<()> {
    tracing::debug!("Loading project configuration from {}", project_root.display());

    let global_file = project_root.join(GLOBAL_CONFIG_FILENAME);
    if global_file.is_file() {
        *globals = parse_global(&global_file)?;
    }

    let configs_dir = project_root.join(CONFIGS_DIR_NAME);
    if !configs_dir.is_dir() {
        return Ok(());
    }

    let mut files: Vec<PathBuf> = std::fs::read_dir(&configs_dir)
        .with_context(|| format!("Failed to read config directory: {}", configs_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "yaml"))
        .collect();
    files.sort();

    for path in files {
        let Some(name) = namespace_name(&path) else {
            tracing::warn!("Skipping config file without a namespace: {}", path.display());
            continue;
        };
        tracing::debug!("Loading namespace '{name}' from {}", path.display());
        let entries = parse_namespace(&path)?;
        namespaces.entry(name).or_default().extend(entries);
    }

    Ok(())
}

fn apply_set_vars(document: &mut Document, set_vars: &[String]) {
    for assignment in set_vars {
        let Some((key_path, value)) = assignment.split_once('=') else {
            tracing::warn!("Ignoring --set without '=': '{assignment}'");
            continue;
        };
        if key_path.is_empty() {
            tracing::warn!("Ignoring --set with an empty key: '{assignment}'");
            continue;
        }
        if set_path(document, key_path, Value::String(value.to_string())) {
            tracing::debug!("Set {key_path}");
        } else {
            tracing::warn!("Ignoring --set '{key_path}': a parent key is not a mapping");
        }
    }
}

/// `repo_root` from the document as an existing directory.
fn effective_repo_root(document: &Document, project_root: &Path) -> Option<PathBuf> {
    let raw = match document.get(REPO_ROOT_KEY)? {
        Value::String(raw) => raw,
        other => {
            tracing::warn!("'{REPO_ROOT_KEY}' must be a string, found {other}");
            return None;
        }
    };

    let path = match resolve_path(raw, project_root) {
        Ok(path) => path,
        Err(e) => {
            tracing::warn!("Cannot resolve '{REPO_ROOT_KEY}': {e:#}");
            return None;
        }
    };

    if path.is_dir() {
        Some(path)
    } else {
        tracing::warn!("'{REPO_ROOT_KEY}' is not a valid directory: {}", path.display());
        None
    }
}
