//! Rendering consumer templates against a resolved document.
//!
//! Two modes exist:
//!
//! - **Single template** ([`render_single`]): one template from stdin or
//!   `--template`, rendered to a string. If the rendered text is a marked
//!   directive (`$!`, `$@` or `$file://`), it is evaluated, so
//!   `$!git -C {{ repo }} describe` runs with `repo` substituted.
//! - **Directory** ([`render_directory`]): every file under
//!   `<project>/templates` is rendered to the same relative path under
//!   `<project>/outputs`. A template inside a subdirectory named after a
//!   namespace sees that namespace's entries unqualified.
//!
//! All templates of a run are analyzed together, so values are resolved once
//! and only when some template needs them.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::LoadedDocument;
use crate::constants::{
    COMMAND_PREFIX, DYNAMIC_MARKER, FILE_URI_PREFIX, OUTPUTS_DIR_NAME, REPO_FILE_PREFIX,
    TEMPLATES_DIR_NAME,
};
use crate::core::RenderKitError;
use crate::document::Document;
use crate::resolver::{DirectiveEvaluator, Pipeline};
use crate::utils::fs::atomic_write;

/// Result of a directory-mode run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirectoryReport {
    /// Output files written, in template order.
    pub written: Vec<PathBuf>,
    /// Templates (relative to the template directory) that failed.
    pub failed: Vec<PathBuf>,
}

/// Render one template.
///
/// `name` identifies the template in errors (a file path or `<stdin>`).
///
/// # Errors
///
/// Returns an error if the relevant values form a dependency cycle or the
/// template fails to render.
pub fn render_single(
    pipeline: &Pipeline,
    loaded: &LoadedDocument,
    name: &str,
    source: &str,
    scope: Option<&str>,
) -> Result<String> {
    let resolved = pipeline.resolve(&loaded.document, &[source], loaded.repo_root.as_deref())?;
    let context = match scope {
        Some(scope) => pipeline.scoped(&resolved, scope),
        None => resolved,
    };

    let output = pipeline.renderer().render(source, &context).map_err(|e| {
        RenderKitError::TemplateRender {
            name: name.to_string(),
            message: e.to_string(),
        }
    })?;

    Ok(evaluate_output(output, loaded.repo_root.as_deref()))
}

/// Evaluate a rendered template that is itself a marked directive.
///
/// Only `$!`, `$@` and `$file://` outputs are evaluated. Any other output,
/// including text that merely starts with `$`, is returned unchanged.
fn evaluate_output(output: String, repo_root: Option<&Path>) -> String {
    let directive = output
        .trim()
        .strip_prefix(DYNAMIC_MARKER)
        .filter(|rest| is_directive(rest));
    match directive {
        Some(directive) => {
            tracing::debug!("Evaluating rendered output as a directive");
            DirectiveEvaluator::new(repo_root.map(Path::to_path_buf)).evaluate("<output>", directive)
        }
        None => output,
    }
}

fn is_directive(value: &str) -> bool {
    value.starts_with(COMMAND_PREFIX)
        || value.starts_with(REPO_FILE_PREFIX)
        || value.starts_with(FILE_URI_PREFIX)
}

/// Template files under `templates_dir`, relative to it, in sorted order.
///
/// # Errors
///
/// Returns an error if the directory cannot be walked.
pub fn discover_templates(templates_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut templates = Vec::new();
    for entry in WalkDir::new(templates_dir).follow_links(true).sort_by_file_name() {
        let entry = entry
            .with_context(|| format!("Failed to read template directory: {}", templates_dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(relative) = entry.path().strip_prefix(templates_dir) {
            templates.push(relative.to_path_buf());
        }
    }
    Ok(templates)
}

/// Render every template of a project into its output directory.
///
/// Per-template failures are logged and collected in the report; the rest of
/// the batch still renders.
///
/// # Errors
///
/// Returns [`RenderKitError::TemplateDirNotFound`] if there is no template
/// directory, or the resolve error if the relevant values form a cycle.
pub fn render_directory(
    pipeline: &Pipeline,
    loaded: &LoadedDocument,
    project_root: &Path,
) -> Result<DirectoryReport> {
    let templates_dir = project_root.join(TEMPLATES_DIR_NAME);
    let outputs_dir = project_root.join(OUTPUTS_DIR_NAME);

    if !templates_dir.is_dir() {
        return Err(RenderKitError::TemplateDirNotFound {
            path: templates_dir.display().to_string(),
        }
        .into());
    }

    let mut report = DirectoryReport::default();
    let mut sources: Vec<(PathBuf, String)> = Vec::new();
    for relative in discover_templates(&templates_dir)? {
        match std::fs::read_to_string(templates_dir.join(&relative)) {
            Ok(source) => sources.push((relative, source)),
            Err(e) => {
                tracing::error!("Failed to read template {}: {e}", relative.display());
                report.failed.push(relative);
            }
        }
    }
    tracing::info!("Found {} template(s) in {}", sources.len(), templates_dir.display());
    if sources.is_empty() {
        return Ok(report);
    }

    let consumers: Vec<&str> = sources.iter().map(|(_, source)| source.as_str()).collect();
    let resolved = pipeline.resolve(&loaded.document, &consumers, loaded.repo_root.as_deref())?;

    for (relative, source) in &sources {
        let context = directory_scope(pipeline, &resolved, relative);
        let output = match pipeline.renderer().render(source, &context) {
            Ok(output) => output,
            Err(e) => {
                tracing::error!("Failed to render template {}: {e}", relative.display());
                report.failed.push(relative.clone());
                continue;
            }
        };

        let target = outputs_dir.join(relative);
        match atomic_write(&target, &output) {
            Ok(()) => {
                tracing::info!("Rendered {}", target.display());
                report.written.push(target);
            }
            Err(e) => {
                tracing::error!("Failed to write {}: {e:#}", target.display());
                report.failed.push(relative.clone());
            }
        }
    }

    Ok(report)
}

/// The render scope for a template in directory mode.
///
/// A template inside a subdirectory whose name is a namespace of the
/// document gets that namespace's entries unqualified.
fn directory_scope(pipeline: &Pipeline, resolved: &Document, relative: &Path) -> Document {
    let mut components = relative.components();
    let first = components.next().and_then(|c| c.as_os_str().to_str());
    match first {
        Some(dir) if components.next().is_some() && resolved.get(dir).is_some_and(|v| v.is_object()) => {
            tracing::debug!("Applying directory scope '{dir}' to {}", relative.display());
            pipeline.scoped(resolved, dir)
        }
        _ => resolved.clone(),
    }
}
