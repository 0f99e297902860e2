//! Command-line interface for RenderKit.
//!
//! `rk` renders templates against a project's layered configuration. It runs
//! in one of three modes, chosen from its inputs:
//!
//! | Input | Mode |
//! |-------|------|
//! | template piped on stdin | render it to stdout |
//! | `--template FILE` | render the file to stdout |
//! | neither | render `templates/` into `outputs/` |
//!
//! ```bash
//! echo 'v{{ KOS.version }}' | rk -d my-project
//! rk -t notes.md -s KOS --set KOS.version=2.0.0
//! rk -d my-project --no-stdin
//! ```
//!
//! Logging goes to stderr so that stdout carries only rendered output.
//! `--verbose` enables debug logs, `--quiet` shows errors only, and
//! `RUST_LOG` overrides both.


use anyhow::{Context, Result};
use clap::Parser;
use std::io::{IsTerminal, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::config::{LoadOptions, load_document};
use crate::core::RenderKitError;
use crate::output::{render_directory, render_single};
use crate::resolver::Pipeline;

/// Runtime settings derived from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    pub log_level: String,
    /// Only errors are reported.
    pub quiet: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            quiet: false,
        }
    }
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the default log level.
    #[must_use]
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// The filter used when `RUST_LOG` is not set.
    #[must_use]
    pub fn default_filter(&self) -> &str {
        if self.quiet { "error" } else { self.log_level.as_str() }
    }

    /// Install the global tracing subscriber, writing to stderr.
    ///
    /// Calling this more than once is harmless; later calls are ignored.
    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_filter()));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .try_init();
    }
}

/// Render templates against layered YAML configuration.
#[derive(Parser, Debug)]
#[command(
    name = "rk",
    about = "RenderKit - render templates against layered configuration",
    version,
    long_about = "RenderKit renders Jinja templates against a project's YAML configuration. \
                  Values may be templates themselves, read files, or run commands; only the \
                  values a template actually uses are ever evaluated."
)]
pub struct Cli {
    /// Render this template file to stdout.
    #[arg(short, long, value_name = "FILE")]
    template: Option<PathBuf>,

    /// Project directory containing config.yaml, configs/ and templates/.
    ///
    /// Defaults to the current directory.
    #[arg(short, long, value_name = "DIR")]
    directory: Option<PathBuf>,

    /// Do not load the project's config.yaml and configs/.
    #[arg(long)]
    no_project_config: bool,

    /// Extra global configuration file, merged over config.yaml. Repeatable.
    #[arg(short = 'g', long = "global-config", value_name = "FILE")]
    global_configs: Vec<PathBuf>,

    /// Extra namespace configuration file, merged over its namespace. Repeatable.
    ///
    /// The namespace is the file name up to the first '-', so
    /// `KOS-prod.yaml` overrides namespace `KOS`.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    configs: Vec<PathBuf>,

    /// Override repo_root, the base for @path values and command execution.
    #[arg(short, long, value_name = "DIR")]
    repo_root: Option<PathBuf>,

    /// Set a value, e.g. `--set KOS.version=2.0.0`. Applied last. Repeatable.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    set_vars: Vec<String>,

    /// Expose a namespace's keys unqualified in the template.
    #[arg(short, long, value_name = "NAMESPACE")]
    scope: Option<String>,

    /// Only report errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show debug output.
    #[arg(short, long)]
    verbose: bool,

    /// Ignore piped stdin and never treat it as a template.
    #[arg(long)]
    no_stdin: bool,
}

impl Cli {
    /// Run with the process's real stdin.
    ///
    /// # Errors
    ///
    /// Returns an error for any fatal condition: conflicting template
    /// inputs, unreadable or invalid configuration, a dependency cycle, a
    /// missing template directory, or a failing single template.
    pub fn execute(self) -> Result<()> {
        self.build_config().init_logging();

        let stdin = if self.no_stdin {
            None
        } else {
            read_piped_stdin()?
        };
        self.execute_with_input(stdin)
    }

    /// Build a [`CliConfig`] from the parsed flags.
    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let config = CliConfig {
            quiet: self.quiet,
            ..CliConfig::default()
        };
        if self.verbose { config.with_log_level("debug") } else { config }
    }

    /// Build the loader options, anchoring relative paths at the working
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined.
    pub fn load_options(&self) -> Result<LoadOptions> {
        let project_root = match &self.directory {
            Some(dir) => std::path::absolute(dir)
                .with_context(|| format!("Invalid project directory: {}", dir.display()))?,
            None => std::env::current_dir().context("Failed to determine the current directory")?,
        };
        let repo_root = self
            .repo_root
            .as_ref()
            .map(std::path::absolute)
            .transpose()
            .context("Invalid repo root")?;

        Ok(LoadOptions {
            project_root,
            no_project_config: self.no_project_config,
            global_configs: self.global_configs.clone(),
            namespace_configs: self.configs.clone(),
            repo_root,
            set_vars: self.set_vars.clone(),
        })
    }

    /// Run with an explicit stdin template (`None` when nothing was piped).
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    pub fn execute_with_input(self, stdin: Option<String>) -> Result<()> {
        if stdin.is_some() && self.template.is_some() {
            return Err(RenderKitError::ConflictingTemplateInputs.into());
        }

        let options = self.load_options()?;
        let loaded = load_document(&options)?;
        let pipeline = Pipeline::new();
        let scope = self.scope.as_deref();

        let (name, source) = match (stdin, &self.template) {
            (Some(source), _) => ("<stdin>".to_string(), source),
            (None, Some(path)) => {
                let source = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read template: {}", path.display()))?;
                (path.display().to_string(), source)
            }
            (None, None) => {
                let report = render_directory(&pipeline, &loaded, &options.project_root)?;
                if report.failed.is_empty() {
                    tracing::info!("Rendered {} template(s)", report.written.len());
                } else {
                    tracing::warn!(
                        "Rendered {} template(s), {} failed",
                        report.written.len(),
                        report.failed.len()
                    );
                }
                return Ok(());
            }
        };

        let output = render_single(&pipeline, &loaded, &name, &source, scope)?;
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(output.as_bytes()).context("Failed to write output")?;
        stdout.flush().context("Failed to write output")?;
        Ok(())
    }
}

/// Read stdin when it is piped and non-empty.
fn read_piped_stdin() -> Result<Option<String>> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(None);
    }

    let mut content = String::new();
    stdin.lock().read_to_string(&mut content).context("Failed to read template from stdin")?;
    Ok((!content.is_empty()).then_some(content))
}
