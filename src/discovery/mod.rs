//! Manifest discovery and command aggregation
//!
//! This module provides:
//! - File discovery across the working directory, its modules, configured
//!   includes, and the user commands directory ([`files`])
//! - Aggregation of discovered manifests into a [`DiscoveredCommandSet`]
//!   ([`commands`])
//! - Module identifier collision checks ([`collisions`])
//! - Command tree and execution dependency validation ([`validation`])
//!
//! ## Precedence
//!
//! ```text
//! 1. <cwd>/cmdfile.yaml (or <cwd>/cmdfile)
//! 2. <cwd>/*.cmdmod                    + each module's cmd_modules/*.cmdmod
//! 3. config `includes`                 + each module's cmd_modules/*.cmdmod
//! 4. <commands_dir>/*.cmdmod           + each module's cmd_modules/*.cmdmod
//! ```
//!
//! Recoverable problems along the way are returned as
//! [`Diagnostics`](crate::diagnostic::Diagnostics), never as errors.

pub mod collisions;
pub mod commands;
pub mod files;
pub mod validation;

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::config::Config;
use crate::diagnostic::{Diagnostic, DiagnosticCode, Diagnostics};
use crate::error::CmdweaveError;
use crate::manifest::Manifest;
use crate::module::Module;

pub use commands::{
    CommandInfo, CommandSetResult, DiscoveredCommandSet, LookupResult, PrefixResult,
};
pub use validation::{validate_command_tree, validate_execution_dag};

/// Where a manifest was found
///
/// Variants are ordered by precedence, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// The working directory's own manifest
    CurrentDir,
    /// A module directory, local, included, user-level, or vendored
    Module,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CurrentDir => write!(f, "current directory"),
            Self::Module => write!(f, "module"),
        }
    }
}

/// Parse state of a discovered manifest
#[derive(Debug, Clone, Default)]
pub enum ManifestState {
    #[default]
    Unparsed,
    Parsed(Arc<Manifest>),
    Failed(Arc<CmdweaveError>),
}

/// A manifest found during discovery
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    /// Absolute path to the manifest
    pub path: PathBuf,
    pub source: Source,
    pub state: ManifestState,
    /// Module the manifest belongs to
    pub module: Option<Arc<Module>>,
    /// Module whose `cmd_modules/` this file's module was vendored into
    pub parent_module: Option<Arc<Module>>,
}

impl DiscoveredFile {
    pub fn new(path: impl Into<PathBuf>, source: Source) -> Self {
        Self {
            path: path.into(),
            source,
            state: ManifestState::Unparsed,
            module: None,
            parent_module: None,
        }
    }

    /// A file owned by `module`
    pub fn from_module(module: Arc<Module>) -> Self {
        Self {
            module: Some(module.clone()),
            ..Self::new(module.manifest_path(), Source::Module)
        }
    }

    pub fn with_parent(mut self, parent: Arc<Module>) -> Self {
        self.parent_module = Some(parent);
        self
    }

    pub fn with_manifest(mut self, manifest: Manifest) -> Self {
        self.state = ManifestState::Parsed(Arc::new(manifest));
        self
    }

    pub fn with_error(mut self, error: CmdweaveError) -> Self {
        self.state = ManifestState::Failed(Arc::new(error));
        self
    }

    /// Parse the manifest if it has not been parsed yet
    pub fn parsed(self) -> Self {
        if !matches!(self.state, ManifestState::Unparsed) {
            return self;
        }
        let result = match &self.module {
            Some(module) => Manifest::parse_module(&self.path, module.name()),
            None => Manifest::parse(&self.path),
        };
        match result {
            Ok(manifest) => self.with_manifest(manifest),
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "manifest parse failed");
                self.with_error(e)
            }
        }
    }

    pub fn manifest(&self) -> Option<&Arc<Manifest>> {
        match &self.state {
            ManifestState::Parsed(manifest) => Some(manifest),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&Arc<CmdweaveError>> {
        match &self.state {
            ManifestState::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_vendored(&self) -> bool {
        self.parent_module.is_some()
    }
}

/// Entry point for discovery, aggregation, and lookup
#[derive(Debug, Clone)]
pub struct Discovery {
    config: Config,
    base_dir: Option<PathBuf>,
    commands_dir: Option<PathBuf>,
    init_diagnostics: Diagnostics,
}

impl Discovery {
    /// Discover relative to the process working directory
    ///
    /// Failure to determine the working directory or the user commands
    /// directory is recorded as a diagnostic and the affected levels are
    /// skipped.
    pub fn new(config: Config) -> Self {
        let mut init_diagnostics = Diagnostics::new();

        let base_dir = match std::env::current_dir() {
            Ok(dir) => Some(dir),
            Err(e) => {
                tracing::warn!(error = %e, "cannot determine working directory");
                init_diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticCode::WorkingDirUnavailable,
                        format!(
                            "cannot determine the working directory, skipping local discovery: {e}"
                        ),
                    )
                    .with_cause(e),
                );
                None
            }
        };

        Self::build(config, base_dir, init_diagnostics)
    }

    /// Discover relative to `base_dir` instead of the working directory
    ///
    /// A relative `base_dir` is resolved against the working directory.
    pub fn in_dir(config: Config, base_dir: impl Into<PathBuf>) -> Self {
        Self::build(config, Some(base_dir.into()), Diagnostics::new())
    }

    fn build(config: Config, base_dir: Option<PathBuf>, mut init_diagnostics: Diagnostics) -> Self {
        let commands_dir = match config.commands_dir() {
            Ok(dir) => Some(dir),
            Err(e) => {
                init_diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticCode::CommandsDirUnavailable,
                        format!("skipping user commands directory: {e}"),
                    )
                    .with_cause(e),
                );
                None
            }
        };

        Self {
            config,
            base_dir: base_dir.map(absolutize),
            commands_dir,
            init_diagnostics,
        }
    }

    /// Discover with explicit locations
    pub fn with_dirs(
        config: Config,
        base_dir: Option<PathBuf>,
        commands_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            config,
            base_dir: base_dir.map(absolutize),
            commands_dir,
            init_diagnostics: Diagnostics::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn base_dir(&self) -> Option<&Path> {
        self.base_dir.as_deref()
    }

    pub fn commands_dir(&self) -> Option<&Path> {
        self.commands_dir.as_deref()
    }
}

/// Make `dir` absolute without touching the filesystem
///
/// On failure the path is kept as given; the later scan reports the problem.
fn absolutize(dir: PathBuf) -> PathBuf {
    std::path::absolute(&dir).unwrap_or(dir)
}
