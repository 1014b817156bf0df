//! Explicit module includes

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A module directory listed under `includes:` in the config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncludeEntry {
    /// Path to a `*.cmdmod` directory
    pub path: PathBuf,

    /// Identifier to use instead of the module's declared one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl IncludeEntry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Whether this entry refers to the module directory at `module_path`
    ///
    /// Both sides are canonicalized when possible so `./a/../b.cmdmod` and
    /// `/abs/b.cmdmod` compare equal.
    pub fn matches(&self, module_path: &Path) -> bool {
        canonical(&self.path) == canonical(module_path)
    }
}

fn canonical(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
