//! Configuration file handling for Cmdweave
//!
//! The config file lives at `<config_dir>/cmdweave/config.yaml` (override
//! with `CMDWEAVE_CONFIG`):
//!
//! ```yaml
//! commands_dir: /srv/cmds        # optional, default ~/.cmdweave/cmds
//! includes:
//!   - path: /opt/shared/io.example.tools.cmdmod
//!   - path: ../vendor/tools.cmdmod
//!     alias: vendor.tools
//! ```
//!
//! Relative include paths are resolved against the directory holding the
//! config file.

pub mod include;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{
    CmdweaveError, Result,
    config::{invalid, parse_failed, read_failed},
};
use crate::module::is_valid_module_name;

pub use include::IncludeEntry;

/// Environment variable overriding the config file location
pub const CONFIG_ENV: &str = "CMDWEAVE_CONFIG";

/// Environment variable overriding the user commands directory
pub const COMMANDS_DIR_ENV: &str = "CMDWEAVE_COMMANDS_DIR";

/// Config file name inside the application config directory
pub const CONFIG_FILE: &str = "config.yaml";

const APP_DIR: &str = "cmdweave";
const HOME_APP_DIR: &str = ".cmdweave";
const COMMANDS_SUBDIR: &str = "cmds";

/// User configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Module directories to scan explicitly
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub includes: Vec<IncludeEntry>,

    /// User commands directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commands_dir: Option<PathBuf>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_include(mut self, entry: IncludeEntry) -> Self {
        self.includes.push(entry);
        self
    }

    pub fn with_commands_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.commands_dir = Some(dir.into());
        self
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| parse_failed("<inline>", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| read_failed(path.display().to_string(), e.to_string()))?;

        let mut config: Self = serde_yaml::from_str(&content)
            .map_err(|e| parse_failed(path.display().to_string(), e.to_string()))?;
        config.validate()?;

        if let Some(base) = path.parent() {
            config.resolve_relative_to(base);
        }

        tracing::debug!(path = %path.display(), includes = config.includes.len(), "loaded config");
        Ok(config)
    }

    /// Location of the config file
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Ok(PathBuf::from(path));
        }
        let base = dirs::config_dir().ok_or(CmdweaveError::ConfigDirUnavailable)?;
        Ok(base.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load the config file from its default location
    ///
    /// A missing file is not an error; it yields the default configuration.
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        for entry in &self.includes {
            if entry.path.as_os_str().is_empty() {
                return Err(invalid("include path cannot be empty"));
            }
            if let Some(alias) = &entry.alias {
                if !is_valid_module_name(alias) {
                    return Err(invalid(format!(
                        "alias '{alias}' for include {} is not a valid module identifier",
                        entry.path.display()
                    )));
                }
            }
        }
        Ok(())
    }

    /// User commands directory
    ///
    /// `CMDWEAVE_COMMANDS_DIR` wins over `commands_dir`, which wins over
    /// `~/.cmdweave/cmds`.
    pub fn commands_dir(&self) -> Result<PathBuf> {
        if let Ok(dir) = std::env::var(COMMANDS_DIR_ENV) {
            if !dir.is_empty() {
                return Ok(PathBuf::from(dir));
            }
        }
        if let Some(dir) = &self.commands_dir {
            return Ok(dir.clone());
        }
        dirs::home_dir()
            .map(|home| home.join(HOME_APP_DIR).join(COMMANDS_SUBDIR))
            .ok_or(CmdweaveError::CommandsDirUnavailable)
    }

    /// Alias configured for the module at `module_path`, if any
    ///
    /// Includes without an alias are skipped, so a later aliased entry for
    /// the same module still applies.
    pub fn alias_for(&self, module_path: &Path) -> Option<&str> {
        self.includes.iter().find_map(|entry| {
            entry
                .alias
                .as_deref()
                .filter(|_| entry.matches(module_path))
        })
    }

    fn resolve_relative_to(&mut self, base: &Path) {
        for entry in &mut self.includes {
            if entry.path.is_relative() {
                entry.path = base.join(&entry.path);
            }
        }
        if let Some(dir) = &self.commands_dir {
            if dir.is_relative() {
                self.commands_dir = Some(base.join(dir));
            }
        }
    }
}
