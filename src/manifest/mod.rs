//! Command manifest (cmdfile.yaml) data structures
//!
//! A manifest declares one or more commands together with their positional
//! arguments, flags, and dependencies:
//!
//! ```yaml
//! description: Project tasks
//! depends_on:
//!   cmds:
//!     - alternatives: [setup]
//!       execute: true
//! cmds:
//!   - name: build
//!   - name: deploy staging
//!     args:
//!       - name: target
//!         required: true
//!     depends_on:
//!       cmds: [build]
//! ```
//!
//! Manifests loaded from a module are namespaced by the module identifier:
//! a module `io.example.tools` declaring `build` exposes the full command
//! name `io.example.tools build`.

pub mod command;
pub mod dependency;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{
    Result,
    manifest::{invalid, parse_failed, read_failed},
};

pub use command::{Argument, Command, Flag, Implementation};
pub use dependency::{CommandDependency, DependsOn};

/// Base name of a manifest file
pub const MANIFEST_NAME: &str = "cmdfile";

/// Preferred manifest file name
pub const MANIFEST_FILE: &str = "cmdfile.yaml";

/// Parsed command manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Dependencies shared by every command in the manifest
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<DependsOn>,

    #[serde(default)]
    pub cmds: Vec<Command>,

    /// File the manifest was read from
    #[serde(skip)]
    pub file_path: Option<PathBuf>,

    /// Identifier of the owning module, when loaded from one
    #[serde(skip)]
    pub module_id: Option<String>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_command(mut self, command: Command) -> Self {
        self.cmds.push(command);
        self
    }

    pub fn with_depends_on(mut self, depends_on: DependsOn) -> Self {
        self.depends_on = Some(depends_on);
        self
    }

    pub fn with_module_id(mut self, module_id: impl Into<String>) -> Self {
        self.module_id = Some(module_id.into());
        self
    }

    /// Parse manifest from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let manifest: Self =
            serde_yaml::from_str(yaml).map_err(|e| parse_failed("<inline>", e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Read and parse a manifest file
    pub fn parse(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| read_failed(path.display().to_string(), e.to_string()))?;

        let mut manifest: Self = serde_yaml::from_str(&content)
            .map_err(|e| parse_failed(path.display().to_string(), e.to_string()))?;

        manifest
            .validate()
            .map_err(|e| invalid(format!("{}: {e}", path.display())))?;

        manifest.file_path = Some(path.to_path_buf());
        Ok(manifest)
    }

    /// Read a module's manifest, namespacing its commands under `module_id`
    pub fn parse_module(path: &Path, module_id: &str) -> Result<Self> {
        let manifest = Self::parse(path)?;
        Ok(manifest.with_module_id(module_id))
    }

    pub fn module_id(&self) -> Option<&str> {
        self.module_id.as_deref()
    }

    /// Fully qualified name of a command declared in this manifest
    pub fn full_command_name(&self, command: &Command) -> String {
        match self.module_id() {
            Some(id) => format!("{id} {}", command.name),
            None => command.name.clone(),
        }
    }

    /// Every command with its full name, in declaration order
    pub fn flatten_commands(&self) -> Vec<(String, &Command)> {
        self.cmds
            .iter()
            .map(|cmd| (self.full_command_name(cmd), cmd))
            .collect()
    }

    /// Validate manifest structure
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for cmd in &self.cmds {
            if cmd.name.trim().is_empty() {
                return Err(invalid("command name cannot be empty"));
            }

            let normalized = cmd.name.split_whitespace().collect::<Vec<_>>().join(" ");
            if normalized != cmd.name {
                return Err(invalid(format!(
                    "command name '{}' must be words separated by single spaces",
                    cmd.name
                )));
            }

            if !seen.insert(cmd.name.as_str()) {
                return Err(invalid(format!("duplicate command '{}'", cmd.name)));
            }

            for arg in &cmd.args {
                if arg.name.is_empty() {
                    return Err(invalid(format!(
                        "command '{}' has an argument with an empty name",
                        cmd.name
                    )));
                }
            }

            for flag in &cmd.flags {
                if flag.name.is_empty() {
                    return Err(invalid(format!(
                        "command '{}' has a flag with an empty name",
                        cmd.name
                    )));
                }
            }

            let scopes = std::iter::once(cmd.depends_on.as_ref())
                .chain(cmd.implementations.iter().map(|i| i.depends_on.as_ref()))
                .flatten();
            for deps in scopes {
                validate_depends_on(deps, &cmd.name)?;
            }
        }

        if let Some(deps) = &self.depends_on {
            validate_depends_on(deps, "<manifest>")?;
        }

        Ok(())
    }
}

fn validate_depends_on(deps: &DependsOn, owner: &str) -> Result<()> {
    for dep in &deps.cmds {
        if dep.alternatives.is_empty() {
            return Err(invalid(format!(
                "dependency of '{owner}' must list at least one alternative"
            )));
        }
        if dep.alternatives.iter().any(|alt| alt.trim().is_empty()) {
            return Err(invalid(format!(
                "dependency of '{owner}' has an empty alternative"
            )));
        }
    }
    Ok(())
}
