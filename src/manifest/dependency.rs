//! Command dependency declarations

use serde::{Deserialize, Serialize};

/// A `depends_on` block, valid at manifest, command, and implementation level
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependsOn {
    /// Commands this scope depends on
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cmds: Vec<CommandDependency>,
}

impl DependsOn {
    /// Dependencies that must run before the dependent command
    ///
    /// Discoverability-only dependencies are excluded.
    pub fn executable_command_deps(&self) -> impl Iterator<Item = &CommandDependency> {
        self.cmds.iter().filter(|dep| dep.execute)
    }
}

/// A dependency on one of several commands
///
/// Any alternative may satisfy the dependency at run time. In YAML a bare
/// string is shorthand for a single alternative with `execute: false`:
///
/// ```yaml
/// cmds:
///   - build
///   - alternatives: [lint, check]
///     execute: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDependency")]
pub struct CommandDependency {
    /// Full command names, in preference order
    pub alternatives: Vec<String>,

    /// Whether the dependency must run before the dependent command
    pub execute: bool,
}

impl CommandDependency {
    /// Create a discoverability-only dependency
    pub fn discoverable<I, S>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            alternatives: alternatives.into_iter().map(Into::into).collect(),
            execute: false,
        }
    }

    /// Create a dependency that must execute first
    pub fn executable<I, S>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            execute: true,
            ..Self::discoverable(alternatives)
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDependency {
    Name(String),
    Full {
        alternatives: Vec<String>,
        #[serde(default)]
        execute: bool,
    },
}

impl From<RawDependency> for CommandDependency {
    fn from(raw: RawDependency) -> Self {
        match raw {
            RawDependency::Name(name) => Self::discoverable([name]),
            RawDependency::Full {
                alternatives,
                execute,
            } => Self {
                alternatives,
                execute,
            },
        }
    }
}
