//! Error types and handling for Cmdweave
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`config`]: Configuration errors
//! - [`manifest`]: Manifest decoding errors
//! - [`module`]: Module loading errors
//! - [`validation`]: Command tree and execution dependency errors
//! - [`diagnostic`]: Severity/code validation errors
//!
//! Recoverable problems found while scanning are not errors at all; they are
//! reported as [`crate::diagnostic::Diagnostic`] values instead.

pub mod config;
pub mod diagnostic;
pub mod manifest;
pub mod module;
pub mod validation;


use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Cmdweave operations
#[derive(Error, Diagnostic, Debug)]
pub enum CmdweaveError {
    // Validation errors
    #[error(
        "command '{command}' has both args and subcommands{}\n  defined args: {}\n  subcommands: {}",
        .file_path.as_deref().map(|p| format!(" in {p}")).unwrap_or_default(),
        .args.join(", "),
        .subcommands.join(", ")
    )]
    #[diagnostic(
        code(cmdweave::validation::args_subcommand_conflict),
        help("Positional args are only reachable on leaf commands. Move the args to a subcommand or rename the children")
    )]
    ArgsSubcommandConflict {
        command: String,
        args: Vec<String>,
        subcommands: Vec<String>,
        file_path: Option<String>,
    },

    #[error("Circular execution dependency detected among: {}", .nodes.join(", "))]
    #[diagnostic(
        code(cmdweave::validation::circular),
        help("Remove one of the `execute: true` dependencies forming the cycle")
    )]
    CircularDependency { nodes: Vec<String> },

    #[error(
        "command '{parent}' has execute dependency on '{target}', but '{target}' requires input: {}",
        missing_inputs(.required_args, .required_flags)
    )]
    #[diagnostic(
        code(cmdweave::validation::dependency_requires_input),
        help("Commands run as execution dependencies receive no arguments or flags; make these inputs optional")
    )]
    DependencyRequiresInput {
        parent: String,
        target: String,
        required_args: Vec<String>,
        required_flags: Vec<String>,
    },

    #[error(
        "module '{module_id}' is defined by both {first_source} and {second_source}; \
         configure an alias for one of them to resolve the collision"
    )]
    #[diagnostic(
        code(cmdweave::module::collision),
        help("Add `alias: <unique.id>` to the matching `includes` entry in your config")
    )]
    ModuleCollision {
        module_id: String,
        first_source: String,
        second_source: String,
    },

    // Module errors
    #[error("Invalid module at {path}: {}", .issues.join("; "))]
    #[diagnostic(code(cmdweave::module::invalid))]
    ModuleInvalid { path: String, issues: Vec<String> },

    #[error("Failed to parse module metadata: {path}: {reason}")]
    #[diagnostic(code(cmdweave::module::metadata_parse_failed))]
    ModuleMetadataParseFailed { path: String, reason: String },

    // Manifest errors
    #[error("No command manifest found")]
    #[diagnostic(
        code(cmdweave::manifest::not_found),
        help("Create a cmdfile.yaml in the current directory or add a module")
    )]
    NoManifestFound,

    #[error("Failed to read manifest: {path}: {reason}")]
    #[diagnostic(code(cmdweave::manifest::read_failed))]
    ManifestReadFailed { path: String, reason: String },

    #[error("Failed to parse manifest: {path}: {reason}")]
    #[diagnostic(code(cmdweave::manifest::parse_failed))]
    ManifestParseFailed { path: String, reason: String },

    #[error("Invalid manifest: {message}")]
    #[diagnostic(code(cmdweave::manifest::invalid))]
    ManifestInvalid { message: String },

    // Lookup errors
    #[error("command '{name}' not found")]
    #[diagnostic(
        code(cmdweave::command::not_found),
        help("Run 'cmdweave list' to see the available commands")
    )]
    CommandNotFound { name: String },

    // Configuration errors
    #[error("Failed to read configuration file: {path}: {reason}")]
    #[diagnostic(code(cmdweave::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(cmdweave::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(cmdweave::config::invalid))]
    ConfigInvalid { message: String },

    #[error("Could not determine the user commands directory")]
    #[diagnostic(
        code(cmdweave::config::commands_dir_unavailable),
        help("Set CMDWEAVE_COMMANDS_DIR or `commands_dir` in your config")
    )]
    CommandsDirUnavailable,

    #[error("Could not determine the configuration directory")]
    #[diagnostic(
        code(cmdweave::config::config_dir_unavailable),
        help("Set CMDWEAVE_CONFIG to the path of your config file")
    )]
    ConfigDirUnavailable,

    #[error("Could not determine the working directory: {reason}")]
    #[diagnostic(code(cmdweave::fs::working_dir_unavailable))]
    WorkingDirUnavailable { reason: String },

    // Diagnostic model errors
    #[error("Invalid severity '{value}' (expected 'warning' or 'error')")]
    #[diagnostic(code(cmdweave::diagnostic::invalid_severity))]
    InvalidSeverity { value: String },

    #[error("Unknown diagnostic code '{value}'")]
    #[diagnostic(code(cmdweave::diagnostic::invalid_code))]
    InvalidDiagnosticCode { value: String },

    // CLI errors
    #[error("Unknown shell: {shell}")]
    #[diagnostic(
        code(cmdweave::cli::unsupported_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnsupportedShell { shell: String },

    // Catastrophic errors
    #[error("{operation} canceled")]
    #[diagnostic(code(cmdweave::cancelled))]
    Cancelled { operation: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(cmdweave::fs::io_error))]
    IoError { message: String },
}

/// Render the unmet inputs of a dependency target for error messages
fn missing_inputs(required_args: &[String], required_flags: &[String]) -> String {
    required_args
        .iter()
        .map(|arg| format!("argument '{arg}'"))
        .chain(required_flags.iter().map(|flag| format!("flag '--{flag}'")))
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<std::io::Error> for CmdweaveError {
    fn from(err: std::io::Error) -> Self {
        CmdweaveError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CmdweaveError {
    fn from(err: serde_json::Error) -> Self {
        CmdweaveError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, CmdweaveError>;
