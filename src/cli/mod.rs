//! CLI definitions using clap derive API
//!
//! Each command's argument type lives in its own submodule.

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod list;
pub mod show;

pub use completions::CompletionsArgs;
pub use list::ListArgs;
pub use show::ShowArgs;

/// Cmdweave - declarative command discovery
#[derive(Parser, Debug)]
#[command(
    name = "cmdweave",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Discover and aggregate commands from cmdfiles and modules",
    long_about = "Cmdweave finds command manifests in the current directory, local and vendored \
                  .cmdmod modules, configured includes, and the user commands directory, and \
                  merges them into one validated command set.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  cmdweave list                     \x1b[90m# List all discovered commands\x1b[0m\n   \
                  cmdweave list --json              \x1b[90m# Same, as JSON\x1b[0m\n   \
                  cmdweave show deploy staging      \x1b[90m# Show one command\x1b[0m\n   \
                  cmdweave validate                 \x1b[90m# Check collisions, tree, and dependencies\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Directory to discover from (defaults to current directory)
    #[arg(long = "directory", short = 'C', global = true)]
    pub directory: Option<PathBuf>,

    /// Configuration file (defaults to CMDWEAVE_CONFIG or the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List discovered commands
    List(ListArgs),

    /// Show command information
    Show(ShowArgs),

    /// Validate module identifiers, the command tree, and execution dependencies
    Validate,

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
