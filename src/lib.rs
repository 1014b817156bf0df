//! Cmdweave - discovery and aggregation of declarative commands
//!
//! Cmdweave finds command manifests (`cmdfile.yaml`) in the working
//! directory, in `.cmdmod` module directories and their vendored
//! `cmd_modules/`, in configured includes, and in the user commands
//! directory. It merges them into one [`discovery::DiscoveredCommandSet`],
//! flags ambiguous names, and validates the result.
//!
//! ```no_run
//! use cmdweave::config::Config;
//! use cmdweave::context::Context;
//! use cmdweave::discovery::Discovery;
//!
//! # fn main() -> cmdweave::error::Result<()> {
//! let discovery = Discovery::new(Config::load_default()?);
//! let result = discovery.discover_and_validate_command_set(&Context::background())?;
//! for info in result.set.commands() {
//!     println!("{} ({})", info.name, info.source_id);
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod diagnostic;
pub mod discovery;
pub mod error;
pub mod graph;
pub mod manifest;
pub mod module;

#[cfg(test)]
pub(crate) mod test_fixtures;
