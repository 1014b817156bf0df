//! Command helper utilities

use std::path::PathBuf;

use console::Style;

use crate::config::Config;
use crate::diagnostic::{Diagnostics, Severity};
use crate::discovery::Discovery;
use crate::error::{CmdweaveError, Result};

/// Build a [`Discovery`] from the global CLI options
///
/// An explicit config path must exist; the default location may be absent.
/// Without `directory`, discovery runs from the process working directory.
pub fn resolve_discovery(directory: Option<PathBuf>, config: Option<PathBuf>) -> Result<Discovery> {
    let config = match config {
        Some(path) => Config::load(&path)?,
        None => Config::load_default()?,
    };

    match directory {
        Some(dir) => {
            let base = dunce::canonicalize(&dir).map_err(|e| CmdweaveError::WorkingDirUnavailable {
                reason: format!("{}: {e}", dir.display()),
            })?;
            Ok(Discovery::in_dir(config, base))
        }
        None => Ok(Discovery::new(config)),
    }
}

/// Print warning diagnostics to stderr
///
/// Error-severity diagnostics are left to the caller, which usually turns
/// them into a failing exit status.
pub fn report_warnings(diagnostics: &Diagnostics) {
    let label = Style::new().bold().yellow();
    for diagnostic in diagnostics.with_severity(Severity::Warning) {
        eprintln!(
            "{} [{}] {}",
            label.apply_to("warning:"),
            diagnostic.code(),
            diagnostic.message()
        );
    }
}
