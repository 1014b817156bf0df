//! Validate command implementation
//!
//! Runs every cross-source check: module identifier collisions, the
//! args/subcommand tree rule, and the execution dependency graph.

use console::Style;

use crate::context::Context;
use crate::discovery::{Discovery, validate_command_tree, validate_execution_dag};
use crate::error::Result;

use super::helpers::report_warnings;

/// Run validate command
///
/// Manifests are discovered and parsed once; the same files feed the
/// collision check and the aggregation.
pub fn run(discovery: &Discovery) -> Result<()> {
    let (files, diagnostics) = discovery.load_all_with_diagnostics()?;
    discovery.check_module_collisions(&files)?;

    let result = discovery.aggregate(&Context::background(), &files, diagnostics)?;
    report_warnings(&result.diagnostics);
    validate_command_tree(result.set.commands())?;
    validate_execution_dag(result.set.commands())?;

    println!(
        "{} {} commands from {} sources",
        Style::new().bold().green().apply_to("Valid:"),
        result.set.len(),
        result.set.source_order().len()
    );
    Ok(())
}
