//! Show command implementation

use console::Style;

use crate::cli::ShowArgs;
use crate::context::Context;
use crate::discovery::{CommandInfo, Discovery};
use crate::error::{CmdweaveError, Result};
use crate::manifest::DependsOn;

use super::helpers::report_warnings;

/// Run show command
///
/// A command that cannot be found fails with `CommandNotFound`.
pub fn run(discovery: &Discovery, args: ShowArgs) -> Result<()> {
    let name = args.full_name();
    let lookup = discovery.get_command(&Context::background(), &name)?;
    report_warnings(&lookup.diagnostics);

    match lookup.command {
        Some(info) => {
            show_command(&info);
            Ok(())
        }
        None => Err(CmdweaveError::CommandNotFound { name }),
    }
}

fn show_command(info: &CommandInfo) {
    let label = Style::new().bold();

    println!("{}", Style::new().bold().yellow().apply_to(&info.name));
    if let Some(description) = &info.description {
        println!("  {description}");
    }
    println!();
    println!("  {} {} ({})", label.apply_to("Source:"), info.source_id, info.source);
    if let Some(module_id) = &info.module_id {
        println!("  {} {module_id}", label.apply_to("Module:"));
    }
    println!("  {} {}", label.apply_to("File:"), info.file_path.display());
    if info.is_ambiguous {
        println!(
            "  {} '{}' is defined by more than one source",
            Style::new().bold().red().apply_to("Ambiguous:"),
            info.simple_name
        );
    }

    let command = &info.command;
    if !command.args.is_empty() {
        println!("  {}", label.apply_to("Arguments:"));
        for arg in &command.args {
            println!("    {}{}", arg.name, required_marker(arg.required));
        }
    }
    if !command.flags.is_empty() {
        println!("  {}", label.apply_to("Flags:"));
        for flag in &command.flags {
            println!("    --{}{}", flag.name, required_marker(flag.required));
        }
    }

    let dependency_levels = [
        info.manifest.depends_on.as_ref(),
        command.depends_on.as_ref(),
    ];
    let implementation_levels = command
        .implementations
        .iter()
        .filter_map(|i| i.depends_on.as_ref());
    let deps: Vec<&DependsOn> = dependency_levels
        .into_iter()
        .flatten()
        .chain(implementation_levels)
        .collect();
    if deps.iter().any(|d| !d.cmds.is_empty()) {
        println!("  {}", label.apply_to("Depends on:"));
        for dep in deps.iter().flat_map(|d| &d.cmds) {
            let kind = if dep.execute { "execute" } else { "discover" };
            println!("    {} ({kind})", dep.alternatives.join(" | "));
        }
    }
}

fn required_marker(required: bool) -> &'static str {
    if required { " (required)" } else { "" }
}
