//! List command implementation
//!
//! This command lists every discovered command grouped by source, with
//! ambiguous simple names marked.

use console::Style;
use serde::Serialize;

use crate::cli::ListArgs;
use crate::context::Context;
use crate::discovery::{CommandInfo, DiscoveredCommandSet, Discovery};
use crate::error::Result;
use crate::module::RESERVED_SOURCE_ID;

use super::helpers::report_warnings;

/// JSON shape of `list --json`
#[derive(Debug, Serialize)]
struct ListOutput<'a> {
    sources: &'a [String],
    ambiguous: Vec<&'a str>,
    commands: Vec<&'a CommandInfo>,
}

/// Run list command
pub fn run(discovery: &Discovery, args: ListArgs) -> Result<()> {
    let ctx = Context::background();
    let result = discovery.discover_command_set(&ctx)?;
    report_warnings(&result.diagnostics);

    let set = &result.set;
    let commands: Vec<&CommandInfo> = match args.prefix.as_deref() {
        Some(prefix) => set
            .commands()
            .iter()
            .filter(|c| c.name.starts_with(prefix))
            .collect(),
        None => set.commands().iter().collect(),
    };

    if args.json {
        let output = ListOutput {
            sources: set.source_order(),
            ambiguous: set.ambiguous_names().collect(),
            commands,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if commands.is_empty() {
        println!("No commands found.");
        return Ok(());
    }

    println!("Available commands ({}):", commands.len());
    println!();
    display_grouped(set, &commands);

    Ok(())
}

/// Print commands under a header per source, in source order
fn display_grouped(set: &DiscoveredCommandSet, commands: &[&CommandInfo]) {
    let header = Style::new().bold();
    for source_id in set.source_order() {
        let group: Vec<&&CommandInfo> = commands
            .iter()
            .filter(|c| &c.source_id == source_id)
            .collect();
        if group.is_empty() {
            continue;
        }

        let label = if source_id == RESERVED_SOURCE_ID {
            format!("{source_id} (current directory)")
        } else {
            format!("{source_id} (module)")
        };
        println!("{}", header.apply_to(label));
        for info in group {
            display_command(info);
        }
        println!();
    }
}

fn display_command(info: &CommandInfo) {
    let mut line = format!("  {}", Style::new().bold().yellow().apply_to(&info.name));
    if info.is_ambiguous {
        line.push_str(&format!(" {}", Style::new().red().apply_to("(ambiguous)")));
    }
    if let Some(description) = &info.description {
        line.push_str(&format!("  {}", Style::new().dim().apply_to(description)));
    }
    println!("{line}");
}
