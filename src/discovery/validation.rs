//! Command tree and execution dependency validation
//!
//! Both checks are pure functions over an aggregated command list and should
//! be re-run whenever the list changes.

use std::collections::HashMap;

use crate::error::{CmdweaveError, Result};
use crate::graph::Graph;
use crate::manifest::CommandDependency;

use super::CommandInfo;

/// Reject commands that declare positional args and also have subcommands
///
/// Arguments on a non-leaf command are unreachable: anything typed after
/// it is read as a subcommand name. Commands are checked in list order and
/// the first conflict is returned.
pub fn validate_command_tree(commands: &[CommandInfo]) -> Result<()> {
    let mut children: HashMap<String, Vec<String>> = HashMap::new();
    for info in commands {
        let parts: Vec<&str> = info.name.split_whitespace().collect();
        for i in 1..parts.len() {
            children
                .entry(parts[..i].join(" "))
                .or_default()
                .push(info.name.clone());
        }
    }

    for info in commands {
        if info.command.args.is_empty() {
            continue;
        }
        if let Some(subcommands) = children.get(&info.name) {
            return Err(CmdweaveError::ArgsSubcommandConflict {
                command: info.name.clone(),
                args: info.command.args.iter().map(|a| a.name.clone()).collect(),
                subcommands: subcommands.clone(),
                file_path: Some(info.file_path.display().to_string()),
            });
        }
    }

    Ok(())
}

/// Check that `execute: true` dependencies form a DAG
///
/// Dependencies are gathered from the manifest, the command, and each of
/// its implementations. Every alternative becomes an edge, since any of them
/// may be chosen at run time. A command reachable as an execution dependency
/// runs without input, so it may not declare required args or flags.
///
/// # Errors
///
/// - `DependencyRequiresInput` for the first dependency target with
///   required inputs
/// - `CircularDependency` when the edges form a cycle
pub fn validate_execution_dag(commands: &[CommandInfo]) -> Result<()> {
    if commands.is_empty() {
        return Ok(());
    }

    let by_name: HashMap<&str, &CommandInfo> =
        commands.iter().map(|c| (c.name.as_str(), c)).collect();

    let mut graph = Graph::new();

    for info in commands {
        let exec_deps = executable_deps(info);
        if exec_deps.is_empty() {
            continue;
        }

        graph.add_node(&info.name);
        for dep in exec_deps {
            for alt in &dep.alternatives {
                graph.add_edge(alt, &info.name);

                if let Some(target) = by_name.get(alt.as_str()) {
                    check_no_required_inputs(target, &info.name)?;
                }
            }
        }
    }

    graph.topological_sort().map(|_| ())
}

/// Execution dependencies declared for `info` at every level
fn executable_deps(info: &CommandInfo) -> Vec<&CommandDependency> {
    let manifest_level = info.manifest.depends_on.as_ref();
    let command_level = info.command.depends_on.as_ref();
    let implementation_level = info
        .command
        .implementations
        .iter()
        .filter_map(|i| i.depends_on.as_ref());

    manifest_level
        .into_iter()
        .chain(command_level)
        .chain(implementation_level)
        .flat_map(|deps| deps.executable_command_deps())
        .collect()
}

fn check_no_required_inputs(target: &CommandInfo, parent: &str) -> Result<()> {
    let required_args = target.command.required_args();
    let required_flags = target.command.required_flags();
    if required_args.is_empty() && required_flags.is_empty() {
        return Ok(());
    }
    Err(CmdweaveError::DependencyRequiresInput {
        parent: parent.to_string(),
        target: target.name.clone(),
        required_args,
        required_flags,
    })
}
