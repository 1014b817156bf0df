//! Command aggregation across discovered manifests

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use super::{DiscoveredFile, Discovery, Source, validation::validate_command_tree};
use crate::context::Context;
use crate::diagnostic::{Cause, Diagnostic, DiagnosticCode, Diagnostics, Severity};
use crate::error::Result;
use crate::manifest::{Command, Manifest};
use crate::module::{RESERVED_SOURCE_ID, short_name_from_path};

const OPERATION: &str = "discover command set";

/// A flattened, addressable command
#[derive(Debug, Clone, Serialize)]
pub struct CommandInfo {
    /// Full name, e.g. `deploy staging` or `io.example.tools lint`
    pub name: String,
    /// The command's own declared name, without module namespace
    pub simple_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub source: Source,
    /// `cmdfile` for the working-directory manifest, else the module short name
    pub source_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module_id: Option<String>,
    pub file_path: PathBuf,
    #[serde(skip)]
    pub command: Arc<Command>,
    #[serde(skip)]
    pub manifest: Arc<Manifest>,
    /// Set when another source declares the same simple name
    pub is_ambiguous: bool,
}

impl CommandInfo {
    pub fn new(
        name: impl Into<String>,
        source: Source,
        source_id: impl Into<String>,
        file_path: PathBuf,
        command: Arc<Command>,
        manifest: Arc<Manifest>,
    ) -> Self {
        Self {
            name: name.into(),
            simple_name: command.name.clone(),
            description: command.description.clone(),
            source,
            source_id: source_id.into(),
            module_id: manifest.module_id().map(str::to_string),
            file_path,
            command,
            manifest,
            is_ambiguous: false,
        }
    }
}

/// Aggregated command catalog with conflict analysis
#[derive(Debug, Clone, Default)]
pub struct DiscoveredCommandSet {
    commands: Vec<CommandInfo>,
    /// Simple name → indices into `commands`
    by_simple_name: BTreeMap<String, Vec<usize>>,
    /// Source ID → indices into `commands`
    by_source: BTreeMap<String, Vec<usize>>,
    ambiguous_names: BTreeSet<String>,
    source_order: Vec<String>,
}

impl DiscoveredCommandSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a command and index it by simple name and source
    pub fn add(&mut self, command: CommandInfo) {
        let idx = self.commands.len();
        self.by_simple_name
            .entry(command.simple_name.clone())
            .or_default()
            .push(idx);

        if !self.by_source.contains_key(&command.source_id) {
            self.source_order.push(command.source_id.clone());
        }
        self.by_source
            .entry(command.source_id.clone())
            .or_default()
            .push(idx);

        self.commands.push(command);
    }

    /// Flag ambiguous names and fix the source display order
    ///
    /// A simple name is ambiguous when more than one distinct source
    /// declares it. Sources are ordered with `cmdfile` first, then
    /// alphabetically. Safe to call more than once.
    pub fn analyze(&mut self) {
        for (name, indices) in &self.by_simple_name {
            if indices.len() <= 1 {
                continue;
            }
            let sources: HashSet<&str> = indices
                .iter()
                .map(|&i| self.commands[i].source_id.as_str())
                .collect();
            if sources.len() > 1 {
                self.ambiguous_names.insert(name.clone());
                for &i in indices {
                    self.commands[i].is_ambiguous = true;
                }
            }
        }

        self.source_order.sort_by(|a, b| {
            let a_root = a == RESERVED_SOURCE_ID;
            let b_root = b == RESERVED_SOURCE_ID;
            b_root.cmp(&a_root).then_with(|| a.cmp(b))
        });
    }

    /// Sort commands by full name, keeping the indexes consistent
    pub fn sort_by_name(&mut self) {
        self.commands.sort_by(|a, b| a.name.cmp(&b.name));
        self.by_simple_name.clear();
        self.by_source.clear();
        for (idx, command) in self.commands.iter().enumerate() {
            self.by_simple_name
                .entry(command.simple_name.clone())
                .or_default()
                .push(idx);
            self.by_source
                .entry(command.source_id.clone())
                .or_default()
                .push(idx);
        }
    }

    pub fn commands(&self) -> &[CommandInfo] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Look up a command by full name
    pub fn get(&self, name: &str) -> Option<&CommandInfo> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Every command sharing `simple_name`, regardless of source
    pub fn by_simple_name(&self, simple_name: &str) -> Vec<&CommandInfo> {
        self.indexed(self.by_simple_name.get(simple_name))
    }

    /// Every command from `source_id`
    pub fn by_source(&self, source_id: &str) -> Vec<&CommandInfo> {
        self.indexed(self.by_source.get(source_id))
    }

    pub fn is_ambiguous(&self, simple_name: &str) -> bool {
        self.ambiguous_names.contains(simple_name)
    }

    /// Ambiguous simple names, sorted
    pub fn ambiguous_names(&self) -> impl Iterator<Item = &str> {
        self.ambiguous_names.iter().map(String::as_str)
    }

    /// Source IDs in display order
    pub fn source_order(&self) -> &[String] {
        &self.source_order
    }

    fn indexed(&self, indices: Option<&Vec<usize>>) -> Vec<&CommandInfo> {
        indices
            .map(|indices| indices.iter().map(|&i| &self.commands[i]).collect())
            .unwrap_or_default()
    }
}

/// Command set plus the diagnostics gathered while building it
#[derive(Debug, Clone, Default)]
pub struct CommandSetResult {
    pub set: DiscoveredCommandSet,
    pub diagnostics: Diagnostics,
}

/// Point lookup result; absence is reported through `diagnostics`
#[derive(Debug, Clone, Default)]
pub struct LookupResult {
    pub command: Option<CommandInfo>,
    pub diagnostics: Diagnostics,
}

/// Prefix lookup result
#[derive(Debug, Clone, Default)]
pub struct PrefixResult {
    pub commands: Vec<CommandInfo>,
    pub diagnostics: Diagnostics,
}

impl Discovery {
    /// Discover, parse, and aggregate every command
    ///
    /// Within the working-directory stream the first command with a given
    /// simple name wins. Module commands are always kept; name clashes
    /// between sources are flagged as ambiguous instead.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if `ctx` is cancelled before or during the scan.
    pub fn discover_command_set(&self, ctx: &Context) -> Result<CommandSetResult> {
        ctx.check(OPERATION)?;

        let (files, diagnostics) = self.load_all_with_diagnostics()?;
        self.aggregate(ctx, &files, diagnostics)
    }

    /// Aggregate already loaded files, in precedence order, into a command set
    ///
    /// `diagnostics` holds whatever discovery reported; parse failures are
    /// appended to it. `ctx` is checked before each file.
    ///
    /// # Errors
    ///
    /// Returns `Cancelled` if `ctx` is cancelled while files remain.
    pub fn aggregate(
        &self,
        ctx: &Context,
        files: &[DiscoveredFile],
        mut diagnostics: Diagnostics,
    ) -> Result<CommandSetResult> {
        let mut set = DiscoveredCommandSet::new();
        let mut seen_non_module = HashSet::new();

        for file in files {
            ctx.check(OPERATION)?;

            if let Some(err) = file.error() {
                diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticCode::ManifestParseSkipped,
                        format!("skipping manifest at {}: {err}", file.path.display()),
                    )
                    .with_path(&file.path)
                    .with_shared_cause(Arc::clone(err) as Cause),
                );
                continue;
            }
            let Some(manifest) = file.manifest() else {
                continue;
            };

            let (source_id, is_module) = match &file.module {
                Some(module) => (short_name_from_path(module.path()), true),
                None => (RESERVED_SOURCE_ID.to_string(), false),
            };

            for (full_name, command) in manifest.flatten_commands() {
                if !is_module && !seen_non_module.insert(command.name.clone()) {
                    tracing::debug!(command = %command.name, "shadowed by higher-precedence manifest");
                    continue;
                }
                set.add(CommandInfo::new(
                    full_name,
                    file.source,
                    source_id.as_str(),
                    file.path.clone(),
                    Arc::new(command.clone()),
                    Arc::clone(manifest),
                ));
            }
        }

        set.analyze();
        set.sort_by_name();

        tracing::debug!(
            commands = set.len(),
            sources = set.source_order().len(),
            "command set ready"
        );
        Ok(CommandSetResult { set, diagnostics })
    }

    /// Discover the command set and reject args/subcommand conflicts
    pub fn discover_and_validate_command_set(&self, ctx: &Context) -> Result<CommandSetResult> {
        let result = self.discover_command_set(ctx)?;
        validate_command_tree(result.set.commands())?;
        Ok(result)
    }

    /// Find a command by full name
    ///
    /// A missing command is an error-severity `command_not_found` diagnostic,
    /// not an `Err`.
    pub fn get_command(&self, ctx: &Context, name: &str) -> Result<LookupResult> {
        let CommandSetResult {
            set,
            mut diagnostics,
        } = self.discover_command_set(ctx)?;

        let command = set.get(name).cloned();
        if command.is_none() {
            diagnostics.push(Diagnostic::new(
                Severity::Error,
                DiagnosticCode::CommandNotFound,
                format!("command '{name}' not found"),
            ));
        }

        Ok(LookupResult {
            command,
            diagnostics,
        })
    }

    /// Every command whose full name starts with `prefix`, sorted by name
    pub fn get_commands_with_prefix(&self, ctx: &Context, prefix: &str) -> Result<PrefixResult> {
        let CommandSetResult { set, diagnostics } = self.discover_command_set(ctx)?;
        let commands = set
            .commands()
            .iter()
            .filter(|c| c.name.starts_with(prefix))
            .cloned()
            .collect();
        Ok(PrefixResult {
            commands,
            diagnostics,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::CmdweaveError;
    use crate::test_fixtures::{command_info, create_temp_dir, write_manifest, write_module};
    use std::path::Path;

    fn info(name: &str, source_id: &str) -> CommandInfo {
        command_info(name, source_id, Command::new(name))
    }

    fn discovery(base: &Path) -> Discovery {
        Discovery::with_dirs(Config::default(), Some(base.to_path_buf()), None)
    }

    #[test]
    fn test_same_name_different_sources_is_ambiguous() {
        let mut set = DiscoveredCommandSet::new();
        set.add(info("deploy", "cmdfile"));
        set.add(command_info("foo deploy", "foo", Command::new("deploy")));
        set.analyze();

        assert!(set.is_ambiguous("deploy"));
        assert!(set.commands().iter().all(|c| c.is_ambiguous));
        assert_eq!(set.ambiguous_names().collect::<Vec<_>>(), vec!["deploy"]);
    }

    #[test]
    fn test_same_name_same_source_is_not_ambiguous() {
        let mut set = DiscoveredCommandSet::new();
        set.add(command_info("foo build", "foo", Command::new("build")));
        set.add(command_info("foo build", "foo", Command::new("build")));
        set.analyze();

        assert!(!set.is_ambiguous("build"));
        assert!(set.commands().iter().all(|c| !c.is_ambiguous));
        assert_eq!(set.by_simple_name("build").len(), 2);
    }

    #[test]
    fn test_source_order_puts_root_first() {
        let mut set = DiscoveredCommandSet::new();
        set.add(info("a", "foo"));
        set.add(info("b", "cmdfile"));
        set.add(info("c", "bar"));
        set.analyze();

        assert_eq!(set.source_order(), ["cmdfile", "bar", "foo"]);
    }

    #[test]
    fn test_analyze_is_idempotent() {
        let mut set = DiscoveredCommandSet::new();
        set.add(info("x", "foo"));
        set.add(info("x", "bar"));
        set.analyze();
        set.analyze();

        assert_eq!(set.ambiguous_names().count(), 1);
        assert_eq!(set.source_order(), ["bar", "foo"]);
    }

    #[test]
    fn test_sort_by_name_keeps_indexes() {
        let mut set = DiscoveredCommandSet::new();
        set.add(info("zeta", "foo"));
        set.add(info("alpha", "bar"));
        set.add(info("mid", "foo"));
        set.sort_by_name();

        let names: Vec<_> = set.commands().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);

        let foo: Vec<_> = set.by_source("foo").iter().map(|c| c.name.as_str()).collect();
        assert_eq!(foo, vec!["mid", "zeta"]);
        assert_eq!(set.by_simple_name("alpha")[0].source_id, "bar");
        assert!(set.by_source("missing").is_empty());
    }

    #[test]
    fn test_discover_command_set_end_to_end() {
        let temp = create_temp_dir();
        write_manifest(
            temp.path(),
            "cmds:\n  - name: deploy\n    description: Root deploy\n  - name: build\n",
        );
        write_module(
            temp.path(),
            "foo",
            "cmds:\n  - name: deploy\n  - name: lint\n",
        );

        let result = discovery(temp.path())
            .discover_command_set(&Context::background())
            .expect("discovers");
        let set = &result.set;

        let names: Vec<_> = set.commands().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["build", "deploy", "foo deploy", "foo lint"]);
        assert_eq!(set.source_order(), ["cmdfile", "foo"]);
        assert!(set.is_ambiguous("deploy"));
        assert!(!set.is_ambiguous("lint"));

        let root_deploy = set.get("deploy").expect("root deploy");
        assert_eq!(root_deploy.source, Source::CurrentDir);
        assert_eq!(root_deploy.description.as_deref(), Some("Root deploy"));
        assert!(root_deploy.module_id.is_none());

        let lint = set.get("foo lint").expect("module lint");
        assert_eq!(lint.simple_name, "lint");
        assert_eq!(lint.module_id.as_deref(), Some("foo"));
        assert_eq!(lint.source_id, "foo");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_module_commands_survive_name_clashes() {
        let temp = create_temp_dir();
        write_module(temp.path(), "aaa", "cmds:\n  - name: build\n");
        write_module(temp.path(), "bbb", "cmds:\n  - name: build\n");

        let result = discovery(temp.path())
            .discover_command_set(&Context::background())
            .expect("discovers");
        assert_eq!(result.set.by_simple_name("build").len(), 2);
        assert!(result.set.is_ambiguous("build"));
    }

    #[test]
    fn test_parse_failure_becomes_warning() {
        let temp = create_temp_dir();
        write_manifest(temp.path(), "cmds: [unclosed");
        write_module(temp.path(), "foo", "cmds:\n  - name: lint\n");

        let result = discovery(temp.path())
            .discover_command_set(&Context::background())
            .expect("discovers");

        assert_eq!(result.set.len(), 1);
        let diag = result
            .diagnostics
            .iter()
            .find(|d| d.code() == DiagnosticCode::ManifestParseSkipped)
            .expect("parse skipped diagnostic");
        assert_eq!(diag.severity(), Severity::Warning);
        let cause = diag
            .cause()
            .and_then(|c| c.downcast_ref::<CmdweaveError>())
            .expect("cause is the parse error itself");
        assert!(matches!(cause, CmdweaveError::ManifestParseFailed { .. }));
    }

    #[test]
    fn test_discovery_diagnostics_are_carried_forward() {
        let temp = create_temp_dir();
        std::fs::create_dir(temp.path().join("broken.cmdmod")).expect("mkdir");

        let result = discovery(temp.path())
            .discover_command_set(&Context::background())
            .expect("discovers");
        assert!(result.diagnostics.contains_code(DiagnosticCode::ModuleLoadSkipped));
    }

    #[test]
    fn test_cancelled_after_discovery_stops_aggregation() {
        let temp = create_temp_dir();
        write_manifest(temp.path(), "cmds:\n  - name: build\n");
        write_module(temp.path(), "alpha", "cmds:\n  - name: lint\n");
        write_module(temp.path(), "beta", "cmds:\n  - name: fmt\n");

        let discovery = discovery(temp.path());
        let ctx = Context::background();
        let (files, diagnostics) = discovery.load_all_with_diagnostics().expect("loads");
        assert_eq!(files.len(), 3);

        ctx.clone().cancel();
        match discovery.aggregate(&ctx, &files, diagnostics) {
            Err(CmdweaveError::Cancelled { operation }) => {
                assert_eq!(operation, "discover command set");
            }
            other => panic!("Expected Cancelled, got {other:?}"),
        }
    }

    #[test]
    fn test_aggregate_matches_full_discovery() {
        let temp = create_temp_dir();
        write_manifest(temp.path(), "cmds:\n  - name: build\n");
        write_module(temp.path(), "alpha", "cmds:\n  - name: build\n");

        let discovery = discovery(temp.path());
        let ctx = Context::background();
        let (files, diagnostics) = discovery.load_all_with_diagnostics().expect("loads");
        let aggregated = discovery.aggregate(&ctx, &files, diagnostics).expect("aggregates");
        let full = discovery.discover_command_set(&ctx).expect("discovers");

        let names = |r: &CommandSetResult| -> Vec<String> {
            r.set.commands().iter().map(|c| c.name.clone()).collect()
        };
        assert_eq!(names(&aggregated), names(&full));
        assert!(aggregated.set.is_ambiguous("build"));
    }

    #[test]
    fn test_cancelled_before_start() {
        let temp = create_temp_dir();
        let ctx = Context::background();
        ctx.cancel();

        assert!(matches!(
            discovery(temp.path()).discover_command_set(&ctx),
            Err(CmdweaveError::Cancelled { .. })
        ));
    }

    #[test]
    fn test_get_command_found() {
        let temp = create_temp_dir();
        write_manifest(temp.path(), "cmds:\n  - name: build\n");

        let result = discovery(temp.path())
            .get_command(&Context::background(), "build")
            .expect("looks up");
        assert_eq!(result.command.map(|c| c.name), Some("build".to_string()));
        assert!(!result.diagnostics.has_errors());
    }

    #[test]
    fn test_get_command_missing_is_diagnostic() {
        let temp = create_temp_dir();
        write_manifest(temp.path(), "cmds:\n  - name: build\n");

        let result = discovery(temp.path())
            .get_command(&Context::background(), "deploy")
            .expect("looks up");
        assert!(result.command.is_none());

        let diag = result.diagnostics.iter().last().expect("diagnostic");
        assert_eq!(diag.code(), DiagnosticCode::CommandNotFound);
        assert_eq!(diag.severity(), Severity::Error);
        assert_eq!(diag.message(), "command 'deploy' not found");
    }

    #[test]
    fn test_get_commands_with_prefix() {
        let temp = create_temp_dir();
        write_manifest(
            temp.path(),
            "cmds:\n  - name: deploy\n  - name: deploy staging\n  - name: build\n",
        );

        let result = discovery(temp.path())
            .get_commands_with_prefix(&Context::background(), "dep")
            .expect("looks up");
        let names: Vec<_> = result.commands.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["deploy", "deploy staging"]);
    }

    #[test]
    fn test_discover_and_validate_rejects_conflicts() {
        let temp = create_temp_dir();
        write_manifest(
            temp.path(),
            "cmds:\n  - name: deploy\n    args:\n      - name: env\n  - name: deploy staging\n",
        );

        let err = discovery(temp.path())
            .discover_and_validate_command_set(&Context::background())
            .expect_err("conflict");
        assert!(matches!(err, CmdweaveError::ArgsSubcommandConflict { .. }));
    }
}
