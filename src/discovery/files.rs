//! Manifest file discovery

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use super::{DiscoveredFile, Discovery, Source};
use crate::diagnostic::{Diagnostic, DiagnosticCode, Diagnostics};
use crate::error::{CmdweaveError, Result};
use crate::manifest::{MANIFEST_FILE, MANIFEST_NAME};
use crate::module::{
    MODULE_SUFFIX, Module, is_module, is_reserved_source_id, short_name_from_path,
    vendored_modules_dir,
};

impl Discovery {
    /// Find every manifest in precedence order
    ///
    /// Filesystem problems are dropped here; use
    /// [`Discovery::discover_all_with_diagnostics`] to see them.
    pub fn discover_all(&self) -> Result<Vec<DiscoveredFile>> {
        let (files, _) = self.discover_all_with_diagnostics()?;
        Ok(files)
    }

    /// Find every manifest in precedence order, with skip diagnostics
    pub fn discover_all_with_diagnostics(&self) -> Result<(Vec<DiscoveredFile>, Diagnostics)> {
        let mut files = Vec::new();
        let mut diagnostics = self.init_diagnostics.clone();

        if let Some(base_dir) = &self.base_dir {
            debug!(dir = %base_dir.display(), "scanning working directory");
            if let Some(file) = discover_in_dir(base_dir) {
                files.push(file);
            }

            let (modules, diags) = discover_modules_in_dir(base_dir);
            diagnostics.append(diags);
            self.append_modules_with_vendored(&mut files, &mut diagnostics, modules);
        }

        let (modules, diags) = self.load_includes();
        diagnostics.append(diags);
        self.append_modules_with_vendored(&mut files, &mut diagnostics, modules);

        if let Some(commands_dir) = &self.commands_dir {
            debug!(dir = %commands_dir.display(), "scanning user commands directory");
            let (modules, diags) = discover_modules_in_dir(commands_dir);
            diagnostics.append(diags);
            self.append_modules_with_vendored(&mut files, &mut diagnostics, modules);
        }

        debug!(
            files = files.len(),
            diagnostics = diagnostics.len(),
            "discovery finished"
        );
        Ok((files, diagnostics))
    }

    /// Discover and parse every manifest
    ///
    /// Parse failures are attached to their file rather than returned.
    pub fn load_all(&self) -> Result<Vec<DiscoveredFile>> {
        let (files, _) = self.load_all_with_diagnostics()?;
        Ok(files)
    }

    /// Discover and parse every manifest, keeping discovery diagnostics
    pub fn load_all_with_diagnostics(&self) -> Result<(Vec<DiscoveredFile>, Diagnostics)> {
        let (files, diagnostics) = self.discover_all_with_diagnostics()?;
        let files = files.into_iter().map(DiscoveredFile::parsed).collect();
        Ok((files, diagnostics))
    }

    /// Discover and parse the highest-precedence manifest
    ///
    /// # Errors
    ///
    /// Returns `NoManifestFound` when discovery yields no files. A manifest
    /// that fails to parse is returned with the error attached.
    pub fn load_first(&self) -> Result<DiscoveredFile> {
        self.discover_all()?
            .into_iter()
            .next()
            .map(DiscoveredFile::parsed)
            .ok_or(CmdweaveError::NoManifestFound)
    }

    /// Push each module's file followed by its vendored dependencies
    fn append_modules_with_vendored(
        &self,
        files: &mut Vec<DiscoveredFile>,
        diagnostics: &mut Diagnostics,
        modules: Vec<Arc<Module>>,
    ) {
        for module in modules {
            push_module_file(files, &module, None);

            let (vendored, diags) = discover_vendored_modules(&module);
            diagnostics.append(diags);
            for child in vendored {
                push_module_file(files, &child, Some(&module));
            }
        }
    }

    fn load_includes(&self) -> (Vec<Arc<Module>>, Diagnostics) {
        let mut modules = Vec::new();
        let mut diagnostics = Diagnostics::new();

        for entry in &self.config.includes {
            let path = entry.path.as_path();
            if !is_module(path) {
                diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticCode::IncludeNotModule,
                        format!(
                            "configured include is not a valid module directory, skipping: {}",
                            path.display()
                        ),
                    )
                    .with_path(path),
                );
                continue;
            }

            let name = short_name_from_path(path);
            if is_reserved_source_id(&name) {
                diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticCode::IncludeReservedSkipped,
                        format!("configured include uses reserved module name '{name}', skipping"),
                    )
                    .with_path(path),
                );
                continue;
            }

            match Module::load(path) {
                Ok(module) => modules.push(Arc::new(module)),
                Err(e) => diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticCode::IncludeModuleLoadFailed,
                        format!("failed to load included module at {}: {e}", path.display()),
                    )
                    .with_path(path)
                    .with_cause(e),
                ),
            }
        }

        (modules, diagnostics)
    }
}

fn push_module_file(files: &mut Vec<DiscoveredFile>, module: &Arc<Module>, parent: Option<&Arc<Module>>) {
    if module.is_library_only() {
        debug!(module = module.name(), "library-only module, no commands");
        return;
    }
    let mut file = DiscoveredFile::from_module(module.clone());
    if let Some(parent) = parent {
        file = file.with_parent(parent.clone());
    }
    files.push(file);
}

/// The manifest directly inside `dir`, preferring `cmdfile.yaml` over `cmdfile`
fn discover_in_dir(dir: &Path) -> Option<DiscoveredFile> {
    [MANIFEST_FILE, MANIFEST_NAME]
        .into_iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
        .map(|path| DiscoveredFile::new(path, Source::CurrentDir))
}

/// Load every module that is an immediate child of `dir`
fn discover_modules_in_dir(dir: &Path) -> (Vec<Arc<Module>>, Diagnostics) {
    let mut modules = Vec::new();
    let mut diagnostics = Diagnostics::new();

    let dir = match std::path::absolute(dir) {
        Ok(dir) => dir,
        Err(e) => {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::ModuleScanPathInvalid,
                    format!(
                        "failed to resolve module scan path {}: {e}",
                        dir.display()
                    ),
                )
                .with_path(dir)
                .with_cause(e),
            );
            return (modules, diagnostics);
        }
    };

    if !dir.exists() {
        return (modules, diagnostics);
    }

    let entries = match sorted_dir_entries(&dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot list directory");
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::ModuleScanFailed,
                    format!(
                        "failed to list directory {} while scanning modules: {e}",
                        dir.display()
                    ),
                )
                .with_path(&dir)
                .with_cause(e),
            );
            return (modules, diagnostics);
        }
    };

    for path in entries {
        if !is_module(&path) {
            continue;
        }

        let name = short_name_from_path(&path);
        if is_reserved_source_id(&name) {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::ReservedModuleNameSkipped,
                    format!("skipping reserved module name '{name}'"),
                )
                .with_path(&path),
            );
            continue;
        }

        match Module::load(&path) {
            Ok(module) => {
                debug!(module = module.name(), path = %path.display(), "found module");
                modules.push(Arc::new(module));
            }
            Err(e) => diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::ModuleLoadSkipped,
                    format!("skipping invalid module at {}: {e}", path.display()),
                )
                .with_path(&path)
                .with_cause(e),
            ),
        }
    }

    (modules, diagnostics)
}

/// One-level scan of a module's `cmd_modules/` directory
///
/// A vendored module's own `cmd_modules/` is never scanned; finding one is
/// reported as a diagnostic.
fn discover_vendored_modules(parent: &Module) -> (Vec<Arc<Module>>, Diagnostics) {
    let mut modules = Vec::new();
    let mut diagnostics = Diagnostics::new();

    let vendor_dir = parent.vendored_modules_dir();
    if !vendor_dir.is_dir() {
        return (modules, diagnostics);
    }

    let entries = match sorted_dir_entries(&vendor_dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!(dir = %vendor_dir.display(), error = %e, "cannot list vendored modules");
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::VendoredScanFailed,
                    format!(
                        "failed to read vendored modules directory {}: {e}",
                        vendor_dir.display()
                    ),
                )
                .with_path(&vendor_dir)
                .with_cause(e),
            );
            return (modules, diagnostics);
        }
    };

    for path in entries {
        if !is_module(&path) {
            continue;
        }

        let name = short_name_from_path(&path);
        if is_reserved_source_id(&name) {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::VendoredReservedSkipped,
                    format!(
                        "skipping reserved module name '{name}' in vendored modules of {}",
                        parent.name()
                    ),
                )
                .with_path(&path),
            );
            continue;
        }

        let module = match Module::load(&path) {
            Ok(module) => module,
            Err(e) => {
                diagnostics.push(
                    Diagnostic::warning(
                        DiagnosticCode::VendoredModuleLoadSkipped,
                        format!("skipping invalid vendored module at {}: {e}", path.display()),
                    )
                    .with_path(&path)
                    .with_cause(e),
                );
                continue;
            }
        };

        let nested = vendored_modules_dir(module.path());
        if nested.is_dir() {
            diagnostics.push(
                Diagnostic::warning(
                    DiagnosticCode::VendoredNestedIgnored,
                    format!(
                        "vendored module {} has its own {} which is not scanned",
                        module.name(),
                        crate::module::VENDORED_MODULES_DIR
                    ),
                )
                .with_path(nested),
            );
        }

        debug!(module = module.name(), parent = parent.name(), "found vendored module");
        modules.push(Arc::new(module));
    }

    (modules, diagnostics)
}

/// Directory children sorted by name, for a stable scan order
fn sorted_dir_entries(dir: &Path) -> std::io::Result<Vec<std::path::PathBuf>> {
    let mut paths = std::fs::read_dir(dir)?
        .filter_map(std::result::Result::ok)
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .ends_with(MODULE_SUFFIX)
        })
        .map(|entry| entry.path())
        .collect::<Vec<_>>();
    paths.sort();
    Ok(paths)
}
