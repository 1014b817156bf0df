//! Module loading
//!
//! A module is a directory named `<id>.cmdmod` holding:
//!
//! ```text
//! io.example.tools.cmdmod/
//! ├── cmdmod.yaml       # required: module, version, description
//! ├── cmdfile.yaml      # optional: absent for library-only modules
//! └── cmd_modules/      # optional: vendored dependency modules
//!     └── helper.cmdmod/
//! ```
//!
//! [`Module::load`] validates the whole layout and reports every problem it
//! finds at once.

pub mod naming;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

use crate::error::{
    Result,
    module::{invalid, metadata_parse_failed},
};
use crate::manifest::MANIFEST_FILE;

pub use naming::{
    MODULE_SUFFIX, RESERVED_SOURCE_ID, VENDORED_MODULES_DIR, is_module, is_reserved_source_id,
    is_valid_module_name, is_valid_version, parse_module_name, short_name_from_path,
    vendored_modules_dir,
};

/// Module metadata file name
pub const METADATA_FILE: &str = "cmdmod.yaml";

/// Module metadata from cmdmod.yaml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleMetadata {
    /// Module identifier; must match the folder name prefix
    pub module: String,

    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ModuleMetadata {
    /// Parse metadata from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| metadata_parse_failed(METADATA_FILE, e.to_string()))
    }

    /// Read and parse a metadata file
    pub fn parse(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| metadata_parse_failed(path.display().to_string(), e.to_string()))?;
        serde_yaml::from_str(&content)
            .map_err(|e| metadata_parse_failed(path.display().to_string(), e.to_string()))
    }
}

/// A validated module directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    path: PathBuf,
    metadata: ModuleMetadata,
    library_only: bool,
}

impl Module {
    /// Validate and load the module at `path`
    ///
    /// # Errors
    ///
    /// Returns `ModuleInvalid` listing every issue found.
    pub fn load(path: &Path) -> Result<Self> {
        let path = dunce::canonicalize(path).map_err(|e| {
            invalid(
                path.display().to_string(),
                vec![format!("cannot resolve path: {e}")],
            )
        })?;

        let display = path.display().to_string();
        if !path.is_dir() {
            return Err(invalid(display, vec!["path is not a directory".to_string()]));
        }

        let mut issues = Vec::new();

        let folder_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let module_name = match naming::check_folder_name(&folder_name) {
            Ok(name) => {
                if is_reserved_source_id(&name) {
                    issues.push(format!(
                        "module name '{name}' is reserved for the working-directory manifest"
                    ));
                }
                Some(name)
            }
            Err(issue) => {
                issues.push(issue);
                None
            }
        };

        let metadata = check_metadata(&path, module_name.as_deref(), &mut issues);

        let manifest_path = path.join(MANIFEST_FILE);
        let library_only = !manifest_path.exists();
        if manifest_path.is_dir() {
            issues.push(format!("{MANIFEST_FILE} must be a file, not a directory"));
        }

        check_contents(&path, &mut issues);

        match metadata {
            Some(metadata) if issues.is_empty() => Ok(Self {
                path,
                metadata,
                library_only,
            }),
            _ => Err(invalid(display, issues)),
        }
    }

    /// Module identifier from metadata
    pub fn name(&self) -> &str {
        &self.metadata.module
    }

    /// Folder-derived short name
    pub fn short_name(&self) -> String {
        short_name_from_path(&self.path)
    }

    /// Absolute module directory
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn metadata(&self) -> &ModuleMetadata {
        &self.metadata
    }

    pub fn version(&self) -> &str {
        &self.metadata.version
    }

    /// Location of the module's manifest, whether or not it exists
    pub fn manifest_path(&self) -> PathBuf {
        self.path.join(MANIFEST_FILE)
    }

    /// Whether the module declares no commands of its own
    pub fn is_library_only(&self) -> bool {
        self.library_only
    }

    pub fn vendored_modules_dir(&self) -> PathBuf {
        vendored_modules_dir(&self.path)
    }
}

fn check_metadata(
    path: &Path,
    module_name: Option<&str>,
    issues: &mut Vec<String>,
) -> Option<ModuleMetadata> {
    let metadata_path = path.join(METADATA_FILE);
    if metadata_path.is_dir() {
        issues.push(format!("{METADATA_FILE} must be a file, not a directory"));
        return None;
    }
    if !metadata_path.exists() {
        issues.push(format!("missing required {METADATA_FILE}"));
        return None;
    }

    let metadata = match ModuleMetadata::parse(&metadata_path) {
        Ok(metadata) => metadata,
        Err(e) => {
            issues.push(format!("failed to parse {METADATA_FILE}: {e}"));
            return None;
        }
    };

    if let Some(name) = module_name {
        if metadata.module != name {
            issues.push(format!(
                "module field '{}' in {METADATA_FILE} must match folder name '{name}'",
                metadata.module
            ));
        }
    }
    if !is_valid_version(&metadata.version) {
        issues.push(format!(
            "version '{}' in {METADATA_FILE} must be MAJOR.MINOR.PATCH",
            metadata.version
        ));
    }

    Some(metadata)
}

/// Reject symlinks and nested modules outside the vendored directory
///
/// Entries the walk cannot read are reported as issues too.
fn check_contents(root: &Path, issues: &mut Vec<String>) {
    let walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !(e.file_type().is_dir() && e.file_name() == VENDORED_MODULES_DIR));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let at = e
                    .path()
                    .and_then(|p| p.strip_prefix(root).ok())
                    .map_or_else(|| root.display().to_string(), |p| p.display().to_string());
                issues.push(format!("cannot inspect module contents at {at}: {e}"));
                continue;
            }
        };
        let rel = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .display()
            .to_string();

        if entry.path_is_symlink() {
            issues.push(format!("symlinks are not allowed in modules: {rel}"));
            continue;
        }

        let is_nested_module = entry.file_type().is_dir()
            && entry.file_name().to_string_lossy().ends_with(MODULE_SUFFIX);
        if is_nested_module {
            issues.push(format!(
                "nested modules are not allowed outside {VENDORED_MODULES_DIR}/: {rel}"
            ));
        }
    }
}
