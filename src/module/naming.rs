//! Module folder naming rules

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, module::invalid};
use crate::manifest::MANIFEST_NAME;

/// Suffix of a module directory name
pub const MODULE_SUFFIX: &str = ".cmdmod";

/// Directory inside a module holding vendored dependencies
pub const VENDORED_MODULES_DIR: &str = "cmd_modules";

/// Source identifier reserved for the working-directory manifest
pub const RESERVED_SOURCE_ID: &str = MANIFEST_NAME;

static MODULE_NAME_RE: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9]*(\.[a-zA-Z][a-zA-Z0-9]*)*$"));

static VERSION_RE: LazyLock<std::result::Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+(-[0-9A-Za-z.-]+)?$"));

fn matches(re: &LazyLock<std::result::Result<Regex, regex::Error>>, value: &str) -> bool {
    re.as_ref().is_ok_and(|re| re.is_match(value))
}

/// Whether `name` is a well-formed module identifier (e.g. `io.example.tools`)
pub fn is_valid_module_name(name: &str) -> bool {
    matches(&MODULE_NAME_RE, name)
}

/// Whether `version` is `MAJOR.MINOR.PATCH` with an optional pre-release tag
pub fn is_valid_version(version: &str) -> bool {
    matches(&VERSION_RE, version)
}

/// Whether a source identifier collides with the working-directory manifest
pub fn is_reserved_source_id(name: &str) -> bool {
    name == RESERVED_SOURCE_ID
}

/// Extract the module name from a folder name such as `tools.cmdmod`
pub(crate) fn check_folder_name(folder_name: &str) -> std::result::Result<String, String> {
    let Some(prefix) = folder_name.strip_suffix(MODULE_SUFFIX) else {
        return Err(format!("folder name must end with '{MODULE_SUFFIX}'"));
    };
    if prefix.is_empty() {
        return Err(format!(
            "module name cannot be empty (folder name cannot be just '{MODULE_SUFFIX}')"
        ));
    }
    if prefix.starts_with('.') {
        return Err("module name cannot start with a dot".to_string());
    }
    if !is_valid_module_name(prefix) {
        return Err(format!(
            "module name '{prefix}' is invalid: must start with a letter and contain only \
             alphanumeric characters, with optional dot-separated segments"
        ));
    }
    Ok(prefix.to_string())
}

/// Extract and validate the module name from a folder name
pub fn parse_module_name(folder_name: &str) -> Result<String> {
    check_folder_name(folder_name).map_err(|issue| invalid(folder_name, vec![issue]))
}

/// Quick check that `path` is a directory with a well-formed module folder name
///
/// Does not look inside the directory; use [`super::Module::load`] for that.
pub fn is_module(path: &Path) -> bool {
    let Some(folder_name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    check_folder_name(folder_name).is_ok() && path.is_dir()
}

/// Module short name derived from its folder, e.g. `/a/tools.cmdmod` → `tools`
pub fn short_name_from_path(path: &Path) -> String {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    base.strip_suffix(MODULE_SUFFIX)
        .map_or(base.clone(), str::to_string)
}

/// Vendored dependencies directory of the module at `module_path`
pub fn vendored_modules_dir(module_path: &Path) -> PathBuf {
    module_path.join(VENDORED_MODULES_DIR)
}
