//! Test fixtures for building manifest and module trees on disk.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{create_temp_dir, write_manifest, write_module};
//!
//! #[test]
//! fn my_test() {
//!     let temp = create_temp_dir();
//!     write_manifest(temp.path(), "cmds:\n  - name: build\n");
//!     let module = write_module(temp.path(), "tools", "cmds:\n  - name: lint\n");
//! }
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;

use crate::discovery::{CommandInfo, Source};
use crate::manifest::{Command, MANIFEST_FILE, Manifest};
use crate::module::{METADATA_FILE, MODULE_SUFFIX};

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Write `cmdfile.yaml` into `dir`, returning its path.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_manifest(dir: &Path, yaml: &str) -> PathBuf {
    std::fs::create_dir_all(dir).expect("Failed to create manifest directory");
    let path = dir.join(MANIFEST_FILE);
    std::fs::write(&path, yaml).expect("Failed to write manifest");
    path
}

/// Write `cmdmod.yaml` into a module directory.
///
/// # Panics
///
/// Panics if the file cannot be written.
pub fn write_metadata(module_dir: &Path, module: &str, version: &str) {
    std::fs::write(
        module_dir.join(METADATA_FILE),
        format!("module: {module}\nversion: {version}\n"),
    )
    .expect("Failed to write module metadata");
}

/// Create `<parent>/<name>.cmdmod` with metadata and a manifest.
///
/// # Panics
///
/// Panics if the module cannot be written.
pub fn write_module(parent: &Path, name: &str, manifest_yaml: &str) -> PathBuf {
    let path = write_library_module(parent, name);
    write_manifest(&path, manifest_yaml);
    path
}

/// Create `<parent>/<name>.cmdmod` with metadata only.
///
/// # Panics
///
/// Panics if the module cannot be written.
pub fn write_library_module(parent: &Path, name: &str) -> PathBuf {
    let path = parent.join(format!("{name}{MODULE_SUFFIX}"));
    std::fs::create_dir_all(&path).expect("Failed to create module directory");
    write_metadata(&path, name, "1.0.0");
    path
}

/// Build a `CommandInfo` around a bare command, for set and validation tests.
#[must_use]
pub fn command_info(full_name: &str, source_id: &str, command: Command) -> CommandInfo {
    command_info_in(full_name, source_id, command, Arc::new(Manifest::new()))
}

/// Build a `CommandInfo` whose command belongs to `manifest`.
#[must_use]
pub fn command_info_in(
    full_name: &str,
    source_id: &str,
    command: Command,
    manifest: Arc<Manifest>,
) -> CommandInfo {
    let source = if source_id == crate::module::RESERVED_SOURCE_ID {
        Source::CurrentDir
    } else {
        Source::Module
    };
    CommandInfo::new(
        full_name,
        source,
        source_id,
        PathBuf::from(MANIFEST_FILE),
        Arc::new(command),
        manifest,
    )
}
