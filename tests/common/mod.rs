//! Common test utilities for Cmdweave integration tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// A project directory plus isolated user-level locations
pub struct TestWorkspace {
    #[allow(dead_code)]
    pub temp: TempDir,
    /// Directory commands are discovered from
    pub path: PathBuf,
    /// User commands directory (`CMDWEAVE_COMMANDS_DIR`)
    pub commands_dir: PathBuf,
    /// Config file location (`CMDWEAVE_CONFIG`), absent until written
    pub config_path: PathBuf,
}

impl TestWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("project");
        let commands_dir = temp.path().join("user-cmds");
        let config_path = temp.path().join("config.yaml");
        std::fs::create_dir_all(&path).expect("Failed to create project directory");
        Self {
            temp,
            path,
            commands_dir,
            config_path,
        }
    }

    /// Write `cmdfile.yaml` in the project directory
    pub fn write_manifest(&self, yaml: &str) {
        std::fs::write(self.path.join("cmdfile.yaml"), yaml).expect("Failed to write manifest");
    }

    /// Write the config file
    #[allow(dead_code)]
    pub fn write_config(&self, yaml: &str) {
        std::fs::write(&self.config_path, yaml).expect("Failed to write config");
    }

    /// Create `<parent>/<name>.cmdmod` with metadata and a manifest
    pub fn create_module(parent: &Path, name: &str, yaml: &str) -> PathBuf {
        let dir = parent.join(format!("{name}.cmdmod"));
        std::fs::create_dir_all(&dir).expect("Failed to create module directory");
        std::fs::write(
            dir.join("cmdmod.yaml"),
            format!("module: {name}\nversion: 1.0.0\n"),
        )
        .expect("Failed to write module metadata");
        std::fs::write(dir.join("cmdfile.yaml"), yaml).expect("Failed to write module manifest");
        dir
    }

    /// Create a module in the project directory
    #[allow(dead_code)]
    pub fn create_local_module(&self, name: &str, yaml: &str) -> PathBuf {
        Self::create_module(&self.path, name, yaml)
    }

    /// Create a module in the user commands directory
    #[allow(dead_code)]
    pub fn create_user_module(&self, name: &str, yaml: &str) -> PathBuf {
        Self::create_module(&self.commands_dir, name, yaml)
    }

    /// Vendor a module into `parent`'s `cmd_modules/`
    #[allow(dead_code)]
    pub fn create_vendored_module(parent: &Path, name: &str, yaml: &str) -> PathBuf {
        Self::create_module(&parent.join("cmd_modules"), name, yaml)
    }

    /// The cmdweave binary, run from the project directory with isolated
    /// user locations
    #[allow(dead_code, deprecated)]
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("cmdweave").expect("cmdweave binary");
        cmd.current_dir(&self.path)
            .env("CMDWEAVE_CONFIG", &self.config_path)
            .env("CMDWEAVE_COMMANDS_DIR", &self.commands_dir)
            .env_remove("RUST_LOG");
        cmd
    }
}
