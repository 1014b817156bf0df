//! Version command implementation

use crate::error::Result;
use crate::manifest::MANIFEST_FILE;
use crate::module::{MODULE_SUFFIX, METADATA_FILE};

/// Run version command
pub fn run() -> Result<()> {
    println!("cmdweave {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Build info:");
    println!("  Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
    println!("  Profile: {}", build_profile());
    println!();
    println!("Formats:");
    println!("  Manifest: {MANIFEST_FILE}");
    println!("  Module: *{MODULE_SUFFIX} with {METADATA_FILE}");

    Ok(())
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}
