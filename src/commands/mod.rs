//! Command implementations for the Cmdweave CLI

pub mod completions;
pub mod helpers;
pub mod list;
pub mod show;
pub mod validate;
pub mod version;
