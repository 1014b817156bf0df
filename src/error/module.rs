//! Module errors

use super::CmdweaveError;

/// Creates an invalid module error carrying every validation issue
pub fn invalid(path: impl Into<String>, issues: Vec<String>) -> CmdweaveError {
    CmdweaveError::ModuleInvalid {
        path: path.into(),
        issues,
    }
}

/// Creates a module metadata parse failed error
pub fn metadata_parse_failed(path: impl Into<String>, reason: impl Into<String>) -> CmdweaveError {
    CmdweaveError::ModuleMetadataParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a module collision error
pub fn collision(
    module_id: impl Into<String>,
    first_source: impl Into<String>,
    second_source: impl Into<String>,
) -> CmdweaveError {
    CmdweaveError::ModuleCollision {
        module_id: module_id.into(),
        first_source: first_source.into(),
        second_source: second_source.into(),
    }
}
