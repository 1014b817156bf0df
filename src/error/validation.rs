//! Command tree and execution dependency errors

use super::CmdweaveError;

/// Creates a circular dependency error from the unresolved nodes
pub fn circular(nodes: Vec<String>) -> CmdweaveError {
    CmdweaveError::CircularDependency { nodes }
}

/// Creates a cancellation error for the named operation
pub fn cancelled(operation: impl Into<String>) -> CmdweaveError {
    CmdweaveError::Cancelled {
        operation: operation.into(),
    }
}
