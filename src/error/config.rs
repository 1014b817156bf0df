//! Configuration errors

use super::CmdweaveError;

/// Creates a config read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> CmdweaveError {
    CmdweaveError::ConfigReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a config parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> CmdweaveError {
    CmdweaveError::ConfigParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid config error
pub fn invalid(message: impl Into<String>) -> CmdweaveError {
    CmdweaveError::ConfigInvalid {
        message: message.into(),
    }
}
