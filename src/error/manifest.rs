//! Manifest errors

use super::CmdweaveError;

/// Creates a manifest read failed error
pub fn read_failed(path: impl Into<String>, reason: impl Into<String>) -> CmdweaveError {
    CmdweaveError::ManifestReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a manifest parse failed error
pub fn parse_failed(path: impl Into<String>, reason: impl Into<String>) -> CmdweaveError {
    CmdweaveError::ManifestParseFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an invalid manifest error
pub fn invalid(message: impl Into<String>) -> CmdweaveError {
    CmdweaveError::ManifestInvalid {
        message: message.into(),
    }
}
