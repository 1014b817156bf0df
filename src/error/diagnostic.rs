//! Diagnostic model errors

use super::CmdweaveError;

/// Creates an invalid severity error
pub fn invalid_severity(value: impl Into<String>) -> CmdweaveError {
    CmdweaveError::InvalidSeverity {
        value: value.into(),
    }
}

/// Creates an unknown diagnostic code error
pub fn invalid_code(value: impl Into<String>) -> CmdweaveError {
    CmdweaveError::InvalidDiagnosticCode {
        value: value.into(),
    }
}
