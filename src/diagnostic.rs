//! Structured, non-fatal reports produced while scanning
//!
//! Discovery and aggregation never abort on a recoverable problem. They
//! record a [`Diagnostic`] instead and keep going. Each stage returns its
//! own [`Diagnostics`] value which the caller appends to the running total.

use std::error::Error as StdError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use crate::error::{
    Result,
    diagnostic::{invalid_code, invalid_severity},
};

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl Severity {
    /// Parse an exact, lowercase severity name
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(invalid_severity(other)),
        }
    }

    /// Whether `value` names a known severity
    pub fn is_valid(value: &str) -> bool {
        Self::parse(value).is_ok()
    }

    /// Check `value` names a known severity
    pub fn validate(value: &str) -> Result<()> {
        Self::parse(value).map(|_| ())
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! diagnostic_codes {
    ($($variant:ident => $text:literal),+ $(,)?) => {
        /// Machine-readable diagnostic code
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        #[serde(rename_all = "snake_case")]
        pub enum DiagnosticCode {
            $($variant),+
        }

        impl DiagnosticCode {
            /// Every known code, in catalog order
            pub const ALL: &'static [DiagnosticCode] = &[$(DiagnosticCode::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $(DiagnosticCode::$variant => $text),+
                }
            }
        }
    };
}

diagnostic_codes! {
    WorkingDirUnavailable => "working_dir_unavailable",
    CommandsDirUnavailable => "commands_dir_unavailable",
    ModuleScanPathInvalid => "module_scan_path_invalid",
    ModuleScanFailed => "module_scan_failed",
    ReservedModuleNameSkipped => "reserved_module_name_skipped",
    ModuleLoadSkipped => "module_load_skipped",
    IncludeNotModule => "include_not_module",
    IncludeReservedSkipped => "include_reserved_skipped",
    IncludeModuleLoadFailed => "include_module_load_failed",
    VendoredScanFailed => "vendored_scan_failed",
    VendoredReservedSkipped => "vendored_reserved_skipped",
    VendoredModuleLoadSkipped => "vendored_module_load_skipped",
    VendoredNestedIgnored => "vendored_nested_ignored",
    ManifestParseSkipped => "manifest_parse_skipped",
    CommandNotFound => "command_not_found",
}

impl DiagnosticCode {
    /// Look up a code by its catalog name
    pub fn parse(value: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == value)
            .ok_or_else(|| invalid_code(value))
    }

    pub fn is_valid(value: &str) -> bool {
        Self::parse(value).is_ok()
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Underlying error attached to a diagnostic
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// A single recoverable issue
///
/// Severity and code are typed, so a constructed diagnostic is always valid.
/// Use [`Diagnostic::from_raw`] to build one from untyped strings.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    severity: Severity,
    code: DiagnosticCode,
    message: String,
    path: Option<PathBuf>,
    cause: Option<Cause>,
}

impl Diagnostic {
    pub fn new(severity: Severity, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity,
            code,
            message: message.into(),
            path: None,
            cause: None,
        }
    }

    /// Shorthand for a warning-severity diagnostic
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, code, message)
    }

    /// Build a diagnostic from untyped severity and code names
    pub fn from_raw(severity: &str, code: &str, message: impl Into<String>) -> Result<Self> {
        Ok(Self::new(
            Severity::parse(severity)?,
            DiagnosticCode::parse(code)?,
            message,
        ))
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_cause<E>(mut self, cause: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        self.cause = Some(Arc::new(cause));
        self
    }

    /// Attach a cause that is already shared elsewhere
    ///
    /// The stored cause is the pointee, so `downcast_ref` sees the concrete
    /// error type rather than the `Arc` around it.
    pub fn with_shared_cause(mut self, cause: Cause) -> Self {
        self.cause = Some(cause);
        self
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn code(&self) -> DiagnosticCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The underlying error, for inspection with `downcast_ref`
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)
    }
}

/// Ordered accumulator of diagnostics
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Move every diagnostic from `other` onto the end of this list
    pub fn append(&mut self, mut other: Diagnostics) {
        self.items.append(&mut other.items);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Diagnostics of the given severity, in the order they were recorded
    pub fn with_severity(&self, severity: Severity) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter().filter(move |d| d.severity == severity)
    }

    pub fn has_errors(&self) -> bool {
        self.with_severity(Severity::Error).next().is_some()
    }

    /// Whether any diagnostic carries `code`
    pub fn contains_code(&self, code: DiagnosticCode) -> bool {
        self.items.iter().any(|d| d.code == code)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.items
    }
}

impl From<Vec<Diagnostic>> for Diagnostics {
    fn from(items: Vec<Diagnostic>) -> Self {
        Self { items }
    }
}

impl Extend<Diagnostic> for Diagnostics {
    fn extend<I: IntoIterator<Item = Diagnostic>>(&mut self, iter: I) {
        self.items.extend(iter);
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
