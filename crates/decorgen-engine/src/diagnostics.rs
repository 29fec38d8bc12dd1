//! Diagnostic infrastructure for error reporting
//!
//! Diagnostics are plain values handed back to the host alongside the
//! generated artifacts. They are serializable so a host can forward them
//! as JSON without translating.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Error code for a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DiagnosticCode(pub &'static str);

impl DiagnosticCode {
    /// Code text, e.g. "DEC1001"
    pub fn as_str(&self) -> &str {
        self.0
    }
}

/// Contract is not an interface
pub const INVALID_CONTRACT: DiagnosticCode = DiagnosticCode("DEC1001");
/// Provider does not derive from the base behavior provider
pub const INVALID_PROVIDER: DiagnosticCode = DiagnosticCode("DEC1002");
/// Contract or provider is not known to the host
pub const UNKNOWN_TYPE: DiagnosticCode = DiagnosticCode("DEC1003");
/// Contract method declares a variable-length parameter
pub const PARAMS_PARAMETER: DiagnosticCode = DiagnosticCode("DEC1004");
/// Contract declares members other than methods and properties
pub const UNSUPPORTED_MEMBER: DiagnosticCode = DiagnosticCode("DEC1005");
/// Contract is an open generic type
pub const OPEN_GENERIC_CONTRACT: DiagnosticCode = DiagnosticCode("DEC1006");
/// Provider declares no accessible constructor
pub const NO_CONSTRUCTOR: DiagnosticCode = DiagnosticCode("DEC1007");
/// Provider hook could not be resolved
pub const UNRESOLVED_HOOK: DiagnosticCode = DiagnosticCode("DEC9001");

/// Severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational
    Info,
    /// Reported but does not fail the build
    Warning,
    /// Fails the build
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Source location handle supplied by the trigger scanner
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceLocation {
    /// File path as the host knows it
    pub file: String,
    /// Byte offset of the start
    pub start: usize,
    /// Byte offset of the end
    pub end: usize,
    /// 1-based line
    pub line: u32,
    /// 1-based column
    pub column: u32,
}

impl SourceLocation {
    /// Create a new location
    pub fn new(file: impl Into<String>, start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            start,
            end,
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// A diagnostic reported back to the host
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Diagnostic {
    /// Severity
    pub severity: Severity,
    /// Code (e.g., "DEC1001")
    pub code: DiagnosticCode,
    /// Human-readable message
    pub message: String,
    /// Originating location, if the trigger carried one
    pub location: Option<SourceLocation>,
}

impl Diagnostic {
    /// Create an error diagnostic
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            location: None,
        }
    }

    /// Attach a location
    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// One copy of this diagnostic per location, or a single unlocated copy.
    pub fn at_each(self, locations: &[SourceLocation]) -> Vec<Diagnostic> {
        if locations.is_empty() {
            return vec![self];
        }
        locations
            .iter()
            .map(|loc| self.clone().at(loc.clone()))
            .collect()
    }

    /// Whether this diagnostic fails the build
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(loc) = &self.location {
            write!(f, "{}: ", loc)?;
        }
        write!(f, "{}[{}]: {}", self.severity, self.code.as_str(), self.message)
    }
}
