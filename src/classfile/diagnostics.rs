//! Diagnostics collection for class file scanning.
//!
//! Scanning is lenient: a malformed unit is abandoned, a malformed signature drops only the
//! member it belongs to, and duplicate type names are masked. None of these stop the scan,
//! but all of them are worth reporting. This module provides the sink they are reported to.
//!
//! # Architecture
//!
//! The [`Diagnostics`] container uses `boxcar::Vec` for thread-safe, lock-free append
//! operations, so decode workers running in parallel report into the same container
//! without synchronization. One container is owned by each
//! [`crate::scan::ScanContext`]; there is no process-wide sink.
//!
//! # Usage Examples
//!
//! ```rust
//! use classscope::classfile::diagnostics::{Diagnostics, DiagnosticCategory};
//!
//! let diagnostics = Diagnostics::new();
//!
//! diagnostics.warning(
//!     DiagnosticCategory::Signature,
//!     "Dropped method 'foo': invalid generic signature",
//! );
//! diagnostics.error(DiagnosticCategory::ClassFile, "Bad magic number 0xDEADBEEF");
//!
//! assert!(diagnostics.has_errors());
//! assert_eq!(diagnostics.count(), 2);
//!
//! for entry in diagnostics.iter() {
//!     println!("{entry}");
//! }
//! ```
//!
//! # Thread Safety
//!
//! All types in this module are [`Send`] and [`Sync`].

use std::fmt::{self, Write};

/// Severity level of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Informational, e.g. a skipped unit
    Info,
    /// Something was dropped but the scan result is otherwise sound
    Warning,
    /// A unit was abandoned
    Error,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Info => write!(f, "INFO"),
            DiagnosticSeverity::Warning => write!(f, "WARN"),
            DiagnosticSeverity::Error => write!(f, "ERROR"),
        }
    }
}

/// Component that produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCategory {
    /// Overall class file structure
    ClassFile,
    /// Constant pool decoding and resolution
    ConstantPool,
    /// Descriptor and generic signature grammar
    Signature,
    /// Annotation value grammar
    Annotation,
    /// Field records
    Field,
    /// Method records
    Method,
    /// Graph linking and masking
    Link,
    /// Extended scanning of referenced types
    Schedule,
    /// Everything else
    General,
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticCategory::ClassFile => write!(f, "ClassFile"),
            DiagnosticCategory::ConstantPool => write!(f, "ConstantPool"),
            DiagnosticCategory::Signature => write!(f, "Signature"),
            DiagnosticCategory::Annotation => write!(f, "Annotation"),
            DiagnosticCategory::Field => write!(f, "Field"),
            DiagnosticCategory::Method => write!(f, "Method"),
            DiagnosticCategory::Link => write!(f, "Link"),
            DiagnosticCategory::Schedule => write!(f, "Schedule"),
            DiagnosticCategory::General => write!(f, "General"),
        }
    }
}

/// A single diagnostic entry.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Severity of the entry
    pub severity: DiagnosticSeverity,
    /// Reporting component
    pub category: DiagnosticCategory,
    /// Human readable description
    pub message: String,
    /// Byte offset within the unit, if known
    pub offset: Option<u64>,
    /// Name of the unit (type name or classpath element), if known
    pub unit: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic without location context.
    pub fn new(
        severity: DiagnosticSeverity,
        category: DiagnosticCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            offset: None,
            unit: None,
        }
    }

    /// Attach a byte offset.
    #[must_use]
    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Attach the name of the unit the diagnostic refers to.
    #[must_use]
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.category, self.message)?;

        if let Some(unit) = &self.unit {
            write!(f, " (unit: {unit})")?;
        }

        if let Some(offset) = self.offset {
            write!(f, " (offset: 0x{:08x})", offset)?;
        }

        Ok(())
    }
}

/// Thread-safe, append-only container of diagnostics.
#[derive(Debug)]
pub struct Diagnostics {
    entries: boxcar::Vec<Diagnostic>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Create an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: boxcar::Vec::new(),
        }
    }

    /// Record an informational entry.
    pub fn info(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(DiagnosticSeverity::Info, category, message));
    }

    /// Record a warning.
    pub fn warning(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(
            DiagnosticSeverity::Warning,
            category,
            message,
        ));
    }

    /// Record an error.
    pub fn error(&self, category: DiagnosticCategory, message: impl Into<String>) {
        self.push(Diagnostic::new(
            DiagnosticSeverity::Error,
            category,
            message,
        ));
    }

    /// Record a fully constructed entry.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Returns `true` if any entry was recorded.
    pub fn has_any(&self) -> bool {
        self.entries.count() > 0
    }

    /// Returns `true` if any error was recorded.
    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|(_, d)| d.severity == DiagnosticSeverity::Error)
    }

    /// Total number of entries.
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Number of entries with the given severity.
    pub fn count_severity(&self, severity: DiagnosticSeverity) -> usize {
        self.entries
            .iter()
            .filter(|(_, d)| d.severity == severity)
            .count()
    }

    /// Iterate over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, d)| d)
    }

    /// All entries of the given category.
    pub fn by_category(&self, category: DiagnosticCategory) -> Vec<&Diagnostic> {
        self.entries
            .iter()
            .filter(|(_, d)| d.category == category)
            .map(|(_, d)| d)
            .collect()
    }

    /// Multi-line summary of errors and warnings.
    pub fn summary(&self) -> String {
        let mut output = String::new();

        let _ = writeln!(
            output,
            "Diagnostics: {} error(s), {} warning(s), {} info(s)",
            self.count_severity(DiagnosticSeverity::Error),
            self.count_severity(DiagnosticSeverity::Warning),
            self.count_severity(DiagnosticSeverity::Info)
        );

        for diag in self
            .iter()
            .filter(|d| d.severity != DiagnosticSeverity::Info)
        {
            let _ = writeln!(output, "  {diag}");
        }

        output
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
