//! Resolver diagnostics: collection, builder, and rendering.
//!
//! Resolution errors are non-fatal. They accumulate here tagged with the
//! unit they belong to; a unit with at least one error is frozen at its
//! current state by the driver, while sibling units continue.

mod printer;


pub use printer::DiagnosticsPrinter;

use laurel_core::Span;

use crate::error::ResolutionError;
use crate::unit::UnitId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    #[default]
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A secondary location attached to a diagnostic, possibly in another unit
/// (e.g. the first declaration of a duplicated symbol).
#[derive(Debug, Clone)]
pub struct RelatedInfo {
    pub unit: UnitId,
    pub span: Span,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub severity: Severity,
    pub unit: UnitId,
    pub span: Span,
    pub error: ResolutionError,
    pub related: Vec<RelatedInfo>,
}

impl Diagnostic {
    pub fn message(&self) -> String {
        self.error.to_string()
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    messages: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, unit: UnitId, span: Span, error: ResolutionError) -> DiagnosticBuilder<'_> {
        DiagnosticBuilder {
            diagnostics: self,
            message: Diagnostic {
                severity: Severity::Error,
                unit,
                span,
                error,
                related: Vec::new(),
            },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.messages.iter().filter(|d| d.is_error()).count()
    }

    pub fn error_count_for(&self, unit: UnitId) -> usize {
        self.messages
            .iter()
            .filter(|d| d.is_error() && d.unit == unit)
            .count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.messages.iter()
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.messages.extend(other.messages);
    }
}

/// Builder for one diagnostic.
#[must_use = "diagnostic not recorded, call .emit()"]
pub struct DiagnosticBuilder<'a> {
    diagnostics: &'a mut Diagnostics,
    message: Diagnostic,
}

impl DiagnosticBuilder<'_> {
    pub fn severity(mut self, severity: Severity) -> Self {
        self.message.severity = severity;
        self
    }

    pub fn related_to(mut self, unit: UnitId, span: Span, message: impl Into<String>) -> Self {
        self.message.related.push(RelatedInfo {
            unit,
            span,
            message: message.into(),
        });
        self
    }

    pub fn emit(self) {
        self.diagnostics.messages.push(self.message);
    }
}
