//! Collector for accumulating warnings during a processing phase.
//!
//! The [`DiagnosticCollector`] lets a phase report every problem it finds
//! and carry on, handing the warnings back in the order they were raised.

use crate::error::Diagnostic;

/// A collector for accumulating diagnostics during a processing phase.
///
/// # Example
///
/// ```
/// # use tome_parser::error::{Diagnostic, DiagnosticCollector, ErrorCode};
/// # use tome_parser::Span;
///
/// let mut collector = DiagnosticCollector::new();
///
/// collector.emit(
///     Diagnostic::warning("unresolved link `[foo]`")
///         .with_code(ErrorCode::E200)
///         .with_label(Span::new(0..5), "not found")
/// );
///
/// let warnings = collector.finish();
/// assert_eq!(warnings.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollector {
    /// Create a new empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit a diagnostic to this collector.
    pub fn emit(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Emit every diagnostic of `diagnostics`, preserving order.
    pub fn extend(&mut self, diagnostics: impl IntoIterator<Item = Diagnostic>) {
        diagnostics
            .into_iter()
            .for_each(|diagnostic| self.emit(diagnostic));
    }

    /// Finish collection and return the diagnostics in emission order.
    pub fn finish(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
