//! The core diagnostic type for the Tome error system.
//!
//! A [`Diagnostic`] represents a single error or warning with optional
//! error code, multiple labeled source spans, and help text.

use std::fmt;

use crate::{
    Span,
    error::{Severity, error_code::ErrorCode, label::Label},
};

/// A rich diagnostic message with source location information.
///
/// Diagnostics provide detailed information about errors and warnings,
/// including:
/// - A severity level
/// - An optional error code for documentation and searchability
/// - The entity the issue was found on
/// - A primary message describing the issue
/// - One or more labeled spans into the entity's raw comment
/// - Optional help text with suggestions
///
/// # Example
///
/// ```text
/// warning[E200]: unresolved link `[D]`
///   --> p.C
///    |
///  1 | See [D] for details.
///    |     ^^^ no symbol named `D` is in scope
///    |
///    = help: check the spelling or qualify the name
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    severity: Severity,
    code: Option<ErrorCode>,
    message: String,
    entity: Option<String>,
    source: Option<String>,
    labels: Vec<Label>,
    help: Option<String>,
}

impl Diagnostic {
    /// Create an error diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use tome_parser::error::{Diagnostic, ErrorCode};
    ///
    /// let diag = Diagnostic::error("location `p/-c/index.html` is claimed twice")
    ///     .with_code(ErrorCode::E300)
    ///     .with_help("rename one of the declarations");
    /// ```
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Create a warning diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// # use tome_parser::error::Diagnostic;
    /// # use tome_parser::Span;
    ///
    /// let span = Span::new(0..10);
    /// let diag = Diagnostic::warning("unknown parameter `count`")
    ///     .with_label(span, "`foo` has no such parameter")
    ///     .with_help("check the parameter name");
    /// ```
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    /// Get the severity of this diagnostic.
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Get the error code, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.code
    }

    /// Get the primary message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The qualified name of the entity the diagnostic is about.
    pub fn entity(&self) -> Option<&str> {
        self.entity.as_deref()
    }

    /// The text the labels' spans point into.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Get all labels attached to this diagnostic.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Get the help text, if any.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// Set the error code.
    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.code = Some(code);
        self
    }

    /// Attach the offending entity.
    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }

    /// Attach the text label spans refer to.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Add a primary label to this diagnostic.
    pub fn with_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::primary(span, message));
        self
    }

    /// Add a secondary label to this diagnostic.
    pub fn with_secondary_label(mut self, span: Span, message: impl Into<String>) -> Self {
        self.labels.push(Label::secondary(span, message));
        self
    }

    /// Set the help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Create a new diagnostic with the given severity and message.
    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            code: None,
            message: message.into(),
            entity: None,
            source: None,
            labels: Vec::new(),
            help: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format: "warning[E200]: message" or "error: message"
        write!(f, "{}", self.severity)?;
        if let Some(code) = self.code {
            write!(f, "[{}]", code)?;
        }
        write!(f, ": {}", self.message)?;
        if let Some(entity) = &self.entity {
            write!(f, " (in `{entity}`)")?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostic {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_new() {
        let diag = Diagnostic::new(Severity::Error, "test error");

        assert!(diag.severity().is_error());
        assert!(!diag.severity().is_warning());
        assert_eq!(diag.message(), "test error");
        assert!(diag.code().is_none());
        assert!(diag.entity().is_none());
        assert!(diag.labels().is_empty());
        assert!(diag.help().is_none());
    }

    #[test]
    fn test_diagnostic_with_code() {
        let diag = Diagnostic::new(Severity::Warning, "unresolved link").with_code(ErrorCode::E200);

        assert_eq!(diag.code(), Some(ErrorCode::E200));
    }

    #[test]
    fn test_diagnostic_with_label() {
        let diag = Diagnostic::new(Severity::Warning, "test warning")
            .with_label(Span::new(10..20), "here");

        assert_eq!(diag.labels().len(), 1);
        assert!(diag.labels()[0].is_primary());
        assert_eq!(diag.labels()[0].message(), "here");
    }

    #[test]
    fn test_diagnostic_with_secondary_label() {
        let diag = Diagnostic::new(Severity::Warning, "ambiguous link")
            .with_label(Span::new(10..20), "link here")
            .with_secondary_label(Span::new(5..15), "also matches");

        assert_eq!(diag.labels().len(), 2);
        assert!(diag.labels()[0].is_primary());
        assert!(diag.labels()[1].is_secondary());
    }

    #[test]
    fn test_diagnostic_display_with_code_and_entity() {
        let diag = Diagnostic::warning("unresolved link `[D]`")
            .with_code(ErrorCode::E200)
            .with_entity("p.C");

        assert_eq!(
            diag.to_string(),
            "warning[E200]: unresolved link `[D]` (in `p.C`)"
        );
    }

    #[test]
    fn test_diagnostic_display_without_code() {
        let diag = Diagnostic::new(Severity::Error, "output directory is not writable");

        assert_eq!(diag.to_string(), "error: output directory is not writable");
    }

    #[test]
    fn test_diagnostic_builder_chain() {
        let diag = Diagnostic::error("location `p/-c/index.html` is claimed twice")
            .with_code(ErrorCode::E300)
            .with_entity("p.c")
            .with_source("doc")
            .with_label(Span::new(0..3), "second claim")
            .with_help("rename one of the declarations");

        assert!(diag.severity().is_error());
        assert_eq!(diag.code(), Some(ErrorCode::E300));
        assert_eq!(diag.entity(), Some("p.c"));
        assert_eq!(diag.source(), Some("doc"));
        assert_eq!(diag.help(), Some("rename one of the declarations"));
    }
}
