//! Error adapter for converting Tome errors and warnings to miette diagnostics.
//!
//! This module provides the bridge between the library's standard error types
//! and miette's rich diagnostic formatting used in the CLI.
//!
//! # Source Snippets
//!
//! Diagnostics raised on a doc comment carry the raw comment text as their
//! source, so labels point into the comment as written.

use std::{borrow::Cow, fmt};

use miette::{Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan, SourceSpan};

use tome::{Diagnostic, Severity, TomeError};

/// Adapter for a single tome diagnostic.
///
/// This adapter wraps a [`Diagnostic`] and implements [`MietteDiagnostic`]
/// to enable rich error formatting in the CLI.
pub struct DiagnosticAdapter<'a> {
    diag: Cow<'a, Diagnostic>,
    /// Raw doc comment the labels point into
    src: Option<String>,
}

impl<'a> DiagnosticAdapter<'a> {
    /// Create a new diagnostic adapter.
    pub fn new(diag: &'a Diagnostic) -> Self {
        Self {
            src: diag.source().map(str::to_string),
            diag: Cow::Borrowed(diag),
        }
    }

    fn owned(diag: Diagnostic) -> Self {
        Self {
            src: diag.source().map(str::to_string),
            diag: Cow::Owned(diag),
        }
    }
}

impl fmt::Debug for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiagnosticAdapter")
            .field("diag", &self.diag)
            .finish()
    }
}

impl fmt::Display for DiagnosticAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.diag.message())?;
        if let Some(entity) = self.diag.entity() {
            write!(f, " (in `{entity}`)")?;
        }
        Ok(())
    }
}

impl std::error::Error for DiagnosticAdapter<'_> {}

impl MietteDiagnostic for DiagnosticAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .code()
            .map(|c| Box::new(c) as Box<dyn fmt::Display>)
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.diag.severity() {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diag
            .help()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.src
            .as_ref()
            .map(|src| src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = self.diag.labels();
        if labels.is_empty() || self.src.is_none() {
            return None;
        }

        Some(Box::new(labels.iter().map(|label| {
            let span = span_to_miette(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

/// Adapter for [`TomeError`] variants without diagnostic information.
pub struct ErrorAdapter<'a>(pub &'a TomeError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.0.source()
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            TomeError::Io(_) => "tome::io",
            TomeError::Config(_) => "tome::config",
            TomeError::Location(_) => "tome::location",
            TomeError::Export(_) => "tome::export",
        };
        Some(Box::new(code))
    }
}

/// A reportable error or warning that can be rendered by miette.
#[derive(Debug)]
pub enum Reportable<'a> {
    /// A diagnostic, possibly with a doc comment snippet.
    Diagnostic(DiagnosticAdapter<'a>),
    /// A simple error without source location.
    Error(ErrorAdapter<'a>),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reportable::Diagnostic(d) => fmt::Display::fmt(d, f),
            Reportable::Error(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Reportable::Diagnostic(_) => None,
            Reportable::Error(e) => e.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.code(),
            Reportable::Error(e) => e.code(),
        }
    }

    fn severity(&self) -> Option<miette::Severity> {
        match self {
            Reportable::Diagnostic(d) => d.severity(),
            Reportable::Error(e) => e.severity(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Reportable::Diagnostic(d) => d.help(),
            Reportable::Error(e) => e.help(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Reportable::Diagnostic(d) => d.source_code(),
            Reportable::Error(e) => e.source_code(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            Reportable::Diagnostic(d) => d.labels(),
            Reportable::Error(e) => e.labels(),
        }
    }
}

/// Convert a tome [`Span`](tome::span::Span) to a miette [`SourceSpan`].
fn span_to_miette(span: tome::span::Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Convert a [`TomeError`] into a list of reportable errors.
///
/// A location collision becomes its `E300` diagnostic; every other variant
/// is a single plain error.
pub fn to_reportables(err: &TomeError) -> Vec<Reportable<'_>> {
    match err {
        TomeError::Location(location) => vec![Reportable::Diagnostic(DiagnosticAdapter::owned(
            location.diagnostic(),
        ))],
        _ => vec![Reportable::Error(ErrorAdapter(err))],
    }
}

/// Wrap build warnings for reporting, in the order they were raised.
pub fn warnings_to_reportables(diagnostics: &[Diagnostic]) -> Vec<Reportable<'_>> {
    diagnostics
        .iter()
        .map(|d| Reportable::Diagnostic(DiagnosticAdapter::new(d)))
        .collect()
}

/// Render one reportable with miette's graphical handler.
pub fn render(reporter: &GraphicalReportHandler, reportable: &Reportable<'_>) -> String {
    let mut writer = String::new();
    if reporter.render_report(&mut writer, reportable).is_err() {
        writer = reportable.to_string();
    }
    writer
}

#[cfg(test)]
mod tests {
    use tome::{
        ErrorCode,
        location::LocationError,
        span::Span,
    };

    use super::*;

    #[test]
    fn test_warning_with_comment_snippet() {
        let diag = Diagnostic::warning("unresolved link `[D]`")
            .with_code(ErrorCode::E200)
            .with_entity("p.C")
            .with_source("See [D] for details.")
            .with_label(Span::new(4..7), "no symbol named `D` is in scope")
            .with_help("check the spelling or qualify the name");
        let diagnostics = vec![diag];

        let reportables = warnings_to_reportables(&diagnostics);

        assert_eq!(reportables.len(), 1);
        assert_eq!(reportables[0].to_string(), "unresolved link `[D]` (in `p.C`)");
        assert_eq!(reportables[0].severity(), Some(miette::Severity::Warning));
        let labels: Vec<_> = reportables[0].labels().unwrap().collect();
        assert_eq!(labels.len(), 1);
        assert!(labels[0].primary());
        assert_eq!(labels[0].offset(), 4);
    }

    #[test]
    fn test_labels_without_source_are_dropped() {
        let diag = Diagnostic::warning("orphan label").with_label(Span::new(0..3), "here");
        let adapter = DiagnosticAdapter::new(&diag);
        assert!(adapter.labels().is_none());
        assert!(adapter.source_code().is_none());
    }

    #[test]
    fn test_location_error_becomes_diagnostic() {
        let err = TomeError::Location(LocationError::Collision {
            location: "p/-c/index.html".to_string(),
            first: "p.C".to_string(),
            second: "p.c".to_string(),
        });

        let reportables = to_reportables(&err);

        assert_eq!(reportables.len(), 1);
        match &reportables[0] {
            Reportable::Diagnostic(d) => {
                assert_eq!(d.code().unwrap().to_string(), "E300");
                assert_eq!(d.severity(), Some(miette::Severity::Error));
            }
            Reportable::Error(_) => panic!("Expected Diagnostic"),
        }
    }

    #[test]
    fn test_plain_error() {
        let err = TomeError::Config("bad value".to_string());

        let reportables = to_reportables(&err);

        match &reportables[0] {
            Reportable::Error(e) => {
                assert_eq!(e.to_string(), "Configuration error: bad value");
                assert_eq!(e.code().unwrap().to_string(), "tome::config");
            }
            Reportable::Diagnostic(_) => panic!("Expected Error"),
        }
    }

    #[test]
    fn test_render_includes_code_and_message() {
        let diag = Diagnostic::warning("cannot read include file `x.md`").with_code(ErrorCode::E100);
        let reportable = Reportable::Diagnostic(DiagnosticAdapter::new(&diag));

        let text = render(&GraphicalReportHandler::new(), &reportable);

        assert!(text.contains("E100"));
        assert!(text.contains("cannot read include file"));
    }
}
