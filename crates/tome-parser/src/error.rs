//! Error and diagnostic system for Tome.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Multiple labeled spans for rich error context
//! - Severity levels
//! - Diagnostic collector for accumulating warnings
//!
//! # Overview
//!
//! The error system is built around the [`Diagnostic`] type, which represents
//! a single error or warning message with optional error code, multiple source
//! locations, and help text. Spans point into the raw doc comment of the
//! entity the diagnostic is about.
//!
//! # Example
//!
//! ```
//! # use tome_parser::error::{Diagnostic, ErrorCode};
//! # use tome_parser::Span;
//!
//! let span = Span::new(4..7);
//!
//! let diag = Diagnostic::warning("unresolved link `[D]`")
//!     .with_code(ErrorCode::E200)
//!     .with_entity("p.C")
//!     .with_label(span, "no symbol named `D` is in scope")
//!     .with_help("check the spelling or qualify the name");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod severity;

pub use collector::DiagnosticCollector;
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use severity::Severity;
