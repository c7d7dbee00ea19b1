//! Error types for Tome operations.
//!
//! This module provides the main error type [`TomeError`]. Only conditions
//! that make the output untrustworthy are errors; everything else is a
//! warning [`Diagnostic`](tome_parser::error::Diagnostic) carried alongside
//! the model.

use std::io;

use thiserror::Error;

use crate::location::LocationError;

/// The main error type for Tome operations.
#[derive(Debug, Error)]
pub enum TomeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Location(#[from] LocationError),

    #[error("Export error: {0}")]
    Export(Box<dyn std::error::Error + Send + Sync>),
}

impl From<crate::render::Error> for TomeError {
    fn from(error: crate::render::Error) -> Self {
        Self::Export(Box::new(error))
    }
}
