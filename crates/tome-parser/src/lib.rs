//! # Tome Parser
//!
//! Parsers for the text Tome documents: doc comments, free-form markup,
//! include files and type names. This crate also hosts the diagnostic system
//! shared by every phase of the generator.
//!
//! None of the parsers fail. Malformed markup degrades to literal text, so a
//! broken comment still produces a page.
//!
//! ## Usage
//!
//! ```
//! # use tome_parser::parse_doc_comment;
//!
//! let doc = parse_doc_comment("Adds two numbers.\n\n@param a the first\n@return the sum");
//! assert_eq!(doc.tags().len(), 2);
//! ```

pub mod error;
mod include;
mod markup;
mod type_name;

pub use include::{IncludeDocument, PackageSection, parse_include};
pub use markup::{parse_doc_comment, parse_markup};
pub use tome_core::span::Span;
pub use type_name::parse_type_name;
