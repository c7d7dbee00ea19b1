//! Tome Core Types and Definitions
//!
//! This crate provides the foundational types of the Tome documentation
//! generator. It includes:
//!
//! - **Identifiers**: Efficient string-interned identifiers ([`identifier::Id`])
//! - **Spans**: Byte ranges into doc comment text ([`span::Span`])
//! - **Content**: Structured prose trees ([`content`] module)
//! - **Model**: The documentation model of entities ([`model`] module)
//! - **Declarations**: Frontend input and the session capability ([`declaration`] module)

pub mod content;
pub mod declaration;
pub mod identifier;
pub mod model;
pub mod span;
