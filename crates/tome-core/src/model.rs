//! Documentation model types.
//!
//! This module contains the documentation model produced by the builder and
//! completed by reference resolution. Renderers only ever see a fully
//! resolved model.
//!
//! # Pipeline Position
//!
//! ```text
//! Declaration fragments + doc comments
//!     ↓ content parser
//! Content trees
//!     ↓ build
//! DocumentationModule (these types) - link targets pending
//!     ↓ resolve
//! DocumentationModule - every link resolved or explicitly unresolved
//!     ↓ locate + render
//! Pages
//! ```
//!
//! # Organization
//!
//! - [`kind`] - [`EntityKind`], [`Visibility`] and [`Modifier`]
//! - [`documentation`] - [`Documentation`] and KDoc-style [`TagSection`]s
//! - [`entity`] - [`Entity`], its identity [`Dri`] and reference slots
//! - [`module`] - the [`DocumentationModule`] arena and [`EntityIndex`]

pub mod documentation;
pub mod entity;
pub mod kind;
pub mod module;

pub use documentation::*;
pub use entity::*;
pub use kind::*;
pub use module::*;
