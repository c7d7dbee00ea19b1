//! Format renderers.
//!
//! This module provides the [`Renderer`] trait that turns one entity of a
//! resolved model into one page of an output dialect, plus the optional
//! navigation outline. It is the last stage before pages are written.
//!
//! # Pipeline Position
//!
//! ```text
//! DocumentationModule (resolved)
//!     ↓ locate
//! LocationService
//!     ↓ render (this module)
//! Pages + outline + resources
//!     ↓ generate
//! Output directory
//! ```
//!
//! # Available Dialects
//!
//! - [`html`] - standalone HTML pages with a shared stylesheet and `outline.html`
//! - [`markdown`] - plain Markdown pages, no outline
//! - [`jekyll`] - Markdown pages with YAML front matter, no outline
//! - [`website`] - HTML fragments for a site generator plus `_nav.yml`
//!
//! Every dialect shares [`signature`] for signatures and [`RenderContext`]
//! for link, publication and source-link decisions, so they only differ in
//! markup.
//!
//! # Error Handling
//!
//! Rendering returns [`Error`]. [`Error`] converts into
//! [`TomeError::Export`](crate::TomeError::Export) at the crate boundary.

pub mod context;
pub mod html;
pub mod jekyll;
pub mod markdown;
pub mod signature;
pub mod website;

use std::{borrow::Cow, fmt, str::FromStr};

use serde::Deserialize;

use tome_core::model::EntityIndex;

pub use context::RenderContext;

/// File name of the shared stylesheet at the output root.
pub const STYLESHEET: &str = "style.css";

const DEFAULT_STYLESHEET: &str = include_str!("render/style.css");

/// Output dialect.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    #[default]
    Html,
    Markdown,
    Jekyll,
    Website,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Markdown => "markdown",
            Format::Jekyll => "jekyll",
            Format::Website => "website",
        }
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" => Ok(Self::Html),
            "markdown" | "md" => Ok(Self::Markdown),
            "jekyll" => Ok(Self::Jekyll),
            "website" => Ok(Self::Website),
            _ => Err(format!(
                "unknown format `{s}` (expected html, markdown, jekyll or website)"
            )),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A navigation document written next to the pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutlinePage {
    /// File name relative to the output root.
    pub file: String,
    pub contents: String,
}

/// A static file every run of a dialect writes to the output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub file: &'static str,
    pub contents: Cow<'static, str>,
}

/// Abstraction for output dialects.
///
/// Implementors only see a fully resolved model through [`RenderContext`],
/// and are shared across the worker threads rendering pages.
pub trait Renderer: Send + Sync {
    /// Dialect name, as accepted by [`Format::from_str`].
    fn name(&self) -> &'static str;

    /// Extension of page files, without the dot.
    fn extension(&self) -> &'static str;

    /// Render the page of `entity`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the page cannot be produced.
    fn render_page(&self, ctx: &RenderContext<'_>, entity: EntityIndex) -> Result<String, Error>;

    /// Render the navigation outline, or `None` if the dialect has none.
    fn render_outline(&self, _ctx: &RenderContext<'_>) -> Option<Result<OutlinePage, Error>> {
        None
    }

    /// Static files the pages refer to.
    fn resources(&self) -> Vec<Resource> {
        Vec::new()
    }
}

/// The renderer for `format`.
pub fn renderer_for(format: Format) -> Box<dyn Renderer> {
    match format {
        Format::Html => Box::new(html::HtmlRenderer),
        Format::Markdown => Box::new(markdown::MarkdownRenderer),
        Format::Jekyll => Box::new(jekyll::JekyllRenderer),
        Format::Website => Box::new(website::WebsiteRenderer),
    }
}

/// The built-in stylesheet shared by the HTML dialects.
fn stylesheet() -> Resource {
    Resource {
        file: STYLESHEET,
        contents: Cow::Borrowed(DEFAULT_STYLESHEET),
    }
}

/// Errors that can occur while rendering or writing pages.
///
/// This type is converted into [`TomeError::Export`] at the crate boundary
/// via the [`From`] implementation in [`crate::error`].
///
/// [`TomeError::Export`]: crate::TomeError::Export
#[derive(Debug)]
pub enum Error {
    /// A rendering failure described by `message`.
    Render(String),
    /// An I/O error encountered while writing output.
    Io(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Render(msg) => write!(f, "Render error: {msg}"),
            Self::Io(err) => write!(f, "I/O error: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Render(_) => None,
            Self::Io(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<fmt::Error> for Error {
    fn from(_: fmt::Error) -> Self {
        Self::Render("formatting failed".to_string())
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Render(format!("YAML serialization failed: {err}"))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tome_core::{
        declaration::{Declaration, SourceFragment, StaticSession},
        model::{DocumentationModule, EntityKind},
    };

    use crate::{
        build::Builder,
        config::{AppConfig, SourceLinkConfig},
        location::LocationService,
        publish::Publication,
        resolve::Resolver,
        source_link::SourceLinker,
    };

    /// A resolved model ready to be rendered by any dialect.
    pub(crate) struct Fixture {
        module: DocumentationModule,
        publication: Publication,
        linker: SourceLinker,
    }

    impl Fixture {
        fn new(fragments: Vec<SourceFragment>) -> Self {
            let config = AppConfig::default();
            let (mut module, _) = Builder::new(&config).build(&fragments, &[]);
            Resolver::new(&StaticSession::default()).resolve(&mut module);
            let publication = Publication::compute(&module, config.documentation());
            let linker = SourceLinker::new(&[SourceLinkConfig::new(
                "src",
                "https://example.org/src",
                Some("#L".to_string()),
            )]);
            Self {
                module,
                publication,
                linker,
            }
        }

        /// Package `p` with `C` documented "See [D]" and undocumented `D`.
        pub(crate) fn see_d() -> Self {
            Self::new(vec![
                SourceFragment::new("a.kt", "p")
                    .with_declaration(Declaration::new("C", EntityKind::Class).with_doc("See [D]"))
                    .with_declaration(Declaration::new("D", EntityKind::Class)),
            ])
        }

        /// `C` linking to a name that exists nowhere.
        pub(crate) fn unresolved() -> Self {
            Self::new(vec![SourceFragment::new("a.kt", "p").with_declaration(
                Declaration::new("C", EntityKind::Class).with_doc("See [DoesNotExist]"),
            )])
        }

        /// `C<T>` with a documented function and a source location.
        pub(crate) fn members() -> Self {
            let mut class = Declaration::new("C", EntityKind::Class)
                .with_child(Declaration::new("T", EntityKind::TypeParameter))
                .with_child(Declaration::new("run", EntityKind::Function).with_doc("Runs it."));
            class.line = Some(3);
            Self::new(vec![
                SourceFragment::new("src/C.kt", "p").with_declaration(class),
            ])
        }

        /// A function in the unnamed root package.
        pub(crate) fn root_package() -> Self {
            Self::new(vec![SourceFragment::new("Main.kt", "").with_declaration(
                Declaration::new("main", EntityKind::Function).with_doc("Entry point."),
            )])
        }

        pub(crate) fn page(&self, renderer: &dyn Renderer, dri: &str) -> String {
            let locations = LocationService::new(&self.module, renderer.extension()).unwrap();
            let ctx = RenderContext::new(&self.module, &locations, &self.publication, &self.linker);
            renderer
                .render_page(&ctx, self.module.find(dri).unwrap())
                .unwrap()
        }

        pub(crate) fn outline(&self, renderer: &dyn Renderer) -> Option<OutlinePage> {
            let locations = LocationService::new(&self.module, renderer.extension()).unwrap();
            let ctx = RenderContext::new(&self.module, &locations, &self.publication, &self.linker);
            renderer.render_outline(&ctx).map(Result::unwrap)
        }
    }

    #[test]
    fn test_unresolved_reference_is_plain_in_every_dialect() {
        let fixture = Fixture::unresolved();
        for format in [Format::Html, Format::Markdown, Format::Jekyll, Format::Website] {
            let page = fixture.page(renderer_for(format).as_ref(), "p.C");
            assert!(page.contains("DoesNotExist"), "{format}");
            assert!(!page.contains("href=\"DoesNotExist"), "{format}");
            assert!(!page.contains("[DoesNotExist]("), "{format}");
            assert!(!page.contains("[DoesNotExist]"), "{format}");
        }
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("html".parse::<Format>(), Ok(Format::Html));
        assert_eq!("MD".parse::<Format>(), Ok(Format::Markdown));
        assert_eq!("jekyll".parse::<Format>(), Ok(Format::Jekyll));
        assert!("pdf".parse::<Format>().is_err());
        assert_eq!(Format::Website.to_string(), "website");
    }

    #[test]
    fn test_renderers_match_formats() {
        for format in [Format::Html, Format::Markdown, Format::Jekyll, Format::Website] {
            let renderer = renderer_for(format);
            assert_eq!(renderer.name().parse::<Format>(), Ok(format));
        }
        assert_eq!(renderer_for(Format::Html).extension(), "html");
        assert_eq!(renderer_for(Format::Jekyll).extension(), "md");
    }

    #[test]
    fn test_only_html_dialects_ship_the_stylesheet() {
        assert_eq!(renderer_for(Format::Html).resources(), vec![stylesheet()]);
        assert_eq!(renderer_for(Format::Website).resources(), vec![stylesheet()]);
        assert!(renderer_for(Format::Markdown).resources().is_empty());
    }
}
