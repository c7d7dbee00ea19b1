//! Tome - a documentation generator for declaration-based source languages.
//!
//! Tome takes the declarations of a set of source files (packages, classes,
//! functions, properties) together with their doc comments, builds one
//! navigable documentation model, resolves the symbolic references in
//! signatures and comments, and renders the model as HTML, Markdown, Jekyll
//! pages or website fragments.
//!
//! The source-language frontend is not part of Tome: it is any
//! [`SemanticSession`](declaration::SemanticSession) implementation.

pub mod build;
pub mod config;
pub mod generate;
pub mod location;
pub mod publish;
pub mod render;
pub mod resolve;
pub mod source_link;

mod error;

pub use tome_core::{content, declaration, identifier, model, span};
pub use tome_parser::error::{Diagnostic, ErrorCode, Severity};

pub use error::TomeError;

use std::{fs, path::PathBuf};

use log::{debug, info, trace};

use tome_parser::{IncludeDocument, parse_include};

use build::Builder;
use config::AppConfig;
use declaration::SemanticSession;
use generate::{GeneratedOutput, Generator};
use location::LocationService;
use model::DocumentationModule;
use publish::Publication;
use render::{RenderContext, Renderer, renderer_for};
use resolve::Resolver;
use source_link::SourceLinker;

/// A resolved documentation model and the warnings raised building it.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    module: DocumentationModule,
    diagnostics: Vec<Diagnostic>,
}

impl BuildOutput {
    pub fn module(&self) -> &DocumentationModule {
        &self.module
    }

    /// Warnings in the order they were raised: include files, model
    /// building, then reference resolution.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (DocumentationModule, Vec<Diagnostic>) {
        (self.module, self.diagnostics)
    }
}

/// Entry point for building and rendering documentation.
///
/// # Examples
///
/// ```rust,no_run
/// use tome::{Documenter, config::AppConfig, declaration::StaticSession};
///
/// let documenter = Documenter::new(AppConfig::default());
/// let output = documenter.build(&StaticSession::default());
/// for diagnostic in output.diagnostics() {
///     eprintln!("{diagnostic}");
/// }
/// documenter.generate(&output).expect("Failed to write documentation");
/// ```
#[derive(Default)]
pub struct Documenter {
    config: AppConfig,
}

impl Documenter {
    /// Create a new documenter with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Build and resolve the documentation model of a session.
    ///
    /// Fragments under a configured sample root are skipped. Never fails:
    /// every problem with the input is a warning in the returned
    /// diagnostics. Reporting them is up to the caller; the log only traces
    /// them at debug level.
    pub fn build(&self, session: &dyn SemanticSession) -> BuildOutput {
        let mut fragments = session.fragments();
        let total = fragments.len();
        fragments.retain(|fragment| !self.config.module().is_sample(&fragment.path));
        info!(
            fragments = fragments.len(),
            samples = total - fragments.len();
            "Collected source fragments"
        );

        let (includes, mut diagnostics) = self.load_includes();

        let (mut module, build_diagnostics) = Builder::new(&self.config).build(&fragments, &includes);
        diagnostics.extend(build_diagnostics);

        diagnostics.extend(Resolver::new(session).resolve(&mut module));
        trace!(module:? = module; "Resolved model");

        info!(warnings = diagnostics.len(); "Model built");
        for diagnostic in &diagnostics {
            debug!(
                code = diagnostic.code().map(|code| code.as_str()).unwrap_or_default(),
                entity = diagnostic.entity().unwrap_or_default();
                "{}", diagnostic.message()
            );
        }

        BuildOutput {
            module,
            diagnostics,
        }
    }

    /// Render every published page in memory, keyed by its path relative to
    /// the output directory, in entity order.
    ///
    /// # Errors
    ///
    /// Returns [`TomeError::Location`] if two entities were assigned the same
    /// location, and [`TomeError::Export`] if a page cannot be rendered.
    pub fn render(&self, output: &BuildOutput) -> Result<Vec<(PathBuf, String)>, TomeError> {
        let renderer = self.renderer();
        let prepared = Prepared::new(self, output.module(), renderer.as_ref())?;
        let ctx = prepared.context();
        ctx.pages()
            .into_iter()
            .map(|entity| {
                let page = renderer.render_page(&ctx, entity)?;
                Ok((ctx.locations().location(entity).path(), page))
            })
            .collect()
    }

    /// Render and write the documentation to the configured output
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns [`TomeError::Location`] on a location collision,
    /// [`TomeError::Io`] if the output directory cannot be created and
    /// [`TomeError::Export`] if any page, the outline or a resource could
    /// not be written.
    pub fn generate(&self, output: &BuildOutput) -> Result<GeneratedOutput, TomeError> {
        let renderer = self.renderer();
        let prepared = Prepared::new(self, output.module(), renderer.as_ref())?;
        Generator::new(renderer.as_ref(), self.config.output()).generate(&prepared.context())
    }

    fn renderer(&self) -> Box<dyn Renderer> {
        renderer_for(self.config.output().format())
    }

    /// Read and parse the configured include files in order.
    ///
    /// Unreadable files are skipped with an `E100` warning.
    fn load_includes(&self) -> (Vec<IncludeDocument>, Vec<Diagnostic>) {
        let mut includes = Vec::new();
        let mut diagnostics = Vec::new();
        for path in self.config.module().includes() {
            match fs::read_to_string(path) {
                Ok(text) => {
                    debug!(path:? = path; "Loaded include file");
                    includes.push(parse_include(&text));
                }
                Err(err) => diagnostics.push(
                    Diagnostic::warning(format!(
                        "cannot read include file `{}`: {err}",
                        path.display()
                    ))
                    .with_code(ErrorCode::E100)
                    .with_help("the module documentation is generated without it"),
                ),
            }
        }
        (includes, diagnostics)
    }
}

/// Location table, publication and source links of one render.
struct Prepared<'a> {
    module: &'a DocumentationModule,
    locations: LocationService,
    publication: Publication,
    linker: SourceLinker,
}

impl<'a> Prepared<'a> {
    fn new(
        documenter: &Documenter,
        module: &'a DocumentationModule,
        renderer: &dyn Renderer,
    ) -> Result<Self, TomeError> {
        let locations = LocationService::new(module, renderer.extension())?;
        let publication = Publication::compute(module, documenter.config.documentation());
        let linker = SourceLinker::new(documenter.config.source_links());
        Ok(Self {
            module,
            locations,
            publication,
            linker,
        })
    }

    fn context(&self) -> RenderContext<'_> {
        RenderContext::new(self.module, &self.locations, &self.publication, &self.linker)
    }
}
