//! Writing pages to the output directory.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::{debug, error, info};
use rayon::prelude::*;

use tome_core::model::EntityIndex;

use crate::{
    config::OutputConfig,
    error::TomeError,
    render::{self, RenderContext, Renderer, STYLESHEET},
};

/// Files written by one generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedOutput {
    /// Page files, in entity order, relative to the output directory.
    pub pages: Vec<PathBuf>,
    /// The outline file, if the dialect produced one.
    pub outline: Option<PathBuf>,
    pub resources: Vec<PathBuf>,
}

/// Drives a renderer over every published page of a model.
pub struct Generator<'a> {
    renderer: &'a dyn Renderer,
    output: &'a OutputConfig,
}

impl<'a> Generator<'a> {
    pub fn new(renderer: &'a dyn Renderer, output: &'a OutputConfig) -> Self {
        Self { renderer, output }
    }

    /// Render and write every page, then the outline and resources.
    ///
    /// Pages are rendered and written in parallel. A page that fails does
    /// not stop its siblings; the failures are reported together once all
    /// pages are done, before the outline and resources are written.
    ///
    /// # Errors
    ///
    /// Returns [`TomeError::Io`] if the output directory cannot be created,
    /// and [`TomeError::Export`] if any page, the outline or a resource
    /// could not be rendered or written.
    pub fn generate(&self, ctx: &RenderContext<'_>) -> Result<GeneratedOutput, TomeError> {
        let directory = self.output.directory();
        fs::create_dir_all(directory)?;

        let pages = ctx.pages();
        info!(
            renderer = self.renderer.name(),
            pages = pages.len(),
            directory:? = directory;
            "Generating documentation"
        );

        let results: Vec<Result<PathBuf, (EntityIndex, render::Error)>> = pages
            .par_iter()
            .map(|&entity| {
                self.write_page(ctx, directory, entity)
                    .map_err(|err| (entity, err))
            })
            .collect();

        let mut written = Vec::with_capacity(results.len());
        let mut failures = Vec::new();
        for result in results {
            match result {
                Ok(path) => written.push(path),
                Err((entity, err)) => {
                    let dri = ctx.entity(entity).dri().to_string();
                    error!(entity = dri.as_str(), err:? = err; "Failed to write page");
                    failures.push(format!("{}: {err}", ctx.entity(entity).dri()));
                }
            }
        }
        if !failures.is_empty() {
            return Err(TomeError::Export(
                format!(
                    "{} of {} pages failed: {}",
                    failures.len(),
                    pages.len(),
                    failures.join("; ")
                )
                .into(),
            ));
        }
        debug!(pages = written.len(); "Pages written");

        let outline = match self.renderer.render_outline(ctx) {
            Some(outline) => {
                let outline = outline?;
                let path = PathBuf::from(&outline.file);
                write_file(&directory.join(&path), &outline.contents)?;
                debug!(file = outline.file.as_str(); "Outline written");
                Some(path)
            }
            None => None,
        };

        let mut resources = Vec::new();
        for resource in self.renderer.resources() {
            let target = directory.join(resource.file);
            match self.output.stylesheet() {
                Some(custom) if resource.file == STYLESHEET => {
                    fs::copy(custom, &target)?;
                    debug!(stylesheet:? = custom; "Custom stylesheet copied");
                }
                _ => write_file(&target, &resource.contents)?,
            }
            resources.push(PathBuf::from(resource.file));
        }

        info!(
            pages = written.len(),
            resources = resources.len();
            "Documentation generated"
        );
        Ok(GeneratedOutput {
            pages: written,
            outline,
            resources,
        })
    }

    fn write_page(
        &self,
        ctx: &RenderContext<'_>,
        directory: &Path,
        entity: EntityIndex,
    ) -> Result<PathBuf, render::Error> {
        let page = self.renderer.render_page(ctx, entity)?;
        let relative = ctx.locations().location(entity).path();
        write_file(&directory.join(&relative), &page)?;
        Ok(relative)
    }
}

/// Write one file, creating its parent directories.
fn write_file(path: &Path, contents: &str) -> Result<(), render::Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tome_core::declaration::{Declaration, SourceFragment, StaticSession};
    use tome_core::model::EntityKind;

    use crate::{
        build::Builder,
        config::{AppConfig, DocumentationConfig},
        location::LocationService,
        publish::Publication,
        render::{Format, renderer_for},
        resolve::Resolver,
        source_link::SourceLinker,
    };

    /// A renderer that fails for one entity name.
    struct FailingRenderer(&'static str);

    impl Renderer for FailingRenderer {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn extension(&self) -> &'static str {
            "txt"
        }

        fn render_page(
            &self,
            ctx: &RenderContext<'_>,
            entity: EntityIndex,
        ) -> Result<String, render::Error> {
            let name = ctx.entity(entity).name();
            if name == self.0 {
                return Err(render::Error::Render(format!("cannot render {name}")));
            }
            Ok(name.to_string())
        }
    }

    fn run(renderer: &dyn Renderer, output: &OutputConfig) -> Result<GeneratedOutput, TomeError> {
        let fragments = vec![
            SourceFragment::new("a.kt", "p")
                .with_declaration(Declaration::new("C", EntityKind::Class))
                .with_declaration(Declaration::new("D", EntityKind::Class))
                .with_declaration(Declaration::new("E", EntityKind::Class)),
        ];
        let (mut module, _) = Builder::new(&AppConfig::default()).build(&fragments, &[]);
        Resolver::new(&StaticSession::default()).resolve(&mut module);
        let locations = LocationService::new(&module, renderer.extension()).unwrap();
        let publication = Publication::compute(&module, &DocumentationConfig::default());
        let linker = SourceLinker::default();
        let ctx = RenderContext::new(&module, &locations, &publication, &linker);
        Generator::new(renderer, output).generate(&ctx)
    }

    #[test]
    fn test_html_writes_pages_outline_and_stylesheet() {
        let dir = tempdir().unwrap();
        let output = OutputConfig::new(Format::Html, dir.path(), None);
        let renderer = renderer_for(Format::Html);

        let generated = run(renderer.as_ref(), &output).unwrap();

        assert_eq!(generated.pages.len(), 5);
        assert!(dir.path().join("index.html").is_file());
        assert!(dir.path().join("p/-c/index.html").is_file());
        assert_eq!(generated.outline, Some(PathBuf::from("outline.html")));
        assert!(dir.path().join("outline.html").is_file());
        assert!(dir.path().join("style.css").is_file());
    }

    #[test]
    fn test_custom_stylesheet_replaces_default() {
        let dir = tempdir().unwrap();
        let custom = dir.path().join("custom.css");
        fs::write(&custom, "body { color: red; }").unwrap();
        let out = dir.path().join("out");
        let output = OutputConfig::new(Format::Html, &out, Some(custom));

        run(renderer_for(Format::Html).as_ref(), &output).unwrap();

        let css = fs::read_to_string(out.join("style.css")).unwrap();
        assert_eq!(css, "body { color: red; }");
    }

    #[test]
    fn test_failed_page_does_not_stop_siblings() {
        let dir = tempdir().unwrap();
        let output = OutputConfig::new(Format::Markdown, dir.path(), None);

        let err = run(&FailingRenderer("D"), &output).unwrap_err();

        assert!(matches!(err, TomeError::Export(_)));
        assert!(err.to_string().contains("p.D"));
        assert!(dir.path().join("p/-c/index.txt").is_file());
        assert!(dir.path().join("p/-e/index.txt").is_file());
        assert!(!dir.path().join("p/-d/index.txt").exists());
    }

    #[test]
    fn test_markdown_has_no_outline_or_resources() {
        let dir = tempdir().unwrap();
        let output = OutputConfig::new(Format::Markdown, dir.path(), None);

        let generated = run(renderer_for(Format::Markdown).as_ref(), &output).unwrap();

        assert_eq!(generated.outline, None);
        assert!(generated.resources.is_empty());
        assert!(dir.path().join("p/-d/index.md").is_file());
    }
}
