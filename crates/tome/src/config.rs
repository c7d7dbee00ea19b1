//! Configuration types for Tome documentation runs.
//!
//! All types implement [`serde::Deserialize`] for loading from TOML. Every
//! section is optional; missing values fall back to the defaults below.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining all sections.
//! - [`ModuleConfig`] - Module name, include files and sample roots.
//! - [`OutputConfig`] - Output format, directory and stylesheet.
//! - [`DocumentationConfig`] - Which declarations are published and reported.
//! - [`SourceLinkConfig`] - Mapping of source roots to browsable URLs.
//!
//! # Example
//!
//! ```
//! # use tome::config::AppConfig;
//! # use tome::render::Format;
//! let config = AppConfig::default();
//! assert_eq!(config.output().format(), Format::Html);
//! assert!(config.documentation().include_undocumented());
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::render::Format;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Module section.
    #[serde(default)]
    module: ModuleConfig,

    /// Output section.
    #[serde(default)]
    output: OutputConfig,

    /// Documentation filtering section.
    #[serde(default)]
    documentation: DocumentationConfig,

    /// Source link mappings, tried longest path first.
    #[serde(default)]
    source_links: Vec<SourceLinkConfig>,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(
        module: ModuleConfig,
        output: OutputConfig,
        documentation: DocumentationConfig,
        source_links: Vec<SourceLinkConfig>,
    ) -> Self {
        Self {
            module,
            output,
            documentation,
            source_links,
        }
    }

    /// Returns the module configuration.
    pub fn module(&self) -> &ModuleConfig {
        &self.module
    }

    /// Returns the output configuration.
    pub fn output(&self) -> &OutputConfig {
        &self.output
    }

    /// Returns the documentation configuration.
    pub fn documentation(&self) -> &DocumentationConfig {
        &self.documentation
    }

    /// Returns the source link mappings.
    pub fn source_links(&self) -> &[SourceLinkConfig] {
        &self.source_links
    }

    /// Override the output format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.output.format = format;
        self
    }

    /// Override the output directory.
    pub fn with_output_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.output.directory = directory.into();
        self
    }

    /// Override the module name.
    pub fn with_module_name(mut self, name: impl Into<String>) -> Self {
        self.module.name = name.into();
        self
    }
}

/// The documented module: name, include files and sample sources.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    name: String,
    includes: Vec<PathBuf>,
    samples: Vec<PathBuf>,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            name: "root".to_string(),
            includes: Vec::new(),
            samples: Vec::new(),
        }
    }
}

impl ModuleConfig {
    /// Creates a new [`ModuleConfig`].
    ///
    /// # Arguments
    ///
    /// * `name` - Module name shown on the module page.
    /// * `includes` - Include files, concatenated in this order.
    /// * `samples` - Source roots whose files are samples, not documentation.
    pub fn new(name: impl Into<String>, includes: Vec<PathBuf>, samples: Vec<PathBuf>) -> Self {
        Self {
            name: name.into(),
            includes,
            samples,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn includes(&self) -> &[PathBuf] {
        &self.includes
    }

    pub fn samples(&self) -> &[PathBuf] {
        &self.samples
    }

    /// Returns `true` when `path` lies under one of the sample roots.
    pub fn is_sample(&self, path: &Path) -> bool {
        self.samples.iter().any(|root| path.starts_with(root))
    }
}

/// Where and how pages are written.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    format: Format,
    directory: PathBuf,
    stylesheet: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: Format::default(),
            directory: PathBuf::from("docs"),
            stylesheet: None,
        }
    }
}

impl OutputConfig {
    /// Creates a new [`OutputConfig`].
    pub fn new(format: Format, directory: impl Into<PathBuf>, stylesheet: Option<PathBuf>) -> Self {
        Self {
            format,
            directory: directory.into(),
            stylesheet,
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// A stylesheet replacing the built-in `style.css`.
    pub fn stylesheet(&self) -> Option<&Path> {
        self.stylesheet.as_deref()
    }
}

/// Publication and reporting switches.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DocumentationConfig {
    include_undocumented: bool,
    include_non_public: bool,
    report_undocumented: bool,
}

impl Default for DocumentationConfig {
    fn default() -> Self {
        Self {
            include_undocumented: true,
            include_non_public: false,
            report_undocumented: false,
        }
    }
}

impl DocumentationConfig {
    /// Creates a new [`DocumentationConfig`].
    ///
    /// # Arguments
    ///
    /// * `include_undocumented` - Publish declarations without documentation.
    /// * `include_non_public` - Publish internal and private declarations.
    /// * `report_undocumented` - Warn about each undocumented declaration.
    pub fn new(
        include_undocumented: bool,
        include_non_public: bool,
        report_undocumented: bool,
    ) -> Self {
        Self {
            include_undocumented,
            include_non_public,
            report_undocumented,
        }
    }

    pub fn include_undocumented(&self) -> bool {
        self.include_undocumented
    }

    pub fn include_non_public(&self) -> bool {
        self.include_non_public
    }

    pub fn report_undocumented(&self) -> bool {
        self.report_undocumented
    }
}

/// Maps a local source root to a browsable URL.
///
/// `url` may contain `{path}` and `{line}` placeholders; otherwise the path
/// below `path` is appended to it, followed by `line_suffix` and the line.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceLinkConfig {
    path: PathBuf,
    url: String,
    #[serde(default)]
    line_suffix: Option<String>,
}

impl SourceLinkConfig {
    pub fn new(path: impl Into<PathBuf>, url: impl Into<String>, line_suffix: Option<String>) -> Self {
        Self {
            path: path.into(),
            url: url.into(),
            line_suffix,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn line_suffix(&self) -> Option<&str> {
        self.line_suffix.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.module().name(), "root");
        assert_eq!(config.output().directory(), Path::new("docs"));
        assert!(config.output().stylesheet().is_none());
        assert!(!config.documentation().include_non_public());
        assert!(!config.documentation().report_undocumented());
        assert!(config.source_links().is_empty());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::default()
            .with_format(Format::Markdown)
            .with_output_directory("out")
            .with_module_name("core");
        assert_eq!(config.output().format(), Format::Markdown);
        assert_eq!(config.output().directory(), Path::new("out"));
        assert_eq!(config.module().name(), "core");
    }

    #[test]
    fn test_is_sample() {
        let module = ModuleConfig::new("m", vec![], vec![PathBuf::from("src/samples")]);
        assert!(module.is_sample(Path::new("src/samples/Usage.kt")));
        assert!(!module.is_sample(Path::new("src/main/Usage.kt")));
    }
}
