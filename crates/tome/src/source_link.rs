//! "View source" links.

use std::path::Path;

use tome_core::model::SourceLocation;

use crate::config::SourceLinkConfig;

/// Rewrites declared source paths into browsable URLs.
#[derive(Debug, Clone, Default)]
pub struct SourceLinker {
    mappings: Vec<SourceLinkConfig>,
}

impl SourceLinker {
    pub fn new(mappings: &[SourceLinkConfig]) -> Self {
        let mut mappings = mappings.to_vec();
        // Longest prefix first; stable, so equal lengths keep config order.
        mappings.sort_by_key(|mapping| std::cmp::Reverse(mapping.path().components().count()));
        Self { mappings }
    }

    /// URL for `source`, or `None` when no mapping covers its path.
    pub fn url(&self, source: &SourceLocation) -> Option<String> {
        let mapping = self
            .mappings
            .iter()
            .find(|mapping| source.path().starts_with(mapping.path()))?;
        let remainder = relative_path(source.path(), mapping.path());
        let line = source.line();

        let template = mapping.url();
        if template.contains("{path}") || template.contains("{line}") {
            let line = line.map(|line| line.to_string()).unwrap_or_default();
            return Some(template.replace("{path}", &remainder).replace("{line}", &line));
        }

        let mut url = template.trim_end_matches('/').to_string();
        if !remainder.is_empty() {
            url.push('/');
            url.push_str(&remainder);
        }
        if let (Some(suffix), Some(line)) = (mapping.line_suffix(), line) {
            url.push_str(suffix);
            url.push_str(&line.to_string());
        }
        Some(url)
    }
}

/// `path` below `root`, `/`-separated regardless of platform.
fn relative_path(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .map(|rest| {
            rest.components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/")
        })
        .unwrap_or_default()
}
