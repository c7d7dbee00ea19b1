//! Include files: module and package documentation kept outside the sources.
//!
//! ```text
//! # Module core
//! Text for the module page.
//!
//! # Package com.example.util
//! Text appended to the package page.
//! ```
//!
//! Text before the first header belongs to the module.

use tome_core::content::Content;

use crate::markup::parse_region;

/// A documentation section for one package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSection {
    name: String,
    content: Content,
}

impl PackageSection {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &Content {
        &self.content
    }
}

/// A parsed include file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeDocument {
    module_name: Option<String>,
    module: Content,
    packages: Vec<PackageSection>,
}

impl IncludeDocument {
    /// The name given by the first `# Module` header, if any.
    pub fn module_name(&self) -> Option<&str> {
        self.module_name.as_deref()
    }

    /// Module text of all module sections, in file order.
    pub fn module(&self) -> &Content {
        &self.module
    }

    /// Package sections in file order.
    pub fn packages(&self) -> &[PackageSection] {
        &self.packages
    }
}

enum Header<'a> {
    Module(&'a str),
    Package(&'a str),
}

fn header(line: &str) -> Option<Header<'_>> {
    let line = line.trim();
    if let Some(name) = line.strip_prefix("# Module ") {
        return Some(Header::Module(name.trim()));
    }
    if let Some(name) = line.strip_prefix("# Package ") {
        return Some(Header::Package(name.trim()));
    }
    None
}

/// Parse an include file into its module and package sections.
///
/// # Example
///
/// ```
/// # use tome_parser::parse_include;
///
/// let document = parse_include("# Module core\nCore types.\n# Package p\nThe p package.");
/// assert_eq!(document.module_name(), Some("core"));
/// assert_eq!(document.packages()[0].name(), "p");
/// ```
pub fn parse_include(text: &str) -> IncludeDocument {
    let mut document = IncludeDocument::default();

    // (section start, body start, header) for every header line outside a fence.
    let mut headers = Vec::new();
    let mut in_fence = false;
    let mut offset = 0;
    for raw in text.split_inclusive('\n') {
        let trimmed = raw.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
        } else if !in_fence {
            if let Some(found) = header(raw) {
                headers.push((offset, offset + raw.len(), found));
            }
        }
        offset += raw.len();
    }

    let preamble_end = headers.first().map_or(text.len(), |(start, _, _)| *start);
    document.module = parse_region(text, 0, preamble_end);

    for (i, (_, body_start, found)) in headers.iter().enumerate() {
        let body_end = headers
            .get(i + 1)
            .map_or(text.len(), |(next, _, _)| *next);
        let content = parse_region(text, *body_start, body_end);
        match found {
            Header::Module(name) => {
                if document.module_name.is_none() {
                    document.module_name = Some((*name).to_string());
                }
                document.module.extend(content);
            }
            Header::Package(name) => document.packages.push(PackageSection {
                name: (*name).to_string(),
                content,
            }),
        }
    }

    document
}

#[cfg(test)]
mod tests {
    use super::*;
    use tome_core::content::ContentNode;

    #[test]
    fn test_preamble_and_sections() {
        let document = parse_include(
            "Intro.\n\n# Module core\nMore module text.\n\n# Package p\nAbout p.\n\n# Package q\nAbout q.",
        );

        assert_eq!(document.module_name(), Some("core"));
        assert_eq!(document.module().blocks().len(), 2);
        assert_eq!(document.packages().len(), 2);
        assert_eq!(document.packages()[1].name(), "q");
        assert_eq!(
            document.packages()[0].content().blocks(),
            &[ContentNode::Paragraph(vec![ContentNode::Text(
                "About p.".to_string()
            )])]
        );
    }

    #[test]
    fn test_headers_inside_fences_are_text() {
        let document = parse_include("# Module m\n```\n# Package p\n```");
        assert!(document.packages().is_empty());
        assert!(matches!(
            document.module().blocks()[0],
            ContentNode::CodeBlock { .. }
        ));
    }

    #[test]
    fn test_plain_headings_are_content() {
        let document = parse_include("# Module m\n## Overview\nText");
        assert!(matches!(
            document.module().blocks()[0],
            ContentNode::Heading { level: 2, .. }
        ));
    }

    #[test]
    fn test_empty_include() {
        let document = parse_include("");
        assert!(document.module().is_empty());
        assert!(document.module_name().is_none());
    }
}
