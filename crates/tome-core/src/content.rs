//! Structured prose parsed from doc comments and include files.
//!
//! A [`Content`] is a sequence of block-level [`ContentNode`]s. Symbol links
//! are [`Link`] nodes whose [`LinkTarget`] starts out [`LinkTarget::Pending`]
//! and is settled once by reference resolution.

use serde::Serialize;

use crate::{model::EntityIndex, span::Span};

/// Resolution state of a symbolic reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkTarget {
    /// Not yet looked at by the resolver.
    Pending,
    /// Points at an entity of the model.
    Resolved(EntityIndex),
    /// Looked up and not found in the model.
    ///
    /// `external` carries the qualified name when the semantic session
    /// recognized the symbol as belonging to another library.
    Unresolved { external: Option<String> },
}

impl LinkTarget {
    /// Returns `true` while the target still awaits resolution.
    pub fn is_pending(&self) -> bool {
        matches!(self, LinkTarget::Pending)
    }

    /// Returns the target entity if resolved.
    pub fn resolved(&self) -> Option<EntityIndex> {
        match self {
            LinkTarget::Resolved(index) => Some(*index),
            _ => None,
        }
    }
}

/// A symbolic link written as `[reference]` or `[text][reference]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    reference: String,
    target: LinkTarget,
    children: Vec<ContentNode>,
    span: Span,
}

impl Link {
    /// Create a pending link.
    ///
    /// When `children` is empty the reference text itself is displayed.
    pub fn new(reference: impl Into<String>, children: Vec<ContentNode>, span: Span) -> Self {
        Self {
            reference: reference.into(),
            target: LinkTarget::Pending,
            children,
            span,
        }
    }

    /// The reference text as written between the brackets.
    pub fn reference(&self) -> &str {
        &self.reference
    }

    pub fn target(&self) -> &LinkTarget {
        &self.target
    }

    pub fn target_mut(&mut self) -> &mut LinkTarget {
        &mut self.target
    }

    /// Display children; empty when the reference is shown verbatim.
    pub fn children(&self) -> &[ContentNode] {
        &self.children
    }

    /// Byte span of the link within the raw comment.
    pub fn span(&self) -> Span {
        self.span
    }
}

/// A node of the content tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentNode {
    Text(String),
    Paragraph(Vec<ContentNode>),
    CodeBlock {
        language: Option<String>,
        code: String,
    },
    /// Inline code span.
    Code(String),
    Link(Link),
    /// A plain URL hyperlink, `[text](url)`.
    Hyperlink {
        url: String,
        children: Vec<ContentNode>,
    },
    Emphasis(Vec<ContentNode>),
    Strong(Vec<ContentNode>),
    Heading {
        level: u8,
        children: Vec<ContentNode>,
    },
    List {
        ordered: bool,
        items: Vec<Vec<ContentNode>>,
    },
}

impl ContentNode {
    /// Visit every link in this subtree, depth first.
    pub fn for_each_link<'a>(&'a self, f: &mut dyn FnMut(&'a Link)) {
        match self {
            ContentNode::Link(link) => {
                f(link);
                link.children.iter().for_each(|child| child.for_each_link(f));
            }
            ContentNode::Paragraph(children)
            | ContentNode::Emphasis(children)
            | ContentNode::Strong(children)
            | ContentNode::Hyperlink { children, .. }
            | ContentNode::Heading { children, .. } => {
                children.iter().for_each(|child| child.for_each_link(f));
            }
            ContentNode::List { items, .. } => items
                .iter()
                .flatten()
                .for_each(|child| child.for_each_link(f)),
            ContentNode::Text(_) | ContentNode::CodeBlock { .. } | ContentNode::Code(_) => {}
        }
    }

    /// Visit every link in this subtree mutably, depth first.
    pub fn for_each_link_mut(&mut self, f: &mut dyn FnMut(&mut Link)) {
        match self {
            ContentNode::Link(link) => {
                f(link);
                link.children
                    .iter_mut()
                    .for_each(|child| child.for_each_link_mut(f));
            }
            ContentNode::Paragraph(children)
            | ContentNode::Emphasis(children)
            | ContentNode::Strong(children)
            | ContentNode::Hyperlink { children, .. }
            | ContentNode::Heading { children, .. } => {
                children
                    .iter_mut()
                    .for_each(|child| child.for_each_link_mut(f));
            }
            ContentNode::List { items, .. } => items
                .iter_mut()
                .flatten()
                .for_each(|child| child.for_each_link_mut(f)),
            ContentNode::Text(_) | ContentNode::CodeBlock { .. } | ContentNode::Code(_) => {}
        }
    }

    /// Concatenated text of this subtree with markup removed.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.write_plain_text(&mut out);
        out
    }

    fn write_plain_text(&self, out: &mut String) {
        match self {
            ContentNode::Text(text) | ContentNode::Code(text) => out.push_str(text),
            ContentNode::CodeBlock { code, .. } => out.push_str(code),
            ContentNode::Link(link) if link.children.is_empty() => out.push_str(&link.reference),
            ContentNode::Link(link) => link
                .children
                .iter()
                .for_each(|child| child.write_plain_text(out)),
            ContentNode::Paragraph(children)
            | ContentNode::Emphasis(children)
            | ContentNode::Strong(children)
            | ContentNode::Hyperlink { children, .. }
            | ContentNode::Heading { children, .. } => {
                children.iter().for_each(|child| child.write_plain_text(out))
            }
            ContentNode::List { items, .. } => {
                for item in items {
                    item.iter().for_each(|child| child.write_plain_text(out));
                    out.push(' ');
                }
            }
        }
    }
}

/// A block-level content tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Content {
    blocks: Vec<ContentNode>,
}

impl Content {
    pub fn new(blocks: Vec<ContentNode>) -> Self {
        Self { blocks }
    }

    pub fn blocks(&self) -> &[ContentNode] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Append all blocks of `other`, preserving order.
    pub fn extend(&mut self, other: Content) {
        self.blocks.extend(other.blocks);
    }

    /// The first paragraph, used as a one-line summary in member listings.
    pub fn summary(&self) -> Option<&ContentNode> {
        self.blocks
            .iter()
            .find(|block| matches!(block, ContentNode::Paragraph(_)))
    }

    pub fn for_each_link<'a>(&'a self, f: &mut dyn FnMut(&'a Link)) {
        self.blocks.iter().for_each(|block| block.for_each_link(f));
    }

    pub fn for_each_link_mut(&mut self, f: &mut dyn FnMut(&mut Link)) {
        self.blocks
            .iter_mut()
            .for_each(|block| block.for_each_link_mut(f));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Content {
        Content::new(vec![
            ContentNode::Heading {
                level: 2,
                children: vec![ContentNode::Text("Usage".to_string())],
            },
            ContentNode::Paragraph(vec![
                ContentNode::Text("See ".to_string()),
                ContentNode::Link(Link::new("D", vec![], Span::new(4..7))),
            ]),
            ContentNode::List {
                ordered: false,
                items: vec![vec![ContentNode::Emphasis(vec![ContentNode::Link(
                    Link::new("E", vec![], Span::new(12..15)),
                )])]],
            },
        ])
    }

    #[test]
    fn test_for_each_link_visits_nested_links() {
        let content = sample();
        let mut references = Vec::new();
        content.for_each_link(&mut |link| references.push(link.reference().to_string()));
        assert_eq!(references, vec!["D", "E"]);
    }

    #[test]
    fn test_for_each_link_mut_updates_targets() {
        let mut content = sample();
        content.for_each_link_mut(&mut |link| {
            *link.target_mut() = LinkTarget::Unresolved { external: None }
        });

        let mut pending = 0;
        content.for_each_link(&mut |link| {
            if link.target().is_pending() {
                pending += 1;
            }
        });
        assert_eq!(pending, 0);
    }

    #[test]
    fn test_summary_is_first_paragraph() {
        let content = sample();
        assert_eq!(content.summary().unwrap().plain_text(), "See D");
    }
}
