//! Parsed doc comments: description plus block tag sections.

use serde::Serialize;

use crate::content::{Content, Link};

/// A KDoc-style block tag.
///
/// Tags whose subject names another symbol (`@throws`, `@see`, `@sample`)
/// carry it as a [`Link`] so it is resolved like any inline link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    Param(String),
    Property(String),
    Return,
    Receiver,
    Constructor,
    Throws(Link),
    See(Link),
    Sample(Link),
    Since,
    Author,
}

impl Tag {
    /// Heading the tag's section is rendered under.
    pub fn title(&self) -> &'static str {
        match self {
            Tag::Param(_) => "Parameters",
            Tag::Property(_) => "Properties",
            Tag::Return => "Returns",
            Tag::Receiver => "Receiver",
            Tag::Constructor => "Constructor",
            Tag::Throws(_) => "Throws",
            Tag::See(_) => "See also",
            Tag::Sample(_) => "Samples",
            Tag::Since => "Since",
            Tag::Author => "Author",
        }
    }

    /// The subject link for `@throws`, `@see` and `@sample`.
    pub fn subject_link(&self) -> Option<&Link> {
        match self {
            Tag::Throws(link) | Tag::See(link) | Tag::Sample(link) => Some(link),
            _ => None,
        }
    }

    pub fn subject_link_mut(&mut self) -> Option<&mut Link> {
        match self {
            Tag::Throws(link) | Tag::See(link) | Tag::Sample(link) => Some(link),
            _ => None,
        }
    }
}

/// One block tag with its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagSection {
    tag: Tag,
    content: Content,
}

impl TagSection {
    pub fn new(tag: Tag, content: Content) -> Self {
        Self { tag, content }
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn content(&self) -> &Content {
        &self.content
    }
}

/// The documentation attached to an entity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Documentation {
    description: Content,
    tags: Vec<TagSection>,
    #[serde(skip)]
    raw: Option<String>,
    suppressed: bool,
}

impl Documentation {
    pub fn new(description: Content, tags: Vec<TagSection>) -> Self {
        Self {
            description,
            tags,
            raw: None,
            suppressed: false,
        }
    }

    /// Keep the raw comment text spans refer into.
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    /// Mark the documentation as carrying `@suppress`.
    pub fn with_suppressed(mut self, suppressed: bool) -> Self {
        self.suppressed = suppressed;
        self
    }

    pub fn description(&self) -> &Content {
        &self.description
    }

    pub fn description_mut(&mut self) -> &mut Content {
        &mut self.description
    }

    pub fn tags(&self) -> &[TagSection] {
        &self.tags
    }

    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppressed
    }

    /// Returns `true` when there is neither description nor any tag.
    pub fn is_empty(&self) -> bool {
        self.description.is_empty() && self.tags.is_empty()
    }

    /// Sections for a given tag title, in declaration order.
    pub fn sections_titled(&self, title: &str) -> impl Iterator<Item = &TagSection> {
        self.tags.iter().filter(move |section| section.tag.title() == title)
    }

    pub fn for_each_link<'a>(&'a self, f: &mut dyn FnMut(&'a Link)) {
        self.description.for_each_link(f);
        for section in &self.tags {
            if let Some(link) = section.tag.subject_link() {
                f(link);
            }
            section.content.for_each_link(f);
        }
    }

    pub fn for_each_link_mut(&mut self, f: &mut dyn FnMut(&mut Link)) {
        self.description.for_each_link_mut(f);
        for section in &mut self.tags {
            if let Some(link) = section.tag.subject_link_mut() {
                f(link);
            }
            section.content.for_each_link_mut(f);
        }
    }
}
