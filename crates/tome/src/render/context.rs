//! Read-only view of a run shared by every renderer.

use tome_core::{
    content::LinkTarget,
    model::{DocumentationModule, Entity, EntityIndex, EntityKind},
};

use crate::{location::LocationService, publish::Publication, source_link::SourceLinker};

use super::STYLESHEET;

/// Title shown for the unnamed root package.
const ROOT_PACKAGE_TITLE: &str = "(root)";

/// Everything a renderer may consult while rendering one page.
///
/// All decisions that must agree across dialects (whether a link is a
/// hyperlink, which members are listed, where the stylesheet is) are made
/// here.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    module: &'a DocumentationModule,
    locations: &'a LocationService,
    publication: &'a Publication,
    source_linker: &'a SourceLinker,
}

/// Published children of one kind group, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberGroup {
    pub title: &'static str,
    pub members: Vec<EntityIndex>,
}

impl<'a> RenderContext<'a> {
    pub fn new(
        module: &'a DocumentationModule,
        locations: &'a LocationService,
        publication: &'a Publication,
        source_linker: &'a SourceLinker,
    ) -> Self {
        Self {
            module,
            locations,
            publication,
            source_linker,
        }
    }

    pub fn module(&self) -> &'a DocumentationModule {
        self.module
    }

    pub fn locations(&self) -> &'a LocationService {
        self.locations
    }

    pub fn entity(&self, index: EntityIndex) -> &'a Entity {
        self.module.entity(index)
    }

    pub fn is_published(&self, index: EntityIndex) -> bool {
        self.publication.is_published(index)
    }

    /// Entities that get a page of their own, in arena order.
    pub fn pages(&self) -> Vec<EntityIndex> {
        self.module
            .iter()
            .filter(|(index, entity)| entity.kind().is_addressable() && self.is_published(*index))
            .map(|(index, _)| index)
            .collect()
    }

    /// Relative link from the page of `from` to `to`, if `to` is published.
    pub fn href(&self, from: EntityIndex, to: EntityIndex) -> Option<String> {
        self.is_published(to)
            .then(|| self.locations.relative(from, to))
    }

    /// Relative link for a reference target; `None` renders as plain text.
    pub fn link_href(&self, from: EntityIndex, target: &LinkTarget) -> Option<String> {
        target.resolved().and_then(|to| self.href(from, to))
    }

    /// Relative path from the page of `from` to the shared stylesheet.
    pub fn stylesheet_href(&self, from: EntityIndex) -> String {
        self.locations.relative_to_root(from, STYLESHEET)
    }

    /// "View source" URL of an entity.
    pub fn source_url(&self, index: EntityIndex) -> Option<String> {
        self.entity(index)
            .source()
            .and_then(|source| self.source_linker.url(source))
    }

    /// Human readable title of an entity.
    pub fn title(&self, index: EntityIndex) -> &'a str {
        let entity = self.entity(index);
        match entity.kind() {
            EntityKind::Package if entity.name().is_empty() => ROOT_PACKAGE_TITLE,
            _ => entity.name(),
        }
    }

    /// Chain of entities from the module down to `index`.
    pub fn breadcrumbs(&self, index: EntityIndex) -> Vec<EntityIndex> {
        let mut chain = self.module.ancestry(index);
        chain.reverse();
        chain
    }

    /// Published children of `index` grouped by kind, groups in listing order.
    pub fn groups(&self, index: EntityIndex) -> Vec<MemberGroup> {
        let mut members: Vec<EntityIndex> = self
            .entity(index)
            .children()
            .iter()
            .copied()
            .filter(|&child| self.is_published(child))
            .collect();
        members.sort_by_key(|&child| self.entity(child).kind().group_rank());

        let mut groups: Vec<MemberGroup> = Vec::new();
        for member in members {
            let title = self.entity(member).kind().group_title();
            match groups.last_mut() {
                Some(group) if group.title == title => group.members.push(member),
                _ => groups.push(MemberGroup {
                    title,
                    members: vec![member],
                }),
            }
        }
        groups
    }
}
