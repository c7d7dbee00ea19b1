//! Which entities get a page.

use log::debug;

use tome_core::model::{DocumentationModule, EntityIndex, EntityKind};

use crate::config::DocumentationConfig;

/// The set of published entities of a model under one configuration.
#[derive(Debug, Clone)]
pub struct Publication {
    published: Vec<bool>,
}

impl Publication {
    /// Decide publication for every entity of `module`.
    ///
    /// An entity is eligible when its visibility is allowed and its parent
    /// is eligible. An eligible entity is published when it is the module, a
    /// package, documented, undocumented entities are included, or one of
    /// its children is published.
    pub fn compute(module: &DocumentationModule, config: &DocumentationConfig) -> Self {
        let mut eligible = vec![false; module.len()];
        // Children always come after their parent in the arena.
        for (index, entity) in module.iter() {
            let visible = config.include_non_public() || entity.visibility().is_api();
            let parent_eligible = entity
                .parent()
                .is_none_or(|parent| eligible[parent.index()]);
            eligible[index.index()] = visible && parent_eligible;
        }

        let mut published = vec![false; module.len()];
        for (index, entity) in module.iter().collect::<Vec<_>>().into_iter().rev() {
            if !eligible[index.index()] {
                continue;
            }
            published[index.index()] = matches!(entity.kind(), EntityKind::Module | EntityKind::Package)
                || !entity.documentation().is_empty()
                || config.include_undocumented()
                || entity
                    .children()
                    .iter()
                    .any(|child| published[child.index()]);
        }

        debug!(
            published = published.iter().filter(|&&p| p).count(),
            entities = module.len();
            "Publication computed"
        );
        Self { published }
    }

    pub fn is_published(&self, index: EntityIndex) -> bool {
        self.published[index.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tome_core::{
        declaration::{Declaration, SourceFragment},
        model::Visibility,
    };

    use crate::{build::Builder, config::AppConfig};

    fn module() -> DocumentationModule {
        let mut hidden = Declaration::new("Hidden", EntityKind::Class)
            .with_child(Declaration::new("run", EntityKind::Function).with_doc("Runs."));
        hidden.visibility = Visibility::Internal;
        let fragments = vec![
            SourceFragment::new("a.kt", "p")
                .with_declaration(Declaration::new("Documented", EntityKind::Class).with_doc("Hi."))
                .with_declaration(
                    Declaration::new("Bare", EntityKind::Class).with_child(
                        Declaration::new("size", EntityKind::Property).with_doc("Size."),
                    ),
                )
                .with_declaration(Declaration::new("Empty", EntityKind::Class))
                .with_declaration(hidden),
        ];
        Builder::new(&AppConfig::default()).build(&fragments, &[]).0
    }

    fn published(module: &DocumentationModule, publication: &Publication, dri: &str) -> bool {
        publication.is_published(module.find(dri).unwrap())
    }

    #[test]
    fn test_defaults_publish_public_entities() {
        let module = module();
        let publication = Publication::compute(&module, &DocumentationConfig::default());
        assert!(publication.is_published(module.root()));
        assert!(published(&module, &publication, "p.Documented"));
        assert!(published(&module, &publication, "p.Empty"));
        assert!(!published(&module, &publication, "p.Hidden"));
        assert!(!published(&module, &publication, "p.Hidden.run()"));
    }

    #[test]
    fn test_undocumented_kept_only_with_published_children() {
        let module = module();
        let config = DocumentationConfig::new(false, false, false);
        let publication = Publication::compute(&module, &config);
        assert!(published(&module, &publication, "p"));
        assert!(published(&module, &publication, "p.Documented"));
        assert!(published(&module, &publication, "p.Bare"));
        assert!(published(&module, &publication, "p.Bare.size"));
        assert!(!published(&module, &publication, "p.Empty"));
    }

    #[test]
    fn test_include_non_public() {
        let module = module();
        let config = DocumentationConfig::new(true, true, false);
        let publication = Publication::compute(&module, &config);
        assert!(published(&module, &publication, "p.Hidden"));
        assert!(published(&module, &publication, "p.Hidden.run()"));
    }
}
