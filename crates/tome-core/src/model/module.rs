//! The documentation module: an arena of entities rooted at the module entity.

use serde::Serialize;

use crate::{
    identifier::Id,
    model::{Dri, Entity, EntityKind},
};

/// Index of an entity inside its [`DocumentationModule`].
///
/// Indices are assigned in insertion order and are only meaningful for the
/// module that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EntityIndex(usize);

impl EntityIndex {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// The root of the documentation model.
///
/// Entities live in an arena; the ownership tree is recorded through each
/// entity's parent and ordered children. [`DocumentationModule::insert_child`]
/// is the only way to add an entity, so every entity except the root has
/// exactly one parent and the tree cannot contain cycles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentationModule {
    name: String,
    entities: Vec<Entity>,
}

impl DocumentationModule {
    /// Create a module containing only its root entity.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let root = Entity::new(Dri::new(Id::new(&name), None), name.clone(), EntityKind::Module);
        Self {
            name,
            entities: vec![root],
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> EntityIndex {
        EntityIndex(0)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.len() <= 1
    }

    /// Get an entity by index.
    ///
    /// # Panics
    ///
    /// Panics if `index` was produced by a different module.
    pub fn entity(&self, index: EntityIndex) -> &Entity {
        &self.entities[index.0]
    }

    pub fn entity_mut(&mut self, index: EntityIndex) -> &mut Entity {
        &mut self.entities[index.0]
    }

    /// Insert `entity` as the last child of `parent` and return its index.
    pub fn insert_child(&mut self, parent: EntityIndex, mut entity: Entity) -> EntityIndex {
        let index = EntityIndex(self.entities.len());
        entity.set_parent(parent);
        self.entities.push(entity);
        self.entities[parent.0].push_child(index);
        index
    }

    /// All entities in insertion order, root first.
    pub fn iter(&self) -> impl Iterator<Item = (EntityIndex, &Entity)> {
        self.entities
            .iter()
            .enumerate()
            .map(|(i, entity)| (EntityIndex(i), entity))
    }

    pub fn indices(&self) -> impl Iterator<Item = EntityIndex> + use<> {
        (0..self.entities.len()).map(EntityIndex)
    }

    /// The chain from `index` up to the root, starting with `index` itself.
    pub fn ancestry(&self, index: EntityIndex) -> Vec<EntityIndex> {
        let mut chain = vec![index];
        let mut current = index;
        while let Some(parent) = self.entity(current).parent() {
            chain.push(parent);
            current = parent;
        }
        chain
    }

    /// Find an entity by the display form of its [`Dri`], e.g. `p.C` or
    /// `p.foo(Int)`.
    pub fn find(&self, dri: &str) -> Option<EntityIndex> {
        self.iter()
            .find(|(_, entity)| entity.dri().to_string() == dri)
            .map(|(index, _)| index)
    }

    /// Count of reference slots still pending across the model.
    pub fn pending_references(&self) -> usize {
        self.entities.iter().map(Entity::pending_references).sum()
    }
}
