//! Entity ID mapping for scene loading

use super::scene::SceneEntityId;
use crate::ecs::EntityId;
use std::collections::HashMap;
use tracing::debug;

/// Maps scene-local entity ids to the store entities created for them
///
/// When a scene is loaded, `id` and `parentId` values from the file need to
/// be translated into the ids the store handed out. This mapper maintains
/// that relationship for the lifetime of the loaded scene.
#[derive(Debug, Default)]
pub struct EntityMapper {
    mapping: HashMap<SceneEntityId, EntityId>,
}

impl EntityMapper {
    /// Create a new empty entity mapper
    pub fn new() -> Self {
        Self {
            mapping: HashMap::new(),
        }
    }

    /// Register a mapping from a scene id to a store entity
    pub fn register(&mut self, scene_id: SceneEntityId, entity: EntityId) {
        debug!(scene_id = %scene_id, entity = %entity, "Registering entity mapping");
        self.mapping.insert(scene_id, entity);
    }

    /// Look up the store entity for a scene id
    ///
    /// # Returns
    /// The entity if found, or None if the id wasn't registered
    pub fn remap(&self, scene_id: &SceneEntityId) -> Option<EntityId> {
        self.mapping.get(scene_id).copied()
    }

    /// Get the number of mapped entities
    pub fn len(&self) -> usize {
        self.mapping.len()
    }

    /// Check if the mapper is empty
    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty()
    }

    /// Get an iterator over all (scene id, entity) pairs
    pub fn iter(&self) -> impl Iterator<Item = (&SceneEntityId, EntityId)> + '_ {
        self.mapping.iter().map(|(id, &entity)| (id, entity))
    }

    /// Scene id an entity was created for
    pub fn scene_id_of(&self, entity: EntityId) -> Option<&SceneEntityId> {
        self.mapping
            .iter()
            .find(|(_, mapped)| **mapped == entity)
            .map(|(id, _)| id)
    }

    /// Clear all mappings
    pub fn clear(&mut self) {
        self.mapping.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_mapper_basic() {
        let mut mapper = EntityMapper::new();
        assert!(mapper.is_empty());
        assert_eq!(mapper.len(), 0);

        mapper.register(SceneEntityId::Number(42), EntityId::new(1));

        assert!(!mapper.is_empty());
        assert_eq!(mapper.len(), 1);
        assert_eq!(
            mapper.remap(&SceneEntityId::Number(42)),
            Some(EntityId::new(1))
        );
        assert_eq!(mapper.remap(&SceneEntityId::Number(99)), None);
    }

    #[test]
    fn test_entity_mapper_mixed_ids() {
        let mut mapper = EntityMapper::new();
        mapper.register(SceneEntityId::Number(1), EntityId::new(10));
        mapper.register(SceneEntityId::from("1"), EntityId::new(20));

        assert_eq!(mapper.len(), 2);
        assert_eq!(
            mapper.remap(&SceneEntityId::Number(1)),
            Some(EntityId::new(10))
        );
        assert_eq!(mapper.remap(&SceneEntityId::from("1")), Some(EntityId::new(20)));
        assert_eq!(
            mapper.scene_id_of(EntityId::new(20)),
            Some(&SceneEntityId::from("1"))
        );
    }

    #[test]
    fn test_entity_mapper_clear() {
        let mut mapper = EntityMapper::new();
        mapper.register(SceneEntityId::Number(1), EntityId::new(1));
        mapper.register(SceneEntityId::Number(2), EntityId::new(2));

        assert_eq!(mapper.iter().count(), 2);
        mapper.clear();
        assert!(mapper.is_empty());
    }

    #[test]
    fn test_entity_mapper_overwrite() {
        let mut mapper = EntityMapper::new();
        mapper.register(SceneEntityId::Number(1), EntityId::new(1));
        mapper.register(SceneEntityId::Number(1), EntityId::new(2));

        assert_eq!(mapper.len(), 1);
        assert_eq!(
            mapper.remap(&SceneEntityId::Number(1)),
            Some(EntityId::new(2))
        );
    }
}
