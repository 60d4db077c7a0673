//! `hecs`-backed implementation of [`EntityStore`]

use super::store::{EntityId, EntityStore, StoreError};
use crate::component_system::ComponentRegistryExt;
use crate::core::entity::{Entity, ExtraComponents, Name, Parent, World};
use crate::io::component_registry::ComponentRegistry;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, trace};

/// Entity store over a [`World`]
///
/// Component kinds with registered metadata are decoded into their typed
/// records, so sparse data picks up defaults. Any other kind is kept verbatim
/// in the entity's [`ExtraComponents`]. Decode-only kinds are validated
/// before they are kept.
pub struct WorldStore {
    world: World,
    registry: ComponentRegistry,
    entities: BTreeMap<EntityId, Entity>,
    ids: HashMap<Entity, EntityId>,
    next_id: u32,
}

impl Default for WorldStore {
    fn default() -> Self {
        Self::new(ComponentRegistry::with_default_components())
    }
}

impl WorldStore {
    /// Create an empty store decoding components through `registry`
    pub fn new(registry: ComponentRegistry) -> Self {
        Self {
            world: World::new(),
            registry,
            entities: BTreeMap::new(),
            ids: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Read access to the backing world
    pub fn world(&self) -> &World {
        &self.world
    }

    /// The world entity behind an id
    pub fn entity(&self, id: EntityId) -> Option<Entity> {
        self.entities.get(&id).copied()
    }

    /// All live entity ids in creation order
    pub fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Display name given at creation
    pub fn name(&self, id: EntityId) -> Option<String> {
        let entity = self.entity(id)?;
        let name = self.world.get::<Name>(entity).ok()?;
        Some(name.0.clone())
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        let entity = self.entity(id)?;
        let parent = self.world.get::<Parent>(entity).ok()?.0;
        self.ids.get(&parent).copied()
    }

    /// Direct children in creation order
    pub fn children(&self, id: EntityId) -> Vec<EntityId> {
        let Some(entity) = self.entity(id) else {
            return Vec::new();
        };
        let mut children: Vec<EntityId> = self
            .world
            .children_of(entity)
            .into_iter()
            .filter_map(|child| self.ids.get(&child).copied())
            .collect();
        children.sort_unstable();
        children
    }

    /// Entities without a parent, in creation order
    pub fn roots(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|(_, entity)| !self.world.has::<Parent>(**entity))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Every component kind an entity carries, sorted by name
    pub fn component_kinds(&self, id: EntityId) -> Vec<String> {
        let Some(entity) = self.entity(id) else {
            return Vec::new();
        };
        let mut kinds: Vec<String> = self
            .registry
            .iter_metadata()
            .filter(|metadata| (metadata.contains)(&self.world, entity))
            .map(|metadata| metadata.name.to_string())
            .collect();
        if let Ok(extras) = self.world.get::<ExtraComponents>(entity) {
            kinds.extend(extras.iter().map(|(kind, _)| kind.to_string()));
        }
        kinds.sort_unstable();
        kinds
    }

    /// All components of an entity as `kind -> data`
    pub fn components(&self, id: EntityId) -> BTreeMap<String, Value> {
        self.component_kinds(id)
            .into_iter()
            .filter_map(|kind| {
                let data = self.component(id, &kind)?;
                Some((kind, data))
            })
            .collect()
    }

    fn resolve(&self, id: EntityId) -> Result<Entity, StoreError> {
        self.entity(id).ok_or(StoreError::NoSuchEntity(id))
    }

    /// Decode and write a component, replacing any existing instance
    fn write_component(
        &mut self,
        id: EntityId,
        entity: Entity,
        kind: &str,
        data: Value,
    ) -> Result<(), StoreError> {
        if let Some(metadata) = self.registry.get_metadata_by_name(kind) {
            return (metadata.insert)(&mut self.world, entity, &data).map_err(|source| {
                StoreError::InvalidData {
                    kind: kind.to_string(),
                    source,
                }
            });
        }

        if self.registry.is_registered(kind) {
            self.registry
                .deserialize_component(kind, &data)
                .map_err(|source| StoreError::InvalidData {
                    kind: kind.to_string(),
                    source,
                })?;
        }

        if let Ok(extras) = self.world.query_one_mut::<&mut ExtraComponents>(entity) {
            extras.insert(kind, data);
            return Ok(());
        }
        let mut extras = ExtraComponents::default();
        extras.insert(kind, data);
        self.world
            .insert_one(entity, extras)
            .map_err(|_| StoreError::NoSuchEntity(id))
    }
}

impl EntityStore for WorldStore {
    fn create_entity(
        &mut self,
        name: &str,
        parent: Option<EntityId>,
    ) -> Result<EntityId, StoreError> {
        let parent_entity = match parent {
            Some(parent_id) => Some(
                self.entity(parent_id)
                    .ok_or(StoreError::UnknownParent(parent_id))?,
            ),
            None => None,
        };

        let entity = self.world.spawn_named(name, parent_entity);
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.entities.insert(id, entity);
        self.ids.insert(entity, id);

        debug!(entity = %id, name = name, parent = ?parent.map(EntityId::raw), "Created entity");
        Ok(id)
    }

    fn delete_entity(&mut self, id: EntityId) -> Result<(), StoreError> {
        let entity = self.resolve(id)?;
        let subtree = self.world.subtree(entity);

        for doomed in subtree.iter().rev() {
            self.world
                .despawn(*doomed)
                .map_err(|_| StoreError::NoSuchEntity(id))?;
            if let Some(doomed_id) = self.ids.remove(doomed) {
                self.entities.remove(&doomed_id);
                trace!(entity = %doomed_id, "Despawned entity");
            }
        }

        debug!(entity = %id, removed = subtree.len(), "Deleted entity");
        Ok(())
    }

    fn has_component(&self, id: EntityId, kind: &str) -> bool {
        let Some(entity) = self.entity(id) else {
            return false;
        };
        match self.registry.get_metadata_by_name(kind) {
            Some(metadata) => (metadata.contains)(&self.world, entity),
            None => self
                .world
                .get::<ExtraComponents>(entity)
                .map(|extras| extras.contains(kind))
                .unwrap_or(false),
        }
    }

    fn add_component(&mut self, id: EntityId, kind: &str, data: Value) -> Result<(), StoreError> {
        let entity = self.resolve(id)?;
        if self.has_component(id, kind) {
            return Err(StoreError::ComponentExists {
                entity: id,
                kind: kind.to_string(),
            });
        }
        self.write_component(id, entity, kind, data)
    }

    fn update_component(
        &mut self,
        id: EntityId,
        kind: &str,
        data: Value,
    ) -> Result<(), StoreError> {
        let entity = self.resolve(id)?;
        if !self.has_component(id, kind) {
            return Err(StoreError::MissingComponent {
                entity: id,
                kind: kind.to_string(),
            });
        }
        self.write_component(id, entity, kind, data)
    }

    fn component(&self, id: EntityId, kind: &str) -> Option<Value> {
        let entity = self.entity(id)?;
        match self.registry.get_metadata_by_name(kind) {
            Some(metadata) => (metadata.extract)(&self.world, entity),
            None => {
                let extras = self.world.get::<ExtraComponents>(entity).ok()?;
                extras.get(kind).cloned()
            }
        }
    }
}
