//! World wrapper providing helper methods for entity management

use super::components::{Name, Parent};
use hecs::Entity;
use tracing::debug;

/// Wrapper around hecs::World providing additional helper methods
pub struct World {
    inner: hecs::World,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// Create a new empty world
    pub fn new() -> Self {
        Self {
            inner: hecs::World::new(),
        }
    }

    /// Spawn a new entity with the given components
    pub fn spawn(&mut self, components: impl hecs::DynamicBundle) -> Entity {
        self.inner.spawn(components)
    }

    /// Spawn a named entity, optionally below a parent
    pub fn spawn_named(&mut self, name: &str, parent: Option<Entity>) -> Entity {
        let entity = match parent {
            Some(parent) => self.inner.spawn((Name::new(name), Parent(parent))),
            None => self.inner.spawn((Name::new(name),)),
        };
        debug!(entity = ?entity, name = name, parent = ?parent, "Spawned named entity");
        entity
    }

    /// Get a reference to a component on an entity
    pub fn get<T: hecs::Component>(
        &self,
        entity: Entity,
    ) -> Result<hecs::Ref<'_, T>, hecs::ComponentError> {
        self.inner.get::<&T>(entity)
    }

    /// Check whether an entity carries a component
    pub fn has<T: hecs::Component>(&self, entity: Entity) -> bool {
        self.inner.get::<&T>(entity).is_ok()
    }

    /// Query a single entity for a mutable component reference
    pub fn query_one_mut<Q: hecs::Query>(
        &mut self,
        entity: Entity,
    ) -> Result<Q::Item<'_>, hecs::QueryOneError> {
        self.inner.query_one_mut::<Q>(entity)
    }

    /// Insert a component into an entity, replacing any existing one
    pub fn insert_one(
        &mut self,
        entity: Entity,
        component: impl hecs::Component,
    ) -> Result<(), hecs::NoSuchEntity> {
        self.inner.insert_one(entity, component)
    }

    /// Remove a component from an entity
    pub fn remove_one<T: hecs::Component>(
        &mut self,
        entity: Entity,
    ) -> Result<T, hecs::ComponentError> {
        self.inner.remove_one::<T>(entity)
    }

    /// Query entities with specific components
    pub fn query<Q: hecs::Query>(&self) -> hecs::QueryBorrow<'_, Q> {
        self.inner.query()
    }

    /// Despawn an entity and all its components
    pub fn despawn(&mut self, entity: Entity) -> Result<(), hecs::NoSuchEntity> {
        self.inner.despawn(entity)
    }

    /// Check if an entity exists
    pub fn contains(&self, entity: Entity) -> bool {
        self.inner.contains(entity)
    }

    /// Direct children of an entity
    pub fn children_of(&self, parent: Entity) -> Vec<Entity> {
        self.inner
            .query::<&Parent>()
            .iter()
            .filter(|(_, p)| p.0 == parent)
            .map(|(entity, _)| entity)
            .collect()
    }

    /// An entity followed by all of its descendants, parents before children
    pub fn subtree(&self, root: Entity) -> Vec<Entity> {
        let mut order = vec![root];
        let mut cursor = 0;
        while cursor < order.len() {
            let children = self.children_of(order[cursor]);
            order.extend(children.into_iter().filter(|c| *c != root));
            cursor += 1;
        }
        order
    }

    /// Number of live entities
    pub fn len(&self) -> u32 {
        self.inner.len()
    }

    /// Check if the world has no entities
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Get access to the inner hecs::World for advanced operations
    pub fn inner(&self) -> &hecs::World {
        &self.inner
    }

    /// Get mutable access to the inner hecs::World for advanced operations
    pub fn inner_mut(&mut self) -> &mut hecs::World {
        &mut self.inner
    }
}
