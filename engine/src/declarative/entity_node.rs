//! Entity wrapper: owns one store entity for the lifetime of a mount

use super::context::{EntityContext, Scope};
use crate::components::PersistentId;
use crate::ecs::{upsert_component, EntityId, EntityStore, StableIdGenerator};
use tracing::{debug, error, warn};

/// Declared properties of an entity
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityProps {
    pub name: String,
    pub parent_id: Option<EntityId>,
    /// Explicit stable identity; generated on mount when absent
    pub stable_id: Option<String>,
}

impl EntityProps {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_parent(mut self, parent_id: EntityId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Parent the entity under whatever entity `scope` exposes
    pub fn in_scope(mut self, scope: &Scope) -> Self {
        self.parent_id = scope.try_entity().map(|context| context.entity_id);
        self
    }

    pub fn with_stable_id(mut self, stable_id: impl Into<String>) -> Self {
        self.stable_id = Some(stable_id.into());
        self
    }
}

/// Creates its entity on mount, deletes it on unmount
///
/// Creation is guarded by a latch: however many times `mount` runs during one
/// activation, the store sees a single create. `unmount` clears the latch.
/// Store failures are logged and never returned; a node whose entity could
/// not be established exposes no context, so nothing nests under it.
#[derive(Debug)]
pub struct EntityNode {
    props: EntityProps,
    latched: bool,
    entity_id: Option<EntityId>,
    context: Option<EntityContext>,
}

impl EntityNode {
    pub fn new(props: EntityProps) -> Self {
        Self {
            props,
            latched: false,
            entity_id: None,
            context: None,
        }
    }

    pub fn props(&self) -> &EntityProps {
        &self.props
    }

    /// Create the entity and its identity, at most once per activation
    pub fn mount(
        &mut self,
        store: &mut dyn EntityStore,
        ids: &dyn StableIdGenerator,
    ) -> Option<&EntityContext> {
        if self.latched {
            return self.context.as_ref();
        }
        self.latched = true;

        let entity_id = match store.create_entity(&self.props.name, self.props.parent_id) {
            Ok(id) => id,
            Err(err) => {
                error!(name = %self.props.name, error = %err, "Failed to create entity");
                return None;
            }
        };
        self.entity_id = Some(entity_id);

        let stable_id = match &self.props.stable_id {
            Some(explicit) => explicit.clone(),
            None => ids.generate(),
        };
        let identity = match serde_json::to_value(PersistentId::new(stable_id.clone())) {
            Ok(value) => value,
            Err(err) => {
                error!(entity = %entity_id, error = %err, "Failed to encode persistent id");
                return None;
            }
        };
        if let Err(err) = upsert_component(store, entity_id, "PersistentId", identity) {
            error!(entity = %entity_id, error = %err, "Failed to write persistent id");
            return None;
        }

        debug!(entity = %entity_id, name = %self.props.name, stable_id = %stable_id, "Mounted entity");
        self.context = Some(EntityContext {
            entity_id,
            entity_name: self.props.name.clone(),
            stable_id,
        });
        self.context.as_ref()
    }

    /// Delete the entity if one was obtained and clear the latch
    pub fn unmount(&mut self, store: &mut dyn EntityStore) {
        if let Some(entity_id) = self.entity_id.take() {
            match store.delete_entity(entity_id) {
                Ok(()) => debug!(entity = %entity_id, "Unmounted entity"),
                Err(err) => warn!(entity = %entity_id, error = %err, "Failed to delete entity"),
            }
        }
        self.context = None;
        self.latched = false;
    }

    /// The published context, once entity and identity are established
    pub fn context(&self) -> Option<&EntityContext> {
        self.context.as_ref()
    }

    /// Scope for descendants; `None` keeps them unrendered
    pub fn child_scope(&self) -> Option<Scope> {
        self.context.clone().map(Scope::with_entity)
    }

    /// The created entity, even if publishing its context failed
    pub fn entity_id(&self) -> Option<EntityId> {
        self.entity_id
    }

    pub fn is_mounted(&self) -> bool {
        self.latched
    }
}
