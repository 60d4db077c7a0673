//! Collaborator interface for entity and component storage
//!
//! Everything above this module (declarative wrappers, the scene loader)
//! talks to storage only through [`EntityStore`], so a test double or a
//! different ECS backend can be dropped in without touching callers.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::trace;

/// Opaque identifier of an entity inside an [`EntityStore`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Create an id from its raw value
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw value
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for EntityId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Errors reported by an [`EntityStore`]
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("entity {0} does not exist")]
    NoSuchEntity(EntityId),

    #[error("parent entity {0} does not exist")]
    UnknownParent(EntityId),

    #[error("entity {entity} already has a {kind} component")]
    ComponentExists { entity: EntityId, kind: String },

    #[error("entity {entity} has no {kind} component")]
    MissingComponent { entity: EntityId, kind: String },

    #[error("invalid {kind} data: {source}")]
    InvalidData {
        kind: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("store rejected the operation: {0}")]
    Rejected(String),
}

/// Entity and component storage consumed by the declarative layer
///
/// Component payloads cross this boundary as plain JSON values keyed by a
/// component kind name such as `"Transform"` or `"Light"`.
pub trait EntityStore {
    /// Create a new entity with a display name and an optional parent
    fn create_entity(&mut self, name: &str, parent: Option<EntityId>)
        -> Result<EntityId, StoreError>;

    /// Delete an entity and every component attached to it
    fn delete_entity(&mut self, id: EntityId) -> Result<(), StoreError>;

    /// Check whether an entity carries a component of the given kind
    fn has_component(&self, id: EntityId, kind: &str) -> bool;

    /// Attach a component the entity does not have yet
    fn add_component(&mut self, id: EntityId, kind: &str, data: Value) -> Result<(), StoreError>;

    /// Overwrite a component the entity already has
    fn update_component(&mut self, id: EntityId, kind: &str, data: Value)
        -> Result<(), StoreError>;

    /// Read a component back as JSON
    fn component(&self, id: EntityId, kind: &str) -> Option<Value>;
}

/// Which path an upsert took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Added,
    Updated,
}

/// Add the component if the entity lacks it, otherwise overwrite it
pub fn upsert_component(
    store: &mut dyn EntityStore,
    id: EntityId,
    kind: &str,
    data: Value,
) -> Result<Upsert, StoreError> {
    if store.has_component(id, kind) {
        store.update_component(id, kind, data)?;
        trace!(entity = %id, kind = kind, "Updated component");
        Ok(Upsert::Updated)
    } else {
        store.add_component(id, kind, data)?;
        trace!(entity = %id, kind = kind, "Added component");
        Ok(Upsert::Added)
    }
}
