//! Entity context handed down the declaration tree

use crate::ecs::EntityId;

/// The active entity as seen by nested wrappers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityContext {
    pub entity_id: EntityId,
    pub entity_name: String,
    pub stable_id: String,
}

/// Raised when a wrapper that needs an entity is used outside of one
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    #[error("entity context required but no entity scope is active")]
    MissingEntity,
}

/// Scoped value passed to descendants
///
/// A scope carries the innermost established entity, if any. Scopes are
/// plain values: nesting is expressed by handing a child scope down rather
/// than through global state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    entity: Option<EntityContext>,
}

impl Scope {
    /// The outermost scope, with no entity
    pub fn root() -> Self {
        Self::default()
    }

    /// A scope exposing `context` to everything below it
    pub fn with_entity(context: EntityContext) -> Self {
        Self {
            entity: Some(context),
        }
    }

    /// The active entity, failing if there is none
    pub fn require_entity(&self) -> Result<&EntityContext, ContextError> {
        self.entity.as_ref().ok_or(ContextError::MissingEntity)
    }

    /// The active entity, if there is one
    pub fn try_entity(&self) -> Option<&EntityContext> {
        self.entity.as_ref()
    }
}
