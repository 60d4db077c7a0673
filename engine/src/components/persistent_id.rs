//! Stable identity component

use crate::component_system::{Component, ComponentMetadata, ComponentRegistryExt};
use crate::io::component_registry::ComponentRegistry;
use scene_engine_derive::Component;
use serde::{Deserialize, Serialize};

/// Identity that survives save and reload, unlike the store's entity id
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Component)]
pub struct PersistentId {
    pub id: String,
}

impl PersistentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
