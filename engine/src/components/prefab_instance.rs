//! Prefab link component

use crate::component_system::{Component, ComponentMetadata, ComponentRegistryExt};
use crate::io::component_registry::ComponentRegistry;
use scene_engine_derive::Component;
use serde::{Deserialize, Serialize};

/// Links a scene entity to the prefab it was instantiated from
///
/// `override_patch` maps component kinds to partial component data that is
/// deep-merged over the prefab's own data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Component)]
#[serde(default, rename_all = "camelCase")]
pub struct PrefabInstance {
    pub prefab_id: String,
    pub version: u32,
    pub instance_uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub override_patch: Option<serde_json::Value>,
}

impl Default for PrefabInstance {
    fn default() -> Self {
        Self {
            prefab_id: String::new(),
            version: 1,
            instance_uuid: String::new(),
            override_patch: None,
        }
    }
}

impl PrefabInstance {
    pub fn new(prefab_id: impl Into<String>, instance_uuid: impl Into<String>) -> Self {
        Self {
            prefab_id: prefab_id.into(),
            instance_uuid: instance_uuid.into(),
            ..Default::default()
        }
    }

    pub fn with_override(mut self, patch: serde_json::Value) -> Self {
        self.override_patch = Some(patch);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefab_instance_json() {
        let instance: PrefabInstance = serde_json::from_value(serde_json::json!({
            "prefabId": "tree",
            "instanceUuid": "abc"
        }))
        .unwrap();
        assert_eq!(instance.version, 1);
        assert_eq!(instance, PrefabInstance::new("tree", "abc"));

        let json = serde_json::to_value(
            PrefabInstance::new("tree", "abc").with_override(serde_json::json!({"Transform": {}})),
        )
        .unwrap();
        assert_eq!(json["prefabId"], "tree");
        assert!(json["overridePatch"]["Transform"].is_object());
    }
}
