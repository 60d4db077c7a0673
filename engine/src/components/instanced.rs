//! Instanced rendering component

use crate::component_system::{Component, ComponentMetadata, ComponentRegistryExt};
use crate::io::component_registry::ComponentRegistry;
use scene_engine_derive::Component;
use serde::{Deserialize, Serialize};

/// Per-instance transform and tint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceData {
    pub position: [f32; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_data: Option<serde_json::Value>,
}

impl InstanceData {
    pub fn at(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }
}

/// Many copies of one mesh and material drawn in a single batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Component)]
#[serde(default, rename_all = "camelCase")]
pub struct Instanced {
    pub enabled: bool,
    /// Upper bound on `instances.len()`
    pub capacity: usize,
    pub base_mesh_id: String,
    pub base_material_id: String,
    pub instances: Vec<InstanceData>,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
    #[serde(alias = "frustum_culled")]
    pub frustum_culled: bool,
}

impl Default for Instanced {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 100,
            base_mesh_id: String::new(),
            base_material_id: String::new(),
            instances: Vec::new(),
            cast_shadows: true,
            receive_shadows: true,
            frustum_culled: true,
        }
    }
}

impl Instanced {
    pub fn new(base_mesh_id: impl Into<String>, base_material_id: impl Into<String>) -> Self {
        Self {
            base_mesh_id: base_mesh_id.into(),
            base_material_id: base_material_id.into(),
            ..Default::default()
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Whether the instance list fits the declared capacity
    pub fn within_capacity(&self) -> bool {
        self.instances.len() <= self.capacity
    }

    /// Append an instance, refusing once capacity is reached
    pub fn push_instance(&mut self, instance: InstanceData) -> bool {
        if self.instances.len() >= self.capacity {
            return false;
        }
        self.instances.push(instance);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instanced_defaults() {
        let instanced = Instanced::default();
        assert!(instanced.enabled);
        assert_eq!(instanced.capacity, 100);
        assert!(instanced.frustum_culled);
        assert!(instanced.instances.is_empty());
    }

    #[test]
    fn test_push_respects_capacity() {
        let mut instanced = Instanced::new("tree", "bark").with_capacity(2);
        assert!(instanced.push_instance(InstanceData::at([0.0, 0.0, 0.0])));
        assert!(instanced.push_instance(InstanceData::at([1.0, 0.0, 0.0])));
        assert!(!instanced.push_instance(InstanceData::at([2.0, 0.0, 0.0])));
        assert_eq!(instanced.instances.len(), 2);
        assert!(instanced.within_capacity());
    }

    #[test]
    fn test_over_capacity_data_detected() {
        let instanced: Instanced = serde_json::from_value(serde_json::json!({
            "baseMeshId": "rock",
            "capacity": 1,
            "instances": [{"position": [0, 0, 0]}, {"position": [1, 0, 0], "scale": [2, 2, 2]}]
        }))
        .unwrap();
        assert!(!instanced.within_capacity());
        assert_eq!(instanced.instances[1].scale, Some([2.0, 2.0, 2.0]));
    }

    #[test]
    fn test_frustum_culled_wire_names() {
        let snake: Instanced =
            serde_json::from_value(serde_json::json!({"frustum_culled": false})).unwrap();
        assert!(!snake.frustum_culled);
        let camel: Instanced =
            serde_json::from_value(serde_json::json!({"frustumCulled": false})).unwrap();
        assert!(!camel.frustum_culled);
    }
}
