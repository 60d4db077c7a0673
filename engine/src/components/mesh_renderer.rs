//! Mesh renderer component and material records

use crate::component_system::{Component, ComponentMetadata, ComponentRegistryExt};
use crate::io::component_registry::ComponentRegistry;
use scene_engine_derive::Component;
use serde::{Deserialize, Serialize};

/// A fully populated material record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaterialData {
    pub shader: String,
    /// Base color as a `#rrggbb` hex string
    pub color: String,
    pub metalness: f32,
    pub roughness: f32,
    pub emissive: String,
    pub emissive_intensity: f32,
    pub texture_offset_x: f32,
    pub texture_offset_y: f32,
    pub texture_repeat_x: f32,
    pub texture_repeat_y: f32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub albedo_texture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal_texture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissive_texture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occlusion_texture: Option<String>,
}

impl Default for MaterialData {
    fn default() -> Self {
        Self {
            shader: "standard".to_string(),
            color: "#cccccc".to_string(),
            metalness: 0.0,
            roughness: 0.5,
            emissive: "#000000".to_string(),
            emissive_intensity: 0.0,
            texture_offset_x: 0.0,
            texture_offset_y: 0.0,
            texture_repeat_x: 1.0,
            texture_repeat_y: 1.0,
            albedo_texture: None,
            normal_texture: None,
            emissive_texture: None,
            occlusion_texture: None,
        }
    }
}

impl MaterialData {
    /// This record with every field the override sets replaced
    pub fn merged(&self, patch: &MaterialOverride) -> MaterialData {
        let mut merged = self.clone();
        patch.apply_to(&mut merged);
        merged
    }
}

/// A partial material, every field optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MaterialOverride {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shader: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metalness: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roughness: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissive: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissive_intensity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture_offset_x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture_offset_y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture_repeat_x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub texture_repeat_y: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub albedo_texture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal_texture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emissive_texture: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occlusion_texture: Option<String>,
}

impl MaterialOverride {
    /// Write every set field into `target`, leaving the rest untouched
    pub fn apply_to(&self, target: &mut MaterialData) {
        fn set<T: Clone>(slot: &mut T, value: &Option<T>) {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
        fn set_opt<T: Clone>(slot: &mut Option<T>, value: &Option<T>) {
            if value.is_some() {
                *slot = value.clone();
            }
        }

        set(&mut target.shader, &self.shader);
        set(&mut target.color, &self.color);
        set(&mut target.metalness, &self.metalness);
        set(&mut target.roughness, &self.roughness);
        set(&mut target.emissive, &self.emissive);
        set(&mut target.emissive_intensity, &self.emissive_intensity);
        set(&mut target.texture_offset_x, &self.texture_offset_x);
        set(&mut target.texture_offset_y, &self.texture_offset_y);
        set(&mut target.texture_repeat_x, &self.texture_repeat_x);
        set(&mut target.texture_repeat_y, &self.texture_repeat_y);
        set_opt(&mut target.albedo_texture, &self.albedo_texture);
        set_opt(&mut target.normal_texture, &self.normal_texture);
        set_opt(&mut target.emissive_texture, &self.emissive_texture);
        set_opt(&mut target.occlusion_texture, &self.occlusion_texture);
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Mesh renderer component
///
/// A renderer points at a mesh by id or at an external model file, and at a
/// material by id, by a list of ids (one per submesh), or inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Component)]
#[serde(default, rename_all = "camelCase")]
pub struct MeshRenderer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mesh_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materials: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub material: Option<MaterialData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_path: Option<String>,
    pub enabled: bool,
    #[serde(alias = "cast_shadows")]
    pub cast_shadows: bool,
    #[serde(alias = "receive_shadows")]
    pub receive_shadows: bool,
}

impl Default for MeshRenderer {
    fn default() -> Self {
        Self {
            mesh_id: None,
            material_id: None,
            materials: None,
            material: None,
            model_path: None,
            enabled: true,
            cast_shadows: true,
            receive_shadows: true,
        }
    }
}

impl MeshRenderer {
    /// A renderer for the given mesh with the given material id
    pub fn new(mesh_id: impl Into<String>, material_id: impl Into<String>) -> Self {
        Self {
            mesh_id: Some(mesh_id.into()),
            material_id: Some(material_id.into()),
            ..Default::default()
        }
    }

    /// A renderer for an external model file
    pub fn from_model(model_path: impl Into<String>) -> Self {
        Self {
            model_path: Some(model_path.into()),
            ..Default::default()
        }
    }

    /// Material ids referenced by this renderer, single id first
    pub fn material_ids(&self) -> impl Iterator<Item = &str> {
        self.material_id
            .iter()
            .chain(self.materials.iter().flatten())
            .map(String::as_str)
    }
}
