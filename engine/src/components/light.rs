//! Light component

use crate::component_system::{Component, ComponentMetadata, ComponentRegistryExt};
use crate::io::component_registry::ComponentRegistry;
use scene_engine_derive::Component;
use serde::{Deserialize, Serialize};

/// Kind of light source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightType {
    #[default]
    Directional,
    Point,
    Spot,
    Ambient,
}

/// RGB light color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for LightColor {
    fn default() -> Self {
        Self {
            r: 1.0,
            g: 1.0,
            b: 1.0,
        }
    }
}

/// Light source parameters
///
/// Direction is only meaningful for directional and spot lights, range and
/// decay for point and spot lights, angle and penumbra for spot lights. All
/// fields are always stored so switching `light_type` keeps the others.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Component)]
#[serde(default, rename_all = "camelCase")]
pub struct Light {
    pub light_type: LightType,
    pub color: LightColor,
    pub intensity: f32,
    pub enabled: bool,
    pub cast_shadow: bool,

    pub direction_x: f32,
    pub direction_y: f32,
    pub direction_z: f32,

    pub range: f32,
    pub decay: f32,
    /// Cone half-angle in radians
    pub angle: f32,
    pub penumbra: f32,

    pub shadow_map_size: u32,
    pub shadow_bias: f32,
    pub shadow_radius: f32,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            light_type: LightType::Directional,
            color: LightColor::default(),
            intensity: 1.0,
            enabled: true,
            cast_shadow: true,
            direction_x: 0.0,
            direction_y: -1.0,
            direction_z: 0.0,
            range: 10.0,
            decay: 1.0,
            angle: std::f32::consts::FRAC_PI_6,
            penumbra: 0.1,
            shadow_map_size: 2048,
            shadow_bias: -0.0001,
            shadow_radius: 2.0,
        }
    }
}

impl Light {
    /// A light of the given type with every other field at its default
    pub fn of_type(light_type: LightType) -> Self {
        Self {
            light_type,
            ..Default::default()
        }
    }

    pub fn direction(&self) -> glam::Vec3 {
        glam::Vec3::new(self.direction_x, self.direction_y, self.direction_z)
    }
}
