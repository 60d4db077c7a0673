//! Camera component

use crate::component_system::{Component, ComponentMetadata, ComponentRegistryExt};
use crate::io::component_registry::ComponentRegistry;
use scene_engine_derive::Component;
use serde::{Deserialize, Serialize};

/// Projection mode for a camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectionType {
    #[default]
    Perspective,
    Orthographic,
}

/// What a camera clears its target to before drawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClearFlags {
    #[default]
    Skybox,
    SolidColor,
    DepthOnly,
    DontClear,
}

/// How a camera responds to user input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlMode {
    Locked,
    Free,
}

/// RGBA color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Default for Rgba {
    fn default() -> Self {
        Self {
            r: 0.0,
            g: 0.0,
            b: 0.0,
            a: 1.0,
        }
    }
}

/// Camera projection, clear behavior, skybox and follow parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Component)]
#[serde(default, rename_all = "camelCase")]
pub struct Camera {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub is_main: bool,
    pub projection_type: ProjectionType,
    /// Half-height of the view volume in orthographic mode
    pub orthographic_size: f32,
    /// Render order among cameras, lower first
    pub depth: i32,

    pub clear_flags: ClearFlags,
    pub background_color: Rgba,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub skybox_texture: Option<String>,
    pub skybox_scale: [f32; 3],
    pub skybox_rotation: [f32; 3],
    pub skybox_repeat: [f32; 2],
    pub skybox_offset: [f32; 2],
    pub skybox_intensity: f32,
    pub skybox_blur: f32,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub control_mode: Option<ControlMode>,
    pub enable_smoothing: bool,
    /// Entity the camera tracks, by scene-local id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_target: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub follow_offset: Option<[f32; 3]>,
    pub smoothing_speed: f32,
    pub rotation_smoothing: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            fov: 60.0,
            near: 0.1,
            far: 100.0,
            is_main: false,
            projection_type: ProjectionType::Perspective,
            orthographic_size: 10.0,
            depth: 0,
            clear_flags: ClearFlags::Skybox,
            background_color: Rgba::default(),
            skybox_texture: None,
            skybox_scale: [1.0, 1.0, 1.0],
            skybox_rotation: [0.0, 0.0, 0.0],
            skybox_repeat: [1.0, 1.0],
            skybox_offset: [0.0, 0.0],
            skybox_intensity: 1.0,
            skybox_blur: 0.0,
            control_mode: None,
            enable_smoothing: false,
            follow_target: None,
            follow_offset: None,
            smoothing_speed: 5.0,
            rotation_smoothing: 5.0,
        }
    }
}

impl Camera {
    /// A perspective camera marked as the main camera
    pub fn main() -> Self {
        Self {
            is_main: true,
            ..Default::default()
        }
    }

    pub fn is_orthographic(&self) -> bool {
        self.projection_type == ProjectionType::Orthographic
    }

    /// Projection matrix for the given aspect ratio, right-handed
    pub fn projection_matrix(&self, aspect_ratio: f32) -> glam::Mat4 {
        match self.projection_type {
            ProjectionType::Perspective => glam::Mat4::perspective_rh(
                self.fov.to_radians(),
                aspect_ratio,
                self.near,
                self.far,
            ),
            ProjectionType::Orthographic => {
                let half_height = self.orthographic_size;
                let half_width = half_height * aspect_ratio;
                glam::Mat4::orthographic_rh(
                    -half_width,
                    half_width,
                    -half_height,
                    half_height,
                    self.near,
                    self.far,
                )
            }
        }
    }
}
