//! Transform component

use crate::component_system::{Component, ComponentMetadata, ComponentRegistryExt};
use crate::io::component_registry::ComponentRegistry;
use glam::{EulerRot, Mat4, Quat, Vec3};
use scene_engine_derive::Component;
use serde::{Deserialize, Serialize};

/// Rotation as authored in scene files
///
/// Three values are Euler angles in degrees applied in XYZ order; four
/// values are an `[x, y, z, w]` quaternion. The authored form is kept on
/// write-back.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rotation {
    Euler([f32; 3]),
    Quat([f32; 4]),
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::Euler([0.0, 0.0, 0.0])
    }
}

impl Rotation {
    pub fn to_quat(&self) -> Quat {
        match *self {
            Rotation::Euler([x, y, z]) => Quat::from_euler(
                EulerRot::XYZ,
                x.to_radians(),
                y.to_radians(),
                z.to_radians(),
            ),
            Rotation::Quat(xyzw) => {
                let quat = Quat::from_array(xyzw);
                // A zero quaternion cannot be normalized
                if quat.length_squared() > f32::EPSILON {
                    quat.normalize()
                } else {
                    Quat::IDENTITY
                }
            }
        }
    }
}

impl From<[f32; 3]> for Rotation {
    fn from(degrees: [f32; 3]) -> Self {
        Rotation::Euler(degrees)
    }
}

impl From<[f32; 4]> for Rotation {
    fn from(xyzw: [f32; 4]) -> Self {
        Rotation::Quat(xyzw)
    }
}

/// Local position, rotation and scale of an entity
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Component)]
#[serde(default)]
pub struct Transform {
    pub position: [f32; 3],
    pub rotation: Rotation,
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation: Rotation::default(),
            scale: [1.0, 1.0, 1.0],
        }
    }
}

impl Transform {
    /// Create a transform at the given position
    pub fn from_position(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: impl Into<Rotation>) -> Self {
        self.rotation = rotation.into();
        self
    }

    pub fn with_scale(mut self, scale: [f32; 3]) -> Self {
        self.scale = scale;
        self
    }

    /// Rotation as a quaternion
    pub fn rotation_quat(&self) -> Quat {
        self.rotation.to_quat()
    }

    /// Convert this transform to a transformation matrix
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::from_array(self.scale),
            self.rotation_quat(),
            Vec3::from_array(self.position),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_default() {
        let transform = Transform::default();
        assert_eq!(transform.position, [0.0; 3]);
        assert_eq!(transform.rotation, Rotation::Euler([0.0; 3]));
        assert_eq!(transform.scale, [1.0; 3]);
    }

    #[test]
    fn test_transform_sparse_json() {
        let transform: Transform =
            serde_json::from_value(serde_json::json!({"position": [1.0, 2.0, 3.0]})).unwrap();
        assert_eq!(transform.position, [1.0, 2.0, 3.0]);
        assert_eq!(transform.scale, [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_transform_to_matrix() {
        let transform = Transform::from_position([1.0, 2.0, 3.0]).with_scale([2.0, 2.0, 2.0]);
        let matrix = transform.to_matrix();
        assert_eq!(matrix.w_axis.truncate(), Vec3::new(1.0, 2.0, 3.0));
        assert!((matrix.x_axis.truncate().length() - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_rotation_degrees() {
        let transform = Transform::default().with_rotation([0.0_f32, 90.0, 0.0]);
        let rotated = transform.rotation_quat() * Vec3::X;
        assert!((rotated - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_quaternion_rotation() {
        let transform: Transform = serde_json::from_value(serde_json::json!({
            "rotation": [0.0, 0.0, 0.0, 1.0]
        }))
        .unwrap();
        assert_eq!(transform.rotation, Rotation::Quat([0.0, 0.0, 0.0, 1.0]));
        assert_eq!(transform.rotation_quat(), Quat::IDENTITY);

        let half = std::f32::consts::FRAC_1_SQRT_2;
        let turned = Transform::default().with_rotation([0.0, half, 0.0, half]);
        let rotated = turned.rotation_quat() * Vec3::X;
        assert!((rotated - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);

        // Written back in the authored form
        let json = serde_json::to_value(transform).unwrap();
        assert_eq!(json["rotation"], serde_json::json!([0.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn test_rotation_wrong_length_rejected() {
        let result: Result<Transform, _> =
            serde_json::from_value(serde_json::json!({"rotation": [1.0, 2.0]}));
        assert!(result.is_err());
    }
}
