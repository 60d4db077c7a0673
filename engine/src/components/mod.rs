//! Component records attached to scene entities
//!
//! Every record derives [`Component`](crate::component_system::Component)
//! under the kind name scene files use, and fills missing JSON fields from
//! its `Default` so sparse data decodes.

pub mod camera;
pub mod instanced;
pub mod light;
pub mod mesh_renderer;
pub mod persistent_id;
pub mod prefab_instance;
pub mod transform;

pub use camera::{Camera, ClearFlags, ControlMode, ProjectionType, Rgba};
pub use instanced::{InstanceData, Instanced};
pub use light::{Light, LightColor, LightType};
pub use mesh_renderer::{MaterialData, MaterialOverride, MeshRenderer};
pub use persistent_id::PersistentId;
pub use prefab_instance::PrefabInstance;
pub use transform::{Rotation, Transform};
