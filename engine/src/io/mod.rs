//! Input/Output module for scene, prefab and asset data

pub mod assets;
pub mod catalog;
pub mod component_registry;
mod entity_mapper;
pub mod input_actions;
pub mod loader;
pub mod prefab;
mod scene;
pub mod validation;

pub use assets::{MaterialDefinition, SceneAssets};
pub use catalog::{SceneCatalog, SceneSource};
pub use component_registry::ComponentRegistry;
pub use entity_mapper::EntityMapper;
pub use input_actions::{ActionMap, ActionType, Binding, InputAction, InputActionAsset};
pub use loader::{LoadedScene, SceneLoader};
pub use prefab::{
    apply_override_patch, compose_transforms, merge_json, PrefabDescriptor, PrefabEntity,
    PrefabRegistry,
};
pub use scene::{
    AssetReferences, EntityDescriptor, SceneDescriptor, SceneEntityId, SceneError, SceneMetadata,
};
pub use validation::{validate_identities, validate_scene, ValidationIssue, ValidationReport};
