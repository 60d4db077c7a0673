//! Declarative scene engine
//!
//! This crate wraps an entity store in declarative entity and component
//! nodes, and loads JSON scene, prefab and asset files through them.

pub mod component_system;
pub mod components;
pub mod config;
pub mod core;
pub mod declarative;
pub mod ecs;
pub mod io;

// Re-export commonly used types
pub mod prelude {
    // Entity store types
    pub use crate::ecs::{
        upsert_component, EntityId, EntityStore, SequentialIdGenerator, StableIdGenerator,
        StoreError, Upsert, UuidGenerator, WorldStore,
    };

    // Declarative wrappers
    pub use crate::declarative::{
        CameraMirror, EntityContext, EntityNode, EntityProps, InstancedMirror, LightMirror,
        MeshRendererMirror, MeshRendererProps, Mirror, Scope, SyncOutcome, TransformMirror,
    };

    // Component records
    pub use crate::components::{
        Camera, InstanceData, Instanced, Light, LightType, MaterialData, MaterialOverride,
        MeshRenderer, PersistentId, PrefabInstance, Rotation, Transform,
    };

    // Math types
    pub use glam::{Mat4, Quat, Vec3};

    // IO types
    pub use crate::io::{
        ComponentRegistry, EntityDescriptor, LoadedScene, SceneAssets, SceneCatalog,
        SceneDescriptor, SceneError, SceneLoader, SceneMetadata,
    };

    // Config types
    pub use crate::config::AssetConfig;
}

/// Initialize logging for the engine
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
