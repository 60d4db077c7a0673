//! Modular component system with automatic registration
//!
//! Each component record registers a [`ComponentMetadata`] with type-erased
//! JSON conversion and world hooks, so storage code can handle component
//! kinds by name without matching on concrete types.

use crate::core::entity::World;
use crate::io::component_registry::ComponentRegistry;
use serde::{de::DeserializeOwned, Serialize};
use std::any::{Any, TypeId};
use std::sync::Arc;

/// Boxed error used by the type-erased hooks
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Type alias for component serializer function
pub type SerializerFn = Arc<dyn Fn(&dyn Any) -> Result<serde_json::Value, BoxError> + Send + Sync>;

/// Type alias for component deserializer function
pub type DeserializerFn =
    Arc<dyn Fn(&serde_json::Value) -> Result<Box<dyn Any>, BoxError> + Send + Sync>;

/// Decode JSON and insert it into an entity, replacing any existing instance
pub type InsertFn =
    Arc<dyn Fn(&mut World, hecs::Entity, &serde_json::Value) -> Result<(), BoxError> + Send + Sync>;

/// Check whether an entity carries the component
pub type ContainsFn = Arc<dyn Fn(&World, hecs::Entity) -> bool + Send + Sync>;

/// Read the component back as JSON
pub type ExtractFn = Arc<dyn Fn(&World, hecs::Entity) -> Option<serde_json::Value> + Send + Sync>;

/// Remove the component, reporting whether it was present
pub type RemoveFn = Arc<dyn Fn(&mut World, hecs::Entity) -> bool + Send + Sync>;

/// Trait for components that can be automatically registered and managed
pub trait Component: Any + Send + Sync + 'static {
    /// Get the name of this component type
    fn component_name() -> &'static str
    where
        Self: Sized;

    /// Register this component type with the registry
    fn register(registry: &mut ComponentRegistry)
    where
        Self: Sized;
}

/// Metadata for a component type including serialization and world hooks
pub struct ComponentMetadata {
    /// The kind name of the component as it appears in scene files
    pub name: &'static str,

    /// The TypeId of the component
    pub type_id: TypeId,

    /// Function to serialize the component to JSON
    pub serializer: SerializerFn,

    /// Function to deserialize the component from JSON
    pub deserializer: DeserializerFn,

    /// Function to decode JSON straight into an entity
    pub insert: InsertFn,

    /// Function to test an entity for the component
    pub contains: ContainsFn,

    /// Function to read the component back as JSON
    pub extract: ExtractFn,

    /// Function to remove the component from an entity
    pub remove: RemoveFn,
}

impl ComponentMetadata {
    /// Create metadata for a component type that implements Serialize, Deserialize, and Default
    pub fn new<T>(name: &'static str) -> Self
    where
        T: Component + Serialize + DeserializeOwned + Default + 'static,
    {
        Self {
            name,
            type_id: TypeId::of::<T>(),
            serializer: Arc::new(|component: &dyn Any| {
                let typed_component = component
                    .downcast_ref::<T>()
                    .ok_or("Failed to downcast component for serialization")?;
                serde_json::to_value(typed_component).map_err(|e| Box::new(e) as BoxError)
            }),
            deserializer: Arc::new(|value: &serde_json::Value| {
                let component: T =
                    serde_json::from_value(value.clone()).map_err(|e| Box::new(e) as BoxError)?;
                Ok::<Box<dyn Any>, BoxError>(Box::new(component))
            }),
            insert: Arc::new(
                |world: &mut World, entity: hecs::Entity, value: &serde_json::Value| {
                    let component: T = serde_json::from_value(value.clone())
                        .map_err(|e| Box::new(e) as BoxError)?;
                    world
                        .insert_one(entity, component)
                        .map_err(|e| Box::new(e) as BoxError)
                },
            ),
            contains: Arc::new(|world: &World, entity: hecs::Entity| world.has::<T>(entity)),
            extract: Arc::new(|world: &World, entity: hecs::Entity| {
                let component = world.get::<T>(entity).ok()?;
                serde_json::to_value(&*component).ok()
            }),
            remove: Arc::new(|world: &mut World, entity: hecs::Entity| {
                world.remove_one::<T>(entity).is_ok()
            }),
        }
    }
}

/// Extension trait for ComponentRegistry to support metadata
pub trait ComponentRegistryExt {
    /// Register a component with full metadata
    fn register_with_metadata(&mut self, metadata: ComponentMetadata);

    /// Get metadata for a component type
    fn get_metadata(&self, type_id: TypeId) -> Option<&ComponentMetadata>;

    /// Get metadata for a component by name
    fn get_metadata_by_name(&self, name: &str) -> Option<&ComponentMetadata>;

    /// Iterate over all registered component metadata
    fn iter_metadata(&self) -> impl Iterator<Item = &ComponentMetadata>;

    /// Get a list of all registered component names
    fn component_names(&self) -> Vec<&'static str>;
}
