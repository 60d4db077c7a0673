//! Component registry for dynamic component deserialization

use crate::component_system::{BoxError, ComponentMetadata, ComponentRegistryExt, DeserializerFn};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Registry of component kinds known by name
///
/// Kinds registered through [`ComponentRegistryExt::register_with_metadata`]
/// (what `#[derive(Component)]` does) can be stored in a world. Kinds
/// registered with [`ComponentRegistry::register`] are decode-only: they are
/// validated but stored as untyped JSON.
#[derive(Default)]
pub struct ComponentRegistry {
    /// Maps component type names to their deserializer functions
    deserializers: HashMap<String, DeserializerFn>,
    /// Maps TypeId to component metadata
    metadata: HashMap<TypeId, ComponentMetadata>,
    /// Maps component names to TypeId for lookup
    name_to_type: HashMap<String, TypeId>,
}

impl ComponentRegistry {
    /// Create a new empty component registry
    pub fn new() -> Self {
        Self {
            deserializers: HashMap::new(),
            metadata: HashMap::new(),
            name_to_type: HashMap::new(),
        }
    }

    /// Register a decode-only component kind
    ///
    /// # Arguments
    /// * `type_name` - The name of the component kind (e.g., "RigidBody")
    pub fn register<T: 'static + serde::de::DeserializeOwned>(&mut self, type_name: &str) {
        let deserializer: DeserializerFn = Arc::new(move |value: &serde_json::Value| {
            let component: T = serde_json::from_value(value.clone())?;
            Ok::<Box<dyn Any>, BoxError>(Box::new(component))
        });

        self.deserializers
            .insert(type_name.to_string(), deserializer);
        debug!(type_name = type_name, "Registered component deserializer");
    }

    /// Deserialize a component from a JSON value
    ///
    /// # Returns
    /// The deserialized component as a boxed Any, or an error if the kind is
    /// unknown or the data does not match its schema
    pub fn deserialize_component(
        &self,
        type_name: &str,
        value: &serde_json::Value,
    ) -> Result<Box<dyn Any>, BoxError> {
        if let Some(deserializer) = self.deserializers.get(type_name) {
            deserializer(value)
        } else {
            Err(format!("Unknown component type: {type_name}").into())
        }
    }

    /// Decode and re-encode a component so every defaulted field is present
    ///
    /// Scene files may carry sparse records; the normalized value is the
    /// record's defaults with the authored fields applied on top.
    pub fn normalize(
        &self,
        type_name: &str,
        value: &serde_json::Value,
    ) -> Result<serde_json::Value, BoxError> {
        let metadata = self
            .get_metadata_by_name(type_name)
            .ok_or_else(|| format!("Component type {type_name} has no serializer"))?;
        let decoded = (metadata.deserializer)(value)?;
        (metadata.serializer)(&*decoded)
    }

    /// Check if a component type is registered
    pub fn is_registered(&self, type_name: &str) -> bool {
        self.deserializers.contains_key(type_name)
    }

    /// Check if a component type can be stored as a typed component
    pub fn is_storable(&self, type_name: &str) -> bool {
        self.name_to_type.contains_key(type_name)
    }

    /// Get all registered component type names
    pub fn registered_types(&self) -> impl Iterator<Item = &str> {
        self.deserializers.keys().map(|s| s.as_str())
    }

    /// Get the number of registered component types
    pub fn len(&self) -> usize {
        self.deserializers.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.deserializers.is_empty()
    }

    /// Create a registry with all scene component kinds registered
    pub fn with_default_components() -> Self {
        use crate::component_system::Component;
        use crate::components::{
            Camera, Instanced, Light, MeshRenderer, PersistentId, PrefabInstance, Transform,
        };

        let mut registry = Self::new();

        Transform::register(&mut registry);
        Camera::register(&mut registry);
        Light::register(&mut registry);
        MeshRenderer::register(&mut registry);
        Instanced::register(&mut registry);
        PersistentId::register(&mut registry);
        PrefabInstance::register(&mut registry);

        debug!(
            component_count = registry.len(),
            "Created registry with default components"
        );

        registry
    }
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field(
                "registered_types",
                &self.deserializers.keys().collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ComponentRegistryExt for ComponentRegistry {
    fn register_with_metadata(&mut self, metadata: ComponentMetadata) {
        let type_id = metadata.type_id;
        let name = metadata.name.to_string();

        self.deserializers
            .insert(name.clone(), metadata.deserializer.clone());

        self.name_to_type.insert(name.clone(), type_id);
        self.metadata.insert(type_id, metadata);

        debug!(component_name = %name, "Registered component with metadata");
    }

    fn get_metadata(&self, type_id: TypeId) -> Option<&ComponentMetadata> {
        self.metadata.get(&type_id)
    }

    fn get_metadata_by_name(&self, name: &str) -> Option<&ComponentMetadata> {
        self.name_to_type
            .get(name)
            .and_then(|type_id| self.metadata.get(type_id))
    }

    fn iter_metadata(&self) -> impl Iterator<Item = &ComponentMetadata> {
        self.metadata.values()
    }

    fn component_names(&self) -> Vec<&'static str> {
        self.metadata.values().map(|meta| meta.name).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestComponent {
        value: i32,
    }

    #[test]
    fn test_component_registry_basic() {
        let mut registry = ComponentRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);

        registry.register::<TestComponent>("TestComponent");
        assert!(!registry.is_empty());
        assert_eq!(registry.len(), 1);
        assert!(registry.is_registered("TestComponent"));
        assert!(!registry.is_storable("TestComponent"));
        assert!(!registry.is_registered("UnknownComponent"));
    }

    #[test]
    fn test_component_registry_deserialize() {
        let mut registry = ComponentRegistry::new();
        registry.register::<TestComponent>("TestComponent");

        let json_value = serde_json::json!({
            "value": 42
        });

        let component = registry
            .deserialize_component("TestComponent", &json_value)
            .unwrap();
        let test_component = component.downcast_ref::<TestComponent>().unwrap();
        assert_eq!(test_component.value, 42);
    }

    #[test]
    fn test_component_registry_unknown_type() {
        let registry = ComponentRegistry::new();
        let json_value = serde_json::json!({});

        let result = registry.deserialize_component("UnknownType", &json_value);
        assert!(result.is_err());
    }

    #[test]
    fn test_component_registry_default() {
        let registry = ComponentRegistry::with_default_components();
        for kind in [
            "Transform",
            "Camera",
            "Light",
            "MeshRenderer",
            "Instanced",
            "PersistentId",
            "PrefabInstance",
        ] {
            assert!(registry.is_registered(kind), "{kind} should be registered");
            assert!(registry.is_storable(kind), "{kind} should be storable");
        }
        assert_eq!(registry.len(), 7);
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let registry = ComponentRegistry::with_default_components();
        let sparse = serde_json::json!({"lightType": "point", "range": 15.0});

        let normalized = registry.normalize("Light", &sparse).unwrap();
        assert_eq!(normalized["lightType"], "point");
        assert_eq!(normalized["range"], 15.0);
        assert_eq!(normalized["intensity"], 1.0);
        assert_eq!(normalized["castShadow"], true);
        assert_eq!(normalized["shadowMapSize"], 2048);
    }

    #[test]
    fn test_normalize_unknown_kind_fails() {
        let mut registry = ComponentRegistry::new();
        registry.register::<TestComponent>("TestComponent");
        assert!(registry
            .normalize("TestComponent", &serde_json::json!({"value": 1}))
            .is_err());
        assert!(registry.normalize("Nope", &serde_json::json!({})).is_err());
    }

    #[test]
    fn test_component_registry_registered_types() {
        let mut registry = ComponentRegistry::new();
        registry.register::<TestComponent>("TestComponent");
        registry.register::<TestComponent>("AnotherComponent");

        let types: Vec<&str> = registry.registered_types().collect();
        assert_eq!(types.len(), 2);
        assert!(types.contains(&"TestComponent"));
        assert!(types.contains(&"AnotherComponent"));
    }

    #[test]
    fn test_registry_metadata_iteration() {
        let registry = ComponentRegistry::with_default_components();

        assert_eq!(registry.iter_metadata().count(), 7);

        let names = registry.component_names();
        assert!(names.contains(&"Transform"));
        assert!(names.contains(&"MeshRenderer"));
        assert!(names.contains(&"PrefabInstance"));
    }
}
