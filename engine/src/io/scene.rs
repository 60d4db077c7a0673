//! Scene descriptors: the JSON format scenes are authored and saved in

use super::assets::MaterialDefinition;
use super::input_actions::InputActionAsset;
use super::prefab::PrefabDescriptor;
use super::validation::ValidationReport;
use crate::config::ConfigError;
use crate::ecs::{EntityId, WorldStore};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Errors that can occur during scene operations
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read asset {path:?}: {source}")]
    AssetRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse asset {path:?}: {source}")]
    AssetParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("scene failed validation: {0}")]
    Invalid(ValidationReport),

    #[error("unknown scene: {0}")]
    UnknownScene(String),
}

/// Scene-local entity id, numeric or string
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SceneEntityId {
    Number(u64),
    Text(String),
}

impl fmt::Display for SceneEntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SceneEntityId::Number(n) => write!(f, "{n}"),
            SceneEntityId::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Captured scenes use the numeric store id
impl From<EntityId> for SceneEntityId {
    fn from(id: EntityId) -> Self {
        SceneEntityId::Number(u64::from(id.raw()))
    }
}

impl From<u64> for SceneEntityId {
    fn from(n: u64) -> Self {
        SceneEntityId::Number(n)
    }
}

impl From<&str> for SceneEntityId {
    fn from(s: &str) -> Self {
        SceneEntityId::Text(s.to_string())
    }
}

impl From<String> for SceneEntityId {
    fn from(s: String) -> Self {
        SceneEntityId::Text(s)
    }
}

/// Scene header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneMetadata {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn default_version() -> u32 {
    1
}

impl SceneMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: 1,
            timestamp: String::new(),
            author: None,
            description: None,
        }
    }
}

/// One entity in a scene file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDescriptor {
    pub id: SceneEntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<SceneEntityId>,
    /// Component kind to component data
    #[serde(default)]
    pub components: BTreeMap<String, Value>,
}

impl EntityDescriptor {
    pub fn new(id: impl Into<SceneEntityId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            parent_id: None,
            components: BTreeMap::new(),
        }
    }

    pub fn with_parent(mut self, parent_id: impl Into<SceneEntityId>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_component(mut self, kind: impl Into<String>, data: Value) -> Self {
        self.components.insert(kind.into(), data);
        self
    }

    /// The stable identity stored in the `PersistentId` component
    pub fn persistent_id(&self) -> Option<&str> {
        self.components.get("PersistentId")?.get("id")?.as_str()
    }

    /// Decode a component, `None` if absent or malformed
    pub fn component<T: DeserializeOwned>(&self, kind: &str) -> Option<T> {
        self.components
            .get(kind)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    pub fn has_component(&self, kind: &str) -> bool {
        self.components.contains_key(kind)
    }
}

/// Paths of externally defined assets, relative to the asset root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetReferences {
    pub materials: Vec<String>,
    pub prefabs: Vec<String>,
    pub inputs: Vec<String>,
}

impl AssetReferences {
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty() && self.prefabs.is_empty() && self.inputs.is_empty()
    }
}

/// A complete loadable scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDescriptor {
    pub metadata: SceneMetadata,
    #[serde(default)]
    pub entities: Vec<EntityDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub materials: Vec<MaterialDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub prefabs: Vec<PrefabDescriptor>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub input_assets: Vec<InputActionAsset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_references: Option<AssetReferences>,
    /// Entities the editor protects from modification
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locked_entity_ids: Vec<SceneEntityId>,
}

impl SceneDescriptor {
    /// Create a new empty scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            metadata: SceneMetadata::new(name),
            entities: Vec::new(),
            materials: Vec::new(),
            prefabs: Vec::new(),
            input_assets: Vec::new(),
            asset_references: None,
            locked_entity_ids: Vec::new(),
        }
    }

    /// Parse a scene from JSON text
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let scene: SceneDescriptor = serde_json::from_str(json)?;
        debug!(
            scene = %scene.metadata.name,
            entity_count = scene.entities.len(),
            "Parsed scene"
        );
        Ok(scene)
    }

    /// Save this scene to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), SceneError> {
        let path = path.as_ref();
        info!(path = ?path, "Saving scene to file");

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;

        info!(path = ?path, "Scene saved successfully");
        Ok(())
    }

    /// Load a scene from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let path = path.as_ref();
        info!(path = ?path, "Loading scene from file");

        let json = fs::read_to_string(path)?;
        let scene = Self::from_json(&json)?;

        info!(path = ?path, "Scene loaded successfully");
        Ok(scene)
    }

    pub fn find_entity(&self, id: &SceneEntityId) -> Option<&EntityDescriptor> {
        self.entities.iter().find(|entity| &entity.id == id)
    }

    pub fn find_by_persistent_id(&self, persistent_id: &str) -> Option<&EntityDescriptor> {
        self.entities
            .iter()
            .find(|entity| entity.persistent_id() == Some(persistent_id))
    }

    pub fn entities_with_component(&self, kind: &str) -> Vec<&EntityDescriptor> {
        self.entities
            .iter()
            .filter(|entity| entity.has_component(kind))
            .collect()
    }

    pub fn is_locked(&self, id: &SceneEntityId) -> bool {
        self.locked_entity_ids.contains(id)
    }

    /// Capture every entity of a store as a scene
    ///
    /// Entity ids become the numeric store ids, parents follow the store
    /// hierarchy and components are written in their normalized form.
    pub fn from_store(store: &WorldStore, metadata: SceneMetadata) -> Self {
        let entities: Vec<EntityDescriptor> = store
            .entity_ids()
            .into_iter()
            .map(|id| EntityDescriptor {
                id: SceneEntityId::from(id),
                name: store.name(id).unwrap_or_default(),
                parent_id: store.parent(id).map(SceneEntityId::from),
                components: store.components(id),
            })
            .collect();

        info!(
            scene = %metadata.name,
            entity_count = entities.len(),
            "Captured scene from store"
        );

        Self {
            metadata,
            entities,
            ..Self::new("")
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::EntityStore;
    use serde_json::json;

    const SCENE: &str = r#"{
        "metadata": {"name": "Test", "version": 1, "timestamp": "2025-01-01T00:00:00Z"},
        "entities": [
            {"id": 0, "name": "Camera", "components": {
                "PersistentId": {"id": "cam"},
                "Camera": {"isMain": true}
            }},
            {"id": "light-a", "name": "Sun", "parentId": 0, "components": {
                "Light": {"lightType": "directional"}
            }}
        ],
        "lockedEntityIds": [0]
    }"#;

    #[test]
    fn test_parse_mixed_ids() {
        let scene = SceneDescriptor::from_json(SCENE).unwrap();
        assert_eq!(scene.entities.len(), 2);
        assert_eq!(scene.entities[0].id, SceneEntityId::Number(0));
        assert_eq!(scene.entities[1].id, SceneEntityId::from("light-a"));
        assert_eq!(scene.entities[1].parent_id, Some(SceneEntityId::Number(0)));
        assert!(scene.is_locked(&SceneEntityId::Number(0)));
        assert!(!scene.is_locked(&SceneEntityId::from("light-a")));
    }

    #[test]
    fn test_lookups() {
        let scene = SceneDescriptor::from_json(SCENE).unwrap();
        assert_eq!(scene.find_by_persistent_id("cam").unwrap().name, "Camera");
        assert_eq!(
            scene.find_entity(&SceneEntityId::from("light-a")).unwrap().name,
            "Sun"
        );
        assert_eq!(scene.entities_with_component("Light").len(), 1);

        let camera: crate::components::Camera = scene.entities[0].component("Camera").unwrap();
        assert!(camera.is_main);
        assert_eq!(camera.fov, 60.0);
    }

    #[test]
    fn test_missing_metadata_rejected() {
        assert!(matches!(
            SceneDescriptor::from_json(r#"{"entities": []}"#),
            Err(SceneError::Json(_))
        ));
    }

    #[test]
    fn test_scene_file_io() {
        let scene = SceneDescriptor::from_json(SCENE).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");

        scene.save_to_file(&path).unwrap();
        let loaded = SceneDescriptor::load_from_file(&path).unwrap();
        assert_eq!(loaded, scene);
    }

    #[test]
    fn test_from_store_captures_hierarchy() {
        let mut store = WorldStore::default();
        let root = store.create_entity("Root", None).unwrap();
        let child = store.create_entity("Child", Some(root)).unwrap();
        store
            .add_component(child, "PersistentId", json!({"id": "child-1"}))
            .unwrap();
        store
            .add_component(child, "Script", json!({"path": "spin.lua"}))
            .unwrap();

        let scene = SceneDescriptor::from_store(&store, SceneMetadata::new("Captured"));
        assert_eq!(scene.metadata.name, "Captured");
        assert_eq!(scene.entities.len(), 2);

        let captured = scene.find_by_persistent_id("child-1").unwrap();
        assert_eq!(captured.name, "Child");
        assert_eq!(
            captured.parent_id,
            Some(SceneEntityId::Number(u64::from(root.raw())))
        );
        assert_eq!(captured.components["Script"]["path"], "spin.lua");
    }
}
