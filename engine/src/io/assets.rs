//! Assets a scene depends on: materials, prefabs and input actions

use super::input_actions::InputActionAsset;
use super::prefab::{PrefabDescriptor, PrefabRegistry};
use super::scene::{AssetReferences, SceneDescriptor, SceneError};
use crate::components::MaterialData;
use crate::config::AssetConfig;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// A named material in a scene's material library
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDefinition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub data: MaterialData,
}

impl MaterialDefinition {
    pub fn new(id: impl Into<String>, data: MaterialData) -> Self {
        Self {
            id: id.into(),
            name: None,
            data,
        }
    }
}

/// Referenced asset files may hold a single asset or a list
#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

fn read_assets<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, SceneError> {
    let json = fs::read_to_string(path).map_err(|source| SceneError::AssetRead {
        path: path.to_path_buf(),
        source,
    })?;
    let parsed: OneOrMany<T> =
        serde_json::from_str(&json).map_err(|source| SceneError::AssetParse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(match parsed {
        OneOrMany::One(asset) => vec![asset],
        OneOrMany::Many(assets) => assets,
    })
}

/// Every asset available to one scene load
#[derive(Debug, Default, Clone)]
pub struct SceneAssets {
    materials: BTreeMap<String, MaterialDefinition>,
    prefabs: PrefabRegistry,
    input_assets: BTreeMap<String, InputActionAsset>,
}

impl SceneAssets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assets defined inline in the scene file
    pub fn inline(scene: &SceneDescriptor) -> Self {
        let mut assets = Self::new();
        for material in &scene.materials {
            assets.add_material(material.clone());
        }
        for prefab in &scene.prefabs {
            assets.add_prefab(prefab.clone());
        }
        for input in &scene.input_assets {
            assets.add_input_asset(input.clone());
        }
        assets
    }

    /// Inline assets plus everything the scene references on disk
    ///
    /// Referenced assets replace inline ones with the same id.
    pub fn for_scene(scene: &SceneDescriptor, config: &AssetConfig) -> Result<Self, SceneError> {
        let mut assets = Self::inline(scene);
        if let Some(references) = &scene.asset_references {
            assets.load_references(references, config)?;
        }
        info!(
            scene = %scene.metadata.name,
            materials = assets.materials.len(),
            prefabs = assets.prefabs.len(),
            input_assets = assets.input_assets.len(),
            "Resolved scene assets"
        );
        Ok(assets)
    }

    /// Load every referenced file below the configured asset root
    pub fn load_references(
        &mut self,
        references: &AssetReferences,
        config: &AssetConfig,
    ) -> Result<(), SceneError> {
        for reference in &references.materials {
            let path = config.resolve(reference)?;
            for material in read_assets::<MaterialDefinition>(&path)? {
                self.add_material(material);
            }
        }
        for reference in &references.prefabs {
            let path = config.resolve(reference)?;
            for prefab in read_assets::<PrefabDescriptor>(&path)? {
                self.add_prefab(prefab);
            }
        }
        for reference in &references.inputs {
            let path = config.resolve(reference)?;
            for input in read_assets::<InputActionAsset>(&path)? {
                self.add_input_asset(input);
            }
        }
        Ok(())
    }

    pub fn add_material(&mut self, material: MaterialDefinition) {
        debug!(material = %material.id, "Added material");
        self.materials.insert(material.id.clone(), material);
    }

    pub fn add_prefab(&mut self, prefab: PrefabDescriptor) {
        self.prefabs.register(prefab);
    }

    pub fn add_input_asset(&mut self, input: InputActionAsset) {
        debug!(input_asset = %input.name, "Added input asset");
        self.input_assets.insert(input.name.clone(), input);
    }

    pub fn material(&self, id: &str) -> Option<&MaterialDefinition> {
        self.materials.get(id)
    }

    pub fn prefab(&self, id: &str) -> Option<&PrefabDescriptor> {
        self.prefabs.get(id)
    }

    pub fn prefabs(&self) -> &PrefabRegistry {
        &self.prefabs
    }

    pub fn input_asset(&self, name: &str) -> Option<&InputActionAsset> {
        self.input_assets.get(name)
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    pub fn input_asset_count(&self) -> usize {
        self.input_assets.len()
    }
}
