//! Named scene registration

use super::scene::{SceneDescriptor, SceneError};
use crate::config::AssetConfig;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{debug, info};

/// Where a registered scene's JSON comes from
#[derive(Debug, Clone)]
pub enum SceneSource {
    /// JSON text compiled into the binary or built at runtime
    Inline(String),
    /// A scene file on disk
    File(PathBuf),
}

/// Scenes addressable by name
///
/// Names not registered explicitly fall back to `<scenes_dir>/<name>.json`
/// under the asset root.
#[derive(Debug, Default, Clone)]
pub struct SceneCatalog {
    scenes: BTreeMap<String, SceneSource>,
}

impl SceneCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a scene given as JSON text
    pub fn register_json(&mut self, name: impl Into<String>, json: impl Into<String>) {
        let name = name.into();
        debug!(scene = %name, "Registered inline scene");
        self.scenes.insert(name, SceneSource::Inline(json.into()));
    }

    /// Register a scene file
    pub fn register_file(&mut self, name: impl Into<String>, path: impl Into<PathBuf>) {
        let name = name.into();
        let path = path.into();
        debug!(scene = %name, path = ?path, "Registered scene file");
        self.scenes.insert(name, SceneSource::File(path));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.scenes.contains_key(name)
    }

    /// Registered scene names, sorted
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenes.keys().map(String::as_str)
    }

    pub fn source(&self, name: &str) -> Option<&SceneSource> {
        self.scenes.get(name)
    }

    /// Parse the named scene
    pub fn load(&self, name: &str, config: &AssetConfig) -> Result<SceneDescriptor, SceneError> {
        let scene = match self.scenes.get(name) {
            Some(SceneSource::Inline(json)) => SceneDescriptor::from_json(json)?,
            Some(SceneSource::File(path)) => SceneDescriptor::load_from_file(path)?,
            None => {
                let path = config.scene_path(name)?;
                if !path.exists() {
                    return Err(SceneError::UnknownScene(name.to_string()));
                }
                SceneDescriptor::load_from_file(path)?
            }
        };
        info!(scene = name, entity_count = scene.entities.len(), "Scene resolved from catalog");
        Ok(scene)
    }
}
