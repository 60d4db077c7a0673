//! Configuration types for asset lookup

use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Errors produced while resolving asset locations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid asset name: {0}")]
    InvalidName(String),

    #[error("{kind} directory not found: {path:?}")]
    MissingDirectory { kind: &'static str, path: PathBuf },
}

/// Configuration for asset paths
#[derive(Debug, Clone)]
pub struct AssetConfig {
    /// Root directory for all assets
    pub asset_root: PathBuf,
    /// Directory name for scenes (relative to asset_root)
    pub scenes_dir: String,
    /// Directory name for prefabs (relative to asset_root)
    pub prefabs_dir: String,
    /// Directory name for material libraries (relative to asset_root)
    pub materials_dir: String,
    /// Directory name for input action assets (relative to asset_root)
    pub inputs_dir: String,
}

impl AssetConfig {
    /// Default layout under a custom asset root
    pub fn with_root(asset_root: impl Into<PathBuf>) -> Self {
        let asset_root = asset_root.into();
        debug!(asset_root = ?asset_root, "Creating AssetConfig");
        Self {
            asset_root,
            ..Default::default()
        }
    }

    /// Get the full path to a scene file
    pub fn scene_path(&self, name: &str) -> Result<PathBuf, ConfigError> {
        self.named_path(&self.scenes_dir, name)
    }

    /// Get the full path to a prefab file
    pub fn prefab_path(&self, name: &str) -> Result<PathBuf, ConfigError> {
        self.named_path(&self.prefabs_dir, name)
    }

    /// Get the full path to a material library
    pub fn material_path(&self, name: &str) -> Result<PathBuf, ConfigError> {
        self.named_path(&self.materials_dir, name)
    }

    /// Get the full path to an input action asset
    pub fn input_path(&self, name: &str) -> Result<PathBuf, ConfigError> {
        self.named_path(&self.inputs_dir, name)
    }

    /// Resolve an asset reference such as `"prefabs/tree.json"` or
    /// `"@/materials/common.json"` against the asset root
    pub fn resolve(&self, reference: &str) -> Result<PathBuf, ConfigError> {
        let relative = reference.strip_prefix("@/").unwrap_or(reference);
        let relative_path = Path::new(relative);
        let escapes = relative.is_empty()
            || relative_path
                .components()
                .any(|part| !matches!(part, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(ConfigError::InvalidName(reference.to_string()));
        }
        let path = self.asset_root.join(relative_path);
        debug!(reference = reference, path = ?path, "Resolved asset reference");
        Ok(path)
    }

    fn named_path(&self, dir: &str, name: &str) -> Result<PathBuf, ConfigError> {
        if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
            return Err(ConfigError::InvalidName(name.to_string()));
        }
        let path = self.asset_root.join(dir).join(format!("{name}.json"));
        debug!(name = name, path = ?path, "Generated asset path");
        Ok(path)
    }

    /// Check if the asset directories exist
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.asset_root.exists() {
            return Err(ConfigError::MissingDirectory {
                kind: "Asset root",
                path: self.asset_root.clone(),
            });
        }

        for (kind, dir) in [
            ("Scenes", &self.scenes_dir),
            ("Prefabs", &self.prefabs_dir),
            ("Materials", &self.materials_dir),
            ("Inputs", &self.inputs_dir),
        ] {
            let path = self.asset_root.join(dir);
            if !path.exists() {
                return Err(ConfigError::MissingDirectory { kind, path });
            }
        }

        Ok(())
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("assets"),
            scenes_dir: "scenes".to_string(),
            prefabs_dir: "prefabs".to_string(),
            materials_dir: "materials".to_string(),
            inputs_dir: "inputs".to_string(),
        }
    }
}
