//! Prefab descriptors and instantiation

use super::scene::{EntityDescriptor, SceneEntityId, SceneError};
use crate::components::PrefabInstance;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// A node of a prefab's entity tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefabEntity {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub components: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PrefabEntity>,
}

impl PrefabEntity {
    /// Number of entities in this subtree, itself included
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(PrefabEntity::count).sum::<usize>()
    }
}

fn default_version() -> u32 {
    1
}

/// A reusable, versioned entity subtree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefabDescriptor {
    pub id: String,
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    pub root: PrefabEntity,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
    /// Ids of prefabs this one nests
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PrefabDescriptor {
    /// Load a prefab from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SceneError::AssetRead {
            path: path.to_path_buf(),
            source,
        })?;
        let prefab: PrefabDescriptor =
            serde_json::from_str(&json).map_err(|source| SceneError::AssetParse {
                path: path.to_path_buf(),
                source,
            })?;
        info!(path = ?path, prefab = %prefab.id, "Loaded prefab");
        Ok(prefab)
    }

    pub fn entity_count(&self) -> usize {
        self.root.count()
    }

    /// Flatten this prefab into scene entities standing in for `instance`
    ///
    /// The root takes over the instance's id, parent and name, keeps the
    /// instance's own components, and has the instance transform composed
    /// onto its own. The `PrefabInstance` link itself is consumed, so a
    /// captured and reloaded scene does not expand the prefab again. Descendants get ids and persistent ids of the form
    /// `<instance uuid>-<n>` in depth-first order, the root being `-0`. The
    /// override patch is applied to every produced entity.
    pub fn instantiate(
        &self,
        instance: &EntityDescriptor,
        link: &PrefabInstance,
    ) -> Vec<EntityDescriptor> {
        if link.version != self.version {
            warn!(
                prefab = %self.id,
                instance_version = link.version,
                prefab_version = self.version,
                "Prefab instance version differs from prefab"
            );
        }

        let uuid = if link.instance_uuid.is_empty() {
            instance.id.to_string()
        } else {
            link.instance_uuid.clone()
        };

        let mut root = self.root.clone();
        if let Some(instance_transform) = instance.components.get("Transform") {
            match root.components.get_mut("Transform") {
                Some(root_transform) => compose_transforms(root_transform, instance_transform),
                None => {
                    root.components
                        .insert("Transform".to_string(), instance_transform.clone());
                }
            }
        }

        let mut entities = Vec::with_capacity(self.entity_count());
        let mut next = 0;
        flatten(
            &root,
            None,
            &uuid,
            link.override_patch.as_ref(),
            &mut next,
            &mut entities,
        );

        if let Some(first) = entities.first_mut() {
            first.id = instance.id.clone();
            first.parent_id = instance.parent_id.clone();
            if !instance.name.is_empty() {
                first.name = instance.name.clone();
            }
            for (kind, data) in &instance.components {
                if kind != "Transform" && kind != "PrefabInstance" {
                    first.components.insert(kind.clone(), data.clone());
                }
            }
        }
        // Children were parented to the root's provisional id
        let provisional_root = SceneEntityId::Text(format!("{uuid}-0"));
        for entity in entities.iter_mut().skip(1) {
            if entity.parent_id.as_ref() == Some(&provisional_root) {
                entity.parent_id = Some(instance.id.clone());
            }
        }

        debug!(
            prefab = %self.id,
            instance = %instance.id,
            entity_count = entities.len(),
            "Instantiated prefab"
        );
        entities
    }
}

fn flatten(
    node: &PrefabEntity,
    parent: Option<&SceneEntityId>,
    uuid: &str,
    patch: Option<&Value>,
    next: &mut usize,
    out: &mut Vec<EntityDescriptor>,
) {
    let stable_id = format!("{uuid}-{next}");
    *next += 1;

    let mut components = node.components.clone();
    if let Some(patch) = patch {
        apply_override_patch(&mut components, patch);
    }
    components.insert("PersistentId".to_string(), serde_json::json!({ "id": stable_id }));

    let id = SceneEntityId::Text(stable_id);
    out.push(EntityDescriptor {
        id: id.clone(),
        name: node.name.clone(),
        parent_id: parent.cloned(),
        components,
    });

    for child in &node.children {
        flatten(child, Some(&id), uuid, patch, next, out);
    }
}

/// Deep-merge a `kind -> partial data` patch into a component map
///
/// Kinds absent from the map are added as-is.
pub fn apply_override_patch(components: &mut BTreeMap<String, Value>, patch: &Value) {
    let Some(patch) = patch.as_object() else {
        return;
    };
    for (kind, partial) in patch {
        if kind == "children" {
            continue;
        }
        match components.get_mut(kind) {
            Some(existing) => merge_json(existing, partial),
            None => {
                components.insert(kind.clone(), partial.clone());
            }
        }
    }
}

/// Merge `patch` into `original`; objects merge key by key, anything else
/// is replaced
pub fn merge_json(original: &mut Value, patch: &Value) {
    match (original, patch) {
        (Value::Object(original), Value::Object(patch)) => {
            for (key, value) in patch {
                match original.get_mut(key) {
                    Some(existing) => merge_json(existing, value),
                    None => {
                        original.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (original, patch) => *original = patch.clone(),
    }
}

/// Place a prefab root at an instance transform
///
/// Position and rotation are taken from the instance, scale multiplies.
pub fn compose_transforms(prefab_transform: &mut Value, instance_transform: &Value) {
    let (Some(prefab), Some(instance)) = (
        prefab_transform.as_object_mut(),
        instance_transform.as_object(),
    ) else {
        return;
    };

    for key in ["position", "rotation"] {
        if let Some(value) = instance.get(key) {
            prefab.insert(key.to_string(), value.clone());
        }
    }

    let Some(instance_scale) = instance.get("scale").and_then(Value::as_array) else {
        return;
    };
    let composed = match prefab.get("scale").and_then(Value::as_array) {
        Some(prefab_scale) if prefab_scale.len() == 3 && instance_scale.len() == 3 => prefab_scale
            .iter()
            .zip(instance_scale)
            .map(|(a, b)| Value::from(a.as_f64().unwrap_or(1.0) * b.as_f64().unwrap_or(1.0)))
            .collect(),
        Some(_) => return,
        None => instance_scale.clone(),
    };
    prefab.insert("scale".to_string(), Value::Array(composed));
}

/// Prefabs available to a scene, keyed by id
#[derive(Debug, Default, Clone)]
pub struct PrefabRegistry {
    prefabs: HashMap<String, PrefabDescriptor>,
}

impl PrefabRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a prefab, returning the one it replaced
    pub fn register(&mut self, prefab: PrefabDescriptor) -> Option<PrefabDescriptor> {
        debug!(prefab = %prefab.id, "Registered prefab");
        self.prefabs.insert(prefab.id.clone(), prefab)
    }

    pub fn get(&self, id: &str) -> Option<&PrefabDescriptor> {
        self.prefabs.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.prefabs.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.prefabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefabs.is_empty()
    }

    /// Sorted ids of every registered prefab
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.prefabs.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// `(prefab, dependency)` pairs naming prefabs that are not registered
    pub fn missing_dependencies(&self) -> Vec<(String, String)> {
        let mut missing: Vec<(String, String)> = self
            .prefabs
            .values()
            .flat_map(|prefab| {
                prefab
                    .dependencies
                    .iter()
                    .filter(|dep| !self.prefabs.contains_key(*dep))
                    .map(|dep| (prefab.id.clone(), dep.clone()))
            })
            .collect();
        missing.sort();
        missing
    }
}
