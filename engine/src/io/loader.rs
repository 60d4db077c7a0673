//! Mounts scene descriptors into an entity store

use super::assets::SceneAssets;
use super::component_registry::ComponentRegistry;
use super::entity_mapper::EntityMapper;
use super::scene::{EntityDescriptor, SceneDescriptor, SceneEntityId, SceneError};
use super::validation::{validate_identities, validate_scene};
use crate::components::PrefabInstance;
use crate::declarative::{EntityNode, EntityProps};
use crate::ecs::{upsert_component, EntityId, EntityStore, StableIdGenerator, WorldStore};
use std::collections::{HashMap, HashSet};
use tracing::{debug, error, info, warn};

/// Loads scenes through the declarative entity wrapper
///
/// Each descriptor becomes an [`EntityNode`]; its components are written
/// with the same add-or-update semantics the mirroring wrappers use.
pub struct SceneLoader<'a> {
    store: &'a mut dyn EntityStore,
    ids: &'a dyn StableIdGenerator,
    registry: &'a ComponentRegistry,
    assets: &'a SceneAssets,
}

impl<'a> SceneLoader<'a> {
    pub fn new(
        store: &'a mut dyn EntityStore,
        ids: &'a dyn StableIdGenerator,
        registry: &'a ComponentRegistry,
        assets: &'a SceneAssets,
    ) -> Self {
        Self {
            store,
            ids,
            registry,
            assets,
        }
    }

    /// Validate, expand prefabs and mount every entity of `scene`
    ///
    /// Validation errors fail the load before anything is mounted, including
    /// id collisions that only appear once prefabs are expanded. An instance
    /// of an unknown prefab is mounted with its own components. Store
    /// failures after that point are logged per entity; an entity that
    /// cannot be created takes its subtree with it.
    pub fn load(&mut self, scene: &SceneDescriptor) -> Result<LoadedScene, SceneError> {
        let report = validate_scene(scene, self.registry);
        if !report.is_valid() {
            error!(scene = %scene.metadata.name, report = %report, "Scene is invalid");
            return Err(SceneError::Invalid(report));
        }

        let expanded = self.expand_prefabs(&scene.entities);
        let identities = validate_identities(&expanded);
        if !identities.is_valid() {
            error!(scene = %scene.metadata.name, report = %identities, "Prefab expansion produced conflicting ids");
            return Err(SceneError::Invalid(identities));
        }
        let ordered = parents_first(&expanded);

        info!(
            scene = %scene.metadata.name,
            entity_count = ordered.len(),
            "Loading scene"
        );

        let mut loaded = LoadedScene {
            name: scene.metadata.name.clone(),
            mapper: EntityMapper::new(),
            nodes: Vec::with_capacity(ordered.len()),
            locked: HashSet::new(),
            skipped: 0,
        };

        for descriptor in ordered {
            self.mount_descriptor(descriptor, &mut loaded);
        }

        loaded.locked = scene
            .locked_entity_ids
            .iter()
            .filter_map(|id| loaded.mapper.remap(id))
            .collect();

        info!(
            scene = %loaded.name,
            mounted = loaded.mapper.len(),
            skipped = loaded.skipped,
            locked = loaded.locked.len(),
            "Scene loaded"
        );
        Ok(loaded)
    }

    fn expand_prefabs(&self, entities: &[EntityDescriptor]) -> Vec<EntityDescriptor> {
        let mut expanded = Vec::with_capacity(entities.len());
        for entity in entities {
            let Some(link) = entity.component::<PrefabInstance>("PrefabInstance") else {
                expanded.push(entity.clone());
                continue;
            };
            match self.assets.prefab(&link.prefab_id) {
                Some(prefab) => expanded.extend(prefab.instantiate(entity, &link)),
                None => {
                    warn!(
                        prefab = %link.prefab_id,
                        entity = %entity.id,
                        "Prefab not found, mounting instance without it"
                    );
                    expanded.push(entity.clone());
                }
            }
        }
        expanded
    }

    fn mount_descriptor(&mut self, descriptor: &EntityDescriptor, loaded: &mut LoadedScene) {
        let parent = match &descriptor.parent_id {
            Some(parent_id) => match loaded.mapper.remap(parent_id) {
                Some(parent) => Some(parent),
                None => {
                    warn!(entity = %descriptor.id, parent = %parent_id, "Parent not mounted, skipping entity");
                    loaded.skipped += 1;
                    return;
                }
            },
            None => None,
        };

        let props = EntityProps {
            name: descriptor.name.clone(),
            parent_id: parent,
            stable_id: descriptor.persistent_id().map(str::to_string),
        };
        let mut node = EntityNode::new(props);
        let entity_id = node
            .mount(&mut *self.store, self.ids)
            .map(|context| context.entity_id);

        let Some(entity_id) = entity_id else {
            loaded.skipped += 1;
            // Keep a created-but-unpublished entity so unload still deletes it
            if node.entity_id().is_some() {
                loaded.nodes.push(node);
            }
            return;
        };

        loaded.mapper.register(descriptor.id.clone(), entity_id);
        loaded.nodes.push(node);

        for (kind, data) in &descriptor.components {
            if kind == "PersistentId" {
                continue;
            }
            let data = if self.registry.is_storable(kind) {
                match self.registry.normalize(kind, data) {
                    Ok(normalized) => normalized,
                    Err(err) => {
                        warn!(entity = %descriptor.id, kind = %kind, error = %err, "Component data does not decode, passing it through");
                        data.clone()
                    }
                }
            } else {
                data.clone()
            };

            if let Err(err) = upsert_component(&mut *self.store, entity_id, kind, data) {
                error!(entity = %entity_id, kind = %kind, error = %err, "Failed to write component");
            }
        }
        debug!(entity = %entity_id, scene_id = %descriptor.id, "Mounted scene entity");
    }
}

/// Descriptors reordered so every parent precedes its children
///
/// Siblings keep their file order. Entities whose parent is not in the list
/// are treated as roots.
fn parents_first(entities: &[EntityDescriptor]) -> Vec<&EntityDescriptor> {
    let known: HashSet<&SceneEntityId> = entities.iter().map(|e| &e.id).collect();
    let mut children: HashMap<&SceneEntityId, Vec<&EntityDescriptor>> = HashMap::new();
    let mut ordered: Vec<&EntityDescriptor> = Vec::with_capacity(entities.len());

    for entity in entities {
        match &entity.parent_id {
            Some(parent) if known.contains(parent) => {
                children.entry(parent).or_default().push(entity)
            }
            _ => ordered.push(entity),
        }
    }

    let mut cursor = 0;
    while cursor < ordered.len() {
        if let Some(kids) = children.remove(&ordered[cursor].id) {
            ordered.extend(kids);
        }
        cursor += 1;
    }
    ordered
}

/// A mounted scene, holding the entity nodes until it is unloaded
#[derive(Debug)]
pub struct LoadedScene {
    name: String,
    mapper: EntityMapper,
    nodes: Vec<EntityNode>,
    locked: HashSet<EntityId>,
    skipped: usize,
}

impl LoadedScene {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store entity created for a scene id
    pub fn entity(&self, scene_id: &SceneEntityId) -> Option<EntityId> {
        self.mapper.remap(scene_id)
    }

    pub fn mapper(&self) -> &EntityMapper {
        &self.mapper
    }

    pub fn is_locked(&self, entity: EntityId) -> bool {
        self.locked.contains(&entity)
    }

    /// Locked store entities in ascending id order
    pub fn locked(&self) -> Vec<EntityId> {
        let mut locked: Vec<EntityId> = self.locked.iter().copied().collect();
        locked.sort_unstable();
        locked
    }

    /// Capture the store as a scene that reloads on its own
    ///
    /// Entities come from [`SceneDescriptor::from_store`]. Inline assets and
    /// asset references are carried over from `source`, and locked entities
    /// still present in the store are written under their captured ids.
    pub fn capture(&self, store: &WorldStore, source: &SceneDescriptor) -> SceneDescriptor {
        let mut scene = SceneDescriptor::from_store(store, source.metadata.clone());
        scene.materials = source.materials.clone();
        scene.prefabs = source.prefabs.clone();
        scene.input_assets = source.input_assets.clone();
        scene.asset_references = source.asset_references.clone();
        scene.locked_entity_ids = self
            .locked()
            .into_iter()
            .filter(|&id| store.contains(id))
            .map(SceneEntityId::from)
            .collect();
        debug!(
            scene = %self.name,
            locked = scene.locked_entity_ids.len(),
            "Captured loaded scene"
        );
        scene
    }

    /// Number of entities mounted with a published context
    pub fn len(&self) -> usize {
        self.mapper.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mapper.is_empty()
    }

    /// Descriptors that were not mounted because they or a parent failed
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Unmount every node, children before parents
    pub fn unload(mut self, store: &mut dyn EntityStore) {
        for node in self.nodes.iter_mut().rev() {
            node.unmount(store);
        }
        info!(scene = %self.name, "Scene unloaded");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{SequentialIdGenerator, WorldStore};

    #[test]
    fn test_parents_first_order() {
        let entities = vec![
            EntityDescriptor::new(3, "Grandchild").with_parent(2),
            EntityDescriptor::new(2, "Child").with_parent(1),
            EntityDescriptor::new(1, "Root"),
            EntityDescriptor::new(4, "Loose").with_parent(99),
        ];
        let names: Vec<&str> = parents_first(&entities)
            .into_iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["Root", "Loose", "Child", "Grandchild"]);
    }

    #[test]
    fn test_load_and_unload() {
        let mut scene = SceneDescriptor::new("Small");
        scene.entities = vec![
            EntityDescriptor::new(1, "Root")
                .with_component("Transform", serde_json::json!({"position": [0, 1, 0]})),
            EntityDescriptor::new(2, "Child").with_parent(1),
        ];
        scene.locked_entity_ids = vec![SceneEntityId::Number(1)];

        let registry = ComponentRegistry::with_default_components();
        let assets = SceneAssets::new();
        let ids = SequentialIdGenerator::new("small");
        let mut store = WorldStore::default();

        let loaded = SceneLoader::new(&mut store, &ids, &registry, &assets)
            .load(&scene)
            .unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(store.len(), 2);

        let root = loaded.entity(&SceneEntityId::Number(1)).unwrap();
        let child = loaded.entity(&SceneEntityId::Number(2)).unwrap();
        assert_eq!(store.parent(child), Some(root));
        assert!(loaded.is_locked(root));
        assert!(!loaded.is_locked(child));
        assert_eq!(store.component(root, "Transform").unwrap()["scale"][0], 1.0);

        loaded.unload(&mut store);
        assert!(store.is_empty());
    }
}
