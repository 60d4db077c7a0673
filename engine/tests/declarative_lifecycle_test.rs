//! Lifecycle of entity nodes and component mirrors against a recording store

use scene_engine::components::{Light, LightType, MaterialData, MaterialOverride, Transform};
use scene_engine::declarative::{
    ContextError, EntityContext, EntityNode, EntityProps, LightMirror, MeshRendererMirror,
    MeshRendererProps, Scope, SyncOutcome, TransformMirror,
};
use scene_engine::ecs::{EntityId, EntityStore, SequentialIdGenerator, StoreError, WorldStore};
use serde_json::{json, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
enum Call {
    Create(String, Option<EntityId>),
    Delete(EntityId),
    Add(EntityId, String, Value),
    Update(EntityId, String, Value),
}

/// Store double that records every mutating call
struct RecordingStore {
    next_id: u32,
    calls: Vec<Call>,
    components: HashMap<(EntityId, String), Value>,
    fail_create: bool,
    fail_delete: bool,
}

impl RecordingStore {
    fn new() -> Self {
        Self::starting_at(1)
    }

    fn starting_at(next_id: u32) -> Self {
        Self {
            next_id,
            calls: Vec::new(),
            components: HashMap::new(),
            fail_create: false,
            fail_delete: false,
        }
    }

    fn creates(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Create(..)))
            .collect()
    }

    fn deletes(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Delete(_)))
            .count()
    }

    fn writes_of(&self, kind: &str) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|call| match call {
                Call::Add(_, k, _) | Call::Update(_, k, _) => k == kind,
                _ => false,
            })
            .collect()
    }
}

impl EntityStore for RecordingStore {
    fn create_entity(
        &mut self,
        name: &str,
        parent: Option<EntityId>,
    ) -> Result<EntityId, StoreError> {
        self.calls.push(Call::Create(name.to_string(), parent));
        if self.fail_create {
            return Err(StoreError::Rejected("create disabled".to_string()));
        }
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        Ok(id)
    }

    fn delete_entity(&mut self, id: EntityId) -> Result<(), StoreError> {
        self.calls.push(Call::Delete(id));
        if self.fail_delete {
            return Err(StoreError::Rejected("delete disabled".to_string()));
        }
        self.components.retain(|(entity, _), _| *entity != id);
        Ok(())
    }

    fn has_component(&self, id: EntityId, kind: &str) -> bool {
        self.components.contains_key(&(id, kind.to_string()))
    }

    fn add_component(&mut self, id: EntityId, kind: &str, data: Value) -> Result<(), StoreError> {
        self.calls.push(Call::Add(id, kind.to_string(), data.clone()));
        self.components.insert((id, kind.to_string()), data);
        Ok(())
    }

    fn update_component(
        &mut self,
        id: EntityId,
        kind: &str,
        data: Value,
    ) -> Result<(), StoreError> {
        self.calls
            .push(Call::Update(id, kind.to_string(), data.clone()));
        self.components.insert((id, kind.to_string()), data);
        Ok(())
    }

    fn component(&self, id: EntityId, kind: &str) -> Option<Value> {
        self.components.get(&(id, kind.to_string())).cloned()
    }
}

fn scope_for(id: u32) -> Scope {
    Scope::with_entity(EntityContext {
        entity_id: EntityId::new(id),
        entity_name: "Lamp".to_string(),
        stable_id: "lamp".to_string(),
    })
}

#[test]
fn test_mount_creates_named_entity() {
    let mut store = RecordingStore::new();
    let ids = SequentialIdGenerator::new("id");

    let mut player = EntityNode::new(EntityProps::new("Player"));
    player.mount(&mut store, &ids);

    let mut child = EntityNode::new(EntityProps::new("Child").with_parent(EntityId::new(1)));
    child.mount(&mut store, &ids);

    assert_eq!(
        store.creates(),
        vec![
            &Call::Create("Player".to_string(), None),
            &Call::Create("Child".to_string(), Some(EntityId::new(1))),
        ]
    );
}

#[test]
fn test_light_added_then_updated() {
    let mut store = RecordingStore::new();
    let scope = scope_for(42);
    let props = Light {
        range: 15.0,
        ..Light::of_type(LightType::Point)
    };
    let expected = serde_json::to_value(&props).unwrap();
    assert_eq!(expected["lightType"], "point");
    assert_eq!(expected["range"], 15.0);
    assert_eq!(expected["intensity"], 1.0);
    assert_eq!(expected["shadowMapSize"], 2048);

    let mut mirror = LightMirror::new();
    assert_eq!(mirror.sync(&scope, &mut store, &props), Ok(SyncOutcome::Added));
    assert_eq!(
        store.calls,
        vec![Call::Add(EntityId::new(42), "Light".to_string(), expected.clone())]
    );

    // A second wrapper over the same entity now finds the component present
    let mut rerendered = LightMirror::new();
    assert_eq!(
        rerendered.sync(&scope, &mut store, &props),
        Ok(SyncOutcome::Updated)
    );
    assert_eq!(
        store.calls.last(),
        Some(&Call::Update(EntityId::new(42), "Light".to_string(), expected))
    );
    assert_eq!(store.writes_of("Light").len(), 2);
}

#[test]
fn test_mirror_skips_equal_props() {
    let mut store = RecordingStore::new();
    let scope = scope_for(7);
    let mut mirror = TransformMirror::new();

    let pose = Transform::from_position([1.0, 2.0, 3.0]);
    assert_eq!(mirror.sync(&scope, &mut store, &pose), Ok(SyncOutcome::Added));
    assert_eq!(
        mirror.sync(&scope, &mut store, &pose.clone()),
        Ok(SyncOutcome::Unchanged)
    );

    let moved = pose.with_scale([2.0, 2.0, 2.0]);
    assert_eq!(mirror.sync(&scope, &mut store, &moved), Ok(SyncOutcome::Updated));
    assert_eq!(store.writes_of("Transform").len(), 2);

    // A different entity in scope is a change even with equal props
    let other = scope_for(8);
    assert_eq!(mirror.sync(&other, &mut store, &moved), Ok(SyncOutcome::Added));
}

#[test]
fn test_material_override_merged_over_defaults() {
    let mut store = RecordingStore::new();
    let scope = scope_for(3);
    let props = MeshRendererProps {
        mesh_id: Some("cube".to_string()),
        material: Some(MaterialOverride {
            color: Some("#ff0000".to_string()),
            roughness: Some(0.25),
            ..Default::default()
        }),
        ..Default::default()
    };

    let mut mirror = MeshRendererMirror::new();
    mirror.sync(&scope, &mut store, &props).unwrap();

    let stored = store.component(EntityId::new(3), "MeshRenderer").unwrap();
    let expected = serde_json::to_value(MaterialData {
        color: "#ff0000".to_string(),
        roughness: 0.25,
        ..MaterialData::default()
    })
    .unwrap();
    assert_eq!(stored["material"], expected);

    let defaults = serde_json::to_value(MaterialData::default()).unwrap();
    for key in defaults.as_object().unwrap().keys() {
        assert!(stored["material"].get(key).is_some(), "{key} dropped");
    }
    assert_eq!(stored["meshId"], "cube");
    assert_eq!(stored["castShadows"], true);

    // An equal override built anew causes no write
    let rebuilt = MeshRendererProps {
        material: Some(MaterialOverride {
            color: Some("#ff0000".to_string()),
            roughness: Some(0.25),
            ..Default::default()
        }),
        ..props.clone()
    };
    assert_eq!(
        mirror.sync(&scope, &mut store, &rebuilt),
        Ok(SyncOutcome::Unchanged)
    );
    assert_eq!(store.writes_of("MeshRenderer").len(), 1);
}

#[test]
fn test_mount_is_latched_per_activation() {
    let mut store = RecordingStore::new();
    let ids = SequentialIdGenerator::new("id");
    let mut node = EntityNode::new(EntityProps::new("Player"));

    node.mount(&mut store, &ids);
    node.mount(&mut store, &ids);
    assert_eq!(store.creates().len(), 1);

    node.unmount(&mut store);
    assert_eq!(store.deletes(), 1);

    node.mount(&mut store, &ids);
    node.mount(&mut store, &ids);
    assert_eq!(store.creates().len(), 2);

    node.unmount(&mut store);
    assert_eq!(store.deletes(), 2);
}

#[test]
fn test_explicit_stable_id_suppresses_generation() {
    let mut store = RecordingStore::new();
    let ids = SequentialIdGenerator::new("gen");

    let mut explicit = EntityNode::new(EntityProps::new("Saved").with_stable_id("saved-1"));
    let context = explicit.mount(&mut store, &ids).unwrap().clone();
    assert_eq!(context.stable_id, "saved-1");
    assert_eq!(ids.generated(), 0);
    assert_eq!(
        store.component(context.entity_id, "PersistentId"),
        Some(json!({"id": "saved-1"}))
    );

    let mut generated = EntityNode::new(EntityProps::new("Fresh"));
    let context = generated.mount(&mut store, &ids).unwrap().clone();
    generated.mount(&mut store, &ids);
    assert_eq!(context.stable_id, "gen-0");
    assert_eq!(ids.generated(), 1);
}

#[test]
fn test_existing_identity_slot_is_updated() {
    let mut store = RecordingStore::new();
    store
        .components
        .insert((EntityId::new(1), "PersistentId".to_string()), json!({"id": "auto"}));
    let ids = SequentialIdGenerator::new("gen");

    let mut node = EntityNode::new(EntityProps::new("Player").with_stable_id("player"));
    node.mount(&mut store, &ids);

    assert_eq!(
        store.writes_of("PersistentId"),
        vec![&Call::Update(
            EntityId::new(1),
            "PersistentId".to_string(),
            json!({"id": "player"})
        )]
    );
}

#[test]
fn test_failed_create_gates_cleanup() {
    let mut store = RecordingStore::new();
    store.fail_create = true;
    let ids = SequentialIdGenerator::new("gen");

    let mut node = EntityNode::new(EntityProps::new("Doomed"));
    assert!(node.mount(&mut store, &ids).is_none());
    assert!(node.child_scope().is_none());
    assert_eq!(ids.generated(), 0);

    node.unmount(&mut store);
    assert_eq!(store.deletes(), 0);
}

#[test]
fn test_failed_delete_is_not_retried() {
    let mut store = RecordingStore::new();
    store.fail_delete = true;
    let ids = SequentialIdGenerator::new("gen");

    let mut node = EntityNode::new(EntityProps::new("Leaky"));
    node.mount(&mut store, &ids);
    node.unmount(&mut store);
    node.unmount(&mut store);
    assert_eq!(store.deletes(), 1);
    assert!(!node.is_mounted());
}

#[test]
fn test_context_contract() {
    let mut store = RecordingStore::new();
    let root = Scope::root();

    assert_eq!(root.require_entity(), Err(ContextError::MissingEntity));
    assert!(root.try_entity().is_none());

    let mut mirror = LightMirror::new();
    assert_eq!(
        mirror.sync(&root, &mut store, &Light::default()),
        Err(ContextError::MissingEntity)
    );
    assert!(store.calls.is_empty());
}

#[test]
fn test_nested_entities_in_world_store() {
    let mut store = WorldStore::default();
    let ids = SequentialIdGenerator::new("tree");

    let mut parent = EntityNode::new(EntityProps::new("Parent"));
    let scope = parent
        .mount(&mut store, &ids)
        .map(|c| Scope::with_entity(c.clone()))
        .unwrap();

    let mut child = EntityNode::new(EntityProps::new("Child").in_scope(&scope));
    let child_scope = child
        .mount(&mut store, &ids)
        .map(|c| Scope::with_entity(c.clone()))
        .unwrap();

    let mut light = LightMirror::new();
    light
        .sync(&child_scope, &mut store, &Light::of_type(LightType::Spot))
        .unwrap();

    let parent_id = scope.require_entity().unwrap().entity_id;
    let child_id = child_scope.require_entity().unwrap().entity_id;
    assert_eq!(store.parent(child_id), Some(parent_id));
    assert_eq!(store.component(child_id, "Light").unwrap()["lightType"], "spot");

    // Deleting the parent cascades, so the child's own delete fails and is only logged
    parent.unmount(&mut store);
    assert!(!store.contains(child_id));
    child.unmount(&mut store);
    assert!(store.is_empty());
}
