//! Structural checks run before a scene is mounted

use super::component_registry::ComponentRegistry;
use super::scene::{EntityDescriptor, SceneDescriptor, SceneEntityId};
use crate::components::Instanced;
use std::collections::{HashMap, HashSet};
use std::fmt;
use tracing::{debug, warn};

/// A single finding about a scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    DuplicateId(SceneEntityId),
    DuplicatePersistentId(String),
    UnknownParent {
        entity: SceneEntityId,
        parent: SceneEntityId,
    },
    ParentCycle(SceneEntityId),
    UnknownComponent {
        entity: SceneEntityId,
        kind: String,
    },
    InvalidComponent {
        entity: SceneEntityId,
        kind: String,
        message: String,
    },
    OverCapacity {
        entity: SceneEntityId,
        instances: usize,
        capacity: usize,
    },
    UnknownLockedEntity(SceneEntityId),
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::DuplicateId(id) => write!(f, "entity id {id} is used more than once"),
            ValidationIssue::DuplicatePersistentId(id) => {
                write!(f, "persistent id {id} is used more than once")
            }
            ValidationIssue::UnknownParent { entity, parent } => {
                write!(f, "entity {entity} names unknown parent {parent}")
            }
            ValidationIssue::ParentCycle(id) => write!(f, "entity {id} is its own ancestor"),
            ValidationIssue::UnknownComponent { entity, kind } => {
                write!(f, "entity {entity} has unregistered component {kind}")
            }
            ValidationIssue::InvalidComponent {
                entity,
                kind,
                message,
            } => write!(f, "entity {entity} has invalid {kind} data: {message}"),
            ValidationIssue::OverCapacity {
                entity,
                instances,
                capacity,
            } => write!(
                f,
                "entity {entity} declares {instances} instances over a capacity of {capacity}"
            ),
            ValidationIssue::UnknownLockedEntity(id) => {
                write!(f, "locked id {id} names no entity")
            }
        }
    }
}

/// Errors block loading, warnings do not
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} error(s), {} warning(s)",
            self.errors.len(),
            self.warnings.len()
        )?;
        for error in &self.errors {
            write!(f, "; {error}")?;
        }
        Ok(())
    }
}

/// Duplicate entity ids and persistent ids among `entities`
///
/// Run on authored scenes and again on the entity list after prefab
/// expansion, which can introduce collisions of its own.
pub fn validate_identities(entities: &[EntityDescriptor]) -> ValidationReport {
    let mut report = ValidationReport::default();

    let mut seen_ids = HashSet::new();
    for entity in entities {
        if !seen_ids.insert(&entity.id) {
            report.errors.push(ValidationIssue::DuplicateId(entity.id.clone()));
        }
    }

    let mut seen_persistent = HashSet::new();
    for persistent_id in entities.iter().filter_map(|e| e.persistent_id()) {
        if !seen_persistent.insert(persistent_id) {
            report
                .errors
                .push(ValidationIssue::DuplicatePersistentId(persistent_id.to_string()));
        }
    }
    report
}

/// Check ids, hierarchy and component data of a scene
pub fn validate_scene(scene: &SceneDescriptor, registry: &ComponentRegistry) -> ValidationReport {
    let mut report = validate_identities(&scene.entities);
    let seen_ids: HashSet<&SceneEntityId> = scene.entities.iter().map(|e| &e.id).collect();

    let parents: HashMap<&SceneEntityId, &SceneEntityId> = scene
        .entities
        .iter()
        .filter_map(|e| e.parent_id.as_ref().map(|parent| (&e.id, parent)))
        .collect();

    for entity in &scene.entities {
        if let Some(parent) = &entity.parent_id {
            if !seen_ids.contains(parent) {
                report.errors.push(ValidationIssue::UnknownParent {
                    entity: entity.id.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    for entity in &scene.entities {
        let mut cursor = parents.get(&entity.id).copied();
        let mut steps = 0;
        while let Some(ancestor) = cursor {
            if ancestor == &entity.id {
                report
                    .errors
                    .push(ValidationIssue::ParentCycle(entity.id.clone()));
                break;
            }
            steps += 1;
            if steps > parents.len() {
                break;
            }
            cursor = parents.get(ancestor).copied();
        }
    }

    for entity in &scene.entities {
        for (kind, data) in &entity.components {
            if !registry.is_registered(kind) {
                report.warnings.push(ValidationIssue::UnknownComponent {
                    entity: entity.id.clone(),
                    kind: kind.clone(),
                });
                continue;
            }
            match registry.deserialize_component(kind, data) {
                Ok(decoded) => {
                    if let Some(instanced) = decoded.downcast_ref::<Instanced>() {
                        if !instanced.within_capacity() {
                            report.warnings.push(ValidationIssue::OverCapacity {
                                entity: entity.id.clone(),
                                instances: instanced.instances.len(),
                                capacity: instanced.capacity,
                            });
                        }
                    }
                }
                Err(err) => report.warnings.push(ValidationIssue::InvalidComponent {
                    entity: entity.id.clone(),
                    kind: kind.clone(),
                    message: err.to_string(),
                }),
            }
        }
    }

    for locked in &scene.locked_entity_ids {
        if !seen_ids.contains(locked) {
            report
                .warnings
                .push(ValidationIssue::UnknownLockedEntity(locked.clone()));
        }
    }

    for warning in &report.warnings {
        warn!(scene = %scene.metadata.name, "{warning}");
    }
    debug!(
        scene = %scene.metadata.name,
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "Validated scene"
    );
    report
}
