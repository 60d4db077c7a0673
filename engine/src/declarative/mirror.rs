//! Data-mirroring wrappers: keep one component in step with declared props

use super::context::{ContextError, Scope};
use crate::components::{
    Camera, Instanced, Light, MaterialData, MaterialOverride, MeshRenderer, Transform,
};
use crate::ecs::{upsert_component, EntityId, EntityStore, Upsert};
use serde::Serialize;
use tracing::{error, trace};

/// Props that map onto one component kind
pub trait ComponentProps: Clone + PartialEq {
    /// Component kind written to the store
    const KIND: &'static str;

    /// Record stored for these props
    type Data: Serialize;

    fn to_data(&self) -> Self::Data;
}

macro_rules! record_props {
    ($($record:ty => $kind:literal),* $(,)?) => {
        $(
            impl ComponentProps for $record {
                const KIND: &'static str = $kind;
                type Data = $record;

                fn to_data(&self) -> Self::Data {
                    self.clone()
                }
            }
        )*
    };
}

record_props! {
    Transform => "Transform",
    Camera => "Camera",
    Light => "Light",
    Instanced => "Instanced",
}

/// Declared mesh renderer props
///
/// `material` is a partial override; the stored record always carries a
/// complete [`MaterialData`] with the override applied over the defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshRendererProps {
    pub mesh_id: Option<String>,
    pub material_id: Option<String>,
    pub materials: Option<Vec<String>>,
    pub material: Option<MaterialOverride>,
    pub model_path: Option<String>,
    pub enabled: bool,
    pub cast_shadows: bool,
    pub receive_shadows: bool,
}

impl Default for MeshRendererProps {
    fn default() -> Self {
        Self {
            mesh_id: None,
            material_id: None,
            materials: None,
            material: None,
            model_path: None,
            enabled: true,
            cast_shadows: true,
            receive_shadows: true,
        }
    }
}

impl ComponentProps for MeshRendererProps {
    const KIND: &'static str = "MeshRenderer";
    type Data = MeshRenderer;

    fn to_data(&self) -> MeshRenderer {
        MeshRenderer {
            mesh_id: self.mesh_id.clone(),
            material_id: self.material_id.clone(),
            materials: self.materials.clone(),
            material: self
                .material
                .as_ref()
                .map(|patch| MaterialData::default().merged(patch)),
            model_path: self.model_path.clone(),
            enabled: self.enabled,
            cast_shadows: self.cast_shadows,
            receive_shadows: self.receive_shadows,
        }
    }
}

/// What a [`Mirror::sync`] call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Added,
    Updated,
    /// Props and entity equal the last sync; nothing written
    Unchanged,
    /// The store refused the write; the failure was logged
    Failed,
}

/// Mirrors props of type `P` into the component of the scope's entity
///
/// Change detection compares props by value, so an equal but freshly built
/// props value causes no write.
#[derive(Debug)]
pub struct Mirror<P: ComponentProps> {
    last: Option<(EntityId, P)>,
}

impl<P: ComponentProps> Default for Mirror<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: ComponentProps> Mirror<P> {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Upsert the component if the entity or props changed since last time
    pub fn sync(
        &mut self,
        scope: &Scope,
        store: &mut dyn EntityStore,
        props: &P,
    ) -> Result<SyncOutcome, ContextError> {
        let entity_id = scope.require_entity()?.entity_id;

        if let Some((last_id, last_props)) = &self.last {
            if *last_id == entity_id && last_props == props {
                trace!(entity = %entity_id, kind = P::KIND, "Props unchanged");
                return Ok(SyncOutcome::Unchanged);
            }
        }
        self.last = Some((entity_id, props.clone()));

        let data = match serde_json::to_value(props.to_data()) {
            Ok(data) => data,
            Err(err) => {
                error!(entity = %entity_id, kind = P::KIND, error = %err, "Failed to encode component");
                return Ok(SyncOutcome::Failed);
            }
        };

        match upsert_component(store, entity_id, P::KIND, data) {
            Ok(Upsert::Added) => Ok(SyncOutcome::Added),
            Ok(Upsert::Updated) => Ok(SyncOutcome::Updated),
            Err(err) => {
                error!(entity = %entity_id, kind = P::KIND, error = %err, "Failed to write component");
                Ok(SyncOutcome::Failed)
            }
        }
    }

    /// The props of the last sync attempt
    pub fn last_synced(&self) -> Option<&P> {
        self.last.as_ref().map(|(_, props)| props)
    }

    /// Forget the last sync so the next one writes unconditionally
    pub fn reset(&mut self) {
        self.last = None;
    }
}

pub type TransformMirror = Mirror<Transform>;
pub type CameraMirror = Mirror<Camera>;
pub type LightMirror = Mirror<Light>;
pub type MeshRendererMirror = Mirror<MeshRendererProps>;
pub type InstancedMirror = Mirror<Instanced>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::LightType;
    use crate::declarative::EntityContext;
    use crate::ecs::WorldStore;

    fn scope_for(store: &mut WorldStore) -> Scope {
        let entity_id = store.create_entity("Target", None).unwrap();
        Scope::with_entity(EntityContext {
            entity_id,
            entity_name: "Target".to_string(),
            stable_id: "target".to_string(),
        })
    }

    #[test]
    fn test_first_sync_adds_then_updates() {
        let mut store = WorldStore::default();
        let scope = scope_for(&mut store);
        let mut mirror = LightMirror::new();

        let point = Light::of_type(LightType::Point);
        assert_eq!(mirror.sync(&scope, &mut store, &point), Ok(SyncOutcome::Added));

        let brighter = Light {
            intensity: 3.0,
            ..point
        };
        assert_eq!(
            mirror.sync(&scope, &mut store, &brighter),
            Ok(SyncOutcome::Updated)
        );
        let id = scope.require_entity().unwrap().entity_id;
        assert_eq!(store.component(id, "Light").unwrap()["intensity"], 3.0);
    }

    #[test]
    fn test_equal_props_skip_write() {
        let mut store = WorldStore::default();
        let scope = scope_for(&mut store);
        let mut mirror = TransformMirror::new();

        let transform = Transform::from_position([1.0, 2.0, 3.0]);
        mirror.sync(&scope, &mut store, &transform).unwrap();
        let again = Transform::from_position([1.0, 2.0, 3.0]);
        assert_eq!(
            mirror.sync(&scope, &mut store, &again),
            Ok(SyncOutcome::Unchanged)
        );

        mirror.reset();
        assert_eq!(
            mirror.sync(&scope, &mut store, &again),
            Ok(SyncOutcome::Updated)
        );
    }

    #[test]
    fn test_sync_outside_entity_fails() {
        let mut store = WorldStore::default();
        let mut mirror = CameraMirror::new();
        let result = mirror.sync(&Scope::root(), &mut store, &Camera::default());
        assert_eq!(result, Err(ContextError::MissingEntity));
        assert!(mirror.last_synced().is_none());
    }

    #[test]
    fn test_mesh_renderer_material_merge() {
        let props = MeshRendererProps {
            mesh_id: Some("cube".to_string()),
            material: Some(MaterialOverride {
                color: Some("#00ff00".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        };
        let data = props.to_data();
        let material = data.material.unwrap();
        assert_eq!(material.color, "#00ff00");
        assert_eq!(material.shader, "standard");
        assert_eq!(material.roughness, 0.5);
        assert!(data.cast_shadows);
    }

    #[test]
    fn test_mesh_renderer_without_override_has_no_inline_material() {
        let props = MeshRendererProps {
            material_id: Some("wood".to_string()),
            ..Default::default()
        };
        assert!(props.to_data().material.is_none());
    }

    #[test]
    fn test_store_failure_reported() {
        let mut store = WorldStore::default();
        let scope = Scope::with_entity(EntityContext {
            entity_id: EntityId::new(7),
            entity_name: "Ghost".to_string(),
            stable_id: "ghost".to_string(),
        });
        let mut mirror = InstancedMirror::new();
        assert_eq!(
            mirror.sync(&scope, &mut store, &Instanced::new("rock", "stone")),
            Ok(SyncOutcome::Failed)
        );
    }
}
