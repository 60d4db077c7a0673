//! Declarative wrappers over an [`EntityStore`](crate::ecs::EntityStore)
//!
//! An [`EntityNode`] owns one entity and publishes it through a [`Scope`];
//! [`Mirror`]s nested in that scope keep one component each in step with
//! their declared props.

pub mod context;
pub mod entity_node;
pub mod mirror;

pub use context::{ContextError, EntityContext, Scope};
pub use entity_node::{EntityNode, EntityProps};
pub use mirror::{
    CameraMirror, ComponentProps, InstancedMirror, LightMirror, MeshRendererMirror,
    MeshRendererProps, Mirror, SyncOutcome, TransformMirror,
};
