//! Entity storage collaborator
//!
//! [`EntityStore`] is the narrow interface the declarative layer and the
//! scene loader drive. [`WorldStore`] implements it over a `hecs` world.

pub mod identity;
pub mod store;
pub mod world_store;

pub use identity::{SequentialIdGenerator, StableIdGenerator, UuidGenerator};
pub use store::{upsert_component, EntityId, EntityStore, StoreError, Upsert};
pub use world_store::WorldStore;
