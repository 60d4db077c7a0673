//! Entity-Component System (ECS) functionality
//!
//! Thin helpers over `hecs`: the world wrapper and the bookkeeping
//! components (names, parents, untyped extras) every stored entity carries.

pub mod components;
pub mod world;

// Re-export commonly used types
pub use components::{ExtraComponents, Name, Parent};
pub use world::World;

// Re-export hecs types that users will need
pub use hecs::Entity;
