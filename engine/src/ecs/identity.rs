//! Stable identity generation
//!
//! Stable ids survive save/reload cycles, unlike the transient [`EntityId`]
//! handed out by a store.
//!
//! [`EntityId`]: super::EntityId

use std::cell::Cell;
use uuid::Uuid;

/// Source of fresh stable identities
pub trait StableIdGenerator {
    /// Produce a new identity string, distinct from all previous ones
    fn generate(&self) -> String;
}

/// Random v4 UUID generator
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidGenerator;

impl StableIdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic generator producing `<prefix>-<n>`
///
/// Useful when the generated ids must be reproducible, e.g. in tests or
/// when stamping editor fixtures.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: Cell<u64>,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: Cell::new(0),
        }
    }

    /// How many ids have been generated so far
    pub fn generated(&self) -> u64 {
        self.next.get()
    }
}

impl StableIdGenerator for SequentialIdGenerator {
    fn generate(&self) -> String {
        let n = self.next.get();
        self.next.set(n + 1);
        format!("{}-{}", self.prefix, n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_generator_unique() {
        let generator = UuidGenerator;
        let a = generator.generate();
        let b = generator.generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(&a).is_ok());
    }

    #[test]
    fn test_sequential_generator() {
        let generator = SequentialIdGenerator::new("entity");
        assert_eq!(generator.generate(), "entity-0");
        assert_eq!(generator.generate(), "entity-1");
        assert_eq!(generator.generated(), 2);
    }
}
