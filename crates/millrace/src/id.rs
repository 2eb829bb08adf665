//! Identifier generation service.
//!
//! Fresh ids are needed when combinators mint split/join node pairs and when
//! instances are created. The generator is injected rather than reached for
//! globally: production code uses [`UuidIds`], tests use the deterministic
//! [`SequenceIds`] counter so generated models compare equal across runs.

use uuid::Uuid;

/// A source of fresh identifiers.
///
/// Ids must be distinct within any one model; a counter or a UUID generator
/// both qualify.
pub trait NewId {
    /// Produce an id distinct from every id this generator has produced.
    fn new_id(&mut self) -> String;
}

/// UUID v4 identifier source for production use.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl NewId for UuidIds {
    fn new_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Deterministic `prefix-N` identifier source for tests and reproducible
/// model construction.
#[derive(Debug, Clone)]
pub struct SequenceIds {
    prefix: String,
    next: u64,
}

impl SequenceIds {
    /// Create a counter starting at `prefix-0`.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }
}

impl Default for SequenceIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl NewId for SequenceIds {
    fn new_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_ids_are_deterministic() {
        let mut ids = SequenceIds::new("gate");

        assert_eq!(ids.new_id(), "gate-0");
        assert_eq!(ids.new_id(), "gate-1");
        assert_eq!(SequenceIds::new("gate").new_id(), "gate-0");
    }

    #[test]
    fn uuid_ids_are_distinct() {
        let mut ids = UuidIds;

        assert_ne!(ids.new_id(), ids.new_id());
    }
}
