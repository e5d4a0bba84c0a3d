//! Id generation service.
//!
//! # Responsibility
//! - Produce candidate entity ids for the domain store.
//!
//! # Invariants
//! - Generators only propose ids; uniqueness within a collection is checked
//!   by the store before an id is handed out.
//! - `SequentialIdGenerator` never repeats a value within its lifetime.

use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Source of candidate entity ids.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// Random v4 UUID ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Monotonic `<prefix><n>` ids.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self::starting_at(prefix, 1)
    }

    pub fn starting_at(prefix: impl Into<String>, first: u64) -> Self {
        Self {
            prefix: prefix.into(),
            next: first,
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> String {
        let id = format!("{}{}", self.prefix, self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Id allocation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// Every candidate within the attempt budget was already taken.
    Exhausted { attempts: usize },
}

impl Display for IdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exhausted { attempts } => {
                write!(f, "no free id after {attempts} generated candidates")
            }
        }
    }
}

impl Error for IdError {}

/// Draws candidates until one is not `taken`.
pub fn allocate_id(
    generator: &mut dyn IdGenerator,
    max_attempts: usize,
    taken: impl Fn(&str) -> bool,
) -> Result<String, IdError> {
    for _ in 0..max_attempts {
        let candidate = generator.next_id();
        if !candidate.is_empty() && !taken(&candidate) {
            return Ok(candidate);
        }
    }
    Err(IdError::Exhausted {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::{allocate_id, IdError, IdGenerator, SequentialIdGenerator, UuidIdGenerator};

    struct Constant;

    impl IdGenerator for Constant {
        fn next_id(&mut self) -> String {
            "same".to_string()
        }
    }

    #[test]
    fn sequential_ids_are_monotonic() {
        let mut generator = SequentialIdGenerator::new("t-");
        assert_eq!(generator.next_id(), "t-1");
        assert_eq!(generator.next_id(), "t-2");
    }

    #[test]
    fn allocation_skips_taken_candidates() {
        let mut generator = SequentialIdGenerator::new("");
        let id = allocate_id(&mut generator, 8, |candidate| candidate == "1" || candidate == "2")
            .unwrap();
        assert_eq!(id, "3");
    }

    #[test]
    fn allocation_gives_up_after_budget() {
        let err = allocate_id(&mut Constant, 4, |_| true).unwrap_err();
        assert_eq!(err, IdError::Exhausted { attempts: 4 });
    }

    #[test]
    fn uuid_ids_differ() {
        let mut generator = UuidIdGenerator;
        assert_ne!(generator.next_id(), generator.next_id());
    }
}
