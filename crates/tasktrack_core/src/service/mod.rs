//! Intake use-cases layered on the domain store.
//!
//! # Responsibility
//! - Turn raw form input into validated entities with allocated ids.
//! - Route every write through the store's mutation operations.
//!
//! # Invariants
//! - Services never touch storage directly.
//! - A rejected draft leaves store state unchanged.

pub mod intake;
