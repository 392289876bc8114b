//! Domain model for users and their financial items.
//!
//! # Responsibility
//! - Define the records shared by the storage gateway and domain services.
//! - Keep the external field naming (`Id`, `Uid`, `Type`, ...) in one place.
//!
//! # Invariants
//! - Ids are assigned by storage and never reused by the core.
//! - Every item is owned by exactly one user.

pub mod item;
pub mod user;
