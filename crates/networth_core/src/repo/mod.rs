//! Storage gateway contract and persistence implementations.
//!
//! # Responsibility
//! - Define the typed CRUD primitives for users and items.
//! - Isolate SQLite query details from the domain services.
//!
//! # Invariants
//! - The gateway enforces no business rules beyond storage constraints.
//! - "No rows" is an absent/empty result, never an error.

pub mod sqlite_store;
pub mod store;
