//! Domain services.
//!
//! # Responsibility
//! - Decide which users and items are admissible before they reach storage.
//! - Derive net-worth reports from stored items.
//! - Keep callers decoupled from storage details.

pub mod error;
pub mod item_service;
pub mod user_service;
