//! Core domain logic for net-worth tracking.
//! This crate is the single source of truth for what user and item data is
//! admissible and how net-worth figures are derived.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::item::{Item, ItemId, ItemKind};
pub use model::user::{User, UserId, UserLookup};
pub use repo::sqlite_store::{SqliteStore, StoreOptions};
pub use repo::store::{Store, StoreError, StoreResult};
pub use service::error::{ServiceError, ServiceResult};
pub use service::item_service::{validate_item, ItemReport, ItemService};
pub use service::user_service::{validate_user_name, UserService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
