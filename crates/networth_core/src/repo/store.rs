//! Storage gateway contract.
//!
//! # Responsibility
//! - Describe the primitives domain services rely on, so they can run
//!   against SQLite or a substitute backend.
//!
//! # Invariants
//! - Read paths report "no rows" as `Ok(None)` / `Ok(vec![])`.
//! - `replace_item` never creates a row; a missing id is `NotFound`.
//! - Storage-level uniqueness rejections surface as `Conflict`.

use crate::db::DbError;
use crate::model::item::{Item, ItemId, ItemKind};
use crate::model::user::{User, UserId};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for storage gateway operations.
#[derive(Debug)]
pub enum StoreError {
    /// Transport/engine failure, including schema bootstrap problems.
    Db(DbError),
    /// Replace targeted an item id with no row.
    NotFound(ItemId),
    /// A storage constraint (e.g. `users.name UNIQUE`) rejected the write.
    Conflict(String),
    /// A persisted row cannot be mapped to the domain model.
    InvalidData(String),
    /// The shared connection lock was poisoned by a panicking holder.
    LockPoisoned,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "item not found: {id}"),
            Self::Conflict(message) => write!(f, "storage constraint violated: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::LockPoisoned => write!(f, "storage connection lock poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) | Self::Conflict(_) | Self::InvalidData(_) | Self::LockPoisoned => {
                None
            }
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Typed CRUD primitives over the `users` and `items` tables.
pub trait Store {
    /// Ensures the schema exists. Safe to call on every start.
    fn bootstrap(&self) -> StoreResult<()>;

    /// Inserts a user and returns the assigned id.
    fn insert_user(&self, name: &str) -> StoreResult<UserId>;
    /// Finds the user with exactly this name.
    fn find_user_by_name(&self, name: &str) -> StoreResult<Option<User>>;
    /// Finds a user by storage id.
    fn find_user_by_id(&self, id: UserId) -> StoreResult<Option<User>>;
    /// Lists every user.
    fn list_users(&self) -> StoreResult<Vec<User>>;

    /// Inserts an item and returns the assigned id.
    fn insert_item(
        &self,
        owner_id: UserId,
        name: &str,
        kind: ItemKind,
        value: i64,
    ) -> StoreResult<ItemId>;
    /// Replaces every column of the row identified by `item.id`.
    fn replace_item(&self, item: &Item) -> StoreResult<()>;
    /// Deletes an item; deleting a missing id succeeds.
    fn delete_item(&self, id: ItemId) -> StoreResult<()>;
    /// Lists the items owned by one user.
    fn list_items_by_owner(&self, owner_id: UserId) -> StoreResult<Vec<Item>>;
    /// Finds an item by storage id.
    fn find_item_by_id(&self, id: ItemId) -> StoreResult<Option<Item>>;
}
