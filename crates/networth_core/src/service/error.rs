//! Error taxonomy shared by the user and item services.

use crate::model::item::ItemId;
use crate::model::user::UserLookup;
use crate::repo::store::StoreError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failure returned by domain service operations.
///
/// Every variant carries the offending input so callers can build a
/// user-facing message without re-deriving context.
#[derive(Debug)]
pub enum ServiceError {
    /// User name length out of range, or already taken.
    InvalidUserName { name: String, reason: &'static str },
    /// No user matches the lookup key.
    UserNotFound(UserLookup),
    /// Item name length out of range.
    InvalidItemName { name: String, reason: &'static str },
    /// Item kind is neither `Asset` nor `Liability`.
    InvalidItemType { kind: String, reason: &'static str },
    /// Item value is negative.
    InvalidItemValue { value: i64, reason: &'static str },
    /// Update targeted an item id with no row.
    ItemNotFound(ItemId),
    /// A report total does not fit in `i64`.
    TotalOverflow { username: String },
    /// Any backend failure not classified above.
    StorageFailure(StoreError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidUserName { name, reason } => {
                write!(f, "{name} is an invalid name: {reason}")
            }
            Self::UserNotFound(lookup) => write!(f, "user with {lookup} does not exist"),
            Self::InvalidItemName { name, reason } => {
                write!(f, "{name} is an invalid item name: {reason}")
            }
            Self::InvalidItemType { kind, reason } => {
                write!(f, "{kind} is an invalid item type: {reason}")
            }
            Self::InvalidItemValue { value, reason } => {
                write!(f, "invalid item value {value}: {reason}")
            }
            Self::ItemNotFound(id) => write!(f, "item with id {id} does not exist"),
            Self::TotalOverflow { username } => {
                write!(f, "net worth totals for `{username}` overflow i64")
            }
            Self::StorageFailure(err) => write!(f, "storage failure: {err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::StorageFailure(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::ItemNotFound(id),
            other => Self::StorageFailure(other),
        }
    }
}

impl ServiceError {
    /// Stable short code for structured log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidUserName { .. } => "invalid_user_name",
            Self::UserNotFound(_) => "user_not_found",
            Self::InvalidItemName { .. } => "invalid_item_name",
            Self::InvalidItemType { .. } => "invalid_item_type",
            Self::InvalidItemValue { .. } => "invalid_item_value",
            Self::ItemNotFound(_) => "item_not_found",
            Self::TotalOverflow { .. } => "total_overflow",
            Self::StorageFailure(_) => "storage_failure",
        }
    }
}
