//! User use-case service.
//!
//! # Responsibility
//! - Validate user names and enforce name uniqueness.
//! - Resolve user names to stored records for the item service.
//!
//! # Invariants
//! - Accepted names have 2..=63 Unicode code points.
//! - Uniqueness is checked read-before-write without a transaction; a
//!   concurrent duplicate that slips past the check is rejected by the
//!   `users.name UNIQUE` constraint and reported the same way.
//! - Users are never updated or deleted here.

use crate::model::user::{User, UserId, UserLookup};
use crate::repo::store::{Store, StoreError};
use crate::service::error::{ServiceError, ServiceResult};
use log::{info, warn};

/// Exclusive lower bound on user name length, in code points.
pub const USER_NAME_MIN_EXCLUSIVE: usize = 1;
/// Exclusive upper bound on user name length, in code points.
pub const USER_NAME_MAX_EXCLUSIVE: usize = 64;

const NAME_TOO_SHORT: &str = "must be longer than 1 character";
const NAME_TOO_LONG: &str = "must be shorter than 64 characters";
const NAME_TAKEN: &str = "already exists";

/// User service over a shared storage gateway.
pub struct UserService<'s, S: Store + ?Sized> {
    store: &'s S,
}

impl<S: Store + ?Sized> Clone for UserService<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Store + ?Sized> Copy for UserService<'_, S> {}

impl<'s, S: Store + ?Sized> UserService<'s, S> {
    /// Creates a service borrowing the shared store.
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Finds a user by exact name.
    ///
    /// Returns `UserNotFound(ByName)` when no row matches; storage
    /// failures are returned as `StorageFailure`.
    pub fn find_user(&self, name: &str) -> ServiceResult<User> {
        self.store
            .find_user_by_name(name)?
            .ok_or_else(|| ServiceError::UserNotFound(UserLookup::ByName(name.to_string())))
    }

    /// Finds a user by storage id.
    pub fn find_user_by_id(&self, id: UserId) -> ServiceResult<User> {
        self.store
            .find_user_by_id(id)?
            .ok_or(ServiceError::UserNotFound(UserLookup::ById(id)))
    }

    /// Validates and stores a new user, returning the created record.
    ///
    /// # Contract
    /// - Length is checked first, then uniqueness, then the insert runs.
    /// - A duplicate name fails with `InvalidUserName { reason: "already exists" }`
    ///   whether the read check or the storage constraint catches it.
    pub fn add_user(&self, name: &str) -> ServiceResult<User> {
        validate_user_name(name)?;

        if self.store.find_user_by_name(name)?.is_some() {
            info!("event=user_add module=service status=rejected error_code=invalid_user_name reason=duplicate");
            return Err(taken(name));
        }

        let id = match self.store.insert_user(name) {
            Ok(id) => id,
            Err(StoreError::Conflict(_)) => {
                warn!("event=user_add module=service status=rejected error_code=invalid_user_name reason=duplicate_race");
                return Err(taken(name));
            }
            Err(err) => return Err(err.into()),
        };

        info!("event=user_add module=service status=ok uid={id}");
        Ok(User {
            id,
            name: name.to_string(),
        })
    }

    /// Lists all users in storage order.
    pub fn list_users(&self) -> ServiceResult<Vec<User>> {
        Ok(self.store.list_users()?)
    }
}

/// Checks the user name length bounds without touching storage.
pub fn validate_user_name(name: &str) -> ServiceResult<()> {
    let len = name.chars().count();
    let reason = if len <= USER_NAME_MIN_EXCLUSIVE {
        NAME_TOO_SHORT
    } else if len >= USER_NAME_MAX_EXCLUSIVE {
        NAME_TOO_LONG
    } else {
        return Ok(());
    };

    Err(ServiceError::InvalidUserName {
        name: name.to_string(),
        reason,
    })
}

fn taken(name: &str) -> ServiceError {
    ServiceError::InvalidUserName {
        name: name.to_string(),
        reason: NAME_TAKEN,
    }
}

#[cfg(test)]
mod tests {
    use super::validate_user_name;
    use crate::service::error::ServiceError;

    #[test]
    fn length_bounds_are_exclusive() {
        assert!(validate_user_name("").is_err());
        assert!(validate_user_name("a").is_err());
        assert!(validate_user_name("ab").is_ok());
        assert!(validate_user_name(&"x".repeat(63)).is_ok());
        assert!(validate_user_name(&"x".repeat(64)).is_err());
        assert!(validate_user_name(&"x".repeat(65)).is_err());
    }

    #[test]
    fn length_counts_code_points_not_bytes() {
        // 63 code points, 126 bytes.
        let name = "é".repeat(63);
        assert!(validate_user_name(&name).is_ok());

        let err = validate_user_name("日").unwrap_err();
        assert!(matches!(
            err,
            ServiceError::InvalidUserName { reason, .. } if reason.contains("longer")
        ));
    }
}
