//! Item use-case service.
//!
//! # Responsibility
//! - Validate item fields and resolve item owners by user name.
//! - Provide create/update/delete entry points over the storage gateway.
//! - Compute per-user net-worth reports.
//!
//! # Invariants
//! - Accepted item names have 2..=199 Unicode code points.
//! - Accepted kinds are exactly `Asset` or `Liability`; values are `>= 0`.
//! - `update_item` checks existence before validating fields, so a missing
//!   id reports `ItemNotFound` even for an invalid payload.
//! - `delete_item` performs no existence or ownership check.
//! - Items with an unknown persisted kind are listed but count in no total.

use crate::model::item::{Item, ItemId, ItemKind};
use crate::repo::store::Store;
use crate::service::error::{ServiceError, ServiceResult};
use crate::service::user_service::UserService;
use log::info;
use serde::{Deserialize, Serialize};

/// Exclusive lower bound on item name length, in code points.
pub const ITEM_NAME_MIN_EXCLUSIVE: usize = 1;
/// Exclusive upper bound on item name length, in code points.
pub const ITEM_NAME_MAX_EXCLUSIVE: usize = 200;

const NAME_TOO_SHORT: &str = "must be longer than 1 character";
const NAME_TOO_LONG: &str = "must be shorter than 200 characters";
const KIND_UNKNOWN: &str = "must be Asset or Liability";
const VALUE_NEGATIVE: &str = "must not be negative";

/// Net-worth report for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ItemReport {
    pub username: String,
    /// Items in storage order.
    pub items: Vec<Item>,
    /// `asset_total - liability_total`.
    pub net_worth: i64,
    pub asset_total: i64,
    pub liability_total: i64,
}

/// Item service over a shared storage gateway.
pub struct ItemService<'s, S: Store + ?Sized> {
    store: &'s S,
    users: UserService<'s, S>,
}

impl<'s, S: Store + ?Sized> ItemService<'s, S> {
    /// Creates a service borrowing the shared store.
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            users: UserService::new(store),
        }
    }

    /// Validates and stores a new item owned by `username`.
    ///
    /// # Contract
    /// - Field validation runs before the owner lookup.
    /// - Returns the created record with its storage-assigned id.
    pub fn add_item(
        &self,
        name: &str,
        kind: &str,
        username: &str,
        value: i64,
    ) -> ServiceResult<Item> {
        let kind = validate_item(name, kind, value)?;
        let owner = self.users.find_user(username)?;

        let id = self.store.insert_item(owner.id, name, kind.clone(), value)?;
        info!(
            "event=item_add module=service status=ok item_id={} uid={} kind={}",
            id, owner.id, kind
        );

        Ok(Item {
            id,
            owner_id: owner.id,
            name: name.to_string(),
            kind,
            value,
        })
    }

    /// Replaces every field of an existing item except its id.
    ///
    /// # Contract
    /// - Order: existence check, field validation, owner lookup, replace.
    /// - An item removed between the check and the replace still reports
    ///   `ItemNotFound`; the row is never recreated.
    pub fn update_item(
        &self,
        id: ItemId,
        name: &str,
        kind: &str,
        username: &str,
        value: i64,
    ) -> ServiceResult<Item> {
        if self.store.find_item_by_id(id)?.is_none() {
            info!("event=item_update module=service status=rejected item_id={id} error_code=item_not_found");
            return Err(ServiceError::ItemNotFound(id));
        }

        let kind = validate_item(name, kind, value)?;
        let owner = self.users.find_user(username)?;

        let item = Item {
            id,
            owner_id: owner.id,
            name: name.to_string(),
            kind,
            value,
        };
        self.store.replace_item(&item)?;
        info!(
            "event=item_update module=service status=ok item_id={} uid={}",
            id, owner.id
        );

        Ok(item)
    }

    /// Deletes an item unconditionally; a missing id is not an error.
    pub fn delete_item(&self, id: ItemId) -> ServiceResult<()> {
        self.store.delete_item(id)?;
        info!("event=item_delete module=service status=ok item_id={id}");
        Ok(())
    }

    /// Gets one item by id.
    pub fn find_item(&self, id: ItemId) -> ServiceResult<Item> {
        self.store
            .find_item_by_id(id)?
            .ok_or(ServiceError::ItemNotFound(id))
    }

    /// Builds the net-worth report for `username`.
    ///
    /// A user without items gets an empty list and zero totals.
    pub fn list_items(&self, username: &str) -> ServiceResult<ItemReport> {
        let owner = self.users.find_user(username)?;
        let items = self.store.list_items_by_owner(owner.id)?;

        let totals = Totals::from_items(&items).ok_or_else(|| ServiceError::TotalOverflow {
            username: username.to_string(),
        })?;

        Ok(ItemReport {
            username: username.to_string(),
            items,
            net_worth: totals.net,
            asset_total: totals.assets,
            liability_total: totals.liabilities,
        })
    }
}

/// Checks item fields without touching storage and returns the parsed kind.
///
/// Checks run in order: name, kind, value.
pub fn validate_item(name: &str, kind: &str, value: i64) -> ServiceResult<ItemKind> {
    let len = name.chars().count();
    if len <= ITEM_NAME_MIN_EXCLUSIVE || len >= ITEM_NAME_MAX_EXCLUSIVE {
        return Err(ServiceError::InvalidItemName {
            name: name.to_string(),
            reason: if len <= ITEM_NAME_MIN_EXCLUSIVE {
                NAME_TOO_SHORT
            } else {
                NAME_TOO_LONG
            },
        });
    }

    let parsed = ItemKind::parse(kind).ok_or_else(|| ServiceError::InvalidItemType {
        kind: kind.to_string(),
        reason: KIND_UNKNOWN,
    })?;

    if value < 0 {
        return Err(ServiceError::InvalidItemValue {
            value,
            reason: VALUE_NEGATIVE,
        });
    }

    Ok(parsed)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Totals {
    net: i64,
    assets: i64,
    liabilities: i64,
}

impl Totals {
    /// Single pass over the items; `None` on `i64` overflow.
    fn from_items(items: &[Item]) -> Option<Self> {
        items.iter().try_fold(Self::default(), |acc, item| match item.kind {
            ItemKind::Asset => Some(Self {
                net: acc.net.checked_add(item.value)?,
                assets: acc.assets.checked_add(item.value)?,
                ..acc
            }),
            ItemKind::Liability => Some(Self {
                net: acc.net.checked_sub(item.value)?,
                liabilities: acc.liabilities.checked_add(item.value)?,
                ..acc
            }),
            ItemKind::Other(_) => Some(acc),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_item, Totals};
    use crate::model::item::{Item, ItemKind};
    use crate::service::error::ServiceError;

    fn item(kind: ItemKind, value: i64) -> Item {
        Item {
            id: 0,
            owner_id: 1,
            name: "entry".to_string(),
            kind,
            value,
        }
    }

    #[test]
    fn validation_checks_name_then_kind_then_value() {
        let err = validate_item("x", "Cash", -1).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidItemName { .. }));

        let err = validate_item("house", "Cash", -1).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidItemType { kind, .. } if kind == "Cash"));

        let err = validate_item("house", "Asset", -1).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidItemValue { value: -1, .. }));

        assert_eq!(validate_item("house", "Asset", 0).unwrap(), ItemKind::Asset);
    }

    #[test]
    fn name_bounds_are_exclusive() {
        assert!(validate_item("ab", "Liability", 1).is_ok());
        assert!(validate_item(&"n".repeat(199), "Liability", 1).is_ok());
        assert!(validate_item(&"n".repeat(200), "Liability", 1).is_err());
        assert!(validate_item("", "Liability", 1).is_err());
    }

    #[test]
    fn totals_follow_kind() {
        let items = [
            item(ItemKind::Asset, 100),
            item(ItemKind::Liability, 30),
            item(ItemKind::Asset, 20),
        ];
        let totals = Totals::from_items(&items).unwrap();
        assert_eq!(totals.net, 90);
        assert_eq!(totals.assets, 120);
        assert_eq!(totals.liabilities, 30);
    }

    #[test]
    fn unknown_kinds_count_in_no_total() {
        let items = [
            item(ItemKind::Asset, 100),
            item(ItemKind::Other("Cash".to_string()), 5),
            item(ItemKind::Liability, 40),
        ];
        let totals = Totals::from_items(&items).unwrap();
        assert_eq!(totals.net, 60);
        assert_eq!(totals.assets, 100);
        assert_eq!(totals.liabilities, 40);
    }

    #[test]
    fn totals_report_overflow_instead_of_wrapping() {
        let items = [item(ItemKind::Asset, i64::MAX), item(ItemKind::Asset, 1)];
        assert!(Totals::from_items(&items).is_none());

        let items = [item(ItemKind::Liability, i64::MAX), item(ItemKind::Liability, 2)];
        assert!(Totals::from_items(&items).is_none());
    }
}
