//! Services running against non-SQLite gateways.

use networth_core::db::DbError;
use networth_core::{
    Item, ItemId, ItemKind, ItemService, ServiceError, Store, StoreError, StoreResult, User,
    UserId, UserService,
};
use std::sync::Mutex;

/// Vec-backed gateway with switchable failure modes.
#[derive(Default)]
struct MemoryStore {
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    items: Vec<Item>,
    next_id: i64,
    fail_reads: bool,
    /// Hide users from name lookups to mimic a concurrent insert race.
    hide_users_on_lookup: bool,
    /// Drop the target row right before replace, mimicking a concurrent delete.
    vanish_on_replace: bool,
}

impl MemoryStore {
    fn with<T>(&self, f: impl FnOnce(&mut MemoryState) -> T) -> T {
        f(&mut *self.state.lock().unwrap())
    }

    fn read_failure() -> StoreError {
        StoreError::Db(DbError::Sqlite(rusqlite::Error::InvalidQuery))
    }
}

impl MemoryState {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

impl Store for MemoryStore {
    fn bootstrap(&self) -> StoreResult<()> {
        Ok(())
    }

    fn insert_user(&self, name: &str) -> StoreResult<UserId> {
        self.with(|state| {
            if state.users.iter().any(|user| user.name == name) {
                return Err(StoreError::Conflict("users.name".to_string()));
            }
            let id = state.next_id();
            state.users.push(User {
                id,
                name: name.to_string(),
            });
            Ok(id)
        })
    }

    fn find_user_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        self.with(|state| {
            if state.fail_reads {
                return Err(Self::read_failure());
            }
            if state.hide_users_on_lookup {
                return Ok(None);
            }
            Ok(state.users.iter().find(|user| user.name == name).cloned())
        })
    }

    fn find_user_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        self.with(|state| Ok(state.users.iter().find(|user| user.id == id).cloned()))
    }

    fn list_users(&self) -> StoreResult<Vec<User>> {
        self.with(|state| {
            if state.fail_reads {
                return Err(Self::read_failure());
            }
            Ok(state.users.clone())
        })
    }

    fn insert_item(
        &self,
        owner_id: UserId,
        name: &str,
        kind: ItemKind,
        value: i64,
    ) -> StoreResult<ItemId> {
        self.with(|state| {
            let id = state.next_id();
            state.items.push(Item {
                id,
                owner_id,
                name: name.to_string(),
                kind,
                value,
            });
            Ok(id)
        })
    }

    fn replace_item(&self, item: &Item) -> StoreResult<()> {
        self.with(|state| {
            if state.vanish_on_replace {
                state.items.retain(|existing| existing.id != item.id);
            }
            match state.items.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => {
                    *existing = item.clone();
                    Ok(())
                }
                None => Err(StoreError::NotFound(item.id)),
            }
        })
    }

    fn delete_item(&self, id: ItemId) -> StoreResult<()> {
        self.with(|state| {
            state.items.retain(|item| item.id != id);
            Ok(())
        })
    }

    fn list_items_by_owner(&self, owner_id: UserId) -> StoreResult<Vec<Item>> {
        self.with(|state| {
            Ok(state
                .items
                .iter()
                .filter(|item| item.owner_id == owner_id)
                .cloned()
                .collect())
        })
    }

    fn find_item_by_id(&self, id: ItemId) -> StoreResult<Option<Item>> {
        self.with(|state| {
            if state.fail_reads {
                return Err(Self::read_failure());
            }
            Ok(state.items.iter().find(|item| item.id == id).cloned())
        })
    }
}

#[test]
fn services_run_against_substitute_backend() {
    let store = MemoryStore::default();
    UserService::new(&store).add_user("alice").unwrap();

    let items = ItemService::new(&store);
    items.add_item("house", "Asset", "alice", 400).unwrap();
    items.add_item("loan", "Liability", "alice", 150).unwrap();

    let report = items.list_items("alice").unwrap();
    assert_eq!(report.net_worth, 250);
    assert_eq!(report.asset_total, 400);
    assert_eq!(report.liability_total, 150);
}

#[test]
fn services_accept_trait_objects() {
    let store = MemoryStore::default();
    let dyn_store: &dyn Store = &store;

    UserService::new(dyn_store).add_user("alice").unwrap();
    let created = ItemService::new(dyn_store)
        .add_item("bike", "Asset", "alice", 3)
        .unwrap();
    assert_eq!(ItemService::new(dyn_store).find_item(created.id).unwrap(), created);
}

#[test]
fn storage_level_duplicate_is_reported_as_invalid_user_name() {
    let store = MemoryStore::default();
    UserService::new(&store).add_user("alice").unwrap();
    store.with(|state| state.hide_users_on_lookup = true);

    let err = UserService::new(&store).add_user("alice").unwrap_err();
    assert!(matches!(
        err,
        ServiceError::InvalidUserName { reason: "already exists", .. }
    ));
}

#[test]
fn read_failures_propagate_as_storage_failure() {
    let store = MemoryStore::default();
    UserService::new(&store).add_user("alice").unwrap();
    store.with(|state| state.fail_reads = true);

    let err = UserService::new(&store).find_user("alice").unwrap_err();
    assert!(matches!(err, ServiceError::StorageFailure(_)));

    let err = UserService::new(&store).list_users().unwrap_err();
    assert!(matches!(err, ServiceError::StorageFailure(_)));

    let err = ItemService::new(&store)
        .update_item(1, "house", "Asset", "alice", 1)
        .unwrap_err();
    assert!(matches!(err, ServiceError::StorageFailure(_)));

    let err = ItemService::new(&store)
        .add_item("house", "Asset", "alice", 1)
        .unwrap_err();
    assert!(matches!(err, ServiceError::StorageFailure(_)));
}

#[test]
fn item_deleted_between_check_and_replace_reports_not_found() {
    let store = MemoryStore::default();
    UserService::new(&store).add_user("alice").unwrap();
    let items = ItemService::new(&store);
    let created = items.add_item("car", "Asset", "alice", 1).unwrap();
    store.with(|state| state.vanish_on_replace = true);

    let err = items
        .update_item(created.id, "car", "Asset", "alice", 2)
        .unwrap_err();
    assert!(matches!(err, ServiceError::ItemNotFound(id) if id == created.id));
    assert!(items.list_items("alice").unwrap().items.is_empty());
}
