//! SQLite implementation of the storage gateway.
//!
//! # Responsibility
//! - Own the single shared connection and its lifecycle (open, bootstrap,
//!   interrupt, close).
//! - Keep SQL text and row mapping inside the persistence boundary.
//!
//! # Invariants
//! - Every statement runs while holding the connection mutex; that mutex is
//!   the only serialization point for the handle.
//! - List queries return rows in ascending primary-key order.
//! - Rows with an unknown `items.type` are kept as `ItemKind::Other`; a
//!   NULL `type` is rejected as invalid data.

use crate::db::migrations::apply_migrations;
use crate::db::{open_db_in_memory, open_db_with_timeout, DEFAULT_BUSY_TIMEOUT};
use crate::model::item::{Item, ItemId, ItemKind};
use crate::model::user::{User, UserId};
use crate::repo::store::{Store, StoreError, StoreResult};
use rusqlite::{params, Connection, ErrorCode, InterruptHandle, OptionalExtension, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

const USER_SELECT_SQL: &str = "SELECT uid, name FROM users";
const ITEM_SELECT_SQL: &str = "SELECT id, uid, name, type, value FROM items";

/// Options applied when opening a file-backed store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Upper bound on waiting for a locked database file.
    pub busy_timeout: Duration,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}

/// SQLite-backed storage gateway shared by all request handlers.
pub struct SqliteStore {
    conn: Mutex<Connection>,
    interrupt: InterruptHandle,
}

impl SqliteStore {
    /// Opens (creating if needed) a database file and bootstraps its schema.
    pub fn open(path: impl AsRef<Path>, options: StoreOptions) -> StoreResult<Self> {
        let conn = open_db_with_timeout(path, options.busy_timeout)?;
        Ok(Self::from_bootstrapped(conn))
    }

    /// Opens a private in-memory database with the schema applied.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = open_db_in_memory()?;
        Ok(Self::from_bootstrapped(conn))
    }

    fn from_bootstrapped(conn: Connection) -> Self {
        let interrupt = conn.get_interrupt_handle();
        Self {
            conn: Mutex::new(conn),
            interrupt,
        }
    }

    /// Aborts the statement currently running on the shared connection.
    ///
    /// The interrupted call returns a storage error; later calls are
    /// unaffected. Calling this while the connection is idle is a no-op.
    pub fn interrupt(&self) {
        self.interrupt.interrupt();
    }

    /// Closes the underlying connection, reporting close failures.
    pub fn close(self) -> StoreResult<()> {
        let conn = self
            .conn
            .into_inner()
            .map_err(|_| StoreError::LockPoisoned)?;
        conn.close().map_err(|(_, err)| StoreError::from(err))
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Store for SqliteStore {
    fn bootstrap(&self) -> StoreResult<()> {
        let mut conn = self.lock()?;
        apply_migrations(&mut conn)?;
        Ok(())
    }

    fn insert_user(&self, name: &str) -> StoreResult<UserId> {
        let conn = self.lock()?;
        conn.execute("INSERT INTO users (name) VALUES (?1);", [name])
            .map_err(map_write_error)?;
        Ok(conn.last_insert_rowid())
    }

    fn find_user_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        let conn = self.lock()?;
        let user = conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE name = ?1 LIMIT 1;"),
                [name],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn find_user_by_id(&self, id: UserId) -> StoreResult<Option<User>> {
        let conn = self.lock()?;
        let user = conn
            .query_row(
                &format!("{USER_SELECT_SQL} WHERE uid = ?1;"),
                [id],
                parse_user_row,
            )
            .optional()?;
        Ok(user)
    }

    fn list_users(&self) -> StoreResult<Vec<User>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{USER_SELECT_SQL} ORDER BY uid ASC;"))?;
        let users = stmt
            .query_map([], parse_user_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(users)
    }

    fn insert_item(
        &self,
        owner_id: UserId,
        name: &str,
        kind: ItemKind,
        value: i64,
    ) -> StoreResult<ItemId> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO items (uid, name, type, value) VALUES (?1, ?2, ?3, ?4);",
            params![owner_id, name, kind.as_str(), value],
        )
        .map_err(map_write_error)?;
        Ok(conn.last_insert_rowid())
    }

    fn replace_item(&self, item: &Item) -> StoreResult<()> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE items
                 SET
                    uid = ?2,
                    name = ?3,
                    type = ?4,
                    value = ?5
                 WHERE id = ?1;",
                params![
                    item.id,
                    item.owner_id,
                    item.name.as_str(),
                    item.kind.as_str(),
                    item.value,
                ],
            )
            .map_err(map_write_error)?;

        if changed == 0 {
            return Err(StoreError::NotFound(item.id));
        }

        Ok(())
    }

    fn delete_item(&self, id: ItemId) -> StoreResult<()> {
        let conn = self.lock()?;
        conn.execute("DELETE FROM items WHERE id = ?1;", [id])?;
        Ok(())
    }

    fn list_items_by_owner(&self, owner_id: UserId) -> StoreResult<Vec<Item>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{ITEM_SELECT_SQL} WHERE uid = ?1 ORDER BY id ASC;"))?;
        let mut rows = stmt.query([owner_id])?;
        let mut items = Vec::new();

        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn find_item_by_id(&self, id: ItemId) -> StoreResult<Option<Item>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }

        Ok(None)
    }
}

fn parse_user_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("uid")?,
        name: row.get("name")?,
    })
}

fn parse_item_row(row: &Row<'_>) -> StoreResult<Item> {
    let id: ItemId = row.get("id")?;
    let type_text: Option<String> = row.get("type")?;
    let kind = type_text.map(ItemKind::from_persisted).ok_or_else(|| {
        StoreError::InvalidData(format!("missing item type in items.type (id {id})"))
    })?;

    Ok(Item {
        id,
        owner_id: row.get("uid")?,
        name: row.get("name")?,
        kind,
        value: row.get("value")?,
    })
}

fn map_write_error(err: rusqlite::Error) -> StoreError {
    match err {
        rusqlite::Error::SqliteFailure(code, message)
            if code.code == ErrorCode::ConstraintViolation =>
        {
            StoreError::Conflict(message.unwrap_or_else(|| code.to_string()))
        }
        other => other.into(),
    }
}
