//! Schema versioning for the `users`/`items` store.
//!
//! # Responsibility
//! - Keep the ordered list of schema steps for the net-worth tables.
//! - Bring a connection up to the latest step in one transaction.
//!
//! # Invariants
//! - Step versions are strictly increasing, starting at 1.
//! - The applied step is mirrored to `PRAGMA user_version`.
//! - Step 1 only uses `CREATE TABLE IF NOT EXISTS`, so a database that
//!   already carries the tables at `user_version = 0` is adopted as-is.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    /// Short label for log lines.
    label: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    label: "users_items",
    sql: include_str!("0001_init.sql"),
}];

/// Returns the newest schema version this binary can write.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Brings `conn` up to [`latest_version`].
///
/// Up-to-date connections are left untouched. A database stamped with a
/// newer version fails with [`DbError::UnsupportedSchemaVersion`].
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let from_version = read_user_version(conn)?;
    let latest = latest_version();

    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }
    if from_version == latest {
        return Ok(());
    }

    let adopted = from_version == 0 && has_users_table(conn)?;

    let tx = conn.transaction()?;
    for step in SCHEMA_STEPS.iter().filter(|step| step.version > from_version) {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=db_migrate module=db status=ok version={} label={}",
            step.version, step.label
        );
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=done from_version={} to_version={} adopted_legacy={}",
        from_version, latest, adopted
    );
    Ok(())
}

fn read_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?;
    Ok(version)
}

fn has_users_table(conn: &Connection) -> DbResult<bool> {
    let count: i64 = conn.query_row(
        "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = 'users';",
        [],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}
