//! SQLite-backed item store.
//!
//! # Responsibility
//! - Implement the store contract over canonical `items` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `AUTOINCREMENT` owns the identity sequence; inserts never pass an id.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::db::migrations::latest_version;
use crate::model::item::{Item, ItemId};
use crate::store::{ItemStore, StoreError, StoreResult};
use log::info;
use rusqlite::{params, Connection, Row};

const ITEM_SELECT_SQL: &str = "SELECT id, description, done FROM items";

/// SQLite-backed item store borrowing a bootstrapped connection.
pub struct SqliteItemStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteItemStore<'conn> {
    /// Wraps a connection after verifying schema readiness.
    ///
    /// # Errors
    /// - `UninitializedConnection` when `PRAGMA user_version` does not match
    ///   the latest migration known by this binary.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the `items`
    ///   schema is incomplete.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl ItemStore for SqliteItemStore<'_> {
    fn insert(&self, candidate: &Item) -> StoreResult<ItemId> {
        // The id column is intentionally absent: identity always comes from
        // the AUTOINCREMENT sequence, never from the candidate.
        self.conn.execute(
            "INSERT INTO items (description, done) VALUES (?1, ?2);",
            params![candidate.description.as_str(), int_from_bool(candidate.done)],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get(&self, id: ItemId) -> StoreResult<Option<Item>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_item_row(row)?));
        }

        Ok(None)
    }

    fn list(&self) -> StoreResult<Vec<Item>> {
        // Ids are monotonic, so id order is insertion order.
        let mut stmt = self
            .conn
            .prepare(&format!("{ITEM_SELECT_SQL} ORDER BY id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            items.push(parse_item_row(row)?);
        }

        Ok(items)
    }

    fn update(&self, id: ItemId, item: &Item) -> StoreResult<bool> {
        let changed = self.conn.execute(
            "UPDATE items SET description = ?2, done = ?3 WHERE id = ?1;",
            params![id, item.description.as_str(), int_from_bool(item.done)],
        )?;
        Ok(changed > 0)
    }

    fn delete(&self, id: ItemId) -> StoreResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM items WHERE id = ?1;", [id])?;
        Ok(removed > 0)
    }

    fn reset_sequence(&self) -> StoreResult<()> {
        // Rows and the AUTOINCREMENT high-water mark must go together, so the
        // next insert after a reset observes a pristine sequence.
        self.conn.execute_batch(
            "BEGIN;
             DELETE FROM items;
             DELETE FROM sqlite_sequence WHERE name = 'items';
             COMMIT;",
        )?;
        info!("event=sequence_reset module=store status=ok backend=sqlite");
        Ok(())
    }
}

fn parse_item_row(row: &Row<'_>) -> StoreResult<Item> {
    let done = match row.get::<_, i64>("done")? {
        0 => false,
        1 => true,
        other => {
            return Err(StoreError::InvalidData(format!(
                "invalid done value `{other}` in items.done"
            )));
        }
    };

    let item = Item {
        id: row.get("id")?,
        description: row.get("description")?,
        done,
    };
    item.validate()
        .map_err(|err| StoreError::InvalidData(err.to_string()))?;
    Ok(item)
}

fn int_from_bool(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

fn ensure_connection_ready(conn: &Connection) -> StoreResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(StoreError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, "items")? {
        return Err(StoreError::MissingRequiredTable("items"));
    }

    for column in ["id", "description", "done"] {
        if !table_has_column(conn, "items", column)? {
            return Err(StoreError::MissingRequiredColumn {
                table: "items",
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> StoreResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> StoreResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
