use anyhow::{Context, Result};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{datetime_at, now, uuid_at, Database};
use crate::models::{CreateItemInput, Item, UpdateItemInput};

const ITEM_COLUMNS: &str = "id, category_id, name, packed, assigned_to, created_at";

impl Database {
    pub fn get_items(&self, category_id: Uuid) -> Result<Vec<Item>> {
        self.with_connection(|conn| {
            select_items(
                conn,
                "WHERE category_id = ?1",
                params![category_id.to_string()],
            )
        })
    }

    pub fn get_item(&self, id: Uuid) -> Result<Option<Item>> {
        self.with_connection(|conn| find_item(conn, id))
    }

    pub fn create_item(&self, input: CreateItemInput) -> Result<Item> {
        let id = Uuid::new_v4();
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO items (id, category_id, name, packed, assigned_to, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    id.to_string(),
                    input.category_id.to_string(),
                    input.name,
                    input.packed,
                    input.assigned_to,
                    now()
                ],
            )
            .context("Failed to insert item")?;

            find_item(conn, id)?.context("Inserted item disappeared")
        })
    }

    /// Overwrites the supplied columns. `None` when no row has `input.id`.
    pub fn update_item(&self, input: UpdateItemInput) -> Result<Option<Item>> {
        if input.is_empty() {
            return self.get_item(input.id);
        }

        let mut sets = Vec::new();
        let mut values = Vec::new();
        if let Some(category_id) = input.category_id {
            sets.push("category_id = ?");
            values.push(Value::Text(category_id.to_string()));
        }
        if let Some(name) = input.name {
            sets.push("name = ?");
            values.push(Value::Text(name));
        }
        if let Some(packed) = input.packed {
            sets.push("packed = ?");
            values.push(Value::Integer(packed as i64));
        }
        if let Some(assigned_to) = input.assigned_to {
            sets.push("assigned_to = ?");
            values.push(assigned_to.map_or(Value::Null, Value::Text));
        }
        values.push(Value::Text(input.id.to_string()));

        self.with_connection(|conn| {
            let changed = conn
                .execute(
                    &format!("UPDATE items SET {} WHERE id = ?", sets.join(", ")),
                    params_from_iter(values),
                )
                .context("Failed to update item")?;

            if changed == 0 {
                return Ok(None);
            }
            find_item(conn, input.id)
        })
    }

    pub fn delete_item(&self, id: Uuid) -> Result<bool> {
        self.with_connection(|conn| {
            let removed = conn
                .execute("DELETE FROM items WHERE id = ?1", params![id.to_string()])
                .context("Failed to delete item")?;
            Ok(removed > 0)
        })
    }
}

pub(super) fn select_all(conn: &Connection) -> Result<Vec<Item>> {
    select_items(conn, "", params![])
}

pub(super) fn select_for_trip(conn: &Connection, trip_id: Uuid) -> Result<Vec<Item>> {
    select_items(
        conn,
        "WHERE category_id IN (SELECT id FROM categories WHERE trip_id = ?1)",
        params![trip_id.to_string()],
    )
}

fn select_items(
    conn: &Connection,
    filter: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Vec<Item>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM items {filter} ORDER BY created_at, rowid"
        ))
        .context("Failed to prepare items query")?;

    let rows = stmt
        .query_map(params, item_from_row)
        .context("Failed to query items")?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to collect items")
}

fn find_item(conn: &Connection, id: Uuid) -> Result<Option<Item>> {
    conn.query_row(
        &format!("SELECT {ITEM_COLUMNS} FROM items WHERE id = ?1"),
        params![id.to_string()],
        item_from_row,
    )
    .optional()
    .context("Failed to query item")
}

fn item_from_row(row: &Row) -> rusqlite::Result<Item> {
    Ok(Item {
        id: uuid_at(row, 0)?,
        category_id: uuid_at(row, 1)?,
        name: row.get(2)?,
        packed: row.get(3)?,
        assigned_to: row.get(4)?,
        created_at: datetime_at(row, 5)?,
    })
}
