use std::collections::HashMap;

use anyhow::{Context, Result};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{datetime_at, items, now, uuid_at, Database};
use crate::models::{Category, CategoryTree, CreateCategoryInput, Item, UpdateCategoryInput};

const CATEGORY_COLUMNS: &str = "id, trip_id, name, collapsed, created_at";

impl Database {
    /// Categories of one trip, each with its items.
    pub fn get_category_trees(&self, trip_id: Uuid) -> Result<Vec<CategoryTree>> {
        self.with_connection(|conn| {
            let categories = select_categories(
                conn,
                "WHERE trip_id = ?1",
                params![trip_id.to_string()],
            )?;
            let items = items::select_for_trip(conn, trip_id)?;
            Ok(attach_items(categories, items))
        })
    }

    pub fn get_category(&self, id: Uuid) -> Result<Option<Category>> {
        self.with_connection(|conn| find_category(conn, id))
    }

    pub fn create_category(&self, input: CreateCategoryInput) -> Result<Category> {
        let id = Uuid::new_v4();
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO categories (id, trip_id, name, collapsed, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    id.to_string(),
                    input.trip_id.to_string(),
                    input.name,
                    input.collapsed,
                    now()
                ],
            )
            .context("Failed to insert category")?;

            find_category(conn, id)?.context("Inserted category disappeared")
        })
    }

    /// Overwrites the supplied columns. `None` when no row has `input.id`.
    pub fn update_category(&self, input: UpdateCategoryInput) -> Result<Option<Category>> {
        let mut sets = Vec::new();
        let mut values = Vec::new();
        if let Some(trip_id) = input.trip_id {
            sets.push("trip_id = ?");
            values.push(Value::Text(trip_id.to_string()));
        }
        if let Some(name) = input.name {
            sets.push("name = ?");
            values.push(Value::Text(name));
        }
        if let Some(collapsed) = input.collapsed {
            sets.push("collapsed = ?");
            values.push(Value::Integer(collapsed as i64));
        }

        self.with_connection(|conn| {
            if sets.is_empty() {
                return find_category(conn, input.id);
            }

            values.push(Value::Text(input.id.to_string()));
            let changed = conn
                .execute(
                    &format!("UPDATE categories SET {} WHERE id = ?", sets.join(", ")),
                    params_from_iter(values),
                )
                .context("Failed to update category")?;

            if changed == 0 {
                return Ok(None);
            }
            find_category(conn, input.id)
        })
    }

    /// Deletes the category and, through the cascade, its items.
    pub fn delete_category(&self, id: Uuid) -> Result<bool> {
        self.with_connection(|conn| {
            let removed = conn
                .execute("DELETE FROM categories WHERE id = ?1", params![id.to_string()])
                .context("Failed to delete category")?;
            Ok(removed > 0)
        })
    }
}

/// All categories across all trips, with items attached.
pub(super) fn select_all_trees(conn: &Connection) -> Result<Vec<CategoryTree>> {
    let categories = select_categories(conn, "", params![])?;
    let items = items::select_all(conn)?;
    Ok(attach_items(categories, items))
}

fn select_categories(
    conn: &Connection,
    filter: &str,
    params: &[&dyn rusqlite::ToSql],
) -> Result<Vec<Category>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM categories {filter} ORDER BY created_at, rowid"
        ))
        .context("Failed to prepare categories query")?;

    let rows = stmt
        .query_map(params, category_from_row)
        .context("Failed to query categories")?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to collect categories")
}

fn find_category(conn: &Connection, id: Uuid) -> Result<Option<Category>> {
    conn.query_row(
        &format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = ?1"),
        params![id.to_string()],
        category_from_row,
    )
    .optional()
    .context("Failed to query category")
}

fn attach_items(categories: Vec<Category>, items: Vec<Item>) -> Vec<CategoryTree> {
    let mut by_category: HashMap<Uuid, Vec<Item>> = HashMap::new();
    for item in items {
        by_category.entry(item.category_id).or_default().push(item);
    }

    categories
        .into_iter()
        .map(|category| CategoryTree {
            items: by_category.remove(&category.id).unwrap_or_default(),
            category,
        })
        .collect()
}

fn category_from_row(row: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: uuid_at(row, 0)?,
        trip_id: uuid_at(row, 1)?,
        name: row.get(2)?,
        collapsed: row.get(3)?,
        created_at: datetime_at(row, 4)?,
    })
}
