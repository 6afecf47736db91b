use std::collections::HashMap;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};
use uuid::Uuid;

use super::{categories, datetime_at, now, uuid_at, Database};
use crate::models::{CategoryTree, CreateTripInput, Trip, TripTree};

const TRIP_COLUMNS: &str = "id, name, created_at";

impl Database {
    /// Every trip with its categories and their items.
    pub fn get_trip_trees(&self) -> Result<Vec<TripTree>> {
        self.with_connection(|conn| {
            let trips = select_trips(conn)?;
            let mut categories = group_by_trip(categories::select_all_trees(conn)?);

            Ok(trips
                .into_iter()
                .map(|trip| TripTree {
                    categories: categories.remove(&trip.id).unwrap_or_default(),
                    trip,
                })
                .collect())
        })
    }

    pub fn get_trip(&self, id: Uuid) -> Result<Option<Trip>> {
        self.with_connection(|conn| {
            conn.query_row(
                &format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?1"),
                params![id.to_string()],
                trip_from_row,
            )
            .optional()
            .context("Failed to query trip")
        })
    }

    pub fn create_trip(&self, input: CreateTripInput) -> Result<Trip> {
        let id = Uuid::new_v4();
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO trips (id, name, created_at) VALUES (?1, ?2, ?3)",
                params![id.to_string(), input.name, now()],
            )
            .context("Failed to insert trip")?;

            conn.query_row(
                &format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = ?1"),
                params![id.to_string()],
                trip_from_row,
            )
            .context("Failed to read back inserted trip")
        })
    }

    /// Deletes the trip; its categories and items go with it through the
    /// schema's cascade. Returns whether a row was removed.
    pub fn delete_trip(&self, id: Uuid) -> Result<bool> {
        self.with_connection(|conn| {
            let removed = conn
                .execute("DELETE FROM trips WHERE id = ?1", params![id.to_string()])
                .context("Failed to delete trip")?;
            Ok(removed > 0)
        })
    }
}

fn select_trips(conn: &Connection) -> Result<Vec<Trip>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {TRIP_COLUMNS} FROM trips ORDER BY created_at, rowid"
        ))
        .context("Failed to prepare trips query")?;

    let rows = stmt
        .query_map([], trip_from_row)
        .context("Failed to query trips")?;

    rows.collect::<rusqlite::Result<Vec<_>>>()
        .context("Failed to collect trips")
}

fn group_by_trip(categories: Vec<CategoryTree>) -> HashMap<Uuid, Vec<CategoryTree>> {
    let mut grouped: HashMap<Uuid, Vec<CategoryTree>> = HashMap::new();
    for category in categories {
        grouped
            .entry(category.category.trip_id)
            .or_default()
            .push(category);
    }
    grouped
}

fn trip_from_row(row: &Row) -> rusqlite::Result<Trip> {
    Ok(Trip {
        id: uuid_at(row, 0)?,
        name: row.get(1)?,
        created_at: datetime_at(row, 2)?,
    })
}
