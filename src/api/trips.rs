use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use serde::Deserialize;

use super::{required_id, ApiError};
use crate::db::Database;
use crate::models::{CreateTripInput, Trip, TripTree};
use crate::Envelope;

#[derive(Debug, Deserialize)]
pub struct DeleteTripParams {
    #[serde(rename = "tripId")]
    trip_id: Option<String>,
}

pub async fn list(State(db): State<Database>) -> Result<Json<Envelope<Vec<TripTree>>>, ApiError> {
    let trips = db.get_trip_trees()?;
    Ok(Json(Envelope::ok(trips)))
}

pub async fn create(
    State(db): State<Database>,
    body: Result<Json<CreateTripInput>, JsonRejection>,
) -> Result<Json<Envelope<Vec<Trip>>>, ApiError> {
    let Json(input) = body?;
    let trip = db.create_trip(input)?;
    tracing::info!("Created trip {} ({})", trip.id, trip.name);
    Ok(Json(Envelope::ok(vec![trip])))
}

pub async fn delete(
    State(db): State<Database>,
    params: Result<Query<DeleteTripParams>, QueryRejection>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let Query(params) = params?;
    let id = required_id(params.trip_id, "tripId")?;
    if db.delete_trip(id)? {
        tracing::info!("Deleted trip {}", id);
    }
    Ok(Json(Envelope::empty()))
}
