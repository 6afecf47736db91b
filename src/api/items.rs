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
use crate::models::{CreateItemInput, Item, UpdateItemInput};
use crate::Envelope;

#[derive(Debug, Deserialize)]
pub struct ListItemsParams {
    category_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteItemParams {
    #[serde(rename = "itemId")]
    item_id: Option<String>,
}

pub async fn list(
    State(db): State<Database>,
    params: Result<Query<ListItemsParams>, QueryRejection>,
) -> Result<Json<Envelope<Vec<Item>>>, ApiError> {
    let Query(params) = params?;
    let category_id = required_id(params.category_id, "category_id")?;
    Ok(Json(Envelope::ok(db.get_items(category_id)?)))
}

pub async fn create(
    State(db): State<Database>,
    body: Result<Json<CreateItemInput>, JsonRejection>,
) -> Result<Json<Envelope<Vec<Item>>>, ApiError> {
    let Json(input) = body?;
    let item = db.create_item(input)?;
    tracing::info!("Created item {} in category {}", item.id, item.category_id);
    Ok(Json(Envelope::ok(vec![item])))
}

pub async fn update(
    State(db): State<Database>,
    body: Result<Json<UpdateItemInput>, JsonRejection>,
) -> Result<Json<Envelope<Vec<Item>>>, ApiError> {
    let Json(input) = body?;
    let updated = db.update_item(input)?;
    Ok(Json(Envelope::ok(updated.into_iter().collect())))
}

pub async fn delete(
    State(db): State<Database>,
    params: Result<Query<DeleteItemParams>, QueryRejection>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let Query(params) = params?;
    let id = required_id(params.item_id, "itemId")?;
    if db.delete_item(id)? {
        tracing::info!("Deleted item {}", id);
    }
    Ok(Json(Envelope::empty()))
}
