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
use crate::models::{Category, CategoryTree, CreateCategoryInput, UpdateCategoryInput};
use crate::Envelope;

#[derive(Debug, Deserialize)]
pub struct ListCategoriesParams {
    trip_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteCategoryParams {
    #[serde(rename = "categoryId")]
    category_id: Option<String>,
}

pub async fn list(
    State(db): State<Database>,
    params: Result<Query<ListCategoriesParams>, QueryRejection>,
) -> Result<Json<Envelope<Vec<CategoryTree>>>, ApiError> {
    let Query(params) = params?;
    let trip_id = required_id(params.trip_id, "trip_id")?;
    Ok(Json(Envelope::ok(db.get_category_trees(trip_id)?)))
}

pub async fn create(
    State(db): State<Database>,
    body: Result<Json<CreateCategoryInput>, JsonRejection>,
) -> Result<Json<Envelope<Vec<Category>>>, ApiError> {
    let Json(input) = body?;
    let category = db.create_category(input)?;
    tracing::info!("Created category {} in trip {}", category.id, category.trip_id);
    Ok(Json(Envelope::ok(vec![category])))
}

pub async fn update(
    State(db): State<Database>,
    body: Result<Json<UpdateCategoryInput>, JsonRejection>,
) -> Result<Json<Envelope<Vec<Category>>>, ApiError> {
    let Json(input) = body?;
    let updated = db.update_category(input)?;
    Ok(Json(Envelope::ok(updated.into_iter().collect())))
}

pub async fn delete(
    State(db): State<Database>,
    params: Result<Query<DeleteCategoryParams>, QueryRejection>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let Query(params) = params?;
    let id = required_id(params.category_id, "categoryId")?;
    if db.delete_category(id)? {
        tracing::info!("Deleted category {}", id);
    }
    Ok(Json(Envelope::empty()))
}
