//! HTTP surface: one handler set per resource, each verb mapped to a single
//! store call.

mod categories;
mod error;
mod items;
mod trips;

pub use error::ApiError;

use axum::{
    http::{header, Method, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::db::Database;

pub fn create_router(db: Database) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]);

    Router::new()
        .route("/health", get(health))
        .route(
            "/trips",
            get(trips::list)
                .post(trips::create)
                .delete(trips::delete)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/categories",
            get(categories::list)
                .post(categories::create)
                .put(categories::update)
                .delete(categories::delete)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .route(
            "/items",
            get(items::list)
                .post(items::create)
                .put(items::update)
                .delete(items::delete)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(db)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// CORS preflight; the CORS layer supplies the headers.
async fn preflight() -> StatusCode {
    StatusCode::OK
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

/// Parses an id query parameter, reporting absence and bad values by name.
fn required_id(value: Option<String>, param: &'static str) -> Result<Uuid, ApiError> {
    let raw = value.ok_or(ApiError::MissingParam(param))?;
    Uuid::parse_str(&raw).map_err(|source| ApiError::InvalidId { param, source })
}
