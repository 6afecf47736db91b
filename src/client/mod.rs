//! HTTP client for the Packlist API.
//!
//! Every call resolves to an [`Envelope`]: transport failures, non-2xx
//! statuses and undecodable bodies are folded into its `error` field rather
//! than returned as `Err`, so callers must check [`Envelope::is_ok`].

mod error;

pub use error::ClientError;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::models::{
    Category, CategoryTree, CreateCategoryInput, CreateItemInput, CreateTripInput, Item, Trip,
    TripTree, UpdateCategoryInput, UpdateItemInput,
};
use crate::Envelope;

#[derive(Clone)]
pub struct PacklistClient {
    http: reqwest::Client,
    base_url: String,
}

impl PacklistClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.base_url, resource)
    }

    // Trips

    /// All trips with nested categories and items. Fails to `{data: [], error}`.
    pub async fn list_trips(&self) -> Envelope<Vec<TripTree>> {
        let envelope: Envelope<Vec<TripTree>> = self.call(self.http.get(self.url("trips"))).await;
        if envelope.is_ok() {
            envelope
        } else {
            Envelope {
                data: Some(Vec::new()),
                error: envelope.error,
            }
        }
    }

    pub async fn create_trip(&self, input: &CreateTripInput) -> Envelope<Vec<Trip>> {
        self.call(self.http.post(self.url("trips")).json(input))
            .await
    }

    pub async fn delete_trip(&self, id: Uuid) -> Envelope<()> {
        self.call(
            self.http
                .delete(self.url("trips"))
                .query(&[("tripId", id.to_string())]),
        )
        .await
    }

    // Categories

    pub async fn list_categories(&self, trip_id: Uuid) -> Envelope<Vec<CategoryTree>> {
        self.call(
            self.http
                .get(self.url("categories"))
                .query(&[("trip_id", trip_id.to_string())]),
        )
        .await
    }

    pub async fn create_category(&self, input: &CreateCategoryInput) -> Envelope<Vec<Category>> {
        self.call(self.http.post(self.url("categories")).json(input))
            .await
    }

    pub async fn update_category(&self, input: &UpdateCategoryInput) -> Envelope<Vec<Category>> {
        self.call(self.http.put(self.url("categories")).json(input))
            .await
    }

    pub async fn delete_category(&self, id: Uuid) -> Envelope<()> {
        self.call(
            self.http
                .delete(self.url("categories"))
                .query(&[("categoryId", id.to_string())]),
        )
        .await
    }

    // Items

    pub async fn list_items(&self, category_id: Uuid) -> Envelope<Vec<Item>> {
        self.call(
            self.http
                .get(self.url("items"))
                .query(&[("category_id", category_id.to_string())]),
        )
        .await
    }

    pub async fn create_item(&self, input: &CreateItemInput) -> Envelope<Vec<Item>> {
        self.call(self.http.post(self.url("items")).json(input))
            .await
    }

    pub async fn update_item(&self, input: &UpdateItemInput) -> Envelope<Vec<Item>> {
        self.call(self.http.put(self.url("items")).json(input))
            .await
    }

    pub async fn delete_item(&self, id: Uuid) -> Envelope<()> {
        self.call(
            self.http
                .delete(self.url("items"))
                .query(&[("itemId", id.to_string())]),
        )
        .await
    }

    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Envelope<T> {
        match send(request).await {
            Ok(envelope) => envelope,
            Err(e) => {
                tracing::warn!("Packlist API call failed: {}", e);
                Envelope::failed(e.to_string())
            }
        }
    }
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<Envelope<T>, ClientError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(ClientError::Status {
            status,
            message: error_message(response).await,
        });
    }

    Ok(response.json::<Envelope<T>>().await?)
}

/// Pulls `error` out of a failed response body, falling back to the reason phrase.
async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<Envelope<serde_json::Value>>().await {
        Ok(Envelope {
            error: Some(message),
            ..
        }) => message,
        _ => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}
