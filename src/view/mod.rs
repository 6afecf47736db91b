//! The packing dashboard: a polled mirror of the server plus the mutations a
//! user can make against it.
//!
//! Every successful mutation is followed by a full reload instead of
//! splicing the server's returned row into the mirror. When a mutation
//! fails, the mirror is patched locally and the error is handed back so the
//! caller can tell the user.

pub mod render;
pub mod repl;
pub mod store;

pub use store::{Action, Store};

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::client::PacklistClient;
use crate::models::{
    Category, CreateCategoryInput, CreateItemInput, CreateTripInput, Item, Trip, UpdateItemInput,
};

/// What happened to a requested mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The server accepted it and the mirror was reloaded.
    Saved,
    /// The server call failed; the mirror was patched locally.
    SavedLocally(String),
    /// Nothing to do (blank name, unknown target).
    Ignored,
}

#[derive(Clone)]
pub struct PackingView {
    client: PacklistClient,
    store: Arc<Mutex<Store>>,
}

impl PackingView {
    pub fn new(client: PacklistClient) -> Self {
        Self {
            client,
            store: Arc::new(Mutex::new(Store::new())),
        }
    }

    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }

    pub async fn snapshot(&self) -> Store {
        self.store.lock().await.clone()
    }

    /// Fetches every trip and replaces the mirror with a non-empty result.
    /// Failures are logged and leave the current mirror on screen.
    pub async fn load(&self) -> bool {
        let seq = self.store.lock().await.begin_load();
        match self.client.list_trips().await.into_result() {
            Ok(trips) => {
                let trips = trips.unwrap_or_default();
                tracing::debug!("Loaded {} trips", trips.len());
                self.dispatch(Action::Loaded { seq, trips }).await;
                true
            }
            Err(e) => {
                tracing::warn!("Error loading trips: {}", e);
                false
            }
        }
    }

    pub async fn select_trip(&self, id: Uuid) {
        self.dispatch(Action::SelectTrip(id)).await;
    }

    /// Collapse state is view-only and never sent to the server.
    pub async fn toggle_category(&self, id: Uuid) {
        self.dispatch(Action::ToggleCategory(id)).await;
    }

    pub async fn add_trip(&self, name: &str) -> Outcome {
        let name = name.trim();
        if name.is_empty() {
            return Outcome::Ignored;
        }

        let input = CreateTripInput { name: name.into() };
        let result = self.client.create_trip(&input).await.into_result();
        self.settle(result, || {
            Action::AddTrip(Trip {
                id: Uuid::now_v7(),
                name: input.name.clone(),
                created_at: Utc::now(),
            })
        })
        .await
    }

    /// An empty reload keeps the mirror, so the trip is dropped locally
    /// on success as well.
    pub async fn delete_trip(&self, id: Uuid) -> Outcome {
        let result = self.client.delete_trip(id).await.into_result();
        if result.is_ok() {
            self.dispatch(Action::RemoveTrip(id)).await;
        }
        self.settle(result, || Action::RemoveTrip(id)).await
    }

    /// Adds a category to the current trip.
    pub async fn add_category(&self, name: &str) -> Outcome {
        let name = name.trim();
        let Some(trip_id) = self.store.lock().await.current_trip_id() else {
            return Outcome::Ignored;
        };
        if name.is_empty() {
            return Outcome::Ignored;
        }

        let input = CreateCategoryInput {
            trip_id,
            name: name.into(),
            collapsed: false,
        };
        let result = self.client.create_category(&input).await.into_result();
        self.settle(result, || {
            Action::AddCategory(Category {
                id: Uuid::now_v7(),
                trip_id,
                name: input.name.clone(),
                collapsed: false,
                created_at: Utc::now(),
            })
        })
        .await
    }

    pub async fn add_item(
        &self,
        category_id: Uuid,
        name: &str,
        assigned_to: Option<&str>,
    ) -> Outcome {
        let name = name.trim();
        if name.is_empty() {
            return Outcome::Ignored;
        }

        let input = CreateItemInput {
            category_id,
            name: name.into(),
            packed: false,
            assigned_to: assigned_to
                .map(str::trim)
                .filter(|who| !who.is_empty())
                .map(str::to_string),
        };
        let result = self.client.create_item(&input).await.into_result();
        self.settle(result, || {
            Action::AddItem(Item {
                id: Uuid::now_v7(),
                category_id,
                name: input.name.clone(),
                packed: false,
                assigned_to: input.assigned_to.clone(),
                created_at: Utc::now(),
            })
        })
        .await
    }

    pub async fn toggle_item(&self, id: Uuid) -> Outcome {
        let Some(packed) = self.store.lock().await.find_item(id).map(|i| !i.packed) else {
            return Outcome::Ignored;
        };

        let input = UpdateItemInput::packed(id, packed);
        let result = self.client.update_item(&input).await.into_result();
        self.settle(result, || Action::SetPacked { item_id: id, packed })
            .await
    }

    pub async fn delete_item(&self, id: Uuid) -> Outcome {
        let result = self.client.delete_item(id).await.into_result();
        self.settle(result, || Action::RemoveItem(id)).await
    }

    async fn dispatch(&self, action: Action) {
        self.store.lock().await.apply(action);
    }

    /// Reloads after a successful mutation, or applies `fallback` locally.
    async fn settle<T>(
        &self,
        result: Result<T, String>,
        fallback: impl FnOnce() -> Action,
    ) -> Outcome {
        match result {
            Ok(_) => {
                self.load().await;
                Outcome::Saved
            }
            Err(e) => {
                tracing::warn!("Mutation failed, keeping local change: {}", e);
                self.dispatch(fallback()).await;
                Outcome::SavedLocally(e)
            }
        }
    }
}
