use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::CategoryTree;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Trip {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTripInput {
    pub name: String,
}

/// A trip with its categories and their items, as served by `GET /trips`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TripTree {
    #[serde(flatten)]
    pub trip: Trip,
    #[serde(default)]
    pub categories: Vec<CategoryTree>,
}

impl TripTree {
    pub fn new(trip: Trip) -> Self {
        Self {
            trip,
            categories: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.trip.id
    }

    pub fn category(&self, id: Uuid) -> Option<&CategoryTree> {
        self.categories.iter().find(|c| c.category.id == id)
    }

    pub fn category_mut(&mut self, id: Uuid) -> Option<&mut CategoryTree> {
        self.categories.iter_mut().find(|c| c.category.id == id)
    }
}
