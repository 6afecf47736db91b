use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Item;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub trip_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub collapsed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCategoryInput {
    pub trip_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub collapsed: bool,
}

/// `PUT /categories` body: the row id plus the columns to overwrite.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCategoryInput {
    pub id: Uuid,
    /// Moves the category, with its items, to another trip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryTree {
    #[serde(flatten)]
    pub category: Category,
    #[serde(default)]
    pub items: Vec<Item>,
}

impl CategoryTree {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            items: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.category.id
    }

    pub fn item(&self, id: Uuid) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }
}
