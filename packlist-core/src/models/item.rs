use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub packed: bool,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateItemInput {
    pub category_id: Uuid,
    pub name: String,
    #[serde(default)]
    pub packed: bool,
    #[serde(default)]
    pub assigned_to: Option<String>,
}

/// `PUT /items` body: the row id plus the columns to overwrite.
///
/// `assigned_to` is doubly optional: omitted leaves the assignment alone,
/// `null` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateItemInput {
    pub id: Uuid,
    /// Moves the item to another category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub packed: Option<bool>,
    #[serde(
        default,
        deserialize_with = "super::present",
        skip_serializing_if = "Option::is_none"
    )]
    pub assigned_to: Option<Option<String>>,
}

impl UpdateItemInput {
    pub fn packed(id: Uuid, packed: bool) -> Self {
        Self {
            id,
            packed: Some(packed),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category_id.is_none()
            && self.name.is_none()
            && self.packed.is_none()
            && self.assigned_to.is_none()
    }
}
