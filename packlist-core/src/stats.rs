//! Packing progress derived from a trip tree.
//!
//! Everything here is a pure function of the mirror and is recomputed on
//! each render.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::{CategoryTree, Item, TripTree};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PackingStats {
    pub total_items: usize,
    pub packed_items: usize,
    /// Item counts keyed by assignee label.
    pub by_assignee: BTreeMap<String, usize>,
    pub unassigned: usize,
}

impl PackingStats {
    pub fn for_trip(trip: &TripTree) -> Self {
        Self::from_items(trip.categories.iter().flat_map(|c| c.items.iter()))
    }

    pub fn for_category(category: &CategoryTree) -> Self {
        Self::from_items(category.items.iter())
    }

    fn from_items<'a>(items: impl Iterator<Item = &'a Item>) -> Self {
        let mut stats = Self::default();
        for item in items {
            stats.total_items += 1;
            if item.packed {
                stats.packed_items += 1;
            }
            match &item.assigned_to {
                Some(who) => *stats.by_assignee.entry(who.clone()).or_default() += 1,
                None => stats.unassigned += 1,
            }
        }
        stats
    }

    pub fn assigned_to(&self, who: &str) -> usize {
        self.by_assignee.get(who).copied().unwrap_or(0)
    }

    /// Rounded share of packed items, 0 when there is nothing to pack.
    pub fn completion_percentage(&self) -> u32 {
        completion_percentage(self.packed_items, self.total_items)
    }
}

pub fn completion_percentage(packed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (packed as f64 / total as f64 * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Trip};
    use chrono::Utc;
    use uuid::Uuid;

    fn item(name: &str, packed: bool, who: Option<&str>) -> Item {
        Item {
            id: Uuid::new_v4(),
            category_id: Uuid::nil(),
            name: name.into(),
            packed,
            assigned_to: who.map(str::to_string),
            created_at: Utc::now(),
        }
    }

    fn category(items: Vec<Item>) -> CategoryTree {
        CategoryTree {
            category: Category {
                id: Uuid::new_v4(),
                trip_id: Uuid::nil(),
                name: "c".into(),
                collapsed: false,
                created_at: Utc::now(),
            },
            items,
        }
    }

    fn weekend_getaway() -> TripTree {
        TripTree {
            trip: Trip {
                id: Uuid::new_v4(),
                name: "Weekend Getaway".into(),
                created_at: Utc::now(),
            },
            categories: vec![
                category(vec![
                    item("T-shirts (3)", false, Some("You")),
                    item("Jeans", true, Some("John")),
                    item("Pajamas", false, None),
                ]),
                category(vec![
                    item("Toothbrush", false, Some("You")),
                    item("Shampoo", false, None),
                ]),
            ],
        }
    }

    #[test]
    fn trip_totals_span_all_categories() {
        let stats = PackingStats::for_trip(&weekend_getaway());

        assert_eq!(stats.total_items, 5);
        assert_eq!(stats.packed_items, 1);
        assert_eq!(stats.assigned_to("You"), 2);
        assert_eq!(stats.assigned_to("John"), 1);
        assert_eq!(stats.assigned_to("Nobody"), 0);
        assert_eq!(stats.unassigned, 2);
        assert_eq!(stats.completion_percentage(), 20);
    }

    #[test]
    fn category_stats_are_local() {
        let trip = weekend_getaway();
        let clothes = PackingStats::for_category(&trip.categories[0]);

        assert_eq!(clothes.total_items, 3);
        assert_eq!(clothes.packed_items, 1);
        assert_eq!(clothes.completion_percentage(), 33);
    }

    #[test]
    fn empty_trip_is_zero_percent() {
        assert_eq!(completion_percentage(0, 0), 0);
        assert_eq!(completion_percentage(2, 3), 67);
        assert_eq!(completion_percentage(3, 3), 100);
    }
}
