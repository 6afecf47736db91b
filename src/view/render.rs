//! Plain-text rendering of the mirror.

use uuid::Uuid;

use super::Store;
use crate::models::{CategoryTree, Item, TripTree};
use crate::stats::PackingStats;

const BAR_WIDTH: usize = 20;

/// Characters of an id shown on screen; commands accept any unique prefix.
pub const SHORT_ID_LEN: usize = 8;

pub fn short_id(id: Uuid) -> String {
    id.to_string()[..SHORT_ID_LEN].to_string()
}

/// Trip tabs followed by the current trip.
pub fn dashboard(store: &Store) -> String {
    let Some(current) = store.current_trip() else {
        return "No trips yet. Create one with `trip add <name>`.\n".to_string();
    };

    let mut out = String::new();
    let tabs: Vec<String> = store
        .trips()
        .iter()
        .map(|t| {
            if t.id() == current.id() {
                format!("[{}]", t.trip.name)
            } else {
                format!("{} ({})", t.trip.name, short_id(t.id()))
            }
        })
        .collect();
    out.push_str(&format!("Trips: {}\n\n", tabs.join("  ")));
    out.push_str(&trip(current));
    out
}

pub fn trip(trip: &TripTree) -> String {
    let stats = PackingStats::for_trip(trip);
    let mut out = String::new();

    out.push_str(&format!(
        "{} ({})  {}/{} packed  {} {}%\n",
        trip.trip.name,
        short_id(trip.id()),
        stats.packed_items,
        stats.total_items,
        progress_bar(stats.completion_percentage()),
        stats.completion_percentage()
    ));
    out.push_str(&format!("  {}\n", assignees(&stats)));

    if trip.categories.is_empty() {
        out.push_str("  No categories yet. Add one with `cat add <name>`.\n");
    }
    for category in &trip.categories {
        out.push_str(&self::category(category));
    }
    out
}

fn category(category: &CategoryTree) -> String {
    let stats = PackingStats::for_category(category);
    let marker = if category.category.collapsed { '▶' } else { '▼' };

    let mut out = String::new();
    out.push_str(&format!(
        "\n{} {} ({})  {}/{}  {}%\n",
        marker,
        category.category.name,
        short_id(category.id()),
        stats.packed_items,
        stats.total_items,
        stats.completion_percentage()
    ));
    if !category.category.collapsed {
        for item in &category.items {
            out.push_str(&self::item(item));
        }
    }
    out
}

fn item(item: &Item) -> String {
    let check = if item.packed { 'x' } else { ' ' };
    match &item.assigned_to {
        Some(who) => format!(
            "    [{}] {} ({})  @{}\n",
            check,
            item.name,
            short_id(item.id),
            who
        ),
        None => format!("    [{}] {} ({})\n", check, item.name, short_id(item.id)),
    }
}

fn assignees(stats: &PackingStats) -> String {
    let mut parts: Vec<String> = stats
        .by_assignee
        .iter()
        .map(|(who, count)| format!("{who}: {count}"))
        .collect();
    parts.push(format!("Unassigned: {}", stats.unassigned));
    parts.join("  ")
}

fn progress_bar(percent: u32) -> String {
    let filled = (percent as usize * BAR_WIDTH / 100).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Trip};
    use crate::view::Action;
    use chrono::Utc;

    fn ski_trip() -> TripTree {
        let trip_id = Uuid::new_v4();
        let category_id = Uuid::new_v4();
        TripTree {
            trip: Trip {
                id: trip_id,
                name: "Ski Trip".into(),
                created_at: Utc::now(),
            },
            categories: vec![CategoryTree {
                category: Category {
                    id: category_id,
                    trip_id,
                    name: "Gear".into(),
                    collapsed: false,
                    created_at: Utc::now(),
                },
                items: vec![
                    Item {
                        id: Uuid::new_v4(),
                        category_id,
                        name: "Goggles".into(),
                        packed: true,
                        assigned_to: Some("You".into()),
                        created_at: Utc::now(),
                    },
                    Item {
                        id: Uuid::new_v4(),
                        category_id,
                        name: "Gloves".into(),
                        packed: false,
                        assigned_to: None,
                        created_at: Utc::now(),
                    },
                ],
            }],
        }
    }

    #[test]
    fn renders_progress_and_items() {
        let text = trip(&ski_trip());

        assert!(text.contains("Ski Trip"));
        assert!(text.contains("1/2 packed"));
        assert!(text.contains("[##########----------] 50%"));
        assert!(text.contains("You: 1  Unassigned: 1"));
        assert!(text.contains("[x] Goggles"));
        assert!(text.contains("@You"));
        assert!(text.contains("[ ] Gloves"));
    }

    #[test]
    fn collapsed_categories_hide_items() {
        let mut tree = ski_trip();
        tree.categories[0].category.collapsed = true;

        let text = trip(&tree);
        assert!(text.contains("▶ Gear"));
        assert!(!text.contains("Goggles"));
    }

    #[test]
    fn empty_store_prompts_for_a_trip() {
        assert!(dashboard(&Store::new()).starts_with("No trips yet"));
    }

    #[test]
    fn dashboard_marks_current_trip() {
        let mut store = Store::new();
        let seq = store.begin_load();
        store.apply(Action::Loaded {
            seq,
            trips: vec![ski_trip()],
        });

        assert!(dashboard(&store).starts_with("Trips: [Ski Trip]"));
    }
}
