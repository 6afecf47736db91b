//! The client-side mirror of the server's trip tree.
//!
//! The mirror only changes through [`Store::apply`]. Non-empty server loads
//! replace it wholesale; an empty load keeps what is on screen. Failed
//! mutations patch it locally until the next load overwrites the patch.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{Category, CategoryTree, Item, Trip, TripTree};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Result of load number `seq`; replaces the mirror unless empty.
    Loaded { seq: u64, trips: Vec<TripTree> },
    SelectTrip(Uuid),
    ToggleCategory(Uuid),
    AddTrip(Trip),
    AddCategory(Category),
    AddItem(Item),
    SetPacked { item_id: Uuid, packed: bool },
    RemoveItem(Uuid),
    RemoveTrip(Uuid),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    trips: Vec<TripTree>,
    current_trip_id: Option<Uuid>,
    loads_started: u64,
    last_applied_load: Option<u64>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trips(&self) -> &[TripTree] {
        &self.trips
    }

    pub fn current_trip_id(&self) -> Option<Uuid> {
        self.current_trip_id
    }

    pub fn current_trip(&self) -> Option<&TripTree> {
        let id = self.current_trip_id?;
        self.trips.iter().find(|t| t.id() == id)
    }

    pub fn find_item(&self, id: Uuid) -> Option<&Item> {
        self.trips
            .iter()
            .flat_map(|t| t.categories.iter())
            .flat_map(|c| c.items.iter())
            .find(|i| i.id == id)
    }

    /// Numbers a load so a late response cannot overwrite a newer one.
    pub fn begin_load(&mut self) -> u64 {
        self.loads_started += 1;
        self.loads_started
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Loaded { seq, trips } => self.replace(seq, trips),
            Action::SelectTrip(id) => {
                if self.trips.iter().any(|t| t.id() == id) {
                    self.current_trip_id = Some(id);
                }
            }
            Action::ToggleCategory(id) => {
                if let Some(category) = self.category_mut(id) {
                    category.category.collapsed = !category.category.collapsed;
                }
            }
            Action::AddTrip(trip) => {
                self.current_trip_id = Some(trip.id);
                self.trips.push(TripTree::new(trip));
            }
            Action::AddCategory(category) => {
                if let Some(trip) = self.trips.iter_mut().find(|t| t.id() == category.trip_id) {
                    trip.categories.push(CategoryTree::new(category));
                }
            }
            Action::AddItem(item) => {
                if let Some(category) = self.category_mut(item.category_id) {
                    category.items.push(item);
                }
            }
            Action::SetPacked { item_id, packed } => {
                if let Some(item) = self.items_mut().find(|i| i.id == item_id) {
                    item.packed = packed;
                }
            }
            Action::RemoveItem(id) => {
                for category in self.trips.iter_mut().flat_map(|t| t.categories.iter_mut()) {
                    category.items.retain(|i| i.id != id);
                }
            }
            Action::RemoveTrip(id) => {
                self.trips.retain(|t| t.id() != id);
                self.ensure_selection();
            }
        }
    }

    fn replace(&mut self, seq: u64, mut trips: Vec<TripTree>) {
        if self.last_applied_load.is_some_and(|last| seq <= last) {
            tracing::debug!("Dropping stale load {} (already applied newer)", seq);
            return;
        }
        if trips.is_empty() {
            tracing::debug!("Load {} returned no trips, keeping current mirror", seq);
            self.last_applied_load = Some(seq);
            return;
        }

        let collapsed: HashMap<Uuid, bool> = self
            .trips
            .iter()
            .flat_map(|t| t.categories.iter())
            .map(|c| (c.id(), c.category.collapsed))
            .collect();
        for category in trips.iter_mut().flat_map(|t| t.categories.iter_mut()) {
            if let Some(&was_collapsed) = collapsed.get(&category.id()) {
                category.category.collapsed = was_collapsed;
            }
        }

        self.trips = trips;
        self.last_applied_load = Some(seq);
        self.ensure_selection();
    }

    fn ensure_selection(&mut self) {
        let still_there = self
            .current_trip_id
            .is_some_and(|id| self.trips.iter().any(|t| t.id() == id));
        if !still_there {
            self.current_trip_id = self.trips.first().map(TripTree::id);
        }
    }

    fn category_mut(&mut self, id: Uuid) -> Option<&mut CategoryTree> {
        self.trips.iter_mut().find_map(|t| t.category_mut(id))
    }

    fn items_mut(&mut self) -> impl Iterator<Item = &mut Item> {
        self.trips
            .iter_mut()
            .flat_map(|t| t.categories.iter_mut())
            .flat_map(|c| c.items.iter_mut())
    }
}
