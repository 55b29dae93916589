//! Carousel state: the ordered item list and the authoritative current index.
//!
//! `current_index` is the single source of truth every surface must reflect
//! once an event settles. It only moves through the sync controller.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::item::{CarouselItem, ItemId};
use crate::error::CarouselError;

/// Transition direction between two indices. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavigationDirection {
    Forward,
    Reverse,
}

impl NavigationDirection {
    /// Forward iff `to > from`, otherwise Reverse.
    pub fn between(from: usize, to: usize) -> Self {
        if to > from {
            NavigationDirection::Forward
        } else {
            NavigationDirection::Reverse
        }
    }
}

#[derive(Debug, Clone)]
pub struct CarouselState {
    items: Vec<CarouselItem>,
    current_index: usize,
}

impl CarouselState {
    /// Build the state with `current_index = 0`.
    ///
    /// # Errors
    ///
    /// Rejects an empty item list and duplicate item ids.
    pub fn new(items: Vec<CarouselItem>) -> Result<Self, CarouselError> {
        if items.is_empty() {
            return Err(CarouselError::Empty);
        }
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(&item.id) {
                return Err(CarouselError::DuplicateId(item.id.to_string()));
            }
        }
        Ok(Self {
            items,
            current_index: 0,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; construction rejects empty carousels.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[CarouselItem] {
        &self.items
    }

    pub fn item(&self, index: usize) -> Option<&CarouselItem> {
        self.items.get(index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_item(&self) -> &CarouselItem {
        &self.items[self.current_index]
    }

    pub fn last_index(&self) -> usize {
        self.items.len() - 1
    }

    pub fn index_of(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| &item.id == id)
    }

    pub fn direction_to(&self, index: usize) -> NavigationDirection {
        NavigationDirection::between(self.current_index, index)
    }

    // ── Circular adjacency (swipe previews only) ─────────────────────

    pub fn index_before(&self, index: usize) -> usize {
        if index == 0 {
            self.last_index()
        } else {
            index - 1
        }
    }

    pub fn index_after(&self, index: usize) -> usize {
        if index + 1 >= self.items.len() {
            0
        } else {
            index + 1
        }
    }

    pub fn item_before(&self, index: usize) -> &CarouselItem {
        &self.items[self.index_before(index)]
    }

    pub fn item_after(&self, index: usize) -> &CarouselItem {
        &self.items[self.index_after(index)]
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Callers validate `index` first.
    pub(crate) fn set_current(&mut self, index: usize) {
        debug_assert!(index < self.items.len());
        self.current_index = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(ids: &[&str]) -> Vec<CarouselItem> {
        ids.iter()
            .map(|id| CarouselItem::new(*id, format!("{id}.png")))
            .collect()
    }

    #[test]
    fn new_starts_at_zero() {
        let state = CarouselState::new(items(&["a", "b", "c"])).unwrap();
        assert_eq!(state.current_index(), 0);
        assert_eq!(state.current_item().id.as_str(), "a");
        assert_eq!(state.len(), 3);
    }

    #[test]
    fn empty_list_is_rejected() {
        assert_eq!(
            CarouselState::new(Vec::new()).unwrap_err(),
            CarouselError::Empty
        );
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = CarouselState::new(items(&["a", "b", "a"])).unwrap_err();
        assert_eq!(err, CarouselError::DuplicateId("a".into()));
    }

    #[test]
    fn adjacency_wraps_around() {
        let state = CarouselState::new(items(&["a", "b", "c", "d"])).unwrap();
        assert_eq!(state.item_before(0).id.as_str(), "d");
        assert_eq!(state.item_after(3).id.as_str(), "a");
        assert_eq!(state.item_before(2).id.as_str(), "b");
        assert_eq!(state.item_after(1).id.as_str(), "c");
    }

    #[test]
    fn single_item_is_its_own_neighbour() {
        let state = CarouselState::new(items(&["solo"])).unwrap();
        assert_eq!(state.index_before(0), 0);
        assert_eq!(state.index_after(0), 0);
    }

    #[test]
    fn index_of_resolves_by_id() {
        let state = CarouselState::new(items(&["a", "b"])).unwrap();
        assert_eq!(state.index_of(&ItemId::new("b")), Some(1));
        assert_eq!(state.index_of(&ItemId::new("z")), None);
    }

    #[test]
    fn direction_between() {
        assert_eq!(
            NavigationDirection::between(0, 1),
            NavigationDirection::Forward
        );
        assert_eq!(
            NavigationDirection::between(2, 1),
            NavigationDirection::Reverse
        );
        assert_eq!(
            NavigationDirection::between(1, 1),
            NavigationDirection::Reverse
        );
    }
}
