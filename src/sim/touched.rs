//! Touched tile/object bookkeeping
//!
//! A touched item is inert until reset. Resettable items come back on every
//! respawn, persistent ones (checkpoints, collected pickups) only when a
//! game over is reset.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Identity of a touchable item in the level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ItemRef {
    /// Map cell
    Tile { col: u32, row: u32 },
    /// Placed object
    Object { id: u32 },
}

/// When a touched item reverts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TouchCategory {
    /// On every respawn
    Resettable,
    /// Only on a game over reset
    Persistent,
}

#[derive(Debug, Clone, Default)]
pub struct TouchedItemTracker {
    items: BTreeMap<ItemRef, TouchCategory>,
}

impl TouchedItemTracker {
    /// Record a touch. An item lives in one category; re-marking moves it.
    ///
    /// Returns true if the item was not already tracked.
    pub fn mark_touched(&mut self, item: ItemRef, category: TouchCategory) -> bool {
        match self.items.insert(item, category) {
            None => true,
            Some(previous) => {
                if previous != category {
                    log::debug!("{:?} moved from {:?} to {:?}", item, previous, category);
                }
                false
            }
        }
    }

    /// Touched and not yet reset
    pub fn is_consumed(&self, item: &ItemRef) -> bool {
        self.items.contains_key(item)
    }

    pub fn category_of(&self, item: &ItemRef) -> Option<TouchCategory> {
        self.items.get(item).copied()
    }

    /// Number of items tracked in `category`
    pub fn count(&self, category: TouchCategory) -> usize {
        self.items.values().filter(|c| **c == category).count()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Forget resettable items; returns them for visual restore
    pub fn reset_resettable(&mut self) -> Vec<ItemRef> {
        self.reset(TouchCategory::Resettable)
    }

    /// Forget persistent items; returns them for visual restore
    pub fn reset_persistent(&mut self) -> Vec<ItemRef> {
        self.reset(TouchCategory::Persistent)
    }

    fn reset(&mut self, category: TouchCategory) -> Vec<ItemRef> {
        let reverted: Vec<ItemRef> = self
            .items
            .iter()
            .filter(|(_, c)| **c == category)
            .map(|(item, _)| *item)
            .collect();
        self.items.retain(|_, c| *c != category);
        if !reverted.is_empty() {
            log::debug!("Reverted {} {:?} items", reverted.len(), category);
        }
        reverted
    }
}
