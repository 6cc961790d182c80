//! Pickups placed by the level's object layer.
//!
//! The set is an arena: each collectible keeps its slot index for the whole
//! session and collecting one just empties its slot. A scan that removes
//! entries therefore never shifts the ones it has not visited yet.

use std::sync::Arc;

use crate::rect::Rect;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectibleId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct Collectible {
    pub rect: Rect,
    pub texture_key: Arc<str>,
}

impl Collectible {
    pub fn new(rect: Rect, texture_key: Arc<str>) -> Self {
        Self { rect, texture_key }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CollectibleSet {
    slots: Vec<Option<Collectible>>,
    remaining: usize,
}

impl CollectibleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, collectible: Collectible) -> CollectibleId {
        self.slots.push(Some(collectible));
        self.remaining += 1;
        CollectibleId(self.slots.len() - 1)
    }

    pub fn get(&self, id: CollectibleId) -> Option<&Collectible> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn contains(&self, id: CollectibleId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.remaining
    }

    pub fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    /// Number of collectibles the level started with.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CollectibleId, &Collectible)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|c| (CollectibleId(index), c)))
    }

    /// Removes every collectible whose box overlaps `rect`. Each entry is
    /// visited once and removed at most once.
    pub fn collect_overlapping(&mut self, rect: &Rect) -> Vec<(CollectibleId, Collectible)> {
        let mut collected = Vec::new();
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.as_ref().is_some_and(|c| c.rect.overlaps(rect)) {
                if let Some(collectible) = slot.take() {
                    collected.push((CollectibleId(index), collectible));
                }
            }
        }
        self.remaining -= collected.len();
        collected
    }
}
