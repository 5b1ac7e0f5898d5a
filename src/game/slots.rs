//! Fixed-capacity, index-stable storage.
//!
//! An arena of `Option` slots plus an explicit free-index list. Removal
//! never shifts other entries, so an index stays valid for `get`/`remove`
//! until its own slot is removed.

/// Returned by [`Slots::add`] when every slot is occupied. Callers treat
/// this as a recoverable "map full" condition.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("slot table is full (capacity {capacity})")]
pub struct SlotsFull {
    pub capacity: usize,
}

pub struct Slots<T> {
    slots: Vec<Option<T>>,
    free: Vec<usize>,
    len: usize,
}

impl<T> Slots<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
            // pop() hands out low indices first
            free: (0..capacity).rev().collect(),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full(&self) -> bool {
        self.free.is_empty()
    }

    pub fn add(&mut self, item: T) -> Result<usize, SlotsFull> {
        match self.free.pop() {
            Some(index) => {
                self.slots[index] = Some(item);
                self.len += 1;
                Ok(index)
            }
            None => Err(SlotsFull {
                capacity: self.slots.len(),
            }),
        }
    }

    /// Empties the slot and hands its index back to the free list.
    /// Out-of-range or already-empty indices return `None` and change
    /// nothing.
    pub fn remove(&mut self, index: usize) -> Option<T> {
        let item = self.slots.get_mut(index)?.take()?;
        self.free.push(index);
        self.len -= 1;
        Some(item)
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index)?.as_ref()
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index)?.as_mut()
    }

    pub fn find(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<&T> {
        self.slots
            .iter()
            .filter_map(|slot| slot.as_ref())
            .find(|item| predicate(item))
    }

    /// Indices of every occupied slot, snapshotted so the caller may remove
    /// entries while walking the list. A removed slot simply yields `None`
    /// from `get`/`remove` afterwards.
    pub fn filled_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|_| index))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|item| (index, item)))
    }
}
