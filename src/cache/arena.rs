//! Slot Arena Module
//!
//! Owns list nodes in a `Vec` of slots addressed by generation-checked
//! handles. Handles stay valid across insertions and removals of other
//! slots; a handle to a freed slot is rejected instead of aliasing
//! whatever reuses the slot.

use crate::error::Result;

// == Handle ==
/// Stable reference to an arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle {
    index: usize,
    generation: u64,
}

#[derive(Debug)]
struct Slot<T> {
    /// Bumped every time the slot is vacated
    generation: u64,
    item: Option<T>,
}

// == Arena ==
/// Slot storage with a free list for O(1) reuse.
#[derive(Debug)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    /// Indices of vacant slots. Capacity always covers `slots.len()`, so
    /// `remove` never allocates.
    free: Vec<usize>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    // == Constructor ==
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    // == Reserve ==
    /// Makes sure the next `try_insert` will not need to allocate.
    pub fn try_reserve_one(&mut self) -> Result<()> {
        if !self.free.is_empty() {
            return Ok(());
        }
        self.slots.try_reserve(1)?;
        let needed = (self.slots.len() + 1).saturating_sub(self.free.len());
        self.free.try_reserve(needed)?;
        Ok(())
    }

    // == Insert ==
    /// Stores `item` and returns its handle.
    ///
    /// Fails only if growing the slot storage fails; the arena is left
    /// untouched in that case.
    pub fn try_insert(&mut self, item: T) -> Result<Handle> {
        self.try_reserve_one()?;

        let handle = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.item = Some(item);
                Handle {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let index = self.slots.len();
                self.slots.push(Slot {
                    generation: 0,
                    item: Some(item),
                });
                Handle {
                    index,
                    generation: 0,
                }
            }
        };
        self.len += 1;
        Ok(handle)
    }

    // == Remove ==
    /// Frees the slot behind `handle`, returning its item.
    ///
    /// Returns None for stale handles.
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index)?;
        if slot.generation != handle.generation {
            return None;
        }
        let item = slot.item.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(handle.index);
        self.len -= 1;
        Some(item)
    }

    // == Access ==
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.slots
            .get(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.item.as_ref())
    }

    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.slots
            .get_mut(handle.index)
            .filter(|slot| slot.generation == handle.generation)
            .and_then(|slot| slot.item.as_mut())
    }

    pub fn contains(&self, handle: Handle) -> bool {
        self.get(handle).is_some()
    }

    // == Length ==
    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // == Clear ==
    /// Drops every item. Outstanding handles become stale.
    pub fn clear(&mut self) {
        self.free.clear();
        for (index, slot) in self.slots.iter_mut().enumerate().rev() {
            if slot.item.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
            self.free.push(index);
        }
        self.len = 0;
    }
}
