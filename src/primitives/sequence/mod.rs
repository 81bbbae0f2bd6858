#![forbid(unsafe_code)]

//! Arena-backed doubly linked sequence with stable, generation-checked
//! handles.
//!
//! Values live in a slab of slots; order is kept through `prev`/`next`
//! handles stored next to each value. A value can be detached from the order
//! and linked back elsewhere without losing its handle, which lets callers
//! keep cross-references to it while it moves. Removing a value frees its
//! slot and bumps the slot generation so stale handles are detected.

use std::fmt;

use crate::error::{GraphError, Result};

/// Handle to a value stored in a [`Sequence`].
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct SlotId {
    index: u32,
    generation: u32,
}

impl fmt::Debug for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}v{}", self.index, self.generation)
    }
}

/// Index for the next fresh slot; handles are 32-bit.
fn slot_index(len: usize) -> Result<u32> {
    u32::try_from(len)
        .map_err(|_| GraphError::corruption(format!("sequence exhausted at {len} slots")))
}

struct Entry<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
    linked: bool,
}

struct Slot<T> {
    generation: u32,
    entry: Option<Entry<T>>,
}

/// Doubly linked sequence over an arena of slots.
pub struct Sequence<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
    linked: usize,
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Sequence<T> {
    /// Creates an empty sequence.
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            linked: 0,
        }
    }

    /// Number of values currently linked into the order.
    pub fn len(&self) -> usize {
        self.linked
    }

    /// Returns `true` when no value is linked.
    pub fn is_empty(&self) -> bool {
        self.linked == 0
    }

    /// First linked value.
    pub fn head(&self) -> Option<SlotId> {
        self.head
    }

    /// Last linked value.
    pub fn tail(&self) -> Option<SlotId> {
        self.tail
    }

    /// Drops every value, linked or detached.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.linked = 0;
    }

    fn entry(&self, id: SlotId) -> Option<&Entry<T>> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    fn entry_mut(&mut self, id: SlotId) -> Option<&mut Entry<T>> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_mut()
    }

    fn live_entry_mut(&mut self, id: SlotId) -> Result<&mut Entry<T>> {
        self.entry_mut(id)
            .ok_or_else(|| GraphError::corruption(format!("stale sequence handle {id:?}")))
    }

    /// Value behind `id`, or `None` for a stale handle.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.entry(id).map(|entry| &entry.value)
    }

    /// Mutable value behind `id`, or `None` for a stale handle.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.entry_mut(id).map(|entry| &mut entry.value)
    }

    /// Returns `true` when `id` is live and currently part of the order.
    pub fn is_linked(&self, id: SlotId) -> bool {
        self.entry(id).is_some_and(|entry| entry.linked)
    }

    /// Successor of `id` in the order.
    pub fn next(&self, id: SlotId) -> Option<SlotId> {
        self.entry(id).and_then(|entry| entry.next)
    }

    /// Predecessor of `id` in the order.
    pub fn prev(&self, id: SlotId) -> Option<SlotId> {
        self.entry(id).and_then(|entry| entry.prev)
    }

    /// Stores `value` without linking it into the order.
    pub fn allocate(&mut self, value: T) -> Result<SlotId> {
        let entry = Entry {
            value,
            prev: None,
            next: None,
            linked: false,
        };
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            Ok(SlotId {
                index,
                generation: slot.generation,
            })
        } else {
            let index = slot_index(self.slots.len())?;
            self.slots.push(Slot {
                generation: 0,
                entry: Some(entry),
            });
            Ok(SlotId {
                index,
                generation: 0,
            })
        }
    }

    /// Stores `value` and links it immediately before `position`, or at the
    /// tail when `position` is `None`.
    pub fn insert_before(&mut self, position: Option<SlotId>, value: T) -> Result<SlotId> {
        let id = self.allocate(value)?;
        self.link_before(id, position)?;
        Ok(id)
    }

    /// Links a detached value immediately before `position`, or at the tail
    /// when `position` is `None`.
    pub fn link_before(&mut self, id: SlotId, position: Option<SlotId>) -> Result<()> {
        if self.live_entry_mut(id)?.linked {
            return Err(GraphError::corruption(format!(
                "sequence handle {id:?} is already linked"
            )));
        }
        let prev = match position {
            Some(pos) => {
                let anchor = self.live_entry_mut(pos)?;
                if !anchor.linked {
                    return Err(GraphError::corruption(format!(
                        "sequence anchor {pos:?} is detached"
                    )));
                }
                anchor.prev
            }
            None => self.tail,
        };

        let entry = self.live_entry_mut(id)?;
        entry.prev = prev;
        entry.next = position;
        entry.linked = true;

        match prev {
            Some(prev) => self.live_entry_mut(prev)?.next = Some(id),
            None => self.head = Some(id),
        }
        match position {
            Some(next) => self.live_entry_mut(next)?.prev = Some(id),
            None => self.tail = Some(id),
        }
        self.linked += 1;
        Ok(())
    }

    /// Detaches `id` from the order, keeping its value and handle alive.
    pub fn unlink(&mut self, id: SlotId) -> Result<()> {
        let entry = self.live_entry_mut(id)?;
        if !entry.linked {
            return Ok(());
        }
        let (prev, next) = (entry.prev.take(), entry.next.take());
        entry.linked = false;

        match prev {
            Some(prev) => self.live_entry_mut(prev)?.next = next,
            None => self.head = next,
        }
        match next {
            Some(next) => self.live_entry_mut(next)?.prev = prev,
            None => self.tail = prev,
        }
        self.linked -= 1;
        Ok(())
    }

    /// Unlinks `id` if needed, frees its slot and returns the value.
    pub fn remove(&mut self, id: SlotId) -> Result<T> {
        self.unlink(id)?;
        let slot = &mut self.slots[id.index as usize];
        let entry = slot
            .entry
            .take()
            .ok_or_else(|| GraphError::corruption(format!("stale sequence handle {id:?}")))?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        Ok(entry.value)
    }

    /// Linear scan from `start` (inclusive) towards the tail for the first
    /// value satisfying `predicate`.
    pub fn find_from<F>(&self, start: Option<SlotId>, mut predicate: F) -> Option<SlotId>
    where
        F: FnMut(SlotId, &T) -> bool,
    {
        self.iter_from(start)
            .find(|(id, value)| predicate(*id, *value))
            .map(|(id, _)| id)
    }

    /// Iterates linked values from `start` (inclusive) towards the tail.
    pub fn iter_from(&self, start: Option<SlotId>) -> Iter<'_, T> {
        Iter {
            seq: self,
            cursor: start.filter(|id| self.is_linked(*id)),
        }
    }

    /// Iterates linked values from head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        self.iter_from(self.head)
    }
}

impl<T: fmt::Debug> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|(_, value)| value))
            .finish()
    }
}

/// Iterator over the linked values of a [`Sequence`].
pub struct Iter<'a, T> {
    seq: &'a Sequence<T>,
    cursor: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = (SlotId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.cursor?;
        let entry = self.seq.entry(id)?;
        self.cursor = entry.next;
        Some((id, &entry.value))
    }
}
