//! Entity pool with an explicit free list
//!
//! Slots are never deallocated during a session. Released entities are
//! deactivated and their index pushed onto the free list; the next `acquire`
//! reuses the most recently released slot. Handles are plain indices.

use serde::{Deserialize, Serialize};

/// Index handle into an `EntityPool`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Entities that can live in a pool
pub trait Poolable: Default {
    fn is_active(&self) -> bool;

    /// Mark inactive, hide and stop. Called on release.
    fn deactivate(&mut self);
}

/// Reusable entity storage
#[derive(Debug, Clone)]
pub struct EntityPool<T> {
    slots: Vec<T>,
    free: Vec<EntityId>,
}

impl<T> Default for EntityPool<T> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }
}

impl<T: Poolable> EntityPool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a free slot, allocating only if none is free.
    ///
    /// The returned entity is in its released state; the caller activates it.
    pub fn acquire(&mut self) -> (EntityId, &mut T) {
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                self.slots.push(T::default());
                EntityId((self.slots.len() - 1) as u32)
            }
        };
        (id, &mut self.slots[id.index()])
    }

    /// Return an entity to the pool. Releasing an inactive slot is a no-op.
    pub fn release(&mut self, id: EntityId) -> bool {
        match self.slots.get_mut(id.index()) {
            Some(slot) if slot.is_active() => {
                slot.deactivate();
                self.free.push(id);
                true
            }
            _ => false,
        }
    }

    /// Release every active entity matching `pred`; returns how many
    pub fn release_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        let mut released = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_active() && pred(slot) {
                slot.deactivate();
                self.free.push(EntityId(index as u32));
                released += 1;
            }
        }
        released
    }

    pub fn release_all(&mut self) -> usize {
        self.release_where(|_| true)
    }

    pub fn get(&self, id: EntityId) -> Option<&T> {
        self.slots.get(id.index())
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        self.slots.get_mut(id.index())
    }

    /// Active entities in slot order
    pub fn iter_active(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_active())
            .map(|(i, slot)| (EntityId(i as u32), slot))
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = (EntityId, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter(|(_, slot)| slot.is_active())
            .map(|(i, slot)| (EntityId(i as u32), slot))
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }

    /// Total slots ever allocated
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Dummy {
        active: bool,
        value: i32,
    }

    impl Poolable for Dummy {
        fn is_active(&self) -> bool {
            self.active
        }

        fn deactivate(&mut self) {
            self.active = false;
            self.value = 0;
        }
    }

    fn spawn(pool: &mut EntityPool<Dummy>, value: i32) -> EntityId {
        let (id, d) = pool.acquire();
        d.active = true;
        d.value = value;
        id
    }

    #[test]
    fn released_slots_are_reused() {
        let mut pool = EntityPool::new();
        let a = spawn(&mut pool, 1);
        let _b = spawn(&mut pool, 2);
        assert_eq!(pool.capacity(), 2);

        assert!(pool.release(a));
        assert_eq!(pool.active_count(), 1);
        let c = spawn(&mut pool, 3);
        assert_eq!(c, a);
        assert_eq!(pool.capacity(), 2);
        assert_eq!(pool.get(c).unwrap().value, 3);
    }

    #[test]
    fn double_release_is_ignored() {
        let mut pool = EntityPool::new();
        let a = spawn(&mut pool, 1);
        assert!(pool.release(a));
        assert!(!pool.release(a));
        assert_eq!(pool.free_count(), 1);
        assert!(!pool.release(EntityId(99)));
    }

    #[test]
    fn release_where_and_all() {
        let mut pool = EntityPool::new();
        for v in 0..5 {
            spawn(&mut pool, v);
        }
        assert_eq!(pool.release_where(|d| d.value % 2 == 0), 3);
        assert_eq!(
            pool.iter_active().map(|(_, d)| d.value).collect::<Vec<_>>(),
            vec![1, 3]
        );
        assert_eq!(pool.release_all(), 2);
        assert_eq!(pool.active_count(), 0);
        assert_eq!(pool.capacity(), 5);
    }
}
