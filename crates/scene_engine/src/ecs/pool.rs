//! Dense component storage
//!
//! One `ComponentPool<T>` holds every `T` in the scene, packed contiguously
//! for cache-friendly iteration. Two index structures keep lookups O(1):
//! `slot_to_entity` maps a dense slot back to its owning entity, and
//! `entity_to_slot` maps an entity index to its dense slot (or the tombstone
//! sentinel when absent). Removal swaps with the last element and pops, so
//! the dense array never has gaps.
//!
//! Invariant: `entity_to_slot[slot_to_entity[s].index()] == s` for every live
//! slot `s`.

use crate::ecs::entity::EntityId;

/// Sentinel in the sparse map marking "entity has no component here"
const EMPTY_SLOT: u32 = u32::MAX;

/// Dense array storage for one component type
#[derive(Debug)]
pub struct ComponentPool<T> {
    dense: Vec<T>,
    slot_to_entity: Vec<EntityId>,
    entity_to_slot: Vec<u32>,
}

impl<T> Default for ComponentPool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ComponentPool<T> {
    /// Create an empty pool
    #[must_use]
    pub const fn new() -> Self {
        Self {
            dense: Vec::new(),
            slot_to_entity: Vec::new(),
            entity_to_slot: Vec::new(),
        }
    }

    /// Number of live components
    #[must_use]
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    /// Whether the pool holds no components
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Insert a component for `id`
    ///
    /// If `id` already has a component in this pool, the existing value is
    /// replaced in place. `Scene::clone_entity` relies on this policy.
    pub fn add(&mut self, id: EntityId, component: T) {
        let index = id.index();
        if index >= self.entity_to_slot.len() {
            self.entity_to_slot.resize(index + 1, EMPTY_SLOT);
        }

        let slot = self.entity_to_slot[index];
        if slot == EMPTY_SLOT {
            self.entity_to_slot[index] = self.dense.len() as u32;
            self.dense.push(component);
            self.slot_to_entity.push(id);
        } else {
            self.dense[slot as usize] = component;
            self.slot_to_entity[slot as usize] = id;
        }
    }

    /// Remove the component for `id`, returning it if present
    ///
    /// No-op for ids without a component. Swap-remove: the last dense element
    /// moves into the freed slot and both index maps are rewritten for it.
    pub fn remove(&mut self, id: EntityId) -> Option<T> {
        let index = id.index();
        if index >= self.entity_to_slot.len() {
            return None;
        }
        let slot = self.entity_to_slot[index];
        if slot == EMPTY_SLOT {
            return None;
        }

        let slot = slot as usize;
        let removed = self.dense.swap_remove(slot);
        self.slot_to_entity.swap_remove(slot);
        if slot < self.dense.len() {
            let moved = self.slot_to_entity[slot];
            self.entity_to_slot[moved.index()] = slot as u32;
        }
        self.entity_to_slot[index] = EMPTY_SLOT;
        Some(removed)
    }

    /// Get the component for `id`, if present
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&T> {
        let slot = self.slot_of(id)?;
        Some(&self.dense[slot])
    }

    /// Get the component for `id` mutably, if present
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut T> {
        let slot = self.slot_of(id)?;
        Some(&mut self.dense[slot])
    }

    /// Get the component for `id`, panicking if absent
    ///
    /// Use when existence has already been established; a miss here is a
    /// contract violation, not a recoverable condition.
    #[must_use]
    pub fn at(&self, id: EntityId) -> &T {
        self.get(id).unwrap_or_else(|| {
            panic!(
                "no {} component for entity {id:?}",
                std::any::type_name::<T>()
            )
        })
    }

    /// Mutable counterpart of [`at`](Self::at)
    #[must_use]
    pub fn at_mut(&mut self, id: EntityId) -> &mut T {
        match self.slot_of(id) {
            Some(slot) => &mut self.dense[slot],
            None => panic!(
                "no {} component for entity {id:?}",
                std::any::type_name::<T>()
            ),
        }
    }

    /// O(1) membership test
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.slot_of(id).is_some()
    }

    /// The dense backing array, the sanctioned hot iteration path
    ///
    /// Slot indices into this slice are only valid until the next structural
    /// mutation (`add`, `remove`, `sort_by_key`); never cache them across
    /// calls.
    #[must_use]
    pub fn components(&self) -> &[T] {
        &self.dense
    }

    /// Mutable dense backing array
    #[must_use]
    pub fn components_mut(&mut self) -> &mut [T] {
        &mut self.dense
    }

    /// Reverse lookup from a dense slot to the owning entity
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range.
    #[must_use]
    pub fn entity_at(&self, slot: usize) -> EntityId {
        self.slot_to_entity[slot]
    }

    /// Iterate `(owner, component)` pairs in dense order
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &T)> {
        self.slot_to_entity.iter().copied().zip(self.dense.iter())
    }

    /// Reorder the dense array by a key, rewriting both index maps
    ///
    /// The transform pass uses this to establish parent-before-child order by
    /// sorting on depth. Ties keep no particular order.
    pub fn sort_by_key<K, F>(&mut self, mut key: F)
    where
        F: FnMut(&T) -> K,
        K: Ord,
    {
        let mut entries: Vec<(T, EntityId)> = self
            .dense
            .drain(..)
            .zip(self.slot_to_entity.drain(..))
            .collect();
        entries.sort_by(|a, b| key(&a.0).cmp(&key(&b.0)));

        for (slot, (component, id)) in entries.into_iter().enumerate() {
            self.entity_to_slot[id.index()] = slot as u32;
            self.dense.push(component);
            self.slot_to_entity.push(id);
        }
    }

    fn slot_of(&self, id: EntityId) -> Option<usize> {
        let index = id.index();
        let slot = *self.entity_to_slot.get(index)?;
        if slot == EMPTY_SLOT {
            return None;
        }
        Some(slot as usize)
    }
}
