//! Type-keyed collection of component pools
//!
//! Each component type is assigned a small integer tag the first time it is
//! seen; the tag indexes a vector of type-erased pool slots. The concrete
//! `ComponentPool<T>` is recovered through a single checked downcast at the
//! access boundary, so per-access cost is one `TypeId` hash plus a vector
//! index.

use std::any::{Any, TypeId};
use std::collections::HashMap;

use crate::ecs::component::Component;
use crate::ecs::entity::EntityId;
use crate::ecs::pool::ComponentPool;

/// Object-safe view of a pool, enough for the whole-scene sweeps
/// (entity destruction, subtree cloning) that must touch every pool without
/// knowing its component type.
pub(crate) trait AnyPool: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    /// Remove `id`'s component; tolerates pools that do not contain it.
    fn remove(&mut self, id: EntityId);
    /// Copy `src`'s component (if any) onto `dst`.
    fn clone_into(&mut self, src: EntityId, dst: EntityId);
    /// Number of live components in the pool.
    fn live_count(&self) -> usize;
}

impl<T: Component> AnyPool for ComponentPool<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn remove(&mut self, id: EntityId) {
        Self::remove(self, id);
    }

    fn clone_into(&mut self, src: EntityId, dst: EntityId) {
        if let Some(component) = self.get(src).cloned() {
            self.add(dst, component);
        }
    }

    fn live_count(&self) -> usize {
        self.len()
    }
}

/// Registry of one pool per component type, created lazily on first access
#[derive(Default)]
pub struct ComponentPoolRegistry {
    tags: HashMap<TypeId, usize>,
    pools: Vec<Option<Box<dyn AnyPool>>>,
}

impl ComponentPoolRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The pool for `T`, if one has been created
    #[must_use]
    pub fn pool<T: Component>(&self) -> Option<&ComponentPool<T>> {
        let tag = self.tag::<T>()?;
        self.pools[tag]
            .as_ref()?
            .as_any()
            .downcast_ref::<ComponentPool<T>>()
    }

    /// The pool for `T`, created on first access
    pub fn pool_mut<T: Component>(&mut self) -> &mut ComponentPool<T> {
        let tag = self.tag_or_register::<T>();
        let slot = &mut self.pools[tag];
        if slot.is_none() {
            // The pool was removed; the tag stays valid, so revive the slot.
            *slot = Some(Box::new(ComponentPool::<T>::new()));
        }
        slot.as_mut()
            .and_then(|pool| pool.as_any_mut().downcast_mut::<ComponentPool<T>>())
            .expect("a type's tag always indexes a pool of that type")
    }

    /// Whether a pool for `T` currently exists
    #[must_use]
    pub fn contains<T: Component>(&self) -> bool {
        self.tag::<T>()
            .map_or(false, |tag| self.pools[tag].is_some())
    }

    /// Drop the pool for `T` and every component in it
    pub fn remove<T: Component>(&mut self) {
        if let Some(tag) = self.tag::<T>() {
            self.pools[tag] = None;
        }
    }

    /// Number of live pools
    #[must_use]
    pub fn pool_count(&self) -> usize {
        self.pools.iter().flatten().count()
    }

    /// Total number of live components summed over every pool
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.pools
            .iter()
            .flatten()
            .map(|pool| pool.live_count())
            .sum()
    }

    /// Unregister `id` from every pool
    ///
    /// Centralized here so entity destruction cannot forget a pool and leave
    /// a dangling dense-array entry behind.
    pub(crate) fn remove_entity_from_all(&mut self, id: EntityId) {
        for pool in self.pools.iter_mut().flatten() {
            pool.remove(id);
        }
    }

    /// Copy every component `src` has onto `dst`
    pub(crate) fn clone_components(&mut self, src: EntityId, dst: EntityId) {
        for pool in self.pools.iter_mut().flatten() {
            pool.clone_into(src, dst);
        }
    }

    fn tag<T: Component>(&self) -> Option<usize> {
        self.tags.get(&TypeId::of::<T>()).copied()
    }

    fn tag_or_register<T: Component>(&mut self) -> usize {
        if let Some(tag) = self.tag::<T>() {
            return tag;
        }
        let tag = self.pools.len();
        self.tags.insert(TypeId::of::<T>(), tag);
        self.pools.push(Some(Box::new(ComponentPool::<T>::new())));
        log::debug!(
            "registered component pool for {} (tag {tag})",
            std::any::type_name::<T>()
        );
        tag
    }
}
