//! Scene: entity storage, lifecycle, and frame orchestration
//!
//! The scene owns a slot-stable entity table (entities are never
//! swap-removed, so an id's index stays valid for its whole life), the free
//! queue of recyclable indices, the component pool registry, and the ordered
//! system list. All access from client code goes through generation-checked
//! [`EntityRef`] handles.

use std::collections::VecDeque;
use std::time::Instant;

use crate::ecs::component::Component;
use crate::ecs::config::SceneConfig;
use crate::ecs::entity::{Entity, EntityId, EntityRef};
use crate::ecs::error::SceneError;
use crate::ecs::pool::ComponentPool;
use crate::ecs::registry::ComponentPoolRegistry;
use crate::ecs::system::System;
use crate::foundation::time::Timer;

/// Per-frame statistics for scene updates
#[derive(Debug, Clone, Default)]
pub struct SceneStats {
    /// Current number of live entities
    pub entity_count: usize,

    /// Number of registered systems
    pub system_count: usize,

    /// Total live components summed over every pool
    pub component_count: usize,

    /// Smoothed FPS: frames over elapsed time since the scene was created
    pub fps: f32,

    /// Last frame time in milliseconds
    pub frame_time_ms: f32,

    /// Time spent in the `before_update` pass (microseconds)
    pub before_update_time_us: u64,

    /// Time spent in the `update` pass (microseconds)
    pub update_time_us: u64,

    /// Time spent in the `after_update` pass (microseconds)
    pub after_update_time_us: u64,
}

/// The scene: entity table, component pools, and system schedule
pub struct Scene {
    entities: Vec<Option<Entity>>,
    generations: Vec<u32>,
    usable_ids: VecDeque<u32>,
    existing_id_count: usize,
    pools: ComponentPoolRegistry,
    systems: Vec<Box<dyn System>>,
    root: EntityRef,
    config: SceneConfig,
    stats: SceneStats,
    timer: Timer,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Create a scene with default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SceneConfig::default())
    }

    /// Create a scene with custom configuration
    ///
    /// The scene starts with a single root entity at depth 0; everything else
    /// is created under it.
    #[must_use]
    pub fn with_config(config: SceneConfig) -> Self {
        let mut scene = Self {
            entities: Vec::new(),
            generations: Vec::new(),
            usable_ids: VecDeque::new(),
            existing_id_count: 0,
            pools: ComponentPoolRegistry::new(),
            systems: Vec::new(),
            root: EntityRef::from_id(EntityId::NONE),
            config,
            stats: SceneStats::default(),
            timer: Timer::new(),
        };
        while scene.existing_id_count < scene.config.initial_entity_capacity {
            scene.grow_storage();
        }

        let root_id = scene.allocate_id();
        scene.entities[root_id.index()] = Some(Entity::new(root_id, "root".into(), 0, None));
        scene.root = EntityRef::from_id(root_id);
        scene
    }

    /// Handle to the scene's root entity
    #[must_use]
    pub const fn root(&self) -> EntityRef {
        self.root
    }

    /// The scene's configuration
    #[must_use]
    pub const fn config(&self) -> &SceneConfig {
        &self.config
    }

    /// Statistics from the most recent [`update`](Self::update)
    #[must_use]
    pub const fn stats(&self) -> &SceneStats {
        &self.stats
    }

    /// Number of live entities, including the root
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.existing_id_count - self.usable_ids.len()
    }

    // ---- entity lifecycle -------------------------------------------------

    /// Create a new entity under `parent`
    ///
    /// The entity's depth is `parent.depth + 1`. Recycles a previously freed
    /// id if one is queued, otherwise grows the id space.
    pub fn new_entity(&mut self, parent: EntityRef, name: &str) -> Result<EntityRef, SceneError> {
        let parent_depth = self.entity(parent)?.depth();

        let id = self.allocate_id();
        let child = EntityRef::from_id(id);
        self.entities[id.index()] = Some(Entity::new(
            id,
            name.to_owned(),
            parent_depth + 1,
            Some(parent),
        ));
        if let Ok(parent_entity) = self.entity_mut(parent) {
            parent_entity.add_child(child);
        }

        if self.entity_count() > self.config.max_entities {
            log::warn!(
                "scene holds {} entities, above the configured cap of {}",
                self.entity_count(),
                self.config.max_entities
            );
        }
        log::debug!("created entity {id:?} ({name}) at depth {}", parent_depth + 1);
        Ok(child)
    }

    /// Destroy an entity and its whole subtree
    ///
    /// Children are removed first (post-order), every component pool is swept
    /// for each destroyed id, and the freed indices go to the front of the
    /// recycling queue. Removing the root is refused.
    pub fn remove_entity(&mut self, entity: EntityRef) -> Result<(), SceneError> {
        if entity == self.root {
            log::warn!("ignoring request to remove the scene root");
            return Ok(());
        }
        let (parent, children) = {
            let node = self.entity(entity)?;
            (node.parent(), node.children().to_vec())
        };

        for child in children {
            self.remove_entity(child)?;
        }

        self.pools.remove_entity_from_all(entity.id());
        if let Some(parent) = parent {
            if let Ok(parent_entity) = self.entity_mut(parent) {
                parent_entity.remove_child(entity);
            }
        }

        let index = entity.id().index();
        self.entities[index] = None;
        self.generations[index] = self.generations[index].wrapping_add(1);
        self.usable_ids.push_front(index as u32);
        log::debug!("removed entity {:?}", entity.id());
        Ok(())
    }

    /// Deep-clone an entity and its subtree
    ///
    /// Every component on every entity of the subtree is copied value-wise
    /// into entirely fresh ids; the original subtree is left untouched. With
    /// no explicit parent the clone becomes a sibling of `base`. A
    /// `new_parent` that is `base` itself or one of its descendants is
    /// refused with [`SceneError::CloneIntoOwnSubtree`]: the clone would
    /// otherwise keep descending into its own partially built copy.
    pub fn clone_entity(
        &mut self,
        base: EntityRef,
        new_parent: Option<EntityRef>,
    ) -> Result<EntityRef, SceneError> {
        if let Some(parent) = new_parent {
            let mut cursor = Some(parent);
            while let Some(node) = cursor {
                if node == base {
                    return Err(SceneError::CloneIntoOwnSubtree(base.id()));
                }
                cursor = self.entity(node)?.parent();
            }
        }

        let (name, base_parent, children) = {
            let node = self.entity(base)?;
            (node.name().to_owned(), node.parent(), node.children().to_vec())
        };

        let parent = new_parent.or(base_parent).unwrap_or(self.root);
        let fresh = self.new_entity(parent, &name)?;
        self.pools.clone_components(base.id(), fresh.id());

        for child in children {
            self.clone_entity(child, Some(fresh))?;
        }
        Ok(fresh)
    }

    /// Find the first entity with the given name
    ///
    /// Pre-order depth-first search from the root; with duplicate names the
    /// traversal order decides which match wins.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<EntityRef> {
        self.find_from(self.root, name)
    }

    /// Pre-order search of the subtree under `start` (inclusive)
    #[must_use]
    pub fn find_from(&self, start: EntityRef, name: &str) -> Option<EntityRef> {
        let node = self.entity(start).ok()?;
        if node.name() == name {
            return Some(start);
        }
        for &child in node.children() {
            if let Some(found) = self.find_from(child, name) {
                return Some(found);
            }
        }
        None
    }

    // ---- entity access ----------------------------------------------------

    /// Look up the live entity behind a handle
    ///
    /// Fails with [`SceneError::StaleHandle`] when the handle's generation
    /// does not match the slot, i.e. the entity was destroyed (and possibly
    /// its index recycled) after the handle was taken.
    pub fn entity(&self, entity: EntityRef) -> Result<&Entity, SceneError> {
        let id = entity.id();
        self.entities
            .get(id.index())
            .filter(|_| self.generations[id.index()] == id.generation())
            .and_then(Option::as_ref)
            .ok_or(SceneError::StaleHandle(id))
    }

    /// Mutable counterpart of [`entity`](Self::entity)
    pub fn entity_mut(&mut self, entity: EntityRef) -> Result<&mut Entity, SceneError> {
        let id = entity.id();
        let valid = self
            .generations
            .get(id.index())
            .map_or(false, |&generation| generation == id.generation());
        if !valid {
            return Err(SceneError::StaleHandle(id));
        }
        self.entities[id.index()]
            .as_mut()
            .ok_or(SceneError::StaleHandle(id))
    }

    /// Enable or disable an entity
    pub fn set_enabled(&mut self, entity: EntityRef, enabled: bool) -> Result<(), SceneError> {
        self.entity_mut(entity)?.set_enabled(enabled);
        Ok(())
    }

    // ---- component access -------------------------------------------------

    /// Attach a component to an entity, replacing any existing one
    pub fn add_component<T: Component>(
        &mut self,
        entity: EntityRef,
        component: T,
    ) -> Result<(), SceneError> {
        self.entity(entity)?;
        self.pools.pool_mut::<T>().add(entity.id(), component);
        Ok(())
    }

    /// Read an entity's component
    pub fn component<T: Component>(&self, entity: EntityRef) -> Result<&T, SceneError> {
        self.entity(entity)?;
        self.pools
            .pool::<T>()
            .and_then(|pool| pool.get(entity.id()))
            .ok_or_else(|| SceneError::MissingComponent(entity.id(), std::any::type_name::<T>()))
    }

    /// Mutate an entity's component
    pub fn component_mut<T: Component>(&mut self, entity: EntityRef) -> Result<&mut T, SceneError> {
        self.entity(entity)?;
        self.pools
            .pool_mut::<T>()
            .get_mut(entity.id())
            .ok_or_else(|| SceneError::MissingComponent(entity.id(), std::any::type_name::<T>()))
    }

    /// Whether a live entity has a component of type `T`
    #[must_use]
    pub fn has_component<T: Component>(&self, entity: EntityRef) -> bool {
        self.entity(entity).is_ok()
            && self
                .pools
                .pool::<T>()
                .map_or(false, |pool| pool.contains(entity.id()))
    }

    /// Detach a component from an entity, returning it if present
    pub fn remove_component<T: Component>(
        &mut self,
        entity: EntityRef,
    ) -> Result<Option<T>, SceneError> {
        self.entity(entity)?;
        Ok(self.pools.pool_mut::<T>().remove(entity.id()))
    }

    /// The dense pool for `T`, if any component of that type exists
    ///
    /// This is the hot iteration path: systems walk
    /// [`ComponentPool::components`] directly instead of doing per-id
    /// lookups.
    #[must_use]
    pub fn pool<T: Component>(&self) -> Option<&ComponentPool<T>> {
        self.pools.pool::<T>()
    }

    /// The mutable dense pool for `T`, created on first access
    pub fn pool_mut<T: Component>(&mut self) -> &mut ComponentPool<T> {
        self.pools.pool_mut::<T>()
    }

    // ---- frame driving ----------------------------------------------------

    /// Register a system; registration order is execution order
    pub fn add_system(&mut self, system: Box<dyn System>) {
        log::debug!("registered system '{}'", system.name());
        self.systems.push(system);
    }

    /// Run one frame: three full passes over the system list
    ///
    /// `before_update` runs for every system, then `update` for every system,
    /// then `after_update` — the passes are never interleaved per-system.
    pub fn update(&mut self, delta_time: f32) {
        // Systems receive `&mut Scene`, so the list is taken out of the scene
        // for the duration of the frame. Systems registered mid-frame join at
        // the end of the list.
        let mut systems = std::mem::take(&mut self.systems);

        let before_start = Instant::now();
        for system in &mut systems {
            system.before_update(self, delta_time);
        }
        let update_start = Instant::now();
        for system in &mut systems {
            log::trace!("running system '{}'", system.name());
            system.update(self, delta_time);
        }
        let after_start = Instant::now();
        for system in &mut systems {
            system.after_update(self, delta_time);
        }
        let frame_end = Instant::now();

        systems.append(&mut self.systems);
        self.systems = systems;
        self.timer.update();

        if self.config.enable_stats {
            self.stats.entity_count = self.entity_count();
            self.stats.system_count = self.systems.len();
            self.stats.component_count = self.pools.component_count();
            self.stats.fps = self.timer.average_fps();
            self.stats.frame_time_ms = self.timer.delta_time() * 1000.0;
            self.stats.before_update_time_us =
                update_start.duration_since(before_start).as_micros() as u64;
            self.stats.update_time_us = after_start.duration_since(update_start).as_micros() as u64;
            self.stats.after_update_time_us =
                frame_end.duration_since(after_start).as_micros() as u64;
        }
    }

    // ---- id allocation ----------------------------------------------------

    fn allocate_id(&mut self) -> EntityId {
        if self.usable_ids.is_empty() {
            self.grow_storage();
        }
        let index = self
            .usable_ids
            .pop_front()
            .expect("free queue is refilled by grow_storage");
        EntityId::new(index, self.generations[index as usize])
    }

    /// Growth policy: `2 * count + 1`, queuing every new index. Existing
    /// slots never move, so issued ids stay valid across growth.
    fn grow_storage(&mut self) {
        let new_count = 2 * self.existing_id_count + 1;
        self.entities.resize_with(new_count, || None);
        self.generations.resize(new_count, 0);
        for index in self.existing_id_count..new_count {
            self.usable_ids.push_back(index as u32);
        }
        log::trace!(
            "grew entity storage from {} to {new_count} slots",
            self.existing_id_count
        );
        self.existing_id_count = new_count;
    }
}
