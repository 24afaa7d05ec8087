//! Hierarchical transform propagation
//!
//! Recomputes world matrices for every dirty [`Transform`] in
//! parent-before-child order. The ordering guarantee comes from sorting the
//! dense pool by tree depth: in a tree, depth(ancestor) < depth(descendant)
//! always holds, so by the time a transform is processed its parent's world
//! matrix is already up to date in this same pass. Siblings share a depth and
//! may be processed in any order; they never depend on each other.
//!
//! Register this system after all gameplay systems that move entities and
//! before anything that reads world matrices. That ordering is a documented
//! contract enforced by registration order, not checked at runtime.
//!
//! The per-frame sort is O(n log n); since children are always created after
//! their parents, maintaining ancestor-first order incrementally would avoid
//! it. Kept as the explicit sort for now.

use std::time::Instant;

use crate::ecs::components::Transform;
use crate::ecs::entity::{EntityId, EntityRef};
use crate::ecs::scene::Scene;
use crate::ecs::system::System;

/// System that propagates local transforms to cached world matrices
#[derive(Debug, Default)]
pub struct TransformSystem;

impl TransformSystem {
    /// Create the system
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl System for TransformSystem {
    fn name(&self) -> &str {
        "transform"
    }

    fn update(&mut self, scene: &mut Scene, _delta_time: f32) {
        let pass_start = Instant::now();

        // Depth refresh: the dense pool knows nothing about tree structure,
        // so copy each owner's hierarchy depth onto its component before
        // sorting on it.
        let owners: Vec<EntityId> = match scene.pool::<Transform>() {
            Some(pool) if !pool.is_empty() => {
                (0..pool.len()).map(|slot| pool.entity_at(slot)).collect()
            }
            _ => return,
        };
        let depths: Vec<u32> = owners
            .iter()
            .map(|&id| match scene.entity(EntityRef::from_id(id)) {
                Ok(entity) => entity.depth(),
                Err(_) => {
                    debug_assert!(false, "transform owned by destroyed entity {id:?}");
                    0
                }
            })
            .collect();

        {
            let pool = scene.pool_mut::<Transform>();
            for (slot, depth) in depths.into_iter().enumerate() {
                pool.components_mut()[slot].set_depth(depth);
            }
            // Topological order; the pool rewrites its id<->slot maps so
            // per-id lookups stay valid for every other system.
            pool.sort_by_key(Transform::depth);
        }

        // Hierarchy lookups for the recompute loop, in the sorted order.
        let count = scene.pool::<Transform>().map_or(0, |pool| pool.len());
        let mut parents: Vec<Option<EntityId>> = Vec::with_capacity(count);
        let mut children: Vec<Vec<EntityId>> = Vec::with_capacity(count);
        for slot in 0..count {
            let id = scene
                .pool::<Transform>()
                .map_or(EntityId::NONE, |pool| pool.entity_at(slot));
            match scene.entity(EntityRef::from_id(id)) {
                Ok(entity) => {
                    parents.push(entity.parent().map(|parent| parent.id()));
                    children.push(entity.children().iter().map(EntityRef::id).collect());
                }
                Err(_) => {
                    parents.push(None);
                    children.push(Vec::new());
                }
            }
        }

        // Recompute pass: parents first, so a dirty transform can read its
        // parent's world matrix from this same frame.
        let pool = scene.pool_mut::<Transform>();
        let mut recomputed = 0usize;
        for slot in 0..pool.len() {
            if !pool.components()[slot].is_dirty() {
                continue;
            }
            let local = pool.components()[slot].local_matrix();
            let world = if pool.components()[slot].is_world() {
                local
            } else {
                // A parent without a Transform component behaves like no
                // parent at all: the local matrix is the world matrix.
                match parents[slot].and_then(|parent_id| pool.get(parent_id)) {
                    Some(parent) => parent.world_matrix() * local,
                    None => local,
                }
            };

            let transform = &mut pool.components_mut()[slot];
            transform.set_world_matrix(world);
            transform.clear_dirty();
            recomputed += 1;

            // The parent's world matrix changed, so every child must
            // recompute even if its own local fields did not move. Children
            // sit at greater depth, hence at later slots in this pass.
            for &child_id in &children[slot] {
                if let Some(child) = pool.get_mut(child_id) {
                    child.mark_dirty();
                }
            }
        }

        log::trace!(
            "transform pass recomputed {recomputed}/{count} matrices in {}us",
            pass_start.elapsed().as_micros()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use approx::assert_relative_eq;
    use std::f32::consts::PI;

    const EPSILON: f32 = 1e-5;
    const DT: f32 = 1.0 / 60.0;

    fn scene_with_transforms() -> Scene {
        let mut scene = Scene::new();
        scene.add_system(Box::new(TransformSystem::new()));
        scene
    }

    #[test]
    fn test_chain_composes_parent_before_child() {
        let mut scene = scene_with_transforms();
        let root = scene.root();
        let base = scene.new_entity(root, "base").unwrap();
        let mid = scene.new_entity(base, "mid").unwrap();
        let leaf = scene.new_entity(mid, "leaf").unwrap();

        // Components inserted leaf-first so the dense pool starts in
        // reverse-topological order and the depth sort has real work to do.
        scene
            .add_component(leaf, Transform::from_position(Vec3::new(0.0, 1.0, 0.0)))
            .unwrap();
        scene
            .add_component(mid, Transform::from_position(Vec3::new(1.0, 0.0, 0.0)))
            .unwrap();
        scene.add_component(base, Transform::identity()).unwrap();

        scene.update(DT);

        assert_relative_eq!(
            scene.component::<Transform>(leaf).unwrap().world_position(),
            Vec3::new(1.0, 1.0, 0.0),
            epsilon = EPSILON
        );

        // C.world == P.world * C.local for every parent-child pair.
        let mid_world = *scene.component::<Transform>(mid).unwrap().world_matrix();
        let leaf_local = scene.component::<Transform>(leaf).unwrap().local_matrix();
        assert_relative_eq!(
            *scene.component::<Transform>(leaf).unwrap().world_matrix(),
            mid_world * leaf_local,
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_parent_translation_propagates_to_clean_child() {
        let mut scene = scene_with_transforms();
        let root = scene.root();
        let base = scene.new_entity(root, "base").unwrap();
        let mid = scene.new_entity(base, "mid").unwrap();
        let leaf = scene.new_entity(mid, "leaf").unwrap();
        scene.add_component(base, Transform::identity()).unwrap();
        scene
            .add_component(mid, Transform::from_position(Vec3::new(1.0, 0.0, 0.0)))
            .unwrap();
        scene
            .add_component(leaf, Transform::from_position(Vec3::new(0.0, 1.0, 0.0)))
            .unwrap();

        scene.update(DT);
        assert_relative_eq!(
            scene.component::<Transform>(leaf).unwrap().world_position(),
            Vec3::new(1.0, 1.0, 0.0),
            epsilon = EPSILON
        );

        // Only the base moves; descendants were clean but must follow.
        scene
            .component_mut::<Transform>(base)
            .unwrap()
            .translate(Vec3::new(5.0, 0.0, 0.0));
        scene.update(DT);

        let leaf_transform = scene.component::<Transform>(leaf).unwrap();
        assert_relative_eq!(
            leaf_transform.world_position(),
            Vec3::new(6.0, 1.0, 0.0),
            epsilon = EPSILON
        );
        assert!(!leaf_transform.is_dirty(), "dirty clears after the pass");
    }

    #[test]
    fn test_is_world_ignores_parent() {
        let mut scene = scene_with_transforms();
        let root = scene.root();
        let base = scene.new_entity(root, "base").unwrap();
        let child = scene.new_entity(base, "child").unwrap();
        scene
            .add_component(base, Transform::from_position(Vec3::new(10.0, 0.0, 0.0)))
            .unwrap();
        scene
            .add_component(
                child,
                Transform::from_position(Vec3::new(0.0, 2.0, 0.0)).with_is_world(true),
            )
            .unwrap();

        scene.update(DT);

        assert_relative_eq!(
            scene.component::<Transform>(child).unwrap().world_position(),
            Vec3::new(0.0, 2.0, 0.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_parent_without_transform_behaves_as_root() {
        let mut scene = scene_with_transforms();
        let root = scene.root();
        let base = scene.new_entity(root, "base").unwrap();
        let group = scene.new_entity(base, "group").unwrap();
        let child = scene.new_entity(group, "child").unwrap();

        // `group` is a bare grouping node with no Transform.
        scene
            .add_component(base, Transform::from_position(Vec3::new(7.0, 0.0, 0.0)))
            .unwrap();
        scene
            .add_component(child, Transform::from_position(Vec3::new(0.0, 3.0, 0.0)))
            .unwrap();

        scene.update(DT);

        assert_relative_eq!(
            scene.component::<Transform>(child).unwrap().world_position(),
            Vec3::new(0.0, 3.0, 0.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_rotated_parent_moves_child_orbit_style() {
        let mut scene = scene_with_transforms();
        let root = scene.root();
        let pivot = scene.new_entity(root, "pivot").unwrap();
        let satellite = scene.new_entity(pivot, "satellite").unwrap();
        scene
            .add_component(
                pivot,
                Transform::identity().with_rotation(Vec3::new(0.0, 0.0, PI / 2.0)),
            )
            .unwrap();
        scene
            .add_component(satellite, Transform::from_position(Vec3::new(1.0, 0.0, 0.0)))
            .unwrap();

        scene.update(DT);

        // A 90-degree Z rotation on the pivot swings (1,0,0) to (0,1,0).
        assert_relative_eq!(
            scene
                .component::<Transform>(satellite)
                .unwrap()
                .world_position(),
            Vec3::new(0.0, 1.0, 0.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_cloned_clean_subtree_recomputes_under_new_parent() {
        let mut scene = scene_with_transforms();
        let root = scene.root();
        let base = scene.new_entity(root, "base").unwrap();
        let far = scene.new_entity(root, "far").unwrap();
        scene
            .add_component(base, Transform::from_position(Vec3::new(0.0, 1.0, 0.0)))
            .unwrap();
        scene
            .add_component(far, Transform::from_position(Vec3::new(10.0, 0.0, 0.0)))
            .unwrap();

        // Settle the originals so the clone starts from clean components.
        scene.update(DT);
        assert!(!scene.component::<Transform>(base).unwrap().is_dirty());

        let copy = scene.clone_entity(base, Some(far)).unwrap();
        assert!(
            scene.component::<Transform>(copy).unwrap().is_dirty(),
            "cloned transforms must request a recompute"
        );

        // The copy sits under `far`, so its world position must pick up the
        // new parent instead of reusing the original's cached matrix.
        scene.update(DT);
        assert_relative_eq!(
            scene.component::<Transform>(copy).unwrap().world_position(),
            Vec3::new(10.0, 1.0, 0.0),
            epsilon = EPSILON
        );
        assert_relative_eq!(
            scene.component::<Transform>(base).unwrap().world_position(),
            Vec3::new(0.0, 1.0, 0.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_per_id_lookup_survives_depth_sort() {
        let mut scene = scene_with_transforms();
        let root = scene.root();

        // A wider tree: two branches of different depths, inserted shuffled.
        let a = scene.new_entity(root, "a").unwrap();
        let b = scene.new_entity(root, "b").unwrap();
        let a1 = scene.new_entity(a, "a1").unwrap();
        let a2 = scene.new_entity(a1, "a2").unwrap();
        for (entity, x) in [(a2, 4.0), (b, 2.0), (a, 1.0), (a1, 3.0)] {
            scene
                .add_component(entity, Transform::from_position(Vec3::new(x, 0.0, 0.0)))
                .unwrap();
        }

        scene.update(DT);

        // Depths in the dense array are ascending after the pass.
        let pool = scene.pool::<Transform>().unwrap();
        let depths: Vec<u32> = pool.components().iter().map(Transform::depth).collect();
        let mut sorted = depths.clone();
        sorted.sort_unstable();
        assert_eq!(depths, sorted);

        // And per-id lookups still point at the right data.
        assert_relative_eq!(
            scene.component::<Transform>(a2).unwrap().world_position(),
            Vec3::new(8.0, 0.0, 0.0),
            epsilon = EPSILON
        );
        assert_relative_eq!(
            scene.component::<Transform>(b).unwrap().world_position(),
            Vec3::new(2.0, 0.0, 0.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_empty_pool_is_a_noop() {
        let mut scene = scene_with_transforms();
        scene.update(DT);
        assert_eq!(scene.stats().entity_count, 1);
    }
}
