//! # Scene Engine
//!
//! A scene-graph ECS core: recyclable entity identity, dense component pools,
//! and a hierarchy-aware transform propagation pass.
//!
//! ## Features
//!
//! - **Generational Entity Ids**: stale handles are detected, not silently
//!   aliased to recycled entities
//! - **Dense Component Pools**: contiguous per-type storage with O(1)
//!   add/remove and a sanctioned hot iteration path
//! - **Scene Hierarchy**: tree-shaped parent/child structure with cascade
//!   delete, deep clone, and name lookup
//! - **Transform Propagation**: depth-ordered world matrix recomputation with
//!   dirty tracking
//!
//! ## Quick Start
//!
//! ```rust
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut scene = Scene::new();
//!     scene.add_system(Box::new(TransformSystem::new()));
//!
//!     let root = scene.root();
//!     let ship = scene.new_entity(root, "ship")?;
//!     scene.add_component(ship, Transform::from_position(Vec3::new(1.0, 0.0, 0.0)))?;
//!
//!     scene.update(1.0 / 60.0);
//!     let world = scene.component::<Transform>(ship)?.world_position();
//!     assert_eq!(world, Vec3::new(1.0, 0.0, 0.0));
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod foundation;
pub mod ecs;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        ecs::{
            components::Transform,
            config::{ConfigError, SceneConfig},
            error::SceneError,
            systems::TransformSystem,
            Component, ComponentPool, ComponentPoolRegistry, Entity, EntityId, EntityRef, Scene,
            SceneStats, System,
        },
        foundation::{
            math::{Mat4, Vec3},
            time::Timer,
        },
    };
}
