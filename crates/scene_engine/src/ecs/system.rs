//! System trait
//!
//! Systems run single-threaded, in registration order, three full passes per
//! frame: `before_update` for every system, then `update` for every system,
//! then `after_update` for every system. The passes are never interleaved
//! per-system, so a system that must observe another's results (the render
//! path reading world matrices, for example) only needs to be registered
//! after it.

use crate::ecs::scene::Scene;

/// A per-frame processing stage over the scene's component pools
pub trait System {
    /// Name used in log lines
    fn name(&self) -> &str;

    /// First pass of the frame
    fn before_update(&mut self, _scene: &mut Scene, _delta_time: f32) {}

    /// Main pass of the frame
    fn update(&mut self, scene: &mut Scene, delta_time: f32);

    /// Last pass of the frame
    fn after_update(&mut self, _scene: &mut Scene, _delta_time: f32) {}
}
