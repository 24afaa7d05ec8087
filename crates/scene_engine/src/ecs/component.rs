//! Component trait and implementations

/// Marker trait for components
///
/// Components are plain values stored in per-type pools. `Clone` is required
/// so [`Scene::clone_entity`](crate::ecs::Scene::clone_entity) can copy a
/// subtree's components value-wise into fresh entities.
pub trait Component: Clone + Send + Sync + 'static {}

impl Component for crate::ecs::components::Transform {}
