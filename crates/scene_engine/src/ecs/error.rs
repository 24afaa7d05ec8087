//! Scene error types

use thiserror::Error;

use crate::ecs::entity::EntityId;

/// Errors surfaced by generation-checked scene access
///
/// Benign absence (`contains`, `find`) is reported as `bool`/`Option`
/// instead; these variants cover handles and lookups the caller expected to
/// succeed.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneError {
    /// The entity behind this handle was destroyed and its index recycled
    #[error("stale entity handle {0:?}: the entity was destroyed and its index recycled")]
    StaleHandle(EntityId),

    /// The entity is live but has no component of the requested type
    #[error("entity {0:?} has no {1} component")]
    MissingComponent(EntityId, &'static str),

    /// A clone was asked to parent itself inside the subtree being cloned
    #[error("cannot clone entity {0:?} under its own subtree")]
    CloneIntoOwnSubtree(EntityId),
}
