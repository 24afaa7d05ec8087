//! Entity identity and hierarchy nodes
//!
//! Entity ids are recyclable: destroying an entity returns its index to the
//! scene's free queue. Each id carries a generation counter that is bumped on
//! recycle, so a handle kept past destruction is detected as stale instead of
//! silently aliasing an unrelated entity.

/// Opaque recyclable entity identifier
///
/// The fields are private on purpose: an id is not an integer and must not
/// take part in arithmetic or index other storage. Equality is field-wise, so
/// a stale id never compares equal to the id of the entity that reused its
/// index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId {
    index: u32,
    generation: u32,
}

impl EntityId {
    /// Reserved sentinel meaning "no entity"
    pub const NONE: Self = Self {
        index: u32::MAX,
        generation: 0,
    };

    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Whether this id is the "no entity" sentinel
    #[must_use]
    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }

    /// Backing slot index into the scene's entity table
    pub(crate) const fn index(self) -> usize {
        self.index as usize
    }

    pub(crate) const fn generation(self) -> u32 {
        self.generation
    }
}

/// Stable copyable handle to an entity
///
/// Client code holds `EntityRef` instead of references into the scene's
/// storage, which may reallocate on growth. Dereferencing goes through
/// [`Scene::entity`](crate::ecs::Scene::entity), which validates the
/// generation and reports a stale handle as an explicit error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityRef {
    id: EntityId,
}

impl EntityRef {
    /// Wrap an entity id in a handle
    #[must_use]
    pub const fn from_id(id: EntityId) -> Self {
        Self { id }
    }

    /// The underlying entity id
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }
}

/// A node in the scene hierarchy tree
///
/// Entities own no components; components live in pools keyed by the entity's
/// id. An entity owns its parent-child edges in the cascade-delete sense:
/// destroying it destroys the whole subtree.
///
/// Re-parenting is not supported: `parent` and `depth` are fixed at creation
/// time. The depth invariant `depth(child) == depth(parent) + 1` therefore
/// holds for the entity's entire lifetime.
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    name: String,
    depth: u32,
    parent: Option<EntityRef>,
    children: Vec<EntityRef>,
    enabled: bool,
}

impl Entity {
    pub(crate) fn new(id: EntityId, name: String, depth: u32, parent: Option<EntityRef>) -> Self {
        Self {
            id,
            name,
            depth,
            parent,
            children: Vec::new(),
            enabled: true,
        }
    }

    /// This entity's id
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// The entity's name (not required to be unique)
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the entity
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Number of parent edges between this entity and the scene root
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Non-owning back-reference to the parent (`None` only for the root)
    #[must_use]
    pub const fn parent(&self) -> Option<EntityRef> {
        self.parent
    }

    /// The entity's direct children
    #[must_use]
    pub fn children(&self) -> &[EntityRef] {
        &self.children
    }

    /// Whether the entity is enabled
    #[must_use]
    pub const fn enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the entity
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub(crate) fn add_child(&mut self, child: EntityRef) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: EntityRef) {
        self.children.retain(|&c| c != child);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_equality_is_field_wise() {
        let a = EntityId::new(3, 0);
        let b = EntityId::new(3, 0);
        let recycled = EntityId::new(3, 1);

        assert_eq!(a, b);
        assert_ne!(a, recycled, "a recycled index must not alias the old id");
    }

    #[test]
    fn test_none_sentinel() {
        assert!(EntityId::NONE.is_none());
        assert!(!EntityId::new(0, 0).is_none());
    }

    #[test]
    fn test_child_links() {
        let id = EntityId::new(0, 0);
        let mut entity = Entity::new(id, "root".into(), 0, None);
        let child = EntityRef::from_id(EntityId::new(1, 0));

        entity.add_child(child);
        assert_eq!(entity.children(), &[child]);

        entity.remove_child(child);
        assert!(entity.children().is_empty());
    }
}
