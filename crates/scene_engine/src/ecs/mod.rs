//! Entity-Component-System implementation
//!
//! Entity identity lives in [`entity`], dense per-type storage in [`pool`],
//! the type-keyed pool collection in [`registry`], and the owning
//! orchestrator in [`scene`]. Built-in components and systems sit under
//! [`components`] and [`systems`].

pub mod component;
pub mod components;
pub mod config;
pub mod entity;
pub mod error;
pub mod pool;
pub mod registry;
pub mod scene;
pub mod system;
pub mod systems;

pub use component::Component;
pub use entity::{Entity, EntityId, EntityRef};
pub use error::SceneError;
pub use pool::ComponentPool;
pub use registry::ComponentPoolRegistry;
pub use scene::{Scene, SceneStats};
pub use system::System;
