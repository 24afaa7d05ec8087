//! Built-in systems

pub mod transform_system;

pub use transform_system::TransformSystem;
