//! Built-in components

pub mod transform;

pub use transform::Transform;
