//! Bounding boxes.

mod aabb;

pub use aabb::Aabb2;
