mod aabb;
mod color;
mod ray;
mod triangle;

pub use aabb::AABB;
pub use color::{hex_to_rgb, srgb_to_linear};
pub use ray::{intersect_aabb, Ray};
pub use triangle::{moller_trumbore_intersect, TriangleHit};
