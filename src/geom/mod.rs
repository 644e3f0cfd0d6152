//! Geometry Primitives
//!
//! Leaf math used by the collision engine: 2D vectors, line segments,
//! circles, intersection tests and angle helpers. Pure functions, no state.

pub mod line;
pub mod vec2;

pub use line::{
    line_circle_intersection, line_intersection, normalize_angle, trajectory_end, Circle, Line,
};
pub use vec2::Vec2;

/// Clamp `value` into `[min, max]`.
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}
