//! Line Segments, Circles and Intersection Tests
//!
//! The intersection routines are the workhorses of the collision engine:
//! segment-vs-segment for walls and segment-vs-circle for entity bodies.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use super::vec2::Vec2;

/// A 2D line segment.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Line {
    /// Create a segment from two endpoints.
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Create a segment starting at `(x, y)` with the given heading and length.
    pub fn from_angle(x: f64, y: f64, angle: f64, dist: f64) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + dist * angle.cos(),
            y2: y + dist * angle.sin(),
        }
    }

    /// Heading of the segment in radians.
    #[inline]
    pub fn angle(&self) -> f64 {
        (self.y2 - self.y1).atan2(self.x2 - self.x1)
    }

    /// First endpoint.
    #[inline]
    pub fn start(&self) -> Vec2 {
        Vec2::new(self.x1, self.y1)
    }

    /// Second endpoint.
    #[inline]
    pub fn end(&self) -> Vec2 {
        Vec2::new(self.x2, self.y2)
    }
}

/// A circle described by center and radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Circle {
    pub const fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }
}

/// Intersection point of two segments, if they cross.
///
/// Collinear overlap reports no intersection; the wall grid never produces
/// movement segments exactly collinear with a wall face that also need to
/// stop there.
pub fn line_intersection(a: &Line, b: &Line) -> Option<Vec2> {
    let denom = (b.y2 - b.y1) * (a.x2 - a.x1) - (b.x2 - b.x1) * (a.y2 - a.y1);
    if denom == 0.0 {
        return None;
    }

    let ua = ((b.x2 - b.x1) * (a.y1 - b.y1) - (b.y2 - b.y1) * (a.x1 - b.x1)) / denom;
    let ub = ((a.x2 - a.x1) * (a.y1 - b.y1) - (a.y2 - a.y1) * (a.x1 - b.x1)) / denom;

    if !(0.0..=1.0).contains(&ua) || !(0.0..=1.0).contains(&ub) {
        return None;
    }

    Some(Vec2::new(
        a.x1 + ua * (a.x2 - a.x1),
        a.y1 + ua * (a.y2 - a.y1),
    ))
}

/// Intersection points of a segment (or its carrier line) with a circle.
///
/// Returns 0, 1 or 2 points. With `segment_only` set, points outside the
/// segment's parameter range are discarded.
pub fn line_circle_intersection(line: &Line, circle: &Circle, segment_only: bool) -> Vec<Vec2> {
    let dx = line.x2 - line.x1;
    let dy = line.y2 - line.y1;
    let fx = line.x1 - circle.x;
    let fy = line.y1 - circle.y;

    let a = dx * dx + dy * dy;
    if a == 0.0 {
        // Degenerate segment
        return Vec::new();
    }

    let b = 2.0 * (fx * dx + fy * dy);
    let c = fx * fx + fy * fy - circle.radius * circle.radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }

    let root = discriminant.sqrt();
    let t1 = (-b - root) / (2.0 * a);
    let t2 = (-b + root) / (2.0 * a);

    let mut points = Vec::with_capacity(2);
    for t in [t1, t2] {
        if segment_only && !(0.0..=1.0).contains(&t) {
            continue;
        }
        points.push(Vec2::new(line.x1 + t * dx, line.y1 + t * dy));
    }

    if discriminant == 0.0 && points.len() == 2 {
        // Tangent: t1 == t2, report once
        points.pop();
    }

    points
}

/// Endpoint of a 3D trajectory from heading, pitch and travel distance.
pub fn trajectory_end(x: f64, y: f64, z: f64, heading: f64, pitch: f64, dist: f64) -> (f64, f64, f64) {
    (
        x + dist * pitch.cos() * heading.cos(),
        y + dist * pitch.cos() * heading.sin(),
        z + dist * pitch.sin(),
    )
}

/// Normalize an angle into `(-PI, PI]`.
pub fn normalize_angle(mut angle: f64) -> f64 {
    while angle <= -PI {
        angle += TAU;
    }
    while angle > PI {
        angle -= TAU;
    }
    angle
}
