//! Movement & Collision Resolution Engine
//!
//! Given an entity and a candidate target position, computes the
//! actually-permitted new position against static walls and other live
//! entities, with a bounded wall-slide retry for ground movers and
//! height-band overlap checks for the vertical axis.
//!
//! The engine is pure: it reads the wall segments and the live entity set
//! and never mutates anything. The Core applies the returned position.

use std::cmp::Ordering;

use crate::geom::{clamp, line_circle_intersection, line_intersection, Circle, Line, Vec2};
use crate::sim::entity::{Contact, Entity, Position, WALL_ID};
use crate::sim::map::GridMap;

/// Margin kept between a mover and the map boundary, and the amount wall
/// faces are inflated by when segments are derived.
pub const CLIP_DISTANCE: f64 = 0.1;

/// Stop-short margin for the slide retry, also used as the axis-exhausted
/// threshold. One consistent epsilon for both roles.
pub const SLIDE_MARGIN: f64 = 0.01;

/// Ceiling on slide retries. Termination is guaranteed by the counter, not
/// by float behavior.
pub const MAX_SLIDE_ATTEMPTS: u32 = 3;

/// Tunable collision policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollisionRules {
    /// When set, an entity with `collision_radius == 0` still blocks others
    /// (it remains unable to collide itself). Off by default: zero radius
    /// opts the entity out of dynamic collision entirely.
    pub zero_radius_blocks: bool,
}

/// Outcome of a [`resolve_move`] query.
#[derive(Clone, Debug, PartialEq)]
pub struct MoveResolution {
    /// The legal horizontal position. Equal to the mover's pre-move position
    /// when the move was fully rejected.
    pub position: Vec2,
    /// The nearest blocking collision encountered, if any. A slid move still
    /// reports the contact that forced the slide.
    pub contact: Option<Contact>,
}

/// Resolve a requested move for `entity` toward `target`.
///
/// `allow_slide` enables the wall-hugging retry used by ground movers;
/// projectiles pass `false` so any contact stops them dead. `others` is the
/// Core's live entity set minus the mover itself (the engine skips the mover
/// and its parent regardless).
pub fn resolve_move(
    entity: &Entity,
    target: Position,
    allow_slide: bool,
    rules: CollisionRules,
    map: &GridMap,
    walls: &[Line],
    others: &[&Entity],
) -> MoveResolution {
    let start = entity.position.xy();
    let mut target_xy = Vec2::new(target.x, target.y);
    let mut slide = allow_slide;
    let mut first_contact: Option<Contact> = None;

    for _ in 0..=MAX_SLIDE_ATTEMPTS {
        if target_xy == start {
            return MoveResolution {
                position: start,
                contact: first_contact,
            };
        }

        let segment = Line::new(start.x, start.y, target_xy.x, target_xy.y);
        let mut contacts = gather_contacts(entity, &segment, target.z, rules, walls, others);

        if contacts.is_empty() {
            let clamped = clamp_to_bounds(target_xy, map);
            if map.is_walkable(clamped.x, clamped.y) {
                return MoveResolution {
                    position: clamped,
                    contact: first_contact,
                };
            }
            // Destination tile is a wall cell the segment test missed
            // (e.g. a corner-grazing move). Reject in place.
            let contact = Contact {
                position: Position::new(clamped.x, clamped.y, entity.position.z),
                peer: WALL_ID,
                distance: start.distance(clamped),
            };
            return MoveResolution {
                position: start,
                contact: Some(first_contact.unwrap_or(contact)),
            };
        }

        // Stable sort; ties keep insertion order.
        contacts.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(Ordering::Equal)
        });
        let nearest = contacts.swap_remove(0);
        let nearest_distance = nearest.distance;
        if first_contact.is_none() {
            first_contact = Some(nearest);
        }

        if !slide {
            return MoveResolution {
                position: start,
                contact: first_contact,
            };
        }

        // Shorten to stop just short of the nearest contact, then retry:
        // if one axis is exhausted, slide along the other using the
        // original target's component; otherwise retry the shortened move
        // with sliding off so the loop terminates.
        let shortened = (nearest_distance - SLIDE_MARGIN).max(0.0);
        let angle = segment.angle();
        let nx = start.x + shortened * angle.cos();
        let ny = start.y + shortened * angle.sin();
        slide = false;
        if (nx - start.x).abs() <= SLIDE_MARGIN {
            target_xy = Vec2::new(start.x, target.y);
        } else if (ny - start.y).abs() <= SLIDE_MARGIN {
            target_xy = Vec2::new(target.x, start.y);
        } else {
            target_xy = Vec2::new(nx, ny);
        }
    }

    MoveResolution {
        position: start,
        contact: first_contact,
    }
}

/// All wall and entity intersections along one movement segment, unsorted.
fn gather_contacts(
    entity: &Entity,
    segment: &Line,
    target_z: f64,
    rules: CollisionRules,
    walls: &[Line],
    others: &[&Entity],
) -> Vec<Contact> {
    let start = segment.start();
    let mut contacts = Vec::new();

    for wall in walls {
        if let Some(p) = line_intersection(segment, wall) {
            contacts.push(Contact {
                position: Position::new(p.x, p.y, entity.position.z),
                peer: WALL_ID,
                distance: start.distance(p),
            });
        }
    }

    if !entity.is_collidable() {
        return contacts;
    }

    let (mover_min, mover_max) = entity.height_band(target_z);
    let mover_mid = (mover_min + mover_max) / 2.0;

    for other in others {
        if other.id == entity.id || other.id == entity.parent_id {
            continue;
        }
        if !other.is_collidable() && !rules.zero_radius_blocks {
            continue;
        }

        let (peer_min, peer_max) = other.height_band(other.position.z);
        if mover_min > peer_max || peer_min > mover_max {
            continue;
        }
        let contact_z = clamp(mover_mid, peer_min, peer_max);

        let combined = Circle::new(
            other.position.x,
            other.position.y,
            entity.collision_radius + other.collision_radius,
        );
        for approach in line_circle_intersection(segment, &combined, true) {
            if other.collision_radius <= 0.0 {
                // Zero-radius blocker: the combined-circle point is the
                // contact itself.
                contacts.push(Contact {
                    position: Position::new(approach.x, approach.y, contact_z),
                    peer: other.id,
                    distance: start.distance(approach),
                });
                continue;
            }
            // Cast from the approach point toward the peer's center and
            // take the entry into its own body circle.
            let ray = Line::new(approach.x, approach.y, other.position.x, other.position.y);
            let body = Circle::new(other.position.x, other.position.y, other.collision_radius);
            for hit in line_circle_intersection(&ray, &body, true) {
                contacts.push(Contact {
                    position: Position::new(hit.x, hit.y, contact_z),
                    peer: other.id,
                    distance: start.distance(hit),
                });
            }
        }
    }

    contacts
}

fn clamp_to_bounds(p: Vec2, map: &GridMap) -> Vec2 {
    Vec2::new(
        clamp(p.x, CLIP_DISTANCE, map.width() as f64 - CLIP_DISTANCE),
        clamp(p.y, CLIP_DISTANCE, map.height() as f64 - CLIP_DISTANCE),
    )
}
