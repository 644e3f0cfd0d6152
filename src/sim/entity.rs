//! Entity Record
//!
//! The authoritative per-actor physical/identity state. Entities are owned
//! exclusively by the [`Core`](crate::sim::core::Core); actors only ever see
//! copies handed out with tick and state-update messages.

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geom::Vec2;

/// Unique entity identifier. Monotonically assigned by the Core, never reused.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct EntityId(pub u64);

/// Reserved peer id representing static map geometry rather than an entity.
pub const WALL_ID: EntityId = EntityId(0);

/// First id handed out by the Core's allocator.
pub const FIRST_ENTITY_ID: u64 = 100;

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What an entity is, which decides how the Core moves and snapshots it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Generic mobile prop or enemy, raycast-rendered.
    Sprite,
    /// Freely aimed 3D mover; no wall sliding, despawns on impact.
    Projectile,
    /// Short-lived animated visual.
    Effect,
    /// HUD overlay, never collides.
    Crosshair,
    /// HUD overlay driving the fire cooldown.
    Weapon,
    /// The single camera-carrying entity.
    Player,
}

impl EntityKind {
    /// All kinds, in the Core's fixed partition/iteration order.
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Sprite,
        EntityKind::Projectile,
        EntityKind::Effect,
        EntityKind::Crosshair,
        EntityKind::Weapon,
        EntityKind::Player,
    ];

    /// Partition index into the Core's per-kind tables.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            EntityKind::Sprite => 0,
            EntityKind::Projectile => 1,
            EntityKind::Effect => 2,
            EntityKind::Crosshair => 3,
            EntityKind::Weapon => 4,
            EntityKind::Player => 5,
        }
    }
}

/// How the vertical collision band hangs off `position.z`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Anchor {
    /// Band is `[z, z + h]`.
    Bottom,
    /// Band is `[z - h/2, z + h/2]`.
    Center,
    /// Band is `[z - h, z]`.
    Top,
}

/// A point in world space. The grid is 1 unit per tile; z is height.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Horizontal components only.
    #[inline]
    pub fn xy(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Minimap color, RGBA.
pub type MapColor = [u8; 4];

/// The complete physical/identity state of one live object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Core-assigned identity (0 until registration completes).
    pub id: EntityId,
    /// Kind tag, fixed for the entity's lifetime.
    pub kind: EntityKind,
    /// Debug name.
    pub name: String,
    /// Authoritative position.
    pub position: Position,
    /// Heading in radians, held normalized to `(-PI, PI]`.
    pub angle: f64,
    /// Vertical look, held clamped to `[-PI/8, PI/4]`.
    pub pitch: f64,
    /// Scalar speed, distance per tick.
    pub velocity: f64,
    /// Fractional velocity decay applied every movement update.
    pub resistance: f64,
    /// Strafe/turn offset remembered from the last movement intent, used to
    /// keep sliding in the same direction after input ceases.
    pub last_move_rotate: f64,
    /// Body radius for dynamic collision; `0` opts out entirely.
    pub collision_radius: f64,
    /// Vertical extent of the collision band.
    pub collision_height: f64,
    /// How the band hangs off `position.z`.
    pub anchor: Anchor,
    /// Spawning entity, exempt from mutual collision. `WALL_ID` means none.
    pub parent_id: EntityId,
    /// Render scale hint for the (external) renderer.
    pub scale: f64,
    /// Minimap dot color; not consulted by simulation logic.
    pub map_color: MapColor,
}

impl Entity {
    /// A blank entity of the given kind at the origin. Callers fill in the
    /// fields that matter to them; the Core assigns the id at registration.
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            id: EntityId(0),
            kind,
            name: name.into(),
            position: Position::default(),
            angle: 0.0,
            pitch: 0.0,
            velocity: 0.0,
            resistance: 0.0,
            last_move_rotate: 0.0,
            collision_radius: 0.0,
            collision_height: 0.0,
            anchor: Anchor::Center,
            parent_id: WALL_ID,
            scale: 1.0,
            map_color: [0, 0, 0, 0],
        }
    }

    /// Whether this entity participates in dynamic-entity collision.
    #[inline]
    pub fn is_collidable(&self) -> bool {
        self.collision_radius > 0.0
    }

    /// The vertical band `[min, max]` occupied at height `z`.
    pub fn height_band(&self, z: f64) -> (f64, f64) {
        let h = self.collision_height;
        match self.anchor {
            Anchor::Bottom => (z, z + h),
            Anchor::Center => (z - h / 2.0, z + h / 2.0),
            Anchor::Top => (z - h, z),
        }
    }
}

/// Hard limits on the player pitch imposed by the (external) raycaster.
pub const PITCH_MIN: f64 = -PI / 8.0;
pub const PITCH_MAX: f64 = PI / 4.0;

/// Velocity below which an entity is treated as standing still.
pub const MINIMUM_VELOCITY: f64 = 1e-3;

/// Velocity ceiling, distance per tick.
pub const MAXIMUM_VELOCITY: f64 = 1.0;

/// A single resolved collision, reported back to the moving entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Where the movement segment was interrupted.
    pub position: Position,
    /// The blocking peer, or [`WALL_ID`] for static geometry.
    pub peer: EntityId,
    /// Distance from the mover's pre-move position to the contact point.
    pub distance: f64,
}

impl Contact {
    /// Whether the blocker was static geometry.
    #[inline]
    pub fn is_wall(&self) -> bool {
        self.peer == WALL_ID
    }
}

/// Behavior-visible per-tick state, computed by the Core and delivered with
/// tick and state-update messages. Actors never write this directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ActorState {
    /// The last movement request ended in a collision (or ground hit).
    pub has_collision: bool,
    /// Damage credited by projectile impacts since the previous tick.
    pub hit_harm: u32,
    /// Completed animation loops since registration.
    pub animation_loop_count: u32,
    /// The animation wrapped to its first frame on this tick.
    pub is_animation_first_frame: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_band_anchors() {
        let mut e = Entity::new(EntityKind::Sprite, "band");
        e.collision_height = 1.0;

        e.anchor = Anchor::Bottom;
        assert_eq!(e.height_band(2.0), (2.0, 3.0));

        e.anchor = Anchor::Center;
        assert_eq!(e.height_band(2.0), (1.5, 2.5));

        e.anchor = Anchor::Top;
        assert_eq!(e.height_band(2.0), (1.0, 2.0));
    }

    #[test]
    fn test_zero_radius_not_collidable() {
        let e = Entity::new(EntityKind::Sprite, "ghost");
        assert!(!e.is_collidable());
    }

    #[test]
    fn test_kind_indices_cover_partition() {
        for (i, kind) in EntityKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }
}
