//! Core <-> Actor Message Vocabulary
//!
//! The entire wire contract between the Core reactor and the actor tasks.
//! Actors send [`CoreEvent`]s into the Core's single inbox; the Core sends
//! [`ActorEvent`]s into each actor's private inbox. No other coupling
//! exists between tasks.

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, oneshot};

use crate::sim::config::SimConfig;
use crate::sim::entity::{ActorState, Entity, EntityId, EntityKind, MapColor, Position};

/// A movement intent for one tick, relative to the entity's current pose.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Movement {
    /// Change to the facing direction (radians).
    pub vision_rotate: f64,
    /// Offset of the travel direction from the facing direction, e.g.
    /// `PI/2` for a leftward strafe.
    pub move_rotate: f64,
    /// Change to the vertical look (radians).
    pub pitch_rotate: f64,
    /// Velocity delta for this tick, before resistance.
    pub acceleration: f64,
}

/// Static render metadata supplied at registration. The simulation never
/// interprets it beyond the animation bookkeeping; it flows through to the
/// draw snapshot for the external renderer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DrawInfo {
    /// Texture sheet name. Required for everything except the player, which
    /// is never rendered in first person.
    pub texture: Option<String>,
    /// Fixed frame within the sheet, for static sprites. Mutually exclusive
    /// with `animation`.
    pub sprite_index: Option<u32>,
    /// Animated sprites: frame count and ticks per frame.
    pub animation: Option<Animation>,
    /// Hint for the renderer's lighting pass.
    pub illumination: f64,
    /// HUD overlays are drawn screen-space, not raycast.
    pub hud: bool,
}

/// Frame-sequence parameters for animated sprites.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animation {
    /// Number of frames in the sheet.
    pub frame_count: u32,
    /// Ticks each frame is held for.
    pub ticks_per_frame: u32,
}

/// Everything an actor supplies when it registers with the Core.
#[derive(Clone, Debug)]
pub struct RegisterData {
    /// Initial entity state; the Core assigns the id.
    pub entity: Entity,
    pub draw: DrawInfo,
    /// Damage credited to whatever this entity strikes. Zero for anything
    /// that is not a projectile.
    pub harm: u32,
}

/// Messages into the Core's single inbox.
#[derive(Debug)]
pub enum CoreEvent {
    /// The world heartbeat. The Core fans this out to every actor.
    Tick,
    /// Snapshot request from the render-driving caller. The Core replies on
    /// the channel after taking the snapshot and flushing deferred
    /// removals; the caller blocks on the reply before its next frame.
    Draw {
        reply: oneshot::Sender<FrameSnapshot>,
    },
    /// A new actor announcing itself, with the inbox the Core should use
    /// to reach it. Fire-and-forget; the assigned id arrives with the next
    /// tick broadcast.
    Register {
        data: Box<RegisterData>,
        inbox: mpsc::Sender<ActorEvent>,
    },
    /// Cooperative teardown. Removal is deferred to the post-draw safe
    /// point.
    Unregister { id: EntityId },
    /// A movement intent from one actor. The Core replies to that actor
    /// only, with its refreshed state.
    Movement { id: EntityId, movement: Movement },
    /// Settings changed; the Core stores and rebroadcasts.
    ConfigChanged { config: SimConfig },
    /// Free-form diagnostic line, drained into the next draw snapshot.
    DebugPrint { from: EntityId, message: String },
}

/// Messages into an actor's private inbox.
#[derive(Clone, Debug)]
pub enum ActorEvent {
    /// Tick broadcast: the actor's own refreshed entity and per-tick state,
    /// plus the player snapshot for AI targeting.
    Tick {
        entity: Entity,
        state: ActorState,
        player: Option<Entity>,
    },
    /// Reply to this actor's movement request.
    State { entity: Entity, state: ActorState },
    /// Settings rebroadcast.
    ConfigChanged { config: SimConfig },
}

/// Flat input sample produced by the (external) input layer once per frame.
/// This crate only consumes it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct InputFrame {
    pub forward: bool,
    pub backward: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub sprint: bool,
    pub fire: bool,
    /// Mouse look deltas, radians.
    pub look_dx: f64,
    pub look_dy: f64,
}

/// The player's view pose, maintained by the Core for the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: Position,
    pub angle: f64,
    pub pitch: f64,
}

/// One renderable entity in a frame snapshot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteInstance {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Position,
    pub angle: f64,
    pub scale: f64,
    pub texture: Option<String>,
    /// Current frame: the static index, or the animation's live frame.
    pub frame: u32,
    pub illumination: f64,
}

/// A minimap dot for one live entity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MinimapDot {
    pub x: f64,
    pub y: f64,
    pub color: MapColor,
}

/// Pure-data frame handed to the external renderer. No rasterization in
/// this crate.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub tick: u64,
    pub camera: CameraPose,
    /// Raycast-rendered world sprites, in stable id order.
    pub sprites: Vec<SpriteInstance>,
    /// Screen-space overlays (weapon, crosshair).
    pub hud: Vec<SpriteInstance>,
    pub minimap: Vec<MinimapDot>,
    /// Debug lines queued since the previous snapshot.
    pub debug_lines: Vec<String>,
}
