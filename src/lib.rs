//! # Gridsim
//!
//! Actor-based world simulation core for a tile-based first-person game.
//! A grid map of walls, one player, and mobile actors (enemies,
//! projectiles, effects) evolve every tick under collision constraints;
//! an external raycasting renderer consumes the resulting frame
//! snapshots.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         GRIDSIM                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  geom/            - Leaf geometry (no state)                 │
//! │  ├── vec2.rs      - 2D float vector                          │
//! │  └── line.rs      - Segments, circles, intersections         │
//! │                                                              │
//! │  sim/             - Authoritative world state                │
//! │  ├── entity.rs    - Entity record, kinds, height bands       │
//! │  ├── map.rs       - Wall-code grid + derived segments        │
//! │  ├── collision.rs - Movement resolution + wall slide         │
//! │  ├── events.rs    - Core <-> actor message vocabulary        │
//! │  ├── core.rs      - Orchestration reactor (owns entities)    │
//! │  └── config.rs    - Flat settings record                     │
//! │                                                              │
//! │  actor/           - One task per entity                      │
//! │  ├── mod.rs       - Behavior trait + generic wrapper         │
//! │  └── player / enemy / projectile / effect / weapon /         │
//! │      crosshair    - The behavior kinds                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Concurrency model
//!
//! The Core runs on one task and exclusively owns every entity record.
//! Each actor runs on its own task and talks to the Core over channels:
//! a shared, tightly bounded inbox into the Core and a buffered private
//! inbox per actor. Actors only ever see copies of entity state; all
//! mutation happens inside the Core, serialized through the collision
//! engine.

#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod actor;
pub mod geom;
pub mod sim;

pub use actor::{Behavior, Context, Regoter};
pub use sim::core::{Core, CoreHandle};
pub use sim::{Entity, EntityId, EntityKind, FrameSnapshot, GridMap, Movement, SimConfig};

/// Simulation ticks per second.
pub const TICK_RATE: u32 = 60;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
