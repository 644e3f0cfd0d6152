//! World Simulation
//!
//! Authoritative world state and the machinery that evolves it: the entity
//! record, the static wall grid, the collision resolution engine, the
//! Core reactor that owns everything, and the message vocabulary the
//! actors speak to it.

pub mod collision;
pub mod config;
pub mod core;
pub mod entity;
pub mod events;
pub mod map;

pub use self::core::{Core, CoreHandle};
pub use collision::{resolve_move, CollisionRules, MoveResolution, CLIP_DISTANCE, SLIDE_MARGIN};
pub use config::SimConfig;
pub use entity::{
    ActorState, Anchor, Contact, Entity, EntityId, EntityKind, Position, WALL_ID,
};
pub use events::{
    ActorEvent, CameraPose, CoreEvent, DrawInfo, FrameSnapshot, InputFrame, Movement,
    RegisterData, SpriteInstance,
};
pub use map::GridMap;
