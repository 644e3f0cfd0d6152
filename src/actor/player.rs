//! Player Controller
//!
//! Samples the latest input frame each tick and turns it into a movement
//! intent. Input arrives on a watch channel fed by the (external) input
//! layer; only the most recent frame matters.

use tokio::sync::watch;

use crate::actor::{Behavior, Context};
use crate::sim::entity::{ActorState, Anchor, Entity, EntityKind, Position};
use crate::sim::events::{DrawInfo, InputFrame, Movement, RegisterData};

/// Keyboard turn rate, radians per tick.
const TURN_RATE: f64 = 0.05;
/// Forward/strafe acceleration per tick.
const MOVE_ACCEL: f64 = 0.06;
/// Sprint acceleration multiplier.
const SPRINT_FACTOR: f64 = 1.5;
/// Velocity decay per tick while coasting.
const PLAYER_RESISTANCE: f64 = 0.3;

pub struct Player {
    input: watch::Receiver<InputFrame>,
    spawn: Position,
    spawn_angle: f64,
}

impl Player {
    pub fn new(input: watch::Receiver<InputFrame>, spawn: Position, spawn_angle: f64) -> Self {
        Self {
            input,
            spawn,
            spawn_angle,
        }
    }
}

impl Behavior for Player {
    fn register_data(&self) -> RegisterData {
        let mut entity = Entity::new(EntityKind::Player, "player");
        entity.position = self.spawn;
        entity.angle = self.spawn_angle;
        entity.collision_radius = 0.25;
        entity.collision_height = 0.5;
        entity.anchor = Anchor::Center;
        entity.resistance = PLAYER_RESISTANCE;
        entity.map_color = [0, 160, 255, 255];
        RegisterData {
            entity,
            draw: DrawInfo::default(),
            harm: 0,
        }
    }

    fn on_tick(
        &mut self,
        ctx: &mut Context,
        _entity: &Entity,
        _state: &ActorState,
        _player: Option<&Entity>,
    ) {
        let frame = *self.input.borrow();

        let mut vision_rotate = frame.look_dx;
        if frame.turn_left {
            vision_rotate -= TURN_RATE;
        }
        if frame.turn_right {
            vision_rotate += TURN_RATE;
        }

        // Movement keys combine into one travel direction relative to the
        // facing: forward is 0, left strafe is -PI/2.
        let mut ahead = 0.0;
        let mut side: f64 = 0.0;
        if frame.forward {
            ahead += 1.0;
        }
        if frame.backward {
            ahead -= 1.0;
        }
        if frame.strafe_left {
            side -= 1.0;
        }
        if frame.strafe_right {
            side += 1.0;
        }

        let mut acceleration = 0.0;
        let mut move_rotate = 0.0;
        if ahead != 0.0 || side != 0.0 {
            move_rotate = side.atan2(ahead);
            acceleration = MOVE_ACCEL;
            if frame.sprint {
                acceleration *= SPRINT_FACTOR;
            }
        }

        ctx.request_move(Movement {
            vision_rotate,
            move_rotate,
            pitch_rotate: frame.look_dy,
            acceleration,
        });
    }
}
