//! Patrolling Enemy
//!
//! Walks its facing direction at constant effort, turns when it runs into
//! something, and dies from accumulated projectile damage.

use std::f64::consts::FRAC_PI_2;

use crate::actor::{Behavior, Context};
use crate::sim::entity::{ActorState, Anchor, Entity, EntityKind, Position};
use crate::sim::events::{DrawInfo, Movement, RegisterData};

const ENEMY_ACCEL: f64 = 0.03;
const ENEMY_RESISTANCE: f64 = 0.4;

pub struct Enemy {
    name: String,
    texture: String,
    spawn: Position,
    spawn_angle: f64,
    health: i32,
}

impl Enemy {
    pub fn new(
        name: impl Into<String>,
        texture: impl Into<String>,
        spawn: Position,
        spawn_angle: f64,
        health: i32,
    ) -> Self {
        Self {
            name: name.into(),
            texture: texture.into(),
            spawn,
            spawn_angle,
            health,
        }
    }
}

impl Behavior for Enemy {
    fn register_data(&self) -> RegisterData {
        let mut entity = Entity::new(EntityKind::Sprite, self.name.clone());
        entity.position = self.spawn;
        entity.angle = self.spawn_angle;
        entity.collision_radius = 0.35;
        entity.collision_height = 0.6;
        entity.anchor = Anchor::Bottom;
        entity.position.z = 0.0;
        entity.resistance = ENEMY_RESISTANCE;
        entity.map_color = [220, 40, 40, 255];
        RegisterData {
            entity,
            draw: DrawInfo {
                texture: Some(self.texture.clone()),
                sprite_index: Some(0),
                ..DrawInfo::default()
            },
            harm: 0,
        }
    }

    fn on_tick(
        &mut self,
        ctx: &mut Context,
        entity: &Entity,
        state: &ActorState,
        _player: Option<&Entity>,
    ) {
        if state.hit_harm > 0 {
            self.health -= state.hit_harm as i32;
            ctx.debug(format!(
                "{} took {} damage, {} left",
                entity.name, state.hit_harm, self.health
            ));
            if self.health <= 0 {
                ctx.unregister();
                return;
            }
        }

        // Blocked last tick: turn a quarter and try again.
        let vision_rotate = if state.has_collision { FRAC_PI_2 } else { 0.0 };
        ctx.request_move(Movement {
            vision_rotate,
            acceleration: ENEMY_ACCEL,
            ..Movement::default()
        });
    }
}
