//! Projectile Lifecycle
//!
//! Flies a straight 3D trajectory at constant velocity until it hits a
//! wall, an entity or the ground, then spawns its impact effect and
//! retires. Passes through its shooter via the parent exemption.

use crate::actor::effect::EffectSpec;
use crate::actor::{Behavior, Context};
use crate::sim::entity::{ActorState, Anchor, Entity, EntityId, EntityKind, Position};
use crate::sim::events::{DrawInfo, Movement, RegisterData};

/// Reusable template for a projectile kind (bolt, fireball).
#[derive(Clone, Debug)]
pub struct ProjectileSpec {
    pub texture: String,
    /// Distance per tick, constant over the flight.
    pub velocity: f64,
    /// Damage credited on an entity hit.
    pub harm: u32,
    pub collision_radius: f64,
    pub collision_height: f64,
    pub scale: f64,
    pub impact: EffectSpec,
}

impl ProjectileSpec {
    /// Instantiate the template from a shooter's pose.
    pub fn fired_by(&self, shooter: EntityId, position: Position, angle: f64, pitch: f64) -> Projectile {
        Projectile {
            spec: self.clone(),
            shooter,
            position,
            angle,
            pitch,
        }
    }
}

pub struct Projectile {
    spec: ProjectileSpec,
    shooter: EntityId,
    position: Position,
    angle: f64,
    pitch: f64,
}

impl Behavior for Projectile {
    fn register_data(&self) -> RegisterData {
        let mut entity = Entity::new(EntityKind::Projectile, "projectile");
        entity.position = self.position;
        entity.angle = self.angle;
        entity.pitch = self.pitch;
        entity.velocity = self.spec.velocity;
        entity.collision_radius = self.spec.collision_radius;
        entity.collision_height = self.spec.collision_height;
        entity.anchor = Anchor::Center;
        entity.parent_id = self.shooter;
        entity.scale = self.spec.scale;
        entity.map_color = [255, 220, 0, 255];
        RegisterData {
            entity,
            draw: DrawInfo {
                texture: Some(self.spec.texture.clone()),
                sprite_index: Some(0),
                ..DrawInfo::default()
            },
            harm: self.spec.harm,
        }
    }

    fn on_tick(
        &mut self,
        ctx: &mut Context,
        _entity: &Entity,
        state: &ActorState,
        _player: Option<&Entity>,
    ) {
        if state.has_collision {
            return; // impact handled in the movement reply
        }
        // Zero acceleration: registration velocity carries the flight.
        ctx.request_move(Movement::default());
    }

    fn on_update(&mut self, ctx: &mut Context, entity: &Entity, state: &ActorState) {
        if !state.has_collision {
            return;
        }
        ctx.spawn(self.spec.impact.at(entity.position));
        ctx.unregister();
    }
}
