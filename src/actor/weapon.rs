//! Held Weapon
//!
//! HUD overlay that owns the fire cooldown. Watches the shared input feed
//! for the fire button and spawns projectile actors from the player's
//! pose, at most once per cooldown window.

use tokio::sync::watch;

use crate::actor::projectile::ProjectileSpec;
use crate::actor::{Behavior, Context};
use crate::sim::entity::{ActorState, Entity, EntityKind, Position};
use crate::sim::events::{DrawInfo, InputFrame, RegisterData};
use crate::TICK_RATE;

pub struct Weapon {
    input: watch::Receiver<InputFrame>,
    texture: String,
    projectile: ProjectileSpec,
    /// Ticks between shots, derived from rounds per second.
    cooldown_ticks: u32,
    cooldown_left: u32,
}

impl Weapon {
    /// `rate_of_fire` is rounds per second.
    pub fn new(
        input: watch::Receiver<InputFrame>,
        texture: impl Into<String>,
        projectile: ProjectileSpec,
        rate_of_fire: f64,
    ) -> Self {
        let cooldown_ticks = ((TICK_RATE as f64 / rate_of_fire).ceil() as u32).max(1);
        Self {
            input,
            texture: texture.into(),
            projectile,
            cooldown_ticks,
            cooldown_left: 0,
        }
    }
}

impl Behavior for Weapon {
    fn register_data(&self) -> RegisterData {
        let entity = Entity::new(EntityKind::Weapon, "weapon");
        RegisterData {
            entity,
            draw: DrawInfo {
                texture: Some(self.texture.clone()),
                sprite_index: Some(0),
                hud: true,
                ..DrawInfo::default()
            },
            harm: 0,
        }
    }

    fn on_tick(
        &mut self,
        ctx: &mut Context,
        _entity: &Entity,
        _state: &ActorState,
        player: Option<&Entity>,
    ) {
        if self.cooldown_left > 0 {
            self.cooldown_left -= 1;
            return;
        }
        if !self.input.borrow().fire {
            return;
        }
        // No player, no muzzle to fire from.
        let Some(player) = player else {
            return;
        };

        let muzzle = Position::new(player.position.x, player.position.y, 0.5);
        ctx.spawn(
            self.projectile
                .fired_by(player.id, muzzle, player.angle, player.pitch),
        );
        self.cooldown_left = self.cooldown_ticks;
    }
}
