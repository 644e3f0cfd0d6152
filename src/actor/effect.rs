//! One-Shot Visual Effect
//!
//! An animated sprite that plays its sheet a fixed number of times and
//! retires. Expiry is driven by the Core's animation loop counter.

use crate::actor::{Behavior, Context};
use crate::sim::entity::{ActorState, Anchor, Entity, EntityKind, Position};
use crate::sim::events::{Animation, DrawInfo, Movement, RegisterData};

/// Reusable template for an effect kind (impact flash, explosion).
#[derive(Clone, Debug)]
pub struct EffectSpec {
    pub texture: String,
    pub animation: Animation,
    /// Sheet repetitions before the effect retires.
    pub loops: u32,
    pub scale: f64,
    pub illumination: f64,
}

impl EffectSpec {
    /// Instantiate the template at a world position.
    pub fn at(&self, position: Position) -> Effect {
        Effect {
            spec: self.clone(),
            position,
        }
    }
}

pub struct Effect {
    spec: EffectSpec,
    position: Position,
}

impl Behavior for Effect {
    fn register_data(&self) -> RegisterData {
        let mut entity = Entity::new(EntityKind::Effect, "effect");
        entity.position = self.position;
        entity.scale = self.spec.scale;
        entity.anchor = Anchor::Center;
        RegisterData {
            entity,
            draw: DrawInfo {
                texture: Some(self.spec.texture.clone()),
                animation: Some(self.spec.animation),
                illumination: self.spec.illumination,
                ..DrawInfo::default()
            },
            harm: 0,
        }
    }

    fn on_tick(
        &mut self,
        ctx: &mut Context,
        _entity: &Entity,
        state: &ActorState,
        _player: Option<&Entity>,
    ) {
        if state.animation_loop_count >= self.spec.loops {
            ctx.unregister();
            return;
        }
        // Effects hold still; the intent keeps the state reply flowing so
        // renderers see a live entity.
        ctx.request_move(Movement::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::Regoter;
    use crate::sim::collision::CollisionRules;
    use crate::sim::core::Core;
    use crate::sim::map::GridMap;
    use crate::sim::SimConfig;

    #[tokio::test]
    async fn test_effect_expires_after_loop_budget() {
        let (core, _task) = Core::spawn(
            GridMap::demo_level(),
            CollisionRules::default(),
            SimConfig::default(),
        );
        let spec = EffectSpec {
            texture: "impact".into(),
            animation: Animation {
                frame_count: 3,
                ticks_per_frame: 1,
            },
            loops: 2,
            scale: 0.5,
            illumination: 300.0,
        };
        let _effect = Regoter::spawn(core.clone(), spec.at(Position::new(5.0, 5.0, 0.5)));

        let mut appeared = false;
        let mut expired = false;
        for _ in 0..60 {
            core.tick().await.unwrap();
            let snapshot = core.draw().await.unwrap();
            if !snapshot.sprites.is_empty() {
                appeared = true;
            } else if appeared {
                expired = true;
                break;
            }
        }
        assert!(appeared, "effect never appeared");
        assert!(expired, "effect never expired");
    }
}
