//! Entity Actors
//!
//! One task per live entity. The generic [`Regoter`] wrapper owns the
//! plumbing (registration, inbox loop, outbound sends); a [`Behavior`]
//! value owns the logic. The wrapper is behavior-agnostic: the Core never
//! knows which behavior sits behind an inbox.

pub mod crosshair;
pub mod effect;
pub mod enemy;
pub mod player;
pub mod projectile;
pub mod weapon;

pub use crosshair::Crosshair;
pub use effect::{Effect, EffectSpec};
pub use enemy::Enemy;
pub use player::Player;
pub use projectile::{Projectile, ProjectileSpec};
pub use weapon::Weapon;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::sim::core::{CoreHandle, ACTOR_INBOX_CAPACITY};
use crate::sim::entity::{ActorState, Entity, EntityId};
use crate::sim::events::{ActorEvent, Movement, RegisterData};
use crate::sim::SimConfig;

/// Per-entity control logic. Handlers are synchronous; they queue intents
/// on the [`Context`] and the wrapper performs the sends.
pub trait Behavior: Send + 'static {
    /// Initial entity and draw metadata, consumed once at spawn.
    fn register_data(&self) -> RegisterData;

    /// Tick broadcast: the actor's refreshed entity, its per-tick state,
    /// and the player snapshot for targeting.
    fn on_tick(
        &mut self,
        ctx: &mut Context,
        entity: &Entity,
        state: &ActorState,
        player: Option<&Entity>,
    );

    /// Reply to this actor's own movement request.
    fn on_update(&mut self, ctx: &mut Context, entity: &Entity, state: &ActorState) {
        let _ = (ctx, entity, state);
    }

    /// Settings rebroadcast.
    fn on_config(&mut self, config: &SimConfig) {
        let _ = config;
    }
}

/// Outbound intents queued by a behavior during one handler call.
pub struct Context {
    core: CoreHandle,
    movement: Option<Movement>,
    unregister: bool,
    debug_lines: Vec<String>,
}

impl Context {
    fn new(core: CoreHandle) -> Self {
        Self {
            core,
            movement: None,
            unregister: false,
            debug_lines: Vec::new(),
        }
    }

    /// Queue a movement intent for this tick. Last call wins.
    pub fn request_move(&mut self, movement: Movement) {
        self.movement = Some(movement);
    }

    /// Queue cooperative teardown. The wrapper keeps draining its inbox
    /// until the Core drops the channel at the removal safe point.
    pub fn unregister(&mut self) {
        self.unregister = true;
    }

    /// Queue a diagnostic line for the next frame snapshot.
    pub fn debug(&mut self, message: impl Into<String>) {
        self.debug_lines.push(message.into());
    }

    /// Spawn a sibling actor (impact effects, fired projectiles).
    pub fn spawn<B: Behavior>(&self, behavior: B) -> JoinHandle<()> {
        Regoter::spawn(self.core.clone(), behavior)
    }
}

/// The generic actor wrapper: registers, then loops on its private inbox.
pub struct Regoter;

impl Regoter {
    pub fn spawn<B: Behavior>(core: CoreHandle, behavior: B) -> JoinHandle<()> {
        tokio::spawn(Self::run(core, behavior))
    }

    async fn run<B: Behavior>(core: CoreHandle, mut behavior: B) {
        let (tx, mut rx) = mpsc::channel(ACTOR_INBOX_CAPACITY);
        let data = behavior.register_data();
        let name = data.entity.name.clone();
        if core.register(data, tx).await.is_err() {
            debug!(name = %name, "core gone before registration");
            return;
        }

        let mut id = EntityId(0);
        let mut retiring = false;
        while let Some(event) = rx.recv().await {
            if retiring {
                continue;
            }
            let mut ctx = Context::new(core.clone());
            match event {
                ActorEvent::Tick {
                    entity,
                    state,
                    player,
                } => {
                    id = entity.id;
                    behavior.on_tick(&mut ctx, &entity, &state, player.as_ref());
                }
                ActorEvent::State { entity, state } => {
                    id = entity.id;
                    behavior.on_update(&mut ctx, &entity, &state);
                }
                ActorEvent::ConfigChanged { config } => behavior.on_config(&config),
            }

            for line in ctx.debug_lines.drain(..) {
                if core.debug_print(id, line).await.is_err() {
                    return;
                }
            }
            if let Some(movement) = ctx.movement.take() {
                if core.movement(id, movement).await.is_err() {
                    return;
                }
            }
            if ctx.unregister {
                debug!(%id, name = %name, "actor retiring");
                if core.unregister(id).await.is_err() {
                    return;
                }
                retiring = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::CollisionRules;
    use crate::sim::core::Core;
    use crate::sim::entity::{EntityKind, Position};
    use crate::sim::events::DrawInfo;
    use crate::sim::map::GridMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    /// Walks east a fixed number of ticks, then retires. Mutates its local
    /// entity copy to prove copies never leak between actors.
    struct Walker {
        name: &'static str,
        ticks_left: u32,
        observed_x: Arc<AtomicU32>,
    }

    impl Behavior for Walker {
        fn register_data(&self) -> RegisterData {
            let mut entity = Entity::new(EntityKind::Sprite, self.name);
            entity.position = Position::new(3.0, 3.0, 0.5);
            entity.collision_radius = 0.0;
            entity.collision_height = 0.5;
            RegisterData {
                entity,
                draw: DrawInfo {
                    texture: Some("walker".into()),
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
            _state: &ActorState,
            _player: Option<&Entity>,
        ) {
            // Local mutation must never be visible to anyone else.
            let mut local = entity.clone();
            local.position.x = 9999.0;
            assert_ne!(local.position.x, entity.position.x);

            self.observed_x
                .store(entity.position.x.round() as u32, Ordering::SeqCst);
            if self.ticks_left == 0 {
                ctx.unregister();
                return;
            }
            self.ticks_left -= 1;
            ctx.request_move(Movement {
                acceleration: 0.2,
                ..Movement::default()
            });
        }
    }

    #[tokio::test]
    async fn test_actor_isolation() {
        let (core, _task) = Core::spawn(
            GridMap::demo_level(),
            CollisionRules::default(),
            SimConfig::default(),
        );
        let a_x = Arc::new(AtomicU32::new(0));
        let b_x = Arc::new(AtomicU32::new(0));
        let _a = Regoter::spawn(
            core.clone(),
            Walker {
                name: "a",
                ticks_left: 100,
                observed_x: a_x.clone(),
            },
        );
        let _b = Regoter::spawn(
            core.clone(),
            Walker {
                name: "b",
                ticks_left: 100,
                observed_x: b_x.clone(),
            },
        );

        for _ in 0..3 {
            core.tick().await.unwrap();
            core.draw().await.unwrap();
        }
        // Neither actor ever sees the other's poisoned local copy.
        assert!(a_x.load(Ordering::SeqCst) < 100);
        assert!(b_x.load(Ordering::SeqCst) < 100);
    }

    #[tokio::test]
    async fn test_retire_removes_from_snapshots() {
        let (core, _task) = Core::spawn(
            GridMap::demo_level(),
            CollisionRules::default(),
            SimConfig::default(),
        );
        let x = Arc::new(AtomicU32::new(0));
        let _a = Regoter::spawn(
            core.clone(),
            Walker {
                name: "brief",
                ticks_left: 0,
                observed_x: x,
            },
        );

        // The first tick that reaches the walker makes it retire; the next
        // draw flushes it. Registration and retirement race the loop, so
        // poll a few frames.
        let mut appeared = false;
        let mut cleared = false;
        for _ in 0..50 {
            core.tick().await.unwrap();
            let snapshot = core.draw().await.unwrap();
            if !snapshot.sprites.is_empty() {
                appeared = true;
            } else if appeared {
                cleared = true;
                break;
            }
        }
        assert!(appeared, "walker never registered");
        assert!(cleared, "walker never flushed out");
    }
}
