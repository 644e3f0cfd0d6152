//! Core Orchestration Reactor
//!
//! The single owner of all live entity state. Runs one task draining one
//! inbox: ticks fan out to every actor, movement intents are serialized
//! through the collision engine, registrations allocate ids, and draw
//! requests snapshot the world for the external renderer. Actors never
//! share memory with the Core; everything crosses as messages.

use std::collections::BTreeMap;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use crate::geom::{clamp, normalize_angle, trajectory_end, Line};
use crate::sim::collision::{resolve_move, CollisionRules, CLIP_DISTANCE};
use crate::sim::config::SimConfig;
use crate::sim::entity::{
    ActorState, Entity, EntityId, EntityKind, Position, FIRST_ENTITY_ID, MAXIMUM_VELOCITY,
    MINIMUM_VELOCITY, PITCH_MAX, PITCH_MIN,
};
use crate::sim::events::{
    ActorEvent, CameraPose, CoreEvent, DrawInfo, FrameSnapshot, MinimapDot, Movement,
    RegisterData, SpriteInstance,
};
use crate::sim::map::GridMap;

/// Core inbox capacity. Kept tight so a stalled Core bounds memory; actors
/// tolerate blocking sends.
const CORE_INBOX_CAPACITY: usize = 1;

/// Per-actor inbox slack, so the Core never blocks on a healthy actor.
pub const ACTOR_INBOX_CAPACITY: usize = 64;

/// Idle interval after which the reactor logs a diagnostic warning.
/// Logging only, no correctness effect.
const WATCHDOG_IDLE: Duration = Duration::from_secs(5);

/// Eye height of the first-person camera.
const CAMERA_HEIGHT: f64 = 0.5;

/// Errors surfaced by [`CoreHandle`] operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The Core task has exited and its inbox is gone.
    #[error("core inbox closed")]
    Closed,
    /// The Core dropped the draw reply without answering.
    #[error("draw reply dropped")]
    DrawReplyDropped,
}

/// Cloneable sending side of the Core's inbox.
#[derive(Clone, Debug)]
pub struct CoreHandle {
    tx: mpsc::Sender<CoreEvent>,
}

impl CoreHandle {
    /// Advance the world by one tick.
    pub async fn tick(&self) -> Result<(), CoreError> {
        self.send(CoreEvent::Tick).await
    }

    /// Request a frame snapshot. Blocks until the Core has snapshotted the
    /// world and flushed deferred removals.
    pub async fn draw(&self) -> Result<FrameSnapshot, CoreError> {
        let (reply, rx) = oneshot::channel();
        self.send(CoreEvent::Draw { reply }).await?;
        rx.await.map_err(|_| CoreError::DrawReplyDropped)
    }

    /// Announce a new actor. Fire-and-forget; the assigned id arrives with
    /// the next tick broadcast.
    pub async fn register(
        &self,
        data: RegisterData,
        inbox: mpsc::Sender<ActorEvent>,
    ) -> Result<(), CoreError> {
        self.send(CoreEvent::Register {
            data: Box::new(data),
            inbox,
        })
        .await
    }

    /// Request teardown of one entity. Removal happens at the next
    /// post-draw safe point.
    pub async fn unregister(&self, id: EntityId) -> Result<(), CoreError> {
        self.send(CoreEvent::Unregister { id }).await
    }

    /// Submit a movement intent for one entity.
    pub async fn movement(&self, id: EntityId, movement: Movement) -> Result<(), CoreError> {
        self.send(CoreEvent::Movement { id, movement }).await
    }

    /// Replace the settings record; the Core rebroadcasts on change.
    pub async fn set_config(&self, config: SimConfig) -> Result<(), CoreError> {
        self.send(CoreEvent::ConfigChanged { config }).await
    }

    /// Queue a diagnostic line for the next snapshot.
    pub async fn debug_print(&self, from: EntityId, message: String) -> Result<(), CoreError> {
        self.send(CoreEvent::DebugPrint { from, message }).await
    }

    async fn send(&self, event: CoreEvent) -> Result<(), CoreError> {
        self.tx.send(event).await.map_err(|_| CoreError::Closed)
    }
}

/// One registered actor as the Core sees it.
struct ActorSlot {
    entity: Entity,
    draw: DrawInfo,
    /// Damage this entity credits to whatever it strikes.
    harm: u32,
    /// The actor's private inbox.
    inbox: mpsc::Sender<ActorEvent>,
    /// Per-tick state delivered with broadcasts and movement replies.
    state: ActorState,
    /// Ticks accumulated toward the next animation frame.
    anim_ticks: u32,
    /// Current animation frame.
    anim_frame: u32,
}

/// The orchestration reactor. Construct with [`Core::new`], then drive it
/// with [`Core::run`] on its own task (or use [`Core::spawn`]).
pub struct Core {
    inbox: mpsc::Receiver<CoreEvent>,
    map: GridMap,
    walls: Vec<Line>,
    rules: CollisionRules,
    config: SimConfig,
    /// Live entities, partitioned by kind, id-ordered within a partition.
    slots: [BTreeMap<EntityId, ActorSlot>; 6],
    /// Monotone id allocator. Ids are never reused.
    next_id: u64,
    tick: u64,
    camera: CameraPose,
    /// Unregistered ids awaiting the post-draw safe point.
    pending_removal: Vec<EntityId>,
    debug_lines: Vec<String>,
}

impl Core {
    pub fn new(map: GridMap, rules: CollisionRules, config: SimConfig) -> (Self, CoreHandle) {
        let (tx, inbox) = mpsc::channel(CORE_INBOX_CAPACITY);
        let walls = map.wall_segments(CLIP_DISTANCE);
        let core = Self {
            inbox,
            map,
            walls,
            rules,
            config,
            slots: Default::default(),
            next_id: FIRST_ENTITY_ID,
            tick: 0,
            camera: CameraPose::default(),
            pending_removal: Vec::new(),
            debug_lines: Vec::new(),
        };
        (core, CoreHandle { tx })
    }

    /// Construct and immediately run on a fresh task.
    pub fn spawn(map: GridMap, rules: CollisionRules, config: SimConfig) -> (CoreHandle, JoinHandle<()>) {
        let (core, handle) = Self::new(map, rules, config);
        (handle, tokio::spawn(core.run()))
    }

    /// Drain the inbox until every handle is dropped.
    pub async fn run(mut self) {
        loop {
            match tokio::time::timeout(WATCHDOG_IDLE, self.inbox.recv()).await {
                Ok(Some(event)) => self.handle(event).await,
                Ok(None) => {
                    debug!("all core handles dropped, reactor exiting");
                    return;
                }
                Err(_) => {
                    warn!(idle_secs = WATCHDOG_IDLE.as_secs(), "core inbox idle");
                }
            }
        }
    }

    async fn handle(&mut self, event: CoreEvent) {
        match event {
            CoreEvent::Tick => self.handle_tick().await,
            CoreEvent::Draw { reply } => self.handle_draw(reply),
            CoreEvent::Register { data, inbox } => self.handle_register(*data, inbox),
            CoreEvent::Unregister { id } => {
                trace!(%id, "unregister queued");
                self.pending_removal.push(id);
            }
            CoreEvent::Movement { id, movement } => self.handle_movement(id, movement).await,
            CoreEvent::ConfigChanged { config } => self.handle_config(config).await,
            CoreEvent::DebugPrint { from, message } => {
                self.debug_lines.push(format!("{from}: {message}"));
            }
        }
    }

    // === Tick ===

    async fn handle_tick(&mut self) {
        self.tick += 1;
        self.advance_animations();

        let player = self.slots[EntityKind::Player.index()]
            .values()
            .next()
            .map(|slot| slot.entity.clone());

        for partition in self.slots.iter_mut() {
            for slot in partition.values_mut() {
                let event = ActorEvent::Tick {
                    entity: slot.entity.clone(),
                    state: slot.state,
                    player: player.clone(),
                };
                if slot.inbox.send(event).await.is_err() {
                    warn!(id = %slot.entity.id, "actor inbox closed, tick dropped");
                }
                // Accumulated damage is delivered once, with the tick.
                slot.state.hit_harm = 0;
            }
        }
    }

    fn advance_animations(&mut self) {
        for partition in self.slots.iter_mut() {
            for slot in partition.values_mut() {
                let Some(anim) = slot.draw.animation else {
                    continue;
                };
                slot.state.is_animation_first_frame = false;
                slot.anim_ticks += 1;
                if slot.anim_ticks < anim.ticks_per_frame.max(1) {
                    continue;
                }
                slot.anim_ticks = 0;
                slot.anim_frame += 1;
                if slot.anim_frame >= anim.frame_count.max(1) {
                    slot.anim_frame = 0;
                    slot.state.animation_loop_count += 1;
                    slot.state.is_animation_first_frame = true;
                }
            }
        }
    }

    // === Registration ===

    fn handle_register(&mut self, data: RegisterData, inbox: mpsc::Sender<ActorEvent>) {
        validate_registration(&data);
        let mut entity = data.entity;
        entity.id = EntityId(self.next_id);
        self.next_id += 1;
        entity.angle = normalize_angle(entity.angle);
        entity.pitch = clamp(entity.pitch, PITCH_MIN, PITCH_MAX);

        debug!(id = %entity.id, kind = ?entity.kind, name = %entity.name, "registered");
        self.slots[entity.kind.index()].insert(
            entity.id,
            ActorSlot {
                entity,
                draw: data.draw,
                harm: data.harm,
                inbox,
                state: ActorState::default(),
                anim_ticks: 0,
                anim_frame: 0,
            },
        );
    }

    // === Movement ===

    async fn handle_movement(&mut self, id: EntityId, movement: Movement) {
        let Some(slot) = self.find_slot(id) else {
            // Expected race against unregistration; drop.
            warn!(%id, "movement request for unknown entity dropped");
            return;
        };
        let mut entity = slot.entity.clone();
        let harm = slot.harm;

        entity.angle = normalize_angle(entity.angle + movement.vision_rotate);
        entity.pitch = clamp(entity.pitch + movement.pitch_rotate, PITCH_MIN, PITCH_MAX);
        entity.velocity = (entity.velocity + movement.acceleration).max(0.0);
        entity.velocity *= 1.0 - entity.resistance;
        entity.velocity = entity.velocity.min(MAXIMUM_VELOCITY);
        // Coasting (no fresh acceleration) keeps sliding in the last
        // commanded travel direction.
        let move_rotate = if movement.acceleration != 0.0 {
            entity.last_move_rotate = movement.move_rotate;
            movement.move_rotate
        } else {
            entity.last_move_rotate
        };
        let move_angle = normalize_angle(entity.angle + move_rotate);

        let mut has_collision = false;
        let mut struck_peer: Option<EntityId> = None;

        if entity.velocity >= MINIMUM_VELOCITY {
            let is_projectile = entity.kind == EntityKind::Projectile;
            let target = if is_projectile {
                let (x, y, z) = trajectory_end(
                    entity.position.x,
                    entity.position.y,
                    entity.position.z,
                    move_angle,
                    entity.pitch,
                    entity.velocity,
                );
                Position::new(x, y, z)
            } else {
                Position::new(
                    entity.position.x + entity.velocity * move_angle.cos(),
                    entity.position.y + entity.velocity * move_angle.sin(),
                    entity.position.z,
                )
            };

            let resolution = {
                let others: Vec<&Entity> = self
                    .slots
                    .iter()
                    .flat_map(|partition| partition.values())
                    .filter(|slot| slot.entity.id != id)
                    .map(|slot| &slot.entity)
                    .collect();
                resolve_move(
                    &entity,
                    target,
                    !is_projectile,
                    self.rules,
                    &self.map,
                    &self.walls,
                    &others,
                )
            };

            entity.position.x = resolution.position.x;
            entity.position.y = resolution.position.y;
            if is_projectile {
                entity.position.z = target.z;
                // Ground hit counts as a collision even without geometry.
                if entity.position.z < 0.0 {
                    has_collision = true;
                }
            }
            if let Some(contact) = &resolution.contact {
                has_collision = true;
                if is_projectile && !contact.is_wall() {
                    struck_peer = Some(contact.peer);
                }
            }
        } else {
            entity.velocity = 0.0;
        }

        if is_player(&entity) {
            self.camera = CameraPose {
                position: Position::new(entity.position.x, entity.position.y, CAMERA_HEIGHT),
                angle: entity.angle,
                pitch: entity.pitch,
            };
        }

        if let (Some(peer), true) = (struck_peer, harm > 0) {
            if let Some(peer_slot) = self.find_slot_mut(peer) {
                peer_slot.state.hit_harm += harm;
                trace!(%id, %peer, harm, "damage credited");
            }
        }

        let reply = {
            let Some(slot) = self.find_slot_mut(id) else {
                return;
            };
            slot.entity = entity.clone();
            slot.state.has_collision = has_collision;
            let inbox = slot.inbox.clone();
            let state = slot.state;
            (inbox, state)
        };
        let (inbox, state) = reply;
        if inbox
            .send(ActorEvent::State { entity, state })
            .await
            .is_err()
        {
            warn!(%id, "actor inbox closed, state reply dropped");
        }
    }

    // === Configuration ===

    async fn handle_config(&mut self, config: SimConfig) {
        if config == self.config {
            return;
        }
        self.config = config.clone();
        for partition in self.slots.iter() {
            for slot in partition.values() {
                let event = ActorEvent::ConfigChanged {
                    config: config.clone(),
                };
                if slot.inbox.send(event).await.is_err() {
                    warn!(id = %slot.entity.id, "actor inbox closed, config dropped");
                }
            }
        }
    }

    // === Draw ===

    fn handle_draw(&mut self, reply: oneshot::Sender<FrameSnapshot>) {
        let snapshot = self.snapshot();
        self.flush_removals();
        if reply.send(snapshot).is_err() {
            warn!("draw caller went away before acknowledgement");
        }
    }

    fn snapshot(&mut self) -> FrameSnapshot {
        let mut sprites = Vec::new();
        let mut hud = Vec::new();
        let mut minimap = Vec::new();
        for kind in EntityKind::ALL {
            for slot in self.slots[kind.index()].values() {
                let e = &slot.entity;
                let instance = SpriteInstance {
                    id: e.id,
                    kind: e.kind,
                    position: e.position,
                    angle: e.angle,
                    scale: e.scale,
                    texture: slot.draw.texture.clone(),
                    frame: slot.draw.sprite_index.unwrap_or(slot.anim_frame),
                    illumination: slot.draw.illumination,
                };
                if slot.draw.hud {
                    hud.push(instance);
                } else {
                    if e.kind != EntityKind::Player {
                        sprites.push(instance);
                    }
                    minimap.push(MinimapDot {
                        x: e.position.x,
                        y: e.position.y,
                        color: e.map_color,
                    });
                }
            }
        }
        FrameSnapshot {
            tick: self.tick,
            camera: self.camera,
            sprites,
            hud,
            minimap,
            debug_lines: std::mem::take(&mut self.debug_lines),
        }
    }

    /// Post-draw safe point: no collision query can be in flight here, so
    /// removal cannot tear the entity table mid-tick.
    fn flush_removals(&mut self) {
        for id in std::mem::take(&mut self.pending_removal) {
            let mut removed = false;
            for partition in self.slots.iter_mut() {
                if partition.remove(&id).is_some() {
                    removed = true;
                    break;
                }
            }
            if removed {
                debug!(%id, "entity removed");
            } else {
                warn!(%id, "removal requested for unknown entity");
            }
        }
    }

    // === Lookup ===

    fn find_slot(&self, id: EntityId) -> Option<&ActorSlot> {
        self.slots.iter().find_map(|partition| partition.get(&id))
    }

    fn find_slot_mut(&mut self, id: EntityId) -> Option<&mut ActorSlot> {
        self.slots
            .iter_mut()
            .find_map(|partition| partition.get_mut(&id))
    }
}

fn is_player(entity: &Entity) -> bool {
    entity.kind == EntityKind::Player
}

/// Registration contract checks. Violations are logic bugs in the caller,
/// not runtime input, and stay fatal.
fn validate_registration(data: &RegisterData) {
    if data.draw.animation.is_some() && data.draw.sprite_index.is_some() {
        panic!(
            "entity {:?} registered with both an animation and a static sprite index",
            data.entity.name
        );
    }
    if data.draw.texture.is_none() && data.entity.kind != EntityKind::Player {
        panic!("entity {:?} registered without a texture", data.entity.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::Anchor;
    use crate::sim::events::Animation;

    fn sprite_data(name: &str, x: f64, y: f64, radius: f64) -> RegisterData {
        let mut entity = Entity::new(EntityKind::Sprite, name);
        entity.position = Position::new(x, y, 0.5);
        entity.collision_radius = radius;
        entity.collision_height = 0.5;
        entity.anchor = Anchor::Center;
        RegisterData {
            entity,
            draw: DrawInfo {
                texture: Some("sprite_sheet".into()),
                sprite_index: Some(0),
                ..DrawInfo::default()
            },
            harm: 0,
        }
    }

    fn player_data(x: f64, y: f64) -> RegisterData {
        let mut entity = Entity::new(EntityKind::Player, "player");
        entity.position = Position::new(x, y, 0.5);
        entity.collision_radius = 0.25;
        entity.collision_height = 0.5;
        entity.anchor = Anchor::Center;
        RegisterData {
            entity,
            draw: DrawInfo::default(),
            harm: 0,
        }
    }

    fn test_world() -> (CoreHandle, JoinHandle<()>) {
        Core::spawn(
            GridMap::demo_level(),
            CollisionRules::default(),
            SimConfig::default(),
        )
    }

    async fn registered_id(rx: &mut mpsc::Receiver<ActorEvent>) -> (EntityId, Entity) {
        match rx.recv().await.expect("tick broadcast") {
            ActorEvent::Tick { entity, .. } => (entity.id, entity),
            other => panic!("expected tick, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ids_are_monotone_from_100() {
        let (core, _task) = test_world();
        let (tx_a, mut rx_a) = mpsc::channel(ACTOR_INBOX_CAPACITY);
        let (tx_b, mut rx_b) = mpsc::channel(ACTOR_INBOX_CAPACITY);
        core.register(sprite_data("a", 3.0, 3.0, 0.2), tx_a)
            .await
            .unwrap();
        core.register(sprite_data("b", 4.0, 3.0, 0.2), tx_b)
            .await
            .unwrap();
        core.tick().await.unwrap();
        let (id_a, _) = registered_id(&mut rx_a).await;
        let (id_b, _) = registered_id(&mut rx_b).await;
        assert_eq!(id_a, EntityId(100));
        assert_eq!(id_b, EntityId(101));
    }

    #[tokio::test]
    async fn test_movement_moves_and_replies_to_requester_only() {
        let (core, _task) = test_world();
        let (tx, mut rx) = mpsc::channel(ACTOR_INBOX_CAPACITY);
        let (tx_other, mut rx_other) = mpsc::channel(ACTOR_INBOX_CAPACITY);
        core.register(sprite_data("walker", 3.0, 3.0, 0.2), tx)
            .await
            .unwrap();
        core.register(sprite_data("bystander", 20.0, 20.0, 0.2), tx_other)
            .await
            .unwrap();
        core.tick().await.unwrap();
        let (id, _) = registered_id(&mut rx).await;
        let _ = registered_id(&mut rx_other).await;

        core.movement(
            id,
            Movement {
                acceleration: 0.2,
                ..Movement::default()
            },
        )
        .await
        .unwrap();

        match rx.recv().await.expect("state reply") {
            ActorEvent::State { entity, state } => {
                assert!(entity.position.x > 3.0);
                assert!(!state.has_collision);
            }
            other => panic!("expected state, got {other:?}"),
        }
        assert!(rx_other.try_recv().is_err(), "reply is not broadcast");
    }

    #[tokio::test]
    async fn test_unknown_movement_is_dropped() {
        let (core, _task) = test_world();
        core.movement(EntityId(999), Movement::default())
            .await
            .unwrap();
        // Reactor stays alive and responsive.
        core.tick().await.unwrap();
        let snapshot = core.draw().await.unwrap();
        assert_eq!(snapshot.tick, 1);
    }

    #[tokio::test]
    async fn test_tick_carries_player_snapshot() {
        let (core, _task) = test_world();
        let (tx_p, mut rx_p) = mpsc::channel(ACTOR_INBOX_CAPACITY);
        let (tx_s, mut rx_s) = mpsc::channel(ACTOR_INBOX_CAPACITY);
        core.register(player_data(5.0, 5.0), tx_p).await.unwrap();
        core.register(sprite_data("enemy", 10.0, 10.0, 0.3), tx_s)
            .await
            .unwrap();
        core.tick().await.unwrap();
        let _ = registered_id(&mut rx_p).await;
        match rx_s.recv().await.expect("tick") {
            ActorEvent::Tick { player, .. } => {
                let player = player.expect("player snapshot");
                assert_eq!(player.kind, EntityKind::Player);
                assert_eq!(player.position.x, 5.0);
            }
            other => panic!("expected tick, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_removal_deferred_until_draw() {
        let (core, _task) = test_world();
        let (tx, mut rx) = mpsc::channel(ACTOR_INBOX_CAPACITY);
        core.register(sprite_data("ghost", 3.0, 3.0, 0.2), tx)
            .await
            .unwrap();
        core.tick().await.unwrap();
        let (id, _) = registered_id(&mut rx).await;

        core.unregister(id).await.unwrap();
        // Still present before the draw flush.
        let snapshot = core.draw().await.unwrap();
        assert_eq!(snapshot.sprites.len(), 1);
        // Gone after it.
        let snapshot = core.draw().await.unwrap();
        assert!(snapshot.sprites.is_empty());
    }

    #[tokio::test]
    async fn test_projectile_damage_credited_on_next_tick() {
        let (core, _task) = test_world();
        let (tx_e, mut rx_e) = mpsc::channel(ACTOR_INBOX_CAPACITY);
        let (tx_p, mut rx_p) = mpsc::channel(ACTOR_INBOX_CAPACITY);
        core.register(sprite_data("target", 3.8, 3.0, 0.4), tx_e)
            .await
            .unwrap();

        let mut projectile = Entity::new(EntityKind::Projectile, "bolt");
        projectile.position = Position::new(3.0, 3.0, 0.5);
        projectile.collision_radius = 0.1;
        projectile.collision_height = 0.2;
        projectile.anchor = Anchor::Center;
        core.register(
            RegisterData {
                entity: projectile,
                draw: DrawInfo {
                    texture: Some("bolt".into()),
                    sprite_index: Some(0),
                    ..DrawInfo::default()
                },
                harm: 25,
            },
            tx_p,
        )
        .await
        .unwrap();
        core.tick().await.unwrap();
        let _ = registered_id(&mut rx_e).await;
        let (bolt_id, _) = registered_id(&mut rx_p).await;

        // Fly straight into the target.
        core.movement(
            bolt_id,
            Movement {
                acceleration: 1.0,
                ..Movement::default()
            },
        )
        .await
        .unwrap();
        match rx_p.recv().await.expect("state reply") {
            ActorEvent::State { state, .. } => assert!(state.has_collision),
            other => panic!("expected state, got {other:?}"),
        }

        core.tick().await.unwrap();
        match rx_e.recv().await.expect("tick") {
            ActorEvent::Tick { state, .. } => assert_eq!(state.hit_harm, 25),
            other => panic!("expected tick, got {other:?}"),
        }
        // Delivered once, then cleared.
        core.tick().await.unwrap();
        match rx_e.recv().await.expect("tick") {
            ActorEvent::Tick { state, .. } => assert_eq!(state.hit_harm, 0),
            other => panic!("expected tick, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_projectile_ground_hit() {
        let (core, _task) = test_world();
        let (tx, mut rx) = mpsc::channel(ACTOR_INBOX_CAPACITY);
        let mut projectile = Entity::new(EntityKind::Projectile, "bolt");
        projectile.position = Position::new(5.0, 5.0, 0.05);
        projectile.pitch = PITCH_MIN;
        projectile.collision_radius = 0.1;
        projectile.collision_height = 0.2;
        core.register(
            RegisterData {
                entity: projectile,
                draw: DrawInfo {
                    texture: Some("bolt".into()),
                    sprite_index: Some(0),
                    ..DrawInfo::default()
                },
                harm: 10,
            },
            tx,
        )
        .await
        .unwrap();
        core.tick().await.unwrap();
        let (id, _) = registered_id(&mut rx).await;

        core.movement(
            id,
            Movement {
                acceleration: 0.5,
                ..Movement::default()
            },
        )
        .await
        .unwrap();
        match rx.recv().await.expect("state reply") {
            ActorEvent::State { entity, state } => {
                assert!(entity.position.z < 0.0);
                assert!(state.has_collision);
            }
            other => panic!("expected state, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_animation_loops_counted() {
        let (core, _task) = test_world();
        let (tx, mut rx) = mpsc::channel(ACTOR_INBOX_CAPACITY);
        let mut data = sprite_data("flame", 4.0, 4.0, 0.0);
        data.draw.sprite_index = None;
        data.draw.animation = Some(Animation {
            frame_count: 2,
            ticks_per_frame: 1,
        });
        core.register(data, tx).await.unwrap();

        // Two frames per loop at one tick per frame: the loop count rises
        // every second tick.
        let mut last_loop_count = 0;
        for _ in 0..4 {
            core.tick().await.unwrap();
            match rx.recv().await.expect("tick") {
                ActorEvent::Tick { state, .. } => last_loop_count = state.animation_loop_count,
                other => panic!("expected tick, got {other:?}"),
            }
        }
        assert_eq!(last_loop_count, 2);
    }

    #[tokio::test]
    async fn test_config_rebroadcast_on_change_only() {
        let (core, _task) = test_world();
        let (tx, mut rx) = mpsc::channel(ACTOR_INBOX_CAPACITY);
        core.register(sprite_data("observer", 3.0, 3.0, 0.2), tx)
            .await
            .unwrap();

        // Unchanged config: no broadcast.
        core.set_config(SimConfig::default()).await.unwrap();
        core.tick().await.unwrap();
        match rx.recv().await.expect("event") {
            ActorEvent::Tick { .. } => {}
            other => panic!("expected tick first, got {other:?}"),
        }

        let mut changed = SimConfig::default();
        changed.debug = true;
        core.set_config(changed.clone()).await.unwrap();
        core.tick().await.unwrap();
        match rx.recv().await.expect("event") {
            ActorEvent::ConfigChanged { config } => assert!(config.debug),
            other => panic!("expected config, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_camera_follows_player() {
        let (core, _task) = test_world();
        let (tx, mut rx) = mpsc::channel(ACTOR_INBOX_CAPACITY);
        core.register(player_data(5.0, 5.0), tx).await.unwrap();
        core.tick().await.unwrap();
        let (id, _) = registered_id(&mut rx).await;

        core.movement(
            id,
            Movement {
                vision_rotate: 0.3,
                acceleration: 0.2,
                ..Movement::default()
            },
        )
        .await
        .unwrap();
        let _ = rx.recv().await;

        let snapshot = core.draw().await.unwrap();
        assert!((snapshot.camera.angle - 0.3).abs() < 1e-9);
        assert!(snapshot.camera.position.x > 5.0);
        assert_eq!(snapshot.camera.position.z, CAMERA_HEIGHT);
    }

    #[tokio::test]
    async fn test_hud_and_world_partitions_in_snapshot() {
        let (core, _task) = test_world();
        let (tx_s, _rx_s) = mpsc::channel(ACTOR_INBOX_CAPACITY);
        let (tx_h, _rx_h) = mpsc::channel(ACTOR_INBOX_CAPACITY);
        core.register(sprite_data("enemy", 3.0, 3.0, 0.2), tx_s)
            .await
            .unwrap();
        let mut hud = RegisterData {
            entity: Entity::new(EntityKind::Crosshair, "crosshair"),
            draw: DrawInfo {
                texture: Some("crosshairs".into()),
                sprite_index: Some(0),
                hud: true,
                ..DrawInfo::default()
            },
            harm: 0,
        };
        hud.entity.map_color = [255, 0, 0, 255];
        core.register(hud, tx_h).await.unwrap();

        let snapshot = core.draw().await.unwrap();
        assert_eq!(snapshot.sprites.len(), 1);
        assert_eq!(snapshot.hud.len(), 1);
        assert_eq!(snapshot.minimap.len(), 1);
    }

    #[tokio::test]
    async fn test_debug_lines_drained_into_snapshot() {
        let (core, _task) = test_world();
        core.debug_print(EntityId(7), "checkpoint".into())
            .await
            .unwrap();
        let snapshot = core.draw().await.unwrap();
        assert_eq!(snapshot.debug_lines, vec!["#7: checkpoint".to_string()]);
        let snapshot = core.draw().await.unwrap();
        assert!(snapshot.debug_lines.is_empty());
    }

    #[test]
    #[should_panic(expected = "both an animation and a static sprite index")]
    fn test_conflicting_draw_metadata_is_fatal() {
        let mut data = sprite_data("bad", 3.0, 3.0, 0.2);
        data.draw.animation = Some(Animation {
            frame_count: 4,
            ticks_per_frame: 2,
        });
        validate_registration(&data);
    }

    #[test]
    #[should_panic(expected = "without a texture")]
    fn test_missing_texture_is_fatal() {
        let mut data = sprite_data("bad", 3.0, 3.0, 0.2);
        data.draw.texture = None;
        validate_registration(&data);
    }

    #[test]
    fn test_player_may_omit_texture() {
        validate_registration(&player_data(5.0, 5.0));
    }
}
