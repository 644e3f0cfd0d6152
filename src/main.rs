//! Gridsim Demo Driver
//!
//! Headless run of the simulation: spawns the Core, a scripted player,
//! a weapon, a crosshair and a handful of enemies, then drives ticks and
//! draw snapshots at the tick rate, logging frame digests.

use std::f64::consts::PI;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context as _, Result};
use rand::Rng;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use gridsim::actor::{Crosshair, Enemy, Player, Weapon};
use gridsim::actor::{EffectSpec, ProjectileSpec};
use gridsim::sim::collision::CollisionRules;
use gridsim::sim::entity::Position;
use gridsim::sim::events::{Animation, InputFrame};
use gridsim::{Core, GridMap, Regoter, SimConfig, TICK_RATE, VERSION};

/// Demo length in ticks (10 seconds).
const DEMO_TICKS: u64 = 600;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Gridsim v{}", VERSION);
    info!("Tick Rate: {} Hz", TICK_RATE);

    let config = load_config()?;
    let map = GridMap::demo_level();
    info!("Map: {}x{}", map.width(), map.height());

    let (core, core_task) = Core::spawn(map, CollisionRules::default(), config);

    // Shared input feed for the player and the weapon.
    let (input_tx, input_rx) = watch::channel(InputFrame::default());

    let _player = Regoter::spawn(
        core.clone(),
        Player::new(input_rx.clone(), Position::new(3.5, 3.5, 0.5), 0.0),
    );
    let _crosshair = Regoter::spawn(core.clone(), Crosshair::new("crosshairs_sharewhite", 4));
    let _weapon = Regoter::spawn(
        core.clone(),
        Weapon::new(input_rx, "hand_spell", bolt_spec(), 3.0),
    );
    for (i, (x, y)) in [(9.5, 9.5), (14.5, 4.5), (19.5, 15.5)].iter().enumerate() {
        let _enemy = Regoter::spawn(
            core.clone(),
            Enemy::new(
                format!("sorcerer-{i}"),
                "sorcerer_sheet",
                Position::new(*x, *y, 0.0),
                (i as f64) * PI / 3.0,
                60,
            ),
        );
    }

    let mut rng = rand::thread_rng();
    let mut interval = tokio::time::interval(Duration::from_secs(1) / TICK_RATE);
    for tick in 1..=DEMO_TICKS {
        interval.tick().await;
        input_tx.send_replace(scripted_input(tick));

        // Late spawns keep the world changing mid-run.
        if rng.gen_bool(0.005) {
            let x = rng.gen_range(3.0..21.0);
            let y = rng.gen_range(3.0..21.0);
            let _late = Regoter::spawn(
                core.clone(),
                Enemy::new(
                    format!("straggler-{tick}"),
                    "sorcerer_sheet",
                    Position::new(x, y, 0.0),
                    rng.gen_range(-PI..PI),
                    40,
                ),
            );
        }

        core.tick().await?;
        let snapshot = core.draw().await?;
        for line in &snapshot.debug_lines {
            info!(tick, "debug: {line}");
        }
        if tick % u64::from(TICK_RATE) == 0 {
            info!(
                tick,
                sprites = snapshot.sprites.len(),
                hud = snapshot.hud.len(),
                camera_x = snapshot.camera.position.x,
                camera_y = snapshot.camera.position.y,
                "frame"
            );
        }
    }

    info!("demo finished after {DEMO_TICKS} ticks");
    // Actors still hold core handles; tear the reactor down directly.
    core_task.abort();
    Ok(())
}

/// Optional JSON settings file from the first CLI argument.
fn load_config() -> Result<SimConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(SimConfig::default());
    };
    let raw = std::fs::read_to_string(Path::new(&path))
        .with_context(|| format!("reading config {path}"))?;
    let config = serde_json::from_str(&raw).with_context(|| format!("parsing config {path}"))?;
    info!("loaded config from {path}");
    Ok(config)
}

/// Canned input: walk forward, sweep the view, squeeze off shots.
fn scripted_input(tick: u64) -> InputFrame {
    InputFrame {
        forward: tick % 120 < 80,
        turn_right: tick % 120 >= 80,
        fire: tick % 90 < 5,
        sprint: tick % 240 < 40,
        ..InputFrame::default()
    }
}

fn bolt_spec() -> ProjectileSpec {
    ProjectileSpec {
        texture: "charged_bolt_sheet".into(),
        velocity: 0.45,
        harm: 20,
        collision_radius: 0.1,
        collision_height: 0.2,
        scale: 0.3,
        impact: EffectSpec {
            texture: "blue_explosion_sheet".into(),
            animation: Animation {
                frame_count: 5,
                ticks_per_frame: 3,
            },
            loops: 1,
            scale: 0.4,
            illumination: 1000.0,
        },
    }
}
