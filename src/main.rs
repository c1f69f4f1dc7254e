//! Sling Siege headless driver
//!
//! Stands in for the external collaborators around the physics core: builds
//! a level layout, aims and launches each projectile with a seeded RNG,
//! steps the simulation at a fixed timestep, and reports score and round
//! events. Pass `--dump` to print the final state as JSON, `--seed N` to
//! change the run.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use sling_siege::consts::*;
use sling_siege::sim::{tick, Body, GameState, Rect, RoundEvent, TickInput, Vec2};

const FIELD_WIDTH: f32 = 1536.0;
const FIELD_HEIGHT: f32 = 576.0;
const SIM_DT: f32 = 1.0 / 120.0;
/// Hard stop so a pathological run cannot spin forever.
const MAX_TICKS: u64 = 120 * 600;

/// Place platforms, blocks, and enemies the way the level-setup collaborator
/// would at round start.
fn build_level() -> GameState {
    let playfield = Rect::new(0.0, 0.0, FIELD_WIDTH, FIELD_HEIGHT);
    let anchor = Vec2::new(140.0, 360.0);
    let mut state = GameState::new(playfield, anchor);

    let block = FIELD_HEIGHT * 0.05;
    let long = FIELD_HEIGHT * 0.10;

    // Platform 0 is the projectile queue next to the sling; the rest form
    // ledges under the target stacks.
    state.platforms[0] = Body::placed(Rect::new(40.0, 440.0, 180.0, 16.0));
    for (i, x) in [760.0, 940.0, 1120.0, 1300.0].iter().enumerate() {
        state.platforms[1 + i] = Body::placed(Rect::new(*x, 460.0, long * 2.0, 16.0));
    }

    // Light debris up front, medium walls in the middle, heavy at the back,
    // the keystone on the last ledge. Indices drive the score tiers.
    for i in 0..10 {
        state.blocks[i] = Body::placed(Rect::new(
            760.0 + (i % 5) as f32 * block,
            460.0 - block * (1 + i / 5) as f32,
            block,
            block,
        ));
    }
    for i in 10..30 {
        state.blocks[i] = Body::placed(Rect::new(
            940.0 + ((i - 10) % 5) as f32 * block,
            460.0 - block * (1 + (i - 10) / 5) as f32,
            block,
            block,
        ));
    }
    for i in 30..40 {
        state.blocks[i] = Body::placed(Rect::new(
            1120.0 + ((i - 30) % 5) as f32 * block,
            460.0 - block * (1 + (i - 30) / 5) as f32,
            block,
            block,
        ));
    }
    state.blocks[40] = Body::placed(Rect::new(1300.0, 460.0 - long, long, long));

    // Enemies perched on the stacks
    let enemy = FIELD_HEIGHT * 0.03;
    for (i, x) in [780.0, 860.0, 960.0, 1060.0, 1160.0, 1320.0].iter().enumerate() {
        state.enemies[i] = Body::placed(Rect::new(*x, 380.0, enemy, enemy));
    }

    // Projectiles queue up; reseat puts the first on the anchor
    let shot = FIELD_HEIGHT * PROJECTILE_SIZE;
    for p in &mut state.projectiles {
        *p = Body::placed(Rect::new(0.0, 0.0, shot, shot));
    }
    state.reseat_projectiles();

    state
}

fn arg_seed() -> u64 {
    let args: Vec<String> = std::env::args().collect();
    args.iter()
        .position(|a| a == "--seed")
        .and_then(|i| args.get(i + 1))
        .and_then(|v| v.parse().ok())
        .unwrap_or(7)
}

fn main() {
    env_logger::init();

    let seed = arg_seed();
    let dump = std::env::args().any(|a| a == "--dump");
    log::info!("Sling Siege headless run, seed {}", seed);

    let mut rng = Pcg32::seed_from_u64(seed);
    let mut state = build_level();

    let mut activate_at: Option<u64> = None;
    let mut done = false;
    while !done && state.time_ticks < MAX_TICKS {
        let mut input = TickInput::default();

        if !state.flying && state.projectiles_left > 0 {
            // Pull back and let fly, with a little jitter on the aim
            let vel = Vec2::new(
                rng.random_range(60.0..110.0),
                rng.random_range(-70.0..-25.0),
            );
            input.launch = Some(vel);
            activate_at = Some(state.time_ticks + rng.random_range(20..80));
            log::info!(
                "launching {:?} at ({:.0}, {:.0})",
                state.active_kind(),
                vel.x,
                vel.y
            );
        }
        if activate_at.is_some_and(|t| state.time_ticks >= t) {
            input.activate = true;
            activate_at = None;
        }

        tick(&mut state, &input, SIM_DT);

        for event in state.drain_events() {
            match event {
                RoundEvent::ProjectileSpent { remaining } => {
                    log::info!("shot spent, {} left, score {}", remaining, state.score);
                }
                RoundEvent::AmmoExhausted => {
                    log::info!("out of ammo");
                    done = true;
                }
                RoundEvent::EnemiesCleared => {
                    log::info!("all enemies cleared");
                    done = true;
                }
            }
        }
    }

    println!(
        "score {}  enemies {}/{}  shots left {}  ({} ticks)",
        state.score,
        state.enemies_hit,
        state.enemies.len(),
        state.projectiles_left,
        state.time_ticks
    );

    if dump {
        match serde_json::to_string_pretty(&state) {
            Ok(json) => println!("{}", json),
            Err(e) => log::error!("state dump failed: {}", e),
        }
    }
}
