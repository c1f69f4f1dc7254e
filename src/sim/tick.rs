//! Fixed frame step
//!
//! One `tick` call advances the whole round by `dt`, in a fixed order that
//! is part of the engine's contract: enemy settling first, then the active
//! projectile (platforms, blocks, enemies, boundary), then each scatter
//! sibling through the same sequence, then the bomb. When one frame
//! produces several events the score lands in this order, which keeps
//! scoring deterministic.

use super::collision::{
    blast_rect, escapes_playfield, gust_rect, platform_bounce, rests_on_block, rests_on_platform,
};
use super::rect::{coarse_overlap, Rect};
use super::state::{Body, GameState, Kind, RoundEvent, Tier};
use super::vec2::Vec2;
use crate::consts::*;

/// Bounce damping on the y axis differs between the main projectile and
/// scatter siblings; the two call sites are deliberately not unified.
const MAIN_Y_DAMPING: f32 = 0.8;
const SCATTER_Y_DAMPING: f32 = 0.2;

/// Input commands for a single frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Release the active projectile with this velocity.
    pub launch: Option<Vec2>,
    /// Trigger the active projectile's ability (once per flight).
    pub activate: bool,
}

/// Advance the round by one frame.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    if let Some(vel) = input.launch {
        if !state.flying {
            state.launch(vel);
        }
    }
    if input.activate && state.flying && !state.ability_spent {
        activate_ability(state);
    }

    // Enemies settle and fall every frame, whatever the projectile is doing.
    settle_enemies(state, dt);

    if state.flying {
        advance_projectile(state, dt);
        for j in 0..state.scatter.len() {
            if state.scatter[j].visible {
                advance_scatter(state, j, dt);
            }
        }
    }

    if state.bomb.visible {
        advance_bomb(state, dt);
    }

    state.check_cleared();
}

/// RestingBodyTracker: snap supported enemies onto their surface, let the
/// rest fall. The last matching support wins; the snap is unconditional.
fn settle_enemies(state: &mut GameState, dt: f32) {
    for i in 0..state.enemies.len() {
        if !state.enemies[i].visible {
            continue;
        }
        let bounds = state.enemies[i].bounds;
        let mut vy = ENEMY_BASE_FALL;
        let mut snap_y = None;

        for block in state.blocks.iter().filter(|b| b.visible) {
            if rests_on_block(&bounds, &block.bounds) {
                vy = 0.0;
                snap_y = Some(block.bounds.y - bounds.height);
            }
        }
        for platform in state.platforms.iter().filter(|p| p.visible) {
            if rests_on_platform(&bounds, &platform.bounds) {
                vy = 0.0;
                snap_y = Some(platform.bounds.y - bounds.height);
            }
        }

        let enemy = &mut state.enemies[i];
        if let Some(y) = snap_y {
            enemy.bounds.y = y;
        }
        enemy.vel.y = vy;
        enemy.bounds.y += enemy.vel.y * ENEMY_FALL_SCALE * dt;
        enemy.vel.y += ENEMY_GRAVITY * dt;
    }
}

/// Gravity-and-drag integration shared by the main projectile and scatter
/// siblings.
fn integrate_flight(body: &mut Body, dt: f32) {
    let vel = body.vel;
    body.bounds.y += vel.y * VELOCITY_SCALE * dt;
    body.bounds.x += vel.x * VELOCITY_SCALE * dt;
    body.vel = Vec2::new(
        vel.x - vel.x * (PROJECTILE_DRAG * dt),
        vel.y + PROJECTILE_GRAVITY * dt,
    );
}

fn bounce_on_platforms(body: &mut Body, platforms: &[Body], y_damping: f32) {
    for platform in platforms.iter().filter(|p| p.visible) {
        if let Some(resp) = platform_bounce(&body.bounds, body.vel, &platform.bounds, y_damping) {
            body.set_pos(resp.pos);
            body.vel = resp.vel;
        }
    }
}

/// Active projectile: integrate, bounce, smash, then the boundary guard.
fn advance_projectile(state: &mut GameState, dt: f32) {
    let active = state.active;
    integrate_flight(&mut state.projectiles[active], dt);
    bounce_on_platforms(
        &mut state.projectiles[active],
        &state.platforms,
        MAIN_Y_DAMPING,
    );

    // DestructiveContactRules: blocks by tier and active kind.
    let kind = state.active_kind();
    let proj_bounds = state.projectiles[active].bounds;
    for k in 0..state.blocks.len() {
        if !state.blocks[k].visible || !coarse_overlap(&proj_bounds, &state.blocks[k].bounds) {
            continue;
        }
        let tier = Tier::of_block(k);
        state.blocks[k].dismiss();
        state.score += tier.strike_points();
        let p = &mut state.projectiles[active];
        p.vel.x -= p.vel.x * tier.projectile_damping(kind);
    }

    strike_enemies(state, &proj_bounds);

    if escapes_playfield(&state.projectiles[active].bounds, &state.playfield) {
        spend_projectile(state);
    }
}

/// One scatter sibling through the same sequence as the main projectile,
/// with the scatter bounce damping and the flat scatter block damping.
fn advance_scatter(state: &mut GameState, j: usize, dt: f32) {
    integrate_flight(&mut state.scatter[j], dt);
    bounce_on_platforms(&mut state.scatter[j], &state.platforms, SCATTER_Y_DAMPING);

    let bounds = state.scatter[j].bounds;
    for k in 0..state.blocks.len() {
        if !state.blocks[k].visible || !coarse_overlap(&bounds, &state.blocks[k].bounds) {
            continue;
        }
        let tier = Tier::of_block(k);
        state.blocks[k].dismiss();
        state.score += tier.strike_points();
        let s = &mut state.scatter[j];
        s.vel.x -= s.vel.x * tier.scatter_damping();
    }

    strike_enemies(state, &bounds);

    if escapes_playfield(&state.scatter[j].bounds, &state.playfield) {
        state.scatter[j].dismiss();
    }
}

/// Enemy contact: flat points, hit counter, no damping of the striker.
fn strike_enemies(state: &mut GameState, striker: &Rect) {
    for enemy in state.enemies.iter_mut().filter(|e| e.visible) {
        if coarse_overlap(striker, &enemy.bounds) {
            enemy.dismiss();
            state.score += ENEMY_POINTS;
            state.enemies_hit += 1;
        }
    }
}

/// BoundaryGuard consequences for the active projectile: count the shot,
/// clear live ordnance, reseat the queue, signal the round machine.
fn spend_projectile(state: &mut GameState) {
    state.projectiles[state.active].dismiss();
    state.projectiles_left = state.projectiles_left.saturating_sub(1);
    state.flying = false;
    state.ability_spent = false;
    state.bomb.dismiss();
    state.bomb.vel = Vec2::ZERO;
    for s in &mut state.scatter {
        s.dismiss();
        s.vel = Vec2::ZERO;
    }
    state.reseat_projectiles();

    let remaining = state.projectiles_left;
    log::info!("projectile spent, {} remaining", remaining);
    state.signal(RoundEvent::ProjectileSpent { remaining });
    if remaining == 0 {
        state.signal(RoundEvent::AmmoExhausted);
    }
}

/// BlastResolver: phase 1 is direct contact against enemies, blocks, and
/// platforms; any hit detonates the bomb and records the blast rect, which
/// phase 2 then re-runs against enemies and blocks.
fn advance_bomb(state: &mut GameState, dt: f32) {
    state.bomb.bounds.y += state.bomb.vel.y * VELOCITY_SCALE * dt;
    let bomb_bounds = state.bomb.bounds;

    let mut detonated = false;
    for enemy in state.enemies.iter_mut().filter(|e| e.visible) {
        if coarse_overlap(&bomb_bounds, &enemy.bounds) {
            enemy.dismiss();
            state.score += ENEMY_POINTS;
            state.enemies_hit += 1;
            detonated = true;
        }
    }
    for k in 0..state.blocks.len() {
        if state.blocks[k].visible && coarse_overlap(&bomb_bounds, &state.blocks[k].bounds) {
            state.blocks[k].dismiss();
            state.score += Tier::of_block(k).blast_points();
            detonated = true;
        }
    }
    for platform in state.platforms.iter().filter(|p| p.visible) {
        if coarse_overlap(&bomb_bounds, &platform.bounds) {
            detonated = true;
        }
    }

    if detonated {
        state.bomb.dismiss();
        let blast = blast_rect(&bomb_bounds);
        log::debug!("bomb detonated, blast rect {:?}", blast);
        for enemy in state.enemies.iter_mut().filter(|e| e.visible) {
            if coarse_overlap(&blast, &enemy.bounds) {
                enemy.dismiss();
                state.score += ENEMY_POINTS;
                state.enemies_hit += 1;
            }
        }
        for k in 0..state.blocks.len() {
            if state.blocks[k].visible && coarse_overlap(&blast, &state.blocks[k].bounds) {
                state.blocks[k].dismiss();
                state.score += Tier::of_block(k).blast_points();
            }
        }
        return;
    }

    // The bomb dies the moment it crosses fully above the playfield top,
    // contact or not, and is subject to the ordinary boundary guard.
    if state.bomb.bounds.bottom() < state.playfield.y
        || escapes_playfield(&state.bomb.bounds, &state.playfield)
    {
        state.bomb.dismiss();
    }
}

/// Dispatch the active projectile's ability. Latched for the rest of the
/// flight, including for the Stone, which has none.
fn activate_ability(state: &mut GameState) {
    state.ability_spent = true;
    let kind = state.active_kind();
    log::info!("ability activated: {:?}", kind);
    match kind {
        Kind::Gust => gust_blow(state),
        Kind::Bomber => release_bomb(state),
        Kind::Booster => {
            let p = &mut state.projectiles[state.active];
            p.vel = p.vel.scale(2.0);
        }
        Kind::Splitter => release_scatter(state),
        Kind::Stone => {}
    }
}

/// Gust: an immediate area-of-effect pass in front of the projectile.
/// Enemies score flat; blocks score by the area-weapon table.
fn gust_blow(state: &mut GameState) {
    let sweep = gust_rect(&state.projectiles[state.active].bounds);
    for enemy in state.enemies.iter_mut().filter(|e| e.visible) {
        if coarse_overlap(&sweep, &enemy.bounds) {
            enemy.dismiss();
            state.score += ENEMY_POINTS;
            state.enemies_hit += 1;
        }
    }
    for k in 0..state.blocks.len() {
        if state.blocks[k].visible && coarse_overlap(&sweep, &state.blocks[k].bounds) {
            state.blocks[k].dismiss();
            state.score += Tier::of_block(k).blast_points();
        }
    }
}

/// Arm the bomb under the projectile's horizontal center, falling straight
/// down.
fn release_bomb(state: &mut GameState) {
    let proj = state.projectiles[state.active].bounds;
    let size = state.playfield.height * BOMB_SIZE;
    state.bomb.bounds = Rect::new(
        proj.x + (proj.width * 0.5 - size * 0.5),
        proj.y,
        size,
        size,
    );
    state.bomb.vel = Vec2::new(0.0, 1.0);
    state.bomb.visible = true;
}

/// Spawn both scatter siblings at the projectile's bounds, spread apart on
/// the y axis; they simulate independently from here on.
fn release_scatter(state: &mut GameState) {
    let proj = state.projectiles[state.active];
    for (i, s) in state.scatter.iter_mut().enumerate() {
        s.bounds = proj.bounds;
        s.visible = true;
        let spread = if i == 1 { -SCATTER_SPREAD } else { SCATTER_SPREAD };
        s.vel = Vec2::new(proj.vel.x, proj.vel.y + spread);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A big playfield, a queue platform, five seated projectiles, and six
    /// enemies parked on a ledge so gravity does not disturb them.
    fn test_state() -> GameState {
        let mut state = GameState::new(
            Rect::new(0.0, 0.0, 2000.0, 1000.0),
            Vec2::new(100.0, 500.0),
        );
        state.platforms[0] = Body::placed(Rect::new(40.0, 700.0, 200.0, 20.0));
        for p in &mut state.projectiles {
            *p = Body::placed(Rect::new(100.0, 500.0, 24.0, 24.0));
        }
        for (i, e) in state.enemies.iter_mut().enumerate() {
            *e = Body::placed(Rect::new(60.0 + i as f32 * 32.0, 676.0, 24.0, 24.0));
        }
        state
    }

    #[test]
    fn test_block_strike_light_tier_kind_gust() {
        let mut state = test_state();
        state.active = 0; // Gust
        state.blocks[5] = Body::placed(Rect::new(500.0, 500.0, 60.0, 60.0));
        state.projectiles[0].bounds = Rect::new(510.0, 510.0, 24.0, 24.0);
        state.launch(Vec2::new(10.0, 0.0));

        tick(&mut state, &TickInput::default(), 0.0);

        assert!(!state.blocks[5].visible);
        assert_eq!(state.score, 5);
        // 10% x damping for kind 0 on a light block
        assert!((state.projectiles[0].vel.x - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_block_strike_splitter_light_damping() {
        let mut state = test_state();
        state.active = 3; // Splitter
        state.blocks[2] = Body::placed(Rect::new(500.0, 500.0, 60.0, 60.0));
        state.projectiles[3].bounds = Rect::new(510.0, 510.0, 24.0, 24.0);
        state.launch(Vec2::new(10.0, 0.0));

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.score, 5);
        assert!((state.projectiles[3].vel.x - 9.5).abs() < 1e-5);
    }

    #[test]
    fn test_heavy_and_keystone_tiers_score() {
        let mut state = test_state();
        state.active = 4; // Stone
        state.blocks[35] = Body::placed(Rect::new(500.0, 500.0, 60.0, 60.0));
        state.blocks[40] = Body::placed(Rect::new(600.0, 500.0, 60.0, 60.0));
        state.projectiles[4].bounds = Rect::new(510.0, 510.0, 24.0, 24.0);
        state.launch(Vec2::new(10.0, 0.0));

        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.score, 15);
        // Stone only loses 10% through heavy blocks
        assert!((state.projectiles[4].vel.x - 9.0).abs() < 1e-5);

        state.projectiles[4].bounds = Rect::new(610.0, 510.0, 24.0, 24.0);
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.score, 15 + 55);
        // Keystone never damps
        assert!((state.projectiles[4].vel.x - 9.0).abs() < 1e-5);
    }

    #[test]
    fn test_enemy_strike_flat_points_no_damping() {
        let mut state = test_state();
        state.projectiles[0].bounds = state.enemies[2].bounds;
        state.launch(Vec2::new(3.0, 0.0));

        tick(&mut state, &TickInput::default(), 0.0);

        assert!(!state.enemies[2].visible);
        assert_eq!(state.score, 150);
        assert_eq!(state.enemies_hit, 1);
        assert!((state.projectiles[0].vel.x - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_invisible_block_is_skipped() {
        let mut state = test_state();
        state.blocks[5] = Body::placed(Rect::new(500.0, 500.0, 60.0, 60.0));
        state.blocks[5].dismiss();
        state.projectiles[0].bounds = Rect::new(510.0, 510.0, 24.0, 24.0);
        state.launch(Vec2::new(10.0, 0.0));

        tick(&mut state, &TickInput::default(), 0.0);

        assert_eq!(state.score, 0);
        assert!((state.projectiles[0].vel.x - 10.0).abs() < 1e-6);
    }

    #[test]
    fn test_boundary_spends_projectile() {
        let mut state = test_state();
        state.projectiles[0].bounds.x = -50.0;
        state.launch(Vec2::new(-1.0, 0.0));

        tick(&mut state, &TickInput::default(), 0.0);

        assert!(!state.projectiles[0].visible);
        assert!(!state.flying);
        assert_eq!(state.projectiles_left, 4);
        let events = state.drain_events();
        assert!(events.contains(&RoundEvent::ProjectileSpent { remaining: 4 }));
        assert!(!events.contains(&RoundEvent::AmmoExhausted));
        // Next shot is seated on the launch anchor
        assert_eq!(state.active, 1);
        assert_eq!(state.projectiles[1].pos(), state.launch_anchor);
    }

    #[test]
    fn test_last_projectile_exhausts_ammo() {
        let mut state = test_state();
        for i in 1..state.projectiles.len() {
            state.projectiles[i].dismiss();
        }
        state.projectiles_left = 1;
        state.projectiles[0].bounds.x = -50.0;
        state.launch(Vec2::new(-1.0, 0.0));

        tick(&mut state, &TickInput::default(), 0.0);

        let events = state.drain_events();
        assert!(events.contains(&RoundEvent::AmmoExhausted));
    }

    #[test]
    fn test_enemy_rests_on_block() {
        let mut state = test_state();
        state.blocks[0] = Body::placed(Rect::new(800.0, 600.0, 70.0, 30.0));
        state.enemies[0].bounds = Rect::new(820.0, 590.0, 24.0, 24.0);
        let dt = 1.0 / 60.0;

        tick(&mut state, &TickInput::default(), dt);

        // Snapped onto the block top, vertical velocity zeroed before
        // gravity re-accumulates
        assert_eq!(state.enemies[0].bounds.y, 600.0 - 24.0);
        assert!((state.enemies[0].vel.y - ENEMY_GRAVITY * dt).abs() < 1e-5);
    }

    #[test]
    fn test_unsupported_enemy_falls() {
        let mut state = test_state();
        state.enemies[0].bounds = Rect::new(1500.0, 100.0, 24.0, 24.0);
        let dt = 1.0 / 60.0;

        tick(&mut state, &TickInput::default(), dt);

        let expected = 100.0 + ENEMY_BASE_FALL * ENEMY_FALL_SCALE * dt;
        assert!((state.enemies[0].bounds.y - expected).abs() < 1e-4);
    }

    #[test]
    fn test_dismissed_enemy_ignores_gravity() {
        let mut state = test_state();
        state.enemies[0].bounds = Rect::new(1500.0, 100.0, 24.0, 24.0);
        state.enemies[0].dismiss();

        tick(&mut state, &TickInput::default(), 1.0 / 60.0);

        assert_eq!(state.enemies[0].bounds.y, 100.0);
    }

    #[test]
    fn test_bomb_direct_hit_and_blast() {
        let mut state = test_state();
        // Move the herd away; park two targets near the bomb
        for e in &mut state.enemies {
            e.bounds.x = 1800.0;
        }
        state.enemies[0].bounds = Rect::new(1000.0, 300.0, 10.0, 10.0);
        state.enemies[1].bounds = Rect::new(980.0, 280.0, 10.0, 10.0);
        state.bomb = Body::placed(Rect::new(1000.0, 300.0, 10.0, 10.0));

        tick(&mut state, &TickInput::default(), 0.0);

        // Direct contact kills enemy 0; enemy 1 sits inside the 9x blast
        assert!(!state.enemies[0].visible);
        assert!(!state.enemies[1].visible);
        assert!(!state.bomb.visible);
        assert_eq!(state.score, 300);
        assert_eq!(state.enemies_hit, 2);
    }

    #[test]
    fn test_bomb_block_scoring_uses_blast_table() {
        let mut state = test_state();
        for e in &mut state.enemies {
            e.bounds.x = 1800.0;
        }
        state.blocks[40] = Body::placed(Rect::new(1000.0, 300.0, 60.0, 60.0));
        state.bomb = Body::placed(Rect::new(1010.0, 310.0, 10.0, 10.0));

        tick(&mut state, &TickInput::default(), 0.0);

        // Keystone yields nothing to area weapons
        assert!(!state.blocks[40].visible);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_bomb_dismissed_above_playfield() {
        let mut state = test_state();
        state.bomb = Body::placed(Rect::new(1000.0, -50.0, 10.0, 10.0));

        tick(&mut state, &TickInput::default(), 0.0);

        assert!(!state.bomb.visible);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_booster_doubles_velocity() {
        let mut state = test_state();
        state.active = 2;
        state.projectiles[2].bounds = Rect::new(900.0, 300.0, 24.0, 24.0);
        state.launch(Vec2::new(6.0, -2.0));

        let input = TickInput {
            activate: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.0);

        assert!(state.ability_spent);
        assert!((state.projectiles[2].vel.x - 12.0).abs() < 1e-5);
        assert!((state.projectiles[2].vel.y - -4.0).abs() < 1e-5);

        // The latch holds for the rest of the flight
        tick(&mut state, &input, 0.0);
        assert!((state.projectiles[2].vel.x - 12.0).abs() < 1e-5);
    }

    #[test]
    fn test_splitter_spawns_scatter_pair() {
        let mut state = test_state();
        state.active = 3;
        state.projectiles[3].bounds = Rect::new(900.0, 300.0, 24.0, 24.0);
        state.launch(Vec2::new(6.0, 1.0));

        let input = TickInput {
            activate: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.0);

        assert!(state.scatter[0].visible);
        assert!(state.scatter[1].visible);
        // Sibling 0 spreads down, sibling 1 up
        assert!((state.scatter[0].vel.y - (1.0 + SCATTER_SPREAD)).abs() < 1e-5);
        assert!((state.scatter[1].vel.y - (1.0 - SCATTER_SPREAD)).abs() < 1e-5);
    }

    #[test]
    fn test_scatter_strikes_block_with_flat_damping() {
        let mut state = test_state();
        state.active = 3;
        state.projectiles[3].bounds = Rect::new(900.0, 300.0, 24.0, 24.0);
        state.launch(Vec2::new(10.0, 0.0));
        state.scatter[0] = Body::placed(Rect::new(510.0, 510.0, 24.0, 24.0));
        state.scatter[0].vel = Vec2::new(10.0, 0.0);
        state.blocks[35] = Body::placed(Rect::new(500.0, 500.0, 60.0, 60.0));

        tick(&mut state, &TickInput::default(), 0.0);

        assert!(!state.blocks[35].visible);
        assert_eq!(state.score, 15);
        // Heavy tier takes 25% off a scatter sibling
        assert!((state.scatter[0].vel.x - 7.5).abs() < 1e-5);
    }

    #[test]
    fn test_gust_sweeps_front_area() {
        let mut state = test_state();
        state.active = 0;
        state.projectiles[0].bounds = Rect::new(900.0, 300.0, 24.0, 24.0);
        // Gust rect: x in [924, 1020], y in [276, 348]
        for e in &mut state.enemies {
            e.bounds.x = 1800.0;
        }
        state.enemies[0].bounds = Rect::new(940.0, 300.0, 12.0, 12.0);
        state.blocks[12] = Body::placed(Rect::new(960.0, 310.0, 10.0, 10.0));
        state.launch(Vec2::new(10.0, 0.0));
        // Clear of the block so the flight pass itself does not strike it
        assert!(!coarse_overlap(
            &state.projectiles[0].bounds,
            &state.blocks[12].bounds
        ));

        let input = TickInput {
            activate: true,
            ..Default::default()
        };
        tick(&mut state, &input, 0.0);

        assert!(!state.enemies[0].visible);
        assert!(!state.blocks[12].visible);
        assert_eq!(state.score, 150 + 10);
        assert_eq!(state.enemies_hit, 1);
    }

    #[test]
    fn test_score_never_decreases_over_frames() {
        let mut state = test_state();
        state.blocks[5] = Body::placed(Rect::new(400.0, 480.0, 60.0, 60.0));
        state.launch(Vec2::new(8.0, -3.0));

        let mut last = state.score;
        for _ in 0..600 {
            tick(&mut state, &TickInput::default(), 1.0 / 120.0);
            assert!(state.score >= last);
            last = state.score;
        }
    }
}
