//! Game state and core simulation types
//!
//! Every body the engine moves or destroys lives in a fixed-capacity
//! registry owned by [`GameState`]. Registries are sized once at round start
//! and never resized; "destruction" is `visible = false`. External
//! collaborators (level setup, menus) place bodies before the round and read
//! score / visibility / events after each frame.

use serde::{Deserialize, Serialize};

use super::rect::Rect;
use super::vec2::Vec2;
use crate::consts::*;

/// A positioned, velocity-bearing, visibility-flagged entity. Used uniformly
/// for blocks, enemies, platforms, the bomb, projectiles, and scatter shots.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Body {
    pub bounds: Rect,
    pub vel: Vec2,
    pub visible: bool,
}

impl Body {
    pub fn hidden() -> Self {
        Self::default()
    }

    pub fn placed(bounds: Rect) -> Self {
        Self {
            bounds,
            vel: Vec2::ZERO,
            visible: true,
        }
    }

    /// Top-left anchor as a vector.
    pub fn pos(&self) -> Vec2 {
        self.bounds.pos()
    }

    pub fn set_pos(&mut self, pos: Vec2) {
        self.bounds.x = pos.x;
        self.bounds.y = pos.y;
    }

    /// Remove the body from all further detection and integration until it
    /// is externally reset.
    pub fn dismiss(&mut self) {
        self.visible = false;
    }
}

/// The five projectile abilities, one per registry index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Kind {
    /// Area-of-effect gust in front of the projectile.
    Gust,
    /// Drops a bomb that detonates on first contact.
    Bomber,
    /// Doubles flight velocity.
    Booster,
    /// Splits off two scatter siblings.
    Splitter,
    /// No ability; hits harder through medium and heavy blocks.
    Stone,
}

impl Kind {
    pub fn of_index(index: usize) -> Kind {
        match index {
            0 => Kind::Gust,
            1 => Kind::Bomber,
            2 => Kind::Booster,
            3 => Kind::Splitter,
            _ => Kind::Stone,
        }
    }
}

/// Block score tier, keyed on the block's registry index. The mapping is a
/// static table, not a property of the block's size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    /// Indices [0, 10)
    Light,
    /// Indices [10, 30)
    Medium,
    /// Indices [30, 40)
    Heavy,
    /// Index 40, the lone keystone block
    Keystone,
}

impl Tier {
    pub fn of_block(index: usize) -> Tier {
        match index {
            0..=9 => Tier::Light,
            10..=29 => Tier::Medium,
            30..=39 => Tier::Heavy,
            _ => Tier::Keystone,
        }
    }

    /// Points for a projectile or scatter strike: a flat 5 plus a tier
    /// bonus of 0 / 5 / 10 / 50.
    pub fn strike_points(self) -> u64 {
        match self {
            Tier::Light => 5,
            Tier::Medium => 10,
            Tier::Heavy => 15,
            Tier::Keystone => 55,
        }
    }

    /// Points for a bomb or gust removal. The keystone yields nothing to
    /// area weapons.
    pub fn blast_points(self) -> u64 {
        match self {
            Tier::Light => 5,
            Tier::Medium => 10,
            Tier::Heavy => 15,
            Tier::Keystone => 0,
        }
    }

    /// Fraction of x-velocity removed from the main projectile when it
    /// smashes a block of this tier. The per-kind variance is intentional
    /// balance: the Splitter glides through light debris, the Booster
    /// through medium, the Stone through heavy.
    pub fn projectile_damping(self, kind: Kind) -> f32 {
        match self {
            Tier::Light => match kind {
                Kind::Splitter => 0.05,
                _ => 0.10,
            },
            Tier::Medium => match kind {
                Kind::Stone => 0.10,
                Kind::Booster => 0.05,
                _ => 0.15,
            },
            Tier::Heavy => match kind {
                Kind::Stone => 0.10,
                _ => 0.25,
            },
            Tier::Keystone => 0.0,
        }
    }

    /// Fraction of x-velocity removed from a scatter sibling on a strike.
    pub fn scatter_damping(self) -> f32 {
        match self {
            Tier::Light | Tier::Medium => 0.10,
            Tier::Heavy => 0.25,
            Tier::Keystone => 0.0,
        }
    }
}

/// Discrete signals consumed by the external round/menu state machine. The
/// core emits these; it never decides win/lose transitions itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// The active projectile left the playfield.
    ProjectileSpent { remaining: u32 },
    /// The last projectile was spent.
    AmmoExhausted,
    /// Every enemy has been removed.
    EnemiesCleared,
}

/// Complete per-round simulation state. Mutated exclusively by
/// [`tick`](crate::sim::tick::tick); single-threaded, frame-stepped.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Bounds bodies must stay within.
    pub playfield: Rect,
    /// Where the active projectile sits before launch.
    pub launch_anchor: Vec2,

    /// Block registry, tier-indexed (see [`Tier::of_block`]).
    pub blocks: Vec<Body>,
    pub enemies: Vec<Body>,
    pub platforms: Vec<Body>,
    pub projectiles: Vec<Body>,
    pub scatter: Vec<Body>,
    pub bomb: Body,

    /// Index of the launchable projectile.
    pub active: usize,
    /// Shots remaining, including the active one.
    pub projectiles_left: u32,
    /// Enemies removed so far this round.
    pub enemies_hit: usize,
    /// Running score; non-decreasing within a round.
    pub score: u64,

    /// A launched projectile is mid-flight.
    pub flying: bool,
    /// One-shot ability latch for the current flight.
    pub ability_spent: bool,

    /// Simulation frame counter.
    pub time_ticks: u64,

    /// Signals produced since the last drain.
    #[serde(skip)]
    pub events: Vec<RoundEvent>,
    cleared_signalled: bool,
}

impl GameState {
    /// Empty registries; every body hidden until the level setup places it.
    pub fn new(playfield: Rect, launch_anchor: Vec2) -> Self {
        Self {
            playfield,
            launch_anchor,
            blocks: vec![Body::hidden(); NUM_BLOCKS],
            enemies: vec![Body::hidden(); NUM_ENEMIES],
            platforms: vec![Body::hidden(); NUM_PLATFORMS],
            projectiles: vec![Body::hidden(); NUM_PROJECTILES],
            scatter: vec![Body::hidden(); NUM_SCATTER],
            bomb: Body::hidden(),
            active: 0,
            projectiles_left: NUM_PROJECTILES as u32,
            enemies_hit: 0,
            score: 0,
            flying: false,
            ability_spent: false,
            time_ticks: 0,
            events: Vec::new(),
            cleared_signalled: false,
        }
    }

    /// Ability of the projectile currently on the sling.
    pub fn active_kind(&self) -> Kind {
        Kind::of_index(self.active)
    }

    /// Release the active projectile with the given velocity.
    pub fn launch(&mut self, vel: Vec2) {
        let active = self.active;
        if let Some(p) = self.projectiles.get_mut(active) {
            if p.visible {
                p.vel = vel;
                self.flying = true;
            }
        }
    }

    /// Seat the next surviving projectile on the launch anchor and queue the
    /// rest on the support platform (platform 0). Called after a shot is
    /// spent; the external level setup calls it once at round start too.
    pub fn reseat_projectiles(&mut self) {
        let anchor = self.launch_anchor;
        let queue = self.platforms[0].bounds;
        let slot = self.playfield.height * PROJECTILE_SIZE;
        let mut seated = 0u32;
        let mut first = true;
        for (i, p) in self.projectiles.iter_mut().enumerate() {
            if !p.visible {
                continue;
            }
            if first {
                first = false;
                p.set_pos(anchor);
                self.active = i;
            } else {
                p.set_pos(Vec2::new(
                    queue.right() - (seated - 1) as f32 * 1.5 * slot,
                    queue.y - p.bounds.height,
                ));
            }
            p.vel = Vec2::ZERO;
            seated += 1;
        }
    }

    /// Push a signal for the external round machine.
    pub(crate) fn signal(&mut self, event: RoundEvent) {
        log::debug!("round event: {:?}", event);
        self.events.push(event);
    }

    /// Emit `EnemiesCleared` exactly once per round.
    pub(crate) fn check_cleared(&mut self) {
        if !self.cleared_signalled && self.enemies_hit == self.enemies.len() {
            self.cleared_signalled = true;
            self.signal(RoundEvent::EnemiesCleared);
        }
    }

    /// Hand accumulated signals to the caller.
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_table_by_index() {
        assert_eq!(Tier::of_block(0), Tier::Light);
        assert_eq!(Tier::of_block(9), Tier::Light);
        assert_eq!(Tier::of_block(10), Tier::Medium);
        assert_eq!(Tier::of_block(29), Tier::Medium);
        assert_eq!(Tier::of_block(30), Tier::Heavy);
        assert_eq!(Tier::of_block(39), Tier::Heavy);
        assert_eq!(Tier::of_block(40), Tier::Keystone);
    }

    #[test]
    fn test_damping_matrix_spot_checks() {
        // Light debris: Splitter glides, everyone else loses 10%
        assert_eq!(Tier::Light.projectile_damping(Kind::Splitter), 0.05);
        assert_eq!(Tier::Light.projectile_damping(Kind::Gust), 0.10);
        // Medium: Stone 10%, Booster 5%, rest 15%
        assert_eq!(Tier::Medium.projectile_damping(Kind::Stone), 0.10);
        assert_eq!(Tier::Medium.projectile_damping(Kind::Booster), 0.05);
        assert_eq!(Tier::Medium.projectile_damping(Kind::Bomber), 0.15);
        // Heavy: everyone 25% but the Stone
        assert_eq!(Tier::Heavy.projectile_damping(Kind::Gust), 0.25);
        assert_eq!(Tier::Heavy.projectile_damping(Kind::Stone), 0.10);
        // Keystone never damps
        assert_eq!(Tier::Keystone.projectile_damping(Kind::Stone), 0.0);
        assert_eq!(Tier::Keystone.scatter_damping(), 0.0);
    }

    #[test]
    fn test_reseat_picks_next_visible() {
        let mut state = GameState::new(
            Rect::new(0.0, 0.0, 1000.0, 800.0),
            Vec2::new(100.0, 500.0),
        );
        state.platforms[0] = Body::placed(Rect::new(50.0, 600.0, 200.0, 20.0));
        for p in &mut state.projectiles {
            *p = Body::placed(Rect::new(0.0, 0.0, 24.0, 24.0));
        }
        state.projectiles[0].dismiss();
        state.projectiles[1].dismiss();
        state.reseat_projectiles();
        assert_eq!(state.active, 2);
        assert_eq!(state.projectiles[2].pos(), Vec2::new(100.0, 500.0));
        // Queued shots rest on top of the support platform
        assert_eq!(state.projectiles[3].bounds.bottom(), 600.0);
    }

    #[test]
    fn test_enemies_cleared_signalled_once() {
        let mut state = GameState::new(
            Rect::new(0.0, 0.0, 1000.0, 800.0),
            Vec2::new(100.0, 500.0),
        );
        state.enemies_hit = state.enemies.len();
        state.check_cleared();
        state.check_cleared();
        let events = state.drain_events();
        assert_eq!(events, vec![RoundEvent::EnemiesCleared]);
        assert!(state.drain_events().is_empty());
    }
}
