//! Sling Siege - a slingshot projectile puzzle physics core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (vectors, rects, collisions, frame step)
//!
//! Rendering, input devices, menus, and persistence are external
//! collaborators: they place bodies before a round and consume score,
//! visibility, and round events after each frame. Nothing in this crate
//! draws, reads files, or touches the network.

pub mod sim;

pub use sim::state::{Body, GameState, Kind, RoundEvent};
pub use sim::tick::{tick, TickInput};

/// Game tuning constants
pub mod consts {
    /// Fraction of approach speed returned after a bounce.
    pub const RESTITUTION: f32 = 0.8;

    /// Registry capacities, fixed for the lifetime of a round.
    pub const NUM_PROJECTILES: usize = 5;
    pub const NUM_SCATTER: usize = 2;
    pub const NUM_ENEMIES: usize = 6;
    pub const NUM_BLOCKS: usize = 41;
    pub const NUM_PLATFORMS: usize = 10;

    /// Projectile and bomb sprite sizes as fractions of playfield height.
    pub const PROJECTILE_SIZE: f32 = 0.03;
    pub const BOMB_SIZE: f32 = 0.01;

    /// Position advance per unit velocity per second.
    pub const VELOCITY_SCALE: f32 = 5.0;
    /// Downward acceleration on a flying projectile.
    pub const PROJECTILE_GRAVITY: f32 = 8.0;
    /// Horizontal air drag on a flying projectile (fraction per second).
    pub const PROJECTILE_DRAG: f32 = 0.05;

    /// Enemy fall: position advance per unit of vertical velocity per second.
    pub const ENEMY_FALL_SCALE: f32 = 50.0;
    /// Downward acceleration on an unsupported enemy.
    pub const ENEMY_GRAVITY: f32 = 20.0;
    /// Vertical velocity an unsupported enemy resets to before gravity.
    pub const ENEMY_BASE_FALL: f32 = 1.0;

    /// Points for removing an enemy, flat regardless of what struck it.
    pub const ENEMY_POINTS: u64 = 150;

    /// Separation margin required after penetration correction.
    pub const CORRECTION_EPSILON: f32 = 0.01;
    /// Iteration cap on the penetration-correction walk. A bounced velocity
    /// of exactly zero never separates the pair, so the walk must be bounded
    /// and fall back to a direct snap.
    pub const MAX_CORRECTION_STEPS: u32 = 64;

    /// Blast rect extent as a multiple of the bomb's own size.
    pub const BLAST_SCALE: f32 = 9.0;

    /// Vertical speed offset applied to each scatter sibling at release.
    pub const SCATTER_SPREAD: f32 = 4.0;
}
