//! Deterministic simulation module
//!
//! All gameplay logic lives here. The module is pure and deterministic:
//! - Fixed frame steps only, one `tick` per frame
//! - Fixed evaluation order (enemies settle, then the active projectile
//!   against platforms, blocks, enemies, boundary, then scatter, then the
//!   bomb) - the order is an observable scoring contract
//! - Fixed-capacity registries with stable indices, never resized mid-round
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;
pub mod vec2;

pub use collision::{
    blast_rect, escapes_playfield, gust_rect, platform_bounce, rests_on_block, rests_on_platform,
    BounceResponse,
};
pub use rect::{coarse_overlap, is_between, Rect};
pub use state::{Body, GameState, Kind, RoundEvent, Tier};
pub use tick::{tick, TickInput};
pub use vec2::Vec2;
