//! Collision detection and impulse response
//!
//! The geometric predicates and bounce math for the engine. Bodies are
//! treated as circles of radius equal to their rect width for contact
//! confirmation; the overlap candidate test is the coarse containment check
//! from [`rect`](super::rect). Pure functions: callers filter visibility and
//! write results back to the registries.

use super::rect::{coarse_overlap, is_between, Rect};
use super::vec2::Vec2;
use crate::consts::*;

/// Corrected position and post-bounce velocity for a body that contacted a
/// platform.
#[derive(Debug, Clone, Copy)]
pub struct BounceResponse {
    pub pos: Vec2,
    pub vel: Vec2,
}

/// Resolve a moving body against a single platform.
///
/// Returns `None` when there is no confirmed contact. On contact, applies
/// the restitution impulse (only while the body is still approaching,
/// `vn <= 0`), flips and damps both velocity axes, and walks the position
/// out of penetration. `y_damping` is 0.8 on the main-projectile path and
/// 0.2 on the scatter path; the two call sites are deliberately different.
pub fn platform_bounce(
    bounds: &Rect,
    vel: Vec2,
    platform: &Rect,
    y_damping: f32,
) -> Option<BounceResponse> {
    if !coarse_overlap(bounds, platform) {
        return None;
    }

    let body_pos = bounds.pos();
    let platform_pos = platform.pos();
    let delta = body_pos.sub(platform_pos);
    let mut dist = body_pos.distance(platform_pos);
    let radius = bounds.width;
    if dist > radius {
        return None;
    }

    let axis = if delta.magnitude() != 0.0 {
        delta.scale((radius - delta.magnitude()) / delta.magnitude())
    } else {
        // Exact-center overlap. No direction to reflect along, so take a
        // unit axis on +x scaled against radius - 1 to keep the divisor
        // nonzero.
        Vec2::new(radius, 0.0).scale((radius - (radius - 1.0)) / (radius - 1.0))
    };

    let mut pos = body_pos;
    let mut vel = vel;
    let vn = vel.scalar(axis.normalise());
    if vn <= 0.0 {
        let im1 = 1.0;
        let im2 = 10.0;
        let imp = (-(1.0 + RESTITUTION) * vn) / (im1 + im2);
        vel = vel.add(axis.scale(imp).scale(im1));
        vel = Vec2::new(0.0 - vel.x * 0.8, 0.0 - vel.y * y_damping);

        // Walk the position along the bounced velocity until the pair
        // separates. Bounded: a zero bounced velocity never separates, so
        // fall back to a direct snap past the contact radius.
        let mut steps = 0u32;
        while dist <= radius + CORRECTION_EPSILON {
            if steps >= MAX_CORRECTION_STEPS {
                pos = snap_outside(platform_pos, pos, radius);
                break;
            }
            pos = pos.add(vel);
            dist = pos.distance(platform_pos);
            steps += 1;
        }
    }

    Some(BounceResponse { pos, vel })
}

/// Place `pos` just outside the contact radius around `center`, along the
/// existing separation direction (+x when the two coincide).
fn snap_outside(center: Vec2, pos: Vec2, radius: f32) -> Vec2 {
    let len = center.distance(pos);
    let dir = if len != 0.0 {
        Vec2::new((pos.x - center.x) / len, (pos.y - center.y) / len)
    } else {
        Vec2::new(1.0, 0.0)
    };
    center.add(dir.scale(radius + 2.0 * CORRECTION_EPSILON))
}

/// Is the enemy aligned to rest on top of this block? Vertical extents must
/// overlap the block top and the enemy's horizontal center must sit within
/// the block span padded by half the enemy's width.
pub fn rests_on_block(enemy: &Rect, block: &Rect) -> bool {
    enemy.bottom() > block.y
        && is_between(
            enemy.center_x(),
            block.x - enemy.width * 0.5,
            block.right() + enemy.width * 0.5,
        )
}

/// Is the enemy aligned to rest on top of this platform? Platforms get a
/// vertical band test as well as the horizontal one.
pub fn rests_on_platform(enemy: &Rect, platform: &Rect) -> bool {
    is_between(
        enemy.center_y(),
        platform.y - enemy.height * 0.5,
        platform.bottom(),
    ) && is_between(
        enemy.center_x(),
        platform.x - enemy.width * 0.5,
        platform.right() + enemy.width * 0.5,
    )
}

/// The expanded area-of-effect rect for a detonated bomb: centered on the
/// bomb, extents `BLAST_SCALE` times its size.
pub fn blast_rect(bomb: &Rect) -> Rect {
    let spill = (BLAST_SCALE - 1.0) * 0.5 * bomb.width;
    Rect::new(
        bomb.x - spill,
        bomb.y - spill,
        bomb.width * BLAST_SCALE,
        bomb.height * BLAST_SCALE,
    )
}

/// The gust ability's sweep rect: in front of the projectile, four widths
/// long and three heights tall.
pub fn gust_rect(projectile: &Rect) -> Rect {
    Rect::new(
        projectile.x + projectile.width,
        projectile.y - projectile.height,
        projectile.width * 4.0,
        projectile.height * 3.0,
    )
}

/// True when any edge of `bounds` has left the playfield.
pub fn escapes_playfield(bounds: &Rect, field: &Rect) -> bool {
    bounds.x < field.x
        || bounds.y < field.y
        || bounds.right() > field.right()
        || bounds.bottom() > field.bottom()
}
