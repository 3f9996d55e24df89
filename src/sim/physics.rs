//! Per-tick ball integration and wall reflection
//!
//! Balls are independent during this pass. Positions are not clamped, so a
//! ball may overshoot a wall by up to one tick of travel before it comes back.

use glam::Vec2;
use rand::Rng;

use super::state::{Arena, Axis, Ball, GameEvent};
use crate::consts::SPARKLE_CHANCE;
use crate::palette;
use crate::speed_multiplier;

/// Reflect one velocity component off a wall.
///
/// Returns true when the component actually reversed, which is what counts
/// as a bounce. A ball already heading back into the arena is left alone.
#[inline]
fn reflect_axis(pos: f32, vel: &mut f32, max: f32) -> bool {
    if pos <= 0.0 && *vel < 0.0 {
        *vel = -*vel;
        true
    } else if pos >= max && *vel > 0.0 {
        *vel = -*vel;
        true
    } else {
        false
    }
}

/// Advance a single ball by one tick, pushing any bounce events
pub fn step_ball(ball: &mut Ball, arena: &Arena, events: &mut Vec<GameEvent>) {
    ball.record_trail();

    ball.pos += ball.vel / speed_multiplier(ball.value);

    let max = arena.max_pos(ball.size());
    let mut bounce = |axis: Axis, ball: &Ball| {
        events.push(GameEvent::Bounce {
            ball_id: ball.id,
            axis,
            value: ball.value,
            pos: ball.pos,
            earned: 0.0,
        });
    };

    // Axes are independent; a corner hit bounces twice
    if reflect_axis(ball.pos.x, &mut ball.vel.x, max.x) {
        bounce(Axis::X, ball);
    }
    if reflect_axis(ball.pos.y, &mut ball.vel.y, max.y) {
        bounce(Axis::Y, ball);
    }
}

/// Run the physics pass over every ball
pub fn step_physics<R: Rng + ?Sized>(
    balls: &mut [Ball],
    arena: &Arena,
    rng: &mut R,
    events: &mut Vec<GameEvent>,
) {
    for ball in balls.iter_mut() {
        step_ball(ball, arena, events);

        // Always roll so cosmetic settings never change the RNG stream
        if rng.random_bool(SPARKLE_CHANCE) {
            let count = palette::sparkle_count(ball.value);
            if count > 0 {
                let jitter = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5);
                events.push(GameEvent::Sparkle {
                    ball_id: ball.id,
                    pos: ball.center() + jitter * ball.size(),
                    count,
                });
            }
        }
    }
}
