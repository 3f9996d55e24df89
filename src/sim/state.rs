//! Game state and core simulation types
//!
//! Everything persisted between sessions lives in [`GameState`].

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::achievements::{AchievementBook, AchievementId};
use crate::consts::*;
use crate::{ball_radius, ball_size, speed_multiplier};

/// Trail point for ball rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrailPoint {
    /// Ball center when recorded
    pub pos: Vec2,
    /// Visibility weight, fades as the point ages
    pub opacity: f32,
}

/// A ball entity
///
/// `pos` is the top-left corner of the ball's bounding square, so a ball in
/// bounds satisfies `0 <= pos <= arena - size` on each axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub id: u32,
    pub pos: Vec2,
    /// Raw velocity, divided by `speed_multiplier(value)` at integration time
    pub vel: Vec2,
    /// Power-of-two tier
    pub value: u64,
    /// Trail history (oldest first)
    #[serde(default)]
    pub trail: VecDeque<TrailPoint>,
}

impl Ball {
    pub fn new(id: u32, pos: Vec2, vel: Vec2, value: u64) -> Self {
        Self {
            id,
            pos,
            vel,
            value,
            trail: VecDeque::with_capacity(TRAIL_LENGTH + 1),
        }
    }

    pub fn size(&self) -> f32 {
        ball_size(self.value)
    }

    pub fn radius(&self) -> f32 {
        ball_radius(self.value)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.radius())
    }

    /// Record current center to trail, fading and evicting older points
    pub fn record_trail(&mut self) {
        for point in self.trail.iter_mut() {
            point.opacity *= TRAIL_FADE;
        }
        self.trail.push_back(TrailPoint {
            pos: self.center(),
            opacity: TRAIL_OPACITY,
        });
        while self.trail.len() > TRAIL_LENGTH {
            self.trail.pop_front();
        }
    }
}

/// A pin slot bought through upgrades (not yet used by the simulation)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    pub active: bool,
}

/// Playfield bounds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
        }
    }
}

impl Arena {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Largest in-bounds top-left coordinate for a ball of this size
    pub fn max_pos(&self, size: f32) -> Vec2 {
        Vec2::new(self.width - size, self.height - size)
    }
}

/// Boundary axis of a bounce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
}

/// Events emitted by the simulation for the economy and renderers
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Spawned {
        ball_id: u32,
    },
    Bounce {
        ball_id: u32,
        axis: Axis,
        value: u64,
        pos: Vec2,
        /// Filled in by the economy once credited
        earned: f64,
    },
    Merge {
        consumed: (u32, u32),
        ball_id: u32,
        value: u64,
        pos: Vec2,
        earned: f64,
    },
    /// Cosmetic only
    Sparkle {
        ball_id: u32,
        pos: Vec2,
        count: u32,
    },
    AchievementUnlocked {
        id: AchievementId,
        name: &'static str,
        reward: f64,
    },
}

/// Complete persisted game state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GameState {
    pub money: f64,
    pub level: u32,
    /// Per-bounce profit multiplier
    pub ball_profit: u32,
    pub pins: Vec<Pin>,
    pub balls: Vec<Ball>,
    /// Spawn quota
    pub available_balls: u32,
    pub auto_spawn_active: bool,
    pub total_merges: u64,
    pub total_bounces: u64,
    pub current_streak: u32,
    pub is_hard_mode: bool,
    pub achievements: AchievementBook,
    /// Next entity ID
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            money: INITIAL_MONEY,
            level: INITIAL_LEVEL,
            ball_profit: INITIAL_BALL_PROFIT,
            pins: Vec::new(),
            balls: Vec::new(),
            available_balls: INITIAL_AVAILABLE_BALLS,
            auto_spawn_active: false,
            total_merges: 0,
            total_bounces: 0,
            current_streak: 0,
            is_hard_mode: false,
            achievements: AchievementBook::default(),
            next_id: 1,
        }
    }
}

impl GameState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        // Saves written before ids existed, or hand-edited ones, may collide
        if let Some(max) = self.balls.iter().map(|b| b.id).max() {
            self.next_id = self.next_id.max(max.saturating_add(1));
        }
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }

    /// Spawn a value-2 ball at a random in-bounds position.
    ///
    /// Consumes one unit of spawn quota; does nothing when the quota is empty.
    pub fn spawn_ball<R: Rng + ?Sized>(&mut self, arena: &Arena, rng: &mut R) -> Option<u32> {
        if self.available_balls == 0 {
            return None;
        }

        let max = arena.max_pos(ball_size(SPAWN_VALUE)).max(Vec2::ZERO);
        let pos = Vec2::new(rng.random::<f32>() * max.x, rng.random::<f32>() * max.y);

        let speed = SPAWN_SPEED * speed_multiplier(SPAWN_VALUE);
        let vel = Vec2::new(
            rng.random_range(-speed..=speed),
            rng.random_range(-speed..=speed),
        );

        let id = self.next_entity_id();
        self.balls.push(Ball::new(id, pos, vel, SPAWN_VALUE));
        self.available_balls -= 1;
        log::debug!("Spawned ball {} at ({:.1}, {:.1})", id, pos.x, pos.y);
        Some(id)
    }

    /// Credit currency
    pub fn add_money(&mut self, amount: f64) {
        self.money += amount;
    }

    /// Wipe all progress back to a fresh-start economy
    pub fn reset_progress(&mut self) {
        self.money = RESET_MONEY;
        self.level = RESET_LEVEL;
        self.ball_profit = INITIAL_BALL_PROFIT;
        self.available_balls = RESET_AVAILABLE_BALLS;
        self.pins.clear();
        self.balls.clear();
        self.auto_spawn_active = false;
        self.total_merges = 0;
        self.total_bounces = 0;
        self.current_streak = 0;
        self.is_hard_mode = false;
        self.achievements.reset();
        self.next_id = 1;
    }
}
