//! Bounce Merge - an idle bounce-and-merge ball game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, merges, economy, achievements)
//! - `session`: Owns the game state and drives the simulation timers
//! - `render`: Rendering collaborator interface
//! - `persistence`: Versioned save/load
//! - `settings`: Runtime configuration
//! - `upgrades`: Upgrade pricing and purchase flow
//! - `minigame`: Colour-guessing side game

pub mod minigame;
pub mod palette;
pub mod persistence;
pub mod render;
pub mod session;
pub mod settings;
pub mod sim;
pub mod upgrades;

pub use session::Session;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation tick period (milliseconds)
    pub const TICK_MS: u32 = 50;
    /// Default auto-spawn period (milliseconds)
    pub const AUTO_SPAWN_MS: u32 = 1000;

    /// Default arena dimensions (pixels)
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Trail capacity per ball
    pub const TRAIL_LENGTH: usize = 10;
    /// Visibility weight of a freshly recorded trail point
    pub const TRAIL_OPACITY: f32 = 0.8;
    /// Per-tick decay applied to older trail points
    pub const TRAIL_FADE: f32 = 0.85;

    /// Value of a freshly spawned ball
    pub const SPAWN_VALUE: u64 = 2;
    /// Highest tier a ball can reach; balls at the cap no longer merge
    pub const MAX_TIER: u64 = 1 << 62;
    /// Raw spawn velocity range is [-SPAWN_SPEED, SPAWN_SPEED] per axis
    pub const SPAWN_SPEED: f32 = 2.5;

    /// Chance per tick per ball of a cosmetic sparkle
    pub const SPARKLE_CHANCE: f64 = 0.05;

    /// Starting economy
    pub const INITIAL_MONEY: f64 = 100_000.0;
    pub const INITIAL_LEVEL: u32 = 7;
    pub const INITIAL_BALL_PROFIT: u32 = 1;
    pub const INITIAL_AVAILABLE_BALLS: u32 = 5;

    /// Economy after a full progress reset
    pub const RESET_MONEY: f64 = 0.0;
    pub const RESET_LEVEL: u32 = 1;
    pub const RESET_AVAILABLE_BALLS: u32 = 1;
}

/// Rendered diameter of a ball of the given value
#[inline]
pub fn ball_size(value: u64) -> f32 {
    28.0 + value as f32 / 2.0
}

/// Collision radius of a ball of the given value
#[inline]
pub fn ball_radius(value: u64) -> f32 {
    ball_size(value) / 2.0
}

/// Velocity damping divisor; higher tiers drift more slowly
#[inline]
pub fn speed_multiplier(value: u64) -> f32 {
    1.0 + (value.max(1) as f32).log2() * 0.1
}

/// A ball value is valid when it is a power of two in `2..=MAX_TIER`
#[inline]
pub fn is_valid_tier(value: u64) -> bool {
    (2..=consts::MAX_TIER).contains(&value) && value.is_power_of_two()
}
