//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed tick only
//! - Seeded RNG only
//! - Stable iteration order (collection order, highest index first for merges)
//! - No rendering or platform dependencies

pub mod achievements;
pub mod economy;
pub mod merge;
pub mod physics;
pub mod scheduler;
pub mod state;
pub mod tick;

pub use achievements::{Achievement, AchievementBook, AchievementId, Trigger};
pub use merge::{can_merge, find_merge_pairs, resolve_merges};
pub use physics::step_physics;
pub use scheduler::{Interval, Scheduler, Timer};
pub use state::{Arena, Axis, Ball, GameEvent, GameState, Pin, TrailPoint};
pub use tick::tick;
