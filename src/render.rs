//! Rendering collaborator interface
//!
//! The simulation never draws. After each tick the session hands the
//! finished state plus that tick's events to a [`Renderer`], which may only
//! read them.

use crate::sim::{GameEvent, GameState};

/// Presentation hooks invoked by the session
pub trait Renderer {
    /// Redraw after a tick (or any other state change) has completed
    fn notify_tick(&mut self, state: &GameState, events: &[GameEvent]);

    /// Fire-and-forget achievement toast
    fn notify_achievement_unlocked(&mut self, name: &str, reward: f64);
}

/// Renderer that ignores everything (headless runs, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn notify_tick(&mut self, _state: &GameState, _events: &[GameEvent]) {}

    fn notify_achievement_unlocked(&mut self, _name: &str, _reward: f64) {}
}

/// Renderer that writes a periodic summary to the log
#[derive(Debug, Clone)]
pub struct LogRenderer {
    /// Log a status line every this many ticks
    pub every: u64,
    ticks: u64,
    merges: u64,
}

impl LogRenderer {
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            ticks: 0,
            merges: 0,
        }
    }
}

impl Default for LogRenderer {
    fn default() -> Self {
        // Once per simulated second
        Self::new(20)
    }
}

impl Renderer for LogRenderer {
    fn notify_tick(&mut self, state: &GameState, events: &[GameEvent]) {
        self.ticks += 1;
        for event in events {
            if let GameEvent::Merge { value, earned, .. } = event {
                self.merges += 1;
                log::debug!("Merge -> {} (+{})", value, earned);
            }
        }
        if self.ticks % self.every == 0 {
            let top = state.balls.iter().map(|b| b.value).max().unwrap_or(0);
            log::info!(
                "tick {}: {} balls (top {}), money {}, bounces {}, merges {}",
                self.ticks,
                state.balls.len(),
                top,
                format_money(state.money),
                state.total_bounces,
                state.total_merges
            );
        }
    }

    fn notify_achievement_unlocked(&mut self, name: &str, reward: f64) {
        log::info!("🏆 {} (+{})", name, format_money(reward));
    }
}

/// Short currency label: 1.5K $, 2.0M $, ...
pub fn format_money(amount: f64) -> String {
    if amount >= 1e12 {
        format!("{:.1}T $", amount / 1e12)
    } else if amount >= 1e9 {
        format!("{:.1}B $", amount / 1e9)
    } else if amount >= 1e6 {
        format!("{:.1}M $", amount / 1e6)
    } else if amount >= 1e3 {
        format!("{:.1}K $", amount / 1e3)
    } else {
        format!("{:.0} $", amount)
    }
}
