//! Economy feedback: turns bounce and merge events into currency, counters
//! and achievement checks.

use super::achievements::{Progress, Trigger};
use super::state::{GameEvent, GameState};

/// Evaluate achievements for `trigger`, paying rewards immediately.
///
/// Unlock events are appended to `out`.
pub fn check_achievements(
    state: &mut GameState,
    trigger: Trigger,
    payload: Option<u64>,
    out: &mut Vec<GameEvent>,
) {
    let progress = Progress {
        money: state.money,
        total_merges: state.total_merges,
        total_bounces: state.total_bounces,
    };
    for def in state.achievements.evaluate(trigger, payload, &progress) {
        state.add_money(def.reward);
        log::info!("Achievement unlocked: {} (+{})", def.name, def.reward);
        out.push(GameEvent::AchievementUnlocked {
            id: def.id,
            name: def.name,
            reward: def.reward,
        });
    }
}

/// Currency earned by a ball of `value` at the current profit level
pub fn profit_for(state: &GameState, value: u64) -> f64 {
    value as f64 * state.ball_profit as f64
}

/// Credit one wall bounce. Returns the amount earned.
pub fn on_bounce(state: &mut GameState, value: u64, out: &mut Vec<GameEvent>) -> f64 {
    let earned = profit_for(state, value);
    state.add_money(earned);
    check_achievements(state, Trigger::Money, None, out);

    state.total_bounces += 1;
    check_achievements(state, Trigger::Bounce, None, out);
    earned
}

/// Credit one merge producing a ball of `value`. Returns the amount earned.
pub fn on_merge(state: &mut GameState, value: u64, out: &mut Vec<GameEvent>) -> f64 {
    let earned = profit_for(state, value);
    state.add_money(earned);

    state.total_merges += 1;
    check_achievements(state, Trigger::Merge, Some(value), out);
    earned
}

/// Apply every bounce and merge in `events`, in order.
///
/// Fills in each event's `earned` amount and appends any achievement unlocks
/// after the events that caused them.
pub fn apply_events(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let mut unlocks = Vec::new();
    for event in events.iter_mut() {
        match event {
            GameEvent::Bounce { value, earned, .. } => {
                *earned = on_bounce(state, *value, &mut unlocks);
            }
            GameEvent::Merge { value, earned, .. } => {
                *earned = on_merge(state, *value, &mut unlocks);
            }
            _ => {}
        }
    }
    events.extend(unlocks);
}
