//! Fixed timestep simulation tick
//!
//! One tick runs the physics pass, credits its bounces, resolves merges and
//! credits those. Renderers only see the state after the whole tick.

use rand::Rng;

use super::economy::apply_events;
use super::merge::resolve_merges;
use super::physics::step_physics;
use super::state::{Arena, GameEvent, GameState};

/// Advance the game state by one tick, returning everything that happened
pub fn tick<R: Rng + ?Sized>(state: &mut GameState, arena: &Arena, rng: &mut R) -> Vec<GameEvent> {
    let mut events = Vec::new();

    step_physics(&mut state.balls, arena, rng, &mut events);
    apply_events(state, &mut events);

    let mut merges = Vec::new();
    resolve_merges(state, &mut merges);
    apply_events(state, &mut merges);

    events.extend(merges);
    events
}
