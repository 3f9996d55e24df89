//! Pairwise merge detection and resolution
//!
//! Two balls merge when they share a value and their centers are closer than
//! the sum of their radii. The scan is a plain O(n²) pass over unordered
//! pairs, outer index from last to first and inner index from `outer - 1`
//! down to 0, so higher-index pairs win ties.
//!
//! Every non-overlapping qualifying pair found in one pass is resolved in the
//! same tick. A ball already claimed by an earlier pair is skipped, and the
//! balls created by this pass only become merge candidates on the next tick.

use glam::Vec2;

use super::state::{Ball, GameEvent, GameState};
use crate::consts::MAX_TIER;
use crate::speed_multiplier;

/// Whether two balls qualify for a merge
#[inline]
pub fn can_merge(a: &Ball, b: &Ball) -> bool {
    a.value == b.value
        && a.value < MAX_TIER
        && a.center().distance(b.center()) < a.radius() + b.radius()
}

/// Find the pairs to merge this tick, in resolution order.
///
/// Each index appears in at most one pair; pairs are `(outer, inner)` with
/// `outer > inner`.
pub fn find_merge_pairs(balls: &[Ball]) -> Vec<(usize, usize)> {
    let mut claimed = vec![false; balls.len()];
    let mut pairs = Vec::new();

    for i in (0..balls.len()).rev() {
        if claimed[i] {
            continue;
        }
        for j in (0..i).rev() {
            if claimed[j] {
                continue;
            }
            if can_merge(&balls[i], &balls[j]) {
                claimed[i] = true;
                claimed[j] = true;
                pairs.push((i, j));
                break;
            }
        }
    }

    pairs
}

/// Build the ball that replaces `a` and `b`
pub fn merged_ball(id: u32, a: &Ball, b: &Ball) -> Ball {
    let value = a.value * 2;
    let pos = midpoint(a.pos, b.pos);
    let vel = (a.vel + b.vel) / 2.0 * speed_multiplier(value);
    Ball::new(id, pos, vel, value)
}

/// Resolve every merge for this tick, pushing one `Merge` event per pair.
///
/// Survivors keep their relative order; merged balls are appended in
/// resolution order. Returns the number of merges.
pub fn resolve_merges(state: &mut GameState, events: &mut Vec<GameEvent>) -> usize {
    let pairs = find_merge_pairs(&state.balls);
    if pairs.is_empty() {
        return 0;
    }

    let mut merged = Vec::with_capacity(pairs.len());
    for &(i, j) in &pairs {
        let id = state.next_entity_id();
        let (a, b) = (&state.balls[i], &state.balls[j]);
        let ball = merged_ball(id, a, b);
        log::debug!(
            "Merged balls {} + {} -> {} (value {})",
            a.id,
            b.id,
            ball.id,
            ball.value
        );
        events.push(GameEvent::Merge {
            consumed: (a.id, b.id),
            ball_id: ball.id,
            value: ball.value,
            pos: ball.pos,
            earned: 0.0,
        });
        merged.push(ball);
    }

    let mut consumed = vec![false; state.balls.len()];
    for &(i, j) in &pairs {
        consumed[i] = true;
        consumed[j] = true;
    }

    let old = std::mem::take(&mut state.balls);
    state.balls = old
        .into_iter()
        .zip(consumed)
        .filter_map(|(ball, gone)| (!gone).then_some(ball))
        .chain(merged)
        .collect();

    pairs.len()
}

/// Midpoint of two positions
#[inline]
pub fn midpoint(a: Vec2, b: Vec2) -> Vec2 {
    (a + b) / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ball_radius;
    use proptest::prelude::*;

    fn ball(id: u32, x: f32, y: f32, value: u64) -> Ball {
        Ball::new(id, Vec2::new(x, y), Vec2::new(1.0, -1.0), value)
    }

    fn state_with(balls: Vec<Ball>) -> GameState {
        let mut state = GameState::new();
        state.balls = balls;
        state
    }

    #[test]
    fn test_equal_values_within_radius_merge() {
        let a = ball(1, 100.0, 100.0, 4);
        let b = ball(2, 110.0, 105.0, 4);
        let expected = midpoint(a.pos, b.pos);
        let mut state = state_with(vec![a, b, ball(3, 500.0, 500.0, 2)]);
        let mut events = Vec::new();

        assert_eq!(resolve_merges(&mut state, &mut events), 1);

        assert_eq!(state.balls.len(), 2);
        assert!(state.balls.iter().all(|b| b.id != 1 && b.id != 2));
        let merged: Vec<_> = state.balls.iter().filter(|b| b.value == 8).collect();
        assert_eq!(merged.len(), 1);
        assert!(merged[0].pos.distance(expected) < 1e-4);
        assert!(merged[0].trail.is_empty());
        assert!(matches!(
            events[0],
            GameEvent::Merge { consumed: (2, 1), value: 8, .. }
        ));
    }

    #[test]
    fn test_threshold_is_sum_of_radii() {
        let r = ball_radius(4);
        let touching = vec![ball(1, 0.0, 0.0, 4), ball(2, 2.0 * r - 0.01, 0.0, 4)];
        assert_eq!(find_merge_pairs(&touching), vec![(1, 0)]);

        let apart = vec![ball(1, 0.0, 0.0, 4), ball(2, 2.0 * r, 0.0, 4)];
        assert!(find_merge_pairs(&apart).is_empty());
    }

    #[test]
    fn test_different_values_never_merge() {
        let balls = vec![ball(1, 0.0, 0.0, 4), ball(2, 1.0, 1.0, 8)];
        assert!(find_merge_pairs(&balls).is_empty());
    }

    #[test]
    fn test_merged_velocity_is_scaled_average() {
        let a = Ball::new(1, Vec2::ZERO, Vec2::new(2.0, 0.0), 4);
        let b = Ball::new(2, Vec2::ZERO, Vec2::new(0.0, 4.0), 4);
        let m = merged_ball(9, &a, &b);
        let mult = speed_multiplier(8);
        assert_eq!(m.value, 8);
        assert!((m.vel.x - 1.0 * mult).abs() < 1e-5);
        assert!((m.vel.y - 2.0 * mult).abs() < 1e-5);
    }

    #[test]
    fn test_capped_tier_never_merges() {
        let balls = vec![ball(1, 0.0, 0.0, MAX_TIER), ball(2, 0.0, 0.0, MAX_TIER)];
        assert!(find_merge_pairs(&balls).is_empty());
    }

    #[test]
    fn test_highest_index_pair_wins() {
        // All three overlap; the last ball pairs with the next one down
        let balls = vec![
            ball(1, 0.0, 0.0, 2),
            ball(2, 5.0, 0.0, 2),
            ball(3, 10.0, 0.0, 2),
        ];
        assert_eq!(find_merge_pairs(&balls), vec![(2, 1)]);
    }

    #[test]
    fn test_independent_pairs_resolve_same_tick() {
        let mut state = state_with(vec![
            ball(1, 0.0, 0.0, 2),
            ball(2, 300.0, 300.0, 4),
            ball(3, 5.0, 5.0, 2),
            ball(4, 305.0, 305.0, 4),
        ]);
        let mut events = Vec::new();

        assert_eq!(resolve_merges(&mut state, &mut events), 2);
        let mut values: Vec<_> = state.balls.iter().map(|b| b.value).collect();
        values.sort();
        assert_eq!(values, vec![4, 8]);
        // Pair (3, 1) is found before (2, 0)
        assert!(matches!(events[0], GameEvent::Merge { value: 8, .. }));
        assert!(matches!(events[1], GameEvent::Merge { value: 4, .. }));
    }

    #[test]
    fn test_new_ball_waits_for_next_tick() {
        // 2+2 makes a 4 sitting on an existing 4
        let mut state = state_with(vec![
            ball(1, 0.0, 0.0, 4),
            ball(2, 0.0, 0.0, 2),
            ball(3, 1.0, 0.0, 2),
        ]);
        let mut events = Vec::new();

        assert_eq!(resolve_merges(&mut state, &mut events), 1);
        assert_eq!(state.balls.len(), 2);
        assert_eq!(resolve_merges(&mut state, &mut events), 1);
        assert_eq!(state.balls.len(), 1);
        assert_eq!(state.balls[0].value, 8);
    }

    #[test]
    fn test_merged_ids_are_fresh() {
        let mut state = state_with(vec![ball(7, 0.0, 0.0, 2), ball(9, 1.0, 1.0, 2)]);
        let mut events = Vec::new();
        resolve_merges(&mut state, &mut events);
        assert_eq!(state.balls.len(), 1);
        assert!(state.balls[0].id > 9);
    }

    proptest! {
        #[test]
        fn prop_merges_conserve_value_and_tiers(
            seeds in prop::collection::vec((0.0f32..200.0, 0.0f32..200.0, 1u32..5), 0..40)
        ) {
            let balls: Vec<Ball> = seeds
                .iter()
                .enumerate()
                .map(|(i, &(x, y, t))| ball(i as u32 + 1, x, y, 1u64 << t))
                .collect();
            let total: u64 = balls.iter().map(|b| b.value).sum();
            let count = balls.len();
            let mut state = state_with(balls);
            let mut events = Vec::new();

            let merges = resolve_merges(&mut state, &mut events);

            prop_assert_eq!(state.balls.len(), count - merges);
            prop_assert_eq!(state.balls.iter().map(|b| b.value).sum::<u64>(), total);
            prop_assert!(state.balls.iter().all(|b| crate::is_valid_tier(b.value)));
            let mut ids: Vec<_> = state.balls.iter().map(|b| b.id).collect();
            ids.sort();
            ids.dedup();
            prop_assert_eq!(ids.len(), state.balls.len());
        }
    }
}
