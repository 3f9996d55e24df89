//! Colour-guessing mini-game
//!
//! A round shows one of the balls in play and asks for its colour name.
//! Consecutive correct answers build a streak that raises the reward.

use rand::Rng;
use rand::seq::IndexedRandom;

use crate::palette;
use crate::sim::GameState;

pub const BASE_REWARD: f64 = 500.0;
pub const STREAK_BONUS: f64 = 100.0;
pub const HARD_MODE_MULTIPLIER: f64 = 2.0;

pub const OPTIONS_NORMAL: usize = 4;
pub const OPTIONS_HARD: usize = 6;

/// One question
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    /// Value of the ball being shown
    pub ball_value: u64,
    pub answer: &'static str,
    pub options: Vec<&'static str>,
    pub hard: bool,
    answered: bool,
}

impl Round {
    pub fn is_answered(&self) -> bool {
        self.answered
    }

    /// CSS gradient to paint the shown ball with
    pub fn gradient(&self) -> String {
        palette::ball_gradient(self.ball_value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuessOutcome {
    Correct { reward: f64, streak: u32 },
    Wrong { answer: &'static str },
}

/// Reward for reaching `streak` correct answers in a row
pub fn reward_for(streak: u32, hard: bool) -> f64 {
    let reward = BASE_REWARD + streak as f64 * STREAK_BONUS;
    if hard {
        reward * HARD_MODE_MULTIPLIER
    } else {
        reward
    }
}

/// Start a round, or `None` with no balls in play
pub fn start_round<R: Rng + ?Sized>(state: &GameState, rng: &mut R) -> Option<Round> {
    let ball = state.balls.choose(rng)?;
    let answer = palette::color_name(ball.value);
    let hard = state.is_hard_mode;
    let count = if hard { OPTIONS_HARD } else { OPTIONS_NORMAL };

    let decoys: Vec<&'static str> = palette::color_names().filter(|n| *n != answer).collect();
    let mut options: Vec<&'static str> = decoys.choose_multiple(rng, count - 1).copied().collect();
    let slot = rng.random_range(0..=options.len());
    options.insert(slot, answer);

    Some(Round {
        ball_value: ball.value,
        answer,
        options,
        hard,
        answered: false,
    })
}

/// Answer a round. `None` if it was already answered.
pub fn guess(state: &mut GameState, round: &mut Round, name: &str) -> Option<GuessOutcome> {
    if round.answered {
        return None;
    }
    round.answered = true;

    if name == round.answer {
        state.current_streak += 1;
        let reward = reward_for(state.current_streak, round.hard);
        state.add_money(reward);
        log::info!(
            "Mini-game correct: +{} (streak {})",
            reward,
            state.current_streak
        );
        Some(GuessOutcome::Correct {
            reward,
            streak: state.current_streak,
        })
    } else {
        state.current_streak = 0;
        log::info!("Mini-game wrong, answer was {}", round.answer);
        Some(GuessOutcome::Wrong {
            answer: round.answer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Ball;
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn state_with(values: &[u64]) -> GameState {
        let mut state = GameState::new();
        state.balls = values
            .iter()
            .enumerate()
            .map(|(i, &v)| Ball::new(i as u32 + 1, Vec2::splat(100.0), Vec2::ZERO, v))
            .collect();
        state
    }

    #[test]
    fn test_no_round_without_balls() {
        let state = GameState::new();
        assert!(start_round(&state, &mut Pcg32::seed_from_u64(1)).is_none());
    }

    #[test]
    fn test_round_shape() {
        let mut state = state_with(&[16]);
        let round = start_round(&state, &mut Pcg32::seed_from_u64(1)).unwrap();
        assert_eq!(round.answer, "Green");
        assert_eq!(round.options.len(), 4);
        assert_eq!(round.options.iter().filter(|o| **o == "Green").count(), 1);

        state.is_hard_mode = true;
        let round = start_round(&state, &mut Pcg32::seed_from_u64(1)).unwrap();
        assert_eq!(round.options.len(), 6);
        assert!(round.hard);
    }

    #[test]
    fn test_unnamed_tier_answer() {
        let state = state_with(&[4096]);
        let round = start_round(&state, &mut Pcg32::seed_from_u64(3)).unwrap();
        assert_eq!(round.answer, "Random");
        assert!(round.options.contains(&"Random"));
    }

    #[test]
    fn test_streak_rewards() {
        let mut state = state_with(&[2]);
        let start = state.money;
        let mut rng = Pcg32::seed_from_u64(9);

        let mut round = start_round(&state, &mut rng).unwrap();
        assert_eq!(
            guess(&mut state, &mut round, "Red"),
            Some(GuessOutcome::Correct {
                reward: 600.0,
                streak: 1
            })
        );
        let mut round = start_round(&state, &mut rng).unwrap();
        guess(&mut state, &mut round, "Red");
        assert_eq!(state.current_streak, 2);
        assert_eq!(state.money, start + 600.0 + 700.0);
    }

    #[test]
    fn test_hard_mode_doubles_reward() {
        let mut state = state_with(&[2]);
        state.is_hard_mode = true;
        state.current_streak = 2;
        let mut round = start_round(&state, &mut Pcg32::seed_from_u64(2)).unwrap();
        assert_eq!(
            guess(&mut state, &mut round, "Red"),
            Some(GuessOutcome::Correct {
                reward: 1600.0,
                streak: 3
            })
        );
    }

    #[test]
    fn test_wrong_guess_resets_streak() {
        let mut state = state_with(&[2]);
        state.current_streak = 5;
        let money = state.money;
        let mut round = start_round(&state, &mut Pcg32::seed_from_u64(2)).unwrap();
        assert_eq!(
            guess(&mut state, &mut round, "Blue"),
            Some(GuessOutcome::Wrong { answer: "Red" })
        );
        assert_eq!(state.current_streak, 0);
        assert_eq!(state.money, money);
    }

    #[test]
    fn test_round_answered_once() {
        let mut state = state_with(&[2]);
        let mut round = start_round(&state, &mut Pcg32::seed_from_u64(2)).unwrap();
        assert!(guess(&mut state, &mut round, "Red").is_some());
        assert!(round.is_answered());
        assert_eq!(guess(&mut state, &mut round, "Red"), None);
        assert_eq!(state.current_streak, 1);
    }

    proptest! {
        #[test]
        fn prop_options_distinct_with_one_answer(
            seed in any::<u64>(),
            tier in 1u32..16,
            hard in any::<bool>(),
        ) {
            let mut state = state_with(&[1u64 << tier]);
            state.is_hard_mode = hard;
            let round = start_round(&state, &mut Pcg32::seed_from_u64(seed)).unwrap();

            let expected = if hard { OPTIONS_HARD } else { OPTIONS_NORMAL };
            prop_assert_eq!(round.options.len(), expected);
            prop_assert_eq!(round.options.iter().filter(|o| **o == round.answer).count(), 1);
            let mut sorted = round.options.clone();
            sorted.sort();
            sorted.dedup();
            prop_assert_eq!(sorted.len(), expected);
        }
    }
}
