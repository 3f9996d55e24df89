//! Upgrade shop
//!
//! Prices grow geometrically with what the player already owns. A purchase
//! debits the cost first, then applies the effect.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{Arena, GameState, Pin};

/// Purchasable upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// One more ball, spawned immediately
    AddBall,
    /// +1 per-bounce profit multiplier
    BallProfit,
    /// A pin slot, which also raises the spawn quota
    AddPin,
    /// Combine pins (not available yet)
    MergePins,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::AddBall,
        UpgradeKind::BallProfit,
        UpgradeKind::AddPin,
        UpgradeKind::MergePins,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            UpgradeKind::AddBall => "Add Ball",
            UpgradeKind::BallProfit => "Ball Profit",
            UpgradeKind::AddPin => "Add Pin",
            UpgradeKind::MergePins => "Merge Pins",
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, UpgradeKind::MergePins)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum UpgradeError {
    #[error("cannot afford upgrade: costs {cost}, balance {balance}")]
    InsufficientFunds { cost: f64, balance: f64 },
    #[error("upgrade not available yet")]
    Unavailable,
}

/// What a successful purchase did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Purchase {
    pub kind: UpgradeKind,
    pub cost: f64,
    /// Ball spawned by the purchase, if any
    pub spawned: Option<u32>,
}

/// Current price of an upgrade
pub fn cost(state: &GameState, kind: UpgradeKind) -> f64 {
    match kind {
        UpgradeKind::AddBall => 1800.0 * 1.5f64.powi(state.available_balls as i32 - 5),
        UpgradeKind::BallProfit => 66_700.0 * 2f64.powi(state.ball_profit as i32 - 1),
        UpgradeKind::AddPin => 47_600.0 * 2f64.powi(state.pins.len() as i32),
        UpgradeKind::MergePins => {
            let active = state.pins.iter().filter(|p| p.active).count();
            119_200.0 * 2f64.powi(active as i32)
        }
    }
}

pub fn can_afford(state: &GameState, kind: UpgradeKind) -> bool {
    state.money >= cost(state, kind)
}

/// Buy an upgrade.
///
/// Unavailable upgrades are rejected before any money changes hands.
pub fn purchase<R: Rng + ?Sized>(
    state: &mut GameState,
    arena: &Arena,
    rng: &mut R,
    kind: UpgradeKind,
) -> Result<Purchase, UpgradeError> {
    if !kind.is_available() {
        return Err(UpgradeError::Unavailable);
    }

    let cost = cost(state, kind);
    if state.money < cost {
        return Err(UpgradeError::InsufficientFunds {
            cost,
            balance: state.money,
        });
    }
    state.money -= cost;

    let mut spawned = None;
    match kind {
        UpgradeKind::AddBall => {
            state.available_balls += 1;
            spawned = state.spawn_ball(arena, rng);
        }
        UpgradeKind::BallProfit => {
            state.ball_profit += 1;
        }
        UpgradeKind::AddPin => {
            state.available_balls += 1;
            state.pins.push(Pin::default());
        }
        UpgradeKind::MergePins => {}
    }

    log::info!("Bought {} for {}", kind.label(), cost);
    Ok(Purchase {
        kind,
        cost,
        spawned,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(5)
    }

    #[test]
    fn test_initial_costs() {
        let state = GameState::new();
        assert_eq!(cost(&state, UpgradeKind::AddBall), 1800.0);
        assert_eq!(cost(&state, UpgradeKind::BallProfit), 66_700.0);
        assert_eq!(cost(&state, UpgradeKind::AddPin), 47_600.0);
        assert_eq!(cost(&state, UpgradeKind::MergePins), 119_200.0);
    }

    #[test]
    fn test_costs_scale() {
        let mut state = GameState::new();
        state.available_balls = 7;
        state.ball_profit = 3;
        state.pins = vec![Pin { active: true }, Pin::default()];
        assert_eq!(cost(&state, UpgradeKind::AddBall), 1800.0 * 2.25);
        assert_eq!(cost(&state, UpgradeKind::BallProfit), 66_700.0 * 4.0);
        assert_eq!(cost(&state, UpgradeKind::AddPin), 47_600.0 * 4.0);
        assert_eq!(cost(&state, UpgradeKind::MergePins), 119_200.0 * 2.0);

        // Below the starting quota the price drops under the base
        state.available_balls = 3;
        assert!((cost(&state, UpgradeKind::AddBall) - 800.0).abs() < 1e-9);
    }

    #[test]
    fn test_add_ball_spawns() {
        let mut state = GameState::new();
        let arena = Arena::default();
        let result = purchase(&mut state, &arena, &mut rng(), UpgradeKind::AddBall).unwrap();

        assert_eq!(state.money, 100_000.0 - 1800.0);
        assert_eq!(state.balls.len(), 1);
        assert_eq!(result.spawned, Some(state.balls[0].id));
        // +1 from the purchase, -1 for the spawn
        assert_eq!(state.available_balls, 5);
    }

    #[test]
    fn test_ball_profit_raises_earnings() {
        let mut state = GameState::new();
        let arena = Arena::default();
        purchase(&mut state, &arena, &mut rng(), UpgradeKind::BallProfit).unwrap();
        assert_eq!(state.ball_profit, 2);
        assert_eq!(state.money, 100_000.0 - 66_700.0);
        assert_eq!(cost(&state, UpgradeKind::BallProfit), 133_400.0);
    }

    #[test]
    fn test_add_pin() {
        let mut state = GameState::new();
        let arena = Arena::default();
        purchase(&mut state, &arena, &mut rng(), UpgradeKind::AddPin).unwrap();
        assert_eq!(state.pins, vec![Pin { active: false }]);
        assert_eq!(state.available_balls, 6);
        assert_eq!(cost(&state, UpgradeKind::AddPin), 95_200.0);
    }

    #[test]
    fn test_insufficient_funds_leaves_state_untouched() {
        let mut state = GameState::new();
        state.money = 1000.0;
        let before = state.clone();
        let err = purchase(&mut state, &Arena::default(), &mut rng(), UpgradeKind::AddBall)
            .unwrap_err();
        assert_eq!(
            err,
            UpgradeError::InsufficientFunds {
                cost: 1800.0,
                balance: 1000.0
            }
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_merge_pins_unavailable() {
        let mut state = GameState::new();
        state.money = 1e9;
        let before = state.clone();
        let err = purchase(&mut state, &Arena::default(), &mut rng(), UpgradeKind::MergePins)
            .unwrap_err();
        assert_eq!(err, UpgradeError::Unavailable);
        assert_eq!(state, before);
    }

    #[test]
    fn test_exact_balance_is_enough() {
        let mut state = GameState::new();
        state.money = 47_600.0;
        assert!(can_afford(&state, UpgradeKind::AddPin));
        purchase(&mut state, &Arena::default(), &mut rng(), UpgradeKind::AddPin).unwrap();
        assert_eq!(state.money, 0.0);
    }
}
