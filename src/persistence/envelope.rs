//! Versioned JSON save envelope

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::PersistError;
use crate::is_valid_tier;
use crate::sim::GameState;

/// Current save format version
pub const SAVE_VERSION: u32 = 1;

#[derive(Serialize)]
struct SaveEnvelopeRef<'a> {
    version: u32,
    state: &'a GameState,
}

#[derive(Deserialize)]
struct SaveEnvelope {
    version: u32,
    state: GameState,
}

/// Serialize a game state into a save blob
pub fn encode(state: &GameState) -> Result<String, PersistError> {
    let envelope = SaveEnvelopeRef {
        version: SAVE_VERSION,
        state,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Parse a save blob.
///
/// Missing fields inside `state` take their fresh-game defaults.
pub fn decode(blob: &str) -> Result<GameState, PersistError> {
    let envelope: SaveEnvelope = serde_json::from_str(blob)?;
    if envelope.version != SAVE_VERSION {
        return Err(PersistError::UnsupportedVersion {
            found: envelope.version,
            expected: SAVE_VERSION,
        });
    }
    validate(&envelope.state)?;
    Ok(envelope.state)
}

/// Reject states the simulation cannot run safely
fn validate(state: &GameState) -> Result<(), PersistError> {
    let mut ids = HashSet::with_capacity(state.balls.len());
    for ball in &state.balls {
        if !is_valid_tier(ball.value) {
            return Err(PersistError::InvalidState(format!(
                "ball {} has value {}",
                ball.id, ball.value
            )));
        }
        if ball.id == u32::MAX || !ids.insert(ball.id) {
            return Err(PersistError::InvalidState(format!(
                "ball id {} is out of range or repeated",
                ball.id
            )));
        }
        if !ball.pos.is_finite() || !ball.vel.is_finite() {
            return Err(PersistError::InvalidState(format!(
                "ball {} has a non-finite position or velocity",
                ball.id
            )));
        }
    }
    if !state.money.is_finite() {
        return Err(PersistError::InvalidState("money is not finite".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::INITIAL_MONEY;
    use crate::sim::AchievementId;

    #[test]
    fn test_partial_state_fills_defaults() {
        let blob = r#"{"version":1,"state":{"money":42.0,"achievements":{"bounce_1000":true}}}"#;
        let state = decode(blob).unwrap();
        assert_eq!(state.money, 42.0);
        assert_eq!(state.available_balls, 5);
        assert_eq!(state.level, 7);
        assert!(state.achievements.is_unlocked(AchievementId::Bounce1000));
        assert!(!state.achievements.is_unlocked(AchievementId::FirstMerge));
    }

    #[test]
    fn test_empty_state_is_fresh_game() {
        let state = decode(r#"{"version":1,"state":{}}"#).unwrap();
        assert_eq!(state.money, INITIAL_MONEY);
        assert_eq!(state, GameState::default());
    }

    #[test]
    fn test_future_version_rejected() {
        let err = decode(r#"{"version":9,"state":{}}"#).unwrap_err();
        assert!(matches!(
            err,
            PersistError::UnsupportedVersion { found: 9, expected: 1 }
        ));
    }

    #[test]
    fn test_encode_uses_camel_case_keys() {
        let blob = encode(&GameState::default()).unwrap();
        assert!(blob.contains("\"ballProfit\":1"));
        assert!(blob.contains("\"availableBalls\":5"));
        assert!(blob.contains("\"first_merge\":false"));
    }
}
