//! Save/load persistence
//!
//! Features:
//! - Versioned JSON envelope
//! - Pluggable key-value backends (memory, file, LocalStorage)
//! - Corruption detection with fallback to a fresh game

pub mod envelope;
pub mod store;

use thiserror::Error;

use crate::sim::GameState;

pub use envelope::{SAVE_VERSION, decode, encode};
#[cfg(not(target_arch = "wasm32"))]
pub use store::FileStore;
#[cfg(target_arch = "wasm32")]
pub use store::LocalStorageStore;
pub use store::MemoryStore;

/// Errors raised while reading or writing a save
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage backend unavailable")]
    StorageUnavailable,
    #[error("storage backend error: {0}")]
    Backend(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed save: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported save version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("invalid save contents: {0}")]
    InvalidState(String),
}

/// A single-blob key-value store for the game save
pub trait Store {
    /// Raw saved blob, `None` on first run
    fn read(&self) -> Result<Option<String>, PersistError>;

    fn write(&mut self, blob: &str) -> Result<(), PersistError>;

    /// Load the saved game, `None` on first run
    fn load(&self) -> Result<Option<GameState>, PersistError> {
        self.read()?.map(|blob| decode(&blob)).transpose()
    }

    fn save(&mut self, state: &GameState) -> Result<(), PersistError> {
        let blob = encode(state)?;
        self.write(&blob)
    }
}

/// Load the saved game, falling back to a fresh one if absent or unreadable
pub fn load_or_default<S: Store + ?Sized>(store: &S) -> GameState {
    match store.load() {
        Ok(Some(state)) => {
            log::info!(
                "Loaded save: {} balls, money {}",
                state.balls.len(),
                state.money
            );
            state
        }
        Ok(None) => {
            log::info!("No save found, starting fresh");
            GameState::default()
        }
        Err(e) => {
            log::warn!("Discarding unreadable save ({}), starting fresh", e);
            GameState::default()
        }
    }
}
