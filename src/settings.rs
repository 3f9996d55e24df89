//! Runtime settings
//!
//! Persisted separately from game saves: LocalStorage on the web, a JSON
//! file named by `BOUNCE_MERGE_SETTINGS` on native.

use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, AUTO_SPAWN_MS, SPAWN_VALUE, TICK_MS};
use crate::sim::Arena;

/// Game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,

    // === Timers ===
    /// Physics tick period (ms)
    pub tick_ms: u32,
    /// Auto-spawn period (ms)
    pub auto_spawn_ms: u32,

    // === Visual Effects ===
    /// Sparkle bursts on high-value balls
    pub sparkles: bool,
    /// Ball trails
    pub trails: bool,

    /// Fixed RNG seed; wall clock when absent
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            tick_ms: TICK_MS,
            auto_spawn_ms: AUTO_SPAWN_MS,
            sparkles: true,
            trails: true,
            seed: None,
        }
    }
}

impl Settings {
    /// Replace nonsensical values with defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        let min_side = crate::ball_size(SPAWN_VALUE);

        if self.tick_ms == 0 {
            log::warn!("tick_ms must be positive, using {}", defaults.tick_ms);
            self.tick_ms = defaults.tick_ms;
        }
        if self.auto_spawn_ms == 0 {
            log::warn!(
                "auto_spawn_ms must be positive, using {}",
                defaults.auto_spawn_ms
            );
            self.auto_spawn_ms = defaults.auto_spawn_ms;
        }
        if !self.arena_width.is_finite()
            || !self.arena_height.is_finite()
            || self.arena_width < min_side
            || self.arena_height < min_side
        {
            log::warn!(
                "Arena {}x{} cannot hold a ball, using {}x{}",
                self.arena_width,
                self.arena_height,
                defaults.arena_width,
                defaults.arena_height
            );
            self.arena_width = defaults.arena_width;
            self.arena_height = defaults.arena_height;
        }
        self
    }

    pub fn arena(&self) -> Arena {
        Arena::new(self.arena_width, self.arena_height)
    }

    /// Parse settings JSON, falling back to defaults on error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str::<Settings>(json) {
            Ok(settings) => settings.sanitized(),
            Err(e) => {
                log::warn!("Ignoring malformed settings ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "bounce_merge_settings";

    /// Environment variable naming the settings file
    #[cfg(not(target_arch = "wasm32"))]
    pub const PATH_ENV: &'static str = "BOUNCE_MERGE_SETTINGS";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Load settings from the file named by `BOUNCE_MERGE_SETTINGS`
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let Some(path) = std::env::var_os(Self::PATH_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match std::fs::read_to_string(&path) {
            Ok(json) => {
                log::info!("Loaded settings from {}", path.to_string_lossy());
                Self::from_json(&json)
            }
            Err(e) => {
                log::warn!(
                    "Cannot read settings file {} ({}), using defaults",
                    path.to_string_lossy(),
                    e
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.tick_ms, 50);
        assert_eq!(settings.auto_spawn_ms, 1000);
        assert_eq!(settings.arena(), Arena::new(800.0, 600.0));
        assert!(settings.sparkles && settings.trails);
        assert!(settings.seed.is_none());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let settings = Settings::from_json(r#"{"seed": 42, "trails": false}"#);
        assert_eq!(settings.seed, Some(42));
        assert!(!settings.trails);
        assert_eq!(settings.tick_ms, 50);
        assert_eq!(settings.arena_width, 800.0);
    }

    #[test]
    fn test_malformed_json_gives_defaults() {
        assert_eq!(Settings::from_json("[1, 2"), Settings::default());
    }

    #[test]
    fn test_sanitized_rejects_zero_periods() {
        let settings = Settings {
            tick_ms: 0,
            auto_spawn_ms: 0,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(settings.tick_ms, 50);
        assert_eq!(settings.auto_spawn_ms, 1000);
    }

    #[test]
    fn test_sanitized_rejects_tiny_arena() {
        let settings = Settings {
            arena_width: 10.0,
            arena_height: 400.0,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(settings.arena(), Arena::default());

        let ok = Settings {
            arena_width: 320.0,
            arena_height: 240.0,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(ok.arena(), Arena::new(320.0, 240.0));
    }
}
