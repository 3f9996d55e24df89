//! Game session
//!
//! Owns everything one running game needs: the state, the arena, the RNG,
//! the timers, the save backend and the renderer. Platform loops feed it a
//! millisecond clock through [`Session::pump`] and forward player actions to
//! its methods.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::minigame::{self, GuessOutcome, Round};
use crate::persistence::{Store, load_or_default};
use crate::render::Renderer;
use crate::settings::Settings;
use crate::sim::{Arena, GameEvent, GameState, Scheduler, Timer, tick};
use crate::upgrades::{self, Purchase, UpgradeError, UpgradeKind};

pub struct Session<S: Store, R: Renderer> {
    state: GameState,
    arena: Arena,
    rng: Pcg32,
    scheduler: Scheduler,
    settings: Settings,
    store: S,
    renderer: R,
    round: Option<Round>,
}

impl<S: Store, R: Renderer> Session<S, R> {
    /// Session over an explicit state
    pub fn with_state(
        state: GameState,
        settings: Settings,
        store: S,
        renderer: R,
        seed: u64,
    ) -> Self {
        let settings = settings.sanitized();
        let seed = settings.seed.unwrap_or(seed);
        log::info!("Session seed: {}", seed);
        Self {
            state,
            arena: settings.arena(),
            rng: Pcg32::seed_from_u64(seed),
            scheduler: Scheduler::new(settings.tick_ms, settings.auto_spawn_ms),
            settings,
            store,
            renderer,
            round: None,
        }
    }

    /// Session resumed from `store`, or a fresh game if it holds nothing usable.
    ///
    /// `seed` is used unless the settings pin one.
    pub fn load(settings: Settings, store: S, renderer: R, seed: u64) -> Self {
        let state = load_or_default(&store);
        Self::with_state(state, settings, store, renderer, seed)
    }

    /// Start the timers. A saved auto-spawn is re-armed here.
    pub fn start(&mut self, now_ms: f64) {
        self.scheduler.start(now_ms);
        if self.state.auto_spawn_active {
            self.scheduler.set_auto_spawn(true, now_ms);
        }
        self.renderer.notify_tick(&self.state, &[]);
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    /// Run whatever timers are due at `now_ms`. Returns how many fired.
    pub fn pump(&mut self, now_ms: f64) -> usize {
        let fired = self.scheduler.poll(now_ms, self.state.auto_spawn_active);
        for timer in &fired {
            match timer {
                Timer::Tick => {
                    self.tick_once();
                }
                Timer::AutoSpawn => {
                    self.spawn_ball();
                }
            }
        }
        fired.len()
    }

    /// Run one simulation tick immediately
    pub fn tick_once(&mut self) -> Vec<GameEvent> {
        let events = tick(&mut self.state, &self.arena, &mut self.rng);
        self.publish(&events);
        events
    }

    /// Spawn a ball from the quota
    pub fn spawn_ball(&mut self) -> Option<u32> {
        let id = self.state.spawn_ball(&self.arena, &mut self.rng)?;
        self.publish(&[GameEvent::Spawned { ball_id: id }]);
        Some(id)
    }

    /// Flip auto-spawn. Returns the new setting.
    pub fn toggle_auto_spawn(&mut self, now_ms: f64) -> bool {
        self.set_auto_spawn(!self.state.auto_spawn_active, now_ms);
        self.state.auto_spawn_active
    }

    pub fn set_auto_spawn(&mut self, active: bool, now_ms: f64) {
        self.state.auto_spawn_active = active;
        self.scheduler.set_auto_spawn(active, now_ms);
        log::info!("Auto-spawn {}", if active { "on" } else { "off" });
        self.renderer.notify_tick(&self.state, &[]);
    }

    pub fn upgrade_cost(&self, kind: UpgradeKind) -> f64 {
        upgrades::cost(&self.state, kind)
    }

    /// Buy an upgrade and save
    pub fn buy(&mut self, kind: UpgradeKind) -> Result<Purchase, UpgradeError> {
        let purchase = upgrades::purchase(&mut self.state, &self.arena, &mut self.rng, kind)?;
        let events: Vec<GameEvent> = purchase
            .spawned
            .map(|ball_id| GameEvent::Spawned { ball_id })
            .into_iter()
            .collect();
        self.publish(&events);
        self.save();
        Ok(purchase)
    }

    /// Begin a mini-game round, replacing any open one
    pub fn start_minigame(&mut self) -> Option<&Round> {
        self.round = minigame::start_round(&self.state, &mut self.rng);
        if self.round.is_none() {
            log::info!("No balls to guess");
        }
        self.round.as_ref()
    }

    pub fn current_round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Answer the open round
    pub fn answer_minigame(&mut self, name: &str) -> Option<GuessOutcome> {
        let round = self.round.as_mut()?;
        let outcome = minigame::guess(&mut self.state, round, name)?;
        self.renderer.notify_tick(&self.state, &[]);
        Some(outcome)
    }

    /// Flip hard mode and save. Returns the new setting.
    pub fn toggle_hard_mode(&mut self) -> bool {
        self.state.is_hard_mode = !self.state.is_hard_mode;
        self.save();
        self.renderer.notify_tick(&self.state, &[]);
        self.state.is_hard_mode
    }

    /// Wipe all progress and save the result immediately
    pub fn reset_progress(&mut self) {
        self.state.reset_progress();
        self.scheduler.set_auto_spawn(false, 0.0);
        self.round = None;
        log::info!("Progress reset");
        self.save();
        self.renderer.notify_tick(&self.state, &[]);
    }

    /// Persist the game. Failures are logged, never fatal.
    pub fn save(&mut self) -> bool {
        match self.store.save(&self.state) {
            Ok(()) => {
                log::info!("Game saved ({} balls)", self.state.balls.len());
                true
            }
            Err(e) => {
                log::warn!("Save failed: {}", e);
                false
            }
        }
    }

    fn publish(&mut self, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::AchievementUnlocked { name, reward, .. } = event {
                self.renderer.notify_achievement_unlocked(name, *reward);
            }
        }
        if self.settings.sparkles {
            self.renderer.notify_tick(&self.state, events);
        } else {
            let filtered: Vec<GameEvent> = events
                .iter()
                .filter(|e| !matches!(e, GameEvent::Sparkle { .. }))
                .cloned()
                .collect();
            self.renderer.notify_tick(&self.state, &filtered);
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
