//! Simulation timers
//!
//! Two independent repeating timers driven by a caller-supplied clock in
//! milliseconds: the physics tick and the optional auto-spawn. A timer fires
//! at most once per poll and re-arms one period after the poll that fired
//! it, so missed periods are dropped rather than caught up and lateness is
//! never corrected.

/// A repeating timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    period_ms: f64,
    next_due_ms: Option<f64>,
}

impl Interval {
    pub fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            next_due_ms: None,
        }
    }

    /// Schedule the first firing one period from `now_ms`
    pub fn arm(&mut self, now_ms: f64) {
        self.next_due_ms = Some(now_ms + self.period_ms);
    }

    pub fn clear(&mut self) {
        self.next_due_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due_ms.is_some()
    }

    fn is_due(&self, now_ms: f64) -> bool {
        matches!(self.next_due_ms, Some(due) if now_ms >= due)
    }

    fn fire(&mut self, now_ms: f64) {
        self.next_due_ms = Some(now_ms + self.period_ms);
    }
}

/// Which timer fired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timer {
    Tick,
    AutoSpawn,
}

/// Physics tick plus auto-spawn timers
#[derive(Debug, Clone)]
pub struct Scheduler {
    tick: Interval,
    auto_spawn: Interval,
}

impl Scheduler {
    pub fn new(tick_ms: u32, auto_spawn_ms: u32) -> Self {
        Self {
            tick: Interval::new(tick_ms as f64),
            auto_spawn: Interval::new(auto_spawn_ms as f64),
        }
    }

    /// Start the session-long tick timer
    pub fn start(&mut self, now_ms: f64) {
        self.tick.arm(now_ms);
    }

    pub fn is_running(&self) -> bool {
        self.tick.is_armed()
    }

    /// Arm or clear the auto-spawn timer
    pub fn set_auto_spawn(&mut self, active: bool, now_ms: f64) {
        if active {
            self.auto_spawn.arm(now_ms);
        } else {
            self.auto_spawn.clear();
        }
    }

    pub fn auto_spawn_armed(&self) -> bool {
        self.auto_spawn.is_armed()
    }

    /// Collect the timers due at `now_ms`, earliest deadline first.
    ///
    /// `auto_spawn_active` is checked just before the spawn timer fires; if
    /// it has been switched off the timer is cleared instead.
    pub fn poll(&mut self, now_ms: f64, auto_spawn_active: bool) -> Vec<Timer> {
        let mut due = Vec::with_capacity(2);

        if self.tick.is_due(now_ms) {
            due.push((self.tick.next_due_ms, Timer::Tick));
        }
        if self.auto_spawn.is_due(now_ms) {
            if auto_spawn_active {
                due.push((self.auto_spawn.next_due_ms, Timer::AutoSpawn));
            } else {
                self.auto_spawn.clear();
            }
        }

        due.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        due.into_iter()
            .map(|(_, timer)| {
                match timer {
                    Timer::Tick => self.tick.fire(now_ms),
                    Timer::AutoSpawn => self.auto_spawn.fire(now_ms),
                }
                timer
            })
            .collect()
    }
}
