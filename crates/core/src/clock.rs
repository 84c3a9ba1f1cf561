//! The "now" cursor.
//!
//! There is no background thread: the host polls [`RealtimeClock::poll`] from
//! its own frame loop or timer, and the clock decides whether enough time has
//! passed to advance. Stopping is explicit and idempotent.

use std::cell::Cell;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{trace, warn};

use crate::config::{MIN_TICK_MS, RealtimeOptions};

/// Source of wall-clock time in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64() * 1000.0)
            .unwrap_or(0.0)
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(now: f64) -> Self {
        Self { now: Cell::new(now) }
    }

    pub fn set(&self, now: f64) {
        self.now.set(now);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

/// Resolves "now" for one timeline: an external value when the caller
/// supplies one, otherwise the internal ticker.
#[derive(Debug)]
pub struct RealtimeClock<C: Clock = SystemClock> {
    clock: C,
    external: Option<f64>,
    running: bool,
    interval_ms: f64,
    now: f64,
    last_tick: f64,
}

impl<C: Clock> RealtimeClock<C> {
    /// Reads the clock once; starts ticking if `options.enabled`.
    pub fn new(clock: C, options: RealtimeOptions) -> Self {
        let now = clock.now_ms();
        Self {
            clock,
            external: None,
            running: options.enabled,
            interval_ms: options.interval_ms() as f64,
            now,
            last_tick: now,
        }
    }

    pub fn now(&self) -> f64 {
        self.external.unwrap_or(self.now)
    }

    /// Pin "now" to a caller-supplied value (or release it with `None`).
    /// While pinned the internal ticker never advances. Releasing keeps the
    /// last pinned value until the next full interval elapses.
    pub fn set_external(&mut self, now: Option<f64>) {
        match now {
            Some(t) if !t.is_finite() => {
                warn!(now = t, "ignoring non-finite external now");
            }
            Some(_) => self.external = now,
            None => {
                if let Some(prev) = self.external.take() {
                    self.now = prev;
                    self.last_tick = self.clock.now_ms();
                }
            }
        }
    }

    pub fn is_external(&self) -> bool {
        self.external.is_some()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        if !self.running {
            self.running = true;
            self.last_tick = self.clock.now_ms();
            trace!(interval_ms = self.interval_ms, "realtime clock started");
        }
    }

    pub fn stop(&mut self) {
        if self.running {
            self.running = false;
            trace!("realtime clock stopped");
        }
    }

    /// Apply new realtime options. Idempotent; never restarts a running
    /// ticker.
    pub fn configure(&mut self, options: RealtimeOptions) {
        self.interval_ms = options.interval_ms() as f64;
        if options.enabled {
            self.start();
        } else {
            self.stop();
        }
    }

    pub fn interval_ms(&self) -> f64 {
        self.interval_ms
    }

    /// Advance the internal now if a full interval has elapsed. Returns the
    /// new now when it changed.
    pub fn poll(&mut self) -> Option<f64> {
        if !self.running || self.external.is_some() {
            return None;
        }
        let t = self.clock.now_ms();
        if t - self.last_tick < self.interval_ms.max(MIN_TICK_MS as f64) {
            return None;
        }
        self.last_tick = t;
        if t == self.now {
            return None;
        }
        self.now = t;
        Some(t)
    }
}

impl Default for RealtimeClock<SystemClock> {
    fn default() -> Self {
        Self::new(SystemClock, RealtimeOptions::default())
    }
}
