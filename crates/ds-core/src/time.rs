//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter where one tick is one
//! simulated minute.  Integer ticks keep delivery-duration arithmetic exact
//! (no floating-point drift) and make SLA comparisons trivial.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter (minutes since run start).
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Ticks elapsed from `earlier` to `self`, saturating at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Run clock.  Holds no heap data and is cheap to copy.
#[derive(Clone, Debug, Default)]
pub struct SimClock {
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Break elapsed time into (hour, minute) components from run start.
    pub fn elapsed_hm(&self) -> (u64, u32) {
        let minutes = self.current_tick.0;
        (minutes / 60, (minutes % 60) as u32)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (h, m) = self.elapsed_hm();
        write!(f, "{} ({:02}:{:02})", self.current_tick, h, m)
    }
}
