//! Simulation time model.
//!
//! # Design
//!
//! Time is represented as a monotonically increasing `Tick` counter.  The
//! mapping to milliseconds is held in `SimClock`:
//!
//!   elapsed_ms = tick * tick_duration_ms
//!
//! Using an integer tick as the canonical time unit means escalation
//! thresholds and timer periods are exact (no floating-point drift).  The
//! default resolution is 40 ms, one animation frame of the live
//! tracker; escalation thresholds (20 s, 30 s, 45 s) are exact multiples.

use std::fmt;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Converts between tick counts and simulated milliseconds.
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.  Each
/// participant process reads time from the clock handed to it; it never owns
/// a wall clock.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Unix timestamp (milliseconds since epoch) of tick 0.  Used only to
    /// stamp outgoing messages.
    pub start_unix_ms: i64,
    /// How many simulated milliseconds one tick represents.  Default: 40.
    pub tick_duration_ms: u32,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    /// Create a clock starting at `start_unix_ms` with the given resolution.
    ///
    /// A zero resolution is bumped to 1 ms so tick arithmetic never divides
    /// by zero.
    pub fn new(start_unix_ms: i64, tick_duration_ms: u32) -> Self {
        Self {
            start_unix_ms,
            tick_duration_ms: tick_duration_ms.max(1),
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Simulated milliseconds at `tick`, measured from tick 0.
    #[inline]
    pub fn ms_at(&self, tick: Tick) -> u64 {
        tick.0 * self.tick_duration_ms as u64
    }

    /// Elapsed simulated milliseconds since tick 0.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.ms_at(self.current_tick)
    }

    /// Unix timestamp in milliseconds corresponding to `tick`.
    #[inline]
    pub fn unix_ms_at(&self, tick: Tick) -> i64 {
        self.start_unix_ms + self.ms_at(tick) as i64
    }

    /// How many ticks span `ms` milliseconds? (rounds up, minimum 1)
    #[inline]
    pub fn ticks_for_ms(&self, ms: u64) -> u64 {
        ms.div_ceil(self.tick_duration_ms as u64).max(1)
    }

    /// The period a timer asked to fire every `ms` really fires at: `ms`
    /// rounded up to whole ticks.
    #[inline]
    pub fn period_ms(&self, ms: u64) -> u64 {
        self.ticks_for_ms(ms) * self.tick_duration_ms as u64
    }
}

impl Default for SimClock {
    fn default() -> Self {
        SimClock::new(0, 40)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ms = self.elapsed_ms();
        write!(f, "{} (+{}.{:03}s)", self.current_tick, ms / 1_000, ms % 1_000)
    }
}
