//! `Scheduler` — sparse per-tick timer queue with explicit cancellation.
//!
//! `BTreeMap` keyed by deadline tick gives O(log W) insert and pop, where W is
//! the number of distinct deadlines currently enqueued.  A participant holds a
//! handful of timers at most, so the constant is tiny.
//!
//! Cancellation removes the timer from the registry only; its queue entry is
//! skipped lazily when its deadline is drained.

use std::collections::{BTreeMap, HashMap};

use ra_core::{SimClock, Tick, TimerToken};

struct Timer<P> {
    payload:      P,
    /// `Some(n)` re-arms the timer `n` ticks after each firing.
    period_ticks: Option<u64>,
}

/// Tick-driven timer queue carrying a payload `P` per timer.
///
/// `P` is usually a small `Copy` enum naming what the timer is for
/// (animation frame, escalation check, …).
pub struct Scheduler<P> {
    clock:      SimClock,
    queue:      BTreeMap<Tick, Vec<TimerToken>>,
    timers:     HashMap<TimerToken, Timer<P>>,
    next_token: TimerToken,
}

impl<P: Clone> Scheduler<P> {
    /// Create an empty scheduler converting milliseconds with `clock`.
    pub fn new(clock: SimClock) -> Self {
        Self {
            clock,
            queue:      BTreeMap::new(),
            timers:     HashMap::new(),
            next_token: TimerToken(0),
        }
    }

    /// Register a periodic timer firing every `period_ms`, first at
    /// `now + period`.
    pub fn every(&mut self, now: Tick, period_ms: u64, payload: P) -> TimerToken {
        let period = self.clock.ticks_for_ms(period_ms);
        self.insert(now + period, payload, Some(period))
    }

    /// Register a one-shot timer firing once, `delay_ms` after `now`.
    ///
    /// A zero delay still waits one tick: nothing fires at the tick it was
    /// registered on.
    pub fn once(&mut self, now: Tick, delay_ms: u64, payload: P) -> TimerToken {
        let delay = self.clock.ticks_for_ms(delay_ms);
        self.insert(now + delay, payload, None)
    }

    /// Cancel `token`.  Returns `true` if the timer was still armed.
    ///
    /// Idempotent: cancelling a fired one-shot or an already cancelled timer
    /// is a no-op.
    pub fn cancel(&mut self, token: TimerToken) -> bool {
        let removed = self.timers.remove(&token).is_some();
        if removed {
            tracing::trace!(%token, "timer cancelled");
        }
        removed
    }

    /// Cancel every armed timer.
    pub fn cancel_all(&mut self) {
        self.timers.clear();
        self.queue.clear();
    }

    /// Remove and return every timer due at or before `now`, ordered by
    /// deadline then registration order.  Periodic timers are re-armed one
    /// period after `now`.
    pub fn due(&mut self, now: Tick) -> Vec<(TimerToken, P)> {
        let mut fired = Vec::new();
        while let Some(entry) = self.queue.first_entry() {
            if *entry.key() > now {
                break;
            }
            let tokens = entry.remove();
            for token in tokens {
                let Some(timer) = self.timers.get(&token) else {
                    continue; // cancelled
                };
                let period_ticks = timer.period_ticks;
                fired.push((token, timer.payload.clone()));
                match period_ticks {
                    Some(period) => self.queue.entry(now + period).or_default().push(token),
                    None => {
                        self.timers.remove(&token);
                    }
                }
            }
        }
        fired
    }

    /// `true` while `token` is registered and has not been cancelled or fired
    /// (for a one-shot).
    pub fn is_armed(&self, token: TimerToken) -> bool {
        self.timers.contains_key(&token)
    }

    /// The earliest deadline in the queue, or `None` if empty.  May name a
    /// tick whose only timers were cancelled.
    pub fn next_tick(&self) -> Option<Tick> {
        self.queue.keys().next().copied()
    }

    /// Number of armed timers.
    pub fn len(&self) -> usize {
        self.timers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timers.is_empty()
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    fn insert(&mut self, at: Tick, payload: P, period_ticks: Option<u64>) -> TimerToken {
        let token = self.next_token;
        self.next_token = token.next();
        self.timers.insert(token, Timer { payload, period_ticks });
        self.queue.entry(at).or_default().push(token);
        token
    }
}
