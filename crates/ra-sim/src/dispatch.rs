//! The `Dispatch` runner and its tick loop.

use ra_core::{Role, SimClock, Tick};
use ra_route::RouteProvider;
use ra_sync::Channel;

use crate::{DispatchConfig, DispatchObserver, DispatchResult, Requester, Responder};

/// Both participants on one channel, advanced tick by tick.
///
/// Each tick runs in a fixed order:
///
/// 1. `on_tick_start`
/// 2. **Requester**: apply delivered frames, fire due timers.
/// 3. **Responder**: the same.
/// 4. Forward each process's events to the observer, requester first.
/// 5. `on_tick_end`, then advance the clock.
///
/// A frame published during tick `t` is first seen by its peer at tick `t`
/// (responder reading a requester frame) or `t + 1` (requester reading a
/// responder frame).  Neither process relies on that ordering.
///
/// Operator actions are plain method calls on [`requester`][Self::requester]
/// and [`responder`][Self::responder] between steps; events they produce are
/// forwarded with the next step.
///
/// Create via [`DispatchBuilder`][crate::DispatchBuilder].
pub struct Dispatch<P: RouteProvider> {
    pub config:    DispatchConfig,
    pub clock:     SimClock,
    pub requester: Requester<P>,
    pub responder: Responder<P>,
    pub channel:   Channel,
}

impl<P: RouteProvider> Dispatch<P> {
    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    /// Simulated milliseconds since tick 0.
    pub fn now_ms(&self) -> u64 {
        self.clock.elapsed_ms()
    }

    /// Run exactly one tick.
    pub fn step<O: DispatchObserver>(&mut self, observer: &mut O) -> DispatchResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);

        self.requester.process_tick(now)?;
        self.responder.process_tick(now)?;

        for event in self.requester.take_events() {
            observer.on_event(now, Role::Requester, &event);
        }
        for event in self.responder.take_events() {
            observer.on_event(now, Role::Responder, &event);
        }

        observer.on_tick_end(now);
        self.clock.advance();
        Ok(())
    }

    /// Run exactly `n` ticks from the current position.
    pub fn run_ticks<O: DispatchObserver>(&mut self, n: u64, observer: &mut O) -> DispatchResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    /// Step until `done` holds, for at most `max_ticks` ticks.
    ///
    /// `done` is checked before every step.  Returns whether it was met.
    pub fn run_until<O, F>(&mut self, max_ticks: u64, observer: &mut O, mut done: F) -> DispatchResult<bool>
    where
        O: DispatchObserver,
        F: FnMut(&Self) -> bool,
    {
        for _ in 0..max_ticks {
            if done(self) {
                return Ok(true);
            }
            self.step(observer)?;
        }
        Ok(done(self))
    }

    /// Flush pending events and signal the end of the run.
    pub fn finish<O: DispatchObserver>(&mut self, observer: &mut O) {
        let now = self.clock.current_tick;
        for event in self.requester.take_events() {
            observer.on_event(now, Role::Requester, &event);
        }
        for event in self.responder.take_events() {
            observer.on_event(now, Role::Responder, &event);
        }
        observer.on_run_end(now);
    }
}
