//! Dispatch observer trait for presentation and data collection.

use ra_core::{Role, Tick};

use crate::ProcessEvent;

/// Callbacks invoked by [`Dispatch`][crate::Dispatch] as it steps.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example
///
/// ```rust,ignore
/// struct Banners;
///
/// impl DispatchObserver for Banners {
///     fn on_event(&mut self, _tick: Tick, role: Role, event: &ProcessEvent) {
///         if let ProcessEvent::MirrorUpdated { phase } = event {
///             println!("{role}: trip is now {phase}");
///         }
///     }
/// }
/// ```
pub trait DispatchObserver {
    /// Called at the very start of each tick, before either process runs.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per event, in the order the process produced them.
    fn on_event(&mut self, _tick: Tick, _role: Role, _event: &ProcessEvent) {}

    /// Called after both processes have run.
    fn on_tick_end(&mut self, _tick: Tick) {}

    /// Called once by [`Dispatch::finish`][crate::Dispatch::finish].
    fn on_run_end(&mut self, _final_tick: Tick) {}
}

/// A [`DispatchObserver`] that does nothing.
pub struct NoopObserver;

impl DispatchObserver for NoopObserver {}

/// Keeps every event; handy in tests and for post-run inspection.
#[derive(Default)]
pub struct EventLog {
    pub events: Vec<(Tick, Role, ProcessEvent)>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events from `role`, in order.
    pub fn for_role(&self, role: Role) -> impl Iterator<Item = &ProcessEvent> {
        self.events.iter().filter(move |(_, r, _)| *r == role).map(|(_, _, e)| e)
    }
}

impl DispatchObserver for EventLog {
    fn on_event(&mut self, tick: Tick, role: Role, event: &ProcessEvent) {
        self.events.push((tick, role, event.clone()));
    }
}
