//! `ra-schedule` — the single timer abstraction each participant process owns.
//!
//! # Crate layout
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`scheduler`]   | `Scheduler<P>` (`BTreeMap<Tick, Vec<TimerToken>>`)    |
//!
//! # Timer model (summary)
//!
//! Periods and delays are given in milliseconds and converted to ticks with
//! the process `SimClock` (rounded up, minimum one tick).  Each tick the owner
//! calls `due(now)` and receives the payloads of every timer whose deadline is
//! at or before `now`:
//!
//! ```text
//! once(delay)   fires once at   now + ticks(delay)
//! every(period) fires at        now + ticks(period), then every ticks(period)
//! cancel(token) removes the timer; its token never fires again
//! ```
//!
//! Animation frames, escalation checks, and partner-notification delays all go
//! through the same queue, so there are no free-standing timer handles.

pub mod scheduler;


pub use scheduler::Scheduler;
