//! `ra-output` — trace writers for dispatch runs.
//!
//! | Backend | Files created                     |
//! |---------|-----------------------------------|
//! | CSV     | `positions.csv`, `events.csv`     |
//!
//! Backends implement [`TraceWriter`] and are driven by [`TraceObserver`],
//! which implements `ra_sim::DispatchObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ra_output::{CsvTraceWriter, TraceObserver};
//!
//! let writer = CsvTraceWriter::new(Path::new("./output"))?;
//! let mut obs = TraceObserver::new(writer);
//! dispatch.run_ticks(2_000, &mut obs)?;
//! dispatch.finish(&mut obs);
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvTraceWriter;
pub use error::{OutputError, OutputResult};
pub use observer::TraceObserver;
pub use row::{EventRow, PositionRow};
pub use writer::TraceWriter;
