//! CSV trace backend.
//!
//! Creates two files in the configured output directory:
//! - `positions.csv`
//! - `events.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::TraceWriter;
use crate::{EventRow, OutputResult, PositionRow};

/// Writes a dispatch trace to two CSV files.
pub struct CsvTraceWriter {
    positions: Writer<File>,
    events:    Writer<File>,
    finished:  bool,
}

impl CsvTraceWriter {
    /// Create `dir` if needed, open the two CSV files, and write the headers.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut positions = Writer::from_path(dir.join("positions.csv"))?;
        positions.write_record(["tick", "role", "lat", "lng", "heading", "progress"])?;

        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record(["tick", "role", "kind", "detail"])?;

        Ok(Self { positions, events, finished: false })
    }
}

impl TraceWriter for CsvTraceWriter {
    fn write_positions(&mut self, rows: &[PositionRow]) -> OutputResult<()> {
        for row in rows {
            self.positions.write_record(&[
                row.tick.to_string(),
                row.role.as_str().to_owned(),
                format!("{:.6}", row.lat),
                format!("{:.6}", row.lng),
                format!("{:.2}", row.heading),
                row.progress.map(|p| format!("{p:.4}")).unwrap_or_default(),
            ])?;
        }
        Ok(())
    }

    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record([
                row.tick.to_string().as_str(),
                row.role.as_str(),
                row.kind,
                row.detail.as_str(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.positions.flush()?;
        self.events.flush()?;
        Ok(())
    }
}
