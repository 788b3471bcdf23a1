//! Tests for ra-output.

#[cfg(test)]
mod csv_tests {
    use ra_core::Role;
    use tempfile::TempDir;

    use crate::csv::CsvTraceWriter;
    use crate::row::{EventRow, PositionRow};
    use crate::writer::TraceWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn position(tick: u64, progress: Option<f64>) -> PositionRow {
        PositionRow { tick, role: Role::Responder, lat: 12.9716, lng: 77.5946, heading: 184.0, progress }
    }

    #[test]
    fn files_and_headers() {
        let dir = tmp();
        let mut w = CsvTraceWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("positions.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["tick", "role", "lat", "lng", "heading", "progress"]);

        let mut rdr = csv::Reader::from_path(dir.path().join("events.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, ["tick", "role", "kind", "detail"]);
    }

    #[test]
    fn creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("run").join("01");
        let _w = CsvTraceWriter::new(&nested).unwrap();
        assert!(nested.join("positions.csv").exists());
    }

    #[test]
    fn position_rows() {
        let dir = tmp();
        let mut w = CsvTraceWriter::new(dir.path()).unwrap();
        w.write_positions(&[position(5, Some(0.25)), position(6, None)]).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("positions.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "5");
        assert_eq!(&rows[0][1], "responder");
        assert_eq!(&rows[0][2], "12.971600");
        assert_eq!(&rows[0][5], "0.2500");
        assert_eq!(&rows[1][5], "");
    }

    #[test]
    fn event_detail_is_quoted() {
        let dir = tmp();
        let mut w = CsvTraceWriter::new(dir.path()).unwrap();
        let row = EventRow {
            tick:   3,
            role:   Role::Requester,
            kind:   "assignment_confirmed",
            detail: "Wilson, Sarah (KA-01-MJ-2024)".into(),
        };
        w.write_events(std::slice::from_ref(&row)).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("events.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][3], "Wilson, Sarah (KA-01-MJ-2024)");
    }
}

#[cfg(test)]
mod observer_tests {
    use ra_core::{Coordinate, Role, Tick};
    use ra_route::DirectRouteProvider;
    use ra_sim::{DispatchBuilder, DispatchConfig, DispatchObserver, ProcessEvent, VehicleView};
    use ra_trip::TripPhase;

    use crate::observer::detail;
    use crate::{EventRow, OutputError, OutputResult, PositionRow, TraceObserver, TraceWriter};

    /// Keeps rows in memory; optionally fails every write.
    #[derive(Default)]
    struct MemoryWriter {
        positions: Vec<PositionRow>,
        events:    Vec<EventRow>,
        finished:  u32,
        fail:      bool,
    }

    impl TraceWriter for MemoryWriter {
        fn write_positions(&mut self, rows: &[PositionRow]) -> OutputResult<()> {
            if self.fail {
                return Err(OutputError::Io(std::io::Error::other("disk full")));
            }
            self.positions.extend_from_slice(rows);
            Ok(())
        }

        fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
            if self.fail {
                return Err(OutputError::Io(std::io::Error::other("disk full")));
            }
            self.events.extend_from_slice(rows);
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    #[test]
    fn rows_are_flushed_per_tick() {
        let mut obs = TraceObserver::new(MemoryWriter::default());
        let view = VehicleView {
            position:      Coordinate::new(12.98, 77.60),
            heading:       90.0,
            eta_minutes:   Some(3),
            authoritative: true,
        };
        obs.on_event(Tick(4), Role::Requester, &ProcessEvent::VehicleUpdated(view));
        obs.on_event(Tick(4), Role::Requester, &ProcessEvent::MirrorUpdated { phase: TripPhase::Accepted });
        obs.on_tick_end(Tick(4));
        obs.on_run_end(Tick(5));

        assert!(obs.take_error().is_none());
        let w = obs.into_writer();
        assert_eq!(w.positions.len(), 1);
        assert_eq!(w.positions[0].progress, None);
        assert_eq!(w.events.len(), 1);
        assert_eq!(w.events[0].kind, "mirror_updated");
        assert_eq!(w.events[0].detail, "ACCEPTED");
        assert_eq!(w.finished, 1);
    }

    #[test]
    fn first_error_is_kept() {
        let mut obs = TraceObserver::new(MemoryWriter { fail: true, ..MemoryWriter::default() });
        obs.on_event(Tick(0), Role::Responder, &ProcessEvent::VehicleHidden);
        obs.on_tick_end(Tick(0));
        obs.on_event(Tick(1), Role::Responder, &ProcessEvent::AssignmentVoided);
        obs.on_tick_end(Tick(1));

        assert!(matches!(obs.take_error(), Some(OutputError::Io(_))));
        assert!(obs.take_error().is_none());
    }

    #[test]
    fn traces_a_dispatch_run() {
        let config = DispatchConfig { responder_step: 0.05, ..DispatchConfig::default() };
        let mut d = DispatchBuilder::new(config).provider(DirectRouteProvider::default()).build().unwrap();
        let mut obs = TraceObserver::new(MemoryWriter::default());

        d.requester.request_help(d.now()).unwrap();
        d.step(&mut obs).unwrap();
        d.responder.accept_request(d.now()).unwrap();
        d.run_ticks(40, &mut obs).unwrap();
        d.finish(&mut obs);

        assert!(obs.take_error().is_none());
        let w = obs.into_writer();
        assert!(w.positions.iter().any(|r| r.role == Role::Responder && r.progress.is_some()));
        assert!(w.positions.iter().any(|r| r.role == Role::Requester && r.progress.is_none()));
        assert!(w.events.iter().any(|r| r.kind == "assignment_confirmed" && r.detail == "Sarah Wilson (KA-01-MJ-2024)"));
        assert!(w.events.iter().any(|r| r.kind == "mirror_updated" && r.detail == "ARRIVED_PICKUP"));
        assert_eq!(w.finished, 1);
    }

    #[test]
    fn detail_text() {
        let e = ProcessEvent::RequestIgnored { reason: "offline" };
        assert_eq!(detail(&e), "offline");
        assert_eq!(detail(&ProcessEvent::VehicleHidden), "");
    }
}
