//! bangalore — one emergency pickup, end to end.
//!
//! A requester on MG Road asks for help; the responder accepts, drives to
//! the patient, checks the pickup code, and takes the patient to hospital.
//! Both sides run on one simulated channel and write their view of the
//! vehicle to `output/bangalore/`.
//!
//! Usage: `bangalore [config.json]`.  Log level via `RUST_LOG`.

mod legs;

use std::path::Path;
use std::time::Instant;

use anyhow::{Result, bail};
use tracing_subscriber::EnvFilter;

use ra_core::{Role, Tick};
use ra_output::{CsvTraceWriter, TraceObserver, TraceWriter};
use ra_route::RouteProvider;
use ra_sim::{Dispatch, DispatchBuilder, DispatchConfig, DispatchObserver, ProcessEvent};
use ra_trip::{CodeEntry, TripPhase};

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR:       &str = "output/bangalore";
/// Time the request sits unanswered before the responder accepts; long
/// enough for the search radius to widen once.
const ANSWER_AFTER_MS:  u64  = 22_000;
/// Resend interval while the responder has not seen the request.
const RESEND_MS:        u64  = 2_000;
const MAX_RESENDS:      u32  = 10;
const MAX_LEG_TICKS:    u64  = 20_000;

// ── Observer wrapper to count rows ───────────────────────────────────────────

struct CountingObserver<W: TraceWriter> {
    inner:     TraceObserver<W>,
    positions: usize,
    events:    usize,
}

impl<W: TraceWriter> CountingObserver<W> {
    fn new(inner: TraceObserver<W>) -> Self {
        Self { inner, positions: 0, events: 0 }
    }
}

impl<W: TraceWriter> DispatchObserver for CountingObserver<W> {
    fn on_event(&mut self, tick: Tick, role: Role, event: &ProcessEvent) {
        match event {
            ProcessEvent::Motion { .. } | ProcessEvent::VehicleUpdated(_) => self.positions += 1,
            ProcessEvent::CodePresented { code } => {
                println!("[{tick}] requester shows pickup code {code}");
                self.events += 1;
            }
            ProcessEvent::MirrorUpdated { phase } => {
                println!("[{tick}] requester sees trip {phase}");
                self.events += 1;
            }
            _ => self.events += 1,
        }
        self.inner.on_event(tick, role, event);
    }

    fn on_tick_end(&mut self, tick: Tick) {
        self.inner.on_tick_end(tick);
    }

    fn on_run_end(&mut self, final_tick: Tick) {
        self.inner.on_run_end(final_tick);
    }
}

// ── Script ────────────────────────────────────────────────────────────────────

/// Broadcast and keep resending until the responder holds the request.
fn broadcast<P: RouteProvider, O: DispatchObserver>(d: &mut Dispatch<P>, obs: &mut O) -> Result<()> {
    let resend_ticks = d.clock.ticks_for_ms(RESEND_MS);
    for _ in 0..=MAX_RESENDS {
        d.requester.request_help(d.now())?;
        if d.run_until(resend_ticks, obs, |d| d.responder.pending_request().is_some())? {
            return Ok(());
        }
    }
    bail!("responder never received the emergency request")
}

/// Step until the responder reaches `phase`, then once more so the requester
/// has a chance to see it.
fn drive_to<P: RouteProvider, O: DispatchObserver>(
    d:     &mut Dispatch<P>,
    obs:   &mut O,
    phase: TripPhase,
) -> Result<()> {
    if !d.run_until(MAX_LEG_TICKS, obs, |d| d.responder.phase() == phase)? {
        bail!("responder stuck in {} waiting for {phase}", d.responder.phase());
    }
    d.step(obs)?;
    Ok(())
}

/// A code of the same length that cannot match.
fn wrong_code(code: &str) -> String {
    code.chars()
        .map(|c| c.to_digit(10).map_or(c, |d| char::from(b'0' + ((d + 1) % 10) as u8)))
        .collect()
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    // 1. Configuration.
    let config = match std::env::args().nth(1) {
        Some(path) => DispatchConfig::from_path(&path)?,
        None => DispatchConfig::default(),
    };
    println!("=== bangalore — rapid_aid dispatch ===");
    println!(
        "Patient: {}  |  Responder: {} ({})  |  Tick: {} ms",
        config.patient, config.driver_name, config.vehicle, config.tick_ms
    );
    if !config.faults.is_reliable() {
        println!(
            "Channel faults: drop {:.0}%, duplicate {:.0}%, seed {}",
            config.faults.drop_rate * 100.0,
            config.faults.duplicate_rate * 100.0,
            config.faults.seed
        );
    }
    println!();

    // 2. Build dispatch.
    let code = config.verification_code.clone();
    let mut d = DispatchBuilder::new(config).provider(legs::provider()?).build()?;

    // 3. Set up output.
    let writer = CsvTraceWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = CountingObserver::new(TraceObserver::new(writer));

    // 4. Run the script.
    let t0 = Instant::now();

    broadcast(&mut d, &mut obs)?;
    let answer_ticks = d.clock.ticks_for_ms(ANSWER_AFTER_MS);
    d.run_ticks(answer_ticks, &mut obs)?;
    d.responder.accept_request(d.now())?;

    drive_to(&mut d, &mut obs, TripPhase::ArrivedPickup)?;

    let mut entry = CodeEntry::from(wrong_code(&code).as_str());
    if let Err(e) = d.responder.enter_code(&mut entry, d.now()) {
        println!("[{}] responder entered a wrong code: {e}", d.now());
    }
    let mut entry = CodeEntry::from(code.as_str());
    d.responder.enter_code(&mut entry, d.now())?;

    drive_to(&mut d, &mut obs, TripPhase::Completed)?;
    d.finish(&mut obs);
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 5. Summary.
    println!();
    println!(
        "Dispatch complete: {} simulated s in {:.3} s",
        d.now_ms() / 1_000,
        elapsed.as_secs_f64()
    );
    println!("  positions.csv : {} rows", obs.positions);
    println!("  events.csv    : {} rows", obs.events);
    let stats = d.channel.stats();
    println!(
        "  channel       : {} published, {} delivered, {} dropped, {} duplicated",
        stats.published, stats.delivered, stats.dropped, stats.duplicated
    );
    println!(
        "  requester     : mirror {}, escalation {:?}",
        d.requester.mirror(),
        d.requester.escalation_phase()
    );
    println!();

    // 6. Trip audit log.
    println!("{:<22} {:<22} {:<10} {:>9}", "From", "To", "Cause", "At (ms)");
    println!("{}", "-".repeat(66));
    for rec in d.responder.machine().history() {
        println!(
            "{:<22} {:<22} {:<10} {:>9}",
            rec.from.to_string(),
            rec.to.to_string(),
            format!("{:?}", rec.cause),
            rec.at_ms
        );
    }

    Ok(())
}
