//! Control loop: the hexagonal core.
//!
//! [`ControlLoop`] owns acquisition, the decision engine, the actuator
//! controller and the telemetry reporter.  All I/O flows through port
//! traits injected at call sites, making the whole loop testable with mock
//! adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │          ControlLoop          │
//! ActuatorPort ◀──│ Acquire · Decide · Actuate    │──▶ TelemetrySink
//!                 │            · Report           │◀── Clock / NetworkLink
//!                 └──────────────────────────────┘
//! ```
//!
//! The pump is switched before telemetry is attempted, so a slow or failing
//! sink never delays actuation.

use embedded_hal::delay::DelayNs;
use log::{error, info};

use crate::config::SystemConfig;
use crate::control::actuator::ActuatorController;
use crate::control::decision::{DecisionEngine, PumpDecision};
use crate::error::{CommsError, Error};
use crate::sensors::{SensorAcquisition, SensorReading};
use crate::telemetry::{ReportOutcome, TelemetryReporter};

use super::events::AppEvent;
use super::ports::{ActuatorPort, Clock, EventSink, NetworkLink, SensorPort, TelemetrySink};

/// Everything one tick produced, for callers that want more than events.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickResult {
    pub reading: SensorReading,
    pub decision: PumpDecision,
    pub telemetry: ReportOutcome,
}

// ───────────────────────────────────────────────────────────────
// ControlLoop
// ───────────────────────────────────────────────────────────────

pub struct ControlLoop {
    acquisition: SensorAcquisition,
    engine: DecisionEngine,
    actuators: ActuatorController,
    reporter: TelemetryReporter,
    tick_count: u64,
}

impl ControlLoop {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            acquisition: SensorAcquisition::new(config),
            engine: DecisionEngine::new(config),
            actuators: ActuatorController::new(),
            reporter: TelemetryReporter::new(config),
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Release the pump outputs and announce the loop.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, events: &mut impl EventSink) {
        self.actuators.force_off(hw);
        events.emit(&AppEvent::Started);
        info!("Control loop started, pump released");
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full cycle: read sensors → decide → actuate → report.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`ActuatorPort`]; this avoids a double mutable borrow while keeping
    /// the port boundary explicit.
    pub fn tick(
        &mut self,
        hw: &mut (impl SensorPort + ActuatorPort),
        clock: &impl Clock,
        sink: &mut impl TelemetrySink,
        link: &mut impl NetworkLink,
        delay: &mut impl DelayNs,
        events: &mut impl EventSink,
    ) -> TickResult {
        self.tick_count += 1;

        // 1. Acquire
        let raw = hw.read_raw();
        let now = clock.now_secs();
        let reading = self.acquisition.acquire(&raw, now);

        // 2. Decide
        let decision = self.engine.decide(&reading);
        events.emit(&AppEvent::Reading { reading, decision });

        // 3. Actuate
        if self.actuators.apply(decision, hw) {
            events.emit(&AppEvent::PumpChanged {
                running: decision.should_run,
            });
        }

        // 4. Report (rate-limited, best effort)
        let telemetry = self
            .reporter
            .report(&reading, decision, now, sink, link, delay);
        match telemetry {
            ReportOutcome::SinkNotReady {
                reconnect_requested: true,
            } => events.emit(&AppEvent::LinkLost),
            outcome if outcome.attempted() => events.emit(&AppEvent::Telemetry(outcome)),
            _ => {}
        }

        TickResult {
            reading,
            decision,
            telemetry,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Decision currently applied to the outputs.
    pub fn pump_decision(&self) -> Option<PumpDecision> {
        self.actuators.applied()
    }
}

// ───────────────────────────────────────────────────────────────
// Link bring-up
// ───────────────────────────────────────────────────────────────

/// Block until the link reports up, polling every `poll_ms`.
///
/// Gives up after `timeout_secs` with
/// [`CommsError::LinkEstablishmentFailed`], which is fatal.
pub fn await_link(
    link: &impl NetworkLink,
    delay: &mut impl DelayNs,
    timeout_secs: u32,
    poll_ms: u32,
) -> Result<(), Error> {
    let poll_ms = poll_ms.max(1);
    let budget_ms = u64::from(timeout_secs) * 1000;
    let mut waited_ms: u64 = 0;

    while !link.is_up() {
        if waited_ms >= budget_ms {
            error!("Network link not up after {} s", timeout_secs);
            return Err(CommsError::LinkEstablishmentFailed.into());
        }
        delay.delay_ms(poll_ms);
        waited_ms += u64::from(poll_ms);
    }

    info!("Network link up after ~{} ms", waited_ms);
    Ok(())
}
