//! Telemetry reporter: rate-limited, best-effort shipping of readings.
//!
//! ```text
//!                 ┌───────────── sink not ready ─────────────▶ SinkNotReady
//!                 │                                              (reconnect if link down)
//!  report() ──────┼── sent < interval ago ───────────────────▶ RateLimited
//!                 │
//!                 └── READY_TO_SEND ──▶ SENDING ──┬─ Ok ─────▶ Sent
//!                                                 ├─ Conn ───▶ FailedConnection
//!                                                 │             (reconnect + backoff)
//!                                                 └─ other ──▶ FailedOther
//! ```
//!
//! A failed send still consumes its sequence number and resets the rate
//! window; the record is never retried.

pub mod record;

use embedded_hal::delay::DelayNs;
use log::{debug, error, info, warn};

use crate::app::ports::{NetworkLink, TelemetrySink};
use crate::config::SystemConfig;
use crate::control::decision::PumpDecision;
use crate::sensors::SensorReading;

pub use record::TelemetryRecord;

/// Mutable reporter state; lives for the whole process.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReporterState {
    /// Clock seconds of the last send attempt; `None` before the first.
    pub last_send_secs: Option<u64>,
    /// Sequence number the next attempted send will carry.
    pub sequence_counter: u32,
}

/// What a single [`TelemetryReporter::report`] call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOutcome {
    /// The sink could not accept a send.  Nothing was consumed.
    SinkNotReady { reconnect_requested: bool },
    /// Too soon since the last attempt.
    RateLimited,
    /// The remote accepted the record.
    Sent { sequence: u32 },
    /// Connectivity failure; a reconnect was requested and the backoff served.
    FailedConnection { sequence: u32 },
    /// Any other failure; logged only.
    FailedOther { sequence: u32 },
}

impl ReportOutcome {
    /// Whether this call consumed a sequence number.
    pub fn attempted(&self) -> bool {
        matches!(
            self,
            Self::Sent { .. } | Self::FailedConnection { .. } | Self::FailedOther { .. }
        )
    }
}

pub struct TelemetryReporter {
    state: ReporterState,
    interval_secs: u64,
    backoff_ms: u32,
}

impl TelemetryReporter {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            state: ReporterState::default(),
            interval_secs: u64::from(config.telemetry_interval_secs),
            backoff_ms: config.reconnect_backoff_secs.saturating_mul(1000),
        }
    }

    pub fn state(&self) -> ReporterState {
        self.state
    }

    /// Offer one reading to the remote sink.
    ///
    /// Blocks for the sink's own timeout while sending, and additionally for
    /// the reconnect backoff after a connectivity failure.
    pub fn report(
        &mut self,
        reading: &SensorReading,
        decision: PumpDecision,
        now_secs: u64,
        sink: &mut impl TelemetrySink,
        link: &mut impl NetworkLink,
        delay: &mut impl DelayNs,
    ) -> ReportOutcome {
        if !sink.is_ready() {
            let reconnect_requested = !link.is_up();
            if reconnect_requested {
                warn!("Telemetry sink not ready and link down, requesting reconnect");
                link.request_reconnect();
            } else {
                debug!("Telemetry sink not ready");
            }
            return ReportOutcome::SinkNotReady {
                reconnect_requested,
            };
        }

        if let Some(last) = self.state.last_send_secs {
            if now_secs.saturating_sub(last) < self.interval_secs {
                return ReportOutcome::RateLimited;
            }
        }

        let sequence = self.state.sequence_counter;
        self.state.sequence_counter = sequence.wrapping_add(1);
        self.state.last_send_secs = Some(now_secs);

        let record = TelemetryRecord::new(*reading, decision, sequence, now_secs);

        match sink.send(&record) {
            Ok(()) => {
                info!("Telemetry #{} sent", sequence);
                ReportOutcome::Sent { sequence }
            }
            Err(e) if e.kind.is_connectivity() => {
                error!("Telemetry #{} failed: {}, reconnecting", sequence, e);
                link.request_reconnect();
                delay.delay_ms(self.backoff_ms);
                ReportOutcome::FailedConnection { sequence }
            }
            Err(e) => {
                error!("Telemetry #{} failed: {}", sequence, e);
                ReportOutcome::FailedOther { sequence }
            }
        }
    }
}
