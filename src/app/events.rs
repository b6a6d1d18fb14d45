//! Outbound application events.
//!
//! The [`ControlLoop`](super::service::ControlLoop) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them; the firmware logs them to serial.

use crate::control::decision::PumpDecision;
use crate::sensors::SensorReading;
use crate::telemetry::ReportOutcome;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The control loop has started.
    Started,

    /// One tick's normalised reading and the decision taken on it.
    Reading {
        reading: SensorReading,
        decision: PumpDecision,
    },

    /// The pump outputs were switched.
    PumpChanged { running: bool },

    /// The telemetry reporter attempted a send (rate-limited ticks are not
    /// reported).
    Telemetry(ReportOutcome),

    /// The sink was not ready and the network link was found down.
    LinkLost,
}
