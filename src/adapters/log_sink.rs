//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART in production).  Every tick
//! produces one status line:
//!
//! ```text
//! Soil: 42%, Water: 80%, Solar: 2.90V, Temp: 24.1C, Humid: 55.0%, Pump: OFF
//! ```

use core::fmt;

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;
use crate::control::decision::PumpDecision;
use crate::sensors::SensorReading;
use crate::telemetry::ReportOutcome;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

/// Formats a climate value, or `--` when the probe read failed.
struct Maybe(Option<f32>);

impl fmt::Display for Maybe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{:.1}", v),
            None => f.write_str("--"),
        }
    }
}

/// The per-tick status line.
pub struct StatusLine<'a> {
    pub reading: &'a SensorReading,
    pub decision: PumpDecision,
}

impl fmt::Display for StatusLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.reading;
        write!(
            f,
            "Soil: {}%, Water: {}%, Solar: {:.2}V, Temp: {}C, Humid: {}%, Pump: {}",
            r.soil_moisture_percent,
            r.water_level_percent,
            r.solar_voltage,
            Maybe(r.temperature_c),
            Maybe(r.humidity_percent),
            if self.decision.should_run { "ON" } else { "OFF" },
        )
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started => {
                info!("START | control loop running");
            }
            AppEvent::Reading { reading, decision } => {
                info!(
                    "{}",
                    StatusLine {
                        reading,
                        decision: *decision,
                    }
                );
            }
            AppEvent::PumpChanged { running } => {
                info!("PUMP  | {}", if *running { "ON" } else { "OFF" });
            }
            AppEvent::Telemetry(outcome) => match outcome {
                ReportOutcome::Sent { sequence } => info!("TELEM | #{} sent", sequence),
                ReportOutcome::FailedConnection { sequence } => {
                    warn!("TELEM | #{} failed (connection), backed off", sequence);
                }
                ReportOutcome::FailedOther { sequence } => {
                    warn!("TELEM | #{} failed", sequence);
                }
                ReportOutcome::SinkNotReady { .. } | ReportOutcome::RateLimited => {}
            },
            AppEvent::LinkLost => {
                warn!("LINK  | down, reconnect requested");
            }
        }
    }
}
