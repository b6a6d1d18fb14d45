//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, the network link, the telemetry sink,
//! event sinks) implement these traits.  The
//! [`ControlLoop`](super::service::ControlLoop) consumes them via generics, so
//! the domain core never touches hardware directly.  The blocking pause used
//! for telemetry backoff is the `embedded_hal::delay::DelayNs` trait rather
//! than a port of our own.

use core::fmt;

use crate::error::SensorError;
use crate::telemetry::TelemetryRecord;

// ───────────────────────────────────────────────────────────────
// Sensor ports (driven adapters: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Raw, unnormalised inputs gathered once per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawInputs {
    /// Soil probe ADC sample (0 – adc_max).
    pub soil_adc: u16,
    /// Solar divider ADC sample (0 – adc_max).
    pub solar_adc: u16,
    /// Ultrasonic round-trip time in µs; `None` when no echo arrived.
    pub echo_round_trip_us: Option<u32>,
    /// Humidity/temperature probe result.
    pub climate: ClimateSample,
}

/// One humidity/temperature probe read.
///
/// The values are only meaningful when `status` is `Ok`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateSample {
    pub temperature_c: f32,
    pub humidity_percent: f32,
    pub status: Result<(), SensorError>,
}

impl ClimateSample {
    pub fn ok(temperature_c: f32, humidity_percent: f32) -> Self {
        Self {
            temperature_c,
            humidity_percent,
            status: Ok(()),
        }
    }

    pub fn failed(err: SensorError) -> Self {
        Self {
            temperature_c: f32::NAN,
            humidity_percent: f32::NAN,
            status: Err(err),
        }
    }
}

/// Read-side port: the domain calls this to obtain every raw input.
pub trait SensorPort {
    fn read_raw(&mut self) -> RawInputs;
}

/// Time-of-flight distance primitive (ultrasonic ranger).
pub trait PulseSensor {
    /// Fire one ping and return the echo round-trip time in µs, or `None`
    /// if nothing came back before the timeout.
    fn measure_round_trip_us(&mut self) -> Option<u32>;
}

/// Combined humidity/temperature probe.
pub trait HumiditySensor {
    fn read(&mut self) -> ClimateSample;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command outputs.
///
/// Writes are assumed infallible at this layer.
pub trait ActuatorPort {
    /// Energise (`true`) or release the pump relay.
    fn set_pump_relay(&mut self, on: bool);

    /// Drive the "pump running" indicator LED.
    fn set_indicator(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Time and network collaborators
// ───────────────────────────────────────────────────────────────

/// Monotonic-enough seconds counter for interval comparisons.
pub trait Clock {
    fn now_secs(&self) -> u64;
}

/// The underlying network link (WiFi station).
pub trait NetworkLink {
    fn is_up(&self) -> bool;

    /// Ask the link to reconnect.  Fire-and-forget and idempotent.
    fn request_reconnect(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Telemetry sink (driven adapter: domain → remote database)
// ───────────────────────────────────────────────────────────────

/// Remote destination for [`TelemetryRecord`]s.
pub trait TelemetrySink {
    /// Whether the sink is able to accept a send right now.
    fn is_ready(&self) -> bool;

    /// Ship one record.  Blocks until the remote answers or the sink's own
    /// timeout elapses.
    fn send(&mut self, record: &TelemetryRecord) -> Result<(), SinkError>;
}

/// Structured failure category reported by a [`TelemetrySink`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkErrorKind {
    /// The transport could not reach the remote (DNS, TCP, TLS, lost link).
    Connection,
    /// The remote refused our credentials.
    Auth,
    /// The remote refused the payload itself.
    Rejected,
    /// Anything else (server-side errors, unexpected status codes).
    Other,
}

impl SinkErrorKind {
    /// Connectivity-class failures trigger reconnect plus backoff.
    pub fn is_connectivity(self) -> bool {
        matches!(self, Self::Connection)
    }
}

/// Error returned by [`TelemetrySink::send`]: a category plus a short
/// human-readable reason for the logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkError {
    pub kind: SinkErrorKind,
    pub reason: heapless::String<64>,
}

impl SinkError {
    /// Build an error, truncating `reason` to fit the fixed buffer.
    pub fn new(kind: SinkErrorKind, reason: &str) -> Self {
        let mut r = heapless::String::new();
        for ch in reason.chars() {
            if r.push(ch).is_err() {
                break;
            }
        }
        Self { kind, reason: r }
    }
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.reason)
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → local log)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go (serial log, display,
/// etc.).
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
