//! Mock adapters for integration tests.
//!
//! Records every actuator call, telemetry send, reconnect request and delay
//! so tests can assert on the full history without touching real GPIO or
//! the network.

use std::cell::Cell;
use std::collections::VecDeque;

use embedded_hal::delay::DelayNs;
use waterharvest::app::events::AppEvent;
use waterharvest::app::ports::{
    ActuatorPort, ClimateSample, Clock, EventSink, NetworkLink, RawInputs, SensorPort, SinkError,
    SinkErrorKind, TelemetrySink,
};
use waterharvest::telemetry::TelemetryRecord;

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Relay(bool),
    Indicator(bool),
}

// ── MockHardware ──────────────────────────────────────────────

/// Raw inputs for a dry field on a sunny day with a full tank.
pub fn thirsty_inputs() -> RawInputs {
    RawInputs {
        soil_adc: 400,          // 9 %
        solar_adc: 3800,        // 3.06 V
        echo_round_trip_us: Some(588), // 9 cm → 91 %
        climate: ClimateSample::ok(22.0, 55.0),
    }
}

/// Same field after watering.
pub fn soaked_inputs() -> RawInputs {
    RawInputs {
        soil_adc: 3000, // 73 %
        ..thirsty_inputs()
    }
}

pub struct MockHardware {
    pub inputs: RawInputs,
    pub calls: Vec<ActuatorCall>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new(inputs: RawInputs) -> Self {
        Self {
            inputs,
            calls: Vec::new(),
        }
    }

    pub fn relay_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Relay(on) => Some(*on),
                ActuatorCall::Indicator(_) => None,
            })
            .unwrap_or(false)
    }

    pub fn indicator_on(&self) -> bool {
        self.calls
            .iter()
            .rev()
            .find_map(|c| match c {
                ActuatorCall::Indicator(on) => Some(*on),
                ActuatorCall::Relay(_) => None,
            })
            .unwrap_or(false)
    }
}

impl SensorPort for MockHardware {
    fn read_raw(&mut self) -> RawInputs {
        self.inputs
    }
}

impl ActuatorPort for MockHardware {
    fn set_pump_relay(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Relay(on));
    }

    fn set_indicator(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Indicator(on));
    }
}

// ── MockClock ─────────────────────────────────────────────────

pub struct MockClock {
    now: Cell<u64>,
}

#[allow(dead_code)]
impl MockClock {
    pub fn at(secs: u64) -> Self {
        Self { now: Cell::new(secs) }
    }

    pub fn advance(&self, secs: u64) {
        self.now.set(self.now.get() + secs);
    }
}

impl Clock for MockClock {
    fn now_secs(&self) -> u64 {
        self.now.get()
    }
}

// ── MockSink ──────────────────────────────────────────────────

pub struct MockSink {
    pub ready: bool,
    /// Failures to return for the next sends, in order; empty means success.
    pub script: VecDeque<SinkErrorKind>,
    pub sent: Vec<TelemetryRecord>,
}

#[allow(dead_code)]
impl MockSink {
    pub fn ready() -> Self {
        Self {
            ready: true,
            script: VecDeque::new(),
            sent: Vec::new(),
        }
    }

    pub fn fail_next(&mut self, kind: SinkErrorKind) {
        self.script.push_back(kind);
    }

    pub fn sequences(&self) -> Vec<u32> {
        self.sent.iter().map(|r| r.sequence).collect()
    }
}

impl TelemetrySink for MockSink {
    fn is_ready(&self) -> bool {
        self.ready
    }

    fn send(&mut self, record: &TelemetryRecord) -> Result<(), SinkError> {
        self.sent.push(*record);
        match self.script.pop_front() {
            Some(kind) => Err(SinkError::new(kind, "scripted")),
            None => Ok(()),
        }
    }
}

// ── MockLink ──────────────────────────────────────────────────

pub struct MockLink {
    pub up: bool,
    pub reconnects: u32,
}

#[allow(dead_code)]
impl MockLink {
    pub fn up() -> Self {
        Self {
            up: true,
            reconnects: 0,
        }
    }

    pub fn down() -> Self {
        Self {
            up: false,
            reconnects: 0,
        }
    }
}

impl NetworkLink for MockLink {
    fn is_up(&self) -> bool {
        self.up
    }

    fn request_reconnect(&mut self) {
        self.reconnects += 1;
    }
}

// ── RecordingDelay ────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingDelay {
    pub total_ms: u64,
}

impl DelayNs for RecordingDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ms += u64::from(ns) / 1_000_000;
    }

    fn delay_ms(&mut self, ms: u32) {
        self.total_ms += u64::from(ms);
    }
}

// ── EventLog ──────────────────────────────────────────────────

#[derive(Default)]
pub struct EventLog {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl EventLog {
    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
