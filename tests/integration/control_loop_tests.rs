//! Integration tests for the ControlLoop → actuators / telemetry pipeline.

use waterharvest::app::events::AppEvent;
use waterharvest::app::ports::{ClimateSample, SinkErrorKind};
use waterharvest::app::service::ControlLoop;
use waterharvest::config::SystemConfig;
use waterharvest::control::decision::PumpDecision;
use waterharvest::error::SensorError;
use waterharvest::telemetry::ReportOutcome;

use crate::mock_hw::{
    ActuatorCall, EventLog, MockClock, MockHardware, MockLink, MockSink, RecordingDelay,
    soaked_inputs, thirsty_inputs,
};

struct Rig {
    control: ControlLoop,
    hw: MockHardware,
    clock: MockClock,
    sink: MockSink,
    link: MockLink,
    delay: RecordingDelay,
    events: EventLog,
}

impl Rig {
    fn new() -> Self {
        let mut rig = Self {
            control: ControlLoop::new(&SystemConfig::default()),
            hw: MockHardware::new(thirsty_inputs()),
            clock: MockClock::at(1_754_913_600),
            sink: MockSink::ready(),
            link: MockLink::up(),
            delay: RecordingDelay::default(),
            events: EventLog::default(),
        };
        rig.control.start(&mut rig.hw, &mut rig.events);
        rig
    }

    fn tick(&mut self) -> waterharvest::app::service::TickResult {
        self.control.tick(
            &mut self.hw,
            &self.clock,
            &mut self.sink,
            &mut self.link,
            &mut self.delay,
            &mut self.events,
        )
    }

    /// Tick, then advance the clock by one 5 s control period.
    fn tick_and_wait(&mut self) -> waterharvest::app::service::TickResult {
        let r = self.tick();
        self.clock.advance(5);
        r
    }
}

// ── Start-up ──────────────────────────────────────────────────

#[test]
fn start_releases_outputs_and_announces() {
    let rig = Rig::new();
    assert_eq!(
        rig.hw.calls,
        vec![ActuatorCall::Relay(false), ActuatorCall::Indicator(false)]
    );
    assert_eq!(rig.events.events, vec![AppEvent::Started]);
}

// ── Actuation ─────────────────────────────────────────────────

#[test]
fn dry_soil_turns_pump_and_indicator_on() {
    let mut rig = Rig::new();
    let r = rig.tick();
    assert_eq!(r.decision, PumpDecision::RUN);
    assert!(rig.hw.relay_on());
    assert!(rig.hw.indicator_on());
    assert_eq!(rig.control.pump_decision(), Some(PumpDecision::RUN));
}

#[test]
fn steady_decision_writes_outputs_once() {
    let mut rig = Rig::new();
    for _ in 0..5 {
        rig.tick_and_wait();
    }
    // two writes at start, two on the first RUN, none afterwards
    assert_eq!(rig.hw.calls.len(), 4);
    assert_eq!(
        rig.events.count(|e| matches!(e, AppEvent::PumpChanged { .. })),
        1
    );
}

#[test]
fn pump_stops_once_soil_is_wet() {
    let mut rig = Rig::new();
    rig.tick_and_wait();
    rig.hw.inputs = soaked_inputs();
    let r = rig.tick();
    assert_eq!(r.decision, PumpDecision::STOP);
    assert!(!rig.hw.relay_on());
    assert!(!rig.hw.indicator_on());
}

#[test]
fn no_echo_reads_as_empty_tank_and_blocks_pump() {
    let mut rig = Rig::new();
    rig.hw.inputs.echo_round_trip_us = None;
    let r = rig.tick();
    assert_eq!(r.reading.water_level_percent, 0);
    assert_eq!(r.decision, PumpDecision::STOP);
}

#[test]
fn failed_climate_probe_still_decides_on_base_threshold() {
    let mut rig = Rig::new();
    rig.hw.inputs.climate = ClimateSample::failed(SensorError::ProbeTimeout);
    let r = rig.tick();
    assert_eq!(r.reading.temperature_c, None);
    assert_eq!(r.reading.humidity_percent, None);
    assert_eq!(r.decision, PumpDecision::RUN);
}

#[test]
fn night_time_solar_keeps_pump_off() {
    let mut rig = Rig::new();
    rig.hw.inputs.solar_adc = 500;
    assert_eq!(rig.tick().decision, PumpDecision::STOP);
}

// ── Telemetry ─────────────────────────────────────────────────

#[test]
fn telemetry_is_rate_limited_across_five_second_ticks() {
    let mut rig = Rig::new();
    // 13 ticks, 5 s apart: t = 0, 5, ..., 60
    for _ in 0..13 {
        rig.tick_and_wait();
    }
    // sends at t = 0, 30, 60
    assert_eq!(rig.sink.sequences(), vec![0, 1, 2]);
    let stamps: Vec<u64> = rig.sink.sent.iter().map(|r| r.timestamp_secs).collect();
    assert_eq!(stamps, vec![1_754_913_600, 1_754_913_630, 1_754_913_660]);
}

#[test]
fn record_carries_the_tick_reading_and_decision() {
    let mut rig = Rig::new();
    let r = rig.tick();
    let rec = &rig.sink.sent[0];
    assert_eq!(rec.reading, r.reading);
    assert_eq!(rec.decision, r.decision);
}

#[test]
fn pump_switches_before_a_failing_send() {
    let mut rig = Rig::new();
    rig.sink.fail_next(SinkErrorKind::Connection);
    let r = rig.tick();
    assert_eq!(r.telemetry, ReportOutcome::FailedConnection { sequence: 0 });
    assert!(rig.hw.relay_on());
    assert_eq!(rig.link.reconnects, 1);
    assert_eq!(rig.delay.total_ms, 5_000);
}

#[test]
fn sequence_numbers_survive_mixed_failures() {
    let mut rig = Rig::new();
    rig.sink.fail_next(SinkErrorKind::Auth);
    rig.sink.fail_next(SinkErrorKind::Connection);
    for _ in 0..4 {
        rig.tick();
        rig.clock.advance(30);
    }
    assert_eq!(rig.sink.sequences(), vec![0, 1, 2, 3]);
    assert_eq!(rig.link.reconnects, 1);
}

#[test]
fn sink_not_ready_with_link_down_emits_link_lost() {
    let mut rig = Rig::new();
    rig.sink.ready = false;
    rig.link = MockLink::down();
    let r = rig.tick();
    assert_eq!(
        r.telemetry,
        ReportOutcome::SinkNotReady {
            reconnect_requested: true
        }
    );
    assert_eq!(rig.link.reconnects, 1);
    assert_eq!(rig.events.count(|e| *e == AppEvent::LinkLost), 1);
    // actuation is unaffected
    assert!(rig.hw.relay_on());
}

#[test]
fn sink_recovering_sends_immediately() {
    let mut rig = Rig::new();
    rig.sink.ready = false;
    rig.tick_and_wait();
    rig.sink.ready = true;
    let r = rig.tick();
    assert_eq!(r.telemetry, ReportOutcome::Sent { sequence: 0 });
}

#[test]
fn every_tick_emits_a_reading() {
    let mut rig = Rig::new();
    for _ in 0..3 {
        rig.tick_and_wait();
    }
    assert_eq!(
        rig.events
            .count(|e| matches!(e, AppEvent::Reading { .. })),
        3
    );
    assert_eq!(rig.control.tick_count(), 3);
}
