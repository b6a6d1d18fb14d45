//! Telemetry record and its JSON wire form.
//!
//! ```json
//! {"soilMoisture":42,"waterLevel":80,"solarVoltage":2.9,"pumpStatus":0,
//!  "temperature":24.1,"humidity":55.0,"timestamp":1754913600,"count":7}
//! ```
//!
//! Undefined climate values serialize as `null`.

use serde::Serialize;

use crate::control::decision::PumpDecision;
use crate::sensors::SensorReading;

/// One unit of remote telemetry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TelemetryRecord {
    pub reading: SensorReading,
    pub decision: PumpDecision,
    /// Position in the stream of attempted sends, starting at 0.
    pub sequence: u32,
    /// Clock seconds when the send was attempted.
    pub timestamp_secs: u64,
}

/// Borrowed serde view with the remote database's field names.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TelemetryPayload {
    soil_moisture: u8,
    water_level: u8,
    solar_voltage: f32,
    pump_status: u8,
    temperature: Option<f32>,
    humidity: Option<f32>,
    timestamp: u64,
    count: u32,
}

impl From<&TelemetryRecord> for TelemetryPayload {
    fn from(r: &TelemetryRecord) -> Self {
        Self {
            soil_moisture: r.reading.soil_moisture_percent,
            water_level: r.reading.water_level_percent,
            solar_voltage: r.reading.solar_voltage,
            pump_status: u8::from(r.decision.should_run),
            temperature: r.reading.temperature_c.filter(|t| t.is_finite()),
            humidity: r.reading.humidity_percent.filter(|h| h.is_finite()),
            timestamp: r.timestamp_secs,
            count: r.sequence,
        }
    }
}

impl TelemetryRecord {
    pub fn new(reading: SensorReading, decision: PumpDecision, sequence: u32, timestamp_secs: u64) -> Self {
        Self {
            reading,
            decision,
            sequence,
            timestamp_secs,
        }
    }

    /// Serialize to the remote JSON document.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&TelemetryPayload::from(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading() -> SensorReading {
        SensorReading {
            soil_moisture_percent: 42,
            water_level_percent: 80,
            solar_voltage: 2.9,
            temperature_c: Some(24.5),
            humidity_percent: Some(55.0),
            timestamp_secs: 1_754_913_600,
        }
    }

    fn value(r: &TelemetryRecord) -> serde_json::Value {
        serde_json::from_str(&r.to_json().unwrap()).unwrap()
    }

    #[test]
    fn payload_uses_remote_field_names() {
        let rec = TelemetryRecord::new(reading(), PumpDecision::RUN, 7, 1_754_913_600);
        let v = value(&rec);
        assert_eq!(v["soilMoisture"], 42);
        assert_eq!(v["waterLevel"], 80);
        assert_eq!(v["pumpStatus"], 1);
        assert_eq!(v["temperature"], 24.5);
        assert_eq!(v["humidity"], 55.0);
        assert_eq!(v["timestamp"], 1_754_913_600u64);
        assert_eq!(v["count"], 7);
        assert!((v["solarVoltage"].as_f64().unwrap() - 2.9).abs() < 1e-4);
    }

    #[test]
    fn pump_off_is_zero() {
        let rec = TelemetryRecord::new(reading(), PumpDecision::STOP, 0, 0);
        assert_eq!(value(&rec)["pumpStatus"], 0);
    }

    #[test]
    fn undefined_climate_is_null() {
        let mut r = reading();
        r.temperature_c = None;
        r.humidity_percent = Some(f32::NAN);
        let v = value(&TelemetryRecord::new(r, PumpDecision::STOP, 0, 0));
        assert!(v["temperature"].is_null());
        assert!(v["humidity"].is_null());
    }

    #[test]
    fn payload_has_exactly_eight_fields() {
        let v = value(&TelemetryRecord::new(reading(), PumpDecision::STOP, 0, 0));
        assert_eq!(v.as_object().unwrap().len(), 8);
    }
}
