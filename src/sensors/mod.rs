//! Sensor subsystem: individual probes, the aggregating [`SensorHub`], and
//! [`SensorAcquisition`], which turns raw inputs into a [`SensorReading`].
//!
//! ```text
//!  SensorHub::read_raw() ──▶ RawInputs ──▶ SensorAcquisition::acquire() ──▶ SensorReading
//! ```
//!
//! Acquisition never retries and never fails: a missing echo reads as an
//! empty tank and a failed climate probe leaves temperature and humidity
//! undefined for this tick.

pub mod soil_moisture;
pub mod solar;
pub mod water_level;

use log::{debug, warn};

use crate::app::ports::{HumiditySensor, PulseSensor, RawInputs, SensorPort};
use crate::config::SystemConfig;
use soil_moisture::SoilMoistureSensor;
use solar::SolarSensor;

// ---------------------------------------------------------------------------
// SensorReading
// ---------------------------------------------------------------------------

/// Canonical, normalised view of every sensor for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorReading {
    /// Soil moisture, 0–100 %.
    pub soil_moisture_percent: u8,
    /// Tank fill level, 0–100 %.
    pub water_level_percent: u8,
    /// Solar panel voltage, 0 – ADC reference.
    pub solar_voltage: f32,
    /// Ambient temperature (°C); `None` when the probe read failed.
    pub temperature_c: Option<f32>,
    /// Relative humidity (%); `None` when the probe read failed.
    pub humidity_percent: Option<f32>,
    /// Clock seconds at acquisition time.
    pub timestamp_secs: u64,
}

// ---------------------------------------------------------------------------
// SensorAcquisition
// ---------------------------------------------------------------------------

/// Normalises [`RawInputs`] using the configured sensor calibration.
#[derive(Debug, Clone)]
pub struct SensorAcquisition {
    adc_max: u16,
    reference_voltage: f32,
    tank_depth_cm: u16,
}

impl SensorAcquisition {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            adc_max: config.adc_max,
            reference_voltage: config.adc_reference_voltage,
            tank_depth_cm: config.tank_depth_cm,
        }
    }

    pub fn acquire(&self, raw: &RawInputs, timestamp_secs: u64) -> SensorReading {
        let soil_moisture_percent = soil_moisture::moisture_percent(raw.soil_adc, self.adc_max);

        match raw.echo_round_trip_us {
            Some(us) => debug!("Distance: {} cm", water_level::distance_cm(us)),
            None => warn!("Ultrasonic: no echo, reporting empty tank"),
        }
        let water_level_percent =
            water_level::level_from_echo(raw.echo_round_trip_us, self.tank_depth_cm);

        let solar_voltage = solar::voltage(raw.solar_adc, self.adc_max, self.reference_voltage);

        let (temperature_c, humidity_percent) = match raw.climate.status {
            Ok(()) => (
                Some(raw.climate.temperature_c),
                Some(raw.climate.humidity_percent),
            ),
            Err(e) => {
                warn!("Climate probe read failed ({}), degraded sample", e);
                (None, None)
            }
        };

        SensorReading {
            soil_moisture_percent,
            water_level_percent,
            solar_voltage,
            temperature_c,
            humidity_percent,
            timestamp_secs,
        }
    }
}

// ---------------------------------------------------------------------------
// SensorHub
// ---------------------------------------------------------------------------

/// Aggregates every sensor driver and produces one [`RawInputs`] per tick.
///
/// Generic over the ranger and the climate probe so either can be swapped
/// for a bench double.
pub struct SensorHub<P, H> {
    pub soil: SoilMoistureSensor,
    pub solar: SolarSensor,
    pub ranger: P,
    pub climate: H,
}

impl<P: PulseSensor, H: HumiditySensor> SensorHub<P, H> {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(soil: SoilMoistureSensor, solar: SolarSensor, ranger: P, climate: H) -> Self {
        Self {
            soil,
            solar,
            ranger,
            climate,
        }
    }
}

impl<P: PulseSensor, H: HumiditySensor> SensorPort for SensorHub<P, H> {
    fn read_raw(&mut self) -> RawInputs {
        RawInputs {
            soil_adc: self.soil.read_raw(),
            solar_adc: self.solar.read_raw(),
            echo_round_trip_us: self.ranger.measure_round_trip_us(),
            climate: self.climate.read(),
        }
    }
}
