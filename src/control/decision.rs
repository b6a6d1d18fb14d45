//! Irrigation decision engine.
//!
//! A pure, memoryless mapping from one [`SensorReading`] to a
//! [`PumpDecision`].  There is no hysteresis: readings hovering at a
//! boundary may flip the pump every tick.
//!
//! ## Rule
//!
//! 1. The moisture threshold starts at the base value (30 %).  Under heat
//!    stress (`temperature > 30 °C`) or dry air (`humidity < 40 %`) it drops
//!    to the stressed value (25 %).
//! 2. The pump runs only when **all** of these hold:
//!    - `solar_voltage > 2.5 V`: enough power to drive it
//!    - `soil_moisture < threshold`: the soil is dry
//!    - `water_level > 10 %`: water available above the safety margin
//!
//! An undefined temperature or humidity makes its comparison false, so
//! missing climate data never lowers the threshold.

use crate::config::SystemConfig;
use crate::sensors::SensorReading;

/// Whether the pump should be running this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpDecision {
    pub should_run: bool,
}

impl PumpDecision {
    pub const RUN: Self = Self { should_run: true };
    pub const STOP: Self = Self { should_run: false };
}

/// Thresholds captured from [`SystemConfig`]; `decide` is pure over them.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    base_threshold: u8,
    stressed_threshold: u8,
    heat_stress_c: f32,
    dry_stress_percent: f32,
    min_solar_voltage: f32,
    min_water_level: u8,
}

impl DecisionEngine {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            base_threshold: config.base_moisture_threshold_percent,
            stressed_threshold: config.stressed_moisture_threshold_percent,
            heat_stress_c: config.heat_stress_temperature_c,
            dry_stress_percent: config.dry_stress_humidity_percent,
            min_solar_voltage: config.min_solar_voltage,
            min_water_level: config.min_water_level_percent,
        }
    }

    /// Moisture threshold adapted to the current weather.
    pub fn moisture_threshold(&self, reading: &SensorReading) -> u8 {
        let hot = reading
            .temperature_c
            .is_some_and(|t| t > self.heat_stress_c);
        let dry = reading
            .humidity_percent
            .is_some_and(|h| h < self.dry_stress_percent);

        if hot || dry {
            self.stressed_threshold
        } else {
            self.base_threshold
        }
    }

    pub fn decide(&self, reading: &SensorReading) -> PumpDecision {
        let threshold = self.moisture_threshold(reading);

        let powered = reading.solar_voltage > self.min_solar_voltage;
        let dry_soil = reading.soil_moisture_percent < threshold;
        let water_available = reading.water_level_percent > self.min_water_level;

        PumpDecision {
            should_run: powered && dry_soil && water_available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> DecisionEngine {
        DecisionEngine::new(&SystemConfig::default())
    }

    fn reading(soil: u8, water: u8, solar: f32, temp: Option<f32>, hum: Option<f32>) -> SensorReading {
        SensorReading {
            soil_moisture_percent: soil,
            water_level_percent: water,
            solar_voltage: solar,
            temperature_c: temp,
            humidity_percent: hum,
            timestamp_secs: 0,
        }
    }

    /// Mild weather: threshold stays at 30.
    fn mild(soil: u8, water: u8, solar: f32) -> SensorReading {
        reading(soil, water, solar, Some(20.0), Some(50.0))
    }

    // ── Threshold selection ──────────────────────────────────

    #[test]
    fn hot_weather_lowers_threshold() {
        assert_eq!(engine().moisture_threshold(&reading(0, 0, 0.0, Some(31.0), Some(50.0))), 25);
    }

    #[test]
    fn dry_air_lowers_threshold() {
        assert_eq!(engine().moisture_threshold(&reading(0, 0, 0.0, Some(20.0), Some(39.0))), 25);
    }

    #[test]
    fn mild_weather_keeps_base_threshold() {
        assert_eq!(engine().moisture_threshold(&reading(0, 0, 0.0, Some(20.0), Some(50.0))), 30);
    }

    #[test]
    fn stress_limits_are_exclusive() {
        assert_eq!(engine().moisture_threshold(&reading(0, 0, 0.0, Some(30.0), Some(40.0))), 30);
    }

    #[test]
    fn undefined_climate_never_lowers_threshold() {
        let e = engine();
        assert_eq!(e.moisture_threshold(&reading(0, 0, 0.0, None, None)), 30);
        assert_eq!(e.moisture_threshold(&reading(0, 0, 0.0, None, Some(50.0))), 30);
        assert_eq!(e.moisture_threshold(&reading(0, 0, 0.0, Some(20.0), None)), 30);
    }

    #[test]
    fn one_defined_stress_signal_is_enough() {
        let e = engine();
        assert_eq!(e.moisture_threshold(&reading(0, 0, 0.0, None, Some(10.0))), 25);
        assert_eq!(e.moisture_threshold(&reading(0, 0, 0.0, Some(35.0), None)), 25);
    }

    // ── Boundary combinations of the three gates ─────────────
    //
    // Each predicate is placed either just on the passing side or exactly
    // on its boundary (which fails).

    #[test]
    fn all_eight_gate_combinations() {
        let e = engine();
        for solar_ok in [false, true] {
            for soil_ok in [false, true] {
                for water_ok in [false, true] {
                    let solar = if solar_ok { 2.51 } else { 2.5 };
                    let soil = if soil_ok { 29 } else { 30 };
                    let water = if water_ok { 11 } else { 10 };
                    let d = e.decide(&mild(soil, water, solar));
                    assert_eq!(
                        d.should_run,
                        solar_ok && soil_ok && water_ok,
                        "solar={solar} soil={soil} water={water}"
                    );
                }
            }
        }
    }

    #[test]
    fn exactly_two_point_five_volts_is_off() {
        assert_eq!(engine().decide(&mild(10, 50, 2.5)), PumpDecision::STOP);
    }

    #[test]
    fn just_above_two_point_five_volts_is_on() {
        assert_eq!(engine().decide(&mild(10, 50, 2.51)), PumpDecision::RUN);
    }

    #[test]
    fn soil_at_stressed_threshold_is_wet_enough() {
        // Hot day: threshold 25, soil 25 is not below it.
        let r = reading(25, 50, 3.0, Some(35.0), Some(50.0));
        assert_eq!(engine().decide(&r), PumpDecision::STOP);
        let r = reading(24, 50, 3.0, Some(35.0), Some(50.0));
        assert_eq!(engine().decide(&r), PumpDecision::RUN);
    }

    #[test]
    fn stress_delays_watering_between_thresholds() {
        // soil 27: dry by base threshold, not by stressed one
        assert_eq!(engine().decide(&mild(27, 50, 3.0)), PumpDecision::RUN);
        let hot = reading(27, 50, 3.0, Some(31.0), Some(50.0));
        assert_eq!(engine().decide(&hot), PumpDecision::STOP);
    }

    #[test]
    fn decision_is_memoryless() {
        let e = engine();
        let on = mild(10, 50, 3.0);
        let off = mild(30, 50, 3.0);
        assert!(e.decide(&on).should_run);
        assert!(!e.decide(&off).should_run);
        assert!(e.decide(&on).should_run);
    }
}
