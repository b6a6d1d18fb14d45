//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and both output drivers, exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  This is the only
//! module in the system that touches actual hardware.  On non-espidf
//! targets, the underlying drivers use cfg-gated simulation stubs.

use embedded_hal::delay::DelayNs;

use crate::app::ports::{ActuatorPort, RawInputs, SensorPort};
use crate::config::SystemConfig;
use crate::drivers::dht22::Dht22;
use crate::drivers::indicator::IndicatorLed;
use crate::drivers::relay::PumpRelay;
use crate::drivers::ultrasonic::Ultrasonic;
use crate::pins;
use crate::sensors::SensorHub;
use crate::sensors::soil_moisture::SoilMoistureSensor;
use crate::sensors::solar::SolarSensor;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<D> {
    sensor_hub: SensorHub<Ultrasonic<D>, Dht22<D>>,
    relay: PumpRelay,
    indicator: IndicatorLed,
}

impl<D: DelayNs + Clone> HardwareAdapter<D> {
    /// Build every driver on the board's pin map.
    pub fn new(config: &SystemConfig, delay: D) -> Self {
        let sensor_hub = SensorHub::new(
            SoilMoistureSensor::new(pins::SOIL_ADC_GPIO),
            SolarSensor::new(pins::SOLAR_ADC_GPIO),
            Ultrasonic::new(
                pins::ULTRASONIC_TRIG_GPIO,
                pins::ULTRASONIC_ECHO_GPIO,
                config.echo_timeout_us,
                delay.clone(),
            ),
            Dht22::new(pins::DHT22_DATA_GPIO, delay),
        );
        Self {
            sensor_hub,
            relay: PumpRelay::new(pins::PUMP_RELAY_GPIO),
            indicator: IndicatorLed::new(pins::INDICATOR_LED_GPIO),
        }
    }

    pub fn pump_energised(&self) -> bool {
        self.relay.is_energised()
    }

    pub fn indicator_lit(&self) -> bool {
        self.indicator.is_lit()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<D: DelayNs> SensorPort for HardwareAdapter<D> {
    fn read_raw(&mut self) -> RawInputs {
        self.sensor_hub.read_raw()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<D> ActuatorPort for HardwareAdapter<D> {
    fn set_pump_relay(&mut self, on: bool) {
        self.relay.set(on);
    }

    fn set_indicator(&mut self, on: bool) {
        self.indicator.set(on);
    }
}
