//! Solar panel voltage sense via a resistive divider on ADC1.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static AtomicU16 for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

#[cfg(not(target_os = "espidf"))]
static SIM_SOLAR_ADC: AtomicU16 = AtomicU16::new(3500);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_solar_adc(raw: u16) {
    SIM_SOLAR_ADC.store(raw, Ordering::Relaxed);
}

pub struct SolarSensor {
    _adc_gpio: i32,
}

impl SolarSensor {
    pub fn new(adc_gpio: i32) -> Self {
        Self { _adc_gpio: adc_gpio }
    }

    #[cfg(target_os = "espidf")]
    pub fn read_raw(&self) -> u16 {
        hw_init::adc1_read(hw_init::ADC1_CH_SOLAR)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_raw(&self) -> u16 {
        SIM_SOLAR_ADC.load(Ordering::Relaxed)
    }
}

/// Rescale a raw sample to 0 – `reference_voltage` volts.
pub fn voltage(raw: u16, adc_max: u16, reference_voltage: f32) -> f32 {
    if adc_max == 0 {
        return 0.0;
    }
    f32::from(raw.min(adc_max)) / f32::from(adc_max) * reference_voltage
}
