//! Resistive/capacitive soil moisture probe on an ADC1 channel.
//!
//! The probe output is treated as linear over the full ADC range:
//! 0 counts = 0 %, full scale = 100 %.
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
static SIM_SOIL_ADC: AtomicU16 = AtomicU16::new(2048);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_soil_adc(raw: u16) {
    SIM_SOIL_ADC.store(raw, Ordering::Relaxed);
}

pub struct SoilMoistureSensor {
    _adc_gpio: i32,
}

impl SoilMoistureSensor {
    pub fn new(adc_gpio: i32) -> Self {
        Self { _adc_gpio: adc_gpio }
    }

    #[cfg(target_os = "espidf")]
    pub fn read_raw(&self) -> u16 {
        hw_init::adc1_read(hw_init::ADC1_CH_SOIL)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn read_raw(&self) -> u16 {
        SIM_SOIL_ADC.load(Ordering::Relaxed)
    }
}

/// Rescale a raw sample to 0–100 %, truncating like an integer `map()`.
pub fn moisture_percent(raw: u16, adc_max: u16) -> u8 {
    if adc_max == 0 {
        return 0;
    }
    let raw = u32::from(raw.min(adc_max));
    (raw * 100 / u32::from(adc_max)) as u8
}
