//! Pump relay driver.
//!
//! A single active-HIGH GPIO energises the relay coil, which switches the
//! pump supply.
//!
//! ## Safety contract
//!
//! The pump must never run without solar power or water above the safety
//! margin.  Enforced by the decision engine; this driver is a dumb actuator.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the GPIO via hw_init helpers.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;

pub struct PumpRelay {
    gpio: i32,
    energised: bool,
}

impl PumpRelay {
    pub fn new(gpio: i32) -> Self {
        Self {
            gpio,
            energised: false,
        }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(self.gpio, on);
        self.energised = on;
    }

    pub fn is_energised(&self) -> bool {
        self.energised
    }
}
