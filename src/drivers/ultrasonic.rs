//! HC-SR04 ultrasonic ranger.
//!
//! A measurement is a 10 µs HIGH trigger pulse (after 2 µs LOW to settle the
//! line).  The sensor then raises ECHO for as long as the ping took to come
//! back.  Both the wait for the rising edge and the pulse width are bounded
//! by the echo timeout; running out of either reads as "no echo".
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-bangs the trigger and polls the echo pin via hw_init.
//! On host/test: returns the round-trip time stored in a static atomic.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

use embedded_hal::delay::DelayNs;

use crate::app::ports::PulseSensor;
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

/// `u32::MAX` means no echo.
#[cfg(not(target_os = "espidf"))]
static SIM_ECHO_US: AtomicU32 = AtomicU32::new(2941);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_echo_us(round_trip_us: Option<u32>) {
    SIM_ECHO_US.store(round_trip_us.unwrap_or(u32::MAX), Ordering::Relaxed);
}

pub struct Ultrasonic<D> {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    trig_gpio: i32,
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    echo_gpio: i32,
    timeout_us: u32,
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    delay: D,
}

impl<D: DelayNs> Ultrasonic<D> {
    pub fn new(trig_gpio: i32, echo_gpio: i32, timeout_us: u32, delay: D) -> Self {
        Self {
            trig_gpio,
            echo_gpio,
            timeout_us,
            delay,
        }
    }

    #[cfg(target_os = "espidf")]
    fn ping(&mut self) -> Option<u32> {
        hw_init::gpio_write(self.trig_gpio, false);
        self.delay.delay_us(2);
        hw_init::gpio_write(self.trig_gpio, true);
        self.delay.delay_us(10);
        hw_init::gpio_write(self.trig_gpio, false);

        let timeout = u64::from(self.timeout_us);

        let armed = hw_init::micros();
        while !hw_init::gpio_read(self.echo_gpio) {
            if hw_init::micros() - armed > timeout {
                return None;
            }
        }

        let rise = hw_init::micros();
        while hw_init::gpio_read(self.echo_gpio) {
            if hw_init::micros() - rise > timeout {
                return None;
            }
        }

        Some((hw_init::micros() - rise) as u32)
    }

    #[cfg(not(target_os = "espidf"))]
    fn ping(&mut self) -> Option<u32> {
        match SIM_ECHO_US.load(Ordering::Relaxed) {
            u32::MAX => None,
            us if us > self.timeout_us => None,
            us => Some(us),
        }
    }
}

impl<D: DelayNs> PulseSensor for Ultrasonic<D> {
    fn measure_round_trip_us(&mut self) -> Option<u32> {
        let echo = self.ping();
        if echo.is_none() {
            log::debug!("HC-SR04: no echo within {} µs", self.timeout_us);
        }
        echo
    }
}
