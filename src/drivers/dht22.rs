//! DHT22 (AM2302) temperature / humidity probe on a single-wire bus.
//!
//! ## Frame
//!
//! ```text
//!  byte 0..1  humidity × 10        (big endian)
//!  byte 2..3  temperature × 10     (bit 15 = sign)
//!  byte 4     checksum = (b0 + b1 + b2 + b3) & 0xFF
//! ```
//!
//! ## Bus timing
//!
//! Host pulls the line LOW for ≥ 1 ms, releases it, then the sensor
//! answers with 80 µs LOW / 80 µs HIGH followed by 40 bits.  Each bit is
//! 50 µs LOW then a HIGH pulse of ~27 µs (0) or ~70 µs (1).
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-bangs the bus via hw_init with interrupts masked.
//! On host/test: decodes a frame stored in a static atomic.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU64, Ordering};

use embedded_hal::delay::DelayNs;
use log::warn;

use crate::app::ports::{ClimateSample, HumiditySensor};
#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::SensorError;

/// Low 40 bits hold the frame; `u64::MAX` simulates an unresponsive probe.
#[cfg(not(target_os = "espidf"))]
static SIM_FRAME: AtomicU64 = AtomicU64::new(pack(encode_frame(24.0, 55.0)));

#[cfg(not(target_os = "espidf"))]
const fn pack(frame: [u8; 5]) -> u64 {
    (frame[0] as u64) << 32
        | (frame[1] as u64) << 24
        | (frame[2] as u64) << 16
        | (frame[3] as u64) << 8
        | frame[4] as u64
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_climate(sample: Option<(f32, f32)>) {
    let packed = match sample {
        Some((t, h)) => pack(encode_frame(t, h)),
        None => u64::MAX,
    };
    SIM_FRAME.store(packed, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_frame(frame: [u8; 5]) {
    SIM_FRAME.store(pack(frame), Ordering::Relaxed);
}

/// Decode a raw frame into `(temperature_c, humidity_percent)`.
pub fn decode_frame(frame: [u8; 5]) -> Result<(f32, f32), SensorError> {
    let sum = frame[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
    if sum != frame[4] {
        return Err(SensorError::ProbeChecksum);
    }

    let humidity = u16::from_be_bytes([frame[0], frame[1]]);
    let magnitude = u16::from_be_bytes([frame[2] & 0x7F, frame[3]]);
    let temperature = if frame[2] & 0x80 != 0 {
        -f32::from(magnitude)
    } else {
        f32::from(magnitude)
    };

    Ok((temperature / 10.0, f32::from(humidity) / 10.0))
}

/// Build a frame with a valid checksum.  Values are clamped to what the
/// 15-bit magnitude fields can hold.
pub const fn encode_frame(temperature_c: f32, humidity_percent: f32) -> [u8; 5] {
    let h = (humidity_percent * 10.0) as i32;
    let h = (if h < 0 { 0 } else if h > 0x7FFF { 0x7FFF } else { h }) as u16;
    let t = (temperature_c * 10.0) as i32;
    let neg = t < 0;
    let mag = if neg { -t } else { t };
    let mag = (if mag > 0x7FFF { 0x7FFF } else { mag }) as u16;
    let t_hi = (mag >> 8) as u8 | if neg { 0x80 } else { 0 };

    let b = [(h >> 8) as u8, h as u8, t_hi, mag as u8];
    let sum = b[0].wrapping_add(b[1]).wrapping_add(b[2]).wrapping_add(b[3]);
    [b[0], b[1], b[2], b[3], sum]
}

pub struct Dht22<D> {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    data_gpio: i32,
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    delay: D,
}

impl<D: DelayNs> Dht22<D> {
    pub fn new(data_gpio: i32, delay: D) -> Self {
        Self { data_gpio, delay }
    }

    #[cfg(target_os = "espidf")]
    fn read_frame(&mut self) -> Result<[u8; 5], SensorError> {
        // start signal
        hw_init::gpio_write(self.data_gpio, false);
        self.delay.delay_us(1_100);
        hw_init::gpio_write(self.data_gpio, true);

        esp_idf_hal::interrupt::free(|| {
            // sensor pulls low within ~40 µs, then 80 µs low / 80 µs high
            self.level_width(true, 100)?;
            self.level_width(false, 100)?;
            self.level_width(true, 100)?;

            let mut frame = [0u8; 5];
            for bit in 0..40 {
                self.level_width(false, 80)?;
                let high_us = self.level_width(true, 100)?;
                if high_us > 40 {
                    frame[bit / 8] |= 0x80 >> (bit % 8);
                }
            }
            Ok(frame)
        })
    }

    /// Time spent at `level`, failing once it exceeds `timeout_us`.
    #[cfg(target_os = "espidf")]
    fn level_width(&self, level: bool, timeout_us: u64) -> Result<u64, SensorError> {
        let start = hw_init::micros();
        while hw_init::gpio_read(self.data_gpio) == level {
            if hw_init::micros() - start > timeout_us {
                return Err(SensorError::ProbeTimeout);
            }
        }
        Ok(hw_init::micros() - start)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_frame(&mut self) -> Result<[u8; 5], SensorError> {
        match SIM_FRAME.load(Ordering::Relaxed) {
            u64::MAX => Err(SensorError::ProbeTimeout),
            packed => Ok([
                (packed >> 32) as u8,
                (packed >> 24) as u8,
                (packed >> 16) as u8,
                (packed >> 8) as u8,
                packed as u8,
            ]),
        }
    }
}

impl<D: DelayNs> HumiditySensor for Dht22<D> {
    fn read(&mut self) -> ClimateSample {
        match self.read_frame().and_then(decode_frame) {
            Ok((t, h)) => ClimateSample::ok(t, h),
            Err(e) => {
                warn!("DHT22 read failed: {}", e);
                ClimateSample::failed(e)
            }
        }
    }
}
