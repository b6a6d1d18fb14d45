//! GPIO / peripheral pin assignments for the WaterHarvest controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Sensors: Analog (ADC1, input-only pins)
// ---------------------------------------------------------------------------

/// Soil moisture probe.  ADC1 channel 6 (GPIO 34).
pub const SOIL_ADC_GPIO: i32 = 34;

/// Solar panel voltage divider.  ADC1 channel 0 (GPIO 36 / VP).
pub const SOLAR_ADC_GPIO: i32 = 36;

// ---------------------------------------------------------------------------
// Sensors: Digital / Pulse
// ---------------------------------------------------------------------------

/// HC-SR04 trigger: 10 µs HIGH pulse starts a measurement.
pub const ULTRASONIC_TRIG_GPIO: i32 = 25;
/// HC-SR04 echo: HIGH for the round-trip time of the ping.
pub const ULTRASONIC_ECHO_GPIO: i32 = 26;

/// DHT22 single-wire data line (open drain, external pull-up).
pub const DHT22_DATA_GPIO: i32 = 27;

// ---------------------------------------------------------------------------
// Outputs
// ---------------------------------------------------------------------------

/// Pump relay coil driver (active HIGH).
pub const PUMP_RELAY_GPIO: i32 = 19;
/// "Pump running" indicator LED (active HIGH).
pub const INDICATOR_LED_GPIO: i32 = 18;
