//! System configuration parameters
//!
//! All tunable parameters for the WaterHarvest controller. Defaults match
//! the field-tested firmware; a JSON override can be baked in at build time
//! (see [`SystemConfig::from_json`]).  Nothing here is persisted at runtime.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Decision ---
    /// Soil moisture (%) below which irrigation is needed in normal weather
    pub base_moisture_threshold_percent: u8,
    /// Moisture threshold used under heat or dryness stress
    pub stressed_moisture_threshold_percent: u8,
    /// Ambient temperature (Celsius) above which the plants are heat-stressed
    pub heat_stress_temperature_c: f32,
    /// Relative humidity (%) below which the air counts as dry
    pub dry_stress_humidity_percent: f32,
    /// Solar panel voltage that must be exceeded before the pump may run
    pub min_solar_voltage: f32,
    /// Water level (%) that must be exceeded before the pump may run
    pub min_water_level_percent: u8,

    // --- Sensors ---
    /// Distance from the ultrasonic sensor to the tank floor (cm)
    pub tank_depth_cm: u16,
    /// Full-scale ADC reading (12-bit on the ESP32)
    pub adc_max: u16,
    /// ADC reference voltage (volts)
    pub adc_reference_voltage: f32,
    /// Longest echo wait before the measurement counts as "no echo" (µs)
    pub echo_timeout_us: u32,

    // --- Telemetry ---
    /// Minimum spacing between telemetry sends (seconds)
    pub telemetry_interval_secs: u32,
    /// Pause after a connectivity failure before control resumes (seconds)
    pub reconnect_backoff_secs: u32,

    // --- Timing ---
    /// Pause between control ticks (milliseconds)
    pub control_loop_interval_ms: u32,
    /// Upper bound on initial network bring-up (seconds)
    pub link_timeout_secs: u32,
    /// Link status poll period during bring-up (milliseconds)
    pub link_poll_interval_ms: u32,
    /// SNTP status polls before falling back to a fixed wall time
    pub time_sync_attempts: u32,
    /// Delay between SNTP status polls (milliseconds)
    pub time_sync_poll_ms: u32,
    /// Wall time (Unix seconds) installed when SNTP never completes
    pub fallback_epoch_secs: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Decision
            base_moisture_threshold_percent: 30,
            stressed_moisture_threshold_percent: 25,
            heat_stress_temperature_c: 30.0,
            dry_stress_humidity_percent: 40.0,
            min_solar_voltage: 2.5,
            min_water_level_percent: 10,

            // Sensors
            tank_depth_cm: 100,
            adc_max: 4095,
            adc_reference_voltage: 3.3,
            echo_timeout_us: 30_000,

            // Telemetry
            telemetry_interval_secs: 30,
            reconnect_backoff_secs: 5,

            // Timing
            control_loop_interval_ms: 5_000,
            link_timeout_secs: 30,
            link_poll_interval_ms: 500,
            time_sync_attempts: 40,
            time_sync_poll_ms: 500,
            fallback_epoch_secs: 1_754_913_600, // 2025-08-11 12:00:00 UTC
        }
    }
}

impl SystemConfig {
    /// Parse a (possibly partial) JSON override on top of the defaults and
    /// validate the result.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|_| ConfigError::Corrupted)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Defaults, overlaid with `WATERHARVEST_CONFIG_JSON` when that was set
    /// at build time.
    pub fn from_build_env() -> Result<Self, ConfigError> {
        match option_env!("WATERHARVEST_CONFIG_JSON") {
            Some(json) => Self::from_json(json),
            None => Ok(Self::default()),
        }
    }

    /// Range-check every field.  Invalid values are rejected, not clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_moisture_threshold_percent > 100 {
            return Err(ConfigError::ValidationFailed(
                "base_moisture_threshold_percent must be 0–100",
            ));
        }
        if self.stressed_moisture_threshold_percent > self.base_moisture_threshold_percent {
            return Err(ConfigError::ValidationFailed(
                "stressed_moisture_threshold_percent must not exceed the base threshold",
            ));
        }
        if !(0.0..=100.0).contains(&self.dry_stress_humidity_percent) {
            return Err(ConfigError::ValidationFailed(
                "dry_stress_humidity_percent must be 0–100",
            ));
        }
        if !(-40.0..=80.0).contains(&self.heat_stress_temperature_c) {
            return Err(ConfigError::ValidationFailed(
                "heat_stress_temperature_c must be -40–80",
            ));
        }
        if self.min_water_level_percent > 100 {
            return Err(ConfigError::ValidationFailed(
                "min_water_level_percent must be 0–100",
            ));
        }
        if !(self.adc_reference_voltage > 0.0 && self.adc_reference_voltage <= 5.0) {
            return Err(ConfigError::ValidationFailed(
                "adc_reference_voltage must be in (0, 5]",
            ));
        }
        if !(0.0..=self.adc_reference_voltage).contains(&self.min_solar_voltage) {
            return Err(ConfigError::ValidationFailed(
                "min_solar_voltage must lie within the ADC range",
            ));
        }
        if self.tank_depth_cm == 0 {
            return Err(ConfigError::ValidationFailed("tank_depth_cm must be > 0"));
        }
        if self.adc_max == 0 {
            return Err(ConfigError::ValidationFailed("adc_max must be > 0"));
        }
        if self.echo_timeout_us == 0 {
            return Err(ConfigError::ValidationFailed("echo_timeout_us must be > 0"));
        }
        if self.telemetry_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "telemetry_interval_secs must be > 0",
            ));
        }
        if self.control_loop_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "control_loop_interval_ms must be > 0",
            ));
        }
        if self.link_timeout_secs == 0 || self.link_poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed(
                "link_timeout_secs and link_poll_interval_ms must be > 0",
            ));
        }
        Ok(())
    }
}

/// Network and cloud endpoint settings, baked in from the build environment.
///
/// | Variable   | Field           | Default        |
/// |------------|-----------------|----------------|
/// | `WIFI_SSID`| `wifi_ssid`     | `Wokwi-GUEST`  |
/// | `WIFI_PASS`| `wifi_password` | empty (open)   |
/// | `RTDB_URL` | `database_url`  | empty          |
/// | `RTDB_AUTH`| `auth_token`    | empty          |
///
/// Without `RTDB_URL` telemetry is disabled: the sink never reports ready
/// and every tick skips the send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloudConfig {
    pub wifi_ssid: &'static str,
    pub wifi_password: &'static str,
    /// Realtime-database host, with or without the `https://` scheme.
    pub database_url: &'static str,
    /// Database secret or ID token; empty means unauthenticated writes.
    pub auth_token: &'static str,
    /// Node that receives each telemetry record.
    pub record_path: &'static str,
}

impl CloudConfig {
    pub const fn from_build_env() -> Self {
        Self {
            wifi_ssid: match option_env!("WIFI_SSID") {
                Some(s) => s,
                None => "Wokwi-GUEST",
            },
            wifi_password: match option_env!("WIFI_PASS") {
                Some(s) => s,
                None => "",
            },
            database_url: match option_env!("RTDB_URL") {
                Some(s) => s,
                None => "",
            },
            auth_token: match option_env!("RTDB_AUTH") {
                Some(s) => s,
                None => "",
            },
            record_path: "/sensorData",
        }
    }

    /// A sink without a database URL can never become ready.
    pub fn has_database(&self) -> bool {
        !self.database_url.is_empty()
    }
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self::from_build_env()
    }
}

/// Errors from configuration parsing and validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The override could not be deserialized.
    Corrupted,
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}
