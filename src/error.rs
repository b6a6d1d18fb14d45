//! Unified error types for the WaterHarvest firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping the
//! top-level bring-up code uniform.  All variants are `Copy` so they can be
//! passed around without allocation.
//!
//! Most failures in this system are *recovered locally* (a degraded climate
//! sample, a missing echo, a failed telemetry send) and never surface as an
//! `Error`.  Bring-up failures that a restart can cure (radio start, link
//! establishment, peripheral init) are fatal and `main` restarts the chip.
//! Bad build-time configuration is not: restarting cannot change it.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible bring-up operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A communication subsystem failed.
    Comms(CommsError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid or could not be loaded.
    Config(&'static str),
}

impl Error {
    /// True when the controller cannot keep operating and the supervisor
    /// has to step in.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Comms(CommsError::LinkEstablishmentFailed | CommsError::WifiStartFailed)
                | Self::Init(_)
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Comms(e) => write!(f, "comms: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The humidity/temperature probe did not answer in time.
    ProbeTimeout,
    /// The humidity/temperature probe frame failed its checksum.
    ProbeChecksum,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProbeTimeout => write!(f, "climate probe timed out"),
            Self::ProbeChecksum => write!(f, "climate probe checksum mismatch"),
        }
    }
}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// Initial network bring-up did not complete within its bound.
    LinkEstablishmentFailed,
    /// The WiFi driver refused the configuration or failed to start.
    WifiStartFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LinkEstablishmentFailed => write!(f, "network link could not be established"),
            Self::WifiStartFailed => write!(f, "WiFi start failed"),
        }
    }
}

impl From<CommsError> for Error {
    fn from(e: CommsError) -> Self {
        Self::Comms(e)
    }
}
