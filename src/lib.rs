//! WaterHarvest firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod pins;
pub mod sensors;
pub mod telemetry;

// The hardware-facing modules compile everywhere; their device code paths
// are cfg-gated with simulation twins for host builds.
pub mod adapters;
pub mod drivers;
