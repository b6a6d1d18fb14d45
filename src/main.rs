//! WaterHarvest Firmware: Main Entry Point
//!
//! Hexagonal architecture with a fixed-period control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   Esp32TimeAdapter  TimeSync   │
//! │  (Sensor+Actuator) (EventSink)    (Clock)           (SNTP)     │
//! │  WifiLink          RtdbSink                                    │
//! │  (NetworkLink)     (TelemetrySink)                             │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              ControlLoop (pure logic)                  │    │
//! │  │  Acquire · Decide · Actuate · Report                   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use embedded_hal::delay::DelayNs;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use esp_idf_svc::wifi::EspWifi;
use log::{error, info, warn};

use waterharvest::adapters::hardware::HardwareAdapter;
use waterharvest::adapters::log_sink::LogEventSink;
use waterharvest::adapters::rtdb::RtdbSink;
use waterharvest::adapters::time::{BlockingDelay, Esp32TimeAdapter, TimeSync};
use waterharvest::adapters::wifi::WifiLink;
use waterharvest::app::service::{ControlLoop, await_link};
use waterharvest::config::{CloudConfig, SystemConfig};
use waterharvest::drivers::hw_init;
use waterharvest::error::Error;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  WaterHarvest v{}                  ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    match run() {
        Ok(()) => Ok(()),
        Err(e) if e.is_fatal() => {
            error!("Fatal: {}, restarting", e);
            // SAFETY: esp_restart never returns; nothing is left to unwind.
            unsafe { esp_idf_svc::sys::esp_restart() }
        }
        Err(e) => Err(e.into()),
    }
}

fn run() -> core::result::Result<(), Error> {
    // ── 2. Configuration ──────────────────────────────────────
    let config = SystemConfig::from_build_env().unwrap_or_else(|e| {
        warn!("Config override rejected ({}), using defaults", e);
        SystemConfig::default()
    });
    let cloud = CloudConfig::from_build_env();

    // ── 3. Hardware ───────────────────────────────────────────
    hw_init::init_peripherals()?;
    let mut hw = HardwareAdapter::new(&config, BlockingDelay);
    let mut delay = BlockingDelay;
    let mut events = LogEventSink::new();

    let mut control = ControlLoop::new(&config);
    control.start(&mut hw, &mut events);

    // ── 4. Network link ───────────────────────────────────────
    let peripherals = Peripherals::take().map_err(|_| Error::Init("peripherals"))?;
    let sysloop = EspSystemEventLoop::take().map_err(|_| Error::Init("event loop"))?;
    let nvs = EspDefaultNvsPartition::take().map_err(|_| Error::Init("nvs"))?;
    let radio = EspWifi::new(peripherals.modem, sysloop, Some(nvs))
        .map_err(|_| Error::Init("wifi driver"))?;

    let mut link = WifiLink::new();
    link.attach(radio);
    link.set_credentials(cloud.wifi_ssid, cloud.wifi_password)?;
    link.connect()?;
    await_link(
        &link,
        &mut delay,
        config.link_timeout_secs,
        config.link_poll_interval_ms,
    )?;
    link.poll();

    // ── 5. Wall clock ─────────────────────────────────────────
    let clock = Esp32TimeAdapter::new();
    let _time_sync = TimeSync::start(
        &clock,
        &mut delay,
        config.time_sync_attempts,
        config.time_sync_poll_ms,
        config.fallback_epoch_secs,
    );

    // ── 6. Telemetry sink ─────────────────────────────────────
    let mut sink = RtdbSink::new(cloud);
    if let Err(e) = sink.probe() {
        warn!("RTDB probe failed ({}), continuing", e);
    }

    info!("System ready. Entering control loop.");

    // ── 7. Control loop ───────────────────────────────────────
    loop {
        link.poll();
        control.tick(&mut hw, &clock, &mut sink, &mut link, &mut delay, &mut events);
        delay.delay_ms(config.control_loop_interval_ms);
    }
}
