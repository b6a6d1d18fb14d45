//! ESP32 time adapter.
//!
//! Provides wall-clock queries and a blocking delay for the WaterHarvest
//! controller.
//!
//! - **`target_os = "espidf"`**: reads `gettimeofday()` (set by SNTP or
//!   the fallback epoch) and delays through FreeRTOS / ROM busy-waits.
//! - **`not(target_os = "espidf")`**: uses `std::time::SystemTime` and
//!   `std::thread::sleep` for host-side testing and simulation.

use embedded_hal::delay::DelayNs;

use crate::app::ports::Clock;

/// Time adapter for the ESP32 platform.
#[derive(Debug, Default, Clone, Copy)]
pub struct Esp32TimeAdapter;

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self
    }

    /// Unix seconds from the system clock.
    #[cfg(target_os = "espidf")]
    pub fn unix_secs(&self) -> u64 {
        let mut tv = esp_idf_svc::sys::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        // SAFETY: gettimeofday only writes into the provided struct.
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, core::ptr::null_mut()) } != 0 {
            return 0;
        }
        tv.tv_sec.max(0) as u64
    }

    /// Unix seconds from the system clock.
    #[cfg(not(target_os = "espidf"))]
    pub fn unix_secs(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    /// Install `secs` as the current wall time.
    #[cfg(target_os = "espidf")]
    pub fn set_unix_secs(&self, secs: u64) {
        let tv = esp_idf_svc::sys::timeval {
            tv_sec: secs as _,
            tv_usec: 0,
        };
        // SAFETY: settimeofday reads the struct; a null timezone is allowed.
        unsafe {
            esp_idf_svc::sys::settimeofday(&tv, core::ptr::null());
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn set_unix_secs(&self, secs: u64) {
        log::info!("time(sim): wall clock left untouched (requested {})", secs);
    }
}

impl Clock for Esp32TimeAdapter {
    fn now_secs(&self) -> u64 {
        self.unix_secs()
    }
}

// ───────────────────────────────────────────────────────────────
// Blocking delay
// ───────────────────────────────────────────────────────────────

/// Thread-blocking delay: yields to the scheduler for millisecond waits and
/// busy-waits for sub-millisecond sensor timing.
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockingDelay;

#[cfg(target_os = "espidf")]
impl DelayNs for BlockingDelay {
    fn delay_ns(&mut self, ns: u32) {
        esp_idf_hal::delay::Ets::delay_us(ns.div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        esp_idf_hal::delay::Ets::delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        esp_idf_hal::delay::FreeRtos::delay_ms(ms);
    }
}

#[cfg(not(target_os = "espidf"))]
impl DelayNs for BlockingDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }
}

// ───────────────────────────────────────────────────────────────
// SNTP
// ───────────────────────────────────────────────────────────────

/// Servers queried in order.
pub const SNTP_SERVERS: [&str; 3] = ["pool.ntp.org", "time.nist.gov", "time.google.com"];

/// Where the wall clock came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeSource {
    Sntp,
    Fallback,
}

/// Poll `is_synced` up to `attempts` times, `poll_ms` apart.
pub fn wait_for_sync(
    mut is_synced: impl FnMut() -> bool,
    delay: &mut impl DelayNs,
    attempts: u32,
    poll_ms: u32,
) -> bool {
    for _ in 0..attempts {
        if is_synced() {
            return true;
        }
        delay.delay_ms(poll_ms);
    }
    is_synced()
}

/// Keeps the SNTP client alive for the lifetime of the process.
pub struct TimeSync {
    #[cfg(target_os = "espidf")]
    _sntp: Option<esp_idf_svc::sntp::EspSntp<'static>>,
    source: TimeSource,
}

impl TimeSync {
    /// Start SNTP and wait for the first sync; on timeout install
    /// `fallback_epoch_secs` so timestamps stay plausible.
    #[cfg(target_os = "espidf")]
    pub fn start(
        clock: &Esp32TimeAdapter,
        delay: &mut impl DelayNs,
        attempts: u32,
        poll_ms: u32,
        fallback_epoch_secs: u64,
    ) -> Self {
        use esp_idf_svc::sntp::{EspSntp, SntpConf, SyncStatus};

        let mut conf = SntpConf::default();
        for (slot, server) in conf.servers.iter_mut().zip(SNTP_SERVERS) {
            *slot = server;
        }

        let sntp = match EspSntp::new(&conf) {
            Ok(s) => Some(s),
            Err(e) => {
                log::error!("SNTP start failed: {}", e);
                None
            }
        };

        let synced = sntp.as_ref().is_some_and(|s| {
            wait_for_sync(
                || s.get_sync_status() == SyncStatus::Completed,
                delay,
                attempts,
                poll_ms,
            )
        });

        let source = settle(synced, clock, fallback_epoch_secs);
        Self {
            _sntp: sntp,
            source,
        }
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn start(
        clock: &Esp32TimeAdapter,
        delay: &mut impl DelayNs,
        attempts: u32,
        poll_ms: u32,
        fallback_epoch_secs: u64,
    ) -> Self {
        // the host clock is already set
        let synced = wait_for_sync(|| true, delay, attempts, poll_ms);
        Self {
            source: settle(synced, clock, fallback_epoch_secs),
        }
    }

    pub fn source(&self) -> TimeSource {
        self.source
    }
}

fn settle(synced: bool, clock: &Esp32TimeAdapter, fallback_epoch_secs: u64) -> TimeSource {
    if synced {
        log::info!("Time synchronized, now {}", clock.unix_secs());
        TimeSource::Sntp
    } else {
        log::warn!("Time sync failed, using fallback epoch {}", fallback_epoch_secs);
        clock.set_unix_secs(fallback_epoch_secs);
        TimeSource::Fallback
    }
}
