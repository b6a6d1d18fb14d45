//! WiFi station-mode adapter.
//!
//! Implements [`NetworkLink`], the hexagonal boundary for network
//! connectivity.  The last observed link state is mirrored into a static
//! atomic so the telemetry sink can gate on it without holding a reference
//! to the radio.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real ESP-IDF WiFi driver calls via `esp_idf_svc::wifi`.
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## Reconnection policy
//!
//! The adapter never reconnects on its own.  The telemetry reporter asks
//! for a reconnect when it finds the link down or a send fails at the
//! transport, and backs off on its side.

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info, warn};

use crate::app::ports::NetworkLink;

// ───────────────────────────────────────────────────────────────
// Shared link flag
// ───────────────────────────────────────────────────────────────

static LINK_UP: AtomicBool = AtomicBool::new(false);

/// Last link state observed by the WiFi adapter.
pub fn link_is_up() -> bool {
    LINK_UP.load(Ordering::Relaxed)
}

/// Simulated access point reachability.
#[cfg(not(target_os = "espidf"))]
static SIM_RADIO_UP: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_radio_up(up: bool) {
    SIM_RADIO_UP.store(up, Ordering::Relaxed);
}

// ───────────────────────────────────────────────────────────────
// Errors
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    /// The radio could not be configured or started.
    StartFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "station credentials not set"),
            Self::InvalidSsid => write!(f, "SSID rejected by station config"),
            Self::InvalidPassword => write!(f, "WPA2 passphrase rejected by station config"),
            Self::StartFailed => write!(f, "WiFi driver start failed"),
        }
    }
}

impl From<ConnectivityError> for crate::error::Error {
    fn from(e: ConnectivityError) -> Self {
        match e {
            ConnectivityError::StartFailed => crate::error::CommsError::WifiStartFailed.into(),
            ConnectivityError::NoCredentials
            | ConnectivityError::InvalidSsid
            | ConnectivityError::InvalidPassword => Self::Config("wifi credentials"),
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
}

// ───────────────────────────────────────────────────────────────
// Station credentials
// ───────────────────────────────────────────────────────────────

/// SSID and passphrase as the ESP-IDF station config expects them: SSID
/// 1–32 printable bytes, passphrase empty (open AP) or 8–64 bytes (WPA2).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    ssid: heapless::String<32>,
    password: heapless::String<64>,
}

impl Credentials {
    pub fn parse(ssid: &str, password: &str) -> Result<Self, ConnectivityError> {
        let printable = ssid.bytes().all(|b| b.is_ascii_graphic() || b == b' ');
        let ssid = match heapless::String::<32>::try_from(ssid) {
            Ok(s) if !s.is_empty() && printable => s,
            _ => return Err(ConnectivityError::InvalidSsid),
        };
        let password = match heapless::String::<64>::try_from(password) {
            Ok(p) if p.is_empty() || p.len() >= 8 => p,
            _ => return Err(ConnectivityError::InvalidPassword),
        };
        Ok(Self { ssid, password })
    }

    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    pub fn is_open(&self) -> bool {
        self.password.is_empty()
    }
}

// ───────────────────────────────────────────────────────────────
// WiFi link
// ───────────────────────────────────────────────────────────────

pub struct WifiLink {
    state: WifiState,
    credentials: Option<Credentials>,
    reconnect_requests: u32,
    #[cfg(target_os = "espidf")]
    wifi: Option<esp_idf_svc::wifi::EspWifi<'static>>,
}

impl Default for WifiLink {
    fn default() -> Self {
        Self::new()
    }
}

impl WifiLink {
    pub fn new() -> Self {
        Self {
            state: WifiState::Disconnected,
            credentials: None,
            reconnect_requests: 0,
            #[cfg(target_os = "espidf")]
            wifi: None,
        }
    }

    /// Hand over the radio driver built in `main`.
    #[cfg(target_os = "espidf")]
    pub fn attach(&mut self, wifi: esp_idf_svc::wifi::EspWifi<'static>) {
        self.wifi = Some(wifi);
    }

    pub fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        let credentials = Credentials::parse(ssid, password)?;
        info!(
            "WiFi: station '{}' ({})",
            credentials.ssid(),
            if credentials.is_open() { "open" } else { "WPA2" }
        );
        self.credentials = Some(credentials);
        Ok(())
    }

    /// Start the station and begin associating.  Does not wait for the
    /// link; see `app::service::await_link`.
    pub fn connect(&mut self) -> Result<(), ConnectivityError> {
        let Some(credentials) = self.credentials.clone() else {
            return Err(ConnectivityError::NoCredentials);
        };
        self.state = WifiState::Connecting;
        self.platform_connect(&credentials)
    }

    /// Refresh the cached state.  Call once per control cycle.
    pub fn poll(&mut self) {
        let up = self.is_up();
        match (self.state, up) {
            (WifiState::Connected, false) => {
                warn!("WiFi: connection lost");
                self.state = WifiState::Reconnecting { attempt: 0 };
            }
            (WifiState::Connected, true) => {}
            (_, true) => {
                info!("WiFi: connected");
                self.state = WifiState::Connected;
            }
            (_, false) => {}
        }
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    pub fn reconnect_requests(&self) -> u32 {
        self.reconnect_requests
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self, credentials: &Credentials) -> Result<(), ConnectivityError> {
        use esp_idf_svc::wifi::{AuthMethod, ClientConfiguration, Configuration};

        let Some(wifi) = self.wifi.as_mut() else {
            return Err(ConnectivityError::StartFailed);
        };

        let auth_method = if credentials.is_open() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let config = Configuration::Client(ClientConfiguration {
            ssid: credentials.ssid.clone(),
            password: credentials.password.clone(),
            auth_method,
            ..Default::default()
        });

        wifi.set_configuration(&config).map_err(|e| {
            log::error!("WiFi: configuration rejected: {}", e);
            ConnectivityError::StartFailed
        })?;
        wifi.start().map_err(|e| {
            log::error!("WiFi: start failed: {}", e);
            ConnectivityError::StartFailed
        })?;
        if let Err(e) = wifi.connect() {
            // association keeps retrying inside the driver
            warn!("WiFi: connect request failed: {}", e);
        }
        Ok(())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self, credentials: &Credentials) -> Result<(), ConnectivityError> {
        info!("WiFi(sim): associating with '{}'", credentials.ssid());
        Ok(())
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_up(&self) -> bool {
        self.wifi.as_ref().is_some_and(|w| {
            w.is_connected().unwrap_or(false) && w.sta_netif().is_up().unwrap_or(false)
        })
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_up(&self) -> bool {
        SIM_RADIO_UP.load(Ordering::Relaxed)
    }

    #[cfg(target_os = "espidf")]
    fn platform_reconnect(&mut self) {
        if let Some(wifi) = self.wifi.as_mut() {
            // an in-flight association makes this fail harmlessly
            if let Err(e) = wifi.connect() {
                debug!("WiFi: reconnect request ignored: {}", e);
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_reconnect(&mut self) {
        debug!("WiFi(sim): reconnect requested");
    }
}

// ───────────────────────────────────────────────────────────────
// NetworkLink
// ───────────────────────────────────────────────────────────────

impl NetworkLink for WifiLink {
    fn is_up(&self) -> bool {
        let up = self.platform_is_up();
        LINK_UP.store(up, Ordering::Relaxed);
        up
    }

    fn request_reconnect(&mut self) {
        self.reconnect_requests = self.reconnect_requests.wrapping_add(1);
        let attempt = match self.state {
            WifiState::Reconnecting { attempt } => attempt.saturating_add(1),
            _ => 0,
        };
        info!("WiFi: reconnect attempt {}", attempt);
        self.state = WifiState::Reconnecting { attempt };
        self.platform_reconnect();
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
