//! Realtime-database telemetry sink.
//!
//! Implements [`TelemetrySink`] with one HTTPS `PUT` per record:
//!
//! ```text
//!  PUT https://<database_url><record_path>.json?auth=<token>
//!  content-type: application/json
//!
//!  {"soilMoisture":42, ... ,"count":7}
//! ```
//!
//! Each send overwrites the same node, so the remote always holds the
//! latest record.  Transport failures (DNS, TCP, TLS, timeout) are
//! [`SinkErrorKind::Connection`]; HTTP status codes are classified by
//! [`classify_status`].
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `EspHttpConnection` with the ESP-IDF
//!   certificate bundle and a 15 s timeout.
//! - **all other targets**: the request is logged and reported as accepted.

use log::{error, info};

use crate::adapters::wifi;
use crate::app::ports::{SinkError, SinkErrorKind, TelemetrySink};
use crate::config::CloudConfig;
use crate::telemetry::TelemetryRecord;

/// Blocking budget for one request.
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Node written by the startup probe.
pub const PROBE_PATH: &str = "/test/connection";

/// Map an HTTP status to the sink's failure taxonomy.
pub fn classify_status(status: u16) -> Result<(), SinkErrorKind> {
    match status {
        200..=299 => Ok(()),
        401 | 403 => Err(SinkErrorKind::Auth),
        400 | 404 | 405 | 413 | 422 => Err(SinkErrorKind::Rejected),
        // gateway errors mean we never reached the database proper
        502..=504 => Err(SinkErrorKind::Connection),
        _ => Err(SinkErrorKind::Other),
    }
}

/// Build the REST URL for `path` (e.g. `/sensorData`).
pub fn node_url(database_url: &str, path: &str, auth_token: &str) -> String {
    let host = database_url.trim_end_matches('/');
    let scheme = if host.starts_with("http://") || host.starts_with("https://") {
        ""
    } else {
        "https://"
    };
    let path = path.trim_start_matches('/');
    if auth_token.is_empty() {
        format!("{scheme}{host}/{path}.json")
    } else {
        format!("{scheme}{host}/{path}.json?auth={auth_token}")
    }
}

pub struct RtdbSink {
    cloud: CloudConfig,
}

impl RtdbSink {
    pub fn new(cloud: CloudConfig) -> Self {
        if !cloud.has_database() {
            error!("RTDB: RTDB_URL not set at build time, telemetry disabled");
        }
        Self { cloud }
    }

    /// Write `1` to the probe node to confirm the database accepts our
    /// credentials.  Failure is logged by the caller and is not fatal.
    pub fn probe(&mut self) -> Result<(), SinkError> {
        let result = self.put(PROBE_PATH, "1");
        if result.is_ok() {
            info!("RTDB: connection probe accepted");
        }
        result
    }

    fn put(&mut self, path: &str, body: &str) -> Result<(), SinkError> {
        if !self.cloud.has_database() {
            return Err(SinkError::new(SinkErrorKind::Other, "no database URL"));
        }
        let url = node_url(self.cloud.database_url, path, self.cloud.auth_token);
        let status = platform_put(&url, body)?;
        classify_status(status).map_err(|kind| {
            let mut reason = heapless::String::<64>::new();
            let _ = core::fmt::write(&mut reason, format_args!("HTTP {}", status));
            SinkError { kind, reason }
        })
    }
}

impl TelemetrySink for RtdbSink {
    fn is_ready(&self) -> bool {
        self.cloud.has_database() && wifi::link_is_up()
    }

    fn send(&mut self, record: &TelemetryRecord) -> Result<(), SinkError> {
        let body = record
            .to_json()
            .map_err(|_| SinkError::new(SinkErrorKind::Other, "serialize"))?;
        self.put(self.cloud.record_path, &body)
    }
}

// ── Platform-specific ─────────────────────────────────────────

#[cfg(target_os = "espidf")]
fn platform_put(url: &str, body: &str) -> Result<u16, SinkError> {
    use core::time::Duration;

    use embedded_svc::http::Method;
    use embedded_svc::http::client::Client;
    use embedded_svc::io::Write;
    use esp_idf_svc::http::client::{Configuration, EspHttpConnection};

    fn transport(e: impl core::fmt::Debug) -> SinkError {
        let mut reason = heapless::String::<64>::new();
        let _ = core::fmt::write(&mut reason, format_args!("{:?}", e));
        SinkError {
            kind: SinkErrorKind::Connection,
            reason,
        }
    }

    let conn = EspHttpConnection::new(&Configuration {
        timeout: Some(Duration::from_secs(REQUEST_TIMEOUT_SECS)),
        crt_bundle_attach: Some(esp_idf_svc::sys::esp_crt_bundle_attach),
        ..Default::default()
    })
    .map_err(transport)?;
    let mut client = Client::wrap(conn);

    let len = body.len().to_string();
    let headers = [
        ("content-type", "application/json"),
        ("content-length", len.as_str()),
    ];
    let mut request = client.request(Method::Put, url, &headers).map_err(transport)?;
    request.write_all(body.as_bytes()).map_err(transport)?;
    request.flush().map_err(transport)?;
    let response = request.submit().map_err(transport)?;
    Ok(response.status())
}

#[cfg(not(target_os = "espidf"))]
fn platform_put(url: &str, body: &str) -> Result<u16, SinkError> {
    info!("RTDB(sim): PUT {} {}", url, body);
    Ok(200)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::decision::PumpDecision;
    use crate::sensors::SensorReading;

    #[test]
    fn success_statuses() {
        assert_eq!(classify_status(200), Ok(()));
        assert_eq!(classify_status(204), Ok(()));
    }

    #[test]
    fn auth_statuses() {
        assert_eq!(classify_status(401), Err(SinkErrorKind::Auth));
        assert_eq!(classify_status(403), Err(SinkErrorKind::Auth));
    }

    #[test]
    fn rejected_payload_statuses() {
        assert_eq!(classify_status(400), Err(SinkErrorKind::Rejected));
        assert_eq!(classify_status(413), Err(SinkErrorKind::Rejected));
    }

    #[test]
    fn gateway_errors_are_connectivity_class() {
        assert!(classify_status(503).unwrap_err().is_connectivity());
        assert!(!classify_status(500).unwrap_err().is_connectivity());
    }

    #[test]
    fn url_adds_scheme_and_json_suffix() {
        assert_eq!(
            node_url("example-rtdb.firebaseio.com", "/sensorData", ""),
            "https://example-rtdb.firebaseio.com/sensorData.json"
        );
    }

    #[test]
    fn url_keeps_scheme_and_appends_auth() {
        assert_eq!(
            node_url("https://db.example.com/", "/test/connection", "s3cr3t"),
            "https://db.example.com/test/connection.json?auth=s3cr3t"
        );
    }

    fn unconfigured() -> RtdbSink {
        RtdbSink::new(CloudConfig {
            database_url: "",
            ..CloudConfig::from_build_env()
        })
    }

    #[test]
    fn unconfigured_sink_is_never_ready() {
        assert!(!unconfigured().is_ready());
    }

    #[test]
    fn unconfigured_sink_refuses_to_send() {
        let reading = SensorReading {
            soil_moisture_percent: 0,
            water_level_percent: 0,
            solar_voltage: 0.0,
            temperature_c: None,
            humidity_percent: None,
            timestamp_secs: 0,
        };
        let rec = TelemetryRecord::new(reading, PumpDecision::STOP, 0, 0);
        let err = unconfigured().send(&rec).unwrap_err();
        assert_eq!(err.kind, SinkErrorKind::Other);
    }

    #[test]
    fn configured_sim_sink_accepts_probe() {
        let mut sink = RtdbSink::new(CloudConfig {
            database_url: "db.example.com",
            ..CloudConfig::from_build_env()
        });
        assert!(sink.probe().is_ok());
    }
}
