//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements          | Connects to                 |
//! |------------|---------------------|-----------------------------|
//! | `hardware` | SensorPort          | ESP32 ADC, GPIO, DHT22      |
//! |            | ActuatorPort        | Relay and indicator GPIO    |
//! | `log_sink` | EventSink           | Serial log output           |
//! | `rtdb`     | TelemetrySink       | Realtime database over HTTPS|
//! | `time`     | Clock, DelayNs      | ESP32 system time, SNTP     |
//! | `wifi`     | NetworkLink         | ESP-IDF WiFi STA            |

pub mod hardware;
pub mod log_sink;
pub mod rtdb;
pub mod time;
pub mod wifi;
