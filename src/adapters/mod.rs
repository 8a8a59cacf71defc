//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements          | Connects to                   |
//! |-------------|---------------------|-------------------------------|
//! | `hardware`  | SensorPort          | DS18B20, DHT11, ADC1          |
//! |             | ActuatorPort        | relay and LED GPIOs           |
//! | `log_sink`  | EventSink           | Serial log output             |
//! | `time`      | Clock               | ESP32 timer + SNTP wall clock |
//! | `http`      | HttpClient          | ESP-IDF HTTPS client          |
//! | `telegram`  | Notifier            | Telegram Bot API              |
//! |             | UpdateTransport     |                               |
//! | `blynk`     | Telemetry           | Blynk HTTP batch API          |
//! | `sheets`    | Exporter            | Spreadsheet web app           |
//! | `remote`    | all three above     | bundle handed to AppService   |
//! | `wifi`      | (none)              | ESP-IDF WiFi STA              |
//! | `web`       | (none)              | ESP-IDF HTTP server           |

pub mod blynk;
pub mod hardware;
pub mod http;
pub mod log_sink;
pub mod remote;
pub mod sheets;
pub mod telegram;
pub mod time;
pub mod web;
pub mod wifi;
