//! System configuration parameters
//!
//! All tunable parameters for the GrowMonitor system.  Runtime-mutable
//! values (alert thresholds, pump state) start from these defaults and live
//! in [`DeviceState`](crate::app::service::DeviceState); nothing is persisted
//! across restarts.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::alerts::AlertThresholds;
use crate::measurement::MAX_SOIL_CHANNELS;
use crate::sensors::soil::SoilCalibration;

/// Core system configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Timing ---
    /// Scheduled sampling interval, also the minimum gap between two
    /// non-forced chat notifications (milliseconds).
    pub measurement_interval_ms: u64,
    /// Minimum interval between two long-poll passes (milliseconds).
    pub command_poll_interval_ms: u64,
    /// Timeout applied to every outbound HTTP request (milliseconds).
    pub http_timeout_ms: u64,
    /// How long the bot server may hold an idle update poll (seconds).
    /// Blocks the loop for at most this long; must stay below
    /// `http_timeout_ms`.
    pub update_long_poll_s: u32,
    /// Offset applied to UTC when formatting `hh:mm:ss` timestamps (seconds).
    pub utc_offset_secs: i32,

    // --- Alerts ---
    /// Thresholds the device boots with.
    pub default_thresholds: AlertThresholds,

    // --- Sensors ---
    /// One calibration pair per soil probe, in channel order.
    pub soil_probes: Vec<SoilCalibration, MAX_SOIL_CHANNELS>,

    // --- Reports ---
    /// Title rendered on trend charts.
    pub chart_title: heapless::String<48>,
}

impl Default for SystemConfig {
    fn default() -> Self {
        let mut soil_probes = Vec::new();
        // Capacity is MAX_SOIL_CHANNELS (>= 2); these pushes cannot fail.
        let _ = soil_probes.push(SoilCalibration::new(3208, 1521));
        let _ = soil_probes.push(SoilCalibration::new(3716, 1979));

        let mut chart_title = heapless::String::new();
        let _ = chart_title.push_str("GrowMonitor - Measurements");

        Self {
            // Timing
            measurement_interval_ms: 300_000, // 5 min
            command_poll_interval_ms: 1_000,  // 1 Hz
            http_timeout_ms: 15_000,
            update_long_poll_s: 2,
            utc_offset_secs: -10_800, // UTC-3

            // Alerts
            default_thresholds: AlertThresholds::default(),

            // Sensors
            soil_probes,

            // Reports
            chart_title,
        }
    }
}

impl SystemConfig {
    /// Reject values that would stall the loop or break the calibration
    /// maths.  The `&'static str` names the offending field.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.measurement_interval_ms == 0 {
            return Err("measurement_interval_ms must be > 0");
        }
        if self.command_poll_interval_ms == 0 {
            return Err("command_poll_interval_ms must be > 0");
        }
        if self.http_timeout_ms == 0 {
            return Err("http_timeout_ms must be > 0");
        }
        if u64::from(self.update_long_poll_s) * 1000 >= self.http_timeout_ms {
            return Err("update_long_poll_s must stay below http_timeout_ms");
        }
        if self.soil_probes.is_empty() {
            return Err("at least one soil probe is required");
        }
        if self.soil_probes.iter().any(|p| p.dry_raw == p.wet_raw) {
            return Err("soil calibration needs dry != wet");
        }
        if AlertThresholds::check_temperature_high(self.default_thresholds.temperature_high_c)
            .is_err()
        {
            return Err("default temperature threshold must be > 0");
        }
        if AlertThresholds::check_soil_low(self.default_thresholds.soil_low_pct).is_err() {
            return Err("default soil threshold must be within 0-100");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Build-time secrets
// ---------------------------------------------------------------------------

/// Credentials and endpoints baked in at build time.
///
/// Set `WIFI_SSID`, `WIFI_PASS`, `BOT_TOKEN`, `CHAT_ID`, `BLYNK_TOKEN` and
/// `SHEETS_URL` in the build environment.  A missing value becomes an empty
/// string and the corresponding channel is disabled at startup.
#[derive(Debug, Clone, Copy)]
pub struct Secrets {
    pub wifi_ssid: &'static str,
    pub wifi_pass: &'static str,
    pub bot_token: &'static str,
    pub chat_id: &'static str,
    pub blynk_token: &'static str,
    pub sheets_url: &'static str,
}

impl Secrets {
    pub const fn from_build_env() -> Self {
        Self {
            wifi_ssid: unwrap_or_empty(option_env!("WIFI_SSID")),
            wifi_pass: unwrap_or_empty(option_env!("WIFI_PASS")),
            bot_token: unwrap_or_empty(option_env!("BOT_TOKEN")),
            chat_id: unwrap_or_empty(option_env!("CHAT_ID")),
            blynk_token: unwrap_or_empty(option_env!("BLYNK_TOKEN")),
            sheets_url: unwrap_or_empty(option_env!("SHEETS_URL")),
        }
    }
}

const fn unwrap_or_empty(v: Option<&'static str>) -> &'static str {
    match v {
        Some(s) => s,
        None => "",
    }
}
