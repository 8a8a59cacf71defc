//! Blynk dashboard telemetry over the HTTP batch-update API.
//!
//! | Pin  | Value                    |
//! |------|--------------------------|
//! | V0   | internal temperature °C  |
//! | V1   | external temperature °C  |
//! | V2   | external humidity %RH    |
//! | V4   | sample time `hh:mm:ss`   |
//! | V5.. | soil moisture %, per channel |
//! | V8   | "measure now" button, read and reset by the device |

use core::fmt::Write;

use crate::app::ports::{MeasureTrigger, Telemetry};
use crate::error::TransportError;
use crate::escape::url_encode;
use crate::measurement::Measurement;

use super::http::{HttpClient, require_success};

pub const BATCH_UPDATE_URL: &str = "https://blynk.cloud/external/api/batch/update";
pub const GET_URL: &str = "https://blynk.cloud/external/api/get";
pub const UPDATE_URL: &str = "https://blynk.cloud/external/api/update";

/// First virtual pin used for soil channels.
const FIRST_SOIL_PIN: usize = 5;

/// Push button that requests a forced measurement.
const MEASURE_BUTTON_PIN: &str = "V8";

pub fn batch_update_url(token: &str, m: &Measurement) -> String {
    let mut url = format!(
        "{BATCH_UPDATE_URL}?token={token}&V0={:.1}&V1={:.1}&V2={:.1}&V4={}",
        m.internal_c,
        m.external_c,
        m.external_rh,
        url_encode(&m.timestamp)
    );
    for (i, pct) in m.soil_pct.iter().enumerate() {
        let _ = write!(url, "&V{}={:.1}", FIRST_SOIL_PIN + i, pct);
    }
    url
}

pub fn read_pin_url(token: &str, pin: &str) -> String {
    format!("{GET_URL}?token={token}&{pin}")
}

pub fn write_pin_url(token: &str, pin: &str, value: &str) -> String {
    format!("{UPDATE_URL}?token={token}&{pin}={value}")
}

/// A switch pin reads back as `1`, or `["1"]` from some endpoints.
fn is_pressed(body: &str) -> bool {
    body.trim().trim_matches(|c: char| c == '[' || c == ']' || c == '"') == "1"
}

pub struct BlynkTelemetry<C: HttpClient> {
    http: C,
    token: &'static str,
}

impl<C: HttpClient> BlynkTelemetry<C> {
    pub fn new(http: C, token: &'static str) -> Self {
        Self { http, token }
    }
}

impl<C: HttpClient> Telemetry for BlynkTelemetry<C> {
    fn publish(&mut self, m: &Measurement) -> Result<(), TransportError> {
        if self.token.is_empty() {
            return Err(TransportError::NotConfigured);
        }
        require_success(self.http.get(&batch_update_url(self.token, m))?)?;
        Ok(())
    }
}

impl<C: HttpClient> MeasureTrigger for BlynkTelemetry<C> {
    fn take_measure_request(&mut self) -> Result<bool, TransportError> {
        if self.token.is_empty() {
            return Err(TransportError::NotConfigured);
        }
        let reply = require_success(self.http.get(&read_pin_url(self.token, MEASURE_BUTTON_PIN))?)?;
        if !is_pressed(&reply.body) {
            return Ok(false);
        }
        // Release the button so one press runs one measurement.
        require_success(self.http.get(&write_pin_url(self.token, MEASURE_BUTTON_PIN, "0"))?)?;
        Ok(true)
    }
}
