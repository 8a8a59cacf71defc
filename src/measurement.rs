//! Measurement data model.
//!
//! [`RawReadings`] is what the sensor layer hands over in one Reading step,
//! before validation.  A [`Measurement`] is built from it only once the
//! readings pass validation; it is immutable from then on.

use heapless::Vec;
use serde::Serialize;

/// Upper bound on soil probes per device.  The reference board has two.
pub const MAX_SOIL_CHANNELS: usize = 4;

/// `hh:mm:ss` wall-clock timestamp.
pub type Timestamp = heapless::String<8>;

/// Value the one-wire probe reports when no device answers on the bus.
pub const PROBE_DISCONNECTED_C: f32 = -127.0;

/// Soil moisture percentages, one per configured channel.
pub type SoilSeries = Vec<f32, MAX_SOIL_CHANNELS>;

/// Unvalidated readings from one pass over every sensor.
#[derive(Debug, Clone, PartialEq)]
pub struct RawReadings {
    /// Internal (canopy) temperature in °C, or [`PROBE_DISCONNECTED_C`].
    pub internal_c: f32,
    /// External temperature in °C; NaN on a failed read.
    pub external_c: f32,
    /// External relative humidity in %; NaN on a failed read.
    pub external_rh: f32,
    /// Raw ADC counts (0–4095), one per soil channel.
    pub soil_raw: Vec<u16, MAX_SOIL_CHANNELS>,
}

/// One immutable sampled snapshot of every tracked value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Measurement {
    pub timestamp: Timestamp,
    pub internal_c: f32,
    pub external_c: f32,
    pub external_rh: f32,
    /// Clamped to 0–100 by the calibration step.
    pub soil_pct: SoilSeries,
}

/// Build a [`Timestamp`] from a time of day given in seconds since midnight.
///
/// Values of a day or more wrap around.
pub fn format_time_of_day(secs_since_midnight: u32) -> Timestamp {
    use core::fmt::Write;

    let secs = secs_since_midnight % 86_400;
    let mut ts = Timestamp::new();
    // "hh:mm:ss" is exactly 8 bytes, the buffer's capacity.
    let _ = write!(ts, "{:02}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60);
    ts
}
