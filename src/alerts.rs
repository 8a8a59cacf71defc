//! Threshold-based alert derivation.
//!
//! [`evaluate`] is a pure function of a validated [`Measurement`] and the
//! current [`AlertThresholds`].  Sensor faults never reach it; the sampling
//! cycle rejects them first.

use heapless::Vec;
use serde::{Deserialize, Serialize};

use crate::error::CommandError;
use crate::measurement::{MAX_SOIL_CHANNELS, Measurement};

/// External humidity below this is always an alert.  Not configurable.
pub const EXTERNAL_HUMIDITY_LOW_PCT: f32 = 20.0;

/// Internal temp + external humidity + one per soil channel.
pub const MAX_ALERTS: usize = 2 + MAX_SOIL_CHANNELS;

/// One active alert condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AlertKind {
    HighInternalTemperature,
    LowExternalHumidity,
    /// Zero-based soil channel index.
    LowSoilMoisture(u8),
}

/// Active alerts in evaluation order; no duplicates.
pub type AlertSet = Vec<AlertKind, MAX_ALERTS>;

/// Operator-adjustable alert thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Internal temperature above this raises an alert (°C).
    pub temperature_high_c: f32,
    /// Soil moisture below this raises an alert (%).
    pub soil_low_pct: f32,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            temperature_high_c: 28.0,
            soil_low_pct: 35.0,
        }
    }
}

impl AlertThresholds {
    /// A temperature threshold must be strictly positive.  NaN fails.
    pub fn check_temperature_high(value: f32) -> Result<f32, CommandError> {
        if value > 0.0 {
            Ok(value)
        } else {
            Err(CommandError::TemperatureNotPositive)
        }
    }

    /// A soil threshold must lie within 0–100 %.  NaN fails.
    pub fn check_soil_low(value: f32) -> Result<f32, CommandError> {
        if (0.0..=100.0).contains(&value) {
            Ok(value)
        } else {
            Err(CommandError::SoilOutOfRange)
        }
    }

    /// Validate and apply a new temperature threshold.  Unchanged on error.
    pub fn set_temperature_high(&mut self, value: f32) -> Result<(), CommandError> {
        self.temperature_high_c = Self::check_temperature_high(value)?;
        Ok(())
    }

    /// Validate and apply a new soil threshold.  Unchanged on error.
    pub fn set_soil_low(&mut self, value: f32) -> Result<(), CommandError> {
        self.soil_low_pct = Self::check_soil_low(value)?;
        Ok(())
    }
}

/// Derive the active alerts for `m`.
pub fn evaluate(m: &Measurement, thresholds: &AlertThresholds) -> AlertSet {
    let mut alerts = AlertSet::new();

    // Capacity covers every possible entry; pushes cannot fail.
    if m.internal_c > thresholds.temperature_high_c {
        let _ = alerts.push(AlertKind::HighInternalTemperature);
    }
    if m.external_rh < EXTERNAL_HUMIDITY_LOW_PCT {
        let _ = alerts.push(AlertKind::LowExternalHumidity);
    }
    for (i, &pct) in m.soil_pct.iter().enumerate() {
        if pct < thresholds.soil_low_pct {
            let _ = alerts.push(AlertKind::LowSoilMoisture(i as u8));
        }
    }

    alerts
}
