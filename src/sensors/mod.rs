//! Sensor subsystem: individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every probe and produces one [`RawReadings`] per sampling
//! cycle.  It does no validation: disconnected probes and NaN values are
//! passed through for the cycle to reject.

pub mod climate;
pub mod soil;
pub mod thermometer;

use heapless::Vec;
use log::debug;

use crate::measurement::{MAX_SOIL_CHANNELS, RawReadings};
use climate::ClimateSensor;
use soil::SoilProbe;
use thermometer::InternalThermometer;

/// Aggregates all sensor drivers and produces a unified reading.
pub struct SensorHub {
    thermometer: InternalThermometer,
    climate: ClimateSensor,
    soil: Vec<SoilProbe, MAX_SOIL_CHANNELS>,
}

impl SensorHub {
    /// Construct a new hub.  Pass in pre-built drivers (built in main
    /// where peripheral ownership is established).
    pub fn new(
        thermometer: InternalThermometer,
        climate: ClimateSensor,
        soil: Vec<SoilProbe, MAX_SOIL_CHANNELS>,
    ) -> Self {
        Self {
            thermometer,
            climate,
            soil,
        }
    }

    /// Read every probe once.
    pub fn read_all(&mut self) -> RawReadings {
        let internal_c = self.thermometer.read_celsius();
        let ext = self.climate.read();
        let soil_raw = self.soil.iter().map(SoilProbe::read_raw).collect();

        debug!(
            "SensorHub: int={internal_c:.1} ext={:.1}/{:.1} soil={:?}",
            ext.celsius, ext.relative_humidity, soil_raw
        );

        RawReadings {
            internal_c,
            external_c: ext.celsius,
            external_rh: ext.relative_humidity,
            soil_raw,
        }
    }

    pub fn soil_channels(&self) -> usize {
        self.soil.len()
    }
}
