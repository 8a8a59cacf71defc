//! Capacitive soil-moisture probes.
//!
//! Each probe is an analog output read through ADC1 and mapped to a
//! percentage with a two-point calibration: the raw count in dry air maps
//! to 0 %, the raw count submerged in water maps to 100 %.  Capacitive
//! probes read *lower* when wetter, so `dry_raw > wet_raw` on real hardware.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static `AtomicU16` per channel for injection.

use core::sync::atomic::{AtomicU16, Ordering};

use serde::{Deserialize, Serialize};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::measurement::MAX_SOIL_CHANNELS;

#[allow(clippy::declare_interior_mutable_const)]
const SIM_INIT: AtomicU16 = AtomicU16::new(0);
static SIM_SOIL_ADC: [AtomicU16; MAX_SOIL_CHANNELS] = [SIM_INIT; MAX_SOIL_CHANNELS];

/// Inject a raw ADC count for soil probe `index` (host only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_soil_adc(index: usize, raw: u16) {
    if let Some(slot) = SIM_SOIL_ADC.get(index) {
        slot.store(raw, Ordering::Relaxed);
    }
}

/// Dry / wet reference points of one probe, in raw ADC counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoilCalibration {
    pub dry_raw: u16,
    pub wet_raw: u16,
}

impl SoilCalibration {
    pub const fn new(dry_raw: u16, wet_raw: u16) -> Self {
        Self { dry_raw, wet_raw }
    }

    /// Map a raw count to moisture in percent, clamped to `[0, 100]`.
    ///
    /// `dry_raw` maps to 0 % and `wet_raw` to 100 %; anything beyond either
    /// end is clamped.  A degenerate calibration (`dry_raw == wet_raw`)
    /// always yields 0 %.
    pub fn percentage(&self, raw: u16) -> f32 {
        let span = self.dry_raw as f32 - self.wet_raw as f32;
        if span == 0.0 {
            return 0.0;
        }
        let pct = 100.0 * (self.dry_raw as f32 - raw as f32) / span;
        pct.clamp(0.0, 100.0)
    }
}

/// One soil probe bound to an ADC1 channel.  Calibration is applied by
/// the sampling cycle from [`SystemConfig`](crate::config::SystemConfig).
pub struct SoilProbe {
    /// Position in the probe list; selects the simulation slot on host.
    #[cfg_attr(target_os = "espidf", allow(dead_code))]
    index: usize,
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    adc_channel: u32,
}

impl SoilProbe {
    pub fn new(index: usize, adc_channel: u32) -> Self {
        Self { index, adc_channel }
    }

    /// Raw ADC count (0–4095).
    pub fn read_raw(&self) -> u16 {
        self.read_adc()
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        hw_init::adc1_read(self.adc_channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_SOIL_ADC
            .get(self.index)
            .map_or(0, |slot| slot.load(Ordering::Relaxed))
    }
}
