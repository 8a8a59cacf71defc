//! DHT11 external climate probe: air temperature and relative humidity.
//!
//! A failed read yields NaN for both values, which the sampling cycle's
//! validation step rejects.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-banged single-wire protocol on an open-drain pin.
//! On host/test: reads `f32` bits from static atomics for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

/// One external reading.  Either field may be NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    pub celsius: f32,
    pub relative_humidity: f32,
}

impl ClimateReading {
    pub const FAILED: Self = Self {
        celsius: f32::NAN,
        relative_humidity: f32::NAN,
    };
}

#[cfg(not(target_os = "espidf"))]
static SIM_EXTERNAL_C: AtomicU32 = AtomicU32::new(0x41B0_0000); // 22.0
#[cfg(not(target_os = "espidf"))]
static SIM_EXTERNAL_RH: AtomicU32 = AtomicU32::new(0x425C_0000); // 55.0

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_climate(celsius: f32, relative_humidity: f32) {
    SIM_EXTERNAL_C.store(celsius.to_bits(), Ordering::Relaxed);
    SIM_EXTERNAL_RH.store(relative_humidity.to_bits(), Ordering::Relaxed);
}

// ── Device implementation ─────────────────────────────────────

#[cfg(target_os = "espidf")]
mod device {
    use dht_sensor::dht11;
    use esp_idf_svc::hal::delay::Ets;
    use esp_idf_svc::hal::gpio::{AnyIOPin, InputOutput, PinDriver, Pull};
    use log::warn;

    use super::ClimateReading;

    pub struct ClimateSensor {
        pin: PinDriver<'static, AnyIOPin, InputOutput>,
        delay: Ets,
    }

    impl ClimateSensor {
        pub fn new(pin: AnyIOPin) -> anyhow::Result<Self> {
            let mut pin = PinDriver::input_output_od(pin)?;
            pin.set_pull(Pull::Up)?;
            pin.set_high()?;
            Ok(Self { pin, delay: Ets })
        }

        pub fn read(&mut self) -> ClimateReading {
            if let Err(e) = self.pin.set_high() {
                warn!("Climate: cannot release data line: {e:?}");
                return ClimateReading::FAILED;
            }
            match dht11::blocking::read(&mut self.delay, &mut self.pin) {
                Ok(r) => ClimateReading {
                    celsius: r.temperature as f32,
                    relative_humidity: r.relative_humidity as f32,
                },
                Err(e) => {
                    warn!("Climate: DHT11 read failed: {e:?}");
                    ClimateReading::FAILED
                }
            }
        }
    }
}

#[cfg(target_os = "espidf")]
pub use device::ClimateSensor;

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
#[derive(Default)]
pub struct ClimateSensor;

#[cfg(not(target_os = "espidf"))]
impl ClimateSensor {
    pub fn new() -> Self {
        Self
    }

    pub fn read(&mut self) -> ClimateReading {
        ClimateReading {
            celsius: f32::from_bits(SIM_EXTERNAL_C.load(Ordering::Relaxed)),
            relative_humidity: f32::from_bits(SIM_EXTERNAL_RH.load(Ordering::Relaxed)),
        }
    }
}
