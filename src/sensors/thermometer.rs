//! DS18B20 one-wire probe for the internal (canopy) temperature.
//!
//! A failed read is reported the way the probe library on this board always
//! has: as the [`PROBE_DISCONNECTED_C`] sentinel.  The sampling cycle's
//! validation step rejects it.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: scans the bus once for the first DS18B20, re-scanning after
//! any bus error, and runs a 12-bit conversion per read.
//! On host/test: reads `f32` bits from a static `AtomicU32` for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicU32, Ordering};

use crate::measurement::PROBE_DISCONNECTED_C;

#[cfg(not(target_os = "espidf"))]
static SIM_INTERNAL_C: AtomicU32 = AtomicU32::new(0x41C0_0000); // 24.0

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_internal_c(celsius: f32) {
    SIM_INTERNAL_C.store(celsius.to_bits(), Ordering::Relaxed);
}

/// Simulate an unplugged probe.
#[cfg(not(target_os = "espidf"))]
pub fn sim_disconnect_internal() {
    sim_set_internal_c(PROBE_DISCONNECTED_C);
}

// ── Device implementation ─────────────────────────────────────

#[cfg(target_os = "espidf")]
mod device {
    use ds18b20::{Ds18b20, Resolution};
    use esp_idf_svc::hal::delay::Ets;
    use esp_idf_svc::hal::gpio::{AnyIOPin, InputOutput, PinDriver, Pull};
    use log::{info, warn};
    use one_wire_bus::{Address, OneWire};

    use super::PROBE_DISCONNECTED_C;

    pub struct InternalThermometer {
        bus: OneWire<PinDriver<'static, AnyIOPin, InputOutput>>,
        address: Option<Address>,
        delay: Ets,
    }

    impl InternalThermometer {
        pub fn new(pin: AnyIOPin) -> anyhow::Result<Self> {
            let mut line = PinDriver::input_output_od(pin)?;
            line.set_pull(Pull::Up)?;
            line.set_high()?;
            let bus = OneWire::new(line)
                .map_err(|e| anyhow::anyhow!("one-wire bus init failed: {e:?}"))?;

            let mut probe = Self {
                bus,
                address: None,
                delay: Ets,
            };
            probe.scan();
            Ok(probe)
        }

        fn scan(&mut self) {
            self.address = None;
            for found in self.bus.devices(false, &mut self.delay) {
                match found {
                    Ok(addr) if addr.family_code() == ds18b20::FAMILY_CODE => {
                        self.address = Some(addr);
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!("Thermometer: bus scan failed: {e:?}");
                        break;
                    }
                }
            }
            match self.address {
                Some(addr) => info!("Thermometer: DS18B20 at {addr:?}"),
                None => warn!("Thermometer: no DS18B20 on the bus"),
            }
        }

        pub fn read_celsius(&mut self) -> f32 {
            if self.address.is_none() {
                self.scan();
            }
            let Some(addr) = self.address else {
                return PROBE_DISCONNECTED_C;
            };
            let Ok(sensor) = Ds18b20::new::<core::convert::Infallible>(addr) else {
                self.address = None;
                return PROBE_DISCONNECTED_C;
            };
            if let Err(e) =
                ds18b20::start_simultaneous_temp_measurement(&mut self.bus, &mut self.delay)
            {
                warn!("Thermometer: conversion start failed: {e:?}");
                self.address = None;
                return PROBE_DISCONNECTED_C;
            }
            Resolution::Bits12.delay_for_measurement_time(&mut self.delay);
            match sensor.read_data(&mut self.bus, &mut self.delay) {
                Ok(data) => data.temperature,
                Err(e) => {
                    warn!("Thermometer: read failed: {e:?}");
                    self.address = None;
                    PROBE_DISCONNECTED_C
                }
            }
        }
    }
}

#[cfg(target_os = "espidf")]
pub use device::InternalThermometer;

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
#[derive(Default)]
pub struct InternalThermometer;

#[cfg(not(target_os = "espidf"))]
impl InternalThermometer {
    pub fn new() -> Self {
        Self
    }

    pub fn read_celsius(&mut self) -> f32 {
        f32::from_bits(SIM_INTERNAL_C.load(Ordering::Relaxed))
    }
}
