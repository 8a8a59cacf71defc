//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and both actuator drivers, exposing them
//! through [`SensorPort`] and [`ActuatorPort`].  On non-espidf targets the
//! underlying drivers use cfg-gated simulation stubs.

use embedded_hal::delay::DelayNs;

use crate::app::ports::{ActuatorPort, SensorPort};
use crate::drivers::indicator::{Indication, StatusIndicator};
use crate::drivers::relay::PumpRelay;
use crate::measurement::RawReadings;
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<D> {
    sensor_hub: SensorHub,
    pump: PumpRelay,
    led: StatusIndicator<D>,
}

impl<D: DelayNs> HardwareAdapter<D> {
    pub fn new(sensor_hub: SensorHub, pump: PumpRelay, led: StatusIndicator<D>) -> Self {
        Self {
            sensor_hub,
            pump,
            led,
        }
    }

    pub fn pump_on(&self) -> bool {
        self.pump.is_on()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<D: DelayNs> SensorPort for HardwareAdapter<D> {
    fn read_all(&mut self) -> RawReadings {
        self.sensor_hub.read_all()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<D: DelayNs> ActuatorPort for HardwareAdapter<D> {
    fn set_pump(&mut self, on: bool) {
        self.pump.set(on);
    }

    fn set_busy(&mut self, busy: bool) {
        self.led.show(if busy { Indication::Busy } else { Indication::Idle });
    }

    fn indicate_fault(&mut self) {
        self.led.blink_fault();
    }
}
