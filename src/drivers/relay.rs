//! Water pump relay driver.
//!
//! A single relay channel; the pump runs while the input is held HIGH.
//! The driver is a dumb actuator: nothing here times out or interlocks.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the relay GPIO via hw_init helpers.
//! On host/test: hw_init records the level in a simulated register.

use log::info;

use crate::drivers::hw_init;

pub struct PumpRelay {
    gpio: i32,
    on: bool,
}

impl PumpRelay {
    /// Bind to `gpio` and release the relay.
    pub fn new(gpio: i32) -> Self {
        hw_init::gpio_write(gpio, false);
        Self { gpio, on: false }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(self.gpio, on);
        if on != self.on {
            info!("Relay: pump {}", if on { "ON" } else { "OFF" });
        }
        self.on = on;
    }

    pub fn is_on(&self) -> bool {
        self.on
    }
}
